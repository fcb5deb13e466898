//! Short-time RMS energy envelope
//!
//! Algorithm:
//! 1. Divide audio into overlapping frames (frame_size, hop_size)
//! 2. Compute RMS energy per frame: sqrt(mean(x²))
//!
//! Frame placement at the signal boundaries follows [`Framing`]. Within one run
//! the same convention is used for frame count and frame timing.
//!
//! # Example
//!
//! ```
//! use speaking_rate::features::envelope::{rms_envelope, Framing};
//!
//! let samples = vec![0.5f32; 16000];
//! let envelope = rms_envelope(&samples, 2048, 512, Framing::Centered)?;
//! assert_eq!(envelope.len(), 1 + 16000 / 512);
//! # Ok::<(), speaking_rate::AnalysisError>(())
//! ```

use crate::error::AnalysisError;

/// Boundary convention for envelope frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Framing {
    /// Frame `t` is centred on sample `t * hop`; the signal is zero-padded by
    /// `frame_size / 2` on both sides. Produces `1 + len / hop` frames.
    #[default]
    Centered,
    /// Frame `t` starts at sample `t * hop` and must fit inside the signal.
    /// Produces `(len - frame_size) / hop + 1` frames, none if the signal is
    /// shorter than one frame.
    Valid,
}

impl Framing {
    /// Parse a framing name as used on the command line
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "centered" | "center" => Some(Framing::Centered),
            "valid" => Some(Framing::Valid),
            _ => None,
        }
    }
}

/// Number of envelope frames for a signal of `len` samples
///
/// An empty signal has no frames under either convention.
pub fn frame_count(len: usize, frame_size: usize, hop_size: usize, framing: Framing) -> usize {
    if len == 0 || hop_size == 0 {
        return 0;
    }
    match framing {
        Framing::Centered => 1 + len / hop_size,
        Framing::Valid => {
            if len >= frame_size {
                (len - frame_size) / hop_size + 1
            } else {
                0
            }
        }
    }
}

/// Compute the RMS energy envelope of a mono signal
///
/// # Arguments
///
/// * `samples` - Audio samples (mono, normalized to [-1.0, 1.0])
/// * `frame_size` - Frame size for analysis (typically 2048)
/// * `hop_size` - Hop size between frames (typically 512)
/// * `framing` - Boundary convention
///
/// # Returns
///
/// One non-negative RMS value per frame. The mean always divides by
/// `frame_size`, so zero padding lowers boundary frames.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if `frame_size` or `hop_size` is zero
pub fn rms_envelope(
    samples: &[f32],
    frame_size: usize,
    hop_size: usize,
    framing: Framing,
) -> Result<Vec<f32>, AnalysisError> {
    if frame_size == 0 {
        return Err(AnalysisError::InvalidInput(
            "Frame size must be > 0".to_string(),
        ));
    }

    if hop_size == 0 {
        return Err(AnalysisError::InvalidInput(
            "Hop size must be > 0".to_string(),
        ));
    }

    let num_frames = frame_count(samples.len(), frame_size, hop_size, framing);

    log::debug!(
        "Computing RMS envelope: {} samples, frame={}, hop={}, framing={:?}, frames={}",
        samples.len(),
        frame_size,
        hop_size,
        framing,
        num_frames
    );

    let pad = match framing {
        Framing::Centered => frame_size / 2,
        Framing::Valid => 0,
    };

    let mut envelope = Vec::with_capacity(num_frames);

    for i in 0..num_frames {
        // Window in padded coordinates is [i*hop, i*hop + frame_size); shift back by pad
        // and clip to the real signal, the rest are zeros
        let padded_start = i * hop_size;
        let start = padded_start.saturating_sub(pad).min(samples.len());
        let end = (padded_start + frame_size)
            .saturating_sub(pad)
            .min(samples.len());

        // Accumulate in f64 so long frames do not drift
        let sum_sq: f64 = samples[start..end]
            .iter()
            .map(|&x| (x as f64) * (x as f64))
            .sum();
        let rms = (sum_sq / frame_size as f64).sqrt() as f32;
        envelope.push(rms);
    }

    Ok(envelope)
}

/// Duration of one envelope hop in seconds
pub fn frame_duration(hop_size: usize, sample_rate: u32) -> f32 {
    if sample_rate == 0 {
        return 0.0;
    }
    hop_size as f32 / sample_rate as f32
}
