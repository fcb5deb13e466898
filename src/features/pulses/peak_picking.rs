//! Pulse detection by peak picking on the normalized envelope
//!
//! Peaks in short-time energy approximate syllabic nuclei. The amplitude floor
//! drops micro-fluctuations in pauses and the minimum distance keeps one voiced
//! segment from being counted twice.
//!
//! # Conventions
//!
//! - A candidate is a maximal run of equal values (a plateau; a single frame is a
//!   run of length one) whose neighbours are strictly lower. The reported index is
//!   the run midpoint, rounded down.
//! - Runs touching the first or last frame only need their one existing neighbour
//!   to be lower. A run spanning the whole envelope is never a peak, so a constant
//!   envelope yields no pulses.
//! - When candidates are closer than `min_distance` frames, the highest survives;
//!   equal heights are resolved in favour of the earliest index.

use std::cmp::Ordering;

/// Convert a minimum pulse spacing in seconds to whole envelope frames
///
/// The default rounds down (`floor(seconds / frame_duration)`). With `strict`
/// the result is rounded up so that `frames * frame_duration >= seconds`. The
/// result is never below 1.
///
/// # Example
///
/// ```
/// use speaking_rate::features::pulses::min_distance_frames;
///
/// // 512-sample hop at 16 kHz is 32 ms per frame
/// assert_eq!(min_distance_frames(0.1, 512, 16000, false), 3);
/// assert_eq!(min_distance_frames(0.1, 512, 16000, true), 4);
/// ```
pub fn min_distance_frames(
    min_distance_seconds: f32,
    hop_size: usize,
    sample_rate: u32,
    strict: bool,
) -> usize {
    if hop_size == 0 || sample_rate == 0 || min_distance_seconds <= 0.0 {
        return 1;
    }

    // Work in samples to stay exact when the spacing is a whole number of hops
    let ratio = min_distance_seconds as f64 * sample_rate as f64 / hop_size as f64;
    let frames = if strict {
        (ratio - 1e-6).ceil()
    } else {
        (ratio + 1e-6).floor()
    };

    (frames as usize).max(1)
}

/// Find pulse positions in a normalized envelope
///
/// # Arguments
///
/// * `envelope` - Normalized envelope (values in [0, 1])
/// * `min_height` - Minimum value for a pulse (inclusive)
/// * `min_distance` - Minimum distance between kept pulses, in frames
///
/// # Returns
///
/// Frame indices of detected pulses, strictly increasing, with every adjacent
/// pair at least `min_distance` apart
///
/// # Example
///
/// ```
/// use speaking_rate::features::pulses::detect_pulses;
///
/// let envelope = vec![0.0, 0.5, 1.0, 0.7, 0.3, 0.9, 0.2];
/// assert_eq!(detect_pulses(&envelope, 0.02, 1), vec![2, 5]);
/// assert_eq!(detect_pulses(&envelope, 0.02, 4), vec![2]);
/// ```
pub fn detect_pulses(envelope: &[f32], min_height: f32, min_distance: usize) -> Vec<usize> {
    log::debug!(
        "Detecting pulses in envelope of length {}, min_height={:.3}, min_distance={}",
        envelope.len(),
        min_height,
        min_distance
    );

    let candidates: Vec<usize> = local_maxima(envelope)
        .into_iter()
        .filter(|&idx| envelope[idx] >= min_height)
        .collect();

    let pulses = select_by_distance(&candidates, envelope, min_distance.max(1));

    log::debug!("Found {} pulses", pulses.len());

    pulses
}

/// Suppress candidates closer than `min_distance` to a higher one
///
/// `candidates` must be sorted by index. They are visited highest first (earliest
/// index on ties); a kept candidate clears its still-kept neighbours within
/// `min_distance` on both sides, so each visit only touches nearby candidates.
fn select_by_distance(candidates: &[usize], envelope: &[f32], min_distance: usize) -> Vec<usize> {
    if min_distance <= 1 || candidates.len() < 2 {
        return candidates.to_vec();
    }

    let mut priority: Vec<usize> = (0..candidates.len()).collect();
    priority.sort_by(|&a, &b| {
        envelope[candidates[b]]
            .partial_cmp(&envelope[candidates[a]])
            .unwrap_or(Ordering::Equal)
            .then(a.cmp(&b))
    });

    let mut keep = vec![true; candidates.len()];
    for &j in &priority {
        if !keep[j] {
            continue;
        }

        let mut k = j;
        while k > 0 && candidates[j] - candidates[k - 1] < min_distance {
            k -= 1;
            keep[k] = false;
        }

        let mut k = j + 1;
        while k < candidates.len() && candidates[k] - candidates[j] < min_distance {
            keep[k] = false;
            k += 1;
        }
    }

    candidates
        .iter()
        .zip(&keep)
        .filter_map(|(&idx, &kept)| kept.then_some(idx))
        .collect()
}

/// Indices of local maxima, plateaus reduced to their midpoint
fn local_maxima(signal: &[f32]) -> Vec<usize> {
    let n = signal.len();
    let mut maxima = Vec::new();

    if n < 2 {
        return maxima;
    }

    let mut left = 0;
    while left < n {
        // Extend the run of equal values starting at `left`
        let mut right = left;
        while right + 1 < n && signal[right + 1] == signal[left] {
            right += 1;
        }

        let value = signal[left];
        let rises_into = left == 0 || signal[left - 1] < value;
        let falls_after = right == n - 1 || signal[right + 1] < value;
        let whole_signal = left == 0 && right == n - 1;

        if rises_into && falls_after && !whole_signal {
            maxima.push((left + right) / 2);
        }

        left = right + 1;
    }

    maxima
}
