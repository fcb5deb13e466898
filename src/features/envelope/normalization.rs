//! Min-max envelope normalization

use crate::error::AnalysisError;

/// Rescale an envelope so its minimum maps to 0.0 and its maximum to 1.0
///
/// A constant envelope (max == min, e.g. digital silence or a steady tone) is
/// returned unchanged instead of dividing by zero.
///
/// # Errors
///
/// Returns `AnalysisError::NumericalError` if the envelope contains NaN or
/// infinite values
///
/// # Example
///
/// ```
/// use speaking_rate::features::envelope::normalize_envelope;
///
/// let normalized = normalize_envelope(&[0.1, 0.3, 0.5])?;
/// assert_eq!(normalized[0], 0.0);
/// assert_eq!(normalized[2], 1.0);
/// # Ok::<(), speaking_rate::AnalysisError>(())
/// ```
pub fn normalize_envelope(envelope: &[f32]) -> Result<Vec<f32>, AnalysisError> {
    if let Some(idx) = envelope.iter().position(|v| !v.is_finite()) {
        return Err(AnalysisError::NumericalError(format!(
            "Non-finite envelope value at frame {}",
            idx
        )));
    }

    let min = envelope.iter().copied().fold(f32::INFINITY, f32::min);
    let max = envelope.iter().copied().fold(f32::NEG_INFINITY, f32::max);

    // Covers the empty envelope too (min = +inf, max = -inf)
    if envelope.is_empty() || max == min {
        log::debug!(
            "Envelope is constant ({} frames), skipping normalization",
            envelope.len()
        );
        return Ok(envelope.to_vec());
    }

    let range = max - min;
    let normalized = envelope
        .iter()
        .map(|&v| {
            if v == max {
                1.0
            } else {
                ((v - min) / range).clamp(0.0, 1.0)
            }
        })
        .collect();

    Ok(normalized)
}
