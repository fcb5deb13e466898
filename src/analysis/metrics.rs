//! Per-file metrics: speaking rate and silence-gated energy

/// Pulses per second
///
/// Returns 0.0 when `duration_seconds` is zero or negative.
pub fn speaking_rate(pulse_count: usize, duration_seconds: f32) -> f32 {
    if duration_seconds > 0.0 {
        pulse_count as f32 / duration_seconds
    } else {
        0.0
    }
}

/// Mean of the envelope values strictly above `silence_threshold`
///
/// Pauses between utterances are excluded so the value reflects vocal effort
/// during speech rather than the proportion of silence. Returns 0.0 if no
/// frame exceeds the threshold.
pub fn silence_gated_energy(normalized_envelope: &[f32], silence_threshold: f32) -> f32 {
    let (sum, count) = normalized_envelope
        .iter()
        .filter(|&&v| v > silence_threshold)
        .fold((0.0f64, 0usize), |(sum, count), &v| (sum + v as f64, count + 1));

    if count == 0 {
        return 0.0;
    }

    (sum / count as f64) as f32
}
