//! Audio decoding using Symphonia

use std::fs::File;
use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use super::waveform::Waveform;
use crate::error::AnalysisError;
use crate::preprocessing::channel_mixer::downmix_to_mono;

/// Decode an audio file to a mono waveform
///
/// The first decodable track is used. Multi-channel audio is averaged to mono.
/// Packets that fail to decode are skipped; container-level errors abort.
///
/// # Errors
///
/// * `AnalysisError::IoError` if the file cannot be opened or read
/// * `AnalysisError::DecodingError` if the container or codec is not supported,
///   the file has no audio track, or the track has no sample rate
pub fn decode_audio(path: &Path) -> Result<Waveform, AnalysisError> {
    log::debug!("Decoding audio file: {}", path.display());

    let src = File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(src), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let meta_opts: MetadataOptions = Default::default();
    let fmt_opts: FormatOptions = Default::default();

    let probed = symphonia::default::get_probe().format(&hint, mss, &fmt_opts, &meta_opts)?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| AnalysisError::DecodingError("No supported audio tracks found".to_string()))?;

    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| AnalysisError::DecodingError("Track has no sample rate".to_string()))?;

    let mut decoder =
        symphonia::default::get_codecs().make(&track.codec_params, &DecoderOptions::default())?;

    let mut interleaved: Vec<f32> = Vec::new();
    let mut channels = track.codec_params.channels.map(|c| c.count()).unwrap_or(1);
    let mut skipped_packets = 0usize;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            // End of stream
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(e.into()),
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                channels = spec.channels.count();

                let mut buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
                buf.copy_interleaved_ref(decoded);
                interleaved.extend_from_slice(buf.samples());
            }
            Err(SymphoniaError::DecodeError(msg)) => {
                // Corrupted packet, keep going
                log::debug!("Skipping undecodable packet in {}: {}", path.display(), msg);
                skipped_packets += 1;
                continue;
            }
            Err(e) => return Err(e.into()),
        }
    }

    ensure_decoded(interleaved.len(), skipped_packets)?;

    let samples = downmix_to_mono(&interleaved, channels)?;

    log::debug!(
        "Decoded {}: {} samples at {} Hz ({} channel(s))",
        path.display(),
        samples.len(),
        sample_rate,
        channels
    );

    Waveform::new(samples, sample_rate)
}

/// Reject a stream where every packet failed to decode
///
/// An empty stream with no failed packets is a valid zero-length recording.
fn ensure_decoded(sample_count: usize, skipped_packets: usize) -> Result<(), AnalysisError> {
    if sample_count == 0 && skipped_packets > 0 {
        return Err(AnalysisError::DecodingError(format!(
            "All {} audio packets failed to decode",
            skipped_packets
        )));
    }
    if skipped_packets > 0 {
        log::warn!("{} audio packets could not be decoded and were skipped", skipped_packets);
    }
    Ok(())
}
