//! Audio Processing Module
//!
//! Reading, writing and sample-rate handling for the files the denoiser
//! consumes. WAV goes through hound; every other container is decoded with
//! symphonia.

pub mod wav;
pub mod converter;
pub mod decoder;

use std::path::Path;
use crate::error::Result;

pub use wav::{AudioClip, AudioFormat, AudioHeader};
pub use converter::AudioConverter;

pub fn is_wav(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("wav") || e.eq_ignore_ascii_case("wave"))
}

/// Native sample rate of the file at `path`.
pub fn probe_sample_rate(path: &Path) -> Result<u32> {
    if is_wav(path) {
        if let Ok(reader) = hound::WavReader::open(path) {
            return Ok(reader.spec().sample_rate);
        }
    }
    decoder::probe_sample_rate(path)
}

/// Decode `path` and bring it to `target_sample_rate`.
///
/// Resampling here is the in-library fallback; inputs already converted by
/// the external tool pass through untouched.
pub fn load_audio(path: &Path, target_sample_rate: u32) -> Result<AudioClip> {
    let clip = if is_wav(path) {
        match AudioClip::from_file(path) {
            Ok(clip) => clip,
            Err(e) => {
                log::debug!("hound could not read {} ({}), trying symphonia", path.display(), e);
                decoder::decode_file(path)?
            }
        }
    } else {
        decoder::decode_file(path)?
    };

    if clip.sample_rate() == target_sample_rate {
        return Ok(clip);
    }

    log::info!(
        "Resampling {} Hz -> {} Hz in-library",
        clip.sample_rate(), target_sample_rate
    );
    AudioConverter::convert_sample_rate(&clip, target_sample_rate)
}
