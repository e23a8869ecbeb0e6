//! Sample-rate conversion used when the external tool could not resample

use ndarray::{Array1, Array2};
use rubato::{Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction};
use crate::audio::AudioClip;
use crate::error::{DenoiseError, Result};

pub struct AudioConverter;

impl AudioConverter {
    /// Resample every channel of `audio` to `target_sample_rate`.
    ///
    /// The output always holds `round(frames * target / source)` frames.
    pub fn convert_sample_rate(audio: &AudioClip, target_sample_rate: u32) -> Result<AudioClip> {
        if target_sample_rate == 0 {
            return Err(DenoiseError::resample("Target sample rate cannot be 0"));
        }
        if audio.sample_rate() == target_sample_rate {
            return Ok(audio.clone());
        }
        if audio.sample_rate() == 0 {
            return Err(DenoiseError::resample("Source sample rate cannot be 0"));
        }

        let ratio = target_sample_rate as f64 / audio.sample_rate() as f64;
        let new_length = (audio.frames() as f64 * ratio).round() as usize;
        let channels = audio.channels() as usize;

        log::debug!(
            "Resampling {} channel(s) {} Hz -> {} Hz ({} -> {} frames)",
            channels, audio.sample_rate(), target_sample_rate, audio.frames(), new_length
        );

        let mut data = Array2::zeros((channels, new_length));
        if audio.frames() > 0 {
            let params = SincInterpolationParameters {
                sinc_len: 256,
                f_cutoff: 0.95,
                interpolation: SincInterpolationType::Linear,
                oversampling_factor: 256,
                window: WindowFunction::BlackmanHarris2,
            };

            let mut resampler = SincFixedIn::<f32>::new(ratio, 2.0, params, audio.frames(), channels)
                .map_err(|e| DenoiseError::resample(format!("Failed to create resampler: {}", e)))?;

            let input: Vec<Vec<f32>> = audio.data.outer_iter().map(|ch| ch.to_vec()).collect();
            let mut resampled = resampler.process(&input, None)
                .map_err(|e| DenoiseError::resample(format!("Resampling failed: {}", e)))?;

            // The sinc filter holds back the last frames until it sees more input.
            let tail = resampler.process_partial(None::<&[Vec<f32>]>, None)
                .map_err(|e| DenoiseError::resample(format!("Resampler flush failed: {}", e)))?;
            for (channel, rest) in resampled.iter_mut().zip(tail) {
                channel.extend(rest);
            }

            for (c, mut channel) in resampled.into_iter().enumerate() {
                channel.resize(new_length, 0.0);
                data.row_mut(c).assign(&Array1::from(channel));
            }
        }

        AudioClip::new(target_sample_rate, data, audio.format())
    }
}
