//! Speech enhancement backends
//!
//! The pipeline only needs a model's native sample rate and a single
//! whole-clip enhancement call; everything inside that call belongs to the
//! pretrained network.

use std::time::Instant;
use crate::audio::AudioClip;
use crate::config::Config;
use crate::error::{DenoiseError, Result};
use crate::onnx::{ModelLoader, ModelMetadata, ModelVariant, OnnxSession, SessionConfig};

pub trait Enhancer {
    /// Human-readable model name for logs and results.
    fn name(&self) -> &str;

    /// Rate the model expects its input at.
    fn sample_rate(&self) -> u32;

    /// Enhance a clip already at [`Enhancer::sample_rate`]. Channel count and
    /// length are preserved.
    fn enhance(&mut self, audio: &AudioClip) -> Result<AudioClip>;
}

/// DeepFilterNet graph executed through ONNX Runtime.
#[derive(Debug)]
pub struct DeepFilterEnhancer {
    variant: ModelVariant,
    metadata: ModelMetadata,
    session: OnnxSession,
}

impl DeepFilterEnhancer {
    /// Locate and load the configured variant.
    pub fn load(config: &Config) -> Result<Self> {
        let variant = config.variant();
        let model_path = ModelLoader::locate(&config.model_dir(), variant)?;
        let metadata = ModelMetadata::from_path(&model_path)?;

        log::info!(
            "Loading {} ({}) from {} [{}]",
            variant, variant.description(), model_path.display(), metadata.size_human_readable()
        );

        let threads = i16::try_from(config.inference_threads())
            .map_err(|_| DenoiseError::config("Inference thread count is too large"))?;
        let session_config = SessionConfig {
            intra_op_num_threads: threads,
            ..Default::default()
        };
        let session = OnnxSession::new(&model_path, session_config)?;

        if config.verbose() {
            session.session_info().print();
        }

        Ok(Self { variant, metadata, session })
    }

    pub fn variant(&self) -> ModelVariant {
        self.variant
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }
}

impl Enhancer for DeepFilterEnhancer {
    fn name(&self) -> &str {
        self.variant.name()
    }

    fn sample_rate(&self) -> u32 {
        self.variant.sample_rate()
    }

    fn enhance(&mut self, audio: &AudioClip) -> Result<AudioClip> {
        if audio.sample_rate() != self.sample_rate() {
            return Err(DenoiseError::processing(format!(
                "Sample rate mismatch: {} vs {}", audio.sample_rate(), self.sample_rate()
            )));
        }

        let mut enhanced = audio.data.clone();
        for (c, mut row) in enhanced.outer_iter_mut().enumerate() {
            let start = Instant::now();
            let input = audio.channel(c).to_vec();
            let output = self.session.run_waveform(&input)?;
            let output = fit_to_length(output, input.len());

            row.iter_mut().zip(output).for_each(|(dst, src)| *dst = src);
            log::debug!("Channel {} enhanced in {} ms", c, start.elapsed().as_millis());
        }

        AudioClip::new(audio.sample_rate(), enhanced, audio.format())
    }
}

/// Crop or zero-pad model output to `len`, zeroing non-finite samples and clamping to `[-1, 1]`.
pub fn fit_to_length(mut samples: Vec<f32>, len: usize) -> Vec<f32> {
    if samples.len() != len {
        log::debug!("Model returned {} samples for {} input samples", samples.len(), len);
    }
    samples.resize(len, 0.0);
    for s in samples.iter_mut() {
        *s = if s.is_finite() { s.clamp(-1.0, 1.0) } else { 0.0 };
    }
    samples
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_fit_to_length() {
        assert_eq!(fit_to_length(vec![0.1, 0.2, 0.3], 2), vec![0.1, 0.2]);
        assert_eq!(fit_to_length(vec![0.1], 3), vec![0.1, 0.0, 0.0]);
        assert_eq!(fit_to_length(vec![f32::NAN, 2.0, -f32::INFINITY, -3.0], 4), vec![0.0, 1.0, 0.0, -1.0]);
    }

    #[test]
    fn test_load_without_model_file() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.model.dir = Some(dir.path().to_path_buf());

        let err = DeepFilterEnhancer::load(&config).unwrap_err();
        assert!(matches!(err, DenoiseError::Onnx { .. }));
        assert!(err.to_string().contains("DeepFilterNet2.onnx"));
    }
}
