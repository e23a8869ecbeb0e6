//! Denoise pipeline: reconcile rate, load, enhance, save, clean up

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use crate::audio::{self, AudioClip, AudioFormat};
use crate::config::Config;
use crate::enhance::Enhancer;
use crate::error::{DenoiseError, Result};
use crate::ffmpeg::Ffmpeg;
use super::reconcile::{reconcile, ResampleMethod};

#[derive(Debug)]
pub struct DenoiseProcessor<E: Enhancer> {
    enhancer: E,
    ffmpeg: Ffmpeg,
}

impl<E: Enhancer> DenoiseProcessor<E> {
    pub fn new(enhancer: E, ffmpeg: Ffmpeg) -> Self {
        Self { enhancer, ffmpeg }
    }

    pub fn from_config(config: &Config, enhancer: E) -> Self {
        Self::new(enhancer, Ffmpeg::new(config.ffmpeg_path()))
    }

    pub fn enhancer(&self) -> &E {
        &self.enhancer
    }

    /// Denoise `input_path` into `output_path`.
    ///
    /// Any temporary resampled file is gone by the time this returns, on
    /// success and on error alike.
    pub fn process_file(&mut self, input_path: &Path, output_path: &Path) -> Result<ProcessingResult> {
        let start_time = Instant::now();
        let target_rate = self.enhancer.sample_rate();

        let reconciled = reconcile(input_path, target_rate, &self.ffmpeg);
        let check = reconciled.check;
        let resample_method = reconciled.method;
        let temporary_file = reconciled.resampled.as_ref().map(|f| f.path().to_path_buf());

        let audio = audio::load_audio(reconciled.source(input_path), target_rate)?;
        log::info!(
            "Loaded {:.2}s, {} Hz, {} channel(s)",
            audio.duration(), audio.sample_rate(), audio.channels()
        );

        let inference_start = Instant::now();
        let enhanced = self.enhancer.enhance(&audio)?;
        let inference_time = inference_start.elapsed();
        log::info!("Enhancement finished in {:.2}s", inference_time.as_secs_f64());

        self.save(&enhanced.with_format(AudioFormat::Int16), output_path)?;
        log::info!("Saved: {}", output_path.display());

        drop(reconciled);

        Ok(ProcessingResult {
            input_path: input_path.to_path_buf(),
            output_path: output_path.to_path_buf(),
            model_name: self.enhancer.name().to_string(),
            original_sample_rate: check.original,
            target_sample_rate: target_rate,
            resample_method,
            temporary_file,
            performance_metrics: PerformanceMetrics::new(&audio, start_time.elapsed(), inference_time),
        })
    }

    fn save(&self, audio: &AudioClip, output_path: &Path) -> Result<()> {
        if audio::is_wav(output_path) {
            return audio.save_to_file(output_path);
        }

        // hound only writes WAV; other containers go through the external tool.
        let wav = tempfile::Builder::new()
            .prefix("denoise_output_")
            .suffix(".wav")
            .tempfile()?
            .into_temp_path();
        audio.save_to_file(&wav)?;
        self.ffmpeg.transcode(&wav, output_path).map_err(|e| DenoiseError::audio(format!(
            "Cannot encode {}: {}", output_path.display(), e
        )))
    }
}

#[derive(Debug, Clone)]
pub struct ProcessingResult {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub model_name: String,
    /// `None` when the input could not be probed.
    pub original_sample_rate: Option<u32>,
    pub target_sample_rate: u32,
    pub resample_method: ResampleMethod,
    /// Where the resampled copy lived; already deleted.
    pub temporary_file: Option<PathBuf>,
    pub performance_metrics: PerformanceMetrics,
}

#[derive(Debug, Clone)]
pub struct PerformanceMetrics {
    pub input_duration_seconds: f64,
    pub processing_time_seconds: f64,
    pub inference_time_ms: f64,
    pub real_time_factor: f64,
    pub channels: u16,
}

impl PerformanceMetrics {
    pub fn new(audio: &AudioClip, processing_time: Duration, inference_time: Duration) -> Self {
        let audio_duration = audio.duration();
        let real_time_factor = if audio_duration > 0.0 {
            processing_time.as_secs_f64() / audio_duration
        } else {
            0.0
        };

        Self {
            input_duration_seconds: audio_duration,
            processing_time_seconds: processing_time.as_secs_f64(),
            inference_time_ms: inference_time.as_secs_f64() * 1000.0,
            real_time_factor,
            channels: audio.channels(),
        }
    }
}
