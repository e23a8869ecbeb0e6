//! Bring the input to the model's sample rate before loading

use std::fmt;
use std::path::Path;
use crate::audio;
use crate::ffmpeg::{Ffmpeg, ResampledFile};

/// Probed input rate against the rate the model needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleRateCheck {
    /// `None` when the file could not be probed.
    pub original: Option<u32>,
    pub target: u32,
}

impl SampleRateCheck {
    pub fn probe(input: &Path, target: u32) -> Self {
        let original = match audio::probe_sample_rate(input) {
            Ok(rate) => Some(rate),
            Err(e) => {
                log::warn!("Could not determine the input sample rate in advance: {}", e);
                None
            }
        };
        Self { original, target }
    }

    /// An unknown rate always counts as a mismatch.
    pub fn needs_resampling(&self) -> bool {
        self.original != Some(self.target)
    }
}

impl fmt::Display for SampleRateCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.original {
            Some(rate) => write!(f, "{} Hz -> {} Hz", rate, self.target),
            None => write!(f, "unknown -> {} Hz", self.target),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResampleMethod {
    /// Input already at the model rate.
    None,
    /// Temporary file produced by the external tool.
    External,
    /// Converted in-library while loading.
    Internal,
}

impl ResampleMethod {
    pub fn name(&self) -> &'static str {
        match self {
            ResampleMethod::None => "none",
            ResampleMethod::External => "external",
            ResampleMethod::Internal => "internal",
        }
    }
}

/// Outcome of reconciliation. Holding it keeps any temporary file alive.
#[derive(Debug)]
pub struct Reconciled {
    pub check: SampleRateCheck,
    pub method: ResampleMethod,
    pub resampled: Option<ResampledFile>,
}

impl Reconciled {
    /// File the audio should be loaded from.
    pub fn source<'a>(&'a self, input: &'a Path) -> &'a Path {
        self.resampled.as_ref().map_or(input, |file| file.path())
    }
}

/// Probe `input` and, on mismatch, try the external tool. Never fails: tool
/// problems fall back to in-library resampling.
pub fn reconcile(input: &Path, target: u32, tool: &Ffmpeg) -> Reconciled {
    let check = SampleRateCheck::probe(input, target);

    if !check.needs_resampling() {
        log::debug!("Input already at {} Hz", target);
        return Reconciled { check, method: ResampleMethod::None, resampled: None };
    }

    log::info!("Input sample rate differs from the model requirement ({})", check);
    log::info!("Resampling to {} Hz with {}...", target, tool.program().display());

    match tool.resample_to_temp(input, target) {
        Ok(file) => Reconciled { check, method: ResampleMethod::External, resampled: Some(file) },
        Err(e) => {
            log::warn!("External resampling failed or was skipped: {}", e);
            log::warn!("Falling back to in-library resampling");
            Reconciled { check, method: ResampleMethod::Internal, resampled: None }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{AudioClip, AudioFormat};
    use tempfile::Builder;

    #[test]
    fn test_needs_resampling() {
        assert!(!SampleRateCheck { original: Some(48000), target: 48000 }.needs_resampling());
        assert!(SampleRateCheck { original: Some(44100), target: 48000 }.needs_resampling());
        assert!(SampleRateCheck { original: None, target: 48000 }.needs_resampling());
    }

    #[test]
    fn test_display() {
        assert_eq!(SampleRateCheck { original: Some(16000), target: 48000 }.to_string(), "16000 Hz -> 48000 Hz");
        assert_eq!(SampleRateCheck { original: None, target: 48000 }.to_string(), "unknown -> 48000 Hz");
    }

    #[test]
    fn test_matching_rate_skips_tool() {
        let file = Builder::new().suffix(".wav").tempfile().unwrap();
        AudioClip::new_mono(48000, vec![0.0; 480], AudioFormat::Int16).save_to_file(file.path()).unwrap();

        let reconciled = reconcile(file.path(), 48000, &Ffmpeg::new("/nonexistent/ffmpeg"));
        assert_eq!(reconciled.method, ResampleMethod::None);
        assert_eq!(reconciled.check.original, Some(48000));
        assert_eq!(reconciled.source(file.path()), file.path());
    }

    #[test]
    fn test_missing_tool_falls_back() {
        let file = Builder::new().suffix(".wav").tempfile().unwrap();
        AudioClip::new_mono(16000, vec![0.0; 160], AudioFormat::Int16).save_to_file(file.path()).unwrap();

        let reconciled = reconcile(file.path(), 48000, &Ffmpeg::new("/nonexistent/ffmpeg"));
        assert_eq!(reconciled.method, ResampleMethod::Internal);
        assert!(reconciled.resampled.is_none());
        assert_eq!(reconciled.source(file.path()), file.path());
    }

    #[test]
    fn test_unprobeable_input_forces_attempt() {
        let file = Builder::new().suffix(".ogg").tempfile().unwrap();
        std::fs::write(file.path(), b"not audio").unwrap();

        let reconciled = reconcile(file.path(), 48000, &Ffmpeg::new("/nonexistent/ffmpeg"));
        assert_eq!(reconciled.check.original, None);
        assert_eq!(reconciled.method, ResampleMethod::Internal);
    }
}
