//! External media tool (ffmpeg) used for resampling and output transcoding

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tempfile::TempPath;
use crate::error::{DenoiseError, Result};

/// Temporary audio file owned by one run. Dropping it deletes the file.
#[derive(Debug)]
pub struct ResampledFile {
    path: TempPath,
    sample_rate: u32,
}

impl ResampledFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

impl Drop for ResampledFile {
    fn drop(&mut self) {
        if self.path.exists() {
            log::info!("Removing temporary file: {}", self.path.display());
        }
    }
}

#[derive(Debug, Clone)]
pub struct Ffmpeg {
    program: PathBuf,
}

impl Ffmpeg {
    pub fn new<P: Into<PathBuf>>(program: P) -> Self {
        Self { program: program.into() }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// `ffmpeg -version` runs and exits successfully.
    pub fn is_available(&self) -> bool {
        Command::new(&self.program)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    /// Resample `input` to `target_sample_rate` into a fresh temporary file.
    ///
    /// The temporary file keeps the input's extension so ffmpeg picks the same
    /// container. It is removed again when the command fails.
    pub fn resample_to_temp(&self, input: &Path, target_sample_rate: u32) -> Result<ResampledFile> {
        if !self.is_available() {
            return Err(DenoiseError::resample(format!(
                "{} not found or not working",
                self.program.display()
            )));
        }

        let suffix = input.extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();
        let temp_path = tempfile::Builder::new()
            .prefix("denoise_resampled_")
            .suffix(&suffix)
            .tempfile()?
            .into_temp_path();

        let rate = target_sample_rate.to_string();
        self.run([
            OsStr::new("-i"), input.as_os_str(),
            OsStr::new("-ar"), OsStr::new(&rate),
            OsStr::new("-y"),
            OsStr::new("-hide_banner"),
            OsStr::new("-loglevel"), OsStr::new("error"),
            temp_path.as_os_str(),
        ])?;

        log::info!("Created temporary file: {}", temp_path.display());
        Ok(ResampledFile {
            path: temp_path,
            sample_rate: target_sample_rate,
        })
    }

    /// Re-encode `input` into `output`, letting ffmpeg pick the codec from the extension.
    pub fn transcode(&self, input: &Path, output: &Path) -> Result<()> {
        self.run([
            OsStr::new("-i"), input.as_os_str(),
            OsStr::new("-y"),
            OsStr::new("-hide_banner"),
            OsStr::new("-loglevel"), OsStr::new("error"),
            output.as_os_str(),
        ])
    }

    fn run<'a, I>(&self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a OsStr>,
    {
        let output = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| DenoiseError::resample(format!(
                "Failed to run {}: {}", self.program.display(), e
            )))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DenoiseError::resample(format!(
                "{} exited with {}: {}",
                self.program.display(), output.status, stderr.trim()
            )));
        }

        Ok(())
    }
}

impl Default for Ffmpeg {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}
