//! Configuration management for the denoise run

use crate::error::{DenoiseError, Result};
use crate::onnx::ModelVariant;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Inserted between the input stem and its extension.
pub const OUTPUT_SUFFIX: &str = "_denoise_DeepFilterNet";

/// Environment variable consulted when neither the CLI nor the config file names a model directory.
pub const MODEL_DIR_ENV: &str = "DEEPFILTER_MODEL_DIR";

pub const DEFAULT_MODEL_DIR: &str = "./models";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub model: ModelConfig,
    pub resample: ResampleConfig,
    pub output: OutputConfig,
    #[serde(skip)]
    pub input_path: PathBuf,
    #[serde(skip)]
    pub output_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub variant: ModelVariant,
    pub dir: Option<PathBuf>,
    pub inference_threads: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResampleConfig {
    /// External resampling executable, looked up on PATH when not absolute
    pub ffmpeg_path: PathBuf,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub verbose: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            variant: ModelVariant::default(),
            dir: None,
            inference_threads: default_inference_threads(),
        }
    }
}

/// Four intra-op threads, capped to what `validate` accepts on this host.
fn default_inference_threads() -> usize {
    4.min(num_cpus::get() * 2)
}

impl Default for ResampleConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: PathBuf::from("ffmpeg"),
        }
    }
}

impl Config {
    pub fn variant(&self) -> ModelVariant {
        self.model.variant
    }

    pub fn inference_threads(&self) -> usize {
        self.model.inference_threads
    }

    pub fn ffmpeg_path(&self) -> &Path {
        &self.resample.ffmpeg_path
    }

    pub fn verbose(&self) -> bool {
        self.output.verbose
    }

    /// Directory holding the exported `<Variant>.onnx` files.
    ///
    /// Resolution order: explicit setting (CLI or config file), then
    /// `DEEPFILTER_MODEL_DIR`, then `./models`.
    pub fn model_dir(&self) -> PathBuf {
        if let Some(dir) = &self.model.dir {
            return dir.clone();
        }
        std::env::var_os(MODEL_DIR_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_DIR))
    }

    pub fn model_path(&self) -> PathBuf {
        self.model_dir().join(self.variant().model_file_name())
    }
}

#[derive(Debug, Clone, Parser)]
#[command(
    name = "denoise",
    about = "Remove background noise from a speech recording with DeepFilterNet",
    version
)]
pub struct Args {
    #[arg(help = "Path to the noisy audio file")]
    pub input_path: PathBuf,

    #[arg(
        short = 'm',
        long = "model",
        value_enum,
        help = "Pretrained model to use [default: DeepFilterNet2]\n  \
                DeepFilterNet:  v1, balanced\n  \
                DeepFilterNet2: v2, fast and light\n  \
                DeepFilterNet3: v3, best quality"
    )]
    pub model: Option<ModelVariant>,

    #[arg(short = 'v', long = "verbose", help = "Enable verbose output mode")]
    pub verbose: bool,

    #[arg(short = 'c', long = "config", help = "Config file path (TOML format)")]
    pub config_file: Option<PathBuf>,

    #[arg(long = "model-dir", help = "Directory containing <Model>.onnx files")]
    pub model_dir: Option<PathBuf>,

    #[arg(long = "ffmpeg", help = "External resampling tool executable")]
    pub ffmpeg: Option<PathBuf>,

    #[arg(long = "inference-threads", help = "ONNX inference thread count")]
    pub inference_threads: Option<usize>,
}

impl Config {
    /// Create config from command line arguments and config file
    pub fn from_args_and_config(args: Args) -> Result<Self> {
        let mut config = if let Some(config_path) = &args.config_file {
            Self::from_file(config_path)?
        } else {
            Self::default()
        };

        // Command line arguments override config file settings
        if let Some(model) = args.model {
            config.model.variant = model;
        }
        if let Some(dir) = args.model_dir {
            config.model.dir = Some(dir);
        }
        if let Some(ffmpeg) = args.ffmpeg {
            config.resample.ffmpeg_path = ffmpeg;
        }
        if let Some(threads) = args.inference_threads {
            config.model.inference_threads = threads;
        }
        config.output.verbose |= args.verbose;

        config.input_path = resolve_input_path(&args.input_path)?;
        config.output_path = derive_output_path(&config.input_path);

        config.validate()?;

        Ok(config)
    }

    /// Load config from TOML config file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| DenoiseError::config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| DenoiseError::config(format!("Failed to parse config file: {}", e)))
    }

    /// Validate configuration parameter validity
    pub fn validate(&self) -> Result<()> {
        if self.model.inference_threads == 0 {
            return Err(DenoiseError::config("Inference thread count must be greater than 0"));
        }
        if self.model.inference_threads > num_cpus::get() * 2 {
            return Err(DenoiseError::config("Inference thread count cannot exceed 2x logical CPU cores"));
        }

        if self.resample.ffmpeg_path.as_os_str().is_empty() {
            return Err(DenoiseError::config("Resampling tool path cannot be empty"));
        }

        Ok(())
    }

    /// Save config to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| DenoiseError::config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| DenoiseError::config(format!("Failed to write config file: {}", e)))
    }

    /// Create default config file
    pub fn create_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
        Self::default().save_to_file(path)
    }
}

/// Check that the input names an existing regular file.
pub fn resolve_input_path(path: &Path) -> Result<PathBuf> {
    if !path.is_file() {
        return Err(DenoiseError::config(format!(
            "Input file not found: {}",
            path.display()
        )));
    }
    Ok(path.to_path_buf())
}

/// `<dir>/<stem>_denoise_DeepFilterNet<.ext>`, next to the input.
pub fn derive_output_path(input: &Path) -> PathBuf {
    let mut name = input.file_stem().map(OsString::from).unwrap_or_default();
    name.push(OUTPUT_SUFFIX);
    if let Some(ext) = input.extension() {
        name.push(".");
        name.push(ext);
    }
    input.with_file_name(name)
}
