//! deepfilter-denoise - speech denoising with pretrained DeepFilterNet models
//!
//! Probes the input's sample rate, resamples through ffmpeg when the model
//! needs a different rate (falling back to in-library resampling), runs the
//! exported model through ONNX Runtime and writes
//! `<stem>_denoise_DeepFilterNet<ext>` next to the input.

pub mod audio;
pub mod config;
pub mod enhance;
pub mod error;
pub mod ffmpeg;
pub mod onnx;
pub mod processing;

pub use config::{Config, Args};
pub use enhance::{DeepFilterEnhancer, Enhancer};
pub use error::{DenoiseError, Result};
pub use onnx::ModelVariant;
pub use processing::{DenoiseProcessor, ProcessingResult};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Route `log` output to stderr; `RUST_LOG` wins over `verbose` when set.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_target(false)
        .try_init()
        .ok();
}

pub fn get_library_info() -> LibraryInfo {
    LibraryInfo {
        name: NAME.to_string(),
        version: VERSION.to_string(),
        description: DESCRIPTION.to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct LibraryInfo {
    pub name: String,
    pub version: String,
    pub description: String,
}

impl std::fmt::Display for LibraryInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} v{} - {}", self.name, self.version, self.description)
    }
}
