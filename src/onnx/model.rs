//! Pretrained model catalogue and model file lookup

use std::fmt;
use std::path::{Path, PathBuf};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use crate::error::{DenoiseError, Result};

/// Pretrained DeepFilterNet releases the tool can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum)]
pub enum ModelVariant {
    /// v1, balanced
    #[value(name = "DeepFilterNet")]
    DeepFilterNet,
    /// v2, fast and light
    #[default]
    #[value(name = "DeepFilterNet2")]
    DeepFilterNet2,
    /// v3, best quality
    #[value(name = "DeepFilterNet3")]
    DeepFilterNet3,
}

impl ModelVariant {
    pub const ALL: [ModelVariant; 3] = [
        ModelVariant::DeepFilterNet,
        ModelVariant::DeepFilterNet2,
        ModelVariant::DeepFilterNet3,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ModelVariant::DeepFilterNet => "DeepFilterNet",
            ModelVariant::DeepFilterNet2 => "DeepFilterNet2",
            ModelVariant::DeepFilterNet3 => "DeepFilterNet3",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ModelVariant::DeepFilterNet => "v1, balanced",
            ModelVariant::DeepFilterNet2 => "v2, fast and light",
            ModelVariant::DeepFilterNet3 => "v3, best quality",
        }
    }

    /// Rate the network was trained at; audio must reach the model at this rate.
    pub fn sample_rate(&self) -> u32 {
        match self {
            ModelVariant::DeepFilterNet
            | ModelVariant::DeepFilterNet2
            | ModelVariant::DeepFilterNet3 => 48000,
        }
    }

    pub fn model_file_name(&self) -> String {
        format!("{}.onnx", self.name())
    }
}

impl fmt::Display for ModelVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// ONNX model metadata
#[derive(Debug, Clone)]
pub struct ModelMetadata {
    pub model_path: PathBuf,
    /// Model name (extracted from filename)
    pub model_name: String,
    pub model_size: u64,
}

impl ModelMetadata {
    pub fn from_path<P: AsRef<Path>>(model_path: P) -> Result<Self> {
        let model_path = model_path.as_ref();

        let metadata = std::fs::metadata(model_path)
            .map_err(|e| DenoiseError::onnx(format!(
                "Failed to read model file metadata {}: {}", model_path.display(), e
            )))?;

        if metadata.len() == 0 {
            return Err(DenoiseError::onnx(format!(
                "Model file is empty: {}", model_path.display()
            )));
        }

        let model_name = model_path
            .file_stem()
            .and_then(|name| name.to_str())
            .unwrap_or("unknown")
            .to_string();

        Ok(Self {
            model_path: model_path.to_path_buf(),
            model_name,
            model_size: metadata.len(),
        })
    }

    /// Get human-readable format of model file size
    pub fn size_human_readable(&self) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
        let mut size_f = self.model_size as f64;
        let mut unit_index = 0;

        while size_f >= 1024.0 && unit_index < UNITS.len() - 1 {
            size_f /= 1024.0;
            unit_index += 1;
        }

        format!("{:.2} {}", size_f, UNITS[unit_index])
    }
}

/// Model loader utility functions
pub struct ModelLoader;

impl ModelLoader {
    /// Find all ONNX models in a directory, sorted by path
    pub fn find_models<P: AsRef<Path>>(directory: P) -> Result<Vec<PathBuf>> {
        let directory = directory.as_ref();

        if !directory.is_dir() {
            return Err(DenoiseError::onnx(format!(
                "Model directory does not exist: {}",
                directory.display()
            )));
        }

        let mut models = Vec::new();
        for entry in std::fs::read_dir(directory)? {
            let path = entry?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "onnx") {
                models.push(path);
            }
        }
        models.sort();

        Ok(models)
    }

    /// Path of `variant`'s graph inside `directory`, or an error naming what is there instead.
    pub fn locate(directory: &Path, variant: ModelVariant) -> Result<PathBuf> {
        let path = directory.join(variant.model_file_name());
        if path.is_file() {
            return Ok(path);
        }

        let available = match Self::find_models(directory) {
            Ok(models) if !models.is_empty() => models.iter()
                .filter_map(|p| p.file_name().and_then(|n| n.to_str()).map(str::to_string))
                .collect::<Vec<_>>()
                .join(", "),
            Ok(_) => "none".to_string(),
            Err(_) => "directory missing".to_string(),
        };

        Err(DenoiseError::onnx(format!(
            "Model file for {} not found: {} (available: {})",
            variant, path.display(), available
        )))
    }
}
