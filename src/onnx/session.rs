//! ONNX Runtime bindings module
//!
//! Wraps an onnxruntime-rs session around an exported enhancement graph that
//! takes a `[1, frames]` f32 waveform and returns the enhanced waveform.

use std::path::Path;
use ndarray::{Array2, IxDyn};
use onnxruntime::{
    environment::Environment, session::Session, tensor::OrtOwnedTensor,
    GraphOptimizationLevel, LoggingLevel, TensorElementDataType,
};
use crate::error::{DenoiseError, Result};

/// ONNX environment wrapper
#[derive(Debug)]
pub struct OnnxEnvironment {
    env: Environment,
}

impl OnnxEnvironment {
    pub fn new() -> Result<Self> {
        let env = Environment::builder()
            .with_name("deepfilter-denoise")
            .with_log_level(LoggingLevel::Warning)
            .build()
            .map_err(|e| DenoiseError::onnx(format!("Failed to create ONNX environment: {}", e)))?;

        Ok(Self { env })
    }
}

/// Session configuration
#[derive(Debug)]
pub struct SessionConfig {
    pub optimization_level: GraphOptimizationLevel,
    pub intra_op_num_threads: i16,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            optimization_level: GraphOptimizationLevel::All,
            intra_op_num_threads: 4,
        }
    }
}

/// ONNX inference session
pub struct OnnxSession {
    session: Session<'static>,
    input_names: Vec<String>,
    output_names: Vec<String>,
    input_shapes: Vec<Vec<Option<u32>>>,
}

impl std::fmt::Debug for OnnxSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxSession")
            .field("input_names", &self.input_names)
            .field("output_names", &self.output_names)
            .finish()
    }
}

impl OnnxSession {
    /// Load the graph at `model_path` and check it takes a single f32 waveform.
    pub fn new(model_path: &Path, config: SessionConfig) -> Result<Self> {
        if !model_path.is_file() {
            return Err(DenoiseError::onnx(format!(
                "ONNX model file does not exist: {}",
                model_path.display()
            )));
        }

        // The session borrows its environment for its whole life; one run loads one model.
        let environment: &'static OnnxEnvironment = Box::leak(Box::new(OnnxEnvironment::new()?));

        let session = environment.env.new_session_builder()?
            .with_optimization_level(config.optimization_level)?
            .with_number_threads(config.intra_op_num_threads)?
            .with_model_from_file(model_path.to_path_buf())?;

        let input_names: Vec<String> = session.inputs.iter().map(|input| input.name.clone()).collect();
        let output_names: Vec<String> = session.outputs.iter().map(|output| output.name.clone()).collect();
        let input_shapes = session.inputs.iter().map(|input| input.dimensions.clone()).collect();

        log::info!("ONNX model loaded: {}", model_path.display());
        log::debug!("Input info: {:?}", input_names);
        log::debug!("Output info: {:?}", output_names);

        if session.inputs.len() != 1 {
            return Err(DenoiseError::onnx(format!(
                "Expected a single waveform input, model declares {}",
                session.inputs.len()
            )));
        }
        if !matches!(session.inputs[0].input_type, TensorElementDataType::Float) {
            return Err(DenoiseError::onnx(format!(
                "Expected f32 waveform input, model declares {:?}",
                session.inputs[0].input_type
            )));
        }
        if session.outputs.is_empty() {
            return Err(DenoiseError::onnx("Model declares no outputs"));
        }

        Ok(Self {
            session,
            input_names,
            output_names,
            input_shapes,
        })
    }

    pub fn input_names(&self) -> &[String] {
        &self.input_names
    }

    pub fn output_names(&self) -> &[String] {
        &self.output_names
    }

    /// Run the graph on one channel and return its first output, flattened.
    pub fn run_waveform(&mut self, samples: &[f32]) -> Result<Vec<f32>> {
        let input = Array2::from_shape_vec((1, samples.len()), samples.to_vec())
            .map_err(|e| DenoiseError::processing(format!("Tensor shape conversion failed: {}", e)))?;

        log::debug!("Input tensor shape: [1, {}]", samples.len());

        let outputs: Vec<OrtOwnedTensor<f32, IxDyn>> = self.session.run(vec![input])
            .map_err(|e| DenoiseError::onnx(format!("ONNX inference failed: {}", e)))?;

        let first = outputs.first()
            .ok_or_else(|| DenoiseError::onnx("Inference produced no output"))?;
        log::debug!("Output tensor shape: {:?}", first.shape());

        Ok(first.iter().copied().collect())
    }

    pub fn session_info(&self) -> SessionInfo {
        SessionInfo {
            input_names: self.input_names.clone(),
            output_names: self.output_names.clone(),
            input_shapes: self.input_shapes.clone(),
        }
    }
}

/// Session information
#[derive(Debug, Clone)]
pub struct SessionInfo {
    pub input_names: Vec<String>,
    pub output_names: Vec<String>,
    pub input_shapes: Vec<Vec<Option<u32>>>,
}

impl SessionInfo {
    pub fn print(&self) {
        println!("=== ONNX Session Information ===");
        for (name, shape) in self.input_names.iter().zip(&self.input_shapes) {
            let dims: Vec<String> = shape.iter()
                .map(|d| d.map_or_else(|| "?".to_string(), |d| d.to_string()))
                .collect();
            println!("  input  {} [{}]", name, dims.join(", "));
        }
        for name in &self.output_names {
            println!("  output {}", name);
        }
        println!("================================");
    }
}
