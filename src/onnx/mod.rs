//! ONNX Inference Module

pub mod model;
pub mod session;

pub use model::{ModelLoader, ModelMetadata, ModelVariant};
pub use session::{OnnxEnvironment, OnnxSession, SessionConfig, SessionInfo};
