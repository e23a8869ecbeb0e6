//! Error Types

use thiserror::Error;

/// Main error type
#[derive(Debug, Clone, Error)]
pub enum DenoiseError {
    #[error("Audio error: {message}")]
    Audio { message: String },
    #[error("ONNX error: {message}")]
    Onnx { message: String },
    #[error("Config error: {message}")]
    Config { message: String },
    #[error("IO error: {message}")]
    Io { message: String },
    #[error("Processing error: {message}")]
    Processing { message: String },
    #[error("Resample error: {message}")]
    Resample { message: String },
}

impl DenoiseError {
    pub fn audio<S: Into<String>>(msg: S) -> Self { Self::Audio { message: msg.into() } }
    pub fn onnx<S: Into<String>>(msg: S) -> Self { Self::Onnx { message: msg.into() } }
    pub fn config<S: Into<String>>(msg: S) -> Self { Self::Config { message: msg.into() } }
    pub fn io<S: Into<String>>(msg: S) -> Self { Self::Io { message: msg.into() } }
    pub fn processing<S: Into<String>>(msg: S) -> Self { Self::Processing { message: msg.into() } }
    pub fn resample<S: Into<String>>(msg: S) -> Self { Self::Resample { message: msg.into() } }
}

pub type Result<T> = std::result::Result<T, DenoiseError>;

impl From<std::io::Error> for DenoiseError {
    fn from(err: std::io::Error) -> Self { Self::io(err.to_string()) }
}

impl From<hound::Error> for DenoiseError {
    fn from(err: hound::Error) -> Self { Self::audio(format!("WAV: {}", err)) }
}

impl From<symphonia::core::errors::Error> for DenoiseError {
    fn from(err: symphonia::core::errors::Error) -> Self { Self::audio(format!("Decode: {}", err)) }
}

impl From<onnxruntime::OrtError> for DenoiseError {
    fn from(err: onnxruntime::OrtError) -> Self { Self::onnx(format!("ORT: {}", err)) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = DenoiseError::audio("test");
        assert!(e.to_string().contains("Audio"));

        let e = DenoiseError::resample("ffmpeg exited with status 1");
        assert_eq!(e.to_string(), "Resample error: ffmpeg exited with status 1");
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let e: DenoiseError = io.into();
        assert!(matches!(e, DenoiseError::Io { .. }));
    }
}
