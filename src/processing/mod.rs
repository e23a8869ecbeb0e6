//! Denoise Pipeline

pub mod reconcile;
pub mod processor;

pub use reconcile::{reconcile, Reconciled, ResampleMethod, SampleRateCheck};
pub use processor::{DenoiseProcessor, PerformanceMetrics, ProcessingResult};
