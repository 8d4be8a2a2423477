//! Inference layer: upload preprocessing, classifier seam, ONNX Runtime backend.

mod error;
mod predict;
pub mod preprocess;
mod provider;

pub use error::DetectError;
pub use predict::{argmax, detect};
pub use preprocess::{ImageTensor, preprocess};
pub use provider::{ClassifierProvider, LoadPolicy, ModelFiles};

#[cfg(feature = "onnx")]
mod onnx;
#[cfg(feature = "onnx")]
pub use onnx::{OnnxClassifier, OnnxProvider};
