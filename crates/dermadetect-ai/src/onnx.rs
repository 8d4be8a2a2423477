//! ONNX Runtime image classifier.
//!
//! Loads an exported skin-lesion CNN (`[1, 224, 224, 3]` float input, one
//! probability per class as output) and runs single-image inference.

use std::sync::Mutex;
use std::time::Instant;

use anyhow::Context;
use ort::session::Session;
use ort::value::{Tensor, ValueType};
use tracing::{debug, info};

use crate::preprocess::{CHANNELS, INPUT_SIZE};
use crate::{ClassifierProvider, DetectError, ImageTensor, LoadPolicy, ModelFiles};

/// A loaded ONNX session for the skin classifier.
pub struct OnnxClassifier {
    session: Session,
}

impl OnnxClassifier {
    /// Load the model graph (and check its weights sidecar, if any).
    pub fn load(files: &ModelFiles) -> anyhow::Result<Self> {
        files.check_exists()?;
        let start = Instant::now();

        let session = Session::builder()?
            .commit_from_file(&files.definition)
            .with_context(|| format!("loading {}", files.definition.display()))?;

        let inputs = session.inputs();
        anyhow::ensure!(!inputs.is_empty(), "model declares no inputs");
        if let Some(dims) = declared_dims(inputs[0].dtype()) {
            anyhow::ensure!(
                input_shape_matches(&dims),
                "model input shape {dims:?} does not match expected {EXPECTED_INPUT:?}"
            );
        }

        info!(
            model = %files.definition.display(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "loaded classifier"
        );
        Ok(Self { session })
    }

    /// Run one image through the model, returning the class probability vector.
    pub fn predict(&mut self, input: &ImageTensor) -> anyhow::Result<Vec<f32>> {
        let tensor = Tensor::from_array((input.shape_i64(), input.data.clone().into_boxed_slice()))?;
        let outputs = self.session.run(ort::inputs![tensor])?;

        let (output_shape, output_data) = outputs[0].try_extract_tensor::<f32>()?;
        let dims: &[i64] = output_shape;
        anyhow::ensure!(
            dims.first() == Some(&1) && !output_data.is_empty(),
            "unexpected output shape: {dims:?}, expected [1, classes]"
        );
        debug!(classes = output_data.len(), "inference complete");

        Ok(output_data.to_vec())
    }
}

const EXPECTED_INPUT: [i64; 4] = [1, INPUT_SIZE as i64, INPUT_SIZE as i64, CHANNELS as i64];

/// The declared input shape of a tensor input. Dynamic axes come back as
/// `-1` (or `0` from some exporters).
fn declared_dims(input_type: &ValueType) -> Option<Vec<i64>> {
    match input_type {
        ValueType::Tensor { shape, .. } => Some(shape.iter().copied().collect()),
        _ => None,
    }
}

/// Rank must be 4 and every fixed axis must agree; dynamic axes accept anything.
fn input_shape_matches(dims: &[i64]) -> bool {
    dims.len() == EXPECTED_INPUT.len()
        && dims
            .iter()
            .zip(EXPECTED_INPUT)
            .all(|(&d, want)| d <= 0 || d == want)
}

/// [`ClassifierProvider`] backed by ONNX Runtime.
///
/// With [`LoadPolicy::PerRequest`] every call builds a fresh session from
/// disk. With [`LoadPolicy::Cached`] the first call loads the session and
/// later calls reuse it; concurrent calls are serialised on the session lock.
pub struct OnnxProvider {
    files: ModelFiles,
    policy: LoadPolicy,
    cached: Mutex<Option<OnnxClassifier>>,
}

impl OnnxProvider {
    pub fn new(files: ModelFiles, policy: LoadPolicy) -> Self {
        Self {
            files,
            policy,
            cached: Mutex::new(None),
        }
    }

    pub fn files(&self) -> &ModelFiles {
        &self.files
    }

    pub fn policy(&self) -> LoadPolicy {
        self.policy
    }
}

impl ClassifierProvider for OnnxProvider {
    fn classify(&self, input: &ImageTensor) -> Result<Vec<f32>, DetectError> {
        match self.policy {
            LoadPolicy::PerRequest => {
                let mut classifier =
                    OnnxClassifier::load(&self.files).map_err(DetectError::Model)?;
                classifier.predict(input).map_err(DetectError::Inference)
            }
            LoadPolicy::Cached => {
                let mut guard = self.cached.lock().map_err(|_| {
                    DetectError::Inference(anyhow::anyhow!("classifier lock poisoned"))
                })?;
                if guard.is_none() {
                    *guard = Some(OnnxClassifier::load(&self.files).map_err(DetectError::Model)?);
                }
                match guard.as_mut() {
                    Some(classifier) => classifier.predict(input).map_err(DetectError::Inference),
                    None => Err(DetectError::Model(anyhow::anyhow!("classifier not loaded"))),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn blank_input() -> ImageTensor {
        ImageTensor {
            data: vec![0.0; 224 * 224 * 3],
            shape: [1, 224, 224, 3],
        }
    }

    #[test]
    fn input_shape_check_skips_dynamic_axes() {
        assert!(input_shape_matches(&[1, 224, 224, 3]));
        assert!(input_shape_matches(&[-1, 224, 224, 3]));
        assert!(input_shape_matches(&[0, -1, -1, 3]));

        // NCHW export with a dynamic batch
        assert!(!input_shape_matches(&[-1, 3, 224, 224]));
        assert!(!input_shape_matches(&[-1, 299, 299, 3]));
        assert!(!input_shape_matches(&[-1, 224, 224, 1]));
        assert!(!input_shape_matches(&[224, 224, 3]));
    }

    #[test]
    fn load_missing_model_fails() {
        let dir = tempfile::tempdir().unwrap();
        let files = ModelFiles::new(dir.path().join("model.onnx"), None);
        let err = OnnxClassifier::load(&files).err().unwrap();
        assert!(err.to_string().contains("not found"), "{err}");
    }

    #[test]
    fn load_corrupt_model_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.onnx");
        std::fs::write(&path, b"not a protobuf").unwrap();
        assert!(OnnxClassifier::load(&ModelFiles::new(path, None)).is_err());
    }

    #[test]
    fn provider_reports_model_error_per_request() {
        let provider = OnnxProvider::new(
            ModelFiles::new(PathBuf::from("/nonexistent/model.onnx"), None),
            LoadPolicy::PerRequest,
        );
        let err = provider.classify(&blank_input()).unwrap_err();
        assert!(matches!(err, DetectError::Model(_)), "{err:?}");
    }

    #[test]
    fn cached_provider_retries_after_failed_load() {
        let dir = tempfile::tempdir().unwrap();
        let provider = OnnxProvider::new(
            ModelFiles::new(dir.path().join("model.onnx"), None),
            LoadPolicy::Cached,
        );
        for _ in 0..2 {
            let err = provider.classify(&blank_input()).unwrap_err();
            assert!(matches!(err, DetectError::Model(_)), "{err:?}");
        }
        assert!(provider.cached.lock().unwrap().is_none());
        assert_eq!(provider.policy(), LoadPolicy::Cached);
    }
}
