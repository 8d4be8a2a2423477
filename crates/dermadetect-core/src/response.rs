//! Per-request prediction values and the JSON bodies returned by `/detect`.

use serde::{Deserialize, Serialize};

use crate::catalog::{DiseaseRecord, find_disease, find_medicine};

/// Outcome of classifying a single uploaded image.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionResult {
    pub class_index: usize,
    /// Probability of the selected class, in `[0, 1]`.
    pub confidence: f32,
    pub record: &'static DiseaseRecord,
    pub medicine: &'static str,
    /// Filename as sent by the client. Not sanitised.
    pub source_filename: String,
}

impl PredictionResult {
    /// Resolve a class index and its probability against the catalog.
    pub fn new(class_index: usize, confidence: f32, source_filename: impl Into<String>) -> Self {
        Self {
            class_index,
            confidence,
            record: find_disease(class_index),
            medicine: find_medicine(class_index),
            source_filename: source_filename.into(),
        }
    }

    /// Confidence as a percentage rounded to two decimals.
    pub fn accuracy(&self) -> f64 {
        confidence_percent(self.confidence)
    }
}

/// Convert a probability into a percentage in `[0, 100]`, rounded to two decimals.
///
/// Model outputs can stray slightly outside `[0, 1]` (or be NaN) when the final
/// layer is not a softmax, so the result is clamped.
pub fn confidence_percent(probability: f32) -> f64 {
    if probability.is_nan() {
        return 0.0;
    }
    let pct = (f64::from(probability) * 100.0).clamp(0.0, 100.0);
    (pct * 100.0).round() / 100.0
}

/// Successful `/detect` response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResponse {
    pub detected: bool,
    pub disease: String,
    pub accuracy: f64,
    pub symptoms: Vec<String>,
    pub severe: bool,
    pub medicine: String,
    pub img_path: String,
}

impl From<&PredictionResult> for DetectionResponse {
    fn from(p: &PredictionResult) -> Self {
        Self {
            detected: true,
            disease: p.record.name.to_string(),
            accuracy: p.accuracy(),
            symptoms: p.record.symptoms.iter().map(|s| s.to_string()).collect(),
            severe: p.record.severe,
            medicine: p.medicine.to_string(),
            img_path: p.source_filename.clone(),
        }
    }
}

/// Stable machine-readable error kind carried in every error body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ErrorCode {
    /// The request carried no `file` part.
    File,
    /// The upload could not be decoded as an image.
    Image,
    /// The model files are missing or could not be loaded.
    Model,
    /// The model ran but produced an unusable output.
    Inference,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "FILE",
            Self::Image => "IMAGE",
            Self::Model => "MODEL",
            Self::Inference => "INFERENCE",
        }
    }
}

/// Error response body: `{ "error", "code", "message" }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: ErrorCode,
    pub message: String,
}

impl ErrorBody {
    pub fn new(code: ErrorCode, error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code,
            message: message.into(),
        }
    }

    /// Body for a request without a `file` part.
    pub fn missing_file() -> Self {
        Self::new(ErrorCode::File, "No file part in the request", "file is not valid")
    }
}
