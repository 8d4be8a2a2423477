pub mod catalog;
pub mod response;

pub use catalog::{
    CLASS_COUNT, DEFAULT_MEDICINE, DiseaseRecord, UNKNOWN_DISEASE, find_disease, find_medicine,
};
pub use response::{DetectionResponse, ErrorBody, ErrorCode, PredictionResult, confidence_percent};
