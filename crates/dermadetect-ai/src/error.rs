use dermadetect_core::ErrorCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DetectError {
    #[error("no file part in the request")]
    MissingFile,

    #[error("upload is not a decodable image: {0}")]
    InvalidImage(#[from] image::ImageError),

    #[error("upload is empty")]
    EmptyUpload,

    #[error("model unavailable: {0:#}")]
    Model(anyhow::Error),

    #[error("inference failed: {0:#}")]
    Inference(anyhow::Error),
}

impl DetectError {
    /// Error kind reported to clients.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::MissingFile => ErrorCode::File,
            Self::InvalidImage(_) | Self::EmptyUpload => ErrorCode::Image,
            Self::Model(_) => ErrorCode::Model,
            Self::Inference(_) => ErrorCode::Inference,
        }
    }

    /// Whether the failure is the client's fault (4xx) rather than the server's.
    pub fn is_client_error(&self) -> bool {
        matches!(self.code(), ErrorCode::File | ErrorCode::Image)
    }
}
