use axum::Json;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use dermadetect_ai::DetectError;
use dermadetect_core::{ErrorBody, ErrorCode};
use tracing::{error, warn};

/// JSON error response for `/detect`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl ApiError {
    pub fn missing_file() -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ErrorBody::missing_file(),
        }
    }
}

impl From<DetectError> for ApiError {
    fn from(err: DetectError) -> Self {
        if let DetectError::MissingFile = err {
            return Self::missing_file();
        }

        let status = if err.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        let message = match err.code() {
            ErrorCode::File => "file is not valid",
            ErrorCode::Image => "file is not a valid image",
            ErrorCode::Model => "classifier could not be loaded",
            ErrorCode::Inference => "prediction failed",
        };
        Self {
            status,
            body: ErrorBody::new(err.code(), err.to_string(), message),
        }
    }
}

/// The body was not multipart at all.
impl From<MultipartRejection> for ApiError {
    fn from(_: MultipartRejection) -> Self {
        Self::missing_file()
    }
}

/// The multipart stream broke while reading parts.
impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        let status = err.status();
        if status == StatusCode::PAYLOAD_TOO_LARGE {
            return Self {
                status,
                body: ErrorBody::new(ErrorCode::File, err.body_text(), "file is too large"),
            };
        }
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ErrorBody::new(ErrorCode::File, err.body_text(), "file is not valid"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.body.code.as_str();
        if self.status.is_server_error() {
            error!(status = self.status.as_u16(), code, detail = %self.body.error, "detect failed");
        } else {
            warn!(status = self.status.as_u16(), code, detail = %self.body.error, "detect rejected");
        }
        (self.status, Json(self.body)).into_response()
    }
}
