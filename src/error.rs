use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
    #[error("not found")]
    NotFound,
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("no trip at index {index} (list has {len})")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("trip {index} has already been verified")]
    AlreadyVerified { index: usize },
    #[error("trip {index} has no invoice to verify")]
    MissingInvoice { index: usize },
    #[error("could not save - storage full ({needed} bytes needed, quota is {quota})")]
    StorageFull { needed: usize, quota: usize },
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Config(_)
            | AppError::Io(_)
            | AppError::Serialization(_)
            | AppError::Csv(_)
            | AppError::Other(_)
            | AppError::StorageFull { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound | AppError::IndexOutOfBounds { .. } => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::AlreadyVerified { .. } | AppError::MissingInvoice { .. } => {
                StatusCode::CONFLICT
            }
        };

        (status, self.to_string()).into_response()
    }
}
