use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("lottery not found")]
    NotFound,

    #[error("the draw range is invalid")]
    InvalidRange,

    #[error("no admissible numbers to draw from")]
    NoAdmissibleNumbers,

    #[error("the lottery has already been drawn")]
    AlreadyDrawn,

    #[error("the lottery is closed")]
    LotteryClosed,

    #[error("the lottery is full")]
    CapacityExceeded,

    #[error("this phone or email is already registered")]
    DuplicateParticipant,

    #[error("storage error: {0}")]
    Store(#[from] redis::RedisError),

    #[error("stored document is malformed: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_)
            | AppError::InvalidRange
            | AppError::NoAdmissibleNumbers
            | AppError::AlreadyDrawn
            | AppError::LotteryClosed
            | AppError::CapacityExceeded
            | AppError::DuplicateParticipant => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Store(_) | AppError::Corrupt(_) | AppError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            error!("{self}");
        }

        (status, Json(json!({ "message": self.to_string() }))).into_response()
    }
}
