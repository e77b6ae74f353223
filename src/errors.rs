use crate::models::DateKey;
use axum::http::StatusCode;
use thiserror::Error;

/// Domain failures raised by the journal stores and the mode controller.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum JournalError {
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDateKey(String),

    #[error("color '{0}' is not in the palette")]
    UnknownColor(String),

    #[error("no record at index {index} for {date} ({len} recorded)")]
    IndexOutOfRange {
        date: DateKey,
        index: usize,
        len: usize,
    },

    #[error("cannot {action} while {mode}")]
    InvalidTransition {
        action: &'static str,
        mode: &'static str,
    },
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<JournalError> for AppError {
    fn from(err: JournalError) -> Self {
        let status = match err {
            JournalError::InvalidDateKey(_) | JournalError::UnknownColor(_) => {
                StatusCode::BAD_REQUEST
            }
            JournalError::IndexOutOfRange { .. } => StatusCode::NOT_FOUND,
            JournalError::InvalidTransition { .. } => StatusCode::CONFLICT,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
