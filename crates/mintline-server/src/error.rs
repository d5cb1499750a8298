use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use mintline_ledger::LedgerError;
use mintline_protocol::ErrorResponse;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;

impl ServerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Ledger(LedgerError::Rejected(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Ledger(LedgerError::Serialization(_)) => StatusCode::BAD_REQUEST,
            Self::Ledger(_) | Self::Config(_) | Self::Io(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let reason = match &self {
            Self::Ledger(LedgerError::Rejected(reason)) => Some(reason.clone()),
            _ => None,
        };
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = ErrorResponse {
            code: status.as_u16(),
            message: self.to_string(),
            reason,
        };
        (status, Json(body)).into_response()
    }
}
