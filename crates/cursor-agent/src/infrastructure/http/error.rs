//! HTTP error mapping.
//!
//! Every failure leaves the agent as an [`ErrorPayload`] JSON body with a
//! status code chosen from its [`ErrorKind`]:
//!
//! | Kind              | Status |
//! |-------------------|--------|
//! | `OutOfBounds`     | 400    |
//! | `InvalidArgument` | 400    |
//! | `NotVisible`      | 409    |
//! | `Timeout`         | 504    |
//! | `Faulted`         | 500    |

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use cursor_core::{ErrorKind, ErrorPayload};
use thiserror::Error;

use crate::application::DispatchError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// The request body was missing, not JSON, or had the wrong shape.
    #[error("invalid request body: {0}")]
    InvalidBody(String),
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Dispatch(e) => e.kind(),
            ApiError::InvalidBody(_) => ErrorKind::InvalidArgument,
        }
    }

    pub fn status(&self) -> StatusCode {
        status_for(self.kind())
    }
}

fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::OutOfBounds | ErrorKind::InvalidArgument => StatusCode::BAD_REQUEST,
        ErrorKind::NotVisible => StatusCode::CONFLICT,
        ErrorKind::Timeout => StatusCode::GATEWAY_TIMEOUT,
        ErrorKind::Faulted => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!("request failed: {self}");
        }
        let body = ErrorPayload::new(self.kind(), self.to_string());
        (status, Json(body)).into_response()
    }
}
