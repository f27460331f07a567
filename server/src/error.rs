use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;
use records::error::RecordsError;
use records_api::ErrorBody;
use thiserror::Error;

pub const INTERNAL_ERROR: &str = "Internal server error";

/// Everything a handler can fail with. Rendered as `{"message": ...}`.
#[derive(Debug, Error)]
pub enum ApiFailure {
    #[error(transparent)]
    Records(#[from] RecordsError),
    #[error("{0}")]
    BadRequest(String),
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl From<JsonRejection> for ApiFailure {
    fn from(rejection: JsonRejection) -> Self {
        ApiFailure::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiFailure {
    fn from(rejection: QueryRejection) -> Self {
        ApiFailure::BadRequest(rejection.body_text())
    }
}

impl ApiFailure {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            ApiFailure::BadRequest(_) | ApiFailure::Records(RecordsError::BadInput(_)) => {
                StatusCode::BAD_REQUEST
            }
            ApiFailure::Records(RecordsError::InvalidCredentials | RecordsError::Unauthorized(_)) => {
                StatusCode::UNAUTHORIZED
            }
            ApiFailure::Records(RecordsError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiFailure::Records(RecordsError::EmailTaken(_)) => StatusCode::CONFLICT,
            ApiFailure::Records(_) | ApiFailure::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("Request failed: {self}");
            INTERNAL_ERROR.to_string()
        } else {
            self.to_string()
        };
        (
            status,
            Json(ErrorBody {
                message: Some(message),
            }),
        )
            .into_response()
    }
}
