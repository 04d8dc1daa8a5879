use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use kokoro_core::journal::error::ServiceError;
use kokoro_model::error::ErrorResponse;
use std::error::Error;
use thiserror::Error;

#[derive(Error, Debug)]
pub(crate) enum JournalError {
    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl IntoResponse for JournalError {
    fn into_response(self) -> Response {
        let Self::Service(error) = self;
        let (status, message) = match &error {
            ServiceError::InvalidInput(message) | ServiceError::InvalidState(message) => {
                (StatusCode::BAD_REQUEST, (*message).to_owned())
            }
            ServiceError::NotFound => (StatusCode::NOT_FOUND, "Journal entry not found".to_owned()),
            ServiceError::Gateway(inner) => {
                tracing::error!(error = inner as &dyn Error, "affirmation generation failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to generate affirmations".to_owned())
            }
            ServiceError::Db(inner) => {
                tracing::error!(error = inner as &dyn Error, "database error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_owned())
            }
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}
