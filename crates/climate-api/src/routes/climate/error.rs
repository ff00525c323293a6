use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::error;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::db::Error;

/// Body returned with every non-2xx API response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Error::InvalidDate => (StatusCode::NOT_FOUND, "Invalid date."),
            Error::InvalidRange => (StatusCode::NOT_FOUND, "Invalid range."),
            other => {
                error!("error serving climate data: {}", other);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error.")
            }
        };

        (status, Json(ErrorBody::new(message))).into_response()
    }
}
