use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    NotFound(String),
    Internal(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Internal(err) => {
                tracing::error!("Internal Server Error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<farebox_core::Error> for AppError {
    fn from(err: farebox_core::Error) -> Self {
        use farebox_core::Error as E;
        match err {
            E::RouteNotFound | E::TicketNotFound(_) => AppError::NotFound(err.to_string()),
            E::InvalidTransportType(_) | E::InvalidPageSize { .. } | E::Validation(_) => {
                AppError::BadRequest(err.to_string())
            }
            E::RouteCreationFailed | E::Store(_) => AppError::Internal(err.into()),
        }
    }
}
