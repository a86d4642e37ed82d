use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::domain::error::TodoError;

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageBody { pub message: String }

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self { Self { message: message.into() } }
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn not_found() -> Self { Self { status: StatusCode::NOT_FOUND, message: "Todo not found".into() } }

    /// Maps a service error; `action` names the failed operation for 500 bodies, e.g. "creating todo".
    pub fn from_service(err: TodoError, action: &str) -> Self {
        match err {
            TodoError::NotFound => Self::not_found(),
            TodoError::Validation(reason) => Self { status: StatusCode::BAD_REQUEST, message: reason },
            TodoError::Persistence(e) => {
                tracing::error!(error = %e, "error {action}");
                Self { status: StatusCode::INTERNAL_SERVER_ERROR, message: format!("Error {action}") }
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response { (self.status, axum::Json(MessageBody::new(self.message))).into_response() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_map_to_statuses() {
        assert_eq!(ApiError::from_service(TodoError::NotFound, "fetching todo").status, StatusCode::NOT_FOUND);
        assert_eq!(ApiError::from_service(TodoError::Validation("missing title".into()), "creating todo").status, StatusCode::BAD_REQUEST);
        let err = ApiError::from_service(TodoError::Persistence(sqlx::Error::PoolClosed), "deleting todo");
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "Error deleting todo");
    }
}
