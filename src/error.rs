use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failures surfaced by a `CatalogStore` implementation. Driver specific
/// errors are mapped into these kinds before they leave the store layer.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("duplicate key")]
    Duplicate,
    #[error("store timed out")]
    Timeout,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Domain error taxonomy. Every expected business failure is a typed
/// variant here; raw store errors never reach a handler response.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("one or more actors not found")]
    ActorsNotFound(Vec<i64>),
    #[error("username or email already exists")]
    DuplicateIdentity,
    #[error("invalid username or email or password")]
    InvalidCredentials,
    #[error("rating must be an integer between 1 and 5")]
    InvalidRating,
    #[error("{0}")]
    InvalidInput(&'static str),
    #[error("invalid token")]
    InvalidToken,
    #[error("token expired")]
    ExpiredToken,
    #[error("unauthorized: {0}")]
    Unauthorized(&'static str),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) | ApiError::ActorsNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::DuplicateIdentity
            | ApiError::InvalidCredentials
            | ApiError::InvalidRating
            | ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidToken | ApiError::ExpiredToken | ApiError::Unauthorized(_) => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::Store(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let message = if status.is_server_error() {
            "Internal Server Error".to_string()
        } else {
            self.to_string()
        };
        let mut body = json!({ "success": false, "error": message });
        if let ApiError::ActorsNotFound(ids) = &self {
            body["missingActorIds"] = json!(ids);
        }
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn business_errors_map_to_client_statuses() {
        assert_eq!(ApiError::NotFound("Movie").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::ActorsNotFound(vec![999]).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::DuplicateIdentity.status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::InvalidCredentials.status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::ExpiredToken.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn infrastructure_errors_map_to_500() {
        assert_eq!(
            ApiError::Store(StoreError::Timeout).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Internal(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
