use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use notekeeper_core::error::{ClientCode, NotesError};

/// HTTP wrapper for `NotesError`.
#[derive(Debug)]
pub struct ApiError(pub NotesError);

impl From<NotesError> for ApiError {
    fn from(e: NotesError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.0.client_code();
        let (status, msg) = match code {
            ClientCode::NotFound => (StatusCode::NOT_FOUND, self.0.to_string()),
            ClientCode::BadRequest => {
                tracing::debug!(code = code.as_str(), error = %self.0, "request rejected");
                (StatusCode::BAD_REQUEST, self.0.to_string())
            }
            ClientCode::UnsupportedVersion | ClientCode::Internal => {
                tracing::error!(code = code.as_str(), error = %self.0, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };
        (status, Json(json!({ "error": msg }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_follows_client_code() {
        let cases = [
            (NotesError::NotFound, StatusCode::NOT_FOUND),
            (NotesError::BadRequest("bad".into()), StatusCode::BAD_REQUEST),
            (NotesError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (NotesError::UnsupportedVersion, StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).into_response().status(), status);
        }
    }
}
