use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use plateful_core::HttpError;

/// Render a domain error as a JSON error body
pub fn error_response(error: &dyn HttpError) -> Response {
    let body = serde_json::json!({
        "error": {
            "message": error.client_message(),
            "type": error.error_type(),
        }
    });

    (error.status_code(), Json(body)).into_response()
}

/// 401 for requests without a usable identity
pub fn unauthenticated_response() -> Response {
    let body = serde_json::json!({
        "error": {
            "message": "authentication required",
            "type": "authentication_error",
        }
    });

    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}
