use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use curio_core::DomainError;

/// Map a domain error to the uniform `{ success: false, message, error }`
/// envelope.
pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "item not found"),
        DomainError::Persistence(msg) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "persistence_error", msg)
        }
        DomainError::Relay(msg) => json_error(StatusCode::INTERNAL_SERVER_ERROR, "relay_error", msg),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "success": false,
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
