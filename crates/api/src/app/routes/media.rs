use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::{header, StatusCode},
    response::IntoResponse,
};

use crate::app::errors;
use crate::app::services::AppServices;

/// Serve a stored item image by file name.
pub async fn serve_image(
    Extension(services): Extension<Arc<AppServices>>,
    Path(name): Path<String>,
) -> axum::response::Response {
    match services.media.open(&name).await {
        Ok((bytes, content_type)) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, content_type)],
            bytes,
        )
            .into_response(),
        Err(curio_core::DomainError::NotFound) => {
            errors::json_error(StatusCode::NOT_FOUND, "not_found", "image not found")
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}
