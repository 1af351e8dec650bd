use axum::{routing::get, Router};

pub mod inquiries;
pub mod items;
pub mod media;
pub mod system;

/// Router for the public API surface.
pub fn router() -> Router {
    Router::new()
        .nest("/api/items", items::router())
        .nest("/api/inquiries", inquiries::router())
        .route("/media/:name", get(media::serve_image))
}
