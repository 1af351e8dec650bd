use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};

use curio_core::ItemId;
use curio_inquiry::Inquiry;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new().route("/", post(submit_inquiry))
}

pub async fn submit_inquiry(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::InquiryRequest>,
) -> axum::response::Response {
    let item_id: Option<ItemId> = match body.item_id.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => match raw.parse() {
            Ok(id) => Some(id),
            Err(_) => {
                return errors::json_error(
                    StatusCode::BAD_REQUEST,
                    "invalid_id",
                    "itemId is not a valid item id",
                )
            }
        },
        None => None,
    };

    let inquiry = Inquiry {
        name: body.name.unwrap_or_default(),
        email: body.email.unwrap_or_default(),
        phone: body.phone,
        subject: body.subject,
        message: body.message.unwrap_or_default(),
        item_id,
        item_name: body.item_name,
    };

    match services.relay.relay(&inquiry).await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "success": true,
                "message": "inquiry submitted",
            })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
