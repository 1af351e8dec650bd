use std::sync::Arc;

use axum::{
    extract::{Extension, Multipart, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use curio_catalog::ItemDraft;
use curio_core::ItemId;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_items).post(create_item))
        .route("/:id", get(get_item))
}

pub async fn list_items(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let items = match services.items.list().await {
        Ok(items) => items,
        Err(e) => return errors::domain_error_to_response(e),
    };

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "success": true,
            "count": items.len(),
            "items": items.iter().map(dto::item_to_json).collect::<Vec<_>>(),
        })),
    )
        .into_response()
}

pub async fn get_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: ItemId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid item id"),
    };

    match services.items.get(id).await {
        Ok(item) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "success": true,
                "item": dto::item_to_json(&item),
            })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// Collected multipart fields for an item submission.
#[derive(Default)]
struct CreateItemForm {
    name: Option<String>,
    category: Option<String>,
    price: Option<String>,
    /// JSON-encoded array of strings, as the submission form sends it.
    features: Option<String>,
    /// `(filename hint, bytes)` per uploaded image, in order.
    images: Vec<(String, Vec<u8>)>,
}

async fn read_form(multipart: &mut Multipart) -> Result<CreateItemForm, axum::response::Response> {
    let mut form = CreateItemForm::default();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return Err(errors::json_error(
                    StatusCode::BAD_REQUEST,
                    "invalid_multipart",
                    e.to_string(),
                ))
            }
        };

        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "name" => form.name = Some(read_text(field).await?),
            "category" => form.category = Some(read_text(field).await?),
            "price" => form.price = Some(read_text(field).await?),
            "features" => form.features = Some(read_text(field).await?),
            "images" => {
                let filename = field.file_name().unwrap_or("upload").to_string();
                let bytes = match field.bytes().await {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        return Err(errors::json_error(
                            StatusCode::BAD_REQUEST,
                            "invalid_multipart",
                            e.to_string(),
                        ))
                    }
                };
                form.images.push((filename, bytes.to_vec()));
            }
            // Unknown fields are ignored, like any tolerant form endpoint.
            _ => {}
        }
    }

    Ok(form)
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, axum::response::Response> {
    field.text().await.map_err(|e| {
        errors::json_error(StatusCode::BAD_REQUEST, "invalid_multipart", e.to_string())
    })
}

pub async fn create_item(
    Extension(services): Extension<Arc<AppServices>>,
    mut multipart: Multipart,
) -> axum::response::Response {
    let form = match read_form(&mut multipart).await {
        Ok(form) => form,
        Err(res) => return res,
    };

    let (name, category, price_raw) = match (form.name, form.category, form.price) {
        (Some(n), Some(c), Some(p)) => (n, c, p),
        _ => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "validation_error",
                "name, category and price are required",
            )
        }
    };

    let price: f64 = match price_raw.trim().parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "validation_error",
                "price must be a number",
            )
        }
    };

    let features: Vec<String> = match form.features.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => match serde_json::from_str(raw) {
            Ok(features) => features,
            Err(_) => {
                return errors::json_error(
                    StatusCode::BAD_REQUEST,
                    "validation_error",
                    "features must be a JSON array of strings",
                )
            }
        },
        None => Vec::new(),
    };

    let draft = match ItemDraft::new(name, category, price, features) {
        Ok(draft) => draft,
        Err(e) => return errors::domain_error_to_response(e),
    };

    // Checked here too so no files are written for an invalid submission.
    if form.images.is_empty() {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "at least one image is required",
        );
    }
    if form.images.len() > curio_catalog::MAX_IMAGES {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            format!("at most {} images are allowed", curio_catalog::MAX_IMAGES),
        );
    }

    let mut image_urls = Vec::with_capacity(form.images.len());
    let mut saved_names = Vec::with_capacity(form.images.len());
    for (filename, bytes) in &form.images {
        match services.media.save(filename, bytes).await {
            Ok(path) => {
                if let Some(name) = path.strip_prefix("/media/") {
                    saved_names.push(name.to_string());
                }
                image_urls.push(format!("{}{}", services.public_base_url, path));
            }
            Err(e) => {
                remove_saved_images(&services, &saved_names).await;
                return errors::domain_error_to_response(e);
            }
        }
    }

    match services.items.insert(draft, image_urls).await {
        Ok(item) => (
            StatusCode::CREATED,
            Json(serde_json::json!({
                "success": true,
                "item": dto::item_to_json(&item),
            })),
        )
            .into_response(),
        Err(e) => {
            // The record was not persisted; do not leave its uploads behind.
            remove_saved_images(&services, &saved_names).await;
            errors::domain_error_to_response(e)
        }
    }
}

async fn remove_saved_images(services: &AppServices, names: &[String]) {
    for name in names {
        if let Err(e) = services.media.remove(name).await {
            tracing::warn!(name = %name, error = %e, "failed to remove orphaned image");
        }
    }
}
