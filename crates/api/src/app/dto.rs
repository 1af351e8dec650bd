use serde::Deserialize;

use curio_catalog::Item;

// -------------------------
// Request DTOs
// -------------------------

/// Inquiry submission body. Required fields stay `Option` here so a missing
/// field reaches domain validation (and the uniform error envelope) instead
/// of a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct InquiryRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
    #[serde(rename = "itemId")]
    pub item_id: Option<String>,
    #[serde(rename = "itemName")]
    pub item_name: Option<String>,
}

// -------------------------
// Response mapping
// -------------------------

pub fn item_to_json(item: &Item) -> serde_json::Value {
    serde_json::json!({
        "id": item.id.to_string(),
        "name": item.name,
        "category": item.category,
        "price": item.price,
        "features": item.features,
        "images": item.images,
        "createdAt": item.created_at.to_rfc3339(),
    })
}
