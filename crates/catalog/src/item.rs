use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use curio_core::{DomainError, DomainResult, ItemId};

/// Upper bound on feature entries per item.
pub const MAX_FEATURES: usize = 10;

/// Upper bound on images per item. At least one image is always required.
pub const MAX_IMAGES: usize = 9;

/// A catalog item. Immutable once created; there is no update or delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub features: Vec<String>,
    /// Public URLs of the persisted images, in upload order.
    pub images: Vec<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Validated creation input for an item.
///
/// Image URLs are attached later, once the media store has persisted the
/// uploads; `into_item` enforces the image-count invariant at that point.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemDraft {
    name: String,
    category: String,
    price: f64,
    features: Vec<String>,
}

impl ItemDraft {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        price: f64,
        features: Vec<String>,
    ) -> DomainResult<Self> {
        let name = name.into().trim().to_string();
        let category = category.into().trim().to_string();

        if name.is_empty() {
            return Err(DomainError::validation("name is required"));
        }
        if category.is_empty() {
            return Err(DomainError::validation("category is required"));
        }
        if !price.is_finite() {
            return Err(DomainError::validation("price must be a number"));
        }
        if price < 0.0 {
            return Err(DomainError::validation("price cannot be negative"));
        }

        // Blank feature entries are dropped before the cap is applied, matching
        // what the submission form sends.
        let features: Vec<String> = features
            .into_iter()
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty())
            .collect();
        if features.len() > MAX_FEATURES {
            return Err(DomainError::validation(format!(
                "at most {} features are allowed",
                MAX_FEATURES
            )));
        }

        Ok(Self {
            name,
            category,
            price,
            features,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn features(&self) -> &[String] {
        &self.features
    }

    /// Finalize the draft into a persisted record.
    pub fn into_item(
        self,
        id: ItemId,
        images: Vec<String>,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Item> {
        if images.is_empty() {
            return Err(DomainError::validation("at least one image is required"));
        }
        if images.len() > MAX_IMAGES {
            return Err(DomainError::validation(format!(
                "at most {} images are allowed",
                MAX_IMAGES
            )));
        }

        Ok(Item {
            id,
            name: self.name,
            category: self.category,
            price: self.price,
            features: self.features,
            images,
            created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ItemDraft {
        ItemDraft::new("Lamp", "Home & Kitchen", 25.5, vec!["LED".to_string()]).unwrap()
    }

    #[test]
    fn draft_keeps_valid_fields() {
        let d = draft();
        assert_eq!(d.name(), "Lamp");
        assert_eq!(d.category(), "Home & Kitchen");
        assert_eq!(d.price(), 25.5);
        assert_eq!(d.features(), ["LED".to_string()]);
    }

    #[test]
    fn draft_rejects_blank_name() {
        let err = ItemDraft::new("   ", "Home & Kitchen", 1.0, vec![]).unwrap_err();
        match err {
            DomainError::Validation(_) => {}
            _ => panic!("expected Validation error for blank name"),
        }
    }

    #[test]
    fn draft_rejects_blank_category() {
        let err = ItemDraft::new("Lamp", "", 1.0, vec![]).unwrap_err();
        match err {
            DomainError::Validation(_) => {}
            _ => panic!("expected Validation error for blank category"),
        }
    }

    #[test]
    fn draft_rejects_negative_and_non_finite_price() {
        assert!(ItemDraft::new("Lamp", "Home", -0.01, vec![]).is_err());
        assert!(ItemDraft::new("Lamp", "Home", f64::NAN, vec![]).is_err());
        assert!(ItemDraft::new("Lamp", "Home", f64::INFINITY, vec![]).is_err());
        assert!(ItemDraft::new("Lamp", "Home", 0.0, vec![]).is_ok());
    }

    #[test]
    fn draft_drops_blank_features_before_cap() {
        let features = vec!["  ".to_string(), "LED".to_string(), String::new()];
        let d = ItemDraft::new("Lamp", "Home", 1.0, features).unwrap();
        assert_eq!(d.features(), ["LED".to_string()]);
    }

    #[test]
    fn draft_rejects_more_than_ten_features() {
        let features = (0..11).map(|i| format!("f{i}")).collect();
        let err = ItemDraft::new("Lamp", "Home", 1.0, features).unwrap_err();
        match err {
            DomainError::Validation(_) => {}
            _ => panic!("expected Validation error for too many features"),
        }
    }

    #[test]
    fn into_item_requires_at_least_one_image() {
        let err = draft()
            .into_item(ItemId::new(), vec![], Utc::now())
            .unwrap_err();
        match err {
            DomainError::Validation(_) => {}
            _ => panic!("expected Validation error for missing images"),
        }
    }

    #[test]
    fn into_item_caps_images_at_nine() {
        let images = (0..10).map(|i| format!("/media/{i}.png")).collect();
        assert!(draft().into_item(ItemId::new(), images, Utc::now()).is_err());

        let images = (0..9).map(|i| format!("/media/{i}.png")).collect();
        let item = draft().into_item(ItemId::new(), images, Utc::now()).unwrap();
        assert_eq!(item.images.len(), 9);
    }

    #[test]
    fn item_serializes_created_at_in_camel_case() {
        let item = draft()
            .into_item(ItemId::new(), vec!["/media/a.png".to_string()], Utc::now())
            .unwrap();
        let json = serde_json::to_value(&item).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("created_at").is_none());
    }
}
