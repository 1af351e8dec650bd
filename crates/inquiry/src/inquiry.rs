use serde::{Deserialize, Serialize};

use curio_core::{DomainError, DomainResult, ItemId};

/// A user-submitted contact request, optionally referencing a catalog item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inquiry {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub message: String,
    #[serde(rename = "itemId", default, skip_serializing_if = "Option::is_none")]
    pub item_id: Option<ItemId>,
    #[serde(rename = "itemName", default, skip_serializing_if = "Option::is_none")]
    pub item_name: Option<String>,
}

impl Inquiry {
    /// Check the required fields: name, email (a parseable address), message.
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("name is required"));
        }
        if self.email.trim().is_empty() {
            return Err(DomainError::validation("email is required"));
        }
        if self.email.trim().parse::<lettre::Address>().is_err() {
            return Err(DomainError::validation("email is not a valid address"));
        }
        if self.message.trim().is_empty() {
            return Err(DomainError::validation("message is required"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_inquiry() -> Inquiry {
        Inquiry {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            phone: None,
            subject: None,
            message: "Is the lamp still available?".to_string(),
            item_id: None,
            item_name: None,
        }
    }

    #[test]
    fn valid_inquiry_passes() {
        assert!(valid_inquiry().validate().is_ok());
    }

    #[test]
    fn missing_email_is_rejected_regardless_of_other_fields() {
        let mut inquiry = valid_inquiry();
        inquiry.email = String::new();
        inquiry.phone = Some("555-0100".to_string());
        inquiry.subject = Some("Lamp".to_string());
        match inquiry.validate().unwrap_err() {
            DomainError::Validation(_) => {}
            other => panic!("expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn malformed_email_is_rejected() {
        let mut inquiry = valid_inquiry();
        inquiry.email = "not-an-address".to_string();
        assert!(inquiry.validate().is_err());
    }

    #[test]
    fn missing_name_or_message_is_rejected() {
        let mut inquiry = valid_inquiry();
        inquiry.name = "  ".to_string();
        assert!(inquiry.validate().is_err());

        let mut inquiry = valid_inquiry();
        inquiry.message = String::new();
        assert!(inquiry.validate().is_err());
    }

    #[test]
    fn item_fields_round_trip_in_camel_case() {
        let mut inquiry = valid_inquiry();
        inquiry.item_id = Some(ItemId::new());
        inquiry.item_name = Some("Lamp".to_string());

        let json = serde_json::to_value(&inquiry).unwrap();
        assert!(json.get("itemId").is_some());
        assert!(json.get("itemName").is_some());

        let back: Inquiry = serde_json::from_value(json).unwrap();
        assert_eq!(back, inquiry);
    }
}
