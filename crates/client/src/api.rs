//! Typed bindings for the catalog HTTP API.

use serde::Deserialize;
use thiserror::Error;

use curio_catalog::Item;
use curio_core::ItemId;
use curio_inquiry::Inquiry;

/// Client-side failure. Terminal; there is no retry logic, callers
/// re-invoke the call to retry.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with `success: false`.
    #[error("{0}")]
    Api(String),
}

#[derive(Debug, Deserialize)]
struct ListEnvelope {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct ItemEnvelope {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    item: Option<Item>,
}

#[derive(Debug, Deserialize)]
struct AckEnvelope {
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

fn api_error(message: Option<String>) -> ClientError {
    ClientError::Api(message.unwrap_or_else(|| "request rejected".to_string()))
}

/// One image to upload with a new item.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Fields of a new item submission, mirroring the multipart form.
#[derive(Debug, Clone)]
pub struct NewItemForm {
    pub name: String,
    pub category: String,
    pub price: f64,
    pub features: Vec<String>,
    pub images: Vec<ImageUpload>,
}

/// HTTP client for the catalog API.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub async fn list_items(&self) -> Result<Vec<Item>, ClientError> {
        let envelope: ListEnvelope = self
            .http
            .get(format!("{}/api/items", self.base_url))
            .send()
            .await?
            .json()
            .await?;
        if !envelope.success {
            return Err(api_error(envelope.message));
        }
        Ok(envelope.items)
    }

    pub async fn get_item(&self, id: ItemId) -> Result<Item, ClientError> {
        let envelope: ItemEnvelope = self
            .http
            .get(format!("{}/api/items/{}", self.base_url, id))
            .send()
            .await?
            .json()
            .await?;
        match envelope.item {
            Some(item) if envelope.success => Ok(item),
            _ => Err(api_error(envelope.message)),
        }
    }

    /// Submit a new item as a multipart form: `features` JSON-encoded, one
    /// `images` part per upload.
    pub async fn create_item(&self, form: NewItemForm) -> Result<Item, ClientError> {
        let features =
            serde_json::to_string(&form.features).unwrap_or_else(|_| "[]".to_string());

        let mut multipart = reqwest::multipart::Form::new()
            .text("name", form.name)
            .text("category", form.category)
            .text("price", form.price.to_string())
            .text("features", features);
        for image in form.images {
            multipart = multipart.part(
                "images",
                reqwest::multipart::Part::bytes(image.bytes).file_name(image.filename),
            );
        }

        let envelope: ItemEnvelope = self
            .http
            .post(format!("{}/api/items", self.base_url))
            .multipart(multipart)
            .send()
            .await?
            .json()
            .await?;
        match envelope.item {
            Some(item) if envelope.success => Ok(item),
            _ => Err(api_error(envelope.message)),
        }
    }

    pub async fn submit_inquiry(&self, inquiry: &Inquiry) -> Result<(), ClientError> {
        let envelope: AckEnvelope = self
            .http
            .post(format!("{}/api/inquiries", self.base_url))
            .json(inquiry)
            .send()
            .await?
            .json()
            .await?;
        if !envelope.success {
            return Err(api_error(envelope.message));
        }
        Ok(())
    }
}
