use std::sync::Arc;

use chrono::{DateTime, Utc};
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde_json::json;

use curio_api::app::services::AppServices;
use curio_api::config::AppConfig;
use curio_infra::{ItemStore, LocalMediaStore, MediaStore};
use curio_inquiry::{InquiryRelay, LogMailer, RelayMode};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
    // Held so the media dir outlives the server.
    media_dir: tempfile::TempDir,
}

impl TestServer {
    async fn spawn() -> Self {
        Self::spawn_with(RelayMode::Development).await
    }

    async fn spawn_with(relay_mode: RelayMode) -> Self {
        let media_dir = tempfile::tempdir().expect("failed to create media dir");

        // Same wiring as prod, but in-memory store, no SMTP, and an
        // ephemeral port. Empty public base URL keeps image URLs relative
        // so tests can fetch them off `base_url`.
        let config = AppConfig {
            port: 0,
            use_persistent_store: false,
            database_url: None,
            cors_allowed_origins: None,
            media_dir: media_dir.path().to_path_buf(),
            public_base_url: String::new(),
            smtp: None,
            smtp_from: "Inquiry Form <noreply@example.com>".to_string(),
            inquiry_email: "inquiries@example.com".to_string(),
            relay_mode,
        };

        let app = curio_api::app::build_app(config).await;
        Self::serve(app, media_dir).await
    }

    /// Wires the router by hand around a given item store. Used to drive
    /// persistence failures the stock in-memory store cannot produce.
    async fn spawn_with_item_store(items: Arc<dyn ItemStore>) -> Self {
        let media_dir = tempfile::tempdir().expect("failed to create media dir");
        let media: Arc<dyn MediaStore> =
            Arc::new(LocalMediaStore::new(media_dir.path().to_path_buf()));
        let relay = InquiryRelay::new(
            Arc::new(LogMailer),
            "Inquiry Form <noreply@example.com>",
            "inquiries@example.com",
            RelayMode::Development,
        );
        let services = Arc::new(AppServices {
            items,
            media,
            relay,
            public_base_url: String::new(),
        });

        let app = curio_api::app::routes::router().layer(axum::Extension(services));
        Self::serve(app, media_dir).await
    }

    async fn serve(app: axum::Router, media_dir: tempfile::TempDir) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            handle,
            media_dir,
        }
    }

    fn stored_media_count(&self) -> usize {
        std::fs::read_dir(self.media_dir.path()).unwrap().count()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn item_form(name: &str, category: &str, price: &str) -> Form {
    Form::new()
        .text("name", name.to_string())
        .text("category", category.to_string())
        .text("price", price.to_string())
        .text("features", r#"["LED"]"#)
        .part(
            "images",
            Part::bytes(b"fake-png-bytes".to_vec())
                .file_name("photo.png")
                .mime_str("image/png")
                .unwrap(),
        )
}

async fn create_item(
    client: &reqwest::Client,
    base_url: &str,
    form: Form,
) -> (StatusCode, serde_json::Value) {
    let res = client
        .post(format!("{}/api/items", base_url))
        .multipart(form)
        .send()
        .await
        .unwrap();
    let status = res.status();
    (status, res.json().await.unwrap())
}

#[tokio::test]
async fn health_is_ok() {
    let srv = TestServer::spawn().await;
    let res = reqwest::get(format!("{}/health", srv.base_url)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn create_item_round_trips_through_list_get_and_media() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let (status, body) =
        create_item(&client, &srv.base_url, item_form("Lamp", "Home & Kitchen", "25.50")).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], json!(true));

    let item = &body["item"];
    assert_eq!(item["name"], json!("Lamp"));
    assert_eq!(item["category"], json!("Home & Kitchen"));
    assert_eq!(item["price"], json!(25.5));
    assert_eq!(item["features"], json!(["LED"]));
    assert_eq!(item["images"].as_array().unwrap().len(), 1);

    let id = item["id"].as_str().unwrap();

    // list contains it
    let res = client
        .get(format!("{}/api/items", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let listed: serde_json::Value = res.json().await.unwrap();
    assert_eq!(listed["success"], json!(true));
    assert_eq!(listed["count"], json!(1));
    assert_eq!(listed["items"][0]["id"].as_str().unwrap(), id);

    // fetch by id
    let res = client
        .get(format!("{}/api/items/{}", srv.base_url, id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let fetched: serde_json::Value = res.json().await.unwrap();
    assert_eq!(fetched["item"]["name"], json!("Lamp"));

    // the stored image is served back
    let image_url = item["images"][0].as_str().unwrap();
    let res = client
        .get(format!("{}{}", srv.base_url, image_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers()[reqwest::header::CONTENT_TYPE].to_str().unwrap(),
        "image/png"
    );
    assert_eq!(res.bytes().await.unwrap().as_ref(), b"fake-png-bytes");
}

#[tokio::test]
async fn create_item_requires_name_category_and_price() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let form = Form::new()
        .text("name", "Lamp")
        .text("category", "Home & Kitchen")
        .part("images", Part::bytes(b"x".to_vec()).file_name("a.png"));
    let (status, body) = create_item(&client, &srv.base_url, form).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!("validation_error"));
}

#[tokio::test]
async fn create_item_rejects_non_numeric_price() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let (status, body) =
        create_item(&client, &srv.base_url, item_form("Lamp", "Home", "cheap")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("validation_error"));
}

#[tokio::test]
async fn create_item_requires_an_image() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let form = Form::new()
        .text("name", "Lamp")
        .text("category", "Home")
        .text("price", "10");
    let (status, body) = create_item(&client, &srv.base_url, form).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn list_is_newest_first() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let mut ids = Vec::new();
    for name in ["first", "second", "third"] {
        let (status, body) =
            create_item(&client, &srv.base_url, item_form(name, "Home", "1")).await;
        assert_eq!(status, StatusCode::CREATED);
        ids.push(body["item"]["id"].as_str().unwrap().to_string());
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let res = client
        .get(format!("{}/api/items", srv.base_url))
        .send()
        .await
        .unwrap();
    let listed: serde_json::Value = res.json().await.unwrap();
    let items = listed["items"].as_array().unwrap();
    assert_eq!(items.len(), 3);

    let listed_ids: Vec<&str> = items.iter().map(|i| i["id"].as_str().unwrap()).collect();
    ids.reverse();
    assert_eq!(listed_ids, ids);

    let stamps: Vec<DateTime<Utc>> = items
        .iter()
        .map(|i| i["createdAt"].as_str().unwrap().parse().unwrap())
        .collect();
    for pair in stamps.windows(2) {
        assert!(pair[0] >= pair[1]);
    }
}

#[tokio::test]
async fn unknown_and_malformed_item_ids_are_rejected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!(
            "{}/api/items/00000000-0000-7000-8000-000000000000",
            srv.base_url
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["success"], json!(false));

    let res = client
        .get(format!("{}/api/items/not-a-uuid", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn inquiry_requires_an_email() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/inquiries", srv.base_url))
        .json(&json!({
            "name": "Ada",
            "message": "Still available?",
            "phone": "555-0100",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!("validation_error"));
}

#[tokio::test]
async fn inquiry_is_accepted_in_development_mode_without_a_mail_server() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/inquiries", srv.base_url))
        .json(&json!({
            "name": "Ada",
            "email": "ada@example.com",
            "message": "Still available?",
            "itemName": "Lamp",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["success"], json!(true));
}

#[tokio::test]
async fn inquiry_without_a_mail_server_is_a_relay_error_in_production_mode() {
    let srv = TestServer::spawn_with(RelayMode::Production).await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/inquiries", srv.base_url))
        .json(&json!({
            "name": "Ada",
            "email": "ada@example.com",
            "message": "Still available?",
            "itemName": "Lamp",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!("relay_error"));
}

/// Always fails `insert`, standing in for a database outage.
struct UnavailableItemStore;

#[async_trait::async_trait]
impl ItemStore for UnavailableItemStore {
    async fn insert(
        &self,
        _draft: curio_catalog::ItemDraft,
        _images: Vec<String>,
    ) -> curio_core::DomainResult<curio_catalog::Item> {
        Err(curio_core::DomainError::persistence("store unavailable"))
    }

    async fn list(&self) -> curio_core::DomainResult<Vec<curio_catalog::Item>> {
        Ok(Vec::new())
    }

    async fn get(&self, _id: curio_core::ItemId) -> curio_core::DomainResult<curio_catalog::Item> {
        Err(curio_core::DomainError::NotFound)
    }
}

#[tokio::test]
async fn failed_insert_removes_the_uploaded_images() {
    let srv = TestServer::spawn_with_item_store(Arc::new(UnavailableItemStore)).await;
    let client = reqwest::Client::new();

    let (status, body) =
        create_item(&client, &srv.base_url, item_form("Lamp", "Home", "10")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], json!(false));
    assert_eq!(srv.stored_media_count(), 0);
}

#[tokio::test]
async fn unknown_media_name_is_not_found() {
    let srv = TestServer::spawn().await;
    let res = reqwest::get(format!("{}/media/missing.png", srv.base_url))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cors_preflight_is_answered() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .request(
            reqwest::Method::OPTIONS,
            format!("{}/api/items", srv.base_url),
        )
        .header(reqwest::header::ORIGIN, "http://localhost:3000")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert_eq!(
        res.headers()[reqwest::header::ACCESS_CONTROL_ALLOW_ORIGIN]
            .to_str()
            .unwrap(),
        "*"
    );
}
