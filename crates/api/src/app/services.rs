use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;

use curio_infra::{InMemoryItemStore, ItemStore, LocalMediaStore, MediaStore, PostgresItemStore, SmtpMailer};
use curio_inquiry::{InquiryRelay, LogMailer, Mailer, RelayMode};

use crate::config::AppConfig;

/// Shared per-request services, injected via `Extension`.
pub struct AppServices {
    pub items: Arc<dyn ItemStore>,
    pub media: Arc<dyn MediaStore>,
    pub relay: InquiryRelay,
    /// Prefixed onto stored image paths when building item records.
    pub public_base_url: String,
}

pub async fn build_services(config: &AppConfig) -> AppServices {
    let items = build_item_store(config).await;
    let media: Arc<dyn MediaStore> = Arc::new(LocalMediaStore::new(config.media_dir.clone()));
    let relay = InquiryRelay::new(
        build_mailer(config),
        config.smtp_from.clone(),
        config.inquiry_email.clone(),
        config.relay_mode,
    );

    AppServices {
        items,
        media,
        relay,
        public_base_url: config.public_base_url.clone(),
    }
}

async fn build_item_store(config: &AppConfig) -> Arc<dyn ItemStore> {
    if !config.use_persistent_store {
        return Arc::new(InMemoryItemStore::new());
    }

    let database_url = config
        .database_url
        .as_deref()
        .expect("DATABASE_URL must be set when USE_PERSISTENT_STORES=true");

    let pool = PgPoolOptions::new()
        .connect(database_url)
        .await
        .expect("failed to connect to Postgres");

    let store = PostgresItemStore::new(pool);
    store.migrate().await.expect("failed to run items migration");
    tracing::info!("using Postgres item store");
    Arc::new(store)
}

/// Without an SMTP transport the relay gets a [`LogMailer`], whose sends
/// fail. `RelayMode` then decides: development swallows the failure,
/// production answers inquiries with a relay error.
fn build_mailer(config: &AppConfig) -> Arc<dyn Mailer> {
    match &config.smtp {
        Some(smtp) => match SmtpMailer::new(smtp) {
            Ok(mailer) => Arc::new(mailer),
            Err(e) => {
                tracing::warn!(error = %e, "SMTP transport setup failed; inquiry dispatch will fail");
                Arc::new(LogMailer)
            }
        },
        None if config.relay_mode == RelayMode::Production => {
            tracing::warn!("RELAY_MODE=production with no SMTP host; inquiry dispatch will fail");
            Arc::new(LogMailer)
        }
        None => {
            tracing::info!("no SMTP host configured; inquiries will be logged only");
            Arc::new(LogMailer)
        }
    }
}
