//! Environment-driven configuration.

use std::path::PathBuf;

use curio_infra::SmtpConfig;
use curio_inquiry::RelayMode;

/// Everything the server reads from the environment, resolved once at
/// startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    /// Postgres when true (`DATABASE_URL` required), in-memory otherwise.
    pub use_persistent_store: bool,
    pub database_url: Option<String>,
    /// `None` = allow any origin.
    pub cors_allowed_origins: Option<Vec<String>>,
    pub media_dir: PathBuf,
    /// Prefixed onto stored image paths in item records. No trailing slash.
    pub public_base_url: String,
    pub smtp: Option<SmtpConfig>,
    pub smtp_from: String,
    pub inquiry_email: String,
    pub relay_mode: RelayMode,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let port = env_parsed("PORT").unwrap_or(5000);
        let public_base_url = env_string("PUBLIC_BASE_URL")
            .map(|s| s.trim_end_matches('/').to_string())
            .unwrap_or_else(|| format!("http://localhost:{port}"));

        let smtp = env_string("SMTP_HOST").map(|host| SmtpConfig {
            host,
            port: env_parsed("SMTP_PORT").unwrap_or(587),
            secure: env_bool("SMTP_SECURE"),
            username: env_string("SMTP_USER"),
            password: env_string("SMTP_PASSWORD"),
        });

        let inquiry_email = env_string("INQUIRY_EMAIL").unwrap_or_else(|| {
            tracing::warn!("INQUIRY_EMAIL not set; using dev default");
            "inquiries@localhost".to_string()
        });

        Self {
            port,
            use_persistent_store: env_bool("USE_PERSISTENT_STORES"),
            database_url: env_string("DATABASE_URL"),
            cors_allowed_origins: parse_origins(env_string("CORS_ALLOWED_ORIGINS")),
            media_dir: env_string("MEDIA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./media")),
            public_base_url,
            smtp,
            smtp_from: env_string("SMTP_FROM")
                .unwrap_or_else(|| "Inquiry Form <noreply@localhost>".to_string()),
            inquiry_email,
            relay_mode: RelayMode::parse(&env_string("RELAY_MODE").unwrap_or_default()),
        }
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_bool(key: &str) -> bool {
    env_string(key)
        .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
        .unwrap_or(false)
}

fn env_parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    env_string(key).and_then(|v| v.parse().ok())
}

/// `*` or unset means allow-any.
fn parse_origins(raw: Option<String>) -> Option<Vec<String>> {
    let raw = raw?;
    if raw == "*" {
        return None;
    }
    let origins: Vec<String> = raw
        .split(',')
        .map(|s| s.trim().trim_end_matches('/').to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if origins.is_empty() { None } else { Some(origins) }
}
