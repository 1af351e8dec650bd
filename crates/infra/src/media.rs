//! Durable storage for uploaded item images.

use std::path::PathBuf;

use async_trait::async_trait;
use uuid::Uuid;

use curio_core::{DomainError, DomainResult};

/// Storage abstraction for uploaded images.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Persist an uploaded image and return its public URL path
    /// (e.g. `/media/<file>`).
    async fn save(&self, filename_hint: &str, bytes: &[u8]) -> DomainResult<String>;

    /// Read a stored image for serving, with its content type.
    async fn open(&self, name: &str) -> DomainResult<(Vec<u8>, &'static str)>;

    /// Remove a stored image. Removing a name that does not exist is not
    /// an error; callers use this to undo partial uploads.
    async fn remove(&self, name: &str) -> DomainResult<()>;
}

/// Filesystem-backed media store. Files are written as `<uuid>.<ext>` so
/// client-supplied names never reach the filesystem.
pub struct LocalMediaStore {
    root: PathBuf,
}

impl LocalMediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

/// Extension from the uploaded filename, reduced to lowercase alphanumerics.
fn sanitized_extension(filename_hint: &str) -> String {
    let ext = filename_hint
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .unwrap_or("");
    let ext: String = ext
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(8)
        .collect::<String>()
        .to_lowercase();
    if ext.is_empty() { "bin".to_string() } else { ext }
}

fn content_type_for(name: &str) -> &'static str {
    match name.rsplit_once('.').map(|(_, ext)| ext) {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    async fn save(&self, filename_hint: &str, bytes: &[u8]) -> DomainResult<String> {
        if bytes.is_empty() {
            return Err(DomainError::validation("uploaded image is empty"));
        }

        let file = format!("{}.{}", Uuid::now_v7(), sanitized_extension(filename_hint));

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| DomainError::persistence(format!("media dir: {e}")))?;
        tokio::fs::write(self.root.join(&file), bytes)
            .await
            .map_err(|e| DomainError::persistence(format!("media write: {e}")))?;

        Ok(format!("/media/{file}"))
    }

    async fn open(&self, name: &str) -> DomainResult<(Vec<u8>, &'static str)> {
        // Stored names are uuid-based; anything that could traverse out of
        // the media dir is treated as unknown.
        if name.contains('/') || name.contains('\\') || name.contains("..") {
            return Err(DomainError::NotFound);
        }

        let bytes = tokio::fs::read(self.root.join(name))
            .await
            .map_err(|_| DomainError::NotFound)?;
        Ok((bytes, content_type_for(name)))
    }

    async fn remove(&self, name: &str) -> DomainResult<()> {
        if name.contains('/') || name.contains('\\') || name.contains("..") {
            return Ok(());
        }

        match tokio::fs::remove_file(self.root.join(name)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DomainError::persistence(format!("media remove: {e}"))),
        }
    }
}
