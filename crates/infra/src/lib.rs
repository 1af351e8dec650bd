//! `curio-infra` — persistence, media storage, and the SMTP transport.

pub mod item_store;
pub mod media;
pub mod postgres;
pub mod smtp;

pub use item_store::{InMemoryItemStore, ItemStore};
pub use media::{LocalMediaStore, MediaStore};
pub use postgres::PostgresItemStore;
pub use smtp::{SmtpConfig, SmtpMailer};
