//! `curio-catalog` — the catalog item domain.

pub mod item;

pub use item::{Item, ItemDraft, MAX_FEATURES, MAX_IMAGES};
