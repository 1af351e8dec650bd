//! Catalog item persistence.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;

use curio_catalog::{Item, ItemDraft};
use curio_core::{DomainError, DomainResult, ItemId};

/// Storage abstraction for catalog items.
///
/// Items are create-only. `list` returns newest-first; ties on `created_at`
/// are broken by id descending so the order is total.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Assign a fresh id and creation timestamp, persist, and return the
    /// saved record.
    async fn insert(&self, draft: ItemDraft, images: Vec<String>) -> DomainResult<Item>;

    /// All items, ordered by `created_at` descending. Full scan; acceptable
    /// only at small scale.
    async fn list(&self) -> DomainResult<Vec<Item>>;

    async fn get(&self, id: ItemId) -> DomainResult<Item>;
}

#[async_trait]
impl<S> ItemStore for Arc<S>
where
    S: ItemStore + ?Sized,
{
    async fn insert(&self, draft: ItemDraft, images: Vec<String>) -> DomainResult<Item> {
        (**self).insert(draft, images).await
    }

    async fn list(&self) -> DomainResult<Vec<Item>> {
        (**self).list().await
    }

    async fn get(&self, id: ItemId) -> DomainResult<Item> {
        (**self).get(id).await
    }
}

/// In-memory item store for dev/test.
#[derive(Debug, Default)]
pub struct InMemoryItemStore {
    inner: RwLock<HashMap<ItemId, Item>>,
}

impl InMemoryItemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ItemStore for InMemoryItemStore {
    async fn insert(&self, draft: ItemDraft, images: Vec<String>) -> DomainResult<Item> {
        let item = draft.into_item(ItemId::new(), images, Utc::now())?;

        let mut map = self
            .inner
            .write()
            .map_err(|_| DomainError::persistence("item store lock poisoned"))?;
        map.insert(item.id, item.clone());
        Ok(item)
    }

    async fn list(&self) -> DomainResult<Vec<Item>> {
        let map = self
            .inner
            .read()
            .map_err(|_| DomainError::persistence("item store lock poisoned"))?;

        let mut items: Vec<Item> = map.values().cloned().collect();
        items.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(items)
    }

    async fn get(&self, id: ItemId) -> DomainResult<Item> {
        let map = self
            .inner
            .read()
            .map_err(|_| DomainError::persistence("item store lock poisoned"))?;
        map.get(&id).cloned().ok_or(DomainError::NotFound)
    }
}
