//! Postgres-backed item store.
//!
//! The original deployment used a document store; here the two list-valued
//! fields (`features`, `images`) are kept as JSONB columns in a single
//! `items` table, so a record still round-trips as one document.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use curio_catalog::{Item, ItemDraft};
use curio_core::{DomainError, DomainResult, ItemId};

use crate::item_store::ItemStore;

/// Persistent item store over a sqlx connection pool.
pub struct PostgresItemStore {
    pool: PgPool,
}

impl PostgresItemStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the `items` table if it does not exist yet.
    pub async fn migrate(&self) -> DomainResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS items (
                id UUID PRIMARY KEY,
                name TEXT NOT NULL,
                category TEXT NOT NULL,
                price DOUBLE PRECISION NOT NULL,
                features JSONB NOT NULL,
                images JSONB NOT NULL,
                created_at TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::persistence(e.to_string()))?;
        Ok(())
    }
}

fn row_to_item(row: &sqlx::postgres::PgRow) -> DomainResult<Item> {
    let id: Uuid = row
        .try_get("id")
        .map_err(|e| DomainError::persistence(e.to_string()))?;
    let name: String = row
        .try_get("name")
        .map_err(|e| DomainError::persistence(e.to_string()))?;
    let category: String = row
        .try_get("category")
        .map_err(|e| DomainError::persistence(e.to_string()))?;
    let price: f64 = row
        .try_get("price")
        .map_err(|e| DomainError::persistence(e.to_string()))?;
    let features: Json<Vec<String>> = row
        .try_get("features")
        .map_err(|e| DomainError::persistence(e.to_string()))?;
    let images: Json<Vec<String>> = row
        .try_get("images")
        .map_err(|e| DomainError::persistence(e.to_string()))?;
    let created_at: DateTime<Utc> = row
        .try_get("created_at")
        .map_err(|e| DomainError::persistence(e.to_string()))?;

    Ok(Item {
        id: ItemId::from_uuid(id),
        name,
        category,
        price,
        features: features.0,
        images: images.0,
        created_at,
    })
}

#[async_trait]
impl ItemStore for PostgresItemStore {
    async fn insert(&self, draft: ItemDraft, images: Vec<String>) -> DomainResult<Item> {
        let item = draft.into_item(ItemId::new(), images, Utc::now())?;

        sqlx::query(
            r#"
            INSERT INTO items (id, name, category, price, features, images, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(*item.id.as_uuid())
        .bind(&item.name)
        .bind(&item.category)
        .bind(item.price)
        .bind(Json(&item.features))
        .bind(Json(&item.images))
        .bind(item.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::persistence(e.to_string()))?;

        Ok(item)
    }

    async fn list(&self) -> DomainResult<Vec<Item>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, category, price, features, images, created_at
            FROM items
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::persistence(e.to_string()))?;

        rows.iter().map(row_to_item).collect()
    }

    async fn get(&self, id: ItemId) -> DomainResult<Item> {
        let row = sqlx::query(
            r#"
            SELECT id, name, category, price, features, images, created_at
            FROM items
            WHERE id = $1
            "#,
        )
        .bind(*id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::persistence(e.to_string()))?;

        match row {
            Some(row) => row_to_item(&row),
            None => Err(DomainError::NotFound),
        }
    }
}
