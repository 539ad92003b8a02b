use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::ItemResult;
use crate::models::{CreateItem, Item, ItemFilter, UpdateItem, required_fields};

/// Repository trait for Item persistence
///
/// Implementations: [`crate::PgItemRepository`] (PostgreSQL) and
/// [`InMemoryItemRepository`] (tests, local runs).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Insert a new item. Both fields must be present.
    async fn create(&self, input: CreateItem) -> ItemResult<Item>;

    /// One page of matching items, newest first, plus the total match count.
    async fn list(&self, filter: ItemFilter, offset: u64, limit: u64)
    -> ItemResult<(Vec<Item>, u64)>;

    async fn find_by_id(&self, id: Uuid) -> ItemResult<Option<Item>>;

    /// Replace name and description. `None` when no item has this id.
    async fn update(&self, id: Uuid, input: UpdateItem) -> ItemResult<Option<Item>>;

    /// Hard delete. `false` when no item has this id.
    async fn delete(&self, id: Uuid) -> ItemResult<bool>;
}

/// In-memory implementation of ItemRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryItemRepository {
    items: Arc<RwLock<HashMap<Uuid, Item>>>,
}

impl InMemoryItemRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ItemRepository for InMemoryItemRepository {
    async fn create(&self, input: CreateItem) -> ItemResult<Item> {
        let (name, description) = required_fields(input.name, input.description)?;
        let item = Item::new(name, description);

        self.items.write().await.insert(item.id, item.clone());

        tracing::info!(item_id = %item.id, "Created item");
        Ok(item)
    }

    async fn list(
        &self,
        filter: ItemFilter,
        offset: u64,
        limit: u64,
    ) -> ItemResult<(Vec<Item>, u64)> {
        let items = self.items.read().await;

        let mut matching: Vec<&Item> = items.values().filter(|i| filter.matches(i)).collect();
        // Newest first; id breaks timestamp ties
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let total = matching.len() as u64;
        let page = matching
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .cloned()
            .collect();

        Ok((page, total))
    }

    async fn find_by_id(&self, id: Uuid) -> ItemResult<Option<Item>> {
        Ok(self.items.read().await.get(&id).cloned())
    }

    async fn update(&self, id: Uuid, input: UpdateItem) -> ItemResult<Option<Item>> {
        let (name, description) = required_fields(input.name, input.description)?;

        let mut items = self.items.write().await;
        let Some(item) = items.get_mut(&id) else {
            return Ok(None);
        };

        item.name = name;
        item.description = description;

        tracing::info!(item_id = %id, "Updated item");
        Ok(Some(item.clone()))
    }

    async fn delete(&self, id: Uuid) -> ItemResult<bool> {
        let removed = self.items.write().await.remove(&id).is_some();
        if removed {
            tracing::info!(item_id = %id, "Deleted item");
        }
        Ok(removed)
    }
}
