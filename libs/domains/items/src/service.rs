//! Item Service - Business logic layer

use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{ItemError, ItemOperation, ItemResult};
use crate::models::{CreateItem, Item, ItemPage, ListItemsQuery, UpdateItem};
use crate::repository::ItemRepository;

/// Item service providing the CRUD operations
///
/// Backend failures are tagged with the operation they happened in, so the
/// HTTP layer can answer with a fixed message per operation.
pub struct ItemService<R: ItemRepository> {
    repository: Arc<R>,
}

/// Ids that are not valid UUIDs cannot name an item.
fn parse_id(id: &str) -> ItemResult<Uuid> {
    Uuid::parse_str(id).map_err(|_| ItemError::NotFound)
}

impl<R: ItemRepository> ItemService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    #[instrument(skip(self, input))]
    pub async fn create_item(&self, input: CreateItem) -> ItemResult<Item> {
        self.repository
            .create(input)
            .await
            .map_err(|e| e.during(ItemOperation::Create))
    }

    /// One page of items, newest first, with totals over all matches
    #[instrument(skip(self))]
    pub async fn list_items(&self, query: ListItemsQuery) -> ItemResult<ItemPage> {
        let pagination = query
            .pagination()
            .map_err(|e| e.during(ItemOperation::List))?;

        let (items, total_items) = self
            .repository
            .list(query.filter(), pagination.offset(), pagination.limit)
            .await
            .map_err(|e| e.during(ItemOperation::List))?;

        Ok(ItemPage {
            items,
            total_items,
            total_pages: pagination.total_pages(total_items),
            current_page: pagination.page,
        })
    }

    #[instrument(skip(self))]
    pub async fn get_item(&self, id: &str) -> ItemResult<Item> {
        let id = parse_id(id)?;

        self.repository
            .find_by_id(id)
            .await
            .map_err(|e| e.during(ItemOperation::Get))?
            .ok_or(ItemError::NotFound)
    }

    /// Replace both fields of an existing item
    #[instrument(skip(self, input))]
    pub async fn update_item(&self, id: &str, input: UpdateItem) -> ItemResult<Item> {
        let id = parse_id(id)?;

        self.repository
            .update(id, input)
            .await
            .map_err(|e| e.during(ItemOperation::Update))?
            .ok_or(ItemError::NotFound)
    }

    #[instrument(skip(self))]
    pub async fn delete_item(&self, id: &str) -> ItemResult<()> {
        let id = parse_id(id)?;

        let deleted = self
            .repository
            .delete(id)
            .await
            .map_err(|e| e.during(ItemOperation::Delete))?;

        if deleted {
            Ok(())
        } else {
            Err(ItemError::NotFound)
        }
    }
}

impl<R: ItemRepository> Clone for ItemService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}
