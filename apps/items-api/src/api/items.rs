//! Items API routes

use axum::Router;
use domain_items::{ItemRepository, ItemService, PgItemRepository, handlers};

use crate::state::AppState;

/// Items router over PostgreSQL
pub fn router(state: &AppState) -> Router {
    with_repository(PgItemRepository::new(state.db.clone()))
}

/// Items router over any repository
pub fn with_repository<R: ItemRepository + 'static>(repository: R) -> Router {
    handlers::router(ItemService::new(repository))
}
