use async_trait::async_trait;
use sea_orm::ActiveValue::{Set, Unchanged};
use sea_orm::sea_query::{Expr, LikeExpr, extension::postgres::PgExpr};
use sea_orm::{
    AccessMode, ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, IsolationLevel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    entity,
    error::ItemResult,
    models::{CreateItem, Item, ItemFilter, UpdateItem, required_fields},
    repository::ItemRepository,
};

/// PostgreSQL-backed item store
#[derive(Clone)]
pub struct PgItemRepository {
    db: DatabaseConnection,
}

impl PgItemRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Escape LIKE metacharacters so the needle matches literally.
fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Case-insensitive substring match on `column`. The pattern is bound as
/// a parameter.
fn contains_ci(column: entity::Column, needle: &str) -> Expr {
    Expr::col((entity::Entity, column))
        .ilike(LikeExpr::new(format!("%{}%", escape_like(needle))).escape('\\'))
}

fn filtered(filter: &ItemFilter) -> Select<entity::Entity> {
    let mut query = entity::Entity::find();

    if let Some(name) = &filter.name {
        query = query.filter(contains_ci(entity::Column::Name, name));
    }
    if let Some(description) = &filter.description {
        query = query.filter(contains_ci(entity::Column::Description, description));
    }

    query
}

#[async_trait]
impl ItemRepository for PgItemRepository {
    async fn create(&self, input: CreateItem) -> ItemResult<Item> {
        let (name, description) = required_fields(input.name, input.description)?;
        let active_model: entity::ActiveModel = Item::new(name, description).into();

        let model = active_model.insert(&self.db).await?;

        tracing::info!(item_id = %model.id, "Created item");
        Ok(model.into())
    }

    async fn list(
        &self,
        filter: ItemFilter,
        offset: u64,
        limit: u64,
    ) -> ItemResult<(Vec<Item>, u64)> {
        // Count and slice read the same snapshot
        let txn = self
            .db
            .begin_with_config(
                Some(IsolationLevel::RepeatableRead),
                Some(AccessMode::ReadOnly),
            )
            .await?;

        let total = filtered(&filter).count(&txn).await?;

        let models = filtered(&filter)
            .order_by_desc(entity::Column::CreatedAt)
            .order_by_desc(entity::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(&txn)
            .await?;

        txn.commit().await?;

        Ok((models.into_iter().map(Item::from).collect(), total))
    }

    async fn find_by_id(&self, id: Uuid) -> ItemResult<Option<Item>> {
        let model = entity::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Item::from))
    }

    async fn update(&self, id: Uuid, input: UpdateItem) -> ItemResult<Option<Item>> {
        let (name, description) = required_fields(input.name, input.description)?;

        let active_model = entity::ActiveModel {
            id: Unchanged(id),
            name: Set(name),
            description: Set(description),
            ..Default::default()
        };

        match active_model.update(&self.db).await {
            Ok(model) => {
                tracing::info!(item_id = %id, "Updated item");
                Ok(Some(model.into()))
            }
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, id: Uuid) -> ItemResult<bool> {
        let result = entity::Entity::delete_by_id(id).exec(&self.db).await?;

        let deleted = result.rows_affected > 0;
        if deleted {
            tracing::info!(item_id = %id, "Deleted item");
        }
        Ok(deleted)
    }
}
