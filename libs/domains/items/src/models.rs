use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::error::{ItemError, ItemResult};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;

/// Item entity - the managed record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Unique identifier (UUIDv7, assigned on insert)
    pub id: Uuid,
    pub name: String,
    pub description: String,
    /// Creation timestamp, immutable
    pub created_at: DateTime<Utc>,
}

impl Item {
    /// New item with a fresh time-ordered id, stamped now.
    pub fn new(name: String, description: String) -> Self {
        Self {
            id: Uuid::now_v7(),
            name,
            description,
            created_at: Utc::now(),
        }
    }
}

/// DTO for creating a new item
///
/// Both fields are required by the store; absent ones are passed through
/// and rejected there.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CreateItem {
    #[schema(example = "Widget")]
    pub name: Option<String>,
    #[schema(example = "A small part")]
    pub description: Option<String>,
}

/// DTO for replacing an item's name and description
///
/// Both fields are written; there is no partial update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UpdateItem {
    #[schema(example = "Widget2")]
    pub name: Option<String>,
    #[schema(example = "A small part")]
    pub description: Option<String>,
}

/// Extract both required fields, naming the first one missing.
pub(crate) fn required_fields(
    name: Option<String>,
    description: Option<String>,
) -> ItemResult<(String, String)> {
    let name = name.ok_or(ItemError::MissingField("name"))?;
    let description = description.ok_or(ItemError::MissingField("description"))?;
    Ok((name, description))
}

/// Substring filters for listing. `None` means "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemFilter {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl ItemFilter {
    /// Empty strings are treated as absent.
    pub fn new(name: Option<String>, description: Option<String>) -> Self {
        Self {
            name: name.filter(|s| !s.is_empty()),
            description: description.filter(|s| !s.is_empty()),
        }
    }

    /// Case-insensitive containment on every present field.
    pub fn matches(&self, item: &Item) -> bool {
        fn contains(haystack: &str, needle: &Option<String>) -> bool {
            needle
                .as_ref()
                .is_none_or(|n| haystack.to_lowercase().contains(&n.to_lowercase()))
        }

        contains(&item.name, &self.name) && contains(&item.description, &self.description)
    }
}

/// Query string of the list endpoint
///
/// `page` and `limit` arrive as text and are checked by [`ListItemsQuery::pagination`].
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListItemsQuery {
    /// 1-based page number (default 1)
    #[param(value_type = Option<u64>, minimum = 1, example = 1)]
    pub page: Option<String>,
    /// Page size (default 10)
    #[param(value_type = Option<u64>, minimum = 1, example = 10)]
    pub limit: Option<String>,
    /// Case-insensitive substring of the name
    pub name: Option<String>,
    /// Case-insensitive substring of the description
    pub description: Option<String>,
}

impl ListItemsQuery {
    pub fn pagination(&self) -> ItemResult<Pagination> {
        Ok(Pagination {
            page: parse_positive("page", self.page.as_deref(), DEFAULT_PAGE)?,
            limit: parse_positive("limit", self.limit.as_deref(), DEFAULT_LIMIT)?,
        })
    }

    pub fn filter(&self) -> ItemFilter {
        ItemFilter::new(self.name.clone(), self.description.clone())
    }
}

fn parse_positive(key: &str, raw: Option<&str>, default: u64) -> ItemResult<u64> {
    match raw.map(str::trim) {
        None | Some("") => Ok(default),
        Some(value) => value
            .parse::<u64>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| {
                ItemError::InvalidPagination(format!(
                    "'{}' must be a positive integer, got '{}'",
                    key, value
                ))
            }),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
}

impl Pagination {
    /// Rows to skip: `(page - 1) * limit`
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// `ceil(total / limit)`
    pub fn total_pages(&self, total_items: u64) -> u64 {
        total_items.div_ceil(self.limit)
    }
}

/// One page of the list endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemPage {
    pub items: Vec<Item>,
    /// Matching records across all pages
    pub total_items: u64,
    pub total_pages: u64,
    pub current_page: u64,
}
