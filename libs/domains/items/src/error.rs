use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use strum::Display;
use thiserror::Error;

/// The operation a persistence failure happened in. Displays as the
/// message returned to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ItemOperation {
    #[strum(to_string = "Error creating item")]
    Create,
    #[strum(to_string = "Error fetching items")]
    List,
    #[strum(to_string = "Error fetching item")]
    Get,
    #[strum(to_string = "Error updating item")]
    Update,
    #[strum(to_string = "Error deleting item")]
    Delete,
}

#[derive(Debug, Error)]
pub enum ItemError {
    #[error("Item not found")]
    NotFound,

    #[error("Invalid pagination: {0}")]
    InvalidPagination(String),

    #[error("Missing required field '{0}'")]
    MissingField(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("{operation}: {reason}")]
    Persistence {
        operation: ItemOperation,
        reason: String,
    },
}

pub type ItemResult<T> = Result<T, ItemError>;

impl ItemError {
    /// Fold any failure into a persistence failure of `operation`.
    /// Not-found passes through unchanged.
    pub fn during(self, operation: ItemOperation) -> Self {
        match self {
            ItemError::NotFound | ItemError::Persistence { .. } => self,
            other => ItemError::Persistence {
                operation,
                reason: other.to_string(),
            },
        }
    }
}

/// Convert ItemError to AppError for standardized error responses
impl From<ItemError> for AppError {
    fn from(err: ItemError) -> Self {
        match err {
            ItemError::NotFound => AppError::NotFound("Item not found".to_string()),
            ItemError::Persistence { operation, reason } => {
                tracing::error!(%operation, %reason, "Item persistence failure");
                AppError::InternalServerError(operation.to_string())
            }
            other => {
                tracing::error!(error = %other, "Unclassified item error");
                AppError::InternalServerError(
                    axum_helpers::ErrorCode::InternalError
                        .default_message()
                        .to_string(),
                )
            }
        }
    }
}

impl IntoResponse for ItemError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
