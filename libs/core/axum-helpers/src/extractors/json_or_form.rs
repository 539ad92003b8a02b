//! Request body extractor accepting JSON or urlencoded forms.

use crate::errors::AppError;
use axum::{
    Form, Json,
    extract::{FromRequest, Request, rejection::FormRejection},
    http::header::CONTENT_TYPE,
};
use serde::de::DeserializeOwned;

/// Body extractor that dispatches on `Content-Type`.
///
/// - `application/json` (and `application/*+json`) is parsed as JSON
/// - `application/x-www-form-urlencoded` is read with [`Form`]
///
/// A body the payload type cannot be built from reads as `T::default()`:
/// a missing or unknown content type, JSON that is not an object, or fields
/// of the wrong type. Handlers then see absent fields. Only malformed JSON
/// syntax and unreadable bodies are rejected, as `INVALID_JSON` /
/// `INVALID_FORM` 400 responses.
///
/// # Example
/// ```ignore
/// use axum::routing::post;
/// use axum_helpers::extractors::JsonOrForm;
///
/// async fn create(JsonOrForm(input): JsonOrForm<CreateItem>) -> String {
///     format!("{:?}", input.name)
/// }
///
/// let app = axum::Router::new().route("/items", post(create));
/// ```
pub struct JsonOrForm<T>(pub T);

#[derive(Debug, PartialEq, Eq)]
enum BodyKind {
    Json,
    Form,
}

fn body_kind(content_type: &str) -> Option<BodyKind> {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    if essence == "application/x-www-form-urlencoded" {
        Some(BodyKind::Form)
    } else if essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
    {
        Some(BodyKind::Json)
    } else {
        None
    }
}

impl<T, S> FromRequest<S> for JsonOrForm<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();

        match body_kind(&content_type) {
            Some(BodyKind::Json) => {
                let Json(value) = Json::<serde_json::Value>::from_request(req, state).await?;
                let data = serde_json::from_value(value).unwrap_or_else(|e| {
                    tracing::debug!(error = %e, "JSON body does not fit the payload, reading it as empty");
                    T::default()
                });
                Ok(JsonOrForm(data))
            }
            Some(BodyKind::Form) => match Form::<T>::from_request(req, state).await {
                Ok(Form(data)) => Ok(JsonOrForm(data)),
                Err(FormRejection::FailedToDeserializeFormBody(e)) => {
                    tracing::debug!(error = %e, "Form body does not fit the payload, reading it as empty");
                    Ok(JsonOrForm(T::default()))
                }
                Err(e) => Err(e.into()),
            },
            None => {
                tracing::debug!(content_type = %content_type, "Unreadable body content type, reading it as empty");
                Ok(JsonOrForm(T::default()))
            }
        }
    }
}
