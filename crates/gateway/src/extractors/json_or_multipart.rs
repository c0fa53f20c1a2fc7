//! Body extractor accepting JSON or multipart form data.
//!
//! Multipart text fields become JSON strings (the domain inputs parse
//! numbers and booleans leniently) and each file part is checked against
//! the upload allow-list and size ceiling, stored, and replaced by its
//! public path. Repeated field names collect into an array.

use std::future::Future;

use axum::{
    async_trait,
    extract::{multipart::Field, FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use catalog_service::MediaStore;
use common::{AppError, AppResult, UploadConfig};

use crate::state::AppState;

/// Decoded request body plus the files stored while reading it.
pub struct JsonOrMultipart<T> {
    pub value: T,
    pub uploads: Vec<String>,
}

impl<T> JsonOrMultipart<T> {
    /// Run `apply` on the decoded value. Files stored for a request that
    /// then fails are deleted again.
    pub async fn commit<R, F, Fut>(self, media: &dyn MediaStore, apply: F) -> AppResult<R>
    where
        F: FnOnce(T) -> Fut,
        Fut: Future<Output = AppResult<R>>,
    {
        let result = apply(self.value).await;
        if result.is_err() {
            discard(media, &self.uploads).await;
        }
        result
    }
}

#[async_trait]
impl<T> FromRequest<AppState> for JsonOrMultipart<T>
where
    T: DeserializeOwned + Send,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, AppError> {
        let multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("multipart/form-data"));

        if !multipart {
            let Json(body) = Json::<Value>::from_request(req, state)
                .await
                .map_err(|e| AppError::validation(e.body_text()))?;
            return Ok(Self {
                value: decode(body)?,
                uploads: Vec::new(),
            });
        }

        let mut form = Multipart::from_request(req, state)
            .await
            .map_err(|e| AppError::bad_request(e.body_text()))?;

        let media = state.catalog.media.as_ref();
        let mut fields = Map::new();
        let mut uploads = Vec::new();
        let read = read_form(&mut form, &state.config.upload, media, &mut fields, &mut uploads).await;

        match read.and_then(|_| decode(Value::Object(fields))) {
            Ok(value) => Ok(Self { value, uploads }),
            Err(e) => {
                discard(media, &uploads).await;
                Err(e)
            }
        }
    }
}

async fn read_form(
    form: &mut Multipart,
    limits: &UploadConfig,
    media: &dyn MediaStore,
    fields: &mut Map<String, Value>,
    uploads: &mut Vec<String>,
) -> AppResult<()> {
    while let Some(field) = form
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(e.body_text()))?
    {
        let Some(name) = field.name().map(|n| n.trim_end_matches("[]").to_string()) else {
            continue;
        };

        match field.file_name().map(str::to_string) {
            // Browsers send an empty file part for an untouched file input
            Some(file_name) if file_name.is_empty() => continue,
            Some(file_name) => {
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                if !limits.allows(&content_type) {
                    return Err(AppError::validation(format!(
                        "File type '{}' is not allowed",
                        content_type
                    )));
                }
                let bytes = read_capped(field, limits.max_bytes).await?;
                let path = media.save(&file_name, bytes).await?;
                uploads.push(path.clone());
                push_field(fields, name, Value::String(path));
            }
            None => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::bad_request(e.body_text()))?;
                push_field(fields, name, Value::String(text));
            }
        }
    }
    Ok(())
}

/// Buffer a file part, failing as soon as it passes `max_bytes`.
async fn read_capped(mut field: Field<'_>, max_bytes: usize) -> AppResult<Vec<u8>> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| AppError::bad_request(e.body_text()))?
    {
        if bytes.len() + chunk.len() > max_bytes {
            return Err(AppError::validation(format!(
                "File exceeds the {} byte limit",
                max_bytes
            )));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

fn push_field(fields: &mut Map<String, Value>, name: String, value: Value) {
    match fields.get_mut(&name) {
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            fields.insert(name, value);
        }
    }
}

fn decode<T: DeserializeOwned>(body: Value) -> AppResult<T> {
    serde_json::from_value(body).map_err(|e| AppError::validation(e.to_string()))
}

async fn discard(media: &dyn MediaStore, uploads: &[String]) {
    for path in uploads {
        if let Err(e) = media.remove(path).await {
            tracing::warn!(path = %path, error = %e, "Failed to delete orphaned upload");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_repeated_fields_collect_into_array() {
        let mut fields = Map::new();
        push_field(&mut fields, "title".into(), json!("Juice"));
        push_field(&mut fields, "images".into(), json!("/uploads/a.png"));
        push_field(&mut fields, "images".into(), json!("/uploads/b.png"));
        push_field(&mut fields, "images".into(), json!("/uploads/c.png"));

        assert_eq!(
            Value::Object(fields),
            json!({
                "title": "Juice",
                "images": ["/uploads/a.png", "/uploads/b.png", "/uploads/c.png"]
            })
        );
    }

    #[test]
    fn test_decode_reports_type_errors() {
        let err = decode::<domain::NewSize>(json!({"name": 5})).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_failed_commit_discards_uploads() {
        let mut media = catalog_service::media::MockMediaStore::new();
        media
            .expect_remove()
            .withf(|path| path == "/uploads/a.png")
            .times(1)
            .returning(|_| Ok(()));

        let body = JsonOrMultipart {
            value: 1,
            uploads: vec!["/uploads/a.png".to_string()],
        };
        let result: AppResult<()> = body
            .commit(&media, |_| async { Err(AppError::validation("Name is required")) })
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_successful_commit_keeps_uploads() {
        let mut media = catalog_service::media::MockMediaStore::new();
        media.expect_remove().never();

        let body = JsonOrMultipart {
            value: 2,
            uploads: vec!["/uploads/b.png".to_string()],
        };
        let doubled = body.commit(&media, |v| async move { Ok(v * 2) }).await.unwrap();
        assert_eq!(doubled, 4);
    }
}
