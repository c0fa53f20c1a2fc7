//! Validated JSON extractor.

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use validator::Validate;

use common::AppError;

/// JSON body that has passed its `validator` rules.
///
/// An empty body decodes as `{}`, so a bare request reports the first missing
/// field rather than a parse error.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;

        let value: T = decode(&bytes)?;
        value.validate()?;

        Ok(ValidatedJson(value))
    }
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, AppError> {
    let body: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
        b"{}"
    } else {
        bytes
    };
    serde_json::from_slice(body).map_err(|e| AppError::validation(format!("Invalid JSON body: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::Credentials;

    #[test]
    fn test_empty_body_reaches_validation() {
        let credentials: Credentials = decode(b"  ").unwrap();
        let err = AppError::from(credentials.validate().unwrap_err());
        assert_eq!(err.user_message(), "Invalid email format");
    }

    #[test]
    fn test_malformed_body_is_a_validation_error() {
        let err = decode::<Credentials>(b"{\"email\": ").unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.starts_with("Invalid JSON body")));
    }
}
