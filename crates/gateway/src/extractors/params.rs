//! Path and query extractors that reject with the JSON error envelope.

use axum::{
    async_trait,
    extract::{FromRequestParts, Path as AxumPath, Query as AxumQuery},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use common::AppError;

/// `axum::extract::Path` whose rejection is a `VALIDATION_ERROR`.
#[derive(Debug)]
pub struct Path<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for Path<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AxumPath(value) = AxumPath::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;
        Ok(Path(value))
    }
}

/// `axum::extract::Query` whose rejection is a `VALIDATION_ERROR`.
#[derive(Debug)]
pub struct Query<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for Query<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AxumQuery(value) = AxumQuery::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;
        Ok(Query(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    use crate::handlers::ListParams;

    #[tokio::test]
    async fn test_bad_query_is_a_validation_error() {
        let (mut parts, _) = Request::builder()
            .uri("/api/products?limit=abc")
            .body(())
            .unwrap()
            .into_parts();

        let err = Query::<ListParams>::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert_eq!(err.code(), "VALIDATION_ERROR");
        assert!(err.user_message().contains("limit"));
    }

    #[tokio::test]
    async fn test_query_passes_values_through() {
        let (mut parts, _) = Request::builder()
            .uri("/api/products?limit=5&search=tea")
            .body(())
            .unwrap()
            .into_parts();

        let Query(params) = Query::<ListParams>::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(params.limit, Some(5));
        assert_eq!(params.search.as_deref(), Some("tea"));
    }
}
