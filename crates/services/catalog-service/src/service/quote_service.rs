//! Quote service - public quote and supplier requests, staff follow-up.

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use common::AppResult;
use domain::{NewQuote, Quote, QuoteKind, QuoteStatus};

use crate::query::{ListQuery, Page};
use crate::repository::Repository;

#[async_trait]
pub trait QuoteService: Send + Sync {
    async fn list_quotes(&self, query: &ListQuery) -> AppResult<Page<Quote>>;

    async fn get_quote(&self, id: Uuid) -> AppResult<Quote>;

    /// Record a request of the given kind in `new` state.
    async fn submit(&self, kind: QuoteKind, input: NewQuote) -> AppResult<Quote>;

    async fn change_status(&self, id: Uuid, status: QuoteStatus) -> AppResult<Quote>;

    async fn delete_quote(&self, id: Uuid) -> AppResult<Quote>;
}

pub struct QuoteManager {
    quotes: Repository<Quote>,
}

impl QuoteManager {
    pub fn new(quotes: Repository<Quote>) -> Self {
        Self { quotes }
    }
}

#[async_trait]
impl QuoteService for QuoteManager {
    async fn list_quotes(&self, query: &ListQuery) -> AppResult<Page<Quote>> {
        self.quotes.list(query).await
    }

    async fn get_quote(&self, id: Uuid) -> AppResult<Quote> {
        self.quotes.get(id).await
    }

    async fn submit(&self, kind: QuoteKind, input: NewQuote) -> AppResult<Quote> {
        let quote = self.quotes.create(input.with_kind(kind)).await?;
        tracing::info!(quote = %quote.id, kind = kind.as_str(), "Quote request received");
        Ok(quote)
    }

    async fn change_status(&self, id: Uuid, status: QuoteStatus) -> AppResult<Quote> {
        self.quotes
            .modify(id, |quote| {
                quote.transition(status, Utc::now())?;
                Ok(())
            })
            .await
    }

    async fn delete_quote(&self, id: Uuid) -> AppResult<Quote> {
        self.quotes.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use common::AppError;

    use crate::media::MockMediaStore;
    use crate::store::MemoryStore;

    fn service() -> QuoteManager {
        QuoteManager::new(Repository::new(
            MemoryStore::new_shared(),
            Arc::new(MockMediaStore::new()),
        ))
    }

    fn request() -> NewQuote {
        NewQuote {
            name: "Sam".into(),
            email: "Sam@Example.com".into(),
            message: "200 bottles please".into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_submit_sets_kind_and_status() {
        let service = service();
        let quote = service.submit(QuoteKind::Supplier, request()).await.unwrap();

        assert_eq!(quote.kind, QuoteKind::Supplier);
        assert_eq!(quote.status, QuoteStatus::New);
        assert_eq!(quote.email, "sam@example.com");
    }

    #[tokio::test]
    async fn test_submit_requires_message() {
        let service = service();
        let err = service
            .submit(
                QuoteKind::Quote,
                NewQuote {
                    message: String::new(),
                    ..request()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Message is required");
    }

    #[tokio::test]
    async fn test_completed_quote_is_final() {
        let service = service();
        let quote = service.submit(QuoteKind::Quote, request()).await.unwrap();

        service
            .change_status(quote.id, QuoteStatus::InProgress)
            .await
            .unwrap();
        service
            .change_status(quote.id, QuoteStatus::Completed)
            .await
            .unwrap();
        let err = service
            .change_status(quote.id, QuoteStatus::Cancelled)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let service = service();
        let quote = service.submit(QuoteKind::Quote, request()).await.unwrap();

        service.delete_quote(quote.id).await.unwrap();
        let err = service.get_quote(quote.id).await.unwrap_err();
        assert_eq!(err.to_string(), "Quote not found");
    }
}
