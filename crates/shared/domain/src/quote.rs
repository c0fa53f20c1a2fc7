//! Quote and supplier requests submitted from the public site.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::{DomainError, DomainResult};
use crate::resource::{Draft, Resource};

/// Which public form the request came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum QuoteKind {
    #[default]
    Quote,
    Supplier,
}

impl QuoteKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteKind::Quote => "quote",
            QuoteKind::Supplier => "supplier",
        }
    }
}

/// `new → in-progress → completed | cancelled`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "kebab-case")]
pub enum QuoteStatus {
    #[default]
    New,
    InProgress,
    Completed,
    Cancelled,
}

impl QuoteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteStatus::New => "new",
            QuoteStatus::InProgress => "in-progress",
            QuoteStatus::Completed => "completed",
            QuoteStatus::Cancelled => "cancelled",
        }
    }

    pub fn can_transition_to(&self, next: QuoteStatus) -> bool {
        use QuoteStatus::*;
        matches!(
            (self, next),
            (New, InProgress) | (New, Cancelled) | (InProgress, Completed) | (InProgress, Cancelled)
        )
    }
}

impl std::fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub subject: Option<String>,
    pub message: String,
    pub kind: QuoteKind,
    pub status: QuoteStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Quote {
    pub fn transition(&mut self, next: QuoteStatus, now: DateTime<Utc>) -> DomainResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(DomainError::invalid_transition(self.status, next));
        }
        self.status = next;
        self.touch(now);
        Ok(())
    }
}

impl Resource for Quote {
    const COLLECTION: &'static str = "quotes";
    const LABEL: &'static str = "Quote";
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "email", "company", "subject", "message"];
    const NAME_FIELD: Option<&'static str> = Some("name");

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

/// Public quote/supplier form input. The kind is decided by the route.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct NewQuote {
    #[serde(default)]
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[serde(default)]
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub subject: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "Message is required"))]
    pub message: String,
    #[serde(skip)]
    pub kind: QuoteKind,
}

impl NewQuote {
    pub fn with_kind(mut self, kind: QuoteKind) -> Self {
        self.kind = kind;
        self
    }
}

impl Draft for NewQuote {
    type Target = Quote;

    fn into_resource(self, id: Uuid, now: DateTime<Utc>) -> Quote {
        Quote {
            id,
            name: self.name,
            email: self.email.trim().to_lowercase(),
            phone: self.phone,
            company: self.company,
            subject: self.subject,
            message: self.message,
            kind: self.kind,
            status: QuoteStatus::New,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct QuoteStatusChange {
    pub status: QuoteStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&QuoteStatus::InProgress).unwrap(),
            "\"in-progress\""
        );
    }

    #[test]
    fn test_transitions() {
        assert!(QuoteStatus::New.can_transition_to(QuoteStatus::InProgress));
        assert!(QuoteStatus::InProgress.can_transition_to(QuoteStatus::Completed));
        assert!(!QuoteStatus::New.can_transition_to(QuoteStatus::Completed));
        assert!(!QuoteStatus::Completed.can_transition_to(QuoteStatus::Cancelled));
    }

    #[test]
    fn test_supplier_kind_and_validation() {
        let input = NewQuote {
            name: "Acme".into(),
            email: "Sales@Acme.test".into(),
            message: "We grow apples".into(),
            ..Default::default()
        }
        .with_kind(QuoteKind::Supplier);
        assert!(input.validate().is_ok());

        let quote = input.into_resource(Uuid::new_v4(), Utc::now());
        assert_eq!(quote.kind, QuoteKind::Supplier);
        assert_eq!(quote.email, "sales@acme.test");
        assert_eq!(quote.status, QuoteStatus::New);
    }

    #[test]
    fn test_invalid_email_rejected() {
        let input = NewQuote {
            name: "A".into(),
            email: "nope".into(),
            message: "m".into(),
            ..Default::default()
        };
        assert!(input.validate().is_err());
    }
}
