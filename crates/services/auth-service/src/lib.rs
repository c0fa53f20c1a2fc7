//! Auth Service Library
//!
//! Registration, login and bearer-token verification. User records are
//! reached through the [`client::UserDirectory`] seam, which the gateway
//! backs with the catalog's users collection.

pub mod client;
pub mod service;

pub use client::{CatalogUsers, UserDirectory};
pub use service::{authorize, AuthService, Authenticator, Claims, Principal, TokenResponse};
