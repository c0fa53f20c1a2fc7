//! Services that carry rules beyond plain resource CRUD.

mod order_service;
mod quote_service;
mod user_service;

pub use order_service::{OrderManager, OrderService};
pub use quote_service::{QuoteManager, QuoteService};
pub use user_service::{UserManager, UserService};
