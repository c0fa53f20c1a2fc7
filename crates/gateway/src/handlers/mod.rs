//! HTTP request handlers.

mod crud;

pub mod auth_handler;
pub mod blog_handler;
pub mod brand_handler;
pub mod category_handler;
pub mod flavor_handler;
pub mod health_handler;
pub mod offering_handler;
pub mod ops_handler;
pub mod order_handler;
pub mod product_handler;
pub mod quote_handler;
pub mod size_handler;
pub mod user_handler;

pub use crud::ListParams;

pub use auth_handler::auth_routes;
pub use blog_handler::blog_routes;
pub use brand_handler::brand_routes;
pub use category_handler::category_routes;
pub use flavor_handler::flavor_routes;
pub use health_handler::health_routes;
pub use offering_handler::offering_routes;
pub use ops_handler::ops_routes;
pub use order_handler::order_routes;
pub use product_handler::product_routes;
pub use quote_handler::{quote_routes, supplier_request_routes};
pub use size_handler::size_routes;
pub use user_handler::user_routes;
