//! Access to the user records credentials are checked against.

mod user_directory;

#[cfg(any(test, feature = "test-utils"))]
pub use user_directory::MockUserDirectory;
pub use user_directory::{CatalogUsers, UserDirectory};
