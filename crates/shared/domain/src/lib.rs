//! Domain layer - Core catalog entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.
//! Every persisted entity implements [`Resource`] so the store and query
//! engine can handle it generically.

pub mod blog;
pub mod brand;
pub mod category;
pub mod constants;
pub mod error;
pub mod flavor;
pub mod lenient;
pub mod offering;
pub mod order;
pub mod password;
pub mod product;
pub mod quote;
pub mod resource;
pub mod size;
pub mod slug;
pub mod user;
pub mod variant;

pub use blog::{BlogPost, BlogPostChanges, NewBlogPost, PostStatus};
pub use brand::{Brand, BrandChanges, NewBrand};
pub use category::{Category, CategoryChanges, NewCategory};
pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use flavor::{Flavor, FlavorChanges, FlavorSize, FlavorSizeChanges, NewFlavor, NewFlavorSize};
pub use offering::{NewServiceOffering, ServiceOffering, ServiceOfferingChanges};
pub use order::{
    Address, LineItem, LineRequest, NewOrder, Order, OrderStatus, OrderStatusChange,
};
pub use password::Password;
pub use product::{
    NewProduct, NewProductFlavor, NewProductSize, Product, ProductChanges, ProductFlavor,
    ProductFlavorChanges, ProductSize, ProductSizeChanges,
};
pub use quote::{NewQuote, Quote, QuoteKind, QuoteStatus, QuoteStatusChange};
pub use resource::{Draft, Patch, Resource, Status, UniqueKey};
pub use size::{NewSize, Size, SizeChanges};
pub use slug::slugify;
pub use user::{normalize_email, Credentials, NewUser, Role, User, UserChanges, UserResponse};
pub use variant::{Variant, VariantDraft, VariantList, VariantPatch, VariantSlot};
