//! OpenAPI documentation.

use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use auth_service_lib::TokenResponse;
use common::{error::ErrorResponse, PageMeta};
use domain::{
    Address, BlogPost, BlogPostChanges, Brand, BrandChanges, Category, CategoryChanges,
    Credentials, Flavor, FlavorChanges, FlavorSize, FlavorSizeChanges, LineItem, LineRequest,
    NewBlogPost, NewBrand, NewCategory, NewFlavor, NewFlavorSize, NewOrder, NewProduct,
    NewProductFlavor, NewProductSize, NewQuote, NewServiceOffering, NewSize, NewUser, Order,
    OrderStatus, OrderStatusChange, PostStatus, Product, ProductChanges, ProductFlavor,
    ProductFlavorChanges, ProductSize, ProductSizeChanges, Quote, QuoteKind, QuoteStatus,
    QuoteStatusChange, Role, ServiceOffering, ServiceOfferingChanges, Size, SizeChanges, Status,
    UserChanges, UserResponse,
};

use crate::handlers::health_handler::{HealthResponse, StoreHealth};
use crate::handlers::ops_handler::{OperationError, OperationRequest, OperationResponse};
use crate::handlers::product_handler::ProductSearchResponse;

/// API documentation struct.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health_handler::health_check,
        crate::handlers::auth_handler::register,
        crate::handlers::auth_handler::login,
        crate::handlers::auth_handler::me,
        crate::handlers::product_handler::list_products,
        crate::handlers::product_handler::search_products,
        crate::handlers::product_handler::products_by_category,
        crate::handlers::product_handler::products_by_brand,
        crate::handlers::product_handler::get_product_by_slug,
        crate::handlers::product_handler::get_product,
        crate::handlers::product_handler::create_product,
        crate::handlers::product_handler::update_product,
        crate::handlers::product_handler::delete_product,
        crate::handlers::product_handler::add_product_flavor,
        crate::handlers::product_handler::update_product_flavor,
        crate::handlers::product_handler::delete_product_flavor,
        crate::handlers::product_handler::add_product_size,
        crate::handlers::product_handler::update_product_size,
        crate::handlers::product_handler::delete_product_size,
        crate::handlers::flavor_handler::list_flavors,
        crate::handlers::flavor_handler::get_flavor,
        crate::handlers::flavor_handler::create_flavor,
        crate::handlers::flavor_handler::update_flavor,
        crate::handlers::flavor_handler::delete_flavor,
        crate::handlers::flavor_handler::add_flavor_size,
        crate::handlers::flavor_handler::update_flavor_size,
        crate::handlers::flavor_handler::delete_flavor_size,
        crate::handlers::size_handler::list_sizes,
        crate::handlers::size_handler::get_size,
        crate::handlers::size_handler::create_size,
        crate::handlers::size_handler::update_size,
        crate::handlers::size_handler::delete_size,
        crate::handlers::brand_handler::list_brands,
        crate::handlers::brand_handler::get_brand,
        crate::handlers::brand_handler::create_brand,
        crate::handlers::brand_handler::update_brand,
        crate::handlers::brand_handler::delete_brand,
        crate::handlers::category_handler::list_categories,
        crate::handlers::category_handler::get_category,
        crate::handlers::category_handler::get_category_by_slug,
        crate::handlers::category_handler::create_category,
        crate::handlers::category_handler::update_category,
        crate::handlers::category_handler::delete_category,
        crate::handlers::offering_handler::list_offerings,
        crate::handlers::offering_handler::get_offering,
        crate::handlers::offering_handler::create_offering,
        crate::handlers::offering_handler::update_offering,
        crate::handlers::offering_handler::delete_offering,
        crate::handlers::blog_handler::list_blogs,
        crate::handlers::blog_handler::get_blog_post,
        crate::handlers::blog_handler::get_blog_post_by_slug,
        crate::handlers::blog_handler::create_blog_post,
        crate::handlers::blog_handler::update_blog_post,
        crate::handlers::blog_handler::delete_blog_post,
        crate::handlers::order_handler::list_orders,
        crate::handlers::order_handler::my_orders,
        crate::handlers::order_handler::get_order,
        crate::handlers::order_handler::create_order,
        crate::handlers::order_handler::update_order_status,
        crate::handlers::order_handler::delete_order,
        crate::handlers::quote_handler::list_quotes,
        crate::handlers::quote_handler::get_quote,
        crate::handlers::quote_handler::submit_quote,
        crate::handlers::quote_handler::submit_supplier_request,
        crate::handlers::quote_handler::update_quote_status,
        crate::handlers::quote_handler::delete_quote,
        crate::handlers::user_handler::list_users,
        crate::handlers::user_handler::get_user,
        crate::handlers::user_handler::update_user,
        crate::handlers::user_handler::delete_user,
        crate::handlers::ops_handler::execute_operation,
    ),
    components(
        schemas(
            ErrorResponse,
            PageMeta,
            HealthResponse,
            StoreHealth,
            TokenResponse,
            Credentials,
            NewUser,
            UserChanges,
            UserResponse,
            Role,
            Status,
            Product,
            ProductFlavor,
            ProductSize,
            NewProduct,
            ProductChanges,
            NewProductFlavor,
            ProductFlavorChanges,
            NewProductSize,
            ProductSizeChanges,
            ProductSearchResponse,
            Flavor,
            FlavorSize,
            NewFlavor,
            FlavorChanges,
            NewFlavorSize,
            FlavorSizeChanges,
            Size,
            NewSize,
            SizeChanges,
            Brand,
            NewBrand,
            BrandChanges,
            Category,
            NewCategory,
            CategoryChanges,
            ServiceOffering,
            NewServiceOffering,
            ServiceOfferingChanges,
            BlogPost,
            NewBlogPost,
            BlogPostChanges,
            PostStatus,
            Order,
            OrderStatus,
            Address,
            LineItem,
            LineRequest,
            NewOrder,
            OrderStatusChange,
            Quote,
            QuoteKind,
            QuoteStatus,
            NewQuote,
            QuoteStatusChange,
            OperationRequest,
            OperationResponse,
            OperationError,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service status"),
        (name = "Authentication", description = "Registration, login and the current user"),
        (name = "Products", description = "Products and their flavor and size variants"),
        (name = "Flavors", description = "Flavors and their sizes"),
        (name = "Sizes", description = "Catalog sizes"),
        (name = "Brands", description = "Brands"),
        (name = "Categories", description = "Product categories"),
        (name = "Services", description = "Service offerings"),
        (name = "Blogs", description = "Blog posts"),
        (name = "Orders", description = "Customer orders"),
        (name = "Quotes", description = "Quote and supplier requests"),
        (name = "Users", description = "User administration"),
        (name = "Operations", description = "Named queries and mutations over the catalog"),
    )
)]
pub struct ApiDoc;

/// Registers the `bearer_auth` scheme referenced by protected paths.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
