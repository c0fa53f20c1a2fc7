//! Wiring of every repository and service over one store.

use std::sync::Arc;

use domain::{
    BlogPost, Brand, Category, Flavor, FlavorSize, Product, ProductFlavor, ProductSize,
    ServiceOffering, Size,
};

use crate::media::MediaStore;
use crate::repository::Repository;
use crate::service::{
    OrderManager, OrderService, QuoteManager, QuoteService, UserManager, UserService,
};
use crate::store::DocumentStore;
use crate::variants::VariantManager;

/// Everything the API layer needs, sharing one store and one media store.
#[derive(Clone)]
pub struct Catalog {
    pub store: Arc<dyn DocumentStore>,
    pub media: Arc<dyn MediaStore>,

    pub products: Repository<Product>,
    pub flavors: Repository<Flavor>,
    pub sizes: Repository<Size>,
    pub brands: Repository<Brand>,
    pub categories: Repository<Category>,
    pub blogs: Repository<BlogPost>,
    pub offerings: Repository<ServiceOffering>,

    pub product_flavors: VariantManager<Product, ProductFlavor>,
    pub product_sizes: VariantManager<Product, ProductSize>,
    pub flavor_sizes: VariantManager<Flavor, FlavorSize>,

    pub orders: Arc<dyn OrderService>,
    pub quotes: Arc<dyn QuoteService>,
    pub users: Arc<dyn UserService>,
}

impl Catalog {
    pub fn new(store: Arc<dyn DocumentStore>, media: Arc<dyn MediaStore>) -> Self {
        let products: Repository<Product> = Repository::new(store.clone(), media.clone());
        let flavors: Repository<Flavor> = Repository::new(store.clone(), media.clone());
        let orders = Arc::new(OrderManager::new(
            Repository::new(store.clone(), media.clone()),
            products.clone(),
        ));
        let quotes = Arc::new(QuoteManager::new(Repository::new(store.clone(), media.clone())));
        let users = Arc::new(UserManager::new(Repository::new(store.clone(), media.clone())));

        Self {
            product_flavors: VariantManager::new(products.clone()),
            product_sizes: VariantManager::new(products.clone()),
            flavor_sizes: VariantManager::new(flavors.clone()),
            sizes: Repository::new(store.clone(), media.clone()),
            brands: Repository::new(store.clone(), media.clone()),
            categories: Repository::new(store.clone(), media.clone()),
            blogs: Repository::new(store.clone(), media.clone()),
            offerings: Repository::new(store.clone(), media.clone()),
            products,
            flavors,
            orders,
            quotes,
            users,
            store,
            media,
        }
    }
}
