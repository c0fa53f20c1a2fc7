//! Order service - places orders and drives their status lifecycle.

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use common::{AppError, AppResult, OptionExt};
use domain::{
    LineItem, LineRequest, NewOrder, Order, OrderStatus, Product, ProductSize, Status, Variant,
};

use crate::query::{ListQuery, Page};
use crate::repository::Repository;

/// Order use cases.
#[async_trait]
pub trait OrderService: Send + Sync {
    async fn list_orders(&self, query: &ListQuery) -> AppResult<Page<Order>>;

    /// Orders placed by one user, same query rules as `list_orders`.
    async fn list_user_orders(&self, user: Uuid, query: &ListQuery) -> AppResult<Page<Order>>;

    async fn get_order(&self, id: Uuid) -> AppResult<Order>;

    /// Price the requested lines from the current catalog and store the order.
    async fn place_order(&self, user: Uuid, input: NewOrder) -> AppResult<Order>;

    async fn change_status(&self, id: Uuid, status: OrderStatus) -> AppResult<Order>;

    async fn delete_order(&self, id: Uuid) -> AppResult<Order>;
}

pub struct OrderManager {
    orders: Repository<Order>,
    products: Repository<Product>,
}

impl OrderManager {
    pub fn new(orders: Repository<Order>, products: Repository<Product>) -> Self {
        Self { orders, products }
    }

    /// Snapshot name and unit price for one requested line.
    async fn price_line(&self, line: &LineRequest) -> AppResult<LineItem> {
        let product = self.products.get(line.product).await?;
        if !product.is_available || product.status != Status::Active {
            return Err(AppError::validation(format!(
                "Product '{}' is not available",
                product.title
            )));
        }

        let (name, unit_price) = match line.variant {
            Some(variant_id) => {
                let size = product
                    .sizes
                    .get(variant_id)
                    .ok_or_not_found(<ProductSize as Variant>::LABEL)?;
                if !size.is_available {
                    return Err(AppError::validation(format!(
                        "Size '{}' of '{}' is not available",
                        size.name, product.title
                    )));
                }
                (format!("{} ({})", product.title, size.name), size.price)
            }
            None => (product.title.clone(), product.price),
        };

        Ok(LineItem {
            product: product.id,
            variant: line.variant,
            name,
            quantity: line.quantity,
            unit_price,
        })
    }
}

#[async_trait]
impl OrderService for OrderManager {
    async fn list_orders(&self, query: &ListQuery) -> AppResult<Page<Order>> {
        self.orders.list(query).await
    }

    async fn list_user_orders(&self, user: Uuid, query: &ListQuery) -> AppResult<Page<Order>> {
        let query = query.clone().filter("user", user.to_string());
        self.orders.list(&query).await
    }

    async fn get_order(&self, id: Uuid) -> AppResult<Order> {
        self.orders.get(id).await
    }

    async fn place_order(&self, user: Uuid, input: NewOrder) -> AppResult<Order> {
        input.validate()?;

        let mut items = Vec::with_capacity(input.items.len());
        for line in &input.items {
            items.push(self.price_line(line).await?);
        }

        let order = Order::place(Uuid::new_v4(), user, input, items, Utc::now())?;
        tracing::info!(order = %order.id, user = %user, total = order.total, "Order placed");
        self.orders.insert(order).await
    }

    async fn change_status(&self, id: Uuid, status: OrderStatus) -> AppResult<Order> {
        self.orders
            .modify(id, |order| {
                order.transition(status, Utc::now())?;
                Ok(())
            })
            .await
    }

    async fn delete_order(&self, id: Uuid) -> AppResult<Order> {
        self.orders.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use domain::{Address, NewProduct, NewProductSize};

    use crate::media::MockMediaStore;
    use crate::store::MemoryStore;
    use crate::variants::VariantManager;

    struct Fixture {
        products: Repository<Product>,
        sizes: VariantManager<Product, ProductSize>,
        service: OrderManager,
    }

    fn fixture() -> Fixture {
        let store = MemoryStore::new_shared();
        let media = Arc::new(MockMediaStore::new());
        let products = Repository::new(store.clone(), media.clone());
        Fixture {
            sizes: VariantManager::new(products.clone()),
            service: OrderManager::new(Repository::new(store, media), products.clone()),
            products,
        }
    }

    async fn juice(products: &Repository<Product>, price: f64) -> Product {
        products
            .create(NewProduct {
                title: "Apple Juice".into(),
                description: "Cold pressed".into(),
                price: Some(price),
                ..Default::default()
            })
            .await
            .unwrap()
    }

    fn order_for(lines: Vec<LineRequest>) -> NewOrder {
        NewOrder {
            items: lines,
            shipping_address: Address {
                line1: "1 Main St".into(),
                city: "Springfield".into(),
                postal_code: "12345".into(),
                country: "US".into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn line(product: Uuid, variant: Option<Uuid>, quantity: u32) -> LineRequest {
        LineRequest {
            product,
            variant,
            quantity,
        }
    }

    #[tokio::test]
    async fn test_place_order_snapshots_prices() {
        let fx = fixture();
        let product = juice(&fx.products, 2.5).await;
        let product = fx
            .sizes
            .add(
                product.id,
                NewProductSize {
                    name: "1L".into(),
                    price: Some(4.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let size_id = product.sizes.iter().next().map(|s| s.id).unwrap();

        let user = Uuid::new_v4();
        let order = fx
            .service
            .place_order(
                user,
                order_for(vec![line(product.id, None, 2), line(product.id, Some(size_id), 1)]),
            )
            .await
            .unwrap();

        assert_eq!(order.user, user);
        assert_eq!(order.status, OrderStatus::Placed);
        assert_eq!(order.total, 9.0);
        assert_eq!(order.items[1].name, "Apple Juice (1L)");

        // Later price changes leave the order untouched
        fx.products
            .update(
                product.id,
                domain::ProductChanges {
                    price: Some(99.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let stored = fx.service.get_order(order.id).await.unwrap();
        assert_eq!(stored.total, 9.0);
    }

    #[tokio::test]
    async fn test_place_order_rejects_unavailable_product() {
        let fx = fixture();
        let product = juice(&fx.products, 2.5).await;
        fx.products
            .update(
                product.id,
                domain::ProductChanges {
                    is_available: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let err = fx
            .service
            .place_order(Uuid::new_v4(), order_for(vec![line(product.id, None, 1)]))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_place_order_unknown_product() {
        let fx = fixture();
        let err = fx
            .service
            .place_order(Uuid::new_v4(), order_for(vec![line(Uuid::new_v4(), None, 1)]))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref l) if l == "Product"));
    }

    #[tokio::test]
    async fn test_overflowing_total_is_rejected_and_not_stored() {
        let fx = fixture();
        let product = juice(&fx.products, 1e308).await;

        let err = fx
            .service
            .place_order(Uuid::new_v4(), order_for(vec![line(product.id, None, 2)]))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(ref msg) if msg == "Order total is out of range"));

        let page = fx.service.list_orders(&ListQuery::new()).await.unwrap();
        assert_eq!(page.total, 0);
    }

    #[tokio::test]
    async fn test_empty_order_is_invalid() {
        let fx = fixture();
        let err = fx
            .service
            .place_order(Uuid::new_v4(), order_for(vec![]))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_status_lifecycle() {
        let fx = fixture();
        let product = juice(&fx.products, 1.0).await;
        let order = fx
            .service
            .place_order(Uuid::new_v4(), order_for(vec![line(product.id, None, 1)]))
            .await
            .unwrap();

        let order = fx
            .service
            .change_status(order.id, OrderStatus::Processing)
            .await
            .unwrap();
        assert_eq!(order.status, OrderStatus::Processing);

        let err = fx
            .service
            .change_status(order.id, OrderStatus::Placed)
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Cannot change status from processing to placed"
        );
    }

    #[tokio::test]
    async fn test_user_orders_only_include_own() {
        let fx = fixture();
        let product = juice(&fx.products, 1.0).await;
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        for user in [alice, alice, bob] {
            fx.service
                .place_order(user, order_for(vec![line(product.id, None, 1)]))
                .await
                .unwrap();
        }

        let page = fx
            .service
            .list_user_orders(alice, &ListQuery::new())
            .await
            .unwrap();
        assert_eq!(page.total, 2);
        assert!(page.items.iter().all(|o| o.user == alice));
    }
}
