//! Cart state container.
//!
//! The cart is an ordered list of items, unique by product id, seeded from
//! the persistent store at startup and mutated only through the operations
//! here. Every successful mutation rewrites the full persisted list.
//!
//! Operations hold the cart lock across the whole read, remote lookup,
//! mutate, persist cycle, so two rapid concurrent operations never act on the
//! same stale snapshot.

pub mod store;

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::instrument;

use shoebox_core::{CartItem, ProductId};

use crate::catalog::{CatalogClient, CatalogError};
use store::{CartStore, StorageError};

/// Errors that can occur during cart operations.
///
/// Route handlers collapse these into fixed toast messages; the variants
/// exist so the cause can be logged before it is collapsed.
#[derive(Debug, Error)]
pub enum CartError {
    /// Catalog or stock lookup failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Persisting the cart failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The product is not in the cart (removal only; updates fall through).
    #[error("Product {0} is not in the cart")]
    NotInCart(ProductId),

    /// Requested quantity exceeds available stock.
    #[error("Requested {requested} of product {id}, only {available} in stock")]
    OutOfStock {
        id: ProductId,
        requested: u32,
        available: u32,
    },
}

// =============================================================================
// CartService
// =============================================================================

/// The cart state container.
///
/// Cheaply cloneable via `Arc`; all clones share one cart.
#[derive(Clone)]
pub struct CartService {
    inner: Arc<CartServiceInner>,
}

struct CartServiceInner {
    catalog: CatalogClient,
    store: CartStore,
    items: Mutex<Vec<CartItem>>,
}

impl CartService {
    /// Create a cart service seeded from the persistent store.
    #[must_use]
    pub fn new(catalog: CatalogClient, store: CartStore) -> Self {
        let items = store.load();
        Self {
            inner: Arc::new(CartServiceInner {
                catalog,
                store,
                items: Mutex::new(items),
            }),
        }
    }

    /// Current cart contents, in insertion order.
    pub async fn items(&self) -> Vec<CartItem> {
        self.inner.items.lock().await.clone()
    }

    /// Total quantity held across all cart items.
    pub async fn total_quantity(&self) -> u32 {
        self.inner.items.lock().await.iter().map(|i| i.amount).sum()
    }

    /// Add one unit of a product to the cart.
    ///
    /// If the product is already in the cart this is equivalent to
    /// [`CartService::update_amount`] with the current amount plus one,
    /// including the stock guard. Otherwise the product is fetched from the
    /// catalog and appended with amount 1.
    ///
    /// # Errors
    ///
    /// Returns `CartError` on lookup or persistence failure, or when the
    /// incremented amount would exceed available stock. The cart is left
    /// unchanged on every error path.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_product(&self, product_id: ProductId) -> Result<(), CartError> {
        let mut items = self.inner.items.lock().await;

        if let Some(current) = items.iter().find(|i| i.id == product_id).map(|i| i.amount) {
            return self.set_amount(&mut items, product_id, current + 1).await;
        }

        let product = self.inner.catalog.get_product(product_id).await?;
        items.push(CartItem::new(product, 1));
        self.persist(&items)?;
        Ok(())
    }

    /// Remove a product from the cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NotInCart`] when the product is absent - removal
    /// of a missing item is an error here, not a no-op.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove_product(&self, product_id: ProductId) -> Result<(), CartError> {
        let mut items = self.inner.items.lock().await;

        let index = items
            .iter()
            .position(|i| i.id == product_id)
            .ok_or(CartError::NotInCart(product_id))?;
        items.remove(index);
        self.persist(&items)?;
        Ok(())
    }

    /// Set the held quantity for a product.
    ///
    /// An amount below 1 is a silent no-op, as is a product id that is not in
    /// the cart. The current stock level is fetched first; amounts above it
    /// are rejected without mutating.
    ///
    /// # Errors
    ///
    /// Returns `CartError` on lookup or persistence failure, or when the
    /// requested amount exceeds available stock.
    #[instrument(skip(self), fields(product_id = %product_id, amount))]
    pub async fn update_amount(&self, product_id: ProductId, amount: u32) -> Result<(), CartError> {
        if amount < 1 {
            return Ok(());
        }

        let mut items = self.inner.items.lock().await;
        self.set_amount(&mut items, product_id, amount).await
    }

    /// Stock-guarded quantity write. The caller holds the cart lock.
    async fn set_amount(
        &self,
        items: &mut [CartItem],
        product_id: ProductId,
        amount: u32,
    ) -> Result<(), CartError> {
        let stock = self.inner.catalog.get_stock(product_id).await?;

        if amount > stock.amount {
            return Err(CartError::OutOfStock {
                id: product_id,
                requested: amount,
                available: stock.amount,
            });
        }

        if let Some(item) = items.iter_mut().find(|i| i.id == product_id) {
            item.amount = amount;
            self.persist(items)?;
        }
        Ok(())
    }

    fn persist(&self, items: &[CartItem]) -> Result<(), CartError> {
        self.inner.store.save(items)?;
        Ok(())
    }
}
