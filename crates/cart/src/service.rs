//! Cart state container.

use std::sync::Arc;

use cart_store::{CartStore, DEFAULT_STORAGE_KEY};
use common::ProductId;
use tokio::sync::{Mutex, RwLock};

use crate::commands::UpdateItemAmount;
use crate::error::CartError;
use crate::notification::{CartOperation, NotificationSink, notification_message};
use crate::services::CatalogClient;
use crate::state::CartState;

/// Shared handle to the in-memory cart.
pub type CartHandle = Arc<RwLock<CartState>>;

/// Owns the session's cart and is the only writer of its durable copy.
///
/// Each mutation runs in two phases. Validation reads a snapshot of the
/// cart, queries the catalog, and produces the next state without touching
/// anything shared. Commit then publishes that state to memory and writes it
/// to the store. A rejected mutation changes neither.
///
/// Commits are serialized by their own lock. The state lock is only held
/// long enough to swap the cart, so readers never wait on the store.
///
/// Failures are returned to the caller and also reported once through the
/// notification sink.
pub struct CartService<C, S, N>
where
    C: CatalogClient,
    S: CartStore,
    N: NotificationSink,
{
    catalog: C,
    store: S,
    notifier: N,
    state: CartHandle,
    commit_lock: Mutex<()>,
    storage_key: String,
}

impl<C, S, N> CartService<C, S, N>
where
    C: CatalogClient,
    S: CartStore,
    N: NotificationSink,
{
    /// Creates a service over an empty cart stored under [`DEFAULT_STORAGE_KEY`].
    ///
    /// Nothing is read from the store; use [`CartService::load`] to resume a
    /// persisted cart.
    pub fn new(catalog: C, store: S, notifier: N) -> Self {
        Self::with_state(
            catalog,
            store,
            notifier,
            Arc::new(RwLock::new(CartState::new())),
            DEFAULT_STORAGE_KEY,
        )
    }

    /// Creates a service over an existing state handle.
    pub fn with_state(
        catalog: C,
        store: S,
        notifier: N,
        state: CartHandle,
        storage_key: impl Into<String>,
    ) -> Self {
        Self {
            catalog,
            store,
            notifier,
            state,
            commit_lock: Mutex::new(()),
            storage_key: storage_key.into(),
        }
    }

    /// Creates a service, resuming the cart persisted under `storage_key`.
    ///
    /// A missing entry starts an empty cart. An entry that no longer decodes
    /// is logged and replaced by an empty cart on the next commit. Failing to
    /// read the store at all is returned as a transport failure.
    #[tracing::instrument(skip(catalog, store, notifier, storage_key))]
    pub async fn load(
        catalog: C,
        store: S,
        notifier: N,
        storage_key: impl Into<String>,
    ) -> Result<Self, CartError> {
        let storage_key = storage_key.into();

        let state = match store.read(&storage_key).await? {
            Some(document) => CartState::from_json(&document).unwrap_or_else(|error| {
                tracing::warn!(key = %storage_key, %error, "discarding undecodable cart entry");
                CartState::new()
            }),
            None => CartState::new(),
        };
        tracing::info!(key = %storage_key, items = state.len(), "cart loaded");

        Ok(Self::with_state(
            catalog,
            store,
            notifier,
            Arc::new(RwLock::new(state)),
            storage_key,
        ))
    }

    /// Returns the key the cart is persisted under.
    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Returns a snapshot of the current cart.
    pub async fn cart(&self) -> CartState {
        self.state.read().await.clone()
    }

    /// Returns the number of distinct products in the cart.
    pub async fn item_count(&self) -> usize {
        self.state.read().await.len()
    }

    /// Returns the amount of `product_id` in the cart, or 0.
    pub async fn amount_of(&self, product_id: ProductId) -> u32 {
        self.state.read().await.amount_of(product_id)
    }

    /// Adds one unit of `product_id`.
    ///
    /// An item already in the cart is incremented in place; a new product is
    /// fetched from the catalog and appended with amount 1. Fails with
    /// `InsufficientStock` if the catalog holds fewer units than the cart
    /// would after the add.
    #[tracing::instrument(skip(self))]
    pub async fn add_item(&self, product_id: ProductId) -> Result<CartState, CartError> {
        let result = self.try_add_item(product_id).await;
        self.settle(CartOperation::AddItem, result)
    }

    /// Removes the item for `product_id`.
    ///
    /// Needs no catalog access; fails with `ItemNotFound` if the product is
    /// not in the cart.
    #[tracing::instrument(skip(self))]
    pub async fn remove_item(&self, product_id: ProductId) -> Result<CartState, CartError> {
        let result = self.try_remove_item(product_id).await;
        self.settle(CartOperation::RemoveItem, result)
    }

    /// Sets an item's amount to an absolute value.
    ///
    /// Never removes: amounts of 0 or below fail with `InvalidAmount`.
    #[tracing::instrument(skip(self))]
    pub async fn set_item_amount(&self, cmd: UpdateItemAmount) -> Result<CartState, CartError> {
        let result = self.try_set_item_amount(cmd).await;
        self.settle(CartOperation::SetItemAmount, result)
    }

    async fn try_add_item(&self, product_id: ProductId) -> Result<CartState, CartError> {
        let current = self.cart().await;
        let next = self.validate_add(&current, product_id).await?;
        self.commit(next).await
    }

    async fn try_remove_item(&self, product_id: ProductId) -> Result<CartState, CartError> {
        let current = self.cart().await;
        let index = current
            .position(product_id)
            .ok_or(CartError::ItemNotFound { product_id })?;
        self.commit(current.without(index)).await
    }

    async fn try_set_item_amount(&self, cmd: UpdateItemAmount) -> Result<CartState, CartError> {
        let current = self.cart().await;
        let next = self.validate_set_amount(&current, cmd).await?;
        self.commit(next).await
    }

    async fn validate_add(
        &self,
        current: &CartState,
        product_id: ProductId,
    ) -> Result<CartState, CartError> {
        let position = current.position(product_id);
        let current_amount = current.amount_of(product_id);

        let stock = self.catalog.fetch_stock(product_id).await?;
        let requested = u64::from(current_amount) + 1;
        if u64::from(stock.amount) < requested {
            return Err(CartError::InsufficientStock {
                product_id,
                requested,
                available: stock.amount,
            });
        }

        match position {
            // requested <= stock.amount, so it fits in u32
            Some(index) => Ok(current.with_amount(index, requested as u32)),
            None => {
                let product = self.catalog.fetch_product(product_id).await?;
                Ok(current.with_appended(product))
            }
        }
    }

    async fn validate_set_amount(
        &self,
        current: &CartState,
        cmd: UpdateItemAmount,
    ) -> Result<CartState, CartError> {
        let UpdateItemAmount { product_id, amount } = cmd;

        if amount <= 0 {
            return Err(CartError::InvalidAmount { amount });
        }

        let index = current
            .position(product_id)
            .ok_or(CartError::ItemNotFound { product_id })?;

        let stock = self.catalog.fetch_stock(product_id).await?;
        let requested = amount.unsigned_abs();
        if u64::from(stock.amount) < requested {
            return Err(CartError::InsufficientStock {
                product_id,
                requested,
                available: stock.amount,
            });
        }

        Ok(current.with_amount(index, requested as u32))
    }

    /// Publishes `next` to memory, then persists it.
    ///
    /// The commit lock is held across the store write so no other commit
    /// can interleave; the state lock is released before the store is
    /// awaited. On a refused write the previous cart is put back.
    async fn commit(&self, next: CartState) -> Result<CartState, CartError> {
        let document = next.to_json()?;

        let _commit = self.commit_lock.lock().await;
        let previous = std::mem::replace(&mut *self.state.write().await, next.clone());

        if let Err(error) = self.store.write(&self.storage_key, document).await {
            *self.state.write().await = previous;
            return Err(error.into());
        }

        metrics::gauge!("cart_items").set(next.len() as f64);
        Ok(next)
    }

    fn settle(
        &self,
        operation: CartOperation,
        result: Result<CartState, CartError>,
    ) -> Result<CartState, CartError> {
        match &result {
            Ok(cart) => {
                metrics::counter!(
                    "cart_mutations_total",
                    "operation" => operation.as_str(),
                    "outcome" => "committed"
                )
                .increment(1);
                tracing::info!(%operation, items = cart.len(), "cart mutation committed");
            }
            Err(error) => {
                metrics::counter!(
                    "cart_mutations_total",
                    "operation" => operation.as_str(),
                    "outcome" => "rejected"
                )
                .increment(1);
                tracing::warn!(%operation, %error, "cart mutation rejected");
                self.notifier.report(notification_message(operation, error));
            }
        }
        result
    }
}
