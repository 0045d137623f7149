//! The ledger engine: the single authority for quantity changes.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use chrono::Utc;
use thiserror::Error;

use smartstock_core::{ProductId, TransactionId};
use smartstock_inventory::{
    InventoryPatch, InventoryRecord, NewTransaction, TransactionKind, TransactionMeta,
};
use smartstock_store::{StockStore, StoreError};

use crate::state::InventoryState;

pub type LedgerResult<T> = Result<T, LedgerError>;

/// Failure of a ledger engine operation.
///
/// `NotFound`, `InsufficientStock` and `Validation` are recoverable user
/// conditions and are surfaced verbatim. `Storage` is retryable.
/// `InconsistentWrite` must never be retried blindly — the appended
/// ledger entry is orphaned and needs reconciliation.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("no inventory record for product {0}")]
    NotFound(ProductId),

    #[error("insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: i64, available: i64 },

    #[error("validation failed: {0}")]
    Validation(String),

    #[error(
        "ledger entry {transaction_id} committed without inventory update \
         (product {product_id}: {before} -> {after})"
    )]
    InconsistentWrite {
        transaction_id: TransactionId,
        product_id: ProductId,
        before: i64,
        after: i64,
    },

    #[error(transparent)]
    Storage(#[from] StoreError),
}

/// Result of a committed stock change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockChange {
    pub transaction_id: TransactionId,
    pub new_quantity: i64,
}

/// Optional initial fields for a newly provisioned inventory record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProvisionRequest {
    pub unit: Option<String>,
    pub location: Option<String>,
    pub min_quantity: Option<i64>,
    pub cost_price: Option<u64>,
    pub selling_price: Option<u64>,
}

/// Orchestrates stock-in, stock-out and adjustment operations against a
/// [`StockStore`], keeping an [`InventoryState`] cache consistent with
/// what was durably written.
///
/// Operations against the same product are serialized internally;
/// operations against different products proceed independently. Reads
/// never block writers.
pub struct LedgerEngine<S: StockStore> {
    store: Arc<S>,
    state: RwLock<InventoryState>,
    locks: Mutex<HashMap<ProductId, Arc<Mutex<()>>>>,
}

impl<S: StockStore> LedgerEngine<S> {
    /// Engine with an empty cache; call [`reload`](Self::reload) to
    /// populate it from the store.
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            state: RwLock::new(InventoryState::new()),
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Replace the cache with the store's current inventory table.
    pub fn reload(&self) -> LedgerResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|_| StoreError::Unavailable("state lock poisoned".to_string()))?;
        state.load(self.store.as_ref())?;
        Ok(())
    }

    /// Cached record for a product; never reloads.
    pub fn cached(&self, product_id: &ProductId) -> Option<InventoryRecord> {
        self.state.read().ok()?.get(product_id).cloned()
    }

    /// Run `f` against a read snapshot of the cache.
    pub fn with_state<R>(&self, f: impl FnOnce(&InventoryState) -> R) -> R {
        match self.state.read() {
            Ok(state) => f(&state),
            Err(poisoned) => f(&poisoned.into_inner()),
        }
    }

    /// Create a zero-quantity inventory record for a product that has
    /// none yet.
    ///
    /// Stock-in against an unprovisioned product is a precondition
    /// failure, not an implicit creation; this is the explicit
    /// provisioning step. The record starts at zero so that every
    /// nonzero quantity is explained by the ledger.
    pub fn provision(
        &self,
        product_id: ProductId,
        request: ProvisionRequest,
    ) -> LedgerResult<InventoryRecord> {
        let lock = self.product_lock(product_id);
        let _serialized = hold(&lock);

        if self.store.product(&product_id)?.is_none() {
            return Err(LedgerError::NotFound(product_id));
        }

        let mut record = InventoryRecord::new(product_id);
        record.unit = request.unit;
        record.location = request.location;
        record.min_quantity = request.min_quantity;
        record.cost_price = request.cost_price;
        record.selling_price = request.selling_price;

        self.store
            .add_inventory(record.clone())
            .map_err(|e| match e {
                StoreError::Conflict(msg) => LedgerError::Validation(msg),
                other => LedgerError::Storage(other),
            })?;

        if let Ok(mut state) = self.state.write() {
            state.insert(record.clone());
        }

        tracing::info!("provisioned inventory {} for product {}", record.id, product_id);
        Ok(record)
    }

    /// Increase stock by a positive `quantity`.
    pub fn stock_in(
        &self,
        product_id: ProductId,
        quantity: i64,
        meta: TransactionMeta,
    ) -> LedgerResult<StockChange> {
        self.execute(product_id, TransactionKind::StockIn, quantity, meta)
    }

    /// Decrease stock by a positive `quantity`. Rejected in full when the
    /// result would be negative; no partial deduction occurs.
    pub fn stock_out(
        &self,
        product_id: ProductId,
        quantity: i64,
        meta: TransactionMeta,
    ) -> LedgerResult<StockChange> {
        self.execute(product_id, TransactionKind::StockOut, quantity, meta)
    }

    /// Set stock to an absolute non-negative `target`.
    pub fn adjust(
        &self,
        product_id: ProductId,
        target: i64,
        meta: TransactionMeta,
    ) -> LedgerResult<StockChange> {
        self.execute(product_id, TransactionKind::Adjustment, target, meta)
    }

    fn execute(
        &self,
        product_id: ProductId,
        kind: TransactionKind,
        quantity: i64,
        meta: TransactionMeta,
    ) -> LedgerResult<StockChange> {
        match kind {
            TransactionKind::StockIn | TransactionKind::StockOut if quantity <= 0 => {
                return Err(LedgerError::Validation(format!(
                    "{kind} quantity must be positive, got {quantity}"
                )));
            }
            TransactionKind::Adjustment if quantity < 0 => {
                return Err(LedgerError::Validation(format!(
                    "adjustment target cannot be negative, got {quantity}"
                )));
            }
            _ => {}
        }

        // Serialize steps 1-5 per product: two racing stock-outs reading
        // the same before_quantity would break the non-negativity
        // invariant.
        let lock = self.product_lock(product_id);
        let _serialized = hold(&lock);

        // Resolve from the store, not the cache.
        let record = self
            .store
            .inventory_by_product(&product_id)?
            .ok_or(LedgerError::NotFound(product_id))?;
        let before = record.quantity;

        let after = match kind {
            TransactionKind::StockIn => before + quantity,
            TransactionKind::StockOut => {
                let after = before - quantity;
                if after < 0 {
                    return Err(LedgerError::InsufficientStock {
                        requested: quantity,
                        available: before,
                    });
                }
                after
            }
            TransactionKind::Adjustment => quantity,
        };

        let now = Utc::now();
        let new = NewTransaction {
            product_id,
            kind,
            quantity,
            before_quantity: before,
            after_quantity: after,
            occurred_at: now,
            note: meta.note,
            reference: meta.reference,
            operator: meta.operator,
        };

        let committed = match self.store.commit_stock_change(new, record.id) {
            Ok(committed) => committed,
            Err(StoreError::Inconsistent { transaction_id, .. }) => {
                tracing::error!(
                    "ledger entry {} for product {} orphaned: inventory update failed ({} -> {})",
                    transaction_id,
                    product_id,
                    before,
                    after
                );
                return Err(LedgerError::InconsistentWrite {
                    transaction_id,
                    product_id,
                    before,
                    after,
                });
            }
            Err(other) => return Err(other.into()),
        };

        match self.state.write() {
            Ok(mut state) => state.apply_update(record.id, InventoryPatch::stock_change(after, now)),
            Err(_) => {
                tracing::warn!("skipped cache update for product {product_id}: state lock poisoned");
            }
        }

        tracing::info!(
            "{} committed for product {}: {} -> {} (txn {})",
            kind,
            product_id,
            before,
            after,
            committed.id
        );

        Ok(StockChange {
            transaction_id: committed.id,
            new_quantity: after,
        })
    }

    fn product_lock(&self, product_id: ProductId) -> Arc<Mutex<()>> {
        let mut locks = match self.locks.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        locks.entry(product_id).or_default().clone()
    }
}

fn hold(lock: &Mutex<()>) -> MutexGuard<'_, ()> {
    lock.lock().unwrap_or_else(PoisonError::into_inner)
}
