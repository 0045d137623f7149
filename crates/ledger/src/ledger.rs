//! Read and append surface over the transaction table.
//!
//! Deliberately narrow: there is no update or delete. Undoing a mistake
//! means appending a compensating adjustment through the engine, never
//! rewriting history.

use std::sync::Arc;

use smartstock_core::ProductId;
use smartstock_inventory::{NewTransaction, TransactionRecord};
use smartstock_store::StockStore;

use crate::engine::LedgerResult;

/// Append-only view of the durable transaction ledger.
pub struct TransactionLedger<S: StockStore> {
    store: Arc<S>,
}

impl<S: StockStore> TransactionLedger<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Durably append one entry; the store assigns the identifier.
    pub fn append(&self, new: NewTransaction) -> LedgerResult<TransactionRecord> {
        Ok(self.store.append_transaction(new)?)
    }

    /// The `limit` most recent entries, newest first.
    pub fn recent(&self, limit: usize) -> LedgerResult<Vec<TransactionRecord>> {
        Ok(self.store.recent_transactions(limit)?)
    }

    /// Full ordered history for one product, oldest first.
    pub fn for_product(&self, product_id: &ProductId) -> LedgerResult<Vec<TransactionRecord>> {
        Ok(self.store.transactions_for_product(product_id)?)
    }

    /// Fold a product's history from the first entry's before-quantity
    /// through every delta.
    ///
    /// Returns the replayed final quantity, `None` when the history is
    /// empty or does not chain (an entry's before-quantity disagrees
    /// with the running value, or an entry's own arithmetic is off) —
    /// the signal that reconciliation is needed.
    pub fn replay_quantity(&self, product_id: &ProductId) -> LedgerResult<Option<i64>> {
        let entries = self.for_product(product_id)?;
        let Some(first) = entries.first() else {
            return Ok(None);
        };

        let mut quantity = first.before_quantity;
        for entry in &entries {
            if entry.before_quantity != quantity || !entry.is_balanced() {
                return Ok(None);
            }
            quantity = entry.after_quantity;
        }
        Ok(Some(quantity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use smartstock_inventory::TransactionKind;
    use smartstock_store::MemoryStore;

    fn entry(product_id: ProductId, kind: TransactionKind, q: i64, before: i64, after: i64) -> NewTransaction {
        NewTransaction {
            product_id,
            kind,
            quantity: q,
            before_quantity: before,
            after_quantity: after,
            occurred_at: Utc::now(),
            note: None,
            reference: None,
            operator: None,
        }
    }

    #[test]
    fn append_assigns_identifiers_and_recent_orders_newest_first() {
        let ledger = TransactionLedger::new(Arc::new(MemoryStore::new()));
        let product_id = ProductId::new();

        let a = ledger
            .append(entry(product_id, TransactionKind::StockIn, 10, 0, 10))
            .unwrap();
        let b = ledger
            .append(entry(product_id, TransactionKind::StockOut, 4, 10, 6))
            .unwrap();
        assert_ne!(a.id, b.id);

        let recent = ledger.recent(1).unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].id, b.id);
    }

    #[test]
    fn replay_folds_a_chained_history() {
        let ledger = TransactionLedger::new(Arc::new(MemoryStore::new()));
        let product_id = ProductId::new();

        ledger
            .append(entry(product_id, TransactionKind::StockIn, 10, 0, 10))
            .unwrap();
        ledger
            .append(entry(product_id, TransactionKind::StockOut, 3, 10, 7))
            .unwrap();
        ledger
            .append(entry(product_id, TransactionKind::Adjustment, 4, 7, 4))
            .unwrap();

        assert_eq!(ledger.replay_quantity(&product_id).unwrap(), Some(4));
    }

    #[test]
    fn replay_flags_a_broken_chain() {
        let ledger = TransactionLedger::new(Arc::new(MemoryStore::new()));
        let product_id = ProductId::new();

        ledger
            .append(entry(product_id, TransactionKind::StockIn, 10, 0, 10))
            .unwrap();
        // An entry whose before-quantity skips ahead.
        ledger
            .append(entry(product_id, TransactionKind::StockOut, 2, 12, 10))
            .unwrap();

        assert_eq!(ledger.replay_quantity(&product_id).unwrap(), None);
        assert_eq!(ledger.replay_quantity(&ProductId::new()).unwrap(), None);
    }
}
