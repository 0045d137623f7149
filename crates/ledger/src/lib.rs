//! `smartstock-ledger` — the inventory ledger engine.
//!
//! The single authority for changing inventory quantities. Every change
//! is explained by exactly one durable, ordered transaction record;
//! derived views are recomputed from the in-memory state and the catalog
//! on demand.

pub mod demo;
pub mod engine;
pub mod ledger;
pub mod state;
pub mod views;

pub use engine::{LedgerEngine, LedgerError, LedgerResult, ProvisionRequest, StockChange};
pub use ledger::TransactionLedger;
pub use state::InventoryState;
pub use views::{InventoryRow, ViewBuilder};
