//! `smartstock-store` — the record store seam and its in-memory
//! reference implementation.
//!
//! The ledger engine consumes storage through the [`StockStore`] trait;
//! it never reaches into a concrete backend. [`MemoryStore`] keeps the
//! five tables (products, inventory, transactions, categories, settings)
//! behind one `RwLock`, which makes the stock-change commit and snapshot
//! restore genuinely all-or-nothing.

pub mod backup;
pub mod memory;
pub mod tables;

pub use backup::Snapshot;
pub use memory::MemoryStore;
pub use tables::{Setting, StockStore, StoreError, StoreResult};
