//! `smartstock-inventory` — the inventory and ledger data model.
//!
//! Pure types only: inventory records, transaction records, and the stock
//! status derivation. The quantity invariant (`quantity >= 0`) is
//! enforced by the ledger engine in `smartstock-ledger`; nothing else may
//! write quantities.

pub mod record;
pub mod transaction;

pub use record::{InventoryPatch, InventoryRecord, StockStatus};
pub use transaction::{NewTransaction, TransactionKind, TransactionMeta, TransactionRecord};
