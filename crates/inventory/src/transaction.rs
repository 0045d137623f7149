use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use smartstock_core::{ProductId, TransactionId};

/// Kind of a stock-affecting operation.
///
/// Wire names follow the stored schema: `in`, `out`, `adjust`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionKind {
    #[serde(rename = "in")]
    StockIn,
    #[serde(rename = "out")]
    StockOut,
    #[serde(rename = "adjust")]
    Adjustment,
}

impl core::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            TransactionKind::StockIn => "in",
            TransactionKind::StockOut => "out",
            TransactionKind::Adjustment => "adjust",
        };
        f.write_str(s)
    }
}

/// Optional context attached to a transaction by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionMeta {
    pub note: Option<String>,
    pub reference: Option<String>,
    pub operator: Option<String>,
}

impl TransactionMeta {
    pub fn note(note: impl Into<String>) -> Self {
        Self {
            note: Some(note.into()),
            ..Self::default()
        }
    }
}

/// One immutable audit entry in the transaction ledger.
///
/// `quantity` is a positive magnitude for stock-in/stock-out and the
/// absolute target for adjustments; both quantity snapshots are captured
/// at commit time. Records are never edited or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: TransactionId,
    pub product_id: ProductId,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub quantity: i64,
    pub before_quantity: i64,
    pub after_quantity: i64,
    #[serde(rename = "date")]
    pub occurred_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
}

impl TransactionRecord {
    /// Whether the snapshots satisfy the arithmetic for this kind.
    pub fn is_balanced(&self) -> bool {
        match self.kind {
            TransactionKind::StockIn => self.after_quantity == self.before_quantity + self.quantity,
            TransactionKind::StockOut => {
                self.after_quantity == self.before_quantity - self.quantity
                    && self.after_quantity >= 0
            }
            TransactionKind::Adjustment => self.after_quantity == self.quantity,
        }
    }
}

/// A transaction awaiting its identifier from the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub product_id: ProductId,
    pub kind: TransactionKind,
    pub quantity: i64,
    pub before_quantity: i64,
    pub after_quantity: i64,
    pub occurred_at: DateTime<Utc>,
    pub note: Option<String>,
    pub reference: Option<String>,
    pub operator: Option<String>,
}

impl NewTransaction {
    pub fn with_id(self, id: TransactionId) -> TransactionRecord {
        TransactionRecord {
            id,
            product_id: self.product_id,
            kind: self.kind,
            quantity: self.quantity,
            before_quantity: self.before_quantity,
            after_quantity: self.after_quantity,
            occurred_at: self.occurred_at,
            note: self.note,
            reference: self.reference,
            operator: self.operator,
        }
    }
}
