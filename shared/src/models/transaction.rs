//! Transaction Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::order::OrderLine;

/// Transaction settlement status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionStatus {
    Paid,
    Cancelled,
    Pending,
}

/// Immutable checkout record (结账交易)
///
/// Created once at checkout and never mutated; `orders` is a snapshot copy of
/// the table's tab at that moment, independent of any later table state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub table_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Human-readable session length, e.g. "1h 25m"
    pub duration: String,
    pub table_fee: i64,
    pub service_fee: i64,
    #[serde(default)]
    pub orders: Vec<OrderLine>,
    /// Always table_fee + service_fee
    pub total: i64,
    pub status: TransactionStatus,
}
