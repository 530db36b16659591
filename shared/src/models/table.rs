//! Billiard Table Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::order::OrderLine;

/// Table occupancy status (会话状态机的四个状态)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableStatus {
    /// Idle, available to open or book
    Empty,
    /// Session running, billing active
    Playing,
    /// Reserved, not billing
    Booked,
    /// Unavailable
    Maintenance,
}

/// Table category, determines the hourly rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TableType {
    Pool,
    Carom,
    Snooker,
    #[serde(rename = "VIP")]
    Vip,
}

/// Billiard table entity (台球桌)
///
/// Session fields are status-dependent: `start_time` is present iff PLAYING,
/// the three booking fields are present iff BOOKED, `prepaid_amount` only on
/// prepaid PLAYING sessions. Exactly one of those groups holds at any time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub id: String,
    pub name: String,
    pub status: TableStatus,
    #[serde(rename = "type")]
    pub table_type: TableType,
    /// When billing began, present iff status = PLAYING
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    /// Open tab, cleared on every transition to EMPTY
    #[serde(default)]
    pub orders: Vec<OrderLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Reservation time as entered by the operator, e.g. "19:30"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booked_time: Option<String>,
    /// Prepaid funds (đ) for the current session, display/countdown only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prepaid_amount: Option<i64>,
}

impl Table {
    /// Create an EMPTY table with no session state
    pub fn new(id: impl Into<String>, name: impl Into<String>, table_type: TableType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status: TableStatus::Empty,
            table_type,
            start_time: None,
            orders: Vec::new(),
            customer_name: None,
            phone: None,
            booked_time: None,
            prepaid_amount: None,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.status == TableStatus::Playing
    }
}
