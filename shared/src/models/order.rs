//! Order Line Model

use serde::{Deserialize, Serialize};

/// One line on a table's open tab (一桌一单，按菜品合并)
///
/// `name` and `price` are snapshotted from the menu item at add-time; later
/// menu edits do not affect open tabs or recorded transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    /// Unique within the owning table
    pub id: String,
    /// Menu item this line was created from
    pub item_id: String,
    pub name: String,
    pub quantity: i32,
    /// Unit price (đ) at add-time
    pub price: i64,
}

impl OrderLine {
    /// Line subtotal: unit price times quantity
    pub fn subtotal(&self) -> i64 {
        self.price * self.quantity as i64
    }
}
