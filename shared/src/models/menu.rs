//! Menu Item Model

use serde::{Deserialize, Serialize};

/// Menu category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MenuCategory {
    Drink,
    Food,
    Other,
}

/// Stock status (wire strings carry spaces, matching the stored blobs)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockStatus {
    #[serde(rename = "In Stock")]
    InStock,
    #[serde(rename = "Low Stock")]
    LowStock,
    #[serde(rename = "Out of Stock")]
    OutOfStock,
}

/// Menu item entity (菜单项)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    /// Unit price (đ)
    pub price: i64,
    pub category: MenuCategory,
    pub status: StockStatus,
    #[serde(default)]
    pub image: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_status_wire_strings() {
        assert_eq!(
            serde_json::to_string(&StockStatus::InStock).unwrap(),
            "\"In Stock\""
        );
        assert_eq!(
            serde_json::to_string(&StockStatus::OutOfStock).unwrap(),
            "\"Out of Stock\""
        );
        let parsed: StockStatus = serde_json::from_str("\"Low Stock\"").unwrap();
        assert_eq!(parsed, StockStatus::LowStock);
    }

    #[test]
    fn test_deserialize_seed_shape() {
        let json = r#"{
            "id": "1",
            "name": "Sting Dâu",
            "price": 15000,
            "category": "Drink",
            "status": "In Stock",
            "image": "https://picsum.photos/seed/sting/200"
        }"#;
        let item: MenuItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.category, MenuCategory::Drink);
        assert_eq!(item.price, 15000);
    }
}
