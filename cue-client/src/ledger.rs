//! Order ledger for a running session
//!
//! Lines snapshot the menu item's name and price at the moment they are
//! added, so later menu edits never change what an open table owes.

use shared::{MenuItem, OrderLine, StockStatus};
use uuid::Uuid;

use crate::error::{ClientError, ClientResult};

/// Add one unit of a menu item to the ledger
///
/// An existing line for the same item is bumped by one; otherwise a new
/// line is appended with the item's current name and price. Items that are
/// out of stock are rejected.
pub fn add_item(orders: &[OrderLine], item: &MenuItem) -> ClientResult<Vec<OrderLine>> {
    if item.status == StockStatus::OutOfStock {
        return Err(ClientError::Validation(format!(
            "{} is out of stock",
            item.name
        )));
    }

    let mut next = orders.to_vec();
    match next.iter_mut().find(|line| line.item_id == item.id) {
        Some(line) => line.quantity += 1,
        None => next.push(OrderLine {
            id: Uuid::new_v4().simple().to_string(),
            item_id: item.id.clone(),
            name: item.name.clone(),
            quantity: 1,
            price: item.price,
        }),
    }
    Ok(next)
}

/// Change a line's quantity by `delta`, removing the line at zero
///
/// The quantity never goes negative; a large negative delta simply removes
/// the line.
pub fn adjust_quantity(
    orders: &[OrderLine],
    line_id: &str,
    delta: i32,
) -> ClientResult<Vec<OrderLine>> {
    if !orders.iter().any(|line| line.id == line_id) {
        return Err(ClientError::NotFound(format!("Order line {}", line_id)));
    }

    let next = orders
        .iter()
        .filter_map(|line| {
            if line.id != line_id {
                return Some(line.clone());
            }
            let quantity = (line.quantity + delta).max(0);
            if quantity == 0 {
                None
            } else {
                let mut updated = line.clone();
                updated.quantity = quantity;
                Some(updated)
            }
        })
        .collect();
    Ok(next)
}

/// Remove a line outright
pub fn remove_line(orders: &[OrderLine], line_id: &str) -> ClientResult<Vec<OrderLine>> {
    if !orders.iter().any(|line| line.id == line_id) {
        return Err(ClientError::NotFound(format!("Order line {}", line_id)));
    }
    Ok(orders
        .iter()
        .filter(|line| line.id != line_id)
        .cloned()
        .collect())
}

/// Sum of `price * quantity` across all lines
pub fn service_fee_total(orders: &[OrderLine]) -> i64 {
    orders.iter().map(|line| line.subtotal()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::MenuCategory;

    fn menu_item(id: &str, name: &str, price: i64, status: StockStatus) -> MenuItem {
        MenuItem {
            id: id.to_string(),
            name: name.to_string(),
            price,
            category: MenuCategory::Drink,
            status,
            image: String::new(),
        }
    }

    #[test]
    fn test_add_item_merges_by_item_id() {
        let sting = menu_item("1", "Sting Dâu", 15000, StockStatus::InStock);

        let orders = add_item(&[], &sting).unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].quantity, 1);

        let orders = add_item(&orders, &sting).unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].quantity, 2);
        assert_eq!(orders[0].price, 15000);
    }

    #[test]
    fn test_add_item_snapshots_price_at_add_time() {
        let mut sting = menu_item("1", "Sting Dâu", 15000, StockStatus::InStock);
        let orders = add_item(&[], &sting).unwrap();

        // The menu item gets repriced afterwards
        sting.price = 99000;
        assert_eq!(orders[0].price, 15000);
        assert_eq!(service_fee_total(&orders), 15000);
    }

    #[test]
    fn test_add_item_rejects_out_of_stock() {
        let gone = menu_item("9", "Mì Trứng", 35000, StockStatus::OutOfStock);
        let result = add_item(&[], &gone);
        assert!(matches!(result, Err(ClientError::Validation(_))));
    }

    #[test]
    fn test_add_item_allows_low_stock() {
        let low = menu_item("2", "Bò Húc", 20000, StockStatus::LowStock);
        let orders = add_item(&[], &low).unwrap();
        assert_eq!(orders.len(), 1);
    }

    #[test]
    fn test_adjust_quantity_clamps_and_removes_at_zero() {
        let sting = menu_item("1", "Sting Dâu", 15000, StockStatus::InStock);
        let orders = add_item(&[], &sting).unwrap();
        let orders = add_item(&orders, &sting).unwrap();
        let line_id = orders[0].id.clone();

        let orders = adjust_quantity(&orders, &line_id, 3).unwrap();
        assert_eq!(orders[0].quantity, 5);

        // Large negative delta clamps to zero and removes the line
        let orders = adjust_quantity(&orders, &line_id, -10).unwrap();
        assert!(orders.is_empty());
    }

    #[test]
    fn test_adjust_quantity_unknown_line() {
        let result = adjust_quantity(&[], "missing", 1);
        assert!(matches!(result, Err(ClientError::NotFound(_))));
    }

    #[test]
    fn test_remove_line() {
        let sting = menu_item("1", "Sting Dâu", 15000, StockStatus::InStock);
        let noodle = menu_item("3", "Mì Trứng", 35000, StockStatus::InStock);
        let orders = add_item(&[], &sting).unwrap();
        let orders = add_item(&orders, &noodle).unwrap();

        let removed = remove_line(&orders, &orders[0].id).unwrap();
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].name, "Mì Trứng");

        assert!(matches!(
            remove_line(&removed, "missing"),
            Err(ClientError::NotFound(_))
        ));
    }

    #[test]
    fn test_service_fee_total() {
        let sting = menu_item("1", "Sting Dâu", 15000, StockStatus::InStock);
        let noodle = menu_item("3", "Mì Trứng", 35000, StockStatus::InStock);
        let orders = add_item(&[], &sting).unwrap();
        let orders = add_item(&orders, &sting).unwrap();
        let orders = add_item(&orders, &noodle).unwrap();

        assert_eq!(service_fee_total(&orders), 2 * 15000 + 35000);
        assert_eq!(service_fee_total(&[]), 0);
    }
}
