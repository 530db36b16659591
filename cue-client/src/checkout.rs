//! Checkout: close a running session into an immutable transaction

use chrono::{DateTime, Utc};
use uuid::Uuid;

use shared::{RateTable, Table, Transaction, TransactionStatus};

use crate::{billing, ledger};

/// New receipt id, e.g. "#TX-9F86D081"
pub fn transaction_id() -> String {
    let uuid = Uuid::new_v4().simple().to_string();
    format!("#TX-{}", uuid[..8].to_uppercase())
}

/// Build the final bill for a running session
///
/// The resulting transaction owns deep copies of everything it reports, so
/// resetting the table or editing the menu afterwards cannot change it.
/// Prepaid balances are informational and are never deducted here.
pub fn build_transaction(table: &Table, rates: &RateTable, now: DateTime<Utc>) -> Transaction {
    assert!(
        table.is_playing(),
        "checkout on table {} in state {:?}",
        table.id,
        table.status
    );
    let start = table
        .start_time
        .unwrap_or_else(|| panic!("checkout on table {} without a start time", table.id));

    let minutes = billing::elapsed_minutes(start, now);
    let table_fee = billing::table_fee(rates, table.table_type, minutes);
    let service_fee = ledger::service_fee_total(&table.orders);

    Transaction {
        id: transaction_id(),
        table_name: table.name.clone(),
        start_time: start,
        end_time: now,
        duration: billing::duration_label(minutes),
        table_fee,
        service_fee,
        orders: table.orders.clone(),
        total: table_fee + service_fee,
        status: TransactionStatus::Paid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use shared::{OrderLine, TableStatus, TableType};

    fn rates() -> RateTable {
        RateTable {
            pool: 60000,
            carom: 50000,
            snooker: 80000,
            vip: 120000,
            billing_block: 15,
        }
    }

    fn playing_table(started_minutes_ago: i64, now: DateTime<Utc>) -> Table {
        let mut table = Table::new("05", "Bàn 05", TableType::Pool);
        table.status = TableStatus::Playing;
        table.start_time = Some(now - Duration::minutes(started_minutes_ago));
        table
    }

    #[test]
    fn test_transaction_id_format() {
        let id = transaction_id();
        assert!(id.starts_with("#TX-"));
        assert_eq!(id.len(), 12);
        assert!(
            id[4..]
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
        );

        // v4 ids should essentially never collide
        assert_ne!(transaction_id(), transaction_id());
    }

    #[test]
    fn test_build_transaction_totals() {
        let now = Utc::now();
        let mut table = playing_table(84, now);
        table.orders = vec![
            OrderLine {
                id: "line-1".to_string(),
                item_id: "1".to_string(),
                name: "Sting Dâu".to_string(),
                quantity: 2,
                price: 15000,
            },
            OrderLine {
                id: "line-2".to_string(),
                item_id: "3".to_string(),
                name: "Mì Trứng".to_string(),
                quantity: 1,
                price: 35000,
            },
        ];

        let tx = build_transaction(&table, &rates(), now);

        // 84 minutes at 15-minute blocks = 6 blocks of 15000
        assert_eq!(tx.table_fee, 90000);
        assert_eq!(tx.service_fee, 65000);
        assert_eq!(tx.total, 155000);
        assert_eq!(tx.duration, "1h 24m");
        assert_eq!(tx.table_name, "Bàn 05");
        assert_eq!(tx.status, TransactionStatus::Paid);
        assert_eq!(tx.end_time, now);
    }

    #[test]
    fn test_transaction_snapshot_is_independent() {
        let now = Utc::now();
        let mut table = playing_table(10, now);
        table.orders = vec![OrderLine {
            id: "line-1".to_string(),
            item_id: "1".to_string(),
            name: "Sting Dâu".to_string(),
            quantity: 2,
            price: 15000,
        }];

        let tx = build_transaction(&table, &rates(), now);

        // Wiping the table afterwards must not touch the receipt
        table.orders.clear();
        table.start_time = None;

        assert_eq!(tx.orders.len(), 1);
        assert_eq!(tx.orders[0].quantity, 2);
        assert_eq!(tx.service_fee, 30000);
    }

    #[test]
    fn test_prepaid_balance_is_not_deducted() {
        let now = Utc::now();
        let mut table = playing_table(30, now);
        table.prepaid_amount = Some(50000);

        let tx = build_transaction(&table, &rates(), now);

        // 30 minutes = 2 blocks of 15000, prepaid untouched
        assert_eq!(tx.table_fee, 30000);
        assert_eq!(tx.total, 30000);
    }

    #[test]
    #[should_panic(expected = "checkout on table 05")]
    fn test_checkout_requires_running_session() {
        let now = Utc::now();
        let mut table = playing_table(10, now);
        table.status = TableStatus::Empty;
        build_transaction(&table, &rates(), now);
    }
}
