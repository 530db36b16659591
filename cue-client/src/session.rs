//! Table lifecycle: EMPTY -> PLAYING / BOOKED / MAINTENANCE
//!
//! Transitions are expressed as patches against the current table so the
//! same change can be applied to the local cache and pushed through the
//! gateway. Calling a transition from the wrong state is a caller bug and
//! panics immediately; user input problems surface as validation errors.

use chrono::{DateTime, Utc};
use validator::Validate;

use shared::{OrderLine, Table, TableStatus};

use crate::error::{ClientError, ClientResult};

/// Partial update for one table
///
/// Outer `None` leaves the field alone; for clearable fields the inner
/// `None` writes the field back to empty.
#[derive(Debug, Clone, Default)]
pub struct TableUpdate {
    pub status: Option<TableStatus>,
    pub start_time: Option<Option<DateTime<Utc>>>,
    pub orders: Option<Vec<OrderLine>>,
    pub customer_name: Option<Option<String>>,
    pub phone: Option<Option<String>>,
    pub booked_time: Option<Option<String>>,
    pub prepaid_amount: Option<Option<i64>>,
}

impl TableUpdate {
    /// Patch that only replaces the order ledger
    pub fn with_orders(orders: Vec<OrderLine>) -> Self {
        Self {
            orders: Some(orders),
            ..Self::default()
        }
    }

    /// Apply this patch to a table in place
    pub fn apply(&self, table: &mut Table) {
        if let Some(status) = self.status {
            table.status = status;
        }
        if let Some(start_time) = self.start_time {
            table.start_time = start_time;
        }
        if let Some(orders) = &self.orders {
            table.orders = orders.clone();
        }
        if let Some(customer_name) = &self.customer_name {
            table.customer_name = customer_name.clone();
        }
        if let Some(phone) = &self.phone {
            table.phone = phone.clone();
        }
        if let Some(booked_time) = &self.booked_time {
            table.booked_time = booked_time.clone();
        }
        if let Some(prepaid_amount) = self.prepaid_amount {
            table.prepaid_amount = prepaid_amount;
        }
    }
}

/// Booking form input
#[derive(Debug, Clone, Validate)]
pub struct BookingRequest {
    #[validate(length(min = 1, message = "Customer name is required"))]
    pub customer_name: String,
    #[validate(length(min = 1, message = "Phone number is required"))]
    pub phone: String,
    /// Display string, e.g. "19:30"
    #[validate(length(min = 1, message = "Booking time is required"))]
    pub booked_time: String,
}

/// EMPTY -> PLAYING: open a walk-in session
///
/// Orders and prepaid balance are cleared in case stale data survived a
/// crash; a fresh session never inherits either.
pub fn start_session(table: &Table, now: DateTime<Utc>) -> TableUpdate {
    assert!(
        table.status == TableStatus::Empty,
        "start_session on table {} in state {:?}",
        table.id,
        table.status
    );
    TableUpdate {
        status: Some(TableStatus::Playing),
        start_time: Some(Some(now)),
        orders: Some(Vec::new()),
        prepaid_amount: Some(None),
        ..TableUpdate::default()
    }
}

/// EMPTY -> PLAYING with a prepaid balance
///
/// Same as [`start_session`] but records the amount paid up front. The
/// balance drives the remaining-time countdown only; checkout never nets
/// it against the bill.
pub fn start_prepaid_session(
    table: &Table,
    now: DateTime<Utc>,
    amount: i64,
) -> ClientResult<TableUpdate> {
    assert!(
        table.status == TableStatus::Empty,
        "start_prepaid_session on table {} in state {:?}",
        table.id,
        table.status
    );
    if amount < 1 {
        return Err(ClientError::Validation(
            "Prepaid amount must be positive".to_string(),
        ));
    }
    Ok(TableUpdate {
        status: Some(TableStatus::Playing),
        start_time: Some(Some(now)),
        orders: Some(Vec::new()),
        prepaid_amount: Some(Some(amount)),
        ..TableUpdate::default()
    })
}

/// EMPTY -> BOOKED: reserve a table
pub fn book(table: &Table, request: &BookingRequest) -> ClientResult<TableUpdate> {
    assert!(
        table.status == TableStatus::Empty,
        "book on table {} in state {:?}",
        table.id,
        table.status
    );
    request
        .validate()
        .map_err(|e| ClientError::Validation(e.to_string()))?;

    Ok(TableUpdate {
        status: Some(TableStatus::Booked),
        customer_name: Some(Some(request.customer_name.clone())),
        phone: Some(Some(request.phone.clone())),
        booked_time: Some(Some(request.booked_time.clone())),
        ..TableUpdate::default()
    })
}

/// BOOKED -> PLAYING: the customer arrived
///
/// Opens a fresh session exactly like [`start_session`] and consumes the
/// booking details; once play starts the reservation is history.
pub fn check_in(table: &Table, now: DateTime<Utc>) -> TableUpdate {
    assert!(
        table.status == TableStatus::Booked,
        "check_in on table {} in state {:?}",
        table.id,
        table.status
    );
    TableUpdate {
        status: Some(TableStatus::Playing),
        start_time: Some(Some(now)),
        orders: Some(Vec::new()),
        customer_name: Some(None),
        phone: Some(None),
        booked_time: Some(None),
        prepaid_amount: Some(None),
        ..TableUpdate::default()
    }
}

/// BOOKED -> EMPTY: the booking fell through
pub fn cancel_booking(table: &Table) -> TableUpdate {
    assert!(
        table.status == TableStatus::Booked,
        "cancel_booking on table {} in state {:?}",
        table.id,
        table.status
    );
    TableUpdate {
        status: Some(TableStatus::Empty),
        customer_name: Some(None),
        phone: Some(None),
        booked_time: Some(None),
        ..TableUpdate::default()
    }
}

/// EMPTY -> MAINTENANCE: take the table out of service
pub fn set_maintenance(table: &Table) -> TableUpdate {
    assert!(
        table.status == TableStatus::Empty,
        "set_maintenance on table {} in state {:?}",
        table.id,
        table.status
    );
    TableUpdate {
        status: Some(TableStatus::Maintenance),
        ..TableUpdate::default()
    }
}

/// MAINTENANCE -> EMPTY: the table is playable again
///
/// Session leftovers are wiped too, in case the table went down mid-play
/// through a hand-edited blob.
pub fn clear_maintenance(table: &Table) -> TableUpdate {
    assert!(
        table.status == TableStatus::Maintenance,
        "clear_maintenance on table {} in state {:?}",
        table.id,
        table.status
    );
    TableUpdate {
        status: Some(TableStatus::Empty),
        start_time: Some(None),
        orders: Some(Vec::new()),
        prepaid_amount: Some(None),
        ..TableUpdate::default()
    }
}

/// PLAYING -> EMPTY: wipe all session state after checkout
pub fn reset_after_checkout(table: &Table) -> TableUpdate {
    assert!(
        table.status == TableStatus::Playing,
        "reset_after_checkout on table {} in state {:?}",
        table.id,
        table.status
    );
    TableUpdate {
        status: Some(TableStatus::Empty),
        start_time: Some(None),
        orders: Some(Vec::new()),
        customer_name: Some(None),
        phone: Some(None),
        booked_time: Some(None),
        prepaid_amount: Some(None),
        ..TableUpdate::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::TableType;

    fn empty_table() -> Table {
        Table::new("01", "Bàn 01", TableType::Pool)
    }

    fn booking() -> BookingRequest {
        BookingRequest {
            customer_name: "Anh Tuấn".to_string(),
            phone: "0901234567".to_string(),
            booked_time: "19:30".to_string(),
        }
    }

    #[test]
    fn test_start_session_patch() {
        let mut table = empty_table();
        table.prepaid_amount = Some(9000); // stale leftover
        let now = Utc::now();

        let mut updated = table.clone();
        start_session(&table, now).apply(&mut updated);

        assert_eq!(updated.status, TableStatus::Playing);
        assert_eq!(updated.start_time, Some(now));
        assert!(updated.orders.is_empty());
        assert_eq!(updated.prepaid_amount, None);
    }

    #[test]
    fn test_start_prepaid_session_records_balance() {
        let table = empty_table();
        let now = Utc::now();

        let mut updated = table.clone();
        start_prepaid_session(&table, now, 50000)
            .unwrap()
            .apply(&mut updated);

        assert_eq!(updated.status, TableStatus::Playing);
        assert_eq!(updated.start_time, Some(now));
        assert_eq!(updated.prepaid_amount, Some(50000));
    }

    #[test]
    fn test_start_prepaid_session_rejects_non_positive_amount() {
        let table = empty_table();
        assert!(matches!(
            start_prepaid_session(&table, Utc::now(), 0),
            Err(ClientError::Validation(_))
        ));
        assert!(start_prepaid_session(&table, Utc::now(), -5000).is_err());
    }

    #[test]
    #[should_panic(expected = "start_session on table 01")]
    fn test_start_session_rejects_running_table() {
        let mut table = empty_table();
        table.status = TableStatus::Playing;
        start_session(&table, Utc::now());
    }

    #[test]
    fn test_book_then_check_in_consumes_booking() {
        let table = empty_table();
        let mut booked = table.clone();
        book(&table, &booking()).unwrap().apply(&mut booked);

        assert_eq!(booked.status, TableStatus::Booked);
        assert_eq!(booked.customer_name.as_deref(), Some("Anh Tuấn"));
        assert_eq!(booked.booked_time.as_deref(), Some("19:30"));

        let now = Utc::now();
        let mut playing = booked.clone();
        check_in(&booked, now).apply(&mut playing);

        assert_eq!(playing.status, TableStatus::Playing);
        assert_eq!(playing.start_time, Some(now));
        assert_eq!(playing.customer_name, None);
        assert_eq!(playing.phone, None);
        assert_eq!(playing.booked_time, None);
        assert!(playing.orders.is_empty());
    }

    #[test]
    fn test_book_requires_all_fields() {
        let table = empty_table();

        let mut request = booking();
        request.customer_name = String::new();
        assert!(matches!(
            book(&table, &request),
            Err(ClientError::Validation(_))
        ));

        let mut request = booking();
        request.phone = String::new();
        assert!(book(&table, &request).is_err());

        let mut request = booking();
        request.booked_time = String::new();
        assert!(book(&table, &request).is_err());
    }

    #[test]
    #[should_panic(expected = "check_in on table 01")]
    fn test_check_in_requires_booked_state() {
        check_in(&empty_table(), Utc::now());
    }

    #[test]
    fn test_cancel_booking_clears_details() {
        let table = empty_table();
        let mut booked = table.clone();
        book(&table, &booking()).unwrap().apply(&mut booked);

        let mut cancelled = booked.clone();
        cancel_booking(&booked).apply(&mut cancelled);

        assert_eq!(cancelled.status, TableStatus::Empty);
        assert_eq!(cancelled.customer_name, None);
        assert_eq!(cancelled.phone, None);
        assert_eq!(cancelled.booked_time, None);
    }

    #[test]
    fn test_maintenance_toggle() {
        let table = empty_table();
        let mut down = table.clone();
        set_maintenance(&table).apply(&mut down);
        assert_eq!(down.status, TableStatus::Maintenance);

        let mut back = down.clone();
        clear_maintenance(&down).apply(&mut back);
        assert_eq!(back.status, TableStatus::Empty);
    }

    #[test]
    #[should_panic(expected = "set_maintenance on table 01")]
    fn test_maintenance_rejects_running_table() {
        let mut table = empty_table();
        table.status = TableStatus::Playing;
        set_maintenance(&table);
    }

    #[test]
    fn test_reset_after_checkout_wipes_session_state() {
        let now = Utc::now();
        let mut table = empty_table();
        table.status = TableStatus::Playing;
        table.start_time = Some(now);
        table.customer_name = Some("Anh Tuấn".to_string());
        table.prepaid_amount = Some(50000);
        table.orders = vec![OrderLine {
            id: "line-1".to_string(),
            item_id: "1".to_string(),
            name: "Sting Dâu".to_string(),
            quantity: 1,
            price: 15000,
        }];

        let mut reset = table.clone();
        reset_after_checkout(&table).apply(&mut reset);

        assert_eq!(reset.status, TableStatus::Empty);
        assert_eq!(reset.start_time, None);
        assert!(reset.orders.is_empty());
        assert_eq!(reset.customer_name, None);
        assert_eq!(reset.prepaid_amount, None);
    }
}
