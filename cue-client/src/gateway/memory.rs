//! In-process gateway double
//!
//! Backs the gateway contract with plain memory so service logic can be
//! exercised without a running server. Write failures can be injected to
//! test the alert paths, and `save_tables` calls are counted so debounce
//! coalescing is observable.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;

use shared::{
    MenuCategory, MenuItem, RateTable, StockStatus, Table, TableType, Transaction,
};

use super::ClubGateway;
use crate::error::{ClientError, ClientResult};

#[derive(Debug, Default)]
struct MemoryState {
    tables: Option<Vec<Table>>,
    rates: Option<RateTable>,
    menu: Option<Vec<MenuItem>>,
    transactions: Option<Vec<Transaction>>,
}

/// Gateway double holding all resources in memory
#[derive(Debug, Default)]
pub struct MemoryGateway {
    state: RwLock<MemoryState>,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
    save_tables_calls: AtomicUsize,
}

/// Fixture tables: two Pool, one Carom, one VIP
pub fn fixture_tables() -> Vec<Table> {
    vec![
        Table::new("01", "Bàn 01", TableType::Pool),
        Table::new("02", "Bàn 02", TableType::Pool),
        Table::new("03", "Bàn 03", TableType::Carom),
        Table::new("04", "Bàn 04", TableType::Vip),
    ]
}

pub fn fixture_rates() -> RateTable {
    RateTable {
        pool: 60000,
        carom: 50000,
        snooker: 80000,
        vip: 120000,
        billing_block: 15,
    }
}

/// Fixture menu, including one item that is out of stock
pub fn fixture_menu() -> Vec<MenuItem> {
    vec![
        MenuItem {
            id: "1".to_string(),
            name: "Sting Dâu".to_string(),
            price: 15000,
            category: MenuCategory::Drink,
            status: StockStatus::InStock,
            image: String::new(),
        },
        MenuItem {
            id: "3".to_string(),
            name: "Mì Trứng".to_string(),
            price: 35000,
            category: MenuCategory::Food,
            status: StockStatus::InStock,
            image: String::new(),
        },
        MenuItem {
            id: "4".to_string(),
            name: "Thuốc lá 555".to_string(),
            price: 35000,
            category: MenuCategory::Other,
            status: StockStatus::OutOfStock,
            image: String::new(),
        },
    ]
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following write fail (or succeed again)
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make every following read fail (or succeed again)
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Number of `save_tables` calls observed so far
    pub fn save_tables_calls(&self) -> usize {
        self.save_tables_calls.load(Ordering::SeqCst)
    }

    /// Peek at the durable table set directly
    pub fn stored_tables(&self) -> Vec<Table> {
        self.state.read().tables.clone().unwrap_or_default()
    }

    /// Peek at the durable transaction log directly
    pub fn stored_transactions(&self) -> Vec<Transaction> {
        self.state.read().transactions.clone().unwrap_or_default()
    }

    /// Peek at the durable menu directly
    pub fn stored_menu(&self) -> Vec<MenuItem> {
        self.state.read().menu.clone().unwrap_or_else(fixture_menu)
    }

    /// Overwrite the durable table set behind the client's back, as another
    /// terminal would
    pub fn put_tables(&self, tables: Vec<Table>) {
        self.state.write().tables = Some(tables);
    }

    fn check_write(&self) -> ClientResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ClientError::Internal("injected write failure".to_string()));
        }
        Ok(())
    }

    fn check_read(&self) -> ClientResult<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(ClientError::Internal("injected read failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ClubGateway for MemoryGateway {
    async fn init(&self) -> ClientResult<()> {
        self.check_write()?;
        let mut state = self.state.write();
        let seeded = state
            .tables
            .as_ref()
            .map(|tables| !tables.is_empty())
            .unwrap_or(false);
        if !seeded {
            state.tables = Some(fixture_tables());
            state.rates = Some(fixture_rates());
            state.menu = Some(fixture_menu());
            state.transactions = Some(Vec::new());
        }
        Ok(())
    }

    async fn fetch_tables(&self) -> ClientResult<Vec<Table>> {
        self.check_read()?;
        Ok(self.state.read().tables.clone().unwrap_or_default())
    }

    async fn save_tables(&self, tables: &[Table]) -> ClientResult<()> {
        self.save_tables_calls.fetch_add(1, Ordering::SeqCst);
        self.check_write()?;
        self.state.write().tables = Some(tables.to_vec());
        Ok(())
    }

    async fn fetch_rates(&self) -> ClientResult<RateTable> {
        self.check_read()?;
        Ok(self.state.read().rates.unwrap_or_else(fixture_rates))
    }

    async fn save_rates(&self, rates: &RateTable) -> ClientResult<()> {
        self.check_write()?;
        self.state.write().rates = Some(*rates);
        Ok(())
    }

    async fn fetch_menu(&self) -> ClientResult<Vec<MenuItem>> {
        self.check_read()?;
        Ok(self.state.read().menu.clone().unwrap_or_else(fixture_menu))
    }

    async fn save_menu(&self, menu: &[MenuItem]) -> ClientResult<()> {
        self.check_write()?;
        self.state.write().menu = Some(menu.to_vec());
        Ok(())
    }

    async fn fetch_transactions(&self) -> ClientResult<Vec<Transaction>> {
        self.check_read()?;
        Ok(self.state.read().transactions.clone().unwrap_or_default())
    }

    async fn add_transaction(&self, transaction: &Transaction) -> ClientResult<Transaction> {
        self.check_write()?;
        let mut state = self.state.write();
        let existing = state.transactions.take().unwrap_or_default();

        let mut transactions = Vec::with_capacity(existing.len() + 1);
        transactions.push(transaction.clone());
        transactions.extend(existing);
        state.transactions = Some(transactions);

        Ok(transaction.clone())
    }

    async fn delete_transaction(&self, id: &str) -> ClientResult<()> {
        self.check_write()?;
        let mut state = self.state.write();
        let existing = state.transactions.take().unwrap_or_default();
        let before = existing.len();

        let remaining: Vec<Transaction> = existing.into_iter().filter(|tx| tx.id != id).collect();
        if remaining.len() == before {
            state.transactions = Some(remaining);
            return Err(ClientError::NotFound(format!("Transaction {}", id)));
        }
        state.transactions = Some(remaining);
        Ok(())
    }

    async fn reset(&self) -> ClientResult<()> {
        self.check_write()?;
        let mut state = self.state.write();
        state.tables = Some(fixture_tables());
        state.rates = Some(fixture_rates());
        state.menu = Some(fixture_menu());
        state.transactions = Some(Vec::new());
        Ok(())
    }
}
