//! Local in-memory mirror of all club resources
//!
//! The store is the terminal's working copy: every mutation lands here
//! first, and background writers push the result out through the gateway.
//! Reads hand out clones so callers never hold a lock across await points.

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::RwLock;

use shared::{MenuItem, RateTable, Table, Transaction};

use crate::error::{ClientError, ClientResult};
use crate::session::TableUpdate;

// ========== Resource names ==========

pub const RES_TABLES: &str = "tables";
pub const RES_RATES: &str = "rates";
pub const RES_MENU: &str = "menu";
pub const RES_TRANSACTIONS: &str = "transactions";

/// Monotonic per-resource version counters
///
/// Lock-free via DashMap. Every local mutation bumps the owning resource,
/// so views can cheaply detect that something changed underneath them.
#[derive(Debug, Default)]
pub struct ResourceVersions {
    versions: DashMap<String, u64>,
}

impl ResourceVersions {
    pub fn new() -> Self {
        Self {
            versions: DashMap::new(),
        }
    }

    /// Bump a resource's version and return the new value
    pub fn increment(&self, resource: &str) -> u64 {
        let mut entry = self.versions.entry(resource.to_string()).or_insert(0);
        *entry += 1;
        *entry
    }

    /// Current version, zero when never bumped
    pub fn get(&self, resource: &str) -> u64 {
        self.versions.get(resource).map(|v| *v).unwrap_or(0)
    }
}

/// Shared working copy of tables, rates, menu and transaction log
#[derive(Clone, Default)]
pub struct ClubStore {
    tables: Arc<RwLock<Vec<Table>>>,
    rates: Arc<RwLock<RateTable>>,
    menu: Arc<RwLock<Vec<MenuItem>>>,
    transactions: Arc<RwLock<Vec<Transaction>>>,
    versions: Arc<ResourceVersions>,
}

impl std::fmt::Debug for ClubStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClubStore")
            .field("tables", &self.tables.read().len())
            .field("menu_items", &self.menu.read().len())
            .field("transactions", &self.transactions.read().len())
            .finish()
    }
}

impl ClubStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ========== Reads (clone out) ==========

    pub fn tables(&self) -> Vec<Table> {
        self.tables.read().clone()
    }

    pub fn table(&self, id: &str) -> Option<Table> {
        self.tables.read().iter().find(|t| t.id == id).cloned()
    }

    pub fn rates(&self) -> RateTable {
        *self.rates.read()
    }

    pub fn menu(&self) -> Vec<MenuItem> {
        self.menu.read().clone()
    }

    pub fn menu_item(&self, id: &str) -> Option<MenuItem> {
        self.menu.read().iter().find(|m| m.id == id).cloned()
    }

    pub fn transactions(&self) -> Vec<Transaction> {
        self.transactions.read().clone()
    }

    /// Current version counter for a resource name
    pub fn version(&self, resource: &str) -> u64 {
        self.versions.get(resource)
    }

    // ========== Whole-resource replacement (refresh path) ==========

    pub fn replace_tables(&self, tables: Vec<Table>) {
        *self.tables.write() = tables;
        self.versions.increment(RES_TABLES);
    }

    pub fn replace_rates(&self, rates: RateTable) {
        *self.rates.write() = rates;
        self.versions.increment(RES_RATES);
    }

    pub fn replace_menu(&self, menu: Vec<MenuItem>) {
        *self.menu.write() = menu;
        self.versions.increment(RES_MENU);
    }

    pub fn replace_transactions(&self, transactions: Vec<Transaction>) {
        *self.transactions.write() = transactions;
        self.versions.increment(RES_TRANSACTIONS);
    }

    // ========== Local mutations ==========

    /// Patch one table and return the updated copy
    pub fn update_table(&self, id: &str, patch: &TableUpdate) -> ClientResult<Table> {
        let mut tables = self.tables.write();
        let table = tables
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| ClientError::NotFound(format!("Table {}", id)))?;

        patch.apply(table);
        let updated = table.clone();
        drop(tables);

        self.versions.increment(RES_TABLES);
        Ok(updated)
    }

    /// Insert or replace a menu item by id
    pub fn upsert_menu_item(&self, item: MenuItem) {
        let mut menu = self.menu.write();
        match menu.iter_mut().find(|m| m.id == item.id) {
            Some(existing) => *existing = item,
            None => menu.push(item),
        }
        drop(menu);
        self.versions.increment(RES_MENU);
    }

    pub fn remove_menu_item(&self, id: &str) -> ClientResult<()> {
        let mut menu = self.menu.write();
        let before = menu.len();
        menu.retain(|m| m.id != id);
        if menu.len() == before {
            return Err(ClientError::NotFound(format!("Menu item {}", id)));
        }
        drop(menu);
        self.versions.increment(RES_MENU);
        Ok(())
    }

    /// Newest first
    pub fn prepend_transaction(&self, transaction: Transaction) {
        self.transactions.write().insert(0, transaction);
        self.versions.increment(RES_TRANSACTIONS);
    }

    pub fn remove_transaction(&self, id: &str) -> ClientResult<()> {
        let mut transactions = self.transactions.write();
        let before = transactions.len();
        transactions.retain(|tx| tx.id != id);
        if transactions.len() == before {
            return Err(ClientError::NotFound(format!("Transaction {}", id)));
        }
        drop(transactions);
        self.versions.increment(RES_TRANSACTIONS);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{TableStatus, TableType};

    #[test]
    fn test_versions_increment_per_resource() {
        let versions = ResourceVersions::new();
        assert_eq!(versions.get(RES_TABLES), 0);
        assert_eq!(versions.increment(RES_TABLES), 1);
        assert_eq!(versions.increment(RES_TABLES), 2);
        assert_eq!(versions.get(RES_MENU), 0);
    }

    #[test]
    fn test_update_table_bumps_version() {
        let store = ClubStore::new();
        store.replace_tables(vec![Table::new("01", "Bàn 01", TableType::Pool)]);
        let v0 = store.version(RES_TABLES);

        let patch = TableUpdate {
            status: Some(TableStatus::Maintenance),
            ..TableUpdate::default()
        };
        let updated = store.update_table("01", &patch).unwrap();
        assert_eq!(updated.status, TableStatus::Maintenance);
        assert_eq!(store.version(RES_TABLES), v0 + 1);

        assert!(matches!(
            store.update_table("99", &TableUpdate::default()),
            Err(ClientError::NotFound(_))
        ));
    }

    #[test]
    fn test_reads_are_snapshots() {
        let store = ClubStore::new();
        store.replace_tables(vec![Table::new("01", "Bàn 01", TableType::Pool)]);

        let snapshot = store.tables();
        store.replace_tables(Vec::new());

        assert_eq!(snapshot.len(), 1);
        assert!(store.tables().is_empty());
    }

    #[test]
    fn test_transaction_log_order_and_removal() {
        let store = ClubStore::new();
        let tx = |id: &str| Transaction {
            id: id.to_string(),
            table_name: "Bàn 01".to_string(),
            start_time: chrono::Utc::now(),
            end_time: chrono::Utc::now(),
            duration: "0h 15m".to_string(),
            table_fee: 15000,
            service_fee: 0,
            orders: Vec::new(),
            total: 15000,
            status: shared::TransactionStatus::Paid,
        };

        store.prepend_transaction(tx("#TX-AAAA1111"));
        store.prepend_transaction(tx("#TX-BBBB2222"));

        let log = store.transactions();
        assert_eq!(log[0].id, "#TX-BBBB2222");

        store.remove_transaction("#TX-AAAA1111").unwrap();
        assert_eq!(store.transactions().len(), 1);
        assert!(store.remove_transaction("#TX-AAAA1111").is_err());
    }
}
