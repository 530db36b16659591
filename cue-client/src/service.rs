//! Club service - the terminal's single entry point
//!
//! Owns the local cache, the gateway and the background machinery, and
//! exposes every operation a front end needs. Mutations follow the
//! optimistic pattern: the cache is updated and control returns to the
//! caller immediately, while durable writes happen behind the scenes
//! (debounced for table edits, awaited for money-bearing operations).

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local, Utc};
use tokio::sync::{Mutex, broadcast};

use shared::{MenuItem, RateTable, Table, Transaction};

use crate::alerts::{Alert, AlertBus};
use crate::billing::{self, SessionReadout};
use crate::checkout;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::gateway::ClubGateway;
use crate::ledger;
use crate::reports::{self, HistoryFilter, RevenueSummary, TopItem};
use crate::session::{self, BookingRequest, TableUpdate};
use crate::store::ClubStore;
use crate::sync::{self, RefreshService};
use crate::tasks::{BackgroundTasks, TaskKind};
use crate::writer::DebouncedWriter;

/// Facade over the whole client core
///
/// Cloning is cheap and shares everything, so each view can hold its own
/// handle.
#[derive(Clone)]
pub struct ClubService {
    store: ClubStore,
    gateway: Arc<dyn ClubGateway>,
    writer: DebouncedWriter,
    alerts: AlertBus,
    tasks: Arc<Mutex<BackgroundTasks>>,
}

impl fmt::Debug for ClubService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClubService")
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

impl ClubService {
    /// Bring the client up: seed the remote store if needed, warm the
    /// local cache and start the background tasks.
    pub async fn initialize(
        gateway: Arc<dyn ClubGateway>,
        config: &ClientConfig,
    ) -> ClientResult<Self> {
        gateway.init().await?;

        let store = ClubStore::new();
        sync::pull_all(&gateway, &store).await?;
        tracing::info!(
            tables = store.tables().len(),
            menu_items = store.menu().len(),
            "Warmed up local cache"
        );

        let alerts = AlertBus::new();
        let mut tasks = BackgroundTasks::new();

        let (writer, worker) = DebouncedWriter::channel(
            store.clone(),
            gateway.clone(),
            alerts.clone(),
            Duration::from_secs(config.debounce_secs),
        );
        let writer_shutdown = tasks.shutdown_token();
        tasks.spawn("table_writer", TaskKind::Worker, worker.run(writer_shutdown));

        let refresh = RefreshService::new(
            store.clone(),
            gateway.clone(),
            Duration::from_secs(config.refresh_interval_secs),
        );
        let refresh_shutdown = tasks.shutdown_token();
        tasks.spawn("refresh", TaskKind::Periodic, refresh.run(refresh_shutdown));

        tasks.log_summary();

        Ok(Self {
            store,
            gateway,
            writer,
            alerts,
            tasks: Arc::new(Mutex::new(tasks)),
        })
    }

    // ========== Reads ==========

    pub fn tables(&self) -> Vec<Table> {
        self.store.tables()
    }

    pub fn table(&self, id: &str) -> Option<Table> {
        self.store.table(id)
    }

    pub fn rates(&self) -> RateTable {
        self.store.rates()
    }

    pub fn menu(&self) -> Vec<MenuItem> {
        self.store.menu()
    }

    pub fn transactions(&self) -> Vec<Transaction> {
        self.store.transactions()
    }

    /// Version counter for one resource, see [`ClubStore::version`]
    pub fn version(&self, resource: &str) -> u64 {
        self.store.version(resource)
    }

    pub fn store(&self) -> &ClubStore {
        &self.store
    }

    /// Live billing readout for a playing table, `None` otherwise
    pub fn session_readout(&self, table_id: &str) -> Option<SessionReadout> {
        self.session_readout_at(table_id, Utc::now())
    }

    pub fn session_readout_at(
        &self,
        table_id: &str,
        now: DateTime<Utc>,
    ) -> Option<SessionReadout> {
        let table = self.store.table(table_id)?;
        let rates = self.store.rates();
        billing::session_readout(&table, &rates, now)
    }

    /// Alerts raised by background persistence failures
    pub fn subscribe_alerts(&self) -> broadcast::Receiver<Alert> {
        self.alerts.subscribe()
    }

    // ========== Table sessions ==========

    pub fn start_session(&self, table_id: &str) -> ClientResult<Table> {
        let table = self.require_table(table_id)?;
        let patch = session::start_session(&table, Utc::now());
        let updated = self.apply_patch(table_id, &patch)?;
        tracing::info!(table_id = %table_id, "Session started");
        Ok(updated)
    }

    pub fn start_prepaid_session(&self, table_id: &str, amount: i64) -> ClientResult<Table> {
        let table = self.require_table(table_id)?;
        let patch = session::start_prepaid_session(&table, Utc::now(), amount)?;
        let updated = self.apply_patch(table_id, &patch)?;
        tracing::info!(table_id = %table_id, prepaid = amount, "Prepaid session started");
        Ok(updated)
    }

    pub fn book_table(&self, table_id: &str, request: &BookingRequest) -> ClientResult<Table> {
        let table = self.require_table(table_id)?;
        let patch = session::book(&table, request)?;
        let updated = self.apply_patch(table_id, &patch)?;
        tracing::info!(table_id = %table_id, customer = %request.customer_name, "Table booked");
        Ok(updated)
    }

    pub fn check_in(&self, table_id: &str) -> ClientResult<Table> {
        let table = self.require_table(table_id)?;
        let patch = session::check_in(&table, Utc::now());
        let updated = self.apply_patch(table_id, &patch)?;
        tracing::info!(table_id = %table_id, "Booking checked in");
        Ok(updated)
    }

    pub fn cancel_booking(&self, table_id: &str) -> ClientResult<Table> {
        let table = self.require_table(table_id)?;
        let patch = session::cancel_booking(&table);
        let updated = self.apply_patch(table_id, &patch)?;
        tracing::info!(table_id = %table_id, "Booking cancelled");
        Ok(updated)
    }

    pub fn set_maintenance(&self, table_id: &str) -> ClientResult<Table> {
        let table = self.require_table(table_id)?;
        let patch = session::set_maintenance(&table);
        self.apply_patch(table_id, &patch)
    }

    pub fn clear_maintenance(&self, table_id: &str) -> ClientResult<Table> {
        let table = self.require_table(table_id)?;
        let patch = session::clear_maintenance(&table);
        self.apply_patch(table_id, &patch)
    }

    // ========== Order ledger ==========

    /// Add one unit of a menu item to the table's tab
    pub fn add_order(&self, table_id: &str, item_id: &str) -> ClientResult<Table> {
        let table = self.require_table(table_id)?;
        let item = self
            .store
            .menu_item(item_id)
            .ok_or_else(|| ClientError::NotFound(format!("Menu item {}", item_id)))?;
        let orders = ledger::add_item(&table.orders, &item)?;
        self.apply_patch(table_id, &TableUpdate::with_orders(orders))
    }

    /// Change a line's quantity; at zero the line disappears
    pub fn adjust_order(&self, table_id: &str, line_id: &str, delta: i32) -> ClientResult<Table> {
        let table = self.require_table(table_id)?;
        let orders = ledger::adjust_quantity(&table.orders, line_id, delta)?;
        self.apply_patch(table_id, &TableUpdate::with_orders(orders))
    }

    pub fn remove_order(&self, table_id: &str, line_id: &str) -> ClientResult<Table> {
        let table = self.require_table(table_id)?;
        let orders = ledger::remove_line(&table.orders, line_id)?;
        self.apply_patch(table_id, &TableUpdate::with_orders(orders))
    }

    // ========== Checkout ==========

    /// Close a playing table into a paid transaction.
    ///
    /// The cache is settled before any network I/O, so the operator sees
    /// the table free immediately. Both durable halves are then pushed:
    /// the transaction append is awaited and a failure raises an alert
    /// (an unrecorded sale must not pass silently), and the table reset
    /// goes through a flushed write on the same terms.
    pub async fn checkout(&self, table_id: &str) -> ClientResult<Transaction> {
        let table = self.require_table(table_id)?;
        let rates = self.store.rates();
        let transaction = checkout::build_transaction(&table, &rates, Utc::now());
        let reset = session::reset_after_checkout(&table);

        self.store.update_table(table_id, &reset)?;
        self.store.prepend_transaction(transaction.clone());

        if let Err(e) = self.gateway.add_transaction(&transaction).await {
            self.alerts
                .notify(format!("Failed to record sale {}: {}", transaction.id, e));
        }
        self.writer.flush().await;

        tracing::info!(
            transaction_id = %transaction.id,
            table_id = %table_id,
            total = transaction.total,
            "Checked out"
        );
        Ok(transaction)
    }

    /// Administrative removal of a recorded transaction.
    ///
    /// Optimistic like everything else; if the durable delete fails the
    /// error surfaces to the caller and the next refresh restores the row.
    pub async fn delete_transaction(&self, id: &str) -> ClientResult<()> {
        self.store.remove_transaction(id)?;
        self.gateway.delete_transaction(id).await?;
        tracing::info!(transaction_id = %id, "Transaction deleted");
        Ok(())
    }

    // ========== Administration ==========

    /// Add or replace one menu item and persist the whole menu
    pub async fn upsert_menu_item(&self, item: MenuItem) -> ClientResult<()> {
        self.store.upsert_menu_item(item);
        self.gateway.save_menu(&self.store.menu()).await?;
        Ok(())
    }

    pub async fn delete_menu_item(&self, id: &str) -> ClientResult<()> {
        self.store.remove_menu_item(id)?;
        self.gateway.save_menu(&self.store.menu()).await?;
        Ok(())
    }

    pub async fn save_rates(&self, rates: RateTable) -> ClientResult<()> {
        self.store.replace_rates(rates);
        self.gateway.save_rates(&rates).await?;
        tracing::info!("Rates updated");
        Ok(())
    }

    // ========== Reports ==========

    /// Transaction history filtered for the history view
    pub fn history(&self, filter: HistoryFilter, search: &str) -> Vec<Transaction> {
        reports::filter_history(
            &self.store.transactions(),
            filter,
            search,
            Local::now().fixed_offset(),
        )
    }

    /// Revenue summary for the current local date
    pub fn revenue_today(&self) -> RevenueSummary {
        let now = Local::now().fixed_offset();
        reports::daily_summary(&self.store.transactions(), now.date_naive(), now.timezone())
    }

    pub fn top_sellers(&self, limit: usize) -> Vec<TopItem> {
        reports::top_sellers(&self.store.transactions(), limit)
    }

    // ========== Lifecycle ==========

    /// Pull everything from the gateway right now
    pub async fn refresh_now(&self) -> ClientResult<()> {
        sync::pull_all(&self.gateway, &self.store).await
    }

    /// Push any pending table edits and wait for the attempt
    pub async fn flush(&self) {
        self.writer.flush().await;
    }

    /// Number of background tasks that died, see [`BackgroundTasks::check_health`]
    pub async fn check_health(&self) -> usize {
        self.tasks.lock().await.check_health()
    }

    /// Flush pending edits and stop the background tasks.
    pub async fn shutdown(&self) {
        self.writer.flush().await;
        let tasks = std::mem::take(&mut *self.tasks.lock().await);
        tasks.shutdown().await;
    }

    fn require_table(&self, table_id: &str) -> ClientResult<Table> {
        self.store
            .table(table_id)
            .ok_or_else(|| ClientError::NotFound(format!("Table {}", table_id)))
    }

    /// Apply a patch locally and schedule the debounced write
    fn apply_patch(&self, table_id: &str, patch: &TableUpdate) -> ClientResult<Table> {
        let updated = self.store.update_table(table_id, patch)?;
        self.writer.touch();
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MemoryGateway;

    async fn service() -> (ClubService, Arc<MemoryGateway>) {
        let gateway = Arc::new(MemoryGateway::new());
        let config = ClientConfig::new("http://localhost:4000");
        let service = ClubService::initialize(gateway.clone(), &config)
            .await
            .unwrap();
        (service, gateway)
    }

    #[tokio::test]
    async fn test_initialize_seeds_and_warms_cache() {
        let (service, _gateway) = service().await;

        assert_eq!(service.tables().len(), 4);
        assert_eq!(service.menu().len(), 3);
        assert_eq!(service.rates().pool, 60_000);
        assert!(service.transactions().is_empty());

        service.shutdown().await;
    }

    #[tokio::test]
    async fn test_add_order_rejects_unknown_ids() {
        let (service, _gateway) = service().await;

        assert!(matches!(
            service.add_order("99", "1"),
            Err(ClientError::NotFound(_))
        ));
        service.start_session("01").unwrap();
        assert!(matches!(
            service.add_order("01", "no-such-item"),
            Err(ClientError::NotFound(_))
        ));

        service.shutdown().await;
    }

    #[tokio::test]
    async fn test_menu_administration_persists_immediately() {
        let (service, gateway) = service().await;

        let mut item = service.menu().into_iter().next().unwrap();
        item.price = 18_000;
        service.upsert_menu_item(item.clone()).await.unwrap();
        let stored = gateway.stored_menu();
        assert_eq!(stored.iter().find(|m| m.id == item.id).unwrap().price, 18_000);

        service.delete_menu_item(&item.id).await.unwrap();
        assert!(gateway.stored_menu().iter().all(|m| m.id != item.id));

        service.shutdown().await;
    }

    #[tokio::test]
    async fn test_version_bumps_on_mutation() {
        let (service, _gateway) = service().await;

        let before = service.version(crate::store::RES_TABLES);
        service.start_session("01").unwrap();
        assert_eq!(service.version(crate::store::RES_TABLES), before + 1);

        service.shutdown().await;
    }
}
