//! Gateway to the persistence service
//!
//! Every resource travels as one whole blob; there is no per-record
//! addressing on the wire. Concurrent writers follow last-writer-wins,
//! which the terminals accept for a single-club deployment.
//!
//! - [`HttpGateway`] - production HTTP transport
//! - [`MemoryGateway`] - in-process double for tests

mod http;
mod memory;

pub use http::HttpGateway;
pub use memory::{MemoryGateway, fixture_menu, fixture_rates, fixture_tables};

use async_trait::async_trait;

use shared::{MenuItem, RateTable, Table, Transaction};

use crate::error::{ClientError, ClientResult};
use crate::session::TableUpdate;

/// Transport-agnostic persistence contract
#[async_trait]
pub trait ClubGateway: Send + Sync {
    /// Idempotent first-run seeding
    async fn init(&self) -> ClientResult<()>;

    async fn fetch_tables(&self) -> ClientResult<Vec<Table>>;

    /// Replace the whole table set
    async fn save_tables(&self, tables: &[Table]) -> ClientResult<()>;

    async fn fetch_rates(&self) -> ClientResult<RateTable>;

    async fn save_rates(&self, rates: &RateTable) -> ClientResult<()>;

    async fn fetch_menu(&self) -> ClientResult<Vec<MenuItem>>;

    async fn save_menu(&self, menu: &[MenuItem]) -> ClientResult<()>;

    /// Newest first
    async fn fetch_transactions(&self) -> ClientResult<Vec<Transaction>>;

    /// Prepend one transaction to the log
    async fn add_transaction(&self, transaction: &Transaction) -> ClientResult<Transaction>;

    async fn delete_transaction(&self, id: &str) -> ClientResult<()>;

    /// Overwrite everything with seed data
    async fn reset(&self) -> ClientResult<()>;

    /// Patch one table through a read-modify-write of the whole set
    ///
    /// The store only understands whole blobs, so this fetches the current
    /// set, applies the patch and writes everything back. A concurrent
    /// writer between the fetch and the save loses (last writer wins).
    async fn update_table(&self, id: &str, patch: TableUpdate) -> ClientResult<Table> {
        let mut tables = self.fetch_tables().await?;
        let table = tables
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| ClientError::NotFound(format!("Table {}", id)))?;

        patch.apply(table);
        let updated = table.clone();

        self.save_tables(&tables).await?;
        Ok(updated)
    }
}
