//! Remote synchronization.
//!
//! The store on the wire is last-writer-wins per whole resource, so the
//! client periodically re-pulls everything instead of merging. [`pull_all`]
//! fetches all four resources and only then swaps them into the local
//! cache; a failed fetch leaves the cache as it was, never half-replaced.
//!
//! A pull replaces local state wholesale. Edits still sitting in the
//! debounce window when a pull lands are lost; terminals accept that for
//! a single-club deployment.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::error::ClientResult;
use crate::gateway::ClubGateway;
use crate::store::ClubStore;

/// Fetch every resource from the gateway and swap the local cache.
pub async fn pull_all(gateway: &Arc<dyn ClubGateway>, store: &ClubStore) -> ClientResult<()> {
    let tables = gateway.fetch_tables().await?;
    let rates = gateway.fetch_rates().await?;
    let menu = gateway.fetch_menu().await?;
    let transactions = gateway.fetch_transactions().await?;

    store.replace_tables(tables);
    store.replace_rates(rates);
    store.replace_menu(menu);
    store.replace_transactions(transactions);

    tracing::debug!("Pulled all resources from gateway");
    Ok(())
}

/// Periodic whole-state refresh.
///
/// Registered as `TaskKind::Periodic`. A failed pull is logged at warn and
/// retried on the next tick; the cache keeps serving the last good state.
pub struct RefreshService {
    store: ClubStore,
    gateway: Arc<dyn ClubGateway>,
    interval: Duration,
}

impl RefreshService {
    pub fn new(store: ClubStore, gateway: Arc<dyn ClubGateway>, interval: Duration) -> Self {
        Self {
            store,
            gateway,
            interval,
        }
    }

    pub async fn run(self, shutdown: CancellationToken) {
        tracing::debug!("Refresh service started (every {:?})", self.interval);

        let mut ticker = tokio::time::interval(self.interval);
        ticker.tick().await; // skip immediate tick

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    break;
                }
                _ = ticker.tick() => {
                    if let Err(e) = pull_all(&self.gateway, &self.store).await {
                        tracing::warn!("Refresh failed: {}", e);
                    }
                }
            }
        }

        tracing::debug!("Refresh service stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{MemoryGateway, fixture_tables};
    use shared::{Table, TableType};
    use tokio::task::yield_now;

    #[tokio::test]
    async fn test_pull_all_populates_store() {
        let gateway = Arc::new(MemoryGateway::new());
        gateway.init().await.unwrap();
        let gateway: Arc<dyn ClubGateway> = gateway;
        let store = ClubStore::default();

        pull_all(&gateway, &store).await.unwrap();

        assert_eq!(store.tables().len(), 4);
        assert_eq!(store.rates().pool, 60_000);
        assert_eq!(store.menu().len(), 3);
        assert!(store.transactions().is_empty());
    }

    #[tokio::test]
    async fn test_failed_pull_leaves_store_untouched() {
        let memory = Arc::new(MemoryGateway::new());
        memory.init().await.unwrap();
        let gateway: Arc<dyn ClubGateway> = memory.clone();
        let store = ClubStore::default();
        pull_all(&gateway, &store).await.unwrap();

        memory.set_fail_reads(true);
        memory.put_tables(vec![Table::new("09", "Bàn 09", TableType::Pool)]);

        assert!(pull_all(&gateway, &store).await.is_err());
        assert_eq!(store.tables().len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_service_pulls_on_interval() {
        let memory = Arc::new(MemoryGateway::new());
        memory.init().await.unwrap();
        let store = ClubStore::default();
        let service = RefreshService::new(
            store.clone(),
            memory.clone() as Arc<dyn ClubGateway>,
            Duration::from_secs(30),
        );
        let shutdown = CancellationToken::new();
        let handle = tokio::spawn(service.run(shutdown.clone()));
        yield_now().await;

        let mut tables = fixture_tables();
        tables.push(Table::new("05", "Bàn 05", TableType::Vip));
        memory.put_tables(tables);
        assert_eq!(store.tables().len(), 0);

        tokio::time::advance(Duration::from_secs(30)).await;
        yield_now().await;
        assert_eq!(store.tables().len(), 5);

        shutdown.cancel();
        handle.await.unwrap();
    }
}
