//! CueMaster client core - terminal logic for the billiards club
//!
//! Keeps a local cache of the club state, applies edits optimistically
//! and persists them through a gateway in the background.

pub mod alerts;
pub mod billing;
pub mod checkout;
pub mod config;
pub mod error;
pub mod gateway;
pub mod ledger;
pub mod reports;
pub mod service;
pub mod session;
pub mod store;
pub mod sync;
pub mod tasks;
pub mod writer;

pub use alerts::{Alert, AlertBus};
pub use billing::{SessionReadout, session_readout};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use gateway::{ClubGateway, HttpGateway, MemoryGateway};
pub use reports::{HistoryFilter, RevenueSummary, TopItem};
pub use service::ClubService;
pub use session::{BookingRequest, TableUpdate};
pub use store::ClubStore;
pub use tasks::{BackgroundTasks, TaskKind};
pub use writer::DebouncedWriter;

// Re-export shared types for convenience
pub use shared::{
    MenuCategory, MenuItem, OrderLine, RateTable, StockStatus, Table, TableStatus, TableType,
    Transaction, TransactionStatus,
};
