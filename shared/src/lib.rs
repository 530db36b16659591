//! Shared types for the CueMaster billiards club system
//!
//! Wire-format domain models used by both the persistence service
//! (`cue-server`) and the client core (`cue-client`), plus the unified API
//! response envelope.
//!
//! All models serialize with camelCase field names and the exact enum strings
//! the stored JSON blobs use, so data written by any version of the system
//! stays readable.

pub mod models;
pub mod response;

// Re-export 公共类型
pub use models::{
    MenuCategory, MenuItem, OrderLine, RateTable, StockStatus, Table, TableStatus, TableType,
    Transaction, TransactionStatus,
};
pub use response::{API_CODE_SUCCESS, ApiResponse};
