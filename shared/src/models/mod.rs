//! Domain models
//!
//! # 模块结构
//!
//! - [`table`] - 台球桌与会话状态
//! - [`order`] - 桌面消费明细
//! - [`menu`] - 菜单项
//! - [`rates`] - 计费费率配置
//! - [`transaction`] - 结账交易记录

pub mod menu;
pub mod order;
pub mod rates;
pub mod table;
pub mod transaction;

pub use menu::{MenuCategory, MenuItem, StockStatus};
pub use order::OrderLine;
pub use rates::RateTable;
pub use table::{Table, TableStatus, TableType};
pub use transaction::{Transaction, TransactionStatus};
