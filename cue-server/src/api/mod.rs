//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`system`] - 初始化与重置
//! - [`tables`] - 桌台资源
//! - [`rates`] - 费率资源
//! - [`menu`] - 菜单资源
//! - [`transactions`] - 交易日志

pub mod health;
pub mod system;

// Resource APIs
pub mod menu;
pub mod rates;
pub mod tables;
pub mod transactions;

// Re-export common types for handlers
pub use crate::utils::{AppError, AppResult};
