//! CueMaster Server - 台球俱乐部收银系统持久化服务
//!
//! # 架构概述
//!
//! 本模块是持久化服务的主入口，提供以下核心功能：
//!
//! - **整块资源存储** (`store`): redb 嵌入式 KV，资源按 JSON 整块读写
//! - **HTTP API** (`api`): 桌台、费率、菜单、交易日志的 RESTful 接口
//! - **初始化** (`store/seed`): 首次运行的幂等种子数据
//!
//! # 模块结构
//!
//! ```text
//! cue-server/src/
//! ├── core/          # 配置、状态、错误、HTTP 服务器
//! ├── api/           # HTTP 路由和处理器
//! ├── store/         # 存储层 + 种子数据
//! └── utils/         # 错误码、日志
//! ```

pub mod api;
pub mod core;
pub mod store;
pub mod utils;

// Re-export 公共类型
pub use core::{Config, Server, ServerState};
pub use store::{BlobStore, StorageError};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置环境 (dotenv, 日志)
pub fn setup_environment() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = core::Config::from_env();
    utils::logger::init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
   ______
  / ____/_  _____
 / /   / / / / _ \
/ /___/ /_/ /  __/
\____/\__,_/\___/
    __  ___           __
   /  |/  /___ ______/ /____  _____
  / /|_/ / __ `/ ___/ __/ _ \/ ___/
 / /  / / /_/ (__  ) /_/  __/ /
/_/  /_/\__,_/____/\__/\___/_/
    "#
    );
}
