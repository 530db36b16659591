//! 存储模块 - Persistent blob storage using redb
//!
//! 整块资源存储。Each logical resource (`tables`, `rates`, `menu`,
//! `transactions`) is read and replaced as one JSON blob; there is no
//! per-record addressing inside a blob. Concurrent writers therefore
//! follow last-writer-wins at the blob level.
//!
//! # 表结构
//!
//! | 表名 | Key | Value | 说明 |
//! |------|-----|-------|------|
//! | resources | 资源名 | JSON bytes | 整块资源快照 |

pub mod seed;

use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// 资源表: resource name -> serialized JSON blob
const RESOURCES_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("resources");

// ========== Resource keys ==========

pub const RES_TABLES: &str = "tables";
pub const RES_RATES: &str = "rates";
pub const RES_MENU: &str = "menu";
pub const RES_TRANSACTIONS: &str = "transactions";

/// 存储错误类型
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Whole-blob resource store
///
/// 内部持有 `Arc<Database>`，Clone 为浅拷贝，可在多个 handler 间共享。
#[derive(Clone)]
pub struct BlobStore {
    db: Arc<Database>,
}

impl std::fmt::Debug for BlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlobStore").finish_non_exhaustive()
    }
}

impl BlobStore {
    /// 打开或创建数据库文件
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        let store = Self { db: Arc::new(db) };
        store.ensure_table()?;
        Ok(store)
    }

    /// 创建内存数据库（测试用）
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder()
            .create_with_backend(redb::backends::InMemoryBackend::new())?;
        let store = Self { db: Arc::new(db) };
        store.ensure_table()?;
        Ok(store)
    }

    /// 确保资源表存在，空库首次读取不再报 TableDoesNotExist
    fn ensure_table(&self) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let _ = write_txn.open_table(RESOURCES_TABLE)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// 读取资源整块内容，从未写入过时返回 `None`
    pub fn get<T: DeserializeOwned>(&self, resource: &str) -> StorageResult<Option<T>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(RESOURCES_TABLE)?;
        match table.get(resource)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    /// 整块替换资源内容
    pub fn put<T: Serialize>(&self, resource: &str, value: &T) -> StorageResult<()> {
        let bytes = serde_json::to_vec(value)?;
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(RESOURCES_TABLE)?;
            table.insert(resource, bytes.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// 资源是否写入过
    pub fn exists(&self, resource: &str) -> StorageResult<bool> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(RESOURCES_TABLE)?;
        Ok(table.get(resource)?.is_some())
    }
}
