//! 服务器状态

use crate::core::Config;
use crate::store::BlobStore;

/// 服务器状态 - 持有配置与存储的共享引用
///
/// 使用 Arc 实现浅拷贝 (BlobStore 内部持有 `Arc<Database>`)，
/// 可以廉价地 clone 进每个请求 handler。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | store | BlobStore | 整块资源存储 |
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Config,
    pub store: BlobStore,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 1. 确保 `{work_dir}/database` 目录存在
    /// 2. 打开数据库文件
    ///
    /// 初始数据不在这里写入，由客户端调用 `POST /api/init` 触发。
    pub fn initialize(config: &Config) -> crate::core::Result<Self> {
        let db_path = config.database_path();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let store = BlobStore::open(&db_path)?;
        tracing::info!(path = %db_path.display(), "Blob store opened");

        Ok(Self {
            config: config.clone(),
            store,
        })
    }

    /// 测试用状态：内存存储，不触碰文件系统
    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            config: Config::with_overrides("/tmp/cuemaster-test", 0),
            store: BlobStore::open_in_memory().expect("in-memory store"),
        }
    }
}
