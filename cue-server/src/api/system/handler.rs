//! System API Handlers

use axum::{Json, extract::State};
use serde::Serialize;

use shared::ApiResponse;

use crate::core::ServerState;
use crate::store::seed;
use crate::utils::{AppResult, ok};

/// 初始化结果
#[derive(Serialize)]
pub struct InitResponse {
    /// 本次调用是否写入了初始数据
    pub seeded: bool,
}

/// POST /api/init - 幂等初始化
///
/// 首次调用写入初始数据，之后的调用不动已有数据。
pub async fn init(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<InitResponse>>> {
    let seeded = seed::seed_if_empty(&state.store)?;
    if seeded {
        tracing::info!("Seed data written");
    }
    Ok(ok(InitResponse { seeded }))
}

/// POST /api/reset - 全量重置为初始数据
///
/// 丢弃所有桌台、费率、菜单和交易记录。
pub async fn reset(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<()>>> {
    seed::write_seed(&state.store)?;
    tracing::warn!("All resources reset to seed data");
    Ok(ok(()))
}
