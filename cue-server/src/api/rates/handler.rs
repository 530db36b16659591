//! Rate table API Handlers

use axum::{Json, extract::State};

use shared::{ApiResponse, RateTable};

use crate::core::ServerState;
use crate::store::{RES_RATES, seed};
use crate::utils::{AppResult, ok};

/// GET /api/rates - 获取费率表
///
/// 从未写入过时返回默认费率。
pub async fn get(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<RateTable>>> {
    let rates: RateTable = state
        .store
        .get(RES_RATES)?
        .unwrap_or_else(seed::initial_rates);
    Ok(ok(rates))
}

/// PUT /api/rates - 整块替换费率表
pub async fn save(
    State(state): State<ServerState>,
    Json(rates): Json<RateTable>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.store.put(RES_RATES, &rates)?;
    Ok(ok(()))
}
