//! Menu API Handlers

use axum::{Json, extract::State};

use shared::{ApiResponse, MenuItem};

use crate::core::ServerState;
use crate::store::{RES_MENU, seed};
use crate::utils::{AppResult, ok};

/// GET /api/menu - 获取菜单
///
/// 从未写入过时返回默认菜单。
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<Vec<MenuItem>>>> {
    let menu: Vec<MenuItem> = state
        .store
        .get(RES_MENU)?
        .unwrap_or_else(seed::initial_menu);
    Ok(ok(menu))
}

/// PUT /api/menu - 整块替换菜单
pub async fn save(
    State(state): State<ServerState>,
    Json(menu): Json<Vec<MenuItem>>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.store.put(RES_MENU, &menu)?;
    Ok(ok(()))
}
