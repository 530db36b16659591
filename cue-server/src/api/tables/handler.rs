//! Table resource API Handlers
//!
//! 桌台资源以整组数组读写，没有单桌寻址。并发写入为最后写入生效。

use axum::{Json, extract::State};

use shared::{ApiResponse, Table};

use crate::core::ServerState;
use crate::store::RES_TABLES;
use crate::utils::{AppResult, ok};

/// GET /api/tables - 获取整组桌台
///
/// 从未写入过时返回空数组。
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<Vec<Table>>>> {
    let tables: Vec<Table> = state.store.get(RES_TABLES)?.unwrap_or_default();
    Ok(ok(tables))
}

/// PUT /api/tables - 整组替换
pub async fn save(
    State(state): State<ServerState>,
    Json(tables): Json<Vec<Table>>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.store.put(RES_TABLES, &tables)?;
    Ok(ok(()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::TableType;

    #[tokio::test]
    async fn test_list_falls_back_to_empty() {
        let state = ServerState::for_tests();
        let response = list(State(state)).await.unwrap();
        assert!(response.0.is_success());
        assert!(response.0.data.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_replaces_whole_set() {
        let state = ServerState::for_tests();
        let tables = vec![
            Table::new("01", "Bàn 01", TableType::Pool),
            Table::new("02", "Bàn 02", TableType::Vip),
        ];

        save(State(state.clone()), Json(tables)).await.unwrap();

        let response = list(State(state)).await.unwrap();
        let loaded = response.0.data.unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[1].table_type, TableType::Vip);
    }
}
