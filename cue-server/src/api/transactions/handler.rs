//! Transaction log API Handlers
//!
//! 交易日志整块存储，最新的记录在最前面。

use axum::{
    Json,
    extract::{Path, State},
};

use shared::{ApiResponse, Transaction};

use crate::core::ServerState;
use crate::store::RES_TRANSACTIONS;
use crate::utils::{AppError, AppResult, ok, ok_with_message};

/// GET /api/transactions - 获取全部交易记录（新的在前）
pub async fn list(
    State(state): State<ServerState>,
) -> AppResult<Json<ApiResponse<Vec<Transaction>>>> {
    let transactions: Vec<Transaction> = state.store.get(RES_TRANSACTIONS)?.unwrap_or_default();
    Ok(ok(transactions))
}

/// POST /api/transactions - 追加一条交易记录到最前面
pub async fn create(
    State(state): State<ServerState>,
    Json(transaction): Json<Transaction>,
) -> AppResult<Json<ApiResponse<Transaction>>> {
    let existing: Vec<Transaction> = state.store.get(RES_TRANSACTIONS)?.unwrap_or_default();

    let mut transactions = Vec::with_capacity(existing.len() + 1);
    transactions.push(transaction.clone());
    transactions.extend(existing);

    state.store.put(RES_TRANSACTIONS, &transactions)?;
    tracing::info!(id = %transaction.id, total = transaction.total, "Transaction recorded");

    Ok(ok(transaction))
}

/// DELETE /api/transactions/{id} - 删除一条交易记录
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    let existing: Vec<Transaction> = state.store.get(RES_TRANSACTIONS)?.unwrap_or_default();
    let before = existing.len();

    let remaining: Vec<Transaction> = existing.into_iter().filter(|tx| tx.id != id).collect();
    if remaining.len() == before {
        return Err(AppError::NotFound(format!("Transaction {} not found", id)));
    }

    state.store.put(RES_TRANSACTIONS, &remaining)?;
    Ok(ok_with_message((), "Deleted"))
}
