//! System API 模块 - 初始化与重置

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/init", post(handler::init))
        .route("/api/reset", post(handler::reset))
}
