//! # 헬스체크(Health Check) 핸들러
//!
//! 서버가 정상적으로 동작하는지 확인하는 엔드포인트입니다.
//!
//! ## 엔드포인트
//! - `GET /health` → `{ "status": "ok", "database": "ok" }`
//!
//! 로드밸런서나 컨테이너 오케스트레이터의 헬스체크에 사용합니다.

use crate::{error::AppError, routes::AppState};
use axum::{extract::State, Json};
use serde_json::{json, Value};

/// `GET /health` — 서버와 데이터베이스 상태를 확인합니다.
///
/// `SELECT 1`이 실패하면 500을 반환합니다. 모든 상태가 DB에 있으므로
/// DB에 닿지 못하는 인스턴스는 정상이라고 볼 수 없습니다.
pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    sqlx::query("SELECT 1").execute(&state.pool).await?;

    Ok(Json(json!({
        "status": "ok",
        "database": "ok"
    })))
}
