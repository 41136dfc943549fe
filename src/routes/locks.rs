//! # 편집 잠금 라우트 핸들러
//!
//! ## 엔드포인트
//! | 메서드 | 경로 | 핸들러 | 실패 시 |
//! |--------|------|--------|---------|
//! | POST | /designs/{id}/lock | `acquire_design_lock` | 409 + 보유자 정보 |
//! | DELETE | /designs/{id}/lock | `release_design_lock` | (다른 세션이면 아무 일도 없음) |
//! | POST | /designs/{id}/heartbeat | `heartbeat_design_lock` | 404 (다시 획득해야 함) |
//! | GET | /designs/{id}/lock | `get_design_lock` | - |
//!
//! 요청 본문: `{ "session_id": "..." }` (`sessionId`도 허용)
//! 세션 ID가 비어 있으면 DB를 건드리기 전에 400으로 거부합니다.

use crate::{
    db,
    error::AppError,
    models::*,
    routes::AppState,
    services,
};
use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

/// 획득이 거부된 직후 보유자가 잠금을 풀어버린 경우 다시 시도하는 횟수
const ACQUIRE_ATTEMPTS: usize = 2;

/// `POST /designs/{id}/lock` — 잠금을 획득합니다.
///
/// 이미 같은 세션이 보유 중이면 성공이며 `locked_at`만 갱신됩니다.
/// 다른 세션이 보유 중이면 기다리지 않고 바로 409를 반환합니다.
pub async fn acquire_design_lock(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<LockRequest>,
) -> Result<Json<Value>, AppError> {
    let session_id = services::require_session_id(req.session_id.as_deref())?;

    db::get_design(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound("design"))?;

    for _ in 0..ACQUIRE_ATTEMPTS {
        if db::acquire_lock(&state.pool, &id, session_id, state.lock_ttl_seconds).await? {
            return Ok(Json(json!({
                "success": true,
                "design_id": id,
                "session_id": session_id,
            })));
        }

        // 거부됨: 보유자를 조회해 알려줍니다.
        // 그 사이 잠금이 풀렸으면 (None) 한 번 더 시도합니다.
        if let Some(lock) = db::get_lock(&state.pool, &id, state.lock_ttl_seconds).await? {
            return Err(AppError::Locked {
                locked_by: lock.session_id,
                locked_at: lock.locked_at,
            });
        }
    }

    Err(AppError::Transient(format!(
        "lock on design {} changed hands while acquiring",
        id
    )))
}

/// `DELETE /designs/{id}/lock` — 잠금을 해제합니다.
///
/// 다른 세션의 잠금은 해제되지 않으며 에러도 아닙니다.
/// 응답: `{ "success": true, "released": bool }`
pub async fn release_design_lock(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<LockRequest>,
) -> Result<Json<Value>, AppError> {
    let session_id = services::require_session_id(req.session_id.as_deref())?;

    db::get_design(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound("design"))?;

    let released = db::release_lock(&state.pool, &id, session_id).await?;
    Ok(Json(json!({ "success": true, "released": released })))
}

/// `POST /designs/{id}/heartbeat` — 보유 중인 잠금을 연장합니다.
///
/// 잠금이 없거나 다른 세션 것이면 404입니다. 클라이언트는 다시 획득해야 합니다.
pub async fn heartbeat_design_lock(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<LockRequest>,
) -> Result<Json<Value>, AppError> {
    let session_id = services::require_session_id(req.session_id.as_deref())?;

    db::get_design(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound("design"))?;

    if !db::heartbeat_lock(&state.pool, &id, session_id).await? {
        return Err(AppError::NotFound("lock"));
    }
    Ok(Json(json!({ "success": true, "design_id": id })))
}

/// `GET /designs/{id}/lock` — 잠금 상태
///
/// 응답: `{ "locked": true, "lock": { "session_id": ..., "locked_at": ... } }`
/// 또는 `{ "locked": false, "lock": null }`
pub async fn get_design_lock(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    db::get_design(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound("design"))?;

    let lock: Option<DesignLock> = db::get_lock(&state.pool, &id, state.lock_ttl_seconds).await?;
    Ok(Json(json!({ "locked": lock.is_some(), "lock": lock })))
}
