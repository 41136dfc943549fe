//! # 현재 작업 상태(스냅샷) 라우트 핸들러
//!
//! ## 엔드포인트
//! | 메서드 | 경로 | 핸들러 | 설명 |
//! |--------|------|--------|------|
//! | POST | /designs/{id}/autosave | `autosave_design` | 현재 상태 덮어쓰기 |
//! | GET | /designs/{id}/current | `get_current_document` | 현재 문서 조회 |
//! | POST | /designs/{id}/snapshot | `create_snapshot_version` | 현재 상태를 버전으로 고정 |
//!
//! ## 편집 흐름
//! ```text
//! 1. POST /designs/{id}/lock        (잠금 획득)
//! 2. POST /designs/{id}/autosave    (반복, 하트비트와 함께)
//! 3. POST /designs/{id}/snapshot    (원할 때 버전 고정)
//! 4. DELETE /designs/{id}/lock      (잠금 해제)
//! ```

use crate::{
    db,
    error::AppError,
    models::*,
    routes::AppState,
    services,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sqlx::SqlitePool;

/// `POST /designs/{id}/autosave` + `{ "data": {...}, "session_id": "s1" }`
///
/// 저장소는 마지막에 쓴 쪽이 이기는 upsert입니다.
/// 요청에 `session_id`가 있고 다른 세션이 잠금을 보유 중이면 409로 거부합니다.
/// `session_id`가 없으면 잠금을 확인하지 않습니다.
pub async fn autosave_design(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AutoSaveRequest>,
) -> Result<Json<DesignSnapshot>, AppError> {
    db::get_design(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound("design"))?;

    if let Some(session_id) = req.session_id.as_deref() {
        let session_id = services::validate_session_id(session_id)?;
        if let Some(lock) = db::get_lock(&state.pool, &id, state.lock_ttl_seconds).await? {
            if lock.session_id != session_id {
                return Err(AppError::Locked {
                    locked_by: lock.session_id,
                    locked_at: lock.locked_at,
                });
            }
        }
    }

    let snapshot =
        db::save_snapshot(&state.pool, &id, &req.data, req.updated_by.as_deref()).await?;
    Ok(Json(snapshot))
}

/// `GET /designs/{id}/current` — 편집기에 띄울 현재 문서를 반환합니다.
pub async fn get_current_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CurrentDocument>, AppError> {
    db::get_design(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound("design"))?;

    let current = load_current_document(&state.pool, &id).await?;
    Ok(Json(current))
}

/// 현재 문서를 결정합니다: 스냅샷 → 최신 버전 → 빈 템플릿 순서.
///
/// 스냅샷이 아직 없는 설계(생성 시 첫 버전만 기록된 경우)도 내용을 보여줄 수 있습니다.
pub(crate) async fn load_current_document(
    pool: &SqlitePool,
    design_id: &str,
) -> Result<CurrentDocument, AppError> {
    if let Some(snapshot) = db::get_snapshot(pool, design_id).await? {
        return Ok(CurrentDocument {
            design_id: design_id.to_string(),
            source: CurrentSource::Snapshot,
            data: snapshot.data.0,
            updated_at: Some(snapshot.updated_at),
        });
    }

    if let Some(version) = db::get_latest_version(pool, design_id).await? {
        return Ok(CurrentDocument {
            design_id: design_id.to_string(),
            source: CurrentSource::Version,
            data: version.data.0,
            updated_at: Some(version.created_at),
        });
    }

    Ok(CurrentDocument {
        design_id: design_id.to_string(),
        source: CurrentSource::Template,
        data: services::default_design_document(),
        updated_at: None,
    })
}

/// `POST /designs/{id}/snapshot` + `{ "version_name": "v2 draft", "comment": "..." }`
///
/// 현재 스냅샷을 그대로 복사해 새 버전을 만듭니다.
/// 스냅샷이 없으면 404입니다. 성공 시 `201 Created`.
pub async fn create_snapshot_version(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<CreateSnapshotVersionRequest>,
) -> Result<(StatusCode, Json<DesignVersion>), AppError> {
    db::get_design(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound("design"))?;

    let version = db::create_version_from_snapshot(
        &state.pool,
        &id,
        req.version_name.as_deref(),
        req.comment.as_deref(),
        req.created_by.as_deref(),
    )
    .await?
    .ok_or(AppError::NotFound("snapshot"))?;

    tracing::info!(
        "Pinned snapshot of design {} as version {}",
        id,
        version.version_number
    );
    Ok((StatusCode::CREATED, Json(version)))
}
