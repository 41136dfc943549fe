//! # 설계(Design) 라우트 핸들러
//!
//! ## 엔드포인트
//! - `GET    /designs`              → 설계 목록 (페이지, 검색)
//! - `POST   /designs`              → 새 설계 생성 (`data`가 있으면 첫 버전 기록)
//! - `GET    /designs/{id}`         → 단일 설계 조회
//! - `PATCH  /designs/{id}`         → 이름/설명 수정
//! - `DELETE /designs/{id}`         → 삭제 (스냅샷/버전/잠금 CASCADE)
//! - `GET    /shared/{token}`       → 공유 토큰으로 설계와 현재 문서 조회

use crate::{
    db,
    error::AppError,
    models::*,
    routes::{snapshots::load_current_document, AppState},
    services,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

/// 이름 없이 생성된 설계의 기본 이름
const DEFAULT_DESIGN_NAME: &str = "Untitled Design";

/// 첫 버전의 이름
const INITIAL_VERSION_NAME: &str = "Initial version";

/// `GET /designs?page=1&per_page=20&search=erd`
///
/// 응답: `{ "designs": [...], "total": 42, "page": 1, "per_page": 20 }`
pub async fn list_designs(
    State(state): State<AppState>,
    Query(query): Query<ListDesignsQuery>,
) -> Result<Json<Value>, AppError> {
    let (limit, offset) = services::page_to_limit_offset(
        query.page,
        query.per_page,
        state.default_page_size,
        state.max_page_size,
    )?;

    let (designs, total) =
        db::list_designs(&state.pool, query.search.as_deref(), limit, offset).await?;

    Ok(Json(json!({
        "designs": designs,
        "total": total,
        "page": query.page.unwrap_or(1),
        "per_page": limit,
    })))
}

/// `POST /designs` — 새 설계를 생성합니다.
///
/// 요청 본문에 `data`가 있으면 "Initial version"이라는 이름으로 버전 1을 기록합니다.
/// 응답: `201 Created` + `{ "design": {...}, "version": {...} | null }`
pub async fn create_design(
    State(state): State<AppState>,
    Json(req): Json<CreateDesignRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let name = match req.name.as_deref() {
        Some(name) => services::validate_design_name(name)?,
        None => DEFAULT_DESIGN_NAME,
    };

    let design = db::create_design(
        &state.pool,
        name,
        req.description.as_deref(),
        req.is_public.unwrap_or(false),
        req.created_by.as_deref(),
    )
    .await?;

    let version = match &req.data {
        Some(data) => Some(
            db::create_version(
                &state.pool,
                &design.id,
                data,
                Some(INITIAL_VERSION_NAME),
                None,
                req.created_by.as_deref(),
            )
            .await?,
        ),
        None => None,
    };

    Ok((
        StatusCode::CREATED,
        Json(json!({ "design": design, "version": version })),
    ))
}

/// `GET /designs/{id}` — 단일 설계를 조회합니다.
pub async fn get_design(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Design>, AppError> {
    let design = db::get_design(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound("design"))?;
    Ok(Json(design))
}

/// `GET /shared/{token}` — 공유 토큰으로 설계를 읽습니다.
///
/// 형식이 맞지 않는 토큰은 DB를 조회하지 않고 바로 404입니다.
/// 응답: `{ "design": {...}, "current": {...} }`
pub async fn get_shared_design(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<Value>, AppError> {
    if !services::is_share_token(&token) {
        return Err(AppError::NotFound("design"));
    }

    let design = db::get_design_by_share_token(&state.pool, &token)
        .await?
        .ok_or(AppError::NotFound("design"))?;
    let current = load_current_document(&state.pool, &design.id).await?;

    Ok(Json(json!({ "design": design, "current": current })))
}

/// `PATCH /designs/{id}` — 이름/설명을 수정합니다. 보내지 않은 필드는 그대로입니다.
pub async fn update_design(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateDesignRequest>,
) -> Result<Json<Design>, AppError> {
    let name = req
        .name
        .as_deref()
        .map(services::validate_design_name)
        .transpose()?;

    let design = db::update_design(&state.pool, &id, name, req.description.as_deref())
        .await?
        .ok_or(AppError::NotFound("design"))?;
    Ok(Json(design))
}

/// `DELETE /designs/{id}` — 설계를 삭제합니다.
///
/// 스냅샷, 모든 버전, 잠금이 같은 DELETE 문 안에서 CASCADE로 지워집니다.
/// 성공 시 HTTP 204 No Content를 반환합니다.
pub async fn delete_design(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if !db::delete_design(&state.pool, &id).await? {
        return Err(AppError::NotFound("design"));
    }
    Ok(StatusCode::NO_CONTENT)
}
