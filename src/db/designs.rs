//! # 설계(Design) 데이터베이스 쿼리 모듈
//!
//! `designs` 테이블의 생성/조회/수정/삭제와 목록 쿼리입니다 (Design Registry).
//!
//! 스냅샷/버전/잠금은 이 모듈이 직접 지우지 않습니다.
//! 스키마의 `ON DELETE CASCADE`가 설계 삭제와 같은 문장 안에서 함께 지우므로,
//! 삭제 도중 프로세스가 죽어도 일부만 지워진 상태가 남지 않습니다.

use crate::db::is_write_race;
use crate::error::AppError;
use crate::models::{Design, DesignSummary};
use crate::services::generate_share_token;
use sqlx::SqlitePool;

/// 공유 토큰이 우연히 겹쳤을 때 새 토큰으로 다시 시도하는 최대 횟수
const MAX_SHARE_TOKEN_ATTEMPTS: u32 = 3;

/// 새 설계를 생성합니다.
///
/// 공유 토큰은 여기서 생성하며, 생성 후에는 바뀌지 않습니다.
/// 토큰 충돌 확률은 무시할 만하지만 UNIQUE 제약에 걸리면 새 토큰으로 재시도합니다.
///
/// # 매개변수
/// - `name`: 검증을 마친 설계 이름
/// - `description`: 설명 (선택)
/// - `is_public`: 공개 여부
/// - `created_by`: 작성자 식별자 (선택)
pub async fn create_design(
    pool: &SqlitePool,
    name: &str,
    description: Option<&str>,
    is_public: bool,
    created_by: Option<&str>,
) -> Result<Design, AppError> {
    let id = uuid::Uuid::now_v7().to_string();

    let mut attempt = 1;
    loop {
        let share_token = generate_share_token();

        let result = sqlx::query_as::<_, Design>(
            r#"
            INSERT INTO designs (id, name, description, is_public, share_token, created_by)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id, name, description, is_public, share_token, created_by,
                      created_at, updated_at
            "#,
        )
        .bind(&id)
        .bind(name)
        .bind(description)
        .bind(is_public)
        .bind(&share_token)
        .bind(created_by)
        .fetch_one(pool)
        .await;

        match result {
            Ok(design) => {
                tracing::info!("Created design {} ({})", design.id, design.name);
                return Ok(design);
            }
            Err(e) if is_write_race(&e) && attempt < MAX_SHARE_TOKEN_ATTEMPTS => {
                tracing::warn!("Retrying design insert after write race: {}", e);
                attempt += 1;
            }
            Err(e) if is_write_race(&e) => {
                return Err(AppError::Transient(format!(
                    "could not create design after {} attempts: {}",
                    attempt, e
                )));
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// ID로 설계를 조회합니다.
///
/// # 반환값
/// - `Ok(Some(Design))`: 찾은 경우
/// - `Ok(None)`: 없는 경우 (라우트에서 404로 변환)
pub async fn get_design(pool: &SqlitePool, id: &str) -> Result<Option<Design>, AppError> {
    let design = sqlx::query_as::<_, Design>(
        r#"
        SELECT id, name, description, is_public, share_token, created_by, created_at, updated_at
        FROM designs
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(design)
}

/// 공유 토큰으로 설계를 조회합니다 (ID 없이 읽기 접근).
pub async fn get_design_by_share_token(
    pool: &SqlitePool,
    share_token: &str,
) -> Result<Option<Design>, AppError> {
    let design = sqlx::query_as::<_, Design>(
        r#"
        SELECT id, name, description, is_public, share_token, created_by, created_at, updated_at
        FROM designs
        WHERE share_token = ?
        "#,
    )
    .bind(share_token)
    .fetch_optional(pool)
    .await?;

    Ok(design)
}

/// 설계 이름/설명을 수정합니다 (부분 업데이트).
///
/// `None`인 필드는 그대로 둡니다 (`COALESCE`). ID와 공유 토큰은 바뀌지 않습니다.
/// 해당 ID가 없으면 `Ok(None)`.
pub async fn update_design(
    pool: &SqlitePool,
    id: &str,
    name: Option<&str>,
    description: Option<&str>,
) -> Result<Option<Design>, AppError> {
    let design = sqlx::query_as::<_, Design>(
        r#"
        UPDATE designs
        SET name = COALESCE(?, name),
            description = COALESCE(?, description),
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ?
        RETURNING id, name, description, is_public, share_token, created_by,
                  created_at, updated_at
        "#,
    )
    .bind(name)
    .bind(description)
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(design)
}

/// 설계 이름만 바꿉니다.
pub async fn rename_design(
    pool: &SqlitePool,
    id: &str,
    name: &str,
) -> Result<Option<Design>, AppError> {
    update_design(pool, id, Some(name), None).await
}

/// 설계를 삭제합니다. 스냅샷, 모든 버전, 잠금이 외래키 CASCADE로 함께 지워집니다.
///
/// # 반환값
/// - `Ok(true)`: 삭제됨
/// - `Ok(false)`: 해당 ID의 설계가 없음
pub async fn delete_design(pool: &SqlitePool, id: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM designs WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    let deleted = result.rows_affected() > 0;
    if deleted {
        tracing::info!("Deleted design {}", id);
    }
    Ok(deleted)
}

/// LIKE 패턴의 특수문자(`%`, `_`, `\`)를 이스케이프합니다.
fn like_pattern(search: &str) -> String {
    let mut escaped = String::with_capacity(search.len() + 2);
    escaped.push('%');
    for c in search.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// 설계 목록을 최근 수정순으로 조회합니다.
///
/// `search`가 있으면 이름/설명에 부분 일치하는 설계만 (ASCII 대소문자 무시).
/// 각 행에는 스냅샷의 마지막 저장 시각과 본문 요약(`database`, 테이블 수)이 붙습니다.
///
/// # 반환값
/// `(현재 페이지의 설계들, 조건에 맞는 전체 개수)`
pub async fn list_designs(
    pool: &SqlitePool,
    search: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<(Vec<DesignSummary>, i64), AppError> {
    let pattern = search
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(like_pattern);

    let mut tx = pool.begin().await?;

    let designs = sqlx::query_as::<_, DesignSummary>(
        r#"
        SELECT d.id, d.name, d.description, d.is_public, d.share_token,
               d.created_at, d.updated_at,
               s.updated_at AS last_modified,
               CAST(json_extract(s.data, '$.database') AS TEXT) AS "database",
               json_array_length(s.data, '$.tables') AS table_count
        FROM designs d
        LEFT JOIN design_snapshots s ON s.design_id = d.id
        WHERE ? IS NULL
           OR d.name LIKE ? ESCAPE '\'
           OR d.description LIKE ? ESCAPE '\'
        ORDER BY d.updated_at DESC, d.id DESC
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(&pattern)
    .bind(&pattern)
    .bind(&pattern)
    .bind(limit)
    .bind(offset)
    .fetch_all(&mut *tx)
    .await?;

    let total: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM designs d
        WHERE ? IS NULL
           OR d.name LIKE ? ESCAPE '\'
           OR d.description LIKE ? ESCAPE '\'
        "#,
    )
    .bind(&pattern)
    .bind(&pattern)
    .bind(&pattern)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok((designs, total))
}
