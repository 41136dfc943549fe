use crate::db::is_write_race;
use crate::error::AppError;
use crate::models::{DesignVersion, VersionPage};
use serde_json::Value;
use sqlx::SqlitePool;
use std::future::Future;
use std::time::Duration;

/// 번호 경쟁으로 실패한 버전 삽입을 시도하는 최대 횟수
pub const MAX_VERSION_ATTEMPTS: u32 = 5;

const RETRY_BACKOFF: Duration = Duration::from_millis(10);

/// 새 버전을 기록합니다. 번호는 `MAX(version_number) + 1`.
///
/// 다음 번호 계산과 삽입을 한 문장(INSERT ... SELECT)으로 처리하므로
/// SQLite의 쓰기 잠금 아래에서 원자적으로 실행됩니다.
/// 그래도 UNIQUE(design_id, version_number) 위반이나 BUSY가 나면
/// 새 번호로 다시 시도하고, 한도를 넘기면 `Transient`를 반환합니다.
pub async fn create_version(
    pool: &SqlitePool,
    design_id: &str,
    data: &Value,
    version_name: Option<&str>,
    comment: Option<&str>,
    created_by: Option<&str>,
) -> Result<DesignVersion, AppError> {
    let data = data.to_string();
    let data = data.as_str();

    retry_version_write(design_id, move || async move {
        let id = uuid::Uuid::now_v7().to_string();
        sqlx::query_as::<_, DesignVersion>(
            r#"
            INSERT INTO design_versions
                (id, design_id, version_number, version_name, data, created_by, comment)
            SELECT ?, ?, nv.n, COALESCE(?, 'Version ' || nv.n), ?, ?, ?
            FROM (
                SELECT COALESCE(MAX(version_number), 0) + 1 AS n
                FROM design_versions
                WHERE design_id = ?
            ) AS nv
            RETURNING id, design_id, version_number, version_name, data,
                      created_by, comment, created_at
            "#,
        )
        .bind(&id)
        .bind(design_id)
        .bind(version_name)
        .bind(data)
        .bind(created_by)
        .bind(comment)
        .bind(design_id)
        .fetch_one(pool)
        .await
    })
    .await
}

/// 현재 스냅샷의 데이터를 그대로 복사해 새 버전을 만듭니다 (수동 스냅샷).
///
/// 스냅샷 읽기와 버전 삽입이 같은 문장이므로, 그 사이에 자동 저장이 끼어들 수 없습니다.
/// 스냅샷이 없으면 `None`.
pub async fn create_version_from_snapshot(
    pool: &SqlitePool,
    design_id: &str,
    version_name: Option<&str>,
    comment: Option<&str>,
    created_by: Option<&str>,
) -> Result<Option<DesignVersion>, AppError> {
    retry_version_write(design_id, move || async move {
        let id = uuid::Uuid::now_v7().to_string();
        sqlx::query_as::<_, DesignVersion>(
            r#"
            INSERT INTO design_versions
                (id, design_id, version_number, version_name, data, created_by, comment)
            SELECT ?, s.design_id, nv.n, COALESCE(?, 'Version ' || nv.n), s.data, ?, ?
            FROM design_snapshots AS s,
                 (
                     SELECT COALESCE(MAX(version_number), 0) + 1 AS n
                     FROM design_versions
                     WHERE design_id = ?
                 ) AS nv
            WHERE s.design_id = ?
            RETURNING id, design_id, version_number, version_name, data,
                      created_by, comment, created_at
            "#,
        )
        .bind(&id)
        .bind(version_name)
        .bind(created_by)
        .bind(comment)
        .bind(design_id)
        .bind(design_id)
        .fetch_optional(pool)
        .await
    })
    .await
}

async fn retry_version_write<T, F, Fut>(design_id: &str, mut write: F) -> Result<T, AppError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, sqlx::Error>>,
{
    let mut attempt = 1;
    loop {
        match write().await {
            Ok(value) => return Ok(value),
            Err(e) if is_write_race(&e) => {
                if attempt >= MAX_VERSION_ATTEMPTS {
                    return Err(AppError::Transient(format!(
                        "could not assign a version number for design {} after {} attempts: {}",
                        design_id, attempt, e
                    )));
                }
                tracing::warn!(
                    "Version number race on design {} (attempt {}): {}",
                    design_id,
                    attempt,
                    e
                );
                tokio::time::sleep(RETRY_BACKOFF * attempt).await;
                attempt += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }
}

pub async fn get_version(
    pool: &SqlitePool,
    design_id: &str,
    version_number: i64,
) -> Result<Option<DesignVersion>, AppError> {
    let version = sqlx::query_as::<_, DesignVersion>(
        r#"
        SELECT id, design_id, version_number, version_name, data, created_by, comment, created_at
        FROM design_versions
        WHERE design_id = ? AND version_number = ?
        "#,
    )
    .bind(design_id)
    .bind(version_number)
    .fetch_optional(pool)
    .await?;

    Ok(version)
}

pub async fn get_latest_version(
    pool: &SqlitePool,
    design_id: &str,
) -> Result<Option<DesignVersion>, AppError> {
    let version = sqlx::query_as::<_, DesignVersion>(
        r#"
        SELECT id, design_id, version_number, version_name, data, created_by, comment, created_at
        FROM design_versions
        WHERE design_id = ?
        ORDER BY version_number DESC
        LIMIT 1
        "#,
    )
    .bind(design_id)
    .fetch_optional(pool)
    .await?;

    Ok(version)
}

/// 버전 목록을 번호 내림차순으로 `limit`개, `offset`부터 가져옵니다.
/// limit 상한은 두지 않습니다 (라우트에서 자름).
///
/// 목록과 전체 개수를 한 읽기 트랜잭션에서 조회해 서로 어긋나지 않게 합니다.
pub async fn list_versions(
    pool: &SqlitePool,
    design_id: &str,
    limit: i64,
    offset: i64,
) -> Result<VersionPage, AppError> {
    let mut tx = pool.begin().await?;

    let versions = sqlx::query_as::<_, DesignVersion>(
        r#"
        SELECT id, design_id, version_number, version_name, data, created_by, comment, created_at
        FROM design_versions
        WHERE design_id = ?
        ORDER BY version_number DESC
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(design_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(&mut *tx)
    .await?;

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM design_versions WHERE design_id = ?")
        .bind(design_id)
        .fetch_one(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(VersionPage { versions, total })
}
