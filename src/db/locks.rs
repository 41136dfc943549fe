//! # 편집 잠금 쿼리 모듈 (Lock Manager)
//!
//! 설계마다 하나의 배타적 편집 잠금을 부여/회수합니다.
//! 자격 증명은 클라이언트가 정한 `session_id`이고,
//! 생존 여부는 서버 타이머가 아니라 클라이언트의 주기적 하트비트로 유지됩니다.
//!
//! ## 잠금 라이프사이클
//! ```text
//! acquire_lock() → [보유 중] ─ heartbeat_lock()으로 locked_at 갱신
//!                      │
//!                      └─ release_lock() 또는 설계 삭제(CASCADE) → [없음]
//! ```
//!
//! ## 만료(TTL)
//! `lock_ttl_seconds`가 `None`이면 잠금은 만료되지 않습니다.
//! 같은 세션이 해제하거나 관리자가 행을 지울 때까지 다른 세션은 계속 거부됩니다.
//! `Some(n)`이면 `locked_at`이 n초보다 오래된 잠금은 없는 것으로 취급하여
//! `acquire_lock()`이 넘겨받을 수 있고 `get_lock()`도 None을 반환합니다.
//!
//! 모든 함수는 저장소 에러를 재시도 없이 그대로 돌려줍니다.

use crate::error::AppError;
use crate::models::DesignLock;
use crate::services::validate_session_id;
use sqlx::SqlitePool;

/// TTL을 SQLite `strftime` 수정자로 바꿉니다. (예: 30 → "-30 seconds")
///
/// `None`이면 SQL NULL이 바인딩되고, `strftime(..., NULL)`은 NULL이므로
/// 만료 비교식은 항상 거짓이 됩니다.
fn stale_modifier(lock_ttl_seconds: Option<u32>) -> Option<String> {
    lock_ttl_seconds.map(|ttl| format!("-{} seconds", ttl))
}

/// 설계에 대한 잠금을 획득합니다.
///
/// ## 반환값
/// - `Ok(true)`: 새로 획득했거나, 이미 같은 세션이 보유 중이라 `locked_at`만 갱신됨
/// - `Ok(false)`: 다른 세션이 보유 중 (아무것도 바뀌지 않음)
///
/// 조회 후 쓰기로 나누면 두 세션이 동시에 처음 획득할 때 경쟁이 생기므로,
/// UNIQUE(design_id) 제약에 기대는 단일 upsert 문으로 처리합니다.
/// `DO UPDATE ... WHERE`가 거짓이면 영향받은 행이 0이 되고, 그것이 곧 거부입니다.
pub async fn acquire_lock(
    pool: &SqlitePool,
    design_id: &str,
    session_id: &str,
    lock_ttl_seconds: Option<u32>,
) -> Result<bool, AppError> {
    let session_id = validate_session_id(session_id)?;
    let id = uuid::Uuid::now_v7().to_string();

    let result = sqlx::query(
        r#"
        INSERT INTO design_locks (id, design_id, session_id)
        VALUES (?, ?, ?)
        ON CONFLICT (design_id) DO UPDATE SET
            session_id = excluded.session_id,
            locked_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE design_locks.session_id = excluded.session_id
           OR design_locks.locked_at < strftime('%Y-%m-%dT%H:%M:%fZ', 'now', ?)
        "#,
    )
    .bind(&id)
    .bind(design_id)
    .bind(session_id)
    .bind(stale_modifier(lock_ttl_seconds))
    .execute(pool)
    .await?;

    let granted = result.rows_affected() > 0;
    if granted {
        tracing::debug!("Lock on design {} granted to session {}", design_id, session_id);
    } else {
        tracing::debug!("Lock on design {} denied to session {}", design_id, session_id);
    }
    Ok(granted)
}

/// 잠금을 해제합니다.
///
/// `design_id`와 `session_id`가 모두 일치하는 행만 지웁니다.
/// 다른 세션의 잠금을 지우려는 요청은 에러 없이 아무 일도 하지 않습니다.
/// 반환값은 실제로 행이 지워졌는지 여부입니다.
pub async fn release_lock(
    pool: &SqlitePool,
    design_id: &str,
    session_id: &str,
) -> Result<bool, AppError> {
    let session_id = validate_session_id(session_id)?;

    let result = sqlx::query("DELETE FROM design_locks WHERE design_id = ? AND session_id = ?")
        .bind(design_id)
        .bind(session_id)
        .execute(pool)
        .await?;

    let released = result.rows_affected() > 0;
    if released {
        tracing::debug!("Lock on design {} released by session {}", design_id, session_id);
    }
    Ok(released)
}

/// 현재 잠금 상태를 조회합니다. 거부된 세션에게 "누가, 언제부터"를 알려줄 때 씁니다.
///
/// TTL이 설정되어 있으면 만료된 잠금은 `None`으로 보고합니다.
pub async fn get_lock(
    pool: &SqlitePool,
    design_id: &str,
    lock_ttl_seconds: Option<u32>,
) -> Result<Option<DesignLock>, AppError> {
    let modifier = stale_modifier(lock_ttl_seconds);

    let lock = sqlx::query_as::<_, DesignLock>(
        r#"
        SELECT id, design_id, session_id, locked_at
        FROM design_locks
        WHERE design_id = ?
          AND (? IS NULL OR locked_at >= strftime('%Y-%m-%dT%H:%M:%fZ', 'now', ?))
        "#,
    )
    .bind(design_id)
    .bind(&modifier)
    .bind(&modifier)
    .fetch_optional(pool)
    .await?;

    Ok(lock)
}

/// 하트비트: 보유 중인 잠금의 `locked_at`을 현재 시각으로 갱신합니다.
///
/// 일치하는 행이 없으면 `false`입니다. 잠금을 새로 만들지 않으므로
/// 한 번도 획득하지 않았거나 이미 잃은 세션은 다시 `acquire_lock()`을 호출해야 합니다.
pub async fn heartbeat_lock(
    pool: &SqlitePool,
    design_id: &str,
    session_id: &str,
) -> Result<bool, AppError> {
    let session_id = validate_session_id(session_id)?;

    let result = sqlx::query(
        r#"
        UPDATE design_locks
        SET locked_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE design_id = ? AND session_id = ?
        "#,
    )
    .bind(design_id)
    .bind(session_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
