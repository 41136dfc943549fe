use crate::error::AppError;
use crate::models::DesignSnapshot;
use serde_json::Value;
use sqlx::SqlitePool;

/// 설계의 현재 작업 상태를 저장합니다 (자동 저장).
///
/// 설계당 한 행(UNIQUE design_id)이므로 없으면 삽입하고 있으면 덮어씁니다.
/// 마지막에 커밋한 쪽이 이깁니다. 동시 편집 방지는 잠금을 잡은 호출자 책임입니다.
pub async fn save_snapshot(
    pool: &SqlitePool,
    design_id: &str,
    data: &Value,
    updated_by: Option<&str>,
) -> Result<DesignSnapshot, AppError> {
    let id = uuid::Uuid::now_v7().to_string();

    let snapshot = sqlx::query_as::<_, DesignSnapshot>(
        r#"
        INSERT INTO design_snapshots (id, design_id, data, updated_by)
        VALUES (?, ?, ?, ?)
        ON CONFLICT (design_id) DO UPDATE SET
            data = excluded.data,
            updated_by = excluded.updated_by,
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        RETURNING id, design_id, data, updated_by, created_at, updated_at
        "#,
    )
    .bind(&id)
    .bind(design_id)
    .bind(data.to_string())
    .bind(updated_by)
    .fetch_one(pool)
    .await?;

    Ok(snapshot)
}

/// 없으면 `None`. 호출자가 빈 템플릿으로 대체합니다.
pub async fn get_snapshot(
    pool: &SqlitePool,
    design_id: &str,
) -> Result<Option<DesignSnapshot>, AppError> {
    let snapshot = sqlx::query_as::<_, DesignSnapshot>(
        r#"
        SELECT id, design_id, data, updated_by, created_at, updated_at
        FROM design_snapshots
        WHERE design_id = ?
        "#,
    )
    .bind(design_id)
    .fetch_optional(pool)
    .await?;

    Ok(snapshot)
}
