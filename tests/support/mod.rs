#![allow(dead_code)]

use schemashare::db;
use schemashare::models::Design;
use schemashare::routes::AppState;
use sqlx::SqlitePool;
use tempfile::TempDir;

/// 임시 디렉토리 안의 SQLite 파일. `TempDir`이 drop되면 함께 지워집니다.
///
/// `sqlite::memory:`는 연결마다 별도 DB가 되므로, 여러 연결로 동시성을
/// 시험하려면 실제 파일이 필요합니다.
pub struct TestDb {
    pub pool: SqlitePool,
    _dir: TempDir,
}

pub async fn test_db() -> TestDb {
    let dir = tempfile::tempdir().expect("tempdir");
    let url = format!("sqlite:{}", dir.path().join("test.db").display());
    let pool = db::connect(&url, 8).await.expect("connect");
    db::migrate(&pool).await.expect("migrate");
    TestDb { pool, _dir: dir }
}

pub async fn create_design(pool: &SqlitePool, name: &str) -> Design {
    db::create_design(pool, name, None, false, None)
        .await
        .expect("create design")
}

pub fn app_state(pool: &SqlitePool, lock_ttl_seconds: Option<u32>) -> AppState {
    AppState {
        pool: pool.clone(),
        lock_ttl_seconds,
        default_page_size: 20,
        max_page_size: 100,
    }
}

pub async fn count_rows(pool: &SqlitePool, table: &str, design_id: &str) -> i64 {
    sqlx::query_scalar(&format!(
        "SELECT COUNT(*) FROM {} WHERE design_id = ?",
        table
    ))
    .bind(design_id)
    .fetch_one(pool)
    .await
    .expect("count rows")
}
