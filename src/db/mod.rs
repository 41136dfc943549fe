//! # 데이터베이스 접근 계층 (Data Access Layer)
//!
//! 데이터베이스와 직접 상호작용하는 함수들을 모아둔 모듈입니다.
//! 라우트 핸들러(routes/)에서 이 모듈의 함수를 호출하여 DB 작업을 수행합니다.
//!
//! 각 하위 모듈:
//! - `designs`: 설계 메타데이터 CRUD와 목록 (Design Registry)
//! - `locks`: 설계별 배타적 편집 잠금 (Lock Manager)
//! - `snapshots`: 현재 작업 상태 upsert/조회 (Version Store)
//! - `versions`: 번호가 매겨진 불변 버전 이력 (Version Store)
//!
//! 어떤 함수도 요청 사이에 메모리 상태를 들고 있지 않습니다.
//! 모든 조율은 SQLite의 원자적 문장과 UNIQUE/외래키 제약에 맡깁니다.

pub mod designs;
pub mod locks;
pub mod snapshots;
pub mod versions;

pub use designs::*;
pub use locks::*;
pub use snapshots::*;
pub use versions::*;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

/// 다른 연결이 쓰기 잠금을 잡고 있을 때 기다리는 최대 시간
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite 연결 풀을 만듭니다.
///
/// - 파일이 없으면 생성합니다.
/// - 외래키를 켭니다. 설계 삭제 시 스냅샷/버전/잠금의 CASCADE 삭제가 여기에 달려 있습니다.
/// - WAL 모드와 busy timeout으로 동시 쓰기가 에러 대신 대기열에 서게 합니다.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT);

    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
}

/// `./migrations`의 스키마를 적용합니다. 이미 적용된 마이그레이션은 건너뜁니다.
pub async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// 동시 쓰기 경쟁으로 생긴 에러인지 판별합니다.
///
/// UNIQUE 위반(같은 번호를 동시에 잡은 경우)과 SQLITE_BUSY/SQLITE_LOCKED가 해당합니다.
/// 그 외 에러는 재시도해도 소용없으므로 false입니다.
pub(crate) fn is_write_race(err: &sqlx::Error) -> bool {
    let sqlx::Error::Database(db_err) = err else {
        return false;
    };
    if db_err.is_unique_violation() {
        return true;
    }
    // 확장 에러 코드의 하위 8비트가 기본 코드입니다. 5 = BUSY, 6 = LOCKED
    db_err
        .code()
        .and_then(|code| code.parse::<i32>().ok())
        .map(|code| matches!(code & 0xff, 5 | 6))
        .unwrap_or(false)
}
