//! # 애플리케이션 설정(Configuration) 모듈
//!
//! 환경변수에서 서버 설정값을 읽어오는 모듈입니다.
//! `.env` 파일이나 시스템 환경변수에서 값을 가져옵니다.
//!
//! 설정 항목:
//! - `DATABASE_URL`: SQLite 데이터베이스 경로 (필수)
//! - `HOST`: 서버 바인딩 주소
//! - `PORT`: 서버 포트 번호
//! - `DATABASE_MAX_CONNECTIONS`: 연결 풀 크기
//! - `LOCK_TTL_SECONDS`: 편집 잠금 만료 시간 (없으면 만료 없음)
//! - `ALLOWED_ORIGINS`: CORS 허용 출처 (쉼표 구분, 비우면 전체 허용)
//! - `MAX_BODY_BYTES`: 요청 본문 최대 크기
//! - `DEFAULT_PAGE_SIZE`, `MAX_PAGE_SIZE`: 목록 API의 기본/최대 페이지 크기

use std::env;

/// 애플리케이션 전체 설정을 담는 구조체
///
/// 서버 시작 시 환경변수에서 한 번 읽어온 후,
/// 애플리케이션 전체에서 공유됩니다.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite 데이터베이스 URL (예: "sqlite:data/schemashare.db")
    pub database_url: String,
    /// 서버가 바인딩할 호스트 주소 (기본값: "0.0.0.0")
    pub host: String,
    /// 서버 포트 번호 (기본값: 5000)
    pub port: u16,
    /// 연결 풀의 최대 연결 수 (기본값: 20)
    pub max_connections: u32,
    /// 편집 잠금 만료(초). `None`이면 잠금은 명시적으로 해제될 때까지 유지됩니다.
    pub lock_ttl_seconds: Option<u32>,
    /// CORS 허용 출처 목록. 비어 있으면 모든 출처를 허용합니다.
    pub allowed_origins: Vec<String>,
    /// 요청 본문 최대 크기 (기본값: 50 MiB). 설계 문서 JSON이 클 수 있습니다.
    pub max_body_bytes: usize,
    /// 목록 API에서 per_page가 없을 때 쓰는 값 (기본값: 20)
    pub default_page_size: i64,
    /// 목록 API의 per_page 상한 (기본값: 100)
    pub max_page_size: i64,
}

impl Config {
    /// 환경변수에서 설정값을 읽어 Config 인스턴스를 생성합니다.
    ///
    /// # 에러
    /// `DATABASE_URL`은 필수이며, 없으면 에러가 발생합니다.
    /// 나머지 설정은 기본값이 있어 환경변수가 없거나 해석할 수 없어도 동작합니다.
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_or("PORT", 5000),
            max_connections: parse_or("DATABASE_MAX_CONNECTIONS", 20),
            lock_ttl_seconds: env::var("LOCK_TTL_SECONDS")
                .ok()
                .and_then(|v| parse_lock_ttl(&v)),
            allowed_origins: env::var("ALLOWED_ORIGINS")
                .map(|v| parse_origins(&v))
                .unwrap_or_default(),
            max_body_bytes: parse_or("MAX_BODY_BYTES", 50 * 1024 * 1024),
            default_page_size: parse_or("DEFAULT_PAGE_SIZE", 20),
            max_page_size: parse_or("MAX_PAGE_SIZE", 100),
        })
    }
}

/// 환경변수를 읽어 파싱하고, 없거나 파싱에 실패하면 기본값을 씁니다.
fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// `LOCK_TTL_SECONDS` 해석. 0이나 숫자가 아닌 값은 "만료 없음"으로 봅니다.
fn parse_lock_ttl(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok().filter(|ttl| *ttl > 0)
}

/// "a, b,,c" → ["a", "b", "c"]
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}
