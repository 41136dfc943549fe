//! # schemashare 웹 서버 진입점
//!
//! 이 파일이 수행하는 작업:
//! 1. 환경변수(.env) 로딩
//! 2. 로깅(tracing) 초기화
//! 3. SQLite 데이터베이스 연결 풀 생성
//! 4. 데이터베이스 마이그레이션 실행
//! 5. API 라우터와 미들웨어 설정
//! 6. HTTP 서버 시작

use anyhow::Result; // anyhow::Result: 어떤 에러 타입이든 담을 수 있는 범용 Result 타입
use axum::{extract::DefaultBodyLimit, http::HeaderValue, Router};
use schemashare::{
    config::Config,
    db,
    routes::{api_router, AppState},
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer}, // CORS(Cross-Origin Resource Sharing) 설정
    trace::TraceLayer,                   // HTTP 요청/응답 로깅 미들웨어
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt}; // 로깅 초기화 유틸리티

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1단계: 환경변수 로딩 ──
    // .env 파일이 없어도 에러 없이 넘어갑니다.
    dotenvy::dotenv().ok();

    // ── 2단계: 로깅(tracing) 초기화 ──
    // RUST_LOG가 없으면 schemashare, tower_http, axum 모듈을 debug 레벨로 설정
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "schemashare=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // ── 3단계: 설정 로딩 ──
    let config = Config::from_env()?;
    tracing::info!(
        "Starting schemashare server on {}:{}",
        config.host,
        config.port
    );
    match config.lock_ttl_seconds {
        Some(ttl) => tracing::info!("Edit locks expire after {}s without a heartbeat", ttl),
        None => tracing::info!("Edit locks never expire; they are held until released"),
    }

    // ── 4단계: SQLite 연결 풀 생성 ──
    let pool = db::connect(&config.database_url, config.max_connections).await?;

    // ── 5단계: 데이터베이스 마이그레이션 실행 ──
    tracing::info!("Running database migrations...");
    db::migrate(&pool).await?;

    // ── 6단계: 라우터와 미들웨어 설정 ──
    let state = AppState::new(pool, &config);

    // 허용 출처가 지정되지 않으면 개발 편의를 위해 모두 허용합니다.
    let cors = if config.allowed_origins.is_empty() {
        tracing::warn!("ALLOWED_ORIGINS is not set, allowing any origin");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins = config
            .allowed_origins
            .iter()
            .map(|origin| origin.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()?;
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let app = Router::new()
        .merge(api_router(state.clone()))
        // 기존 클라이언트는 /gists 아래 같은 API를 호출합니다.
        .nest("/gists", api_router(state))
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // ── 7단계: 서버 시작 ──
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
