//! # schemashare
//!
//! 여러 클라이언트가 하나의 데이터베이스 설계 문서(JSON)를 함께 편집하는 서버입니다.
//!
//! - 세션 단위 배타적 편집 잠금 (`db::locks`)
//! - 설계당 하나의 가변 "현재 상태"(`db::snapshots`)와
//!   번호가 엄격히 증가하는 불변 버전 이력(`db::versions`)
//! - 설계 식별/공유 토큰/삭제 CASCADE (`db::designs`)
//!
//! 실행 파일(`main.rs`)은 설정을 읽고 `routes::api_router`를 띄우기만 합니다.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
