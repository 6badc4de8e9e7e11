//! # nutrilabel
//!
//! JSONB 문서 테이블(`food_json`)에 저장된 영양 성분 데이터를
//! HTTP API로 제공하는 서버와, NDJSON 데이터셋 적재 도구가 공유하는 라이브러리입니다.
//!
//! ```text
//! routes (axum 핸들러)
//!   └─ services::{lookup, aggregate}
//!        └─ db::NutrientSource ── PgPool → PostgreSQL food_json
//!
//! bin/ingest.rs
//!   └─ services::ingest ── db::PgSink → PostgreSQL food_json
//! ```

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
