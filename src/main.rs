//! # nutrilabel 웹 서버 진입점
//!
//! 이 파일이 수행하는 작업:
//! 1. 환경변수(.env) 로딩
//! 2. 로깅(tracing) 초기화
//! 3. PostgreSQL 연결 풀 생성
//! 4. API 라우터 + 미들웨어 설정
//! 5. HTTP 서버 시작
//!
//! 테이블 생성/적재는 서버가 하지 않습니다. 먼저 `nutrilabel-ingest`를 실행하세요.

use anyhow::{Context, Result};
use axum::Router;
use nutrilabel::{
    config::Config,
    routes::{self, AppState},
};
use sqlx::postgres::PgPoolOptions;
use std::path::Path;
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// 빌드된 프론트엔드 위치 (있을 때만 서빙)
const FRONTEND_DIST: &str = "../frontend/dist";

#[tokio::main]
async fn main() -> Result<()> {
    // .env 파일이 없어도 에러 없이 넘어갑니다
    dotenvy::dotenv().ok();

    // RUST_LOG가 없으면 nutrilabel, tower_http, axum을 debug 레벨로
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nutrilabel=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("DB_NAME and DB_USER must be set")?;
    tracing::info!("Starting nutrilabel server on {}:{}", config.host, config.port);

    // 연결 풀: 요청마다 연결을 빌려 쓰고, 요청이 끝나면(에러 포함) 반납합니다.
    // connect_lazy_with: 첫 쿼리 때 연결하므로 DB가 늦게 떠도 서버는 먼저 뜹니다.
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect_lazy_with(config.db.connect_options());
    tracing::info!(
        "Document store: postgres://{}@{}:{}/{}",
        config.db.user,
        config.db.host,
        config.db.port,
        config.db.name
    );

    let state = AppState::new(pool);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // SPA이므로 찾을 수 없는 경로는 index.html로 돌려보냅니다
    let app: Router = if Path::new(FRONTEND_DIST).exists() {
        tracing::info!("Serving frontend static files from {}", FRONTEND_DIST);
        let serve_dir = ServeDir::new(FRONTEND_DIST)
            .not_found_service(ServeFile::new(format!("{FRONTEND_DIST}/index.html")));
        routes::router(state).fallback_service(serve_dir)
    } else {
        tracing::warn!("Frontend dist directory not found, serving API only");
        routes::router(state)
    };

    let app = app.layer(cors).layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
