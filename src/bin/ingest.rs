//! # NDJSON 영양 데이터 적재 도구
//!
//! 한 줄에 영양 레코드(JSON 객체) 하나씩 들어 있는 파일을
//! `food_json` 테이블에 일괄 적재합니다.
//!
//! ```text
//! nutrilabel-ingest --file nutrient.json --batch-size 5000
//! ```
//!
//! ## 주의
//! - 실행할 때마다 `food_json` 테이블을 **삭제하고 다시 만듭니다**.
//! - 같은 테이블에 대해 이 도구는 한 번에 하나만 실행해야 합니다.
//! - 형식이 잘못된 줄이 하나라도 있으면 그 자리에서 중단합니다.
//! - `--batch-size`는 1 이상 65535 이하입니다 (쿼리당 바인딩 파라미터 상한).
//!   범위를 벗어나면 테이블을 건드리기 전에 인자 파싱 단계에서 실패합니다.

use anyhow::{Context, Result};
use clap::Parser;
use nutrilabel::{
    config::DbConfig,
    db::{self, PgSink},
    services::ingest::{self, DEFAULT_BATCH_SIZE, MAX_BATCH_SIZE},
};
use sqlx::postgres::PgPoolOptions;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// NDJSON 영양 데이터셋을 food_json 테이블에 적재합니다 (기존 테이블은 삭제됨)
#[derive(Debug, Parser)]
#[command(name = "nutrilabel-ingest", version)]
struct Args {
    /// 입력 NDJSON 파일 경로
    #[arg(long, env = "NUTRIENT_FILE")]
    file: PathBuf,

    /// INSERT 한 번에 넣을 행 수 (1..=65535)
    #[arg(
        long,
        env = "INGEST_BATCH_SIZE",
        default_value_t = DEFAULT_BATCH_SIZE,
        value_parser = parse_batch_size
    )]
    batch_size: usize,
}

/// `--batch-size` 값 검증: 숫자이고 `1..=MAX_BATCH_SIZE` 범위여야 합니다.
fn parse_batch_size(raw: &str) -> Result<usize, String> {
    let size: usize = raw
        .parse()
        .map_err(|_| format!("'{raw}' is not a positive integer"))?;
    if (1..=MAX_BATCH_SIZE).contains(&size) {
        Ok(size)
    } else {
        Err(format!("must be between 1 and {MAX_BATCH_SIZE}"))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nutrilabel=info,nutrilabel_ingest=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let db_config = DbConfig::from_env().context("DB_NAME and DB_USER must be set")?;

    // 입력 파일을 먼저 읽어봅니다. 경로가 틀렸으면 테이블을 지우기 전에 멈춥니다
    tracing::info!("Counting total lines in {}", args.file.display());
    let total = ingest::count_lines(&args.file)
        .await
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    tracing::info!("Total rows: {}", total);

    // 적재는 순차적으로만 하므로 연결 하나면 충분합니다
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect_with(db_config.connect_options())
        .await
        .context("failed to connect to the document store")?;

    db::recreate_table(&pool).await?;

    let mut sink = PgSink::new(pool.clone());
    let report = ingest::load_file(&args.file, args.batch_size, total, &mut sink)
        .await
        .context("ingestion aborted")?;

    let stored = db::count_documents(&pool).await?;
    tracing::info!(
        lines = report.lines,
        inserted = report.inserted,
        batches = report.batches,
        stored,
        "JSON ingestion completed"
    );
    if stored as u64 != report.inserted {
        tracing::warn!(
            "Row count mismatch: inserted {} but table holds {}",
            report.inserted,
            stored
        );
    }

    pool.close().await;
    Ok(())
}
