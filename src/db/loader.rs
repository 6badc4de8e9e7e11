//! # 문서 저장소 적재(쓰기) 쿼리 모듈
//!
//! `nutrilabel-ingest` 도구가 사용하는 DDL/INSERT 쿼리입니다.
//! API 서버는 이 모듈을 사용하지 않습니다.
//!
//! ## 주의
//! `recreate_table()`은 기존 테이블을 **무조건 삭제**합니다.
//! 같은 테이블에 대해 적재 도구를 동시에 두 개 이상 실행하면 안 됩니다.

use crate::services::ingest::{BatchSink, IngestError};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::{types::Json, PgPool, Postgres, QueryBuilder};

/// `food_json` 테이블을 삭제하고 빈 테이블로 다시 만듭니다.
///
/// 두 문장을 하나의 트랜잭션으로 묶어 커밋합니다.
pub async fn recreate_table(pool: &PgPool) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("DROP TABLE IF EXISTS food_json")
        .execute(&mut *tx)
        .await?;
    sqlx::query("CREATE TABLE food_json (data JSONB NOT NULL)")
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    tracing::info!("Recreated table food_json");
    Ok(())
}

/// 문서 여러 개를 INSERT 한 번으로 넣고 커밋합니다.
///
/// ```sql
/// INSERT INTO food_json (data) VALUES ($1), ($2), ...
/// ```
/// 각 값은 `sqlx::types::Json`으로 감싸 JSONB로 바인딩됩니다.
/// 빈 배열이면 아무것도 하지 않고 0을 반환합니다.
pub async fn insert_documents(pool: &PgPool, docs: &[Value]) -> Result<u64, sqlx::Error> {
    if docs.is_empty() {
        return Ok(0);
    }

    let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("INSERT INTO food_json (data) ");
    builder.push_values(docs, |mut row, doc| {
        row.push_bind(Json(doc));
    });

    // 트랜잭션은 commit() 전에 drop되면 자동으로 롤백됩니다
    let mut tx = pool.begin().await?;
    let result = builder.build().execute(&mut *tx).await?;
    tx.commit().await?;

    Ok(result.rows_affected())
}

/// 테이블의 전체 행 수 (적재 후 검증용)
pub async fn count_documents(pool: &PgPool) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM food_json")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// PostgreSQL로 배치를 써 넣는 `BatchSink` 구현
pub struct PgSink {
    pool: PgPool,
}

impl PgSink {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BatchSink for PgSink {
    async fn write_batch(&mut self, docs: &[Value]) -> Result<u64, IngestError> {
        Ok(insert_documents(&self.pool, docs).await?)
    }
}
