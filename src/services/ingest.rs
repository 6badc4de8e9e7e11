//! # NDJSON 일괄 적재 서비스
//!
//! 한 줄에 JSON 객체 하나씩 들어 있는 파일(NDJSON)을 읽어
//! 정해진 크기의 배치로 묶어 저장소에 씁니다.
//!
//! ## 흐름
//! ```text
//! count_lines(path)            ← 1차 패스: 진행률 표시용 전체 줄 수
//! load_file(path, 5000, sink)  ← 2차 패스: 파싱 → 배치 → sink.write_batch()
//! ```
//!
//! ## 실패 정책
//! 형식이 잘못된 줄(빈 줄, JSON 파싱 실패, 객체가 아닌 값)을 만나면
//! 그 자리에서 전체 적재를 중단합니다. 건너뛰고 계속하는 모드는 없습니다.
//! 이미 커밋된 배치는 그대로 남습니다.

// async_trait: 트레이트에 async fn을 두고 dyn/제네릭 양쪽에서 쓰기 위한 매크로
use async_trait::async_trait;
use serde_json::Value;
use std::path::Path;
use thiserror::Error;
// tokio::fs / tokio::io: 스레드를 막지 않는 비동기 파일 읽기
// AsyncBufReadExt: BufReader에 .lines() 메서드를 붙여주는 확장 트레이트
use tokio::{
    fs::File,
    io::{AsyncBufReadExt, BufReader},
};

/// 기본 배치 크기 (INSERT 한 번에 넣는 행 수)
pub const DEFAULT_BATCH_SIZE: usize = 5000;

/// 배치 크기 상한
///
/// 문서 하나가 바인딩 파라미터 하나($1, $2, ...)이고,
/// PostgreSQL 프로토콜은 쿼리당 파라미터 수를 u16으로 표현합니다 (최대 65535).
pub const MAX_BATCH_SIZE: usize = u16::MAX as usize;

/// 적재 중 발생할 수 있는 에러
///
/// `line`은 1부터 시작하는 줄 번호입니다.
// #[derive(Error)]: thiserror가 Display와 std::error::Error 구현을 만들어 줍니다
#[derive(Debug, Error)]
pub enum IngestError {
    /// 파일 열기/읽기 실패. `?`로 std::io::Error가 자동 변환됩니다.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON 문법 오류
    #[error("line {line}: invalid JSON: {source}")]
    Parse {
        line: usize,
        // #[source]: 원인 에러를 Error::source()로 노출합니다 (anyhow 체인에 표시됨)
        #[source]
        source: serde_json::Error,
    },

    #[error("line {line}: empty line")]
    EmptyLine { line: usize },

    #[error("line {line}: expected a JSON object")]
    NotAnObject { line: usize },

    /// INSERT/커밋 실패
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// 배치를 받아 저장하는 대상
///
/// 운영에서는 `db::PgSink`(PostgreSQL 다중 행 INSERT + 커밋),
/// 테스트에서는 메모리에 모아두는 구현을 씁니다.
///
/// `&mut self`: 배치는 한 번에 하나씩 순서대로 씁니다 (동시 쓰기 없음).
#[async_trait]
pub trait BatchSink: Send {
    /// 배치 하나를 쓰고 커밋합니다. 반환값은 실제로 들어간 행 수입니다.
    async fn write_batch(&mut self, docs: &[Value]) -> Result<u64, IngestError>;
}

/// 적재 결과 요약
// Copy: 필드가 모두 숫자라 값 복사가 싸고, Default: 전부 0으로 시작
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// 읽은 줄 수
    pub lines: usize,
    /// 저장소에 들어간 행 수
    pub inserted: u64,
    /// 실행한 INSERT(배치) 횟수
    pub batches: usize,
}

/// 파일의 전체 줄 수를 셉니다 (진행률 계산용 1차 패스).
///
/// 파일이 없거나 읽을 수 없으면 `IngestError::Io`를 돌려줍니다.
/// 적재 도구는 테이블을 지우기 전에 이 함수를 먼저 불러 입력 파일을 확인합니다.
pub async fn count_lines(path: &Path) -> Result<usize, IngestError> {
    // File::open(..).await? → 실패 시 io::Error가 IngestError::Io로 변환되어 반환
    let mut lines = BufReader::new(File::open(path).await?).lines();
    let mut total = 0;
    // next_line(): 다음 줄이 있으면 Some(String), 파일 끝이면 None
    while lines.next_line().await?.is_some() {
        total += 1;
    }
    Ok(total)
}

/// 한 줄을 JSON 객체로 파싱합니다.
///
/// 앞뒤 공백은 무시합니다. 공백뿐인 줄, JSON이 아닌 줄,
/// 객체가 아닌 JSON 값(배열, 숫자 등)은 모두 에러입니다.
pub fn parse_line(line: &str, line_no: usize) -> Result<Value, IngestError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(IngestError::EmptyLine { line: line_no });
    }

    // map_err(): serde_json::Error에 줄 번호를 붙여 IngestError로 바꿉니다
    let value: Value = serde_json::from_str(trimmed).map_err(|source| IngestError::Parse {
        line: line_no,
        source,
    })?;

    if !value.is_object() {
        return Err(IngestError::NotAnObject { line: line_no });
    }
    Ok(value)
}

/// 배치 하나를 쓰고 진행률을 로그로 남깁니다.
///
/// `S: ?Sized`: `dyn BatchSink`처럼 크기를 모르는 타입도 받을 수 있게 합니다.
async fn flush<S: BatchSink + ?Sized>(
    sink: &mut S,
    batch: &mut Vec<Value>,
    report: &mut LoadReport,
    total_lines: usize,
) -> Result<(), IngestError> {
    report.inserted += sink.write_batch(batch.as_slice()).await?;
    report.batches += 1;
    // clear(): 길이만 0으로 만들고 할당된 용량은 유지해 다음 배치에 재사용합니다
    batch.clear();

    let percent = if total_lines == 0 {
        100.0
    } else {
        report.lines as f64 * 100.0 / total_lines as f64
    };
    tracing::info!(
        "Inserted {}/{} lines ({:.1}%)",
        report.lines,
        total_lines,
        percent
    );
    Ok(())
}

/// 요청한 배치 크기를 `1..=MAX_BATCH_SIZE`로 보정합니다.
pub fn batch_capacity(requested: usize) -> usize {
    requested.clamp(1, MAX_BATCH_SIZE)
}

/// 파일을 순서대로 읽어 `batch_size`개씩 `sink`에 씁니다.
///
/// # 매개변수
/// - `total_lines`: `count_lines()`로 미리 센 줄 수 (진행률 표시에만 사용)
/// - `batch_size`: `1..=MAX_BATCH_SIZE` 범위로 보정합니다 (0이면 1)
///
/// # 에러
/// 첫 번째 잘못된 줄에서 즉시 중단하며, 아직 쓰지 않은 배치는 버립니다.
pub async fn load_file<S: BatchSink + ?Sized>(
    path: &Path,
    batch_size: usize,
    total_lines: usize,
    sink: &mut S,
) -> Result<LoadReport, IngestError> {
    let batch_size = batch_capacity(batch_size);
    let mut lines = BufReader::new(File::open(path).await?).lines();
    let mut batch = Vec::with_capacity(batch_size);
    let mut report = LoadReport::default();

    while let Some(line) = lines.next_line().await? {
        report.lines += 1;
        // 잘못된 줄이면 ?로 즉시 반환: 아직 쓰지 않은 batch는 버려집니다
        batch.push(parse_line(&line, report.lines)?);

        if batch.len() >= batch_size {
            flush(sink, &mut batch, &mut report, total_lines).await?;
        }
    }

    // 남은 행 처리
    if !batch.is_empty() {
        flush(sink, &mut batch, &mut report, total_lines).await?;
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// 받은 배치를 메모리에 모아두는 sink
    #[derive(Default)]
    struct MemorySink {
        batches: Vec<Vec<Value>>,
    }

    #[async_trait]
    impl BatchSink for MemorySink {
        async fn write_batch(&mut self, docs: &[Value]) -> Result<u64, IngestError> {
            self.batches.push(docs.to_vec());
            Ok(docs.len() as u64)
        }
    }

    fn ndjson(lines: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(file, "{line}").unwrap();
        }
        file.flush().unwrap();
        file
    }

    fn records(n: usize) -> Vec<String> {
        (0..n)
            .map(|i| {
                format!(
                    r#"{{"orig_food_common_name":"food {i}","source_type":"Nutrient","orig_source_name":"Protein","standard_content":"{i}.5","orig_unit":"g"}}"#
                )
            })
            .collect()
    }

    #[tokio::test]
    async fn every_line_becomes_one_document() {
        let lines = records(7);
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let file = ndjson(&refs);

        let total = count_lines(file.path()).await.unwrap();
        let mut sink = MemorySink::default();
        let report = load_file(file.path(), 3, total, &mut sink).await.unwrap();

        assert_eq!(total, 7);
        assert_eq!(report, LoadReport { lines: 7, inserted: 7, batches: 3 });
        let sizes: Vec<usize> = sink.batches.iter().map(Vec::len).collect();
        assert_eq!(sizes, [3, 3, 1]);
        assert_eq!(sink.batches[2][0]["orig_food_common_name"], "food 6");
    }

    #[tokio::test]
    async fn exact_multiple_of_batch_size_has_no_trailing_batch() {
        let lines = records(4);
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let file = ndjson(&refs);

        let mut sink = MemorySink::default();
        let report = load_file(file.path(), 2, 4, &mut sink).await.unwrap();
        assert_eq!(report.batches, 2);
        assert_eq!(report.inserted, 4);
    }

    #[tokio::test]
    async fn malformed_line_aborts_the_run() {
        let file = ndjson(&[r#"{"a":1}"#, r#"{"a":2}"#, "{not json", r#"{"a":4}"#]);

        let mut sink = MemorySink::default();
        let err = load_file(file.path(), 2, 4, &mut sink).await.unwrap_err();

        assert!(matches!(err, IngestError::Parse { line: 3, .. }));
        // 실패 전에 가득 찬 첫 배치만 기록됨
        assert_eq!(sink.batches.len(), 1);
    }

    #[test]
    fn blank_and_non_object_lines_are_rejected() {
        assert!(matches!(parse_line("   ", 5), Err(IngestError::EmptyLine { line: 5 })));
        assert!(matches!(parse_line("[1,2]", 9), Err(IngestError::NotAnObject { line: 9 })));
        assert!(parse_line(r#" {"ok":true} "#, 1).is_ok());
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = count_lines(&dir.path().join("nutrient.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, IngestError::Io(_)));
    }

    #[tokio::test]
    async fn oversized_batch_size_is_capped() {
        let lines = records(2);
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let file = ndjson(&refs);

        let mut sink = MemorySink::default();
        let report = load_file(file.path(), usize::MAX, 2, &mut sink).await.unwrap();
        assert_eq!(report.batches, 1);
        assert_eq!(batch_capacity(usize::MAX), MAX_BATCH_SIZE);
        assert_eq!(batch_capacity(0), 1);
    }

    #[tokio::test]
    async fn empty_file_writes_nothing() {
        let file = ndjson(&[]);
        let mut sink = MemorySink::default();
        let report = load_file(file.path(), DEFAULT_BATCH_SIZE, 0, &mut sink)
            .await
            .unwrap();
        assert_eq!(report, LoadReport::default());
        assert!(sink.batches.is_empty());
    }
}
