//! # 애플리케이션 설정(Configuration) 모듈
//!
//! 환경변수에서 서버/데이터베이스 설정값을 읽어오는 모듈입니다.
//! `.env` 파일이나 시스템 환경변수에서 값을 가져옵니다.
//!
//! 설정 항목:
//! - `DB_NAME`: 데이터베이스 이름 (필수)
//! - `DB_USER`: 데이터베이스 사용자 (필수)
//! - `DB_PASSWORD`: 비밀번호 (기본값: 빈 문자열)
//! - `DB_HOST`: 데이터베이스 호스트 (기본값: `localhost`)
//! - `DB_PORT`: 데이터베이스 포트 (기본값: `5432`)
//! - `DB_MAX_CONNECTIONS`: 연결 풀 최대 크기 (기본값: 5)
//! - `HOST`: 서버 바인딩 주소 (기본값: `0.0.0.0`)
//! - `PORT`: 서버 포트 번호 (기본값: `5000`)

use sqlx::postgres::PgConnectOptions;
use std::env;

/// PostgreSQL 접속 정보
///
/// 서버와 적재 도구(`nutrilabel-ingest`)가 같은 `DB_*` 환경변수를 공유합니다.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub name: String,
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: u16,
}

impl DbConfig {
    /// 환경변수에서 접속 정보를 읽습니다.
    ///
    /// `DB_NAME`, `DB_USER`가 없으면 에러를 반환합니다.
    pub fn from_env() -> Result<Self, env::VarError> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// 키 → 값 조회 함수로부터 접속 정보를 만듭니다.
    ///
    /// `from_env`는 이 함수에 `env::var`를 넘기는 얇은 래퍼입니다.
    /// 테스트에서는 HashMap 조회를 넘겨 전역 환경변수를 건드리지 않습니다.
    pub fn from_vars<F>(get: F) -> Result<Self, env::VarError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            // ok_or: Option → Result 변환. 값이 없으면 VarError::NotPresent
            name: get("DB_NAME").ok_or(env::VarError::NotPresent)?,
            user: get("DB_USER").ok_or(env::VarError::NotPresent)?,
            password: get("DB_PASSWORD").unwrap_or_default(),
            host: get("DB_HOST").unwrap_or_else(|| "localhost".to_string()),
            port: get("DB_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(5432),
        })
    }

    /// sqlx 연결 옵션으로 변환합니다.
    ///
    /// 연결 문자열(URL)을 직접 조립하지 않으므로
    /// 비밀번호에 특수문자가 있어도 이스케이프가 필요 없습니다.
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name)
    }
}

/// 서버 전체 설정을 담는 구조체
///
/// 서버 시작 시 환경변수에서 한 번 읽어온 후 `main`에서만 사용됩니다.
#[derive(Debug, Clone)]
pub struct Config {
    /// 문서 저장소(PostgreSQL) 접속 정보
    pub db: DbConfig,
    /// 연결 풀 최대 크기
    pub max_connections: u32,
    /// 서버가 바인딩할 호스트 주소 (기본값: "0.0.0.0")
    pub host: String,
    /// 서버 포트 번호 (기본값: 5000, 프론트엔드가 기대하는 포트)
    pub port: u16,
}

impl Config {
    /// 환경변수에서 설정값을 읽어 Config 인스턴스를 생성합니다.
    ///
    /// # 에러
    /// `DB_NAME`과 `DB_USER`는 필수이며, 없으면 에러가 발생합니다.
    /// 나머지 설정은 기본값이 있어 환경변수가 없어도 동작합니다.
    pub fn from_env() -> Result<Self, env::VarError> {
        Self::from_vars(|key| env::var(key).ok())
    }

    pub fn from_vars<F>(get: F) -> Result<Self, env::VarError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            db: DbConfig::from_vars(&get)?,
            max_connections: get("DB_MAX_CONNECTIONS")
                .and_then(|n| n.parse().ok())
                .unwrap_or(5),
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            // 파싱 실패 시 기본값 사용
            port: get("PORT").and_then(|p| p.parse().ok()).unwrap_or(5000),
        })
    }
}
