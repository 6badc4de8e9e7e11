//! # 에러 처리 모듈
//!
//! API 서버에서 발생할 수 있는 모든 에러 타입을 정의합니다.
//!
//! 이 모듈의 핵심:
//! - `AppError` 열거형(enum): 모든 에러 종류를 하나의 타입으로 통합
//! - `IntoResponse` 구현: 에러를 HTTP 응답으로 자동 변환
//!
//! 응답 본문 형태: `{ "error": "...", "details": "..." }`
//! (`details`는 서버 내부 에러일 때만 포함됩니다)

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// 애플리케이션에서 발생할 수 있는 모든 에러 종류
///
/// 핸들러에서 `Result<T, AppError>`를 반환하면,
/// Axum이 자동으로 `IntoResponse`를 호출하여 HTTP 응답으로 변환합니다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 조회 결과 없음 (HTTP 404)
    ///
    /// 정상적인 결과의 하나로 취급합니다. 로그에 에러로 남기지 않습니다.
    #[error("{0}")]
    NotFound(String),

    /// 잘못된 요청 파라미터/본문 (HTTP 400)
    #[error("{0}")]
    BadRequest(String),

    /// 받기는 하지만 아직 동작이 정해지지 않은 파라미터 (HTTP 501)
    #[error("{0}")]
    NotImplemented(String),

    /// 저장된 레코드의 숫자 필드를 해석할 수 없음 (HTTP 500)
    #[error("Malformed nutrition record: {0}")]
    MalformedRecord(String),

    /// 데이터베이스 오류 (HTTP 500)
    /// #[from]: sqlx 함수의 에러에 `?`를 쓰면 자동으로 이 variant로 변환됩니다.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl AppError {
    /// 에러 종류에 맞는 HTTP 상태 코드
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
            AppError::MalformedRecord(_) | AppError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    /// AppError를 HTTP 응답으로 변환합니다.
    ///
    /// 내부 에러(500)는 로그에 기록하고, 진단을 위해 원래 에러 메시지를
    /// `details` 필드에 그대로 담아 클라이언트에게도 돌려줍니다.
    fn into_response(self) -> Response {
        let status = self.status();

        let body = if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
            json!({
                "error": "Internal server error",
                "details": self.to_string(),
            })
        } else {
            json!({ "error": self.to_string() })
        };

        (status, Json(body)).into_response()
    }
}
