//! # 헬스체크(Health Check) 핸들러
//!
//! - `GET /api/health` → `{ "status": "ok" }`
//!
//! 프론트엔드가 API 서버 가동 여부를 확인할 때 사용합니다.
//! DB에는 접근하지 않으므로 저장소가 죽어 있어도 200을 반환합니다.

use axum::Json;
use serde_json::{json, Value};

/// `GET /health`: 서버 상태를 확인합니다.
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok"
    }))
}
