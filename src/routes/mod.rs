//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 처리하는 핸들러 함수들과 API 라우터를 모아둔 모듈입니다.
//!
//! 각 하위 모듈:
//! - `nutrition`: 영양 성분 조회/환산/합산
//! - `foods`: 식품 이름 검색
//! - `health`: 서버 상태 확인 (헬스체크)

pub mod foods;
pub mod health;
pub mod nutrition;

pub use foods::*;
pub use health::*;
pub use nutrition::*;

use crate::db::NutrientSource;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// 애플리케이션 공유 상태
///
/// 모든 요청 핸들러가 `State(state): State<AppState>`로 접근합니다.
/// 저장소는 트레이트 객체로 들고 있어서, 운영에서는 `PgPool`을,
/// 테스트에서는 메모리 구현을 주입할 수 있습니다.
/// Arc라서 clone해도 저장소 자체는 복제되지 않습니다.
#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn NutrientSource>,
}

impl AppState {
    pub fn new(source: impl NutrientSource + 'static) -> Self {
        Self {
            source: Arc::new(source),
        }
    }
}

/// `/api` 아래에 모든 API 라우트를 붙인 라우터를 만듭니다.
///
/// CORS/Trace 미들웨어와 정적 파일 서빙은 `main`에서 덧붙입니다.
pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/nutrition", get(get_nutrition))
        .route("/nutrition/single", get(get_single_nutrition))
        .route("/nutrition/multiple", post(post_multiple_nutrition))
        .route("/foods/search", get(search_foods))
        .route("/health", get(health_check))
        .with_state(state);

    Router::new().nest("/api", api_routes)
}
