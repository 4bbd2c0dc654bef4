use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use rtb_engine::Leaderboard;

use crate::config::ServerConfig;
use crate::handler::{self, AppState};

/// Build the axum router: JSON API under `/api`, and the built frontend for
/// every other path when `static_dir` exists on disk.
pub fn build_router(board: Leaderboard, config: &ServerConfig) -> Router {
    let api = Router::new()
        .route("/api/health", get(handler::health_handler))
        .route("/api/leaderboard", get(handler::leaderboard_handler))
        .route("/api/submit", post(handler::submit_handler))
        .route("/api/new-code", get(handler::new_code_handler))
        .with_state(AppState { board });

    let mut router = match config.static_dir.as_ref().filter(|dir| dir.is_dir()) {
        Some(dir) => {
            let spa = ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html")));
            api.fallback_service(spa)
        }
        None => api,
    };

    if config.allow_any_origin {
        router = router.layer(CorsLayer::permissive());
    }
    router.layer(TraceLayer::new_for_http())
}
