pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::gaps::handlers::handle_analyze_gaps;
use crate::generation::handlers::handle_generate_cv;
use crate::state::AppState;
use crate::upload::handlers::handle_extract_text;

/// Upper bound on uploaded PDF size.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/extract-text",
            post(handle_extract_text).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/analyze-gaps", post(handle_analyze_gaps))
        .route("/generate-cv", post(handle_generate_cv))
        .with_state(state)
}
