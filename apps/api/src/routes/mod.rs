pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::render::handlers as render;
use crate::state::AppState;
use crate::templates::handlers as templates;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Template catalog
        .route("/api/v1/templates", get(templates::handle_list_templates))
        .route("/api/v1/templates/:id", get(templates::handle_get_template))
        // Rendering
        .route("/api/v1/render", post(render::handle_render))
        .route("/api/v1/render/html", post(render::handle_render_html))
        .route("/api/v1/render/pdf", post(render::handle_render_pdf))
        .route(
            "/api/v1/resumes/:id/render",
            get(render::handle_render_resume),
        )
        .with_state(state)
}
