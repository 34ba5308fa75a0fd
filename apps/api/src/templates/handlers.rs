use axum::{
    extract::{Path, State},
    Json,
};

use crate::errors::AppError;
use crate::models::template::{Template, TemplateSummary};
use crate::state::AppState;

/// GET /api/v1/templates
pub async fn handle_list_templates(
    State(state): State<AppState>,
) -> Result<Json<Vec<TemplateSummary>>, AppError> {
    Ok(Json(state.templates.list().await?))
}

/// GET /api/v1/templates/:id
pub async fn handle_get_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Template>, AppError> {
    let template = state.templates.get(&id).await?;
    Ok(Json(Template::clone(&template)))
}
