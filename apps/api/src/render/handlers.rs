use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{Html, IntoResponse},
    Json,
};
use bytes::Bytes;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::compose::{augment_template, compose_resume_data, Basics, ContentBlock};
use crate::errors::AppError;
use crate::export::{wrap_for_print, PrintOptions};
use crate::models::resume::{ResumeData, ResumeRow};
use crate::models::template::Template;
use crate::render::{html::to_html, render, RenderNode};
use crate::state::AppState;

/// Body shared by the render endpoints. Exactly one template source is needed
/// (`template` wins over `templateId`); data is either ready-made `resumeData` or
/// editor `basics` + `blocks`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderRequest {
    pub template_id: Option<String>,
    pub template: Option<Template>,
    pub resume_data: Option<ResumeData>,
    pub basics: Option<Basics>,
    #[serde(default)]
    pub blocks: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
pub struct ResumeRenderQuery {
    pub user_id: Uuid,
    #[serde(default)]
    pub format: RenderFormat,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderFormat {
    #[default]
    Json,
    Html,
}

/// POST /api/v1/render
pub async fn handle_render(
    State(state): State<AppState>,
    Json(req): Json<RenderRequest>,
) -> Result<Json<RenderNode>, AppError> {
    let (template, data) = prepare(&state, req).await?;
    Ok(Json(render_augmented(&template, &data)))
}

/// POST /api/v1/render/html
pub async fn handle_render_html(
    State(state): State<AppState>,
    Json(req): Json<RenderRequest>,
) -> Result<Html<String>, AppError> {
    let (template, data) = prepare(&state, req).await?;
    Ok(Html(to_html(&render_augmented(&template, &data))))
}

/// POST /api/v1/render/pdf
pub async fn handle_render_pdf(
    State(state): State<AppState>,
    Json(req): Json<RenderRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (template, data) = prepare(&state, req).await?;

    let augmented = augment_template(&template, &data);
    let body = to_html(&render(&augmented, &data));
    let options = PrintOptions::for_template(&augmented);
    let document = wrap_for_print(&body, &options);

    let pdf: Bytes = state.pdf.capture(&document, &options).await?;
    info!(template_id = %template.id, bytes = pdf.len(), "PDF exported");

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"resume.pdf\""),
        ],
        pdf,
    ))
}

/// GET /api/v1/resumes/:id/render
pub async fn handle_render_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<ResumeRenderQuery>,
) -> Result<axum::response::Response, AppError> {
    let row = sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(params.user_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("resume {id}")))?;

    let template = state.templates.get(&row.template_id).await?;
    let data = stored_resume_data(&row)?;
    let tree = render_augmented(&template, &data);

    Ok(match params.format {
        RenderFormat::Json => Json(tree).into_response(),
        RenderFormat::Html => Html(to_html(&tree)).into_response(),
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

async fn prepare(state: &AppState, req: RenderRequest) -> Result<(Arc<Template>, ResumeData), AppError> {
    let template = match (req.template, req.template_id) {
        (Some(inline), _) => Arc::new(inline),
        (None, Some(id)) => state.templates.get(&id).await?,
        (None, None) => {
            return Err(AppError::Validation(
                "either templateId or template is required".to_string(),
            ))
        }
    };

    let data = match req.resume_data {
        Some(data) => data,
        None => compose_resume_data(&req.basics.unwrap_or_default(), &req.blocks),
    };

    Ok((template, data))
}

fn render_augmented(template: &Template, data: &ResumeData) -> RenderNode {
    render(&augment_template(template, data), data)
}

/// Prefers the composed snapshot saved with the resume; otherwise recomposes from
/// the stored editor state.
fn stored_resume_data(row: &ResumeRow) -> Result<ResumeData, AppError> {
    if let Some(data) = row.resume_data.as_ref().filter(|d| d.is_object()) {
        return Ok(ResumeData(data.clone()));
    }

    let basics: Basics = match &row.basics {
        Some(value) => serde_json::from_value(value.clone())
            .map_err(|e| anyhow::anyhow!("resume {} has malformed basics: {e}", row.id))?,
        None => Basics::default(),
    };
    let blocks: Vec<ContentBlock> = match &row.content {
        Some(value) => serde_json::from_value(value.clone())
            .map_err(|e| anyhow::anyhow!("resume {} has malformed content blocks: {e}", row.id))?,
        None => Vec::new(),
    };

    Ok(compose_resume_data(&basics, &blocks))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn row(resume_data: Option<serde_json::Value>) -> ResumeRow {
        ResumeRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "My Resume".to_string(),
            template_id: "modern-professional".to_string(),
            theme: None,
            style: None,
            basics: Some(json!({ "name": "Jane Doe", "label": "Engineer" })),
            content: Some(json!([
                { "type": "header" },
                { "type": "skills", "groups": [{ "keywords": ["Rust"] }] }
            ])),
            resume_data,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_request_accepts_either_data_shape() {
        let req: RenderRequest = serde_json::from_value(json!({
            "templateId": "modern-professional",
            "basics": { "name": "Jane" },
            "blocks": [{ "type": "summary", "content": "Engineer" }]
        }))
        .unwrap();
        assert_eq!(req.template_id.as_deref(), Some("modern-professional"));
        assert!(req.resume_data.is_none());
        assert_eq!(req.blocks.len(), 1);

        let req: RenderRequest = serde_json::from_value(json!({
            "templateId": "minimal-clean",
            "resumeData": { "personalInfo": { "name": "Jane" } }
        }))
        .unwrap();
        assert!(req.resume_data.is_some());
        assert!(req.blocks.is_empty());
    }

    #[test]
    fn test_stored_snapshot_is_preferred() {
        let data = stored_resume_data(&row(Some(json!({ "skills": ["Go"] })))).unwrap();
        assert_eq!(data.as_value()["skills"], json!(["Go"]));
    }

    #[test]
    fn test_stored_editor_state_is_recomposed() {
        let data = stored_resume_data(&row(None)).unwrap();
        assert_eq!(data.as_value()["personalInfo"]["name"], "Jane Doe");
        assert_eq!(data.as_value()["skills"], json!(["Rust"]));
    }

    #[test]
    fn test_malformed_stored_blocks_are_internal_errors() {
        let mut broken = row(None);
        broken.content = Some(json!({ "not": "a list" }));
        assert!(matches!(
            stored_resume_data(&broken),
            Err(AppError::Internal(_))
        ));
    }
}
