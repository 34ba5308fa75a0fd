use std::sync::Arc;

use sqlx::PgPool;

use crate::export::PdfCapture;
use crate::templates::TemplateStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Template lookup. Default: Postgres with the built-in catalog as fallback.
    pub templates: Arc<dyn TemplateStore>,
    /// PDF capture collaborator. Default: HttpPdfCapture against PDF_CAPTURE_URL.
    pub pdf: Arc<dyn PdfCapture>,
}
