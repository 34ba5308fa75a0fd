//! Client for the headless-browser PDF capture service.
//!
//! The service accepts `{ "html": ..., "options": { format, printBackground, margin } }`
//! and answers with the PDF bytes.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::export::print::PrintOptions;

const MAX_RETRIES: u32 = 3;
const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Capture service error (status {status}): {message}")]
    Service { status: u16, message: String },

    #[error("Capture service returned an empty document")]
    Empty,

    #[error("Capture service unavailable after {retries} attempts")]
    Exhausted { retries: u32 },
}

#[async_trait]
pub trait PdfCapture: Send + Sync {
    async fn capture(&self, html: &str, options: &PrintOptions) -> Result<Bytes, CaptureError>;
}

#[derive(Debug, Serialize)]
struct CaptureRequest<'a> {
    html: &'a str,
    options: &'a PrintOptions,
}

#[derive(Clone)]
pub struct HttpPdfCapture {
    client: Client,
    endpoint: String,
    base_delay: Duration,
}

impl HttpPdfCapture {
    pub fn new(endpoint: String, timeout: Duration) -> Result<Self, CaptureError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            endpoint,
            base_delay: DEFAULT_BASE_DELAY,
        })
    }

    /// First retry delay; doubles on each further attempt.
    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }
}

#[async_trait]
impl PdfCapture for HttpPdfCapture {
    /// Retries on 429 and 5xx with exponential backoff; other failures return at once.
    async fn capture(&self, html: &str, options: &PrintOptions) -> Result<Bytes, CaptureError> {
        let request = CaptureRequest { html, options };
        let mut last_error: Option<CaptureError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                let delay = self.base_delay * (1 << (attempt - 1));
                warn!(
                    "PDF capture attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self.client.post(&self.endpoint).json(&request).send().await {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(CaptureError::Http(e));
                    continue;
                }
            };

            let status = response.status();
            if status.as_u16() == 429 || status.is_server_error() {
                let message = response.text().await.unwrap_or_default();
                warn!("PDF capture service returned {}: {}", status, message);
                last_error = Some(CaptureError::Service {
                    status: status.as_u16(),
                    message,
                });
                continue;
            }

            if !status.is_success() {
                return Err(CaptureError::Service {
                    status: status.as_u16(),
                    message: response.text().await.unwrap_or_default(),
                });
            }

            let pdf = response.bytes().await?;
            if pdf.is_empty() {
                return Err(CaptureError::Empty);
            }
            debug!(bytes = pdf.len(), "PDF captured");
            return Ok(pdf);
        }

        Err(last_error.unwrap_or(CaptureError::Exhausted {
            retries: MAX_RETRIES,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
    use serde_json::Value;

    use crate::export::print::PageMargin;

    type Script = Arc<Vec<(StatusCode, &'static str)>>;

    async fn scripted(
        State((script, hits)): State<(Script, Arc<AtomicUsize>)>,
        Json(body): Json<Value>,
    ) -> (StatusCode, &'static str) {
        let n = hits.fetch_add(1, Ordering::SeqCst);
        if body["html"].as_str().is_none() || body["options"]["format"] != "A4" {
            return (StatusCode::BAD_REQUEST, "bad request body");
        }
        script[n.min(script.len() - 1)]
    }

    /// Serves `script` responses in order (the last one repeats) and counts requests.
    async fn spawn_service(script: Vec<(StatusCode, &'static str)>) -> (String, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let app = Router::new()
            .route("/pdf", post(scripted))
            .with_state((Arc::new(script), hits.clone()));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}/pdf"), hits)
    }

    fn options() -> PrintOptions {
        PrintOptions {
            format: "A4".to_string(),
            print_background: true,
            margin: PageMargin {
                top: "15mm".to_string(),
                right: "15mm".to_string(),
                bottom: "15mm".to_string(),
                left: "15mm".to_string(),
            },
            page_background: "#ffffff".to_string(),
        }
    }

    fn client(endpoint: String) -> HttpPdfCapture {
        HttpPdfCapture::new(endpoint, Duration::from_secs(5))
            .unwrap()
            .with_base_delay(Duration::from_millis(1))
    }

    #[tokio::test]
    async fn test_capture_returns_pdf_bytes() {
        let (endpoint, hits) = spawn_service(vec![(StatusCode::OK, "%PDF-1.7")]).await;
        let pdf = client(endpoint).capture("<p>hi</p>", &options()).await.unwrap();
        assert_eq!(&pdf[..], b"%PDF-1.7");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_capture_retries_server_errors() {
        let (endpoint, hits) = spawn_service(vec![
            (StatusCode::SERVICE_UNAVAILABLE, "warming up"),
            (StatusCode::TOO_MANY_REQUESTS, "slow down"),
            (StatusCode::OK, "%PDF-1.7"),
        ])
        .await;
        let pdf = client(endpoint).capture("<p>hi</p>", &options()).await.unwrap();
        assert_eq!(&pdf[..], b"%PDF-1.7");
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_capture_gives_up_after_max_retries() {
        let (endpoint, hits) =
            spawn_service(vec![(StatusCode::INTERNAL_SERVER_ERROR, "browser crashed")]).await;
        let err = client(endpoint).capture("<p>hi</p>", &options()).await.unwrap_err();
        assert!(matches!(err, CaptureError::Service { status: 500, .. }));
        assert_eq!(hits.load(Ordering::SeqCst), MAX_RETRIES as usize);
    }

    #[tokio::test]
    async fn test_capture_does_not_retry_client_errors() {
        let (endpoint, hits) = spawn_service(vec![(StatusCode::UNPROCESSABLE_ENTITY, "no")]).await;
        let err = client(endpoint).capture("<p>hi</p>", &options()).await.unwrap_err();
        assert!(matches!(err, CaptureError::Service { status: 422, .. }));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_capture_rejects_empty_document() {
        let (endpoint, _) = spawn_service(vec![(StatusCode::OK, "")]).await;
        let err = client(endpoint).capture("<p>hi</p>", &options()).await.unwrap_err();
        assert!(matches!(err, CaptureError::Empty));
    }
}
