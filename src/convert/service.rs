//! Conversion Service
//!
//! Validate → allocate name → render → persist. Nothing touches the disk
//! unless the renderer succeeded.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::types::ConversionRequest;
use crate::error::AppError;
use crate::render::{PdfRenderer, RenderOptions};
use crate::store::{expires_at, sanitize_prefix, Artifact, ArtifactStore};

/// Turns HTML into stored, expiring PDF artifacts
#[derive(Clone)]
pub struct Converter {
    store: ArtifactStore,
    renderer: Arc<dyn PdfRenderer>,
    options: RenderOptions,
}

impl Converter {
    pub fn new(store: ArtifactStore, renderer: Arc<dyn PdfRenderer>) -> Self {
        Self {
            store,
            renderer,
            options: RenderOptions::default(),
        }
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    pub fn renderer(&self) -> &dyn PdfRenderer {
        self.renderer.as_ref()
    }

    /// Run one conversion
    ///
    /// `received_at` is when the request reached the handler; the artifact
    /// expires one TTL after it.
    pub async fn convert(
        &self,
        request: ConversionRequest,
        received_at: DateTime<Utc>,
    ) -> Result<Artifact, AppError> {
        if request.html.is_empty() {
            return Err(AppError::BadRequest("html is required".to_string()));
        }

        let prefix = sanitize_prefix(&request.prefix);
        let filename = self.store.allocate_name(&prefix);

        let pdf = self.renderer.render(&request.html, &self.options).await?;

        let artifact = self
            .store
            .persist(filename, &pdf, expires_at(received_at, self.store.ttl()))
            .await?;

        tracing::info!(
            filename = %artifact.filename,
            renderer = self.renderer.name(),
            html_len = request.html.len(),
            pdf_len = pdf.len(),
            expires_at = %artifact.expires_at,
            "Conversion complete"
        );

        Ok(artifact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RenderError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tempfile::TempDir;

    struct StubRenderer {
        fail_with: Option<&'static str>,
        calls: AtomicUsize,
    }

    impl StubRenderer {
        fn ok() -> Arc<Self> {
            Arc::new(Self {
                fail_with: None,
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(message: &'static str) -> Arc<Self> {
            Arc::new(Self {
                fail_with: Some(message),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl PdfRenderer for StubRenderer {
        fn name(&self) -> &'static str {
            "stub"
        }

        async fn is_available(&self) -> bool {
            true
        }

        async fn render(&self, html: &str, options: &RenderOptions) -> Result<Vec<u8>, RenderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert_eq!(options, &RenderOptions::default());
            match self.fail_with {
                Some(message) => Err(RenderError::Failed(message.to_string())),
                None => Ok(format!("%PDF-1.4 {}", html).into_bytes()),
            }
        }
    }

    fn converter(temp_dir: &TempDir, renderer: Arc<StubRenderer>) -> Converter {
        let store = ArtifactStore::new(temp_dir.path().to_path_buf(), Duration::from_secs(300));
        Converter::new(store, renderer)
    }

    fn request(html: &str, prefix: &str) -> ConversionRequest {
        ConversionRequest {
            html: html.to_string(),
            prefix: prefix.to_string(),
        }
    }

    #[tokio::test]
    async fn test_convert_persists_artifact() {
        let temp_dir = TempDir::new().unwrap();
        let converter = converter(&temp_dir, StubRenderer::ok());
        let received_at = Utc::now();

        let artifact = converter
            .convert(request("<p>hi</p>", ""), received_at)
            .await
            .unwrap();

        assert!(artifact.filename.starts_with("file_"));
        assert_eq!(
            std::fs::read(&artifact.path).unwrap(),
            b"%PDF-1.4 <p>hi</p>"
        );
        assert_eq!(artifact.expires_at, received_at + chrono::Duration::minutes(5));
    }

    #[tokio::test]
    async fn test_convert_uses_prefix() {
        let temp_dir = TempDir::new().unwrap();
        let converter = converter(&temp_dir, StubRenderer::ok());

        let artifact = converter
            .convert(request("<p>hi</p>", "invoice"), Utc::now())
            .await
            .unwrap();

        assert!(artifact.filename.starts_with("invoice_"));
    }

    #[tokio::test]
    async fn test_empty_html_rejected_before_render() {
        let temp_dir = TempDir::new().unwrap();
        let renderer = StubRenderer::ok();
        let converter = converter(&temp_dir, renderer.clone());

        let result = converter.convert(request("", "invoice"), Utc::now()).await;

        match result {
            Err(AppError::BadRequest(msg)) => assert_eq!(msg, "html is required"),
            other => panic!("expected bad request, got {:?}", other),
        }
        assert_eq!(renderer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_render_failure_leaves_no_file() {
        let temp_dir = TempDir::new().unwrap();
        let converter = converter(&temp_dir, StubRenderer::failing("Loading page failed"));

        let result = converter.convert(request("<p>hi</p>", ""), Utc::now()).await;

        match result {
            Err(err @ AppError::Render(_)) => assert_eq!(err.to_string(), "Loading page failed"),
            other => panic!("expected render error, got {:?}", other),
        }
        assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }
}
