//! Renderer Trait

use async_trait::async_trait;

use super::types::{RenderError, RenderOptions};

/// Boundary to an HTML-to-PDF capability
#[async_trait]
pub trait PdfRenderer: Send + Sync {
    /// Short name for logs and health output
    fn name(&self) -> &'static str;

    /// Check if the renderer can be used
    async fn is_available(&self) -> bool;

    /// Render an HTML document to PDF bytes
    async fn render(&self, html: &str, options: &RenderOptions) -> Result<Vec<u8>, RenderError>;
}
