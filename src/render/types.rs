//! Render Types

use std::fmt;
use std::time::Duration;

/// Paper size passed to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageSize {
    #[default]
    A4,
}

impl PageSize {
    /// Name understood by the renderer's `--page-size` flag
    pub fn as_str(&self) -> &'static str {
        match self {
            PageSize::A4 => "A4",
        }
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Layout options for a single render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub margin_top_mm: u32,
    pub margin_bottom_mm: u32,
    pub margin_left_mm: u32,
    pub margin_right_mm: u32,
    pub page_size: PageSize,
    /// Let the renderer resolve local file paths referenced by the HTML
    pub enable_local_file_access: bool,
}

impl Default for RenderOptions {
    /// 6mm margins on A4 with local file access
    fn default() -> Self {
        Self {
            margin_top_mm: 6,
            margin_bottom_mm: 6,
            margin_left_mm: 6,
            margin_right_mm: 6,
            page_size: PageSize::A4,
            enable_local_file_access: true,
        }
    }
}

/// Renderer failures
///
/// The display text is what callers see, so variants carrying renderer output
/// print it unchanged.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("renderer not available: {0}")]
    Unavailable(String),

    #[error("{0}")]
    Failed(String),

    #[error("renderer produced no output")]
    EmptyOutput,

    #[error("renderer timed out after {}s", .0.as_secs())]
    TimedOut(Duration),

    #[error("renderer I/O error: {0}")]
    Io(#[from] std::io::Error),
}
