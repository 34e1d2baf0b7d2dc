//! wkhtmltopdf Renderer
//!
//! Streams the HTML through `wkhtmltopdf - -`: the document goes in on stdin
//! and the PDF comes back on stdout, so no scratch files are involved.
//!
//! ## Requirements
//!
//! - `wkhtmltopdf` must be installed and available in PATH, or configured via
//!   `WKHTMLTOPDF_PATH`

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::provider::PdfRenderer;
use super::types::{RenderError, RenderOptions};

/// Configuration for the wkhtmltopdf renderer
#[derive(Debug, Clone)]
pub struct WkHtmlToPdfConfig {
    /// Path to the wkhtmltopdf executable (default: "wkhtmltopdf" - uses PATH)
    pub binary_path: String,
    /// Abort renders that run longer than this (default: none)
    pub timeout: Option<Duration>,
}

impl Default for WkHtmlToPdfConfig {
    fn default() -> Self {
        Self {
            binary_path: "wkhtmltopdf".to_string(),
            timeout: None,
        }
    }
}

/// HTML-to-PDF renderer backed by the wkhtmltopdf CLI
pub struct WkHtmlToPdf {
    config: WkHtmlToPdfConfig,
}

impl WkHtmlToPdf {
    pub fn new(config: WkHtmlToPdfConfig) -> Self {
        Self { config }
    }

    /// Command line for a stdin-to-stdout render
    fn build_args(options: &RenderOptions) -> Vec<String> {
        let mut args = vec![
            "--quiet".to_string(),
            "--page-size".to_string(),
            options.page_size.to_string(),
            "--margin-top".to_string(),
            format!("{}mm", options.margin_top_mm),
            "--margin-bottom".to_string(),
            format!("{}mm", options.margin_bottom_mm),
            "--margin-left".to_string(),
            format!("{}mm", options.margin_left_mm),
            "--margin-right".to_string(),
            format!("{}mm", options.margin_right_mm),
        ];

        if options.enable_local_file_access {
            args.push("--enable-local-file-access".to_string());
        }

        // Use - for stdin and stdout
        args.push("-".to_string());
        args.push("-".to_string());

        args
    }

    async fn run(&self, html: &str, options: &RenderOptions) -> Result<Vec<u8>, RenderError> {
        let mut child = Command::new(&self.config.binary_path)
            .args(Self::build_args(options))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                RenderError::Unavailable(format!(
                    "failed to spawn {}: {}",
                    self.config.binary_path, e
                ))
            })?;

        let mut stdin = child.stdin.take().ok_or_else(|| {
            RenderError::Unavailable("renderer stdin was not captured".to_string())
        })?;

        // Feed stdin while collecting stdout so neither pipe can stall the other
        let feed = async move {
            stdin.write_all(html.as_bytes()).await?;
            stdin.shutdown().await
        };

        let (fed, output) = tokio::join!(feed, child.wait_with_output());
        let output = output?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(RenderError::Failed(if stderr.is_empty() {
                format!("{} exited with {}", self.config.binary_path, output.status)
            } else {
                stderr
            }));
        }

        fed?;

        if output.stdout.is_empty() {
            return Err(RenderError::EmptyOutput);
        }

        Ok(output.stdout)
    }
}

#[async_trait]
impl PdfRenderer for WkHtmlToPdf {
    fn name(&self) -> &'static str {
        "wkhtmltopdf"
    }

    async fn is_available(&self) -> bool {
        let result = Command::new(&self.config.binary_path)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        matches!(result, Ok(status) if status.success())
    }

    async fn render(&self, html: &str, options: &RenderOptions) -> Result<Vec<u8>, RenderError> {
        let start_time = std::time::Instant::now();

        let pdf = match self.config.timeout {
            Some(limit) => tokio::time::timeout(limit, self.run(html, options))
                .await
                .map_err(|_| RenderError::TimedOut(limit))??,
            None => self.run(html, options).await?,
        };

        tracing::debug!(
            html_len = html.len(),
            pdf_len = pdf.len(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "wkhtmltopdf render complete"
        );

        Ok(pdf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args() {
        let args = WkHtmlToPdf::build_args(&RenderOptions::default());

        assert_eq!(
            args,
            vec![
                "--quiet",
                "--page-size",
                "A4",
                "--margin-top",
                "6mm",
                "--margin-bottom",
                "6mm",
                "--margin-left",
                "6mm",
                "--margin-right",
                "6mm",
                "--enable-local-file-access",
                "-",
                "-",
            ]
        );
    }

    #[test]
    fn test_args_without_local_file_access() {
        let options = RenderOptions {
            margin_top_mm: 10,
            enable_local_file_access: false,
            ..RenderOptions::default()
        };
        let args = WkHtmlToPdf::build_args(&options);

        assert!(args.contains(&"10mm".to_string()));
        assert!(!args.contains(&"--enable-local-file-access".to_string()));
    }

    #[tokio::test]
    async fn test_missing_binary_is_unavailable() {
        let renderer = WkHtmlToPdf::new(WkHtmlToPdfConfig {
            binary_path: "/nonexistent/wkhtmltopdf".to_string(),
            timeout: None,
        });

        assert!(!renderer.is_available().await);

        let result = renderer
            .render("<p>hi</p>", &RenderOptions::default())
            .await;
        assert!(matches!(result, Err(RenderError::Unavailable(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_slow_renderer_times_out() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = tempfile::TempDir::new().unwrap();
        let script = temp_dir.path().join("slow-renderer.sh");
        std::fs::write(&script, "#!/bin/sh\nexec sleep 5\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let renderer = WkHtmlToPdf::new(WkHtmlToPdfConfig {
            binary_path: script.to_string_lossy().to_string(),
            timeout: Some(Duration::from_millis(100)),
        });

        let start = std::time::Instant::now();
        let result = renderer
            .render("<p>hi</p>", &RenderOptions::default())
            .await;

        assert!(matches!(result, Err(RenderError::TimedOut(limit)) if limit == Duration::from_millis(100)));
        assert!(start.elapsed() < Duration::from_secs(2));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_renderer_surfaces_stderr() {
        // `false` ignores its arguments and exits non-zero without output
        let renderer = WkHtmlToPdf::new(WkHtmlToPdfConfig {
            binary_path: "false".to_string(),
            timeout: Some(Duration::from_secs(5)),
        });

        let result = renderer
            .render("<p>hi</p>", &RenderOptions::default())
            .await;
        match result {
            Err(RenderError::Failed(msg)) => assert!(msg.contains("exited with")),
            other => panic!("expected render failure, got {:?}", other.map(|b| b.len())),
        }
    }
}
