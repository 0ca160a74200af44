//! HTML to PDF through a headless Chromium process.
//!
//! A fresh browser is launched per conversion inside its own temporary
//! profile directory and killed when the conversion future is dropped, so a
//! timed-out or cancelled run never leaves a browser behind.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::timeout;

use propgen_core::AppConfig;

use crate::validate::validate_pdf;
use crate::{PdfConverter, RenderError};

const VIEWPORT: &str = "1280,1800";
const STDERR_EXCERPT: usize = 500;

/// Print settings for one conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfOptions {
    /// CSS page size keyword (`A4`, `Letter`).
    pub page_size: String,
    pub margin_mm: f32,
    pub landscape: bool,
    /// Ceiling on image loading. Images still incomplete at this point are
    /// hidden rather than printed half-decoded.
    pub image_wait_ms: u64,
    /// Further time for fonts and scripts to settle once images are done.
    pub ready_wait_ms: u64,
    pub timeout_secs: u64,
}

impl PdfOptions {
    /// Chromium's `--virtual-time-budget`: the image ceiling followed by the
    /// ready ceiling.
    #[must_use]
    pub fn virtual_time_budget_ms(&self) -> u64 {
        self.image_wait_ms.saturating_add(self.ready_wait_ms)
    }
}

impl Default for PdfOptions {
    fn default() -> Self {
        Self {
            page_size: "A4".to_string(),
            margin_mm: 10.0,
            landscape: false,
            image_wait_ms: 3_000,
            ready_wait_ms: 5_000,
            timeout_secs: 60,
        }
    }
}

/// Print overrides: force background colours, flatten transforms and
/// animations, unstick sticky elements, keep cards and rows whole.
const PRINT_CSS: &str = r"
  * { -webkit-print-color-adjust: exact !important; print-color-adjust: exact !important; }
  *, *::before, *::after { transform: none !important; animation: none !important; transition: none !important; }
  [style*='sticky'], .sticky { position: static !important; }
  .reveal { opacity: 1 !important; }
  table { border-collapse: collapse !important; }
  th, td { border: 1px solid #e2e8f0 !important; }
  tr, img, section > div, .page, blockquote, li { break-inside: avoid; page-break-inside: avoid; }
  h1, h2, h3 { break-after: avoid; page-break-after: avoid; }
  iframe { display: none !important; }
";

/// Returns `html` with the print stylesheet and the image deadline script
/// inserted before `</head>` (or prepended when the document has no head).
#[must_use]
pub fn inject_print_css(html: &str, options: &PdfOptions) -> String {
    let orientation = if options.landscape { " landscape" } else { "" };
    let style = format!(
        "<style media=\"print\">@page {{ size: {}{orientation}; margin: {}mm; }}{PRINT_CSS}</style>\
         <script>setTimeout(function () {{ document.querySelectorAll('img').forEach(function (img) {{ \
         if (!img.complete || img.naturalWidth === 0) {{ img.style.visibility = 'hidden'; }} }}); }}, {});</script>",
        options.page_size, options.margin_mm, options.image_wait_ms
    );
    match html.to_ascii_lowercase().find("</head>") {
        Some(at) => {
            let mut out = String::with_capacity(html.len() + style.len());
            out.push_str(&html[..at]);
            out.push_str(&style);
            out.push_str(&html[at..]);
            out
        }
        None => format!("{style}{html}"),
    }
}

/// Launches `chromium --headless --print-to-pdf` per conversion.
#[derive(Debug, Clone)]
pub struct ChromeConverter {
    binary: PathBuf,
    no_sandbox: bool,
}

impl ChromeConverter {
    pub fn new(binary: impl Into<PathBuf>, no_sandbox: bool) -> Self {
        Self {
            binary: binary.into(),
            no_sandbox,
        }
    }

    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self::new(config.chrome_path.clone(), config.chrome_no_sandbox)
    }

    fn command(&self, input: &str, output: &str, profile: &str, options: &PdfOptions) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.arg("--headless")
            .arg("--disable-gpu")
            .arg("--hide-scrollbars")
            .arg("--mute-audio")
            .arg("--no-first-run")
            .arg("--no-pdf-header-footer")
            .arg("--run-all-compositor-stages-before-draw")
            .arg(format!("--window-size={VIEWPORT}"))
            .arg(format!(
                "--virtual-time-budget={}",
                options.virtual_time_budget_ms()
            ))
            .arg(format!("--user-data-dir={profile}"))
            .arg(format!("--print-to-pdf={output}"));
        if self.no_sandbox {
            cmd.arg("--no-sandbox");
        }
        cmd.arg(format!("file://{input}"))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl PdfConverter for ChromeConverter {
    async fn html_to_pdf(&self, html: &str, options: &PdfOptions) -> Result<Vec<u8>, RenderError> {
        let started = Instant::now();
        let workdir = tempfile::tempdir()?;
        let input = workdir.path().join("input.html");
        let output = workdir.path().join("output.pdf");
        let profile = workdir.path().join("profile");
        tokio::fs::write(&input, inject_print_css(html, options)).await?;

        let mut cmd = self.command(
            &input.to_string_lossy(),
            &output.to_string_lossy(),
            &profile.to_string_lossy(),
            options,
        );
        let child = cmd.spawn().map_err(|source| RenderError::BrowserLaunch {
            binary: self.binary.display().to_string(),
            source,
        })?;

        let result = timeout(
            Duration::from_secs(options.timeout_secs),
            child.wait_with_output(),
        )
        .await
        .map_err(|_| RenderError::BrowserTimeout(options.timeout_secs))??;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(RenderError::BrowserFailed {
                status: result.status.to_string(),
                stderr: propgen_core::text::excerpt(stderr.trim(), STDERR_EXCERPT),
            });
        }

        let bytes = tokio::fs::read(&output).await.map_err(|e| {
            RenderError::InvalidPdf(format!("browser produced no output file: {e}"))
        })?;
        validate_pdf(&bytes)?;

        tracing::info!(
            bytes = bytes.len(),
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "html converted to pdf"
        );
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn print_css_lands_inside_head() {
        let html = "<html><HEAD><title>x</title></HEAD><body></body></html>";
        let out = inject_print_css(html, &PdfOptions::default());
        let style_at = out.find("<style media=\"print\">").unwrap();
        let head_close = out.find("</HEAD>").unwrap();
        assert!(style_at < head_close);
        assert!(out.contains("@page { size: A4; margin: 10mm; }"));
        assert!(out.contains("print-color-adjust: exact"));
        assert!(out.contains("position: static"));
    }

    #[test]
    fn headless_documents_get_css_prepended() {
        let options = PdfOptions {
            landscape: true,
            page_size: "Letter".into(),
            ..PdfOptions::default()
        };
        let out = inject_print_css("<p>hi</p>", &options);
        assert!(out.starts_with("<style media=\"print\">@page { size: Letter landscape;"));
        assert!(out.ends_with("<p>hi</p>"));
    }

    #[test]
    fn image_and_ready_waits_are_budgeted_separately() {
        let options = PdfOptions::default();
        assert_eq!(options.image_wait_ms, 3_000);
        assert_eq!(options.ready_wait_ms, 5_000);

        let out = inject_print_css("<html><head></head><body></body></html>", &options);
        assert!(out.contains("}, 3000);</script></head>"), "{out}");

        let converter = ChromeConverter::new("chromium", false);
        let cmd = converter.command("/tmp/in.html", "/tmp/out.pdf", "/tmp/profile", &options);
        let args: Vec<String> = cmd
            .as_std()
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert!(args.contains(&"--virtual-time-budget=8000".to_string()), "{args:?}");
        assert!(!args.contains(&"--no-sandbox".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("file:///tmp/in.html"));
    }

    #[tokio::test]
    async fn missing_browser_is_a_launch_error() {
        let converter = ChromeConverter::new("/nonexistent/propgen-chromium", true);
        let err = converter
            .html_to_pdf("<html><head></head></html>", &PdfOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RenderError::BrowserLaunch { .. }), "{err:?}");
    }
}
