//! Document rendering: proposal content to a PDF or HTML artifact.
//!
//! Three template families share one content model:
//!
//! | style   | format | path                                   |
//! |---------|--------|----------------------------------------|
//! | classic | pdf    | native component renderer ([`pdf`])    |
//! | classic | html   | [`html::classic`]                      |
//! | modern  | html   | [`html::modern`]                       |
//! | modern  | pdf    | [`html::modern`] through a [`PdfConverter`] |
//!
//! Every PDF leaving this crate has passed [`validate_pdf`].

pub mod chrome;
mod error;
mod escape;
pub mod html;
pub mod pdf;
mod validate;
mod view;

#[cfg(test)]
mod fixtures;

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use propgen_core::{OutputFormat, ProposalContent, ResearchResult, TemplateStyle};

pub use chrome::{inject_print_css, ChromeConverter, PdfOptions};
pub use error::RenderError;
pub use escape::escape_html;
pub use validate::{validate_pdf, MIN_PDF_BYTES};
pub use view::{RenderContext, Testimonial};

/// Converts a complete HTML document into PDF bytes.
#[async_trait]
pub trait PdfConverter: Send + Sync {
    async fn html_to_pdf(&self, html: &str, options: &PdfOptions) -> Result<Vec<u8>, RenderError>;
}

/// Which renderer produced a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Renderer {
    ClassicPdf,
    ClassicHtml,
    ModernHtml,
    ModernPdf,
}

impl Renderer {
    #[must_use]
    pub fn select(style: TemplateStyle, format: OutputFormat) -> Self {
        match (style, format) {
            (TemplateStyle::Classic, OutputFormat::Pdf) => Renderer::ClassicPdf,
            (TemplateStyle::Classic, OutputFormat::Html) => Renderer::ClassicHtml,
            (TemplateStyle::Modern, OutputFormat::Html) => Renderer::ModernHtml,
            (TemplateStyle::Modern, OutputFormat::Pdf) => Renderer::ModernPdf,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Renderer::ClassicPdf => "classic-pdf",
            Renderer::ClassicHtml => "classic-html",
            Renderer::ModernHtml => "modern-html",
            Renderer::ModernPdf => "modern-pdf",
        }
    }

    #[must_use]
    pub fn format(self) -> OutputFormat {
        match self {
            Renderer::ClassicPdf | Renderer::ModernPdf => OutputFormat::Pdf,
            Renderer::ClassicHtml | Renderer::ModernHtml => OutputFormat::Html,
        }
    }
}

impl std::fmt::Display for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A finished artifact ready for storage.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    pub format: OutputFormat,
    pub renderer: Renderer,
}

impl RenderedDocument {
    #[must_use]
    pub fn content_type(&self) -> &'static str {
        self.format.content_type()
    }
}

/// Dispatches content to the selected template family.
#[derive(Clone)]
pub struct DocumentRenderer {
    converter: Arc<dyn PdfConverter>,
    pdf_options: PdfOptions,
}

impl DocumentRenderer {
    pub fn new(converter: Arc<dyn PdfConverter>) -> Self {
        Self {
            converter,
            pdf_options: PdfOptions::default(),
        }
    }

    #[must_use]
    pub fn with_pdf_options(mut self, options: PdfOptions) -> Self {
        self.pdf_options = options;
        self
    }

    /// Renders `content` with the template chosen by `style` and `format`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] when the browser conversion fails or a PDF
    /// fails validation.
    pub async fn render(
        &self,
        content: &ProposalContent,
        research: Option<&ResearchResult>,
        ctx: &RenderContext,
        style: TemplateStyle,
        format: OutputFormat,
    ) -> Result<RenderedDocument, RenderError> {
        let renderer = Renderer::select(style, format);
        let bytes = match renderer {
            Renderer::ClassicPdf => pdf::render(content, research, ctx),
            Renderer::ClassicHtml => html::classic::render(content, research, ctx).into_bytes(),
            Renderer::ModernHtml => html::modern::render(content, research, ctx).into_bytes(),
            Renderer::ModernPdf => {
                let html = html::modern::render(content, research, ctx);
                self.converter.html_to_pdf(&html, &self.pdf_options).await?
            }
        };
        if renderer.format() == OutputFormat::Pdf {
            validate_pdf(&bytes)?;
        }
        tracing::info!(
            renderer = %renderer,
            kind = content.kind(),
            bytes = bytes.len(),
            "proposal document rendered"
        );
        Ok(RenderedDocument {
            bytes,
            format: renderer.format(),
            renderer,
        })
    }
}

/// Reads the Modern-HTML video testimonials from a YAML list.
///
/// # Errors
///
/// Returns [`RenderError::Testimonials`] when the file cannot be read or parsed.
pub fn load_testimonials(path: &Path) -> Result<Vec<Testimonial>, RenderError> {
    let display = path.display().to_string();
    let raw = std::fs::read_to_string(path).map_err(|e| RenderError::Testimonials {
        path: display.clone(),
        reason: e.to_string(),
    })?;
    serde_yaml::from_str(&raw).map_err(|e| RenderError::Testimonials {
        path: display,
        reason: e.to_string(),
    })
}
