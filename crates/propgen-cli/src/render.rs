//! `render`: re-renders stored content without calling the model.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use chrono::Local;

use propgen_core::text::proposal_filename;
use propgen_core::{OutputFormat, ProposalContent, ResearchResult, TemplateStyle};
use propgen_render::{ChromeConverter, DocumentRenderer, RenderContext};

#[derive(Debug)]
pub(crate) struct RenderArgs {
    pub content: PathBuf,
    pub research: Option<PathBuf>,
    pub style: TemplateStyle,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub number: Option<String>,
    pub agency: String,
    pub browser: PathBuf,
    pub no_sandbox: bool,
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

/// Renders the content file and writes the artifact, returning its path.
///
/// # Errors
///
/// Returns an error if an input cannot be parsed, the content is missing a
/// field the template needs, the browser conversion fails, or the output
/// cannot be written.
pub(crate) async fn run_render(args: &RenderArgs) -> anyhow::Result<PathBuf> {
    let content: ProposalContent = read_json(&args.content)?;
    content
        .validate()
        .map_err(|e| anyhow::anyhow!("content is not renderable: {e}"))?;
    let research: Option<ResearchResult> =
        args.research.as_deref().map(read_json).transpose()?;

    let today = Local::now().date_naive();
    let mut ctx = RenderContext::new(&args.agency, &today.format("%-d %B %Y").to_string());
    ctx.proposal_number.clone_from(&args.number);

    let renderer = DocumentRenderer::new(Arc::new(ChromeConverter::new(
        args.browser.clone(),
        args.no_sandbox,
    )));
    let doc = renderer
        .render(&content, research.as_ref(), &ctx, args.style, args.format)
        .await?;

    let path = args.output.clone().unwrap_or_else(|| {
        PathBuf::from(proposal_filename(
            &content.cover_page().company_name,
            args.number.as_deref(),
            today,
            doc.format.extension(),
        ))
    });
    std::fs::write(&path, &doc.bytes)
        .with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(
        renderer = %doc.renderer,
        bytes = doc.bytes.len(),
        path = %path.display(),
        "document written"
    );
    Ok(path)
}
