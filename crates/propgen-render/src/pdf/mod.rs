//! Classic-PDF: content mapped onto a component tree, laid out on A4 pages
//! and written as a PDF directly, with no HTML intermediate.

mod classic;
mod doc;
mod fonts;
mod layout;
mod style;
mod writer;

use chrono::Utc;

use propgen_core::{ProposalContent, ResearchResult};

pub use style::Stylesheet;

use crate::view::RenderContext;
use writer::DocumentInfo;

/// Renders either content variant to PDF bytes.
#[must_use]
pub fn render(
    content: &ProposalContent,
    research: Option<&ResearchResult>,
    ctx: &RenderContext,
) -> Vec<u8> {
    let style = Stylesheet::default();
    let doc = match content {
        ProposalContent::Detailed(d) => classic::detailed(d, research, ctx),
        ProposalContent::Concise(c) => classic::concise(c, research, ctx),
    };
    let pages = layout::layout(&doc, &style);
    tracing::debug!(pages = pages.len(), kind = content.kind(), "classic pdf laid out");
    let info = DocumentInfo {
        title: doc.title.clone(),
        author: ctx.agency_name.clone(),
        created: Utc::now(),
    };
    writer::write_pdf(&pages, &info, &style)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::validate::validate_pdf;

    #[test]
    fn both_variants_produce_valid_pdfs() {
        let ctx = RenderContext::new("Propgen Digital", "16 October 2026");
        for content in [fixtures::concise(), fixtures::detailed()] {
            let bytes = render(&content, None, &ctx);
            validate_pdf(&bytes).expect("valid pdf");
        }
    }

    #[test]
    fn local_price_is_encoded_as_win_ansi_pound() {
        let ctx = RenderContext::new("Propgen Digital", "16 October 2026");
        let bytes = render(&fixtures::concise(), None, &ctx);
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("(Acme Roofing)"));
        assert!(text.contains("(\\2432,000/month)"));
    }
}
