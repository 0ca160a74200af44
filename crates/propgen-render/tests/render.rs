use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use propgen_core::{
    calculate_projections, OutputFormat, PackageTier, ProposalContent, ResearchResult,
    TemplateStyle,
};
use propgen_render::{
    validate_pdf, DocumentRenderer, PdfConverter, PdfOptions, RenderContext, RenderError, Renderer,
};

struct NoBrowser;

#[async_trait]
impl PdfConverter for NoBrowser {
    async fn html_to_pdf(&self, _html: &str, _options: &PdfOptions) -> Result<Vec<u8>, RenderError> {
        Err(RenderError::BrowserTimeout(1))
    }
}

fn acme_concise() -> ProposalContent {
    let mut content: ProposalContent = serde_json::from_value(json!({
        "kind": "concise",
        "coverPage": {"companyName": "Acme Roofing", "title": "SEO Growth Proposal"},
        "introduction": {"headline": "More roofing jobs from Google", "keyPoints": ["Leeds, UK"]},
        "competition": {
            "summary": "Directories dominate.",
            "comparisonTable": [{"name": "acmeroofing.co.uk", "isClient": true}],
            "gaps": [],
            "opportunity": ""
        },
        "strategy": {"approach": "Local", "tactics": ["Map pack"], "timeline": [], "outcomes": []},
        "investment": {"packageName": "Local SEO", "monthlyPrice": "£9,999", "deliverables": ["Citations"]},
        "summary": {"benefits": [], "nextSteps": ["Call us"], "callToAction": ""}
    }))
    .unwrap();
    content.apply_projection(&calculate_projections(200, PackageTier::Local, 1_000));
    content.validate().unwrap();
    content
}

fn research_with_competitor() -> ResearchResult {
    serde_json::from_value(json!({
        "enhancedResearch": {
            "keywordData": [],
            "competitors": [{
                "domain": "yorkshireroofers.co.uk",
                "name": "Yorkshire Roofers",
                "bestPosition": 1,
                "appearances": 3,
                "sampleUrl": "https://yorkshireroofers.co.uk/"
            }],
            "locationOpportunities": [],
            "contentGaps": [],
            "queriesRun": 3
        }
    }))
    .unwrap()
}

#[tokio::test]
async fn happy_path_classic_html_uses_tier_price_not_llm_price() {
    let renderer = DocumentRenderer::new(Arc::new(NoBrowser));
    let ctx = RenderContext::new("Propgen Digital", "16 October 2026");
    let doc = renderer
        .render(&acme_concise(), None, &ctx, TemplateStyle::Classic, OutputFormat::Html)
        .await
        .unwrap();
    let html = String::from_utf8(doc.bytes).unwrap();

    assert!(html.contains("Acme Roofing"));
    assert!(html.contains("£2,000"));
    assert!(!html.contains("£9,999"));
}

#[tokio::test]
async fn classic_pdf_needs_no_browser() {
    let renderer = DocumentRenderer::new(Arc::new(NoBrowser));
    let ctx = RenderContext::new("Propgen Digital", "16 October 2026");
    let doc = renderer
        .render(&acme_concise(), None, &ctx, TemplateStyle::Classic, OutputFormat::Pdf)
        .await
        .unwrap();
    assert_eq!(doc.renderer, Renderer::ClassicPdf);
    validate_pdf(&doc.bytes).unwrap();
}

#[tokio::test]
async fn modern_pdf_surfaces_converter_failure() {
    let renderer = DocumentRenderer::new(Arc::new(NoBrowser));
    let ctx = RenderContext::new("Propgen Digital", "16 October 2026");
    let err = renderer
        .render(&acme_concise(), None, &ctx, TemplateStyle::Modern, OutputFormat::Pdf)
        .await
        .unwrap_err();
    assert!(matches!(err, RenderError::BrowserTimeout(1)));
    assert!(err.user_message().contains("HTML format"));
}

#[tokio::test]
async fn empty_comparison_falls_back_to_discovered_competitors() {
    let mut content = acme_concise();
    if let ProposalContent::Concise(c) = &mut content {
        c.competition.comparison_table.clear();
    }
    let renderer = DocumentRenderer::new(Arc::new(NoBrowser));
    let ctx = RenderContext::new("Propgen Digital", "16 October 2026");
    let research = research_with_competitor();
    let doc = renderer
        .render(&content, Some(&research), &ctx, TemplateStyle::Modern, OutputFormat::Html)
        .await
        .unwrap();
    let html = String::from_utf8(doc.bytes).unwrap();
    assert!(html.contains("yorkshireroofers.co.uk"));
}
