//! Shared generation flow for both content variants.

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;

use propgen_core::projection::{
    calculate_projections_with, DEFAULT_CURRENT_TRAFFIC, DEFAULT_DEAL_VALUE,
};
use propgen_core::text::sanitize_content_value;
use propgen_core::{
    ConversionOverrides, PackageTier, ProjectionCalculation, ProposalContent, ProposalMode,
    ResearchRequest, ResearchResult,
};
use propgen_llm::{extract_json, CallOptions, LlmGateway, TokenUsage};

use crate::concise::ConciseGenerator;
use crate::detailed::DetailedGenerator;
use crate::error::ContentError;
use crate::reference::ReferenceDocument;

/// Everything a generator needs for one proposal.
#[derive(Debug, Clone)]
pub struct ContentRequest {
    pub company: ResearchRequest,
    pub research: ResearchResult,
    /// Sales-rep notes; treated as ground truth in the prompt.
    pub sdr_notes: Option<String>,
    pub deal_value: Option<u64>,
    pub overrides: ConversionOverrides,
    pub premium: bool,
    /// Human-readable date for the cover page ("16 October 2026").
    pub date_label: String,
}

impl ContentRequest {
    #[must_use]
    pub fn tier(&self) -> PackageTier {
        self.company.tier
    }

    /// Projection from research traffic (or the conservative default).
    #[must_use]
    pub fn projection(&self) -> ProjectionCalculation {
        let traffic = self
            .research
            .current_monthly_traffic()
            .unwrap_or(DEFAULT_CURRENT_TRAFFIC);
        calculate_projections_with(
            traffic,
            self.company.tier,
            self.deal_value.unwrap_or(DEFAULT_DEAL_VALUE),
            &self.overrides,
        )
    }
}

#[derive(Debug, Clone)]
pub struct GeneratedContent {
    pub content: ProposalContent,
    pub projection: ProjectionCalculation,
    pub usage: TokenUsage,
    pub cost: Decimal,
    pub model: String,
}

#[async_trait]
pub trait ProposalGenerator: Send + Sync {
    /// # Errors
    ///
    /// Returns [`ContentError`] when the LLM call fails, the answer is not
    /// JSON, does not fit the schema, or is incomplete.
    async fn generate(&self, request: &ContentRequest) -> Result<GeneratedContent, ContentError>;
}

/// Both generators, selected by [`ProposalMode`].
pub struct ContentGenerators {
    pub detailed: DetailedGenerator,
    pub concise: ConciseGenerator,
}

impl ContentGenerators {
    #[must_use]
    pub fn new(llm: Arc<dyn LlmGateway>, reference: Arc<ReferenceDocument>) -> Self {
        Self {
            detailed: DetailedGenerator::new(Arc::clone(&llm), Arc::clone(&reference)),
            concise: ConciseGenerator::new(llm, reference),
        }
    }

    #[must_use]
    pub fn for_mode(&self, mode: ProposalMode) -> &dyn ProposalGenerator {
        match mode {
            ProposalMode::Detailed => &self.detailed,
            ProposalMode::Concise => &self.concise,
        }
    }
}

/// Call → extract → sanitize → deserialize → enforce projection → validate.
pub(crate) async fn run_generation<T, W>(
    llm: &dyn LlmGateway,
    request: &ContentRequest,
    projection: ProjectionCalculation,
    system_prompt: &str,
    user_prompt: &str,
    context: &str,
    wrap: W,
) -> Result<GeneratedContent, ContentError>
where
    T: DeserializeOwned,
    W: FnOnce(T) -> ProposalContent,
{
    let response = llm
        .call_for_content(system_prompt, user_prompt, &CallOptions::premium(request.premium))
        .await?;

    let mut value = extract_json(&response.content)?;
    sanitize_content_value(&mut value);
    let parsed: T = serde_json::from_value(value).map_err(|e| ContentError::Deserialize {
        context: context.to_string(),
        source: e,
    })?;

    let mut content = wrap(parsed);
    content.fill_cover(&request.company.company_name, &request.date_label);
    if content.apply_projection(&projection) {
        tracing::warn!(
            company = %request.company.company_name,
            kind = content.kind(),
            "LLM projection figures differed from the calculator; calculator values kept"
        );
    }
    content.validate()?;

    tracing::info!(
        company = %request.company.company_name,
        kind = content.kind(),
        tokens = response.usage.total(),
        cost_gbp = %response.cost,
        "proposal content generated"
    );

    Ok(GeneratedContent {
        content,
        projection,
        usage: response.usage,
        cost: response.cost,
        model: response.model,
    })
}

#[cfg(test)]
#[path = "generator_test.rs"]
mod tests;
