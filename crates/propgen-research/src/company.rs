//! Company research: search data plus an LLM research-mode analysis.

use std::sync::Arc;

use propgen_core::{IndustryMap, ResearchRequest, ResearchResult};
use propgen_llm::{parse_json, CallOptions, LlmGateway};

use crate::enhanced::EnhancedResearchAgent;
use crate::error::ResearchError;
use crate::prompts::{research_prompt, RESEARCH_SYSTEM_PROMPT};
use crate::search::SearchProvider;

pub struct CompanyResearchAgent {
    llm: Arc<dyn LlmGateway>,
    enhanced: EnhancedResearchAgent,
    industries: Arc<IndustryMap>,
}

impl CompanyResearchAgent {
    #[must_use]
    pub fn new(
        llm: Arc<dyn LlmGateway>,
        search: Arc<dyn SearchProvider>,
        industries: Arc<IndustryMap>,
    ) -> Self {
        Self {
            llm,
            enhanced: EnhancedResearchAgent::new(search, Arc::clone(&industries)),
            industries,
        }
    }

    /// Full research for one generation run.
    ///
    /// Either every step succeeds or the run fails; no degraded result is
    /// synthesised.
    ///
    /// # Errors
    ///
    /// - [`ResearchError::MissingCompanyName`] before any network call.
    /// - [`ResearchError::Search`] if the search API fails after retries.
    /// - [`ResearchError::Llm`] if the LLM call fails or its answer is not
    ///   valid research JSON.
    pub async fn perform_deep_research(
        &self,
        request: &ResearchRequest,
        options: &CallOptions,
    ) -> Result<ResearchResult, ResearchError> {
        if request.company_name.trim().is_empty() {
            return Err(ResearchError::MissingCompanyName);
        }
        if request.website.as_deref().is_none_or(|w| w.trim().is_empty()) {
            tracing::warn!(
                company = %request.company_name,
                "no website on record; client ranking positions will be unknown"
            );
        }

        let enhanced = self.enhanced.conduct_enhanced_research(request).await?;
        let services = self.industries.lookup(&request.industry);
        let prompt = research_prompt(request, services, &enhanced);

        let response = self
            .llm
            .call_for_research(RESEARCH_SYSTEM_PROMPT, &prompt, options)
            .await?;

        let mut result: ResearchResult = parse_json(&response.content, "company research")?;
        result.total_tokens_used = response.usage.total();
        result.thinking_tokens_used = response.usage.thinking_tokens;
        result.estimated_cost = response.cost;
        result.enhanced_research = Some(enhanced);

        tracing::info!(
            company = %request.company_name,
            competitors = result.competitor_analysis.top_competitors.len(),
            keywords = result.keyword_research.primary_keywords.len(),
            tokens = result.total_tokens_used,
            cost_gbp = %result.estimated_cost,
            "company research complete"
        );
        Ok(result)
    }
}

#[cfg(test)]
#[path = "company_test.rs"]
mod tests;
