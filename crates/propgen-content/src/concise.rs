//! Short bullet-driven proposal.

use std::sync::Arc;

use async_trait::async_trait;

use propgen_core::{ConciseProposal, ProposalContent};
use propgen_llm::LlmGateway;

use crate::error::ContentError;
use crate::generator::{run_generation, ContentRequest, GeneratedContent, ProposalGenerator};
use crate::prompts::{context_sections, user_prompt, CONCISE_SCHEMA, CONCISE_SYSTEM_PROMPT};
use crate::reference::ReferenceDocument;

pub struct ConciseGenerator {
    llm: Arc<dyn LlmGateway>,
    reference: Arc<ReferenceDocument>,
}

impl ConciseGenerator {
    #[must_use]
    pub fn new(llm: Arc<dyn LlmGateway>, reference: Arc<ReferenceDocument>) -> Self {
        Self { llm, reference }
    }
}

#[async_trait]
impl ProposalGenerator for ConciseGenerator {
    async fn generate(&self, request: &ContentRequest) -> Result<GeneratedContent, ContentError> {
        let projection = request.projection();
        let reference = self.reference.get().await?;
        let context = context_sections(request, &projection, reference.as_deref());
        let tier = request.tier();
        let instructions = format!(
            "Write a concise SEO proposal for {company} for the {package} package \
             ({keywords} target keywords, {articles} articles per month). \
             Comparison table: the client first with isClient true, then up to 4 real competitors. \
             Timeline: 3 or 4 phases covering 12 months. At most 6 bullets in any list.",
            company = request.company.company_name,
            package = tier.display_name(),
            keywords = tier.target_keywords(),
            articles = tier.articles_per_month(),
        );
        let prompt = user_prompt(&context, CONCISE_SCHEMA, &instructions);

        run_generation::<ConciseProposal, _>(
            self.llm.as_ref(),
            request,
            projection,
            CONCISE_SYSTEM_PROMPT,
            &prompt,
            "concise proposal",
            ProposalContent::Concise,
        )
        .await
    }
}
