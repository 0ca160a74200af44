//! Long-form narrative proposal.

use std::sync::Arc;

use async_trait::async_trait;

use propgen_core::{DetailedProposal, ProposalContent};
use propgen_llm::LlmGateway;

use crate::error::ContentError;
use crate::generator::{run_generation, ContentRequest, GeneratedContent, ProposalGenerator};
use crate::prompts::{context_sections, user_prompt, DETAILED_SCHEMA, DETAILED_SYSTEM_PROMPT};
use crate::reference::ReferenceDocument;

pub struct DetailedGenerator {
    llm: Arc<dyn LlmGateway>,
    reference: Arc<ReferenceDocument>,
}

impl DetailedGenerator {
    #[must_use]
    pub fn new(llm: Arc<dyn LlmGateway>, reference: Arc<ReferenceDocument>) -> Self {
        Self { llm, reference }
    }
}

#[async_trait]
impl ProposalGenerator for DetailedGenerator {
    async fn generate(&self, request: &ContentRequest) -> Result<GeneratedContent, ContentError> {
        let projection = request.projection();
        let reference = self.reference.get().await?;
        let context = context_sections(request, &projection, reference.as_deref());
        let tier = request.tier();
        let instructions = format!(
            "Write a detailed SEO proposal for {company}. Recommend the {package} package. \
             Include 3 to 5 brutal-truth callouts naming real competitors, 4 statistics cards, \
             3 strategy pillars, and {articles} articles per month in the content strategy. \
             Include localSeo only if the business serves customers in a defined area. \
             Put the client first in competitorComparison with isClient true.",
            company = request.company.company_name,
            package = tier.display_name(),
            articles = tier.articles_per_month(),
        );
        let prompt = user_prompt(&context, DETAILED_SCHEMA, &instructions);

        run_generation::<DetailedProposal, _>(
            self.llm.as_ref(),
            request,
            projection,
            DETAILED_SYSTEM_PROMPT,
            &prompt,
            "detailed proposal",
            ProposalContent::Detailed,
        )
        .await
    }
}
