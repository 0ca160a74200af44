//! Collaborators the orchestrator drives, with their production impls.
//!
//! Tests substitute in-memory fakes for each trait.

use async_trait::async_trait;
use sqlx::PgPool;

use propgen_content::{ContentError, ContentGenerators, ContentRequest, GeneratedContent};
use propgen_core::{ProposalMode, ResearchRequest, ResearchResult};
use propgen_db::{CustomerRow, DbError, NewProposal, ProposalRow};
use propgen_llm::CallOptions;
use propgen_research::{CompanyResearchAgent, ResearchError};

/// Read access to the CRM record a proposal is generated for.
#[async_trait]
pub trait CustomerSource: Send + Sync {
    /// `Ok(None)` when no live customer has this id.
    async fn customer(&self, id: i64) -> Result<Option<CustomerRow>, DbError>;
}

/// Proposal numbering and the summary row written on success.
#[async_trait]
pub trait ProposalSink: Send + Sync {
    async fn next_proposal_number(&self, year: i32) -> Result<String, DbError>;
    async fn insert_proposal(&self, proposal: &NewProposal) -> Result<ProposalRow, DbError>;
}

#[async_trait]
pub trait ResearchStage: Send + Sync {
    async fn research(
        &self,
        request: &ResearchRequest,
        premium: bool,
    ) -> Result<ResearchResult, ResearchError>;
}

#[async_trait]
pub trait ContentStage: Send + Sync {
    async fn generate(
        &self,
        mode: ProposalMode,
        request: &ContentRequest,
    ) -> Result<GeneratedContent, ContentError>;
}

#[async_trait]
impl CustomerSource for PgPool {
    async fn customer(&self, id: i64) -> Result<Option<CustomerRow>, DbError> {
        match propgen_db::get_customer(self, id).await {
            Ok(row) => Ok(Some(row)),
            Err(DbError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl ProposalSink for PgPool {
    async fn next_proposal_number(&self, year: i32) -> Result<String, DbError> {
        propgen_db::next_proposal_number(self, year).await
    }

    async fn insert_proposal(&self, proposal: &NewProposal) -> Result<ProposalRow, DbError> {
        propgen_db::insert_proposal(self, proposal).await
    }
}

#[async_trait]
impl ResearchStage for CompanyResearchAgent {
    async fn research(
        &self,
        request: &ResearchRequest,
        premium: bool,
    ) -> Result<ResearchResult, ResearchError> {
        self.perform_deep_research(request, &CallOptions::premium(premium))
            .await
    }
}

#[async_trait]
impl ContentStage for ContentGenerators {
    async fn generate(
        &self,
        mode: ProposalMode,
        request: &ContentRequest,
    ) -> Result<GeneratedContent, ContentError> {
        self.for_mode(mode).generate(request).await
    }
}
