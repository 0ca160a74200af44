//! The generation workflow: validate → research → content → render → persist.
//!
//! Stages run strictly in order; each one announces itself on the progress
//! channel before its work starts. Every stage races the run deadline and the
//! receiver closing, except persisting: it only starts if the deadline has not
//! passed, and once started it runs to completion, so a stored artifact either
//! gets its proposal row or is removed again.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::prelude::ToPrimitive;
use serde::Deserialize;
use tokio::time::Instant;

use propgen_content::{ContentRequest, GeneratedContent};
use propgen_core::text::proposal_filename;
use propgen_core::{AppConfig, OutputFormat, PackageTier, ProposalMode, TemplateStyle};
use propgen_db::{CustomerRow, NewProposal, ProposalRow};
use propgen_render::{DocumentRenderer, RenderContext, RenderedDocument, Renderer, Testimonial};

use crate::error::PipelineError;
use crate::ports::{ContentStage, CustomerSource, ProposalSink, ResearchStage};
use crate::progress::{ProgressEvent, ProgressSender, RunMetadata, Stage};
use crate::store::ArtifactStore;

/// The trigger for one generation run.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub customer_id: i64,
    pub package_tier: PackageTier,
    #[serde(default)]
    pub proposal_mode: ProposalMode,
    #[serde(default)]
    pub template_style: TemplateStyle,
    #[serde(default)]
    pub output_format: OutputFormat,
    #[serde(default)]
    pub prefer_opus: bool,
}

#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub proposal: ProposalRow,
    pub renderer: Renderer,
    pub metadata: RunMetadata,
}

/// Everything the orchestrator calls out to.
pub struct Collaborators {
    pub customers: Arc<dyn CustomerSource>,
    pub proposals: Arc<dyn ProposalSink>,
    pub research: Arc<dyn ResearchStage>,
    pub content: Arc<dyn ContentStage>,
    pub renderer: DocumentRenderer,
    pub artifacts: Arc<dyn ArtifactStore>,
}

#[derive(Debug, Clone)]
pub struct RunSettings {
    pub agency_name: String,
    pub testimonials: Vec<Testimonial>,
    pub deadline: Duration,
}

impl RunSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig, testimonials: Vec<Testimonial>) -> Self {
        Self {
            agency_name: config.agency_name.clone(),
            testimonials,
            deadline: Duration::from_secs(config.run_deadline_secs),
        }
    }
}

pub struct Orchestrator {
    collaborators: Collaborators,
    settings: RunSettings,
}

/// Per-run state shared by the stage guard.
struct RunContext<'a> {
    customer_id: i64,
    events: &'a ProgressSender,
    deadline: Instant,
    deadline_secs: u64,
}

impl Orchestrator {
    #[must_use]
    pub fn new(collaborators: Collaborators, settings: RunSettings) -> Self {
        Self {
            collaborators,
            settings,
        }
    }

    /// Runs one generation to completion, reporting on `events`.
    ///
    /// The last event sent is `complete` or `failed`; a run abandoned because
    /// the receiver closed sends nothing further. Nothing is persisted unless
    /// the run succeeds.
    ///
    /// # Errors
    ///
    /// Returns the [`PipelineError`] that ended the run; its
    /// [`user_message`](PipelineError::user_message) is what the `failed`
    /// event carried.
    pub async fn run(
        &self,
        request: GenerationRequest,
        events: ProgressSender,
    ) -> Result<GenerationOutcome, PipelineError> {
        let started = Instant::now();
        let run = RunContext {
            customer_id: request.customer_id,
            events: &events,
            deadline: started + self.settings.deadline,
            deadline_secs: whole_secs_rounded_up(self.settings.deadline),
        };

        let result = self.execute(&request, &run, started).await;
        let terminal = match &result {
            Ok(outcome) => {
                tracing::info!(
                    customer_id = request.customer_id,
                    proposal_number = %outcome.proposal.proposal_number,
                    renderer = %outcome.renderer,
                    tokens = outcome.metadata.total_tokens_used,
                    cost_gbp = outcome.metadata.total_cost,
                    duration_secs = outcome.metadata.total_duration_seconds,
                    "proposal generation complete"
                );
                Some(ProgressEvent::complete(
                    outcome.proposal.proposal_number.clone(),
                    outcome.proposal.document_url.clone(),
                    outcome.metadata.clone(),
                ))
            }
            Err(PipelineError::Cancelled(stage)) => {
                tracing::info!(
                    customer_id = request.customer_id,
                    stage = %stage,
                    "client disconnected; generation abandoned"
                );
                None
            }
            Err(e) => {
                tracing::error!(
                    customer_id = request.customer_id,
                    error = %e,
                    "proposal generation failed"
                );
                Some(ProgressEvent::failed(e.user_message()))
            }
        };
        if let Some(event) = terminal {
            if events.send(event).await.is_err() {
                tracing::debug!(customer_id = request.customer_id, "progress receiver dropped");
            }
        }
        result
    }

    async fn execute(
        &self,
        request: &GenerationRequest,
        run: &RunContext<'_>,
        started: Instant,
    ) -> Result<GenerationOutcome, PipelineError> {
        let c = &self.collaborators;

        let customer = guard(run, Stage::Validating, true, async {
            let customer = c
                .customers
                .customer(request.customer_id)
                .await?
                .ok_or(PipelineError::CustomerNotFound(request.customer_id))?;
            validate_customer(&customer)?;
            Ok::<_, PipelineError>(customer)
        })
        .await?;
        let company = customer.research_request(request.package_tier);

        let research = guard(run, Stage::Researching, true, async {
            let research = c.research.research(&company, request.prefer_opus).await?;
            Ok::<_, PipelineError>(research)
        })
        .await?;

        let today = Utc::now().date_naive();
        let date_label = today.format("%-d %B %Y").to_string();
        let content_request = ContentRequest {
            company,
            research,
            sdr_notes: customer.sdr_notes.clone(),
            deal_value: customer.deal_value(),
            overrides: customer.conversion_overrides(),
            premium: request.prefer_opus,
            date_label: date_label.clone(),
        };

        let generated = guard(run, Stage::GeneratingContent, true, async {
            let generated = c.content.generate(request.proposal_mode, &content_request).await?;
            Ok::<_, PipelineError>(generated)
        })
        .await?;

        let (proposal_number, document) = guard(run, Stage::Rendering, true, async {
            let number = c.proposals.next_proposal_number(today.year()).await?;
            let ctx = RenderContext {
                agency_name: self.settings.agency_name.clone(),
                proposal_number: Some(number.clone()),
                date_label,
                testimonials: self.settings.testimonials.clone(),
            };
            let document = c
                .renderer
                .render(
                    &generated.content,
                    Some(&content_request.research),
                    &ctx,
                    request.template_style,
                    request.output_format,
                )
                .await?;
            Ok::<_, PipelineError>((number, document))
        })
        .await?;

        let renderer = document.renderer;
        let proposal = guard(
            run,
            Stage::Persisting,
            false,
            self.persist(
                request,
                &content_request,
                &generated,
                &proposal_number,
                document,
                today,
                started,
            ),
        )
        .await?;

        let metadata = run_metadata(&content_request, &generated, proposal.duration_ms);
        Ok(GenerationOutcome {
            proposal,
            renderer,
            metadata,
        })
    }

    #[allow(clippy::too_many_arguments)] // One call site; the values are the run's accumulated state.
    async fn persist(
        &self,
        request: &GenerationRequest,
        content_request: &ContentRequest,
        generated: &GeneratedContent,
        proposal_number: &str,
        document: RenderedDocument,
        today: NaiveDate,
        started: Instant,
    ) -> Result<ProposalRow, PipelineError> {
        let c = &self.collaborators;
        let raw_research = serde_json::to_value(&content_request.research).map_err(|source| {
            PipelineError::Serialize {
                context: "research result",
                source,
            }
        })?;
        let content = serde_json::to_value(&generated.content).map_err(|source| {
            PipelineError::Serialize {
                context: "proposal content",
                source,
            }
        })?;

        let filename = proposal_filename(
            &content_request.company.company_name,
            Some(proposal_number),
            today,
            document.format.extension(),
        );
        let document_url = c.artifacts.put(&filename, &document.bytes).await?;

        let row = NewProposal {
            proposal_number: proposal_number.to_string(),
            customer_id: request.customer_id,
            package_tier: request.package_tier.as_str().to_string(),
            proposal_mode: generated.content.kind().to_string(),
            template_style: request.template_style.as_str().to_string(),
            output_format: document.format.extension().to_string(),
            document_url,
            filename: filename.clone(),
            model: generated.model.clone(),
            total_tokens: i64::try_from(total_tokens(content_request, generated))
                .unwrap_or(i64::MAX),
            total_cost: total_cost(content_request, generated),
            duration_ms: i64::try_from(started.elapsed().as_millis()).unwrap_or(i64::MAX),
            raw_research: Some(raw_research),
            content,
        };

        match c.proposals.insert_proposal(&row).await {
            Ok(inserted) => Ok(inserted),
            Err(e) => {
                if let Err(cleanup) = c.artifacts.delete(&filename).await {
                    tracing::warn!(
                        filename = %filename,
                        error = %cleanup,
                        "failed to remove artifact after proposal insert failed"
                    );
                }
                Err(e.into())
            }
        }
    }
}

/// Announces `stage`, then runs `work`. Interruptible stages race the
/// deadline and the receiver closing; the others are checked against the
/// deadline once and then awaited to completion.
async fn guard<T, F>(
    run: &RunContext<'_>,
    stage: Stage,
    interruptible: bool,
    work: F,
) -> Result<T, PipelineError>
where
    F: Future<Output = Result<T, PipelineError>>,
{
    tracing::info!(customer_id = run.customer_id, stage = %stage, "stage started");
    run.events
        .send(ProgressEvent::stage(stage))
        .await
        .map_err(|_| PipelineError::Cancelled(stage))?;

    let expired = || PipelineError::DeadlineExceeded {
        stage,
        secs: run.deadline_secs,
    };
    if !interruptible {
        if Instant::now() >= run.deadline {
            return Err(expired());
        }
        return work.await;
    }

    let timed = tokio::time::timeout_at(run.deadline, work);
    tokio::select! {
        biased;
        () = run.events.closed() => Err(PipelineError::Cancelled(stage)),
        outcome = timed => outcome.map_err(|_| expired())?,
    }
}

fn whole_secs_rounded_up(duration: Duration) -> u64 {
    duration.as_secs() + u64::from(duration.subsec_nanos() > 0)
}

fn validate_customer(customer: &CustomerRow) -> Result<(), PipelineError> {
    if customer.company_name.trim().is_empty() {
        return Err(PipelineError::Validation(
            "the customer record has no company name".to_string(),
        ));
    }
    if customer.website.as_deref().is_none_or(|w| w.trim().is_empty()) {
        tracing::warn!(customer_id = customer.id, "customer has no website on record");
    }
    Ok(())
}

fn total_tokens(request: &ContentRequest, generated: &GeneratedContent) -> u64 {
    request
        .research
        .total_tokens_used
        .saturating_add(generated.usage.total())
}

fn total_cost(request: &ContentRequest, generated: &GeneratedContent) -> rust_decimal::Decimal {
    (request.research.estimated_cost + generated.cost).round_dp(4)
}

fn run_metadata(
    request: &ContentRequest,
    generated: &GeneratedContent,
    duration_ms: i64,
) -> RunMetadata {
    #[allow(clippy::cast_precision_loss)]
    let seconds = duration_ms as f64 / 1000.0;
    RunMetadata {
        total_duration_seconds: (seconds * 10.0).round() / 10.0,
        total_tokens_used: total_tokens(request, generated),
        total_cost: total_cost(request, generated).to_f64().unwrap_or_default(),
    }
}

#[cfg(test)]
#[path = "orchestrator_test.rs"]
mod tests;
