//! `POST /api/v1/proposals/generate`: runs the pipeline and streams progress
//! as server-sent events, one JSON object per `data:` line.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    response::sse::{Event, KeepAlive, Sse},
    Extension, Json,
};
use futures::stream::{self, Stream};

use propgen_pipeline::{progress_channel, GenerationRequest, ProgressEvent};

use crate::middleware::RequestId;

use super::{ApiError, AppState};

const FALLBACK_EVENT: &str = r#"{"error":true,"message":"Progress could not be reported."}"#;

pub(super) async fn generate_proposal(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<GenerationRequest>, JsonRejection>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let Json(request) = body.map_err(|rejection| {
        ApiError::new(req_id.0.clone(), "bad_request", rejection.body_text())
    })?;
    if request.customer_id <= 0 {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "customerId must be a positive integer",
        ));
    }

    tracing::info!(
        request_id = %req_id.0,
        customer_id = request.customer_id,
        tier = %request.package_tier,
        mode = request.proposal_mode.as_str(),
        style = request.template_style.as_str(),
        format = request.output_format.extension(),
        "proposal generation requested"
    );

    let (tx, rx) = progress_channel();
    let orchestrator = Arc::clone(&state.orchestrator);
    tokio::spawn(async move {
        if let Err(e) = orchestrator.run(request, tx).await {
            tracing::debug!(error = %e, "generation run ended without a proposal");
        }
    });

    // Ends when the run drops its sender after the terminal event.
    let events = stream::unfold(rx, |mut rx| async move {
        let event = rx.recv().await?;
        Some((Ok::<_, Infallible>(to_sse(&event)), rx))
    });
    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}

fn to_sse(event: &ProgressEvent) -> Event {
    Event::default().json_data(event).unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to encode progress event");
        Event::default().data(FALLBACK_EVENT)
    })
}
