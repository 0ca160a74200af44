//! `generate`: the full pipeline against the configured database.

use std::io::Write;

use propgen_pipeline::{progress_channel, GenerationRequest, ProgressEvent};

/// Runs one generation, printing each progress event to stdout as a JSON line.
///
/// # Errors
///
/// Returns an error if configuration or wiring fails, or if the run ends
/// without a stored proposal.
pub(crate) async fn run_generate(request: GenerationRequest) -> anyhow::Result<()> {
    let config = propgen_core::load_app_config()?;
    let pool_config = propgen_db::PoolConfig::from_app_config(&config);
    let pool = propgen_db::connect_pool(&config.database_url, pool_config).await?;
    let orchestrator = propgen_pipeline::build_orchestrator(&config, pool.clone())?;

    tracing::info!(
        customer_id = request.customer_id,
        tier = %request.package_tier,
        "starting proposal generation"
    );

    let (tx, mut rx) = progress_channel();
    let printer = async move {
        let mut stdout = std::io::stdout();
        while let Some(event) = rx.recv().await {
            if let Err(e) = print_event(&mut stdout, &event) {
                tracing::warn!(error = %e, "failed to print progress event");
            }
        }
    };

    let (outcome, ()) = tokio::join!(orchestrator.run(request, tx), printer);
    pool.close().await;

    let outcome = outcome.map_err(|e| anyhow::anyhow!("{}: {e}", e.user_message()))?;
    tracing::info!(
        proposal_number = %outcome.proposal.proposal_number,
        renderer = %outcome.renderer,
        url = %outcome.proposal.document_url,
        "proposal ready"
    );
    Ok(())
}

fn print_event(out: &mut impl Write, event: &ProgressEvent) -> anyhow::Result<()> {
    serde_json::to_writer(&mut *out, event)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use propgen_pipeline::Stage;

    #[test]
    fn events_are_written_one_per_line() {
        let mut buf = Vec::new();
        print_event(&mut buf, &ProgressEvent::stage(Stage::Researching)).unwrap();
        print_event(&mut buf, &ProgressEvent::failed("Research failed.")).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["stage"], "researching");
        assert_eq!(first["progress"], 15);
        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["error"], true);
    }
}
