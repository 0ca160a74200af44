//! Builds a production [`Orchestrator`] from configuration.

use std::sync::Arc;

use sqlx::PgPool;
use thiserror::Error;

use propgen_content::{ContentGenerators, ReferenceDocument};
use propgen_core::{AppConfig, ConfigError, IndustryMap};
use propgen_llm::{AnthropicGateway, GatewayConfig, LlmError, LlmGateway};
use propgen_render::{load_testimonials, ChromeConverter, DocumentRenderer, RenderError};
use propgen_research::{CompanyResearchAgent, SearchClient, SearchConfig, SearchError};

use crate::orchestrator::{Collaborators, Orchestrator, RunSettings};
use crate::store::FsArtifactStore;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Wires the Anthropic gateway, search client, generators, renderer and
/// filesystem artifact store around a Postgres pool.
///
/// # Errors
///
/// Returns [`BuildError`] if an HTTP client cannot be built or an optional
/// industry-map or testimonials file is unreadable.
pub fn build_orchestrator(config: &AppConfig, pool: PgPool) -> Result<Orchestrator, BuildError> {
    let llm: Arc<dyn LlmGateway> = Arc::new(AnthropicGateway::new(GatewayConfig::from_app_config(
        config,
    ))?);
    let search = Arc::new(SearchClient::new(SearchConfig::from_app_config(config))?);

    let industries = match &config.industry_map_path {
        Some(path) => IndustryMap::with_overrides(path)?,
        None => IndustryMap::builtin(),
    };
    tracing::debug!(industries = industries.len(), "industry map loaded");

    let reference = match &config.reference_doc_path {
        Some(path) => ReferenceDocument::from_path(path.clone()),
        None => ReferenceDocument::disabled(),
    };
    let testimonials = match &config.testimonials_path {
        Some(path) => load_testimonials(path)?,
        None => Vec::new(),
    };

    let research = CompanyResearchAgent::new(Arc::clone(&llm), search, Arc::new(industries));
    let content = ContentGenerators::new(llm, Arc::new(reference));
    let renderer = DocumentRenderer::new(Arc::new(ChromeConverter::from_app_config(config)));
    let pool = Arc::new(pool);

    let collaborators = Collaborators {
        customers: pool.clone(),
        proposals: pool,
        research: Arc::new(research),
        content: Arc::new(content),
        renderer,
        artifacts: Arc::new(FsArtifactStore::from_app_config(config)),
    };
    Ok(Orchestrator::new(
        collaborators,
        RunSettings::from_app_config(config, testimonials),
    ))
}

#[cfg(test)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr, SocketAddr};
    use std::path::{Path, PathBuf};

    use propgen_core::Environment;
    use sqlx::postgres::PgPoolOptions;

    use super::*;

    fn config(artifact_dir: &Path) -> AppConfig {
        AppConfig {
            database_url: "postgres://propgen@127.0.0.1:1/propgen".to_string(),
            env: Environment::Test,
            bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0),
            log_level: "info".to_string(),
            anthropic_api_key: "sk-test".to_string(),
            llm_base_url: "http://127.0.0.1:1".to_string(),
            llm_model: "standard".to_string(),
            llm_premium_model: "premium".to_string(),
            llm_timeout_secs: 5,
            llm_max_retries: 0,
            llm_backoff_base_ms: 10,
            thinking_budget: 10_000,
            search_api_key: "serp-test".to_string(),
            search_base_url: "http://127.0.0.1:1".to_string(),
            search_timeout_secs: 5,
            search_max_retries: 0,
            search_country: "uk".to_string(),
            artifact_dir: artifact_dir.to_path_buf(),
            public_base_url: "http://localhost:3000".to_string(),
            chrome_path: PathBuf::from("chromium"),
            chrome_no_sandbox: true,
            run_deadline_secs: 900,
            reference_doc_path: None,
            industry_map_path: None,
            testimonials_path: None,
            agency_name: "Propgen Digital".to_string(),
            db_max_connections: 2,
            db_min_connections: 0,
            db_acquire_timeout_secs: 1,
        }
    }

    fn lazy_pool(config: &AppConfig) -> PgPool {
        PgPoolOptions::new()
            .connect_lazy(&config.database_url)
            .expect("lazy pool")
    }

    #[tokio::test]
    async fn one_pool_serves_both_record_ports() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let pool = lazy_pool(&config);
        assert!(build_orchestrator(&config, pool).is_ok());
    }

    #[tokio::test]
    async fn unreadable_industry_map_fails_wiring() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config(dir.path());
        config.industry_map_path = Some(dir.path().join("missing.yaml"));
        let pool = lazy_pool(&config);
        assert!(matches!(
            build_orchestrator(&config, pool),
            Err(BuildError::Config(_))
        ));
    }
}
