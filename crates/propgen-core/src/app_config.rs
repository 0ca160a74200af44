use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub anthropic_api_key: String,
    pub llm_base_url: String,
    pub llm_model: String,
    pub llm_premium_model: String,
    pub llm_timeout_secs: u64,
    pub llm_max_retries: u32,
    pub llm_backoff_base_ms: u64,
    pub thinking_budget: u32,
    pub search_api_key: String,
    pub search_base_url: String,
    pub search_timeout_secs: u64,
    pub search_max_retries: u32,
    pub search_country: String,
    pub artifact_dir: PathBuf,
    pub public_base_url: String,
    pub chrome_path: PathBuf,
    pub chrome_no_sandbox: bool,
    pub run_deadline_secs: u64,
    pub reference_doc_path: Option<PathBuf>,
    pub industry_map_path: Option<PathBuf>,
    pub testimonials_path: Option<PathBuf>,
    pub agency_name: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("anthropic_api_key", &"[redacted]")
            .field("llm_base_url", &self.llm_base_url)
            .field("llm_model", &self.llm_model)
            .field("llm_premium_model", &self.llm_premium_model)
            .field("llm_timeout_secs", &self.llm_timeout_secs)
            .field("llm_max_retries", &self.llm_max_retries)
            .field("llm_backoff_base_ms", &self.llm_backoff_base_ms)
            .field("thinking_budget", &self.thinking_budget)
            .field("search_api_key", &"[redacted]")
            .field("search_base_url", &self.search_base_url)
            .field("search_timeout_secs", &self.search_timeout_secs)
            .field("search_max_retries", &self.search_max_retries)
            .field("search_country", &self.search_country)
            .field("artifact_dir", &self.artifact_dir)
            .field("public_base_url", &self.public_base_url)
            .field("chrome_path", &self.chrome_path)
            .field("chrome_no_sandbox", &self.chrome_no_sandbox)
            .field("run_deadline_secs", &self.run_deadline_secs)
            .field("reference_doc_path", &self.reference_doc_path)
            .field("industry_map_path", &self.industry_map_path)
            .field("testimonials_path", &self.testimonials_path)
            .field("agency_name", &self.agency_name)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .finish()
    }
}
