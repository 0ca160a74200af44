//! Anthropic Messages API client with research and content call modes.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, Url};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use propgen_core::text::sanitize_for_prompt;
use propgen_core::{AppConfig, RetryPolicy};

use crate::accounting::{cost_gbp, estimate_thinking_tokens, estimate_tokens, ModelRates, TokenUsage};
use crate::error::LlmError;

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// The provider rejects thinking budgets below this.
const MIN_THINKING_BUDGET: u32 = 1_024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallMode {
    /// Extended reasoning, low temperature, large output budget.
    Research,
    /// No reasoning budget, higher temperature.
    Content,
}

impl CallMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Research => "research",
            Self::Content => "content",
        }
    }

    fn temperature(self) -> f32 {
        match self {
            Self::Research => 0.3,
            Self::Content => 0.5,
        }
    }

    fn max_tokens(self) -> u32 {
        match self {
            Self::Research => 16_000,
            Self::Content => 8_000,
        }
    }
}

/// Per-call overrides. Unset fields use the mode defaults.
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    pub model: Option<String>,
    /// Use the premium model when no explicit model is given.
    pub premium: bool,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    /// Research mode only. `Some(0)` disables reasoning for the call.
    pub thinking_budget: Option<u32>,
}

impl CallOptions {
    #[must_use]
    pub fn premium(premium: bool) -> Self {
        Self {
            premium,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LlmResponse {
    /// Concatenated `text` blocks. Reasoning blocks are excluded.
    pub content: String,
    pub usage: TokenUsage,
    /// GBP, 4 dp.
    pub cost: Decimal,
    pub model: String,
    pub latency: Duration,
    pub(crate) thinking: Vec<String>,
}

impl LlmResponse {
    /// Builds a response directly; used by fakes in downstream tests.
    #[must_use]
    pub fn new(content: impl Into<String>, usage: TokenUsage, cost: Decimal, model: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            usage,
            cost,
            model: model.into(),
            latency: Duration::ZERO,
            thinking: Vec::new(),
        }
    }

    /// Reasoning blocks returned alongside the answer, for debugging.
    #[must_use]
    pub fn thinking(&self) -> &[String] {
        &self.thinking
    }
}

/// The two call modes every LLM consumer needs.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    async fn call_for_research(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        options: &CallOptions,
    ) -> Result<LlmResponse, LlmError>;

    async fn call_for_content(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        options: &CallOptions,
    ) -> Result<LlmResponse, LlmError>;
}

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub premium_model: String,
    pub timeout_secs: u64,
    pub thinking_budget: u32,
    pub retry: RetryPolicy,
}

impl GatewayConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            api_key: config.anthropic_api_key.clone(),
            base_url: config.llm_base_url.clone(),
            model: config.llm_model.clone(),
            premium_model: config.llm_premium_model.clone(),
            timeout_secs: config.llm_timeout_secs,
            thinking_budget: config.thinking_budget,
            retry: RetryPolicy::new(
                config.llm_max_retries,
                Duration::from_millis(config.llm_backoff_base_ms),
            )
            .with_jitter(),
        }
    }

    /// Defaults pointed at the production API; for tests and the CLI.
    #[must_use]
    pub fn with_key(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: "claude-sonnet-4-20250514".to_string(),
            premium_model: "claude-opus-4-1-20250805".to_string(),
            timeout_secs: 300,
            thinking_budget: 10_000,
            retry: RetryPolicy::default(),
        }
    }
}

pub struct AnthropicGateway {
    client: Client,
    config: GatewayConfig,
    messages_url: Url,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    system: &'a str,
    messages: [Message<'a>; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    thinking: Option<ThinkingConfig>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ThinkingConfig {
    #[serde(rename = "type")]
    kind: &'static str,
    budget_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    usage: ReportedUsage,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text { text: String },
    Thinking { thinking: String },
    #[serde(other)]
    Other,
}

#[derive(Debug, Default, Deserialize)]
struct ReportedUsage {
    #[serde(default)]
    input_tokens: u64,
    #[serde(default)]
    output_tokens: u64,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

impl AnthropicGateway {
    /// # Errors
    ///
    /// Returns [`LlmError::Http`] if the HTTP client cannot be built, or
    /// [`LlmError::InvalidBaseUrl`] if `config.base_url` does not parse.
    pub fn new(config: GatewayConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("propgen/0.1 (proposal-generation)")
            .build()?;
        let base = format!("{}/", config.base_url.trim_end_matches('/'));
        let messages_url = Url::parse(&base)
            .and_then(|b| b.join("v1/messages"))
            .map_err(|e| LlmError::InvalidBaseUrl(format!("{}: {e}", config.base_url)))?;
        Ok(Self {
            client,
            config,
            messages_url,
        })
    }

    fn resolve_model(&self, options: &CallOptions) -> String {
        match &options.model {
            Some(model) => model.clone(),
            None if options.premium => self.config.premium_model.clone(),
            None => self.config.model.clone(),
        }
    }

    async fn call(
        &self,
        mode: CallMode,
        system_prompt: &str,
        user_prompt: &str,
        options: &CallOptions,
    ) -> Result<LlmResponse, LlmError> {
        let system = sanitize_for_prompt(system_prompt);
        let user = sanitize_for_prompt(user_prompt);
        let model = self.resolve_model(options);

        let thinking_budget = match mode {
            CallMode::Research => options.thinking_budget.unwrap_or(self.config.thinking_budget),
            CallMode::Content => 0,
        };
        let thinking = (thinking_budget >= MIN_THINKING_BUDGET).then_some(ThinkingConfig {
            kind: "enabled",
            budget_tokens: thinking_budget,
        });
        let mut max_tokens = options.max_tokens.unwrap_or_else(|| mode.max_tokens());
        if let Some(t) = &thinking {
            // The answer budget sits on top of the reasoning budget.
            max_tokens = max_tokens.max(t.budget_tokens + 1_024);
        }
        // The provider only accepts the default temperature alongside reasoning.
        let temperature = if thinking.is_some() {
            None
        } else {
            Some(options.temperature.unwrap_or_else(|| mode.temperature()))
        };

        let body = MessagesRequest {
            model: &model,
            max_tokens,
            temperature,
            system: &system,
            messages: [Message {
                role: "user",
                content: &user,
            }],
            thinking,
        };

        let fingerprint = prompt_fingerprint(&system, &user);
        let started = Instant::now();
        let label = format!("llm.{}", mode.as_str());
        let response = self
            .config
            .retry
            .run(&label, || self.send_once(&body))
            .await?;
        let latency = started.elapsed();

        let mut text_blocks = Vec::new();
        let mut thinking_blocks = Vec::new();
        for block in response.content {
            match block {
                ContentBlock::Text { text } => text_blocks.push(text),
                ContentBlock::Thinking { thinking } => thinking_blocks.push(thinking),
                ContentBlock::Other => {}
            }
        }
        let content = text_blocks.join("\n");
        if content.trim().is_empty() {
            return Err(LlmError::EmptyResponse);
        }

        let estimated_prompt = estimate_tokens(&system) + estimate_tokens(&user);
        let thinking_tokens = match mode {
            CallMode::Research => {
                estimate_thinking_tokens(response.usage.input_tokens, estimated_prompt)
            }
            CallMode::Content => 0,
        };
        let usage = TokenUsage {
            input_tokens: response.usage.input_tokens,
            output_tokens: response.usage.output_tokens,
            thinking_tokens,
        };
        let reported_model = response.model.unwrap_or(model);
        let cost = cost_gbp(&usage, &ModelRates::for_model(&reported_model));

        tracing::info!(
            mode = mode.as_str(),
            model = %reported_model,
            prompt = %fingerprint,
            input_tokens = usage.input_tokens,
            output_tokens = usage.output_tokens,
            thinking_tokens = usage.thinking_tokens,
            cost_gbp = %cost,
            latency_ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
            "LLM call complete"
        );

        Ok(LlmResponse {
            content,
            usage,
            cost,
            model: reported_model,
            latency,
            thinking: thinking_blocks,
        })
    }

    async fn send_once(&self, body: &MessagesRequest<'_>) -> Result<MessagesResponse, LlmError> {
        let response = self
            .client
            .post(self.messages_url.clone())
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| LlmError::Deserialize {
            context: "messages response".to_string(),
            source: e,
        })
    }
}

#[async_trait]
impl LlmGateway for AnthropicGateway {
    async fn call_for_research(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        options: &CallOptions,
    ) -> Result<LlmResponse, LlmError> {
        self.call(CallMode::Research, system_prompt, user_prompt, options)
            .await
    }

    async fn call_for_content(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        options: &CallOptions,
    ) -> Result<LlmResponse, LlmError> {
        self.call(CallMode::Content, system_prompt, user_prompt, options)
            .await
    }
}

/// Short stable hash of a prompt pair, logged so identical calls can be matched.
fn prompt_fingerprint(system: &str, user: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(system.as_bytes());
    hasher.update([0u8]);
    hasher.update(user.as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    digest[..12].to_string()
}
