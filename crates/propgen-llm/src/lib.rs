//! LLM call gateway for proposal generation.
//!
//! Wraps the Anthropic Messages API with prompt sanitization, the shared retry
//! policy, JSON extraction and per-call token and cost accounting. Consumers
//! depend on the [`LlmGateway`] trait so tests can substitute a scripted fake.

pub mod accounting;
mod error;
pub mod gateway;
pub mod json;

pub use accounting::{ModelRates, TokenUsage};
pub use error::LlmError;
pub use gateway::{AnthropicGateway, CallMode, CallOptions, GatewayConfig, LlmGateway, LlmResponse};
pub use json::{extract_json, parse_json};
