//! The model-invocation capability.
//!
//! Wordflow does not talk to any provider itself. Provider clients implement
//! [`Model`], and everything else (agents, [`LlmNode`](crate::agent::LlmNode),
//! [`AgentModel`](crate::agent::AgentModel)) only sees that trait.

pub mod client;
pub mod error;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::context::Context;
pub use client::ModelClient;
pub use error::LLMError;

/// The vendor behind a model.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelProvider {
    OpenAI,
    Anthropic,
    Gemini,
    Custom(String),
}

impl fmt::Display for ModelProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelProvider::OpenAI => f.write_str("openai"),
            ModelProvider::Anthropic => f.write_str("anthropic"),
            ModelProvider::Gemini => f.write_str("gemini"),
            ModelProvider::Custom(name) => f.write_str(name),
        }
    }
}

/// A single generation request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelRequest {
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    /// Free-form, provider specific extras.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<serde_json::Value>,
}

impl ModelRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }
}

/// Token accounting reported by the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelResponse {
    pub text: String,
    #[serde(default)]
    pub usage: Usage,
    pub model_name: String,
    pub provider: ModelProvider,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// The contract every language model client fulfils.
#[async_trait]
pub trait Model: Send + Sync {
    /// Generates a completion for `request`.
    async fn generate(
        &self,
        ctx: &Context,
        request: ModelRequest,
    ) -> Result<ModelResponse, LLMError>;

    fn provider(&self) -> ModelProvider;

    fn model_name(&self) -> &str;

    /// Embeds `text` into a vector. Models without embedding support keep the default.
    async fn embed(&self, _ctx: &Context, _text: &str) -> Result<Vec<f32>, LLMError> {
        Err(LLMError::Unsupported("embeddings"))
    }
}
