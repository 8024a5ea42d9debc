//! Workflow nodes backed by a shared agent.

use async_trait::async_trait;

use crate::agent::SharedAgent;
use crate::core::context::Context;
use crate::core::error::FlowError;
use crate::core::node::Node;
use crate::core::validation::ValidationResult;

fn compose(prefix: &str, input: &str) -> String {
    match (prefix.is_empty(), input.is_empty()) {
        (_, true) => prefix.to_string(),
        (true, false) => input.to_string(),
        (false, false) => format!("{}\n{}", prefix, input),
    }
}

/// Sends a fixed message, followed by the step input, to a fresh conversation.
pub struct LlmNode {
    agent: SharedAgent,
    message: String,
}

impl LlmNode {
    pub fn new(agent: SharedAgent, message: impl Into<String>) -> Self {
        Self {
            agent,
            message: message.into(),
        }
    }
}

#[async_trait]
impl Node for LlmNode {
    async fn execute(&self, ctx: &Context, input: &str) -> Result<String, FlowError> {
        let mut agent = self.agent.lock().await;
        agent.reset();
        agent.send(ctx, &compose(&self.message, input)).await
    }

    fn validate(&self, result: &mut ValidationResult) {
        if self.message.trim().is_empty() {
            result.add_warning("LlmNode has an empty message; only the step input is sent");
        }
    }
}

/// Calls one tool of a shared agent with a fixed instruction plus the step input.
pub struct ToolNode {
    agent: SharedAgent,
    tool_name: String,
    instruction: String,
}

impl ToolNode {
    pub fn new(
        agent: SharedAgent,
        tool_name: impl Into<String>,
        instruction: impl Into<String>,
    ) -> Self {
        Self {
            agent,
            tool_name: tool_name.into(),
            instruction: instruction.into(),
        }
    }
}

#[async_trait]
impl Node for ToolNode {
    async fn execute(&self, ctx: &Context, input: &str) -> Result<String, FlowError> {
        let mut agent = self.agent.lock().await;
        agent.reset();
        agent
            .call_tool(ctx, &self.tool_name, &compose(&self.instruction, input))
            .await
    }

    fn name(&self) -> &str {
        &self.tool_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::Agent;
    use crate::llm::{LLMError, Model, ModelProvider, ModelRequest, ModelResponse, Usage};
    use crate::tools::Tool;
    use std::sync::Arc;

    /// Echoes the prompt it receives.
    struct Parrot;

    #[async_trait]
    impl Model for Parrot {
        async fn generate(
            &self,
            _ctx: &Context,
            request: ModelRequest,
        ) -> Result<ModelResponse, LLMError> {
            Ok(ModelResponse {
                text: request.prompt,
                usage: Usage::default(),
                model_name: "parrot".into(),
                provider: ModelProvider::Custom("test".into()),
                metadata: None,
                finish_reason: None,
            })
        }

        fn provider(&self) -> ModelProvider {
            ModelProvider::Custom("test".into())
        }

        fn model_name(&self) -> &str {
            "parrot"
        }
    }

    struct Reverse;

    #[async_trait]
    impl Tool for Reverse {
        fn name(&self) -> &str {
            "reverse"
        }

        fn description(&self) -> &str {
            "Reverses its input."
        }

        async fn execute(&self, _ctx: &Context, input: &str) -> Result<String, FlowError> {
            Ok(input.chars().rev().collect())
        }
    }

    #[test]
    fn test_compose() {
        assert_eq!(compose("Summarize:", "text"), "Summarize:\ntext");
        assert_eq!(compose("Summarize:", ""), "Summarize:");
        assert_eq!(compose("", "text"), "text");
    }

    #[tokio::test]
    async fn test_llm_node_starts_fresh_conversation() {
        let agent = Agent::new(Arc::new(Parrot)).shared();
        let node = LlmNode::new(agent.clone(), "Translate:");
        let ctx = Context::new();

        node.execute(&ctx, "first").await.unwrap();
        let out = node.execute(&ctx, "second").await.unwrap();
        assert_eq!(out, "User: Translate:\nsecond\n");
        assert_eq!(agent.lock().await.history().len(), 2);
    }

    #[tokio::test]
    async fn test_tool_node_calls_tool() {
        let agent = Agent::new(Arc::new(Parrot))
            .with_tool(Arc::new(Reverse))
            .shared();
        let node = ToolNode::new(agent.clone(), "reverse", "");
        assert_eq!(node.name(), "reverse");
        assert_eq!(node.execute(&Context::new(), "abc").await.unwrap(), "cba");

        let missing = ToolNode::new(agent, "nope", "x");
        let err = missing.execute(&Context::new(), "y").await.unwrap_err();
        assert!(matches!(err, FlowError::ToolNotFound(_)));
    }
}
