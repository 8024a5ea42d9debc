use std::sync::Arc;

use async_trait::async_trait;

use crate::agent::SharedAgent;
use crate::core::context::Context;
use crate::llm::{LLMError, Model, ModelProvider, ModelRequest, ModelResponse};

/// A [`Model`] whose output has its tool directives resolved by an agent.
///
/// Generation is delegated to `inner`; the resulting text is then passed
/// through [`Agent::resolve_directives`](crate::agent::Agent::resolve_directives)
/// so callers that only know about models still get tool results.
pub struct AgentModel {
    agent: SharedAgent,
    inner: Arc<dyn Model>,
}

impl AgentModel {
    pub fn new(agent: SharedAgent, inner: Arc<dyn Model>) -> Self {
        Self { agent, inner }
    }

    pub fn agent(&self) -> &SharedAgent {
        &self.agent
    }
}

#[async_trait]
impl Model for AgentModel {
    async fn generate(
        &self,
        ctx: &Context,
        request: ModelRequest,
    ) -> Result<ModelResponse, LLMError> {
        let mut response = self.inner.generate(ctx, request).await?;
        let mut agent = self.agent.lock().await;
        response.text = agent.resolve_directives(ctx, &response.text).await;
        Ok(response)
    }

    fn provider(&self) -> ModelProvider {
        self.inner.provider()
    }

    fn model_name(&self) -> &str {
        self.inner.model_name()
    }

    async fn embed(&self, ctx: &Context, text: &str) -> Result<Vec<f32>, LLMError> {
        self.inner.embed(ctx, text).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::Agent;
    use crate::core::error::FlowError;
    use crate::llm::Usage;
    use crate::tools::Tool;

    struct Fixed(&'static str);

    #[async_trait]
    impl Model for Fixed {
        async fn generate(
            &self,
            _ctx: &Context,
            _request: ModelRequest,
        ) -> Result<ModelResponse, LLMError> {
            Ok(ModelResponse {
                text: self.0.to_string(),
                usage: Usage::default(),
                model_name: "fixed".into(),
                provider: ModelProvider::OpenAI,
                metadata: None,
                finish_reason: None,
            })
        }

        fn provider(&self) -> ModelProvider {
            ModelProvider::OpenAI
        }

        fn model_name(&self) -> &str {
            "fixed"
        }
    }

    struct Upper;

    #[async_trait]
    impl Tool for Upper {
        fn name(&self) -> &str {
            "upper"
        }

        fn description(&self) -> &str {
            "Upper-cases its input."
        }

        async fn execute(&self, _ctx: &Context, input: &str) -> Result<String, FlowError> {
            Ok(input.to_uppercase())
        }
    }

    #[tokio::test]
    async fn test_generate_resolves_directives() {
        let agent = Agent::new(Arc::new(Fixed("unused")))
            .with_tool(Arc::new(Upper))
            .shared();
        let model = AgentModel::new(
            agent.clone(),
            Arc::new(Fixed("Result:\nCALL TOOL: upper shout\nok")),
        );

        let response = model
            .generate(&Context::new(), ModelRequest::new("go"))
            .await
            .unwrap();
        assert_eq!(response.text, "Result:\nTool Output (upper): SHOUT\nok");
        assert_eq!(agent.lock().await.tools().call_count("upper"), 1);
    }

    #[tokio::test]
    async fn test_delegates_identity_and_embed() {
        let agent = Agent::new(Arc::new(Fixed(""))).shared();
        let model = AgentModel::new(agent, Arc::new(Fixed("")));
        assert_eq!(model.model_name(), "fixed");
        assert_eq!(model.provider(), ModelProvider::OpenAI);
        let err = model.embed(&Context::new(), "x").await.unwrap_err();
        assert!(matches!(err, LLMError::Unsupported(_)));
    }
}
