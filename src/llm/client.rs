use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::core::context::Context;
use crate::llm::{LLMError, Model, ModelRequest, ModelResponse};

#[derive(Default)]
struct Models {
    by_name: HashMap<String, Arc<dyn Model>>,
    fallback: Option<Arc<dyn Model>>,
}

/// A thread-safe, name keyed set of models with an optional fallback.
///
/// Lookups of unknown names resolve to the fallback when one is set. The first
/// model added becomes the fallback unless one was set explicitly.
#[derive(Clone, Default)]
pub struct ModelClient {
    models: Arc<RwLock<Models>>,
}

impl ModelClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_model(&self, name: impl Into<String>, model: Arc<dyn Model>) {
        let mut models = self.models.write().unwrap_or_else(|p| p.into_inner());
        if models.fallback.is_none() {
            models.fallback = Some(Arc::clone(&model));
        }
        models.by_name.insert(name.into(), model);
    }

    pub fn set_fallback_model(&self, model: Arc<dyn Model>) {
        self.models
            .write()
            .unwrap_or_else(|p| p.into_inner())
            .fallback = Some(model);
    }

    pub fn model(&self, name: &str) -> Result<Arc<dyn Model>, LLMError> {
        let models = self.models.read().unwrap_or_else(|p| p.into_inner());
        models
            .by_name
            .get(name)
            .or(models.fallback.as_ref())
            .cloned()
            .ok_or_else(|| LLMError::ModelNotFound(name.to_string()))
    }

    pub async fn generate(
        &self,
        ctx: &Context,
        name: &str,
        request: ModelRequest,
    ) -> Result<ModelResponse, LLMError> {
        let model = self.model(name)?;
        model.generate(ctx, request).await
    }

    pub async fn embed(&self, ctx: &Context, name: &str, text: &str) -> Result<Vec<f32>, LLMError> {
        let model = self.model(name)?;
        model.embed(ctx, text).await
    }

    /// Names of the registered models, sorted.
    pub fn list_models(&self) -> Vec<String> {
        let models = self.models.read().unwrap_or_else(|p| p.into_inner());
        let mut names: Vec<String> = models.by_name.keys().cloned().collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{ModelProvider, Usage};
    use async_trait::async_trait;

    struct Named(&'static str);

    #[async_trait]
    impl Model for Named {
        async fn generate(
            &self,
            _ctx: &Context,
            request: ModelRequest,
        ) -> Result<ModelResponse, LLMError> {
            Ok(ModelResponse {
                text: format!("{}: {}", self.0, request.prompt),
                usage: Usage::default(),
                model_name: self.0.to_string(),
                provider: ModelProvider::Custom("test".into()),
                metadata: None,
                finish_reason: None,
            })
        }

        fn provider(&self) -> ModelProvider {
            ModelProvider::Custom("test".into())
        }

        fn model_name(&self) -> &str {
            self.0
        }
    }

    #[tokio::test]
    async fn test_unknown_name_uses_first_model_as_fallback() {
        let client = ModelClient::new();
        client.add_model("alpha", Arc::new(Named("alpha")));
        client.add_model("beta", Arc::new(Named("beta")));

        let ctx = Context::new();
        let hit = client.generate(&ctx, "beta", ModelRequest::new("x")).await.unwrap();
        assert_eq!(hit.text, "beta: x");

        let miss = client.generate(&ctx, "gamma", ModelRequest::new("x")).await.unwrap();
        assert_eq!(miss.model_name, "alpha");
        assert_eq!(client.list_models(), ["alpha", "beta"]);
    }

    #[tokio::test]
    async fn test_missing_model_without_fallback() {
        let client = ModelClient::new();
        assert!(matches!(client.model("any"), Err(LLMError::ModelNotFound(_))));
    }

    #[tokio::test]
    async fn test_embed_defaults_to_unsupported() {
        let client = ModelClient::new();
        client.set_fallback_model(Arc::new(Named("plain")));
        let err = client.embed(&Context::new(), "plain", "text").await.unwrap_err();
        assert!(matches!(err, LLMError::Unsupported(_)));
    }
}
