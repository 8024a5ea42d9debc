use std::collections::{BTreeMap, HashMap};
use std::fmt::Write as _;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use crate::core::context::Context;
use crate::core::error::FlowError;
use crate::tools::Tool;

/// Name keyed tools plus a per-tool count of successful executions.
#[derive(Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
    call_counts: Mutex<HashMap<String, u64>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `tool` under its own name, replacing any tool of the same name
    /// and resetting its call count.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        if self.tools.contains_key(&name) {
            log::warn!("Tool '{}' was already registered, replacing it.", name);
        } else {
            log::debug!("Registering tool: {}", name);
        }
        self.counts().insert(name.clone(), 0);
        self.tools.insert(name, tool);
    }

    pub fn get(&self, name: &str) -> Result<Arc<dyn Tool>, FlowError> {
        self.tools
            .get(name)
            .cloned()
            .ok_or_else(|| FlowError::ToolNotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Executes the named tool, timing it and counting it on success.
    pub async fn execute(
        &self,
        ctx: &Context,
        name: &str,
        input: &str,
    ) -> Result<String, FlowError> {
        let tool = self.get(name)?;
        let start = Instant::now();
        let result = tool.execute(ctx, input).await;
        let duration = start.elapsed();
        match &result {
            Ok(_) => {
                log::debug!("[Tool Execution] Tool '{}' executed in {:?}", name, duration);
                *self.counts().entry(name.to_string()).or_insert(0) += 1;
            }
            Err(err) => {
                log::warn!(
                    "[Tool Execution] Tool '{}' failed after {:?}: {}",
                    name,
                    duration,
                    err
                );
            }
        }
        result
    }

    /// Names of all registered tools, sorted.
    pub fn list(&self) -> Vec<String> {
        self.tools.keys().cloned().collect()
    }

    /// A human readable listing of every tool, including schema and help for
    /// tools that provide them.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        for (name, tool) in &self.tools {
            let _ = writeln!(out, "Tool: {}", name);
            let _ = writeln!(out, "Description: {}", tool.description());
            if let Some(enhanced) = tool.as_enhanced() {
                let _ = writeln!(out, "Schema: {}", enhanced.schema());
                let _ = writeln!(out, "Help: {}", enhanced.help());
            }
            out.push('\n');
        }
        out
    }

    /// Number of successful executions of `name`; 0 for unknown tools.
    pub fn call_count(&self, name: &str) -> u64 {
        self.counts().get(name).copied().unwrap_or(0)
    }

    fn counts(&self) -> std::sync::MutexGuard<'_, HashMap<String, u64>> {
        self.call_counts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::EnhancedTool;
    use async_trait::async_trait;

    struct Echo;

    #[async_trait]
    impl Tool for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Repeats its input."
        }

        async fn execute(&self, _ctx: &Context, input: &str) -> Result<String, FlowError> {
            if input.is_empty() {
                Err(FlowError::execution("nothing to echo"))
            } else {
                Ok(input.to_string())
            }
        }
    }

    struct Clock;

    #[async_trait]
    impl Tool for Clock {
        fn name(&self) -> &str {
            "clock"
        }

        fn description(&self) -> &str {
            "Tells the time."
        }

        async fn execute(&self, _ctx: &Context, _input: &str) -> Result<String, FlowError> {
            Ok("noon".into())
        }

        fn as_enhanced(&self) -> Option<&dyn EnhancedTool> {
            Some(self)
        }
    }

    impl EnhancedTool for Clock {
        fn schema(&self) -> &str {
            r#"{"type":"string"}"#
        }

        fn help(&self) -> &str {
            "Pass a timezone."
        }
    }

    #[tokio::test]
    async fn test_execute_counts_successes_only() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(Echo));
        let ctx = Context::new();

        assert_eq!(registry.execute(&ctx, "echo", "hi").await.unwrap(), "hi");
        assert!(registry.execute(&ctx, "echo", "").await.is_err());
        assert_eq!(registry.call_count("echo"), 1);
    }

    #[tokio::test]
    async fn test_unknown_tool_is_not_found() {
        let registry = ToolRegistry::new();
        let err = registry.execute(&Context::new(), "ghost", "x").await.unwrap_err();
        assert!(matches!(err, FlowError::ToolNotFound(name) if name == "ghost"));
        assert_eq!(registry.call_count("ghost"), 0);
    }

    #[tokio::test]
    async fn test_reregistering_resets_count() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(Echo));
        registry.execute(&Context::new(), "echo", "a").await.unwrap();
        registry.register(Arc::new(Echo));
        assert_eq!(registry.call_count("echo"), 0);
        assert_eq!(registry.list(), ["echo"]);
    }

    #[test]
    fn test_describe_includes_enhanced_metadata() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(Echo));
        registry.register(Arc::new(Clock));
        assert_eq!(registry.list(), ["clock", "echo"]);

        let text = registry.describe();
        assert!(text.contains("Tool: clock\nDescription: Tells the time.\nSchema: {\"type\":\"string\"}\nHelp: Pass a timezone.\n"));
        assert!(text.contains("Tool: echo\nDescription: Repeats its input.\n\n"));
    }
}
