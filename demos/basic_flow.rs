//! A complete example showing how to build a multi-step workflow with Wordflow.
//!
//! This example demonstrates:
//! - Wrapping plain functions as nodes
//! - Chaining nodes into a flow
//! - Branching, retrying and fanning out with combinators
//! - Letting an agent resolve tool directives in a model's answer
//! - Collecting per-step telemetry

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use wordflow::prelude::*;
use wordflow::{LLMError, MemoryTelemetry, ModelProvider, Usage};

// ============================================================================
// A stand-in model
// ============================================================================

/// Answers every prompt with a tool directive, like a model that decided it
/// needs a calculator.
struct CannedModel;

#[async_trait]
impl Model for CannedModel {
    async fn generate(
        &self,
        _ctx: &Context,
        request: ModelRequest,
    ) -> Result<ModelResponse, LLMError> {
        log::debug!("prompt:\n{}", request.prompt);
        Ok(ModelResponse {
            text: "CALL TOOL: calculator 19+23".to_string(),
            usage: Usage::default(),
            model_name: "canned".into(),
            provider: ModelProvider::Custom("demo".into()),
            metadata: None,
            finish_reason: Some("stop".into()),
        })
    }

    fn provider(&self) -> ModelProvider {
        ModelProvider::Custom("demo".into())
    }

    fn model_name(&self) -> &str {
        "canned"
    }
}

// ============================================================================
// A tool
// ============================================================================

struct Calculator;

#[async_trait]
impl Tool for Calculator {
    fn name(&self) -> &str {
        "calculator"
    }

    fn description(&self) -> &str {
        "Adds two integers written as a+b."
    }

    async fn execute(&self, _ctx: &Context, input: &str) -> Result<String, FlowError> {
        let (a, b) = input
            .split_once('+')
            .ok_or_else(|| FlowError::execution(format!("cannot evaluate '{}'", input)))?;
        let a: i64 = a.trim().parse().map_err(FlowError::execution)?;
        let b: i64 = b.trim().parse().map_err(FlowError::execution)?;
        Ok((a + b).to_string())
    }
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> Result<(), FlowError> {
    println!("=== Wordflow: Basic Flow Example ===\n");

    // Normalise the input, or fall back to a default.
    let normalize = node(FuncNode::from_fn(|input| {
        let trimmed = input.trim();
        Ok(if trimmed.is_empty() {
            "Guest".to_string()
        } else {
            trimmed.to_string()
        })
    }));

    // A flaky step that succeeds on its second attempt.
    let attempts = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&attempts);
    let flaky_greeting = node(FuncNode::from_fn(move |name| {
        if counter.fetch_add(1, Ordering::SeqCst) == 0 {
            Err(FlowError::execution("greeting service warming up"))
        } else {
            Ok(format!("Hello, {}!", name))
        }
    }));

    let shout = node(FuncNode::from_fn(|s| Ok(s.to_uppercase())));
    let whisper = node(FuncNode::from_fn(|s| Ok(s.to_lowercase())));

    let agent = Agent::new(Arc::new(CannedModel))
        .with_system_prompt("You are a helpful assistant.")
        .with_tool(Arc::new(Calculator))
        .shared();

    let flow = Flow::new(vec![
        normalize,
        node(
            RetryNode::new(flaky_greeting)
                .max_retries(2)
                .delay(Duration::from_millis(10)),
        ),
        node(ParallelNode::new(vec![shout, whisper]).merge_with(|outs| outs.join(" / "))),
        node(ConditionalNode::new(
            |s| s.contains("GUEST"),
            node(LlmNode::new(agent.clone(), "Greet the guest and add up their order.")),
        )),
    ]);

    let validation = flow.validate();
    validation.log_summary();
    if !validation.is_safe() {
        println!("Flow failed validation: {:?}", validation.issues);
        return Ok(());
    }

    let telemetry = MemoryTelemetry::new();
    let output = flow
        .run_with_telemetry(&Context::new(), "   ", &telemetry)
        .await?;

    println!("Final output:\n{}\n", output);
    println!("Greeting attempts: {}", attempts.load(Ordering::SeqCst));
    for trace in telemetry.get_traces() {
        println!(
            "  step {} ({}) took {:?}",
            trace.step, trace.node, trace.duration
        );
    }

    println!("\nRegistered tools:\n{}", agent.lock().await.tools().describe());
    println!("=== Example Complete ===");
    Ok(())
}
