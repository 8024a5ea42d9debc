use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;

use crate::core::context::Context;
use crate::core::error::FlowError;
use crate::core::node::{Node, NodeRef};
use crate::core::telemetry::{StepTrace, Telemetry};
use crate::core::validation::ValidationResult;

/// An ordered pipeline of nodes.
///
/// Each node's output becomes the next node's input. The first failure stops
/// the run; no partial output is returned. A flow is itself a [`Node`], so
/// flows can be nested inside combinators or other flows.
#[derive(Clone, Default)]
pub struct Flow {
    nodes: Vec<NodeRef>,
}

impl Flow {
    pub fn new(nodes: Vec<NodeRef>) -> Flow {
        Flow { nodes }
    }

    /// Appends a node to the end of the pipeline.
    pub fn then(mut self, node: NodeRef) -> Flow {
        self.nodes.push(node);
        self
    }

    pub fn nodes(&self) -> &[NodeRef] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Executes the nodes in order and returns the last output.
    ///
    /// The error of the failing node is returned unchanged. An empty flow
    /// returns its input.
    pub async fn run(&self, ctx: &Context, input: &str) -> Result<String, FlowError> {
        let mut current = input.to_string();
        for node in &self.nodes {
            if ctx.is_cancelled() {
                return Err(FlowError::Cancelled);
            }
            current = node.execute(ctx, &current).await?;
        }
        Ok(current)
    }

    /// Like [`Flow::run`], but calls `logger` with the step index and output
    /// after every successful step. Failures are wrapped in [`FlowError::Step`].
    pub async fn run_with_logging<F>(
        &self,
        ctx: &Context,
        input: &str,
        mut logger: F,
    ) -> Result<String, FlowError>
    where
        F: FnMut(usize, &str) + Send,
    {
        self.run_observed(ctx, input, |step, _node, output, _duration| {
            logger(step, output)
        })
        .await
    }

    /// Executes the workflow and records a [`StepTrace`] per step, including
    /// the wall-clock duration of the step.
    pub async fn run_with_telemetry(
        &self,
        ctx: &Context,
        input: &str,
        telemetry: &dyn Telemetry,
    ) -> Result<String, FlowError> {
        let result = self
            .run_observed(ctx, input, |step, node, output, duration| {
                let timestamp = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .unwrap_or_default()
                    .as_secs();
                telemetry.record(StepTrace {
                    timestamp,
                    step,
                    node: node.to_string(),
                    output: output.to_string(),
                    duration,
                });
            })
            .await;
        telemetry.flush();
        result
    }

    async fn run_observed<F>(
        &self,
        ctx: &Context,
        input: &str,
        mut observe: F,
    ) -> Result<String, FlowError>
    where
        F: FnMut(usize, &str, &str, Duration) + Send,
    {
        let mut current = input.to_string();
        for (step, node) in self.nodes.iter().enumerate() {
            if ctx.is_cancelled() {
                return Err(FlowError::Cancelled);
            }
            let start = Instant::now();
            current = match node.execute(ctx, &current).await {
                Ok(output) => output,
                Err(err) => {
                    log::error!("Flow aborted at step {} ({}): {}", step, node.name(), err);
                    return Err(FlowError::Step {
                        step,
                        source: Box::new(err),
                    });
                }
            };
            let duration = start.elapsed();
            log::debug!("Step {} ({}) completed in {:?}", step, node.name(), duration);
            observe(step, node.name(), &current, duration);
        }
        Ok(current)
    }

    /// Validates the configuration of every node in the pipeline.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new();
        Node::validate(self, &mut result);
        result
    }
}

#[async_trait]
impl Node for Flow {
    async fn execute(&self, ctx: &Context, input: &str) -> Result<String, FlowError> {
        self.run(ctx, input).await
    }

    fn name(&self) -> &str {
        "Flow"
    }

    fn validate(&self, result: &mut ValidationResult) {
        for node in &self.nodes {
            node.validate(result);
        }
    }
}
