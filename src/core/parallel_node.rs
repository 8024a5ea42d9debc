use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;

use crate::core::context::Context;
use crate::core::error::FlowError;
use crate::core::node::{Node, NodeRef};
use crate::core::validation::ValidationResult;

type MergeFn = dyn Fn(&[String]) -> String + Send + Sync;

/// Runs every child node concurrently on the same input and merges the outputs.
///
/// Each child gets its own tokio task. The node always waits for every task to
/// finish, whatever the `fail_fast` setting: cancelling the context is only a
/// hint to the children.
///
/// Outputs reach the merge function in declaration order, not completion order.
/// Without a merge function the outputs are joined with `\n`.
///
/// With `fail_fast` the first failing child (in declaration order) fails the whole
/// node. Otherwise failures are logged, the failed child's slot is left empty, and
/// the node only fails with [`FlowError::MergeInput`] when no child succeeded.
#[derive(Clone)]
pub struct ParallelNode {
    nodes: Vec<NodeRef>,
    merge: Option<Arc<MergeFn>>,
    fail_fast: bool,
}

impl ParallelNode {
    pub fn new(nodes: Vec<NodeRef>) -> Self {
        ParallelNode {
            nodes,
            merge: None,
            fail_fast: false,
        }
    }

    pub fn fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Replaces the default newline join with a custom merge.
    pub fn merge_with<F>(mut self, merge: F) -> Self
    where
        F: Fn(&[String]) -> String + Send + Sync + 'static,
    {
        self.merge = Some(Arc::new(merge));
        self
    }

    async fn run_all(&self, ctx: &Context, input: &str) -> Vec<Result<String, FlowError>> {
        let handles = self.nodes.iter().map(|node| {
            let node = Arc::clone(node);
            let ctx = ctx.clone();
            let input = input.to_string();
            tokio::spawn(async move { node.execute(&ctx, &input).await })
        });

        join_all(handles)
            .await
            .into_iter()
            .map(|joined| {
                joined.unwrap_or_else(|join_error| {
                    Err(FlowError::execution(format!(
                        "parallel child task did not complete: {}",
                        join_error
                    )))
                })
            })
            .collect()
    }
}

#[async_trait]
impl Node for ParallelNode {
    async fn execute(&self, ctx: &Context, input: &str) -> Result<String, FlowError> {
        if self.nodes.is_empty() {
            return Err(FlowError::Configuration("parallel node"));
        }

        let outcomes = self.run_all(ctx, input).await;

        let mut results = Vec::with_capacity(outcomes.len());
        let mut succeeded = 0;
        for (index, outcome) in outcomes.into_iter().enumerate() {
            match outcome {
                Ok(output) => {
                    succeeded += 1;
                    results.push(output);
                }
                Err(err) if self.fail_fast => return Err(err),
                Err(err) => {
                    log::warn!("Parallel node {} returned error: {}", index, err);
                    results.push(String::new());
                }
            }
        }

        if succeeded == 0 {
            return Err(FlowError::MergeInput);
        }

        Ok(match &self.merge {
            Some(merge) => merge(&results),
            None => results.join("\n"),
        })
    }

    fn name(&self) -> &str {
        "ParallelNode"
    }

    fn validate(&self, result: &mut ValidationResult) {
        if self.nodes.is_empty() {
            result.add_error("ParallelNode has no child nodes and will always fail.");
        }
        for node in &self.nodes {
            node.validate(result);
        }
    }
}
