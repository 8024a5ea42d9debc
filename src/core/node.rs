use std::sync::Arc;

use async_trait::async_trait;

use crate::core::context::Context;
use crate::core::error::FlowError;
use crate::core::validation::ValidationResult;

/// Shared handle to any node. Flows and combinators hold their children this way
/// so that mixed node kinds can live in one ordered sequence.
pub type NodeRef = Arc<dyn Node>;

/// A single step of a workflow.
///
/// A node consumes a string and produces a string, or fails. Implementations
/// must be safe to call from several flows at once: combinators and flows are
/// built once and reused across many runs.
#[async_trait]
pub trait Node: Send + Sync + 'static {
    /// Runs the node on `input`.
    ///
    /// # Arguments
    /// * `ctx` - The cancellable context of the current run
    /// * `input` - Output of the previous step, or the initial flow input
    async fn execute(&self, ctx: &Context, input: &str) -> Result<String, FlowError>;

    /// A short, human readable name used in traces and log lines.
    fn name(&self) -> &str {
        let full = std::any::type_name::<Self>();
        let path = full.split('<').next().unwrap_or(full);
        path.rsplit("::").next().unwrap_or("node")
    }

    /// Reports configuration problems of this node and its children.
    fn validate(&self, _result: &mut ValidationResult) {}
}

/// Wraps any node into a [`NodeRef`].
pub fn node<N: Node>(node: N) -> NodeRef {
    Arc::new(node)
}
