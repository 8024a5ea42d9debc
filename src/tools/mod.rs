//! External helpers an agent can call by name.

pub mod registry;

use async_trait::async_trait;

use crate::core::context::Context;
use crate::core::error::FlowError;

pub use registry::ToolRegistry;

/// A named, invocable helper.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// Runs the tool on a free-text input.
    async fn execute(&self, ctx: &Context, input: &str) -> Result<String, FlowError>;

    /// Optional: returns the enhanced interface if this tool implements it.
    fn as_enhanced(&self) -> Option<&dyn EnhancedTool> {
        None
    }
}

/// Extra metadata some tools expose about their input.
pub trait EnhancedTool: Tool {
    /// A JSON schema describing the expected input.
    fn schema(&self) -> &str;

    /// Detailed usage instructions.
    fn help(&self) -> &str;
}
