//! # Wordflow
//!
//! A small, composable workflow engine for text-processing pipelines, with
//! conversational agents that can call tools from inside model output.
//!
//! ## Features
//!
//! - **Text-in, text-out nodes**: every step implements [`Node`], so steps of any kind compose
//! - **Sequential flows**: [`Flow`] chains nodes and is itself a node
//! - **Combinators**: retry, conditional branching, parallel fan-out and load balancing
//! - **Agents**: [`Agent`] keeps a conversation and resolves `CALL TOOL:` directives
//! - **Bring your own model**: providers plug in through the [`Model`] trait
//!
//! ## Quick Start
//!
//! ```rust
//! use wordflow::prelude::*;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), FlowError> {
//! let flow = Flow::new(vec![
//!     node(FuncNode::from_fn(|s| Ok(format!("A({})", s)))),
//!     node(FuncNode::from_fn(|s| Ok(format!("B({})", s)))),
//! ]);
//!
//! let out = flow.run(&Context::new(), "s").await?;
//! assert_eq!(out, "B(A(s))");
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`agent`]: Agents, tool directives, middleware and agent-backed nodes
//! - [`llm`]: The model contract and the [`ModelClient`] registry
//! - [`tools`]: The tool contract and the [`ToolRegistry`]
//! - [`prelude`]: Commonly used types and traits (import with `use wordflow::prelude::*`)

// ============================================================================
// Modules
// ============================================================================

mod core;

pub mod agent;
pub mod llm;
pub mod tools;

// ============================================================================
// Public Re-exports - Granular Imports
// ============================================================================

// Workflow engine
pub use crate::core::context::Context;
pub use crate::core::error::{BoxError, FlowError};
pub use crate::core::flow::Flow;
pub use crate::core::node::{node, Node, NodeRef};
pub use crate::core::telemetry::{LogTelemetry, MemoryTelemetry, StepTrace, Telemetry};
pub use crate::core::validation::{ValidationIssue, ValidationResult};

// Combinators
pub use crate::core::balancing_node::BalancingNode;
pub use crate::core::conditional_node::ConditionalNode;
pub use crate::core::func_node::FuncNode;
pub use crate::core::parallel_node::ParallelNode;
pub use crate::core::retry_node::RetryNode;

// Agents, models and tools
pub use agent::middleware::{AgentMiddleware, HistoryWindow, TrimResponse};
pub use agent::{
    Agent, AgentConfig, AgentModel, ConversationMessage, LlmNode, Role, SharedAgent, ToolNode,
};
pub use llm::{LLMError, Model, ModelClient, ModelProvider, ModelRequest, ModelResponse, Usage};
pub use tools::{EnhancedTool, Tool, ToolRegistry};

// ============================================================================
// Prelude Module - Convenient Bulk Import
// ============================================================================

/// Imports everything needed to build and run workflows and agents.
///
/// # Example
/// ```rust
/// use wordflow::prelude::*;
/// ```
pub mod prelude {
    pub use super::{
        node,
        // Agents
        Agent,
        AgentConfig,
        AgentModel,
        // Combinators
        BalancingNode,
        ConditionalNode,
        // Engine
        Context,
        Flow,
        FlowError,
        FuncNode,
        LlmNode,
        // Models and tools
        Model,
        ModelClient,
        ModelRequest,
        ModelResponse,
        Node,
        NodeRef,
        ParallelNode,
        RetryNode,
        SharedAgent,
        Telemetry,
        Tool,
        ToolNode,
        ValidationResult,
    };
}

// ============================================================================
// Library Metadata
// ============================================================================

/// The version of this crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The name of this crate.
pub const NAME: &str = env!("CARGO_PKG_NAME");
