//! The workflow engine: the [`Node`](node::Node) contract, sequential
//! [`Flow`](flow::Flow)s and the combinator nodes.

pub mod balancing_node;
pub mod conditional_node;
pub mod context;
pub mod error;
pub mod flow;
pub mod func_node;
pub mod node;
pub mod parallel_node;
pub mod retry_node;
pub mod telemetry;
pub mod validation;
