use std::sync::Arc;

use async_trait::async_trait;

use crate::core::context::Context;
use crate::core::error::FlowError;
use crate::core::node::{Node, NodeRef};
use crate::core::validation::ValidationResult;

type Predicate = dyn Fn(&str) -> bool + Send + Sync;

/// Branches on a predicate over the input.
///
/// Without a false branch, a failing predicate passes the input through unchanged.
#[derive(Clone)]
pub struct ConditionalNode {
    condition: Arc<Predicate>,
    on_true: NodeRef,
    on_false: Option<NodeRef>,
}

impl ConditionalNode {
    pub fn new<P>(condition: P, on_true: NodeRef) -> Self
    where
        P: Fn(&str) -> bool + Send + Sync + 'static,
    {
        ConditionalNode {
            condition: Arc::new(condition),
            on_true,
            on_false: None,
        }
    }

    pub fn otherwise(mut self, on_false: NodeRef) -> Self {
        self.on_false = Some(on_false);
        self
    }
}

#[async_trait]
impl Node for ConditionalNode {
    async fn execute(&self, ctx: &Context, input: &str) -> Result<String, FlowError> {
        if (self.condition)(input) {
            self.on_true.execute(ctx, input).await
        } else if let Some(on_false) = &self.on_false {
            on_false.execute(ctx, input).await
        } else {
            Ok(input.to_string())
        }
    }

    fn name(&self) -> &str {
        "ConditionalNode"
    }

    fn validate(&self, result: &mut ValidationResult) {
        self.on_true.validate(result);
        if let Some(on_false) = &self.on_false {
            on_false.validate(result);
        }
    }
}
