use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt};

use crate::core::context::Context;
use crate::core::error::FlowError;
use crate::core::node::Node;

type ProcessFn =
    dyn Fn(Context, String) -> BoxFuture<'static, Result<String, FlowError>> + Send + Sync;

/// A node that runs a caller supplied transform.
#[derive(Clone)]
pub struct FuncNode {
    process: Arc<ProcessFn>,
}

impl FuncNode {
    /// Wraps an async transform.
    ///
    /// ```
    /// use wordflow::{Context, FuncNode, Node};
    ///
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() {
    /// let shout = FuncNode::new(|_ctx, input| async move { Ok(input.to_uppercase()) });
    /// assert_eq!(shout.execute(&Context::new(), "hi").await.unwrap(), "HI");
    /// # }
    /// ```
    pub fn new<F, Fut>(process: F) -> Self
    where
        F: Fn(Context, String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String, FlowError>> + Send + 'static,
    {
        FuncNode {
            process: Arc::new(move |ctx, input| process(ctx, input).boxed()),
        }
    }

    /// Wraps a synchronous transform that does not need the context.
    pub fn from_fn<F>(process: F) -> Self
    where
        F: Fn(&str) -> Result<String, FlowError> + Send + Sync + 'static,
    {
        let process = Arc::new(process);
        FuncNode::new(move |_ctx, input| {
            let process = Arc::clone(&process);
            async move { process(&input) }
        })
    }
}

#[async_trait]
impl Node for FuncNode {
    async fn execute(&self, ctx: &Context, input: &str) -> Result<String, FlowError> {
        (self.process)(ctx.clone(), input.to_string()).await
    }

    fn name(&self) -> &str {
        "FuncNode"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_async_func_node() {
        let n = FuncNode::new(|_ctx, input| async move {
            tokio::time::sleep(Duration::from_millis(1)).await;
            Ok(format!("<{}>", input))
        });
        assert_eq!(n.execute(&Context::new(), "x").await.unwrap(), "<x>");
    }

    #[tokio::test]
    async fn test_func_node_sees_context() {
        let n = FuncNode::new(|ctx, input| async move {
            if ctx.is_cancelled() {
                Err(FlowError::Cancelled)
            } else {
                Ok(input)
            }
        });
        let ctx = Context::new();
        ctx.cancel();
        assert!(matches!(n.execute(&ctx, "x").await, Err(FlowError::Cancelled)));
    }

    #[tokio::test]
    async fn test_sync_func_node_error() {
        let n = FuncNode::from_fn(|_| Err(FlowError::execution("bad input")));
        let err = n.execute(&Context::new(), "x").await.unwrap_err();
        assert_eq!(err.to_string(), "bad input");
    }
}
