use std::time::Duration;

use async_trait::async_trait;

use crate::core::context::Context;
use crate::core::error::FlowError;
use crate::core::node::{Node, NodeRef};
use crate::core::validation::ValidationResult;

/// Re-runs a wrapped node until it succeeds, at most `max_retries + 1` times.
///
/// The wait between attempts is constant. There is no backoff and no jitter.
#[derive(Clone)]
pub struct RetryNode {
    node: NodeRef,
    max_retries: usize,
    delay: Duration,
}

impl RetryNode {
    /// Wraps `node` with no retries and no delay.
    pub fn new(node: NodeRef) -> Self {
        RetryNode {
            node,
            max_retries: 0,
            delay: Duration::ZERO,
        }
    }

    pub fn max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Total number of attempts this node makes before giving up.
    pub fn attempts(&self) -> usize {
        self.max_retries.saturating_add(1)
    }
}

#[async_trait]
impl Node for RetryNode {
    async fn execute(&self, ctx: &Context, input: &str) -> Result<String, FlowError> {
        let mut attempt = 0;
        loop {
            let err = match self.node.execute(ctx, input).await {
                Ok(output) => return Ok(output),
                Err(err) => err,
            };

            attempt += 1;
            if attempt > self.max_retries {
                return Err(FlowError::RetriesExhausted {
                    attempts: attempt,
                    source: Box::new(err),
                });
            }

            log::debug!(
                "{} attempt {}/{} failed: {}; retrying in {:?}",
                self.node.name(),
                attempt,
                self.attempts(),
                err,
                self.delay
            );

            tokio::select! {
                _ = tokio::time::sleep(self.delay) => {}
                _ = ctx.cancelled() => return Err(FlowError::Cancelled),
            }
        }
    }

    fn name(&self) -> &str {
        "RetryNode"
    }

    fn validate(&self, result: &mut ValidationResult) {
        self.node.validate(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::func_node::FuncNode;
    use crate::core::node::node;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Fails until the call count reaches `succeed_on`.
    fn flaky(calls: Arc<AtomicUsize>, succeed_on: usize) -> NodeRef {
        node(FuncNode::from_fn(move |input| {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            if n >= succeed_on {
                Ok(format!("{} after {}", input, n))
            } else {
                Err(FlowError::execution(format!("attempt {} failed", n)))
            }
        }))
    }

    #[tokio::test]
    async fn test_succeeds_on_third_attempt() {
        let calls = Arc::new(AtomicUsize::new(0));
        let retry = RetryNode::new(flaky(Arc::clone(&calls), 3))
            .max_retries(2)
            .delay(Duration::from_millis(1));

        let out = retry.execute(&Context::new(), "ok").await.unwrap();
        assert_eq!(out, "ok after 3");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_unbounded_retries_do_not_overflow() {
        let calls = Arc::new(AtomicUsize::new(0));
        let retry = RetryNode::new(flaky(Arc::clone(&calls), 3)).max_retries(usize::MAX);
        assert_eq!(retry.attempts(), usize::MAX);

        let out = retry.execute(&Context::new(), "ok").await.unwrap();
        assert_eq!(out, "ok after 3");
    }

    #[tokio::test]
    async fn test_exhausts_attempts() {
        let calls = Arc::new(AtomicUsize::new(0));
        let retry = RetryNode::new(flaky(Arc::clone(&calls), usize::MAX)).max_retries(2);

        let err = retry.execute(&Context::new(), "x").await.unwrap_err();
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        match err {
            FlowError::RetriesExhausted { attempts, source } => {
                assert_eq!(attempts, 3);
                assert_eq!(source.to_string(), "attempt 3 failed");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_zero_retries_means_one_attempt() {
        let calls = Arc::new(AtomicUsize::new(0));
        let retry = RetryNode::new(flaky(Arc::clone(&calls), 2));
        assert!(retry.execute(&Context::new(), "x").await.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cancellation_interrupts_delay() {
        let calls = Arc::new(AtomicUsize::new(0));
        let retry = RetryNode::new(flaky(Arc::clone(&calls), usize::MAX))
            .max_retries(5)
            .delay(Duration::from_secs(60));
        let ctx = Context::new();
        ctx.cancel();

        let err = retry.execute(&ctx, "x").await.unwrap_err();
        assert!(matches!(err, FlowError::Cancelled));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
