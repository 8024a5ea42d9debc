use tokio_util::sync::CancellationToken;

/// The cancellable execution context handed to every node, tool and model call.
///
/// Cloning a `Context` shares the same cancellation state. Cancellation is
/// cooperative: nothing in the engine interrupts a running node, so long-running
/// work should race its own future against [`Context::cancelled`].
#[derive(Clone, Debug, Default)]
pub struct Context {
    token: CancellationToken,
}

impl Context {
    /// Creates a fresh, uncancelled context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context that is cancelled together with `self`, but can also be
    /// cancelled on its own without affecting the parent.
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once the context has been cancelled.
    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_follows_parent() {
        let parent = Context::new();
        let child = parent.child();
        assert!(!child.is_cancelled());
        parent.cancel();
        assert!(child.is_cancelled());
    }

    #[test]
    fn test_child_cancel_leaves_parent() {
        let parent = Context::new();
        let child = parent.child();
        child.cancel();
        assert!(child.is_cancelled());
        assert!(!parent.is_cancelled());
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let ctx = Context::new();
        let clone = ctx.clone();
        clone.cancel();
        ctx.cancelled().await;
        assert!(ctx.is_cancelled());
    }
}
