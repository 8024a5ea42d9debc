use thiserror::Error;

use crate::llm::error::LLMError;

/// Boxed payload carried by [`FlowError::Execution`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors produced while executing nodes, flows and tools.
#[derive(Debug, Error)]
pub enum FlowError {
    /// A combinator was built without any child nodes.
    #[error("{0}: no nodes configured")]
    Configuration(&'static str),

    #[error("tool not found: {0}")]
    ToolNotFound(String),

    /// A leaf node or tool failed on its own terms.
    #[error("{0}")]
    Execution(BoxError),

    #[error("failed after {attempts} attempts, last error: {source}")]
    RetriesExhausted {
        attempts: usize,
        #[source]
        source: Box<FlowError>,
    },

    #[error("parallel merge received no usable results")]
    MergeInput,

    /// Wraps the failure of a flow step with its position.
    #[error("error at step {step}: {source}")]
    Step {
        step: usize,
        #[source]
        source: Box<FlowError>,
    },

    #[error("model error: {0}")]
    Model(#[from] LLMError),

    #[error("operation cancelled")]
    Cancelled,
}

impl FlowError {
    /// Creates an [`FlowError::Execution`] from any error or message.
    ///
    /// ```
    /// use wordflow::FlowError;
    ///
    /// let err = FlowError::execution("disk full");
    /// assert_eq!(err.to_string(), "disk full");
    /// ```
    pub fn execution(err: impl Into<BoxError>) -> Self {
        FlowError::Execution(err.into())
    }

    /// Returns the innermost error, looking through retry and step wrappers.
    pub fn root(&self) -> &FlowError {
        match self {
            FlowError::RetriesExhausted { source, .. } | FlowError::Step { source, .. } => {
                source.root()
            }
            other => other,
        }
    }
}
