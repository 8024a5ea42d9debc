use thiserror::Error;

#[derive(Debug, Error)]
pub enum LLMError {
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Operation not supported by this model: {0}")]
    Unsupported(&'static str),
}
