use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("sample count must be positive, got {0}")]
    InvalidSampleCount(usize),
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        name: &'static str,
        reason: String,
    },
    #[error("failed to parse parameters: {0}")]
    Json(#[from] serde_json::Error),
}
