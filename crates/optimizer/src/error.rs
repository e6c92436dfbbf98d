use std::time::Duration;
use thiserror::Error;

/// Failures talking to the recommendation service. None of these leave
/// [`crate::BudgetOptimizer::optimize`]; they become a fallback response.
#[derive(Error, Debug)]
pub enum OptimizerError {
    #[error("recommendation service is not configured")]
    NotConfigured,

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("service returned no reply text")]
    EmptyReply,

    #[error("no reply within {0:?}")]
    Timeout(Duration),

    #[error("malformed reply: {0}")]
    MalformedReply(String),
}

impl OptimizerError {
    /// Short label for the failure counter.
    pub fn kind(&self) -> &'static str {
        match self {
            OptimizerError::NotConfigured => "not_configured",
            OptimizerError::Transport(_) => "transport",
            OptimizerError::Status { .. } => "status",
            OptimizerError::EmptyReply => "empty_reply",
            OptimizerError::Timeout(_) => "timeout",
            OptimizerError::MalformedReply(_) => "malformed_reply",
        }
    }
}

impl From<serde_json::Error> for OptimizerError {
    fn from(e: serde_json::Error) -> Self {
        OptimizerError::MalformedReply(e.to_string())
    }
}
