use thiserror::Error;

/// Failure of a layout classifier call.
///
/// None of these reach a response body: the caller replaces a failed
/// resolution with the fixed rule and records the outcome.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("classifier request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("classifier returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("classifier output is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("classifier output has no usable content: {0}")]
    EmptyOutput(String),

    #[error("classifier output was cut off at the {max_output_tokens}-token limit")]
    OutputTruncated { max_output_tokens: u32 },

    #[error("unrecognised layout {value:?} for item {id}")]
    InvalidLayout { id: String, value: String },

    #[error("no decision for item {0}")]
    MissingDecision(String),

    #[error("all {0} per-item classifications failed")]
    AllItemsFailed(usize),
}

impl LayoutError {
    /// Short label used in structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Status { .. } => "status",
            Self::Json(_) => "json",
            Self::EmptyOutput(_) => "empty_output",
            Self::OutputTruncated { .. } => "output_truncated",
            Self::InvalidLayout { .. } => "invalid_layout",
            Self::MissingDecision(_) => "missing_decision",
            Self::AllItemsFailed(_) => "all_items_failed",
        }
    }
}
