/// Why a tree listing could not be produced.
///
/// Callers usually downgrade every variant to an empty gallery; the variants
/// exist so logs and tests can tell the failure modes apart.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected response shape: {0}")]
    Schema(#[from] serde_json::Error),
}

impl FetchError {
    /// Stable short name for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Status { .. } => "status",
            Self::Schema(_) => "schema",
        }
    }
}
