/// Failure to append a visit to its sink.
///
/// Covers the three ways an external store lets us down: it cannot be
/// reached, it refuses our credentials, or it refuses the write itself
/// (quota, missing sheet, bad range). A caller that gives up waiting
/// reports [`SinkError::Timeout`].
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("Sink unreachable: {0}")]
    Transport(String),

    #[error("Sink rejected credentials: {0}")]
    Auth(String),

    #[error("Sink rejected append ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("Sink did not answer within {after_ms} ms")]
    Timeout { after_ms: u64 },
}

impl SinkError {
    /// Short machine-friendly label for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            SinkError::Transport(_) => "transport",
            SinkError::Auth(_) => "auth",
            SinkError::Rejected { .. } => "rejected",
            SinkError::Timeout { .. } => "timeout",
        }
    }
}
