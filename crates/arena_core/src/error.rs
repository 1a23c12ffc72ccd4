use thiserror::Error;

const FRAME_SNIPPET_LEN: usize = 120;

/// Message surfaced when the backend reports an error without one.
pub const DEFAULT_FAILURE_MESSAGE: &str = "the debate failed on the server";

#[derive(Debug, Error)]
#[error("malformed stream frame `{snippet}`: {source}")]
pub struct FrameDecodeError {
    pub snippet: String,
    #[source]
    pub source: serde_json::Error,
}

impl FrameDecodeError {
    pub fn new(payload: &str, source: serde_json::Error) -> Self {
        Self {
            snippet: truncate(payload, FRAME_SNIPPET_LEN),
            source,
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    FrameDecode(#[from] FrameDecodeError),
    #[error("unexpected `{kind}` record payload: {source}")]
    RecordShape {
        kind: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("{0}")]
    Application(String),
    #[error("the stream ended before the debate completed")]
    IncompleteStream,
    #[error("{message}")]
    Transport {
        status: Option<u16>,
        message: String,
    },
    #[error("invalid debate request: {0}")]
    InvalidRequest(#[from] shared::error::RequestValidationError),
}

impl SessionError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            status: None,
            message: message.into(),
        }
    }

    /// Whether the failure came from the stream contents rather than from
    /// reaching the server.
    pub fn is_stream_failure(&self) -> bool {
        matches!(
            self,
            Self::FrameDecode(_)
                | Self::RecordShape { .. }
                | Self::Application(_)
                | Self::IncompleteStream
        )
    }
}

impl From<reqwest::Error> for SessionError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport {
            status: value.status().map(|status| status.as_u16()),
            message: format!("request to debate server failed: {value}"),
        }
    }
}

/// Truncates to at most `max_len` characters without splitting a character.
pub(crate) fn truncate(s: &str, max_len: usize) -> String {
    match s.char_indices().nth(max_len) {
        Some((byte_idx, _)) => format!("{}...", &s[..byte_idx]),
        None => s.to_string(),
    }
}
