use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error body returned by the debate backend on a non-success response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ApiErrorBody {
    /// Extracts `detail` from a raw response body, if the body is JSON and
    /// carries a non-empty one.
    pub fn detail_from(body: &str) -> Option<String> {
        serde_json::from_str::<ApiErrorBody>(body)
            .ok()
            .and_then(|parsed| parsed.detail)
            .map(|detail| detail.trim().to_string())
            .filter(|detail| !detail.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestValidationError {
    #[error("the debate topic is required")]
    MissingTopic,
    #[error("the host needs both a name and an endpoint")]
    IncompleteHost,
    #[error("exactly two debaters are required, got {0}")]
    DebaterCount(usize),
    #[error("debater {index} needs both a name and an endpoint")]
    IncompleteDebater { index: usize },
    #[error("between {min} and {max} judges are required, got {got}")]
    JudgeCount { got: usize, min: usize, max: usize },
    #[error("judge {index} needs both a name and an endpoint")]
    IncompleteJudge { index: usize },
    #[error("endpoint for {participant} is not an http(s) url: {endpoint}")]
    InvalidEndpoint {
        participant: String,
        endpoint: String,
    },
    #[error("option {name} must be within {min}..={max}, got {value}")]
    OptionOutOfRange {
        name: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },
}
