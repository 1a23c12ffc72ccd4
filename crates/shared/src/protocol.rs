use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use url::Url;

use crate::{
    domain::{HostStage, ParticipantConfig, Side, VoteChoice},
    error::RequestValidationError,
};

pub const MIN_JUDGES: usize = 5;
pub const MAX_JUDGES: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebateOptions {
    #[serde(default = "default_max_cross_questions")]
    pub max_cross_questions: u32,
    #[serde(default = "default_max_freeform_rounds")]
    pub max_freeform_rounds: u32,
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u32,
}

fn default_max_cross_questions() -> u32 {
    5
}

fn default_max_freeform_rounds() -> u32 {
    10
}

fn default_request_timeout_seconds() -> u32 {
    45
}

impl Default for DebateOptions {
    fn default() -> Self {
        Self {
            max_cross_questions: default_max_cross_questions(),
            max_freeform_rounds: default_max_freeform_rounds(),
            request_timeout_seconds: default_request_timeout_seconds(),
        }
    }
}

/// Session descriptor submitted to start a debate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebateRequest {
    pub topic: String,
    pub host: ParticipantConfig,
    pub debaters: Vec<ParticipantConfig>,
    pub judges: Vec<ParticipantConfig>,
    #[serde(default)]
    pub options: DebateOptions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl DebateRequest {
    /// Drops judge rows where neither a name nor an endpoint was filled in.
    pub fn without_blank_judges(mut self) -> Self {
        self.judges.retain(|judge| !judge.is_blank());
        self
    }

    pub fn validate(&self) -> Result<(), RequestValidationError> {
        if self.topic.trim().is_empty() {
            return Err(RequestValidationError::MissingTopic);
        }
        if !is_complete(&self.host) {
            return Err(RequestValidationError::IncompleteHost);
        }
        check_endpoint("host", &self.host)?;

        if self.debaters.len() != 2 {
            return Err(RequestValidationError::DebaterCount(self.debaters.len()));
        }
        for (index, debater) in self.debaters.iter().enumerate() {
            if !is_complete(debater) {
                return Err(RequestValidationError::IncompleteDebater { index: index + 1 });
            }
            check_endpoint(&format!("debater {}", index + 1), debater)?;
        }

        if !(MIN_JUDGES..=MAX_JUDGES).contains(&self.judges.len()) {
            return Err(RequestValidationError::JudgeCount {
                got: self.judges.len(),
                min: MIN_JUDGES,
                max: MAX_JUDGES,
            });
        }
        for (index, judge) in self.judges.iter().enumerate() {
            if !is_complete(judge) {
                return Err(RequestValidationError::IncompleteJudge { index: index + 1 });
            }
            check_endpoint(&format!("judge {}", index + 1), judge)?;
        }

        check_range("max_cross_questions", self.options.max_cross_questions, 1, 10)?;
        check_range("max_freeform_rounds", self.options.max_freeform_rounds, 1, 12)?;
        check_range(
            "request_timeout_seconds",
            self.options.request_timeout_seconds,
            5,
            120,
        )?;
        Ok(())
    }
}

fn is_complete(participant: &ParticipantConfig) -> bool {
    !participant.name.trim().is_empty() && !participant.endpoint.trim().is_empty()
}

fn check_endpoint(
    label: &str,
    participant: &ParticipantConfig,
) -> Result<(), RequestValidationError> {
    let valid = Url::parse(participant.endpoint.trim())
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false);
    if valid {
        Ok(())
    } else {
        Err(RequestValidationError::InvalidEndpoint {
            participant: label.to_string(),
            endpoint: participant.endpoint.clone(),
        })
    }
}

fn check_range(
    name: &'static str,
    value: u32,
    min: u32,
    max: u32,
) -> Result<(), RequestValidationError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(RequestValidationError::OptionOutOfRange {
            name,
            value,
            min,
            max,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub stage: String,
    pub speaker_role: Side,
    pub speaker_name: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interlude {
    pub stage: HostStage,
    pub content: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VoteMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persona_name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vote {
    pub judge_name: String,
    pub vote: VoteChoice,
    #[serde(default)]
    pub rationale: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<VoteMetadata>,
}

impl Vote {
    pub fn persona_name(&self) -> Option<&str> {
        self.metadata
            .as_ref()
            .and_then(|metadata| metadata.persona_name.as_deref())
    }
}

/// Role assignments announced by the backend after the debaters are drawn.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Assignments {
    #[serde(default, alias = "AFFIRMATIVE", skip_serializing_if = "Option::is_none")]
    pub affirmative: Option<String>,
    #[serde(default, alias = "NEGATIVE", skip_serializing_if = "Option::is_none")]
    pub negative: Option<String>,
    #[serde(default, alias = "HOST", skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(
        default,
        alias = "JUDGE",
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub judge: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        Some(OneOrMany::One(name)) => vec![name],
        Some(OneOrMany::Many(names)) => names,
        None => Vec::new(),
    })
}

/// Full debate object: the `complete` payload and the synchronous endpoint's
/// response body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DebateResponse {
    pub topic: String,
    #[serde(default)]
    pub assignments: Assignments,
    #[serde(default)]
    pub transcript: Vec<Turn>,
    #[serde(default)]
    pub interludes: Vec<Interlude>,
    #[serde(default)]
    pub judge_votes: Vec<Vote>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// One decoded frame, before its payload is interpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub payload: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StreamRecord {
    Assignments(Assignments),
    HostInterlude(Interlude),
    DebateTurn(Turn),
    JudgeVote(Vote),
    Complete(DebateResponse),
    Error(ErrorPayload),
    /// A record type this client does not understand. Kept so callers can log
    /// it; dispatching it is a no-op.
    Unknown(String),
}

impl StreamRecord {
    pub fn kind(&self) -> &str {
        match self {
            StreamRecord::Assignments(_) => "assignments",
            StreamRecord::HostInterlude(_) => "host_interlude",
            StreamRecord::DebateTurn(_) => "debate_turn",
            StreamRecord::JudgeVote(_) => "judge_vote",
            StreamRecord::Complete(_) => "complete",
            StreamRecord::Error(_) => "error",
            StreamRecord::Unknown(kind) => kind,
        }
    }
}

impl TryFrom<RawRecord> for StreamRecord {
    type Error = serde_json::Error;

    fn try_from(raw: RawRecord) -> Result<Self, serde_json::Error> {
        let RawRecord { kind, payload } = raw;
        Ok(match kind.as_str() {
            "assignments" => StreamRecord::Assignments(serde_json::from_value(payload)?),
            "host_interlude" => StreamRecord::HostInterlude(serde_json::from_value(payload)?),
            "debate_turn" => StreamRecord::DebateTurn(serde_json::from_value(payload)?),
            "judge_vote" => StreamRecord::JudgeVote(serde_json::from_value(payload)?),
            "complete" => StreamRecord::Complete(serde_json::from_value(payload)?),
            "error" => match payload {
                Value::Null => StreamRecord::Error(ErrorPayload::default()),
                Value::String(message) => StreamRecord::Error(ErrorPayload {
                    message: Some(message),
                }),
                other => StreamRecord::Error(serde_json::from_value(other)?),
            },
            _ => StreamRecord::Unknown(kind),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SaveDebateRequest<'a> {
    pub debate: &'a DebateResponse,
    pub filename: Option<&'a str>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveDebateResponse {
    pub path: String,
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
