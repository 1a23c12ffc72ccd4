use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Affirmative,
    Negative,
}

impl Side {
    pub fn label(self) -> &'static str {
        match self {
            Side::Affirmative => "Affirmative",
            Side::Negative => "Negative",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteChoice {
    Affirmative,
    Negative,
    Tie,
}

impl VoteChoice {
    pub fn label(self) -> &'static str {
        match self {
            VoteChoice::Affirmative => "Affirmative",
            VoteChoice::Negative => "Negative",
            VoteChoice::Tie => "Tie",
        }
    }
}

/// Stage marker carried by a host interlude.
///
/// The known variants are declared in procedural order, so the derived `Ord`
/// sorts interludes the way the debate runs. Stages the client does not know
/// are kept verbatim in `Other` and sort last.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum HostStage {
    Introduction,
    PreCrossExamination,
    MidCrossExamination,
    PreFreeDebate,
    PreClosing,
    PreJudging,
    WrapUp,
    Other(String),
}

impl HostStage {
    pub fn as_str(&self) -> &str {
        match self {
            HostStage::Introduction => "introduction",
            HostStage::PreCrossExamination => "pre_cross_examination",
            HostStage::MidCrossExamination => "mid_cross_examination",
            HostStage::PreFreeDebate => "pre_free_debate",
            HostStage::PreClosing => "pre_closing",
            HostStage::PreJudging => "pre_judging",
            HostStage::WrapUp => "wrap_up",
            HostStage::Other(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, HostStage::Other(_))
    }
}

impl From<&str> for HostStage {
    fn from(value: &str) -> Self {
        match value {
            "introduction" => HostStage::Introduction,
            "pre_cross_examination" => HostStage::PreCrossExamination,
            "mid_cross_examination" => HostStage::MidCrossExamination,
            "pre_free_debate" => HostStage::PreFreeDebate,
            "pre_closing" => HostStage::PreClosing,
            "pre_judging" => HostStage::PreJudging,
            "wrap_up" => HostStage::WrapUp,
            other => HostStage::Other(other.to_string()),
        }
    }
}

impl From<String> for HostStage {
    fn from(value: String) -> Self {
        match HostStage::from(value.as_str()) {
            HostStage::Other(_) => HostStage::Other(value),
            known => known,
        }
    }
}

impl From<HostStage> for String {
    fn from(value: HostStage) -> Self {
        match value {
            HostStage::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for HostStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantConfig {
    pub name: String,
    pub endpoint: String,
}

impl ParticipantConfig {
    pub fn new(name: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            endpoint: endpoint.into(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.name.trim().is_empty() && self.endpoint.trim().is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JudgePreset {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persona: Option<String>,
    #[serde(default)]
    pub description: String,
    pub endpoint: String,
}

impl From<JudgePreset> for ParticipantConfig {
    fn from(value: JudgePreset) -> Self {
        Self {
            name: value.name,
            endpoint: value.endpoint,
        }
    }
}
