//! Session state reconstruction from decoded stream records.

use std::collections::BTreeMap;

use serde_json::Value;
use shared::{
    domain::HostStage,
    protocol::{Assignments, DebateRequest, DebateResponse, Interlude, StreamRecord, Turn, Vote},
};
use tracing::{debug, warn};

use crate::error::{SessionError, DEFAULT_FAILURE_MESSAGE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStatus {
    #[default]
    Streaming,
    Complete,
    Error,
    Aborted,
}

impl SessionStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, SessionStatus::Streaming)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub topic: String,
    /// Descriptor the session was started with; never touched by records.
    pub request: Option<DebateRequest>,
    pub transcript: Vec<Turn>,
    /// One interlude per stage, last write wins.
    pub interludes: BTreeMap<HostStage, Interlude>,
    pub judge_votes: Vec<Vote>,
    pub assignments: Assignments,
    pub metadata: Option<Value>,
    pub status: SessionStatus,
    pub failure: Option<String>,
}

impl SessionState {
    pub fn seeded(request: &DebateRequest) -> Self {
        Self {
            topic: request.topic.clone(),
            request: Some(request.clone()),
            metadata: request.metadata.clone(),
            ..Self::default()
        }
    }

    /// Builds a state from a full server-side debate object.
    pub fn from_response(response: DebateResponse) -> Self {
        let DebateResponse {
            topic,
            assignments,
            transcript,
            interludes,
            judge_votes,
            metadata,
        } = response;
        let mut state = Self {
            topic,
            transcript,
            judge_votes,
            assignments,
            metadata,
            ..Self::default()
        };
        for interlude in interludes {
            state.upsert_interlude(interlude);
        }
        state
    }

    /// Snapshot in the backend's wire shape, interludes in procedural order.
    pub fn to_response(&self) -> DebateResponse {
        DebateResponse {
            topic: self.topic.clone(),
            assignments: self.assignments.clone(),
            transcript: self.transcript.clone(),
            interludes: self.interludes.values().cloned().collect(),
            judge_votes: self.judge_votes.clone(),
            metadata: self.metadata.clone(),
        }
    }

    pub fn interlude(&self, stage: &HostStage) -> Option<&Interlude> {
        self.interludes.get(stage)
    }

    fn upsert_interlude(&mut self, interlude: Interlude) {
        if let Some(previous) = self.interludes.insert(interlude.stage.clone(), interlude) {
            debug!(stage = %previous.stage, "host interlude replaced by a later one");
        }
    }
}

/// Which rendered views need recomputing after a record was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewRefresh {
    pub summary: bool,
    pub timeline: bool,
    pub judges: bool,
}

impl ViewRefresh {
    pub const NONE: Self = Self {
        summary: false,
        timeline: false,
        judges: false,
    };
    pub const ALL: Self = Self {
        summary: true,
        timeline: true,
        judges: true,
    };

    pub fn is_empty(self) -> bool {
        self == Self::NONE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Applied {
    pub refresh: ViewRefresh,
    /// Set once the session reached `Complete`; nothing should be read after.
    pub terminal: bool,
}

/// Sole owner of the session state. Applies records strictly in the order
/// they are handed in.
#[derive(Debug, Default)]
pub struct EventDispatcher {
    state: Option<SessionState>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded(request: &DebateRequest) -> Self {
        Self {
            state: Some(SessionState::seeded(request)),
        }
    }

    pub fn state(&self) -> Option<&SessionState> {
        self.state.as_ref()
    }

    pub fn into_state(self) -> Option<SessionState> {
        self.state
    }

    pub fn reset(&mut self) {
        self.state = None;
    }

    pub fn apply(&mut self, record: StreamRecord) -> Result<Applied, SessionError> {
        let refresh = match record {
            StreamRecord::Assignments(assignments) => {
                self.state_mut().assignments = assignments;
                ViewRefresh {
                    summary: true,
                    ..ViewRefresh::NONE
                }
            }
            StreamRecord::HostInterlude(interlude) => {
                self.state_mut().upsert_interlude(interlude);
                ViewRefresh {
                    summary: true,
                    timeline: true,
                    judges: false,
                }
            }
            StreamRecord::DebateTurn(turn) => {
                self.state_mut().transcript.push(turn);
                ViewRefresh {
                    summary: true,
                    timeline: true,
                    judges: false,
                }
            }
            StreamRecord::JudgeVote(vote) => {
                self.state_mut().judge_votes.push(vote);
                ViewRefresh {
                    summary: true,
                    timeline: false,
                    judges: true,
                }
            }
            StreamRecord::Complete(response) => {
                self.complete(response);
                return Ok(Applied {
                    refresh: ViewRefresh::ALL,
                    terminal: true,
                });
            }
            StreamRecord::Error(payload) => {
                let message = payload
                    .message
                    .map(|message| message.trim().to_string())
                    .filter(|message| !message.is_empty())
                    .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string());
                self.fail(message.clone());
                return Err(SessionError::Application(message));
            }
            StreamRecord::Unknown(kind) => {
                warn!(kind = %kind, "ignoring unrecognized stream record");
                ViewRefresh::NONE
            }
        };
        Ok(Applied {
            refresh,
            terminal: false,
        })
    }

    /// Replaces the whole state with the server's final word. Also the ingest
    /// path for the synchronous endpoint.
    pub fn complete(&mut self, response: DebateResponse) {
        let request = self.state.take().and_then(|state| state.request);
        let mut state = SessionState::from_response(response);
        state.request = request;
        state.status = SessionStatus::Complete;
        self.state = Some(state);
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        let state = self.state_mut();
        state.status = SessionStatus::Error;
        state.failure = Some(message.into());
    }

    pub fn abort(&mut self) {
        if let Some(state) = self.state.as_mut() {
            state.status = SessionStatus::Aborted;
        }
    }

    fn state_mut(&mut self) -> &mut SessionState {
        self.state.get_or_insert_with(SessionState::default)
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
