//! Derived, read-only views over a session: the summary card set and the
//! judge table.

use crate::{
    session::SessionState,
    tally::{tally, VoteTally},
};

const UNASSIGNED: &str = "(assigning…)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub topic: String,
    pub affirmative: String,
    pub negative: String,
    pub host: Option<String>,
    pub judges: Vec<String>,
    pub tally: VoteTally,
}

impl SessionSummary {
    pub fn result_label(&self) -> String {
        self.tally.winner_label()
    }
}

pub fn summary(state: &SessionState) -> SessionSummary {
    let assignments = &state.assignments;
    let request = state.request.as_ref();

    let host = assignments
        .host
        .clone()
        .or_else(|| request.map(|request| request.host.name.clone()));
    let judges = if assignments.judge.is_empty() {
        request
            .map(|request| request.judges.iter().map(|judge| judge.name.clone()).collect())
            .unwrap_or_default()
    } else {
        assignments.judge.clone()
    };

    SessionSummary {
        topic: state.topic.clone(),
        affirmative: assignments
            .affirmative
            .clone()
            .unwrap_or_else(|| UNASSIGNED.to_string()),
        negative: assignments
            .negative
            .clone()
            .unwrap_or_else(|| UNASSIGNED.to_string()),
        host,
        judges,
        tally: tally(&state.judge_votes),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JudgeRow {
    pub judge: String,
    pub vote: &'static str,
    pub rationale: String,
}

pub fn judge_rows(state: &SessionState) -> Vec<JudgeRow> {
    state
        .judge_votes
        .iter()
        .map(|vote| {
            let judge = match vote.persona_name() {
                Some(persona) if persona != vote.judge_name => {
                    format!("{} ({persona})", vote.judge_name)
                }
                _ => vote.judge_name.clone(),
            };
            JudgeRow {
                judge,
                vote: vote.vote.label(),
                rationale: vote.rationale.clone(),
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
