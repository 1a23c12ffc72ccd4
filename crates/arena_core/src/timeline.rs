//! Interleaves host interludes into the spoken transcript.
//!
//! Interludes and turns arrive independently; each interlude stage has an
//! anchor in the transcript where it belongs. The pass is recomputed from
//! scratch on every call and never mutates the session.
//!
//! An interlude whose anchor never appears in the transcript is not emitted,
//! even though the session still holds it. A `mid_cross_examination` remark
//! with no `negative_cross_q*` turn is therefore absent from the timeline.

use std::collections::BTreeMap;

use shared::{
    domain::HostStage,
    protocol::{Interlude, Turn},
};

use crate::session::SessionState;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimelineItem<'a> {
    Host(&'a Interlude),
    Turn(&'a Turn),
}

impl TimelineItem<'_> {
    /// Raw stage tag of the item.
    pub fn stage(&self) -> &str {
        match self {
            TimelineItem::Host(interlude) => interlude.stage.as_str(),
            TimelineItem::Turn(turn) => &turn.stage,
        }
    }
}

/// Interludes not yet placed in the current pass.
struct Unplaced<'a> {
    remaining: BTreeMap<&'a HostStage, &'a Interlude>,
}

impl<'a> Unplaced<'a> {
    fn take_into(&mut self, stage: &HostStage, items: &mut Vec<TimelineItem<'a>>) {
        if let Some(interlude) = self.remaining.remove(stage) {
            items.push(TimelineItem::Host(interlude));
        }
    }
}

pub fn assemble(state: &SessionState) -> Vec<TimelineItem<'_>> {
    let mut unplaced = Unplaced {
        remaining: state.interludes.iter().collect(),
    };
    let mut items = Vec::with_capacity(state.transcript.len() + state.interludes.len());

    unplaced.take_into(&HostStage::Introduction, &mut items);

    for turn in &state.transcript {
        let stage = turn.stage.as_str();
        if stage == "opening_negative" {
            items.push(TimelineItem::Turn(turn));
            unplaced.take_into(&HostStage::PreCrossExamination, &mut items);
            continue;
        }
        if stage.starts_with("negative_cross_q") {
            unplaced.take_into(&HostStage::MidCrossExamination, &mut items);
        }
        if stage.starts_with("free_debate_round1_affirmative") {
            unplaced.take_into(&HostStage::PreFreeDebate, &mut items);
        }
        if stage == "closing_negative" {
            unplaced.take_into(&HostStage::PreClosing, &mut items);
        }

        items.push(TimelineItem::Turn(turn));

        if stage == "closing_affirmative" {
            unplaced.take_into(&HostStage::PreJudging, &mut items);
        }
    }

    unplaced.take_into(&HostStage::WrapUp, &mut items);
    items
}

#[cfg(test)]
#[path = "tests/timeline_tests.rs"]
mod tests;
