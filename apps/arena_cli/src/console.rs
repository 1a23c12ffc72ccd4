//! Live terminal rendering of a debate session.

use std::{collections::HashSet, io::Write};

use arena_core::{
    assemble,
    labels::{host_stage_label, stage_label},
    view::{judge_rows, summary},
    SessionState, SessionView, TimelineItem, ViewRefresh,
};
use async_trait::async_trait;
use shared::domain::HostStage;
use tracing::warn;

/// Prints each timeline item and judge vote once, as it becomes available.
pub struct ConsoleView<W> {
    out: W,
    printed_turns: usize,
    printed_hosts: HashSet<HostStage>,
    printed_votes: usize,
    announced_sides: bool,
}

impl<W: Write + Send> ConsoleView<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            printed_turns: 0,
            printed_hosts: HashSet::new(),
            printed_votes: 0,
            announced_sides: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn render(&mut self, state: &SessionState, refresh: ViewRefresh) -> std::io::Result<()> {
        if refresh.summary && !self.announced_sides {
            self.announce_sides(state)?;
        }
        if refresh.timeline {
            self.render_timeline(state)?;
        }
        if refresh.judges {
            self.render_votes(state)?;
        }
        self.out.flush()
    }

    fn announce_sides(&mut self, state: &SessionState) -> std::io::Result<()> {
        let (Some(affirmative), Some(negative)) = (
            state.assignments.affirmative.as_deref(),
            state.assignments.negative.as_deref(),
        ) else {
            return Ok(());
        };
        self.announced_sides = true;
        writeln!(self.out, "== {} ==", state.topic)?;
        writeln!(self.out, "Affirmative: {affirmative}  |  Negative: {negative}\n")
    }

    fn render_timeline(&mut self, state: &SessionState) -> std::io::Result<()> {
        let mut turn_index = 0;
        for item in assemble(state) {
            match item {
                TimelineItem::Host(interlude) => {
                    if self.printed_hosts.insert(interlude.stage.clone()) {
                        writeln!(self.out, "[{}]", host_stage_label(&interlude.stage))?;
                        writeln!(self.out, "{}\n", interlude.content.trim())?;
                    }
                }
                TimelineItem::Turn(turn) => {
                    if turn_index >= self.printed_turns {
                        writeln!(
                            self.out,
                            "[{}] {}",
                            stage_label(&turn.stage),
                            turn.speaker_name
                        )?;
                        writeln!(self.out, "{}\n", turn.content.trim())?;
                        self.printed_turns = turn_index + 1;
                    }
                    turn_index += 1;
                }
            }
        }
        Ok(())
    }

    fn render_votes(&mut self, state: &SessionState) -> std::io::Result<()> {
        let rows = judge_rows(state);
        if self.printed_votes == 0 && !rows.is_empty() {
            writeln!(self.out, "Judge votes:")?;
        }
        for row in rows.into_iter().skip(self.printed_votes) {
            writeln!(self.out, "  {:<28} {:<12} {}", row.judge, row.vote, row.rationale)?;
            self.printed_votes += 1;
        }
        Ok(())
    }

    fn render_result(&mut self, state: &SessionState) -> std::io::Result<()> {
        let card = summary(state);
        writeln!(self.out, "---")?;
        writeln!(self.out, "Topic:       {}", card.topic)?;
        writeln!(self.out, "Affirmative: {}", card.affirmative)?;
        writeln!(self.out, "Negative:    {}", card.negative)?;
        if let Some(host) = &card.host {
            writeln!(self.out, "Host:        {host}")?;
        }
        if !card.judges.is_empty() {
            writeln!(self.out, "Judges:      {}", card.judges.join(", "))?;
        }
        writeln!(
            self.out,
            "Result:      {} ({} affirmative, {} negative, {} tie)",
            card.result_label(),
            card.tally.affirmative,
            card.tally.negative,
            card.tally.ties
        )?;
        self.out.flush()
    }
}

#[async_trait]
impl<W: Write + Send> SessionView for ConsoleView<W> {
    async fn refresh(&mut self, state: &SessionState, refresh: ViewRefresh) {
        if let Err(err) = self.render(state, refresh) {
            warn!(error = %err, "failed to write debate output");
        }
    }

    async fn completed(&mut self, state: &SessionState) {
        if let Err(err) = self.render_result(state) {
            warn!(error = %err, "failed to write debate result");
        }
    }
}

#[cfg(test)]
#[path = "tests/console_tests.rs"]
mod tests;
