use std::fmt;

use shared::{domain::VoteChoice, protocol::Vote};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// No votes cast yet.
    Undetermined,
    AffirmativeLeads { lead: usize, trail: usize },
    NegativeLeads { lead: usize, trail: usize },
    Even,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Undetermined => f.write_str("Judges still deliberating"),
            Verdict::AffirmativeLeads { lead, trail } => {
                write!(f, "Affirmative leads {lead}-{trail}")
            }
            Verdict::NegativeLeads { lead, trail } => write!(f, "Negative leads {lead}-{trail}"),
            Verdict::Even => f.write_str("Tie"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteTally {
    pub affirmative: usize,
    pub negative: usize,
    pub ties: usize,
    pub verdict: Verdict,
}

impl VoteTally {
    pub fn total(&self) -> usize {
        self.affirmative + self.negative + self.ties
    }

    /// Verdict text, annotated with the tie-vote count whenever there is one.
    pub fn winner_label(&self) -> String {
        if self.ties > 0 && self.verdict != Verdict::Undetermined {
            format!("{} (ties: {})", self.verdict, self.ties)
        } else {
            self.verdict.to_string()
        }
    }
}

pub fn tally(votes: &[Vote]) -> VoteTally {
    let (mut affirmative, mut negative, mut ties) = (0, 0, 0);
    for vote in votes {
        match vote.vote {
            VoteChoice::Affirmative => affirmative += 1,
            VoteChoice::Negative => negative += 1,
            VoteChoice::Tie => ties += 1,
        }
    }

    let verdict = if votes.is_empty() {
        Verdict::Undetermined
    } else if affirmative > negative {
        Verdict::AffirmativeLeads {
            lead: affirmative,
            trail: negative,
        }
    } else if negative > affirmative {
        Verdict::NegativeLeads {
            lead: negative,
            trail: affirmative,
        }
    } else {
        Verdict::Even
    };

    VoteTally {
        affirmative,
        negative,
        ties,
        verdict,
    }
}

#[cfg(test)]
#[path = "tests/tally_tests.rs"]
mod tests;
