//! Human-readable labels for stage tags.

use shared::domain::{HostStage, Side};

pub fn host_stage_label(stage: &HostStage) -> &'static str {
    match stage {
        HostStage::Introduction => "Host opening",
        HostStage::PreCrossExamination => "Interlude: before cross-examination",
        HostStage::MidCrossExamination => "Interlude: cross-examination halftime",
        HostStage::PreFreeDebate => "Interlude: before free debate",
        HostStage::PreClosing => "Interlude: before closing statements",
        HostStage::PreJudging => "Interlude: over to the judges",
        HostStage::WrapUp => "Interlude: results",
        HostStage::Other(_) => "Host interlude",
    }
}

/// Label for a spoken turn's stage tag, e.g. `negative_cross_a2` becomes
/// "Affirmative answers question 2".
pub fn stage_label(stage: &str) -> String {
    if stage.is_empty() {
        return "Unknown stage".to_string();
    }
    if let Some(side) = stage.strip_prefix("opening_") {
        return format!("{} opening statement", side_named(side).label());
    }
    // The side speaking in an answer turn is the one being examined.
    for (prefix, speaker, asks) in [
        ("affirmative_cross_q", Side::Affirmative, true),
        ("affirmative_cross_a", Side::Negative, false),
        ("negative_cross_q", Side::Negative, true),
        ("negative_cross_a", Side::Affirmative, false),
    ] {
        if let Some(index) = stage.strip_prefix(prefix) {
            return if asks {
                format!("{} question {index}", speaker.label())
            } else {
                format!("{} answers question {index}", speaker.label())
            };
        }
    }
    if stage.starts_with("free_debate") {
        return free_debate_label(stage);
    }
    match stage {
        "closing_affirmative" => "Affirmative closing statement".to_string(),
        "closing_negative" => "Negative closing statement".to_string(),
        "judging" => "Judges' vote".to_string(),
        other => other.replace('_', " "),
    }
}

fn side_named(raw: &str) -> Side {
    if raw.contains("affirmative") {
        Side::Affirmative
    } else {
        Side::Negative
    }
}

fn free_debate_label(stage: &str) -> String {
    let info = stage
        .split_once("round")
        .map(|(_, info)| info)
        .unwrap_or_default();
    let (round_part, side_part) = info.split_once('_').unwrap_or((info, ""));
    let side = side_named(if side_part.is_empty() { stage } else { side_part });
    let round: String = [side_part, round_part]
        .iter()
        .map(|part| part.chars().filter(char::is_ascii_digit).collect::<String>())
        .find(|digits| !digits.is_empty())
        .unwrap_or_default();
    if round.is_empty() {
        format!("Free debate · {}", side.label())
    } else {
        format!("Free debate round {round} · {}", side.label())
    }
}

#[cfg(test)]
#[path = "tests/labels_tests.rs"]
mod tests;
