use super::*;
use serde_json::json;
use shared::protocol::{Interlude, Turn, Vote};

fn turn(stage: &str, speaker: &str) -> Turn {
    serde_json::from_value(json!({
        "stage": stage,
        "speaker_role": if stage.contains("negative") { "negative" } else { "affirmative" },
        "speaker_name": speaker,
        "content": format!("  {speaker} speaks  "),
    }))
    .expect("turn")
}

fn interlude(stage: &str, content: &str) -> Interlude {
    serde_json::from_value(json!({"stage": stage, "content": content})).expect("interlude")
}

fn output(view: ConsoleView<Vec<u8>>) -> String {
    String::from_utf8(view.into_inner()).expect("utf8 output")
}

#[tokio::test]
async fn items_are_printed_once_as_they_arrive() {
    let mut view = ConsoleView::new(Vec::new());
    let mut state = SessionState {
        topic: "Ban homework".to_string(),
        ..SessionState::default()
    };

    state.transcript.push(turn("opening_affirmative", "Ada"));
    view.refresh(&state, ViewRefresh::ALL).await;
    state.transcript.push(turn("opening_negative", "Bo"));
    view.refresh(&state, ViewRefresh::ALL).await;

    let text = output(view);
    assert_eq!(text.matches("[Affirmative opening statement] Ada").count(), 1);
    assert_eq!(text.matches("[Negative opening statement] Bo").count(), 1);
    assert!(text.contains("Ada speaks\n"));
}

#[tokio::test]
async fn late_interlude_is_printed_without_repeating_turns() {
    let mut view = ConsoleView::new(Vec::new());
    let mut state = SessionState::default();
    state.transcript.push(turn("opening_affirmative", "Ada"));
    view.refresh(&state, ViewRefresh::ALL).await;

    state.interludes.insert(
        HostStage::Introduction,
        interlude("introduction", "Welcome, everyone"),
    );
    view.refresh(&state, ViewRefresh::ALL).await;

    let text = output(view);
    assert_eq!(text.matches("Ada speaks").count(), 1);
    assert!(text.contains("[Host opening]\nWelcome, everyone\n"));
}

#[tokio::test]
async fn sides_are_announced_once_both_are_known() {
    let mut view = ConsoleView::new(Vec::new());
    let mut state = SessionState {
        topic: "Ban homework".to_string(),
        ..SessionState::default()
    };
    let summary_only = ViewRefresh {
        summary: true,
        ..ViewRefresh::NONE
    };

    state.assignments.affirmative = Some("Ada".to_string());
    view.refresh(&state, summary_only).await;
    state.assignments.negative = Some("Bo".to_string());
    view.refresh(&state, summary_only).await;
    view.refresh(&state, summary_only).await;

    let text = output(view);
    assert_eq!(text.matches("== Ban homework ==").count(), 1);
    assert!(text.contains("Affirmative: Ada  |  Negative: Bo"));
}

#[tokio::test]
async fn votes_and_result_are_rendered() {
    let mut view = ConsoleView::new(Vec::new());
    let mut state = SessionState::default();
    let votes: Vec<Vote> = serde_json::from_value(json!([
        {"judge_name": "J1", "vote": "affirmative", "rationale": "sharper rebuttals"},
        {"judge_name": "J2", "vote": "tie"}
    ]))
    .expect("votes");

    state.judge_votes.push(votes[0].clone());
    view.refresh(&state, ViewRefresh::ALL).await;
    state.judge_votes.push(votes[1].clone());
    view.refresh(&state, ViewRefresh::ALL).await;
    view.completed(&state).await;

    let text = output(view);
    assert_eq!(text.matches("Judge votes:").count(), 1);
    assert_eq!(text.matches("sharper rebuttals").count(), 1);
    assert!(text.contains("Result:      Affirmative leads 1-0 (ties: 1)"));
}
