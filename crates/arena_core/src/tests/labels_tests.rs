use super::*;

#[test]
fn opening_and_closing_stages_name_the_side() {
    assert_eq!(stage_label("opening_affirmative"), "Affirmative opening statement");
    assert_eq!(stage_label("opening_negative"), "Negative opening statement");
    assert_eq!(stage_label("closing_affirmative"), "Affirmative closing statement");
    assert_eq!(stage_label("closing_negative"), "Negative closing statement");
    assert_eq!(stage_label("judging"), "Judges' vote");
}

#[test]
fn cross_examination_answers_swap_the_side() {
    assert_eq!(stage_label("affirmative_cross_q1"), "Affirmative question 1");
    assert_eq!(stage_label("affirmative_cross_a1"), "Negative answers question 1");
    assert_eq!(stage_label("negative_cross_q3"), "Negative question 3");
    assert_eq!(stage_label("negative_cross_a3"), "Affirmative answers question 3");
}

#[test]
fn free_debate_rounds_carry_round_and_side() {
    assert_eq!(
        stage_label("free_debate_round1_affirmative"),
        "Free debate round 1 · Affirmative"
    );
    assert_eq!(
        stage_label("free_debate_round12_negative"),
        "Free debate round 12 · Negative"
    );
    assert_eq!(stage_label("free_debate_affirmative"), "Free debate · Affirmative");
}

#[test]
fn unknown_and_empty_stages_fall_back() {
    assert_eq!(stage_label(""), "Unknown stage");
    assert_eq!(stage_label("lightning_round"), "lightning round");
}

#[test]
fn host_stages_have_fixed_labels() {
    assert_eq!(host_stage_label(&HostStage::Introduction), "Host opening");
    assert_eq!(
        host_stage_label(&HostStage::MidCrossExamination),
        "Interlude: cross-examination halftime"
    );
    assert_eq!(
        host_stage_label(&HostStage::from("audience_questions")),
        "Host interlude"
    );
}
