use super::*;
use chrono::TimeZone;
use std::time::{SystemTime, UNIX_EPOCH};

fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7)
        .single()
        .expect("valid timestamp")
}

fn temp_dir(label: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    std::env::temp_dir().join(format!("arena-archive-{label}-{}-{nanos}", std::process::id()))
}

#[test]
fn suggested_name_collapses_whitespace_and_underscores() {
    assert_eq!(
        suggested_save_name("Should  AI_write   Laws?"),
        "should-ai-write-laws?"
    );
    assert_eq!(suggested_save_name(&"x".repeat(40)).chars().count(), 32);
}

#[test]
fn filename_uses_timestamp_and_topic_slug() {
    assert_eq!(
        archive_filename(None, "Is remote work better?", fixed_time()),
        "20240309-140507_is-remote-work-better.json"
    );
}

#[test]
fn user_filename_takes_precedence_over_topic() {
    assert_eq!(
        archive_filename(Some("  Final Round!! "), "ignored topic", fixed_time()),
        "20240309-140507_final-round.json"
    );
    assert_eq!(
        archive_filename(Some("   "), "Topic", fixed_time()),
        "20240309-140507_topic.json"
    );
}

#[test]
fn slug_is_bounded_without_a_trailing_dash() {
    let topic = format!("{} tail", "a".repeat(47));
    let name = archive_filename(None, &topic, fixed_time());
    let slug = name
        .strip_prefix("20240309-140507_")
        .and_then(|rest| rest.strip_suffix(".json"))
        .expect("filename shape");

    assert_eq!(slug, "a".repeat(47));
}

#[test]
fn unusable_name_falls_back_to_topic_digest() {
    let name = archive_filename(Some("???"), "!!!", fixed_time());
    let slug = name
        .strip_prefix("20240309-140507_debate-")
        .and_then(|rest| rest.strip_suffix(".json"))
        .expect("digest fallback");

    assert_eq!(slug.len(), 8);
    assert!(slug.chars().all(|ch| ch.is_ascii_hexdigit()));
    assert_eq!(name, archive_filename(None, "!!!", fixed_time()));
}

#[test]
fn write_archive_stores_debate_with_timestamp() {
    let dir = temp_dir("write");
    let debate = DebateResponse {
        topic: "Tea or coffee".to_string(),
        ..DebateResponse::default()
    };

    let path = write_archive(&dir, &debate, None, fixed_time()).expect("archive written");
    assert_eq!(path, dir.join("20240309-140507_tea-or-coffee.json"));

    let stored: Value =
        serde_json::from_str(&fs::read_to_string(&path).expect("read archive")).expect("json");
    assert_eq!(stored["topic"], "Tea or coffee");
    assert_eq!(stored["saved_at_utc"], "2024-03-09T14:05:07Z");

    fs::remove_dir_all(&dir).expect("cleanup");
}
