//! Local JSON export of a finished debate.

use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;
use sha2::{Digest, Sha256};
use shared::protocol::DebateResponse;
use thiserror::Error;
use tracing::info;

const MAX_SLUG_LEN: usize = 48;
const MAX_SUGGESTED_NAME_LEN: usize = 32;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("failed to write debate archive '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode debate archive: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Default name offered when saving remotely: the lower-cased topic with
/// underscore and whitespace runs collapsed to `-`.
pub fn suggested_save_name(topic: &str) -> String {
    let mut name = String::new();
    let mut in_gap = false;
    for ch in topic.to_lowercase().chars() {
        if ch == '_' || ch.is_whitespace() {
            if !in_gap {
                name.push('-');
            }
            in_gap = true;
        } else {
            name.push(ch);
            in_gap = false;
        }
    }
    name.chars().take(MAX_SUGGESTED_NAME_LEN).collect()
}

fn slugify(value: &str) -> String {
    let mapped: String = value
        .to_lowercase()
        .chars()
        .map(|ch| if ch.is_alphanumeric() { ch } else { '-' })
        .collect();
    mapped
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

fn bounded_slug(value: &str) -> String {
    let slug: String = slugify(value).chars().take(MAX_SLUG_LEN).collect();
    slug.trim_end_matches('-').to_string()
}

/// `YYYYmmdd-HHMMSS_<slug>.json`, slugged from the user's name when given,
/// else from the topic. A name with nothing usable falls back to a digest of
/// the topic.
pub fn archive_filename(user_filename: Option<&str>, topic: &str, now: DateTime<Utc>) -> String {
    let timestamp = now.format("%Y%m%d-%H%M%S");
    let source = user_filename
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(topic);
    let mut base = bounded_slug(source);
    if base.is_empty() {
        let digest = Sha256::digest(topic.as_bytes());
        let hex: String = digest.iter().take(4).map(|byte| format!("{byte:02x}")).collect();
        base = format!("debate-{hex}");
    }
    format!("{timestamp}_{base}.json")
}

pub fn write_archive(
    dir: &Path,
    debate: &DebateResponse,
    user_filename: Option<&str>,
    now: DateTime<Utc>,
) -> Result<PathBuf, ArchiveError> {
    let mut document = serde_json::to_value(debate)?;
    if let Value::Object(fields) = &mut document {
        fields.insert(
            "saved_at_utc".to_string(),
            Value::String(now.to_rfc3339_opts(SecondsFormat::Secs, true)),
        );
    }

    fs::create_dir_all(dir).map_err(|source| ArchiveError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let path = dir.join(archive_filename(user_filename, &debate.topic, now));
    let encoded = serde_json::to_string_pretty(&document)?;
    fs::write(&path, encoded).map_err(|source| ArchiveError::Io {
        path: path.clone(),
        source,
    })?;

    info!(path = %path.display(), turns = debate.transcript.len(), "debate archived");
    Ok(path)
}

#[cfg(test)]
#[path = "tests/archive_tests.rs"]
mod tests;
