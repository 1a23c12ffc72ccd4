use std::{collections::HashMap, fs, path::PathBuf};

use tracing::warn;

const SETTINGS_FILE: &str = "arena.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_url: String,
    pub archive_dir: PathBuf,
    /// Use the streaming endpoint; `false` waits for the whole debate.
    pub stream: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8000".into(),
            archive_dir: PathBuf::from("debates"),
            stream: true,
        }
    }
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();
    if let Ok(raw) = fs::read_to_string(SETTINGS_FILE) {
        apply_file(&mut settings, &raw);
    }
    apply_env(&mut settings, |key| std::env::var(key).ok());
    settings
}

fn apply_file(settings: &mut Settings, raw: &str) {
    let file_cfg = match toml::from_str::<HashMap<String, toml::Value>>(raw) {
        Ok(file_cfg) => file_cfg,
        Err(err) => {
            warn!(file = SETTINGS_FILE, error = %err, "ignoring unreadable settings file");
            return;
        }
    };

    if let Some(v) = file_cfg.get("server_url").and_then(toml::Value::as_str) {
        settings.server_url = v.to_string();
    }
    if let Some(v) = file_cfg.get("archive_dir").and_then(toml::Value::as_str) {
        settings.archive_dir = PathBuf::from(v);
    }
    match file_cfg.get("stream") {
        Some(toml::Value::Boolean(v)) => settings.stream = *v,
        Some(toml::Value::String(v)) => {
            if let Some(parsed) = parse_flag(v) {
                settings.stream = parsed;
            }
        }
        _ => {}
    }
}

fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("ARENA_SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = lookup("APP__SERVER_URL") {
        settings.server_url = v;
    }

    if let Some(v) = lookup("APP__ARCHIVE_DIR") {
        settings.archive_dir = PathBuf::from(v);
    }

    if let Some(v) = lookup("APP__STREAM") {
        if let Some(parsed) = parse_flag(&v) {
            settings.stream = parsed;
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
