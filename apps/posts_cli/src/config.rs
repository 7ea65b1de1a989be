use std::{collections::HashMap, fs};

use client_core::DEFAULT_COLLECTION_ENDPOINT;

pub const SETTINGS_FILE: &str = "posts.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_endpoint: String,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_endpoint: DEFAULT_COLLECTION_ENDPOINT.into(),
            log_filter: "info".into(),
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
    let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(raw) else {
        return;
    };

    if let Some(v) = file_cfg.get("api_endpoint") {
        settings.api_endpoint = v.clone();
    }
    if let Some(v) = file_cfg.get("log_filter") {
        settings.log_filter = v.clone();
    }
}

fn apply_env(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) {
    if let Some(v) = var("POSTS_API_ENDPOINT") {
        settings.api_endpoint = v;
    }
    if let Some(v) = var("APP__API_ENDPOINT") {
        settings.api_endpoint = v;
    }

    if let Some(v) = var("APP__LOG_FILTER") {
        settings.log_filter = v;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_placeholder_collection() {
        assert_eq!(
            Settings::default().api_endpoint,
            "https://jsonplaceholder.typicode.com/posts"
        );
    }

    #[test]
    fn file_then_env_override() {
        let mut settings = Settings::default();
        apply_file(
            &mut settings,
            "api_endpoint = \"http://127.0.0.1:3000/posts\"\nlog_filter = \"debug\"\n",
        );
        assert_eq!(settings.api_endpoint, "http://127.0.0.1:3000/posts");
        assert_eq!(settings.log_filter, "debug");

        apply_env(&mut settings, |key| {
            (key == "APP__API_ENDPOINT").then(|| "http://10.0.0.1/posts".to_string())
        });
        assert_eq!(settings.api_endpoint, "http://10.0.0.1/posts");
        assert_eq!(settings.log_filter, "debug");
    }
}
