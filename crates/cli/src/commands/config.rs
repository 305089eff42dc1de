use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use snapactivate_core::config::{AppConfig, DEFAULT_CONFIG_FILE};
use toml::Value;

use crate::commands::{load_config, CommandResult};

pub fn run() -> CommandResult {
    let config = match load_config("config") {
        Ok(config) => config,
        Err(failure) => return failure,
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for (key_path, value) in effective_values(&config) {
        let source = field_source(
            key_path,
            &env_key(key_path),
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        );
        lines.push(render_line(key_path, &value, source));
    }

    CommandResult { exit_code: 0, output: lines.join("\n") }
}

/// Every reported key with its rendered value; secrets are never printed.
fn effective_values(config: &AppConfig) -> Vec<(&'static str, String)> {
    vec![
        ("database.url", config.database.url.clone()),
        ("database.max_connections", config.database.max_connections.to_string()),
        ("database.timeout_secs", config.database.timeout_secs.to_string()),
        ("llm.provider", config.llm.provider.as_str().to_string()),
        ("llm.model", config.llm.model.clone()),
        ("llm.base_url", config.llm_base_url()),
        (
            "llm.api_key",
            if config.llm.api_key.is_some() { "<redacted>" } else { "<unset>" }.to_string(),
        ),
        ("llm.timeout_secs", config.llm.timeout_secs.to_string()),
        ("llm.max_retries", config.llm.max_retries.to_string()),
        ("llm.max_tool_rounds", config.llm.max_tool_rounds.to_string()),
        ("server.bind_address", config.server.bind_address.clone()),
        ("server.port", config.server.port.to_string()),
        ("server.graceful_shutdown_secs", config.server.graceful_shutdown_secs.to_string()),
        ("logging.level", config.logging.level.clone()),
        ("logging.format", format!("{:?}", config.logging.format).to_lowercase()),
    ]
}

fn env_key(key_path: &str) -> String {
    format!("SNAPACTIVATE_{}", key_path.replace('.', "_").to_ascii_uppercase())
}

fn detect_config_path() -> Option<PathBuf> {
    [PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from("config").join(DEFAULT_CONFIG_FILE)]
        .into_iter()
        .find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_key: &str,
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if env::var_os(env_key).is_some() {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

#[cfg(test)]
mod tests {
    use snapactivate_core::config::AppConfig;

    use super::{contains_path, effective_values, env_key};

    #[test]
    fn env_keys_follow_the_snapactivate_prefix() {
        assert_eq!(env_key("llm.max_tool_rounds"), "SNAPACTIVATE_LLM_MAX_TOOL_ROUNDS");
        assert_eq!(env_key("database.url"), "SNAPACTIVATE_DATABASE_URL");
    }

    #[test]
    fn api_key_is_never_rendered() {
        let mut config = AppConfig::default();
        config.llm.api_key = Some("gm-very-secret".to_string().into());

        let values = effective_values(&config);
        let api_key = values.iter().find(|(key, _)| *key == "llm.api_key").map(|(_, value)| value);
        assert_eq!(api_key.map(String::as_str), Some("<redacted>"));
        assert!(values.iter().all(|(_, value)| !value.contains("very-secret")));
    }

    #[test]
    fn nested_keys_are_found_in_config_documents() {
        let doc = "[llm]\nmodel = \"gemini-2.0-flash\"\n".parse::<toml::Value>().expect("toml");
        assert!(contains_path(&doc, "llm.model"));
        assert!(!contains_path(&doc, "llm.api_key"));
    }
}
