use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "snapactivate.toml";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub llm: LlmConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct LlmConfig {
    pub provider: LlmProvider,
    pub api_key: Option<SecretString>,
    pub base_url: Option<String>,
    pub model: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub max_tool_rounds: u32,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub graceful_shutdown_secs: u64,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LlmProvider {
    Gemini,
    Ollama,
}

impl LlmProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::Ollama => "ollama",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub database_url: Option<String>,
    pub log_level: Option<String>,
    pub llm_provider: Option<LlmProvider>,
    pub llm_model: Option<String>,
    pub llm_api_key: Option<String>,
    pub llm_base_url: Option<String>,
    pub server_port: Option<u16>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "sqlite://snapactivate.db".to_string(),
                max_connections: 5,
                timeout_secs: 30,
            },
            llm: LlmConfig {
                provider: LlmProvider::Gemini,
                api_key: None,
                base_url: None,
                model: "gemini-2.0-flash".to_string(),
                timeout_secs: 30,
                max_retries: 2,
                max_tool_rounds: 8,
            },
            server: ServerConfig {
                bind_address: "127.0.0.1".to_string(),
                port: 8080,
                graceful_shutdown_secs: 15,
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

fn secret_value(value: String) -> SecretString {
    value.into()
}

impl std::str::FromStr for LlmProvider {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "gemini" | "googleai" => Ok(Self::Gemini),
            "ollama" => Ok(Self::Ollama),
            other => Err(ConfigError::Validation(format!(
                "unsupported llm provider `{other}` (expected gemini|ollama)"
            ))),
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected =
                options.config_path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(database) = patch.database {
            if let Some(url) = database.url {
                self.database.url = url;
            }
            if let Some(max_connections) = database.max_connections {
                self.database.max_connections = max_connections;
            }
            if let Some(timeout_secs) = database.timeout_secs {
                self.database.timeout_secs = timeout_secs;
            }
        }

        if let Some(llm) = patch.llm {
            if let Some(provider) = llm.provider {
                self.llm.provider = provider;
            }
            if let Some(llm_api_key_value) = llm.api_key {
                self.llm.api_key = Some(secret_value(llm_api_key_value));
            }
            if let Some(base_url) = llm.base_url {
                self.llm.base_url = Some(base_url);
            }
            if let Some(model) = llm.model {
                self.llm.model = model;
            }
            if let Some(timeout_secs) = llm.timeout_secs {
                self.llm.timeout_secs = timeout_secs;
            }
            if let Some(max_retries) = llm.max_retries {
                self.llm.max_retries = max_retries;
            }
            if let Some(max_tool_rounds) = llm.max_tool_rounds {
                self.llm.max_tool_rounds = max_tool_rounds;
            }
        }

        if let Some(server) = patch.server {
            if let Some(bind_address) = server.bind_address {
                self.server.bind_address = bind_address;
            }
            if let Some(port) = server.port {
                self.server.port = port;
            }
            if let Some(graceful_shutdown_secs) = server.graceful_shutdown_secs {
                self.server.graceful_shutdown_secs = graceful_shutdown_secs;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("SNAPACTIVATE_DATABASE_URL") {
            self.database.url = value;
        }
        if let Some(value) = read_env("SNAPACTIVATE_DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections =
                parse_u32("SNAPACTIVATE_DATABASE_MAX_CONNECTIONS", &value)?;
        }
        if let Some(value) = read_env("SNAPACTIVATE_DATABASE_TIMEOUT_SECS") {
            self.database.timeout_secs = parse_u64("SNAPACTIVATE_DATABASE_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("SNAPACTIVATE_LLM_PROVIDER") {
            self.llm.provider = value.parse()?;
        }
        let api_key =
            read_env("SNAPACTIVATE_LLM_API_KEY").or_else(|| read_env("GEMINI_API_KEY"));
        if let Some(value) = api_key {
            self.llm.api_key = Some(secret_value(value));
        }
        if let Some(value) = read_env("SNAPACTIVATE_LLM_BASE_URL") {
            self.llm.base_url = Some(value);
        }
        if let Some(value) = read_env("SNAPACTIVATE_LLM_MODEL") {
            self.llm.model = value;
        }
        if let Some(value) = read_env("SNAPACTIVATE_LLM_TIMEOUT_SECS") {
            self.llm.timeout_secs = parse_u64("SNAPACTIVATE_LLM_TIMEOUT_SECS", &value)?;
        }
        if let Some(value) = read_env("SNAPACTIVATE_LLM_MAX_RETRIES") {
            self.llm.max_retries = parse_u32("SNAPACTIVATE_LLM_MAX_RETRIES", &value)?;
        }
        if let Some(value) = read_env("SNAPACTIVATE_LLM_MAX_TOOL_ROUNDS") {
            self.llm.max_tool_rounds = parse_u32("SNAPACTIVATE_LLM_MAX_TOOL_ROUNDS", &value)?;
        }

        if let Some(value) = read_env("SNAPACTIVATE_SERVER_BIND_ADDRESS") {
            self.server.bind_address = value;
        }
        if let Some(value) = read_env("SNAPACTIVATE_SERVER_PORT") {
            self.server.port = parse_u16("SNAPACTIVATE_SERVER_PORT", &value)?;
        }
        if let Some(value) = read_env("SNAPACTIVATE_SERVER_GRACEFUL_SHUTDOWN_SECS") {
            self.server.graceful_shutdown_secs =
                parse_u64("SNAPACTIVATE_SERVER_GRACEFUL_SHUTDOWN_SECS", &value)?;
        }

        let log_level =
            read_env("SNAPACTIVATE_LOGGING_LEVEL").or_else(|| read_env("SNAPACTIVATE_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format = read_env("SNAPACTIVATE_LOGGING_FORMAT")
            .or_else(|| read_env("SNAPACTIVATE_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(database_url) = overrides.database_url {
            self.database.url = database_url;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(llm_provider) = overrides.llm_provider {
            self.llm.provider = llm_provider;
        }
        if let Some(llm_model) = overrides.llm_model {
            self.llm.model = llm_model;
        }
        if let Some(llm_api_key) = overrides.llm_api_key {
            self.llm.api_key = Some(secret_value(llm_api_key));
        }
        if let Some(llm_base_url) = overrides.llm_base_url {
            self.llm.base_url = Some(llm_base_url);
        }
        if let Some(port) = overrides.server_port {
            self.server.port = port;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_database(&self.database)?;
        validate_llm(&self.llm)?;
        validate_server(&self.server)?;
        validate_logging(&self.logging)?;
        Ok(())
    }

    /// Base URL for the configured provider, falling back to its public default.
    pub fn llm_base_url(&self) -> String {
        let fallback = match self.llm.provider {
            LlmProvider::Gemini => "https://generativelanguage.googleapis.com/v1beta",
            LlmProvider::Ollama => "http://localhost:11434",
        };
        self.llm
            .base_url
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(fallback)
            .trim_end_matches('/')
            .to_string()
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from("config").join(DEFAULT_CONFIG_FILE)]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_database(database: &DatabaseConfig) -> Result<(), ConfigError> {
    let url = database.url.trim();
    let sqlite_url =
        url.starts_with("sqlite://") || url.starts_with("sqlite::") || url == ":memory:";
    if !sqlite_url {
        return Err(ConfigError::Validation(
            "database.url must be a sqlite URL (`sqlite://...`, `sqlite::...`, or `:memory:`)"
                .to_string(),
        ));
    }

    if database.max_connections == 0 {
        return Err(ConfigError::Validation(
            "database.max_connections must be greater than zero".to_string(),
        ));
    }

    if database.timeout_secs == 0 || database.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "database.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    Ok(())
}

fn validate_llm(llm: &LlmConfig) -> Result<(), ConfigError> {
    if llm.timeout_secs == 0 || llm.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "llm.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    if llm.max_tool_rounds == 0 || llm.max_tool_rounds > 32 {
        return Err(ConfigError::Validation(
            "llm.max_tool_rounds must be in range 1..=32".to_string(),
        ));
    }

    if llm.model.trim().is_empty() {
        return Err(ConfigError::Validation("llm.model must not be empty".to_string()));
    }

    match llm.provider {
        LlmProvider::Gemini => {
            let missing = llm
                .api_key
                .as_ref()
                .map(|value| value.expose_secret().trim().is_empty())
                .unwrap_or(true);
            if missing {
                return Err(ConfigError::Validation(
                    "llm.api_key is required for the gemini provider. Create one at https://aistudio.google.com/apikey and set SNAPACTIVATE_LLM_API_KEY".to_string(),
                ));
            }
        }
        LlmProvider::Ollama => {
            let missing =
                llm.base_url.as_ref().map(|value| value.trim().is_empty()).unwrap_or(true);
            if missing {
                return Err(ConfigError::Validation(
                    "llm.base_url is required for the ollama provider".to_string(),
                ));
            }
        }
    }

    if let Some(base_url) = &llm.base_url {
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::Validation(
                "llm.base_url must start with http:// or https://".to_string(),
            ));
        }
    }

    Ok(())
}

fn validate_server(server: &ServerConfig) -> Result<(), ConfigError> {
    if server.port == 0 {
        return Err(ConfigError::Validation("server.port must be greater than zero".to_string()));
    }

    if server.graceful_shutdown_secs == 0 {
        return Err(ConfigError::Validation(
            "server.graceful_shutdown_secs must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u16(key: &str, value: &str) -> Result<u16, ConfigError> {
    value.parse::<u16>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.parse::<u32>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    database: Option<DatabasePatch>,
    llm: Option<LlmPatch>,
    server: Option<ServerPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct DatabasePatch {
    url: Option<String>,
    max_connections: Option<u32>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct LlmPatch {
    provider: Option<LlmProvider>,
    api_key: Option<String>,
    base_url: Option<String>,
    model: Option<String>,
    timeout_secs: Option<u64>,
    max_retries: Option<u32>,
    max_tool_rounds: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerPatch {
    bind_address: Option<String>,
    port: Option<u16>,
    graceful_shutdown_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;
    use std::io;
    use std::sync::{Mutex, OnceLock};

    use secrecy::ExposeSecret;
    use tempfile::TempDir;

    use super::{AppConfig, ConfigError, ConfigOverrides, LlmProvider, LoadOptions, LogFormat};

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    const ALL_VARS: [&str; 8] = [
        "SNAPACTIVATE_LLM_API_KEY",
        "SNAPACTIVATE_LLM_PROVIDER",
        "SNAPACTIVATE_LLM_BASE_URL",
        "SNAPACTIVATE_DATABASE_URL",
        "SNAPACTIVATE_LOG_LEVEL",
        "SNAPACTIVATE_LOG_FORMAT",
        "SNAPACTIVATE_LLM_MAX_TOOL_ROUNDS",
        "GEMINI_API_KEY",
    ];

    fn env_lock() -> &'static Mutex<()> {
        ENV_LOCK.get_or_init(|| Mutex::new(()))
    }

    fn clear_vars(vars: &[&str]) {
        for var in vars {
            env::remove_var(var);
        }
    }

    fn ensure(condition: bool, message: &'static str) -> Result<(), String> {
        if condition {
            Ok(())
        } else {
            Err(message.to_string())
        }
    }

    #[test]
    fn file_load_supports_env_interpolation() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(&ALL_VARS);
        env::set_var("TEST_GEMINI_KEY", "gm-from-env");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("snapactivate.toml");
            fs::write(
                &path,
                r#"
[llm]
provider = "gemini"
api_key = "${TEST_GEMINI_KEY}"
max_tool_rounds = 4
"#,
            )
            .map_err(|err| err.to_string())?;

            let config =
                AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() })
                    .map_err(|err| format!("config load failed: {err}"))?;

            let api_key = config.llm.api_key.as_ref().map(|key| key.expose_secret().to_string());
            ensure(
                api_key.as_deref() == Some("gm-from-env"),
                "api key should be interpolated from environment",
            )?;
            ensure(config.llm.max_tool_rounds == 4, "tool round limit should come from file")?;
            Ok(())
        })();

        clear_vars(&["TEST_GEMINI_KEY"]);
        result
    }

    #[test]
    fn logging_env_aliases_are_supported() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(&ALL_VARS);

        env::set_var("SNAPACTIVATE_LLM_API_KEY", "gm-test");
        env::set_var("SNAPACTIVATE_LOG_LEVEL", "warn");
        env::set_var("SNAPACTIVATE_LOG_FORMAT", "pretty");

        let result = (|| -> Result<(), String> {
            let config = AppConfig::load(LoadOptions::default())
                .map_err(|err| format!("config load failed: {err}"))?;

            ensure(config.logging.level == "warn", "warning log level should be set from env var")?;
            ensure(
                matches!(config.logging.format, LogFormat::Pretty),
                "pretty logging format should be set from env var",
            )?;
            Ok(())
        })();

        clear_vars(&ALL_VARS);
        result
    }

    #[test]
    fn precedence_defaults_file_env_overrides() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(&ALL_VARS);

        env::set_var("SNAPACTIVATE_DATABASE_URL", "sqlite://from-env.db");
        env::set_var("SNAPACTIVATE_LLM_API_KEY", "gm-from-env");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("snapactivate.toml");
            fs::write(
                &path,
                r#"
[database]
url = "sqlite://from-file.db"

[llm]
api_key = "gm-from-file"
model = "gemini-1.5-pro"

[server]
port = 9090

[logging]
level = "warn"
"#,
            )
            .map_err(|err| err.to_string())?;

            let config = AppConfig::load(LoadOptions {
                config_path: Some(path),
                overrides: ConfigOverrides {
                    database_url: Some("sqlite://from-override.db".to_string()),
                    log_level: Some("debug".to_string()),
                    ..ConfigOverrides::default()
                },
                ..LoadOptions::default()
            })
            .map_err(|err| format!("config load failed: {err}"))?;

            ensure(
                config.database.url == "sqlite://from-override.db",
                "override database url should win",
            )?;
            ensure(config.logging.level == "debug", "overridden log level should be debug")?;
            ensure(config.llm.model == "gemini-1.5-pro", "file model should beat defaults")?;
            ensure(config.server.port == 9090, "file port should beat defaults")?;
            let api_key = config.llm.api_key.as_ref().map(|key| key.expose_secret().to_string());
            ensure(
                api_key.as_deref() == Some("gm-from-env"),
                "env api key should win over file and defaults",
            )?;
            Ok(())
        })();

        clear_vars(&ALL_VARS);
        result
    }

    #[test]
    fn validation_fails_fast_with_actionable_error() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(&ALL_VARS);

        let result = (|| -> Result<(), String> {
            let error = match AppConfig::load(LoadOptions::default()) {
                Ok(_) => {
                    return Err("expected validation failure but config load succeeded".to_string())
                }
                Err(error) => error,
            };
            let has_message = matches!(
                error,
                ConfigError::Validation(ref message) if message.contains("llm.api_key")
            );
            ensure(has_message, "validation failure should mention llm.api_key")
        })();

        clear_vars(&ALL_VARS);
        result
    }

    #[test]
    fn ollama_provider_requires_base_url_instead_of_key() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(&ALL_VARS);

        env::set_var("SNAPACTIVATE_LLM_PROVIDER", "ollama");
        env::set_var("SNAPACTIVATE_LLM_BASE_URL", "http://localhost:11434/");

        let result = (|| -> Result<(), String> {
            let config = AppConfig::load(LoadOptions::default())
                .map_err(|err| format!("config load failed: {err}"))?;
            ensure(config.llm.provider == LlmProvider::Ollama, "provider should be ollama")?;
            ensure(
                config.llm_base_url() == "http://localhost:11434",
                "trailing slash should be trimmed from base url",
            )?;
            Ok(())
        })();

        clear_vars(&ALL_VARS);
        result
    }

    #[test]
    fn invalid_numeric_env_override_is_rejected() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(&ALL_VARS);

        env::set_var("SNAPACTIVATE_LLM_API_KEY", "gm-test");
        env::set_var("SNAPACTIVATE_LLM_MAX_TOOL_ROUNDS", "many");

        let result = (|| -> Result<(), String> {
            let rejected = matches!(
                AppConfig::load(LoadOptions::default()),
                Err(ConfigError::InvalidEnvOverride { ref key, .. })
                    if key == "SNAPACTIVATE_LLM_MAX_TOOL_ROUNDS"
            );
            ensure(rejected, "non-numeric tool round override should be rejected")
        })();

        clear_vars(&ALL_VARS);
        result
    }

    #[test]
    fn secret_values_are_not_leaked_by_debug() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(&ALL_VARS);

        env::set_var("SNAPACTIVATE_LLM_API_KEY", "gm-secret-value");

        let result = (|| -> Result<(), String> {
            let config = AppConfig::load(LoadOptions::default())
                .map_err(|err| format!("config load failed: {err}"))?;
            let debug = format!("{config:?}");

            ensure(!debug.contains("gm-secret-value"), "debug output should not contain api key")?;
            ensure(
                matches!(config.logging.format, LogFormat::Compact),
                "default logging format should be compact",
            )?;
            ensure(config.llm.max_tool_rounds == 8, "default tool round limit should be 8")?;
            Ok(())
        })();

        clear_vars(&ALL_VARS);
        result
    }
}
