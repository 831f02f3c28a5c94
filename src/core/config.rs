use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_yaml::{Mapping, Value};

use crate::core::errors::ChatError;

const ENV_PREFIX: &str = "DRAFTSCOUT_";

/// All externally supplied configuration, read once at startup.
///
/// Values come from `secrets.yaml` (path overridable via
/// `DRAFTSCOUT_SECRETS_PATH`) with `DRAFTSCOUT_*` environment variables
/// taking precedence. Required keys missing after the merge fail with
/// `ChatError::Configuration` before the server binds.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Base URL of the document-search service.
    pub search_endpoint: String,
    pub search_username: String,
    pub search_password: String,
    #[serde(default = "default_search_index")]
    pub search_index: String,

    /// Base URL of the hosted model service.
    pub model_endpoint: String,
    pub model_api_key: String,
    #[serde(default = "default_model_region")]
    pub model_region: String,
    #[serde(default = "default_model_id")]
    pub model_id: String,

    /// How many documents to request per query.
    #[serde(default = "default_retrieval_size")]
    pub retrieval_size: usize,
    /// Request timeout applied to both external backends.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_search_index() -> String {
    "seahawk5".to_string()
}

fn default_model_region() -> String {
    "us-east-1".to_string()
}

fn default_model_id() -> String {
    "amazon.titan-text-express-v1".to_string()
}

fn default_retrieval_size() -> usize {
    4
}

fn default_request_timeout_secs() -> u64 {
    30
}

/// Keys that may be overridden from the environment, e.g.
/// `DRAFTSCOUT_SEARCH_PASSWORD` overrides `search_password`.
const OVERRIDABLE_KEYS: [&str; 10] = [
    "search_endpoint",
    "search_username",
    "search_password",
    "search_index",
    "model_endpoint",
    "model_api_key",
    "model_region",
    "model_id",
    "retrieval_size",
    "request_timeout_secs",
];

impl Settings {
    pub fn load() -> Result<Self, ChatError> {
        Self::load_from(&secrets_path(), |key| env::var(key).ok())
    }

    pub fn load_from(
        path: &Path,
        env_lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ChatError> {
        let mut map = load_yaml_mapping(path);
        apply_env_overrides(&mut map, env_lookup);

        let settings: Settings = serde_yaml::from_value(Value::Mapping(map))
            .map_err(|e| ChatError::Configuration(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ChatError> {
        let required = [
            ("search_endpoint", &self.search_endpoint),
            ("search_username", &self.search_username),
            ("search_password", &self.search_password),
            ("search_index", &self.search_index),
            ("model_endpoint", &self.model_endpoint),
            ("model_api_key", &self.model_api_key),
            ("model_id", &self.model_id),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(ChatError::Configuration(format!("{} must not be empty", key)));
            }
        }
        if self.retrieval_size == 0 {
            return Err(ChatError::Configuration(
                "retrieval_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

pub fn secrets_path() -> PathBuf {
    if let Ok(path) = env::var("DRAFTSCOUT_SECRETS_PATH") {
        return PathBuf::from(path);
    }
    PathBuf::from("secrets.yaml")
}

pub fn log_dir() -> PathBuf {
    if let Ok(dir) = env::var("DRAFTSCOUT_LOG_DIR") {
        return PathBuf::from(dir);
    }
    PathBuf::from("logs")
}

fn load_yaml_mapping(path: &Path) -> Mapping {
    if !path.exists() {
        return Mapping::new();
    }

    match fs::read_to_string(path) {
        Ok(contents) => match serde_yaml::from_str::<Value>(&contents) {
            Ok(Value::Mapping(map)) => map,
            _ => Mapping::new(),
        },
        Err(_) => Mapping::new(),
    }
}

fn apply_env_overrides(map: &mut Mapping, env_lookup: impl Fn(&str) -> Option<String>) {
    for key in OVERRIDABLE_KEYS {
        let var = format!("{}{}", ENV_PREFIX, key.to_ascii_uppercase());
        if let Some(raw) = env_lookup(&var) {
            // Numeric keys must land as YAML numbers or serde rejects them.
            let value = match raw.parse::<u64>() {
                Ok(n) if key == "retrieval_size" || key == "request_timeout_secs" => {
                    Value::Number(n.into())
                }
                _ => Value::String(raw),
            };
            map.insert(Value::String(key.to_string()), value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_secrets(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write secrets");
        file
    }

    const COMPLETE: &str = "\
search_endpoint: https://search.example.com
search_username: elastic
search_password: hunter2
model_endpoint: https://models.example.com
model_api_key: key-123
";

    #[test]
    fn loads_complete_file_with_defaults() {
        let file = write_secrets(COMPLETE);
        let settings = Settings::load_from(file.path(), |_| None).expect("load");

        assert_eq!(settings.search_index, "seahawk5");
        assert_eq!(settings.model_id, "amazon.titan-text-express-v1");
        assert_eq!(settings.retrieval_size, 4);
        assert_eq!(settings.request_timeout_secs, 30);
    }

    #[test]
    fn missing_required_key_is_a_configuration_error() {
        let file = write_secrets("search_endpoint: https://search.example.com\n");
        let err = Settings::load_from(file.path(), |_| None).unwrap_err();
        assert!(matches!(err, ChatError::Configuration(_)));
    }

    #[test]
    fn env_overrides_take_precedence() {
        let file = write_secrets(COMPLETE);
        let settings = Settings::load_from(file.path(), |var| match var {
            "DRAFTSCOUT_SEARCH_PASSWORD" => Some("rotated".to_string()),
            "DRAFTSCOUT_RETRIEVAL_SIZE" => Some("8".to_string()),
            _ => None,
        })
        .expect("load");

        assert_eq!(settings.search_password, "rotated");
        assert_eq!(settings.retrieval_size, 8);
    }

    #[test]
    fn env_alone_is_enough_without_a_file() {
        let settings = Settings::load_from(Path::new("/nonexistent/secrets.yaml"), |var| {
            match var {
                "DRAFTSCOUT_SEARCH_ENDPOINT" => Some("https://search.example.com".to_string()),
                "DRAFTSCOUT_SEARCH_USERNAME" => Some("elastic".to_string()),
                "DRAFTSCOUT_SEARCH_PASSWORD" => Some("hunter2".to_string()),
                "DRAFTSCOUT_MODEL_ENDPOINT" => Some("https://models.example.com".to_string()),
                "DRAFTSCOUT_MODEL_API_KEY" => Some("key-123".to_string()),
                _ => None,
            }
        })
        .expect("load");

        assert_eq!(settings.search_username, "elastic");
    }

    #[test]
    fn blank_value_is_rejected() {
        let file = write_secrets(&COMPLETE.replace("key-123", "\"\""));
        let err = Settings::load_from(file.path(), |_| None).unwrap_err();
        assert!(matches!(err, ChatError::Configuration(_)));
    }

    #[test]
    fn zero_retrieval_size_is_rejected() {
        let file = write_secrets(&format!("{}retrieval_size: 0\n", COMPLETE));
        let err = Settings::load_from(file.path(), |_| None).unwrap_err();
        assert!(matches!(err, ChatError::Configuration(_)));
    }
}
