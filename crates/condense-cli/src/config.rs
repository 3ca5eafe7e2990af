use crate::atomic;
use condense_core::summarize::{DEFAULT_MAX_TOKENS, DEFAULT_OLLAMA_MODEL, DEFAULT_TEMPERATURE};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

const CONFIG_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("home directory not found; set HOME")]
    HomeMissing,
    #[error("config io error: {0}")]
    Io(#[from] io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("config serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("config validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub base_dir: PathBuf,
    pub config_path: PathBuf,
}

impl ConfigPaths {
    pub fn from_home() -> Result<Self, ConfigError> {
        let home = std::env::var("HOME").map_err(|_| ConfigError::HomeMissing)?;
        Ok(Self::from_base(PathBuf::from(home).join(".condense")))
    }

    pub fn from_base(base_dir: PathBuf) -> Self {
        let config_path = base_dir.join("config.toml");
        Self {
            base_dir,
            config_path,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub version: u32,
    pub chunking: ChunkingConfig,
    pub summarize: SummarizeConfig,
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            chunking: ChunkingConfig::default(),
            summarize: SummarizeConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    pub size: i64,
    pub overlap: i64,
    pub auto_shrink: bool,
    pub workers: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            size: 500,
            overlap: 50,
            auto_shrink: true,
            workers: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizeConfig {
    pub active: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub local: ProviderConfig,
    pub cloud: ProviderConfig,
}

impl Default for SummarizeConfig {
    fn default() -> Self {
        Self {
            active: "local".to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            local: ProviderConfig {
                provider: "ollama".to_string(),
                model: DEFAULT_OLLAMA_MODEL.to_string(),
                api_key: String::new(),
            },
            cloud: ProviderConfig {
                provider: "openrouter".to_string(),
                model: "google/gemini-2.5-flash".to_string(),
                api_key: String::new(),
            },
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub provider: String,
    pub model: String,
    pub api_key: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Regex highlighted in printed summaries; empty disables highlighting.
    pub highlight: String,
}

impl Config {
    pub fn load_or_create(paths: &ConfigPaths) -> Result<Self, ConfigError> {
        ensure_dirs(paths)?;
        if paths.config_path.exists() {
            return Self::load(paths);
        }

        let config = Self::default();
        Self::write(paths, &config)?;
        Ok(config)
    }

    pub fn load(paths: &ConfigPaths) -> Result<Self, ConfigError> {
        ensure_dirs(paths)?;
        let content = fs::read_to_string(&paths.config_path)?;
        let raw: toml::Value = toml::from_str(&content)?;
        let file_version = raw
            .get("version")
            .and_then(|value| value.as_integer())
            .unwrap_or(0) as u32;

        let mut config: Config = toml::from_str(&content)?;
        let mut migrated = false;

        if file_version < CONFIG_VERSION {
            config.version = CONFIG_VERSION;
            migrated = true;
        } else if file_version > CONFIG_VERSION {
            tracing::warn!(
                file_version,
                supported = CONFIG_VERSION,
                "config version is newer than supported; proceeding"
            );
        }

        if atomic::readable_by_others(&paths.config_path)? {
            tracing::warn!(
                path = %paths.config_path.display(),
                "config file is readable by other users; chmod 600 it"
            );
        }

        if migrated {
            Self::write(paths, &config)?;
        }

        Ok(config)
    }

    pub fn write(paths: &ConfigPaths, config: &Config) -> Result<(), ConfigError> {
        ensure_dirs(paths)?;
        let content = toml::to_string_pretty(config)?;
        atomic::write_atomic(&paths.config_path, content.as_bytes(), true)?;
        Ok(())
    }

    pub fn redacted(&self) -> Self {
        let mut redacted = self.clone();
        redact_provider(&mut redacted.summarize.local);
        redact_provider(&mut redacted.summarize.cloud);
        redacted
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let chunking = &self.chunking;
        if chunking.size <= 0 {
            return Err(ConfigError::Validation(
                "chunking.size must be greater than 0".into(),
            ));
        }
        if chunking.overlap < 0 || chunking.overlap >= chunking.size {
            return Err(ConfigError::Validation(
                "chunking.overlap must be at least 0 and below chunking.size".into(),
            ));
        }
        if chunking.workers == 0 {
            return Err(ConfigError::Validation(
                "chunking.workers must be greater than 0".into(),
            ));
        }

        validate_active("summarize.active", self.summarize.active.as_str())?;
        validate_summarize_profile(
            "summarize.local",
            &self.summarize.local,
            self.summarize.active == "local",
        )?;
        validate_summarize_profile(
            "summarize.cloud",
            &self.summarize.cloud,
            self.summarize.active == "cloud",
        )?;
        if !(0.0..=2.0).contains(&self.summarize.temperature) {
            return Err(ConfigError::Validation(
                "summarize.temperature must be between 0 and 2".into(),
            ));
        }
        if self.summarize.max_tokens == 0 {
            return Err(ConfigError::Validation(
                "summarize.max_tokens must be greater than 0".into(),
            ));
        }

        condense_core::highlight::highlight("", &self.output.highlight)
            .map_err(|e| ConfigError::Validation(format!("output.highlight: {e}")))?;

        Ok(())
    }
}

fn ensure_dirs(paths: &ConfigPaths) -> Result<(), ConfigError> {
    fs::create_dir_all(&paths.base_dir)?;
    Ok(())
}

fn validate_active(field: &str, value: &str) -> Result<(), ConfigError> {
    match value {
        "local" | "cloud" => Ok(()),
        other => Err(ConfigError::Validation(format!(
            "{field} must be local or cloud (got {other})"
        ))),
    }
}

fn validate_summarize_profile(
    label: &str,
    profile: &ProviderConfig,
    is_active: bool,
) -> Result<(), ConfigError> {
    match profile.provider.as_str() {
        "ollama" | "openrouter" => {}
        other => {
            return Err(ConfigError::Validation(format!(
                "{label}.provider must be ollama or openrouter (got {other})"
            )));
        }
    }

    if profile.model.trim().is_empty() {
        return Err(ConfigError::Validation(format!(
            "{label}.model must not be empty"
        )));
    }
    if is_active && profile.provider == "openrouter" && profile.api_key.trim().is_empty() {
        return Err(ConfigError::Validation(format!(
            "{label}.api_key required when {label}.provider=openrouter"
        )));
    }
    Ok(())
}

fn redact_provider(profile: &mut ProviderConfig) {
    if !profile.api_key.trim().is_empty() {
        profile.api_key = "<redacted>".to_string();
    }
}
