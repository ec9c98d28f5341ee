use std::path::PathBuf;

use secrecy::SecretString;
use serde::Deserialize;

/// Configuration loaded from ad_copy_guard.toml and environment variables
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub generator: GeneratorConfig,
    pub store: StoreConfig,
}

/// Connection settings for the chat-completions service
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub api_base: String,
    pub model: String,
    pub timeout_secs: u64,
    /// Only ever sourced from the environment.
    #[serde(skip)]
    pub api_key: Option<SecretString>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.openai.com/v1".to_string(),
            model: "gpt-4".to_string(),
            timeout_secs: 60,
            api_key: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("ad_copies.json"),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file and environment variables.
    /// Uses ADCOPY_CONFIG or defaults to "ad_copy_guard.toml".
    pub fn load() -> anyhow::Result<Self> {
        if let Ok(env_path) = std::env::var("ADCOPY_ENV_FILE") {
            let _ = dotenvy::from_path(env_path);
        } else {
            let _ = dotenvy::dotenv();
        }

        let config_path =
            std::env::var("ADCOPY_CONFIG").unwrap_or_else(|_| "ad_copy_guard.toml".to_string());

        let mut config = match std::fs::read_to_string(&config_path) {
            Ok(content) => Self::from_toml_str(&content)?,
            Err(_) => {
                tracing::warn!("Config file {} not found, using defaults", config_path);
                Self::default()
            }
        };

        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup; `load` passes the process environment.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("OPENAI_API_KEY").filter(|k| !k.trim().is_empty()) {
            self.generator.api_key = Some(SecretString::new(key.trim().into()));
            tracing::debug!("OPENAI_API_KEY present");
        }
        if let Some(base) = lookup("ADCOPY_API_BASE") {
            self.generator.api_base = base;
            tracing::debug!("ADCOPY_API_BASE env override applied");
        }
        if let Some(model) = lookup("ADCOPY_MODEL") {
            self.generator.model = model;
            tracing::debug!("ADCOPY_MODEL env override applied");
        }
        if let Some(secs) = lookup("ADCOPY_TIMEOUT_SECS") {
            self.generator.timeout_secs = secs
                .parse()
                .map_err(|e| anyhow::anyhow!("ADCOPY_TIMEOUT_SECS must be an integer: {}", e))?;
        }
        if let Some(path) = lookup("ADCOPY_STORE_PATH") {
            self.store.path = PathBuf::from(path);
        }
        self.validate()
    }

    fn validate(&self) -> anyhow::Result<()> {
        let base = &self.generator.api_base;
        if !base.starts_with("http://") && !base.starts_with("https://") {
            anyhow::bail!("generator.api_base must be an http(s) URL, got {}", base);
        }
        if self.generator.timeout_secs == 0 {
            anyhow::bail!("generator.timeout_secs must be greater than zero");
        }
        Ok(())
    }
}
