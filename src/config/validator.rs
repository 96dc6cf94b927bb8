// src/config/validator.rs
//! Validator configuration: TOML file, then environment overrides, then validation.
//!
//! ```toml
//! weights_path = "config/weights.json"   # optional, hot-reloaded
//!
//! [fetch]
//! timeout_secs = 10
//! user_agent = "Mozilla/5.0"
//!
//! [scoring]
//! sentiment_max_chars = 512
//! scale = "rescaled"                     # or "raw"
//!
//! [weights]
//! domain_trust = 0.3
//! relevance = 0.3
//! fact_check = 0.2
//! bias = 0.2
//!
//! [models]
//! mode = "offline"                       # or "remote"
//! endpoint = "https://api-inference.huggingface.co"
//! api_key = "ENV"                        # read HF_API_TOKEN
//! timeout_secs = 10
//!
//! [models.label_aliases]
//! LABEL_2 = "POSITIVE"
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::{env, fs};

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analyze::scoring::ScoreScale;
use crate::analyze::weights::ScoreWeights;

// --- env defaults & names ---
pub const DEFAULT_CONFIG_PATH: &str = "config/validator.toml";
pub const ENV_CONFIG_PATH: &str = "URL_VALIDATOR_CONFIG";

pub const ENV_FETCH_TIMEOUT_SECS: &str = "URL_VALIDATOR_FETCH_TIMEOUT_SECS";
pub const ENV_USER_AGENT: &str = "URL_VALIDATOR_USER_AGENT";
pub const ENV_SENTIMENT_MAX_CHARS: &str = "URL_VALIDATOR_SENTIMENT_MAX_CHARS";
pub const ENV_SCALE: &str = "URL_VALIDATOR_SCALE";
pub const ENV_WEIGHTS_PATH: &str = "URL_VALIDATOR_WEIGHTS_PATH";
pub const ENV_MODELS: &str = "URL_VALIDATOR_MODELS";
pub const ENV_INFERENCE_URL: &str = "URL_VALIDATOR_INFERENCE_URL";
pub const ENV_INFERENCE_TIMEOUT_SECS: &str = "URL_VALIDATOR_INFERENCE_TIMEOUT_SECS";
pub const ENV_HF_API_TOKEN: &str = "HF_API_TOKEN";

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";
pub const DEFAULT_INFERENCE_URL: &str = "https://api-inference.huggingface.co";
pub const DEFAULT_SIMILARITY_MODEL: &str = "sentence-transformers/all-mpnet-base-v2";
pub const DEFAULT_SENTIMENT_MODEL: &str = "cardiffnlp/twitter-roberta-base-sentiment";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    pub fetch: FetchConfig,
    pub scoring: ScoringConfig,
    pub weights: ScoreWeights,
    /// JSON weights file re-read whenever its mtime changes. Overrides `weights`.
    pub weights_path: Option<PathBuf>,
    pub models: ModelsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Whole-request timeout for the page GET.
    pub timeout_secs: u64,
    /// Sent as `User-Agent`; a browser-like value avoids trivial bot blocking.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Characters of page text handed to the sentiment classifier.
    pub sentiment_max_chars: usize,
    pub scale: ScoreScale,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            sentiment_max_chars: 512,
            scale: ScoreScale::default(),
        }
    }
}

/// Which inference capabilities back the relevance and bias evaluators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelMode {
    /// Lexical similarity + lexicon sentiment, no network.
    #[default]
    Offline,
    /// Hosted embedding and text-classification endpoints.
    Remote,
}

impl FromStr for ModelMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "offline" | "mock" => Ok(Self::Offline),
            "remote" | "real" => Ok(Self::Remote),
            other => Err(anyhow!("unknown model mode `{other}` (expected offline|remote)")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    pub mode: ModelMode,
    /// Base URL of the inference service.
    pub endpoint: String,
    /// Bearer token. "ENV" means: read from `HF_API_TOKEN`.
    pub api_key: String,
    pub similarity_model: String,
    pub sentiment_model: String,
    pub timeout_secs: u64,
    /// Maps provider-specific labels (e.g. `LABEL_2`) onto POSITIVE/NEUTRAL/NEGATIVE.
    pub label_aliases: HashMap<String, String>,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            mode: ModelMode::default(),
            endpoint: DEFAULT_INFERENCE_URL.to_string(),
            api_key: String::new(),
            similarity_model: DEFAULT_SIMILARITY_MODEL.to_string(),
            sentiment_model: DEFAULT_SENTIMENT_MODEL.to_string(),
            timeout_secs: 10,
            label_aliases: HashMap::new(),
        }
    }
}

impl ValidatorConfig {
    /// Load using `URL_VALIDATOR_CONFIG` or `config/validator.toml`.
    ///
    /// A missing default file yields defaults; a path named by the env var must exist.
    pub fn load() -> Result<Self> {
        if let Ok(p) = env::var(ENV_CONFIG_PATH) {
            let path = PathBuf::from(p);
            if !path.exists() {
                bail!(
                    "{ENV_CONFIG_PATH} points to non-existent path {}",
                    path.display()
                );
            }
            return Self::load_from_path(&path);
        }

        let default_path = Path::new(DEFAULT_CONFIG_PATH);
        if default_path.exists() {
            return Self::load_from_path(default_path);
        }

        debug!(target: "config", "no config file found, using defaults");
        Self::default().finish()
    }

    /// Load an explicit file, then apply env overrides and validate.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading validator config from {}", path.display()))?;
        let cfg = Self::from_toml_str(&content)
            .with_context(|| format!("parsing validator config {}", path.display()))?;
        cfg.finish()
    }

    /// Parse TOML only; no env overrides, no validation.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    fn finish(mut self) -> Result<Self> {
        self.apply_env_overrides()?;
        self.resolve_api_key()?;
        self.validate()?;
        Ok(self)
    }

    /// Environment wins over file values.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(v) = parse_env::<u64>(ENV_FETCH_TIMEOUT_SECS)? {
            self.fetch.timeout_secs = v;
        }
        if let Ok(v) = env::var(ENV_USER_AGENT) {
            if !v.trim().is_empty() {
                self.fetch.user_agent = v;
            }
        }
        if let Some(v) = parse_env::<usize>(ENV_SENTIMENT_MAX_CHARS)? {
            self.scoring.sentiment_max_chars = v;
        }
        if let Some(v) = parse_env::<ScoreScale>(ENV_SCALE)? {
            self.scoring.scale = v;
        }
        if let Ok(v) = env::var(ENV_WEIGHTS_PATH) {
            if !v.trim().is_empty() {
                self.weights_path = Some(PathBuf::from(v));
            }
        }
        if let Some(v) = parse_env::<ModelMode>(ENV_MODELS)? {
            self.models.mode = v;
        }
        if let Ok(v) = env::var(ENV_INFERENCE_URL) {
            if !v.trim().is_empty() {
                self.models.endpoint = v;
            }
        }
        if let Some(v) = parse_env::<u64>(ENV_INFERENCE_TIMEOUT_SECS)? {
            self.models.timeout_secs = v;
        }
        Ok(())
    }

    fn resolve_api_key(&mut self) -> Result<()> {
        if !self.models.api_key.trim().eq_ignore_ascii_case("env") {
            return Ok(());
        }
        self.models.api_key = match self.models.mode {
            ModelMode::Remote => env::var(ENV_HF_API_TOKEN)
                .map_err(|_| anyhow!("Missing {ENV_HF_API_TOKEN} env var"))?,
            // Offline models never authenticate.
            ModelMode::Offline => String::new(),
        };
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.fetch.timeout_secs == 0 {
            bail!("fetch.timeout_secs must be at least 1");
        }
        if self.fetch.user_agent.trim().is_empty() {
            bail!("fetch.user_agent must not be empty");
        }
        if self.scoring.sentiment_max_chars == 0 {
            bail!("scoring.sentiment_max_chars must be at least 1");
        }
        if self.models.timeout_secs == 0 {
            bail!("models.timeout_secs must be at least 1");
        }
        self.weights.validate()?;
        Ok(())
    }
}

fn parse_env<T>(name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| anyhow!("invalid {name}={raw}: {e}")),
        _ => Ok(None),
    }
}
