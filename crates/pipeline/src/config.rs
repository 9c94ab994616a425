use crate::error::{PipelineError, Result};
use promptline_language::LanguageConfig;
use promptline_normalizer::NormalizerConfig;
use promptline_prompt_cache::CacheConfig;
use promptline_retrieval::RetrievalConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming the TOML config file
pub const CONFIG_ENV: &str = "PROMPTLINE_CONFIG";

/// Intent resource location
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntentConfig {
    /// Overrides `$PROMPTLINE_INTENT_RULES` and the builtin rules
    pub rules_path: Option<PathBuf>,
}

/// Prompt assembly and generation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    /// First paragraph of every system prompt
    pub system_preamble: String,

    /// Canned answer for greetings
    pub greeting_reply: String,

    /// Consume the generator as a chunk stream
    pub stream: bool,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            system_preamble: "You are a helpful assistant. Answer accurately and concisely, \
                              using the provided knowledge when it is relevant."
                .to_string(),
            greeting_reply: "Hello! How can I help you today?".to_string(),
            stream: false,
        }
    }
}

/// Full pipeline configuration; every section is optional in TOML.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub normalizer: NormalizerConfig,
    pub language: LanguageConfig,
    pub intent: IntentConfig,
    pub cache: CacheConfig,
    pub retrieval: RetrievalConfig,
    pub prompt: PromptConfig,
}

impl PipelineConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| PipelineError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// Load `explicit`, else `$PROMPTLINE_CONFIG`, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));
        match path {
            Some(path) => {
                log::info!("Loading pipeline config from {}", path.display());
                Self::from_path(&path)
            }
            None => Ok(Self::default()),
        }
    }

    /// Validate every section
    pub fn validate(&self) -> Result<()> {
        let checks = [
            ("normalizer", self.normalizer.validate()),
            ("language", self.language.validate()),
            ("cache", self.cache.validate()),
            ("retrieval", self.retrieval.validate()),
        ];
        for (section, check) in checks {
            check.map_err(|msg| PipelineError::InvalidConfig(format!("[{section}] {msg}")))?;
        }
        if self.prompt.greeting_reply.trim().is_empty() {
            return Err(PipelineError::InvalidConfig(
                "[prompt] greeting_reply must not be blank".to_string(),
            ));
        }
        Ok(())
    }
}
