use serde::{Deserialize, Serialize};

/// Default cap on the detection sample, in chars
pub const DEFAULT_SAMPLE_CHARS: usize = 4000;

/// Literal rewrite applied before transliteration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Substitution {
    pub from: String,
    pub to: String,
}

impl Substitution {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Configuration for language detection and index text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageConfig {
    /// Maximum number of chars fed to the detector
    pub sample_chars: usize,

    /// Verdicts below this confidence degrade to undetermined
    pub min_confidence: f64,

    /// Ordered domain term translations (applied first to last)
    pub substitutions: Vec<Substitution>,
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self {
            sample_chars: DEFAULT_SAMPLE_CHARS,
            min_confidence: 0.0,
            substitutions: default_substitutions(),
        }
    }
}

fn default_substitutions() -> Vec<Substitution> {
    [
        ("微信支付", "wechat pay"),
        ("微信", "wechat"),
        ("支付宝", "alipay"),
        ("淘宝", "taobao"),
        ("阿里巴巴", "alibaba"),
        ("腾讯", "tencent"),
        ("百度", "baidu"),
        ("抖音", "douyin"),
        ("人工智能", "artificial intelligence"),
        ("机器学习", "machine learning"),
        ("数据库", "database"),
        ("服务器", "server"),
    ]
    .into_iter()
    .map(|(from, to)| Substitution::new(from, to))
    .collect()
}

impl LanguageConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.sample_chars == 0 {
            return Err("sample_chars must be greater than 0".to_string());
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(format!(
                "min_confidence must be within 0.0..=1.0, got {}",
                self.min_confidence
            ));
        }
        if let Some(idx) = self.substitutions.iter().position(|s| s.from.is_empty()) {
            return Err(format!("substitution #{idx} has an empty `from`"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = LanguageConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.sample_chars, DEFAULT_SAMPLE_CHARS);
    }

    #[test]
    fn longer_terms_come_first() {
        let config = LanguageConfig::default();
        let pay = config.substitutions.iter().position(|s| s.from == "微信支付");
        let chat = config.substitutions.iter().position(|s| s.from == "微信");
        assert!(pay < chat);
    }

    #[test]
    fn rejects_bad_values() {
        let config = LanguageConfig {
            min_confidence: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = LanguageConfig {
            substitutions: vec![Substitution::new("", "x")],
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = LanguageConfig {
            sample_chars: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
