use crate::config::LanguageConfig;
use crate::index_text::build_index_text;
use crate::iso::{resolve_iso, script_for_iso, script_from_han_presence};
use promptline_normalizer::strip_code;
use promptline_protocol::{LanguageCandidate, LanguageDescriptor, ProcessingContext, Script};
use serde::Serialize;
use whatlang::{Detector, Lang};

/// Index language used when the source is not written in Latin script
pub const DEFAULT_INDEX_LANGUAGE: &str = "en";

/// Number of ranked alternatives kept for audit
pub const MAX_ALTERNATIVES: usize = 3;

/// Outcome of indexing one text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LanguageReport {
    pub language: LanguageDescriptor,
    pub alternatives: Vec<LanguageCandidate>,
    pub index_language: String,
    pub index_text: String,
}

impl LanguageReport {
    fn empty() -> Self {
        Self {
            language: LanguageDescriptor::default(),
            alternatives: Vec::new(),
            index_language: DEFAULT_INDEX_LANGUAGE.to_string(),
            index_text: String::new(),
        }
    }

    /// Copy the report into the context and tag it with language and script.
    pub fn apply(self, ctx: &mut ProcessingContext) {
        ctx.add_tag(format!("lang:{}", self.language.iso_code));
        ctx.add_tag(format!("script:{}", self.language.script));
        ctx.language = self.language;
        ctx.language_alternatives = self.alternatives;
        ctx.index_language = self.index_language;
        ctx.index_text = self.index_text;
    }
}

/// Detects the language of prose and builds the cross-lingual index text.
#[derive(Debug, Clone, Default)]
pub struct LanguageIndexer {
    config: LanguageConfig,
}

impl LanguageIndexer {
    #[must_use]
    pub fn new(config: LanguageConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &LanguageConfig {
        &self.config
    }

    /// Index `text`. Code fences are removed first; never fails.
    #[must_use]
    pub fn index(&self, text: &str) -> LanguageReport {
        let prose = strip_code(text);
        let sample: String = prose.trim().chars().take(self.config.sample_chars).collect();
        if sample.trim().is_empty() {
            return LanguageReport::empty();
        }

        // The whole prose is indexed; only detection works on the sample.
        let index_text = build_index_text(&prose, &self.config.substitutions);
        let alternatives = self.rank_alternatives(&sample);

        let language = match alternatives.first() {
            Some(top) if top.confidence >= self.config.min_confidence => {
                let script = script_for_iso(&top.iso_code)
                    .unwrap_or_else(|| script_from_han_presence(&sample));
                LanguageDescriptor::new(&top.iso_code, &top.display_name, top.confidence, script)
            }
            Some(top) => {
                log::debug!(
                    "Language verdict {} below min confidence ({:.2} < {:.2})",
                    top.iso_code,
                    top.confidence,
                    self.config.min_confidence
                );
                LanguageDescriptor::undetermined(script_from_han_presence(&sample))
            }
            None => LanguageDescriptor::undetermined(script_from_han_presence(&sample)),
        };

        let index_language = if language.script == Script::Latin {
            language.iso_code.clone()
        } else {
            DEFAULT_INDEX_LANGUAGE.to_string()
        };

        log::debug!(
            "Detected {} ({}, {:.2}); index text {} chars",
            language.iso_code,
            language.script,
            language.confidence,
            index_text.len()
        );

        LanguageReport {
            language,
            alternatives,
            index_language,
            index_text,
        }
    }

    /// Index the context's normalized text (raw input when blank) in place.
    pub fn index_context(&self, ctx: &mut ProcessingContext) {
        let source = if ctx.normalized_text.trim().is_empty() {
            ctx.raw_input.as_str()
        } else {
            ctx.normalized_text.as_str()
        };
        let report = self.index(source);
        report.apply(ctx);
    }

    /// Top verdicts in rank order: each pass deny-lists the previous winners.
    fn rank_alternatives(&self, sample: &str) -> Vec<LanguageCandidate> {
        let mut denied: Vec<Lang> = Vec::new();
        let mut ranked = Vec::with_capacity(MAX_ALTERNATIVES);

        while ranked.len() < MAX_ALTERNATIVES {
            let detector = if denied.is_empty() {
                Detector::new()
            } else {
                Detector::with_denylist(denied.clone())
            };
            let Some(info) = detector.detect(sample) else {
                break;
            };
            let lang = info.lang();
            ranked.push(LanguageCandidate {
                iso_code: resolve_iso(lang.code()),
                display_name: lang.eng_name().to_string(),
                confidence: info.confidence(),
            });
            denied.push(lang);
        }
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_and_code_only_input_is_undetermined() {
        let indexer = LanguageIndexer::default();
        for text in ["", "   ", "```rust\nfn main() {}\n```"] {
            let report = indexer.index(text);
            assert!(report.language.is_undetermined());
            assert_eq!(report.index_language, "en");
            assert_eq!(report.index_text, "");
            assert!(report.alternatives.is_empty());
        }
    }

    #[test]
    fn detects_english_prose() {
        let report = LanguageIndexer::default().index(
            "The quick brown fox jumps over the lazy dog while the farmer watches from the old wooden fence.",
        );
        assert_eq!(report.language.iso_code, "en");
        assert_eq!(report.language.display_name, "English");
        assert_eq!(report.language.script, Script::Latin);
        assert_eq!(report.index_language, "en");
        assert!(report.index_text.starts_with("the quick brown fox"));
    }

    #[test]
    fn detects_russian_and_romanizes() {
        let report = LanguageIndexer::default()
            .index("Привет, как у тебя дела? Я хотел бы узнать больше о программировании.");
        assert_eq!(report.language.iso_code, "ru");
        assert_eq!(report.language.script, Script::Cyrillic);
        assert_eq!(report.index_language, "en");
        assert!(report.index_text.starts_with("privet"));
    }

    #[test]
    fn detects_chinese() {
        let report = LanguageIndexer::default().index("我想学习如何使用这个编程语言来构建网络服务");
        assert_eq!(report.language.iso_code, "zh");
        assert_eq!(report.language.script, Script::Han);
        assert_eq!(report.index_language, "en");
        assert!(report.index_text.is_ascii());
    }

    #[test]
    fn alternatives_are_distinct_and_bounded() {
        let report = LanguageIndexer::default()
            .index("Dies ist ein kurzer Satz über das Wetter in der Stadt und die Menschen dort.");
        assert!(!report.alternatives.is_empty());
        assert!(report.alternatives.len() <= MAX_ALTERNATIVES);
        assert_eq!(report.alternatives[0].iso_code, report.language.iso_code);
        let mut codes: Vec<_> = report.alternatives.iter().map(|a| &a.iso_code).collect();
        codes.dedup();
        assert_eq!(codes.len(), report.alternatives.len());
    }

    #[test]
    fn low_confidence_degrades_to_undetermined() {
        let indexer = LanguageIndexer::new(LanguageConfig {
            min_confidence: 1.0,
            ..Default::default()
        });
        let report = indexer.index("ok so maybe");
        if report.language.is_undetermined() {
            assert_eq!(report.index_text, "ok so maybe");
            assert_eq!(report.index_language, "en");
        } else {
            assert_eq!(report.language.confidence, 1.0);
        }
    }

    #[test]
    fn context_gets_language_fields_and_tags() {
        let mut ctx = ProcessingContext::new("raw");
        ctx.normalized_text = "Привет, как у тебя дела? Я хотел бы узнать больше.".to_string();
        LanguageIndexer::default().index_context(&mut ctx);
        assert_eq!(ctx.language.iso_code, "ru");
        assert!(ctx.has_tag("lang:ru"));
        assert!(ctx.has_tag("script:cyrillic"));
        assert!(!ctx.index_text.is_empty());
    }

    #[test]
    fn index_text_covers_text_past_the_sample() {
        let indexer = LanguageIndexer::new(LanguageConfig {
            sample_chars: 120,
            ..Default::default()
        });
        let text = format!(
            "{} The final clause mentions zeppelin maintenance.",
            "The weather is lovely today and we should go for a walk. ".repeat(3)
        );
        let report = indexer.index(&text);
        assert!(report.index_text.contains("zeppelin"), "{}", report.index_text);
    }

    #[test]
    fn falls_back_to_raw_input() {
        let mut ctx = ProcessingContext::new("The weather is lovely today and we should go for a walk.");
        LanguageIndexer::default().index_context(&mut ctx);
        assert_eq!(ctx.language.iso_code, "en");
        assert!(ctx.index_text.contains("weather"));
    }
}
