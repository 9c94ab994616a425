use crate::tokenize::Tokens;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Resource form of a lexicon entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RawLexiconEntry {
    pub domain: Vec<String>,
    pub contextual: Vec<String>,
    pub active: bool,
}

impl Default for RawLexiconEntry {
    fn default() -> Self {
        Self {
            domain: Vec::new(),
            contextual: Vec::new(),
            active: true,
        }
    }
}

/// Canonical term with its case-folded synonym set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexiconEntry {
    pub synonyms: HashSet<String>,
    pub active: bool,
}

/// Canonical term → synonyms, used to widen keyword matches
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    entries: HashMap<String, LexiconEntry>,
}

impl Lexicon {
    /// Build from the resource map; domain and contextual synonyms merge.
    #[must_use]
    pub fn from_raw(raw: HashMap<String, RawLexiconEntry>) -> Self {
        let entries = raw
            .into_iter()
            .filter_map(|(canonical, entry)| {
                let canonical = canonical.trim().to_lowercase();
                if canonical.is_empty() {
                    return None;
                }
                let synonyms = entry
                    .domain
                    .iter()
                    .chain(entry.contextual.iter())
                    .map(|s| s.trim().to_lowercase())
                    .filter(|s| !s.is_empty())
                    .collect();
                Some((
                    canonical,
                    LexiconEntry {
                        synonyms,
                        active: entry.active,
                    },
                ))
            })
            .collect();
        Self { entries }
    }

    pub fn insert(&mut self, canonical: &str, synonyms: &[&str]) {
        self.entries.insert(
            canonical.to_lowercase(),
            LexiconEntry {
                synonyms: synonyms.iter().map(|s| s.to_lowercase()).collect(),
                active: true,
            },
        );
    }

    #[must_use]
    pub fn get(&self, canonical: &str) -> Option<&LexiconEntry> {
        self.entries.get(canonical)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// A keyword hits when it is a token itself, or names an active
    /// canonical with at least one synonym among the tokens.
    #[must_use]
    pub fn hits(&self, keyword: &str, tokens: &Tokens) -> bool {
        let keyword = keyword.trim().to_lowercase();
        if keyword.is_empty() {
            return false;
        }
        if tokens.contains(&keyword) {
            return true;
        }
        self.entries
            .get(&keyword)
            .filter(|entry| entry.active)
            .is_some_and(|entry| entry.synonyms.iter().any(|s| tokens.contains(s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenize::tokenize;

    fn lexicon() -> Lexicon {
        let mut raw = HashMap::new();
        raw.insert(
            "Payment".to_string(),
            RawLexiconEntry {
                domain: vec!["Pay".into(), "alipay".into()],
                contextual: vec!["receipt".into()],
                active: true,
            },
        );
        raw.insert(
            "summary".to_string(),
            RawLexiconEntry {
                domain: vec!["recap".into()],
                contextual: vec![],
                active: false,
            },
        );
        Lexicon::from_raw(raw)
    }

    #[test]
    fn merges_and_folds_synonyms() {
        let lexicon = lexicon();
        let entry = lexicon.get("payment").expect("payment entry");
        assert!(entry.synonyms.contains("pay"));
        assert!(entry.synonyms.contains("receipt"));
        assert_eq!(lexicon.len(), 2);
    }

    #[test]
    fn keyword_hits_directly_or_via_synonyms() {
        let lexicon = lexicon();
        let tokens = tokenize("can I pay with Alipay");
        assert!(lexicon.hits("payment", &tokens));
        assert!(lexicon.hits("ALIPAY", &tokens));
        assert!(!lexicon.hits("refund", &tokens));
    }

    #[test]
    fn inactive_entries_do_not_expand() {
        let lexicon = lexicon();
        assert!(!lexicon.hits("summary", &tokenize("quick recap please")));
        assert!(lexicon.hits("recap", &tokenize("quick recap please")));
    }

    #[test]
    fn multiword_synonyms_match_bigrams() {
        let mut lexicon = Lexicon::default();
        lexicon.insert("login", &["log in"]);
        assert!(lexicon.hits("login", &tokenize("I cannot log in anymore")));
    }
}
