use crate::config::Substitution;

/// Build the ASCII index text: substitutions, transliteration, then
/// everything outside `[a-z0-9 ]` is dropped and whitespace collapsed.
#[must_use]
pub fn build_index_text(text: &str, substitutions: &[Substitution]) -> String {
    let substituted = apply_substitutions(text, substitutions);
    let latin = deunicode::deunicode(&substituted);

    let cleaned: String = latin
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                ' '
            }
        })
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn apply_substitutions(text: &str, substitutions: &[Substitution]) -> String {
    let mut out = text.to_string();
    for rule in substitutions.iter().filter(|r| !r.from.is_empty()) {
        if out.contains(&rule.from) {
            out = out.replace(&rule.from, &format!(" {} ", rule.to));
        }
    }
    out
}
