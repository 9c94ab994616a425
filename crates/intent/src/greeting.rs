use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Non-letter code points that may appear in a greeting
const GREETING_SYMBOLS: &[char] = &['👋', '🙏', '🙂', '😊'];

static GREETINGS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "hi",
        "hello",
        "hey",
        "hiya",
        "howdy",
        "yo",
        "hi there",
        "hello there",
        "hey there",
        "hello everyone",
        "hi all",
        "good morning",
        "good afternoon",
        "good evening",
        "greetings",
        "hi 👋",
        "hello 👋",
        "👋",
        "你好",
        "您好",
        "大家好",
        "ni hao",
        "nin hao",
        "hola",
        "bonjour",
        "salut",
        "hallo",
        "guten tag",
        "ciao",
        "ola",
        "привет",
        "здравствуйте",
        "privet",
        "こんにちは",
        "konnichiwa",
        "안녕하세요",
        "annyeonghaseyo",
    ]
    .into_iter()
    .collect()
});

/// Keep letters, whitespace and greeting symbols; lowercase; collapse spaces.
#[must_use]
pub fn clean_greeting_text(text: &str) -> String {
    let kept: String = text
        .chars()
        .filter(|c| c.is_alphabetic() || c.is_whitespace() || GREETING_SYMBOLS.contains(c))
        .flat_map(char::to_lowercase)
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whole-message greeting check
#[must_use]
pub fn is_greeting(text: &str) -> bool {
    let cleaned = clean_greeting_text(text);
    !cleaned.is_empty() && GREETINGS.contains(cleaned.as_str())
}
