use promptline_language::{LanguageConfig, LanguageIndexer, Substitution};
use proptest::prelude::*;

fn is_index_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == ' '
}

proptest! {
    #[test]
    fn index_text_is_lowercase_ascii(text in "\\PC{0,200}") {
        let report = LanguageIndexer::default().index(&text);
        prop_assert!(report.index_text.chars().all(is_index_char), "{:?}", report.index_text);
        prop_assert!(!report.index_text.starts_with(' '));
        prop_assert!(!report.index_text.contains("  "));
    }

    #[test]
    fn language_is_always_assigned(text in "\\PC{0,120}") {
        let report = LanguageIndexer::default().index(&text);
        prop_assert!(!report.language.iso_code.is_empty());
        prop_assert!(!report.index_language.is_empty());
    }
}

#[test]
fn configured_substitution_reaches_index_text() {
    let indexer = LanguageIndexer::default();
    let report = indexer.index("我想用微信和支付宝付款");
    assert!(report.index_text.contains("wechat"), "{}", report.index_text);
    assert!(report.index_text.contains("alipay"), "{}", report.index_text);
}

#[test]
fn custom_substitutions_replace_defaults() {
    let indexer = LanguageIndexer::new(LanguageConfig {
        substitutions: vec![Substitution::new("飞书", "lark")],
        ..Default::default()
    });
    let report = indexer.index("飞书的机器人怎么配置");
    assert!(report.index_text.starts_with("lark "), "{}", report.index_text);
    assert!(!report.index_text.contains("wechat"));
}

#[test]
fn code_never_reaches_the_index() {
    let report = LanguageIndexer::default()
        .index("Please review this function carefully.\n```rust\nfn secret_helper() {}\n```");
    assert!(!report.index_text.contains("secret"));
    assert!(report.index_text.contains("review"));
}
