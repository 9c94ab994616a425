use crate::config::PromptConfig;
use promptline_protocol::{OutlineBucket, ProcessingContext, RenderedPrompt};
use std::fmt::Write;

/// Outline buckets restated after the user message
const RESTATED: [OutlineBucket; 3] = [
    OutlineBucket::Tasks,
    OutlineBucket::Constraints,
    OutlineBucket::Output,
];

/// Render the system and user prompts for a request.
#[must_use]
pub fn render_prompt(ctx: &ProcessingContext, config: &PromptConfig) -> RenderedPrompt {
    let mut system = config.system_preamble.trim().to_string();

    if !ctx.language.is_undetermined() {
        push_paragraph(
            &mut system,
            &format!("Reply in {}.", ctx.language.display_name),
        );
    }
    if !ctx.intent.is_unknown() {
        push_paragraph(
            &mut system,
            &format!("Request category: {}.", ctx.intent.as_str()),
        );
    }
    if !ctx.kb_matches.is_empty() {
        let mut knowledge = String::from("Relevant knowledge:");
        for (idx, hit) in ctx.kb_matches.iter().enumerate() {
            let _ = write!(
                knowledge,
                "\n[{}] ({}, score {:.3}) {}",
                idx + 1,
                hit.doc_type(),
                hit.score(),
                hit.content().trim()
            );
        }
        push_paragraph(&mut system, &knowledge);
    }

    let mut user = ctx.normalized_text.trim().to_string();
    let sections: Vec<String> = RESTATED
        .iter()
        .filter_map(|bucket| {
            let sentences = ctx.outline.get(bucket).filter(|s| !s.is_empty())?;
            let mut section = format!("{}:", bucket.as_str());
            for sentence in sentences {
                let _ = write!(section, "\n- {sentence}");
            }
            Some(section)
        })
        .collect();
    // A single bucket just repeats the message.
    if sections.len() > 1 {
        push_paragraph(&mut user, &sections.join("\n"));
    }

    RenderedPrompt { system, user }
}

fn push_paragraph(target: &mut String, paragraph: &str) {
    if !target.is_empty() {
        target.push_str("\n\n");
    }
    target.push_str(paragraph);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use promptline_protocol::{Intent, KbCandidate, KbMatch, LanguageDescriptor, Script};

    fn context() -> ProcessingContext {
        let mut ctx = ProcessingContext::new("raw");
        ctx.normalized_text = "Add a cache. It must be thread safe.".to_string();
        ctx.outline
            .insert(OutlineBucket::Tasks, vec!["Add a cache.".to_string()]);
        ctx.outline.insert(
            OutlineBucket::Constraints,
            vec!["It must be thread safe.".to_string()],
        );
        ctx
    }

    #[test]
    fn minimal_prompt_is_preamble_and_message() {
        let mut ctx = ProcessingContext::new("raw");
        ctx.normalized_text = "hello world".to_string();
        let config = PromptConfig {
            system_preamble: "Be brief.".to_string(),
            ..Default::default()
        };
        let prompt = render_prompt(&ctx, &config);
        assert_eq!(prompt.system, "Be brief.");
        assert_eq!(prompt.user, "hello world");
    }

    #[test]
    fn includes_language_intent_knowledge_and_outline() {
        let mut ctx = context();
        ctx.language = LanguageDescriptor::new("en", "English", 0.9, Script::Latin);
        ctx.set_intent(Intent::new("CODE_HELP"));
        let doc = KbCandidate::new("d1", "faq", "Use DashMap for sharded locking.");
        ctx.kb_matches = vec![KbMatch::from_candidate(&doc, 0.75)];

        let config = PromptConfig {
            system_preamble: "Be brief.".to_string(),
            ..Default::default()
        };
        let prompt = render_prompt(&ctx, &config);
        assert_eq!(
            prompt.system,
            "Be brief.\n\nReply in English.\n\nRequest category: CODE_HELP.\n\n\
             Relevant knowledge:\n[1] (faq, score 0.750) Use DashMap for sharded locking."
        );
        assert_eq!(
            prompt.user,
            "Add a cache. It must be thread safe.\n\n\
             TASKS:\n- Add a cache.\nCONSTRAINTS:\n- It must be thread safe."
        );
    }
}
