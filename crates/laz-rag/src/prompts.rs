//! Completion call shapes
//!
//! Each endpoint talks to the completion API through exactly one of these
//! request builders.

use laz_core::{ChatMessage, ChatRequest, CompletionRequest, PageSummary, RagConfig};

pub const SUMMARIZE_SYSTEM: &str = "Summarize texts clearly and concisely.";

pub const SENTIMENT_INSTRUCTION: &str = "Classify the sentiment of the following text as Positive, Neutral, or Negative. \
     Return JSON with keys: label and explanation.\n\nText:\n";

pub const SENTIMENT_TEMPERATURE: f32 = 0.2;

pub const TOPIC_SYSTEM: &str = "Return ONLY the main topic as a Wikipedia page title. No quotes. \
     If unclear, return UNKNOWN.";

/// Model output meaning "no usable topic"
pub const UNKNOWN_TOPIC: &str = "UNKNOWN";

pub const CITED_ANSWER_SYSTEM: &str =
    "Use the provided context faithfully and cite the title inline once.";

/// Synthesized system message followed by the recent conversation
pub fn chat(request: &ChatRequest) -> CompletionRequest {
    let recent = request.recent_messages();
    let mut messages = Vec::with_capacity(1 + recent.len());
    messages.push(ChatMessage::system(request.system_prompt()));
    messages.extend_from_slice(recent);

    CompletionRequest::new(request.model_name(), messages)
}

pub fn summarize(text: &str, model: &str) -> CompletionRequest {
    CompletionRequest::new(
        model,
        vec![ChatMessage::system(SUMMARIZE_SYSTEM), ChatMessage::user(text)],
    )
}

pub fn sentiment(text: &str, model: &str) -> CompletionRequest {
    let prompt = format!("{SENTIMENT_INSTRUCTION}{text}");
    CompletionRequest::new(model, vec![ChatMessage::user(prompt)])
        .with_temperature(SENTIMENT_TEMPERATURE)
}

pub fn topic_extraction(question: &str, model: &str, config: &RagConfig) -> CompletionRequest {
    CompletionRequest::new(
        model,
        vec![
            ChatMessage::system(TOPIC_SYSTEM),
            ChatMessage::user(truncate_chars(question, config.topic_max_chars)),
        ],
    )
    .with_temperature(config.topic_temperature)
    .with_max_tokens(config.topic_max_tokens)
}

pub fn cited_answer(
    question: &str,
    summary: &PageSummary,
    model: &str,
    config: &RagConfig,
) -> CompletionRequest {
    let user = format!(
        "User question: {question}\n\nContext:\n{}\n\nAnswer briefly and accurately.",
        context_block(summary)
    );

    CompletionRequest::new(
        model,
        vec![
            ChatMessage::system(CITED_ANSWER_SYSTEM),
            ChatMessage::user(user),
        ],
    )
    .with_temperature(config.answer_temperature)
}

/// `TITLE`/`SUMMARY`/`URL` lines
///
/// An absent URL renders as `URL: ` with nothing after it, never as a
/// placeholder word the model could mistake for a link.
pub fn context_block(summary: &PageSummary) -> String {
    format!(
        "TITLE: {}\nSUMMARY: {}\nURL: {}",
        summary.title,
        summary.extract,
        summary.url.as_deref().unwrap_or_default()
    )
}

/// Whether a topic-extraction reply can be used as a search term
pub fn is_usable_topic(topic: &str) -> bool {
    let topic = topic.trim();
    !topic.is_empty() && !topic.eq_ignore_ascii_case(UNKNOWN_TOPIC)
}

/// Prefix of at most `max_chars` characters
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn summary(url: Option<&str>) -> PageSummary {
        PageSummary {
            title: "Lake Ohrid".to_string(),
            extract: "Lake Ohrid straddles the border.".to_string(),
            url: url.map(str::to_string),
        }
    }

    #[test]
    fn test_chat_prefixes_system_message() {
        let mut request = ChatRequest::new(vec![ChatMessage::user("hi")]);
        request.system = Some("Explain all concepts in advanced level of speaking.".to_string());
        request.model = Some("gpt-4o".to_string());

        let completion = chat(&request);
        assert_eq!(completion.model, "gpt-4o");
        assert_eq!(completion.messages.len(), 2);
        assert_eq!(completion.messages[0].role, "system");
        assert_eq!(
            completion.messages[0].content,
            "Explain all concepts in advanced level of speaking."
        );
        assert!(completion.temperature.is_none());
    }

    #[test]
    fn test_summarize_shape() {
        let completion = summarize("long text", "gpt-4o-mini");
        assert_eq!(completion.messages[0], ChatMessage::system(SUMMARIZE_SYSTEM));
        assert_eq!(completion.messages[1], ChatMessage::user("long text"));
    }

    #[test]
    fn test_sentiment_shape() {
        let completion = sentiment("I love it", "gpt-4o-mini");
        assert_eq!(completion.messages.len(), 1);
        assert_eq!(completion.messages[0].role, "user");
        assert!(completion.messages[0].content.starts_with("Classify the sentiment"));
        assert!(completion.messages[0].content.ends_with("Text:\nI love it"));
        assert_eq!(completion.temperature, Some(0.2));
    }

    #[test]
    fn test_topic_extraction_limits() {
        let question = "é".repeat(600);
        let completion = topic_extraction(&question, "gpt-4o-mini", &RagConfig::default());

        assert_eq!(completion.messages[0].content, TOPIC_SYSTEM);
        assert_eq!(completion.messages[1].content.chars().count(), 500);
        assert_eq!(completion.temperature, Some(0.2));
        assert_eq!(completion.max_tokens, Some(24));
    }

    #[test]
    fn test_cited_answer_embeds_context() {
        let completion = cited_answer(
            "How deep is it?",
            &summary(Some("https://en.wikipedia.org/wiki/Lake_Ohrid")),
            "gpt-4o-mini",
            &RagConfig::default(),
        );

        let user = &completion.messages[1].content;
        assert!(user.starts_with("User question: How deep is it?\n\nContext:\n"));
        assert!(user.contains("TITLE: Lake Ohrid\nSUMMARY: Lake Ohrid straddles the border.\n"));
        assert!(user.contains("URL: https://en.wikipedia.org/wiki/Lake_Ohrid"));
        assert!(user.ends_with("Answer briefly and accurately."));
        assert_eq!(completion.temperature, Some(0.3));
        assert!(completion.max_tokens.is_none());
    }

    #[test]
    fn test_context_block_without_url() {
        assert!(context_block(&summary(None)).ends_with("URL: "));
    }

    #[test]
    fn test_usable_topic() {
        assert!(is_usable_topic("Lake Ohrid"));
        assert!(!is_usable_topic(""));
        assert!(!is_usable_topic("   "));
        assert!(!is_usable_topic("UNKNOWN"));
        assert!(!is_usable_topic("unknown"));
        assert!(!is_usable_topic("Unknown"));
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 2), "he");
        assert_eq!(truncate_chars("здраво", 3), "здр");
    }

    proptest! {
        #[test]
        fn prop_chat_forwards_last_eight(len in 0usize..40) {
            let messages: Vec<ChatMessage> = (0..len)
                .map(|i| ChatMessage::user(format!("m{i}")))
                .collect();
            let completion = chat(&ChatRequest::new(messages.clone()));

            let forwarded = len.min(8);
            prop_assert_eq!(completion.messages.len(), forwarded + 1);
            prop_assert_eq!(&completion.messages[0], &ChatMessage::system("You are a helpful assistant."));
            prop_assert_eq!(&completion.messages[1..], &messages[len - forwarded..]);
            prop_assert_eq!(
                completion.messages.iter().filter(|m| m.role == "system").count(),
                1
            );
        }
    }
}
