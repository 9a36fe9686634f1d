// ABOUTME: Pure prompt builder mapping an action plus optional inputs to chat messages
// ABOUTME: Deterministic, no I/O; independently testable without a network

use serde::{Deserialize, Serialize};

use crate::action::AiAction;

pub const CONTEXT_PREFIX: &str = "Context from my notes:";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Build the message sequence for one invocation.
///
/// Exactly one system message selected by the action; one optional user
/// message carrying note context; one final user message with the action
/// payload (the caller's prompt for `Generate`/`Answer`, the action's fixed
/// instruction otherwise).
pub fn build_messages(
    action: &AiAction,
    prompt: Option<&str>,
    context: Option<&str>,
) -> Vec<ChatMessage> {
    let mut messages = vec![ChatMessage::system(action.system_prompt())];

    if let Some(context) = context.filter(|c| !c.is_empty()) {
        messages.push(ChatMessage::user(format!(
            "{}\n{}",
            CONTEXT_PREFIX, context
        )));
    }

    let payload = match action.instruction() {
        Some(instruction) => instruction,
        None => prompt.unwrap_or_default().to_string(),
    };
    messages.push(ChatMessage::user(payload));

    messages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_uses_caller_prompt_verbatim() {
        let messages = build_messages(&AiAction::Generate, Some("write a haiku"), None);

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[1].role, "user");
        assert_eq!(messages[1].content, "write a haiku");
    }

    #[test]
    fn test_context_is_prefixed_and_ordered_before_payload() {
        let messages = build_messages(
            &AiAction::Answer,
            Some("What did I write about Rust?"),
            Some("Rust has ownership."),
        );

        assert_eq!(messages.len(), 3);
        assert_eq!(
            messages[1].content,
            "Context from my notes:\nRust has ownership."
        );
        assert_eq!(messages[2].content, "What did I write about Rust?");
    }

    #[test]
    fn test_empty_context_is_omitted() {
        let messages = build_messages(&AiAction::Generate, Some("hello"), Some(""));
        assert_eq!(messages.len(), 2);
    }

    #[test]
    fn test_translate_emits_parameterized_instruction_with_context() {
        let action = AiAction::Translate {
            target_language: "English".to_string(),
        };
        let messages = build_messages(&action, None, Some("Hola"));

        assert_eq!(messages.len(), 3);
        assert!(messages[1].content.contains("Hola"));
        assert_eq!(
            messages[2].content,
            "Translate the following text to English:"
        );
    }

    #[test]
    fn test_deterministic_for_identical_inputs() {
        let action = AiAction::Summarize;
        let first = build_messages(&action, None, Some("long note text"));
        let second = build_messages(&action, None, Some("long note text"));
        assert_eq!(first, second);
    }

    #[test]
    fn test_every_action_emits_exactly_one_system_message() {
        let actions = [
            AiAction::Generate,
            AiAction::Improve,
            AiAction::Summarize,
            AiAction::Translate {
                target_language: "German".to_string(),
            },
            AiAction::Answer,
        ];

        for action in &actions {
            let messages = build_messages(action, Some("payload"), Some("context"));
            let system_count = messages.iter().filter(|m| m.role == "system").count();
            assert_eq!(system_count, 1, "action {}", action.as_str());
            assert_eq!(messages[0].role, "system");
        }
    }
}
