// ABOUTME: Closed enum of AI actions and their system prompt table
// ABOUTME: Exhaustive per-variant mapping, no runtime fallback

/// The five AI operations Notewise exposes.
///
/// `Translate` carries its target language so the prompt builder stays a
/// total function over the enum. The HTTP boundary exposes one route per
/// action, so an unknown action cannot reach this core and there is no
/// silent fallback to the generate prompt.
#[derive(Debug, Clone, PartialEq)]
pub enum AiAction {
    Generate,
    Improve,
    Summarize,
    Translate { target_language: String },
    Answer,
}

impl AiAction {
    /// Stable name used in the usage ledger and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Generate => "generate",
            Self::Improve => "improve",
            Self::Summarize => "summarize",
            Self::Translate { .. } => "translate",
            Self::Answer => "answer",
        }
    }

    /// System instruction for this action.
    pub fn system_prompt(&self) -> &'static str {
        match self {
            Self::Generate => {
                "You are a helpful assistant for note-taking. Generate clear, \
                 well-structured content based on user requests."
            }
            Self::Improve => {
                "You are an expert editor. Improve the given text while maintaining \
                 its core message. Make it more professional, clear, and concise."
            }
            Self::Summarize => {
                "You are a summarization expert. Create concise, accurate summaries \
                 that capture key points."
            }
            Self::Translate { .. } => {
                "You are a professional translator. Translate the text accurately \
                 while maintaining tone and context."
            }
            Self::Answer => {
                "You are a knowledgeable assistant. Answer questions based on the \
                 provided context clearly and accurately."
            }
        }
    }

    /// Fixed user-message instruction for actions that do not take a
    /// caller-supplied prompt. `Generate` and `Answer` return `None`; their
    /// payload comes from the caller.
    pub fn instruction(&self) -> Option<String> {
        match self {
            Self::Generate | Self::Answer => None,
            Self::Improve => Some("Improve this text:".to_string()),
            Self::Summarize => Some("Summarize this text in 3-5 bullet points:".to_string()),
            Self::Translate { target_language } => Some(format!(
                "Translate the following text to {}:",
                target_language
            )),
        }
    }
}
