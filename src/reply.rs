use crate::error::ChatError;
use crate::llm::assistant::{ MessageContent, ThreadMessage };

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedReply {
    pub text: String,
    /// At least one text block carried file-search citations.
    pub sources_used: bool,
}

/// Joins the text blocks of the assistant's final message in order.
pub fn extract_reply(message: &ThreadMessage) -> Result<ExtractedReply, ChatError> {
    let mut text = String::new();
    let mut sources_used = false;

    for block in &message.content {
        if let MessageContent::Text { text: segment } = block {
            text.push_str(&segment.value);
            if !segment.annotations.is_empty() {
                sources_used = true;
            }
        }
    }

    if text.trim().is_empty() {
        return Err(ChatError::EmptyReply);
    }

    Ok(ExtractedReply { text, sources_used })
}
