//! Canonical message model shared by every model provider.
//!
//! Vendors disagree on how tool calls and tool results are represented on the
//! wire. Inside the crate there is exactly one shape: a [`Message`] whose
//! content is either plain text or a list of tagged [`ContentBlock`]s.
//! Provider adapters translate to and from this shape at the edge.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Speaker of a transcript message.
///
/// System instructions are not part of the transcript; they travel
/// separately through `ModelProvider::chat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One typed unit of message content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Free text from either side.
    Text { text: String },

    /// A tool call proposed by the model.
    ToolUse {
        id: String,
        name: String,
        input: Map<String, Value>,
    },

    /// The answer to a previously proposed tool call.
    ToolResult { tool_use_id: String, content: String },
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        ContentBlock::Text { text: text.into() }
    }

    pub fn tool_use(id: impl Into<String>, name: impl Into<String>, input: Map<String, Value>) -> Self {
        ContentBlock::ToolUse {
            id: id.into(),
            name: name.into(),
            input,
        }
    }

    pub fn tool_result(tool_use_id: impl Into<String>, content: impl Into<String>) -> Self {
        ContentBlock::ToolResult {
            tool_use_id: tool_use_id.into(),
            content: content.into(),
        }
    }

    /// Returns the text if this is a text block.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentBlock::Text { text } => Some(text),
            _ => None,
        }
    }

    /// Returns `(id, name, input)` if this is a tool call.
    pub fn as_tool_use(&self) -> Option<ToolUse<'_>> {
        match self {
            ContentBlock::ToolUse { id, name, input } => Some(ToolUse { id, name, input }),
            _ => None,
        }
    }
}

/// Borrowed view of a proposed tool call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolUse<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub input: &'a Map<String, Value>,
}

/// Message body: a bare string or a list of blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

/// A single transcript entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: MessageContent,
}

impl Message {
    /// Creates a plain-text user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Text(text.into()),
        }
    }

    /// Creates a plain-text assistant message.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: MessageContent::Text(text.into()),
        }
    }

    /// Creates an assistant message carrying the model's blocks verbatim.
    pub fn assistant_blocks(blocks: Vec<ContentBlock>) -> Self {
        Self {
            role: Role::Assistant,
            content: MessageContent::Blocks(blocks),
        }
    }

    /// Creates the user message that answers a turn's tool calls.
    pub fn tool_results(blocks: Vec<ContentBlock>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Blocks(blocks),
        }
    }

    /// Content as blocks; plain text becomes a single text block.
    pub fn blocks(&self) -> Vec<ContentBlock> {
        match &self.content {
            MessageContent::Text(text) => vec![ContentBlock::text(text.clone())],
            MessageContent::Blocks(blocks) => blocks.clone(),
        }
    }

    /// Concatenation of every text block, in order.
    pub fn text(&self) -> String {
        match &self.content {
            MessageContent::Text(text) => text.clone(),
            MessageContent::Blocks(blocks) => blocks
                .iter()
                .filter_map(ContentBlock::as_text)
                .collect::<Vec<_>>()
                .join(""),
        }
    }

    /// Ids of the tool calls proposed in this message.
    pub fn tool_use_ids(&self) -> Vec<String> {
        match &self.content {
            MessageContent::Text(_) => Vec::new(),
            MessageContent::Blocks(blocks) => blocks
                .iter()
                .filter_map(|b| b.as_tool_use().map(|t| t.id.to_string()))
                .collect(),
        }
    }

    /// Ids answered by tool result blocks in this message.
    pub fn tool_result_ids(&self) -> Vec<String> {
        match &self.content {
            MessageContent::Text(_) => Vec::new(),
            MessageContent::Blocks(blocks) => blocks
                .iter()
                .filter_map(|b| match b {
                    ContentBlock::ToolResult { tool_use_id, .. } => Some(tool_use_id.clone()),
                    _ => None,
                })
                .collect(),
        }
    }
}

/// Ordered conversation history owned by a single run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    /// Starts a transcript with the task instruction as the first user turn.
    pub fn seeded(instruction: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::user(instruction)],
        }
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Tool call ids not answered, in order, by the message right after them.
    ///
    /// Empty when the transcript is safe to send to a model.
    pub fn pending_tool_uses(&self) -> Vec<String> {
        let mut pending = Vec::new();

        for (idx, message) in self.messages.iter().enumerate() {
            if message.role != Role::Assistant {
                continue;
            }
            let proposed = message.tool_use_ids();
            if proposed.is_empty() {
                continue;
            }

            let answered = self
                .messages
                .get(idx + 1)
                .filter(|next| next.role == Role::User)
                .map(Message::tool_result_ids)
                .unwrap_or_default();

            if answered != proposed {
                let missing: Vec<String> = proposed
                    .iter()
                    .filter(|id| !answered.contains(id))
                    .cloned()
                    .collect();
                // All present but reordered still breaks the pairing.
                if missing.is_empty() {
                    pending.extend(proposed);
                } else {
                    pending.extend(missing);
                }
            }
        }

        pending
    }
}
