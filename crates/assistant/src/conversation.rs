use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use farmacontrol_core::{MessageId, ProductId};

use crate::reply::Reply;

pub const WELCOME: &str = "¡Hola! Soy el asistente de FarmaControl. \
Describa sus síntomas y le recomendaré productos disponibles en nuestro inventario.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub speaker: Speaker,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    /// Products recommended by an assistant message; empty for user messages.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub products: Vec<ProductId>,
}

/// Append-only chat log with a count of replies still being "typed".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    messages: Vec<Message>,
    pending_replies: usize,
}

impl Conversation {
    /// Start a conversation with the welcome message.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            messages: vec![Message {
                id: MessageId::new(),
                speaker: Speaker::Assistant,
                content: WELCOME.to_string(),
                timestamp: now,
                products: Vec::new(),
            }],
            pending_replies: 0,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// True while at least one reply is owed to the user.
    pub fn is_typing(&self) -> bool {
        self.pending_replies > 0
    }

    pub fn pending_replies(&self) -> usize {
        self.pending_replies
    }

    /// Record a user message and mark a reply as pending.
    ///
    /// Blank input is ignored and returns `None`.
    pub fn push_user(&mut self, text: &str, now: DateTime<Utc>) -> Option<&Message> {
        let content = text.trim();
        if content.is_empty() {
            return None;
        }
        self.pending_replies += 1;
        self.messages.push(Message {
            id: MessageId::new(),
            speaker: Speaker::User,
            content: content.to_string(),
            timestamp: now,
            products: Vec::new(),
        });
        self.messages.last()
    }

    /// Deliver an assistant reply, settling one pending reply.
    pub fn push_reply(&mut self, reply: Reply, now: DateTime<Utc>) -> &Message {
        self.pending_replies = self.pending_replies.saturating_sub(1);
        self.messages.push(Message {
            id: MessageId::new(),
            speaker: Speaker::Assistant,
            content: reply.text,
            timestamp: now,
            products: reply.products,
        });
        &self.messages[self.messages.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommend::test_support::today;

    #[test]
    fn starts_with_welcome() {
        let conv = Conversation::new(today());
        assert_eq!(conv.messages().len(), 1);
        let first = &conv.messages()[0];
        assert_eq!(first.speaker, Speaker::Assistant);
        assert_eq!(first.content, WELCOME);
        assert!(!conv.is_typing());
    }

    #[test]
    fn blank_user_input_is_ignored() {
        let mut conv = Conversation::new(today());
        assert!(conv.push_user("   ", today()).is_none());
        assert_eq!(conv.messages().len(), 1);
        assert!(!conv.is_typing());
    }

    #[test]
    fn typing_until_every_reply_arrives() {
        let mut conv = Conversation::new(today());
        let msg = conv.push_user("  tengo fiebre ", today()).unwrap();
        assert_eq!(msg.content, "tengo fiebre");
        conv.push_user("y tos", today());
        assert_eq!(conv.pending_replies(), 2);

        conv.push_reply(Reply::clarification(), today());
        assert!(conv.is_typing());
        let last = conv.push_reply(Reply::clarification(), today());
        assert_eq!(last.speaker, Speaker::Assistant);
        assert!(!conv.is_typing());
        assert_eq!(conv.messages().len(), 5);
    }

    #[test]
    fn message_ids_are_unique() {
        let mut conv = Conversation::new(today());
        conv.push_user("hola", today());
        let ids: Vec<_> = conv.messages().iter().map(|m| m.id).collect();
        assert_ne!(ids[0], ids[1]);
    }
}
