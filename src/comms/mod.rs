//! Comms: inbound chat events and the outbound reply path.
//!
//! A channel adapter (Telegram today) turns platform updates into
//! [`InboundMessage`]s and implements [`ReplySink`]. The [`listener`] loop is
//! platform-agnostic and only sees those two types.

pub mod listener;
#[cfg(feature = "channel-telegram")]
pub mod telegram;

use std::future::Future;

use crate::error::AppError;

pub use listener::{Listener, ListenerStats};

/// A chat event reduced to what the relay needs. Read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// Chat the reply goes back to.
    pub chat_id: i64,
    /// Sender's username, when the platform exposes one.
    pub sender: Option<String>,
    /// `None` for stickers, photos, service messages and the like.
    pub text: Option<String>,
}

impl InboundMessage {
    pub fn text(chat_id: i64, sender: Option<&str>, text: &str) -> Self {
        Self {
            chat_id,
            sender: sender.map(str::to_owned),
            text: Some(text.to_owned()),
        }
    }

    /// Text worth relaying: present and non-empty.
    pub fn relay_text(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.is_empty())
    }
}

/// Outbound half of a channel: send `text` to the chat `chat_id`.
pub trait ReplySink {
    fn send_text(
        &self,
        chat_id: i64,
        text: &str,
    ) -> impl Future<Output = Result<(), AppError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relay_text_requires_non_empty_text() {
        assert_eq!(InboundMessage::text(1, None, "hi").relay_text(), Some("hi"));
        assert_eq!(InboundMessage::text(1, None, "").relay_text(), None);
        let sticker = InboundMessage { chat_id: 1, sender: Some("bob".into()), text: None };
        assert_eq!(sticker.relay_text(), None);
    }

    #[test]
    fn whitespace_text_is_still_relayed() {
        assert_eq!(InboundMessage::text(1, None, " ").relay_text(), Some(" "));
    }
}
