//! Telegram channel: long-polls the Bot API for updates and replies with
//! `sendMessage`.

use std::time::Duration;

use futures::{Stream, StreamExt};
use teloxide::prelude::*;
use teloxide::types::UpdateKind;
use teloxide::update_listeners::{AsUpdateStream, Polling};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::{InboundMessage, Listener, ListenerStats, ReplySink};
use crate::error::AppError;

/// Long-poll timeout passed to `getUpdates`.
pub const POLL_TIMEOUT: Duration = Duration::from_secs(60);

/// Bot API client timeout. Must outlast an idle long poll, otherwise every
/// quiet `getUpdates` fails and the poller backs off.
pub const CLIENT_TIMEOUT: Duration = Duration::from_secs(POLL_TIMEOUT.as_secs() + 10);

/// Public Bot API server.
pub const API_URL: &str = "https://api.telegram.org";

/// An authorized bot session. Owns the platform client handle.
pub struct TelegramChannel {
    bot: Bot,
    username: String,
}

impl TelegramChannel {
    /// Build the bot client and verify the token with `getMe`.
    ///
    /// An invalid token is fatal: there is no degraded mode.
    pub async fn connect(token: &str) -> Result<Self, AppError> {
        Self::connect_with_api_url(token, API_URL).await
    }

    /// [`connect`](Self::connect) against another Bot API server, such as a
    /// self-hosted one.
    pub async fn connect_with_api_url(token: &str, api_url: &str) -> Result<Self, AppError> {
        let api_url = reqwest::Url::parse(api_url)
            .map_err(|e| AppError::Comms(format!("invalid telegram api url '{api_url}': {e}")))?;
        let client = teloxide::net::default_reqwest_settings()
            .timeout(CLIENT_TIMEOUT)
            .build()
            .map_err(|e| AppError::Comms(format!("failed to build telegram HTTP client: {e}")))?;
        let bot = Bot::with_client(token, client).set_api_url(api_url);

        let me = bot
            .get_me()
            .await
            .map_err(|e| AppError::Comms(format!("telegram authorization failed: {e}")))?;
        let username = me.username().to_string();

        info!(account = %username, "authorized on account");
        Ok(Self { bot, username })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Feed this bot's update stream through `listener` until the stream
    /// ends or `shutdown` fires.
    pub async fn run(&self, listener: &Listener, shutdown: CancellationToken) -> ListenerStats {
        let mut polling = Polling::builder(self.bot.clone()).timeout(POLL_TIMEOUT).build();
        let updates = inbound_stream(polling.as_stream());

        info!(
            account = %self.username,
            poll_timeout_secs = POLL_TIMEOUT.as_secs(),
            "telegram channel starting"
        );
        listener.run(updates, self, shutdown).await
    }
}

impl ReplySink for TelegramChannel {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<(), AppError> {
        self.bot
            .send_message(ChatId(chat_id), text.to_owned())
            .await
            .map(|_| ())
            .map_err(|e| AppError::Comms(format!("sendMessage to chat {chat_id} failed: {e}")))
    }
}

/// Map raw polling results to inbound messages. Polling errors are logged
/// and dropped; the poller keeps going on its own.
fn inbound_stream<S, E>(raw: S) -> impl Stream<Item = InboundMessage>
where
    S: Stream<Item = Result<Update, E>>,
    E: std::fmt::Display,
{
    raw.filter_map(|res| async move {
        match res {
            Ok(update) => to_inbound(update),
            Err(e) => {
                warn!(error = %e, "telegram polling error");
                None
            }
        }
    })
}

/// Only `message` updates are relayed; edits, callbacks and the rest map to
/// `None`.
fn to_inbound(update: Update) -> Option<InboundMessage> {
    match update.kind {
        UpdateKind::Message(msg) => Some(InboundMessage {
            chat_id: msg.chat.id.0,
            sender: msg.from.as_ref().and_then(|u| u.username.clone()),
            text: msg.text().map(str::to_owned),
        }),
        _ => None,
    }
}
