//! Sequential consume-loop: one inbound message, one completion, one reply.
//!
//! The loop awaits the responder and the send before pulling the next update,
//! so messages are handled strictly in arrival order and at most one
//! completion is ever in flight. Nothing a single message does can end the
//! loop; only the end of the stream or the shutdown token can.

use std::pin::pin;

use futures::{Stream, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use super::{InboundMessage, ReplySink};
use crate::llm::Responder;

/// Counters reported when the loop exits.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ListenerStats {
    /// Every event pulled from the stream.
    pub received: u64,
    /// Replies handed to the sink successfully.
    pub replied: u64,
    /// Events without text.
    pub skipped: u64,
    pub send_failures: u64,
}

enum Outcome {
    Skipped,
    Replied,
    SendFailed,
}

/// Relays each text message through the [`Responder`] and back to its chat.
#[derive(Debug, Clone)]
pub struct Listener {
    responder: Responder,
}

impl Listener {
    pub fn new(responder: Responder) -> Self {
        Self { responder }
    }

    /// Drive the loop until `updates` ends or `shutdown` is cancelled.
    ///
    /// Cancellation also abandons a message that is mid-flight.
    pub async fn run<S, K>(
        &self,
        updates: S,
        sink: &K,
        shutdown: CancellationToken,
    ) -> ListenerStats
    where
        S: Stream<Item = InboundMessage>,
        K: ReplySink,
    {
        let mut updates = pin!(updates);
        let mut stats = ListenerStats::default();

        loop {
            let next = tokio::select! {
                biased;

                _ = shutdown.cancelled() => {
                    info!("shutdown signal received, stopping listener");
                    break;
                }
                next = updates.next() => next,
            };

            let Some(msg) = next else {
                warn!("update stream ended");
                break;
            };
            stats.received += 1;

            let span = info_span!("message", request_id = %Uuid::now_v7(), chat_id = msg.chat_id);
            let outcome = tokio::select! {
                biased;

                _ = shutdown.cancelled() => {
                    info!("shutdown signal received, dropping in-flight message");
                    break;
                }
                outcome = self.handle(msg, sink).instrument(span) => outcome,
            };

            match outcome {
                Outcome::Skipped => stats.skipped += 1,
                Outcome::Replied => stats.replied += 1,
                Outcome::SendFailed => stats.send_failures += 1,
            }
        }

        info!(
            received = stats.received,
            replied = stats.replied,
            skipped = stats.skipped,
            send_failures = stats.send_failures,
            "listener stopped"
        );
        stats
    }

    async fn handle<K: ReplySink>(&self, msg: InboundMessage, sink: &K) -> Outcome {
        let Some(text) = msg.relay_text() else {
            debug!("message has no text, skipping");
            return Outcome::Skipped;
        };

        info!(
            sender = msg.sender.as_deref().unwrap_or("<unknown>"),
            text_len = text.len(),
            "received message"
        );

        let reply = self.responder.respond(text).await;

        match sink.send_text(msg.chat_id, &reply).await {
            Ok(()) => {
                debug!(reply_len = reply.len(), "reply sent");
                Outcome::Replied
            }
            Err(e) => {
                warn!(error = %e, "failed to send reply");
                Outcome::SendFailed
            }
        }
    }
}
