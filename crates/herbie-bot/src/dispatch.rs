//! Sequential update loop: poll, handle one message, reply, repeat.

use std::sync::Arc;
use std::time::Duration;

use herbie_processing::IntakePipeline;

use crate::telegram::{TelegramClient, Update};

/// Pause after a failed poll before trying again.
const POLL_ERROR_DELAY: Duration = Duration::from_secs(5);

pub struct Dispatcher {
    client: Arc<TelegramClient>,
    pipeline: IntakePipeline,
    offset: Option<i64>,
}

impl Dispatcher {
    pub fn new(client: Arc<TelegramClient>, pipeline: IntakePipeline) -> Self {
        Self {
            client,
            pipeline,
            offset: None,
        }
    }

    /// Poll forever. Errors are logged and never end the loop.
    pub async fn run(&mut self) {
        tracing::info!("Polling for updates");
        loop {
            match self.client.get_updates(self.offset).await {
                Ok(updates) => {
                    for update in updates {
                        self.offset = Some(next_offset(self.offset, &update));
                        self.handle_update(update).await;
                    }
                }
                Err(e) => {
                    tracing::error!(error = %format!("{:#}", e), "Polling failed");
                    tokio::time::sleep(POLL_ERROR_DELAY).await;
                }
            }
        }
    }

    async fn handle_update(&self, update: Update) {
        let Some(message) = update.message else {
            tracing::debug!(update_id = update.update_id, "Ignoring update without message");
            return;
        };
        let Some(inbound) = message.to_inbound() else {
            tracing::debug!(message_id = message.message_id, "Ignoring unsupported message");
            return;
        };

        let outcome = self.pipeline.handle(&inbound).await;
        let reply = outcome.reply_text();

        if let Err(e) = self.client.send_message(message.chat.id, &reply).await {
            tracing::error!(
                chat_id = message.chat.id,
                error = %format!("{:#}", e),
                "Failed to send reply"
            );
        }
    }
}

/// Offset acknowledging `update` and everything before it.
fn next_offset(current: Option<i64>, update: &Update) -> i64 {
    let next = update.update_id + 1;
    current.map_or(next, |offset| offset.max(next))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update(update_id: i64) -> Update {
        Update {
            update_id,
            message: None,
        }
    }

    #[test]
    fn test_next_offset() {
        assert_eq!(next_offset(None, &update(10)), 11);
        assert_eq!(next_offset(Some(11), &update(11)), 12);
        // never moves backwards
        assert_eq!(next_offset(Some(20), &update(11)), 20);
    }
}
