//! HerbieBot: receives pictures over Telegram and archives them.
//!
//! The Telegram specifics stay in [`telegram`]; everything past the
//! conversion to an [`herbie_core::InboundMessage`] is transport-neutral.

pub mod dispatch;
pub mod shutdown;
pub mod telegram;

pub use dispatch::Dispatcher;
pub use shutdown::{ShutdownReason, ShutdownSignal};
pub use telegram::TelegramClient;
