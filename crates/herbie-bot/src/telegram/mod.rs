//! Telegram Bot API adapter

mod client;
mod types;

pub use client::TelegramClient;
pub use types::{ApiResponse, Chat, Document, File, Message, PhotoSize, Update, User, Video};
