pub mod message;

pub use message::{extension_for_mime, DocumentFile, InboundMessage, MessagePayload, PhotoSize};
