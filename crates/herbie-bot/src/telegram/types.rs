//! Wire types for the subset of the Bot API the service uses.

use serde::{Deserialize, Serialize};

use herbie_core::models::{self, InboundMessage, MessagePayload};

/// Envelope of every Bot API response
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
    pub error_code: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    pub from: Option<User>,
    pub forward_origin: Option<MessageOrigin>,
    /// Pre-7.0 forward author, still sent by some servers
    pub forward_from: Option<User>,
    pub text: Option<String>,
    pub document: Option<Document>,
    pub photo: Option<Vec<PhotoSize>>,
    pub video: Option<Video>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
}

/// Origin of a forwarded message. Only user origins carry a username.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageOrigin {
    #[serde(rename = "type")]
    pub origin_type: String,
    pub sender_user: Option<User>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    pub file_id: String,
    pub mime_type: Option<String>,
    pub file_size: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PhotoSize {
    pub file_id: String,
    pub width: u32,
    pub height: u32,
    pub file_size: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Video {
    pub file_id: String,
}

/// Result of `getFile`
#[derive(Debug, Clone, Deserialize)]
pub struct File {
    pub file_id: String,
    pub file_size: Option<u64>,
    pub file_path: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct SendMessage<'a> {
    pub chat_id: i64,
    pub text: &'a str,
}

impl Message {
    /// Username of the original author for forwarded messages, else of the sender.
    pub fn sender_username(&self) -> Option<String> {
        let username = |user: Option<&User>| user.and_then(|u| u.username.clone());

        username(
            self.forward_origin
                .as_ref()
                .and_then(|origin| origin.sender_user.as_ref()),
        )
        .or_else(|| username(self.forward_from.as_ref()))
        .or_else(|| username(self.from.as_ref()))
    }

    fn is_start_command(&self) -> bool {
        self.text.as_deref().is_some_and(|text| {
            let command = text.split_whitespace().next().unwrap_or("");
            command == "/start" || command.starts_with("/start@")
        })
    }

    /// Convert to the transport-neutral form; `None` for messages the service ignores.
    pub fn to_inbound(&self) -> Option<InboundMessage> {
        let payload = if self.is_start_command() {
            MessagePayload::Start
        } else if let Some(document) = &self.document {
            MessagePayload::Document(models::DocumentFile {
                file_id: document.file_id.clone(),
                mime_type: document.mime_type.clone(),
                file_size: document.file_size,
            })
        } else if let Some(photo) = self.photo.as_ref().filter(|p| !p.is_empty()) {
            MessagePayload::PhotoSet(
                photo
                    .iter()
                    .map(|size| models::PhotoSize {
                        file_id: size.file_id.clone(),
                        width: size.width,
                        height: size.height,
                        file_size: size.file_size,
                    })
                    .collect(),
            )
        } else if self.video.is_some() {
            MessagePayload::Video
        } else {
            return None;
        };

        Some(InboundMessage::new(self.sender_username(), payload))
    }
}
