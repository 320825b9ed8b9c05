//! Message payloads shared by group chat and customer service sends
//!
//! Both `/cgi-bin/chat/send` and `/cgi-bin/kf/send` carry the message as a
//! `msgtype` discriminator plus an object named after it:
//!
//! ```json
//! {"msgtype": "text", "text": {"content": "hello"}}
//! {"msgtype": "image", "image": {"media_id": "MEDIA_ID"}}
//! ```

use serde::Serialize;

/// Message types accepted by the chat and customer service send endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "msgtype", rename_all = "lowercase")]
pub enum Message {
    /// Text message
    Text { text: TextMessage },
    /// Image message
    Image { image: MediaMessage },
    /// File message
    File { file: MediaMessage },
    /// Voice message
    Voice { voice: MediaMessage },
}

impl Message {
    pub fn text(content: impl Into<String>) -> Self {
        Message::Text {
            text: TextMessage::new(content),
        }
    }

    pub fn image(media_id: impl Into<String>) -> Self {
        Message::Image {
            image: MediaMessage::new(media_id),
        }
    }

    pub fn file(media_id: impl Into<String>) -> Self {
        Message::File {
            file: MediaMessage::new(media_id),
        }
    }

    pub fn voice(media_id: impl Into<String>) -> Self {
        Message::Voice {
            voice: MediaMessage::new(media_id),
        }
    }

    /// Value of the `msgtype` field
    pub fn msgtype(&self) -> &'static str {
        match self {
            Message::Text { .. } => "text",
            Message::Image { .. } => "image",
            Message::File { .. } => "file",
            Message::Voice { .. } => "voice",
        }
    }
}

/// Text message content
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextMessage {
    /// Message content
    pub content: String,
}

impl TextMessage {
    /// Create a new text message
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// Media message content (image, file, voice)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaMessage {
    /// Media ID from the media upload API
    pub media_id: String,
}

impl MediaMessage {
    /// Create a new media message
    pub fn new(media_id: impl Into<String>) -> Self {
        Self {
            media_id: media_id.into(),
        }
    }
}
