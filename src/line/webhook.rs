//! Webhook request body types
//!
//! Decodes the platform's event batch into conversation events. Events the bot
//! does not react to decode to `Event::Unsupported` rather than failing.

use crate::catalog::Location;
use crate::runtime::{EventBatch, UserEvent};
use crate::state_machine::Event;
use serde::Deserialize;

/// Body of one webhook delivery
#[derive(Debug, Deserialize)]
pub struct WebhookBody {
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub events: Vec<WebhookEvent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub reply_token: Option<String>,
    #[serde(default)]
    pub source: Option<EventSource>,
    #[serde(default)]
    pub message: Option<MessageContent>,
    #[serde(default)]
    pub postback: Option<Postback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSource {
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageContent {
    Text {
        text: String,
    },
    Location {
        latitude: f64,
        longitude: f64,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
pub struct Postback {
    pub data: String,
}

impl WebhookEvent {
    fn user_id(&self) -> Option<String> {
        self.source.as_ref().and_then(|s| s.user_id.clone())
    }

    fn into_event(self) -> Event {
        match (self.kind.as_str(), self.message, self.postback) {
            ("message", Some(MessageContent::Location { latitude, longitude }), _) => {
                Event::LocationShared {
                    location: Location::new(latitude, longitude),
                }
            }
            ("message", Some(MessageContent::Text { text }), _) => Event::TextReceived { text },
            ("message", _, _) => Event::Unsupported {
                kind: "message".to_string(),
            },
            ("postback", _, Some(postback)) => Event::GenreSelected {
                code: postback.data,
            },
            (kind, _, _) => Event::Unsupported {
                kind: kind.to_string(),
            },
        }
    }
}

impl WebhookBody {
    /// Convert into a dispatchable batch.
    ///
    /// The batch's reply token is the last one any event carried.
    pub fn into_batch(self) -> EventBatch {
        let mut reply_token = None;
        let mut events = Vec::with_capacity(self.events.len());

        for event in self.events {
            if event.reply_token.is_some() {
                reply_token.clone_from(&event.reply_token);
            }
            let user_id = event.user_id();
            events.push(UserEvent {
                user_id,
                event: event.into_event(),
            });
        }

        EventBatch {
            reply_token,
            events,
        }
    }
}
