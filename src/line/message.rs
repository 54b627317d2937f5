//! Rendering of outbound descriptors into Messaging API message objects

use crate::state_machine::reply::{ButtonOption, CarouselCard};
use crate::state_machine::OutboundMessage;
use serde::Serialize;

// Messaging API template limits, in characters
const MAX_ALT_TEXT: usize = 400;
const MAX_BUTTONS_TEXT: usize = 160;
const MAX_ACTION_LABEL: usize = 20;
const MAX_COLUMN_TITLE: usize = 40;
const MAX_COLUMN_TEXT: usize = 60;
const MAX_CAROUSEL_COLUMNS: usize = 10;

#[derive(Debug, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum LineMessage {
    Text {
        text: String,
    },
    #[serde(rename_all = "camelCase")]
    Template {
        alt_text: String,
        template: Template,
    },
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Template {
    Buttons {
        text: String,
        actions: Vec<Action>,
    },
    #[serde(rename_all = "camelCase")]
    Carousel {
        columns: Vec<Column>,
        image_aspect_ratio: String,
    },
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_image_url: Option<String>,
    pub title: String,
    pub text: String,
    pub actions: Vec<Action>,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Action {
    Postback { label: String, data: String },
    Uri { label: String, uri: String },
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

fn postback_action(option: &ButtonOption) -> Action {
    Action::Postback {
        label: truncate_chars(&option.label, MAX_ACTION_LABEL),
        data: option.data.clone(),
    }
}

fn column(card: &CarouselCard, with_thumbnail: bool) -> Column {
    Column {
        thumbnail_image_url: with_thumbnail.then(|| card.image_url.clone()),
        title: truncate_chars(&card.title, MAX_COLUMN_TITLE),
        text: truncate_chars(&card.subtitle, MAX_COLUMN_TEXT),
        actions: vec![Action::Uri {
            label: truncate_chars(&card.link.label, MAX_ACTION_LABEL),
            uri: card.link.uri.clone(),
        }],
    }
}

impl From<&OutboundMessage> for LineMessage {
    fn from(message: &OutboundMessage) -> Self {
        match message {
            OutboundMessage::Text { text } => LineMessage::Text { text: text.clone() },
            OutboundMessage::Buttons {
                alt_text,
                text,
                options,
            } => LineMessage::Template {
                alt_text: truncate_chars(alt_text, MAX_ALT_TEXT),
                template: Template::Buttons {
                    text: truncate_chars(text, MAX_BUTTONS_TEXT),
                    actions: options.iter().map(postback_action).collect(),
                },
            },
            OutboundMessage::Carousel { alt_text, cards } => {
                let cards = &cards[..cards.len().min(MAX_CAROUSEL_COLUMNS)];
                // Columns must agree on having a thumbnail, and empty URLs are rejected
                let with_thumbnail = cards.iter().all(|card| !card.image_url.is_empty());
                LineMessage::Template {
                    alt_text: truncate_chars(alt_text, MAX_ALT_TEXT),
                    template: Template::Carousel {
                        columns: cards.iter().map(|card| column(card, with_thumbnail)).collect(),
                        image_aspect_ratio: "square".to_string(),
                    },
                }
            }
        }
    }
}
