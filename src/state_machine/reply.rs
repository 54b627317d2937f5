//! Outbound message descriptors
//!
//! Platform-neutral shapes of what the bot says back. The chat platform
//! adapter renders them into its own wire format.

use crate::catalog::{CandidateStore, Genre};
use serde::{Deserialize, Serialize};

/// The chat platform accepts at most four buttons per template
pub const MAX_BUTTON_OPTIONS: usize = 4;

pub const GENRE_MENU_ALT_TEXT: &str = "希望ジャンル選択";
pub const GENRE_MENU_TEXT: &str = "ご希望のジャンルを選択してください";
pub const ASK_BUDGET_TEXT: &str = "次に予算を入力してください。";
pub const ASK_BUDGET_AGAIN_TEXT: &str =
    "ご予算に合う条件が見つかりませんでした。もう一度予算を入力してください。";
pub const NOT_FOUND_TEXT: &str = "お店が見つかりませんでした。";
pub const SHARE_LOCATION_TEXT: &str = "お店をお探しの場合は始めに位置情報を送信してください。";
pub const CAROUSEL_ALT_TEXT: &str = "周辺の飲食店情報を表示";
pub const DETAIL_LINK_LABEL: &str = "お店の詳細を確認する";

/// A selectable option whose `data` comes back in a postback
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonOption {
    pub label: String,
    pub data: String,
}

/// An external link action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkAction {
    pub label: String,
    pub uri: String,
}

/// One card of a carousel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarouselCard {
    pub title: String,
    pub subtitle: String,
    pub image_url: String,
    pub link: LinkAction,
}

/// A message the bot sends back for one event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundMessage {
    Text {
        text: String,
    },
    Buttons {
        alt_text: String,
        text: String,
        options: Vec<ButtonOption>,
    },
    Carousel {
        alt_text: String,
        cards: Vec<CarouselCard>,
    },
}

impl OutboundMessage {
    pub fn text(text: impl Into<String>) -> Self {
        OutboundMessage::Text { text: text.into() }
    }

    /// Genre selection menu.
    ///
    /// Keeps the catalog entries at indices 0, 1, 3 and 4: index 2 is skipped
    /// and nothing past index 4 is offered, which keeps the menu within
    /// [`MAX_BUTTON_OPTIONS`].
    pub fn genre_menu(genres: &[Genre]) -> Self {
        let options = genres
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != 2 && *i < 5)
            .map(|(_, genre)| ButtonOption {
                label: genre.name.clone(),
                data: genre.code.clone(),
            })
            .collect::<Vec<_>>();
        debug_assert!(options.len() <= MAX_BUTTON_OPTIONS);

        OutboundMessage::Buttons {
            alt_text: GENRE_MENU_ALT_TEXT.to_string(),
            text: GENRE_MENU_TEXT.to_string(),
            options,
        }
    }

    /// One card per store with a single link to its detail page
    pub fn store_carousel(stores: &[CandidateStore]) -> Self {
        let cards = stores
            .iter()
            .map(|store| CarouselCard {
                title: store.name.clone(),
                subtitle: store.address.clone(),
                image_url: store.logo_image_url.clone(),
                link: LinkAction {
                    label: DETAIL_LINK_LABEL.to_string(),
                    uri: store.detail_url.clone(),
                },
            })
            .collect();

        OutboundMessage::Carousel {
            alt_text: CAROUSEL_ALT_TEXT.to_string(),
            cards,
        }
    }
}
