//! Events that can occur in a conversation

use crate::budget::BudgetBand;
use crate::catalog::{CandidateStore, Genre, Location};

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    // Chat platform events
    LocationShared {
        location: Location,
    },
    /// A postback from the genre menu
    GenreSelected {
        code: String,
    },
    TextReceived {
        text: String,
    },
    /// Anything the bot does not react to (stickers, follows, images...)
    Unsupported {
        kind: String,
    },

    // Catalog results
    GenresFetched {
        genres: Vec<Genre>,
    },
    BudgetBandsFetched {
        amount: i64,
        bands: Vec<BudgetBand>,
    },
    CandidatesFetched {
        stores: Vec<CandidateStore>,
    },
}

impl Event {
    /// Short name for logging
    pub fn kind(&self) -> &str {
        match self {
            Event::LocationShared { .. } => "location_shared",
            Event::GenreSelected { .. } => "genre_selected",
            Event::TextReceived { .. } => "text_received",
            Event::Unsupported { kind } => kind,
            Event::GenresFetched { .. } => "genres_fetched",
            Event::BudgetBandsFetched { .. } => "budget_bands_fetched",
            Event::CandidatesFetched { .. } => "candidates_fetched",
        }
    }
}
