//! Effects produced by state transitions

use super::reply::OutboundMessage;
use crate::catalog::SearchQuery;

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Persist the new state once the event has been fully handled
    PersistState,

    /// Load the genre list for the selection menu
    FetchGenres,

    /// Load the budget table and resolve `amount` against it.
    /// `defaulted` is set when the user's text held no number.
    FetchBudgetBands { amount: i64, defaulted: bool },

    /// Search stores with the completed selections
    SearchCandidates { query: SearchQuery },

    /// Answer the user
    Reply { message: OutboundMessage },
}

impl Effect {
    pub fn reply(message: OutboundMessage) -> Self {
        Effect::Reply { message }
    }

    pub fn reply_text(text: impl Into<String>) -> Self {
        Effect::Reply {
            message: OutboundMessage::text(text),
        }
    }
}
