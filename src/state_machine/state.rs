//! Conversation state types

use crate::catalog::Location;
use serde::{Deserialize, Serialize};

/// Progress through the search flow, as stored and reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    New = 0,
    AwaitingGenre = 1,
    AwaitingBudget = 2,
    Ready = 3,
}

impl Step {
    pub fn as_i64(self) -> i64 {
        self as i64
    }

    pub fn from_i64(value: i64) -> Option<Self> {
        match value {
            0 => Some(Step::New),
            1 => Some(Step::AwaitingGenre),
            2 => Some(Step::AwaitingBudget),
            3 => Some(Step::Ready),
            _ => None,
        }
    }
}

/// Search progress for one user.
///
/// Each variant carries exactly the selections its step requires, so a state
/// such as "awaiting budget without a location" cannot be built.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SearchState {
    #[default]
    New,
    AwaitingGenre {
        location: Location,
    },
    AwaitingBudget {
        location: Location,
        genre: String,
    },
    Ready {
        location: Location,
        genre: String,
        budget: String,
    },
}

impl SearchState {
    pub fn step(&self) -> Step {
        match self {
            SearchState::New => Step::New,
            SearchState::AwaitingGenre { .. } => Step::AwaitingGenre,
            SearchState::AwaitingBudget { .. } => Step::AwaitingBudget,
            SearchState::Ready { .. } => Step::Ready,
        }
    }

    pub fn location(&self) -> Option<Location> {
        match self {
            SearchState::New => None,
            SearchState::AwaitingGenre { location }
            | SearchState::AwaitingBudget { location, .. }
            | SearchState::Ready { location, .. } => Some(*location),
        }
    }

    pub fn genre(&self) -> Option<&str> {
        match self {
            SearchState::AwaitingBudget { genre, .. } | SearchState::Ready { genre, .. } => {
                Some(genre)
            }
            _ => None,
        }
    }

    pub fn budget(&self) -> Option<&str> {
        match self {
            SearchState::Ready { budget, .. } => Some(budget),
            _ => None,
        }
    }

    /// Rebuild a state from its flat stored projection.
    ///
    /// Returns `None` when the fields do not match what the step requires.
    pub fn from_parts(
        step: Step,
        location: Option<Location>,
        genre: Option<String>,
        budget: Option<String>,
    ) -> Option<Self> {
        match (step, location, genre, budget) {
            (Step::New, _, _, _) => Some(SearchState::New),
            (Step::AwaitingGenre, Some(location), _, _) => {
                Some(SearchState::AwaitingGenre { location })
            }
            (Step::AwaitingBudget, Some(location), Some(genre), _) => {
                Some(SearchState::AwaitingBudget { location, genre })
            }
            (Step::Ready, Some(location), Some(genre), Some(budget)) => Some(SearchState::Ready {
                location,
                genre,
                budget,
            }),
            _ => None,
        }
    }
}

/// The stored conversation record for one chat user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationState {
    pub user_id: String,
    pub search: SearchState,
}

impl ConversationState {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            search: SearchState::New,
        }
    }

    pub fn with_search(user_id: impl Into<String>, search: SearchState) -> Self {
        Self {
            user_id: user_id.into(),
            search,
        }
    }

    pub fn step(&self) -> Step {
        self.search.step()
    }
}
