//! Runtime for dispatching conversation events
//!
//! Drives the pure state machine for each inbound event, executes the effects
//! it requests and persists the result.

mod executor;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use executor::Dispatcher;
pub use traits::*;

use crate::catalog::CatalogError;
use crate::state_machine::{Event, OutboundMessage, TransitionError};
use thiserror::Error;

/// One decoded platform event attributed to a user
#[derive(Debug, Clone)]
pub struct UserEvent {
    /// `None` for events the platform sends without a user source
    pub user_id: Option<String>,
    pub event: Event,
}

impl UserEvent {
    pub fn new(user_id: impl Into<String>, event: Event) -> Self {
        Self {
            user_id: Some(user_id.into()),
            event,
        }
    }
}

/// One webhook delivery: its events and the single reply token for them
#[derive(Debug, Clone, Default)]
pub struct EventBatch {
    pub reply_token: Option<String>,
    pub events: Vec<UserEvent>,
}

/// What handling one event produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    Reply(OutboundMessage),
    NoAction,
}

impl EventOutcome {
    pub fn message(&self) -> Option<&OutboundMessage> {
        match self {
            EventOutcome::Reply(message) => Some(message),
            EventOutcome::NoAction => None,
        }
    }
}

/// Outcomes of a batch, one per event, in delivery order.
///
/// A reply token is single-use and belongs to the batch rather than to an
/// event, so at most one of these messages can be delivered.
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    pub reply_token: Option<String>,
    pub outcomes: Vec<EventOutcome>,
}

impl BatchOutcome {
    /// The message that goes out with the batch's reply token: the last one
    /// any event produced. Earlier messages in the same batch are dropped.
    pub fn deliverable(&self) -> Option<(&str, &OutboundMessage)> {
        let token = self.reply_token.as_deref()?;
        let message = self.outcomes.iter().rev().find_map(EventOutcome::message)?;
        Some((token, message))
    }

    /// Number of produced messages that cannot be delivered
    pub fn dropped(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.message().is_some())
            .count()
            .saturating_sub(1)
    }
}

/// Errors that abort event handling
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Catalog request failed: {0}")]
    Catalog(#[from] CatalogError),
    #[error("State store failed: {0}")]
    Store(String),
    #[error(transparent)]
    Transition(#[from] TransitionError),
}
