//! Core conversation state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions.

mod effect;
pub mod event;
pub mod reply;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::Event;
pub use reply::OutboundMessage;
pub use state::{ConversationState, SearchState, Step};
pub use transition::{transition, TransitionError, TransitionResult};
