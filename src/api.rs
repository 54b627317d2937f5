//! HTTP API for the bot
//!
//! Webhook intake plus operational endpoints.

mod handlers;
mod types;

pub use handlers::create_router;

use crate::catalog::Catalog;
use crate::line::ReplySender;
use crate::runtime::{Dispatcher, StateStore};
use std::sync::Arc;

pub type SharedDispatcher = Dispatcher<Arc<dyn StateStore>, Arc<dyn Catalog>>;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<SharedDispatcher>,
    pub replier: Arc<dyn ReplySender>,
    pub channel_secret: Arc<str>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn StateStore>,
        catalog: Arc<dyn Catalog>,
        replier: Arc<dyn ReplySender>,
        channel_secret: &str,
    ) -> Self {
        Self {
            dispatcher: Arc::new(Dispatcher::new(store, catalog)),
            replier,
            channel_secret: Arc::from(channel_secret),
        }
    }
}
