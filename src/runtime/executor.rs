//! Conversation event dispatcher

use super::traits::StateStore;
use super::{BatchOutcome, DispatchError, EventBatch, EventOutcome};
use crate::catalog::Catalog;
use crate::state_machine::{transition, ConversationState, Effect, Event, OutboundMessage};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// Work collected while executing one event's effects
#[derive(Default)]
struct Pending {
    persist: bool,
    reply: Option<OutboundMessage>,
}

/// Generic dispatcher that can work with any storage and catalog implementation
pub struct Dispatcher<S, C>
where
    S: StateStore,
    C: Catalog,
{
    store: S,
    catalog: C,
    /// Serializes read-modify-write of one user's state across concurrent batches
    user_locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl<S, C> Dispatcher<S, C>
where
    S: StateStore,
    C: Catalog,
{
    pub fn new(store: S, catalog: C) -> Self {
        Self {
            store,
            catalog,
            user_locks: Mutex::new(HashMap::new()),
        }
    }

    #[allow(dead_code)] // Useful for tests
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Handle every event of a batch in order.
    ///
    /// The first failure aborts the rest of the batch; events handled before
    /// it keep their persisted state.
    pub async fn handle_batch(&self, batch: EventBatch) -> Result<BatchOutcome, DispatchError> {
        let mut outcomes = Vec::with_capacity(batch.events.len());

        for user_event in batch.events {
            let outcome = match user_event.user_id {
                Some(user_id) => self.handle_event(&user_id, user_event.event).await?,
                None => {
                    tracing::debug!(event = user_event.event.kind(), "Ignoring event without user");
                    EventOutcome::NoAction
                }
            };
            outcomes.push(outcome);
        }

        let outcome = BatchOutcome {
            reply_token: batch.reply_token,
            outcomes,
        };
        if outcome.dropped() > 0 {
            tracing::warn!(
                dropped = outcome.dropped(),
                "Batch produced more replies than its token can carry; sending the last one"
            );
        }
        Ok(outcome)
    }

    /// Handle a single event for a user and return the reply it produced.
    ///
    /// State is written once, after every effect of the event succeeded, so a
    /// failed catalog call leaves the stored state untouched.
    pub async fn handle_event(&self, user_id: &str, event: Event) -> Result<EventOutcome, DispatchError> {
        let lock = self.user_lock(user_id);
        let _guard = lock.lock().await;

        let mut state = self
            .store
            .get(user_id)
            .await
            .map_err(DispatchError::Store)?
            .unwrap_or_else(|| ConversationState::new(user_id));
        let initial_step = state.step();

        tracing::debug!(user_id = %user_id, event = event.kind(), step = ?initial_step, "Handling event");

        let mut pending = Pending::default();
        // Effects can chain catalog results back in as events
        let mut events_to_process = vec![event];

        while let Some(current_event) = events_to_process.pop() {
            let result = transition(&state.search, current_event)?;
            state.search = result.new_state;

            for effect in result.effects {
                if let Some(generated_event) = self.execute_effect(effect, &mut pending).await? {
                    events_to_process.push(generated_event);
                }
            }
        }

        if pending.persist {
            self.store.upsert(&state).await.map_err(DispatchError::Store)?;
            tracing::info!(
                user_id = %user_id,
                from = ?initial_step,
                to = ?state.step(),
                "Conversation state updated"
            );
        }

        Ok(pending
            .reply
            .map_or(EventOutcome::NoAction, EventOutcome::Reply))
    }

    async fn execute_effect(
        &self,
        effect: Effect,
        pending: &mut Pending,
    ) -> Result<Option<Event>, DispatchError> {
        match effect {
            Effect::PersistState => {
                pending.persist = true;
                Ok(None)
            }
            Effect::FetchGenres => {
                let genres = self.catalog.fetch_genres().await?;
                Ok(Some(Event::GenresFetched { genres }))
            }
            Effect::FetchBudgetBands { amount, defaulted } => {
                if defaulted {
                    tracing::warn!("Budget text held no number, searching with 0");
                }
                let bands = self.catalog.fetch_budget_bands().await?;
                Ok(Some(Event::BudgetBandsFetched { amount, bands }))
            }
            Effect::SearchCandidates { query } => {
                let stores = self.catalog.fetch_candidates(&query).await?;
                Ok(Some(Event::CandidatesFetched { stores }))
            }
            Effect::Reply { message } => {
                pending.reply = Some(message);
                Ok(None)
            }
        }
    }

    /// Get the lock guarding a user's state, dropping locks nobody holds
    fn user_lock(&self, user_id: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self
            .user_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        locks
            .entry(user_id.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }
}
