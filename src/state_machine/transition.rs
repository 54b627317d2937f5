//! Pure state transition function
//!
//! Given the same state and event this always produces the same result; all
//! catalog access and persistence is requested through effects.

use super::reply::{OutboundMessage, ASK_BUDGET_AGAIN_TEXT, ASK_BUDGET_TEXT, NOT_FOUND_TEXT, SHARE_LOCATION_TEXT};
use super::{Effect, Event, SearchState};
use crate::budget::{match_budget_code, parse_amount};
use crate::catalog::SearchQuery;
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: SearchState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: SearchState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    /// The reply among the effects, if any
    pub fn reply(&self) -> Option<&OutboundMessage> {
        self.effects.iter().find_map(|effect| match effect {
            Effect::Reply { message } => Some(message),
            _ => None,
        })
    }
}

/// Errors that can occur during transition
#[derive(Debug, Error, PartialEq)]
pub enum TransitionError {
    #[error("Invalid transition: {event} in step {step:?}")]
    InvalidTransition {
        step: super::Step,
        event: String,
    },
}

/// Pure transition function
pub fn transition(state: &SearchState, event: Event) -> Result<TransitionResult, TransitionError> {
    match (state, event) {
        // ============================================================
        // Location: restarts the flow from any step
        // ============================================================
        (_, Event::LocationShared { location }) => {
            Ok(TransitionResult::new(SearchState::AwaitingGenre { location })
                .with_effect(Effect::PersistState)
                .with_effect(Effect::FetchGenres))
        }

        (SearchState::AwaitingGenre { .. }, Event::GenresFetched { genres }) => {
            Ok(TransitionResult::new(state.clone())
                .with_effect(Effect::reply(OutboundMessage::genre_menu(&genres))))
        }

        // ============================================================
        // Genre selection
        // ============================================================

        // Without a location there is nothing to search around yet
        (SearchState::New, Event::GenreSelected { .. }) => Ok(TransitionResult::new(SearchState::New)
            .with_effect(Effect::reply_text(SHARE_LOCATION_TEXT))),

        // A later selection replaces the genre and asks for the budget again
        (
            SearchState::AwaitingGenre { location }
            | SearchState::AwaitingBudget { location, .. }
            | SearchState::Ready { location, .. },
            Event::GenreSelected { code },
        ) => Ok(TransitionResult::new(SearchState::AwaitingBudget {
            location: *location,
            genre: code,
        })
        .with_effect(Effect::PersistState)
        .with_effect(Effect::reply_text(ASK_BUDGET_TEXT))),

        // ============================================================
        // Budget entry
        // ============================================================
        (SearchState::AwaitingBudget { .. }, Event::TextReceived { text }) => {
            let parsed = parse_amount(&text);
            Ok(
                TransitionResult::new(state.clone()).with_effect(Effect::FetchBudgetBands {
                    amount: parsed.unwrap_or(0),
                    defaulted: parsed.is_none(),
                }),
            )
        }

        (_, Event::TextReceived { .. }) => Ok(TransitionResult::new(state.clone())
            .with_effect(Effect::reply_text(SHARE_LOCATION_TEXT))),

        (SearchState::AwaitingBudget { location, genre }, Event::BudgetBandsFetched { amount, bands }) => {
            match match_budget_code(amount, &bands) {
                Some(code) => {
                    let query = SearchQuery::new(*location, genre.clone(), code);
                    Ok(TransitionResult::new(SearchState::Ready {
                        location: *location,
                        genre: genre.clone(),
                        budget: code.to_string(),
                    })
                    .with_effect(Effect::PersistState)
                    .with_effect(Effect::SearchCandidates { query }))
                }
                None => Ok(TransitionResult::new(state.clone())
                    .with_effect(Effect::reply_text(ASK_BUDGET_AGAIN_TEXT))),
            }
        }

        // ============================================================
        // Search results
        // ============================================================
        (SearchState::Ready { .. }, Event::CandidatesFetched { stores }) if stores.is_empty() => {
            Ok(TransitionResult::new(SearchState::New)
                .with_effect(Effect::PersistState)
                .with_effect(Effect::reply_text(NOT_FOUND_TEXT)))
        }

        (SearchState::Ready { .. }, Event::CandidatesFetched { stores }) => {
            Ok(TransitionResult::new(state.clone())
                .with_effect(Effect::reply(OutboundMessage::store_carousel(&stores))))
        }

        // ============================================================
        // Everything else
        // ============================================================
        (_, Event::Unsupported { .. }) => Ok(TransitionResult::new(state.clone())),

        (_, event) => Err(TransitionError::InvalidTransition {
            step: state.step(),
            event: event.kind().to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::BudgetBand;
    use crate::catalog::{CandidateStore, Genre, Location};
    use crate::state_machine::Step;

    fn here() -> Location {
        Location::new(35.0, 139.0)
    }

    fn awaiting_budget() -> SearchState {
        SearchState::AwaitingBudget {
            location: here(),
            genre: "G001".to_string(),
        }
    }

    fn ready() -> SearchState {
        SearchState::Ready {
            location: here(),
            genre: "G001".to_string(),
            budget: "B002".to_string(),
        }
    }

    fn store(name: &str) -> CandidateStore {
        CandidateStore {
            name: name.to_string(),
            address: "address".to_string(),
            logo_image_url: "https://example.com/logo.png".to_string(),
            detail_url: format!("https://example.com/{name}"),
        }
    }

    #[test]
    fn test_location_from_new_requests_genres() {
        let result = transition(&SearchState::New, Event::LocationShared { location: here() }).unwrap();
        assert_eq!(result.new_state, SearchState::AwaitingGenre { location: here() });
        assert_eq!(result.effects, vec![Effect::PersistState, Effect::FetchGenres]);
    }

    #[test]
    fn test_location_restarts_from_ready() {
        let moved = Location::new(34.7, 135.5);
        let result = transition(&ready(), Event::LocationShared { location: moved }).unwrap();
        assert_eq!(result.new_state, SearchState::AwaitingGenre { location: moved });
    }

    #[test]
    fn test_genres_fetched_builds_menu() {
        let state = SearchState::AwaitingGenre { location: here() };
        let genres = vec![Genre::new("G001", "居酒屋"), Genre::new("G002", "バー")];
        let result = transition(&state, Event::GenresFetched { genres }).unwrap();
        assert_eq!(result.new_state, state);
        assert!(matches!(result.reply(), Some(OutboundMessage::Buttons { options, .. }) if options.len() == 2));
    }

    #[test]
    fn test_genre_selection_asks_for_budget() {
        let state = SearchState::AwaitingGenre { location: here() };
        let result = transition(&state, Event::GenreSelected { code: "G001".to_string() }).unwrap();
        assert_eq!(result.new_state, awaiting_budget());
        assert_eq!(result.reply(), Some(&OutboundMessage::text(ASK_BUDGET_TEXT)));
        assert!(result.effects.contains(&Effect::PersistState));
    }

    #[test]
    fn test_genre_selection_without_location_asks_for_location() {
        let result =
            transition(&SearchState::New, Event::GenreSelected { code: "G001".to_string() }).unwrap();
        assert_eq!(result.new_state, SearchState::New);
        assert_eq!(result.reply(), Some(&OutboundMessage::text(SHARE_LOCATION_TEXT)));
        assert!(!result.effects.contains(&Effect::PersistState));
    }

    #[test]
    fn test_reselecting_genre_drops_budget() {
        let result = transition(&ready(), Event::GenreSelected { code: "G005".to_string() }).unwrap();
        assert_eq!(
            result.new_state,
            SearchState::AwaitingBudget {
                location: here(),
                genre: "G005".to_string(),
            }
        );
    }

    #[test]
    fn test_budget_text_requests_bands() {
        let result = transition(&awaiting_budget(), Event::TextReceived { text: "3000".to_string() }).unwrap();
        assert_eq!(result.new_state, awaiting_budget());
        assert_eq!(
            result.effects,
            vec![Effect::FetchBudgetBands {
                amount: 3000,
                defaulted: false
            }]
        );
    }

    #[test]
    fn test_non_numeric_budget_reads_as_zero() {
        let result =
            transition(&awaiting_budget(), Event::TextReceived { text: "安いところ".to_string() }).unwrap();
        assert_eq!(
            result.effects,
            vec![Effect::FetchBudgetBands {
                amount: 0,
                defaulted: true
            }]
        );
    }

    #[test]
    fn test_text_outside_budget_step_asks_for_location() {
        for state in [SearchState::New, SearchState::AwaitingGenre { location: here() }, ready()] {
            let result = transition(&state, Event::TextReceived { text: "hello".to_string() }).unwrap();
            assert_eq!(result.new_state, state);
            assert_eq!(result.effects, vec![Effect::reply_text(SHARE_LOCATION_TEXT)]);
        }
    }

    #[test]
    fn test_matched_budget_searches() {
        let bands = vec![
            BudgetBand::new(None, Some(2000), "B001"),
            BudgetBand::new(Some(2000), Some(3000), "B002"),
            BudgetBand::new(Some(3000), None, "B003"),
        ];
        let result = transition(
            &awaiting_budget(),
            Event::BudgetBandsFetched { amount: 3000, bands },
        )
        .unwrap();
        assert_eq!(result.new_state, ready());
        assert_eq!(
            result.effects,
            vec![
                Effect::PersistState,
                Effect::SearchCandidates {
                    query: SearchQuery::new(here(), "G001", "B002"),
                },
            ]
        );
    }

    #[test]
    fn test_unmatched_budget_asks_again() {
        let bands = vec![BudgetBand::new(Some(1000), Some(2000), "B001")];
        let result = transition(
            &awaiting_budget(),
            Event::BudgetBandsFetched { amount: 10, bands },
        )
        .unwrap();
        assert_eq!(result.new_state, awaiting_budget());
        assert_eq!(result.effects, vec![Effect::reply_text(ASK_BUDGET_AGAIN_TEXT)]);
    }

    #[test]
    fn test_candidates_build_carousel() {
        let stores = vec![store("a"), store("b")];
        let result = transition(&ready(), Event::CandidatesFetched { stores }).unwrap();
        assert_eq!(result.new_state, ready());
        assert!(matches!(result.reply(), Some(OutboundMessage::Carousel { cards, .. }) if cards.len() == 2));
    }

    #[test]
    fn test_no_candidates_resets() {
        let result = transition(&ready(), Event::CandidatesFetched { stores: vec![] }).unwrap();
        assert_eq!(result.new_state, SearchState::New);
        assert_eq!(
            result.effects,
            vec![Effect::PersistState, Effect::reply_text(NOT_FOUND_TEXT)]
        );
    }

    #[test]
    fn test_unsupported_is_a_no_op() {
        for state in [SearchState::New, awaiting_budget(), ready()] {
            let result = transition(&state, Event::Unsupported { kind: "sticker".to_string() }).unwrap();
            assert_eq!(result.new_state, state);
            assert!(result.effects.is_empty());
        }
    }

    #[test]
    fn test_catalog_results_out_of_step_are_rejected() {
        let err = transition(&SearchState::New, Event::CandidatesFetched { stores: vec![store("a")] })
            .unwrap_err();
        assert_eq!(
            err,
            TransitionError::InvalidTransition {
                step: Step::New,
                event: "candidates_fetched".to_string(),
            }
        );
        assert!(transition(&ready(), Event::GenresFetched { genres: vec![] }).is_err());
        assert!(transition(
            &SearchState::New,
            Event::BudgetBandsFetched { amount: 1, bands: vec![] }
        )
        .is_err());
    }
}
