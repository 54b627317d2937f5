//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::reply::OutboundMessage;
use super::*;
use crate::budget::BudgetBand;
use crate::catalog::{CandidateStore, Genre, Location};
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_location() -> impl Strategy<Value = Location> {
    (-90.0f64..90.0, -180.0f64..180.0).prop_map(|(lat, lng)| Location::new(lat, lng))
}

fn arb_code() -> impl Strategy<Value = String> {
    "[A-Z][0-9]{3}"
}

fn arb_genre() -> impl Strategy<Value = Genre> {
    (arb_code(), "[a-z]{1,10}").prop_map(|(code, name)| Genre::new(code, name))
}

fn arb_store() -> impl Strategy<Value = CandidateStore> {
    ("[a-z]{1,12}", "[a-z ]{1,20}").prop_map(|(name, address)| CandidateStore {
        detail_url: format!("https://example.com/{name}"),
        logo_image_url: format!("https://example.com/{name}.png"),
        name,
        address,
    })
}

fn arb_band_table() -> impl Strategy<Value = Vec<BudgetBand>> {
    proptest::collection::btree_set(1i64..50_000, 1..6).prop_map(|bounds| {
        let mut bands = Vec::new();
        let mut lower = None;
        for (i, upper) in bounds.into_iter().enumerate() {
            bands.push(BudgetBand::new(lower, Some(upper), format!("B{i:03}")));
            lower = Some(upper);
        }
        bands.push(BudgetBand::new(lower, None, "BTOP"));
        bands
    })
}

fn arb_platform_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        arb_location().prop_map(|location| Event::LocationShared { location }),
        arb_code().prop_map(|code| Event::GenreSelected { code }),
        "[a-z0-9]{0,8}".prop_map(|text| Event::TextReceived { text }),
        Just(Event::Unsupported {
            kind: "sticker".to_string()
        }),
    ]
}

fn arb_catalog_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        proptest::collection::vec(arb_genre(), 0..20).prop_map(|genres| Event::GenresFetched { genres }),
        (0i64..60_000, arb_band_table())
            .prop_map(|(amount, bands)| Event::BudgetBandsFetched { amount, bands }),
        proptest::collection::vec(arb_store(), 0..4)
            .prop_map(|stores| Event::CandidatesFetched { stores }),
    ]
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![3 => arb_platform_event(), 2 => arb_catalog_event()]
}

fn arb_state() -> impl Strategy<Value = SearchState> {
    prop_oneof![
        Just(SearchState::New),
        arb_location().prop_map(|location| SearchState::AwaitingGenre { location }),
        (arb_location(), arb_code())
            .prop_map(|(location, genre)| SearchState::AwaitingBudget { location, genre }),
        (arb_location(), arb_code(), arb_code()).prop_map(|(location, genre, budget)| {
            SearchState::Ready {
                location,
                genre,
                budget,
            }
        }),
    ]
}

fn is_restart(event: &Event) -> bool {
    matches!(
        event,
        Event::LocationShared { .. } | Event::GenreSelected { .. }
    )
}

fn is_empty_result(event: &Event) -> bool {
    matches!(event, Event::CandidatesFetched { stores } if stores.is_empty())
}

fn reply_count(effects: &[Effect]) -> usize {
    effects
        .iter()
        .filter(|e| matches!(e, Effect::Reply { .. }))
        .count()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // Step only goes back when the user restarts part of the flow or a
    // search comes back empty.
    #[test]
    fn prop_step_decreases_only_on_restart_or_reset(
        events in proptest::collection::vec(arb_event(), 0..30)
    ) {
        let mut state = SearchState::New;
        for event in events {
            let restart = is_restart(&event);
            let empty = is_empty_result(&event);
            if let Ok(result) = transition(&state, event) {
                if result.new_state.step() < state.step() {
                    prop_assert!(
                        restart || (empty && result.new_state == SearchState::New),
                        "step went from {:?} to {:?}",
                        state.step(),
                        result.new_state.step()
                    );
                }
                state = result.new_state;
            }
        }
    }

    #[test]
    fn prop_every_state_change_is_persisted(state in arb_state(), event in arb_event()) {
        if let Ok(result) = transition(&state, event) {
            if result.new_state != state {
                prop_assert!(result.effects.contains(&Effect::PersistState));
            }
        }
    }

    #[test]
    fn prop_at_most_one_reply_per_transition(state in arb_state(), event in arb_event()) {
        if let Ok(result) = transition(&state, event) {
            prop_assert!(reply_count(&result.effects) <= 1);
        }
    }

    #[test]
    fn prop_location_reshare_keeps_latest(
        state in arb_state(),
        first in arb_location(),
        second in arb_location(),
    ) {
        let after_first = transition(&state, Event::LocationShared { location: first }).unwrap();
        let after_second =
            transition(&after_first.new_state, Event::LocationShared { location: second }).unwrap();
        prop_assert_eq!(after_second.new_state.step(), Step::AwaitingGenre);
        prop_assert_eq!(after_second.new_state.location(), Some(second));
    }

    #[test]
    fn prop_genre_menu_has_four_options(
        location in arb_location(),
        genres in proptest::collection::vec(arb_genre(), 5..30),
    ) {
        let state = SearchState::AwaitingGenre { location };
        let result = transition(&state, Event::GenresFetched { genres: genres.clone() }).unwrap();
        let Some(OutboundMessage::Buttons { options, .. }) = result.reply() else {
            return Err(TestCaseError::fail("expected a button menu"));
        };
        let offered: Vec<&str> = options.iter().map(|o| o.data.as_str()).collect();
        let expected: Vec<&str> = [0usize, 1, 3, 4].iter().map(|i| genres[*i].code.as_str()).collect();
        prop_assert_eq!(offered, expected);
    }

    #[test]
    fn prop_unsupported_never_changes_anything(state in arb_state(), kind in "[a-z]{1,10}") {
        let result = transition(&state, Event::Unsupported { kind }).unwrap();
        prop_assert_eq!(result.new_state, state);
        prop_assert!(result.effects.is_empty());
    }

    // Walking the happy path always ends in Ready with one card per store.
    #[test]
    fn prop_full_flow_reaches_ready(
        location in arb_location(),
        genre in arb_code(),
        amount in 0i64..60_000,
        bands in arb_band_table(),
        stores in proptest::collection::vec(arb_store(), 1..10),
    ) {
        let mut state = SearchState::New;
        let steps = [
            Event::LocationShared { location },
            Event::GenreSelected { code: genre.clone() },
            Event::TextReceived { text: amount.to_string() },
            Event::BudgetBandsFetched { amount, bands },
        ];
        for event in steps {
            state = transition(&state, event).unwrap().new_state;
        }
        prop_assert_eq!(state.step(), Step::Ready);
        prop_assert_eq!(state.genre(), Some(genre.as_str()));

        let result = transition(&state, Event::CandidatesFetched { stores: stores.clone() }).unwrap();
        prop_assert_eq!(&result.new_state, &state);
        let Some(OutboundMessage::Carousel { cards, .. }) = result.reply() else {
            return Err(TestCaseError::fail("expected a carousel"));
        };
        prop_assert_eq!(cards.len(), stores.len());
    }
}
