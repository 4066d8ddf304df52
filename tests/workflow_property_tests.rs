//! Property-based tests for the workflow state machine
//!
//! The controller has to keep its stage, loading flag, result list and error
//! channel coherent across any interleaving of input edits, submits and
//! lookup resolutions, including resolutions of superseded requests. Random
//! event sequences shake out interleavings that hand-written scenarios miss.

use address_workflow::{
    address::RawAddressRecord,
    book::MemoryAddressBook,
    error::LookupError,
    lookup::LookupQuery,
    workflow::{
        AddressWorkflow, FIRST_NAME, HOUSE_NUMBER, LAST_NAME, LookupDispatch, LookupOutcome,
        POST_CODE, WorkflowStage,
    },
};
use proptest::prelude::*;
use std::collections::VecDeque;

#[derive(Debug, Clone)]
enum Event {
    SetSearchFields { postcode: String, house_number: String },
    SubmitSearch,
    ResolveOldest { ok: bool },
    ResolveNewest { ok: bool },
    SelectCandidate(String),
    SetNames { first: String, last: String },
    SubmitPersonInfo,
    ClearAll,
}

fn event_strategy() -> impl Strategy<Value = Event> {
    prop_oneof![
        ("[0-9]{3,5}", "[0-9]{1,2}").prop_map(|(postcode, house_number)| {
            Event::SetSearchFields {
                postcode,
                house_number,
            }
        }),
        Just(Event::SubmitSearch),
        any::<bool>().prop_map(|ok| Event::ResolveOldest { ok }),
        any::<bool>().prop_map(|ok| Event::ResolveNewest { ok }),
        "[a-z0-9]{1,4}".prop_map(Event::SelectCandidate),
        ("[A-Za-z]{0,6}", "[A-Za-z]{0,6}").prop_map(|(first, last)| Event::SetNames {
            first,
            last,
        }),
        Just(Event::SubmitPersonInfo),
        Just(Event::ClearAll),
    ]
}

/// Deterministic canned response for a query, two candidates
fn canned_records(query: &LookupQuery) -> Vec<RawAddressRecord> {
    (0..2)
        .map(|i| RawAddressRecord {
            id: format!("{}-{}", query.postcode, i),
            street: "Keizersgracht".to_owned(),
            house_number: Some("999".to_owned()),
            city: "Amsterdam".to_owned(),
            postcode: query.postcode.clone(),
            lat: None,
            lon: None,
        })
        .collect()
}

fn outcome_for(dispatch: &LookupDispatch, ok: bool) -> LookupOutcome {
    if ok {
        Ok(canned_records(&dispatch.query))
    } else {
        Err(LookupError::NoResultsFound)
    }
}

fn apply(
    workflow: &mut AddressWorkflow,
    book: &mut MemoryAddressBook,
    outstanding: &mut VecDeque<LookupDispatch>,
    event: Event,
) {
    match event {
        Event::SetSearchFields {
            postcode,
            house_number,
        } => {
            workflow.set_fields([(POST_CODE, postcode.as_str()), (HOUSE_NUMBER, house_number.as_str())]);
        }
        Event::SubmitSearch => {
            if let Some(dispatch) = workflow.submit_search() {
                outstanding.push_back(dispatch);
            }
        }
        Event::ResolveOldest { ok } => {
            if let Some(dispatch) = outstanding.pop_front() {
                let outcome = outcome_for(&dispatch, ok);
                workflow.resolve_lookup(dispatch.token, outcome);
            }
        }
        Event::ResolveNewest { ok } => {
            if let Some(dispatch) = outstanding.pop_back() {
                let outcome = outcome_for(&dispatch, ok);
                workflow.resolve_lookup(dispatch.token, outcome);
            }
        }
        Event::SelectCandidate(id) => workflow.select_candidate(&id),
        Event::SetNames { first, last } => {
            workflow.set_fields([(FIRST_NAME, first.as_str()), (LAST_NAME, last.as_str())]);
        }
        Event::SubmitPersonInfo => {
            workflow.submit_person_info(book);
        }
        Event::ClearAll => workflow.clear_all(),
    }
}

proptest! {
    /// Property: after any event sequence the loading flag and the stage
    /// agree, a searching controller shows no results, and results only
    /// appear in the results stage
    #[test]
    fn prop_stage_loading_and_results_stay_coherent(
        events in proptest::collection::vec(event_strategy(), 1..40)
    ) {
        let mut workflow = AddressWorkflow::new();
        let mut book = MemoryAddressBook::new();
        let mut outstanding = VecDeque::new();

        for event in events {
            apply(&mut workflow, &mut book, &mut outstanding, event);

            prop_assert_eq!(
                workflow.is_loading(),
                workflow.stage() == WorkflowStage::Searching
            );
            if workflow.stage() == WorkflowStage::Searching {
                prop_assert!(workflow.results().is_empty());
            }
            if !workflow.results().is_empty() {
                prop_assert_eq!(workflow.stage(), WorkflowStage::ResultsShown);
            }
        }
    }

    /// Property: resolving a superseded request never changes anything
    /// observable
    #[test]
    fn prop_superseded_resolution_is_a_no_op(
        first_ok in any::<bool>(),
        postcode_a in "[0-9]{4}",
        postcode_b in "[0-9]{4}",
    ) {
        let mut workflow = AddressWorkflow::new();

        workflow.set_fields([(POST_CODE, postcode_a.as_str()), (HOUSE_NUMBER, "5")]);
        let first = workflow.submit_search().unwrap();

        workflow.set_fields([(POST_CODE, postcode_b.as_str()), (HOUSE_NUMBER, "7")]);
        let second = workflow.submit_search().unwrap();
        prop_assert!(second.token > first.token);

        let stage_before = workflow.stage();
        let results_before = workflow.results().to_vec();
        let error_before = workflow.error().map(str::to_owned);
        let loading_before = workflow.is_loading();

        let outcome = outcome_for(&first, first_ok);
        workflow.resolve_lookup(first.token, outcome);

        prop_assert_eq!(workflow.stage(), stage_before);
        prop_assert_eq!(workflow.results(), &results_before[..]);
        prop_assert_eq!(workflow.error(), error_before.as_deref());
        prop_assert_eq!(workflow.is_loading(), loading_before);
    }

    /// Property: with two overlapping searches, the final state reflects the
    /// second dispatch alone, whatever order the outcomes land in
    #[test]
    fn prop_latest_dispatch_wins(
        first_ok in any::<bool>(),
        second_ok in any::<bool>(),
        late_first in any::<bool>(),
    ) {
        // the overlapped run: both outcomes arrive, in either order
        let mut overlapped = AddressWorkflow::new();
        overlapped.set_fields([(POST_CODE, "1234"), (HOUSE_NUMBER, "5")]);
        let first = overlapped.submit_search().unwrap();
        overlapped.set_fields([(POST_CODE, "4321"), (HOUSE_NUMBER, "7")]);
        let second = overlapped.submit_search().unwrap();

        let first_outcome = outcome_for(&first, first_ok);
        let second_outcome = outcome_for(&second, second_ok);
        if late_first {
            overlapped.resolve_lookup(second.token, second_outcome);
            overlapped.resolve_lookup(first.token, first_outcome);
        } else {
            overlapped.resolve_lookup(first.token, first_outcome);
            overlapped.resolve_lookup(second.token, second_outcome);
        }

        // the reference run: only the second search ever happened
        let mut reference = AddressWorkflow::new();
        reference.set_fields([(POST_CODE, "1234"), (HOUSE_NUMBER, "5")]);
        reference.submit_search().unwrap();
        reference.set_fields([(POST_CODE, "4321"), (HOUSE_NUMBER, "7")]);
        let reference_second = reference.submit_search().unwrap();
        reference.resolve_lookup(reference_second.token, outcome_for(&second, second_ok));

        prop_assert_eq!(overlapped.stage(), reference.stage());
        prop_assert_eq!(overlapped.results(), reference.results());
        prop_assert_eq!(overlapped.error(), reference.error());
        prop_assert_eq!(overlapped.is_loading(), reference.is_loading());
    }
}
