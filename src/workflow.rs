//! Workflow controller for the search, select and submit sequence

use crate::address::{Address, AddressBookEntry, RawAddressRecord, transform};
use crate::book::AddressBook;
use crate::error::LookupError;
use crate::fields::FieldStore;
use crate::lookup::{LookupClient, LookupQuery, LookupService};
use crate::validate;

pub const POST_CODE: &str = "postCode";
pub const HOUSE_NUMBER: &str = "houseNumber";
pub const FIRST_NAME: &str = "firstName";
pub const LAST_NAME: &str = "lastName";
pub const SELECTED_ADDRESS: &str = "selectedAddress";

/// Where one workflow session currently stands. A successful person-info
/// submission passes through its submitted moment and lands back on `Idle`
/// in the same step, so only three stages are ever observable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowStage {
    Idle,
    Searching,
    ResultsShown,
}

/// Monotonically increasing sequence token handed out per dispatched
/// lookup. Only the most recently handed-out token is authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestToken(u64);

/// A validated search, ready for the driver to execute against the lookup
/// service. Its token must accompany the outcome on the way back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupDispatch {
    pub token: RequestToken,
    pub query: LookupQuery,
}

pub type LookupOutcome = Result<Vec<RawAddressRecord>, LookupError>;

struct PendingLookup {
    token: RequestToken,
    // captured at dispatch time, the field may change while in flight
    house_number: String,
}

/// Drives one address book workflow session: collect search inputs,
/// validate, query, show candidates, collect the selection and person info,
/// validate again, emit the finished entry and reset.
///
/// Lookup completion is a separate event fed back via [`resolve_lookup`],
/// which lets a driver overlap requests; a newer [`submit_search`]
/// supersedes whatever is still in flight.
///
/// [`resolve_lookup`]: AddressWorkflow::resolve_lookup
/// [`submit_search`]: AddressWorkflow::submit_search
pub struct AddressWorkflow {
    fields: FieldStore,
    stage: WorkflowStage,
    results: Vec<Address>,
    error: Option<String>,
    loading: bool,
    last_token: u64,
    pending: Option<PendingLookup>,
}

impl Default for AddressWorkflow {
    fn default() -> Self {
        Self::new()
    }
}

impl AddressWorkflow {
    pub fn new() -> Self {
        let fields = FieldStore::new([
            (POST_CODE, ""),
            (HOUSE_NUMBER, ""),
            (FIRST_NAME, ""),
            (LAST_NAME, ""),
            (SELECTED_ADDRESS, ""),
        ]);

        Self {
            fields,
            stage: WorkflowStage::Idle,
            results: Vec::new(),
            error: None,
            loading: false,
            last_token: 0,
            pending: None,
        }
    }

    pub fn stage(&self) -> WorkflowStage {
        self.stage
    }

    pub fn results(&self) -> &[Address] {
        &self.results
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn field(&self, name: &str) -> &str {
        self.fields.get(name)
    }

    /// Record one input event against the form fields.
    pub fn set_field(&mut self, name: &str, value: impl Into<String>) {
        self.fields.set_value(name, value);
    }

    pub fn set_fields<'a, I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        self.fields.set_values(entries);
    }

    /// Validate the current search inputs and dispatch a lookup.
    ///
    /// Previous results, the error channel and any in-flight request are
    /// dropped before validation runs, so stale results are never shown next
    /// to a new error and vice versa. Returns `None` when validation failed
    /// (the error channel holds the first violated rule) and no request was
    /// made.
    pub fn submit_search(&mut self) -> Option<LookupDispatch> {
        // a new attempt supersedes whatever came before it
        self.pending = None;
        self.loading = false;
        self.results.clear();
        self.error = None;

        let postcode = self.fields.get(POST_CODE).to_owned();
        let house_number = self.fields.get(HOUSE_NUMBER).to_owned();

        if let Err(err) = validate::validate_search(&postcode, &house_number) {
            self.error = Some(err.to_string());
            self.stage = WorkflowStage::Idle;
            return None;
        }

        self.last_token += 1;
        let token = RequestToken(self.last_token);
        self.pending = Some(PendingLookup {
            token,
            house_number: house_number.clone(),
        });
        self.loading = true;
        self.stage = WorkflowStage::Searching;
        log::debug!("dispatching lookup #{} for postcode {postcode}", self.last_token);

        Some(LookupDispatch {
            token,
            query: LookupQuery {
                postcode,
                streetnumber: house_number,
            },
        })
    }

    /// Record the outcome of a dispatched lookup. Outcomes whose token has
    /// been superseded are discarded without touching any state.
    pub fn resolve_lookup(&mut self, token: RequestToken, outcome: LookupOutcome) {
        if !self.pending.as_ref().is_some_and(|p| p.token == token) {
            log::debug!("dropping superseded lookup outcome #{}", token.0);
            return;
        }
        let Some(pending) = self.pending.take() else {
            return;
        };

        self.loading = false;
        match outcome {
            Ok(records) => {
                self.results = records
                    .iter()
                    .map(|raw| transform(raw, &pending.house_number))
                    .collect();
                self.stage = WorkflowStage::ResultsShown;
            }
            Err(err) => {
                self.results.clear();
                self.error = Some(err.to_string());
                self.stage = WorkflowStage::Idle;
            }
        }
    }

    /// Dispatch and synchronously resolve one search against `client`.
    pub fn search_with<S: LookupService>(&mut self, client: &LookupClient<S>) {
        if let Some(dispatch) = self.submit_search() {
            let outcome = client.fetch(&dispatch.query.postcode, &dispatch.query.streetnumber);
            self.resolve_lookup(dispatch.token, outcome);
        }
    }

    /// Mark one of the displayed candidates as the selection. This is just a
    /// field update; the stage does not change.
    pub fn select_candidate(&mut self, id: &str) {
        self.fields.set_value(SELECTED_ADDRESS, id);
    }

    /// Validate the person info against the displayed candidates and, on
    /// success, hand the composed entry to `book` and reset the session.
    ///
    /// The entry construction, the hand-off, the field reset, the result
    /// clear and the error clear all happen in this one call; a failed
    /// validation only sets the error channel.
    pub fn submit_person_info(&mut self, book: &mut dyn AddressBook) -> bool {
        let first_name = self.fields.get(FIRST_NAME).to_owned();
        let last_name = self.fields.get(LAST_NAME).to_owned();
        let selected = self.fields.get(SELECTED_ADDRESS).to_owned();

        let found =
            validate::validate_person_info(&first_name, &last_name, &selected, &self.results)
                .map(Address::clone);

        match found {
            Err(err) => {
                self.error = Some(err.to_string());
                false
            }
            Ok(address) => {
                book.add(AddressBookEntry {
                    address,
                    first_name,
                    last_name,
                });
                self.fields.reset();
                self.results.clear();
                self.error = None;
                self.stage = WorkflowStage::Idle;
                true
            }
        }
    }

    /// Reset the whole session: fields, results, error channel and any
    /// in-flight request. Reachable from any stage.
    pub fn clear_all(&mut self) {
        self.pending = None;
        self.loading = false;
        self.fields.reset();
        self.results.clear();
        self.error = None;
        self.stage = WorkflowStage::Idle;
    }
}
