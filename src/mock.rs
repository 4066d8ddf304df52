//! Deterministic mock address generation service
//!
//! Stands in for a real geocoding backend: the same query always yields the
//! same candidates, and the published request contract (parameter checks,
//! status codes, error strings) is enforced server-side as well.

use crate::address::RawAddressRecord;
use crate::lookup::{LookupEnvelope, LookupQuery, LookupResponse, LookupService, NO_RESULTS_MSG};
use crate::validate::{MIN_POSTCODE_LEN, search_rules, validate_numeric_field};
use std::time::Duration;

const MANDATORY_MSG: &str = "Postcode and street number fields mandatory!";
const POSTCODE_LEN_MSG: &str = "Postcode must be at least 4 digits!";

const STREETS: &[&str] = &[
    "Keizersgracht",
    "Prinsengracht",
    "Marnixstraat",
    "Rozengracht",
    "Overtoom",
    "Sarphatistraat",
];
const CITIES: &[&str] = &["Amsterdam", "Rotterdam", "Utrecht", "Den Haag", "Eindhoven"];

pub struct MockLookupService {
    delay: Duration,
}

impl Default for MockLookupService {
    fn default() -> Self {
        // success responses are delayed so a loading state stays observable
        Self {
            delay: Duration::from_millis(500),
        }
    }
}

impl MockLookupService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self { delay }
    }
}

impl LookupService for MockLookupService {
    fn get_addresses(&self, query: &LookupQuery) -> anyhow::Result<LookupResponse> {
        if query.postcode.is_empty() || query.streetnumber.is_empty() {
            return error_response(400, MANDATORY_MSG);
        }
        if query.postcode.len() < MIN_POSTCODE_LEN {
            return error_response(400, POSTCODE_LEN_MSG);
        }
        // postcode first, only the first violated rule is reported
        for rule in search_rules(&query.postcode, &query.streetnumber) {
            if let Err(err) = validate_numeric_field(rule) {
                return error_response(400, &err.to_string());
            }
        }

        match generate_addresses(&query.postcode, &query.streetnumber) {
            Some(details) => {
                std::thread::sleep(self.delay);
                LookupResponse::json(200, &LookupEnvelope::Ok { details })
            }
            None => error_response(404, NO_RESULTS_MSG),
        }
    }
}

fn error_response(status_code: u16, errormessage: &str) -> anyhow::Result<LookupResponse> {
    LookupResponse::json(
        status_code,
        &LookupEnvelope::Error {
            errormessage: errormessage.to_owned(),
        },
    )
}

/// Generate the candidate set for a validated query, or `None` when the
/// lookup is deemed to match nothing (postcodes ending in a zero).
///
/// Everything is derived from the query digits, so repeated lookups agree.
/// The raw records carry their own house number, which may disagree with the
/// searched one; canonicalizing that is the transformer's job downstream.
pub fn generate_addresses(postcode: &str, streetnumber: &str) -> Option<Vec<RawAddressRecord>> {
    if postcode.ends_with('0') {
        return None;
    }

    let seed = digit_sum(postcode) + digit_sum(streetnumber);
    let count = digit_sum(postcode) as usize % 3 + 1;
    let city = CITIES[seed as usize % CITIES.len()];

    let details = (0..count)
        .map(|i| RawAddressRecord {
            id: format!("{postcode}-{streetnumber}-{i}"),
            street: STREETS[(seed as usize + i) % STREETS.len()].to_owned(),
            house_number: Some(((seed as usize + i) % 200 + 1).to_string()),
            city: city.to_owned(),
            postcode: postcode.to_owned(),
            lat: Some(52.0 + (seed + i as u32) as f64 / 100.0),
            lon: Some(4.0 + (seed.abs_diff(i as u32)) as f64 / 100.0),
        })
        .collect();

    Some(details)
}

fn digit_sum(value: &str) -> u32 {
    value
        .bytes()
        .filter(u8::is_ascii_digit)
        .map(|b| (b - b'0') as u32)
        .sum()
}
