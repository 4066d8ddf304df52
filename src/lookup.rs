//! Lookup service contract and the client that interprets its envelope

use crate::address::RawAddressRecord;
use crate::error::LookupError;
use serde::{Deserialize, Serialize};

/// Error message the service uses when a lookup matches nothing.
pub const NO_RESULTS_MSG: &str = "No results found!";

/// Query parameters of one lookup request, GET-style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupQuery {
    pub postcode: String,
    pub streetnumber: String,
}

/// A transport-level response: status code plus the raw body, which the
/// client still has to parse.
#[derive(Debug, Clone)]
pub struct LookupResponse {
    pub status_code: u16,
    pub body: String,
}

impl LookupResponse {
    pub fn json(status_code: u16, envelope: &LookupEnvelope) -> anyhow::Result<Self> {
        Ok(Self {
            status_code,
            body: serde_json::to_string(envelope)?,
        })
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

/// The service's JSON response envelope, either shape keyed on `status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum LookupEnvelope {
    Ok { details: Vec<RawAddressRecord> },
    Error { errormessage: String },
}

/// Boundary to the address lookup service. A transport failure is an `Err`;
/// a served error envelope is an `Ok` response with a non-2xx status.
pub trait LookupService {
    fn get_addresses(&self, query: &LookupQuery) -> anyhow::Result<LookupResponse>;
}

impl<S: LookupService + ?Sized> LookupService for &S {
    fn get_addresses(&self, query: &LookupQuery) -> anyhow::Result<LookupResponse> {
        (**self).get_addresses(query)
    }
}

/// Issues lookup requests and interprets exactly one response envelope per
/// call. Superseding overlapping requests is the workflow's job, not ours.
pub struct LookupClient<S> {
    service: S,
}

impl<S: LookupService> LookupClient<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }

    pub fn fetch(
        &self,
        postcode: &str,
        house_number: &str,
    ) -> Result<Vec<RawAddressRecord>, LookupError> {
        let query = LookupQuery {
            postcode: postcode.to_owned(),
            streetnumber: house_number.to_owned(),
        };

        let response = match self.service.get_addresses(&query) {
            Ok(response) => response,
            Err(err) => {
                // internals stay in the log, the surfaced message is generic
                log::debug!("lookup transport failed: {err:#}");
                return Err(LookupError::RequestFailed);
            }
        };

        let envelope: LookupEnvelope = match serde_json::from_str(&response.body) {
            Ok(envelope) => envelope,
            Err(err) => {
                log::debug!("lookup returned a non-json body: {err}");
                return Err(LookupError::RequestFailed);
            }
        };

        match envelope {
            LookupEnvelope::Ok { details } if response.is_success() => Ok(details),
            // an ok envelope on a failure status is not a contract we serve
            LookupEnvelope::Ok { .. } => Err(LookupError::RequestFailed),
            LookupEnvelope::Error { errormessage } if errormessage == NO_RESULTS_MSG => {
                Err(LookupError::NoResultsFound)
            }
            LookupEnvelope::Error { errormessage } => Err(LookupError::Rejected(errormessage)),
        }
    }
}
