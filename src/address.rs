//! Address records and the raw-record transformer

use serde::{Deserialize, Serialize};

/// One candidate as reported by the lookup service. The shape is
/// service-defined, so everything the service may omit is optional here and
/// gets validated at the boundary by the JSON decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawAddressRecord {
    pub id: String,
    pub street: String,
    #[serde(rename = "houseNumber", default, skip_serializing_if = "Option::is_none")]
    pub house_number: Option<String>,
    pub city: String,
    pub postcode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
}

/// Canonical address entity. `house_number` is always the number the user
/// searched with, never the raw payload's own value.
#[derive(Debug, Clone, PartialEq, minicbor::Encode, minicbor::Decode)]
pub struct Address {
    #[n(0)]
    pub id: String,
    #[n(1)]
    pub street: String,
    #[n(2)]
    pub house_number: String,
    #[n(3)]
    pub city: String,
    #[n(4)]
    pub postcode: String,
    #[n(5)]
    pub lat: f64,
    #[n(6)]
    pub lon: f64,
}

/// An address with personal details attached, ready for the address book.
#[derive(Debug, Clone, PartialEq, minicbor::Encode, minicbor::Decode)]
pub struct AddressBookEntry {
    #[n(0)]
    pub address: Address,
    #[n(1)]
    pub first_name: String,
    #[n(2)]
    pub last_name: String,
}

/// Map a raw lookup record into a canonical [`Address`], injecting the
/// searched house number regardless of what the raw payload carries.
pub fn transform(raw: &RawAddressRecord, house_number: &str) -> Address {
    Address {
        id: raw.id.clone(),
        street: raw.street.clone(),
        house_number: house_number.to_owned(),
        city: raw.city.clone(),
        postcode: raw.postcode.clone(),
        lat: raw.lat.unwrap_or(0.0),
        lon: raw.lon.unwrap_or(0.0),
    }
}
