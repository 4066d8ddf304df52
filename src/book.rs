//! Address book collaborators and the sled-backed store

use crate::address::AddressBookEntry;
use bech32::Bech32m;
use chrono::{DateTime, TimeZone, Utc};
use sled::Batch;
use std::sync::Arc;
use uuid7::uuid7;

/// The collaborator the workflow hands finished entries to. Synchronous and,
/// as far as the workflow is concerned, always succeeding; whatever can go
/// wrong inside an implementation is that implementation's business.
pub trait AddressBook {
    fn add(&mut self, entry: AddressBookEntry);
}

/// Plain in-memory book, mostly for drivers and tests.
#[derive(Debug, Default)]
pub struct MemoryAddressBook {
    entries: Vec<AddressBookEntry>,
}

impl MemoryAddressBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[AddressBookEntry] {
        &self.entries
    }
}

impl AddressBook for MemoryAddressBook {
    fn add(&mut self, entry: AddressBookEntry) {
        self.entries.push(entry);
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone)]
pub struct TimeStamp<T: TimeZone>(DateTime<T>);

impl TimeStamp<Utc> {
    pub fn new() -> Self {
        Self(Utc::now())
    }

    pub fn to_datetime_utc(&self) -> DateTime<Utc> {
        self.0
    }
}

impl Default for TimeStamp<Utc> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TimeZone> From<DateTime<T>> for TimeStamp<T> {
    fn from(value: DateTime<T>) -> Self {
        TimeStamp(value)
    }
}

impl<C> minicbor::Encode<C> for TimeStamp<Utc> {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        if let Some(nsec) = self.0.timestamp_nanos_opt() {
            return e.i64(nsec)?.ok();
        }

        Err(minicbor::encode::Error::message(
            "failed to encode timestamp. timestamp_nanos_opt returned None",
        ))
    }
}

impl<'b, C> minicbor::Decode<'b, C> for TimeStamp<Utc> {
    fn decode(d: &mut minicbor::Decoder<'b>, _: &mut C) -> Result<Self, minicbor::decode::Error> {
        let nsecs = d.i64()?;

        Ok(TimeStamp(DateTime::from_timestamp_nanos(nsecs)))
    }
}

/// What actually lands in the store: the entry plus the id and timestamp the
/// store assigned at insertion.
#[derive(Debug, Clone, PartialEq, minicbor::Encode, minicbor::Decode)]
pub struct StoredEntry {
    #[n(0)]
    pub id: String,
    #[n(1)]
    pub added_at: TimeStamp<Utc>,
    #[n(2)]
    pub entry: AddressBookEntry,
}

const ID_PREFIX: &str = "entry_";

// construct a unique entry id then encode using bech32
fn new_entry_id() -> anyhow::Result<String> {
    let hrp = bech32::Hrp::parse(ID_PREFIX)?;
    let id = bech32::encode::<Bech32m>(hrp, uuid7().as_bytes())?;

    Ok(id)
}

/// Persistent address book over sled. Entries live under their assigned id;
/// a second keyspace maps the sha256 of the entry's CBOR bytes back to that
/// id, so identical content is only ever stored once.
pub struct SledAddressBook {
    instance: Arc<sled::Db>,
}

impl SledAddressBook {
    pub fn new(instance: Arc<sled::Db>) -> Self {
        Self { instance }
    }

    /// Insert an entry and return its assigned id. Re-inserting identical
    /// content returns the id it already has.
    pub fn insert(&self, entry: AddressBookEntry) -> anyhow::Result<String> {
        let contents = minicbor::to_vec(&entry)?;
        let contents_hash = sha256::digest(&contents);

        if let Some(existing) = self.instance.get(contents_hash.as_bytes())? {
            return Ok(String::from_utf8(existing.to_vec())?);
        }

        let id = new_entry_id()?;
        let stored = StoredEntry {
            id: id.clone(),
            added_at: TimeStamp::new(),
            entry,
        };

        // entry and dedup index land together
        let mut batch = Batch::default();
        batch.insert(id.as_bytes(), minicbor::to_vec(&stored)?);
        batch.insert(contents_hash.as_bytes(), id.as_bytes());
        self.instance.apply_batch(batch)?;

        Ok(id)
    }

    pub fn get(&self, id: &str) -> anyhow::Result<Option<StoredEntry>> {
        match self.instance.get(id.as_bytes())? {
            Some(bytes) => Ok(Some(minicbor::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Every stored entry. Hash index keys are hex, so the id prefix scan
    /// never picks them up.
    pub fn entries(&self) -> anyhow::Result<Vec<StoredEntry>> {
        let mut entries = Vec::new();
        for kv in self.instance.scan_prefix(ID_PREFIX.as_bytes()) {
            let (_, bytes) = kv?;
            entries.push(minicbor::decode(&bytes)?);
        }

        Ok(entries)
    }

    pub fn len(&self) -> anyhow::Result<usize> {
        Ok(self.instance.scan_prefix(ID_PREFIX.as_bytes()).count())
    }

    pub fn is_empty(&self) -> anyhow::Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl AddressBook for SledAddressBook {
    fn add(&mut self, entry: AddressBookEntry) {
        if let Err(err) = self.insert(entry) {
            log::error!("failed to persist address book entry: {err:#}");
        }
    }
}
