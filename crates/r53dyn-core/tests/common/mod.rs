//! Test doubles shared by the contract tests
//!
//! The scripted provider keeps an in-memory record set so that upserts are
//! visible to later listings, and logs every call so tests can assert on
//! exactly which round-trips were made.

#![allow(dead_code)]

use r53dyn_core::error::{Error, Result};
use r53dyn_core::traits::{
    AddressRecord, ChangeStatus, DnsProvider, IpSource, RecordType, ZoneDescriptor,
};
use r53dyn_core::{DomainName, ZoneId};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// An upsert as received by the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertCall {
    pub zone_id: String,
    pub name: String,
    pub record_type: RecordType,
    pub ttl: u32,
    pub value: String,
}

#[derive(Default)]
struct ProviderState {
    /// Canned answers to zone queries, keyed by the queried name
    zone_answers: HashMap<String, ZoneDescriptor>,
    /// Record sets keyed by (name, type); listing walks them in key order
    records: BTreeMap<(String, String), AddressRecord>,
    fail_find: Option<String>,
    fail_list: Option<String>,
    fail_upsert: Option<String>,
    zone_queries: Vec<(String, u32)>,
    list_calls: Vec<(String, String, RecordType, u32)>,
    upserts: Vec<UpsertCall>,
}

/// A DnsProvider driven by a script, recording every call
///
/// Clones share state, so a test can keep one handle while the code under
/// test owns another.
#[derive(Clone, Default)]
pub struct ScriptedDnsProvider {
    state: Arc<Mutex<ProviderState>>,
}

impl ScriptedDnsProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer a zone query for `queried` with the zone (`id`, `name`)
    pub fn answer_zone_query(&self, queried: &str, id: &str, name: &str) -> &Self {
        self.state.lock().unwrap().zone_answers.insert(
            queried.to_string(),
            ZoneDescriptor {
                id: ZoneId::new(id),
                name: name.to_string(),
            },
        );
        self
    }

    /// Put an A record into the zone
    pub fn with_record(&self, name: &str, value: &str) -> &Self {
        self.state.lock().unwrap().records.insert(
            (name.to_string(), RecordType::A.to_string()),
            AddressRecord {
                name: name.to_string(),
                record_type: Some(RecordType::A),
                value: value.to_string(),
                ttl: Some(300),
            },
        );
        self
    }

    /// Put a record set of another type (`"MX"`, `"TXT"`, ...) into the zone
    pub fn with_other_record(&self, name: &str, rr_type: &str, value: &str) -> &Self {
        self.state.lock().unwrap().records.insert(
            (name.to_string(), rr_type.to_string()),
            AddressRecord {
                name: name.to_string(),
                record_type: None,
                value: value.to_string(),
                ttl: Some(300),
            },
        );
        self
    }

    pub fn fail_find(&self, message: &str) -> &Self {
        self.state.lock().unwrap().fail_find = Some(message.to_string());
        self
    }

    pub fn fail_list(&self, message: &str) -> &Self {
        self.state.lock().unwrap().fail_list = Some(message.to_string());
        self
    }

    pub fn fail_upsert(&self, message: &str) -> &Self {
        self.state.lock().unwrap().fail_upsert = Some(message.to_string());
        self
    }

    /// Names passed to find_zone_by_name, in call order
    pub fn zone_queries(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .zone_queries
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Limits passed to find_zone_by_name, in call order
    pub fn zone_query_limits(&self) -> Vec<u32> {
        self.state
            .lock()
            .unwrap()
            .zone_queries
            .iter()
            .map(|(_, limit)| *limit)
            .collect()
    }

    pub fn list_calls(&self) -> Vec<(String, String, RecordType, u32)> {
        self.state.lock().unwrap().list_calls.clone()
    }

    pub fn upserts(&self) -> Vec<UpsertCall> {
        self.state.lock().unwrap().upserts.clone()
    }

    /// Current value of the A record at `name`, if present
    pub fn record_value(&self, name: &str) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .records
            .get(&(name.to_string(), RecordType::A.to_string()))
            .map(|r| r.value.clone())
    }
}

#[async_trait::async_trait]
impl DnsProvider for ScriptedDnsProvider {
    async fn find_zone_by_name(
        &self,
        name: &DomainName,
        limit: u32,
    ) -> Result<Option<ZoneDescriptor>> {
        let mut state = self.state.lock().unwrap();
        state.zone_queries.push((name.to_string(), limit));

        if let Some(message) = &state.fail_find {
            return Err(Error::provider("scripted", message.clone()));
        }

        Ok(state.zone_answers.get(name.as_str()).cloned())
    }

    async fn list_records(
        &self,
        zone_id: &ZoneId,
        start_name: &DomainName,
        record_type: RecordType,
        limit: u32,
    ) -> Result<Option<AddressRecord>> {
        let mut state = self.state.lock().unwrap();
        state.list_calls.push((
            zone_id.to_string(),
            start_name.to_string(),
            record_type,
            limit,
        ));

        if let Some(message) = &state.fail_list {
            return Err(Error::provider("scripted", message.clone()));
        }

        Ok(state
            .records
            .range((start_name.to_string(), record_type.to_string())..)
            .next()
            .map(|(_, record)| record.clone()))
    }

    async fn upsert_record(
        &self,
        zone_id: &ZoneId,
        name: &DomainName,
        record_type: RecordType,
        ttl: u32,
        value: &str,
    ) -> Result<ChangeStatus> {
        let mut state = self.state.lock().unwrap();
        state.upserts.push(UpsertCall {
            zone_id: zone_id.to_string(),
            name: name.to_string(),
            record_type,
            ttl,
            value: value.to_string(),
        });

        if let Some(message) = &state.fail_upsert {
            return Err(Error::provider("scripted", message.clone()));
        }

        state.records.insert(
            (name.to_string(), record_type.to_string()),
            AddressRecord {
                name: name.to_string(),
                record_type: Some(record_type),
                value: value.to_string(),
                ttl: Some(i64::from(ttl)),
            },
        );
        Ok(ChangeStatus::Pending)
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }
}

/// An IpSource that replays a fixed sequence of answers
///
/// Once the sequence is exhausted, the last answer repeats.
#[derive(Clone)]
pub struct ScriptedIpSource {
    answers: Arc<Mutex<VecDeque<Result<Ipv4Addr>>>>,
    last: Arc<Mutex<Result<Ipv4Addr>>>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedIpSource {
    pub fn fixed(ip: Ipv4Addr) -> Self {
        Self::sequence(vec![Ok(ip)])
    }

    pub fn sequence(answers: Vec<Result<Ipv4Addr>>) -> Self {
        let last = answers
            .last()
            .cloned()
            .unwrap_or_else(|| Err(Error::ip_source("no answers scripted")));

        Self {
            answers: Arc::new(Mutex::new(answers.into())),
            last: Arc::new(Mutex::new(last)),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl IpSource for ScriptedIpSource {
    async fn current(&self) -> Result<Ipv4Addr> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.answers.lock().unwrap().pop_front() {
            Some(answer) => answer,
            None => self.last.lock().unwrap().clone(),
        }
    }

    fn source_name(&self) -> &'static str {
        "scripted"
    }
}

pub fn name(s: &str) -> DomainName {
    DomainName::parse(s).expect("valid test domain name")
}

pub fn ip(s: &str) -> Ipv4Addr {
    s.parse().expect("valid test address")
}
