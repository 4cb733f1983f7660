//! Event-driven sync of a single customer pulled from a CRM.
//!
//! An event names a customer by CRM id (or only by device IDFA) and may carry
//! the timestamp of the last update. Recent events are debounced; otherwise
//! the contact is looked up through a [`ContactSource`] and posted to the
//! sync endpoint as a one-customer batch.

pub mod salesforce;
pub mod zoho;

use crate::client::{SyncClient, SyncResponse};
use crate::debounce::{format_iso8601, DebounceGate};
use crate::error::{Result, SyncError};
use crate::record::{Customer, SyncBatch};
use chrono::{DateTime, Utc};
use log::info;
use std::fmt;

pub use salesforce::{SalesforceClient, SalesforceContact};
pub use zoho::{ContactFields, ZohoClient};

/// What triggered the sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    Session,
    TicketCreated,
}

impl EventType {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "session" => Some(EventType::Session),
            "ticket_created" => Some(EventType::TicketCreated),
            _ => None,
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventType::Session => write!(f, "session"),
            EventType::TicketCreated => write!(f, "ticket_created"),
        }
    }
}

/// How the event identifies the customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomerKey {
    /// CRM id (for Zoho, an email address is also accepted).
    Id(String),
    Idfa(String),
}

impl CustomerKey {
    pub fn idfa(&self) -> Option<&str> {
        match self {
            CustomerKey::Idfa(idfa) => Some(idfa),
            CustomerKey::Id(_) => None,
        }
    }
}

impl fmt::Display for CustomerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CustomerKey::Id(id) => write!(f, "id {}", id),
            CustomerKey::Idfa(idfa) => write!(f, "IDFA {}", idfa),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrmEvent {
    pub event_type: EventType,
    pub key: CustomerKey,
    /// Declared time of the last update, as sent by the caller.
    pub timestamp: Option<String>,
}

impl CrmEvent {
    /// Parses `<event_type> (-id <id> | -idfa <IDFA>) [<timestamp>]`.
    ///
    /// `args` excludes the program name; `usage` is reported on any mismatch.
    pub fn from_args(args: &[String], usage: &'static str) -> Result<Self> {
        let (event_type, flag, value) = match args {
            [event_type, flag, value] | [event_type, flag, value, _] => (event_type, flag, value),
            _ => return Err(SyncError::Usage(usage)),
        };

        let event_type = EventType::parse(event_type).ok_or(SyncError::Usage(usage))?;
        let key = match flag.as_str() {
            "-id" => CustomerKey::Id(value.clone()),
            "-idfa" => CustomerKey::Idfa(value.clone()),
            _ => return Err(SyncError::Usage(usage)),
        };

        Ok(CrmEvent {
            event_type,
            key,
            timestamp: args.get(3).cloned(),
        })
    }
}

/// A CRM that can produce a customer profile for an id.
///
/// A contact that cannot be found is not an error: implementations return a
/// customer with the unknown fields left empty.
pub trait ContactSource {
    fn name(&self) -> &'static str;

    fn fetch_customer(&mut self, id: &str) -> Result<Customer>;
}

/// Result of handling one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Skipped: the last update is inside the debounce window.
    Debounced,
    Synced(SyncResponse),
}

pub struct CrmSync<S: ContactSource> {
    source: S,
    client: SyncClient,
    gate: DebounceGate,
}

impl<S: ContactSource> CrmSync<S> {
    pub fn new(source: S, client: SyncClient, gate: DebounceGate) -> Self {
        CrmSync {
            source,
            client,
            gate,
        }
    }

    /// Debounces, looks up and syncs the customer named by `event`.
    pub fn handle(&mut self, event: &CrmEvent, now: DateTime<Utc>) -> Result<SyncOutcome> {
        info!("Got {} event for {}", event.event_type, event.key);

        if !self.gate.should_sync(event.timestamp.as_deref(), now) {
            info!(
                "Last update was less than {} seconds ago, skipping",
                self.gate.window().num_seconds()
            );
            return Ok(SyncOutcome::Debounced);
        }

        let mut customer = match &event.key {
            CustomerKey::Id(id) => {
                info!("Looking up {} in {}", id, self.source.name());
                self.source.fetch_customer(id)?
            }
            CustomerKey::Idfa(_) => Customer::default(),
        };
        customer.idfa = event.key.idfa().map(str::to_string);
        customer.timestamp = Some(format_iso8601(now));

        let counts = self.client.sync(&SyncBatch::single(customer))?;
        Ok(SyncOutcome::Synced(counts))
    }
}

/// Reads a JSON value as text, stringifying numbers and booleans.
pub(crate) fn value_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}
