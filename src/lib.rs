//! # Customer Sync
//!
//! Pushes customer profiles to a customer sync endpoint, either in bulk from
//! a `;`-delimited file or one at a time from a CRM (Salesforce or Zoho).
//!
//! ## Pipelines
//!
//! - **File load**: resolve a path or URL, drop the header line, decode each
//!   line as Latin-1, map fields by position, and POST size-bounded chunks
//!   in file order, one request in flight at a time.
//! - **CRM event**: debounce on the event timestamp, look the contact up in
//!   the CRM, and POST a single-customer batch whose reply is validated.
//!
//! ## Example
//!
//! ```no_run
//! use customer_sync::{http_client, CustomerLoader, LoadConfig, SyncClient, SyncConfig};
//! use std::io::Cursor;
//!
//! let config = SyncConfig::from_env().unwrap();
//! let client = SyncClient::new(&config, http_client(config.timeout()).unwrap()).unwrap();
//! let loader = CustomerLoader::new(&client, &LoadConfig::default());
//! let csv = "id;last_name;blacklisted\n1;Smith;false\n";
//! loader.load(Cursor::new(csv), std::io::stdout()).unwrap();
//! ```

pub mod client;
pub mod config;
pub mod crm;
pub mod debounce;
pub mod error;
pub mod loader;
pub mod record;
pub mod source;

#[cfg(test)]
mod test_support;

pub use client::{http_client, RawResponse, SyncClient, SyncResponse};
pub use config::{DebounceConfig, LoadConfig, SalesforceConfig, SyncConfig, ZohoConfig};
pub use crm::{ContactSource, CrmEvent, CrmSync, CustomerKey, EventType, SyncOutcome};
pub use debounce::{format_iso8601, parse_iso8601, DebounceGate};
pub use error::{Result, SyncError};
pub use loader::{CustomerLoader, LoadSummary};
pub use record::{Customer, RecordMapper, SyncBatch};
pub use source::{decode_latin1, open_input, Chunk, ChunkReader};
