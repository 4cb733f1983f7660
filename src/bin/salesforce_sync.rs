//! Salesforce contact sync CLI
//!
//! Looks a contact up in Salesforce by id and pushes it to the customer sync
//! endpoint, unless the event's last update is inside the debounce window.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin salesforce-sync -- ticket_created -id 00341000003EXY5
//! cargo run --bin salesforce-sync -- session -idfa AEBE52E7-03EE-455A-B3C4-E57283966239
//! ```
//!
//! Reads `SYNC_*`, `SYNC_DEBOUNCE_SECS` and `SALESFORCE_*` from the environment.

use chrono::Utc;
use customer_sync::crm::SalesforceClient;
use customer_sync::{
    http_client, CrmEvent, CrmSync, DebounceConfig, DebounceGate, Result, SalesforceConfig,
    SyncClient, SyncConfig, SyncOutcome,
};
use std::env;
use std::process;

const USAGE: &str = "salesforce-sync <event_type> (-id <id> | -idfa <IDFA>) [<timestamp>]";

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let event = CrmEvent::from_args(&args, USAGE)?;

    let sync_config = SyncConfig::from_env()?;
    let gate = DebounceGate::from_config(&DebounceConfig::from_env()?);
    let http = http_client(sync_config.timeout())?;

    let source = SalesforceClient::new(SalesforceConfig::from_env()?, http.clone());
    let mut crm = CrmSync::new(source, SyncClient::new(&sync_config, http)?, gate);

    if let SyncOutcome::Synced(counts) = crm.handle(&event, Utc::now())? {
        println!(
            "created: {}, updated: {}",
            counts.created_count, counts.updated_count
        );
    }
    Ok(())
}
