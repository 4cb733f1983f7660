//! Zoho contact sync CLI
//!
//! Searches Zoho for a contact by id, falling back to treating the id as an
//! email address, and pushes the result to the customer sync endpoint.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin zoho-sync -- ticket_created -id 1832093000000383491
//! cargo run --bin zoho-sync -- ticket_created -id fsmith@example.com
//! ```
//!
//! Reads `SYNC_*`, `SYNC_DEBOUNCE_SECS` and `ZOHO_*` from the environment.

use chrono::Utc;
use customer_sync::crm::ZohoClient;
use customer_sync::{
    http_client, CrmEvent, CrmSync, DebounceConfig, DebounceGate, Result, SyncClient, SyncConfig,
    SyncOutcome, ZohoConfig,
};
use std::env;
use std::process;

const USAGE: &str = "zoho-sync <event_type> (-id <id_or_email> | -idfa <IDFA>) [<timestamp>]";

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

    let source = ZohoClient::new(ZohoConfig::from_env()?, http.clone());
    let mut crm = CrmSync::new(source, SyncClient::new(&sync_config, http)?, gate);

    if let SyncOutcome::Synced(counts) = crm.handle(&event, Utc::now())? {
        println!(
            "created: {}, updated: {}",
            counts.created_count, counts.updated_count
        );
    }
    Ok(())
}
