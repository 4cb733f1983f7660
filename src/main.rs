//! Customer file loader CLI
//!
//! Reads a `;`-delimited customer file (local path or HTTP(S) URL) and posts
//! it to the customer sync endpoint in size-bounded chunks. Each chunk's raw
//! response is printed to stdout.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin customer-load -- customers.csv [app_group]
//! ```
//!
//! # Environment Variables
//!
//! - `SYNC_API_KEY`, `SYNC_USERNAME`, `SYNC_PASSWORD`: endpoint credentials (required)
//! - `SYNC_BASE_URL`, `SYNC_TIMEOUT_SECS`: endpoint location and request timeout
//! - `SYNC_CHUNK_BYTES`: chunk threshold in bytes, `0` for a single request
//! - `SYNC_PROPERTY_FIELDS`: comma-separated names for the trailing fields
//! - `RUST_LOG`: Set to `info` or `debug` to control logging verbosity

use customer_sync::{
    http_client, open_input, CustomerLoader, LoadConfig, Result, SyncClient, SyncConfig, SyncError,
};
use std::env;
use std::io;
use std::process;

const USAGE: &str = "customer-load <input_file_or_url> [<app_group_name>]";

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args.len() > 3 {
        return Err(SyncError::Usage(USAGE));
    }

    let input_location = &args[1];
    let app_group = args.get(2).cloned();

    let sync_config = SyncConfig::from_env()?;
    let load_config = LoadConfig::from_env()?;
    let http = http_client(sync_config.timeout())?;

    let input = open_input(input_location, &http)?;
    let client = SyncClient::new(&sync_config, http)?;
    let loader = CustomerLoader::new(&client, &load_config).with_app_group(app_group);

    let stdout = io::stdout();
    let handle = stdout.lock();
    let summary = loader.load(input, handle)?;
    log::info!(
        "Loaded {} customers in {} chunks",
        summary.customers,
        summary.chunks
    );

    Ok(())
}
