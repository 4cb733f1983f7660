//! Shared helpers for integration tests.

#![allow(dead_code)]

use tokio::runtime::Runtime;
use wiremock::{Mock, MockServer, Request};

/// A wiremock server plus the runtime that drives it, so blocking code and
/// spawned binaries can talk to it from the test thread.
pub struct MockHttp {
    // Dropped before the runtime so mock expectations are verified first
    server: MockServer,
    runtime: Runtime,
}

impl MockHttp {
    pub fn start() -> Self {
        let runtime = Runtime::new().expect("tokio runtime");
        let server = runtime.block_on(MockServer::start());
        MockHttp { server, runtime }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    pub fn mount(&self, mock: Mock) {
        self.runtime.block_on(mock.mount(&self.server));
    }

    pub fn received(&self) -> Vec<Request> {
        self.runtime
            .block_on(self.server.received_requests())
            .unwrap_or_default()
    }
}

pub const SYNC_PATH: &str = "/api/v1/test-key/sync_customers/";

/// Environment for the sync endpoint pointed at `mock`.
pub fn sync_env(mock: &MockHttp) -> Vec<(&'static str, String)> {
    vec![
        ("SYNC_BASE_URL", mock.uri()),
        ("SYNC_API_KEY", "test-key".to_string()),
        ("SYNC_USERNAME", "admin@example.com".to_string()),
        ("SYNC_PASSWORD", "secret".to_string()),
        ("SYNC_TIMEOUT_SECS", "5".to_string()),
    ]
}
