//! Mock HTTP server for unit tests.
//!
//! wiremock is async; the runtime lives here so the blocking client under
//! test can run on the plain test thread.

use tokio::runtime::Runtime;
use wiremock::{Mock, MockServer, Request};

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
