use std::time::Duration;

use guandan_client::{
    view::{ViewReconciler, ViewTimings},
    websockets::Transport,
};

use super::mocks::{mock_socket, MockServer};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub server: MockServer,
    pub transport: Transport,
    pub view: ViewReconciler,
}

pub struct TestSetupBuilder {
    timings: ViewTimings,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            timings: ViewTimings::default(),
        }
    }

    #[allow(dead_code)]
    pub fn with_timings(mut self, highlight: Duration, error: Duration) -> Self {
        self.timings = ViewTimings { highlight, error };
        self
    }

    pub async fn build(self) -> TestSetup {
        let (socket, server) = mock_socket();
        let transport = Transport::from_socket(Box::new(socket));
        let view = ViewReconciler::attach_with_timings(transport.clone(), self.timings).await;

        TestSetup {
            server,
            transport,
            view,
        }
    }
}
