use httpmock::MockServer;

/// Starts a fresh mock of the dashboard API or the identity backend.
pub fn start_mock_server() -> MockServer {
    MockServer::start()
}
