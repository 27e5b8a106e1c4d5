use std::net::TcpListener;

use wiremock::MockServer;

/// Starts a mock portal, or returns `None` when localhost cannot be bound.
///
/// Set `UNISYS_REQUIRE_SOCKET_TESTS=1` to fail instead of skipping.
pub async fn start_mock_server_or_skip() -> Option<MockServer> {
    if TcpListener::bind("127.0.0.1:0").is_ok() {
        return Some(MockServer::start().await);
    }
    let required = std::env::var("UNISYS_REQUIRE_SOCKET_TESTS")
        .is_ok_and(|value| matches!(value.as_str(), "1" | "true" | "yes"));
    assert!(!required, "cannot bind a localhost socket for the mock portal");
    eprintln!("skipping: cannot bind a localhost socket for the mock portal");
    None
}
