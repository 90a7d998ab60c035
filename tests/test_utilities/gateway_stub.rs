use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Gateway that answers every lookup with 404.
///
/// Keep the returned server alive for as long as the binary under test runs.
pub async fn empty_gateway() -> MockServer {
    MockServer::start().await
}

/// Gateway serving `body` as JSON for exactly one `GET route`. Every other
/// lookup gets 404.
pub async fn gateway_with_route(route: &str, body: serde_json::Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(&server)
        .await;
    server
}
