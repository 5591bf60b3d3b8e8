//! Liveness endpoint

mod harness;

use harness::config::test_app;
use harness::mock_upstream::MockUpstream;
use harness::server::TestServer;

#[tokio::test]
async fn health_returns_ok() {
    let mock = MockUpstream::start().await.unwrap();
    let app = test_app(&mock.base_url());
    let server = TestServer::start(app.state).await.unwrap();

    let resp = server
        .client()
        .get(server.url("/health"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "ok");
}
