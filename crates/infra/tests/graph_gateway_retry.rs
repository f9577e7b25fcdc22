//! End-to-end tests of the gateway's credential renewal behavior against
//! mock token and API servers.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use draftpilot_domain::GraphConfig;
use draftpilot_infra::{CredentialStore, GatewayError, GraphGateway, HttpClient};

fn http() -> HttpClient {
    HttpClient::builder()
        .timeout(Duration::from_secs(2))
        .max_attempts(1)
        .build()
        .expect("http client")
}

fn graph_config() -> GraphConfig {
    GraphConfig {
        tenant_id: "tenant-1".to_string(),
        client_id: "client-1".to_string(),
        client_secret: "secret-1".to_string(),
        mailbox: "team@example.com".to_string(),
    }
}

async fn token_server(expected_grants: u64) -> MockServer {
    let server = MockServer::start().await;
    let counter = Arc::new(AtomicUsize::new(0));
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(move |_req: &Request| -> ResponseTemplate {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "token_type": "Bearer",
                "expires_in": 3599,
                "access_token": format!("token-{n}")
            }))
        })
        .expect(expected_grants)
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn renews_once_then_succeeds_when_the_replay_is_accepted() {
    // Initial grant + one renewal.
    let tokens = token_server(2).await;
    let api = MockServer::start().await;

    // token-0 is rejected, token-1 (post-renewal) is accepted.
    Mock::given(method("PATCH"))
        .and(path("/users/team@example.com/messages/m1"))
        .respond_with(|req: &Request| -> ResponseTemplate {
            let authorized = req
                .headers
                .get("authorization")
                .and_then(|value| value.to_str().ok())
                .map(|value| value == "Bearer token-1")
                .unwrap_or(false);
            if authorized {
                ResponseTemplate::new(200)
            } else {
                ResponseTemplate::new(401)
            }
        })
        .expect(2)
        .mount(&api)
        .await;

    let credentials = Arc::new(
        CredentialStore::client_credentials(&graph_config(), http())
            .with_token_url(format!("{}/token", tokens.uri())),
    );
    let gateway =
        GraphGateway::new(http(), credentials, "team@example.com").with_base_url(api.uri());

    gateway.mark_read("m1").await.expect("renewal replay should succeed");
}

#[tokio::test]
async fn renewal_is_attempted_exactly_once_for_persistent_rejection() {
    // Initial grant + one renewal, and no more even though the API keeps
    // rejecting.
    let tokens = token_server(2).await;
    let api = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/users/team@example.com/messages/m1"))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&api)
        .await;

    let credentials = Arc::new(
        CredentialStore::client_credentials(&graph_config(), http())
            .with_token_url(format!("{}/token", tokens.uri())),
    );
    let gateway =
        GraphGateway::new(http(), credentials, "team@example.com").with_base_url(api.uri());

    let result = gateway.mark_read("m1").await;
    assert!(matches!(result, Err(GatewayError::Unauthorized)));
}

#[tokio::test]
async fn external_credentials_are_never_renewed() {
    // The token endpoint must not be touched at all.
    let tokens = token_server(0).await;
    let api = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/users/team@example.com/messages/m1"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&api)
        .await;

    let credentials = Arc::new(CredentialStore::external("caller-token"));
    let gateway =
        GraphGateway::new(http(), credentials, "team@example.com").with_base_url(api.uri());

    let result = gateway.mark_read("m1").await;
    assert!(matches!(result, Err(GatewayError::ExternalCredentialExpired)));

    // Dropping the server verifies the expect(0) on the token mock.
    drop(tokens);
}
