//! End-to-end tests of the webhook endpoint: a real axum server on a loopback
//! port, driven with reqwest, forwarding into the in-memory RCON server.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use mc_bridge_server::application::ForwardChatUseCase;
use mc_bridge_server::domain::ServerConfig;
use mc_bridge_server::infrastructure::rcon::mock::MockConnector;
use mc_bridge_server::infrastructure::{router, serve, RconClient};
use reqwest::StatusCode;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

const TOKEN: &str = "webhook-token";
const PASSWORD: &str = "minecraft";

struct TestServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TestServer {
    fn url(&self) -> String {
        format!("http://{}/", self.addr)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

async fn start(mock: &MockConnector, rcon_timeout: Duration) -> TestServer {
    start_with_token(mock, TOKEN, rcon_timeout).await
}

async fn start_with_token(mock: &MockConnector, token: &str, rcon_timeout: Duration) -> TestServer {
    let config = ServerConfig {
        webhook_token: token.to_string(),
        rcon_timeout,
        ..ServerConfig::default()
    };
    let rcon = Arc::new(RconClient::with_connector(
        mock.clone(),
        config.rcon_addr.clone(),
        PASSWORD,
    ));
    let use_case = Arc::new(ForwardChatUseCase::new(rcon, &config));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel::<()>();
    tokio::spawn(async move {
        serve(listener, router(use_case), async {
            let _ = rx.await;
        })
        .await
        .unwrap();
    });

    TestServer {
        addr,
        shutdown: Some(tx),
    }
}

async fn post_form(server: &TestServer, fields: &[(&str, &str)]) -> StatusCode {
    reqwest::Client::new()
        .post(server.url())
        .form(fields)
        .send()
        .await
        .unwrap()
        .status()
}

#[tokio::test]
async fn test_valid_webhook_is_forwarded_as_tellraw() {
    // Arrange
    let mock = MockConnector::new(PASSWORD);
    let server = start(&mock, Duration::from_secs(2)).await;

    // Act
    let status = post_form(
        &server,
        &[
            ("token", TOKEN),
            ("team_id", "T0001"),
            ("user_name", "alice"),
            ("text", "hello \"world\""),
        ],
    )
    .await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        mock.stats().commands,
        vec![r#"tellraw @a {"text":"<alice> hello \"world\""}"#]
    );
}

#[tokio::test]
async fn test_bad_token_is_401_and_nothing_is_sent() {
    let mock = MockConnector::new(PASSWORD);
    let server = start(&mock, Duration::from_secs(2)).await;

    let status = post_form(
        &server,
        &[("token", "nope"), ("user_name", "alice"), ("text", "hi")],
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(mock.stats().commands.is_empty());
}

#[tokio::test]
async fn test_missing_token_field_is_401() {
    let mock = MockConnector::new(PASSWORD);
    let server = start(&mock, Duration::from_secs(2)).await;

    let status = post_form(&server, &[("user_name", "alice"), ("text", "hi")]).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_tokenless_webhook_is_401_when_configured_token_is_empty() {
    // Arrange
    let mock = MockConnector::new(PASSWORD);
    let server = start_with_token(&mock, "", Duration::from_secs(2)).await;

    // Act
    let status = post_form(&server, &[("user_name", "mallory"), ("text", "hi")]).await;

    // Assert
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(mock.stats().connections, 0);
}

#[tokio::test]
async fn test_ignored_user_is_200_without_command() {
    let mock = MockConnector::new(PASSWORD);
    let server = start(&mock, Duration::from_secs(2)).await;

    let status = post_form(
        &server,
        &[("token", TOKEN), ("user_name", "slackbot"), ("text", "echo")],
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(mock.stats().commands.is_empty());
    assert_eq!(mock.stats().connections, 0, "no RCON traffic for ignored users");
}

#[tokio::test]
async fn test_failed_command_is_500() {
    // Arrange: the game server never answers commands
    let mock = MockConnector::new(PASSWORD).ignore_commands();
    let server = start(&mock, Duration::from_millis(200)).await;

    // Act
    let status = post_form(
        &server,
        &[("token", TOKEN), ("user_name", "alice"), ("text", "hi")],
    )
    .await;

    // Assert
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_get_is_405() {
    let mock = MockConnector::new(PASSWORD);
    let server = start(&mock, Duration::from_secs(2)).await;

    let status = reqwest::get(server.url()).await.unwrap().status();

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}
