//! ForwardChatUseCase: turns a validated webhook delivery into an in-game
//! chat line.
//!
//! # Architecture
//!
//! The use case depends only on the [`CommandExecutor`] trait and domain
//! types.  Production code injects the RCON client; tests inject a recording
//! double, so no game server is needed to exercise the token and
//! ignore-list rules.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::domain::{tellraw_command, ServerConfig, WebhookPayload};
use crate::infrastructure::rcon::RconError;

/// Runs commands on the game server.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Executes `command`, returning the server's reply text.
    async fn execute(&self, command: &str, timeout: Duration) -> Result<String, RconError>;
}

/// Why a delivery was not forwarded.
#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("webhook token does not match")]
    Unauthorized,

    #[error("failed to forward message to the game server: {0}")]
    Command(#[from] RconError),
}

/// What happened to an accepted delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForwardOutcome {
    /// The message was shown in game.
    Forwarded { command: String },
    /// The sender is on the ignore list; nothing was sent.
    Ignored,
}

/// Validates webhook deliveries and forwards them as `tellraw` commands.
pub struct ForwardChatUseCase<E: CommandExecutor + ?Sized> {
    executor: Arc<E>,
    token: String,
    ignored_users: Vec<String>,
    timeout: Duration,
}

impl<E: CommandExecutor + ?Sized> ForwardChatUseCase<E> {
    /// Creates the use case with the token, ignore list and RCON timeout
    /// taken from `config`.
    pub fn new(executor: Arc<E>, config: &ServerConfig) -> Self {
        Self {
            executor,
            token: config.webhook_token.clone(),
            ignored_users: config.ignored_users.clone(),
            timeout: config.rcon_timeout,
        }
    }

    /// Handles one delivery.
    ///
    /// # Errors
    ///
    /// [`ForwardError::Unauthorized`] on a token mismatch or an empty token
    /// (checked before anything else), [`ForwardError::Command`] if the game
    /// server could not run the command.
    pub async fn handle(&self, payload: &WebhookPayload) -> Result<ForwardOutcome, ForwardError> {
        if payload.token.is_empty() || payload.token != self.token {
            info!(user = %payload.user_name, "rejected webhook with bad token");
            return Err(ForwardError::Unauthorized);
        }

        if self.ignored_users.iter().any(|u| *u == payload.user_name) {
            debug!(user = %payload.user_name, "ignoring message from ignored user");
            return Ok(ForwardOutcome::Ignored);
        }

        let command = tellraw_command(&payload.user_name, &payload.text);
        match self.executor.execute(&command, self.timeout).await {
            Ok(_) => {
                debug!(user = %payload.user_name, "forwarded chat message");
                Ok(ForwardOutcome::Forwarded { command })
            }
            Err(e) => {
                error!(user = %payload.user_name, error = %e, "failed to forward message");
                Err(e.into())
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::rcon::TransportError;
    use std::sync::Mutex;

    // ── Test doubles ──────────────────────────────────────────────────────────

    /// Records every command; optionally fails each call with a timeout.
    #[derive(Default)]
    struct RecordingExecutor {
        commands: Mutex<Vec<(String, Duration)>>,
        fail: bool,
    }

    impl RecordingExecutor {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        fn commands(&self) -> Vec<String> {
            self.commands
                .lock()
                .unwrap()
                .iter()
                .map(|(c, _)| c.clone())
                .collect()
        }
    }

    #[async_trait]
    impl CommandExecutor for RecordingExecutor {
        async fn execute(&self, command: &str, timeout: Duration) -> Result<String, RconError> {
            self.commands.lock().unwrap().push((command.to_string(), timeout));
            if self.fail {
                Err(TransportError::TimedOut(timeout).into())
            } else {
                Ok(String::new())
            }
        }
    }

    fn config() -> ServerConfig {
        ServerConfig {
            webhook_token: "tok".to_string(),
            ignored_users: vec!["slackbot".to_string(), "bridge".to_string()],
            rcon_timeout: Duration::from_secs(3),
            ..ServerConfig::default()
        }
    }

    fn payload(token: &str, user: &str, text: &str) -> WebhookPayload {
        WebhookPayload {
            token: token.to_string(),
            user_name: user.to_string(),
            text: text.to_string(),
        }
    }

    // ── Tests ─────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_valid_delivery_sends_tellraw() {
        // Arrange
        let executor = Arc::new(RecordingExecutor::default());
        let use_case = ForwardChatUseCase::new(Arc::clone(&executor), &config());

        // Act
        let outcome = use_case.handle(&payload("tok", "alice", "hi")).await.unwrap();

        // Assert
        let expected = r#"tellraw @a {"text":"<alice> hi"}"#.to_string();
        assert_eq!(outcome, ForwardOutcome::Forwarded { command: expected.clone() });
        assert_eq!(executor.commands(), vec![expected]);
    }

    #[tokio::test]
    async fn test_configured_timeout_is_passed_to_executor() {
        let executor = Arc::new(RecordingExecutor::default());
        let use_case = ForwardChatUseCase::new(Arc::clone(&executor), &config());

        use_case.handle(&payload("tok", "alice", "hi")).await.unwrap();

        let recorded = executor.commands.lock().unwrap();
        assert_eq!(recorded[0].1, Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_bad_token_is_unauthorized_and_sends_nothing() {
        // Arrange
        let executor = Arc::new(RecordingExecutor::default());
        let use_case = ForwardChatUseCase::new(Arc::clone(&executor), &config());

        // Act
        let result = use_case.handle(&payload("wrong", "alice", "hi")).await;

        // Assert
        assert!(matches!(result, Err(ForwardError::Unauthorized)));
        assert!(executor.commands().is_empty());
    }

    #[tokio::test]
    async fn test_empty_token_is_unauthorized_even_when_configured_empty() {
        // Arrange
        let config = ServerConfig {
            webhook_token: String::new(),
            ..config()
        };
        let executor = Arc::new(RecordingExecutor::default());
        let use_case = ForwardChatUseCase::new(Arc::clone(&executor), &config);

        // Act
        let result = use_case.handle(&payload("", "alice", "hi")).await;

        // Assert
        assert!(matches!(result, Err(ForwardError::Unauthorized)));
        assert!(executor.commands().is_empty());
    }

    #[tokio::test]
    async fn test_token_is_checked_before_ignore_list() {
        let executor = Arc::new(RecordingExecutor::default());
        let use_case = ForwardChatUseCase::new(Arc::clone(&executor), &config());

        let result = use_case.handle(&payload("wrong", "slackbot", "hi")).await;

        assert!(matches!(result, Err(ForwardError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_ignored_user_is_acknowledged_without_command() {
        let executor = Arc::new(RecordingExecutor::default());
        let use_case = ForwardChatUseCase::new(Arc::clone(&executor), &config());

        let outcome = use_case.handle(&payload("tok", "bridge", "echo")).await.unwrap();

        assert_eq!(outcome, ForwardOutcome::Ignored);
        assert!(executor.commands().is_empty());
    }

    #[tokio::test]
    async fn test_executor_failure_is_command_error() {
        let executor = Arc::new(RecordingExecutor::failing());
        let use_case = ForwardChatUseCase::new(Arc::clone(&executor), &config());

        let result = use_case.handle(&payload("tok", "alice", "hi")).await;

        assert!(matches!(
            result,
            Err(ForwardError::Command(RconError::Transport(TransportError::TimedOut(_))))
        ));
        assert_eq!(executor.commands().len(), 1);
    }

    #[tokio::test]
    async fn test_trait_object_executor_is_accepted() {
        // The HTTP layer may hold the executor as `Arc<dyn CommandExecutor>`.
        let executor: Arc<dyn CommandExecutor> = Arc::new(RecordingExecutor::default());
        let use_case = ForwardChatUseCase::new(executor, &config());

        assert!(use_case.handle(&payload("tok", "alice", "hi")).await.is_ok());
    }
}
