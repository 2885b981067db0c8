//! Inbound chat-webhook payload and the in-game command built from it.

use std::fmt;

use serde::Deserialize;
use serde_json::json;

/// The fields of an outgoing-webhook delivery this bridge cares about.
///
/// The chat platform sends a form-encoded body with many more fields; they
/// are ignored.  Missing fields deserialize as empty strings.
#[derive(Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WebhookPayload {
    pub token: String,
    pub user_name: String,
    pub text: String,
}

impl fmt::Debug for WebhookPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebhookPayload")
            .field("token", &"<redacted>")
            .field("user_name", &self.user_name)
            .field("text", &self.text)
            .finish()
    }
}

/// Builds the command that shows `<user_name> text` to every player.
///
/// The chat line is embedded as a JSON text component, so quotes,
/// backslashes and non-ASCII text reach the game intact.
///
/// ```rust
/// use mc_bridge_server::domain::tellraw_command;
///
/// assert_eq!(
///     tellraw_command("alice", "hi"),
///     r#"tellraw @a {"text":"<alice> hi"}"#
/// );
/// ```
pub fn tellraw_command(user_name: &str, text: &str) -> String {
    let component = json!({ "text": format!("<{user_name}> {text}") });
    format!("tellraw @a {component}")
}

// ── Tests ─────────────────────────────────────────────────────────────────────
