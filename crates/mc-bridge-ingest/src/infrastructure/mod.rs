//! Infrastructure layer: the outbound webhook client and rule file loading.

pub mod chat_poster;
pub mod rules_file;

pub use chat_poster::{PostError, WebhookPoster};
pub use rules_file::{load_rule_set, RulesFileError};
