//! Loading an operator-supplied classification rule table from disk.

use std::path::{Path, PathBuf};

use mc_bridge_core::{RuleError, RuleSet};
use thiserror::Error;
use tracing::info;

/// Failure to load a rule table.
#[derive(Debug, Error)]
pub enum RulesFileError {
    #[error("failed to read rule file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid rule file {path}")]
    Rules {
        path: PathBuf,
        #[source]
        source: RuleError,
    },
}

/// Returns the rule table at `path`, or the built-in one when `path` is
/// `None`.
///
/// # Errors
///
/// [`RulesFileError::Io`] if the file cannot be read,
/// [`RulesFileError::Rules`] if it is not a valid rule table.
pub fn load_rule_set(path: Option<&Path>) -> Result<RuleSet, RulesFileError> {
    let Some(path) = path else {
        return Ok(RuleSet::default());
    };

    let text = std::fs::read_to_string(path).map_err(|source| RulesFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let rules = RuleSet::from_toml_str(&text).map_err(|source| RulesFileError::Rules {
        path: path.to_path_buf(),
        source,
    })?;

    info!(path = %path.display(), "loaded classification rules");
    Ok(rules)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
