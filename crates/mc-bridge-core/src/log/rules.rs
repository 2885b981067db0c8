//! The classification rule table.
//!
//! Rules are plain message templates grouped by category and stored as TOML:
//!
//! ```toml
//! [join_leave]
//! templates = [
//!     "{player} joined the game",
//!     "{player} lost connection: {any}",
//! ]
//! ```
//!
//! # Template syntax
//!
//! | Token      | Matches                                         |
//! |------------|-------------------------------------------------|
//! | `{player}` | one or more characters that are not whitespace  |
//! | `{any}`    | any text, including nothing                     |
//! | `{{`, `}}` | a literal `{` or `}`                            |
//!
//! Everything else is matched literally and the template must cover the
//! whole message.  The built-in table ([`RuleSet::default`]) is compiled into
//! the crate from `default_rules.toml`; operators can supply their own with
//! [`RuleSet::from_toml_str`] when the game adds new messages.

use serde::Deserialize;
use thiserror::Error;

/// The built-in rule table.
pub const DEFAULT_RULES_TOML: &str = include_str!("default_rules.toml");

/// Errors raised while loading or compiling a rule table.
#[derive(Debug, Error)]
pub enum RuleError {
    /// The TOML document could not be parsed.
    #[error("failed to parse rule table: {0}")]
    Parse(#[from] toml::de::Error),

    /// A template uses an unknown placeholder or has an unbalanced brace.
    #[error("invalid template {template:?}: {reason}")]
    Template { template: String, reason: String },

    /// The compiled templates were rejected by the regex engine.
    #[error("failed to compile templates: {0}")]
    Compile(#[from] regex::Error),
}

/// Templates for one category.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct CategoryRules {
    /// Ordered list of message templates.
    #[serde(default)]
    pub templates: Vec<String>,
}

/// The complete rule table, one entry per classifiable category.
///
/// A section missing from the TOML yields an empty template list, so that
/// category never matches.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RuleSet {
    #[serde(default)]
    pub chat: CategoryRules,
    #[serde(default)]
    pub join_leave: CategoryRules,
    #[serde(default)]
    pub death: CategoryRules,
    #[serde(default)]
    pub advancement: CategoryRules,
}

impl RuleSet {
    /// Parses a rule table from TOML text and validates every template.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::Parse`] for malformed TOML and
    /// [`RuleError::Template`] for a malformed template.
    pub fn from_toml_str(toml_text: &str) -> Result<Self, RuleError> {
        let rules: RuleSet = toml::from_str(toml_text)?;
        for template in rules.all_templates() {
            template_to_pattern(template)?;
        }
        Ok(rules)
    }

    fn all_templates(&self) -> impl Iterator<Item = &String> {
        self.chat
            .templates
            .iter()
            .chain(&self.join_leave.templates)
            .chain(&self.death.templates)
            .chain(&self.advancement.templates)
    }
}

impl Default for RuleSet {
    /// Returns the built-in rule table.
    fn default() -> Self {
        toml::from_str(DEFAULT_RULES_TOML).expect("built-in rule table is valid TOML")
    }
}

/// Translates one template into an anchored regular expression.
///
/// # Errors
///
/// Returns [`RuleError::Template`] for unknown placeholders or unbalanced
/// braces.
pub fn template_to_pattern(template: &str) -> Result<String, RuleError> {
    let invalid = |reason: &str| RuleError::Template {
        template: template.to_string(),
        reason: reason.to_string(),
    };

    let mut pattern = String::from("^");
    let mut literal = String::new();
    let mut rest = template;

    while let Some(c) = rest.chars().next() {
        if let Some(tail) = rest.strip_prefix("{{") {
            literal.push('{');
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix("}}") {
            literal.push('}');
            rest = tail;
        } else if c == '{' {
            let end = rest.find('}').ok_or_else(|| invalid("unclosed '{'"))?;
            let placeholder = &rest[1..end];
            pattern.push_str(&regex::escape(&literal));
            literal.clear();
            match placeholder {
                "player" => pattern.push_str(r"\S+"),
                "any" => pattern.push_str("(?s:.*)"),
                other => return Err(invalid(&format!("unknown placeholder {{{other}}}"))),
            }
            rest = &rest[end + 1..];
        } else if c == '}' {
            return Err(invalid("unmatched '}'"));
        } else {
            literal.push(c);
            rest = &rest[c.len_utf8()..];
        }
    }

    pattern.push_str(&regex::escape(&literal));
    pattern.push('$');
    Ok(pattern)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
