//! Event classification for parsed log message bodies.
//!
//! A [`Classifier`] compiles each category's templates from a [`RuleSet`]
//! into one anchored [`RegexSet`], so testing a message against dozens of
//! death templates is a single pass over the text.
//!
//! The four predicates are independent.  [`Classifier::classify`] tests them
//! in the fixed order chat → join/leave → death → advancement and returns the
//! first match, which only matters if an operator-supplied table introduces
//! overlapping templates.

use std::sync::OnceLock;

use regex::RegexSet;
use tracing::debug;

use crate::log::rules::{template_to_pattern, CategoryRules, RuleError, RuleSet};

/// The closed set of message categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// `<player> text`
    Chat,
    /// A player joined, left, or lost connection.
    JoinLeave,
    /// One of the game's death messages.
    Death,
    /// An advancement, challenge or goal was reached.
    Advancement,
    /// Nothing worth forwarding.
    None,
}

impl Category {
    /// Categories in the order [`Classifier::classify`] tests them.
    pub const MATCH_ORDER: [Category; 4] = [
        Category::Chat,
        Category::JoinLeave,
        Category::Death,
        Category::Advancement,
    ];

    /// Returns `true` for every category except [`Category::None`].
    pub fn is_forwardable(self) -> bool {
        self != Category::None
    }
}

/// Compiled templates of one category, kept alongside their source text so
/// diagnostics can name the rule that matched.
#[derive(Debug)]
struct CategoryMatcher {
    set: RegexSet,
    templates: Vec<String>,
}

impl CategoryMatcher {
    fn compile(rules: &CategoryRules) -> Result<Self, RuleError> {
        let patterns = rules
            .templates
            .iter()
            .map(|t| template_to_pattern(t))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            set: RegexSet::new(patterns)?,
            templates: rules.templates.clone(),
        })
    }

    fn is_match(&self, message: &str) -> bool {
        self.set.is_match(message)
    }

    fn first_match(&self, message: &str) -> Option<&str> {
        self.set
            .matches(message)
            .iter()
            .next()
            .map(|i| self.templates[i].as_str())
    }
}

/// Message classifier built from a rule table.
#[derive(Debug)]
pub struct Classifier {
    chat: CategoryMatcher,
    join_leave: CategoryMatcher,
    death: CategoryMatcher,
    advancement: CategoryMatcher,
}

impl Classifier {
    /// Compiles every template in `rules`.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError`] if a template is malformed.
    pub fn new(rules: &RuleSet) -> Result<Self, RuleError> {
        let classifier = Self {
            chat: CategoryMatcher::compile(&rules.chat)?,
            join_leave: CategoryMatcher::compile(&rules.join_leave)?,
            death: CategoryMatcher::compile(&rules.death)?,
            advancement: CategoryMatcher::compile(&rules.advancement)?,
        };
        debug!(
            chat = classifier.chat.templates.len(),
            join_leave = classifier.join_leave.templates.len(),
            death = classifier.death.templates.len(),
            advancement = classifier.advancement.templates.len(),
            "compiled classification rules"
        );
        Ok(classifier)
    }

    /// Returns `true` if `message` is a player chat line.
    pub fn is_chat(&self, message: &str) -> bool {
        self.chat.is_match(message)
    }

    /// Returns `true` if `message` reports a player joining or leaving.
    pub fn is_join_leave(&self, message: &str) -> bool {
        self.join_leave.is_match(message)
    }

    /// Returns `true` if `message` is a death message.
    pub fn is_death(&self, message: &str) -> bool {
        self.death.is_match(message)
    }

    /// Returns `true` if `message` announces an advancement.
    pub fn is_advancement(&self, message: &str) -> bool {
        self.advancement.is_match(message)
    }

    /// Returns the first matching category, or [`Category::None`].
    pub fn classify(&self, message: &str) -> Category {
        Category::MATCH_ORDER
            .into_iter()
            .find(|&category| self.matcher(category).is_some_and(|m| m.is_match(message)))
            .unwrap_or(Category::None)
    }

    /// Returns the first template of `category` that matches `message`.
    pub fn matching_rule(&self, category: Category, message: &str) -> Option<&str> {
        self.matcher(category)?.first_match(message)
    }

    fn matcher(&self, category: Category) -> Option<&CategoryMatcher> {
        match category {
            Category::Chat => Some(&self.chat),
            Category::JoinLeave => Some(&self.join_leave),
            Category::Death => Some(&self.death),
            Category::Advancement => Some(&self.advancement),
            Category::None => None,
        }
    }
}

impl Default for Classifier {
    /// Builds a classifier from the built-in rule table.
    fn default() -> Self {
        Self::new(&RuleSet::default()).expect("built-in rule table compiles")
    }
}

// ── Default-table shortcuts ───────────────────────────────────────────────────

fn default_classifier() -> &'static Classifier {
    static CLASSIFIER: OnceLock<Classifier> = OnceLock::new();
    CLASSIFIER.get_or_init(Classifier::default)
}

/// [`Classifier::is_chat`] against the built-in rule table.
pub fn is_chat_message(message: &str) -> bool {
    default_classifier().is_chat(message)
}

/// [`Classifier::is_join_leave`] against the built-in rule table.
pub fn is_join_leave_message(message: &str) -> bool {
    default_classifier().is_join_leave(message)
}

/// [`Classifier::is_death`] against the built-in rule table.
pub fn is_death_message(message: &str) -> bool {
    default_classifier().is_death(message)
}

/// [`Classifier::is_advancement`] against the built-in rule table.
pub fn is_advancement_message(message: &str) -> bool {
    default_classifier().is_advancement(message)
}

/// [`Classifier::classify`] against the built-in rule table.
pub fn classify_message(message: &str) -> Category {
    default_classifier().classify(message)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
