//! Curated tables read by the normalizer, tokenizer and skill suggester.
//!
//! Compiled once at startup and shared behind an `Arc`. Nothing in here is
//! mutated after construction, so every scoring call sees the same tables.

use std::collections::HashSet;

use regex::{NoExpand, Regex};

use crate::errors::ConfigError;

/// Phrase variants rewritten to one canonical spelling. Order matters.
const PHRASE_RULES: &[(&str, &str)] = &[
    (r"\b(power[\s\-]?bi)\b", "power bi"),
    (r"\b(a[\s\-/]?b[\s\-]?testing)\b", "a/b testing"),
    (r"\b(a\s+b\s+testing)\b", "a/b testing"),
    (r"\b(ci[\s\-/]?cd)\b", "ci/cd"),
    (r"\b(scikit[\s\-]?learn)\b", "scikit-learn"),
    (r"\b(data\s+visualization)\b", "data visualization"),
    (r"\b(machine\s+learning)\b", "machine learning"),
];

/// Shorthand alternatives ("tableau/power bi") expanded so both terms survive.
const ALTERNATIVE_RULES: &[(&str, &str)] = &[
    (r"\btableau\s*/\s*power(?:\s*bi)?\b", "tableau power bi"),
    (r"\bpower(?:\s*bi)?\s*/\s*tableau\b", "power bi tableau"),
];

const STOPWORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "to", "of", "for", "with", "on", "in", "by", "is", "are", "as",
    "be", "this", "that", "it", "at", "from", "we", "you", "your", "our", "their", "they", "i",
    "me", "my", "into", "about", "over", "under", "using", "use", "used", "via",
];

/// Canonical root → wording variants. A token equal to the root or a variant
/// also emits the root.
const ALIASES: &[(&str, &[&str])] = &[
    ("visualization", &["viz", "data viz"]),
    ("statistics", &["statistical", "stats"]),
    ("sql", &["mysql", "postgresql", "postgres", "mssql"]),
    ("excel", &["spreadsheets"]),
    ("dashboards", &["dashboard"]),
    ("reporting", &["reports"]),
    ("etl", &["data pipeline", "pipelines"]),
];

/// High-value skills surfaced first in suggestion lists.
const PRIORITY_SKILLS: &[&str] = &[
    "python",
    "sql",
    "excel",
    "tableau",
    "power bi",
    "pandas",
    "numpy",
    "javascript",
    "react",
    "tensorflow",
    "pytorch",
    "a/b testing",
    "ci/cd",
    "etl",
    "metrics",
];

/// A compiled `pattern → replacement` rewrite.
#[derive(Debug, Clone)]
pub struct RewriteRule {
    pattern: Regex,
    replacement: String,
}

impl RewriteRule {
    pub fn new(pattern: &str, replacement: &str) -> Result<Self, ConfigError> {
        let compiled = Regex::new(pattern).map_err(|source| ConfigError::Pattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(RewriteRule {
            pattern: compiled,
            replacement: replacement.to_string(),
        })
    }

    pub fn apply(&self, text: &str) -> String {
        self.pattern
            .replace_all(text, NoExpand(&self.replacement))
            .into_owned()
    }
}

#[derive(Debug, Clone)]
struct Alias {
    root: String,
    variants: HashSet<String>,
}

impl Alias {
    fn covers(&self, token: &str) -> bool {
        self.root == token || self.variants.contains(token)
    }
}

/// Immutable lookup tables for text processing.
#[derive(Debug, Clone)]
pub struct Lexicon {
    phrase_rules: Vec<RewriteRule>,
    alternative_rules: Vec<RewriteRule>,
    stopwords: HashSet<String>,
    aliases: Vec<Alias>,
    priority_skills: Vec<String>,
}

impl Lexicon {
    /// Builds the built-in English tech-hiring lexicon.
    pub fn builtin() -> Result<Self, ConfigError> {
        let compile = |rules: &[(&str, &str)]| -> Result<Vec<RewriteRule>, ConfigError> {
            rules
                .iter()
                .map(|(pattern, replacement)| RewriteRule::new(pattern, replacement))
                .collect()
        };

        Ok(Lexicon {
            phrase_rules: compile(PHRASE_RULES)?,
            alternative_rules: compile(ALTERNATIVE_RULES)?,
            stopwords: STOPWORDS.iter().map(|s| s.to_string()).collect(),
            aliases: ALIASES
                .iter()
                .map(|(root, variants)| Alias {
                    root: root.to_string(),
                    variants: variants.iter().map(|v| v.to_string()).collect(),
                })
                .collect(),
            priority_skills: PRIORITY_SKILLS.iter().map(|s| s.to_string()).collect(),
        })
    }

    pub fn phrase_rules(&self) -> &[RewriteRule] {
        &self.phrase_rules
    }

    pub fn alternative_rules(&self) -> &[RewriteRule] {
        &self.alternative_rules
    }

    pub fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.contains(token)
    }

    /// Alias roots covering either spelling of a token, in table order.
    /// `surface` is the token as written, `singular` its singularized form.
    pub fn alias_roots<'a>(
        &'a self,
        surface: &'a str,
        singular: &'a str,
    ) -> impl Iterator<Item = &'a str> + 'a {
        self.aliases
            .iter()
            .filter(move |alias| alias.covers(surface) || alias.covers(singular))
            .map(|alias| alias.root.as_str())
    }

    pub fn is_priority_skill(&self, skill: &str) -> bool {
        self.priority_skills.iter().any(|p| p == skill)
    }
}
