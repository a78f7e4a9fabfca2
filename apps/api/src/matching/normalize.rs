//! Normalizer and tokenizer shared by every scoring component.
//!
//! Technical symbols (`+ # / . -`) survive normalization so that `c++`, `c#`
//! and `ci/cd` stay intact as single tokens.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::matching::lexicon::Lexicon;

static UNSUPPORTED_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9 \-+/.#]").expect("unsupported-char regex is valid"));

static SENTENCE_DOTS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.+(?:\s|$)").expect("sentence-dot regex is valid"));

static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex is valid"));

static TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-z0-9+#/.\-]+").expect("token regex is valid"));

const MIN_TOKEN_LEN: usize = 3;

/// Raw text paired with its normalized form. Lives for one scoring call.
#[derive(Debug, Clone)]
pub struct Document<'a> {
    pub raw: &'a str,
    pub normalized: String,
}

impl<'a> Document<'a> {
    pub fn new(lexicon: &Lexicon, raw: &'a str) -> Self {
        Document {
            raw,
            normalized: normalize_text(lexicon, raw),
        }
    }

    pub fn tokens(&self, lexicon: &Lexicon) -> Vec<String> {
        tokenize(lexicon, &self.normalized)
    }
}

/// Lowercases, strips unsupported punctuation, canonicalizes phrases, expands
/// shorthand alternatives and collapses whitespace. A fixed point on its own output.
pub fn normalize_text(lexicon: &Lexicon, raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let lowered = raw.to_lowercase();
    let stripped = UNSUPPORTED_CHARS.replace_all(&lowered, " ");
    let dotless = SENTENCE_DOTS.replace_all(&stripped, " ");
    // rules expect single spaces between words
    let mut text = WHITESPACE.replace_all(&dotless, " ").into_owned();

    // Alternatives must see canonical phrases, so phrase rules run first.
    for rule in lexicon.phrase_rules() {
        text = rule.apply(&text);
    }
    for rule in lexicon.alternative_rules() {
        text = rule.apply(&text);
    }

    WHITESPACE.replace_all(&text, " ").trim().to_string()
}

/// Splits text into distinct terms, first occurrence first.
///
/// Short tokens, stopwords and the stray `cd` are dropped, tokens are lightly
/// singularized, and alias roots are appended after any token they cover.
pub fn tokenize(lexicon: &Lexicon, raw: &str) -> Vec<String> {
    let normalized = normalize_text(lexicon, raw);

    let mut seen: HashSet<String> = HashSet::new();
    let mut tokens = Vec::new();
    let mut push = |term: &str, tokens: &mut Vec<String>| {
        if seen.insert(term.to_string()) {
            tokens.push(term.to_string());
        }
    };

    for found in TOKEN.find_iter(&normalized) {
        let surface = found.as_str().trim_matches(&['.', '-'][..]);
        if surface.len() < MIN_TOKEN_LEN || lexicon.is_stopword(surface) {
            continue;
        }
        // lone "cd" is noise; "ci/cd" is already a single token
        if surface == "cd" {
            continue;
        }

        let singular = singularize(surface);
        push(singular, &mut tokens);
        for root in lexicon.alias_roots(surface, singular) {
            push(root, &mut tokens);
        }
    }

    tokens
}

/// Light singularization: `dashboards` → `dashboard`, but `class` and `aws` stay.
pub fn singularize(token: &str) -> &str {
    if token.len() > 3 && token.ends_with('s') && !token.ends_with("ss") {
        &token[..token.len() - 1]
    } else {
        token
    }
}
