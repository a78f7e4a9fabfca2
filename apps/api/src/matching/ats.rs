//! ATS heuristics: structural and readability checks on raw resume text.
//!
//! Each rule is an independent predicate over precomputed `ResumeStats` with a
//! fixed penalty. Total penalty is capped, so the score never drops below 40.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

const MAX_SCORE: u32 = 100;
const PENALTY_CAP: u32 = 60;

const MIN_WORDS: usize = 200;
const MAX_WORDS: usize = 1600;
const READABILITY_MIN_WORDS: usize = 250;
const MIN_READING_EASE: f64 = 40.0;
const MIN_SECTION_HEADINGS: usize = 3;
const MIN_ACTION_VERBS: usize = 4;

const SECTION_KEYWORDS: &[&str] = &[
    "experience",
    "work experience",
    "projects",
    "education",
    "skills",
    "summary",
    "profile",
];

const ACTION_VERBS: &[&str] = &[
    "led", "built", "created", "developed", "designed", "implemented", "optimized", "improved",
    "delivered", "launched", "migrated", "automated", "analyzed", "architected", "debugged",
    "deployed", "maintained", "mentored", "owned", "refactored", "reduced", "increased", "saved",
];

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").expect("word regex is valid"));

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[\w.\-]+@[\w.\-]+\.\w+\b").expect("email regex is valid")
});

static PHONE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\+?\d[\d\-\s]{7,})\b").expect("phone regex is valid"));

static BULLET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[-\x{2022}\x{25CF}\x{25E6}\x{2219}]").expect("bullet regex is valid")
});

static DECORATIVE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[✓✔✗✘★☆◆◼►▸➤➢➔➜]").expect("decorative regex is valid"));

static YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:19|20)\d{2}\b").expect("year regex is valid"));

static ACTION_VERB: Lazy<Regex> = Lazy::new(|| {
    let alternation = ACTION_VERBS.join("|");
    Regex::new(&format!(r"(?i)\b(?:{alternation})\b")).expect("action verb regex is valid")
});

static LETTER_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z]+").expect("letter word regex is valid"));

static SENTENCE_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]+").expect("sentence break regex is valid"));

static VOWEL_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[aeiouyAEIOUY]+").expect("vowel run regex is valid"));

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtsResult {
    pub score: u32,
    pub warnings: Vec<String>,
}

/// Measurements every rule reads from. Computed once per resume.
#[derive(Debug, Clone)]
pub struct ResumeStats {
    pub word_count: usize,
    pub has_email: bool,
    pub has_phone: bool,
    pub section_headings: usize,
    pub has_bullet: bool,
    pub has_decorative_symbol: bool,
    pub has_year: bool,
    pub action_verbs: usize,
    pub reading_ease: f64,
}

impl ResumeStats {
    pub fn measure(text: &str) -> Self {
        let lowered = text.to_lowercase();
        let action_verbs: HashSet<String> = ACTION_VERB
            .find_iter(text)
            .map(|m| m.as_str().to_lowercase())
            .collect();

        ResumeStats {
            word_count: WORD.find_iter(text).count(),
            has_email: EMAIL.is_match(text),
            has_phone: PHONE.is_match(text),
            section_headings: SECTION_KEYWORDS
                .iter()
                .filter(|kw| lowered.contains(*kw))
                .count(),
            has_bullet: BULLET.is_match(text),
            has_decorative_symbol: DECORATIVE.is_match(text),
            has_year: YEAR.is_match(text),
            action_verbs: action_verbs.len(),
            reading_ease: flesch_reading_ease(text),
        }
    }
}

/// One heuristic: a predicate, its penalty and the warning shown when it fires.
pub struct AtsRule {
    pub penalty: u32,
    pub warning: &'static str,
    pub triggered: fn(&ResumeStats) -> bool,
}

/// Evaluated in order; warnings keep this order.
pub const ATS_RULES: &[AtsRule] = &[
    AtsRule {
        penalty: 8,
        warning: "Resume may be too short. Add role-specific details.",
        triggered: |s| s.word_count < MIN_WORDS,
    },
    AtsRule {
        penalty: 6,
        warning: "Resume may be too long for quick ATS skim.",
        triggered: |s| s.word_count > MAX_WORDS,
    },
    AtsRule {
        penalty: 8,
        warning: "Email not detected as plain text.",
        triggered: |s| !s.has_email,
    },
    AtsRule {
        penalty: 8,
        warning: "Phone number not detected as plain text.",
        triggered: |s| !s.has_phone,
    },
    AtsRule {
        penalty: 6,
        warning: "Standard sections (Experience/Education/Skills) not clearly labeled.",
        triggered: |s| s.section_headings < MIN_SECTION_HEADINGS,
    },
    AtsRule {
        penalty: 4,
        warning: "Use simple hyphen or • bullets for readability.",
        triggered: |s| !s.has_bullet,
    },
    AtsRule {
        penalty: 3,
        warning: "Avoid decorative symbols; ATS may not parse them correctly.",
        triggered: |s| s.has_decorative_symbol,
    },
    AtsRule {
        penalty: 5,
        warning: "Job dates (years) not detected. Add years for each role.",
        triggered: |s| !s.has_year,
    },
    AtsRule {
        penalty: 5,
        warning: "Use strong action verbs (built, implemented, optimized, etc.).",
        triggered: |s| s.action_verbs < MIN_ACTION_VERBS,
    },
    AtsRule {
        penalty: 4,
        warning: "Sentences may be too complex. Shorten for clarity.",
        triggered: |s| s.word_count >= READABILITY_MIN_WORDS && s.reading_ease < MIN_READING_EASE,
    },
];

/// Scores raw resume text against the ATS rule table.
pub fn ats_check(raw_resume_text: &str) -> AtsResult {
    evaluate(&ResumeStats::measure(raw_resume_text), ATS_RULES)
}

pub fn evaluate(stats: &ResumeStats, rules: &[AtsRule]) -> AtsResult {
    let (penalty, warnings) = rules
        .iter()
        .filter(|rule| (rule.triggered)(stats))
        .fold((0u32, Vec::new()), |(penalty, mut warnings), rule| {
            warnings.push(rule.warning.to_string());
            (penalty + rule.penalty, warnings)
        });

    AtsResult {
        score: MAX_SCORE - penalty.min(PENALTY_CAP),
        warnings,
    }
}

/// Flesch Reading Ease, with syllables approximated by vowel runs (at least one per word).
pub fn flesch_reading_ease(text: &str) -> f64 {
    let words: Vec<&str> = LETTER_WORD.find_iter(text).map(|m| m.as_str()).collect();
    let syllables: usize = words
        .iter()
        .map(|w| VOWEL_RUN.find_iter(w).count().max(1))
        .sum();
    let sentences = SENTENCE_BREAK
        .split(text)
        .filter(|fragment| !fragment.trim().is_empty())
        .count()
        .max(1) as f64;
    let word_count = words.len().max(1) as f64;

    206.835 - 1.015 * (word_count / sentences) - 84.6 * (syllables as f64 / word_count)
}
