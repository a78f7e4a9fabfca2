//! Match scoring: section-weighted TF-IDF similarity blended with whole-document
//! similarity, plus the term overlap/gap lists shown next to the score.
//!
//! `AppState` holds an `Arc<dyn MatchScorer>`. The default backend,
//! `TfIdfMatchScorer`, fits a fresh two-document model for every comparison,
//! so one scorer instance is safe to share across concurrent requests.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::matching::lexicon::Lexicon;
use crate::matching::normalize::{tokenize, Document};
use crate::matching::sections::{section_weight, split_sections};
use crate::matching::skills::{suggest_skills, SkillCatalog};
use crate::matching::tfidf::{fit_pair, pair_similarity};

/// Same-named sections (experience vs experience) get a small affinity bonus.
pub const SAME_SECTION_BONUS: f64 = 1.05;
pub const SECTION_BLEND: f64 = 0.7;
pub const GLOBAL_BLEND: f64 = 0.3;

const TERM_LIST_LIMIT: usize = 20;
const JD_TOP_TERMS: usize = 15;
const WEIGHT_EPSILON: f64 = 1e-9;

/// Result of matching one resume against one job description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub match_percent: f64, // 0..=100, two decimals
    pub top_overlap: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub jd_top_terms: Vec<String>,
    pub suggested_skills: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Swappable match backend. Implementations must not keep per-call state.
pub trait MatchScorer: Send + Sync {
    fn score(&self, resume_text: &str, jd_text: &str, role_hint: Option<&str>) -> MatchResult;

    /// Backend label, for logs.
    fn backend(&self) -> &'static str;
}

/// Default scorer: lexical TF-IDF with section awareness.
pub struct TfIdfMatchScorer {
    lexicon: Arc<Lexicon>,
    catalog: Arc<SkillCatalog>,
}

impl TfIdfMatchScorer {
    pub fn new(lexicon: Arc<Lexicon>, catalog: Arc<SkillCatalog>) -> Self {
        TfIdfMatchScorer { lexicon, catalog }
    }
}

impl MatchScorer for TfIdfMatchScorer {
    fn score(&self, resume_text: &str, jd_text: &str, role_hint: Option<&str>) -> MatchResult {
        match_documents(&self.lexicon, &self.catalog, resume_text, jd_text, role_hint)
    }

    fn backend(&self) -> &'static str {
        "tfidf"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Core scoring
// ────────────────────────────────────────────────────────────────────────────

/// Scores a resume against one job description.
pub fn match_documents(
    lexicon: &Lexicon,
    catalog: &SkillCatalog,
    resume_text: &str,
    jd_text: &str,
    role_hint: Option<&str>,
) -> MatchResult {
    let jd = Document::new(lexicon, jd_text);
    let resume = Document::new(lexicon, resume_text);
    let jd_tokens = jd.tokens(lexicon);
    let resume_tokens = resume.tokens(lexicon);

    let global = fit_pair(&jd_tokens, &resume_tokens);
    let sim_global = global.similarity();
    let sim_sections = section_weighted_score(lexicon, resume.raw, jd.raw);

    let blended = SECTION_BLEND * sim_sections + GLOBAL_BLEND * sim_global;
    let match_percent = round2((blended * 100.0).clamp(0.0, 100.0));
    debug!(sim_sections, sim_global, match_percent, "blended match score");

    let (top_overlap, missing_keywords) = term_overlap(&jd_tokens, &resume_tokens);

    MatchResult {
        match_percent,
        top_overlap,
        missing_keywords,
        jd_top_terms: global.left.top_terms(JD_TOP_TERMS),
        suggested_skills: suggest_skills(lexicon, catalog, resume_text, jd_text, role_hint),
    }
}

/// Weighted average, over job-description sections, of the best similarity
/// any resume section reaches against that section.
///
/// A same-named resume section has its similarity multiplied by
/// `SAME_SECTION_BONUS` and then clamped to 1.0.
pub fn section_weighted_score(lexicon: &Lexicon, resume_text: &str, jd_text: &str) -> f64 {
    let resume_sections: Vec<_> = split_sections(resume_text)
        .into_iter()
        .map(|section| (section.name, tokenize(lexicon, section.text)))
        .collect();

    let mut weighted_sum = 0.0;
    let mut weight_total = 0.0;

    for jd_section in split_sections(jd_text) {
        let jd_tokens = tokenize(lexicon, jd_section.text);
        let weight = section_weight(jd_section.name.as_str());

        let best = resume_sections
            .iter()
            .map(|(name, resume_tokens)| {
                let sim = pair_similarity(&jd_tokens, resume_tokens);
                if *name == jd_section.name {
                    (sim * SAME_SECTION_BONUS).min(1.0)
                } else {
                    sim
                }
            })
            .fold(0.0_f64, f64::max);

        weighted_sum += best * weight;
        weight_total += weight;
    }

    weighted_sum / weight_total.max(WEIGHT_EPSILON)
}

/// Sorted `(shared, missing)` job-description terms, each capped at 20.
pub fn term_overlap(jd_tokens: &[String], resume_tokens: &[String]) -> (Vec<String>, Vec<String>) {
    let jd: BTreeSet<&String> = jd_tokens.iter().collect();
    let resume: BTreeSet<&String> = resume_tokens.iter().collect();

    let overlap = jd
        .intersection(&resume)
        .take(TERM_LIST_LIMIT)
        .map(|t| t.to_string())
        .collect();
    let missing = jd
        .difference(&resume)
        .take(TERM_LIST_LIMIT)
        .map(|t| t.to_string())
        .collect();
    (overlap, missing)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const RESUME: &str = "Summary\nData analyst with a focus on reporting.\n\
        Experience\nAnalyst, Acme (2019-2023)\n- Built Tableau dashboards for sales\n\
        - Automated SQL reports with Python\n\
        Skills\nPython, SQL, Excel, Tableau\n\
        Education\nB.Sc. Statistics\n";

    const JD: &str = "Experience\n3+ years building dashboards in Tableau/Power BI.\n\
        Skills\nSQL, Python, A/B testing, ETL pipelines\n";

    fn fixtures() -> (Lexicon, SkillCatalog) {
        (Lexicon::builtin().unwrap(), SkillCatalog::builtin().unwrap())
    }

    #[test]
    fn test_identical_documents_score_100() {
        let (lex, cat) = fixtures();
        let result = match_documents(&lex, &cat, RESUME, RESUME, None);
        assert!(
            (result.match_percent - 100.0).abs() < 0.01,
            "got {}",
            result.match_percent
        );
        assert!(result.missing_keywords.is_empty());
    }

    #[test]
    fn test_identical_text_without_headings_scores_100() {
        let (lex, cat) = fixtures();
        let text = "Python developer building data pipelines with Airflow";
        let result = match_documents(&lex, &cat, text, text, None);
        assert!((result.match_percent - 100.0).abs() < 0.01);
    }

    #[test]
    fn test_empty_inputs_score_zero() {
        let (lex, cat) = fixtures();
        assert_eq!(match_documents(&lex, &cat, RESUME, "", None).match_percent, 0.0);
        assert_eq!(match_documents(&lex, &cat, "", JD, None).match_percent, 0.0);
        assert_eq!(match_documents(&lex, &cat, "", "", None).match_percent, 0.0);
    }

    #[test]
    fn test_related_documents_score_in_range() {
        let (lex, cat) = fixtures();
        let result = match_documents(&lex, &cat, RESUME, JD, None);
        assert!(
            result.match_percent > 0.0 && result.match_percent < 100.0,
            "got {}",
            result.match_percent
        );
    }

    #[test]
    fn test_unrelated_documents_score_low() {
        let (lex, cat) = fixtures();
        let related = match_documents(&lex, &cat, RESUME, JD, None).match_percent;
        let unrelated = match_documents(
            &lex,
            &cat,
            RESUME,
            "Experience\nLicensed electrician wiring commercial buildings.",
            None,
        )
        .match_percent;
        assert!(unrelated < related, "unrelated {unrelated} >= related {related}");
    }

    #[test]
    fn test_overlap_and_missing_are_disjoint_and_sorted() {
        let (lex, cat) = fixtures();
        let result = match_documents(&lex, &cat, RESUME, JD, None);

        let overlap: BTreeSet<_> = result.top_overlap.iter().collect();
        assert!(result.missing_keywords.iter().all(|t| !overlap.contains(t)));

        let mut sorted = result.top_overlap.clone();
        sorted.sort();
        assert_eq!(result.top_overlap, sorted);

        assert!(result.top_overlap.contains(&"sql".to_string()));
        assert!(result.top_overlap.contains(&"tableau".to_string()));
        assert!(result.missing_keywords.contains(&"a/b".to_string())
            || result.missing_keywords.contains(&"etl".to_string()));
    }

    #[test]
    fn test_jd_top_terms_come_from_job_description() {
        let (lex, cat) = fixtures();
        let result = match_documents(&lex, &cat, RESUME, JD, None);
        assert!(!result.jd_top_terms.is_empty());
        assert!(result.jd_top_terms.len() <= JD_TOP_TERMS);
        let jd_tokens = tokenize(&lex, JD);
        for term in &result.jd_top_terms {
            assert!(
                term.split(' ').all(|part| jd_tokens.iter().any(|t| t == part)),
                "{term} is not a job-description term"
            );
        }
    }

    #[test]
    fn test_term_lists_are_capped() {
        let jd: Vec<String> = (0..50).map(|i| format!("term{i:02}")).collect();
        let resume: Vec<String> = jd.iter().step_by(2).cloned().collect();
        let (overlap, missing) = term_overlap(&jd, &resume);
        assert_eq!(overlap.len(), TERM_LIST_LIMIT);
        assert_eq!(missing.len(), TERM_LIST_LIMIT);
        assert_eq!(overlap[0], "term00");
        assert_eq!(missing[0], "term01");
    }

    #[test]
    fn test_same_section_bonus_is_clamped() {
        let lex = Lexicon::builtin().unwrap();
        let text = "Experience\nRust services on Kubernetes";
        let score = section_weighted_score(&lex, text, text);
        assert!(score <= 1.0, "score was {score}");
        assert!((score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_same_section_bonus_breaks_ties() {
        let lex = Lexicon::builtin().unwrap();
        // the experience section wins and gets the same-section bonus on top
        let resume = "Skills\nkafka spark flink\nExperience\nkafka spark flink";
        let jd = "Experience\nkafka spark airflow";
        let with_bonus = section_weighted_score(&lex, resume, jd);
        let plain = pair_similarity(
            &tokenize(&lex, "kafka spark airflow"),
            &tokenize(&lex, "kafka spark flink"),
        );
        assert!(with_bonus > plain, "{with_bonus} <= {plain}");
    }

    #[test]
    fn test_scorer_is_reentrant_across_threads() {
        let (lex, cat) = fixtures();
        let scorer: Arc<dyn MatchScorer> =
            Arc::new(TfIdfMatchScorer::new(Arc::new(lex), Arc::new(cat)));
        let expected = scorer.score(RESUME, JD, None);

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let scorer = Arc::clone(&scorer);
                std::thread::spawn(move || scorer.score(RESUME, JD, None))
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
        assert_eq!(scorer.backend(), "tfidf");
    }

    #[test]
    fn test_role_hint_feeds_suggestions() {
        let (lex, cat) = fixtures();
        let result = match_documents(&lex, &cat, RESUME, JD, Some("Data Analyst"));
        assert!(result.suggested_skills.contains(&"power bi".to_string()));
        assert!(!result.suggested_skills.contains(&"python".to_string()));
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(12.345_6), 12.35);
        assert_eq!(round2(0.0), 0.0);
    }
}
