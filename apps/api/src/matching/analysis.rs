//! Full resume analysis against one or more job descriptions.
//!
//! Every description is matched independently; the report averages the scores
//! and merges the term lists. ATS and experience checks read the raw resume.

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::matching::ats::{ats_check, AtsResult};
use crate::matching::experience::{detect_experience, ExperienceResult};
use crate::matching::lexicon::Lexicon;
use crate::matching::similarity::MatchScorer;
use crate::matching::skills::{suggest_skills, SkillCatalog};

const TOP_KEYWORDS_LIMIT: usize = 20;
const MISSING_KEYWORDS_LIMIT: usize = 10;
const JD_TOP_TERMS_LIMIT: usize = 15;
const SUGGESTED_SKILLS_LIMIT: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub analysis_id: Uuid,
    pub analyzed_at: DateTime<Utc>,
    pub role_hint: Option<String>,
    pub jd_count: usize,
    pub match_percent: f64,
    pub top_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub jd_top_terms: Vec<String>,
    pub suggested_skills: Vec<String>,
    pub ats: AtsResult,
    pub experience: ExperienceResult,
}

/// Runs the full analysis. `descriptions` is expected to be non-empty; an
/// empty list yields a zero score and empty keyword lists.
pub fn run_analysis(
    scorer: &dyn MatchScorer,
    lexicon: &Lexicon,
    catalog: &SkillCatalog,
    resume_text: &str,
    descriptions: &[String],
    role_hint: Option<&str>,
) -> AnalysisReport {
    let mut percents = Vec::with_capacity(descriptions.len());
    let mut overlap: BTreeSet<String> = BTreeSet::new();
    let mut missing: BTreeSet<String> = BTreeSet::new();
    let mut all_top_terms: Vec<String> = Vec::new();

    for description in descriptions {
        let result = scorer.score(resume_text, description, role_hint);
        debug!(
            backend = scorer.backend(),
            match_percent = result.match_percent,
            "scored one job description"
        );
        percents.push(result.match_percent);
        overlap.extend(result.top_overlap);
        missing.extend(result.missing_keywords);
        all_top_terms.extend(result.jd_top_terms);
    }

    let first_description = descriptions.first().map(String::as_str).unwrap_or("");
    let mut suggested_skills =
        suggest_skills(lexicon, catalog, resume_text, first_description, role_hint);
    suggested_skills.truncate(SUGGESTED_SKILLS_LIMIT);

    AnalysisReport {
        analysis_id: Uuid::new_v4(),
        analyzed_at: Utc::now(),
        role_hint: role_hint.map(str::to_string),
        jd_count: descriptions.len(),
        match_percent: mean_percent(&percents),
        top_keywords: overlap.into_iter().take(TOP_KEYWORDS_LIMIT).collect(),
        missing_keywords: missing.into_iter().take(MISSING_KEYWORDS_LIMIT).collect(),
        jd_top_terms: most_frequent(&all_top_terms, JD_TOP_TERMS_LIMIT),
        suggested_skills,
        ats: ats_check(resume_text),
        experience: detect_experience(resume_text),
    }
}

fn mean_percent(percents: &[f64]) -> f64 {
    if percents.is_empty() {
        return 0.0;
    }
    let mean = percents.iter().sum::<f64>() / percents.len() as f64;
    (mean * 100.0).round() / 100.0
}

/// The `limit` most frequent terms; equal counts keep first-appearance order.
fn most_frequent(terms: &[String], limit: usize) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();
    for term in terms {
        let count = counts.entry(term.as_str()).or_insert(0);
        if *count == 0 {
            order.push(term.as_str());
        }
        *count += 1;
    }

    // stable sort keeps first-appearance order among ties
    order.sort_by_key(|term| std::cmp::Reverse(counts[term]));
    order.into_iter().take(limit).map(str::to_string).collect()
}
