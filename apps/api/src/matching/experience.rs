//! Experience-level inference from years mentioned, seniority keywords,
//! bullet density and project mentions.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

const SENIOR_SIGNALS: &[&str] = &[
    "architect",
    "lead",
    "principal",
    "senior",
    "owner",
    "owned",
    "mentored",
    "managed",
    "designed",
    "architected",
    "scaled",
    "roadmap",
    "strategy",
    "stakeholder",
    "leadership",
];

const MID_SIGNALS: &[&str] = &[
    "independently",
    "delivered",
    "end-to-end",
    "feature",
    "module",
    "ownership",
];

static YEAR_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+)\s*-\s*(\d+)\s*years?").expect("year range regex is valid")
});

static YEAR_SINGLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+)\s*years?").expect("single year regex is valid"));

static BULLET_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\n\r]\s*(?:-|\x{2022}|\x{25CF}|\x{25E6}|\x{2219})\s+")
        .expect("bullet line regex is valid")
});

static PROJECT_MENTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:project|initiative|module|feature)\b").expect("project regex is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExperienceLevel {
    Fresher,
    Mid,
    Senior,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceResult {
    pub level: ExperienceLevel,
    pub years_min: u32,
    pub years_max: u32,
    pub signals: Vec<String>,
}

/// Raw counts the level rules and signal list are derived from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Evidence {
    pub years_min: u32,
    pub years_max: u32,
    pub bullets: usize,
    pub senior_hits: usize,
    pub mid_hits: usize,
    pub projects: usize,
}

impl Evidence {
    pub fn gather(text: &str) -> Self {
        let lowered = text.to_lowercase();
        let (years_min, years_max) = extract_years(text);
        let keyword_hits =
            |keywords: &[&str]| keywords.iter().filter(|kw| lowered.contains(*kw)).count();

        Evidence {
            years_min,
            years_max,
            bullets: BULLET_LINE.find_iter(text).count(),
            senior_hits: keyword_hits(SENIOR_SIGNALS),
            mid_hits: keyword_hits(MID_SIGNALS),
            projects: PROJECT_MENTION.find_iter(&lowered).count(),
        }
    }
}

pub struct LevelRule {
    pub level: ExperienceLevel,
    pub applies: fn(&Evidence) -> bool,
}

/// First matching rule wins; nothing matching means `Fresher`.
pub const LEVEL_RULES: &[LevelRule] = &[
    LevelRule {
        level: ExperienceLevel::Senior,
        applies: |e| e.years_max >= 6 || e.senior_hits >= 3 || (e.years_max >= 4 && e.projects >= 6),
    },
    LevelRule {
        level: ExperienceLevel::Mid,
        applies: |e| e.years_max >= 2 || e.mid_hits >= 2 || e.projects >= 3,
    },
];

type SignalFn = fn(&Evidence, ExperienceLevel) -> Option<String>;

/// Human-readable signals, in this order, each only when non-zero.
const SIGNALS: &[SignalFn] = &[
    |e, _| (e.years_max > 0).then(|| format!("Years mentioned: {}-{}", e.years_min, e.years_max)),
    |e, _| (e.bullets > 0).then(|| format!("Bullet points: {}", e.bullets)),
    |e, _| (e.senior_hits > 0).then(|| format!("Senior keywords: {}", e.senior_hits)),
    |e, level| {
        (e.mid_hits > 0 && level != ExperienceLevel::Senior)
            .then(|| format!("Mid-level keywords: {}", e.mid_hits))
    },
    |e, _| (e.projects > 0).then(|| format!("Project mentions: {}", e.projects)),
];

/// `(min, max)` over every "N-M years" and "N years" mention; `(0, 0)` when none.
pub fn extract_years(text: &str) -> (u32, u32) {
    let ranges = YEAR_RANGE
        .captures_iter(text)
        .flat_map(|c| [c.get(1), c.get(2)])
        .flatten();
    let singles = YEAR_SINGLE.captures_iter(text).filter_map(|c| c.get(1));

    let years: Vec<u32> = ranges
        .chain(singles)
        .filter_map(|m| m.as_str().parse::<u32>().ok())
        .collect();

    match (years.iter().min(), years.iter().max()) {
        (Some(&min), Some(&max)) => (min, max),
        _ => (0, 0),
    }
}

pub fn classify(evidence: &Evidence, rules: &[LevelRule]) -> ExperienceLevel {
    rules
        .iter()
        .find(|rule| (rule.applies)(evidence))
        .map(|rule| rule.level)
        .unwrap_or(ExperienceLevel::Fresher)
}

pub fn detect_experience(raw_resume_text: &str) -> ExperienceResult {
    let evidence = Evidence::gather(raw_resume_text);
    let level = classify(&evidence, LEVEL_RULES);
    let signals = SIGNALS
        .iter()
        .filter_map(|signal| signal(&evidence, level))
        .collect();

    ExperienceResult {
        level,
        years_min: evidence.years_min,
        years_max: evidence.years_max,
        signals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_range_makes_senior() {
        let result = detect_experience("5-8 years of experience leading architecture");
        assert_eq!(result.years_min, 5);
        assert_eq!(result.years_max, 8);
        assert_eq!(result.level, ExperienceLevel::Senior);
    }

    #[test]
    fn test_no_years_defaults_to_zero() {
        assert_eq!(extract_years("Graduated recently, eager to learn"), (0, 0));
        assert_eq!(extract_years(""), (0, 0));
    }

    #[test]
    fn test_single_and_range_mentions_combine() {
        assert_eq!(extract_years("3 years at Acme, then 1-2 years freelancing"), (1, 3));
        assert_eq!(extract_years("10 YEARS in fintech"), (10, 10));
    }

    #[test]
    fn test_fresher_when_nothing_matches() {
        let result = detect_experience("Recent graduate. Built a todo app in college.");
        assert_eq!(result.level, ExperienceLevel::Fresher);
        assert!(result.signals.is_empty(), "signals: {:?}", result.signals);
    }

    #[test]
    fn test_mid_from_years() {
        let result = detect_experience("2 years building APIs");
        assert_eq!(result.level, ExperienceLevel::Mid);
        assert_eq!(result.signals, vec!["Years mentioned: 2-2"]);
    }

    #[test]
    fn test_mid_from_keywords_lists_mid_signal() {
        let result = detect_experience("Independently delivered a billing service");
        assert_eq!(result.level, ExperienceLevel::Mid);
        assert_eq!(result.signals, vec!["Mid-level keywords: 2"]);
    }

    #[test]
    fn test_senior_from_keywords_omits_mid_signal() {
        let text = "Principal engineer. Mentored juniors, owned the roadmap, delivered a module.";
        let result = detect_experience(text);
        assert_eq!(result.level, ExperienceLevel::Senior);
        assert!(result.signals.iter().any(|s| s.starts_with("Senior keywords")));
        assert!(!result.signals.iter().any(|s| s.starts_with("Mid-level")));
    }

    #[test]
    fn test_senior_from_years_and_projects() {
        let text = "4 years. project project project initiative module feature";
        let evidence = Evidence::gather(text);
        assert_eq!(evidence.projects, 6);
        assert_eq!(classify(&evidence, LEVEL_RULES), ExperienceLevel::Senior);
    }

    #[test]
    fn test_bullets_counted_after_line_breaks() {
        let text = "Experience\n- Built A\n  • Built B\n- Built C";
        let evidence = Evidence::gather(text);
        assert_eq!(evidence.bullets, 3);
    }

    #[test]
    fn test_signals_follow_field_order() {
        let text = "3 years\n- shipped a feature\n- lead a project";
        let result = detect_experience(text);
        assert_eq!(
            result.signals,
            vec![
                "Years mentioned: 3-3",
                "Bullet points: 2",
                "Senior keywords: 1",
                "Mid-level keywords: 1",
                "Project mentions: 2",
            ]
        );
    }

    #[test]
    fn test_level_serializes_as_name() {
        let json = serde_json::to_string(&ExperienceLevel::Senior).unwrap();
        assert_eq!(json, r#""Senior""#);
    }
}
