//! Skill catalog and skill-gap suggestions.
//!
//! The pool of candidate skills is the curated set for the role hint (if the
//! role is known) plus every plausible term in the job description. Anything
//! in the pool the resume does not mention is a suggestion.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::ConfigError;
use crate::matching::lexicon::Lexicon;
use crate::matching::normalize::{normalize_text, singularize, Document};

pub const SUGGESTION_LIMIT: usize = 20;

const BUILTIN_ROLE_SKILLS: &[(&str, &[&str])] = &[
    (
        "Data Analyst",
        &[
            "python",
            "sql",
            "excel",
            "power bi",
            "tableau",
            "data visualization",
            "statistics",
            "pandas",
            "numpy",
            "etl",
            "dashboard",
            "reporting",
            "a/b testing",
            "communication",
        ],
    ),
    (
        "Machine Learning Engineer",
        &[
            "python",
            "scikit-learn",
            "tensorflow",
            "pytorch",
            "mlops",
            "docker",
            "cloud",
            "feature engineering",
            "data pipelines",
            "model deployment",
            "numpy",
            "pandas",
            "experiment tracking",
            "api",
        ],
    ),
    (
        "Frontend Developer",
        &[
            "html",
            "css",
            "javascript",
            "react",
            "typescript",
            "webpack",
            "accessibility",
            "performance",
            "responsive design",
            "testing",
            "vite",
            "redux",
            "rest api",
        ],
    ),
];

static NON_SKILL_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9+#.\-/\s]").expect("skill char regex is valid"));

static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex is valid"));

/// Lowercases a skill name and keeps only characters that appear in skill names.
pub fn normalize_skill(skill: &str) -> String {
    let lowered = skill.to_lowercase();
    let stripped = NON_SKILL_CHARS.replace_all(&lowered, " ");
    WHITESPACE.replace_all(&stripped, " ").trim().to_string()
}

#[derive(Debug, Clone)]
struct RoleSkills {
    role: String,
    skills: Vec<String>,
}

/// Curated role → skill sets. Immutable after construction.
#[derive(Debug, Clone, Default)]
pub struct SkillCatalog {
    roles: Vec<RoleSkills>,
}

impl SkillCatalog {
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_entries(
            BUILTIN_ROLE_SKILLS
                .iter()
                .map(|(role, skills)| (role.to_string(), skills.iter().map(|s| s.to_string()).collect())),
        )
    }

    /// Parses a JSON object of `role → [skill, ...]`.
    pub fn from_json_str(origin: &str, json: &str) -> Result<Self, ConfigError> {
        let raw: BTreeMap<String, Vec<String>> =
            serde_json::from_str(json).map_err(|source| ConfigError::Json {
                origin: origin.to_string(),
                source,
            })?;
        Self::from_entries(raw)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&path.display().to_string(), &json)
    }

    /// Validates and normalizes catalog entries.
    ///
    /// Rejects empty role names, roles without skills, and roles repeated
    /// under a different capitalization.
    pub fn from_entries<I>(entries: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, Vec<String>)>,
    {
        let mut seen: HashSet<String> = HashSet::new();
        let mut roles = Vec::new();

        for (role, skills) in entries {
            let role = role.trim().to_string();
            if role.is_empty() {
                return Err(ConfigError::EmptyRole);
            }
            if !seen.insert(role.to_lowercase()) {
                return Err(ConfigError::DuplicateRole(role));
            }

            let skills: BTreeSet<String> = skills
                .iter()
                .map(|s| normalize_skill(s))
                .filter(|s| !s.is_empty())
                .collect();
            if skills.is_empty() {
                return Err(ConfigError::EmptySkillSet(role));
            }

            roles.push(RoleSkills {
                role,
                skills: skills.into_iter().collect(),
            });
        }

        Ok(SkillCatalog { roles })
    }

    /// Curated skills for a role, matched case-insensitively.
    pub fn skills_for(&self, role: &str) -> Option<&[String]> {
        let wanted = role.trim();
        self.roles
            .iter()
            .find(|r| r.role.eq_ignore_ascii_case(wanted))
            .map(|r| r.skills.as_slice())
    }

    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.roles.iter().map(|r| r.role.as_str())
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }
}

/// Skills from the role catalog and the job description that the resume lacks.
///
/// Priority skills come first; everything is otherwise lexicographic.
/// An unknown role hint contributes nothing; the job-description pool still applies.
pub fn suggest_skills(
    lexicon: &Lexicon,
    catalog: &SkillCatalog,
    resume_text: &str,
    jd_text: &str,
    role_hint: Option<&str>,
) -> Vec<String> {
    let mut pool: BTreeSet<String> = BTreeSet::new();

    if let Some(curated) = role_hint.and_then(|role| catalog.skills_for(role)) {
        pool.extend(curated.iter().cloned());
    }

    let jd_normalized = normalize_skill(&normalize_text(lexicon, jd_text));
    pool.extend(
        jd_normalized
            .split_whitespace()
            .filter(|t| t.len() > 2)
            .filter(|t| !lexicon.is_stopword(t))
            .filter(|t| !t.chars().all(|c| c.is_ascii_digit()))
            .map(str::to_string),
    );

    let resume = Document::new(lexicon, resume_text);
    let resume_tokens: HashSet<String> = resume.tokens(lexicon).into_iter().collect();

    let mut suggestions: Vec<String> = pool
        .into_iter()
        .filter(|skill| {
            if skill.contains(' ') {
                !resume.normalized.contains(skill.as_str())
            } else {
                !resume_tokens.contains(skill) && !resume_tokens.contains(singularize(skill))
            }
        })
        .collect();

    // pool is a BTreeSet, so a stable sort on the partition keeps lexicographic order
    suggestions.sort_by_key(|skill| !lexicon.is_priority_skill(skill));
    suggestions.truncate(SUGGESTION_LIMIT);
    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lexicon() -> Lexicon {
        Lexicon::builtin().unwrap()
    }

    #[test]
    fn test_builtin_catalog_is_valid() {
        let catalog = SkillCatalog::builtin().unwrap();
        assert_eq!(catalog.len(), 3);
        let skills = catalog.skills_for("data analyst").unwrap();
        assert!(skills.contains(&"power bi".to_string()));
        assert!(skills.contains(&"a/b testing".to_string()));
    }

    #[test]
    fn test_unknown_role_has_no_curated_skills() {
        let catalog = SkillCatalog::builtin().unwrap();
        assert!(catalog.skills_for("Astronaut").is_none());
    }

    #[test]
    fn test_catalog_rejects_empty_role() {
        let err = SkillCatalog::from_json_str("test", r#"{" ": ["python"]}"#).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyRole));
    }

    #[test]
    fn test_catalog_rejects_role_without_skills() {
        let err = SkillCatalog::from_json_str("test", r#"{"Data Engineer": ["!!"]}"#).unwrap_err();
        assert!(matches!(err, ConfigError::EmptySkillSet(role) if role == "Data Engineer"));
    }

    #[test]
    fn test_catalog_rejects_case_insensitive_duplicates() {
        let err = SkillCatalog::from_json_str("test", r#"{"SRE": ["linux"], "sre": ["go"]}"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateRole(_)));
    }

    #[test]
    fn test_catalog_rejects_malformed_json() {
        let err = SkillCatalog::from_json_str("inline", r#"["python"]"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json { .. }));
        assert!(err.to_string().contains("inline"));
    }

    #[test]
    fn test_normalize_skill() {
        assert_eq!(normalize_skill("  Power BI® "), "power bi");
        assert_eq!(normalize_skill("C++"), "c++");
    }

    #[test]
    fn test_suggests_missing_curated_skills_with_priority_first() {
        let lex = lexicon();
        let catalog = SkillCatalog::builtin().unwrap();
        let resume = "Analyst skilled in Python, Excel and communication.";
        let suggestions = suggest_skills(&lex, &catalog, resume, "", Some("Data Analyst"));

        assert!(!suggestions.contains(&"python".to_string()));
        assert!(!suggestions.contains(&"excel".to_string()));
        assert!(!suggestions.contains(&"communication".to_string()));
        assert!(suggestions.contains(&"sql".to_string()));
        assert!(suggestions.contains(&"data visualization".to_string()));

        let first_plain = suggestions
            .iter()
            .position(|s| !lex.is_priority_skill(s))
            .unwrap();
        assert!(
            suggestions[..first_plain].iter().all(|s| lex.is_priority_skill(s)),
            "priority skills must lead: {suggestions:?}"
        );
        assert!(suggestions[first_plain..].iter().all(|s| !lex.is_priority_skill(s)));
        assert_eq!(&suggestions[..3], ["a/b testing", "etl", "numpy"]);
    }

    #[test]
    fn test_multi_word_skill_uses_phrase_containment() {
        let lex = lexicon();
        let catalog = SkillCatalog::builtin().unwrap();
        let resume = "Built Power-BI reports and ran A B testing programs.";
        let suggestions = suggest_skills(&lex, &catalog, resume, "", Some("data analyst"));
        assert!(!suggestions.contains(&"power bi".to_string()), "{suggestions:?}");
        assert!(!suggestions.contains(&"a/b testing".to_string()), "{suggestions:?}");
    }

    #[test]
    fn test_job_description_terms_feed_the_pool() {
        let lex = lexicon();
        let catalog = SkillCatalog::builtin().unwrap();
        let suggestions = suggest_skills(
            &lex,
            &catalog,
            "Experienced with Kubernetes.",
            "We need Kubernetes, Terraform and 5 years on AWS.",
            None,
        );
        assert!(suggestions.contains(&"terraform".to_string()));
        assert!(suggestions.contains(&"aws".to_string()));
        assert!(!suggestions.contains(&"kubernetes".to_string()));
        assert!(!suggestions.contains(&"and".to_string()), "stopwords are not skills");
    }

    #[test]
    fn test_suggestions_are_capped() {
        let lex = lexicon();
        let catalog = SkillCatalog::builtin().unwrap();
        let jd: String = (0..40).map(|i| format!("skill{i:02}x ")).collect();
        let suggestions = suggest_skills(&lex, &catalog, "", &jd, None);
        assert_eq!(suggestions.len(), SUGGESTION_LIMIT);
    }
}
