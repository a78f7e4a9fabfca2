//! Job-description dataset: role name → description texts.
//!
//! Loaded once at startup from a JSON array of `{ "role", "description" }`
//! records. An absent dataset is an empty one; analyses then need an explicit
//! job description.

use std::collections::BTreeSet;
use std::path::Path;

use serde::Deserialize;

use crate::errors::ConfigError;

#[derive(Debug, Clone, Deserialize)]
pub struct JdRecord {
    pub role: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default)]
pub struct JdDataset {
    records: Vec<JdRecord>,
}

impl JdDataset {
    pub fn from_records(records: Vec<JdRecord>) -> Result<Self, ConfigError> {
        let records = records
            .into_iter()
            .enumerate()
            .map(|(index, record)| {
                let role = record.role.trim().to_string();
                if role.is_empty() {
                    return Err(ConfigError::EmptyDatasetRole(index));
                }
                Ok(JdRecord {
                    role,
                    description: record.description.trim().to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(JdDataset { records })
    }

    pub fn from_json_str(origin: &str, json: &str) -> Result<Self, ConfigError> {
        let records: Vec<JdRecord> =
            serde_json::from_str(json).map_err(|source| ConfigError::Json {
                origin: origin.to_string(),
                source,
            })?;
        Self::from_records(records)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&path.display().to_string(), &json)
    }

    /// Non-empty descriptions for a role, matched case-insensitively, in file order.
    pub fn descriptions_for(&self, role: &str) -> Vec<String> {
        let wanted = role.trim();
        self.records
            .iter()
            .filter(|r| r.role.eq_ignore_ascii_case(wanted))
            .filter(|r| !r.description.is_empty())
            .map(|r| r.description.clone())
            .collect()
    }

    /// Distinct role names, sorted.
    pub fn roles(&self) -> BTreeSet<&str> {
        self.records.iter().map(|r| r.role.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATASET: &str = r#"[
        {"role": "Data Analyst", "description": "SQL, Tableau and stakeholder reporting."},
        {"role": "Frontend Developer", "description": "React, TypeScript, accessibility."},
        {"role": " data analyst ", "description": "  Python, Excel, A/B testing.  "},
        {"role": "Data Analyst", "description": "   "},
        {"role": "Data Analyst"}
    ]"#;

    #[test]
    fn test_descriptions_for_matches_case_insensitively() {
        let dataset = JdDataset::from_json_str("inline", DATASET).unwrap();
        let descriptions = dataset.descriptions_for("DATA ANALYST");
        assert_eq!(
            descriptions,
            vec![
                "SQL, Tableau and stakeholder reporting.",
                "Python, Excel, A/B testing.",
            ]
        );
    }

    #[test]
    fn test_unknown_role_has_no_descriptions() {
        let dataset = JdDataset::from_json_str("inline", DATASET).unwrap();
        assert!(dataset.descriptions_for("Astronaut").is_empty());
        assert!(JdDataset::default().descriptions_for("Data Analyst").is_empty());
    }

    #[test]
    fn test_roles_are_distinct_and_sorted() {
        let dataset = JdDataset::from_json_str("inline", DATASET).unwrap();
        let roles: Vec<&str> = dataset.roles().into_iter().collect();
        assert_eq!(roles, vec!["Data Analyst", "Frontend Developer", "data analyst"]);
        assert_eq!(dataset.len(), 5);
    }

    #[test]
    fn test_empty_role_is_rejected_with_index() {
        let err = JdDataset::from_json_str(
            "inline",
            r#"[{"role": "SRE", "description": "x"}, {"role": "  ", "description": "y"}]"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::EmptyDatasetRole(1)));
    }

    #[test]
    fn test_malformed_json_names_its_origin() {
        let err = JdDataset::from_json_str("jd.json", r#"{"role": "SRE"}"#).unwrap_err();
        assert!(err.to_string().contains("jd.json"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = JdDataset::load(Path::new("/nonexistent/jd.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
