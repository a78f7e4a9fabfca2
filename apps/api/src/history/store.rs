//! Run history: one summary row per completed analysis.
//!
//! `AppState` holds an `Arc<dyn RunStore>`. The default backend keeps the most
//! recent runs in memory and forgets everything on restart.

use std::collections::VecDeque;
use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::matching::analysis::AnalysisReport;

pub const DEFAULT_LIST_LIMIT: usize = 100;
pub const MAX_LIST_LIMIT: usize = 200;

/// Summary of one analysis as listed in the history view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub id: u64,
    pub analysis_id: Uuid,
    pub file_name: Option<String>,
    pub role_hint: Option<String>,
    pub match_percent: f64,
    pub ats_score: u32,
    pub created_at: DateTime<Utc>,
    pub top_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
}

/// A run before the store assigns it an id.
#[derive(Debug, Clone)]
pub struct NewRun {
    pub analysis_id: Uuid,
    pub file_name: Option<String>,
    pub role_hint: Option<String>,
    pub match_percent: f64,
    pub ats_score: u32,
    pub created_at: DateTime<Utc>,
    pub top_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
}

impl NewRun {
    pub fn from_report(report: &AnalysisReport, file_name: Option<&str>) -> Self {
        NewRun {
            analysis_id: report.analysis_id,
            file_name: file_name.map(str::to_string),
            role_hint: report.role_hint.clone(),
            match_percent: report.match_percent,
            ats_score: report.ats.score,
            created_at: report.analyzed_at,
            top_keywords: report.top_keywords.clone(),
            missing_keywords: report.missing_keywords.clone(),
        }
    }
}

/// Newest-first page of runs, optionally filtered by a case-insensitive
/// substring of the role hint or file name.
#[derive(Debug, Clone, Default)]
pub struct RunQuery {
    pub search: Option<String>,
    pub limit: Option<usize>,
    pub offset: usize,
}

impl RunQuery {
    fn effective_limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_LIST_LIMIT).min(MAX_LIST_LIMIT)
    }

    fn matches(&self, run: &RunRecord) -> bool {
        let Some(needle) = self.search.as_deref().map(str::to_lowercase) else {
            return true;
        };
        [run.role_hint.as_deref(), run.file_name.as_deref()]
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

pub trait RunStore: Send + Sync {
    fn save(&self, run: NewRun) -> RunRecord;

    fn list(&self, query: &RunQuery) -> Vec<RunRecord>;

    /// `false` when no run has that id.
    fn delete(&self, id: u64) -> bool;

    /// Number of runs removed.
    fn clear(&self) -> usize;

    fn backend(&self) -> &'static str;
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory backend
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct Runs {
    next_id: u64,
    // oldest first
    records: VecDeque<RunRecord>,
}

/// Bounded in-memory history. The oldest run is evicted once `capacity` is reached.
#[derive(Debug)]
pub struct InMemoryRunStore {
    capacity: usize,
    runs: RwLock<Runs>,
}

impl InMemoryRunStore {
    pub fn new(capacity: usize) -> Self {
        InMemoryRunStore {
            capacity: capacity.max(1),
            runs: RwLock::new(Runs::default()),
        }
    }
}

impl RunStore for InMemoryRunStore {
    fn save(&self, run: NewRun) -> RunRecord {
        let mut runs = self.runs.write().unwrap_or_else(PoisonError::into_inner);
        runs.next_id += 1;
        let record = RunRecord {
            id: runs.next_id,
            analysis_id: run.analysis_id,
            file_name: run.file_name,
            role_hint: run.role_hint,
            match_percent: run.match_percent,
            ats_score: run.ats_score,
            created_at: run.created_at,
            top_keywords: run.top_keywords,
            missing_keywords: run.missing_keywords,
        };

        while runs.records.len() >= self.capacity {
            runs.records.pop_front();
        }
        runs.records.push_back(record.clone());
        record
    }

    fn list(&self, query: &RunQuery) -> Vec<RunRecord> {
        let runs = self.runs.read().unwrap_or_else(PoisonError::into_inner);
        runs.records
            .iter()
            .rev()
            .filter(|run| query.matches(run))
            .skip(query.offset)
            .take(query.effective_limit())
            .cloned()
            .collect()
    }

    fn delete(&self, id: u64) -> bool {
        let mut runs = self.runs.write().unwrap_or_else(PoisonError::into_inner);
        let before = runs.records.len();
        runs.records.retain(|run| run.id != id);
        runs.records.len() != before
    }

    fn clear(&self) -> usize {
        let mut runs = self.runs.write().unwrap_or_else(PoisonError::into_inner);
        let removed = runs.records.len();
        runs.records.clear();
        removed
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_run(role_hint: Option<&str>, file_name: Option<&str>, percent: f64) -> NewRun {
        NewRun {
            analysis_id: Uuid::new_v4(),
            file_name: file_name.map(str::to_string),
            role_hint: role_hint.map(str::to_string),
            match_percent: percent,
            ats_score: 80,
            created_at: Utc::now(),
            top_keywords: vec!["sql".to_string()],
            missing_keywords: vec!["etl".to_string()],
        }
    }

    #[test]
    fn test_save_assigns_increasing_ids_and_lists_newest_first() {
        let store = InMemoryRunStore::new(10);
        let first = store.save(new_run(Some("Data Analyst"), None, 40.0));
        let second = store.save(new_run(None, Some("cv.pdf"), 60.0));
        assert!(second.id > first.id);

        let listed = store.list(&RunQuery::default());
        assert_eq!(listed, vec![second, first]);
    }

    #[test]
    fn test_search_matches_role_or_file_name_case_insensitively() {
        let store = InMemoryRunStore::new(10);
        store.save(new_run(Some("Data Analyst"), None, 40.0));
        store.save(new_run(None, Some("analyst_resume.txt"), 50.0));
        store.save(new_run(Some("Frontend Developer"), Some("fe.pdf"), 70.0));

        let query = RunQuery {
            search: Some("ANALYST".to_string()),
            ..RunQuery::default()
        };
        let listed = store.list(&query);
        assert_eq!(listed.len(), 2);
        assert!(listed.iter().all(|r| r.match_percent < 60.0));
    }

    #[test]
    fn test_limit_and_offset_page_through_runs() {
        let store = InMemoryRunStore::new(10);
        for i in 0..5 {
            store.save(new_run(None, None, i as f64));
        }
        let query = RunQuery {
            search: None,
            limit: Some(2),
            offset: 1,
        };
        let percents: Vec<f64> = store.list(&query).iter().map(|r| r.match_percent).collect();
        assert_eq!(percents, vec![3.0, 2.0]);
    }

    #[test]
    fn test_limit_is_capped() {
        let store = InMemoryRunStore::new(MAX_LIST_LIMIT + 10);
        for _ in 0..MAX_LIST_LIMIT + 5 {
            store.save(new_run(None, None, 1.0));
        }
        let query = RunQuery {
            limit: Some(10_000),
            ..RunQuery::default()
        };
        assert_eq!(store.list(&query).len(), MAX_LIST_LIMIT);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let store = InMemoryRunStore::new(2);
        let first = store.save(new_run(None, None, 1.0));
        store.save(new_run(None, None, 2.0));
        store.save(new_run(None, None, 3.0));

        let listed = store.list(&RunQuery::default());
        assert_eq!(listed.len(), 2);
        assert!(listed.iter().all(|r| r.id != first.id));
    }

    #[test]
    fn test_delete_and_clear() {
        let store = InMemoryRunStore::new(10);
        let kept = store.save(new_run(None, None, 1.0));
        let doomed = store.save(new_run(None, None, 2.0));

        assert!(store.delete(doomed.id));
        assert!(!store.delete(doomed.id));
        assert_eq!(store.list(&RunQuery::default()), vec![kept]);

        assert_eq!(store.clear(), 1);
        assert!(store.list(&RunQuery::default()).is_empty());
        assert_eq!(store.backend(), "memory");
    }
}
