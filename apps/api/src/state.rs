use std::sync::Arc;

use tracing::info;

use crate::config::Config;
use crate::dataset::JdDataset;
use crate::errors::ConfigError;
use crate::history::store::{InMemoryRunStore, RunStore};
use crate::matching::lexicon::Lexicon;
use crate::matching::similarity::{MatchScorer, TfIdfMatchScorer};
use crate::matching::skills::SkillCatalog;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub lexicon: Arc<Lexicon>,
    pub catalog: Arc<SkillCatalog>,
    /// Job-description dataset for role-based analysis. Empty when no path is configured.
    pub dataset: Arc<JdDataset>,
    /// Pluggable match scorer. Default: TfIdfMatchScorer.
    pub match_scorer: Arc<dyn MatchScorer>,
    /// Run history. Default: InMemoryRunStore bounded by HISTORY_CAPACITY.
    pub history: Arc<dyn RunStore>,
}

impl AppState {
    /// Builds the immutable lookup tables. Any broken table fails startup.
    pub fn from_config(config: Config) -> Result<Self, ConfigError> {
        let lexicon = Arc::new(Lexicon::builtin()?);

        let catalog = match &config.skill_catalog_path {
            Some(path) => SkillCatalog::load(path)?,
            None => SkillCatalog::builtin()?,
        };
        let catalog = Arc::new(catalog);
        info!("Skill catalog loaded ({} roles)", catalog.len());

        let dataset = match &config.jd_dataset_path {
            Some(path) => JdDataset::load(path)?,
            None => JdDataset::default(),
        };
        info!("Job-description dataset loaded ({} records)", dataset.len());

        let match_scorer = Arc::new(TfIdfMatchScorer::new(lexicon.clone(), catalog.clone()));
        let history = Arc::new(InMemoryRunStore::new(config.history_capacity));

        Ok(AppState {
            config,
            lexicon,
            catalog,
            dataset: Arc::new(dataset),
            match_scorer,
            history,
        })
    }
}
