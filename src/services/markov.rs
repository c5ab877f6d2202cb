//! First-order Markov chain over consecutive launches.

use std::sync::{Arc, RwLock};
use std::time::Instant;

use indexmap::IndexMap;

use crate::database::EventSource;
use crate::error::Result;
use crate::models::{LaunchEvent, Prediction, TrainingSettings};
use crate::services::predictor::most_frequent;

pub const MODEL_NAME: &str = "Markov Chain";

/// Transition and frequency counts built from one training window.
///
/// Maps keep first-occurrence order of the training scan (newest event
/// first), which is what ties are broken by.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkovTables {
    transitions: IndexMap<String, IndexMap<String, u32>>,
    app_counts: IndexMap<String, u32>,
    total_records: usize,
}

impl MarkovTables {
    pub fn build(events: &[LaunchEvent]) -> Self {
        let mut tables = Self::default();

        for event in events {
            *tables.app_counts.entry(event.app.clone()).or_insert(0) += 1;

            if let Some(prev) = &event.previous_app {
                *tables
                    .transitions
                    .entry(prev.clone())
                    .or_default()
                    .entry(event.app.clone())
                    .or_insert(0) += 1;
            }
        }
        tables.total_records = events.len();

        tables
    }

    pub fn total_records(&self) -> usize {
        self.total_records
    }

    pub fn distinct_apps(&self) -> usize {
        self.app_counts.len()
    }

    pub fn transitions_from(&self, app: &str) -> Option<&IndexMap<String, u32>> {
        self.transitions.get(app)
    }

    pub fn app_counts(&self) -> &IndexMap<String, u32> {
        &self.app_counts
    }
}

pub struct MarkovPredictor {
    config: TrainingSettings,
    tables: RwLock<Arc<MarkovTables>>,
}

impl Default for MarkovPredictor {
    fn default() -> Self {
        Self::new(TrainingSettings::default())
    }
}

impl MarkovPredictor {
    pub fn new(config: TrainingSettings) -> Self {
        Self {
            config,
            tables: RwLock::new(Arc::new(MarkovTables::default())),
        }
    }

    pub fn name(&self) -> &'static str {
        MODEL_NAME
    }

    /// Rebuilds the tables from the most recent training window.
    ///
    /// A read failure leaves the previous tables in place.
    pub fn train<S: EventSource + ?Sized>(&self, source: &S) -> Result<()> {
        let started = Instant::now();
        let launches = source.get_most_recent(self.config.window)?;
        let tables = self.train_on(&launches);

        log::debug!(
            "[Markov] Training completed: {} records, {}ms, {} unique apps",
            launches.len(),
            started.elapsed().as_millis(),
            tables.distinct_apps()
        );
        Ok(())
    }

    /// Builds tables from `events` and swaps them in as one unit.
    pub fn train_on(&self, events: &[LaunchEvent]) -> Arc<MarkovTables> {
        let tables = Arc::new(MarkovTables::build(events));
        *self.tables.write().unwrap_or_else(|p| p.into_inner()) = Arc::clone(&tables);
        tables
    }

    pub fn snapshot(&self) -> Arc<MarkovTables> {
        Arc::clone(&self.tables.read().unwrap_or_else(|p| p.into_inner()))
    }

    /// Ranks the apps most likely to follow `previous_app`.
    ///
    /// Falls back to global frequency when there is no previous app or it has
    /// fewer than `min_transitions` recorded successors.
    pub fn predict_next(&self, previous_app: Option<&str>, top_k: usize) -> Vec<Prediction> {
        let tables = self.snapshot();

        if let Some(next_counts) = previous_app.and_then(|app| tables.transitions_from(app)) {
            let total: u32 = next_counts.values().sum();
            if total >= self.config.min_transitions {
                return most_frequent(next_counts, top_k);
            }
        }

        most_frequent(&tables.app_counts, top_k)
    }

    pub fn has_enough_data(&self) -> bool {
        self.snapshot().total_records() >= self.config.min_records
    }
}
