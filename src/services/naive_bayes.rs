//! Naive Bayes classifier over nine contextual features.
//!
//! Each candidate app is scored in log space as
//! `ln P(app) + sum ln P(feature | app)` with add-alpha smoothing on every
//! conditional term. Only the top-k scores are turned into probabilities,
//! through a softmax shifted by the best score, so the result is a relative
//! confidence among the returned candidates and not a full posterior.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, RwLock};
use std::time::Instant;

use chrono_tz::Tz;
use indexmap::IndexMap;

use crate::database::EventSource;
use crate::error::Result;
use crate::models::{ActivityType, LaunchEvent, Prediction, PredictionContext, TrainingSettings};
use crate::services::features::{
    self, BATTERY_BUCKETS, DAYS_OF_MONTH, DAYS_OF_WEEK, HOURS, TIME_SLOTS,
};
use crate::services::predictor::most_frequent;

pub const MODEL_NAME: &str = "Naive Bayes";

const FEATURE_COUNT: usize = 9;
const BOOLEAN_CATEGORIES: usize = 2;

/// Per-app counts of one feature's values.
#[derive(Debug, Clone, PartialEq)]
struct FeatureTable<K: Eq + Hash> {
    counts: HashMap<String, HashMap<K, u32>>,
}

impl<K: Eq + Hash> Default for FeatureTable<K> {
    fn default() -> Self {
        Self {
            counts: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash> FeatureTable<K> {
    fn observe(&mut self, app: &str, value: K) {
        *self
            .counts
            .entry(app.to_string())
            .or_default()
            .entry(value)
            .or_insert(0) += 1;
    }

    fn count<Q>(&self, app: &str, value: &Q) -> u32
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.counts
            .get(app)
            .and_then(|values| values.get(value))
            .copied()
            .unwrap_or(0)
    }
}

/// `ln((count + alpha) / (total_for_app + alpha * categories))`.
///
/// Finite and negative for any `alpha > 0`, including unseen values.
pub fn laplace_log_prob(count: u32, total_for_app: u32, categories: usize, alpha: f64) -> f64 {
    ((count as f64 + alpha) / (total_for_app as f64 + alpha * categories as f64)).ln()
}

/// Frequency tables for one training window. Rebuilt as a whole, never patched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NaiveBayesTables {
    app_counts: IndexMap<String, u32>,
    total_records: usize,
    hour: FeatureTable<u32>,
    day_of_week: FeatureTable<u32>,
    time_slot: FeatureTable<u32>,
    is_charging: FeatureTable<bool>,
    battery_bucket: FeatureTable<u32>,
    previous_app: FeatureTable<String>,
    activity_type: FeatureTable<ActivityType>,
    is_weekend: FeatureTable<bool>,
    day_of_month: FeatureTable<u32>,
}

impl NaiveBayesTables {
    pub fn build(events: &[LaunchEvent], tz: Tz) -> Self {
        let mut tables = Self::default();

        for event in events {
            let app = event.app.as_str();

            *tables.app_counts.entry(event.app.clone()).or_insert(0) += 1;

            tables.hour.observe(app, event.hour);
            tables.day_of_week.observe(app, event.day_of_week);
            tables.time_slot.observe(app, event.time_slot);
            tables.is_charging.observe(app, event.is_charging);
            tables
                .battery_bucket
                .observe(app, features::battery_bucket(event.battery_level));

            if let Some(prev) = &event.previous_app {
                tables.previous_app.observe(app, prev.clone());
            }
            if let Some(activity) = event.activity_type {
                tables.activity_type.observe(app, activity);
            }

            tables
                .is_weekend
                .observe(app, features::is_weekend(event.day_of_week));
            tables
                .day_of_month
                .observe(app, features::day_of_month(event.timestamp, tz));
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

    pub fn app_counts(&self) -> &IndexMap<String, u32> {
        &self.app_counts
    }

    /// Unnormalized log-score of `app` under `context`, or `None` for an app
    /// never seen in training.
    pub fn log_score(&self, app: &str, context: &PredictionContext, alpha: f64) -> Option<f64> {
        let count = *self.app_counts.get(app)?;
        if count == 0 || self.total_records == 0 {
            return None;
        }
        let smoothed = |c: u32, categories: usize| laplace_log_prob(c, count, categories, alpha);

        let mut score = (count as f64 / self.total_records as f64).ln();

        score += smoothed(self.hour.count(app, &context.hour), HOURS);
        score += smoothed(self.day_of_week.count(app, &context.day_of_week), DAYS_OF_WEEK);
        score += smoothed(self.time_slot.count(app, &context.time_slot), TIME_SLOTS);
        score += smoothed(self.is_charging.count(app, &context.is_charging), BOOLEAN_CATEGORIES);
        score += smoothed(
            self.battery_bucket
                .count(app, &features::battery_bucket(context.battery_level)),
            BATTERY_BUCKETS,
        );

        // Optional features only contribute when the host knows them
        if let Some(prev) = context.previous_app.as_deref() {
            score += smoothed(self.previous_app.count(app, prev), self.app_counts.len());
        }
        if let Some(activity) = context.activity_type {
            score += smoothed(
                self.activity_type.count(app, &activity),
                ActivityType::ALL.len(),
            );
        }

        score += smoothed(self.is_weekend.count(app, &context.is_weekend), BOOLEAN_CATEGORIES);
        score += smoothed(self.day_of_month.count(app, &context.day_of_month), DAYS_OF_MONTH);

        Some(score)
    }
}

/// Softmax over the retained scores, shifted by the maximum for stability.
fn softmax(scored: Vec<(&str, f64)>) -> Vec<Prediction> {
    let Some(max) = scored.iter().map(|(_, s)| *s).reduce(f64::max) else {
        return Vec::new();
    };

    let exps: Vec<(&str, f64)> = scored
        .into_iter()
        .map(|(app, score)| (app, (score - max).exp()))
        .collect();
    let sum: f64 = exps.iter().map(|(_, e)| e).sum();

    exps.into_iter()
        .map(|(app, e)| Prediction::new(app, e / sum))
        .collect()
}

pub struct NaiveBayesPredictor {
    config: TrainingSettings,
    tz: Tz,
    tables: RwLock<Arc<NaiveBayesTables>>,
}

impl Default for NaiveBayesPredictor {
    fn default() -> Self {
        Self::new(TrainingSettings::default(), chrono_tz::UTC)
    }
}

impl NaiveBayesPredictor {
    /// `tz` is used to derive day-of-month from stored timestamps.
    pub fn new(config: TrainingSettings, tz: Tz) -> Self {
        Self {
            config,
            tz,
            tables: RwLock::new(Arc::new(NaiveBayesTables::default())),
        }
    }

    pub fn name(&self) -> &'static str {
        MODEL_NAME
    }

    pub fn train<S: EventSource + ?Sized>(&self, source: &S) -> Result<()> {
        let started = Instant::now();
        let launches = source.get_most_recent(self.config.window)?;
        let tables = self.train_on(&launches);

        if launches.len() < self.config.min_records {
            log::debug!(
                "[NaiveBayes] Not enough data: {} < {}, serving frequency fallback",
                launches.len(),
                self.config.min_records
            );
        }
        log::debug!(
            "[NaiveBayes] Training completed: {} records, {}ms, {} unique apps, {} features",
            launches.len(),
            started.elapsed().as_millis(),
            tables.distinct_apps(),
            FEATURE_COUNT
        );
        Ok(())
    }

    /// Builds tables from `events` and swaps them in as one unit.
    pub fn train_on(&self, events: &[LaunchEvent]) -> Arc<NaiveBayesTables> {
        let tables = Arc::new(NaiveBayesTables::build(events, self.tz));
        *self.tables.write().unwrap_or_else(|p| p.into_inner()) = Arc::clone(&tables);
        tables
    }

    pub fn snapshot(&self) -> Arc<NaiveBayesTables> {
        Arc::clone(&self.tables.read().unwrap_or_else(|p| p.into_inner()))
    }

    /// Ranks the `top_k` most likely apps for `context`.
    ///
    /// Equal scores keep the order in which apps were first seen while
    /// scanning the training window newest-first.
    pub fn predict_next(&self, context: &PredictionContext, top_k: usize) -> Vec<Prediction> {
        let tables = self.snapshot();

        if tables.total_records() < self.config.min_records {
            return most_frequent(tables.app_counts(), top_k);
        }

        let alpha = self.config.smoothing_alpha;
        let mut scored: Vec<(&str, f64)> = tables
            .app_counts()
            .keys()
            .filter_map(|app| {
                tables
                    .log_score(app, context, alpha)
                    .map(|score| (app.as_str(), score))
            })
            .collect();

        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(top_k);

        softmax(scored)
    }

    pub fn has_enough_data(&self) -> bool {
        self.snapshot().total_records() >= self.config.min_records
    }
}
