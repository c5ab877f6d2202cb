//! The capability shared by both predictors, dispatched over a closed enum.

use std::hash::Hash;

use chrono_tz::Tz;
use indexmap::IndexMap;

use crate::database::EventSource;
use crate::error::Result;
use crate::models::{Prediction, PredictionContext, PredictorKind, Settings, TrainingSettings};
use crate::services::markov::MarkovPredictor;
use crate::services::naive_bayes::NaiveBayesPredictor;

/// Most-frequently-used ranking over `counts`.
///
/// Probabilities are each count over the sum of all counts. The sort is
/// stable, so equal counts keep the map's insertion order. Returns nothing
/// when there is no evidence at all.
pub fn most_frequent<K>(counts: &IndexMap<K, u32>, top_k: usize) -> Vec<Prediction>
where
    K: AsRef<str> + Hash + Eq,
{
    let total: u32 = counts.values().sum();
    if total == 0 {
        return Vec::new();
    }

    let mut ranked: Vec<(&K, u32)> = counts.iter().map(|(k, v)| (k, *v)).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    ranked
        .into_iter()
        .take(top_k)
        .map(|(app, count)| Prediction::new(app.as_ref(), count as f64 / total as f64))
        .collect()
}

/// One of the two interchangeable predictors.
pub enum Predictor {
    Markov(MarkovPredictor),
    NaiveBayes(NaiveBayesPredictor),
}

impl Predictor {
    pub fn new(kind: PredictorKind, config: TrainingSettings, tz: Tz) -> Self {
        match kind {
            PredictorKind::Markov => Predictor::Markov(MarkovPredictor::new(config)),
            PredictorKind::NaiveBayes => {
                Predictor::NaiveBayes(NaiveBayesPredictor::new(config, tz))
            }
        }
    }

    pub fn kind(&self) -> PredictorKind {
        match self {
            Predictor::Markov(_) => PredictorKind::Markov,
            Predictor::NaiveBayes(_) => PredictorKind::NaiveBayes,
        }
    }

    pub fn train<S: EventSource + ?Sized>(&self, source: &S) -> Result<()> {
        match self {
            Predictor::Markov(p) => p.train(source),
            Predictor::NaiveBayes(p) => p.train(source),
        }
    }

    /// Markov only looks at `context.previous_app`.
    pub fn predict(&self, context: &PredictionContext, top_k: usize) -> Vec<Prediction> {
        match self {
            Predictor::Markov(p) => p.predict_next(context.previous_app.as_deref(), top_k),
            Predictor::NaiveBayes(p) => p.predict_next(context, top_k),
        }
    }

    pub fn has_enough_data(&self) -> bool {
        match self {
            Predictor::Markov(p) => p.has_enough_data(),
            Predictor::NaiveBayes(p) => p.has_enough_data(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Predictor::Markov(p) => p.name(),
            Predictor::NaiveBayes(p) => p.name(),
        }
    }
}

/// Both predictors side by side, as the host keeps them.
///
/// They share no state; each one can be trained and queried on its own.
pub struct PredictorSet {
    markov: Predictor,
    naive_bayes: Predictor,
}

impl PredictorSet {
    pub fn new(config: TrainingSettings, tz: Tz) -> Self {
        Self {
            markov: Predictor::new(PredictorKind::Markov, config.clone(), tz),
            naive_bayes: Predictor::new(PredictorKind::NaiveBayes, config, tz),
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let tz = crate::utils::config::parse_timezone(&settings.general.timezone)?;
        Ok(Self::new(settings.training.clone(), tz))
    }

    pub fn get(&self, kind: PredictorKind) -> &Predictor {
        match kind {
            PredictorKind::Markov => &self.markov,
            PredictorKind::NaiveBayes => &self.naive_bayes,
        }
    }

    /// Trains both predictors; stops at the first read failure.
    pub fn train_all<S: EventSource + ?Sized>(&self, source: &S) -> Result<()> {
        self.markov.train(source)?;
        self.naive_bayes.train(source)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryEventStore;
    use crate::test_support::{chain, context};

    #[test]
    fn most_frequent_is_empty_without_evidence() {
        let counts: IndexMap<String, u32> = IndexMap::new();
        assert!(most_frequent(&counts, 3).is_empty());
    }

    #[test]
    fn most_frequent_truncates_and_normalizes_over_all_counts() {
        let mut counts: IndexMap<String, u32> = IndexMap::new();
        counts.insert("a".into(), 1);
        counts.insert("b".into(), 3);
        counts.insert("c".into(), 1);

        let ranked = most_frequent(&counts, 2);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0], Prediction::new("b", 0.6));
        assert_eq!(ranked[1], Prediction::new("a", 0.2));
    }

    #[test]
    fn most_frequent_with_zero_top_k_is_empty() {
        let mut counts: IndexMap<String, u32> = IndexMap::new();
        counts.insert("a".into(), 1);
        assert!(most_frequent(&counts, 0).is_empty());
    }

    #[test]
    fn names_are_stable() {
        let set = PredictorSet::new(TrainingSettings::default(), chrono_tz::UTC);
        assert_eq!(set.get(PredictorKind::Markov).name(), "Markov Chain");
        assert_eq!(set.get(PredictorKind::NaiveBayes).name(), "Naive Bayes");
        assert_eq!(set.get(PredictorKind::NaiveBayes).kind(), PredictorKind::NaiveBayes);
    }

    #[test]
    fn both_variants_agree_on_empty_store() {
        let store = MemoryEventStore::new();
        let set = PredictorSet::new(TrainingSettings::default(), chrono_tz::UTC);
        set.train_all(&store).unwrap();

        for kind in [PredictorKind::Markov, PredictorKind::NaiveBayes] {
            let predictor = set.get(kind);
            assert!(!predictor.has_enough_data());
            assert!(predictor.predict(&context(Some("A")), 3).is_empty());
        }
    }

    #[test]
    fn training_one_predictor_leaves_the_other_untouched() {
        let set = PredictorSet::new(TrainingSettings::default(), chrono_tz::UTC);
        let store = MemoryEventStore::from_events(chain(&["A", "B", "A"]));

        set.get(PredictorKind::Markov).train(&store).unwrap();

        assert!(!set.get(PredictorKind::Markov).predict(&context(None), 3).is_empty());
        assert!(set.get(PredictorKind::NaiveBayes).predict(&context(None), 3).is_empty());
    }
}
