//! Per-generation fitness statistics.
//!
//! The engine records a [`GenerationStats`] snapshot after initialization
//! (generation 0) and after every generation step. The resulting
//! [`FitnessHistory`] serializes to JSON keyed by generation number:
//!
//! ```json
//! {"0": {"min": 9, "max": 31, "avg": 17.4}, "1": {"min": 8, "max": 24, "avg": 13.2}}
//! ```

use std::collections::{BTreeMap, btree_map};

use serde::{Deserialize, Serialize};

/// Fitness summary of a single population.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// The lowest (best) fitness value.
    pub min: usize,
    /// The highest (worst) fitness value.
    pub max: usize,
    /// The arithmetic mean of the fitness values.
    pub avg: f64,
}

impl GenerationStats {
    /// Computes statistics from fitness values.
    ///
    /// Returns `None` if `values` is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// # use gapath_search::stats::GenerationStats;
    /// let stats = GenerationStats::new([7, 4, 10]).unwrap();
    /// assert_eq!(stats.min, 4);
    /// assert_eq!(stats.max, 10);
    /// assert_eq!(stats.avg, 7.0);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = usize>,
    {
        let mut values = values.into_iter();
        let first = values.next()?;
        let (min, max, sum, count) = values.fold(
            (first, first, first, 1_usize),
            |(min, max, sum, count), v| (min.min(v), max.max(v), sum + v, count + 1),
        );
        Some(Self {
            min,
            max,
            avg: sum as f64 / count as f64,
        })
    }
}

/// Statistics of every generation of a run, keyed by generation number.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FitnessHistory {
    generations: BTreeMap<usize, GenerationStats>,
}

impl FitnessHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, generation: usize, stats: GenerationStats) {
        self.generations.insert(generation, stats);
    }

    #[must_use]
    pub fn get(&self, generation: usize) -> Option<&GenerationStats> {
        self.generations.get(&generation)
    }

    /// Returns the most recent generation and its statistics.
    #[must_use]
    pub fn last(&self) -> Option<(usize, &GenerationStats)> {
        self.generations.last_key_value().map(|(g, s)| (*g, s))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.generations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.generations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &GenerationStats)> + '_ {
        self.generations.iter().map(|(g, s)| (*g, s))
    }
}

impl<'a> IntoIterator for &'a FitnessHistory {
    type Item = (&'a usize, &'a GenerationStats);
    type IntoIter = btree_map::Iter<'a, usize, GenerationStats>;

    fn into_iter(self) -> Self::IntoIter {
        self.generations.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_values() {
        assert_eq!(GenerationStats::new([]), None);
    }

    #[test]
    fn test_single_value() {
        let stats = GenerationStats::new([5]).unwrap();
        assert_eq!(stats.min, 5);
        assert_eq!(stats.max, 5);
        assert!((stats.avg - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_history_serializes_by_generation() {
        let mut history = FitnessHistory::new();
        history.insert(0, GenerationStats::new([4, 8]).unwrap());
        history.insert(1, GenerationStats::new([4, 5]).unwrap());
        assert_eq!(history.len(), 2);
        assert_eq!(history.last().map(|(g, s)| (g, s.max)), Some((1, 5)));

        let json = serde_json::to_string(&history).unwrap();
        assert_eq!(
            json,
            r#"{"0":{"min":4,"max":8,"avg":6.0},"1":{"min":4,"max":5,"avg":4.5}}"#
        );
        let parsed: FitnessHistory = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, history);
    }
}
