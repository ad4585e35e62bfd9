//! Cumulative-distribution sampling over a fixed set of outcomes.

use rand::Rng;

/// Picks one outcome per draw from a cumulative weight table.
///
/// Outcomes are checked in the order they were given: the first whose
/// cumulative threshold exceeds the roll wins. Put the outcomes that must take
/// priority (e.g. the rarest rarity) first.
#[derive(Debug, Clone)]
pub struct CumulativeSampler<T> {
    thresholds: Vec<(f64, T)>,
}

impl<T> CumulativeSampler<T> {
    /// Build a sampler from `(outcome, weight)` pairs.
    ///
    /// Non-positive weights are kept in place but can never be selected.
    pub fn new(outcomes: impl IntoIterator<Item = (T, f64)>) -> Self {
        let mut cumulative = 0.0;
        let thresholds = outcomes
            .into_iter()
            .map(|(outcome, weight)| {
                cumulative += weight.max(0.0);
                (cumulative, outcome)
            })
            .collect();
        Self { thresholds }
    }

    pub fn is_empty(&self) -> bool {
        self.thresholds.is_empty()
    }

    /// Sum of all weights.
    pub fn total(&self) -> f64 {
        self.thresholds.last().map(|(c, _)| *c).unwrap_or(0.0)
    }

    /// Resolve a roll in `[0, 1)` to an outcome.
    ///
    /// A roll at or past the total (weights summing to slightly under 1.0)
    /// resolves to the last outcome. Returns `None` only for an empty sampler.
    pub fn pick(&self, roll: f64) -> Option<&T> {
        self.thresholds
            .iter()
            .find(|(threshold, _)| roll < *threshold)
            .or_else(|| self.thresholds.last())
            .map(|(_, outcome)| outcome)
    }

    /// Draw one uniform roll from `rng` and resolve it.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&T> {
        let roll: f64 = rng.gen();
        self.pick(roll)
    }
}
