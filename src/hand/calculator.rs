//! Draw probabilities.
//!
//! Drawing `n` cards without replacement from a deck of `N` that holds `K`
//! cards of interest gives exactly `k` of them with the hypergeometric
//! probability
//!
//! ```text
//! P(X = k) = C(K, k) * C(N - K, n - k) / C(N, n)
//! ```

use serde::{Deserialize, Serialize};

use crate::category::CategorySpec;
use crate::deck::Deck;

/// `C(n, k)` as a float. Zero when `k > n`.
#[must_use]
pub fn choose(n: u32, k: u32) -> f64 {
    if k > n {
        return 0.0;
    }
    let k = k.min(n - k);
    (1..=k).fold(1.0, |acc, i| acc * f64::from(n - k + i) / f64::from(i))
}

/// Probability of exactly `k` successes in `draws` cards from a deck of
/// `population` cards with `successes` of interest.
#[must_use]
pub fn exactly(population: u32, successes: u32, draws: u32, k: u32) -> f64 {
    let successes = successes.min(population);
    let draws = draws.min(population);
    if k > successes || k > draws || draws - k > population - successes {
        return 0.0;
    }
    choose(successes, k) * choose(population - successes, draws - k) / choose(population, draws)
}

/// Probability of at most `k` successes.
#[must_use]
pub fn at_most(population: u32, successes: u32, draws: u32, k: u32) -> f64 {
    let p: f64 = (0..=k).map(|i| exactly(population, successes, draws, i)).sum();
    p.min(1.0)
}

/// Probability of at least `k` successes.
#[must_use]
pub fn at_least(population: u32, successes: u32, draws: u32, k: u32) -> f64 {
    if k == 0 {
        return 1.0;
    }
    (1.0 - at_most(population, successes, draws, k - 1)).max(0.0)
}

/// How a hand's count is compared to the desired count.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Relation {
    Exactly,
    #[default]
    AtLeast,
    AtMost,
}

impl Relation {
    #[must_use]
    pub fn probability(self, population: u32, successes: u32, draws: u32, k: u32) -> f64 {
        match self {
            Relation::Exactly => exactly(population, successes, draws, k),
            Relation::AtLeast => at_least(population, successes, draws, k),
            Relation::AtMost => at_most(population, successes, draws, k),
        }
    }
}

/// What a row of the table asks for. The default is "at least one".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub relation: Relation,
    pub count: u32,
}

impl Default for Target {
    fn default() -> Self {
        Self {
            relation: Relation::AtLeast,
            count: 1,
        }
    }
}

/// Probabilities for one category over successive draws.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityRow {
    pub category: String,
    /// Cards in the deck the category includes.
    pub successes: u32,
    pub target: Target,
    /// `by_draw[d]` is the probability after the opening hand plus `d` draws.
    pub by_draw: Vec<f64>,
}

/// One row per category of `deck`, in rank order, for the opening hand and
/// each of the next `draws` draws.
pub fn probability_table(
    deck: &Deck,
    hand_size: u32,
    draws: u32,
    target: impl Fn(&CategorySpec) -> Target,
) -> Vec<ProbabilityRow> {
    let population = deck.total();
    deck.categories()
        .map(|spec| {
            let successes = deck
                .entries()
                .iter()
                .filter(|entry| spec.includes(&entry.card))
                .map(|entry| entry.count)
                .sum();
            let target = target(spec);
            let by_draw = (0..=draws)
                .map(|d| target.relation.probability(population, successes, hand_size + d, target.count))
                .collect();
            ProbabilityRow {
                category: spec.name().to_string(),
                successes,
                target,
                by_draw,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;

    use super::*;
    use crate::cards::{Card, CardFace};
    use crate::category::Rgb;
    use crate::filter::Filter;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_choose() {
        assert_eq!(choose(5, 2), 10.0);
        assert_eq!(choose(60, 0), 1.0);
        assert_eq!(choose(3, 4), 0.0);
        assert!((choose(60, 7) - 386_206_920.0).abs() < 1e-3);
    }

    #[test]
    fn test_exactly() {
        // One ace in a 4-card deck, draw 1.
        assert!(close(exactly(4, 1, 1, 1), 0.25));
        // Two of two from 4 choose 2.
        assert!(close(exactly(4, 2, 2, 2), 1.0 / 6.0));
        assert_eq!(exactly(10, 2, 3, 3), 0.0);
        // Drawing the whole deck finds every success.
        assert!(close(exactly(10, 4, 10, 4), 1.0));
    }

    #[test]
    fn test_distribution_sums_to_one() {
        let total: f64 = (0..=7).map(|k| exactly(60, 24, 7, k)).sum();
        assert!(close(total, 1.0));
    }

    #[test]
    fn test_at_least_and_at_most() {
        // No lands in an opening hand from 24 lands in 60.
        let none = exactly(60, 24, 7, 0);
        assert!(close(at_least(60, 24, 7, 1), 1.0 - none));
        assert!(close(at_most(60, 24, 7, 0), none));
        assert_eq!(at_least(60, 24, 7, 0), 1.0);
        assert!(close(at_least(60, 24, 7, 3) + at_most(60, 24, 7, 2), 1.0));
    }

    #[test]
    fn test_probability_table() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let forest = Arc::new(Card::new(
            "forest",
            CardFace::new("Forest").with_types(&[], &["Land"], &[]),
        ));
        let bear = Arc::new(Card::new(
            "bear",
            CardFace::new("Grizzly Bears").with_types(&[], &["Creature"], &[]),
        ));
        let mut deck = Deck::new();
        deck.add(&forest, 24, date);
        deck.add(&bear, 36, date);
        deck.add_category(
            CategorySpec::new("Lands", Rgb::default(), Filter::has_type("Land")).unwrap(),
            None,
        )
        .unwrap();

        let table = probability_table(&deck, 7, 2, |_| Target::default());
        assert_eq!(table.len(), 1);
        let row = &table[0];
        assert_eq!(row.category, "Lands");
        assert_eq!(row.successes, 24);
        assert_eq!(row.by_draw.len(), 3);
        assert!(close(row.by_draw[0], at_least(60, 24, 7, 1)));
        assert!(row.by_draw[0] < row.by_draw[1] && row.by_draw[1] < row.by_draw[2]);
    }
}
