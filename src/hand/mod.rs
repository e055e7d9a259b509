//! Sample hands and draw probabilities.
//!
//! - `HandRng`: seeded shuffling
//! - `SampleHand`: deal, mulligan and draw from a shuffled deck
//! - `calculator`: hypergeometric odds per category

pub mod calculator;
pub mod rng;
pub mod sample;

pub use calculator::{probability_table, ProbabilityRow, Relation, Target};
pub use rng::{HandRng, HandRngState};
pub use sample::SampleHand;
