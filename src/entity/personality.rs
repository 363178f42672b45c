//! Immutable personality traits
//!
//! Each citizen carries one or two traits fixed at creation. Traits pick
//! the action priority order, tilt skill development, and gate several
//! social behaviors (stinginess, sharing, wandering).

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Personality trait tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Temperament {
    Greedy,
    Friendly,
    Lazy,
    Explorer,
}

impl Temperament {
    pub const ALL: [Temperament; 4] = [
        Temperament::Greedy,
        Temperament::Friendly,
        Temperament::Lazy,
        Temperament::Explorer,
    ];
}

/// Baseline probability of wandering instead of acting on needs
pub const EXPLORATION_BASE: f32 = 0.2;

/// Exploration probability with the Explorer trait
pub const EXPLORATION_EXPLORER: f32 = 0.4;

/// The trait set carried by a citizen (1-2 distinct tags, immutable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraitSet {
    traits: Vec<Temperament>,
}

impl TraitSet {
    /// Sample 1-2 distinct traits uniformly
    pub fn roll<R: Rng>(rng: &mut R) -> Self {
        let count = *[1usize, 2].choose(rng).expect("non-empty");
        let traits = Temperament::ALL
            .choose_multiple(rng, count)
            .copied()
            .collect();
        Self { traits }
    }

    /// Sample 1-2 traits from the union of two parents' trait sets
    pub fn inherit<R: Rng>(rng: &mut R, a: &TraitSet, b: &TraitSet) -> Self {
        let mut pool: Vec<Temperament> = Vec::new();
        for &t in a.traits.iter().chain(b.traits.iter()) {
            if !pool.contains(&t) {
                pool.push(t);
            }
        }
        let count = *[1usize, 2].choose(rng).expect("non-empty");
        let traits = pool
            .choose_multiple(rng, count.min(pool.len()))
            .copied()
            .collect();
        Self { traits }
    }

    pub fn has(&self, t: Temperament) -> bool {
        self.traits.contains(&t)
    }

    pub fn iter(&self) -> impl Iterator<Item = Temperament> + '_ {
        self.traits.iter().copied()
    }

    /// Exploration rate implied by the trait set
    pub fn exploration_rate(&self) -> f32 {
        if self.has(Temperament::Explorer) {
            EXPLORATION_EXPLORER
        } else {
            EXPLORATION_BASE
        }
    }

    #[cfg(test)]
    pub fn from_traits(traits: Vec<Temperament>) -> Self {
        Self { traits }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_roll_produces_one_or_two_distinct_traits() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..100 {
            let set = TraitSet::roll(&mut rng);
            let n = set.traits.len();
            assert!(n == 1 || n == 2);
            if n == 2 {
                assert_ne!(set.traits[0], set.traits[1]);
            }
        }
    }

    #[test]
    fn test_inherit_draws_from_parent_union() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let a = TraitSet::from_traits(vec![Temperament::Greedy]);
        let b = TraitSet::from_traits(vec![Temperament::Lazy, Temperament::Greedy]);
        for _ in 0..50 {
            let child = TraitSet::inherit(&mut rng, &a, &b);
            for t in child.iter() {
                assert!(t == Temperament::Greedy || t == Temperament::Lazy);
            }
        }
    }

    #[test]
    fn test_exploration_rate() {
        let explorer = TraitSet::from_traits(vec![Temperament::Explorer]);
        let other = TraitSet::from_traits(vec![Temperament::Lazy]);
        assert_eq!(explorer.exploration_rate(), EXPLORATION_EXPLORER);
        assert_eq!(other.exploration_rate(), EXPLORATION_BASE);
    }
}
