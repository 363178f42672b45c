//! The citizen record: needs, skills, relationships, and social standing

use std::collections::{BTreeMap, BTreeSet};

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::types::{CommunityId, EntityId, FamilyId, GridPos, Tick};
use crate::entity::needs::Needs;
use crate::entity::personality::TraitSet;
use crate::entity::skills::{Aptitudes, Profession, SkillSet};

/// Partner-matching label; only used for the opposite-label check when
/// forming a family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Female,
    Male,
}

/// Disposition toward conflict, fixed at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoliticalAlignment {
    Peaceful,
    Aggressive,
    Neutral,
}

/// Research areas scholars can pursue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResearchField {
    Medicine,
    Engineering,
    Philosophy,
    Astronomy,
    Mathematics,
}

impl ResearchField {
    /// Fields available once a scholar commits to research
    pub const ALL: [ResearchField; 5] = [
        ResearchField::Medicine,
        ResearchField::Engineering,
        ResearchField::Philosophy,
        ResearchField::Astronomy,
        ResearchField::Mathematics,
    ];
}

/// Friendship scores are clamped to this symmetric range
pub const FRIENDSHIP_MIN: f32 = -100.0;
pub const FRIENDSHIP_MAX: f32 = 100.0;

/// A mobile citizen entity
///
/// Relationship links (partner, children, friendships, alliances, trade
/// partners) are stored as ids into the world's entity arena and resolved
/// at use time; a dead or missing endpoint means the relationship is
/// simply inert, never a dangling pointer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Citizen {
    pub id: EntityId,
    /// None until placed on the grid
    pub pos: Option<GridPos>,
    /// False once health reaches zero; dead citizens are never mutated again
    pub alive: bool,
    /// Age in simulation steps
    pub age: Tick,
    pub needs: Needs,
    /// Wallet; saturates at zero
    pub coins: u32,
    pub skills: SkillSet,
    pub aptitudes: Aptitudes,
    pub traits: TraitSet,
    /// Probability of wandering instead of acting; derived from traits but
    /// mutable because leadership policies can raise it.
    pub exploration_rate: f32,
    pub profession: Option<Profession>,
    /// Steps worked in the current profession; reset on profession change
    pub work_experience: u32,

    /// Symmetric friendship scores keyed by the other citizen's id.
    /// BTreeMap so scans run in ascending-id order, which is the
    /// documented deterministic scan order.
    pub friendships: BTreeMap<EntityId, f32>,
    pub gender: Gender,
    pub partner: Option<EntityId>,
    pub family: Option<FamilyId>,
    pub children: Vec<EntityId>,
    /// Steps spent bonded to the current partner; gates reproduction
    pub cohabitation: u32,
    pub community: Option<CommunityId>,

    pub influence: f32,
    pub reputation: f32,
    pub is_leader: bool,
    /// Desire to lead, rolled once in [10, 90]
    pub leadership_ambition: i32,
    pub trade_partners: BTreeSet<EntityId>,
    /// Compatibility-scored personal alliances (at most 5)
    pub alliances: BTreeMap<EntityId, f32>,
    pub alignment: PoliticalAlignment,
    pub research_focus: Option<ResearchField>,
    pub research_progress: u32,

    pub cultural_contributions: u32,
    pub conflicts_mediated: u32,
    pub festivals_attended: u32,
}

impl Citizen {
    /// Roll a fresh citizen.
    ///
    /// Draw order is part of the determinism contract: hunger, energy,
    /// social, traits, skills, aptitudes, research focus, alignment,
    /// ambition, gender.
    pub fn spawn<R: Rng>(id: EntityId, rng: &mut R) -> Self {
        let hunger = rng.gen_range(20..=50);
        let energy = rng.gen_range(50..=80);
        let social = rng.gen_range(10..=30);
        let traits = TraitSet::roll(rng);
        let skills = SkillSet::roll(rng);
        let aptitudes = Aptitudes::roll(rng);
        let research_focus = *[
            None,
            Some(ResearchField::Medicine),
            Some(ResearchField::Engineering),
            Some(ResearchField::Philosophy),
            Some(ResearchField::Astronomy),
        ]
        .choose(rng)
        .expect("non-empty");
        let alignment = *[
            PoliticalAlignment::Peaceful,
            PoliticalAlignment::Aggressive,
            PoliticalAlignment::Neutral,
        ]
        .choose(rng)
        .expect("non-empty");
        let leadership_ambition = rng.gen_range(10..=90);
        let gender = *[Gender::Female, Gender::Male].choose(rng).expect("non-empty");

        let exploration_rate = traits.exploration_rate();

        Self {
            id,
            pos: None,
            alive: true,
            age: 0,
            needs: Needs::new(hunger, energy, social),
            coins: 8,
            skills,
            aptitudes,
            traits,
            exploration_rate,
            profession: None,
            work_experience: 0,
            friendships: BTreeMap::new(),
            gender,
            partner: None,
            family: None,
            children: Vec::new(),
            cohabitation: 0,
            community: None,
            influence: 0.0,
            reputation: 50.0,
            is_leader: false,
            leadership_ambition,
            trade_partners: BTreeSet::new(),
            alliances: BTreeMap::new(),
            alignment,
            research_focus,
            research_progress: 0,
            cultural_contributions: 0,
            conflicts_mediated: 0,
            festivals_attended: 0,
        }
    }

    /// Current friendship score toward `other` (0 when unacquainted)
    pub fn friendship_with(&self, other: EntityId) -> f32 {
        self.friendships.get(&other).copied().unwrap_or(0.0)
    }

    /// Apply a friendship delta on this side only; the caller is
    /// responsible for mirroring it on the other side in the same step.
    pub fn adjust_friendship(&mut self, other: EntityId, delta: f32) {
        let entry = self.friendships.entry(other).or_insert(0.0);
        *entry = (*entry + delta).clamp(FRIENDSHIP_MIN, FRIENDSHIP_MAX);
    }

    pub fn friend_count(&self) -> usize {
        self.friendships.len()
    }

    pub fn add_coins(&mut self, amount: u32) {
        self.coins = self.coins.saturating_add(amount);
    }

    pub fn spend_coins(&mut self, amount: u32) {
        self.coins = self.coins.saturating_sub(amount);
    }

    pub fn adjust_reputation(&mut self, delta: f32) {
        self.reputation = (self.reputation + delta).clamp(0.0, 100.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_spawn_rolls_within_documented_ranges() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for i in 0..200 {
            let c = Citizen::spawn(EntityId(i), &mut rng);
            assert!((20..=50).contains(&c.needs.hunger));
            assert!((50..=80).contains(&c.needs.energy));
            assert!((10..=30).contains(&c.needs.social));
            assert_eq!(c.needs.health, 100);
            assert_eq!(c.coins, 8);
            assert!((10..=90).contains(&c.leadership_ambition));
            assert_eq!(c.reputation, 50.0);
            assert!(c.alive);
            assert!(c.profession.is_none());
        }
    }

    #[test]
    fn test_friendship_clamps() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut c = Citizen::spawn(EntityId(0), &mut rng);
        for _ in 0..50 {
            c.adjust_friendship(EntityId(9), 10.0);
        }
        assert_eq!(c.friendship_with(EntityId(9)), FRIENDSHIP_MAX);
    }

    #[test]
    fn test_spend_coins_saturates() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut c = Citizen::spawn(EntityId(0), &mut rng);
        c.spend_coins(1000);
        assert_eq!(c.coins, 0);
    }
}
