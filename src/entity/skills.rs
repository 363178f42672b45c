//! Skills and the profession system
//!
//! Skills develop stochastically each step and through building use.
//! A citizen's profession is re-derived from its dominant skill every 20
//! age-ticks, with hysteresis so professions do not thrash.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// The five trainable skills
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Skill {
    Farming,
    Crafting,
    Trading,
    Combat,
    Learning,
}

impl Skill {
    pub const ALL: [Skill; 5] = [
        Skill::Farming,
        Skill::Crafting,
        Skill::Trading,
        Skill::Combat,
        Skill::Learning,
    ];
}

/// Profession labels, one per dominant skill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Profession {
    Farmer,
    Craftsman,
    Merchant,
    Guard,
    Scholar,
}

impl Profession {
    /// The skill this profession is derived from
    pub fn key_skill(&self) -> Skill {
        match self {
            Profession::Farmer => Skill::Farming,
            Profession::Craftsman => Skill::Crafting,
            Profession::Merchant => Skill::Trading,
            Profession::Guard => Skill::Combat,
            Profession::Scholar => Skill::Learning,
        }
    }

    pub fn for_skill(skill: Skill) -> Self {
        match skill {
            Skill::Farming => Profession::Farmer,
            Skill::Crafting => Profession::Craftsman,
            Skill::Trading => Profession::Merchant,
            Skill::Combat => Profession::Guard,
            Skill::Learning => Profession::Scholar,
        }
    }
}

/// Skill levels on a 0-100 scale
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillSet {
    pub farming: f32,
    pub crafting: f32,
    pub trading: f32,
    pub combat: f32,
    pub learning: f32,
}

impl SkillSet {
    /// Roll starting skills, each in [10, 30]
    pub fn roll<R: Rng>(rng: &mut R) -> Self {
        Self {
            farming: rng.gen_range(10..=30) as f32,
            crafting: rng.gen_range(10..=30) as f32,
            trading: rng.gen_range(10..=30) as f32,
            combat: rng.gen_range(10..=30) as f32,
            learning: rng.gen_range(10..=30) as f32,
        }
    }

    pub fn get(&self, skill: Skill) -> f32 {
        match skill {
            Skill::Farming => self.farming,
            Skill::Crafting => self.crafting,
            Skill::Trading => self.trading,
            Skill::Combat => self.combat,
            Skill::Learning => self.learning,
        }
    }

    /// Add to a skill, clamped into [0, 100]
    pub fn add(&mut self, skill: Skill, amount: f32) {
        let slot = match skill {
            Skill::Farming => &mut self.farming,
            Skill::Crafting => &mut self.crafting,
            Skill::Trading => &mut self.trading,
            Skill::Combat => &mut self.combat,
            Skill::Learning => &mut self.learning,
        };
        *slot = (*slot + amount).clamp(0.0, 100.0);
    }

    /// The skill with the highest level (first in [`Skill::ALL`] order on ties)
    pub fn strongest(&self) -> Skill {
        let mut best = Skill::Farming;
        for skill in Skill::ALL {
            if self.get(skill) > self.get(best) {
                best = skill;
            }
        }
        best
    }

    /// The skill with the lowest level (first in [`Skill::ALL`] order on ties)
    pub fn weakest(&self) -> Skill {
        let mut worst = Skill::Farming;
        for skill in Skill::ALL {
            if self.get(skill) < self.get(worst) {
                worst = skill;
            }
        }
        worst
    }
}

/// Secondary aptitudes feeding the cultural and diplomatic behaviors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Aptitudes {
    /// Art creation ability
    pub artistic: f32,
    /// Deep-thinking tendency
    pub philosophical: f32,
    /// Conflict resolution ability
    pub diplomatic: f32,
}

impl Aptitudes {
    /// Roll starting aptitudes, each in [5, 25]
    pub fn roll<R: Rng>(rng: &mut R) -> Self {
        Self {
            artistic: rng.gen_range(5..=25) as f32,
            philosophical: rng.gen_range(5..=25) as f32,
            diplomatic: rng.gen_range(5..=25) as f32,
        }
    }

    pub fn add_artistic(&mut self, amount: f32) {
        self.artistic = (self.artistic + amount).clamp(0.0, 100.0);
    }

    pub fn add_diplomatic(&mut self, amount: f32) {
        self.diplomatic = (self.diplomatic + amount).clamp(0.0, 100.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_clamps_to_bounds() {
        let mut skills = SkillSet {
            farming: 99.0,
            crafting: 1.0,
            trading: 50.0,
            combat: 50.0,
            learning: 50.0,
        };
        skills.add(Skill::Farming, 10.0);
        assert_eq!(skills.farming, 100.0);
        skills.add(Skill::Crafting, -10.0);
        assert_eq!(skills.crafting, 0.0);
    }

    #[test]
    fn test_strongest_and_weakest() {
        let skills = SkillSet {
            farming: 10.0,
            crafting: 80.0,
            trading: 30.0,
            combat: 5.0,
            learning: 30.0,
        };
        assert_eq!(skills.strongest(), Skill::Crafting);
        assert_eq!(skills.weakest(), Skill::Combat);
    }

    #[test]
    fn test_profession_round_trip() {
        for skill in Skill::ALL {
            assert_eq!(Profession::for_skill(skill).key_skill(), skill);
        }
    }
}
