//! Entity model: mobile citizens and stationary resource nodes

pub mod citizen;
pub mod needs;
pub mod personality;
pub mod resource;
pub mod skills;

pub use citizen::{Citizen, Gender, PoliticalAlignment, ResearchField};
pub use needs::Needs;
pub use personality::{Temperament, TraitSet};
pub use resource::{ResourceKind, ResourceNode};
pub use skills::{Aptitudes, Profession, Skill, SkillSet};
