//! Global societal state: counters shared by every citizen
//!
//! Updated once per step before citizens act; citizens read it through the
//! world and occasionally write back (technology points, trade volume,
//! conflict resolution, art).

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::core::types::{CommunityId, EntityId, GridPos, Tick};
use crate::entity::citizen::ResearchField;
use crate::society::technology::Technology;
use crate::society::weather::{Season, Weather};

/// Severity label attached to a conflict when it erupts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConflictSeverity {
    Minor,
    Moderate,
    Severe,
}

impl ConflictSeverity {
    pub const ALL: [ConflictSeverity; 3] = [
        ConflictSeverity::Minor,
        ConflictSeverity::Moderate,
        ConflictSeverity::Severe,
    ];
}

/// An active conflict with a resolution countdown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conflict {
    pub severity: ConflictSeverity,
    /// Steps until the conflict resolves on its own
    pub remaining: u32,
}

/// Goods moved along external trade routes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeGood {
    Food,
    Tools,
    Luxury,
}

impl TradeGood {
    pub const ALL: [TradeGood; 3] = [TradeGood::Food, TradeGood::Tools, TradeGood::Luxury];
}

/// An established external trade route
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeRoute {
    pub origin: Option<CommunityId>,
    pub goods: TradeGood,
    pub profit: u32,
}

/// Trait-derived policy enacted by a leader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PolicyKind {
    /// Redistribute wealth from rich to poor
    Taxation,
    /// Population-wide social relief
    CommunityCooperation,
    /// Raise explorer citizens' exploration rate
    ExpansionInitiative,
}

/// Record of an enacted policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Policy {
    pub kind: PolicyKind,
    pub enacted_by: EntityId,
    pub enacted_at: Tick,
    pub duration: u32,
}

/// An in-progress collective research project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchProject {
    pub topic: ResearchField,
    pub progress: u32,
    pub required: u32,
}

/// Benefit granted by a completed research project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InnovationBenefit {
    Efficiency,
    Health,
    Happiness,
    Production,
}

impl InnovationBenefit {
    pub const ALL: [InnovationBenefit; 4] = [
        InnovationBenefit::Efficiency,
        InnovationBenefit::Health,
        InnovationBenefit::Happiness,
        InnovationBenefit::Production,
    ];
}

/// A completed innovation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Innovation {
    pub topic: ResearchField,
    pub benefit: InnovationBenefit,
}

/// Alliance between two communities
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunityAlliance {
    pub communities: (CommunityId, CommunityId),
    pub strength: u32,
}

/// All global counters advanced once per step
#[derive(Debug, Clone, Serialize)]
pub struct SocietyState {
    // Season and weather
    pub season: Season,
    pub season_cycle: u32,
    pub weather: Weather,

    // Technology
    pub technologies: BTreeSet<Technology>,
    pub technology_points: f32,
    pub technological_level: u32,

    // Economy
    pub food_price: f32,
    pub food_stock: u32,
    pub tools_stock: u32,
    pub luxury_stock: f32,
    pub trade_volume: u32,

    // Leadership
    pub leaders: Vec<EntityId>,
    pub policies: Vec<Policy>,

    // Culture
    pub cultural_level: u32,
    pub art_works: u32,
    pub monuments: u32,
    pub festivals_held: u32,
    pub philosophical_schools: Vec<&'static str>,

    // Conflict
    pub conflicts: Vec<Conflict>,
    pub conflicts_resolved: u32,
    pub community_alliances: Vec<CommunityAlliance>,
    pub military_strength: u32,

    // Infrastructure
    pub infrastructure_level: f32,
    pub roads: Vec<(GridPos, GridPos)>,
    pub trade_routes: Vec<TradeRoute>,

    // Research
    pub research_projects: Vec<ResearchProject>,
    pub innovations: Vec<Innovation>,
    pub scientific_discoveries: u32,
}

impl SocietyState {
    pub fn new() -> Self {
        Self {
            season: Season::Spring,
            season_cycle: 0,
            weather: Weather::Normal,
            technologies: BTreeSet::new(),
            technology_points: 0.0,
            technological_level: 1,
            food_price: 1.0,
            food_stock: 100,
            tools_stock: 50,
            luxury_stock: 20.0,
            trade_volume: 0,
            leaders: Vec::new(),
            policies: Vec::new(),
            cultural_level: 1,
            art_works: 0,
            monuments: 0,
            festivals_held: 0,
            philosophical_schools: Vec::new(),
            conflicts: Vec::new(),
            conflicts_resolved: 0,
            community_alliances: Vec::new(),
            military_strength: 0,
            infrastructure_level: 1.0,
            roads: Vec::new(),
            trade_routes: Vec::new(),
            research_projects: Vec::new(),
            innovations: Vec::new(),
            scientific_discoveries: 0,
        }
    }

    pub fn has_tech(&self, tech: Technology) -> bool {
        self.technologies.contains(&tech)
    }

    /// Credit a stockpile by trade good kind, respecting the caps
    pub fn credit_stock(&mut self, goods: TradeGood, amount: u32) {
        match goods {
            TradeGood::Food => self.food_stock = self.food_stock.saturating_add(amount),
            TradeGood::Tools => self.tools_stock = (self.tools_stock + amount).min(200),
            TradeGood::Luxury => {
                self.luxury_stock = (self.luxury_stock + amount as f32).min(100.0)
            }
        }
    }
}

impl Default for SocietyState {
    fn default() -> Self {
        Self::new()
    }
}
