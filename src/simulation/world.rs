//! The world: entity arenas, grid, societal state, and the step driver
//!
//! One `step()` runs the fixed orchestration: societal progression, a
//! frozen-snapshot pass over all citizens, buffered birth commits, food
//! spawning, and statistics collection. All randomness flows through the
//! single seeded generator owned here, consumed in that order.

use ahash::AHashMap;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::core::config::WorldConfig;
use crate::core::error::Result;
use crate::core::types::{CommunityId, EntityId, FamilyId, GridPos, Tick};
use crate::entity::citizen::Citizen;
use crate::entity::personality::{Temperament, TraitSet};
use crate::entity::resource::{ResourceKind, ResourceNode};
use crate::simulation::community::{community_at, Community, MAX_COMMUNITIES};
use crate::simulation::decision;
use crate::simulation::stats::WorldStats;
use crate::society::state::SocietyState;
use crate::society::technology::Technology;
use crate::society::{economy, leadership, progress, technology, weather};
use crate::spatial::grid::MultiGrid;

/// Where an entity id resolves to in the arenas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityRef {
    Citizen(usize),
    Resource(usize),
}

/// A conception recorded mid-step, committed at the step boundary
#[derive(Debug, Clone)]
pub(crate) struct PendingChild {
    pub family: FamilyId,
    pub parent_a: usize,
    pub parent_b: usize,
    pub traits: TraitSet,
}

/// Max entities on a cell for newborn placement (soft cap, this call site only)
const CHILD_CELL_CAP: usize = 3;

/// Baseline chance of a food node spawning each step
const FOOD_SPAWN_BASE: f32 = 0.3;

/// Placement attempts before giving up on a random location
const PLACEMENT_ATTEMPTS: u32 = 100;

pub struct World {
    pub config: WorldConfig,
    pub grid: MultiGrid,
    pub citizens: Vec<Citizen>,
    pub resources: Vec<ResourceNode>,
    registry: AHashMap<EntityId, EntityRef>,
    pub society: SocietyState,
    pub communities: Vec<Community>,
    /// Deterministic random source; consumption order is the contract
    pub rng: ChaCha8Rng,
    steps: Tick,
    next_entity_id: u64,
    next_family_id: u64,
    pub(crate) pending_children: Vec<PendingChild>,
    stats: WorldStats,
}

impl World {
    /// Build a world from validated configuration.
    ///
    /// Initialization order (and thus RNG draw order): houses, jobs,
    /// markets, workshops, temples, schools, food, community traits,
    /// citizens.
    pub fn new(config: WorldConfig) -> Result<Self> {
        config.validate()?;

        let mut world = Self {
            grid: MultiGrid::new(config.width, config.height),
            citizens: Vec::new(),
            resources: Vec::new(),
            registry: AHashMap::new(),
            society: SocietyState::new(),
            communities: Vec::new(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            steps: 0,
            next_entity_id: 0,
            next_family_id: 0,
            pending_children: Vec::new(),
            stats: WorldStats::default(),
            config: config.clone(),
        };

        for (kind, count) in [
            (ResourceKind::House, config.houses),
            (ResourceKind::Job, config.jobs),
            (ResourceKind::Market, config.markets),
            (ResourceKind::Workshop, config.workshops),
            (ResourceKind::Temple, config.temples),
            (ResourceKind::School, config.schools),
        ] {
            for _ in 0..count {
                world.place_building(kind);
            }
        }
        for _ in 0..config.food {
            world.spawn_food();
        }
        world.initialize_communities();
        world.create_citizens(config.citizens);

        world.stats = WorldStats::collect(&world);
        Ok(world)
    }

    // === Id allocation ===

    fn alloc_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_entity_id);
        self.next_entity_id += 1;
        id
    }

    pub(crate) fn alloc_family_id(&mut self) -> FamilyId {
        let id = FamilyId(self.next_family_id);
        self.next_family_id += 1;
        id
    }

    // === Lookups ===

    pub fn steps(&self) -> Tick {
        self.steps
    }

    /// Latest statistics snapshot (refreshed at the end of every step)
    pub fn stats(&self) -> &WorldStats {
        &self.stats
    }

    pub fn entity(&self, id: EntityId) -> Option<EntityRef> {
        self.registry.get(&id).copied()
    }

    pub fn citizen(&self, id: EntityId) -> Option<&Citizen> {
        match self.registry.get(&id)? {
            EntityRef::Citizen(idx) => self.citizens.get(*idx),
            EntityRef::Resource(_) => None,
        }
    }

    pub fn resource(&self, id: EntityId) -> Option<&ResourceNode> {
        match self.registry.get(&id)? {
            EntityRef::Resource(idx) => self.resources.get(*idx),
            EntityRef::Citizen(_) => None,
        }
    }

    pub(crate) fn citizen_index(&self, id: EntityId) -> Option<usize> {
        match self.registry.get(&id)? {
            EntityRef::Citizen(idx) => Some(*idx),
            EntityRef::Resource(_) => None,
        }
    }

    /// Indices of living citizens, in arena (creation) order
    pub fn alive_indices(&self) -> Vec<usize> {
        self.citizens
            .iter()
            .enumerate()
            .filter(|(_, c)| c.alive)
            .map(|(i, _)| i)
            .collect()
    }

    /// Count of existing resource nodes of a kind
    pub fn resource_count(&self, kind: ResourceKind) -> usize {
        self.resources
            .iter()
            .filter(|r| r.exists && r.kind == kind)
            .count()
    }

    /// First existing node of `kind` on `pos`, in placement order
    pub(crate) fn resource_index_at(&self, pos: GridPos, kind: ResourceKind) -> Option<usize> {
        self.grid.contents_at(pos).iter().find_map(|&id| {
            match self.registry.get(&id)? {
                EntityRef::Resource(idx) => {
                    let node = &self.resources[*idx];
                    (node.exists && node.kind == kind).then_some(*idx)
                }
                EntityRef::Citizen(_) => None,
            }
        })
    }

    /// Register a hand-built resource node (scenario test setup only)
    #[cfg(test)]
    pub(crate) fn register_for_test(&mut self, id: EntityId, resource_idx: usize) {
        self.registry.insert(id, EntityRef::Resource(resource_idx));
    }

    /// Does this id name an existing resource node of `kind`?
    pub(crate) fn is_resource_kind(&self, id: EntityId, kind: ResourceKind) -> bool {
        match self.registry.get(&id) {
            Some(EntityRef::Resource(idx)) => {
                let node = &self.resources[*idx];
                node.exists && node.kind == kind
            }
            _ => false,
        }
    }

    pub fn community_at(&self, pos: GridPos) -> Option<&Community> {
        community_at(&self.communities, pos)
    }

    // === Mutation helpers ===

    /// Move a citizen one cell; out-of-bounds destinations are a no-op.
    pub(crate) fn move_citizen(&mut self, idx: usize, to: GridPos) {
        let id = self.citizens[idx].id;
        let Some(from) = self.citizens[idx].pos else {
            return;
        };
        if self.grid.move_entity(id, from, to) {
            self.citizens[idx].pos = Some(to);
        }
    }

    /// Consume a food node: flips existence exactly once and clears the cell
    pub(crate) fn destroy_food(&mut self, res_idx: usize) {
        let node = &mut self.resources[res_idx];
        debug_assert!(node.exists && node.kind == ResourceKind::Food);
        node.exists = false;
        let (id, pos) = (node.id, node.pos);
        self.grid.remove(id, pos);
    }

    /// Disjoint mutable access to two citizens
    pub(crate) fn pair_mut(&mut self, a: usize, b: usize) -> (&mut Citizen, &mut Citizen) {
        assert_ne!(a, b, "pair_mut requires distinct citizens");
        if a < b {
            let (left, right) = self.citizens.split_at_mut(b);
            (&mut left[a], &mut right[0])
        } else {
            let (left, right) = self.citizens.split_at_mut(a);
            (&mut right[0], &mut left[b])
        }
    }

    /// Apply a friendship delta symmetrically, both sides clamped
    /// identically. Skipped entirely unless both citizens are alive, so a
    /// death mid-interaction freezes both maps rather than leaving them
    /// inconsistent.
    pub(crate) fn adjust_friendship_pair(&mut self, a: usize, b: usize, delta: f32) {
        if !self.citizens[a].alive || !self.citizens[b].alive {
            return;
        }
        let (ca, cb) = self.pair_mut(a, b);
        let (ida, idb) = (ca.id, cb.id);
        ca.adjust_friendship(idb, delta);
        cb.adjust_friendship(ida, delta);
    }

    // === Initialization ===

    fn spawn_resource(&mut self, kind: ResourceKind, pos: GridPos) -> EntityId {
        let id = self.alloc_entity_id();
        let node = ResourceNode::new(id, kind, pos);
        let idx = self.resources.len();
        self.resources.push(node);
        self.registry.insert(id, EntityRef::Resource(idx));
        self.grid.place(id, pos);
        id
    }

    /// Place a building on a random empty cell (bounded attempts)
    fn place_building(&mut self, kind: ResourceKind) {
        for _ in 0..PLACEMENT_ATTEMPTS {
            let pos = self.random_cell();
            if self.grid.contents_at(pos).is_empty() {
                self.spawn_resource(kind, pos);
                return;
            }
        }
    }

    /// Spawn one food node on a random cell without a house
    pub(crate) fn spawn_food(&mut self) {
        for _ in 0..PLACEMENT_ATTEMPTS {
            let pos = self.random_cell();
            let has_house = self
                .grid
                .contents_at(pos)
                .iter()
                .any(|&id| self.is_resource_kind(id, ResourceKind::House));
            if !has_house {
                self.spawn_resource(ResourceKind::Food, pos);
                return;
            }
        }
    }

    fn random_cell(&mut self) -> GridPos {
        GridPos::new(
            self.rng.gen_range(0..self.grid.width()),
            self.rng.gen_range(0..self.grid.height()),
        )
    }

    /// Derive communities from building clusters: house positions first,
    /// then job positions, first [`MAX_COMMUNITIES`] become centers with a
    /// random dominant trait each.
    fn initialize_communities(&mut self) {
        let mut centers: Vec<GridPos> = Vec::new();
        for kind in [ResourceKind::House, ResourceKind::Job] {
            centers.extend(
                self.resources
                    .iter()
                    .filter(|r| r.kind == kind)
                    .map(|r| r.pos),
            );
        }
        for (i, center) in centers.into_iter().take(MAX_COMMUNITIES).enumerate() {
            let dominant_trait = *Temperament::ALL.choose(&mut self.rng).expect("non-empty");
            self.communities.push(Community {
                id: CommunityId(i as u32),
                center,
                dominant_trait,
            });
        }
    }

    fn create_citizens(&mut self, count: u32) {
        for _ in 0..count {
            let id = self.alloc_entity_id();
            let mut citizen = Citizen::spawn(id, &mut self.rng);
            let pos = self.random_cell();
            citizen.pos = Some(pos);
            let idx = self.citizens.len();
            self.citizens.push(citizen);
            self.registry.insert(id, EntityRef::Citizen(idx));
            self.grid.place(id, pos);
        }
    }

    // === Step driver ===

    /// Advance the simulation by one discrete step.
    pub fn step(&mut self) {
        // Societal progression, fixed order
        weather::update_weather_and_seasons(self);
        technology::advance_technology(self);
        economy::update_resource_economy(self);
        leadership::process_leadership_actions(self);
        progress::advance_culture(self);
        progress::manage_conflicts(self);
        progress::develop_infrastructure(self);
        progress::conduct_research(self);

        // Frozen snapshot: citizens created mid-step are not iterated
        let snapshot: Vec<usize> = (0..self.citizens.len()).collect();
        for idx in snapshot {
            decision::run_citizen_step(self, idx);
        }
        self.commit_pending_children();

        // Weather- and technology-modulated food spawn
        let mut chance = FOOD_SPAWN_BASE;
        if self.society.has_tech(Technology::Agriculture) {
            chance *= 1.5;
        }
        chance *= self.society.weather.food_spawn_multiplier();
        if self.rng.gen::<f32>() < chance {
            self.spawn_food();
        }
        // Secondary spawn keeps larger populations fed
        if self.alive_indices().len() > 5 && self.rng.gen::<f32>() < 0.2 {
            self.spawn_food();
        }

        self.steps += 1;
        self.stats = WorldStats::collect(self);
    }

    /// Commit conceptions buffered during the citizen pass.
    ///
    /// The child rolls its own attributes, takes the inherited trait set,
    /// and is placed near its first parent subject to the soft cell cap.
    fn commit_pending_children(&mut self) {
        let pending = std::mem::take(&mut self.pending_children);
        for birth in pending {
            let id = self.alloc_entity_id();
            let mut child = Citizen::spawn(id, &mut self.rng);
            child.exploration_rate = birth.traits.exploration_rate();
            child.traits = birth.traits;

            let anchor = self.citizens[birth.parent_a].pos.unwrap_or(GridPos::new(
                self.grid.width() / 2,
                self.grid.height() / 2,
            ));
            let mut placed = None;
            for _ in 0..20 {
                let pos = GridPos::new(
                    (anchor.x + self.rng.gen_range(-2..=2)).clamp(0, self.grid.width() - 1),
                    (anchor.y + self.rng.gen_range(-2..=2)).clamp(0, self.grid.height() - 1),
                );
                if self.grid.contents_at(pos).len() < CHILD_CELL_CAP {
                    placed = Some(pos);
                    break;
                }
            }
            let pos = placed.unwrap_or_else(|| {
                GridPos::new(
                    self.rng.gen_range(0..self.grid.width()),
                    self.rng.gen_range(0..self.grid.height()),
                )
            });

            child.pos = Some(pos);
            let idx = self.citizens.len();
            tracing::info!(
                child = id.0,
                parent_a = self.citizens[birth.parent_a].id.0,
                parent_b = self.citizens[birth.parent_b].id.0,
                "child born"
            );
            self.citizens.push(child);
            self.registry.insert(id, EntityRef::Citizen(idx));
            self.grid.place(id, pos);
            self.citizens[birth.parent_a].children.push(id);
            self.citizens[birth.parent_b].children.push(id);
        }
    }
}
