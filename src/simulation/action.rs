//! Action selection and environment interaction
//!
//! The citizen either wanders (exploration roll) or scans a
//! personality-fixed priority order and executes the first action whose
//! trigger holds. Acting means seeking: locate the nearest matching
//! resource node by Manhattan distance and take one greedy step toward
//! it, with no obstacle avoidance. After moving, the occupied cell's
//! first eligible resource node applies exactly one effect.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::core::types::GridPos;
use crate::entity::needs::NEED_MAX;
use crate::entity::personality::Temperament;
use crate::entity::resource::ResourceKind;
use crate::entity::skills::{Profession, Skill};
use crate::simulation::decision::{ENERGY_THRESHOLD, HUNGER_THRESHOLD, SOCIAL_THRESHOLD};
use crate::simulation::world::World;

/// The five candidate actions, scanned in trait-determined order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ActionKind {
    Social,
    Food,
    Work,
    Sleep,
    Learning,
}

/// Fixed priority orders. Trait precedence on multi-trait citizens:
/// Greedy, then Friendly, then Lazy; Explorer shares the default order.
fn priorities(citizen_traits: &crate::entity::personality::TraitSet) -> [ActionKind; 5] {
    use ActionKind::*;
    if citizen_traits.has(Temperament::Greedy) {
        [Work, Food, Sleep, Social, Learning]
    } else if citizen_traits.has(Temperament::Friendly) {
        [Social, Food, Work, Sleep, Learning]
    } else if citizen_traits.has(Temperament::Lazy) {
        [Sleep, Food, Work, Social, Learning]
    } else {
        [Food, Work, Sleep, Social, Learning]
    }
}

/// Phase 7 (and 8): pick and execute one action, then interact with the
/// environment. Returns true when the exploration roll replaced the whole
/// phase with a random walk; the caller then skips the remaining phases.
pub fn choose_action(world: &mut World, idx: usize) -> bool {
    let rate = world.citizens[idx].exploration_rate;
    if world.rng.gen::<f32>() < rate {
        move_randomly(world, idx);
        return true;
    }

    let order = priorities(&world.citizens[idx].traits);
    let mut acted = false;

    for action in order {
        match action {
            ActionKind::Social if world.citizens[idx].needs.social >= SOCIAL_THRESHOLD => {
                if seek_temple(world, idx) || seek_company(world, idx) {
                    acted = true;
                    break;
                }
            }
            ActionKind::Food if world.citizens[idx].needs.hunger >= HUNGER_THRESHOLD => {
                let greedy = world.citizens[idx].traits.has(Temperament::Greedy);
                let coins = world.citizens[idx].coins;
                if greedy && coins < 3 {
                    // Greedy and broke: earning comes first even when hungry
                    if seek_job(world, idx) {
                        acted = true;
                        break;
                    }
                } else if coins > 0 {
                    seek_food(world, idx);
                    acted = true;
                    break;
                } else {
                    // Broke and starving: work if possible, steal otherwise
                    if !seek_job(world, idx) {
                        seek_food(world, idx);
                    }
                    acted = true;
                    break;
                }
            }
            ActionKind::Work => {
                let coins = world.citizens[idx].coins;
                let greedy = world.citizens[idx].traits.has(Temperament::Greedy);
                if coins < 3 || (greedy && coins < 8) {
                    if seek_profession_building(world, idx) || seek_job(world, idx) {
                        acted = true;
                        break;
                    }
                }
            }
            ActionKind::Sleep if world.citizens[idx].needs.energy <= ENERGY_THRESHOLD => {
                seek_house(world, idx);
                acted = true;
                break;
            }
            ActionKind::Learning => {
                if world.rng.gen::<f32>() < 0.3 && seek_school(world, idx) {
                    acted = true;
                    break;
                }
            }
            _ => {}
        }
    }

    if !acted {
        // Nothing urgent: maybe train the weakest skill, else wander
        if world.rng.gen::<f32>() < 0.4 {
            if !seek_skill_building(world, idx) {
                move_randomly(world, idx);
            }
        } else {
            move_randomly(world, idx);
        }
    }

    interact_with_environment(world, idx);
    false
}

// === Movement ===

/// One greedy step toward the target cell
fn move_toward(world: &mut World, idx: usize, target: GridPos) {
    let Some(pos) = world.citizens[idx].pos else {
        return;
    };
    world.move_citizen(idx, pos.step_toward(&target));
}

/// Step to a uniformly chosen neighboring cell
fn move_randomly(world: &mut World, idx: usize) {
    let Some(pos) = world.citizens[idx].pos else {
        return;
    };
    let moves = world.grid.neighborhood(pos, 1, false);
    if let Some(&target) = moves.choose(&mut world.rng) {
        world.move_citizen(idx, target);
    }
}

/// Nearest existing node of `kind`, by Manhattan distance with the grid's
/// row-major scan order as tie-break
fn nearest_node(world: &World, idx: usize, kind: ResourceKind) -> Option<GridPos> {
    let pos = world.citizens[idx].pos?;
    world
        .grid
        .nearest_matching(pos, |id| world.is_resource_kind(id, kind))
}

// === Seek operations ===

/// Head for food; with none visible, drift randomly
fn seek_food(world: &mut World, idx: usize) {
    match nearest_node(world, idx, ResourceKind::Food) {
        Some(target) => move_toward(world, idx, target),
        None => move_randomly(world, idx),
    }
}

fn seek_house(world: &mut World, idx: usize) {
    match nearest_node(world, idx, ResourceKind::House) {
        Some(target) => move_toward(world, idx, target),
        None => move_randomly(world, idx),
    }
}

/// Head for a job; with none on the map, wanders and reports failure so
/// the priority scan can fall through to another action
fn seek_job(world: &mut World, idx: usize) -> bool {
    match nearest_node(world, idx, ResourceKind::Job) {
        Some(target) => {
            move_toward(world, idx, target);
            true
        }
        None => {
            move_randomly(world, idx);
            false
        }
    }
}

fn seek_temple(world: &mut World, idx: usize) -> bool {
    match nearest_node(world, idx, ResourceKind::Temple) {
        Some(target) => {
            move_toward(world, idx, target);
            true
        }
        None => false,
    }
}

fn seek_school(world: &mut World, idx: usize) -> bool {
    match nearest_node(world, idx, ResourceKind::School) {
        Some(target) => {
            move_toward(world, idx, target);
            true
        }
        None => false,
    }
}

/// Head for the building matching the citizen's profession, when one exists
fn seek_profession_building(world: &mut World, idx: usize) -> bool {
    let kind = match world.citizens[idx].profession {
        Some(Profession::Merchant) => ResourceKind::Market,
        Some(Profession::Craftsman) => ResourceKind::Workshop,
        Some(Profession::Scholar) => ResourceKind::School,
        _ => return false,
    };
    match nearest_node(world, idx, kind) {
        Some(target) => {
            move_toward(world, idx, target);
            true
        }
        None => false,
    }
}

/// Head for the building that trains the citizen's weakest skill
fn seek_skill_building(world: &mut World, idx: usize) -> bool {
    let kind = match world.citizens[idx].skills.weakest() {
        Skill::Trading => ResourceKind::Market,
        Skill::Crafting => ResourceKind::Workshop,
        Skill::Learning => ResourceKind::School,
        // Farming and combat have no training building
        Skill::Farming | Skill::Combat => return false,
    };
    match nearest_node(world, idx, kind) {
        Some(target) => {
            move_toward(world, idx, target);
            true
        }
        None => false,
    }
}

/// Move toward the most appealing citizen within range 5: friendship
/// weighs in favor, distance against
fn seek_company(world: &mut World, idx: usize) -> bool {
    let Some(pos) = world.citizens[idx].pos else {
        return false;
    };

    let mut best: Option<(f32, GridPos)> = None;
    for (i, other) in world.citizens.iter().enumerate() {
        if i == idx || !other.alive {
            continue;
        }
        let Some(other_pos) = other.pos else {
            continue;
        };
        let distance = pos.manhattan(&other_pos);
        if distance > 5 {
            continue;
        }
        let score = world.citizens[idx].friendship_with(other.id) * 0.1 - distance as f32;
        if best.map_or(true, |(s, _)| score > s) {
            best = Some((score, other_pos));
        }
    }

    match best {
        Some((_, target)) => {
            move_toward(world, idx, target);
            true
        }
        None => false,
    }
}

// === Environment interaction (phase 8) ===

/// Apply exactly one effect from the occupied cell, matching kinds in
/// [`ResourceKind::INTERACT_ORDER`]; ineligible kinds are skipped.
fn interact_with_environment(world: &mut World, idx: usize) {
    let Some(pos) = world.citizens[idx].pos else {
        return;
    };

    for kind in ResourceKind::INTERACT_ORDER {
        let Some(node_idx) = world.resource_index_at(pos, kind) else {
            continue;
        };
        if apply_node_effect(world, idx, node_idx, kind) {
            break;
        }
    }
}

/// Returns true when the interaction was eligible and applied
fn apply_node_effect(world: &mut World, idx: usize, node_idx: usize, kind: ResourceKind) -> bool {
    match kind {
        ResourceKind::Food => {
            let citizen = &world.citizens[idx];
            if citizen.needs.hunger <= 0 {
                return false;
            }
            if citizen.coins > 0 {
                world.citizens[idx].needs.eat(60);
                world.destroy_food(node_idx);
                true
            } else if citizen.needs.hunger >= HUNGER_THRESHOLD {
                // Stealing: worse meal, and it costs health
                world.citizens[idx].needs.eat(40);
                world.citizens[idx].needs.damage(2);
                world.destroy_food(node_idx);
                true
            } else {
                false
            }
        }
        ResourceKind::House => {
            if world.citizens[idx].needs.energy >= NEED_MAX {
                return false;
            }
            world.citizens[idx].needs.restore_energy(50);
            true
        }
        ResourceKind::Job => {
            let profession_bonus = matches!(
                world.citizens[idx].profession,
                Some(Profession::Farmer) | Some(Profession::Craftsman)
            ) as u32;
            let citizen = &mut world.citizens[idx];
            citizen.add_coins(3 + profession_bonus);
            citizen.needs.drain_energy(5);
            citizen.skills.add(Skill::Farming, 0.5);
            citizen.work_experience += 1;
            true
        }
        ResourceKind::Market => {
            if world.citizens[idx].coins <= 2 {
                return false;
            }
            let bonus = world.resources[node_idx].bonus;
            let citizen = &mut world.citizens[idx];
            citizen.spend_coins(1);
            citizen.skills.add(Skill::Trading, 1.0 * bonus);
            let success_chance = world.citizens[idx].skills.trading / 100.0 * 0.3;
            if world.rng.gen::<f32>() < success_chance {
                world.citizens[idx].add_coins(2);
            }
            true
        }
        ResourceKind::Workshop => {
            if world.citizens[idx].needs.energy <= 10 {
                return false;
            }
            let bonus = world.resources[node_idx].bonus;
            let citizen = &mut world.citizens[idx];
            citizen.needs.drain_energy(10);
            citizen.skills.add(Skill::Crafting, 1.5 * bonus);
            let payout_chance = world.citizens[idx].skills.crafting / 100.0 * 0.4;
            if world.rng.gen::<f32>() < payout_chance {
                world.citizens[idx].add_coins(4);
            }
            true
        }
        ResourceKind::Temple => {
            let citizen = &mut world.citizens[idx];
            citizen.needs.relieve_social(20);
            citizen.needs.heal(2);
            true
        }
        ResourceKind::School => {
            if world.citizens[idx].needs.energy <= 5 {
                return false;
            }
            let bonus = world.resources[node_idx].bonus;
            let citizen = &mut world.citizens[idx];
            citizen.needs.drain_energy(5);
            citizen.skills.add(Skill::Learning, 2.0 * bonus);
            let spillover_chance = world.citizens[idx].skills.learning / 100.0 * 0.3;
            if world.rng.gen::<f32>() < spillover_chance {
                let skill = *[Skill::Farming, Skill::Crafting, Skill::Trading, Skill::Combat]
                    .choose(&mut world.rng)
                    .expect("non-empty");
                world.citizens[idx].skills.add(skill, 1.0);
            }
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::WorldConfig;
    use crate::core::types::EntityId;

    fn empty_world() -> World {
        let cfg = WorldConfig {
            width: 10,
            height: 10,
            citizens: 1,
            food: 0,
            houses: 0,
            jobs: 0,
            markets: 0,
            workshops: 0,
            temples: 0,
            schools: 0,
            seed: 3,
        };
        World::new(cfg).expect("valid config")
    }

    fn park(world: &mut World, idx: usize, pos: GridPos) {
        let id = world.citizens[idx].id;
        let old = world.citizens[idx].pos.unwrap();
        world.grid.move_entity(id, old, pos);
        world.citizens[idx].pos = Some(pos);
    }

    fn food_at(world: &mut World, pos: GridPos) -> usize {
        // Plant a food node directly for scenario setup
        use crate::entity::resource::{ResourceNode, ResourceKind};
        let id = EntityId(90_000 + world.resources.len() as u64);
        let node = ResourceNode::new(id, ResourceKind::Food, pos);
        let idx = world.resources.len();
        world.resources.push(node);
        world.register_for_test(id, idx);
        world.grid.place(id, pos);
        idx
    }

    #[test]
    fn test_steal_branch_costs_health_and_destroys_food() {
        let mut world = empty_world();
        let pos = GridPos::new(4, 4);
        park(&mut world, 0, pos);
        let node_idx = food_at(&mut world, pos);

        world.citizens[0].coins = 0;
        world.citizens[0].needs.hunger = 95;
        let health_before = world.citizens[0].needs.health;

        super::interact_with_environment(&mut world, 0);

        assert_eq!(world.citizens[0].needs.hunger, 95 - 40);
        assert_eq!(world.citizens[0].needs.health, health_before - 2);
        assert!(!world.resources[node_idx].exists);
        assert!(world.grid.contents_at(pos).iter().all(|&id| id != world.resources[node_idx].id));
    }

    #[test]
    fn test_paid_meal_is_bigger_and_free_of_charge() {
        let mut world = empty_world();
        let pos = GridPos::new(4, 4);
        park(&mut world, 0, pos);
        food_at(&mut world, pos);

        world.citizens[0].coins = 5;
        world.citizens[0].needs.hunger = 80;
        super::interact_with_environment(&mut world, 0);

        assert_eq!(world.citizens[0].needs.hunger, 20);
        assert_eq!(world.citizens[0].coins, 5);
    }

    #[test]
    fn test_broke_but_not_desperate_leaves_food_alone() {
        let mut world = empty_world();
        let pos = GridPos::new(4, 4);
        park(&mut world, 0, pos);
        let node_idx = food_at(&mut world, pos);

        world.citizens[0].coins = 0;
        world.citizens[0].needs.hunger = 50; // below threshold
        super::interact_with_environment(&mut world, 0);

        assert_eq!(world.citizens[0].needs.hunger, 50);
        assert!(world.resources[node_idx].exists);
    }

    #[test]
    fn test_at_most_one_food_consumed_per_visit() {
        let mut world = empty_world();
        let pos = GridPos::new(4, 4);
        park(&mut world, 0, pos);
        let first = food_at(&mut world, pos);
        let second = food_at(&mut world, pos);

        world.citizens[0].coins = 1;
        world.citizens[0].needs.hunger = 90;
        super::interact_with_environment(&mut world, 0);

        // Exactly one of the two nodes is gone
        assert_ne!(world.resources[first].exists, world.resources[second].exists);
    }

    #[test]
    fn test_greedy_priority_order_puts_work_first() {
        use crate::entity::personality::{Temperament, TraitSet};
        let greedy = TraitSet::from_traits(vec![Temperament::Greedy]);
        assert_eq!(priorities(&greedy)[0], ActionKind::Work);
        let lazy = TraitSet::from_traits(vec![Temperament::Lazy]);
        assert_eq!(priorities(&lazy)[0], ActionKind::Sleep);
        let friendly = TraitSet::from_traits(vec![Temperament::Friendly]);
        assert_eq!(priorities(&friendly)[0], ActionKind::Social);
        let explorer = TraitSet::from_traits(vec![Temperament::Explorer]);
        assert_eq!(priorities(&explorer)[0], ActionKind::Food);
    }

    #[test]
    fn test_greedy_and_friendly_resolves_to_greedy_order() {
        use crate::entity::personality::{Temperament, TraitSet};
        let both = TraitSet::from_traits(vec![Temperament::Friendly, Temperament::Greedy]);
        assert_eq!(priorities(&both)[0], ActionKind::Work);
    }

    #[test]
    fn test_seek_moves_one_greedy_step() {
        let mut world = empty_world();
        park(&mut world, 0, GridPos::new(0, 0));
        food_at(&mut world, GridPos::new(5, 3));

        world.citizens[0].needs.hunger = 90;
        world.citizens[0].coins = 5;
        seek_food(&mut world, 0);

        assert_eq!(world.citizens[0].pos, Some(GridPos::new(1, 1)));
    }
}
