//! Leader policies applied population-wide
//!
//! Each living leader has a small chance per step to enact one policy
//! derived from its dominant personality trait.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::entity::personality::Temperament;
use crate::society::state::{Policy, PolicyKind};
use crate::simulation::world::World;

/// Chance per leader per step to enact a policy
const POLICY_CHANCE: f32 = 0.1;

/// Exploration rate ceiling reachable through expansion policies
const EXPLORATION_POLICY_CAP: f32 = 0.8;

/// Let each living leader possibly enact one trait-derived policy.
pub fn process_leadership_actions(world: &mut World) {
    let leaders: Vec<_> = world.society.leaders.clone();
    for leader_id in leaders {
        let Some(leader_idx) = world.citizen_index(leader_id) else {
            continue;
        };
        if !world.citizens[leader_idx].alive {
            continue;
        }
        if world.rng.gen::<f32>() >= POLICY_CHANCE {
            continue;
        }

        let Some(kind) = policy_for(world, leader_idx) else {
            continue;
        };
        let policy = Policy {
            kind,
            enacted_by: leader_id,
            enacted_at: world.steps(),
            duration: match kind {
                PolicyKind::Taxation => 50,
                PolicyKind::CommunityCooperation => 30,
                PolicyKind::ExpansionInitiative => 40,
            },
        };
        apply_policy(world, kind);
        tracing::info!(leader = leader_id.0, policy = ?kind, "policy enacted");
        world.society.policies.push(policy);
    }
}

/// A leader's policy follows its personality; leaders with none of the
/// mapped traits enact nothing.
fn policy_for(world: &World, leader_idx: usize) -> Option<PolicyKind> {
    let traits = &world.citizens[leader_idx].traits;
    if traits.has(Temperament::Greedy) {
        Some(PolicyKind::Taxation)
    } else if traits.has(Temperament::Friendly) {
        Some(PolicyKind::CommunityCooperation)
    } else if traits.has(Temperament::Explorer) {
        Some(PolicyKind::ExpansionInitiative)
    } else {
        None
    }
}

fn apply_policy(world: &mut World, kind: PolicyKind) {
    let alive = world.alive_indices();
    match kind {
        PolicyKind::Taxation => {
            let wealthy: Vec<usize> = alive.iter().copied().filter(|&i| world.citizens[i].coins > 100).collect();
            let poor: Vec<usize> = alive.iter().copied().filter(|&i| world.citizens[i].coins < 20).collect();
            for rich_idx in wealthy {
                if poor.is_empty() {
                    break;
                }
                let poor_idx = *poor.choose(&mut world.rng).expect("non-empty");
                let transfer = (world.citizens[rich_idx].coins / 10).min(10);
                world.citizens[rich_idx].spend_coins(transfer);
                world.citizens[poor_idx].add_coins(transfer);
            }
        }
        PolicyKind::CommunityCooperation => {
            for idx in alive {
                world.citizens[idx].needs.relieve_social(10);
            }
        }
        PolicyKind::ExpansionInitiative => {
            for idx in alive {
                if world.citizens[idx].traits.has(Temperament::Explorer) {
                    let rate = &mut world.citizens[idx].exploration_rate;
                    *rate = (*rate * 1.2).min(EXPLORATION_POLICY_CAP);
                }
            }
        }
    }
}
