//! Integration tests for family formation and reproduction
//!
//! Families need an opposite-gender pair with friendship >= 50 within
//! Manhattan distance 4; reproduction needs 30 steps of cohabitation and
//! no existing children.

use civitas::core::WorldConfig;
use civitas::entity::citizen::Gender;
use civitas::World;

fn scenario_config(seed: u64) -> WorldConfig {
    WorldConfig {
        width: 10,
        height: 10,
        citizens: 6,
        food: 20,
        houses: 5,
        jobs: 8,
        markets: 0,
        workshops: 0,
        temples: 0,
        schools: 0,
        seed,
    }
}

/// Force two opposite-gender pairs to high mutual friendship
fn prime_pairs(world: &mut World) {
    let pairs = [(0usize, 1usize, 70.0f32), (2, 3, 65.0)];
    for (a, b, score) in pairs {
        world.citizens[a].gender = Gender::Female;
        world.citizens[b].gender = Gender::Male;
        let (ida, idb) = (world.citizens[a].id, world.citizens[b].id);
        world.citizens[a].friendships.insert(idb, score);
        world.citizens[b].friendships.insert(ida, score);
    }
}

#[test]
fn test_primed_pairs_form_families_in_most_trials() {
    let mut successes = 0;
    let trials = 10;
    for seed in 0..trials {
        let mut world = World::new(scenario_config(seed)).expect("valid config");
        prime_pairs(&mut world);
        for _ in 0..100 {
            world.step();
        }
        if world.stats().families > 0 {
            successes += 1;
        }
    }
    println!("family formation: {successes}/{trials} trials");
    assert!(
        successes >= trials / 2 + 1,
        "families formed in only {successes}/{trials} trials"
    );
}

#[test]
fn test_formed_families_are_symmetric() {
    let mut world = World::new(scenario_config(11)).expect("valid config");
    prime_pairs(&mut world);
    for _ in 0..100 {
        world.step();
    }

    for citizen in &world.citizens {
        let Some(family) = citizen.family else { continue };
        let partner_id = citizen
            .partner
            .expect("a family id implies a partner reference");
        let partner = world
            .citizen(partner_id)
            .expect("partner resolves in the arena");
        if citizen.alive && partner.alive {
            assert_eq!(partner.family, Some(family), "partners share the family id");
            assert_eq!(partner.partner, Some(citizen.id), "partner links are mutual");
        }
    }
}

#[test]
fn test_family_id_never_held_by_more_than_two_living() {
    let mut world = World::new(scenario_config(13)).expect("valid config");
    prime_pairs(&mut world);
    for _ in 0..150 {
        world.step();
        let mut holders = std::collections::HashMap::new();
        for citizen in &world.citizens {
            if citizen.alive {
                if let Some(family) = citizen.family {
                    *holders.entry(family).or_insert(0usize) += 1;
                }
            }
        }
        for (family, count) in holders {
            assert!(
                count <= 2,
                "family {family:?} held by {count} living citizens"
            );
        }
    }
}

#[test]
fn test_no_reproduction_before_preconditions() {
    // Track every citizen that existed at start; any newcomer is a birth.
    // Births must come from a bonded pair with cohabitation >= 30 at some
    // point, which cannot happen in under 30 steps of bonding.
    let mut world = World::new(scenario_config(17)).expect("valid config");
    prime_pairs(&mut world);

    let initial = world.citizens.len();
    // Bonding cannot have happened before step 1, so no birth can legally
    // appear before step 31.
    for _ in 0..30 {
        world.step();
        assert_eq!(
            world.citizens.len(),
            initial,
            "birth before any pair could have reached 30 steps of cohabitation"
        );
    }
}

#[test]
fn test_children_link_to_both_parents() {
    // Run long enough for at least one birth across several seeds, then
    // verify the lineage links.
    for seed in [19, 23, 29] {
        let mut world = World::new(scenario_config(seed)).expect("valid config");
        prime_pairs(&mut world);
        for _ in 0..300 {
            world.step();
        }
        let born = world.citizens.len().saturating_sub(6);
        if born == 0 {
            continue;
        }
        for child in world.citizens.iter().skip(6) {
            let parents: Vec<_> = world
                .citizens
                .iter()
                .filter(|c| c.children.contains(&child.id))
                .collect();
            assert_eq!(
                parents.len(),
                2,
                "a newborn must appear in exactly two parents' children lists"
            );
            assert_eq!(parents[0].family, parents[1].family);
        }
        println!("seed {seed}: verified lineage of {born} newborns");
        return;
    }
    panic!("no births in any trial; reproduction path appears dead");
}
