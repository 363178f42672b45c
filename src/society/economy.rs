//! Resource economy: prices and stockpiles
//!
//! The food price walks multiplicatively toward scarcity or abundance;
//! tools and luxury goods accrue from workshops and high-skill merchants.

use crate::entity::resource::ResourceKind;
use crate::entity::skills::Profession;
use crate::simulation::world::World;

/// Price bounds for food
const FOOD_PRICE_MIN: f32 = 0.5;
const FOOD_PRICE_MAX: f32 = 5.0;

/// Stockpile caps
const TOOLS_CAP: u32 = 200;
const LUXURY_CAP: f32 = 100.0;

/// Adjust the food price from demand vs supply and accrue tool/luxury
/// stockpiles.
pub fn update_resource_economy(world: &mut World) {
    let alive = world.alive_indices();

    // Each citizen demands ~2 food per cycle; each node supplies ~10
    let food_demand = alive.len() as u32 * 2;
    let food_supply = world.resource_count(ResourceKind::Food) as u32 * 10;

    let price = &mut world.society.food_price;
    if food_demand > food_supply {
        *price = (*price * 1.1).min(FOOD_PRICE_MAX);
    } else {
        *price = (*price * 0.95).max(FOOD_PRICE_MIN);
    }

    let workshop_count = world.resource_count(ResourceKind::Workshop) as u32;
    world.society.tools_stock = (world.society.tools_stock + workshop_count * 2).min(TOOLS_CAP);

    let mut luxury_gain = 0.0;
    for idx in alive {
        let citizen = &world.citizens[idx];
        if citizen.profession == Some(Profession::Merchant) && citizen.skills.trading > 70.0 {
            luxury_gain += citizen.skills.trading * 0.1;
        }
    }
    world.society.luxury_stock = (world.society.luxury_stock + luxury_gain).min(LUXURY_CAP);
}
