//! Community influence zones
//!
//! Communities are derived once at initialization from building clusters:
//! each is a fixed center with an influence radius and a dominant
//! personality trait that nudges nearby citizens' behavior.

use serde::{Deserialize, Serialize};

use crate::core::types::{CommunityId, GridPos};
use crate::entity::personality::Temperament;

/// Manhattan radius within which a community influences citizens
pub const COMMUNITY_RADIUS: i32 = 5;

/// Maximum number of communities derived at initialization
pub const MAX_COMMUNITIES: usize = 3;

/// A read-only community descriptor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Community {
    pub id: CommunityId,
    pub center: GridPos,
    pub dominant_trait: Temperament,
}

/// The community whose center is nearest to `pos` within the influence
/// radius, if any. Ties keep the earlier community (lower id).
pub fn community_at(communities: &[Community], pos: GridPos) -> Option<&Community> {
    let mut best: Option<(i32, &Community)> = None;
    for community in communities {
        let dist = pos.manhattan(&community.center);
        if dist > COMMUNITY_RADIUS {
            continue;
        }
        if best.map_or(true, |(d, _)| dist < d) {
            best = Some((dist, community));
        }
    }
    best.map(|(_, c)| c)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn community(id: u32, x: i32, y: i32, t: Temperament) -> Community {
        Community {
            id: CommunityId(id),
            center: GridPos::new(x, y),
            dominant_trait: t,
        }
    }

    #[test]
    fn test_outside_radius_is_none() {
        let communities = vec![community(0, 0, 0, Temperament::Friendly)];
        assert!(community_at(&communities, GridPos::new(3, 3)).is_none());
        assert!(community_at(&communities, GridPos::new(3, 2)).is_some());
    }

    #[test]
    fn test_nearest_center_wins() {
        let communities = vec![
            community(0, 0, 0, Temperament::Friendly),
            community(1, 4, 0, Temperament::Greedy),
        ];
        let found = community_at(&communities, GridPos::new(3, 0)).unwrap();
        assert_eq!(found.id, CommunityId(1));
    }

    #[test]
    fn test_tie_keeps_lower_id() {
        let communities = vec![
            community(0, 0, 0, Temperament::Friendly),
            community(1, 4, 0, Temperament::Greedy),
        ];
        let found = community_at(&communities, GridPos::new(2, 0)).unwrap();
        assert_eq!(found.id, CommunityId(0));
    }
}
