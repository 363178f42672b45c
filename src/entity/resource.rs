//! Stationary resource nodes
//!
//! Food is consumed and destroyed; every other kind persists and can be
//! used again each step. Nodes carry a single efficiency multiplier that
//! technology unlocks raise over the course of a run.

use crate::core::types::{EntityId, GridPos};
use serde::{Deserialize, Serialize};

/// Closed set of resource node kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Food,
    House,
    Job,
    Market,
    Workshop,
    Temple,
    School,
}

impl ResourceKind {
    /// Match order for on-cell interaction: the first present kind in this
    /// order receives the single interaction of the step.
    pub const INTERACT_ORDER: [ResourceKind; 7] = [
        ResourceKind::Food,
        ResourceKind::House,
        ResourceKind::Job,
        ResourceKind::Market,
        ResourceKind::Workshop,
        ResourceKind::Temple,
        ResourceKind::School,
    ];
}

/// A stationary node on the grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceNode {
    pub id: EntityId,
    pub kind: ResourceKind,
    pub pos: GridPos,
    /// False once consumed (Food only; other kinds never flip)
    pub exists: bool,
    /// Efficiency multiplier applied to skill gains at this node.
    /// Starts at 1.0; raised by technology unlocks.
    pub bonus: f32,
}

impl ResourceNode {
    pub fn new(id: EntityId, kind: ResourceKind, pos: GridPos) -> Self {
        Self {
            id,
            kind,
            pos,
            exists: true,
            bonus: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interact_order_starts_with_food() {
        assert_eq!(ResourceKind::INTERACT_ORDER[0], ResourceKind::Food);
        assert_eq!(ResourceKind::INTERACT_ORDER.len(), 7);
    }

    #[test]
    fn test_new_node_exists_with_unit_bonus() {
        let node = ResourceNode::new(EntityId(3), ResourceKind::Market, GridPos::new(1, 1));
        assert!(node.exists);
        assert_eq!(node.bonus, 1.0);
    }
}
