//! Core types for the interaction graph

use serde::{Deserialize, Serialize};

/// Caller-chosen user identifier. Opaque; no interpretation is imposed.
pub type UserId = i32;

/// Caller-chosen item identifier.
pub type ItemId = i32;

/// Caller-chosen category label identifier.
pub type CategoryId = i32;

/// Seconds since a caller-defined epoch.
pub type Timestamp = i64;

/// A single user-item interaction record, as accepted by bulk rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interaction {
    pub user_id: UserId,
    pub item_id: ItemId,
    pub timestamp: Timestamp,
}

impl Interaction {
    pub fn new(user_id: UserId, item_id: ItemId, timestamp: Timestamp) -> Self {
        Self {
            user_id,
            item_id,
            timestamp,
        }
    }
}

/// Graph-level counters, as reported to metrics consumers.
///
/// `edges` counts every stored interaction, so parallel edges between the
/// same user and item each contribute one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    /// Number of users with at least one interaction.
    pub users: usize,
    /// Number of items with at least one interaction.
    pub items: usize,
    /// Total number of stored interactions.
    pub edges: usize,
}
