//! Main engine facade
//!
//! Ties the interaction store, the two ranking strategies, and the
//! snapshot codec together behind the surface the binding layer calls.
//! The engine is a plain value: it holds no locks and spawns nothing, so
//! hosts that want parallel readers wrap an instance in their own lock.

use std::path::Path;

use crate::cf;
use crate::clock::{BoxedClock, SystemClock};
use crate::error::Result;
use crate::graph::InteractionGraph;
use crate::random_walk::RandomWalkRecommender;
use crate::snapshot;
use crate::types::{CategoryId, GraphStats, Interaction, ItemId, Timestamp, UserId};

/// Engine construction options.
pub struct EngineOptions {
    /// Source of "now" for time-decay scoring.
    pub clock: BoxedClock,
    /// Seed for the random-walk recommender (0 = use entropy source).
    pub ppr_seed: u64,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            clock: Box::new(SystemClock),
            ppr_seed: 0,
        }
    }
}

/// In-memory graph-based recommendation engine.
///
/// # Example
///
/// ```rust
/// use covisit_core::engine::RecommendationEngine;
///
/// let mut engine = RecommendationEngine::new();
/// engine.add_interaction(1, 10, 1000);
/// engine.add_interaction(2, 10, 1001);
/// engine.add_interaction(2, 20, 1002);
///
/// assert_eq!(engine.recommend_cf(1, 5, &[]), vec![20]);
/// assert_eq!(engine.user_count(), 2);
/// ```
pub struct RecommendationEngine {
    graph: InteractionGraph,
    clock: BoxedClock,
    ppr_seed: u64,
}

impl RecommendationEngine {
    /// Create an empty engine with the system clock.
    pub fn new() -> Self {
        Self::with_options(EngineOptions::default())
    }

    /// Create an empty engine with the given options.
    pub fn with_options(options: EngineOptions) -> Self {
        Self {
            graph: InteractionGraph::new(),
            clock: options.clock,
            ppr_seed: options.ppr_seed,
        }
    }

    // -----------------------------------------------------------------------
    // Mutators
    // -----------------------------------------------------------------------

    /// Record one user-item interaction. See
    /// [`InteractionGraph::add_interaction`].
    pub fn add_interaction(&mut self, user: UserId, item: ItemId, timestamp: Timestamp) {
        self.graph.add_interaction(user, item, timestamp);
    }

    /// Remove every edge between `user` and `item`. See
    /// [`InteractionGraph::remove_interaction`].
    pub fn remove_interaction(&mut self, user: UserId, item: ItemId) {
        self.graph.remove_interaction(user, item);
    }

    /// Insert or replace an item's category label.
    pub fn set_item_category(&mut self, item: ItemId, category: CategoryId) {
        self.graph.set_item_category(item, category);
    }

    /// Drop all edges and replay the given interactions. Category labels
    /// are preserved.
    pub fn rebuild(&mut self, interactions: &[Interaction]) {
        self.graph.rebuild(interactions);
    }

    // -----------------------------------------------------------------------
    // Recommenders
    // -----------------------------------------------------------------------

    /// Top-`k` items via the time-decayed collaborative-filtering scan,
    /// boosting candidates whose category is in `preferred`.
    pub fn recommend_cf(&self, target: UserId, k: usize, preferred: &[CategoryId]) -> Vec<ItemId> {
        cf::recommend(&self.graph, target, k, preferred, self.clock.now())
    }

    /// Top-`k` items via Monte-Carlo Personalized PageRank.
    ///
    /// Fails with [`EngineError::InvalidArgument`] when `walk_depth` is
    /// zero. `num_walks == 0` or `k == 0` return an empty vector.
    ///
    /// [`EngineError::InvalidArgument`]: crate::error::EngineError::InvalidArgument
    pub fn recommend_ppr(
        &self,
        target: UserId,
        k: usize,
        num_walks: usize,
        walk_depth: usize,
    ) -> Result<Vec<ItemId>> {
        RandomWalkRecommender::new(num_walks, walk_depth)
            .with_seed(self.ppr_seed)
            .recommend(&self.graph, target, k)
    }

    /// Top-`k` items by global interaction count; the cold-start fallback.
    pub fn recommend_popular(&self, k: usize) -> Vec<ItemId> {
        self.graph.popular_items(k)
    }

    // -----------------------------------------------------------------------
    // Readers and metrics
    // -----------------------------------------------------------------------

    /// Items the user interacted with, in insertion order.
    pub fn user_history(&self, user: UserId) -> &[(ItemId, Timestamp)] {
        self.graph.user_history(user)
    }

    /// Whether the user has at least one edge to the item.
    pub fn has_interacted(&self, user: UserId, item: ItemId) -> bool {
        self.graph.has_interacted(user, item)
    }

    /// Flatten the graph into a replayable interaction list.
    pub fn dump_edges(&self) -> Vec<Interaction> {
        self.graph.dump_edges()
    }

    /// Number of users with at least one edge.
    pub fn user_count(&self) -> usize {
        self.graph.user_count()
    }

    /// Number of items with at least one edge.
    pub fn item_count(&self) -> usize {
        self.graph.item_count()
    }

    /// Total stored edges, parallel edges included.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// All three counters at once.
    pub fn stats(&self) -> GraphStats {
        self.graph.stats()
    }

    /// Borrow the underlying store.
    pub fn graph(&self) -> &InteractionGraph {
        &self.graph
    }

    // -----------------------------------------------------------------------
    // Snapshot I/O
    // -----------------------------------------------------------------------

    /// Write the full engine state to a snapshot file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        snapshot::save(&self.graph, path)
    }

    /// Replace the engine state from a snapshot file.
    ///
    /// The in-memory state is cleared before any byte is read, so a
    /// failed load leaves the engine consistent-but-empty rather than
    /// half-loaded.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.graph = InteractionGraph::new();
        self.graph = snapshot::load(path)?;
        Ok(())
    }
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self::new()
    }
}
