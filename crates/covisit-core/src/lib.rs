//! # Covisit Core
//!
//! In-memory, graph-based recommendation engine. A bipartite interaction
//! graph (users and items, edges timestamped, items optionally labeled
//! with a category) feeds two top-K ranking strategies:
//!
//! - **Collaborative-filtering scan**: bounded two-hop traversal with
//!   per-edge time decay and a multiplicative category boost.
//! - **Monte-Carlo Personalized PageRank**: visit counts over many short
//!   alternating random walks restarting from the target user.
//!
//! The full graph state persists through a compact little-endian binary
//! snapshot. The engine is single-node, keeps everything in primary
//! memory, and is a plain value type; hosts add their own locking if
//! they want parallel readers.
//!
//! ```rust
//! use covisit_core::RecommendationEngine;
//!
//! let mut engine = RecommendationEngine::new();
//! engine.add_interaction(1, 10, 1_700_000_000);
//! engine.add_interaction(2, 10, 1_700_000_100);
//! engine.add_interaction(2, 20, 1_700_000_200);
//!
//! assert_eq!(engine.recommend_cf(1, 5, &[]), vec![20]);
//! ```

pub mod cf;
pub mod clock;
pub mod engine;
pub mod error;
pub mod graph;
pub mod random_walk;
pub mod snapshot;
pub mod types;

pub use clock::{BoxedClock, Clock, FixedClock, SystemClock};
pub use engine::{EngineOptions, RecommendationEngine};
pub use error::{EngineError, Result};
pub use graph::InteractionGraph;
pub use random_walk::RandomWalkRecommender;
pub use types::{CategoryId, GraphStats, Interaction, ItemId, Timestamp, UserId};
