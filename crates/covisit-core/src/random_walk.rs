//! Monte-Carlo Personalized PageRank over alternating bipartite walks
//!
//! Estimates stationary visit frequency by simulating many short walks
//! restarting from the target user. A walk alternates user -> item ->
//! user steps, picking uniformly among the current node's edges; only the
//! item reached at the final step is counted, which keeps the estimator
//! an unbiased visit-frequency at exactly `walk_depth` steps. Walks that
//! reach a node with no outgoing edges are dropped without recording.
//!
//! Selection ignores timestamps; the walk distribution is the uniform
//! edge distribution of the current graph.

use std::collections::{HashMap, HashSet};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::error::{EngineError, Result};
use crate::graph::InteractionGraph;
use crate::types::{ItemId, UserId};

/// Monte-Carlo random-walk recommender.
///
/// # Example
///
/// ```rust
/// use covisit_core::graph::InteractionGraph;
/// use covisit_core::random_walk::RandomWalkRecommender;
///
/// let mut graph = InteractionGraph::new();
/// graph.add_interaction(1, 10, 1000);
/// graph.add_interaction(2, 10, 1001);
/// graph.add_interaction(2, 20, 1002);
///
/// let walker = RandomWalkRecommender::new(1000, 3).with_seed(42);
/// assert_eq!(walker.recommend(&graph, 1, 5).unwrap(), vec![20]);
/// ```
#[derive(Debug, Clone)]
pub struct RandomWalkRecommender {
    /// Number of walks to simulate.
    pub num_walks: usize,
    /// Steps per walk; each step lands on an item. Must be at least 1.
    pub walk_depth: usize,
    /// Random seed for reproducibility (0 = use entropy source).
    pub seed: u64,
}

impl RandomWalkRecommender {
    /// Create a recommender with the given walk budget and depth.
    pub fn new(num_walks: usize, walk_depth: usize) -> Self {
        Self {
            num_walks,
            walk_depth,
            seed: 0,
        }
    }

    /// Set the random seed for reproducible results.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    fn make_rng(&self) -> StdRng {
        if self.seed == 0 {
            StdRng::from_entropy()
        } else {
            StdRng::seed_from_u64(self.seed)
        }
    }

    fn validate_params(&self) -> Result<()> {
        if self.walk_depth == 0 {
            return Err(EngineError::InvalidArgument {
                name: "walk_depth",
                value: "0".into(),
                expected: ">= 1",
            });
        }
        Ok(())
    }

    /// Simulate one walk from `start`. Returns the terminal item, or
    /// `None` if the walk hit a node with no outgoing edges.
    fn single_walk(
        graph: &InteractionGraph,
        start: UserId,
        walk_depth: usize,
        rng: &mut StdRng,
    ) -> Option<ItemId> {
        let mut user = start;
        let mut item = None;
        for step in 0..walk_depth {
            let history = graph.user_history(user);
            if history.is_empty() {
                return None;
            }
            let (picked, _) = history[rng.gen_range(0..history.len())];
            item = Some(picked);
            if step + 1 == walk_depth {
                break;
            }
            let audience = graph.item_audience(picked);
            if audience.is_empty() {
                return None;
            }
            let (next, _) = audience[rng.gen_range(0..audience.len())];
            user = next;
        }
        item
    }

    /// Top-`k` recommendations for `target` by terminal visit count.
    ///
    /// Items the target already interacted with are excluded. Returns an
    /// empty vector for unknown targets and for `k == 0` or
    /// `num_walks == 0`, without simulating anything.
    pub fn recommend(
        &self,
        graph: &InteractionGraph,
        target: UserId,
        k: usize,
    ) -> Result<Vec<ItemId>> {
        self.validate_params()?;
        if k == 0 || self.num_walks == 0 {
            return Ok(Vec::new());
        }
        let history = graph.user_history(target);
        if history.is_empty() {
            return Ok(Vec::new());
        }

        let seen: HashSet<ItemId> = history.iter().map(|&(item, _)| item).collect();
        let mut rng = self.make_rng();
        let mut visits: HashMap<ItemId, u64> = HashMap::new();
        let mut aborted = 0usize;

        for _ in 0..self.num_walks {
            match Self::single_walk(graph, target, self.walk_depth, &mut rng) {
                Some(item) if !seen.contains(&item) => {
                    *visits.entry(item).or_insert(0) += 1;
                }
                Some(_) => {}
                None => aborted += 1,
            }
        }

        if aborted > 0 {
            debug!(
                target: "covisit_core::random_walk",
                aborted,
                walks = self.num_walks,
                "walks dropped at nodes with no outgoing edges",
            );
        }

        let mut ranked: Vec<(ItemId, u64)> = visits.into_iter().collect();
        ranked.sort_unstable_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked.truncate(k);
        Ok(ranked.into_iter().map(|(item, _)| item).collect())
    }
}
