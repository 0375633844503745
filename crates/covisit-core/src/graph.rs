//! Bipartite interaction store with mirrored adjacencies
//!
//! Every interaction is held twice: once under the user
//! (`user -> [(item, ts)]`) and once under the item
//! (`item -> [(user, ts)]`), so both ranking strategies can traverse in
//! either direction without scanning. The mutators keep the two sides in
//! lockstep. Category labels live in a third map whose lifetime is
//! independent of the edges.

use std::collections::HashMap;

use crate::types::{CategoryId, GraphStats, Interaction, ItemId, Timestamp, UserId};

/// In-memory bipartite adjacency store for user-item interactions.
///
/// Parallel edges are preserved: repeated interactions of the same pair
/// append separate entries and nothing deduplicates on insert. A key is
/// never left mapping to an empty adjacency; removal erases keys whose
/// last edge disappeared.
#[derive(Debug, Clone, Default)]
pub struct InteractionGraph {
    user_items: HashMap<UserId, Vec<(ItemId, Timestamp)>>,
    item_users: HashMap<ItemId, Vec<(UserId, Timestamp)>>,
    item_category: HashMap<ItemId, CategoryId>,
}

impl InteractionGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one interaction to both adjacency sides.
    ///
    /// Creates the user and item keys as needed. Never fails and never
    /// deduplicates; callers that re-log the same pair get parallel edges.
    pub fn add_interaction(&mut self, user: UserId, item: ItemId, timestamp: Timestamp) {
        self.user_items
            .entry(user)
            .or_default()
            .push((item, timestamp));
        self.item_users
            .entry(item)
            .or_default()
            .push((user, timestamp));
    }

    /// Remove every edge between `user` and `item`, on both sides.
    ///
    /// All parallel edges for the pair go at once. Keys whose adjacency
    /// becomes empty are erased. Missing keys are a no-op.
    pub fn remove_interaction(&mut self, user: UserId, item: ItemId) {
        if let Some(items) = self.user_items.get_mut(&user) {
            items.retain(|&(i, _)| i != item);
            if items.is_empty() {
                self.user_items.remove(&user);
            }
        }
        if let Some(users) = self.item_users.get_mut(&item) {
            users.retain(|&(u, _)| u != user);
            if users.is_empty() {
                self.item_users.remove(&item);
            }
        }
    }

    /// Insert or replace the category label for an item. Last writer wins.
    ///
    /// Labels are metadata, not edges: an item may carry a category while
    /// having no interactions at all.
    pub fn set_item_category(&mut self, item: ItemId, category: CategoryId) {
        self.item_category.insert(item, category);
    }

    /// Category label of an item, if one was ever set.
    pub fn item_category(&self, item: ItemId) -> Option<CategoryId> {
        self.item_category.get(&item).copied()
    }

    /// Drop all edges and replay `interactions` through [`add_interaction`].
    ///
    /// Category labels survive a rebuild untouched.
    ///
    /// [`add_interaction`]: Self::add_interaction
    pub fn rebuild(&mut self, interactions: &[Interaction]) {
        self.user_items.clear();
        self.item_users.clear();
        for rec in interactions {
            self.add_interaction(rec.user_id, rec.item_id, rec.timestamp);
        }
    }

    /// Items a user interacted with, in insertion order. Empty for
    /// unknown users.
    pub fn user_history(&self, user: UserId) -> &[(ItemId, Timestamp)] {
        self.user_items
            .get(&user)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Users who interacted with an item, in insertion order. Empty for
    /// unknown items.
    pub fn item_audience(&self, item: ItemId) -> &[(UserId, Timestamp)] {
        self.item_users
            .get(&item)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether `user` has at least one edge to `item`.
    pub fn has_interacted(&self, user: UserId, item: ItemId) -> bool {
        self.user_history(user).iter().any(|&(i, _)| i == item)
    }

    /// Flatten the user-side adjacency into a replayable interaction list.
    ///
    /// Feeding the result back through [`rebuild`](Self::rebuild)
    /// reproduces the same adjacency multisets.
    pub fn dump_edges(&self) -> Vec<Interaction> {
        let mut edges = Vec::with_capacity(self.edge_count());
        for (&user, items) in &self.user_items {
            for &(item, ts) in items {
                edges.push(Interaction::new(user, item, ts));
            }
        }
        edges
    }

    /// Items ranked by interaction count descending, ties by ascending
    /// item id. The global cold-start fallback; nothing is excluded.
    pub fn popular_items(&self, k: usize) -> Vec<ItemId> {
        if k == 0 {
            return Vec::new();
        }
        let mut ranked: Vec<(ItemId, usize)> = self
            .item_users
            .iter()
            .map(|(&item, users)| (item, users.len()))
            .collect();
        ranked.sort_unstable_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked.truncate(k);
        ranked.into_iter().map(|(item, _)| item).collect()
    }

    /// Number of users with at least one edge.
    pub fn user_count(&self) -> usize {
        self.user_items.len()
    }

    /// Number of items with at least one edge.
    pub fn item_count(&self) -> usize {
        self.item_users.len()
    }

    /// Total number of stored edges, parallel edges included.
    pub fn edge_count(&self) -> usize {
        self.user_items.values().map(Vec::len).sum()
    }

    /// All three counters in one metrics-friendly struct.
    pub fn stats(&self) -> GraphStats {
        GraphStats {
            users: self.user_count(),
            items: self.item_count(),
            edges: self.edge_count(),
        }
    }

    /// True when the graph holds no edges and no category labels.
    pub fn is_empty(&self) -> bool {
        self.user_items.is_empty() && self.item_users.is_empty() && self.item_category.is_empty()
    }

    /// Iterate the user-side adjacency in unspecified map order.
    pub fn users(&self) -> impl Iterator<Item = (UserId, &[(ItemId, Timestamp)])> + '_ {
        self.user_items.iter().map(|(&u, v)| (u, v.as_slice()))
    }

    /// Iterate the item-side adjacency in unspecified map order.
    pub fn items(&self) -> impl Iterator<Item = (ItemId, &[(UserId, Timestamp)])> + '_ {
        self.item_users.iter().map(|(&i, v)| (i, v.as_slice()))
    }

    /// Iterate the category labels in unspecified map order.
    pub fn categories(&self) -> impl Iterator<Item = (ItemId, CategoryId)> + '_ {
        self.item_category.iter().map(|(&i, &c)| (i, c))
    }

    /// Assemble a graph directly from decoded snapshot sections. The
    /// caller is responsible for the two adjacencies mirroring each other.
    pub(crate) fn from_parts(
        item_category: HashMap<ItemId, CategoryId>,
        user_items: HashMap<UserId, Vec<(ItemId, Timestamp)>>,
        item_users: HashMap<ItemId, Vec<(UserId, Timestamp)>>,
    ) -> Self {
        Self {
            user_items,
            item_users,
            item_category,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Both directions of the mirror invariant, checked entry by entry.
    fn assert_mirrored(graph: &InteractionGraph) {
        for (user, items) in graph.users() {
            for &(item, ts) in items {
                assert!(
                    graph.item_audience(item).contains(&(user, ts)),
                    "user edge ({user},{item},{ts}) missing from item side"
                );
            }
        }
        for (item, users) in graph.items() {
            for &(user, ts) in users {
                assert!(
                    graph.user_history(user).contains(&(item, ts)),
                    "item edge ({item},{user},{ts}) missing from user side"
                );
            }
        }
    }

    #[test]
    fn add_creates_both_sides() {
        let mut g = InteractionGraph::new();
        g.add_interaction(1, 10, 1000);

        assert_eq!(g.user_history(1), &[(10, 1000)]);
        assert_eq!(g.item_audience(10), &[(1, 1000)]);
        assert_mirrored(&g);
    }

    #[test]
    fn parallel_edges_are_preserved() {
        let mut g = InteractionGraph::new();
        g.add_interaction(1, 10, 1000);
        g.add_interaction(1, 10, 1000);
        g.add_interaction(1, 10, 2000);

        assert_eq!(g.user_history(1).len(), 3);
        assert_eq!(g.item_audience(10).len(), 3);
        assert_eq!(g.edge_count(), 3);
        assert_mirrored(&g);
    }

    #[test]
    fn remove_deletes_all_parallel_edges() {
        let mut g = InteractionGraph::new();
        g.add_interaction(1, 10, 1000);
        g.add_interaction(1, 10, 2000);
        g.add_interaction(1, 20, 3000);

        g.remove_interaction(1, 10);

        assert_eq!(g.user_history(1), &[(20, 3000)]);
        assert!(g.item_audience(10).is_empty());
        assert_eq!(g.item_count(), 1);
        assert_mirrored(&g);
    }

    #[test]
    fn remove_erases_empty_keys() {
        let mut g = InteractionGraph::new();
        g.add_interaction(1, 10, 1000);
        g.remove_interaction(1, 10);

        assert_eq!(g.user_count(), 0);
        assert_eq!(g.item_count(), 0);
        assert_eq!(g.edge_count(), 0);
        assert!(g.user_history(1).is_empty());
    }

    #[test]
    fn remove_unknown_pair_is_noop() {
        let mut g = InteractionGraph::new();
        g.add_interaction(1, 10, 1000);

        g.remove_interaction(2, 10);
        g.remove_interaction(1, 99);
        g.remove_interaction(7, 99);

        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.user_history(1), &[(10, 1000)]);
        assert_mirrored(&g);
    }

    #[test]
    fn category_survives_edge_removal() {
        let mut g = InteractionGraph::new();
        g.add_interaction(1, 10, 1000);
        g.set_item_category(10, 7);

        g.remove_interaction(1, 10);

        assert_eq!(g.item_category(10), Some(7));
    }

    #[test]
    fn category_last_writer_wins() {
        let mut g = InteractionGraph::new();
        g.set_item_category(10, 7);
        g.set_item_category(10, 9);
        assert_eq!(g.item_category(10), Some(9));
    }

    #[test]
    fn category_allowed_without_edges() {
        let mut g = InteractionGraph::new();
        g.set_item_category(42, 3);
        assert_eq!(g.item_category(42), Some(3));
        assert_eq!(g.item_count(), 0);
    }

    #[test]
    fn counts_track_mutations() {
        let mut g = InteractionGraph::new();
        g.add_interaction(1, 50, 100);
        g.add_interaction(2, 60, 100);

        assert_eq!(g.user_count(), 2);
        assert_eq!(g.item_count(), 2);
        assert_eq!(g.edge_count(), 2);
        assert_eq!(
            g.stats(),
            GraphStats {
                users: 2,
                items: 2,
                edges: 2
            }
        );
    }

    #[test]
    fn edge_count_matches_both_sides() {
        let mut g = InteractionGraph::new();
        g.add_interaction(1, 10, 1);
        g.add_interaction(1, 20, 2);
        g.add_interaction(2, 10, 3);
        g.add_interaction(2, 10, 4);

        let user_side: usize = g.users().map(|(_, v)| v.len()).sum();
        let item_side: usize = g.items().map(|(_, v)| v.len()).sum();
        assert_eq!(g.edge_count(), user_side);
        assert_eq!(g.edge_count(), item_side);
    }

    #[test]
    fn rebuild_replaces_edges_and_keeps_categories() {
        let mut g = InteractionGraph::new();
        g.add_interaction(1, 10, 1000);
        g.add_interaction(2, 20, 2000);
        g.set_item_category(10, 5);

        g.rebuild(&[
            Interaction::new(3, 30, 3000),
            Interaction::new(3, 40, 3001),
        ]);

        assert!(g.user_history(1).is_empty());
        assert_eq!(g.user_history(3), &[(30, 3000), (40, 3001)]);
        assert_eq!(g.item_category(10), Some(5));
        assert_mirrored(&g);
    }

    #[test]
    fn rebuild_from_dump_is_identity() {
        let mut g = InteractionGraph::new();
        g.add_interaction(1, 10, 1000);
        g.add_interaction(1, 10, 1000);
        g.add_interaction(2, 10, 1500);
        g.add_interaction(2, 20, 2000);
        g.set_item_category(20, 4);

        let mut dump = g.dump_edges();
        let before = g.stats();

        g.rebuild(&dump);

        assert_eq!(g.stats(), before);
        assert_eq!(g.item_category(20), Some(4));
        assert_mirrored(&g);

        let mut dump_after = g.dump_edges();
        dump.sort_unstable_by_key(|r| (r.user_id, r.item_id, r.timestamp));
        dump_after.sort_unstable_by_key(|r| (r.user_id, r.item_id, r.timestamp));
        assert_eq!(dump, dump_after);
    }

    #[test]
    fn has_interacted_probes_user_side() {
        let mut g = InteractionGraph::new();
        g.add_interaction(1, 10, 1000);

        assert!(g.has_interacted(1, 10));
        assert!(!g.has_interacted(1, 20));
        assert!(!g.has_interacted(2, 10));
    }

    #[test]
    fn popular_items_ranked_by_degree_then_id() {
        let mut g = InteractionGraph::new();
        g.add_interaction(1, 10, 1);
        g.add_interaction(2, 10, 2);
        g.add_interaction(3, 10, 3);
        g.add_interaction(1, 20, 4);
        g.add_interaction(2, 20, 5);
        g.add_interaction(1, 30, 6);

        assert_eq!(g.popular_items(2), vec![10, 20]);
        assert_eq!(g.popular_items(10), vec![10, 20, 30]);
        assert!(g.popular_items(0).is_empty());
    }

    #[test]
    fn popular_items_tie_breaks_ascending() {
        let mut g = InteractionGraph::new();
        g.add_interaction(1, 30, 1);
        g.add_interaction(1, 10, 2);
        g.add_interaction(2, 30, 3);
        g.add_interaction(2, 10, 4);

        assert_eq!(g.popular_items(2), vec![10, 30]);
    }
}
