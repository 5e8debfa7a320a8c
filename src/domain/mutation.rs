//! Weight recomputation, moving and resizing of nodes

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::domain::arena::TreeArena;

impl TreeArena {
    /// Recompute internal weights below `idx` from the leaves and return the
    /// new weight. Leaf weights are never changed.
    #[instrument(level = "trace", skip(self))]
    pub fn recompute_weights(&mut self, idx: Index) -> u64 {
        let internal: Vec<Index> = self
            .iter_postorder_from(idx)
            .filter(|(_, node)| !node.is_leaf())
            .map(|(i, _)| i)
            .collect();
        for node_idx in internal {
            let total = self
                .children(node_idx)
                .iter()
                .fold(0u64, |acc, &child| {
                    acc.saturating_add(self.weight(child).unwrap_or(0))
                });
            if let Some(node) = self.get_node_mut(node_idx) {
                node.data.weight = total;
            }
        }
        self.weight(idx).unwrap_or(0)
    }

    /// Move the collapsed leaf `idx` to the end of `destination`'s children.
    ///
    /// Does nothing unless `idx` is a non-empty collapsed leaf and
    /// `destination` has children. An old parent left without children is
    /// collapsed and its weight reset to 0; no other ancestor weight changes,
    /// so callers wanting consistent weights follow up with
    /// [`TreeArena::recompute_weights`].
    #[instrument(level = "debug", skip(self))]
    pub fn move_to(&mut self, idx: Index, destination: Index) -> bool {
        let Some(node) = self.get_node(idx) else {
            return false;
        };
        if node.is_empty() || !node.is_leaf() || node.data.expanded {
            return false;
        }
        let old_parent = node.parent;
        if self.get_node(destination).map_or(true, |dest| dest.is_leaf()) {
            return false;
        }

        if let Some(parent_idx) = old_parent {
            if let Some(parent) = self.get_node_mut(parent_idx) {
                parent.children.retain(|&child| child != idx);
                if parent.children.is_empty() {
                    parent.data.expanded = false;
                    parent.data.weight = 0;
                }
            }
        }
        if let Some(dest) = self.get_node_mut(destination) {
            dest.children.push(idx);
        }
        if let Some(node) = self.get_node_mut(idx) {
            node.parent = Some(destination);
        }
        if self.root() == Some(idx) {
            let top = self.top(destination);
            self.set_root(top);
        }
        debug!("moved {:?} under {:?}", idx, destination);
        true
    }

    /// Grow (`factor > 0`) or shrink the leaf `idx` by `ceil(weight * |factor|)`.
    ///
    /// Only leaves heavier than 1 change, and a shrinking leaf stops at 1.
    /// The applied change is added to every ancestor.
    #[instrument(level = "debug", skip(self))]
    pub fn change_weight(&mut self, idx: Index, factor: f64) -> bool {
        if !factor.is_finite() {
            return false;
        }
        let Some(node) = self.get_node(idx) else {
            return false;
        };
        if node.is_empty() || !node.is_leaf() || node.data.weight <= 1 {
            return false;
        }

        let old = node.data.weight;
        // float to int casts saturate
        let delta = ((old as f64) * factor.abs()).ceil().max(1.0) as u64;
        let new = if factor > 0.0 {
            old.saturating_add(delta)
        } else {
            old.saturating_sub(delta).max(1)
        };
        if let Some(node) = self.get_node_mut(idx) {
            node.data.weight = new;
        }

        for ancestor in self.ancestors(idx) {
            if let Some(node) = self.get_node_mut(ancestor) {
                node.data.weight = if new > old {
                    node.data.weight.saturating_add(new - old)
                } else {
                    node.data.weight.saturating_sub(old - new)
                };
            }
        }
        debug!("weight of {:?}: {} -> {}", idx, old, new);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::color::FixedColor;
    use crate::domain::entities::Rgb;
    use crate::domain::style::FileSystemStyle;

    fn arena() -> TreeArena {
        TreeArena::new(FileSystemStyle, FixedColor(Rgb(0, 0, 0)))
    }

    #[test]
    fn given_edited_leaf_when_recomputing_then_ancestors_follow() {
        let mut tree = arena();
        let a = tree.insert_leaf("a", 2);
        let b = tree.insert_leaf("b", 3);
        let p = tree.insert_node(Some("p"), vec![a, b], 0).unwrap();
        let root = tree.insert_node(Some("root"), vec![p], 0).unwrap();

        tree.get_node_mut(a).unwrap().data.weight = 10;
        assert_eq!(tree.recompute_weights(root), 13);
        assert_eq!(tree.weight(p), Some(13));
        assert_eq!(tree.weight(a), Some(10));
        assert_eq!(tree.recompute_weights(a), 10);
    }

    #[test]
    fn given_last_child_moved_when_moving_then_old_parent_reset() {
        let mut tree = arena();
        let a = tree.insert_leaf("a", 2);
        let p = tree.insert_node(Some("p"), vec![a], 0).unwrap();
        let b = tree.insert_leaf("b", 3);
        let q = tree.insert_node(Some("q"), vec![b], 0).unwrap();
        let root = tree.insert_node(Some("root"), vec![p, q], 0).unwrap();
        tree.expand(root);
        tree.expand(p);

        assert!(tree.move_to(a, q));

        assert_eq!(tree.children(q), &[b, a]);
        assert!(tree.children(p).is_empty());
        assert_eq!(tree.parent(a), Some(q));
        assert_eq!(tree.weight(p), Some(0));
        assert!(!tree.is_expanded(p));
        // ancestors beyond the old parent are left alone
        assert_eq!(tree.weight(q), Some(3));
        assert_eq!(tree.weight(root), Some(5));
        assert_eq!(tree.recompute_weights(root), 5);
        assert_eq!(tree.weight(q), Some(5));
    }

    #[test]
    fn given_leaf_destination_when_moving_then_noop() {
        let mut tree = arena();
        let a = tree.insert_leaf("a", 2);
        let b = tree.insert_leaf("b", 3);
        let root = tree.insert_node(Some("root"), vec![a, b], 0).unwrap();

        assert!(!tree.move_to(a, b));
        assert_eq!(tree.children(root), &[a, b]);
        assert!(!tree.move_to(root, root));
    }

    #[test]
    fn given_same_parent_when_moving_then_becomes_last() {
        let mut tree = arena();
        let a = tree.insert_leaf("a", 2);
        let b = tree.insert_leaf("b", 3);
        let root = tree.insert_node(Some("root"), vec![a, b], 0).unwrap();

        assert!(tree.move_to(a, root));
        assert_eq!(tree.children(root), &[b, a]);
        assert_eq!(tree.weight(root), Some(5));
    }

    #[test]
    fn given_heavy_leaf_when_growing_then_every_ancestor_grows() {
        let mut tree = arena();
        let a = tree.insert_leaf("a", 10);
        let b = tree.insert_leaf("b", 5);
        let p = tree.insert_node(Some("p"), vec![a], 0).unwrap();
        let root = tree.insert_node(Some("root"), vec![p, b], 0).unwrap();

        assert!(tree.change_weight(a, 0.1));

        assert_eq!(tree.weight(a), Some(11));
        assert_eq!(tree.weight(p), Some(11));
        assert_eq!(tree.weight(root), Some(16));
    }

    #[test]
    fn given_shrink_past_one_when_changing_then_floored_and_consistent() {
        let mut tree = arena();
        let a = tree.insert_leaf("a", 3);
        let b = tree.insert_leaf("b", 5);
        let root = tree.insert_node(Some("root"), vec![a, b], 0).unwrap();

        assert!(tree.change_weight(a, -1.0));

        assert_eq!(tree.weight(a), Some(1));
        assert_eq!(tree.weight(root), Some(6));
    }

    #[test]
    fn given_light_leaf_or_internal_node_when_changing_then_noop() {
        let mut tree = arena();
        let a = tree.insert_leaf("a", 1);
        let b = tree.insert_leaf("b", 4);
        let root = tree.insert_node(Some("root"), vec![a, b], 0).unwrap();

        assert!(!tree.change_weight(a, -0.5));
        assert!(!tree.change_weight(a, 2.0));
        assert!(!tree.change_weight(root, 0.5));
        assert!(!tree.change_weight(b, f64::NAN));
        assert_eq!(tree.weight(a), Some(1));
        assert_eq!(tree.weight(root), Some(5));
    }

    #[test]
    fn given_zero_factor_when_changing_then_still_moves_by_one() {
        let mut tree = arena();
        let a = tree.insert_leaf("a", 4);
        let root = tree.insert_node(Some("root"), vec![a], 0).unwrap();

        assert!(tree.change_weight(a, 0.0));
        assert_eq!(tree.weight(a), Some(3));
        assert_eq!(tree.weight(root), Some(3));
    }
}
