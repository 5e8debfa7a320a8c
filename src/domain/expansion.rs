//! Expansion state machine
//!
//! A node may only be expanded while its parent is expanded, a collapsed
//! node has only collapsed children, and leaves are always collapsed. The
//! transitions below are the only writers of `expanded` and keep all three
//! rules intact.

use generational_arena::Index;
use tracing::instrument;

use crate::domain::arena::TreeArena;

impl TreeArena {
    /// Expand the internal node `idx`. Refused for leaves and for nodes whose
    /// parent is collapsed.
    #[instrument(level = "trace", skip(self))]
    pub fn expand(&mut self, idx: Index) -> bool {
        if !self.can_expand(idx) {
            return false;
        }
        self.set_expanded(idx, true);
        true
    }

    /// Expand `idx` and every internal node below it.
    #[instrument(level = "trace", skip(self))]
    pub fn expand_all(&mut self, idx: Index) -> bool {
        if !self.can_expand(idx) {
            return false;
        }
        // pre-order visits a parent before its children
        let internal: Vec<Index> = self
            .iter_from(idx)
            .filter(|(_, node)| !node.is_leaf())
            .map(|(i, _)| i)
            .collect();
        for node_idx in internal {
            self.set_expanded(node_idx, true);
        }
        true
    }

    /// Collapse the subtree at `idx`, then collapse its parent together with
    /// the parent's whole subtree.
    #[instrument(level = "trace", skip(self))]
    pub fn collapse(&mut self, idx: Index) -> bool {
        if self.get_node(idx).is_none() {
            return false;
        }
        self.collapse_subtree(idx);
        if let Some(parent_idx) = self.parent(idx) {
            self.collapse_subtree(parent_idx);
        }
        true
    }

    /// Collapse every ancestor of `idx` up to the root. Collapsing the
    /// parent takes `idx` along; a node without ancestors is left as is.
    #[instrument(level = "trace", skip(self))]
    pub fn collapse_all(&mut self, idx: Index) -> bool {
        let ancestors = self.ancestors(idx);
        if ancestors.is_empty() {
            return false;
        }
        for ancestor in ancestors {
            self.collapse(ancestor);
        }
        true
    }

    fn can_expand(&self, idx: Index) -> bool {
        let Some(node) = self.get_node(idx) else {
            return false;
        };
        if node.is_leaf() {
            return false;
        }
        node.parent.map_or(true, |parent| self.is_expanded(parent))
    }

    fn collapse_subtree(&mut self, idx: Index) {
        let subtree: Vec<Index> = self.iter_from(idx).map(|(i, _)| i).collect();
        for node_idx in subtree {
            self.set_expanded(node_idx, false);
        }
    }

    fn set_expanded(&mut self, idx: Index, expanded: bool) {
        if let Some(node) = self.get_node_mut(idx) {
            node.data.expanded = expanded;
        }
    }
}
