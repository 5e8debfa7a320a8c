//! Treemap layout, displayed rectangles and hit testing

use generational_arena::Index;
use tracing::instrument;

use crate::domain::arena::TreeArena;
use crate::domain::entities::{Position, Rect, Rgb};

impl TreeArena {
    /// Lay out the subtree at `idx` so its displayed leaves tile `bounds`.
    ///
    /// Slicing follows the aspect ratio of each bounding rectangle: wider
    /// than tall gives vertical stripes left to right, otherwise horizontal
    /// stripes top to bottom. Every child but the last weighted one gets the
    /// floor of its proportional share; the last weighted child takes the
    /// remainder, so trailing zero-weight children never swallow it.
    #[instrument(level = "trace", skip(self))]
    pub fn layout(&mut self, idx: Index, bounds: Rect) {
        let Some(node) = self.get_node(idx) else {
            return;
        };
        if node.is_empty() || node.data.weight == 0 {
            self.clear_rects(idx);
            return;
        }

        let total = node.data.weight;
        let children = node.children.clone();
        if let Some(node) = self.get_node_mut(idx) {
            node.data.rect = bounds;
        }
        let weights: Vec<u64> = children
            .iter()
            .map(|&child| self.weight(child).unwrap_or(0))
            .collect();
        let Some(last) = weights.iter().rposition(|&w| w > 0) else {
            return;
        };

        let vertical_stripes = bounds.width > bounds.height;
        let extent = if vertical_stripes {
            bounds.width
        } else {
            bounds.height
        };
        let origin = if vertical_stripes { bounds.x } else { bounds.y };

        let mut offset: i32 = 0;
        for (i, (&child_idx, &child_weight)) in children.iter().zip(&weights).enumerate() {
            let share = if i == last {
                extent - offset
            } else {
                proportional_share(extent, child_weight, total)
            };
            let sub = stripe(bounds, vertical_stripes, origin + offset, share);
            self.layout(child_idx, sub);
            offset += share;
        }
    }

    /// Assign the degenerate rectangle to every node below and at `idx`.
    fn clear_rects(&mut self, idx: Index) {
        let subtree: Vec<Index> = self.iter_from(idx).map(|(i, _)| i).collect();
        for node_idx in subtree {
            if let Some(node) = self.get_node_mut(node_idx) {
                node.data.rect = Rect::DEGENERATE;
            }
        }
    }

    /// Rectangles and colors of every displayed leaf below `idx`, in child
    /// order. This is the only geometry a renderer needs.
    #[instrument(level = "trace", skip(self))]
    pub fn visible_rectangles(&self, idx: Index) -> Vec<(Rect, Rgb)> {
        self.displayed_leaves(idx)
            .into_iter()
            .filter_map(|leaf| self.get_node(leaf))
            .map(|node| (node.data.rect, node.data.color))
            .collect()
    }

    /// Displayed leaves below `idx`, in the order of
    /// [`TreeArena::visible_rectangles`].
    pub fn displayed_leaves(&self, idx: Index) -> Vec<Index> {
        let mut result = Vec::new();
        self.collect_displayed(idx, &mut result);
        result
    }

    fn collect_displayed(&self, idx: Index, out: &mut Vec<Index>) {
        let Some(node) = self.get_node(idx) else {
            return;
        };
        if node.is_empty() || node.data.weight == 0 {
            return;
        }
        if node.is_leaf() || !node.data.expanded {
            out.push(idx);
            return;
        }
        for &child_idx in &node.children {
            self.collect_displayed(child_idx, out);
        }
    }

    /// The displayed leaf below `idx` whose rectangle contains `pos`.
    ///
    /// Rectangles are closed, so a position on an edge shared by two siblings
    /// belongs to the one earlier in child order, which is the one closer to
    /// the origin.
    #[instrument(level = "trace", skip(self))]
    pub fn node_at(&self, idx: Index, pos: Position) -> Option<Index> {
        let node = self.get_node(idx)?;
        if node.is_empty() || node.data.weight == 0 || !node.data.rect.contains(pos) {
            return None;
        }
        self.descend_to(idx, pos)
    }

    fn descend_to(&self, idx: Index, pos: Position) -> Option<Index> {
        let node = self.get_node(idx)?;
        if node.is_leaf() || !node.data.expanded {
            return Some(idx);
        }
        let hit = node.children.iter().copied().find(|&child_idx| {
            self.get_node(child_idx).is_some_and(|child| {
                child.data.weight > 0 && child.data.rect.contains(pos)
            })
        })?;
        self.descend_to(hit, pos)
    }
}

/// `floor(extent * weight / total)` without floating point error.
fn proportional_share(extent: i32, weight: u64, total: u64) -> i32 {
    if total == 0 || extent <= 0 {
        return 0;
    }
    let share = u128::from(extent.unsigned_abs()) * u128::from(weight) / u128::from(total);
    i32::try_from(share).unwrap_or(extent)
}

fn stripe(bounds: Rect, vertical: bool, start: i32, extent: i32) -> Rect {
    if vertical {
        Rect::new(start, bounds.y, extent, bounds.height)
    } else {
        Rect::new(bounds.x, start, bounds.width, extent)
    }
}
