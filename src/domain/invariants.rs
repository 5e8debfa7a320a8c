//! Representation invariant and tiling checks

use generational_arena::Index;
use tracing::instrument;

use crate::domain::arena::TreeArena;
use crate::domain::entities::Rect;
use crate::domain::error::{DomainError, DomainResult};

fn violation(node: Index, message: impl Into<String>) -> DomainError {
    DomainError::InvariantViolation {
        node,
        message: message.into(),
    }
}

impl TreeArena {
    /// Verify the representation invariants of every node in the arena.
    ///
    /// Returns the first violation found.
    #[instrument(level = "debug", skip(self))]
    pub fn check_invariants(&self) -> DomainResult<()> {
        for (idx, node) in self.all_nodes() {
            if node.is_empty()
                && (!node.children.is_empty() || node.parent.is_some() || node.data.weight != 0)
            {
                return Err(violation(
                    idx,
                    "empty node must be a childless, parentless root of weight 0",
                ));
            }

            if !node.children.is_empty() {
                let mut sum: u64 = 0;
                for &child_idx in &node.children {
                    let child = self
                        .get_node(child_idx)
                        .ok_or(DomainError::NodeNotFound(child_idx))?;
                    if child.parent != Some(idx) {
                        return Err(violation(child_idx, "child does not point back to its parent"));
                    }
                    if !node.data.expanded && child.data.expanded {
                        return Err(violation(child_idx, "expanded child of a collapsed node"));
                    }
                    sum = sum.saturating_add(child.data.weight);
                }
                if sum != node.data.weight {
                    return Err(violation(
                        idx,
                        format!("weight {} differs from children sum {}", node.data.weight, sum),
                    ));
                }
            } else if node.data.expanded {
                return Err(violation(idx, "leaf is expanded"));
            }

            if let Some(parent_idx) = node.parent {
                let parent = self
                    .get_node(parent_idx)
                    .ok_or(DomainError::NodeNotFound(parent_idx))?;
                let occurrences = parent.children.iter().filter(|&&c| c == idx).count();
                if occurrences != 1 {
                    return Err(violation(
                        idx,
                        format!("listed {} times by its parent", occurrences),
                    ));
                }
                if node.data.expanded && !parent.data.expanded {
                    return Err(violation(idx, "expanded below a collapsed parent"));
                }
            }
        }
        Ok(())
    }

    /// Verify that the displayed leaves below `idx` tile its rectangle with
    /// no gap and no overlap.
    #[instrument(level = "debug", skip(self))]
    pub fn check_tiling(&self, idx: Index) -> DomainResult<()> {
        let bounds = self.rect(idx).ok_or(DomainError::NodeNotFound(idx))?;
        let mut rects: Vec<Rect> = self
            .visible_rectangles(idx)
            .into_iter()
            .map(|(rect, _)| rect)
            .filter(|rect| rect.area() > 0)
            .collect();

        let mut covered: i64 = 0;
        for rect in &rects {
            if rect.overlap_area(&bounds) != rect.area() {
                return Err(violation(idx, format!("{} leaves the bounds {}", rect, bounds)));
            }
            covered += rect.area();
        }
        if covered != bounds.area() {
            return Err(violation(
                idx,
                format!("displayed area {} differs from bounds area {}", covered, bounds.area()),
            ));
        }

        rects.sort_by_key(|rect| (rect.x, rect.y));
        for (i, a) in rects.iter().enumerate() {
            let a_end = i64::from(a.x) + i64::from(a.width);
            for b in rects[i + 1..].iter().take_while(|b| i64::from(b.x) < a_end) {
                if a.overlap_area(b) > 0 {
                    return Err(violation(idx, format!("{} overlaps {}", a, b)));
                }
            }
        }
        Ok(())
    }
}
