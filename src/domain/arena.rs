use std::collections::HashSet;
use std::fmt;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::color::{ColorSource, SeededColors};
use crate::domain::entities::{NodeSource, Rect, Rgb};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::style::{FileSystemStyle, PaperStyle, PathStyle};

/// Data payload for tree nodes.
#[derive(Debug, Clone)]
pub struct NodeData {
    /// Folder, file, category or paper name; `None` for the empty node
    pub name: Option<String>,
    /// Intrinsic size for leaves, sum of children for internal nodes
    pub weight: u64,
    /// Fixed at construction
    pub color: Rgb,
    /// Last rectangle assigned by the layout engine
    pub rect: Rect,
    /// Whether children are displayed individually
    pub expanded: bool,
    /// Optional provenance, not used by layout
    pub source: Option<NodeSource>,
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} [{}]", name, self.weight),
            None => write!(f, "<empty>"),
        }
    }
}

/// Tree node in the arena-based hierarchy structure.
#[derive(Debug)]
pub struct TreeNode {
    pub data: NodeData,
    /// Index of parent node in the arena, None for root nodes
    pub parent: Option<Index>,
    /// Indices of child nodes in the arena, in layout order
    pub children: Vec<Index>,
}

impl TreeNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.data.name.is_none()
    }
}

/// Arena-based tree structure holding one treemap hierarchy.
///
/// Nodes own their children through the arena; parent links are plain
/// indices and never keep a node alive. Nodes are built bottom-up with
/// [`TreeArena::insert_node`] and the most recently built node is the root.
#[derive(Debug)]
pub struct TreeArena {
    arena: Arena<TreeNode>,
    root: Option<Index>,
    style: Box<dyn PathStyle>,
    colors: Box<dyn ColorSource>,
}

impl TreeArena {
    pub fn new(style: impl PathStyle + 'static, colors: impl ColorSource + 'static) -> Self {
        Self {
            arena: Arena::new(),
            root: None,
            style: Box::new(style),
            colors: Box::new(colors),
        }
    }

    /// Tree of files and folders with seeded colors.
    pub fn file_system(seed: Option<u64>) -> Self {
        Self::new(FileSystemStyle, SeededColors::from_seed_option(seed))
    }

    /// Tree of research papers with seeded colors.
    pub fn papers(seed: Option<u64>) -> Self {
        Self::new(PaperStyle, SeededColors::from_seed_option(seed))
    }

    /// Construct a node wrapping already-built parentless `children`.
    ///
    /// With children, `weight` is ignored and recomputed as their sum. With
    /// `name == None` the node is the empty node and must not have children.
    #[instrument(level = "trace", skip(self, children))]
    pub fn insert_node(
        &mut self,
        name: Option<&str>,
        children: Vec<Index>,
        weight: u64,
    ) -> DomainResult<Index> {
        if name.is_none() && !children.is_empty() {
            return Err(DomainError::InvalidConstruction {
                children: children.len(),
            });
        }

        let mut seen = HashSet::with_capacity(children.len());
        let mut total: u64 = 0;
        for &child_idx in &children {
            let child = self
                .arena
                .get(child_idx)
                .ok_or(DomainError::NodeNotFound(child_idx))?;
            if child.parent.is_some() {
                return Err(DomainError::AlreadyAttached(child_idx));
            }
            if child.is_empty() {
                return Err(DomainError::EmptyChild(child_idx));
            }
            if !seen.insert(child_idx) {
                return Err(DomainError::DuplicateChild(child_idx));
            }
            total = total.saturating_add(child.data.weight);
        }

        let weight = match name {
            None => 0,
            Some(_) if children.is_empty() => weight,
            Some(_) => total,
        };

        let data = NodeData {
            name: name.map(str::to_string),
            weight,
            color: self.colors.next_color(),
            rect: Rect::DEGENERATE,
            expanded: false,
            source: None,
        };
        let node_idx = self.arena.insert(TreeNode {
            data,
            parent: None,
            children,
        });

        let children = self.arena[node_idx].children.clone();
        for child_idx in children {
            if let Some(child) = self.arena.get_mut(child_idx) {
                child.parent = Some(node_idx);
            }
        }
        self.root = Some(node_idx);

        Ok(node_idx)
    }

    /// Construct a leaf with an intrinsic weight.
    pub fn insert_leaf(&mut self, name: &str, weight: u64) -> Index {
        self.insert_childless(Some(name.to_string()), weight)
    }

    /// Construct the sentinel empty node.
    pub fn insert_empty(&mut self) -> Index {
        self.insert_childless(None, 0)
    }

    // A childless node has nothing to validate.
    fn insert_childless(&mut self, name: Option<String>, weight: u64) -> Index {
        let data = NodeData {
            name,
            weight,
            color: self.colors.next_color(),
            rect: Rect::DEGENERATE,
            expanded: false,
            source: None,
        };
        let idx = self.arena.insert(TreeNode {
            data,
            parent: None,
            children: Vec::new(),
        });
        self.root = Some(idx);
        idx
    }

    /// Attach provenance information to a node.
    pub fn set_source(&mut self, idx: Index, source: NodeSource) -> bool {
        match self.arena.get_mut(idx) {
            Some(node) => {
                node.data.source = Some(source);
                true
            }
            None => false,
        }
    }

    #[instrument(level = "trace", skip(self))]
    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    /// Raw mutable access. Bypasses every invariant; after editing leaf
    /// weights call [`TreeArena::recompute_weights`].
    #[instrument(level = "trace", skip(self))]
    pub fn get_node_mut(&mut self, idx: Index) -> Option<&mut TreeNode> {
        self.arena.get_mut(idx)
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub(crate) fn set_root(&mut self, idx: Index) {
        self.root = Some(idx);
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root
            .and_then(|root| self.get_node(root))
            .map_or(true, TreeNode::is_empty)
    }

    pub fn name(&self, idx: Index) -> Option<&str> {
        self.get_node(idx).and_then(|n| n.data.name.as_deref())
    }

    pub fn weight(&self, idx: Index) -> Option<u64> {
        self.get_node(idx).map(|n| n.data.weight)
    }

    pub fn rect(&self, idx: Index) -> Option<Rect> {
        self.get_node(idx).map(|n| n.data.rect)
    }

    pub fn color(&self, idx: Index) -> Option<Rgb> {
        self.get_node(idx).map(|n| n.data.color)
    }

    pub fn is_expanded(&self, idx: Index) -> bool {
        self.get_node(idx).is_some_and(|n| n.data.expanded)
    }

    pub fn parent(&self, idx: Index) -> Option<Index> {
        self.get_node(idx).and_then(|n| n.parent)
    }

    pub fn children(&self, idx: Index) -> &[Index] {
        self.get_node(idx).map_or(&[], |n| n.children.as_slice())
    }

    /// Ancestors of `idx`, nearest first.
    pub fn ancestors(&self, idx: Index) -> Vec<Index> {
        let mut result = Vec::new();
        let mut current = self.parent(idx);
        while let Some(parent_idx) = current {
            result.push(parent_idx);
            current = self.parent(parent_idx);
        }
        result
    }

    /// Topmost ancestor of `idx`, or `idx` itself when it has no parent.
    pub fn top(&self, idx: Index) -> Index {
        self.ancestors(idx).last().copied().unwrap_or(idx)
    }

    /// Every node in the arena, including roots detached from the main tree.
    pub fn all_nodes(&self) -> impl Iterator<Item = (Index, &TreeNode)> {
        self.arena.iter()
    }

    /// Pre-order traversal from the root.
    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self, self.root)
    }

    /// Pre-order traversal of the subtree rooted at `idx`.
    pub fn iter_from(&self, idx: Index) -> TreeIterator<'_> {
        TreeIterator::new(self, Some(idx))
    }

    /// Post-order traversal of the subtree at `idx`: children before their
    /// parent.
    pub fn iter_postorder_from(&self, idx: Index) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self, Some(idx))
    }

    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        if let Some(root) = self.root {
            self.calculate_depth(root)
        } else {
            0
        }
    }

    fn calculate_depth(&self, node_idx: Index) -> usize {
        if let Some(node) = self.get_node(node_idx) {
            1 + node
                .children
                .iter()
                .map(|&child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }

    /// Names of all structural leaves, in child order.
    ///
    /// Unlike [`TreeArena::visible_rectangles`], expansion state is ignored.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_nodes(&self) -> Vec<String> {
        self.iter()
            .filter(|(_, node)| node.is_leaf())
            .filter_map(|(_, node)| node.data.name.clone())
            .collect()
    }

    /// Human-readable path from the root to `idx`.
    ///
    /// The suffix describing the node kind is appended when `is_final` is set
    /// and, below the root, whenever the node is a leaf. Returns `None` for
    /// unknown indices and for the empty node.
    pub fn path_string(&self, idx: Index, is_final: bool) -> Option<String> {
        let node = self.get_node(idx)?;
        let name = node.data.name.as_deref()?;
        let is_leaf = node.is_leaf();

        let mut path = match node.parent {
            None => name.to_string(),
            Some(parent_idx) => format!(
                "{}{}{}",
                self.path_string(parent_idx, false)?,
                self.style.separator(),
                name
            ),
        };
        if is_final || (node.parent.is_some() && is_leaf) {
            path.push_str(self.style.suffix(is_leaf));
        }
        Some(path)
    }
}

pub struct TreeIterator<'a> {
    arena: &'a TreeArena,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(arena: &'a TreeArena, start: Option<Index>) -> Self {
        let mut stack = Vec::new();
        if let Some(start) = start {
            stack.push(start);
        }
        Self { arena, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a> {
    arena: &'a TreeArena,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(arena: &'a TreeArena, start: Option<Index>) -> Self {
        let mut stack = Vec::new();
        if let Some(start) = start {
            stack.push((start, false));
        }
        Self { arena, stack }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                if !visited {
                    self.stack.push((current_idx, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current_idx, node));
                }
            }
        }
        None
    }
}
