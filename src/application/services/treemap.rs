//! Treemap service: load a tree from a configured source, lay it out and
//! answer report queries.

use std::fmt;
use std::path::PathBuf;

use generational_arena::Index;
use termtree::Tree;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult};
use crate::config::Settings;
use crate::domain::{
    DomainError, FileSystemBuilder, PaperBuilder, Position, Rect, Rgb, TreeArena,
};

/// Where a tree comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeSource {
    /// A file or directory on disk
    FileSystem(PathBuf),
    /// The paper dataset; unset fields fall back to the settings
    Papers {
        csv: Option<PathBuf>,
        by_year: Option<bool>,
    },
}

/// One displayed leaf of a laid-out tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutEntry {
    pub path: String,
    pub rect: Rect,
    pub color: Rgb,
}

/// Shape of a loaded tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeSummary {
    pub nodes: usize,
    pub leaves: usize,
    pub depth: usize,
    pub weight: u64,
}

impl fmt::Display for TreeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} nodes, {} leaves, depth {}, total weight {}",
            self.nodes, self.leaves, self.depth, self.weight
        )
    }
}

/// Service for building and querying treemaps.
#[derive(Debug, Clone)]
pub struct TreemapService {
    settings: Settings,
}

impl TreemapService {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The rectangle a whole tree is laid out into.
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.settings.width, self.settings.height)
    }

    /// Build the tree for `source`.
    ///
    /// Fails with [`ApplicationError::EmptyTree`] when the tree has no
    /// weight, since nothing of it would be displayed.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, source: &TreeSource) -> ApplicationResult<TreeArena> {
        let (tree, origin) = match source {
            TreeSource::FileSystem(path) => {
                let tree = FileSystemBuilder::new()
                    .follow_links(self.settings.filesystem.follow_links)
                    .skip_hidden(self.settings.filesystem.skip_hidden)
                    .seed(self.settings.seed)
                    .build_from_path(path)?;
                (tree, path.clone())
            }
            TreeSource::Papers { csv, by_year } => {
                let path = csv
                    .clone()
                    .unwrap_or_else(|| self.settings.papers.data_file.clone());
                let by_year = by_year.unwrap_or(self.settings.papers.by_year);
                let tree = PaperBuilder::new().seed(self.settings.seed).build_from_csv(
                    &path,
                    &self.settings.papers.root_name,
                    by_year,
                )?;
                (tree, path)
            }
        };

        let weight = tree.root().and_then(|root| tree.weight(root)).unwrap_or(0);
        if weight == 0 {
            return Err(ApplicationError::EmptyTree(origin));
        }
        debug!("loaded {} nodes, total weight {}", tree.len(), weight);
        Ok(tree)
    }

    /// Lay the whole tree out into [`TreemapService::bounds`] and return
    /// its root. With `expand_all` every internal node is expanded first.
    #[instrument(level = "debug", skip(self, tree))]
    pub fn layout(&self, tree: &mut TreeArena, expand_all: bool) -> ApplicationResult<Index> {
        let root = root_of(tree)?;
        if expand_all {
            tree.expand_all(root);
        }
        tree.layout(root, self.bounds());
        Ok(root)
    }

    /// Path, rectangle and color of every displayed leaf, in layout order.
    pub fn layout_report(&self, tree: &TreeArena) -> ApplicationResult<Vec<LayoutEntry>> {
        let root = root_of(tree)?;
        tree.displayed_leaves(root)
            .into_iter()
            .map(|idx| {
                let node = tree.get_node(idx).ok_or(DomainError::NodeNotFound(idx))?;
                let path = tree
                    .path_string(idx, true)
                    .ok_or(DomainError::NodeNotFound(idx))?;
                Ok(LayoutEntry {
                    path,
                    rect: node.data.rect,
                    color: node.data.color,
                })
            })
            .collect()
    }

    /// Path string of the displayed leaf at (`x`, `y`).
    #[instrument(level = "debug", skip(self, tree))]
    pub fn hit(&self, tree: &TreeArena, x: i32, y: i32) -> ApplicationResult<String> {
        let root = root_of(tree)?;
        let idx = tree
            .node_at(root, Position::new(x, y))
            .ok_or(ApplicationError::NoNodeAt { x, y })?;
        let path = tree
            .path_string(idx, true)
            .ok_or(DomainError::NodeNotFound(idx))?;
        debug!("hit ({}, {}): {}", x, y, path);
        Ok(path)
    }

    /// Hierarchy with weights and expansion markers.
    pub fn tree_report(&self, tree: &TreeArena) -> ApplicationResult<Tree<String>> {
        Ok(tree.to_tree_string(root_of(tree)?))
    }

    /// Node, leaf and depth counts plus the total weight.
    pub fn summary(&self, tree: &TreeArena) -> ApplicationResult<TreeSummary> {
        let root = root_of(tree)?;
        Ok(TreeSummary {
            nodes: tree.len(),
            leaves: tree.leaf_nodes().len(),
            depth: tree.depth(),
            weight: tree.weight(root).unwrap_or(0),
        })
    }

    /// Validate the structural invariants and the tiling of the last layout.
    pub fn check(&self, tree: &TreeArena) -> ApplicationResult<()> {
        tree.check_invariants()?;
        tree.check_tiling(root_of(tree)?)?;
        Ok(())
    }
}

fn root_of(tree: &TreeArena) -> ApplicationResult<Index> {
    tree.root()
        .ok_or_else(|| ApplicationError::EmptyTree(PathBuf::new()))
}
