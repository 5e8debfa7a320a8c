//! Tree builder for scanning a directory into a treemap hierarchy.

use std::path::{Path, PathBuf};

use generational_arena::Index;
use tracing::{debug, instrument};
use walkdir::WalkDir;

use crate::domain::arena::TreeArena;
use crate::domain::entities::NodeSource;
use crate::domain::error::{DomainError, DomainResult};

/// Constructs a file/folder tree from a path on disk.
///
/// Files are leaves weighted by their size in bytes, folders wrap their
/// entries in file-name order, and an empty folder is a leaf of weight 0.
#[derive(Debug, Clone, Default)]
pub struct FileSystemBuilder {
    follow_links: bool,
    skip_hidden: bool,
    seed: Option<u64>,
}

impl FileSystemBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Descend into symlinked directories instead of sizing the link itself.
    pub fn follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    /// Leave out entries whose name starts with a dot.
    pub fn skip_hidden(mut self, skip: bool) -> Self {
        self.skip_hidden = skip;
        self
    }

    /// Seed for node colors; entropy when `None`.
    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Build the tree rooted at `path`, which may be a file or a directory.
    #[instrument(level = "debug", skip(self))]
    pub fn build_from_path(&self, path: &Path) -> DomainResult<TreeArena> {
        if !path.exists() {
            return Err(DomainError::PathNotFound(path.to_path_buf()));
        }
        let root_path = path.canonicalize().map_err(|e| DomainError::Walk {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let mut tree = TreeArena::file_system(self.seed);
        // pending[d] collects finished nodes at depth d until their folder
        // (yielded after its contents) wraps them
        let mut pending: Vec<Vec<Index>> = Vec::new();

        let walker = WalkDir::new(&root_path)
            .follow_links(self.follow_links)
            .contents_first(true)
            .sort_by_file_name();

        for entry in walker {
            let entry = entry.map_err(|e| DomainError::Walk {
                path: e
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| root_path.clone()),
                message: e.to_string(),
            })?;
            if self.skip_hidden && is_hidden(&root_path, entry.path()) {
                continue;
            }

            let depth = entry.depth();
            if pending.len() < depth + 2 {
                pending.resize_with(depth + 2, Vec::new);
            }
            let name = node_name(entry.path());

            let idx = if entry.file_type().is_dir() {
                let children = std::mem::take(&mut pending[depth + 1]);
                if children.is_empty() {
                    tree.insert_leaf(&name, 0)
                } else {
                    tree.insert_node(Some(&name), children, 0)?
                }
            } else {
                let size = entry
                    .metadata()
                    .map_err(|e| DomainError::Walk {
                        path: entry.path().to_path_buf(),
                        message: e.to_string(),
                    })?
                    .len();
                tree.insert_leaf(&name, size)
            };
            tree.set_source(
                idx,
                NodeSource::File {
                    path: entry.path().to_path_buf(),
                },
            );
            pending[depth].push(idx);
        }

        debug!(
            "built tree for {}: {} nodes, weight {:?}",
            root_path.display(),
            tree.len(),
            tree.root().and_then(|root| tree.weight(root))
        );
        Ok(tree)
    }
}

fn node_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn is_hidden(root: &Path, path: &Path) -> bool {
    path.strip_prefix(root)
        .map(PathBuf::from)
        .unwrap_or_default()
        .components()
        .any(|c| c.as_os_str().to_string_lossy().starts_with('.'))
}
