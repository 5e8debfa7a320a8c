//! Path rendering strategies per tree kind

use std::fmt::Debug;

/// Separator and suffix used when rendering a node's path string.
pub trait PathStyle: Debug + Send + Sync {
    /// Placed between the names of consecutive path segments.
    fn separator(&self) -> &str;

    /// Appended to the final segment, describing the node kind.
    fn suffix(&self, is_leaf: bool) -> &str;
}

/// Files and folders: OS path separator.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSystemStyle;

impl PathStyle for FileSystemStyle {
    fn separator(&self) -> &str {
        std::path::MAIN_SEPARATOR_STR
    }

    fn suffix(&self, is_leaf: bool) -> &str {
        if is_leaf {
            " (file)"
        } else {
            " (folder)"
        }
    }
}

/// Research papers grouped by year and category.
#[derive(Debug, Clone, Copy, Default)]
pub struct PaperStyle;

impl PathStyle for PaperStyle {
    fn separator(&self) -> &str {
        "/"
    }

    fn suffix(&self, is_leaf: bool) -> &str {
        if is_leaf {
            " (paper)"
        } else {
            " (year or category)"
        }
    }
}
