//! Domain layer: the treemap tree, its layout engine and tree builders
//!
//! This layer is independent of external concerns (no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod color;
mod display;
pub mod entities;
pub mod error;
mod expansion;
mod invariants;
mod layout;
mod mutation;
pub mod papers;
pub mod style;

pub use arena::{NodeData, TreeArena, TreeNode};
pub use builder::FileSystemBuilder;
pub use color::{ColorSource, FixedColor, SeededColors};
pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use papers::{load_papers_csv, PaperBuilder};
pub use style::{FileSystemStyle, PaperStyle, PathStyle};
