//! Domain entities: geometry, colors and node provenance

use std::fmt;
use std::path::PathBuf;

/// Axis-aligned display rectangle in screen coordinates.
///
/// `(x, y)` is the upper-left corner; `width` and `height` are extents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    /// The all-zero rectangle assigned to empty and zero-weight nodes.
    pub const DEGENERATE: Rect = Rect {
        x: 0,
        y: 0,
        width: 0,
        height: 0,
    };

    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Area in pixels; negative extents count as zero.
    pub fn area(&self) -> i64 {
        i64::from(self.width.max(0)) * i64::from(self.height.max(0))
    }

    /// Closed containment: both the near and the far edges are inside.
    pub fn contains(&self, pos: Position) -> bool {
        let x_end = i64::from(self.x) + i64::from(self.width);
        let y_end = i64::from(self.y) + i64::from(self.height);
        i64::from(self.x) <= i64::from(pos.x)
            && i64::from(pos.x) <= x_end
            && i64::from(self.y) <= i64::from(pos.y)
            && i64::from(pos.y) <= y_end
    }

    /// Area shared with `other` (half-open pixel semantics).
    pub fn overlap_area(&self, other: &Rect) -> i64 {
        let left = i64::from(self.x.max(other.x));
        let top = i64::from(self.y.max(other.y));
        let right = (i64::from(self.x) + i64::from(self.width))
            .min(i64::from(other.x) + i64::from(other.width));
        let bottom = (i64::from(self.y) + i64::from(self.height))
            .min(i64::from(other.y) + i64::from(other.height));
        if right <= left || bottom <= top {
            0
        } else {
            (right - left) * (bottom - top)
        }
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {})",
            self.x, self.y, self.width, self.height
        )
    }
}

/// A screen position, e.g. a pointer click.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// RGB display color, one byte per channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Where a node's data came from. Informational only, never used by layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeSource {
    /// A file or directory on disk
    File { path: PathBuf },
    /// A paper from the research dataset
    Paper {
        authors: String,
        doi: String,
        year: u32,
    },
}

/// One row of the research-paper dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaperRecord {
    pub authors: String,
    pub title: String,
    pub year: u32,
    /// Category path from the most general to the most specific
    pub categories: Vec<String>,
    pub doi: String,
    pub citations: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_far_edge_when_checking_containment_then_included() {
        let rect = Rect::new(0, 0, 5, 5);
        assert!(rect.contains(Position::new(5, 5)));
        assert!(rect.contains(Position::new(0, 0)));
        assert!(!rect.contains(Position::new(6, 0)));
        assert!(!rect.contains(Position::new(0, -1)));
    }

    #[test]
    fn given_adjacent_rects_when_computing_overlap_then_zero() {
        let left = Rect::new(0, 0, 5, 10);
        let right = Rect::new(5, 0, 5, 10);
        assert_eq!(left.overlap_area(&right), 0);
        assert_eq!(left.overlap_area(&Rect::new(4, 0, 5, 10)), 10);
    }

    #[test]
    fn given_rgb_when_displayed_then_hex() {
        assert_eq!(Rgb(255, 0, 16).to_string(), "#ff0010");
    }
}
