#![forbid(unsafe_code)]

//! Tile-board layout engine.
//!
//! This crate packs rectangular tiles of heterogeneous cell span into a
//! two-dimensional grid of fixed cell pitch:
//!
//! - [`CellSpan`] - how many grid cells a tile occupies
//! - [`AxisConstraint`] - per-axis sizing policy (Fixed, FitParent, Flexible)
//! - [`OccupancyGrid`] - transient boolean occupancy matrix
//! - [`TileGroup`] - ordered tiles plus the group size resolver
//! - [`Board`] - positions sibling groups along the scroll axis
//! - [`debug`] - ASCII introspection of pack results
//!
//! One axis of a group is fixed (explicitly or by fitting the parent);
//! the other may be flexible, in which case its extent is derived from
//! the packed content. Packing is greedy, deterministic, and total:
//! oversized content degrades (tiles are auto-shrunk or left unplaced
//! and reported) instead of erroring.
//!
//! # Example
//!
//! ```
//! use tilekit_layout::{CellSpan, Metrics, ScrollAxis, Size, TileGroup};
//!
//! let mut group = TileGroup::new(ScrollAxis::Vertical);
//! let hero = group.push_tile(CellSpan::Quad);
//! group.push_tile(CellSpan::Single);
//!
//! let metrics = Metrics::default();
//! let report = group.recalculate_size(&metrics, Size::new(300.0, 600.0));
//!
//! assert!(report.all_placed());
//! let frame = group.tile(hero).unwrap().frame();
//! assert_eq!((frame.width, frame.height), (136.0, 136.0));
//! ```

pub mod board;
pub mod debug;
pub mod group;
pub mod occupancy;
pub mod packer;
pub mod span;

pub use board::{Board, BoardLayout};
pub use group::{LayoutReport, Tile, TileGroup, TileId};
pub use occupancy::OccupancyGrid;
pub use packer::Placement;
pub use span::CellSpan;
pub use tilekit_core::geometry::{Rect, Sides, Size};
pub use tilekit_core::metrics::Metrics;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A sizing policy for one axis (rows or columns) of a group's grid.
///
/// At most one of a group's two axes may be [`Flexible`]; the flexible
/// axis's extent is measured by packing the content. See
/// [`TileGroup::recalculate_size`].
///
/// [`Flexible`]: Self::Flexible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AxisConstraint {
    /// Exactly this many cells (clamped to at least one).
    Fixed(u16),
    /// As many whole cells as fit the parent-provided extent.
    FitParent,
    /// Derived from the packed content.
    Flexible,
}

impl AxisConstraint {
    /// Whether this axis sizes itself from content.
    #[inline]
    pub const fn is_flexible(&self) -> bool {
        matches!(self, Self::Flexible)
    }

    /// Resolve to a cell count, or `None` for a flexible axis.
    pub(crate) fn resolve(self, metrics: &Metrics, available: f32) -> Option<u16> {
        match self {
            Self::Fixed(cells) => Some(cells.max(1)),
            Self::FitParent => Some(metrics.cells_that_fit(available)),
            Self::Flexible => None,
        }
    }
}

/// The direction the parent controller scrolls.
///
/// Inherited by every group on a board. Decides which axis fits the
/// parent by default and which scan order the packer uses: vertical
/// scrolling packs row-major (columns within a row), horizontal
/// scrolling packs column-major (rows within a column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ScrollAxis {
    /// Content grows downward.
    #[default]
    Vertical,
    /// Content grows to the right.
    Horizontal,
}
