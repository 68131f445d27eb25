#![forbid(unsafe_code)]

//! Cell spans: how many grid cells a tile occupies.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The cell footprint of a tile on the packing grid.
///
/// The named variants cover the standard tile shapes; [`Custom`] handles
/// arbitrary R×C footprints. Custom counts of zero are treated as one
/// cell ([`custom`](Self::custom) clamps at construction, and the
/// accessors guard against literals built around the constructor).
///
/// | Variant            | Rows | Cols |
/// |--------------------|------|------|
/// | `Single`           | 1    | 1    |
/// | `DoubleHorizontal` | 1    | 2    |
/// | `QuadHorizontal`   | 1    | 4    |
/// | `DoubleVertical`   | 2    | 1    |
/// | `Quad`             | 2    | 2    |
/// | `Custom`           | R    | C    |
///
/// [`Custom`]: Self::Custom
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CellSpan {
    /// One cell.
    #[default]
    Single,
    /// Two cells side by side.
    DoubleHorizontal,
    /// Four cells side by side.
    QuadHorizontal,
    /// Two cells stacked.
    DoubleVertical,
    /// A 2×2 block.
    Quad,
    /// An arbitrary block of `rows` × `cols` cells.
    Custom {
        /// Number of rows the tile occupies.
        rows: u16,
        /// Number of columns the tile occupies.
        cols: u16,
    },
}

impl CellSpan {
    /// Create a custom span, clamping zero counts to one.
    #[inline]
    #[must_use]
    pub fn custom(rows: u16, cols: u16) -> Self {
        Self::Custom {
            rows: rows.max(1),
            cols: cols.max(1),
        }
    }

    /// Number of rows this span occupies.
    #[inline]
    pub const fn rows(&self) -> u16 {
        match self {
            Self::Single | Self::DoubleHorizontal | Self::QuadHorizontal => 1,
            Self::DoubleVertical | Self::Quad => 2,
            Self::Custom { rows, .. } => {
                if *rows == 0 {
                    1
                } else {
                    *rows
                }
            }
        }
    }

    /// Number of columns this span occupies.
    #[inline]
    pub const fn cols(&self) -> u16 {
        match self {
            Self::Single | Self::DoubleVertical => 1,
            Self::DoubleHorizontal | Self::Quad => 2,
            Self::QuadHorizontal => 4,
            Self::Custom { cols, .. } => {
                if *cols == 0 {
                    1
                } else {
                    *cols
                }
            }
        }
    }

    /// Whether this span occupies exactly one cell.
    #[inline]
    pub const fn is_single(&self) -> bool {
        self.rows() == 1 && self.cols() == 1
    }

    /// Total number of cells occupied.
    #[inline]
    pub const fn cell_count(&self) -> u32 {
        self.rows() as u32 * self.cols() as u32
    }
}
