#![forbid(unsafe_code)]

//! Tile groups and the group size resolver.
//!
//! A [`TileGroup`] owns an ordered collection of [`Tile`]s and the
//! per-axis sizing policy for the grid they pack into.
//! [`recalculate_size`] is the single reflow entry point: it resolves
//! the fixed axis from the constraints, runs exactly one packer pass
//! (which simultaneously measures any flexible axis and assigns the
//! final tile frames), and reports the resulting bounding box.
//!
//! Tile frames persist between reflows. When a pack stops early, the
//! tiles it could not place simply keep their previous frames; the
//! [`LayoutReport`] carries the unplaced count so hosts can react.
//!
//! [`recalculate_size`]: TileGroup::recalculate_size

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tilekit_core::{Metrics, Rect, Size};

use crate::occupancy::OccupancyGrid;
use crate::packer::{self, PackParams, PackStrategy, Placement};
use crate::span::CellSpan;
use crate::{AxisConstraint, ScrollAxis};

/// Stable identity of a tile within its group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TileId(u64);

impl TileId {
    pub(crate) const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// One item on the board.
///
/// The frame is owned exclusively by the containing group and written
/// only by the packer, in group-local pixels. It survives reflows: a
/// tile the packer could not place keeps its last assigned frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    pub(crate) id: TileId,
    pub(crate) span: CellSpan,
    pub(crate) frame: Rect,
}

impl Tile {
    pub(crate) fn new(id: TileId, span: CellSpan) -> Self {
        Self {
            id,
            span,
            frame: Rect::default(),
        }
    }

    /// Tile identity.
    #[inline]
    pub const fn id(&self) -> TileId {
        self.id
    }

    /// Current cell span. May differ from the requested span if the
    /// packer auto-shrunk the tile.
    #[inline]
    pub const fn span(&self) -> CellSpan {
        self.span
    }

    /// Group-local pixel frame from the last reflow that placed this tile.
    #[inline]
    pub const fn frame(&self) -> Rect {
        self.frame
    }
}

/// Result of one [`TileGroup::recalculate_size`] call.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LayoutReport {
    /// Final group bounding box, including title/footer bands.
    pub size: Size,
    /// Tiles placed by this reflow.
    pub placed: usize,
    /// Tiles the packer could not place; they keep their previous frames.
    pub unplaced: usize,
    /// Tiles irreversibly shrunk to a single cell during this reflow.
    pub shrunk: Vec<TileId>,
    /// Cell positions of the placed tiles, in placement order.
    pub placements: Vec<Placement>,
}

impl LayoutReport {
    /// Whether every tile in the group was placed.
    #[inline]
    pub fn all_placed(&self) -> bool {
        self.unplaced == 0
    }
}

/// An ordered collection of tiles packed into one grid.
#[derive(Debug, Clone)]
pub struct TileGroup {
    scroll_axis: ScrollAxis,
    tiles: Vec<Tile>,
    next_id: u64,
    column_constraint: AxisConstraint,
    row_constraint: AxisConstraint,
    shrink_tiles_to_fit: bool,
    auto_fit_tiles: bool,
    title_band: f32,
    footer_band: f32,
    frame: Rect,
    needs_reflow: bool,
}

impl TileGroup {
    /// Create an empty group for the given scroll axis.
    ///
    /// The scroll axis picks the default constraints: a vertical-scroll
    /// group fits its width to the parent and grows its height from
    /// content; a horizontal-scroll group is the transpose.
    #[must_use]
    pub fn new(scroll_axis: ScrollAxis) -> Self {
        let (column_constraint, row_constraint) = match scroll_axis {
            ScrollAxis::Vertical => (AxisConstraint::FitParent, AxisConstraint::Flexible),
            ScrollAxis::Horizontal => (AxisConstraint::Flexible, AxisConstraint::FitParent),
        };
        Self {
            scroll_axis,
            tiles: Vec::new(),
            next_id: 1,
            column_constraint,
            row_constraint,
            shrink_tiles_to_fit: false,
            auto_fit_tiles: false,
            title_band: 0.0,
            footer_band: 0.0,
            frame: Rect::default(),
            needs_reflow: true,
        }
    }

    /// Set the column (width) constraint.
    #[must_use]
    pub fn column_constraint(mut self, constraint: AxisConstraint) -> Self {
        self.column_constraint = constraint;
        self
    }

    /// Set the row (height) constraint.
    #[must_use]
    pub fn row_constraint(mut self, constraint: AxisConstraint) -> Self {
        self.row_constraint = constraint;
        self
    }

    /// Enable first-fit packing: tiles take the earliest free spot
    /// regardless of input order.
    #[must_use]
    pub fn auto_fit_tiles(mut self, auto_fit: bool) -> Self {
        self.auto_fit_tiles = auto_fit;
        self
    }

    /// Enable auto-shrink: a tile whose span cannot be honored is
    /// irreversibly reduced to a single cell instead of skipped.
    #[must_use]
    pub fn shrink_tiles_to_fit(mut self, shrink: bool) -> Self {
        self.shrink_tiles_to_fit = shrink;
        self
    }

    /// Set the title band height reserved above the grid.
    #[must_use]
    pub fn title_band(mut self, height: f32) -> Self {
        self.title_band = height.max(0.0);
        self
    }

    /// Set the footer band height reserved below the grid.
    #[must_use]
    pub fn footer_band(mut self, height: f32) -> Self {
        self.footer_band = height.max(0.0);
        self
    }

    /// The group's scroll axis.
    #[inline]
    pub const fn scroll_axis(&self) -> ScrollAxis {
        self.scroll_axis
    }

    /// The group's frame among its siblings, assigned by the board.
    #[inline]
    pub const fn frame(&self) -> Rect {
        self.frame
    }

    /// The tiles, in input order.
    #[inline]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Look up a tile by id.
    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.id == id)
    }

    /// Number of tiles.
    #[inline]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether the group has no tiles.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Whether a layout-affecting change happened since the last reflow.
    #[inline]
    pub const fn needs_reflow(&self) -> bool {
        self.needs_reflow
    }

    /// Mark the group dirty. The narrow entry point for external change
    /// notifications (content mutations, live updates); callers are
    /// responsible for coalescing rapid successive triggers.
    pub fn request_reflow(&mut self) {
        self.needs_reflow = true;
    }

    /// Append a tile, returning its identity.
    pub fn push_tile(&mut self, span: CellSpan) -> TileId {
        let id = TileId::new(self.next_id);
        self.next_id += 1;
        self.tiles.push(Tile::new(id, span));
        self.needs_reflow = true;
        id
    }

    /// Remove a tile by id. Returns whether it existed.
    pub fn remove_tile(&mut self, id: TileId) -> bool {
        let before = self.tiles.len();
        self.tiles.retain(|t| t.id != id);
        let removed = self.tiles.len() != before;
        if removed {
            self.needs_reflow = true;
        }
        removed
    }

    /// Change a tile's span. Returns whether the tile existed.
    pub fn set_tile_span(&mut self, id: TileId, span: CellSpan) -> bool {
        match self.tiles.iter_mut().find(|t| t.id == id) {
            Some(tile) => {
                tile.span = span;
                self.needs_reflow = true;
                true
            }
            None => false,
        }
    }

    /// Change the column constraint at runtime.
    pub fn set_column_constraint(&mut self, constraint: AxisConstraint) {
        self.column_constraint = constraint;
        self.needs_reflow = true;
    }

    /// Change the row constraint at runtime.
    pub fn set_row_constraint(&mut self, constraint: AxisConstraint) {
        self.row_constraint = constraint;
        self.needs_reflow = true;
    }

    /// Change the packing strategy at runtime.
    pub fn set_auto_fit_tiles(&mut self, auto_fit: bool) {
        self.auto_fit_tiles = auto_fit;
        self.needs_reflow = true;
    }

    /// Change the shrink policy at runtime.
    pub fn set_shrink_tiles_to_fit(&mut self, shrink: bool) {
        self.shrink_tiles_to_fit = shrink;
        self.needs_reflow = true;
    }

    /// Change the title band height (externally measured).
    pub fn set_title_band(&mut self, height: f32) {
        self.title_band = height.max(0.0);
        self.needs_reflow = true;
    }

    /// Change the footer band height (externally measured).
    pub fn set_footer_band(&mut self, height: f32) {
        self.footer_band = height.max(0.0);
        self.needs_reflow = true;
    }

    pub(crate) fn set_scroll_axis(&mut self, axis: ScrollAxis) {
        if self.scroll_axis != axis {
            self.scroll_axis = axis;
            self.needs_reflow = true;
        }
    }

    pub(crate) fn set_frame(&mut self, frame: Rect) {
        self.frame = frame;
    }

    /// Constraints with the at-most-one-flexible invariant applied: when
    /// both axes are flexible the scroll axis falls back to its
    /// FitParent default and the cross axis keeps sizing from content.
    fn effective_constraints(&self) -> (AxisConstraint, AxisConstraint) {
        let mut col = self.column_constraint;
        let mut row = self.row_constraint;
        if col.is_flexible() && row.is_flexible() {
            match self.scroll_axis {
                ScrollAxis::Vertical => col = AxisConstraint::FitParent,
                ScrollAxis::Horizontal => row = AxisConstraint::FitParent,
            }
        }
        (col, row)
    }

    /// One full reflow: resolve the group's size and every tile's frame.
    ///
    /// `available` is the parent-provided space for any FitParent axis.
    /// The grid is rebuilt from scratch, one packer pass runs (it both
    /// measures any flexible axis and performs the real placement), and
    /// the dirty flag clears. Calling this again with no intervening
    /// change yields identical frames and extent.
    ///
    /// Never fails: degenerate input clamps to the minimum extent of one
    /// cell plus two gaps, and overflow is reported, not raised.
    pub fn recalculate_size(&mut self, metrics: &Metrics, available: Size) -> LayoutReport {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "recalculate_size",
            tiles = self.tiles.len(),
            auto_fit = self.auto_fit_tiles,
            shrink = self.shrink_tiles_to_fit
        )
        .entered();

        let (col_con, row_con) = self.effective_constraints();
        let band_sum = self.title_band + self.footer_band;
        let grid_avail_height = (available.height - band_sum).max(0.0);

        let cols = col_con.resolve(metrics, available.width);
        let rows = row_con.resolve(metrics, grid_avail_height);

        // The flexible dimension is over-provisioned so the packer's
        // bounded scan always terminates without growing the grid.
        let grid_rows =
            rows.unwrap_or_else(|| OccupancyGrid::estimate_minor(self.tiles.len(), cols.unwrap_or(1)));
        let grid_cols =
            cols.unwrap_or_else(|| OccupancyGrid::estimate_minor(self.tiles.len(), rows.unwrap_or(1)));

        let mut grid = OccupancyGrid::new(grid_rows, grid_cols);
        let params = PackParams {
            scroll_axis: self.scroll_axis,
            strategy: if self.auto_fit_tiles {
                PackStrategy::AutoFit
            } else {
                PackStrategy::Ordered
            },
            shrink_to_fit: self.shrink_tiles_to_fit,
            band_offset: self.title_band,
        };
        // This single pass both measures the flexible axis and performs
        // the real placement; clear the dirty flag so nothing re-packs.
        let outcome = packer::pack(&mut self.tiles, &mut grid, metrics, &params);
        self.needs_reflow = false;

        let width = match col_con {
            AxisConstraint::Fixed(n) => metrics.extent_px(n.max(1)),
            AxisConstraint::FitParent => available.width.max(metrics.min_extent()),
            AxisConstraint::Flexible => {
                metrics.extent_px(outcome.used_cols).max(metrics.min_extent())
            }
        };
        let grid_height = match row_con {
            AxisConstraint::Fixed(n) => metrics.extent_px(n.max(1)),
            AxisConstraint::FitParent => grid_avail_height.max(metrics.min_extent()),
            AxisConstraint::Flexible => {
                metrics.extent_px(outcome.used_rows).max(metrics.min_extent())
            }
        };

        let placed = outcome.placements.len();
        LayoutReport {
            size: Size::new(width, self.title_band + grid_height + self.footer_band),
            placed,
            unplaced: self.tiles.len() - placed,
            shrunk: outcome.shrunk,
            placements: outcome.placements,
        }
    }
}
