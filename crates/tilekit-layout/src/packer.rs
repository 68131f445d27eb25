#![forbid(unsafe_code)]

//! The reflow packer.
//!
//! Given a group's tiles and a transient [`OccupancyGrid`], the packer
//! assigns each tile a cell position and a pixel frame. Two strategies:
//!
//! - **Ordered**: a single forward-only cursor walks the grid in scan
//!   order and tiles are placed in input order. A tile that does not fit
//!   at the cursor advances it; when the scan space is exhausted the
//!   whole pack stops and the remaining tiles are left unplaced.
//! - **Auto-fit**: every tile independently takes the first free spot in
//!   scan order, so a later small tile may fill a gap an earlier large
//!   tile skipped over.
//!
//! The scan order follows the group's scroll axis: vertical-scroll
//! groups scan row-major (columns within a row), horizontal-scroll
//! groups scan column-major (rows within a column). In both cases the
//! major axis is the one that grows with content.
//!
//! Packing never fails. Tiles that cannot be placed keep their previous
//! frames; callers observe the condition through the placement count.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tilekit_core::{Metrics, Rect};

use crate::ScrollAxis;
use crate::group::{Tile, TileId};
use crate::occupancy::OccupancyGrid;
use crate::span::CellSpan;

/// Placement strategy for one pack pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PackStrategy {
    /// Preserve tile input order behind a forward-only cursor.
    Ordered,
    /// First-fit: each tile takes the earliest free spot in scan order.
    AutoFit,
}

/// Inputs for one pack pass, fixed for its duration.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PackParams {
    pub scroll_axis: ScrollAxis,
    pub strategy: PackStrategy,
    pub shrink_to_fit: bool,
    /// Vertical pixel offset of the grid within the group (title band).
    pub band_offset: f32,
}

/// A tile's resolved cell position after a pack pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Placement {
    /// Tile identity.
    pub id: TileId,
    /// Origin row.
    pub row: u16,
    /// Origin column.
    pub col: u16,
    /// Rows occupied (post-shrink).
    pub rows: u16,
    /// Columns occupied (post-shrink).
    pub cols: u16,
}

/// Result of one pack pass.
#[derive(Debug, Clone, Default)]
pub(crate) struct PackOutcome {
    /// Successfully placed tiles, in placement order.
    pub placements: Vec<Placement>,
    /// Tiles that were auto-shrunk to [`CellSpan::Single`] during this pass.
    pub shrunk: Vec<TileId>,
    /// One past the highest occupied row.
    pub used_rows: u16,
    /// One past the highest occupied column.
    pub used_cols: u16,
}

#[derive(Debug, Clone, Copy)]
enum FitOutcome {
    /// The full span fits at the probed cell.
    Place,
    /// The span is blocked but the origin is free and shrinking is on.
    PlaceShrunk,
    Blocked,
}

/// Fit test for one tile at one cell.
///
/// The shrink arm is the one-way degradation policy: when enabled, a
/// tile whose origin cell is free but whose full span is blocked or out
/// of bounds is accepted as a single cell. The caller mutates the span.
fn fit_at(grid: &OccupancyGrid, span: CellSpan, row: u16, col: u16, shrink: bool) -> FitOutcome {
    if grid.span_fits(row, col, span.rows(), span.cols()) {
        FitOutcome::Place
    } else if shrink && grid.is_free(row, col) {
        FitOutcome::PlaceShrunk
    } else {
        FitOutcome::Blocked
    }
}

/// (major, minor) scan counts for the grid under the given axis.
fn scan_counts(axis: ScrollAxis, grid: &OccupancyGrid) -> (u16, u16) {
    match axis {
        ScrollAxis::Vertical => (grid.rows(), grid.cols()),
        ScrollAxis::Horizontal => (grid.cols(), grid.rows()),
    }
}

/// Map a (major, minor) scan position to a (row, col) cell.
fn to_cell(axis: ScrollAxis, major: u16, minor: u16) -> (u16, u16) {
    match axis {
        ScrollAxis::Vertical => (major, minor),
        ScrollAxis::Horizontal => (minor, major),
    }
}

/// A span's (major, minor) extents under the given axis.
fn span_extents(axis: ScrollAxis, span: CellSpan) -> (u16, u16) {
    match axis {
        ScrollAxis::Vertical => (span.rows(), span.cols()),
        ScrollAxis::Horizontal => (span.cols(), span.rows()),
    }
}

/// Mark the tile's cells used and write its pixel frame.
fn place_tile(
    tile: &mut Tile,
    row: u16,
    col: u16,
    grid: &mut OccupancyGrid,
    metrics: &Metrics,
    band_offset: f32,
    outcome: &mut PackOutcome,
) {
    let rows = tile.span.rows();
    let cols = tile.span.cols();
    grid.occupy(row, col, rows, cols);
    tile.frame = Rect::new(
        metrics.cell_origin(col),
        band_offset + metrics.cell_origin(row),
        metrics.span_px(cols),
        metrics.span_px(rows),
    );
    outcome.used_rows = outcome.used_rows.max(row + rows);
    outcome.used_cols = outcome.used_cols.max(col + cols);
    outcome.placements.push(Placement {
        id: tile.id,
        row,
        col,
        rows,
        cols,
    });
}

/// Run one pack pass over `tiles`.
///
/// Places tiles into `grid`, writes pixel frames via `metrics`, and
/// reports placements, shrinks, and the used cell extents. Unplaced
/// tiles are untouched.
pub(crate) fn pack(
    tiles: &mut [Tile],
    grid: &mut OccupancyGrid,
    metrics: &Metrics,
    params: &PackParams,
) -> PackOutcome {
    #[cfg(feature = "tracing")]
    let _span = tracing::debug_span!(
        "pack",
        tiles = tiles.len(),
        rows = grid.rows(),
        cols = grid.cols(),
        strategy = ?params.strategy
    )
    .entered();

    let mut outcome = PackOutcome::default();
    let (major_count, minor_count) = scan_counts(params.scroll_axis, grid);
    if major_count == 0 || minor_count == 0 {
        return outcome;
    }
    match params.strategy {
        PackStrategy::Ordered => pack_ordered(tiles, grid, metrics, params, &mut outcome),
        PackStrategy::AutoFit => pack_auto_fit(tiles, grid, metrics, params, &mut outcome),
    }

    #[cfg(feature = "tracing")]
    if outcome.placements.len() < tiles.len() {
        tracing::debug!(
            placed = outcome.placements.len(),
            total = tiles.len(),
            "pack stopped early; remaining tiles keep stale frames"
        );
    }

    outcome
}

fn pack_ordered(
    tiles: &mut [Tile],
    grid: &mut OccupancyGrid,
    metrics: &Metrics,
    params: &PackParams,
    outcome: &mut PackOutcome,
) {
    let (major_count, minor_count) = scan_counts(params.scroll_axis, grid);
    let mut major: u16 = 0;
    let mut minor: u16 = 0;

    'tiles: for tile in tiles.iter_mut() {
        loop {
            if major >= major_count {
                // Scan space exhausted: this tile and everything after it
                // stay unplaced until a reflow with a larger estimate.
                break 'tiles;
            }
            let (row, col) = to_cell(params.scroll_axis, major, minor);
            match fit_at(grid, tile.span, row, col, params.shrink_to_fit) {
                FitOutcome::Place => {}
                FitOutcome::PlaceShrunk => {
                    tile.span = CellSpan::Single;
                    outcome.shrunk.push(tile.id);
                }
                FitOutcome::Blocked => {
                    minor += 1;
                    if minor >= minor_count {
                        minor = 0;
                        major += 1;
                    }
                    continue;
                }
            }
            place_tile(tile, row, col, grid, metrics, params.band_offset, outcome);
            // Advance the cursor just past the placed span.
            let (_, span_minor) = span_extents(params.scroll_axis, tile.span);
            minor += span_minor;
            if minor >= minor_count {
                minor = 0;
                major += 1;
            }
            continue 'tiles;
        }
    }
}

fn pack_auto_fit(
    tiles: &mut [Tile],
    grid: &mut OccupancyGrid,
    metrics: &Metrics,
    params: &PackParams,
    outcome: &mut PackOutcome,
) {
    for tile in tiles.iter_mut() {
        let Some((row, col, shrunk)) = first_fit(grid, tile.span, params) else {
            // No cell anywhere fits this tile: stop the pass and report
            // the extent accumulated so far.
            return;
        };
        if shrunk {
            tile.span = CellSpan::Single;
            outcome.shrunk.push(tile.id);
        }
        place_tile(tile, row, col, grid, metrics, params.band_offset, outcome);
    }
}

/// Scan the whole grid from the origin for the first spot this span
/// fits, returning `(row, col, needs_shrink)`.
fn first_fit(grid: &OccupancyGrid, span: CellSpan, params: &PackParams) -> Option<(u16, u16, bool)> {
    let (major_count, minor_count) = scan_counts(params.scroll_axis, grid);
    for major in 0..major_count {
        for minor in 0..minor_count {
            let (row, col) = to_cell(params.scroll_axis, major, minor);
            match fit_at(grid, span, row, col, params.shrink_to_fit) {
                FitOutcome::Place => return Some((row, col, false)),
                FitOutcome::PlaceShrunk => return Some((row, col, true)),
                FitOutcome::Blocked => {}
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiles(spans: &[CellSpan]) -> Vec<Tile> {
        spans
            .iter()
            .enumerate()
            .map(|(i, &span)| Tile::new(TileId::new(i as u64 + 1), span))
            .collect()
    }

    fn params(axis: ScrollAxis, strategy: PackStrategy, shrink: bool) -> PackParams {
        PackParams {
            scroll_axis: axis,
            strategy,
            shrink_to_fit: shrink,
            band_offset: 0.0,
        }
    }

    fn cells(outcome: &PackOutcome) -> Vec<(u16, u16, u16, u16)> {
        outcome
            .placements
            .iter()
            .map(|p| (p.row, p.col, p.rows, p.cols))
            .collect()
    }

    #[test]
    fn ordered_row_major_mixed_spans() {
        let mut ts = tiles(&[
            CellSpan::Single,
            CellSpan::DoubleHorizontal,
            CellSpan::Single,
            CellSpan::Quad,
        ]);
        let mut grid = OccupancyGrid::new(8, 4);
        let metrics = Metrics::default();
        let outcome = pack(
            &mut ts,
            &mut grid,
            &metrics,
            &params(ScrollAxis::Vertical, PackStrategy::Ordered, false),
        );

        // The Quad does not fit in the remaining row-0 space and wraps to
        // the start of the next row.
        assert_eq!(
            cells(&outcome),
            vec![(0, 0, 1, 1), (0, 1, 1, 2), (0, 3, 1, 1), (1, 0, 2, 2)]
        );
        assert_eq!(outcome.used_rows, 3);
        assert_eq!(outcome.used_cols, 4);
    }

    #[test]
    fn ordered_pixel_frames() {
        let mut ts = tiles(&[CellSpan::Single, CellSpan::DoubleHorizontal]);
        let mut grid = OccupancyGrid::new(4, 4);
        let metrics = Metrics::default();
        pack(
            &mut ts,
            &mut grid,
            &metrics,
            &params(ScrollAxis::Vertical, PackStrategy::Ordered, false),
        );

        assert_eq!(ts[0].frame(), Rect::new(8.0, 8.0, 64.0, 64.0));
        assert_eq!(ts[1].frame(), Rect::new(80.0, 8.0, 136.0, 64.0));
    }

    #[test]
    fn ordered_band_offset_shifts_y_only() {
        let mut ts = tiles(&[CellSpan::Single]);
        let mut grid = OccupancyGrid::new(4, 4);
        let metrics = Metrics::default();
        let mut p = params(ScrollAxis::Vertical, PackStrategy::Ordered, false);
        p.band_offset = 20.0;
        pack(&mut ts, &mut grid, &metrics, &p);

        assert_eq!(ts[0].frame(), Rect::new(8.0, 28.0, 64.0, 64.0));
    }

    #[test]
    fn ordered_stops_when_scan_space_exhausted() {
        let mut ts = tiles(&[CellSpan::Single, CellSpan::Single, CellSpan::Single]);
        let mut grid = OccupancyGrid::new(1, 2);
        let metrics = Metrics::default();
        let outcome = pack(
            &mut ts,
            &mut grid,
            &metrics,
            &params(ScrollAxis::Vertical, PackStrategy::Ordered, false),
        );

        assert_eq!(cells(&outcome), vec![(0, 0, 1, 1), (0, 1, 1, 1)]);
        // Third tile never got a frame.
        assert_eq!(ts[2].frame(), Rect::default());
    }

    #[test]
    fn ordered_shrinks_oversized_tile_at_free_origin() {
        let mut ts = tiles(&[
            CellSpan::Single,
            CellSpan::DoubleHorizontal,
            CellSpan::Single,
        ]);
        let mut grid = OccupancyGrid::new(16, 1);
        let metrics = Metrics::default();
        let outcome = pack(
            &mut ts,
            &mut grid,
            &metrics,
            &params(ScrollAxis::Vertical, PackStrategy::Ordered, true),
        );

        assert_eq!(
            cells(&outcome),
            vec![(0, 0, 1, 1), (1, 0, 1, 1), (2, 0, 1, 1)]
        );
        assert_eq!(outcome.shrunk, vec![ts[1].id()]);
        // The shrink is a real mutation, not a transient placement trick.
        assert_eq!(ts[1].span(), CellSpan::Single);
    }

    #[test]
    fn ordered_without_shrink_leaves_oversized_tile_unplaced() {
        let mut ts = tiles(&[
            CellSpan::Single,
            CellSpan::DoubleHorizontal,
            CellSpan::Single,
        ]);
        let mut grid = OccupancyGrid::new(16, 1);
        let metrics = Metrics::default();
        let outcome = pack(
            &mut ts,
            &mut grid,
            &metrics,
            &params(ScrollAxis::Vertical, PackStrategy::Ordered, false),
        );

        // The cursor exhausts the scan space hunting for a fit, so the
        // trailing Single is stranded too.
        assert_eq!(cells(&outcome), vec![(0, 0, 1, 1)]);
        assert!(outcome.shrunk.is_empty());
        assert_eq!(ts[1].span(), CellSpan::DoubleHorizontal);
    }

    #[test]
    fn auto_fit_fills_gap_left_by_larger_tile() {
        let mut ts = tiles(&[
            CellSpan::DoubleHorizontal,
            CellSpan::Quad,
            CellSpan::Single,
            CellSpan::Single,
        ]);
        let mut grid = OccupancyGrid::new(8, 3);
        let metrics = Metrics::default();
        let outcome = pack(
            &mut ts,
            &mut grid,
            &metrics,
            &params(ScrollAxis::Vertical, PackStrategy::AutoFit, false),
        );

        // The Quad cannot use (0,2); the first Single back-fills it.
        assert_eq!(
            cells(&outcome),
            vec![(0, 0, 1, 2), (1, 0, 2, 2), (0, 2, 1, 1), (1, 2, 1, 1)]
        );
    }

    #[test]
    fn auto_fit_stops_on_unfittable_tile() {
        let mut ts = tiles(&[CellSpan::custom(1, 5), CellSpan::Single]);
        let mut grid = OccupancyGrid::new(8, 4);
        let metrics = Metrics::default();
        let outcome = pack(
            &mut ts,
            &mut grid,
            &metrics,
            &params(ScrollAxis::Vertical, PackStrategy::AutoFit, false),
        );

        // Five columns never fit in four; the pass stops before the Single.
        assert!(outcome.placements.is_empty());
    }

    #[test]
    fn auto_fit_shrinks_at_first_free_origin() {
        let mut ts = tiles(&[CellSpan::DoubleHorizontal, CellSpan::Quad]);
        let mut grid = OccupancyGrid::new(8, 2);
        let metrics = Metrics::default();
        let outcome = pack(
            &mut ts,
            &mut grid,
            &metrics,
            &params(ScrollAxis::Vertical, PackStrategy::AutoFit, true),
        );

        // Row 0 is taken by the DoubleHorizontal. The Quad's first probe
        // with a free origin is (1,0), where the full 2x2 fits, so no
        // shrink happens here.
        assert_eq!(cells(&outcome), vec![(0, 0, 1, 2), (1, 0, 2, 2)]);
        assert!(outcome.shrunk.is_empty());
    }

    #[test]
    fn auto_fit_shrink_is_eager() {
        // One free cell at (0,1); the Quad shrinks into it even though a
        // full 2x2 block exists further along the scan.
        let mut ts = tiles(&[CellSpan::Quad]);
        let mut grid = OccupancyGrid::new(8, 4);
        grid.occupy(0, 0, 1, 1);
        grid.occupy(1, 1, 1, 3);
        let metrics = Metrics::default();
        let outcome = pack(
            &mut ts,
            &mut grid,
            &metrics,
            &params(ScrollAxis::Vertical, PackStrategy::AutoFit, true),
        );

        assert_eq!(cells(&outcome), vec![(0, 1, 1, 1)]);
        assert_eq!(outcome.shrunk, vec![ts[0].id()]);
    }

    #[test]
    fn column_major_scan_for_horizontal_scroll() {
        let mut ts = tiles(&[CellSpan::Single, CellSpan::DoubleVertical, CellSpan::Single]);
        let mut grid = OccupancyGrid::new(2, 8);
        let metrics = Metrics::default();
        let outcome = pack(
            &mut ts,
            &mut grid,
            &metrics,
            &params(ScrollAxis::Horizontal, PackStrategy::Ordered, false),
        );

        // The DoubleVertical cannot start at row 1, so it moves to the
        // next column; the cursor then skips past its two rows.
        assert_eq!(
            cells(&outcome),
            vec![(0, 0, 1, 1), (0, 1, 2, 1), (0, 2, 1, 1)]
        );
        assert_eq!(outcome.used_cols, 3);
        assert_eq!(outcome.used_rows, 2);
    }

    #[test]
    fn no_overlap_between_placements() {
        let mut ts = tiles(&[
            CellSpan::Quad,
            CellSpan::DoubleVertical,
            CellSpan::QuadHorizontal,
            CellSpan::Single,
            CellSpan::DoubleHorizontal,
        ]);
        let mut grid = OccupancyGrid::new(16, 4);
        let metrics = Metrics::default();
        let outcome = pack(
            &mut ts,
            &mut grid,
            &metrics,
            &params(ScrollAxis::Vertical, PackStrategy::Ordered, false),
        );

        let mut seen = std::collections::HashSet::new();
        for p in &outcome.placements {
            for r in p.row..p.row + p.rows {
                for c in p.col..p.col + p.cols {
                    assert!(seen.insert((r, c)), "cell ({r},{c}) occupied twice");
                }
            }
        }
        assert_eq!(seen.len(), grid.occupied_count());
    }

    #[test]
    fn empty_grid_places_nothing() {
        let mut ts = tiles(&[CellSpan::Single]);
        let mut grid = OccupancyGrid::new(0, 4);
        let metrics = Metrics::default();
        let outcome = pack(
            &mut ts,
            &mut grid,
            &metrics,
            &params(ScrollAxis::Vertical, PackStrategy::Ordered, false),
        );
        assert!(outcome.placements.is_empty());
    }
}
