#![forbid(unsafe_code)]

//! Layout introspection helpers.
//!
//! Renders pack results as ASCII cell maps for tests, logs, and bug
//! reports. Not used by the engine itself.

use crate::packer::Placement;

/// Render placements as an ASCII map, one line per row.
///
/// Each placed tile is drawn with a letter in placement order (`A`-`Z`,
/// then `a`-`z`, then `?`); free cells are `.`. The map is sized to the
/// used extent of the placements; an empty slice yields an empty string.
///
/// ```
/// use tilekit_layout::{CellSpan, Metrics, ScrollAxis, Size, TileGroup};
/// use tilekit_layout::debug::placement_map;
///
/// let mut group = TileGroup::new(ScrollAxis::Vertical);
/// group.push_tile(CellSpan::DoubleHorizontal);
/// group.push_tile(CellSpan::Single);
/// let report = group.recalculate_size(&Metrics::default(), Size::new(224.0, 600.0));
///
/// assert_eq!(placement_map(&report.placements), "AAB\n");
/// ```
#[must_use]
pub fn placement_map(placements: &[Placement]) -> String {
    let rows = placements.iter().map(|p| p.row + p.rows).max().unwrap_or(0);
    let cols = placements.iter().map(|p| p.col + p.cols).max().unwrap_or(0);
    let mut map = vec![vec!['.'; cols as usize]; rows as usize];

    for (index, p) in placements.iter().enumerate() {
        let ch = glyph(index);
        for r in p.row..p.row + p.rows {
            for c in p.col..p.col + p.cols {
                map[r as usize][c as usize] = ch;
            }
        }
    }

    let mut out = String::with_capacity((cols as usize + 1) * rows as usize);
    for row in map {
        out.extend(row);
        out.push('\n');
    }
    out
}

fn glyph(index: usize) -> char {
    const UPPER: u32 = 26;
    const LOWER: u32 = 26;
    let index = index as u32;
    if index < UPPER {
        char::from_u32('A' as u32 + index).unwrap_or('?')
    } else if index < UPPER + LOWER {
        char::from_u32('a' as u32 + index - UPPER).unwrap_or('?')
    } else {
        '?'
    }
}
