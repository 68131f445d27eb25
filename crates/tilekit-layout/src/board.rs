#![forbid(unsafe_code)]

//! The board controller: positions sibling groups along the scroll axis.
//!
//! Groups are laid out sequentially and dependency-ordered — each
//! group's position is the cumulative extent of the groups before it,
//! separated by the metrics' group gap. The whole pass is synchronous
//! and runs to completion; external change sources (timers, content
//! updates) only mark groups dirty through [`request_reflow`] and then
//! ask for a fresh [`layout`].
//!
//! [`request_reflow`]: Board::request_reflow
//! [`layout`]: Board::layout

use tilekit_core::{Metrics, Rect, Size};

use crate::ScrollAxis;
use crate::group::{LayoutReport, TileGroup};

/// A scrollable collection of tile groups.
#[derive(Debug, Clone)]
pub struct Board {
    scroll_axis: ScrollAxis,
    metrics: Metrics,
    groups: Vec<TileGroup>,
}

/// Result of one [`Board::layout`] pass.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardLayout {
    /// Total scrollable extent of the content.
    pub content_size: Size,
    /// Per-group reports, in group order.
    pub reports: Vec<LayoutReport>,
}

impl BoardLayout {
    /// Total count of tiles that could not be placed, across all groups.
    pub fn unplaced_total(&self) -> usize {
        self.reports.iter().map(|r| r.unplaced).sum()
    }

    /// Total count of tiles auto-shrunk in this pass, across all groups.
    pub fn shrunk_total(&self) -> usize {
        self.reports.iter().map(|r| r.shrunk.len()).sum()
    }
}

impl Board {
    /// Create an empty board with default metrics.
    #[must_use]
    pub fn new(scroll_axis: ScrollAxis) -> Self {
        Self::with_metrics(scroll_axis, Metrics::default())
    }

    /// Create an empty board with explicit metrics.
    #[must_use]
    pub fn with_metrics(scroll_axis: ScrollAxis, metrics: Metrics) -> Self {
        Self {
            scroll_axis,
            metrics,
            groups: Vec::new(),
        }
    }

    /// The board's scroll axis.
    #[inline]
    pub const fn scroll_axis(&self) -> ScrollAxis {
        self.scroll_axis
    }

    /// The board's metrics.
    #[inline]
    pub const fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Add a group, aligning its scroll axis with the board's.
    ///
    /// Returns the group's index. Axis alignment does not rewrite the
    /// group's constraints; a group configured for the other axis keeps
    /// whatever constraints it was built with.
    pub fn push_group(&mut self, mut group: TileGroup) -> usize {
        group.set_scroll_axis(self.scroll_axis);
        self.groups.push(group);
        self.groups.len() - 1
    }

    /// The groups, in layout order.
    #[inline]
    pub fn groups(&self) -> &[TileGroup] {
        &self.groups
    }

    /// Get a group by index.
    pub fn group(&self, index: usize) -> Option<&TileGroup> {
        self.groups.get(index)
    }

    /// Get a group mutably by index. Callers mutating layout-affecting
    /// state should also call [`request_reflow`](Self::request_reflow)
    /// (the group's own mutators do it automatically).
    pub fn group_mut(&mut self, index: usize) -> Option<&mut TileGroup> {
        self.groups.get_mut(index)
    }

    /// Number of groups.
    #[inline]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether the board has no groups.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Mark one group dirty. Returns whether the index was valid.
    pub fn request_reflow(&mut self, index: usize) -> bool {
        match self.groups.get_mut(index) {
            Some(group) => {
                group.request_reflow();
                true
            }
            None => false,
        }
    }

    /// Whether any group has pending layout-affecting changes.
    pub fn any_needs_reflow(&self) -> bool {
        self.groups.iter().any(TileGroup::needs_reflow)
    }

    /// Recompute every group's size and position and the total
    /// scrollable extent.
    ///
    /// Groups are resolved in order; each one is framed at the running
    /// offset along the scroll axis, separated by the group gap.
    pub fn layout(&mut self, viewport: Size) -> BoardLayout {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "board_layout",
            groups = self.groups.len(),
            viewport_w = viewport.width,
            viewport_h = viewport.height
        )
        .entered();

        let mut offset: f32 = 0.0;
        let mut cross: f32 = 0.0;
        let mut reports = Vec::with_capacity(self.groups.len());

        for group in &mut self.groups {
            let report = group.recalculate_size(&self.metrics, viewport);
            let frame = match self.scroll_axis {
                ScrollAxis::Vertical => {
                    Rect::new(0.0, offset, report.size.width, report.size.height)
                }
                ScrollAxis::Horizontal => {
                    Rect::new(offset, 0.0, report.size.width, report.size.height)
                }
            };
            group.set_frame(frame);
            match self.scroll_axis {
                ScrollAxis::Vertical => {
                    offset += report.size.height + self.metrics.group_gap;
                    cross = cross.max(report.size.width);
                }
                ScrollAxis::Horizontal => {
                    offset += report.size.width + self.metrics.group_gap;
                    cross = cross.max(report.size.height);
                }
            }
            reports.push(report);
        }

        let main = if self.groups.is_empty() {
            0.0
        } else {
            offset - self.metrics.group_gap
        };
        let content_size = match self.scroll_axis {
            ScrollAxis::Vertical => Size::new(cross, main),
            ScrollAxis::Horizontal => Size::new(main, cross),
        };

        BoardLayout {
            content_size,
            reports,
        }
    }
}
