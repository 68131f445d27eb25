#![forbid(unsafe_code)]

//! Core primitives for the tilekit layout engine.
//!
//! This crate provides the pixel-space geometry types and the board
//! metrics (cell pitch configuration) shared by the layout engine and
//! its hosts. It has no opinion about rendering, input, or view-tree
//! attachment; those live entirely in the host toolkit.

pub mod geometry;
pub mod metrics;

pub use geometry::{Rect, Sides, Size};
pub use metrics::Metrics;
