//! Deterministic row geometry for review list rows.
//!
//! The layout engine is a pure function from a review's display content and
//! a container width to a set of non-overlapping frames plus a total row
//! height. Text is treated as an opaque measurable capability so that the
//! geometry pass stays independent of any concrete font rendering.

pub mod geometry;
pub mod row;
pub mod text;

pub use geometry::{Point, Rect, Size};
pub use row::{Insets, LayoutConfig, LayoutEngine, RowLayout};
pub use text::{FontMetrics, Measurable, StyledText, TextTheme};
