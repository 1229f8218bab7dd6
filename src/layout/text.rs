//! Measurable text for the layout pass.
//!
//! Row geometry never inspects strings directly; it works against the
//! [`Measurable`] capability so the wrapping strategy can be swapped without
//! touching the frame arithmetic. [`StyledText`] is the concrete
//! implementation: display columns are counted with `unicode-width` and
//! hard-wrapped at the column budget derived from the available width.

use unicode_width::UnicodeWidthStr;

use super::geometry::Size;

/// Text that can report its bounding size under width and height limits.
pub trait Measurable {
    /// Returns the bounding size at `max_width`, optionally clamped so the
    /// height never exceeds `max_height`.
    fn bounding_size(&self, max_width: f32, max_height: Option<f32>) -> Size;

    /// Height of a single rendered line.
    fn line_height(&self) -> f32;

    /// Returns true when there is nothing to render.
    fn is_empty(&self) -> bool;
}

/// Metrics of the font a piece of text is styled with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontMetrics {
    /// Height consumed by one rendered line.
    pub line_height: f32,
    /// Horizontal advance of one display column.
    pub advance: f32,
}

impl FontMetrics {
    /// Creates font metrics from a line height and a per-column advance.
    #[must_use]
    pub const fn new(line_height: f32, advance: f32) -> Self {
        Self {
            line_height,
            advance,
        }
    }
}

/// Font metrics for the three text roles of a review row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextTheme {
    /// Reviewer name label.
    pub name: FontMetrics,
    /// Review body text.
    pub body: FontMetrics,
    /// Creation date footer label.
    pub created: FontMetrics,
}

impl Default for TextTheme {
    fn default() -> Self {
        Self {
            name: FontMetrics::new(19.0, 8.5),
            body: FontMetrics::new(18.0, 8.0),
            created: FontMetrics::new(16.0, 7.0),
        }
    }
}

/// A string paired with the metrics of the font it renders in.
#[derive(Debug, Clone, PartialEq)]
pub struct StyledText {
    content: String,
    font: FontMetrics,
}

impl StyledText {
    /// Creates styled text from content and font metrics.
    #[must_use]
    pub fn new(content: impl Into<String>, font: FontMetrics) -> Self {
        Self {
            content: content.into(),
            font,
        }
    }

    /// Returns the underlying string.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Number of wrapped rows required at the given column budget.
    fn wrapped_rows(&self, max_cols: usize) -> usize {
        self.content
            .lines()
            .map(|line| line.width().max(1).div_ceil(max_cols))
            .sum()
    }

    /// Width of the widest wrapped row, in display columns.
    fn widest_row_cols(&self, max_cols: usize) -> usize {
        self.content
            .lines()
            .map(|line| line.width().min(max_cols))
            .max()
            .unwrap_or(0)
    }
}

impl Measurable for StyledText {
    fn bounding_size(&self, max_width: f32, max_height: Option<f32>) -> Size {
        if self.is_empty() {
            return Size::ZERO;
        }

        let advance = self.font.advance.max(f32::EPSILON);
        #[expect(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "column budget is a small non-negative count"
        )]
        let max_cols = ((max_width / advance).floor() as usize).max(1);

        #[expect(
            clippy::cast_precision_loss,
            reason = "row and column counts stay far below f32 precision limits"
        )]
        let (width, height) = (
            self.widest_row_cols(max_cols) as f32 * advance,
            self.wrapped_rows(max_cols) as f32 * self.font.line_height,
        );

        let height = match max_height {
            Some(limit) => height.min(limit),
            None => height,
        };
        Size::new(width, height)
    }

    fn line_height(&self) -> f32 {
        self.font.line_height
    }

    fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}
