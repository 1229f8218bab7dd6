//! Frame computation for a single review row.
//!
//! [`LayoutEngine::measure`] is a pure function of the item's display
//! content, the container width, and the configured metrics. It places the
//! avatar, name label, rating strip, optional photo strip, review text,
//! optional "show more" control, and creation date, then reports the total
//! row height. It never fails; absent content degenerates to minimal height.

use crate::feed::models::ReviewItem;

use super::geometry::{Point, Rect, Size};
use super::text::{Measurable, StyledText, TextTheme};

/// Distances from the row edges to its content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Insets {
    /// Distance from the top edge.
    pub top: f32,
    /// Distance from the left edge.
    pub left: f32,
    /// Distance from the bottom edge.
    pub bottom: f32,
    /// Distance from the right edge.
    pub right: f32,
}

/// Fixed sizes and spacings used when laying out a review row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    /// Avatar placeholder size.
    pub avatar_size: Size,
    /// Photo placeholder size.
    pub photo_size: Size,
    /// Row content insets.
    pub insets: Insets,
    /// Horizontal gap between the avatar and the name label.
    pub avatar_to_name: f32,
    /// Vertical gap between the name label and the rating strip.
    pub name_to_rating: f32,
    /// Vertical gap between the rating strip and the text (no photos).
    pub rating_to_text: f32,
    /// Vertical gap between the rating strip and the photo strip.
    pub rating_to_photos: f32,
    /// Horizontal gap between photos.
    pub photo_gap: f32,
    /// Vertical gap between the photo strip and the text.
    pub photos_to_text: f32,
    /// Vertical gap between the text and the creation date.
    pub text_to_created: f32,
    /// Vertical gap between the "show more" control and the creation date.
    pub show_more_to_created: f32,
    /// Size of a single rating star.
    pub star_size: Size,
    /// Horizontal gap between rating stars.
    pub star_gap: f32,
    /// Number of stars in the rating strip.
    pub star_count: u32,
    /// Fixed size of the "show more" control.
    pub show_more_size: Size,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            avatar_size: Size::new(36.0, 36.0),
            photo_size: Size::new(55.0, 66.0),
            insets: Insets {
                top: 9.0,
                left: 12.0,
                bottom: 9.0,
                right: 12.0,
            },
            avatar_to_name: 10.0,
            name_to_rating: 6.0,
            rating_to_text: 6.0,
            rating_to_photos: 10.0,
            photo_gap: 8.0,
            photos_to_text: 10.0,
            text_to_created: 6.0,
            show_more_to_created: 6.0,
            star_size: Size::new(16.0, 16.0),
            star_gap: 2.0,
            star_count: 5,
            show_more_size: Size::new(104.0, 18.0),
        }
    }
}

impl LayoutConfig {
    /// Size of the full rating strip: star width times the star count plus
    /// the inter-star gaps.
    #[must_use]
    pub fn rating_strip_size(&self) -> Size {
        #[expect(
            clippy::cast_precision_loss,
            reason = "star counts are single digits"
        )]
        let count = self.star_count as f32;
        let width = (self.star_size.width + self.star_gap) * count - self.star_gap;
        Size::new(width.max(0.0), self.star_size.height)
    }
}

/// Computed frames and total height for one review row.
///
/// Ephemeral: recomputed per (item, width) pair and never persisted. Frames
/// of absent elements are [`Rect::ZERO`].
#[derive(Debug, Clone, PartialEq)]
pub struct RowLayout {
    /// Avatar placeholder frame.
    pub avatar: Rect,
    /// Reviewer name label frame.
    pub full_name: Rect,
    /// Rating strip frame.
    pub rating: Rect,
    /// Photo placeholder frames, one per surviving photo.
    pub photos: Vec<Rect>,
    /// Review text frame (zero when the text is empty).
    pub review_text: Rect,
    /// "Show more" control frame (zero when the text fits).
    pub show_more: Rect,
    /// Creation date label frame.
    pub created: Rect,
    /// True when the clamped text hides part of the full text.
    pub needs_expand: bool,
    /// Total row height including the bottom inset.
    pub height: f32,
}

/// Measures review rows with a fixed metric configuration and text theme.
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    config: LayoutConfig,
    theme: TextTheme,
}

impl LayoutEngine {
    /// Creates an engine from explicit metrics and a text theme.
    #[must_use]
    pub const fn new(config: LayoutConfig, theme: TextTheme) -> Self {
        Self { config, theme }
    }

    /// Returns the metric configuration in use.
    #[must_use]
    pub const fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Computes the row layout for `item` constrained to `max_width`.
    #[must_use]
    pub fn measure(&self, item: &ReviewItem, max_width: f32) -> RowLayout {
        let name = StyledText::new(item.full_name.clone(), self.theme.name);
        let body = StyledText::new(item.review_text.clone(), self.theme.body);
        let created = StyledText::new(item.created_text.clone(), self.theme.created);
        self.place(&name, &body, &created, item.photos.len(), item.max_lines, max_width)
    }

    fn place(
        &self,
        name: &dyn Measurable,
        body: &dyn Measurable,
        created: &dyn Measurable,
        photo_count: usize,
        max_lines: u32,
        max_width: f32,
    ) -> RowLayout {
        let config = &self.config;
        let mut max_y = config.insets.top;

        let avatar = Rect::with_origin(
            Point::new(config.insets.left, max_y),
            config.avatar_size,
        );

        let content_x = avatar.max_x() + config.avatar_to_name;
        let available = (max_width - content_x - config.insets.right).max(0.0);

        let full_name = Rect::with_origin(
            Point::new(content_x, max_y),
            name.bounding_size(available, None),
        );
        max_y = full_name.max_y() + config.name_to_rating;

        let rating = Rect::with_origin(
            Point::new(content_x, max_y),
            config.rating_strip_size(),
        );
        max_y = rating.max_y();

        let photos = if photo_count == 0 {
            Vec::new()
        } else {
            max_y += config.rating_to_photos;
            let photos = Self::photo_strip(config, content_x, max_y, photo_count);
            max_y += config.photo_size.height;
            photos
        };

        let mut needs_expand = false;
        let mut review_text = Rect::ZERO;
        let mut show_more = Rect::ZERO;

        // The gap below the last placed element is consumed even when the
        // text is empty, so the date never sits flush against the rating or
        // photo strip.
        max_y += if photo_count == 0 {
            config.rating_to_text
        } else {
            config.photos_to_text
        };

        if !body.is_empty() {
            let unclamped = body.bounding_size(available, None).height;
            let clamp = (max_lines != 0).then(|| {
                #[expect(
                    clippy::cast_precision_loss,
                    reason = "line caps are small counts"
                )]
                let lines = max_lines as f32;
                body.line_height() * lines
            });
            if let Some(limit) = clamp {
                needs_expand = unclamped > limit;
            }

            review_text = Rect::with_origin(
                Point::new(content_x, max_y),
                body.bounding_size(available, clamp),
            );
            max_y = review_text.max_y() + config.text_to_created;

            if needs_expand {
                show_more = Rect::with_origin(
                    Point::new(content_x, max_y),
                    config.show_more_size,
                );
                max_y = show_more.max_y() + config.show_more_to_created;
            }
        }

        let created = Rect::with_origin(
            Point::new(content_x, max_y),
            created.bounding_size(available, None),
        );

        RowLayout {
            avatar,
            full_name,
            rating,
            photos,
            review_text,
            show_more,
            created,
            needs_expand,
            height: created.max_y() + config.insets.bottom,
        }
    }

    fn photo_strip(config: &LayoutConfig, content_x: f32, y: f32, count: usize) -> Vec<Rect> {
        (0..count)
            .map(|index| {
                #[expect(
                    clippy::cast_precision_loss,
                    reason = "photo counts per review are small"
                )]
                let offset = index as f32 * (config.photo_size.width + config.photo_gap);
                Rect::with_origin(Point::new(content_x + offset, y), config.photo_size)
            })
            .collect()
    }
}
