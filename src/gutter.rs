use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{AnnotateError, Result};
use crate::{Point, Rect, ReferenceGeometry};

/// Which margin of the board a gutter occupies. Horizontal gutter pairs use
/// Above/Below, vertical pairs Left/Right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Above,
    Below,
    Left,
    Right,
}

impl Position {
    /// Above/Below gutters run along the horizontal axis; their offset
    /// advances in x. Left/Right gutters advance in y.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Position::Above | Position::Below)
    }

    /// Whether the gutter sits between the canvas origin edge and the board
    /// (Above, Left) or on the far side of it (Below, Right).
    fn near_side(self) -> bool {
        matches!(self, Position::Above | Position::Left)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Position::Above => "above",
            Position::Below => "below",
            Position::Left => "left",
            Position::Right => "right",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One margin region flanking the board, accumulating annotations along its
/// primary axis. `offset` and `index` advance only when a new annotation is
/// placed; every box query is a pure function of the current offset.
#[derive(Debug, Clone, PartialEq)]
pub struct Gutter {
    pub position: Position,
    pub index: usize,
    pub offset: f32,
    pub image_ratio: f32,
    pub separator_width: f32,
    /// Canvas-edge-to-board-edge distance on this side.
    pub depth: f32,
    /// Board edge coordinate bordering this gutter.
    pub main_edge: f32,
    /// Depth-axis extent reserved for the chip photo slot.
    pub image_display_size: f32,
}

impl Gutter {
    pub fn new(
        position: Position,
        geometry: &ReferenceGeometry,
        image_ratio: f32,
        separator_width: f32,
    ) -> Result<Self> {
        let depth = match position {
            Position::Above => geometry.board.top,
            Position::Below => geometry.canvas_height - geometry.board.bottom,
            Position::Left => geometry.board.left,
            Position::Right => geometry.canvas_width - geometry.board.right,
        };

        let main_edge = match position {
            Position::Above => geometry.board.top,
            Position::Below => geometry.board.bottom,
            Position::Left => geometry.board.left,
            Position::Right => geometry.board.right,
        };

        let image_display_size = depth * image_ratio - separator_width;
        if image_display_size <= 0.0 {
            return Err(AnnotateError::GutterTooNarrow { position, depth });
        }

        Ok(Self {
            position,
            index: 0,
            offset: 0.0,
            image_ratio,
            separator_width,
            depth,
            main_edge,
            image_display_size,
        })
    }

    /// Substitute the square image slot for missing photo dimensions.
    fn effective_size(&self, width: f32, height: f32) -> (f32, f32) {
        let width = if width == 0.0 {
            self.image_display_size
        } else {
            width
        };
        let height = if height == 0.0 {
            self.image_display_size
        } else {
            height
        };
        (width, height)
    }

    /// Primary-axis extent of the surround for a photo of the given size.
    fn primary_extent(&self, width: f32, height: f32) -> f32 {
        let aspect = if self.position.is_horizontal() {
            width / height
        } else {
            height / width
        };
        self.image_display_size * aspect + self.separator_width
    }

    /// Outer box drawn around the image, title, and description slots.
    pub fn surround_box(&self, width: f32, height: f32) -> Rect {
        let (width, height) = self.effective_size(width, height);
        let separator = self.separator_width;
        let half = 0.5 * separator;

        let primary = self.primary_extent(width, height);
        let depth_extent = self.depth - separator;
        let depth_start = if self.position.near_side() {
            half
        } else {
            self.main_edge + half
        };

        if self.position.is_horizontal() {
            Rect::new(self.offset + half, depth_start, primary, depth_extent)
        } else {
            Rect::new(depth_start, self.offset + half, depth_extent, primary)
        }
    }

    /// Chip photo slot, flush against the board edge, aspect-scaled along
    /// the primary axis.
    pub fn image_box(&self, width: f32, height: f32) -> Rect {
        let separator = self.separator_width;
        let size = self.image_display_size;
        let depth_start = if self.position.near_side() {
            self.main_edge - size - separator
        } else {
            self.main_edge + separator
        };

        if self.position.is_horizontal() {
            Rect::new(
                self.offset + separator,
                depth_start,
                size * (width / height),
                size,
            )
        } else {
            Rect::new(
                depth_start,
                self.offset + separator,
                size,
                size * (height / width),
            )
        }
    }

    pub fn title_box(&self, width: f32, height: f32) -> Rect {
        let (title_start, _, half) = self.text_slots();
        self.depth_slot(self.surround_box(width, height), title_start, half)
    }

    pub fn description_box(&self, width: f32, height: f32) -> Rect {
        let (_, description_start, half) = self.text_slots();
        self.depth_slot(self.surround_box(width, height), description_start, half)
    }

    /// Depth-axis starts of the title and description halves. The space left
    /// between the image slot and the canvas-side surround edge splits into
    /// two equal halves, title taking the half adjacent to the image.
    fn text_slots(&self) -> (f32, f32, f32) {
        let separator = self.separator_width;
        let half = 0.5 * (self.depth - self.image_display_size - 2.0 * separator);

        if self.position.near_side() {
            (separator + half, separator, half)
        } else {
            let title_start = self.main_edge + separator + self.image_display_size;
            (title_start, title_start + half, half)
        }
    }

    /// A text slot spans the surround's primary extent, inset by half the
    /// separator width per side.
    fn depth_slot(&self, surround: Rect, depth_start: f32, depth_extent: f32) -> Rect {
        let half = 0.5 * self.separator_width;
        if self.position.is_horizontal() {
            Rect::new(
                surround.x + half,
                depth_start,
                surround.width - self.separator_width,
                depth_extent,
            )
        } else {
            Rect::new(
                depth_start,
                surround.y + half,
                depth_extent,
                surround.height - self.separator_width,
            )
        }
    }

    /// The two corners of this gutter's next candidate surround that lie
    /// nearest the board edge. The gutter does not know the upcoming chip's
    /// size, so the far corner assumes a square image slot. Only used for
    /// distance comparisons, never for final geometry.
    pub fn approximate_corners(&self) -> (Point, Point) {
        if self.position.is_horizontal() {
            (
                Point::new(self.offset, self.main_edge),
                Point::new(self.offset + self.image_display_size, self.main_edge),
            )
        } else {
            (
                Point::new(self.main_edge, self.offset),
                Point::new(self.main_edge, self.offset + self.image_display_size),
            )
        }
    }

    /// Record a placed surround: bump the count and move the offset past it.
    pub fn advance(&mut self, width: f32, height: f32) {
        self.index += 1;
        let extent = if self.position.is_horizontal() {
            width
        } else {
            height
        };
        self.offset += extent + self.separator_width;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Bounds;

    fn geometry() -> ReferenceGeometry {
        ReferenceGeometry::new(1000.0, 1000.0, Bounds::new(200.0, 200.0, 800.0, 800.0))
    }

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn derives_depth_and_edge_per_position() {
        let geometry = ReferenceGeometry::new(1000.0, 800.0, Bounds::new(150.0, 100.0, 900.0, 650.0));
        let cases = [
            (Position::Above, 100.0, 100.0),
            (Position::Below, 150.0, 650.0),
            (Position::Left, 150.0, 150.0),
            (Position::Right, 100.0, 900.0),
        ];

        for (position, depth, main_edge) in cases {
            let gutter = Gutter::new(position, &geometry, 0.6, 2.0).unwrap();
            assert_eq!(gutter.depth, depth, "depth mismatch for {position}");
            assert_eq!(gutter.main_edge, main_edge, "edge mismatch for {position}");
            assert!(close(gutter.image_display_size, depth * 0.6 - 2.0));
        }
    }

    #[test]
    fn too_narrow_gutter_is_rejected() {
        let geometry = ReferenceGeometry::new(1000.0, 1000.0, Bounds::new(3.0, 3.0, 997.0, 997.0));
        let result = Gutter::new(Position::Above, &geometry, 0.6, 2.0);
        assert!(matches!(
            result,
            Err(AnnotateError::GutterTooNarrow {
                position: Position::Above,
                ..
            })
        ));
    }

    #[test]
    fn surround_above_matches_expected_geometry() {
        let gutter = Gutter::new(Position::Above, &geometry(), 0.6, 2.0).unwrap();
        // image_display_size = 200 * 0.6 - 2 = 118
        let surround = gutter.surround_box(100.0, 50.0);
        assert_eq!(surround, Rect::new(1.0, 1.0, 238.0, 198.0));
    }

    #[test]
    fn surround_below_spans_board_edge_to_canvas_edge() {
        let gutter = Gutter::new(Position::Below, &geometry(), 0.6, 2.0).unwrap();
        let surround = gutter.surround_box(100.0, 50.0);
        assert_eq!(surround, Rect::new(1.0, 801.0, 238.0, 198.0));
    }

    #[test]
    fn surround_vertical_scales_height_by_inverse_aspect() {
        let gutter = Gutter::new(Position::Right, &geometry(), 0.6, 2.0).unwrap();
        let surround = gutter.surround_box(100.0, 50.0);
        // Vertical gutters advance in y; height = 118 * (50/100) + 2
        assert_eq!(surround, Rect::new(801.0, 1.0, 198.0, 61.0));
    }

    #[test]
    fn missing_image_produces_square_surround() {
        let gutter = Gutter::new(Position::Above, &geometry(), 0.6, 2.0).unwrap();
        let surround = gutter.surround_box(0.0, 0.0);
        assert_eq!(surround, Rect::new(1.0, 1.0, 120.0, 198.0));
    }

    #[test]
    fn image_box_preserves_aspect_ratio() {
        let gutter = Gutter::new(Position::Above, &geometry(), 0.6, 2.0).unwrap();
        let image = gutter.image_box(640.0, 480.0);
        assert!(close(image.width / image.height, 640.0 / 480.0));
        assert_eq!(image.height, gutter.image_display_size);

        let gutter = Gutter::new(Position::Left, &geometry(), 0.6, 2.0).unwrap();
        let image = gutter.image_box(640.0, 480.0);
        assert!(close(image.width / image.height, 640.0 / 480.0));
        assert_eq!(image.width, gutter.image_display_size);
    }

    #[test]
    fn image_box_sits_flush_against_board_edge() {
        let above = Gutter::new(Position::Above, &geometry(), 0.6, 2.0).unwrap();
        let image = above.image_box(100.0, 100.0);
        // 200 - 118 - 2
        assert_eq!(image.y, 80.0);
        assert_eq!(image.x, 2.0);

        let below = Gutter::new(Position::Below, &geometry(), 0.6, 2.0).unwrap();
        let image = below.image_box(100.0, 100.0);
        assert_eq!(image.y, 802.0);
    }

    #[test]
    fn text_slots_split_remaining_depth_in_equal_halves() {
        let above = Gutter::new(Position::Above, &geometry(), 0.6, 2.0).unwrap();
        let title = above.title_box(100.0, 50.0);
        let description = above.description_box(100.0, 50.0);

        // Remaining depth: 200 - 118 - 4 = 78, halves of 39. Title sits
        // adjacent to the image slot, description toward the canvas edge.
        assert_eq!(title, Rect::new(2.0, 41.0, 236.0, 39.0));
        assert_eq!(description, Rect::new(2.0, 2.0, 236.0, 39.0));
        assert!(close(title.y + title.height, above.image_box(100.0, 50.0).y));

        let below = Gutter::new(Position::Below, &geometry(), 0.6, 2.0).unwrap();
        let title = below.title_box(100.0, 50.0);
        let description = below.description_box(100.0, 50.0);
        assert_eq!(title, Rect::new(2.0, 920.0, 236.0, 39.0));
        assert_eq!(description, Rect::new(2.0, 959.0, 236.0, 39.0));
    }

    #[test]
    fn text_slots_vertical_follow_the_depth_axis() {
        let right = Gutter::new(Position::Right, &geometry(), 0.6, 2.0).unwrap();
        let title = right.title_box(100.0, 50.0);
        let description = right.description_box(100.0, 50.0);

        assert_eq!(title, Rect::new(920.0, 2.0, 39.0, 59.0));
        assert_eq!(description, Rect::new(959.0, 2.0, 39.0, 59.0));

        let left = Gutter::new(Position::Left, &geometry(), 0.6, 2.0).unwrap();
        let title = left.title_box(100.0, 50.0);
        assert_eq!(title, Rect::new(41.0, 2.0, 39.0, 59.0));
    }

    #[test]
    fn approximate_corners_track_offset() {
        let mut gutter = Gutter::new(Position::Above, &geometry(), 0.6, 2.0).unwrap();
        let (near, far) = gutter.approximate_corners();
        assert_eq!(near, Point::new(0.0, 200.0));
        assert_eq!(far, Point::new(118.0, 200.0));

        gutter.advance(238.0, 198.0);
        let (near, far) = gutter.approximate_corners();
        assert_eq!(near, Point::new(240.0, 200.0));
        assert_eq!(far, Point::new(358.0, 200.0));
    }

    #[test]
    fn advance_uses_the_primary_axis_extent() {
        let mut above = Gutter::new(Position::Above, &geometry(), 0.6, 2.0).unwrap();
        above.advance(238.0, 198.0);
        assert_eq!(above.index, 1);
        assert_eq!(above.offset, 240.0);

        let mut right = Gutter::new(Position::Right, &geometry(), 0.6, 2.0).unwrap();
        right.advance(198.0, 61.0);
        assert_eq!(right.index, 1);
        assert_eq!(right.offset, 63.0);
    }
}
