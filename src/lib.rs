use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

pub mod annotate;
pub mod colors;
pub mod error;
pub mod gutter;
pub mod image_info;

pub use annotate::*;
pub use colors::*;
pub use error::{AnnotateError, Result};
pub use gutter::*;
pub use image_info::*;

pub const DEFAULT_IMAGE_RATIO: f32 = 0.6;
pub const DEFAULT_SEPARATOR_WIDTH: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Edge-based box in canvas units, used for the board image and the
/// user-drawn marker rectangles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Bounds {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    pub fn center_x(&self) -> f32 {
        0.5 * (self.left + self.right)
    }

    pub fn center_y(&self) -> f32 {
        0.5 * (self.top + self.bottom)
    }

    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.left, self.top),
            Point::new(self.right, self.top),
            Point::new(self.left, self.bottom),
            Point::new(self.right, self.bottom),
        ]
    }
}

/// Origin-plus-extent box in canvas units, the shape of every placement
/// record handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Affine transform in SVG matrix order (a b c d e f).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    pub fn translate(tx: f32, ty: f32) -> Self {
        Transform {
            e: tx,
            f: ty,
            ..Self::IDENTITY
        }
    }

    pub fn apply(&self, point: Point) -> Point {
        Point {
            x: self.a * point.x + self.c * point.y + self.e,
            y: self.b * point.x + self.d * point.y + self.f,
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// One image in the host document; `board` marks the image explicitly
/// flagged as the reference board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasImage {
    pub id: String,
    pub bounds: Bounds,
    #[serde(default)]
    pub board: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceGeometry {
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub board: Bounds,
}

impl ReferenceGeometry {
    pub fn new(canvas_width: f32, canvas_height: f32, board: Bounds) -> Self {
        Self {
            canvas_width,
            canvas_height,
            board,
        }
    }

    /// Pick the reference board image: the one explicitly flagged, or the
    /// largest image in the document.
    pub fn locate(canvas_width: f32, canvas_height: f32, images: &[CanvasImage]) -> Result<Self> {
        let board = match images.iter().find(|image| image.board) {
            Some(flagged) => flagged,
            None => images
                .iter()
                .reduce(|best, image| {
                    if image.bounds.area() > best.bounds.area() {
                        image
                    } else {
                        best
                    }
                })
                .ok_or(AnnotateError::NoReferenceImage)?,
        };

        Ok(Self {
            canvas_width,
            canvas_height,
            board: board.bounds,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChipImage {
    pub width: f32,
    pub height: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Catalog entry a marker rectangle can be matched to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chip {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ChipImage>,
}

impl Chip {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            image: None,
        }
    }

    /// Pixel dimensions of the chip photo, 0x0 when there is none.
    pub fn image_size(&self) -> (f32, f32) {
        self.image
            .as_ref()
            .map(|image| (image.width, image.height))
            .unwrap_or((0.0, 0.0))
    }

    pub fn has_image(&self) -> bool {
        self.image
            .as_ref()
            .is_some_and(|image| image.width > 0.0 && image.height > 0.0)
    }
}

/// A user-drawn rectangle identifying a chip location on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerRect {
    pub id: String,
    pub bounds: Bounds,
    #[serde(default)]
    pub transform: Transform,
}

impl MarkerRect {
    pub fn new(id: impl Into<String>, bounds: Bounds) -> Self {
        Self {
            id: id.into(),
            bounds,
            transform: Transform::IDENTITY,
        }
    }

    pub fn corners(&self) -> [Point; 4] {
        self.bounds
            .corners()
            .map(|corner| self.transform.apply(corner))
    }

    /// Center of the transformed corners' bounding box.
    pub fn center(&self) -> Point {
        let corners = self.corners();
        let (mut min_x, mut min_y) = (f32::INFINITY, f32::INFINITY);
        let (mut max_x, mut max_y) = (f32::NEG_INFINITY, f32::NEG_INFINITY);
        for corner in corners {
            min_x = min_x.min(corner.x);
            min_y = min_y.min(corner.y);
            max_x = max_x.max(corner.x);
            max_y = max_y.max(corner.y);
        }
        Point::new(0.5 * (min_x + max_x), 0.5 * (min_y + max_y))
    }
}

/// The pairing of one marker rectangle with one chip name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub marker: MarkerRect,
    pub chip: String,
    #[serde(default)]
    pub reverse: bool,
}

impl Assignment {
    pub fn new(marker: MarkerRect, chip: impl Into<String>) -> Self {
        Self {
            marker,
            chip: chip.into(),
            reverse: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GutterOrientation {
    Horizontal,
    Vertical,
}

impl FromStr for GutterOrientation {
    type Err = AnnotateError;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "horizontal" => Ok(GutterOrientation::Horizontal),
            "vertical" => Ok(GutterOrientation::Vertical),
            other => Err(AnnotateError::InvalidOrientation(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub orientation: GutterOrientation,
    #[serde(default = "default_image_ratio")]
    pub image_ratio: f32,
    #[serde(default = "default_separator_width")]
    pub separator_width: f32,
    #[serde(default)]
    pub palette: PaletteConfig,
}

impl LayoutConfig {
    pub fn new(orientation: GutterOrientation) -> Self {
        Self {
            orientation,
            image_ratio: DEFAULT_IMAGE_RATIO,
            separator_width: DEFAULT_SEPARATOR_WIDTH,
            palette: PaletteConfig::default(),
        }
    }
}

fn default_image_ratio() -> f32 {
    DEFAULT_IMAGE_RATIO
}

fn default_separator_width() -> f32 {
    DEFAULT_SEPARATOR_WIDTH
}

/// Order assignments by marker center along the gutter pair's primary axis:
/// left to right for a horizontal pair, top to bottom for a vertical one.
pub fn sort_assignments(assignments: &mut [Assignment], orientation: GutterOrientation) {
    match orientation {
        GutterOrientation::Horizontal => {
            assignments.sort_by(|a, b| a.marker.center().x.total_cmp(&b.marker.center().x));
        }
        GutterOrientation::Vertical => {
            assignments.sort_by(|a, b| a.marker.center().y.total_cmp(&b.marker.center().y));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_maps_corners() {
        let marker = MarkerRect {
            id: "rect1".to_string(),
            bounds: Bounds::new(10.0, 20.0, 30.0, 40.0),
            transform: Transform::translate(5.0, -5.0),
        };

        let corners = marker.corners();
        assert_eq!(corners[0], Point::new(15.0, 15.0));
        assert_eq!(corners[3], Point::new(35.0, 35.0));
        assert_eq!(marker.center(), Point::new(25.0, 25.0));
    }

    #[test]
    fn locate_prefers_flagged_board() {
        let images = vec![
            CanvasImage {
                id: "big".to_string(),
                bounds: Bounds::new(0.0, 0.0, 900.0, 900.0),
                board: false,
            },
            CanvasImage {
                id: "board".to_string(),
                bounds: Bounds::new(100.0, 100.0, 300.0, 300.0),
                board: true,
            },
        ];

        let geometry = ReferenceGeometry::locate(1000.0, 1000.0, &images).unwrap();
        assert_eq!(geometry.board, Bounds::new(100.0, 100.0, 300.0, 300.0));
    }

    #[test]
    fn locate_falls_back_to_largest_image() {
        let images = vec![
            CanvasImage {
                id: "small".to_string(),
                bounds: Bounds::new(0.0, 0.0, 10.0, 10.0),
                board: false,
            },
            CanvasImage {
                id: "big".to_string(),
                bounds: Bounds::new(200.0, 200.0, 800.0, 800.0),
                board: false,
            },
        ];

        let geometry = ReferenceGeometry::locate(1000.0, 1000.0, &images).unwrap();
        assert_eq!(geometry.board, Bounds::new(200.0, 200.0, 800.0, 800.0));
    }

    #[test]
    fn locate_without_images_fails() {
        let result = ReferenceGeometry::locate(1000.0, 1000.0, &[]);
        assert!(matches!(result, Err(AnnotateError::NoReferenceImage)));
    }

    #[test]
    fn orientation_parses_known_tokens_only() {
        assert_eq!(
            "horizontal".parse::<GutterOrientation>().unwrap(),
            GutterOrientation::Horizontal
        );
        assert_eq!(
            "vertical".parse::<GutterOrientation>().unwrap(),
            GutterOrientation::Vertical
        );
        assert!(matches!(
            "diagonal".parse::<GutterOrientation>(),
            Err(AnnotateError::InvalidOrientation(value)) if value == "diagonal"
        ));
    }

    #[test]
    fn config_defaults_fill_in_missing_fields() {
        let config: LayoutConfig =
            serde_json::from_str(r#"{"orientation": "horizontal"}"#).unwrap();
        assert_eq!(config.orientation, GutterOrientation::Horizontal);
        assert_eq!(config.image_ratio, DEFAULT_IMAGE_RATIO);
        assert_eq!(config.separator_width, DEFAULT_SEPARATOR_WIDTH);
        assert_eq!(config.palette, PaletteConfig::default());
    }

    #[test]
    fn assignments_sort_along_primary_axis() {
        let marker = |id: &str, left: f32, top: f32| {
            MarkerRect::new(id, Bounds::new(left, top, left + 20.0, top + 20.0))
        };
        let mut assignments = vec![
            Assignment::new(marker("c", 500.0, 10.0), "C"),
            Assignment::new(marker("a", 100.0, 600.0), "A"),
            Assignment::new(marker("b", 300.0, 300.0), "B"),
        ];

        sort_assignments(&mut assignments, GutterOrientation::Horizontal);
        let ids: Vec<&str> = assignments
            .iter()
            .map(|assignment| assignment.marker.id.as_str())
            .collect();
        assert_eq!(ids, ["a", "b", "c"]);

        sort_assignments(&mut assignments, GutterOrientation::Vertical);
        let ids: Vec<&str> = assignments
            .iter()
            .map(|assignment| assignment.marker.id.as_str())
            .collect();
        assert_eq!(ids, ["c", "b", "a"]);
    }
}
