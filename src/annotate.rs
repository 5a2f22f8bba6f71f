use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::colors::ColorCycle;
use crate::error::{AnnotateError, Result};
use crate::gutter::{Gutter, Position};
use crate::{
    Assignment, Chip, GutterOrientation, LayoutConfig, MarkerRect, Point, Rect, ReferenceGeometry,
};

/// One connector line from a marker rectangle to its annotation's surround.
/// The renderer resolves the endpoints from the two identifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connector {
    pub marker_id: String,
    #[serde(default)]
    pub reverse: bool,
}

/// The realized placement for one unique chip: box geometry, style hints,
/// and one connector per marker occurrence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub name: String,
    pub description: String,
    pub color: String,
    pub gutter: Position,
    pub surround: Rect,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_box: Option<Rect>,
    pub title_box: Rect,
    pub description_box: Rect,
    pub connectors: Vec<Connector>,
}

/// Decide which gutter receives the next annotation. A gutter more than one
/// annotation ahead of its partner is skipped outright; otherwise the marker
/// goes to whichever gutter has its next free slot geometrically closer.
pub fn choose_gutter(marker: &MarkerRect, a: &Gutter, b: &Gutter) -> Position {
    if a.index > b.index + 1 {
        return b.position;
    }
    if b.index > a.index + 1 {
        return a.position;
    }
    closest_gutter(marker, a, b)
}

fn closest_gutter(marker: &MarkerRect, a: &Gutter, b: &Gutter) -> Position {
    let corners = marker.corners();
    if nearest_corner_sum(&corners, a) <= nearest_corner_sum(&corners, b) {
        a.position
    } else {
        b.position
    }
}

// Sum of the two global minima: for each of the gutter's two candidate
// corners, the closest approach from any marker corner. Not an average and
// not an all-pairs sum; the single closest approach path per corner is what
// keeps connectors from crossing the board.
fn nearest_corner_sum(corners: &[Point; 4], gutter: &Gutter) -> f32 {
    let (near, far) = gutter.approximate_corners();
    let min_to = |target: Point| {
        corners
            .iter()
            .map(|corner| corner.distance(target))
            .fold(f32::INFINITY, f32::min)
    };
    min_to(near) + min_to(far)
}

/// Lay out one annotation per unique chip over the ordered assignment list.
///
/// Assignment order is semantic: it decides which gutter fills first and
/// which occurrence of a repeated chip wins the shared geometry. The run
/// either completes the whole list or fails without producing any output.
pub fn annotate_board(
    geometry: &ReferenceGeometry,
    chips: &[Chip],
    assignments: &[Assignment],
    config: &LayoutConfig,
) -> Result<Vec<Annotation>> {
    // Palette problems surface before any placement work starts.
    let mut colors = ColorCycle::new(&config.palette)?;

    let (mut gutter_a, mut gutter_b) = match config.orientation {
        GutterOrientation::Horizontal => (
            Gutter::new(
                Position::Above,
                geometry,
                config.image_ratio,
                config.separator_width,
            )?,
            Gutter::new(
                Position::Below,
                geometry,
                config.image_ratio,
                config.separator_width,
            )?,
        ),
        GutterOrientation::Vertical => (
            Gutter::new(
                Position::Left,
                geometry,
                config.image_ratio,
                config.separator_width,
            )?,
            Gutter::new(
                Position::Right,
                geometry,
                config.image_ratio,
                config.separator_width,
            )?,
        ),
    };

    let catalog: HashMap<&str, &Chip> = chips
        .iter()
        .map(|chip| (chip.name.as_str(), chip))
        .collect();

    let mut completed: Vec<Annotation> = Vec::new();
    for assignment in assignments {
        let chip = *catalog
            .get(assignment.chip.as_str())
            .ok_or_else(|| AnnotateError::UnresolvedChip(assignment.chip.clone()))?;

        // A chip that already has an annotation only gets another connector;
        // the gutters and the palette stay untouched.
        if let Some(existing) = completed
            .iter_mut()
            .find(|annotation| annotation.name == chip.name)
        {
            tracing::debug!(
                chip = %chip.name,
                marker = %assignment.marker.id,
                "duplicate chip, connecting to existing annotation"
            );
            existing.connectors.push(Connector {
                marker_id: assignment.marker.id.clone(),
                reverse: assignment.reverse,
            });
            continue;
        }

        let target = choose_gutter(&assignment.marker, &gutter_a, &gutter_b);
        let gutter = if target == gutter_a.position {
            &mut gutter_a
        } else {
            &mut gutter_b
        };

        tracing::debug!(
            chip = %chip.name,
            gutter = %gutter.position,
            index = gutter.index,
            offset = gutter.offset,
            "placing annotation"
        );

        let (width, height) = chip.image_size();
        let surround = gutter.surround_box(width, height);
        let image_box = chip.has_image().then(|| gutter.image_box(width, height));
        let title_box = gutter.title_box(width, height);
        let description_box = gutter.description_box(width, height);

        gutter.advance(surround.width, surround.height);

        completed.push(Annotation {
            name: chip.name.clone(),
            description: chip.description.clone(),
            color: colors.next(),
            gutter: target,
            surround,
            image_box,
            title_box,
            description_box,
            connectors: vec![Connector {
                marker_id: assignment.marker.id.clone(),
                reverse: assignment.reverse,
            }],
        });
    }

    Ok(completed)
}
