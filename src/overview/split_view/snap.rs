//! Resolving a snap position from how close a drag is to the screen edges.

use smithay::utils::{Logical, Point, Rectangle};

use super::SnapPosition;

/// Thresholds for [`snap_position_from_edges()`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeSnapThresholds {
    /// Drags this close to the screen edge snap even without travelling far.
    pub snap_distance_from_edge: f64,
    /// Travel along the primary axis needed before a drag may snap.
    pub minimum_drag_distance: f64,
    /// Width of the left and right hot zones in landscape.
    pub horizontal_edge_inset: f64,
    /// Height of the top and bottom hot zones in portrait.
    pub vertical_edge_inset: f64,
}

/// Returns where a window dragged to `location` would snap.
///
/// The primary axis is x for a horizontal layout and y otherwise. The drag has to be inside one
/// of the hot zones at the two ends of the work area along that axis. On top of that it has to
/// either be right at the screen edge or have travelled far enough from where it started, so
/// that picking an item up close to an edge doesn't snap it by accident.
pub fn snap_position_from_edges(
    location: Point<i32, Logical>,
    initial_location: Point<i32, Logical>,
    work_area: Rectangle<i32, Logical>,
    is_layout_horizontal: bool,
    is_primary_orientation: bool,
    thresholds: &EdgeSnapThresholds,
) -> SnapPosition {
    let (pos, initial, start, length, inset) = if is_layout_horizontal {
        (
            location.x,
            initial_location.x,
            work_area.loc.x,
            work_area.size.w,
            thresholds.horizontal_edge_inset,
        )
    } else {
        (
            location.y,
            initial_location.y,
            work_area.loc.y,
            work_area.size.h,
            thresholds.vertical_edge_inset,
        )
    };

    let pos = f64::from(pos);
    let start = f64::from(start);
    let end = start + f64::from(length);
    let travelled = (pos - f64::from(initial)).abs() >= thresholds.minimum_drag_distance;

    let leading = if pos < start + inset {
        let near_edge = pos - start < thresholds.snap_distance_from_edge;
        if !(near_edge || travelled) {
            return SnapPosition::None;
        }
        true
    } else if pos > end - inset {
        let near_edge = end - pos < thresholds.snap_distance_from_edge;
        if !(near_edge || travelled) {
            return SnapPosition::None;
        }
        false
    } else {
        return SnapPosition::None;
    };

    if leading == is_primary_orientation {
        SnapPosition::Left
    } else {
        SnapPosition::Right
    }
}
