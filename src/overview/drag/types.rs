use smithay::utils::{Logical, Point, Rectangle};

/// Which policy an ongoing drag follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragBehavior {
    /// No gesture is active.
    #[default]
    NoDrag,
    /// A gesture started but hasn't moved far enough to pick a policy.
    Undefined,
    /// Vertical touch drag that closes the window when released far enough.
    DragToClose,
    /// Free drag towards split view, the desks bar or another display.
    NormalDrag,
}

/// How a drag ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DragResult {
    /// The item was released without moving, like a click.
    NeverDisambiguated,
    /// The window got snapped into split view.
    Snap,
    /// The item was dropped back into the overview.
    DropIntoOverview,
    /// The window moved to another desk.
    DragToDesk,
    /// The window was closed.
    SuccessfulDragToClose,
    /// The drag-to-close wasn't far enough and the item went back.
    CanceledDragToClose,
}

/// Desks bar geometry cached when a normal drag starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct DesksBarDragGeometry {
    /// Screen bounds of the desks bar.
    pub bounds: Rectangle<f64, Logical>,
    /// Desks bar bounds grown by half the visible item size; items shrink inside of it.
    pub shrink_bounds: Rectangle<f64, Logical>,
    /// Distance from the shrink bounds origin to the desks bar origin.
    pub shrink_region_distance: Point<f64, Logical>,
}
