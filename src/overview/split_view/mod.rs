//! Split view: two windows snapped side by side, with a draggable divider between them.

use smithay::utils::{Logical, Point};

use super::item::OverviewItem;

pub mod snap;

/// Side of the screen a window snaps to.
///
/// Left and right are logical: in portrait orientation they mean top and bottom, and in secondary
/// orientations they are physically swapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SnapPosition {
    #[default]
    None,
    Left,
    Right,
}

impl SnapPosition {
    /// Returns the opposite side, or `None` for `None`.
    pub fn opposite(self) -> Self {
        match self {
            SnapPosition::None => SnapPosition::None,
            SnapPosition::Left => SnapPosition::Right,
            SnapPosition::Right => SnapPosition::Left,
        }
    }

    /// Whether this position ends up physically on the left (or top) of the screen.
    pub fn is_physical_left_or_top(self, is_primary_orientation: bool) -> bool {
        match self {
            SnapPosition::None => false,
            SnapPosition::Left => is_primary_orientation,
            SnapPosition::Right => !is_primary_orientation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SplitViewState {
    #[default]
    NoSnap,
    LeftSnapped,
    RightSnapped,
    BothSnapped,
}

/// What the split view drag indicators show for the window being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowDraggingState {
    /// Nothing is being dragged.
    #[default]
    NoDrag,
    /// An item is dragged in the overview.
    FromOverview,
    /// A window is dragged down from the top of the screen.
    FromTop,
    /// A window is dragged up from the shelf.
    FromShelf,
    /// Releasing now would snap to the left.
    ToSnapLeft,
    /// Releasing now would snap to the right.
    ToSnapRight,
}

impl WindowDraggingState {
    /// Computes the indicator state for a drag.
    ///
    /// `non_snap_state` is the state to show when the drag is not currently over a snap area.
    pub fn compute(is_dragging: bool, non_snap_state: Self, snap_position: SnapPosition) -> Self {
        if !is_dragging {
            return Self::NoDrag;
        }

        match snap_position {
            SnapPosition::None => non_snap_state,
            SnapPosition::Left => Self::ToSnapLeft,
            SnapPosition::Right => Self::ToSnapRight,
        }
    }

    /// Snap position previewed by this state.
    pub fn snap_position(self) -> SnapPosition {
        match self {
            Self::ToSnapLeft => SnapPosition::Left,
            Self::ToSnapRight => SnapPosition::Right,
            _ => SnapPosition::None,
        }
    }
}

/// Split view of a single display.
pub trait SplitViewController<I: OverviewItem> {
    fn state(&self) -> SplitViewState;

    fn in_split_view_mode(&self) -> bool {
        self.state() != SplitViewState::NoSnap
    }

    fn can_snap_window(&self, window: &I::Window) -> bool;

    /// Position of the window that was snapped first.
    fn default_snap_position(&self) -> SnapPosition;

    /// Divider position along the primary axis, relative to the work area origin.
    fn divider_position(&self) -> i32;
    fn is_divider_animating(&self) -> bool;

    /// Notifies that a window started being dragged, so the divider can go below it.
    fn on_window_drag_started(&mut self, window: &I::Window);
    /// Notifies that the drag ended.
    ///
    /// The snap position and location are hints, the split view does not snap by itself here.
    fn on_window_drag_ended(
        &mut self,
        window: &I::Window,
        snap_position: SnapPosition,
        location: Point<i32, Logical>,
    );
    fn on_window_drag_canceled(&mut self);

    fn snap_window(
        &mut self,
        window: &I::Window,
        snap_position: SnapPosition,
        use_divider_spawn_animation: bool,
    );
    fn end_split_view(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dragging_state_round_trips_snap_position() {
        for pos in [SnapPosition::None, SnapPosition::Left, SnapPosition::Right] {
            let state =
                WindowDraggingState::compute(true, WindowDraggingState::FromOverview, pos);
            assert_eq!(state.snap_position(), pos);
        }

        let from_top = WindowDraggingState::FromTop;
        let state = WindowDraggingState::compute(true, from_top, SnapPosition::None);
        assert_eq!(state, from_top);
        let state = WindowDraggingState::compute(false, from_top, SnapPosition::Left);
        assert_eq!(state, WindowDraggingState::NoDrag);
    }

    #[test]
    fn physical_sides() {
        assert!(SnapPosition::Left.is_physical_left_or_top(true));
        assert!(!SnapPosition::Left.is_physical_left_or_top(false));
        assert!(SnapPosition::Right.is_physical_left_or_top(false));
        assert!(!SnapPosition::None.is_physical_left_or_top(true));
        assert_eq!(SnapPosition::Left.opposite(), SnapPosition::Right);
    }
}
