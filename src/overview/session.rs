//! The overview session spanning all displays.

use smithay::utils::{Logical, Point};

use super::grid::OverviewGrid;
use super::item::OverviewItem;
use super::split_view::WindowDraggingState;

/// A running overview, with one grid per display.
pub trait OverviewSession<I: OverviewItem> {
    type Grid: OverviewGrid<I>;

    fn grid_with_root(&self, root: &I::Root) -> Option<&Self::Grid>;
    fn grid_with_root_mut(&mut self, root: &I::Root) -> Option<&mut Self::Grid>;

    /// Activates the window, ending the overview.
    fn select_window(&mut self, window: &I::Window);

    /// Lays out the items of every grid.
    fn position_windows(&mut self, animate: bool);

    /// Removes the drop targets from every grid.
    fn remove_drop_targets(&mut self);

    /// Updates which drop targets highlight for the dragged window at the location.
    fn update_drop_targets_background_visibilities(
        &mut self,
        window: &I::Window,
        location: Point<f64, Logical>,
    );

    fn set_split_view_drag_indicators_dragged_window(&mut self, window: Option<&I::Window>);
    /// Sets the split view indicator state on the grid of `root`, clearing it on other grids.
    fn update_split_view_drag_indicators_window_dragging_states(
        &mut self,
        root: &I::Root,
        state: WindowDraggingState,
    );
    fn reset_split_view_drag_indicators_window_dragging_states(&mut self);

    /// Moves the other items around to make room for the dragged one.
    fn rearrange_during_drag(&mut self, window: &I::Window);

    /// While set, window hierarchy changes do not end the overview.
    fn set_ignore_window_hierarchy_changes(&mut self, ignore: bool);
}
