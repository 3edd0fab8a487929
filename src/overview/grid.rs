//! Per-display overview grids.

use bitflags::bitflags;
use smithay::utils::{Logical, Point, Rectangle};

use super::item::OverviewItem;
use super::split_view::WindowDraggingState;

bitflags! {
    /// How a window added to a grid should be brought in.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct AddItemFlags: u8 {
        /// Lay out all items of the grid again.
        const REPOSITION = 1;
        /// Animate the relayout.
        const ANIMATE = 1 << 1;
        /// Restack the windows of the grid.
        const RESTACK = 1 << 2;
    }
}

/// Grid of overview items on a single display.
pub trait OverviewGrid<I: OverviewItem> {
    /// Root of the display this grid is on.
    fn root(&self) -> &I::Root;

    fn item_containing(&self, window: &I::Window) -> Option<&I>;
    fn item_containing_mut(&mut self, window: &I::Window) -> Option<&mut I>;

    /// Adds a window to the grid in most-recently-used order.
    fn add_item_in_mru_order(&mut self, window: &I::Window, flags: AddItemFlags);

    /// Removes the item for the window from the grid, returning it.
    ///
    /// `item_destroying` means the item goes away together with its window.
    fn remove_item(
        &mut self,
        window: &I::Window,
        item_destroying: bool,
        reposition: bool,
    ) -> Option<I>;

    /// Adds a placeholder where the item that is being dragged out of this grid used to be.
    fn add_drop_target_for_dragging_from_this_grid(&mut self, window: &I::Window);
    /// Adds a placeholder for an item being dragged in from another grid.
    fn add_drop_target_not_for_dragging_from_this_grid(
        &mut self,
        window: &I::Window,
        animate: bool,
    );
    fn has_drop_target(&self) -> bool;

    /// Starts nudging the neighbors of the item that is being dragged to close.
    fn start_nudge(&mut self, window: &I::Window);
    fn update_nudge(&mut self, window: &I::Window, value: f64);
    fn end_nudge(&mut self);

    /// Checks whether the point is over the desks bar.
    ///
    /// With `update_desks_bar_drag_details`, the desk mini views update their highlight for the
    /// point. With `for_drop`, the check is for an actual drop rather than hovering.
    fn intersects_with_desks_bar(
        &mut self,
        point: Point<i32, Logical>,
        update_desks_bar_drag_details: bool,
        for_drop: bool,
    ) -> bool;

    /// Moves the window to the desk whose mini view is under the point.
    ///
    /// Returns `true` if the window was moved, in which case its item has been removed.
    fn maybe_drop_item_on_desk_mini_view(
        &mut self,
        point: Point<i32, Logical>,
        window: &I::Window,
    ) -> bool;

    /// Relayouts the desks bar widget, for example after split view indicators pushed it.
    fn maybe_update_desks_widget_bounds(&mut self);

    /// Screen bounds of the desks bar view, if the grid has one.
    fn desks_bar_bounds(&self) -> Option<Rectangle<f64, Logical>>;
    fn is_desks_bar_view_active(&self) -> bool;

    /// Current state of the split view drag indicators on this grid.
    fn split_view_dragging_state(&self) -> WindowDraggingState;
}
