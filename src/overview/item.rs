//! Window items shown in the overview.

use std::fmt;

use smithay::utils::{Logical, Rectangle, Size};

/// How an item should get to new bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverviewAnimation {
    /// Jump to the new bounds right away.
    None,
    /// Animate like items do when the overview lays them out.
    LayoutItemsInOverview,
}

/// Representation of a window inside an overview grid.
///
/// Items are owned by their grid. Whoever drags an item only ever refers to it through its
/// window and display root, and has to look it up again every time, since the item can go away
/// at any point (for example when its window gets snapped or moved to another desk).
pub trait OverviewItem {
    /// Handle of the underlying window.
    type Window: PartialEq + fmt::Debug + Clone;
    /// Handle of a display root window.
    type Root: PartialEq + fmt::Debug + Clone;

    /// The window this item represents.
    fn window(&self) -> &Self::Window;

    /// Root of the display the item is shown on. Its grid is the grid of this root.
    fn root(&self) -> &Self::Root;

    /// Size of the underlying window outside of the overview.
    fn window_size(&self) -> Size<f64, Logical>;

    /// Bounds the item is at or animating towards, in screen coordinates.
    ///
    /// These include the margins and the header that the overview draws around the window.
    fn target_bounds(&self) -> Rectangle<f64, Logical>;
    fn set_bounds(&mut self, bounds: Rectangle<f64, Logical>, animation: OverviewAnimation);

    fn opacity(&self) -> f64;
    fn set_opacity(&mut self, opacity: f64);

    /// Scales the item up slightly to show that it was picked up.
    fn scale_up_selected_item(&mut self, animation: OverviewAnimation);

    /// Plays the close animation and closes the window.
    fn animate_and_close_window(&mut self, up: bool);

    /// Updates the previews of the item shown on other displays during a drag.
    fn update_phantoms_for_dragging(&mut self, is_touch_dragging: bool);
    fn destroy_phantoms_for_dragging(&mut self);

    fn hide_cannot_snap_warning(&mut self);
    fn update_cannot_snap_warning_visibility(&mut self);

    /// Whether to restack the window once the current position animation ends.
    fn set_should_restack_on_animation_end(&mut self, value: bool);
}
