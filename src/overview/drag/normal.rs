use smithay::utils::{Logical, Point, Size};
use tracing::{trace, warn};

use super::types::DesksBarDragGeometry;
use super::{DragBehavior, WindowDragController};
use crate::overview::grid::OverviewGrid;
use crate::overview::item::{OverviewAnimation, OverviewItem};
use crate::overview::session::OverviewSession;
use crate::overview::shell::Shell;
use crate::overview::split_view::{SnapPosition, SplitViewController, WindowDraggingState};
use crate::utils::{
    centered_at, enlarge, lerp_size, manhattan_distance_x, manhattan_distance_y, outset,
};

impl<I: OverviewItem> WindowDragController<I> {
    pub(super) fn start_normal_drag_mode<S: Shell<I>>(
        &mut self,
        shell: &mut S,
        location: Point<f64, Logical>,
    ) {
        debug_assert!(self.should_allow_split_view || self.virtual_desks_bar_enabled);

        self.did_move = true;
        self.behavior = DragBehavior::NormalDrag;
        trace!("overview drag switched to normal drag at {location:?}");

        let Some((window, root)) = self.dragged() else {
            return;
        };

        if self.options.multi_display_drag {
            shell.show_shared_edge_indicator(&root);
        }

        if let Some(item) = self.item_mut(shell) {
            item.scale_up_selected_item(OverviewAnimation::LayoutItemsInOverview);
            self.original_scaled_size = item.target_bounds().size;
        }

        if let Some(grid) = self.grid_mut(shell) {
            grid.add_drop_target_for_dragging_from_this_grid(&window);
        }

        if self.should_allow_split_view {
            let dragged_in = self.root_being_dragged_in(shell);
            if let Some(session) = self.session_mut(shell) {
                session.set_split_view_drag_indicators_dragged_window(Some(&window));
                if let Some(dragged_in) = &dragged_in {
                    session.update_split_view_drag_indicators_window_dragging_states(
                        dragged_in,
                        WindowDraggingState::compute(
                            true,
                            WindowDraggingState::FromOverview,
                            SnapPosition::None,
                        ),
                    );
                }
            }

            if let Some(item) = self.item_mut(shell) {
                item.hide_cannot_snap_warning();
            }

            let primary = shell.primary_root();
            shell.split_view_mut(&primary).on_window_drag_started(&window);
        }

        if self.virtual_desks_bar_enabled {
            // Size of the item without the margins and header.
            let margin = self.options.window_margin;
            let visible = enlarge(
                self.original_scaled_size,
                -2. * margin,
                -2. * margin - self.options.header_height,
            );

            let Some(grid) = self.grid_mut(shell) else {
                return;
            };
            grid.maybe_update_desks_widget_bounds();
            let Some(bounds) = grid.desks_bar_bounds() else {
                warn!("desks bar is enabled but the grid has no desks bar");
                return;
            };

            let shrink_bounds = outset(bounds, visible.w / 2., visible.h / 2.);
            self.desks_bar = Some(DesksBarDragGeometry {
                bounds,
                shrink_bounds,
                shrink_region_distance: bounds.loc - shrink_bounds.loc,
            });
        }
    }

    pub(super) fn continue_normal_drag<S: Shell<I>>(
        &mut self,
        shell: &mut S,
        location: Point<f64, Logical>,
    ) {
        debug_assert_eq!(self.behavior, DragBehavior::NormalDrag);

        let Some((window, _)) = self.dragged() else {
            return;
        };
        let Some(item) = self.item(shell) else {
            warn!("dragged overview item is gone");
            return;
        };
        let mut size = item.target_bounds().size;

        let mut centerpoint = location - (self.initial_event_location - self.initial_centerpoint);

        if self.virtual_desks_bar_enabled {
            // The item hangs below the pointer so that the window contents stay visible.
            centerpoint = location;
            centerpoint.y -= (self.options.window_margin + self.options.header_height) / 2.;

            match self.desks_bar {
                Some(geometry) if geometry.shrink_bounds.contains(location) => {
                    if let Some(grid) = self.grid_mut(shell) {
                        grid.intersects_with_desks_bar(location.to_i32_round(), true, false);
                    }

                    let ratio = desks_bar_distance_ratio(centerpoint, &geometry);
                    size = self.item_size_for_desks_bar_proximity(1. - ratio);
                }
                _ => size = self.original_scaled_size,
            }
        }

        if self.should_allow_split_view {
            self.update_drag_indicators_and_overview_grid(shell, location);
            // The indicators can push the desks bar around.
            if let Some(grid) = self.grid_mut(shell) {
                grid.maybe_update_desks_widget_bounds();
            }
        }

        if self.options.multi_display_drag {
            self.maybe_add_drop_target_on_display_being_dragged_in(shell, &window);
        }

        if let Some(session) = self.session_mut(shell) {
            session.update_drop_targets_background_visibilities(&window, location);
        }

        let bounds = centered_at(size, centerpoint);
        let update_phantoms = self.options.multi_display_drag && self.display_count > 1;
        let is_touch_dragging = self.is_touch_dragging;
        if let Some(item) = self.item_mut(shell) {
            item.set_bounds(bounds, OverviewAnimation::None);
            if update_phantoms {
                item.update_phantoms_for_dragging(is_touch_dragging);
            }
        }
    }

    /// Recomputes the snap position and shows it in the split view indicators.
    pub(super) fn update_drag_indicators_and_overview_grid<S: Shell<I>>(
        &mut self,
        shell: &mut S,
        location: Point<f64, Logical>,
    ) {
        debug_assert!(self.should_allow_split_view);

        self.snap_position = self.snap_position_for(shell, location);

        let Some((window, _)) = self.dragged() else {
            return;
        };
        let Some(dragged_in) = self.root_being_dragged_in(shell) else {
            return;
        };
        let state = WindowDraggingState::compute(
            true,
            WindowDraggingState::FromOverview,
            self.snap_position,
        );
        if let Some(session) = self.session_mut(shell) {
            session.update_split_view_drag_indicators_window_dragging_states(&dragged_in, state);
            session.rearrange_during_drag(&window);
        }
    }

    /// Item size for a drag at the given proximity to the desks bar.
    ///
    /// At `0` the item has its picked up size, at `1` it is small enough to fit the desks bar.
    pub(super) fn item_size_for_desks_bar_proximity(&self, proximity: f64) -> Size<f64, Logical> {
        lerp_size(
            self.original_scaled_size,
            self.on_desks_bar_item_size,
            proximity,
        )
    }

    fn maybe_add_drop_target_on_display_being_dragged_in<S: Shell<I>>(
        &mut self,
        shell: &mut S,
        window: &I::Window,
    ) {
        let Some(dragged_in) = self.root_being_dragged_in(shell) else {
            return;
        };
        let should_allow_split_view = self.should_allow_split_view;
        let Some(grid) = self
            .session_mut(shell)
            .and_then(|session| session.grid_with_root_mut(&dragged_in))
        else {
            return;
        };

        // No drop target while previewing a snap there.
        if !grid.has_drop_target()
            && (!should_allow_split_view
                || grid.split_view_dragging_state().snap_position() == SnapPosition::None)
        {
            grid.add_drop_target_not_for_dragging_from_this_grid(window, true);
        }
    }
}

/// How far the item center is from the desks bar, relative to the shrink region.
///
/// `0` is on the desks bar and `1` is at the edge of the shrink region or further.
fn desks_bar_distance_ratio(
    centerpoint: Point<f64, Logical>,
    geometry: &DesksBarDragGeometry,
) -> f64 {
    let bounds = geometry.bounds;
    let ratio = if centerpoint.y < bounds.loc.y || centerpoint.y > bounds.loc.y + bounds.size.h {
        manhattan_distance_y(centerpoint.y, bounds) / geometry.shrink_region_distance.y
    } else if centerpoint.x < bounds.loc.x || centerpoint.x > bounds.loc.x + bounds.size.w {
        manhattan_distance_x(centerpoint.x, bounds) / geometry.shrink_region_distance.x
    } else {
        0.
    };

    if ratio.is_nan() {
        return 0.;
    }
    ratio.clamp(0., 1.)
}

#[cfg(test)]
mod tests {
    use smithay::utils::Rectangle;

    use super::*;

    fn geometry() -> DesksBarDragGeometry {
        let bounds = Rectangle::new(Point::from((0., 0.)), Size::from((1000., 100.)));
        let shrink_bounds = outset(bounds, 50., 40.);
        DesksBarDragGeometry {
            bounds,
            shrink_bounds,
            shrink_region_distance: bounds.loc - shrink_bounds.loc,
        }
    }

    #[test]
    fn distance_ratio() {
        let geometry = geometry();
        assert_eq!(desks_bar_distance_ratio(Point::from((500., 50.)), &geometry), 0.);
        assert_eq!(desks_bar_distance_ratio(Point::from((500., 120.)), &geometry), 0.5);
        assert_eq!(desks_bar_distance_ratio(Point::from((500., 400.)), &geometry), 1.);
        assert_eq!(desks_bar_distance_ratio(Point::from((1025., 50.)), &geometry), 0.5);
    }
}
