use smithay::utils::{Logical, Point};
use tracing::debug;

use super::{DragBehavior, DragResult, WindowDragController};
use crate::overview::grid::OverviewGrid;
use crate::overview::item::{OverviewAnimation, OverviewItem};
use crate::overview::session::OverviewSession;
use crate::overview::shell::Shell;

impl<I: OverviewItem> WindowDragController<I> {
    pub(super) fn start_drag_to_close_mode<S: Shell<I>>(&mut self, shell: &mut S) {
        debug_assert!(self.is_touch_dragging);

        self.did_move = true;
        self.behavior = DragBehavior::DragToClose;
        debug!("overview drag switched to drag to close");

        let Some((window, _)) = self.dragged() else {
            return;
        };
        if let Some(grid) = self.grid_mut(shell) {
            grid.start_nudge(&window);
        }
    }

    pub(super) fn continue_drag_to_close<S: Shell<I>>(
        &mut self,
        shell: &mut S,
        location: Point<f64, Logical>,
    ) {
        debug_assert_eq!(self.behavior, DragBehavior::DragToClose);

        let Some((window, _)) = self.dragged() else {
            return;
        };

        // Dragging onto the desks bar means the user wants to move the window, not close it.
        if self.virtual_desks_bar_enabled
            && self.grid_mut(shell).is_some_and(|grid| {
                grid.intersects_with_desks_bar(location.to_i32_round(), false, false)
            })
        {
            if let Some(grid) = self.grid_mut(shell) {
                grid.end_nudge();
            }
            if let Some(item) = self.item_mut(shell) {
                item.set_opacity(self.original_opacity);
            }
            debug!("drag to close reached the desks bar");
            self.start_normal_drag_mode(shell, location);
            self.continue_normal_drag(shell, location);
            return;
        }

        let centerpoint = location - (self.initial_event_location - self.initial_centerpoint);

        // Neighbors move away proportionally to the distance, past the close threshold too.
        let distance = (location.y - self.initial_event_location.y).abs();
        let value = distance / self.options.drag_to_close_distance;
        if let Some(grid) = self.grid_mut(shell) {
            grid.update_nudge(&window, value);
        }

        let value = value.clamp(0., 1.);
        let min_opacity = self.options.item_min_opacity;
        let mut opacity = self.original_opacity;
        if opacity > min_opacity {
            opacity = self.original_opacity - value * (self.original_opacity - min_opacity);
        }

        let Some(item) = self.item_mut(shell) else {
            return;
        };
        item.set_opacity(opacity);

        let mut bounds = item.target_bounds();
        bounds.loc.y = centerpoint.y - bounds.size.h / 2.;
        item.set_bounds(bounds, OverviewAnimation::None);
    }

    pub(super) fn complete_drag_to_close<S: Shell<I>>(
        &mut self,
        shell: &mut S,
        location: Point<f64, Logical>,
    ) -> DragResult {
        debug_assert_eq!(self.behavior, DragBehavior::DragToClose);

        if let Some(grid) = self.grid_mut(shell) {
            grid.end_nudge();
        }

        let y_distance = location.y - self.initial_event_location.y;
        if y_distance.abs() > self.options.drag_to_close_distance {
            if let Some(item) = self.item_mut(shell) {
                item.animate_and_close_window(y_distance < 0.);
            }
            return DragResult::SuccessfulDragToClose;
        }

        if let Some(item) = self.item_mut(shell) {
            item.set_opacity(self.original_opacity);
        }
        if let Some(session) = self.session_mut(shell) {
            session.position_windows(true);
        }
        DragResult::CanceledDragToClose
    }
}
