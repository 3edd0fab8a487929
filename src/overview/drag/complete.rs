use smithay::utils::{Logical, Point};
use tracing::{debug, warn};

use super::{DragBehavior, DragResult, DraggedItem, WindowDragController};
use crate::overview::grid::{AddItemFlags, OverviewGrid};
use crate::overview::item::{OverviewAnimation, OverviewItem};
use crate::overview::session::OverviewSession;
use crate::overview::shell::Shell;
use crate::overview::split_view::{SnapPosition, SplitViewController};

impl<I: OverviewItem> WindowDragController<I> {
    /// Ends the gesture with a release at `location`.
    ///
    /// # Panics
    ///
    /// Panics if the gesture was never initiated.
    pub fn complete_drag<S: Shell<I>>(
        &mut self,
        shell: &mut S,
        location: Point<f64, Logical>,
    ) -> DragResult {
        let _span = tracy_client::span!("WindowDragController::complete_drag");

        let result = match self.behavior {
            DragBehavior::NoDrag => unreachable!("completing an overview drag that never started"),
            DragBehavior::Undefined => {
                self.activate_dragged_window(shell);
                DragResult::NeverDisambiguated
            }
            DragBehavior::NormalDrag => self.complete_normal_drag(shell, location),
            DragBehavior::DragToClose => self.complete_drag_to_close(shell, location),
        };

        debug!("overview drag completed at {location:?}: {result:?}");
        self.finish(shell);
        result
    }

    /// Ends the gesture with a fling.
    ///
    /// A fast enough vertical fling closes the window, anything else is a regular release.
    pub fn fling<S: Shell<I>>(
        &mut self,
        shell: &mut S,
        location: Point<f64, Logical>,
        velocity_x: f64,
        velocity_y: f64,
    ) -> DragResult {
        let closes = matches!(
            self.behavior,
            DragBehavior::DragToClose | DragBehavior::Undefined
        ) && velocity_y.abs() > self.options.fling_to_close_velocity;

        if !closes {
            return self.complete_drag(shell, location);
        }

        if self.behavior == DragBehavior::DragToClose {
            if let Some(grid) = self.grid_mut(shell) {
                grid.end_nudge();
            }
        }

        let up = location.y - self.initial_event_location.y < 0.;
        if let Some(item) = self.item_mut(shell) {
            item.animate_and_close_window(up);
        }

        debug!("overview drag flung with velocity ({velocity_x}, {velocity_y}), closing");
        self.finish(shell);
        DragResult::SuccessfulDragToClose
    }

    /// Cancels the gesture, putting the item back where it was.
    pub fn reset_gesture<S: Shell<I>>(&mut self, shell: &mut S) {
        if self.behavior == DragBehavior::DragToClose {
            if let Some(grid) = self.grid_mut(shell) {
                grid.end_nudge();
            }
            if let Some(item) = self.item_mut(shell) {
                item.set_opacity(self.original_opacity);
            }
        }

        if self.behavior == DragBehavior::NormalDrag {
            if self.options.multi_display_drag {
                shell.hide_shared_edge_indicator();
                if let Some(item) = self.item_mut(shell) {
                    item.destroy_phantoms_for_dragging();
                }
            }

            if let Some(session) = self.session_mut(shell) {
                session.remove_drop_targets();
            }

            if self.should_allow_split_view {
                let primary = shell.primary_root();
                shell.split_view_mut(&primary).on_window_drag_canceled();
                if let Some(session) = self.session_mut(shell) {
                    session.reset_split_view_drag_indicators_window_dragging_states();
                }
                if let Some(item) = self.item_mut(shell) {
                    item.update_cannot_snap_warning_visibility();
                }
            }
        }

        if let Some(session) = self.session_mut(shell) {
            session.position_windows(true);
        }

        debug!("overview drag reset");
        self.finish(shell);
    }

    fn complete_normal_drag<S: Shell<I>>(
        &mut self,
        shell: &mut S,
        location: Point<f64, Logical>,
    ) -> DragResult {
        debug_assert_eq!(self.behavior, DragBehavior::NormalDrag);

        let Some((window, root)) = self.dragged() else {
            return DragResult::DropIntoOverview;
        };

        let result = self.drop_normal_drag(shell, location, &window);

        // Snapping can end the overview.
        if shell.in_overview_session() {
            if let Some(grid) = self
                .session_mut(shell)
                .and_then(|session| session.grid_with_root_mut(&root))
            {
                grid.maybe_update_desks_widget_bounds();
            }
        }

        result
    }

    fn drop_normal_drag<S: Shell<I>>(
        &mut self,
        shell: &mut S,
        location: Point<f64, Logical>,
        window: &I::Window,
    ) -> DragResult {
        if self.options.multi_display_drag {
            shell.hide_shared_edge_indicator();
            if let Some(item) = self.item_mut(shell) {
                item.destroy_phantoms_for_dragging();
            }
        }

        if let Some(session) = self.session_mut(shell) {
            session.remove_drop_targets();
        }

        let rounded: Point<i32, Logical> = location.to_i32_round();

        if self.should_allow_split_view {
            let primary = shell.primary_root();
            shell
                .split_view_mut(&primary)
                .on_window_drag_ended(window, self.snap_position, rounded);

            // The split view may have changed, so refresh the indicators before hiding them.
            self.update_drag_indicators_and_overview_grid(shell, location);
            if let Some(session) = self.session_mut(shell) {
                session.reset_split_view_drag_indicators_window_dragging_states();
            }
            if let Some(item) = self.item_mut(shell) {
                item.update_cannot_snap_warning_visibility();
            }
        }

        if self.virtual_desks_bar_enabled {
            if let Some(item) = self.item_mut(shell) {
                item.set_opacity(self.original_opacity);
            }

            let dropped = self
                .grid_mut(shell)
                .is_some_and(|grid| grid.maybe_drop_item_on_desk_mini_view(rounded, window));
            if dropped {
                // The item went away with its window.
                self.item = None;
                if let Some(session) = self.session_mut(shell) {
                    session.position_windows(true);
                }
                return DragResult::DragToDesk;
            }
        }

        if self.should_allow_split_view && self.snap_position != SnapPosition::None {
            if let Some(root) = self.root_being_dragged_in(shell) {
                self.snap_window(shell, &root, self.snap_position);
            }
            if let Some(session) = self.session_mut(shell) {
                session.position_windows(true);
            }
            return DragResult::Snap;
        }

        if self.options.multi_display_drag {
            let target = self.root_being_dragged_in(shell);
            let current = self.item.as_ref().map(|item| item.root.clone());
            if let Some(target) = target.filter(|target| Some(target) != current.as_ref()) {
                self.move_item_to_display(shell, &target);
            }
        }

        if let Some(item) = self.item_mut(shell) {
            item.set_should_restack_on_animation_end(true);
        }
        if let Some(session) = self.session_mut(shell) {
            session.position_windows(true);
        }
        DragResult::DropIntoOverview
    }

    /// Moves the dragged window to the display of `target` and adopts its new item.
    fn move_item_to_display<S: Shell<I>>(&mut self, shell: &mut S, target: &I::Root) {
        let Some(dragged) = self.item.take() else {
            return;
        };
        debug!("moving {:?} to display {target:?}", dragged.window);

        let Some(session) = self.session_mut(shell) else {
            return;
        };
        let Some(grid) = session.grid_with_root_mut(&dragged.root) else {
            warn!("grid of the dragged item is gone");
            return;
        };
        let Some(bounds) = grid
            .remove_item(&dragged.window, false, false)
            .map(|item| item.target_bounds())
        else {
            warn!("dragged overview item is gone");
            return;
        };

        // Moving the window would otherwise end the overview.
        session.set_ignore_window_hierarchy_changes(true);
        shell.move_window_to_display(&dragged.window, target);

        let Some(session) = self.session_mut(shell) else {
            return;
        };
        session.set_ignore_window_hierarchy_changes(false);

        let Some(grid) = session.grid_with_root_mut(target) else {
            warn!("no overview grid on display {target:?}");
            return;
        };
        grid.add_item_in_mru_order(&dragged.window, AddItemFlags::empty());

        // Start the new item off where the old one was dropped.
        let Some(item) = grid.item_containing_mut(&dragged.window) else {
            return;
        };
        item.set_bounds(bounds, OverviewAnimation::None);

        self.item = Some(DraggedItem {
            window: dragged.window,
            root: target.clone(),
        });
    }
}
