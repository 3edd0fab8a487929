use smithay::utils::{Logical, Point};
use tracing::debug;

use super::WindowDragController;
use crate::overview::item::OverviewItem;
use crate::overview::session::OverviewSession;
use crate::overview::shell::Shell;
use crate::overview::split_view::snap::{snap_position_from_edges, EdgeSnapThresholds};
use crate::overview::split_view::{SnapPosition, SplitViewController, SplitViewState};

impl<I: OverviewItem> WindowDragController<I> {
    /// Returns where the dragged window would snap if released at `location`.
    pub(super) fn snap_position_for<S: Shell<I>>(
        &self,
        shell: &S,
        location: Point<f64, Logical>,
    ) -> SnapPosition {
        debug_assert!(self.should_allow_split_view);

        let Some(item) = &self.item else {
            return SnapPosition::None;
        };
        let Some(root) = self.root_being_dragged_in(shell) else {
            return SnapPosition::None;
        };
        let area = self.work_area_of_display_being_dragged_in(shell);
        let split_view = shell.split_view(&root);

        if !split_view.can_snap_window(&item.window) {
            return SnapPosition::None;
        }

        let is_horizontal = shell.is_layout_horizontal();
        let is_primary = shell.is_screen_orientation_primary();

        if split_view.in_split_view_mode() {
            // Keep the snapped side while the drag stays on its side of the divider.
            let position = if is_horizontal {
                (location.x - f64::from(area.loc.x)).round() as i32
            } else {
                (location.y - f64::from(area.loc.y)).round() as i32
            };
            let default = split_view.default_snap_position();
            let default_is_left_or_top = default.is_physical_left_or_top(is_primary);
            let drag_is_left_or_top = position < split_view.divider_position();
            if default_is_left_or_top == drag_is_left_or_top {
                return default;
            }
        }

        let ratio = self.options.highlight_primary_axis_ratio;
        let padding = self.options.highlight_edge_padding;
        let thresholds = EdgeSnapThresholds {
            snap_distance_from_edge: self.options.snap_distance_from_edge,
            minimum_drag_distance: self.options.minimum_drag_to_snap_distance,
            horizontal_edge_inset: f64::from(area.size.w) * ratio + padding,
            vertical_edge_inset: f64::from(area.size.h) * ratio + padding,
        };

        snap_position_from_edges(
            location.to_i32_round(),
            self.initial_event_location.to_i32_round(),
            area,
            is_horizontal,
            is_primary,
            &thresholds,
        )
    }

    /// Snaps the dragged window in the split view of `root` and hands it off.
    ///
    /// # Panics
    ///
    /// Panics if `position` is [`SnapPosition::None`] or if the divider is animating.
    pub(super) fn snap_window<S: Shell<I>>(
        &mut self,
        shell: &mut S,
        root: &I::Root,
        position: SnapPosition,
    ) {
        assert_ne!(position, SnapPosition::None, "snapping needs a position");
        let primary = shell.primary_root();
        assert!(
            !shell.split_view(&primary).is_divider_animating(),
            "cannot snap while the split view divider is animating"
        );

        let Some(item) = self.item.take() else {
            return;
        };
        debug!("snapping {:?} to {position:?}", item.window);

        // The split view takes the window out of the overview.
        shell
            .split_view_mut(root)
            .snap_window(&item.window, position, true);
        shell.activate_window(&item.window);
    }

    /// Handles a click on the item.
    pub(super) fn activate_dragged_window<S: Shell<I>>(&mut self, shell: &mut S) {
        let Some((window, root)) = self.dragged() else {
            return;
        };

        let split_view = shell.split_view(&root);
        let state = split_view.state();
        let can_snap = split_view.can_snap_window(&window);

        if !self.should_allow_split_view || state == SplitViewState::NoSnap {
            if let Some(session) = self.session_mut(shell) {
                session.select_window(&window);
            }
        } else if can_snap {
            // Fill the empty side of the split view.
            let position = if state == SplitViewState::LeftSnapped {
                SnapPosition::Right
            } else {
                SnapPosition::Left
            };
            self.snap_window(shell, &root, position);
        } else {
            shell.split_view_mut(&root).end_split_view();
            if let Some(session) = self.session_mut(shell) {
                session.select_window(&window);
            }
            shell.show_app_cannot_snap_toast();
        }
    }
}
