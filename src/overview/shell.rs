//! Shell-wide state the overview drag talks to.

use std::time::Duration;

use smithay::utils::{Logical, Rectangle};

use super::item::OverviewItem;
use super::session::OverviewSession;
use super::split_view::SplitViewController;

/// Measures the latency between drag updates and the frames presenting them.
pub trait PresentationTimeRecorder {
    /// Requests a measurement for the next presented frame.
    fn request_next(&mut self);
}

/// The desktop shell.
///
/// Gesture handlers get the shell passed into every call rather than keeping a reference to it.
pub trait Shell<I: OverviewItem> {
    type Session: OverviewSession<I>;
    type SplitView: SplitViewController<I>;

    /// The running overview session, if any.
    fn overview_session(&self) -> Option<&Self::Session>;
    fn overview_session_mut(&mut self) -> Option<&mut Self::Session>;

    fn in_overview_session(&self) -> bool {
        self.overview_session().is_some()
    }

    /// Whether the overview is still playing its enter animation.
    fn is_overview_start_animation_running(&self) -> bool {
        false
    }

    /// Split view of the display with the given root.
    fn split_view(&self, root: &I::Root) -> &Self::SplitView;
    fn split_view_mut(&mut self, root: &I::Root) -> &mut Self::SplitView;

    fn primary_root(&self) -> I::Root;
    fn root_window_count(&self) -> usize;
    fn root_bounds(&self, root: &I::Root) -> Rectangle<f64, Logical>;

    /// Root of the display under the cursor.
    fn cursor_root(&self) -> I::Root;
    /// Work area of the display under the cursor.
    fn cursor_display_work_area(&self) -> Rectangle<i32, Logical>;
    /// Work area of the display with the given root, for its active desk container.
    fn work_area_for_active_desk_container(&self, root: &I::Root) -> Rectangle<i32, Logical>;

    /// Whether split view lays windows out side by side (landscape) rather than stacked.
    fn is_layout_horizontal(&self) -> bool;
    fn is_screen_orientation_primary(&self) -> bool;

    /// Whether split view can be used at all, for example in tablet mode.
    fn should_allow_split_view(&self) -> bool;
    /// Whether virtual desks show a desks bar in the overview.
    fn should_desks_bar_be_created(&self) -> bool;

    fn pause_occlusion_tracker(&mut self);
    /// Resumes occlusion tracking after the delay.
    fn unpause_occlusion_tracker(&mut self, delay: Duration);

    /// Shows the indicator for display edges that windows can be dragged across.
    fn show_shared_edge_indicator(&mut self, root: &I::Root);
    fn hide_shared_edge_indicator(&mut self);

    fn activate_window(&mut self, window: &I::Window);
    fn move_window_to_display(&mut self, window: &I::Window, root: &I::Root);
    fn show_app_cannot_snap_toast(&mut self);

    fn create_presentation_time_recorder(
        &mut self,
        root: &I::Root,
        histogram: &'static str,
        max_latency_histogram: &'static str,
    ) -> Option<Box<dyn PresentationTimeRecorder>> {
        let _ = (root, histogram, max_latency_histogram);
        None
    }
}
