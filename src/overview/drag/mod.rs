//! Dragging window items around in the overview.
//!
//! A drag starts out undecided. Once the pointer moves far enough, it turns into one of two
//! gestures:
//!
//! - *Drag to close*: a mostly vertical touch drag. The item follows the finger vertically and
//!   fades out, and releasing it far enough from where it started closes the window. Dragging it
//!   onto the desks bar turns it into a normal drag.
//! - *Normal drag*: the item follows the pointer freely. It can be dropped onto a split view snap
//!   area, onto a desk in the desks bar (shrinking as it approaches the bar), onto another display,
//!   or back into the grid.
//!
//! Releasing without ever moving far enough counts as a click and activates the window.
//!
//! The controller lives for a single gesture. It never owns the dragged item: it remembers the
//! item's window and display root, and looks the item up through the overview session whenever
//! it needs it. As soon as the item is handed off (snapped, moved to a desk or to another
//! display), the controller forgets it.

use std::fmt;
use std::rc::Rc;

use smithay::utils::{Logical, Point, Rectangle, Size};
use tracing::{debug, trace, warn};

use super::grid::OverviewGrid;
use super::item::OverviewItem;
use super::options::DragOptions;
use super::session::OverviewSession;
use super::shell::{PresentationTimeRecorder, Shell};
use super::split_view::{SnapPosition, SplitViewController};
use crate::utils::{center, enlarge};

mod complete;
mod normal;
mod snap;
mod to_close;
mod types;

#[cfg(test)]
mod tests;

pub use self::types::{DragBehavior, DragResult};
use self::types::DesksBarDragGeometry;

/// Histogram for the presentation time of drag updates.
const DRAG_HISTOGRAM: &str = "Ash.Overview.WindowDrag.PresentationTime.TabletMode";
/// Histogram for the worst presentation time during a drag.
const DRAG_MAX_LATENCY_HISTOGRAM: &str =
    "Ash.Overview.WindowDrag.PresentationTime.MaxLatency.TabletMode";

type GridOf<S, I> = <<S as Shell<I>>::Session as OverviewSession<I>>::Grid;

/// Handles to look the dragged item up with.
struct DraggedItem<I: OverviewItem> {
    window: I::Window,
    root: I::Root,
}

impl<I: OverviewItem> fmt::Debug for DraggedItem<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DraggedItem")
            .field("window", &self.window)
            .field("root", &self.root)
            .finish()
    }
}

/// Controller for a single overview window drag gesture.
pub struct WindowDragController<I: OverviewItem> {
    /// The item being dragged.
    ///
    /// Cleared when the gesture ends or when the item is handed off elsewhere.
    item: Option<DraggedItem<I>>,
    behavior: DragBehavior,
    /// Whether the gesture moved past the minimum drag distance.
    did_move: bool,
    /// Where the gesture started, in screen coordinates.
    initial_event_location: Point<f64, Logical>,
    /// Center of the item target bounds when the gesture started.
    initial_centerpoint: Point<f64, Logical>,
    original_opacity: f64,
    /// Item size right after scaling it up at the start of a normal drag.
    original_scaled_size: Size<f64, Logical>,
    /// Item size when it is right over the desks bar.
    on_desks_bar_item_size: Size<f64, Logical>,
    /// Desks bar geometry cached at the start of a normal drag.
    desks_bar: Option<DesksBarDragGeometry>,
    /// Where the item would snap if released right now.
    snap_position: SnapPosition,
    /// Number of displays when the gesture started.
    display_count: usize,
    is_touch_dragging: bool,
    should_allow_split_view: bool,
    virtual_desks_bar_enabled: bool,
    /// Whether the overview session is still around; see [`Self::reset_overview_session()`].
    has_overview_session: bool,
    presentation_time_recorder: Option<Box<dyn PresentationTimeRecorder>>,
    options: Rc<DragOptions>,
}

impl<I: OverviewItem> fmt::Debug for WindowDragController<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowDragController")
            .field("item", &self.item)
            .field("behavior", &self.behavior)
            .field("did_move", &self.did_move)
            .field("initial_event_location", &self.initial_event_location)
            .field("initial_centerpoint", &self.initial_centerpoint)
            .field("snap_position", &self.snap_position)
            .field("is_touch_dragging", &self.is_touch_dragging)
            .field("should_allow_split_view", &self.should_allow_split_view)
            .field("virtual_desks_bar_enabled", &self.virtual_desks_bar_enabled)
            .finish_non_exhaustive()
    }
}

impl<I: OverviewItem> WindowDragController<I> {
    /// Creates a controller for dragging `item`.
    ///
    /// Split view and desks bar availability are decided here, once for the whole gesture.
    pub fn new<S: Shell<I>>(
        shell: &S,
        item: &I,
        is_touch_dragging: bool,
        options: Rc<DragOptions>,
    ) -> Self {
        debug_assert!(!shell.is_overview_start_animation_running());
        debug_assert!(!shell.split_view(&shell.primary_root()).is_divider_animating());

        let virtual_desks_bar_enabled = shell.should_desks_bar_be_created()
            && shell
                .overview_session()
                .and_then(|session| session.grid_with_root(item.root()))
                .is_some_and(|grid| grid.is_desks_bar_view_active());

        Self {
            item: Some(DraggedItem {
                window: item.window().clone(),
                root: item.root().clone(),
            }),
            behavior: DragBehavior::NoDrag,
            did_move: false,
            initial_event_location: Point::from((0., 0.)),
            initial_centerpoint: Point::from((0., 0.)),
            original_opacity: 1.,
            original_scaled_size: Size::from((0., 0.)),
            on_desks_bar_item_size: item_size_when_on_desks_bar(shell, item, &options),
            desks_bar: None,
            snap_position: SnapPosition::None,
            display_count: shell.root_window_count(),
            is_touch_dragging,
            should_allow_split_view: shell.should_allow_split_view(),
            virtual_desks_bar_enabled,
            has_overview_session: true,
            presentation_time_recorder: None,
            options,
        }
    }

    pub fn behavior(&self) -> DragBehavior {
        self.behavior
    }

    pub fn did_move(&self) -> bool {
        self.did_move
    }

    pub fn is_touch_dragging(&self) -> bool {
        self.is_touch_dragging
    }

    /// Window of the item being dragged, if the controller still refers to one.
    pub fn dragged_window(&self) -> Option<&I::Window> {
        self.item.as_ref().map(|item| &item.window)
    }

    /// Where the item would snap if released right now.
    pub fn snap_position(&self) -> SnapPosition {
        self.snap_position
    }

    /// Starts the gesture at `location`.
    ///
    /// Nothing about the item changes yet, so that a click leaves it untouched.
    pub fn initiate_drag<S: Shell<I>>(&mut self, shell: &mut S, location: Point<f64, Logical>) {
        self.initial_event_location = location;

        let mut root = None;
        if let Some(item) = self.item(shell) {
            self.initial_centerpoint = center(item.target_bounds());
            self.original_opacity = item.opacity();
            root = Some(item.root().clone());
        } else {
            warn!("initiating an overview drag for an item that is gone");
        }

        self.behavior = DragBehavior::Undefined;
        shell.pause_occlusion_tracker();

        debug_assert!(self.presentation_time_recorder.is_none());
        if let Some(root) = root {
            self.presentation_time_recorder = shell.create_presentation_time_recorder(
                &root,
                DRAG_HISTOGRAM,
                DRAG_MAX_LATENCY_HISTOGRAM,
            );
        }

        debug!(
            "initiated overview drag at {location:?}, touch: {}",
            self.is_touch_dragging
        );
    }

    /// Moves the gesture to `location`.
    pub fn drag<S: Shell<I>>(&mut self, shell: &mut S, location: Point<f64, Logical>) {
        let _span = tracy_client::span!("WindowDragController::drag");

        if self.item.is_none() || self.behavior == DragBehavior::NoDrag {
            return;
        }

        if !self.did_move {
            let distance = location - self.initial_event_location;
            // Don't start dragging until moving far enough in either direction.
            if distance.x.abs() < self.options.minimum_drag_distance
                && distance.y.abs() < self.options.minimum_drag_distance
            {
                return;
            }

            if self.is_touch_dragging && distance.x.abs() < distance.y.abs() {
                self.start_drag_to_close_mode(shell);
            } else if self.should_allow_split_view || self.virtual_desks_bar_enabled {
                self.start_normal_drag_mode(shell, location);
            } else {
                trace!("overview item is not draggable here");
                return;
            }
        }

        match self.behavior {
            DragBehavior::DragToClose => self.continue_drag_to_close(shell, location),
            DragBehavior::NormalDrag => self.continue_normal_drag(shell, location),
            DragBehavior::NoDrag | DragBehavior::Undefined => (),
        }

        if let Some(recorder) = &mut self.presentation_time_recorder {
            recorder.request_next();
        }
    }

    /// Forgets the overview session, which is shutting down.
    ///
    /// Any later calls that would need the session do nothing instead.
    pub fn reset_overview_session(&mut self) {
        debug!("overview session went away during a drag");
        self.has_overview_session = false;
    }

    /// Ends the gesture, leaving the controller without an item.
    fn finish<S: Shell<I>>(&mut self, shell: &mut S) {
        self.did_move = false;
        self.item = None;
        self.behavior = DragBehavior::NoDrag;
        self.desks_bar = None;
        // Wait a bit longer than the item animations before tracking occlusion again.
        shell.unpause_occlusion_tracker(self.options.occlusion_pause_duration);
        self.presentation_time_recorder = None;
    }

    fn dragged(&self) -> Option<(I::Window, I::Root)> {
        self.item
            .as_ref()
            .map(|item| (item.window.clone(), item.root.clone()))
    }

    fn session<'a, S: Shell<I>>(&self, shell: &'a S) -> Option<&'a S::Session> {
        if !self.has_overview_session {
            return None;
        }
        shell.overview_session()
    }

    fn session_mut<'a, S: Shell<I>>(&self, shell: &'a mut S) -> Option<&'a mut S::Session> {
        if !self.has_overview_session {
            return None;
        }
        shell.overview_session_mut()
    }

    /// Grid that the dragged item is in.
    fn grid_mut<'a, S: Shell<I>>(&self, shell: &'a mut S) -> Option<&'a mut GridOf<S, I>>
    where
        S::Session: 'a,
    {
        let item = self.item.as_ref()?;
        self.session_mut(shell)?.grid_with_root_mut(&item.root)
    }

    fn item<'a, S: Shell<I>>(&self, shell: &'a S) -> Option<&'a I> {
        let item = self.item.as_ref()?;
        self.session(shell)?
            .grid_with_root(&item.root)?
            .item_containing(&item.window)
    }

    fn item_mut<'a, S: Shell<I>>(&self, shell: &'a mut S) -> Option<&'a mut I> {
        let item = self.item.as_ref()?;
        self.session_mut(shell)?
            .grid_with_root_mut(&item.root)?
            .item_containing_mut(&item.window)
    }

    /// Root of the display the drag is currently over.
    ///
    /// Touch drags stay on the display of the item, mouse drags follow the cursor.
    fn root_being_dragged_in<S: Shell<I>>(&self, shell: &S) -> Option<I::Root> {
        if self.is_touch_dragging {
            self.item.as_ref().map(|item| item.root.clone())
        } else {
            Some(shell.cursor_root())
        }
    }

    fn work_area_of_display_being_dragged_in<S: Shell<I>>(
        &self,
        shell: &S,
    ) -> Rectangle<i32, Logical> {
        match &self.item {
            Some(item) if self.is_touch_dragging => {
                shell.work_area_for_active_desk_container(&item.root)
            }
            _ => shell.cursor_display_work_area(),
        }
    }

    #[cfg(test)]
    pub(crate) fn verify_invariants(&self) {
        match self.behavior {
            DragBehavior::NoDrag => {
                assert!(!self.did_move);
                assert!(self.desks_bar.is_none());
            }
            DragBehavior::Undefined => {
                assert!(self.item.is_some());
                assert!(!self.did_move);
            }
            DragBehavior::DragToClose => {
                assert!(self.item.is_some());
                assert!(self.did_move);
                assert!(self.is_touch_dragging);
            }
            DragBehavior::NormalDrag => {
                assert!(self.item.is_some());
                assert!(self.did_move);
                assert!(self.should_allow_split_view || self.virtual_desks_bar_enabled);
            }
        }

        if self.desks_bar.is_some() {
            assert!(self.virtual_desks_bar_enabled);
            assert_eq!(self.behavior, DragBehavior::NormalDrag);
        }

        if !self.should_allow_split_view {
            assert_eq!(self.snap_position, SnapPosition::None);
        }
    }
}

/// Returns the size of the item when it is right over the desks bar.
///
/// This is the window scaled down to fit a desk mini view, plus the margins and the header that
/// the overview adds around window contents.
fn item_size_when_on_desks_bar<I: OverviewItem, S: Shell<I>>(
    shell: &S,
    item: &I,
    options: &DragOptions,
) -> Size<f64, Logical> {
    let desks_bar = shell
        .overview_session()
        .and_then(|session| session.grid_with_root(item.root()))
        .and_then(|grid| grid.desks_bar_bounds());
    let Some(desks_bar) = desks_bar else {
        return Size::from((0., 0.));
    };

    let root_height = shell.root_bounds(item.root()).size.h;
    if root_height <= 0. {
        return Size::from((0., 0.));
    }

    let scale = desks_bar.size.h / root_height;
    let window_size = item.window_size();
    let scaled = Size::from((window_size.w * scale, window_size.h * scale));
    enlarge(
        scaled,
        2. * options.window_margin,
        2. * options.window_margin + options.header_height,
    )
}
