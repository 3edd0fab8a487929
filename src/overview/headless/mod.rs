//! In-memory shell for driving overview drags without a compositor.
//!
//! Displays, windows, split views and desks bars are plain data. Everything the drag controller
//! asks the shell to do is applied right away and recorded in an [`EventLog`], which makes the
//! shell usable both for tests and for replaying scripted gestures.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use smithay::utils::{Logical, Point, Rectangle, Size};
use tracing::debug;

use super::options::DragOptions;
use super::shell::{PresentationTimeRecorder, Shell};
use super::split_view::{SnapPosition, SplitViewController, SplitViewState};

mod events;
mod grid;
mod session;
mod split_view;
mod window;

pub use self::events::{EventLog, ShellEvent};
pub use self::grid::{DesksBar, DropTarget, HeadlessGrid};
pub use self::session::HeadlessSession;
pub use self::split_view::HeadlessSplitView;
pub use self::window::{DisplayId, HeadlessItem, HeadlessWindow};

#[derive(Debug)]
struct Display {
    bounds: Rectangle<i32, Logical>,
    work_area: Rectangle<i32, Logical>,
    /// Height and desk count of the desks bar, with the active desk.
    desks_bar: Option<(i32, usize, usize)>,
    split_view: HeadlessSplitView,
}

/// Counts presentation time measurements requested during a drag.
struct FrameCounter(Rc<Cell<usize>>);

impl PresentationTimeRecorder for FrameCounter {
    fn request_next(&mut self) {
        self.0.set(self.0.get() + 1);
    }
}

/// Shell with displays, windows and an optional overview, all in memory.
#[derive(Debug)]
pub struct HeadlessShell {
    displays: Vec<Display>,
    windows: Vec<HeadlessWindow>,
    session: Option<HeadlessSession>,
    cursor_display: DisplayId,
    layout_horizontal: bool,
    orientation_primary: bool,
    split_view_allowed: bool,
    desks_bar_created: bool,
    overview_start_animation_running: bool,
    occlusion_paused: bool,
    shared_edge_indicator: Option<DisplayId>,
    activated_window: Option<u32>,
    cannot_snap_toasts: usize,
    presentation_frames: Rc<Cell<usize>>,
    options: Rc<DragOptions>,
    events: EventLog,
}

impl HeadlessShell {
    /// Creates a landscape shell without displays, where split view is allowed.
    pub fn new(options: Rc<DragOptions>) -> Self {
        Self {
            displays: Vec::new(),
            windows: Vec::new(),
            session: None,
            cursor_display: DisplayId(0),
            layout_horizontal: true,
            orientation_primary: true,
            split_view_allowed: true,
            desks_bar_created: false,
            overview_start_animation_running: false,
            occlusion_paused: false,
            shared_edge_indicator: None,
            activated_window: None,
            cannot_snap_toasts: 0,
            presentation_frames: Rc::new(Cell::new(0)),
            options,
            events: EventLog::default(),
        }
    }

    pub fn add_display(
        &mut self,
        bounds: Rectangle<i32, Logical>,
        work_area: Rectangle<i32, Logical>,
    ) -> DisplayId {
        let id = DisplayId(self.displays.len());
        let divider = self.divider_position_for(work_area);
        self.displays.push(Display {
            bounds,
            work_area,
            desks_bar: None,
            split_view: HeadlessSplitView::new(id, divider, self.events.clone()),
        });
        id
    }

    pub fn display_count(&self) -> usize {
        self.displays.len()
    }

    /// Gives the display a desks bar along the top of its work area.
    pub fn set_desks_bar(&mut self, display: DisplayId, height: i32, desks: usize, active: usize) {
        self.displays[display.0].desks_bar = Some((height, desks, active));
    }

    pub fn add_window(
        &mut self,
        display: DisplayId,
        size: Size<f64, Logical>,
        can_snap: bool,
    ) -> HeadlessWindow {
        let id = self.windows.len() as u32;
        let window = HeadlessWindow::new(id, display, size, can_snap);
        if let Some((_, _, active)) = self.displays[display.0].desks_bar {
            window.set_desk(active);
        }
        self.windows.push(window.clone());
        window
    }

    pub fn windows(&self) -> &[HeadlessWindow] {
        &self.windows
    }

    pub fn window(&self, id: u32) -> Option<&HeadlessWindow> {
        self.windows.get(id as usize)
    }

    pub fn set_orientation(&mut self, layout_horizontal: bool, orientation_primary: bool) {
        self.layout_horizontal = layout_horizontal;
        self.orientation_primary = orientation_primary;
        for idx in 0..self.displays.len() {
            let divider = self.divider_position_for(self.displays[idx].work_area);
            self.displays[idx].split_view.set_divider_position(divider);
        }
    }

    pub fn set_split_view_allowed(&mut self, allowed: bool) {
        self.split_view_allowed = allowed;
    }

    pub fn set_desks_bar_created(&mut self, created: bool) {
        self.desks_bar_created = created;
    }

    pub fn set_overview_start_animation_running(&mut self, running: bool) {
        self.overview_start_animation_running = running;
    }

    pub fn set_cursor_display(&mut self, display: DisplayId) {
        self.cursor_display = display;
    }

    /// Moves the cursor, switching the cursor display if the location is on another display.
    pub fn move_cursor_to(&mut self, location: Point<f64, Logical>) {
        let display = self
            .displays
            .iter()
            .position(|display| display.bounds.to_f64().contains(location));
        if let Some(idx) = display {
            self.cursor_display = DisplayId(idx);
        }
    }

    /// Snaps a window outside of any drag.
    pub fn snap(&mut self, window: &HeadlessWindow, position: SnapPosition) {
        let display = window.display();
        self.displays[display.0]
            .split_view
            .snap_window(window, position, false);
        self.sync_overview();
    }

    pub fn split_view_of(&self, display: DisplayId) -> &HeadlessSplitView {
        &self.displays[display.0].split_view
    }

    pub fn split_view_of_mut(&mut self, display: DisplayId) -> &mut HeadlessSplitView {
        &mut self.displays[display.0].split_view
    }

    /// Enters the overview, with a grid on every display.
    ///
    /// Windows that are closed, snapped, or on inactive desks are left out.
    pub fn start_overview(&mut self) {
        let mut grids = Vec::with_capacity(self.displays.len());
        for (idx, display) in self.displays.iter().enumerate() {
            let root = DisplayId(idx);
            let mut area = display.work_area.to_f64();

            let mut desks_bar = None;
            let mut active_desk = 0;
            if let Some((height, desks, active)) =
                display.desks_bar.filter(|_| self.desks_bar_created)
            {
                let height = f64::from(height.clamp(0, display.work_area.size.h));
                let bounds = Rectangle::new(area.loc, Size::from((area.size.w, height)));
                desks_bar = Some(DesksBar::new(bounds, desks, active));
                active_desk = active;
                area.loc.y += height;
                area.size.h -= height;
            }

            let mut grid = HeadlessGrid::new(
                root,
                area,
                desks_bar,
                self.options.window_margin,
                self.options.header_height,
                self.events.clone(),
            );
            for window in &self.windows {
                if window.display() == root
                    && !window.is_closed()
                    && window.desk() == active_desk
                    && display.split_view.position_of(window) == SnapPosition::None
                {
                    grid.insert(window.clone());
                }
            }
            grids.push(grid);
        }

        debug!("entering headless overview with {} grids", grids.len());
        self.session = Some(HeadlessSession::new(grids, self.events.clone()));
    }

    pub fn end_overview(&mut self) {
        if self.session.take().is_some() {
            self.events.push(ShellEvent::OverviewEnded);
        }
    }

    /// The overview session, as long as nothing ended it.
    pub fn session(&self) -> Option<&HeadlessSession> {
        self.session.as_ref().filter(|_| !self.is_overview_ending())
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub fn is_occlusion_paused(&self) -> bool {
        self.occlusion_paused
    }

    pub fn shared_edge_indicator(&self) -> Option<DisplayId> {
        self.shared_edge_indicator
    }

    pub fn activated_window(&self) -> Option<u32> {
        self.activated_window
    }

    pub fn cannot_snap_toasts(&self) -> usize {
        self.cannot_snap_toasts
    }

    /// Number of presentation time measurements requested so far.
    pub fn presentation_frames(&self) -> usize {
        self.presentation_frames.get()
    }

    fn divider_position_for(&self, work_area: Rectangle<i32, Logical>) -> i32 {
        if self.layout_horizontal {
            work_area.size.w / 2
        } else {
            work_area.size.h / 2
        }
    }

    fn is_overview_ending(&self) -> bool {
        let Some(session) = &self.session else {
            return false;
        };
        session.selected.is_some()
            || self
                .displays
                .iter()
                .any(|display| display.split_view.state() == SplitViewState::BothSnapped)
    }

    /// Applies what happened since the session was last looked at.
    fn sync_overview(&mut self) {
        let Some(session) = &mut self.session else {
            return;
        };

        for display in &mut self.displays {
            for window in display.split_view.take_newly_snapped() {
                session.remove_window(&window);
            }
        }
        session.remove_closed_windows();

        if let Some(window) = session.selected.take() {
            self.activated_window = Some(window.id());
            self.events.push(ShellEvent::WindowActivated {
                window: window.id(),
            });
            self.end_overview();
            return;
        }

        let both_snapped = self
            .displays
            .iter()
            .any(|display| display.split_view.state() == SplitViewState::BothSnapped);
        if both_snapped {
            self.end_overview();
        }
    }
}

impl Shell<HeadlessItem> for HeadlessShell {
    type Session = HeadlessSession;
    type SplitView = HeadlessSplitView;

    fn overview_session(&self) -> Option<&HeadlessSession> {
        self.session()
    }

    fn overview_session_mut(&mut self) -> Option<&mut HeadlessSession> {
        self.sync_overview();
        self.session.as_mut()
    }

    fn is_overview_start_animation_running(&self) -> bool {
        self.overview_start_animation_running
    }

    fn split_view(&self, root: &DisplayId) -> &HeadlessSplitView {
        self.split_view_of(*root)
    }

    fn split_view_mut(&mut self, root: &DisplayId) -> &mut HeadlessSplitView {
        self.split_view_of_mut(*root)
    }

    fn primary_root(&self) -> DisplayId {
        DisplayId(0)
    }

    fn root_window_count(&self) -> usize {
        self.displays.len()
    }

    fn root_bounds(&self, root: &DisplayId) -> Rectangle<f64, Logical> {
        self.displays[root.0].bounds.to_f64()
    }

    fn cursor_root(&self) -> DisplayId {
        self.cursor_display
    }

    fn cursor_display_work_area(&self) -> Rectangle<i32, Logical> {
        self.displays[self.cursor_display.0].work_area
    }

    fn work_area_for_active_desk_container(&self, root: &DisplayId) -> Rectangle<i32, Logical> {
        self.displays[root.0].work_area
    }

    fn is_layout_horizontal(&self) -> bool {
        self.layout_horizontal
    }

    fn is_screen_orientation_primary(&self) -> bool {
        self.orientation_primary
    }

    fn should_allow_split_view(&self) -> bool {
        self.split_view_allowed
    }

    fn should_desks_bar_be_created(&self) -> bool {
        self.desks_bar_created
    }

    fn pause_occlusion_tracker(&mut self) {
        self.occlusion_paused = true;
        self.events.push(ShellEvent::OcclusionPaused);
    }

    fn unpause_occlusion_tracker(&mut self, delay: Duration) {
        self.occlusion_paused = false;
        self.events.push(ShellEvent::OcclusionUnpaused {
            delay_ms: delay.as_millis(),
        });
    }

    fn show_shared_edge_indicator(&mut self, root: &DisplayId) {
        self.shared_edge_indicator = Some(*root);
        self.events
            .push(ShellEvent::SharedEdgeIndicatorShown { display: *root });
    }

    fn hide_shared_edge_indicator(&mut self) {
        if self.shared_edge_indicator.take().is_some() {
            self.events.push(ShellEvent::SharedEdgeIndicatorHidden);
        }
    }

    fn activate_window(&mut self, window: &HeadlessWindow) {
        self.activated_window = Some(window.id());
        self.events.push(ShellEvent::WindowActivated {
            window: window.id(),
        });
    }

    fn move_window_to_display(&mut self, window: &HeadlessWindow, root: &DisplayId) {
        window.set_display(*root);
        self.events.push(ShellEvent::WindowMovedToDisplay {
            window: window.id(),
            display: *root,
        });

        let ignored = self
            .session
            .as_ref()
            .is_some_and(|session| session.ignores_window_hierarchy_changes());
        if !ignored {
            self.end_overview();
        }
    }

    fn show_app_cannot_snap_toast(&mut self) {
        self.cannot_snap_toasts += 1;
        self.events.push(ShellEvent::CannotSnapToastShown);
    }

    fn create_presentation_time_recorder(
        &mut self,
        _root: &DisplayId,
        _histogram: &'static str,
        _max_latency_histogram: &'static str,
    ) -> Option<Box<dyn PresentationTimeRecorder>> {
        Some(Box::new(FrameCounter(self.presentation_frames.clone())))
    }
}
