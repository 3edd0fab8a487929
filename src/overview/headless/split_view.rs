use std::mem;

use smithay::utils::{Logical, Point};

use super::events::{EventLog, ShellEvent};
use super::window::{DisplayId, HeadlessItem, HeadlessWindow};
use crate::overview::split_view::{SnapPosition, SplitViewController, SplitViewState};

/// Split view of a headless display.
#[derive(Debug)]
pub struct HeadlessSplitView {
    root: DisplayId,
    left: Option<HeadlessWindow>,
    right: Option<HeadlessWindow>,
    /// Side that got snapped first.
    default_snap_position: SnapPosition,
    divider_position: i32,
    divider_animating: bool,
    dragged_window: Option<u32>,
    /// Windows snapped since the shell last looked; they leave the overview.
    newly_snapped: Vec<HeadlessWindow>,
    events: EventLog,
}

impl HeadlessSplitView {
    pub(super) fn new(root: DisplayId, divider_position: i32, events: EventLog) -> Self {
        Self {
            root,
            left: None,
            right: None,
            default_snap_position: SnapPosition::None,
            divider_position,
            divider_animating: false,
            dragged_window: None,
            newly_snapped: Vec::new(),
            events,
        }
    }

    pub fn snapped_window(&self, position: SnapPosition) -> Option<&HeadlessWindow> {
        match position {
            SnapPosition::None => None,
            SnapPosition::Left => self.left.as_ref(),
            SnapPosition::Right => self.right.as_ref(),
        }
    }

    /// Position the window is snapped at, if any.
    pub fn position_of(&self, window: &HeadlessWindow) -> SnapPosition {
        if self.left.as_ref() == Some(window) {
            SnapPosition::Left
        } else if self.right.as_ref() == Some(window) {
            SnapPosition::Right
        } else {
            SnapPosition::None
        }
    }

    /// Window that the split view was told is being dragged.
    pub fn dragged_window(&self) -> Option<u32> {
        self.dragged_window
    }

    pub fn set_divider_animating(&mut self, animating: bool) {
        self.divider_animating = animating;
    }

    pub(super) fn set_divider_position(&mut self, position: i32) {
        self.divider_position = position;
    }

    pub(super) fn take_newly_snapped(&mut self) -> Vec<HeadlessWindow> {
        mem::take(&mut self.newly_snapped)
    }
}

impl SplitViewController<HeadlessItem> for HeadlessSplitView {
    fn state(&self) -> SplitViewState {
        match (&self.left, &self.right) {
            (None, None) => SplitViewState::NoSnap,
            (Some(_), None) => SplitViewState::LeftSnapped,
            (None, Some(_)) => SplitViewState::RightSnapped,
            (Some(_), Some(_)) => SplitViewState::BothSnapped,
        }
    }

    fn can_snap_window(&self, window: &HeadlessWindow) -> bool {
        window.can_snap()
    }

    fn default_snap_position(&self) -> SnapPosition {
        match self.state() {
            SplitViewState::NoSnap => SnapPosition::None,
            SplitViewState::LeftSnapped => SnapPosition::Left,
            SplitViewState::RightSnapped => SnapPosition::Right,
            SplitViewState::BothSnapped => self.default_snap_position,
        }
    }

    fn divider_position(&self) -> i32 {
        self.divider_position
    }

    fn is_divider_animating(&self) -> bool {
        self.divider_animating
    }

    fn on_window_drag_started(&mut self, window: &HeadlessWindow) {
        self.dragged_window = Some(window.id());
        self.events.push(ShellEvent::SplitViewDragStarted {
            display: self.root,
            window: window.id(),
        });
    }

    fn on_window_drag_ended(
        &mut self,
        window: &HeadlessWindow,
        snap_position: SnapPosition,
        _location: Point<i32, Logical>,
    ) {
        self.dragged_window = None;
        self.events.push(ShellEvent::SplitViewDragEnded {
            display: self.root,
            window: window.id(),
            snap_position,
        });
    }

    fn on_window_drag_canceled(&mut self) {
        self.dragged_window = None;
        self.events
            .push(ShellEvent::SplitViewDragCanceled { display: self.root });
    }

    fn snap_window(
        &mut self,
        window: &HeadlessWindow,
        snap_position: SnapPosition,
        _use_divider_spawn_animation: bool,
    ) {
        let slot = match snap_position {
            SnapPosition::None => return,
            SnapPosition::Left => &mut self.left,
            SnapPosition::Right => &mut self.right,
        };
        *slot = Some(window.clone());

        // A window can only be snapped on one side.
        let other = match snap_position.opposite() {
            SnapPosition::Left => &mut self.left,
            _ => &mut self.right,
        };
        if other.as_ref() == Some(window) {
            *other = None;
        }

        if self.state() != SplitViewState::BothSnapped {
            self.default_snap_position = snap_position;
        }

        self.newly_snapped.push(window.clone());
        self.events.push(ShellEvent::WindowSnapped {
            display: self.root,
            window: window.id(),
            position: snap_position,
        });
    }

    fn end_split_view(&mut self) {
        self.left = None;
        self.right = None;
        self.default_snap_position = SnapPosition::None;
        self.events
            .push(ShellEvent::SplitViewEnded { display: self.root });
    }
}
