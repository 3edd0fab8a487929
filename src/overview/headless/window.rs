use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use smithay::utils::{Logical, Rectangle, Size};

use super::events::{EventLog, ShellEvent};
use crate::overview::item::{OverviewAnimation, OverviewItem};
use crate::utils::{center, centered_at};

/// Factor items grow by when they are picked up.
const SELECTED_ITEM_SCALE: f64 = 1.05;

/// Index of a display in the headless shell.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct DisplayId(pub usize);

impl fmt::Display for DisplayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "display {}", self.0)
    }
}

#[derive(Debug)]
struct WindowInner {
    id: u32,
    size: Size<f64, Logical>,
    can_snap: bool,
    display: Cell<DisplayId>,
    desk: Cell<usize>,
    closed: Cell<bool>,
}

/// Handle to a window of the headless shell.
///
/// Clones refer to the same window.
#[derive(Debug, Clone)]
pub struct HeadlessWindow(Rc<WindowInner>);

impl PartialEq for HeadlessWindow {
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id
    }
}

impl HeadlessWindow {
    pub fn new(id: u32, display: DisplayId, size: Size<f64, Logical>, can_snap: bool) -> Self {
        Self(Rc::new(WindowInner {
            id,
            size,
            can_snap,
            display: Cell::new(display),
            desk: Cell::new(0),
            closed: Cell::new(false),
        }))
    }

    pub fn id(&self) -> u32 {
        self.0.id
    }

    pub fn size(&self) -> Size<f64, Logical> {
        self.0.size
    }

    pub fn can_snap(&self) -> bool {
        self.0.can_snap
    }

    pub fn display(&self) -> DisplayId {
        self.0.display.get()
    }

    pub fn set_display(&self, display: DisplayId) {
        self.0.display.set(display);
    }

    pub fn desk(&self) -> usize {
        self.0.desk.get()
    }

    pub fn set_desk(&self, desk: usize) {
        self.0.desk.set(desk);
    }

    pub fn is_closed(&self) -> bool {
        self.0.closed.get()
    }
}

/// Overview item of the headless shell.
#[derive(Debug)]
pub struct HeadlessItem {
    window: HeadlessWindow,
    root: DisplayId,
    /// Bounds the grid lays the item out at.
    pub(super) home_bounds: Rectangle<f64, Logical>,
    bounds: Rectangle<f64, Logical>,
    opacity: f64,
    /// Number of phantom updates during the current drag.
    phantom_updates: usize,
    cannot_snap_warning_visible: bool,
    restack_on_animation_end: bool,
    events: EventLog,
}

impl HeadlessItem {
    pub(super) fn new(
        window: HeadlessWindow,
        root: DisplayId,
        home_bounds: Rectangle<f64, Logical>,
        events: EventLog,
    ) -> Self {
        let cannot_snap_warning_visible = !window.can_snap();
        Self {
            window,
            root,
            home_bounds,
            bounds: home_bounds,
            opacity: 1.,
            phantom_updates: 0,
            cannot_snap_warning_visible,
            restack_on_animation_end: false,
            events,
        }
    }

    pub fn bounds(&self) -> Rectangle<f64, Logical> {
        self.bounds
    }

    pub fn home_bounds(&self) -> Rectangle<f64, Logical> {
        self.home_bounds
    }

    pub fn phantom_updates(&self) -> usize {
        self.phantom_updates
    }

    pub fn is_cannot_snap_warning_visible(&self) -> bool {
        self.cannot_snap_warning_visible
    }

    pub fn restacks_on_animation_end(&self) -> bool {
        self.restack_on_animation_end
    }

    pub(super) fn return_home(&mut self) {
        self.bounds = self.home_bounds;
    }
}

impl OverviewItem for HeadlessItem {
    type Window = HeadlessWindow;
    type Root = DisplayId;

    fn window(&self) -> &HeadlessWindow {
        &self.window
    }

    fn root(&self) -> &DisplayId {
        &self.root
    }

    fn window_size(&self) -> Size<f64, Logical> {
        self.window.size()
    }

    fn target_bounds(&self) -> Rectangle<f64, Logical> {
        self.bounds
    }

    fn set_bounds(&mut self, bounds: Rectangle<f64, Logical>, _animation: OverviewAnimation) {
        self.bounds = bounds;
    }

    fn opacity(&self) -> f64 {
        self.opacity
    }

    fn set_opacity(&mut self, opacity: f64) {
        self.opacity = opacity;
    }

    fn scale_up_selected_item(&mut self, _animation: OverviewAnimation) {
        let size = self.bounds.size;
        let size = Size::from((size.w * SELECTED_ITEM_SCALE, size.h * SELECTED_ITEM_SCALE));
        self.bounds = centered_at(size, center(self.bounds));
        self.events.push(ShellEvent::ItemScaledUp {
            window: self.window.id(),
        });
    }

    fn animate_and_close_window(&mut self, up: bool) {
        self.window.0.closed.set(true);
        self.events.push(ShellEvent::WindowClosed {
            window: self.window.id(),
            up,
        });
    }

    fn update_phantoms_for_dragging(&mut self, _is_touch_dragging: bool) {
        self.phantom_updates += 1;
    }

    fn destroy_phantoms_for_dragging(&mut self) {
        self.phantom_updates = 0;
        self.events.push(ShellEvent::PhantomsDestroyed {
            window: self.window.id(),
        });
    }

    fn hide_cannot_snap_warning(&mut self) {
        self.cannot_snap_warning_visible = false;
    }

    fn update_cannot_snap_warning_visibility(&mut self) {
        self.cannot_snap_warning_visible = !self.window.can_snap();
    }

    fn set_should_restack_on_animation_end(&mut self, value: bool) {
        self.restack_on_animation_end = value;
    }
}
