use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde::Serialize;

use super::window::DisplayId;
use crate::overview::split_view::SnapPosition;

/// Something the headless shell did in response to a drag.
///
/// Continuous updates (item bounds, opacity, nudge amounts) are left out; they can be inspected on
/// the items directly.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum ShellEvent {
    OcclusionPaused,
    OcclusionUnpaused {
        delay_ms: u128,
    },
    SharedEdgeIndicatorShown {
        display: DisplayId,
    },
    SharedEdgeIndicatorHidden,
    ItemScaledUp {
        window: u32,
    },
    WindowClosed {
        window: u32,
        up: bool,
    },
    PhantomsDestroyed {
        window: u32,
    },
    DropTargetAdded {
        display: DisplayId,
        from_this_grid: bool,
    },
    DropTargetsRemoved,
    NudgeStarted {
        display: DisplayId,
    },
    NudgeEnded {
        display: DisplayId,
    },
    SplitViewDragStarted {
        display: DisplayId,
        window: u32,
    },
    SplitViewDragEnded {
        display: DisplayId,
        window: u32,
        snap_position: SnapPosition,
    },
    SplitViewDragCanceled {
        display: DisplayId,
    },
    WindowSnapped {
        display: DisplayId,
        window: u32,
        position: SnapPosition,
    },
    SplitViewEnded {
        display: DisplayId,
    },
    WindowActivated {
        window: u32,
    },
    WindowSelected {
        window: u32,
    },
    CannotSnapToastShown,
    WindowMovedToDesk {
        window: u32,
        desk: usize,
    },
    WindowMovedToDisplay {
        window: u32,
        display: DisplayId,
    },
    WindowsPositioned,
    OverviewEnded,
}

impl fmt::Display for ShellEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShellEvent::OcclusionPaused => write!(f, "occlusion paused"),
            ShellEvent::OcclusionUnpaused { delay_ms } => {
                write!(f, "occlusion unpaused after {delay_ms}ms")
            }
            ShellEvent::SharedEdgeIndicatorShown { display } => {
                write!(f, "shared edge indicator shown on {display}")
            }
            ShellEvent::SharedEdgeIndicatorHidden => write!(f, "shared edge indicator hidden"),
            ShellEvent::ItemScaledUp { window } => write!(f, "item {window} scaled up"),
            ShellEvent::WindowClosed { window, up } => {
                let direction = if *up { "up" } else { "down" };
                write!(f, "window {window} closed {direction}")
            }
            ShellEvent::PhantomsDestroyed { window } => {
                write!(f, "phantoms of window {window} destroyed")
            }
            ShellEvent::DropTargetAdded {
                display,
                from_this_grid,
            } => {
                let origin = if *from_this_grid { "own" } else { "incoming" };
                write!(f, "{origin} drop target added on {display}")
            }
            ShellEvent::DropTargetsRemoved => write!(f, "drop targets removed"),
            ShellEvent::NudgeStarted { display } => write!(f, "nudge started on {display}"),
            ShellEvent::NudgeEnded { display } => write!(f, "nudge ended on {display}"),
            ShellEvent::SplitViewDragStarted { display, window } => {
                write!(f, "split view on {display}: drag of window {window} started")
            }
            ShellEvent::SplitViewDragEnded {
                display,
                window,
                snap_position,
            } => write!(
                f,
                "split view on {display}: drag of window {window} ended at {snap_position:?}"
            ),
            ShellEvent::SplitViewDragCanceled { display } => {
                write!(f, "split view on {display}: drag canceled")
            }
            ShellEvent::WindowSnapped {
                display,
                window,
                position,
            } => write!(f, "window {window} snapped {position:?} on {display}"),
            ShellEvent::SplitViewEnded { display } => write!(f, "split view on {display} ended"),
            ShellEvent::WindowActivated { window } => write!(f, "window {window} activated"),
            ShellEvent::WindowSelected { window } => write!(f, "window {window} selected"),
            ShellEvent::CannotSnapToastShown => write!(f, "cannot snap toast shown"),
            ShellEvent::WindowMovedToDesk { window, desk } => {
                write!(f, "window {window} moved to desk {desk}")
            }
            ShellEvent::WindowMovedToDisplay { window, display } => {
                write!(f, "window {window} moved to {display}")
            }
            ShellEvent::WindowsPositioned => write!(f, "windows positioned"),
            ShellEvent::OverviewEnded => write!(f, "overview ended"),
        }
    }
}

/// Log of [`ShellEvent`]s shared between the parts of the headless shell.
#[derive(Debug, Clone, Default)]
pub struct EventLog(Rc<RefCell<Vec<ShellEvent>>>);

impl EventLog {
    pub fn push(&self, event: ShellEvent) {
        self.0.borrow_mut().push(event);
    }

    /// Returns the events logged so far, clearing the log.
    pub fn take(&self) -> Vec<ShellEvent> {
        self.0.take()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Renders the events logged so far, one per line, clearing the log.
    pub fn format(&self) -> String {
        let mut buf = String::new();
        for event in self.take() {
            buf.push_str(&event.to_string());
            buf.push('\n');
        }
        buf
    }
}
