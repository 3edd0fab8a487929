//! Replaying scripted gestures against the headless shell.
//!
//! A script describes a scene (displays, desks bars, windows, split view) and a list of gestures.
//! Every gesture drags one window with a fresh [`WindowDragController`]. The overview is started
//! before the first gesture and restarted whenever a gesture ended it.

use std::fs;
use std::path::Path;
use std::rc::Rc;

use anyhow::{bail, ensure, Context};
use serde::{Deserialize, Serialize};
use smithay::utils::{Logical, Point, Rectangle, Size};
use tracing::{debug, info};

use crate::overview::headless::{DisplayId, HeadlessItem, HeadlessShell, ShellEvent};
use crate::overview::{
    DragOptions, DragResult, OverviewItem, Shell, SnapPosition, WindowDragController,
};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Script {
    pub scene: Scene,
    #[serde(default)]
    pub gestures: Vec<Gesture>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Scene {
    pub displays: Vec<DisplaySpec>,
    #[serde(default)]
    pub windows: Vec<WindowSpec>,
    #[serde(default)]
    pub cursor_display: usize,
    #[serde(default = "default_true")]
    pub split_view_allowed: bool,
    /// Whether the desks bar gets created in the overview.
    #[serde(default)]
    pub desks_bar: bool,
    #[serde(default)]
    pub orientation: Orientation,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct DisplaySpec {
    pub bounds: RectSpec,
    /// Defaults to the display bounds.
    #[serde(default)]
    pub work_area: Option<RectSpec>,
    #[serde(default)]
    pub desks_bar: Option<DesksBarSpec>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RectSpec {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl From<RectSpec> for Rectangle<i32, Logical> {
    fn from(spec: RectSpec) -> Self {
        Rectangle::new(
            Point::from((spec.x, spec.y)),
            Size::from((spec.width, spec.height)),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct DesksBarSpec {
    pub height: i32,
    pub desks: usize,
    #[serde(default)]
    pub active: usize,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct WindowSpec {
    #[serde(default)]
    pub display: usize,
    pub width: f64,
    pub height: f64,
    /// Opacity of the window item in the overview.
    #[serde(default)]
    pub opacity: Option<f64>,
    #[serde(default = "default_true")]
    pub can_snap: bool,
    /// Side the window is snapped to before any gesture.
    #[serde(default)]
    pub snapped: Option<SnapPosition>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Orientation {
    #[default]
    LandscapePrimary,
    LandscapeSecondary,
    PortraitPrimary,
    PortraitSecondary,
}

impl Orientation {
    fn is_horizontal(self) -> bool {
        matches!(self, Self::LandscapePrimary | Self::LandscapeSecondary)
    }

    fn is_primary(self) -> bool {
        matches!(self, Self::LandscapePrimary | Self::PortraitPrimary)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Gesture {
    pub window: u32,
    #[serde(default)]
    pub touch: bool,
    pub events: Vec<GestureEvent>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", deny_unknown_fields)]
pub enum GestureEvent {
    Initiate {
        x: f64,
        y: f64,
    },
    Drag {
        x: f64,
        y: f64,
    },
    Complete {
        x: f64,
        y: f64,
    },
    Fling {
        x: f64,
        y: f64,
        #[serde(default, rename = "velocity-x")]
        velocity_x: f64,
        #[serde(rename = "velocity-y")]
        velocity_y: f64,
    },
    Reset,
    ResetSession,
}

impl GestureEvent {
    fn location(self) -> Option<Point<f64, Logical>> {
        match self {
            Self::Initiate { x, y }
            | Self::Drag { x, y }
            | Self::Complete { x, y }
            | Self::Fling { x, y, .. } => Some(Point::from((x, y))),
            Self::Reset | Self::ResetSession => None,
        }
    }

    /// Whether the event ends the gesture.
    fn is_terminal(self) -> bool {
        matches!(self, Self::Complete { .. } | Self::Fling { .. } | Self::Reset)
    }
}

fn default_true() -> bool {
    true
}

impl Script {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path).with_context(|| format!("error reading {path:?}"))?;
        Self::parse(&text).with_context(|| format!("error parsing {path:?}"))
    }

    pub fn parse(text: &str) -> anyhow::Result<Self> {
        let script: Self = serde_json::from_str(text)?;
        script.validate()?;
        Ok(script)
    }

    fn validate(&self) -> anyhow::Result<()> {
        let scene = &self.scene;
        ensure!(!scene.displays.is_empty(), "the scene needs at least one display");
        ensure!(
            scene.cursor_display < scene.displays.len(),
            "cursor display {} does not exist",
            scene.cursor_display
        );

        for (idx, display) in scene.displays.iter().enumerate() {
            ensure!(
                display.bounds.width > 0 && display.bounds.height > 0,
                "display {idx} has empty bounds"
            );
            if let Some(area) = display.work_area {
                ensure!(
                    area.width >= 0 && area.height >= 0,
                    "display {idx} has a negative work area"
                );
            }
            if let Some(bar) = display.desks_bar {
                ensure!(bar.height >= 0, "display {idx} has a negative desks bar height");
                ensure!(bar.desks > 0, "display {idx} has a desks bar without desks");
                ensure!(
                    bar.active < bar.desks,
                    "display {idx} has active desk {} out of {}",
                    bar.active,
                    bar.desks
                );
            }
        }

        for (idx, window) in scene.windows.iter().enumerate() {
            ensure!(
                window.display < scene.displays.len(),
                "window {idx} is on display {} which does not exist",
                window.display
            );
            ensure!(
                window.width > 0. && window.height > 0.,
                "window {idx} has an empty size"
            );
            if let Some(opacity) = window.opacity {
                ensure!(
                    (0. ..=1.).contains(&opacity),
                    "window {idx} has opacity {opacity} outside of [0, 1]"
                );
            }
        }

        for (idx, gesture) in self.gestures.iter().enumerate() {
            ensure!(
                (gesture.window as usize) < scene.windows.len(),
                "gesture {idx} drags window {} which does not exist",
                gesture.window
            );

            let Some((first, rest)) = gesture.events.split_first() else {
                bail!("gesture {idx} has no events");
            };
            ensure!(
                matches!(first, GestureEvent::Initiate { .. }),
                "gesture {idx} must start with initiate"
            );
            for (event_idx, event) in rest.iter().enumerate() {
                ensure!(
                    !matches!(event, GestureEvent::Initiate { .. }),
                    "gesture {idx} initiates twice"
                );
                ensure!(
                    !event.is_terminal() || event_idx + 1 == rest.len(),
                    "gesture {idx} has events after it ended"
                );
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Report {
    pub gestures: Vec<GestureReport>,
    pub windows: Vec<WindowReport>,
    pub in_overview: bool,
    /// Presentation time measurements requested over all gestures.
    pub presentation_frames: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct GestureReport {
    pub window: u32,
    /// How the gesture ended, absent if it was reset.
    pub result: Option<DragResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<ShellEvent>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct WindowReport {
    pub id: u32,
    pub display: DisplayId,
    pub desk: usize,
    pub closed: bool,
    pub snapped: SnapPosition,
    /// Item bounds, while the window is in the overview.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounds: Option<BoundsReport>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundsReport {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl From<Rectangle<f64, Logical>> for BoundsReport {
    fn from(rect: Rectangle<f64, Logical>) -> Self {
        Self {
            x: rect.loc.x,
            y: rect.loc.y,
            width: rect.size.w,
            height: rect.size.h,
        }
    }
}

/// Replays every gesture of the script and reports how they went.
///
/// With `record_events` the report carries the shell events of every gesture.
pub fn replay(
    script: &Script,
    options: Rc<DragOptions>,
    record_events: bool,
) -> anyhow::Result<Report> {
    let _span = tracy_client::span!("replay");

    script.validate()?;
    let scene = &script.scene;
    let mut shell = build_shell(scene, options.clone());

    let mut gestures = Vec::with_capacity(script.gestures.len());
    for (idx, gesture) in script.gestures.iter().enumerate() {
        ensure_overview(&mut shell, scene);
        shell.events().take();

        let result = replay_gesture(&mut shell, gesture, options.clone())
            .with_context(|| format!("error replaying gesture {idx}"))?;
        info!("gesture {idx} on window {}: {result:?}", gesture.window);

        gestures.push(GestureReport {
            window: gesture.window,
            result,
            events: record_events.then(|| shell.events().take()),
        });
    }

    let session = shell.session();
    let windows = shell
        .windows()
        .iter()
        .map(|window| WindowReport {
            id: window.id(),
            display: window.display(),
            desk: window.desk(),
            closed: window.is_closed(),
            snapped: shell.split_view_of(window.display()).position_of(window),
            // Closed windows linger in the grid until the shell looks at it again.
            bounds: session
                .filter(|_| !window.is_closed())
                .and_then(|session| session.item(window.id()))
                .map(|item| item.target_bounds().into()),
        })
        .collect();

    Ok(Report {
        gestures,
        windows,
        in_overview: shell.in_overview_session(),
        presentation_frames: shell.presentation_frames(),
    })
}

fn build_shell(scene: &Scene, options: Rc<DragOptions>) -> HeadlessShell {
    let mut shell = HeadlessShell::new(options);
    shell.set_orientation(scene.orientation.is_horizontal(), scene.orientation.is_primary());
    shell.set_split_view_allowed(scene.split_view_allowed);
    shell.set_desks_bar_created(scene.desks_bar);

    // Desks bars go in before the windows so that windows land on the active desk.
    for spec in &scene.displays {
        let bounds = Rectangle::from(spec.bounds);
        let work_area = spec.work_area.map_or(bounds, Rectangle::from);
        let display = shell.add_display(bounds, work_area);
        if let Some(bar) = spec.desks_bar {
            shell.set_desks_bar(display, bar.height, bar.desks, bar.active);
        }
    }
    shell.set_cursor_display(DisplayId(scene.cursor_display));

    for spec in &scene.windows {
        let size = Size::from((spec.width, spec.height));
        let window = shell.add_window(DisplayId(spec.display), size, spec.can_snap);
        if let Some(position) = spec.snapped.filter(|pos| *pos != SnapPosition::None) {
            shell.snap(&window, position);
        }
    }

    shell
}

/// Starts the overview unless it is already running.
fn ensure_overview(shell: &mut HeadlessShell, scene: &Scene) {
    if shell.in_overview_session() {
        return;
    }

    debug!("starting the overview");
    shell.start_overview();

    let Some(session) = shell.overview_session_mut() else {
        return;
    };
    for (id, spec) in scene.windows.iter().enumerate() {
        let Some(opacity) = spec.opacity else {
            continue;
        };
        if let Some(item) = session.item_mut(id as u32) {
            item.set_opacity(opacity);
        }
    }
}

fn replay_gesture(
    shell: &mut HeadlessShell,
    gesture: &Gesture,
    options: Rc<DragOptions>,
) -> anyhow::Result<Option<DragResult>> {
    let item: &HeadlessItem = shell
        .session()
        .and_then(|session| session.item(gesture.window))
        .with_context(|| format!("window {} is not in the overview", gesture.window))?;
    let mut controller = WindowDragController::new(&*shell, item, gesture.touch, options);

    let mut result = None;
    let mut ended = false;
    for event in &gesture.events {
        if !gesture.touch {
            if let Some(location) = event.location() {
                shell.move_cursor_to(location);
            }
        }

        match *event {
            GestureEvent::Initiate { x, y } => {
                controller.initiate_drag(shell, Point::from((x, y)));
            }
            GestureEvent::Drag { x, y } => controller.drag(shell, Point::from((x, y))),
            GestureEvent::Complete { x, y } => {
                result = Some(controller.complete_drag(shell, Point::from((x, y))));
                ended = true;
            }
            GestureEvent::Fling {
                x,
                y,
                velocity_x,
                velocity_y,
            } => {
                let location = Point::from((x, y));
                result = Some(controller.fling(shell, location, velocity_x, velocity_y));
                ended = true;
            }
            GestureEvent::Reset => {
                controller.reset_gesture(shell);
                ended = true;
            }
            GestureEvent::ResetSession => {
                controller.reset_overview_session();
                shell.end_overview();
            }
        }
    }

    // A gesture that never ended gets canceled, like a lost grab.
    if !ended {
        debug!("gesture on window {} did not end, resetting", gesture.window);
        controller.reset_gesture(shell);
    }

    Ok(result)
}
