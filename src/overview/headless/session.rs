use smithay::utils::{Logical, Point};

use super::events::{EventLog, ShellEvent};
use super::grid::HeadlessGrid;
use super::window::{DisplayId, HeadlessItem, HeadlessWindow};
use crate::overview::grid::OverviewGrid;
use crate::overview::item::OverviewItem;
use crate::overview::session::OverviewSession;
use crate::overview::split_view::WindowDraggingState;

/// Overview session of the headless shell.
#[derive(Debug)]
pub struct HeadlessSession {
    grids: Vec<HeadlessGrid>,
    indicators_dragged_window: Option<u32>,
    ignore_window_hierarchy_changes: bool,
    /// Window picked by the user, ending the overview.
    pub(super) selected: Option<HeadlessWindow>,
    events: EventLog,
}

impl HeadlessSession {
    pub(super) fn new(grids: Vec<HeadlessGrid>, events: EventLog) -> Self {
        Self {
            grids,
            indicators_dragged_window: None,
            ignore_window_hierarchy_changes: false,
            selected: None,
            events,
        }
    }

    pub fn grids(&self) -> impl Iterator<Item = &HeadlessGrid> + '_ {
        self.grids.iter()
    }

    pub fn grid(&self, display: DisplayId) -> Option<&HeadlessGrid> {
        self.grid_with_root(&display)
    }

    /// Finds the item of the window in any grid.
    pub fn item(&self, window: u32) -> Option<&HeadlessItem> {
        self.grids.iter().find_map(|grid| grid.item(window))
    }

    pub fn item_mut(&mut self, window: u32) -> Option<&mut HeadlessItem> {
        self.grids.iter_mut().find_map(|grid| grid.item_mut(window))
    }

    /// Window that the split view indicators show as dragged.
    pub fn indicators_dragged_window(&self) -> Option<u32> {
        self.indicators_dragged_window
    }

    pub fn ignores_window_hierarchy_changes(&self) -> bool {
        self.ignore_window_hierarchy_changes
    }

    /// Takes the window out of whichever grid it is in.
    pub(super) fn remove_window(&mut self, window: &HeadlessWindow) {
        for grid in &mut self.grids {
            grid.remove_item(window, false, true);
        }
    }

    pub(super) fn remove_closed_windows(&mut self) {
        for grid in &mut self.grids {
            let closed: Vec<_> = grid
                .items()
                .map(|item| item.window().clone())
                .filter(|window| window.is_closed())
                .collect();
            for window in closed {
                grid.remove_item(&window, true, true);
            }
        }
    }
}

impl OverviewSession<HeadlessItem> for HeadlessSession {
    type Grid = HeadlessGrid;

    fn grid_with_root(&self, root: &DisplayId) -> Option<&HeadlessGrid> {
        self.grids.iter().find(|grid| grid.root() == root)
    }

    fn grid_with_root_mut(&mut self, root: &DisplayId) -> Option<&mut HeadlessGrid> {
        self.grids.iter_mut().find(|grid| grid.root() == root)
    }

    fn select_window(&mut self, window: &HeadlessWindow) {
        self.selected = Some(window.clone());
        self.events.push(ShellEvent::WindowSelected {
            window: window.id(),
        });
    }

    fn position_windows(&mut self, _animate: bool) {
        for grid in &mut self.grids {
            grid.layout();
            grid.position_items(None);
        }
        self.events.push(ShellEvent::WindowsPositioned);
    }

    fn remove_drop_targets(&mut self) {
        for grid in &mut self.grids {
            grid.clear_drop_target();
        }
        self.events.push(ShellEvent::DropTargetsRemoved);
    }

    fn update_drop_targets_background_visibilities(
        &mut self,
        _window: &HeadlessWindow,
        location: Point<f64, Logical>,
    ) {
        for grid in &mut self.grids {
            grid.highlight_drop_target(location);
        }
    }

    fn set_split_view_drag_indicators_dragged_window(&mut self, window: Option<&HeadlessWindow>) {
        self.indicators_dragged_window = window.map(HeadlessWindow::id);
    }

    fn update_split_view_drag_indicators_window_dragging_states(
        &mut self,
        root: &DisplayId,
        state: WindowDraggingState,
    ) {
        for grid in &mut self.grids {
            if grid.root() == root {
                grid.set_dragging_state(state);
            } else {
                grid.set_dragging_state(WindowDraggingState::NoDrag);
            }
        }
    }

    fn reset_split_view_drag_indicators_window_dragging_states(&mut self) {
        for grid in &mut self.grids {
            grid.set_dragging_state(WindowDraggingState::NoDrag);
        }
        self.indicators_dragged_window = None;
    }

    fn rearrange_during_drag(&mut self, window: &HeadlessWindow) {
        for grid in &mut self.grids {
            grid.position_items(Some(window));
        }
    }

    fn set_ignore_window_hierarchy_changes(&mut self, ignore: bool) {
        self.ignore_window_hierarchy_changes = ignore;
    }
}
