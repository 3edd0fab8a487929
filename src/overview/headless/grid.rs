use smithay::utils::{Logical, Point, Rectangle, Size};

use super::events::{EventLog, ShellEvent};
use super::window::{DisplayId, HeadlessItem, HeadlessWindow};
use crate::overview::grid::{AddItemFlags, OverviewGrid};
use crate::overview::item::OverviewItem;
use crate::overview::split_view::WindowDraggingState;
use crate::utils::{center, centered_at, enlarge};

/// Desks bar at the top of a grid, with one mini view per desk.
#[derive(Debug, Clone, PartialEq)]
pub struct DesksBar {
    bounds: Rectangle<f64, Logical>,
    mini_views: Vec<Rectangle<f64, Logical>>,
    active_desk: usize,
}

impl DesksBar {
    /// Creates a desks bar with `desk_count` mini views side by side.
    pub fn new(bounds: Rectangle<f64, Logical>, desk_count: usize, active_desk: usize) -> Self {
        let width = bounds.size.w / desk_count.max(1) as f64;
        let mini_views = (0..desk_count)
            .map(|idx| {
                Rectangle::new(
                    bounds.loc + Point::from((width * idx as f64, 0.)),
                    Size::from((width, bounds.size.h)),
                )
            })
            .collect();

        Self {
            bounds,
            mini_views,
            active_desk,
        }
    }

    pub fn bounds(&self) -> Rectangle<f64, Logical> {
        self.bounds
    }

    pub fn active_desk(&self) -> usize {
        self.active_desk
    }

    /// Index of the desk whose mini view contains the point.
    pub fn mini_view_at(&self, point: Point<f64, Logical>) -> Option<usize> {
        self.mini_views.iter().position(|view| view.contains(point))
    }
}

/// Placeholder shown where a dragged item would land.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropTarget {
    pub window: u32,
    pub bounds: Rectangle<f64, Logical>,
    pub from_this_grid: bool,
    pub highlighted: bool,
}

/// Overview grid of the headless shell.
///
/// Items are laid out in a single row of equal slots, ordered by window id.
#[derive(Debug)]
pub struct HeadlessGrid {
    root: DisplayId,
    area: Rectangle<f64, Logical>,
    window_margin: f64,
    header_height: f64,
    items: Vec<HeadlessItem>,
    desks_bar: Option<DesksBar>,
    drop_target: Option<DropTarget>,
    nudge: Option<f64>,
    dragging_state: WindowDraggingState,
    hovered_desk: Option<usize>,
    desks_widget_updates: usize,
    events: EventLog,
}

impl HeadlessGrid {
    pub(super) fn new(
        root: DisplayId,
        area: Rectangle<f64, Logical>,
        desks_bar: Option<DesksBar>,
        window_margin: f64,
        header_height: f64,
        events: EventLog,
    ) -> Self {
        Self {
            root,
            area,
            window_margin,
            header_height,
            items: Vec::new(),
            desks_bar,
            drop_target: None,
            nudge: None,
            dragging_state: WindowDraggingState::NoDrag,
            hovered_desk: None,
            desks_widget_updates: 0,
            events,
        }
    }

    pub fn items(&self) -> impl Iterator<Item = &HeadlessItem> + '_ {
        self.items.iter()
    }

    pub fn item(&self, window: u32) -> Option<&HeadlessItem> {
        self.items.iter().find(|item| item.window().id() == window)
    }

    pub fn item_mut(&mut self, window: u32) -> Option<&mut HeadlessItem> {
        self.items
            .iter_mut()
            .find(|item| item.window().id() == window)
    }

    pub fn drop_target(&self) -> Option<&DropTarget> {
        self.drop_target.as_ref()
    }

    pub fn desks_bar(&self) -> Option<&DesksBar> {
        self.desks_bar.as_ref()
    }

    /// Current nudge amount while an item is dragged to close.
    pub fn nudge(&self) -> Option<f64> {
        self.nudge
    }

    /// Desk whose mini view is highlighted by a hovering item.
    pub fn hovered_desk(&self) -> Option<usize> {
        self.hovered_desk
    }

    pub fn desks_widget_updates(&self) -> usize {
        self.desks_widget_updates
    }

    pub(super) fn insert(&mut self, window: HeadlessWindow) {
        let idx = self
            .items
            .iter()
            .position(|item| item.window().id() > window.id())
            .unwrap_or(self.items.len());
        let item = HeadlessItem::new(
            window,
            self.root,
            Rectangle::from_size(Size::from((0., 0.))),
            self.events.clone(),
        );
        self.items.insert(idx, item);
        self.layout();
        self.items[idx].return_home();
    }

    /// Recomputes where every item belongs.
    pub(super) fn layout(&mut self) {
        let count = self.items.len();
        for idx in 0..count {
            let size = self.items[idx].window().size();
            let bounds = self.slot_bounds(idx, count, size);
            self.items[idx].home_bounds = bounds;
        }
    }

    /// Moves every item back to where it belongs, except for `except`.
    pub(super) fn position_items(&mut self, except: Option<&HeadlessWindow>) {
        for item in &mut self.items {
            if Some(item.window()) != except {
                item.return_home();
            }
        }
    }

    pub(super) fn clear_drop_target(&mut self) {
        self.drop_target = None;
    }

    pub(super) fn highlight_drop_target(&mut self, location: Point<f64, Logical>) {
        if let Some(target) = &mut self.drop_target {
            target.highlighted = target.bounds.contains(location);
        }
    }

    pub(super) fn set_dragging_state(&mut self, state: WindowDraggingState) {
        self.dragging_state = state;
    }

    /// Bounds of the item with the given index among `count` items.
    fn slot_bounds(
        &self,
        idx: usize,
        count: usize,
        window_size: Size<f64, Logical>,
    ) -> Rectangle<f64, Logical> {
        let slot_width = self.area.size.w / count.max(1) as f64;
        let slot = Rectangle::new(
            self.area.loc + Point::from((slot_width * idx as f64, 0.)),
            Size::from((slot_width, self.area.size.h)),
        );

        let margin = self.window_margin;
        let available_w = f64::max(0., slot.size.w - 2. * margin);
        let available_h = f64::max(0., slot.size.h - 2. * margin - self.header_height);
        let scale = if window_size.w > 0. && window_size.h > 0. {
            f64::min(available_w / window_size.w, available_h / window_size.h).min(1.)
        } else {
            0.
        };

        let size = Size::from((window_size.w * scale, window_size.h * scale));
        let size = enlarge(size, 2. * margin, 2. * margin + self.header_height);
        centered_at(size, center(slot))
    }
}

impl OverviewGrid<HeadlessItem> for HeadlessGrid {
    fn root(&self) -> &DisplayId {
        &self.root
    }

    fn item_containing(&self, window: &HeadlessWindow) -> Option<&HeadlessItem> {
        self.items.iter().find(|item| item.window() == window)
    }

    fn item_containing_mut(&mut self, window: &HeadlessWindow) -> Option<&mut HeadlessItem> {
        self.items.iter_mut().find(|item| item.window() == window)
    }

    fn add_item_in_mru_order(&mut self, window: &HeadlessWindow, flags: AddItemFlags) {
        if self.item_containing(window).is_some() {
            return;
        }

        self.insert(window.clone());
        if flags.contains(AddItemFlags::REPOSITION) {
            self.position_items(None);
        }
    }

    fn remove_item(
        &mut self,
        window: &HeadlessWindow,
        _item_destroying: bool,
        reposition: bool,
    ) -> Option<HeadlessItem> {
        let idx = self.items.iter().position(|item| item.window() == window)?;
        let item = self.items.remove(idx);
        if reposition {
            self.layout();
            self.position_items(None);
        }
        Some(item)
    }

    fn add_drop_target_for_dragging_from_this_grid(&mut self, window: &HeadlessWindow) {
        let Some(item) = self.item_containing(window) else {
            return;
        };
        self.drop_target = Some(DropTarget {
            window: window.id(),
            bounds: item.home_bounds(),
            from_this_grid: true,
            highlighted: false,
        });
        self.events.push(ShellEvent::DropTargetAdded {
            display: self.root,
            from_this_grid: true,
        });
    }

    fn add_drop_target_not_for_dragging_from_this_grid(
        &mut self,
        window: &HeadlessWindow,
        _animate: bool,
    ) {
        let count = self.items.len();
        self.drop_target = Some(DropTarget {
            window: window.id(),
            bounds: self.slot_bounds(count, count + 1, window.size()),
            from_this_grid: false,
            highlighted: false,
        });
        self.events.push(ShellEvent::DropTargetAdded {
            display: self.root,
            from_this_grid: false,
        });
    }

    fn has_drop_target(&self) -> bool {
        self.drop_target.is_some()
    }

    fn start_nudge(&mut self, _window: &HeadlessWindow) {
        self.nudge = Some(0.);
        self.events
            .push(ShellEvent::NudgeStarted { display: self.root });
    }

    fn update_nudge(&mut self, _window: &HeadlessWindow, value: f64) {
        if let Some(nudge) = &mut self.nudge {
            *nudge = value;
        }
    }

    fn end_nudge(&mut self) {
        if self.nudge.take().is_some() {
            self.events.push(ShellEvent::NudgeEnded { display: self.root });
        }
    }

    fn intersects_with_desks_bar(
        &mut self,
        point: Point<i32, Logical>,
        update_desks_bar_drag_details: bool,
        _for_drop: bool,
    ) -> bool {
        let Some(bar) = &self.desks_bar else {
            return false;
        };

        let point = point.to_f64();
        let intersects = bar.bounds.contains(point);
        if update_desks_bar_drag_details {
            self.hovered_desk = intersects.then(|| bar.mini_view_at(point)).flatten();
        }
        intersects
    }

    fn maybe_drop_item_on_desk_mini_view(
        &mut self,
        point: Point<i32, Logical>,
        window: &HeadlessWindow,
    ) -> bool {
        let Some(bar) = &self.desks_bar else {
            return false;
        };
        let Some(desk) = bar.mini_view_at(point.to_f64()) else {
            return false;
        };
        // Dropping on the current desk keeps the window where it is.
        if desk == bar.active_desk {
            return false;
        }

        if self.remove_item(window, false, false).is_none() {
            return false;
        }
        window.set_desk(desk);
        self.hovered_desk = None;
        self.events.push(ShellEvent::WindowMovedToDesk {
            window: window.id(),
            desk,
        });
        true
    }

    fn maybe_update_desks_widget_bounds(&mut self) {
        if self.desks_bar.is_some() {
            self.desks_widget_updates += 1;
        }
    }

    fn desks_bar_bounds(&self) -> Option<Rectangle<f64, Logical>> {
        self.desks_bar.as_ref().map(|bar| bar.bounds)
    }

    fn is_desks_bar_view_active(&self) -> bool {
        self.desks_bar.is_some()
    }

    fn split_view_dragging_state(&self) -> WindowDraggingState {
        self.dragging_state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> HeadlessGrid {
        let area = Rectangle::new(Point::from((0., 100.)), Size::from((1000., 500.)));
        HeadlessGrid::new(DisplayId(0), area, None, 5., 40., EventLog::default())
    }

    fn window(id: u32) -> HeadlessWindow {
        HeadlessWindow::new(id, DisplayId(0), Size::from((800., 600.)), true)
    }

    #[test]
    fn items_stay_ordered_by_window_id() {
        let mut grid = grid();
        grid.insert(window(2));
        grid.insert(window(0));
        grid.insert(window(1));

        let ids: Vec<_> = grid.items().map(|item| item.window().id()).collect();
        assert_eq!(ids, [0, 1, 2]);
    }

    #[test]
    fn slots_split_the_area() {
        let mut grid = grid();
        grid.insert(window(0));
        grid.insert(window(1));

        let first = grid.item(0).unwrap().home_bounds();
        let second = grid.item(1).unwrap().home_bounds();
        assert!(first.loc.x + first.size.w <= 500.);
        assert!(second.loc.x >= 500.);
        assert_eq!(center(first).y, 350.);
    }

    #[test]
    fn desks_bar_mini_views() {
        let bar = DesksBar::new(
            Rectangle::new(Point::from((0., 0.)), Size::from((900., 100.))),
            3,
            0,
        );
        assert_eq!(bar.mini_view_at(Point::from((100., 50.))), Some(0));
        assert_eq!(bar.mini_view_at(Point::from((450., 50.))), Some(1));
        assert_eq!(bar.mini_view_at(Point::from((450., 150.))), None);
    }
}
