use std::rc::Rc;

use approx::assert_abs_diff_eq;
use insta::assert_snapshot;
use proptest::prelude::*;
use proptest_derive::Arbitrary;
use smithay::utils::{Logical, Point, Rectangle, Size};

use super::*;
use crate::overview::headless::{DisplayId, HeadlessItem, HeadlessShell};
use crate::overview::split_view::{SplitViewController, SplitViewState, WindowDraggingState};

type Controller = WindowDragController<HeadlessItem>;

fn options() -> Rc<DragOptions> {
    Rc::new(DragOptions::default())
}

fn p(x: f64, y: f64) -> Point<f64, Logical> {
    Point::from((x, y))
}

fn display_bounds(x: i32, w: i32) -> Rectangle<i32, Logical> {
    Rectangle::new(Point::from((x, 0)), Size::from((w, 800)))
}

/// One 1200x800 display with `windows` landscape windows.
fn single_display_shell(windows: usize) -> HeadlessShell {
    let mut shell = HeadlessShell::new(options());
    shell.add_display(display_bounds(0, 1200), display_bounds(0, 1200));
    for _ in 0..windows {
        shell.add_window(DisplayId(0), Size::from((800., 600.)), true);
    }
    shell
}

/// Same as [`single_display_shell()`], with a desks bar of three desks along the top.
fn desks_bar_shell() -> HeadlessShell {
    let mut shell = HeadlessShell::new(options());
    shell.add_display(display_bounds(0, 1200), display_bounds(0, 1200));
    shell.set_desks_bar(DisplayId(0), 100, 3, 0);
    shell.set_desks_bar_created(true);
    shell.add_window(DisplayId(0), Size::from((800., 600.)), true);
    shell.add_window(DisplayId(0), Size::from((800., 600.)), true);
    shell
}

fn item(shell: &HeadlessShell, window: u32) -> &HeadlessItem {
    shell.session().unwrap().item(window).unwrap()
}

/// Creates a controller for the window and initiates a drag at its center plus `offset`.
fn start(
    shell: &mut HeadlessShell,
    window: u32,
    touch: bool,
    offset: (f64, f64),
) -> (Controller, Point<f64, Logical>) {
    if !shell.in_overview_session() {
        shell.start_overview();
    }

    let item = item(shell, window);
    let location = center(item.target_bounds()) + Point::from(offset);
    let mut controller = WindowDragController::new(&*shell, item, touch, options());
    controller.initiate_drag(shell, location);
    controller.verify_invariants();
    (controller, location)
}

fn drag_mouse(
    controller: &mut Controller,
    shell: &mut HeadlessShell,
    location: Point<f64, Logical>,
) {
    shell.move_cursor_to(location);
    controller.drag(shell, location);
    controller.verify_invariants();
}

#[track_caller]
fn assert_finished(controller: &Controller) {
    controller.verify_invariants();
    assert_eq!(controller.behavior(), DragBehavior::NoDrag);
    assert!(controller.dragged_window().is_none());
    assert!(!controller.did_move());
}

#[test]
fn click_without_moving_selects_window() {
    let mut shell = single_display_shell(2);
    shell.start_overview();
    let home = item(&shell, 0).bounds();

    let (mut controller, start) = start(&mut shell, 0, false, (0., 0.));
    controller.drag(&mut shell, start + p(4., -4.));
    controller.drag(&mut shell, start + p(-3., 2.));
    assert_eq!(controller.behavior(), DragBehavior::Undefined);
    assert!(!controller.did_move());
    assert_eq!(item(&shell, 0).bounds(), home);
    assert_eq!(item(&shell, 0).opacity(), 1.);

    let result = controller.complete_drag(&mut shell, start + p(-3., 2.));
    assert_eq!(result, DragResult::NeverDisambiguated);
    assert_finished(&controller);
    assert!(!shell.in_overview_session());

    assert_snapshot!(shell.events().format(), @r"
    occlusion paused
    window 0 selected
    occlusion unpaused after 300ms
    ");
}

#[test]
fn drag_counts_once_either_axis_passes_threshold() {
    let mut shell = single_display_shell(2);
    let (mut controller, start) = start(&mut shell, 0, false, (0., 0.));

    controller.drag(&mut shell, start + p(4.9, 4.9));
    assert!(!controller.did_move());

    controller.drag(&mut shell, start + p(5., 0.));
    assert!(controller.did_move());
    assert_eq!(controller.behavior(), DragBehavior::NormalDrag);
    controller.reset_gesture(&mut shell);
    assert_finished(&controller);
}

#[test]
fn drag_without_any_policy_does_nothing() {
    let mut shell = single_display_shell(2);
    shell.set_split_view_allowed(false);
    shell.start_overview();
    let home = item(&shell, 0).bounds();

    let (mut controller, start) = start(&mut shell, 0, false, (0., 0.));
    controller.drag(&mut shell, start + p(200., 0.));
    assert_eq!(controller.behavior(), DragBehavior::Undefined);
    assert!(!controller.did_move());
    assert_eq!(item(&shell, 0).bounds(), home);

    let result = controller.complete_drag(&mut shell, start + p(200., 0.));
    assert_eq!(result, DragResult::NeverDisambiguated);
    assert_finished(&controller);
}

#[test]
fn vertical_touch_drag_closes_window() {
    let mut shell = single_display_shell(2);
    let (mut controller, start) = start(&mut shell, 0, true, (-50., -50.));

    controller.drag(&mut shell, start + p(0., 150.));
    assert_eq!(controller.behavior(), DragBehavior::DragToClose);
    controller.drag(&mut shell, start + p(0., 200.));

    let result = controller.complete_drag(&mut shell, start + p(0., 200.));
    assert_eq!(result, DragResult::SuccessfulDragToClose);
    assert_finished(&controller);
    assert!(shell.windows()[0].is_closed());

    assert_snapshot!(shell.events().format(), @r"
    occlusion paused
    nudge started on display 0
    nudge ended on display 0
    window 0 closed down
    occlusion unpaused after 300ms
    ");
}

#[test]
fn horizontal_touch_drag_is_normal_drag() {
    let mut shell = single_display_shell(2);
    let (mut controller, start) = start(&mut shell, 0, true, (0., 0.));

    controller.drag(&mut shell, start + p(30., 20.));
    assert_eq!(controller.behavior(), DragBehavior::NormalDrag);
    controller.reset_gesture(&mut shell);
    assert_finished(&controller);
}

#[test]
fn mouse_drag_never_closes() {
    let mut shell = single_display_shell(2);
    let (mut controller, start) = start(&mut shell, 0, false, (0., 0.));

    controller.drag(&mut shell, start + p(0., 300.));
    assert_eq!(controller.behavior(), DragBehavior::NormalDrag);
    let result = controller.complete_drag(&mut shell, start + p(0., 300.));
    assert_eq!(result, DragResult::DropIntoOverview);
    assert!(!shell.windows()[0].is_closed());
}

#[test]
fn drag_to_close_fades_and_follows_vertically() {
    let mut shell = single_display_shell(2);
    let (mut controller, start) = start(&mut shell, 0, true, (0., 0.));
    let home = item(&shell, 0).bounds();

    let mut last_opacity = 1.;
    for step in 1..=15_i32 {
        let dy = f64::from(step) * 20.;
        controller.drag(&mut shell, start + p(0., -dy));
        controller.verify_invariants();

        let item = item(&shell, 0);
        let opacity = item.opacity();
        assert!(opacity <= last_opacity);
        assert!(opacity >= 0.4);
        last_opacity = opacity;

        let expected = 1. - f64::min(dy / 160., 1.) * 0.6;
        assert_abs_diff_eq!(opacity, expected, epsilon = 1e-9);

        // Only the vertical position changes.
        let bounds = item.bounds();
        assert_eq!(bounds.size, home.size);
        assert_eq!(bounds.loc.x, home.loc.x);
        assert_abs_diff_eq!(center(bounds).y, center(home).y - dy, epsilon = 1e-9);

        // Neighbors keep moving past the close distance.
        let nudge = shell.session().unwrap().grid(DisplayId(0)).unwrap().nudge();
        assert_abs_diff_eq!(nudge.unwrap(), dy / 160., epsilon = 1e-9);
    }
    assert_abs_diff_eq!(last_opacity, 0.4, epsilon = 1e-9);

    let result = controller.complete_drag(&mut shell, start + p(0., -300.));
    assert_eq!(result, DragResult::SuccessfulDragToClose);
    assert_snapshot!(shell.events().format(), @r"
    occlusion paused
    nudge started on display 0
    nudge ended on display 0
    window 0 closed up
    occlusion unpaused after 300ms
    ");
}

#[test]
fn short_drag_to_close_restores_item() {
    let mut shell = single_display_shell(2);
    shell.start_overview();
    shell
        .overview_session_mut()
        .unwrap()
        .item_mut(0)
        .unwrap()
        .set_opacity(0.8);
    let home = item(&shell, 0).bounds();

    let (mut controller, start) = start(&mut shell, 0, true, (0., 0.));
    controller.drag(&mut shell, start + p(0., 160.));
    assert!(item(&shell, 0).opacity() < 0.8);

    let result = controller.complete_drag(&mut shell, start + p(0., 160.));
    assert_eq!(result, DragResult::CanceledDragToClose);
    assert_finished(&controller);
    assert_eq!(item(&shell, 0).opacity(), 0.8);
    assert_eq!(item(&shell, 0).bounds(), home);
    assert!(!shell.windows()[0].is_closed());
}

#[test]
fn translucent_item_keeps_opacity_during_drag_to_close() {
    let mut shell = single_display_shell(2);
    shell.start_overview();
    shell
        .overview_session_mut()
        .unwrap()
        .item_mut(0)
        .unwrap()
        .set_opacity(0.3);

    let (mut controller, start) = start(&mut shell, 0, true, (0., 0.));
    controller.drag(&mut shell, start + p(0., 100.));
    assert_eq!(item(&shell, 0).opacity(), 0.3);
    controller.reset_gesture(&mut shell);
}

#[test]
fn reset_during_drag_to_close_restores_item() {
    let mut shell = single_display_shell(2);
    shell.start_overview();
    let home = item(&shell, 0).bounds();

    let (mut controller, start) = start(&mut shell, 0, true, (0., 0.));
    controller.drag(&mut shell, start + p(0., 100.));
    assert_eq!(controller.behavior(), DragBehavior::DragToClose);
    assert!(item(&shell, 0).opacity() < 1.);

    controller.reset_gesture(&mut shell);
    assert_finished(&controller);
    assert_eq!(item(&shell, 0).opacity(), 1.);
    assert_eq!(item(&shell, 0).bounds(), home);

    let grid = shell.session().unwrap().grid(DisplayId(0)).unwrap();
    assert!(grid.nudge().is_none());
    assert!(!shell.windows()[0].is_closed());
}

#[test]
fn fast_fling_closes_in_direction_of_displacement() {
    let mut shell = single_display_shell(2);
    let (mut controller, start) = start(&mut shell, 0, true, (0., 0.));

    // The velocity points up, but the item ended up below where it started.
    let result = controller.fling(&mut shell, start + p(0., 3.), 0., -2500.);
    assert_eq!(result, DragResult::SuccessfulDragToClose);
    assert_finished(&controller);
    assert!(!shell.is_occlusion_paused());

    assert_snapshot!(shell.events().format(), @r"
    occlusion paused
    window 0 closed down
    occlusion unpaused after 300ms
    ");
}

#[test]
fn fling_during_drag_to_close_ends_nudge() {
    let mut shell = single_display_shell(2);
    let (mut controller, start) = start(&mut shell, 1, true, (0., 0.));
    controller.drag(&mut shell, start + p(0., -40.));

    let result = controller.fling(&mut shell, start + p(0., -40.), 100., -2001.);
    assert_eq!(result, DragResult::SuccessfulDragToClose);
    assert!(shell.windows()[1].is_closed());
    assert!(shell
        .session()
        .unwrap()
        .grid(DisplayId(0))
        .unwrap()
        .nudge()
        .is_none());
}

#[test]
fn slow_fling_is_a_release() {
    let mut shell = single_display_shell(2);
    let (mut controller, start) = start(&mut shell, 0, true, (0., 0.));

    let result = controller.fling(&mut shell, start, 0., 2000.);
    assert_eq!(result, DragResult::NeverDisambiguated);
    assert_finished(&controller);
    assert!(!shell.windows()[0].is_closed());
}

#[test]
fn fling_during_normal_drag_is_a_release() {
    let mut shell = single_display_shell(2);
    let (mut controller, start) = start(&mut shell, 0, false, (0., 0.));
    drag_mouse(&mut controller, &mut shell, start + p(100., 0.));

    let result = controller.fling(&mut shell, start + p(100., 0.), 0., 5000.);
    assert_eq!(result, DragResult::DropIntoOverview);
    assert!(!shell.windows()[0].is_closed());
}

#[test]
fn normal_drag_keeps_pointer_offset() {
    let mut shell = single_display_shell(2);
    shell.start_overview();
    let home = item(&shell, 0).bounds();

    let (mut controller, _) = start(&mut shell, 0, false, (20., 20.));
    for location in [p(600., 300.), p(700., 500.), p(350., 420.)] {
        drag_mouse(&mut controller, &mut shell, location);
        let bounds = item(&shell, 0).bounds();
        assert_abs_diff_eq!(center(bounds).x, location.x - 20., epsilon = 1e-9);
        assert_abs_diff_eq!(center(bounds).y, location.y - 20., epsilon = 1e-9);
    }

    // The item got picked up.
    let size = item(&shell, 0).bounds().size;
    assert!(size.w > home.size.w);
    assert!(size.h > home.size.h);
    assert_eq!(controller.snap_position(), SnapPosition::None);

    let grid = shell.session().unwrap().grid(DisplayId(0)).unwrap();
    let drop_target = grid.drop_target().unwrap();
    assert!(drop_target.from_this_grid);
    assert!(drop_target.highlighted);

    let result = controller.complete_drag(&mut shell, p(350., 420.));
    assert_eq!(result, DragResult::DropIntoOverview);
    assert_finished(&controller);

    let item = item(&shell, 0);
    assert_eq!(item.bounds(), home);
    assert!(item.restacks_on_animation_end());
    let grid = shell.session().unwrap().grid(DisplayId(0)).unwrap();
    assert!(grid.drop_target().is_none());

    assert_snapshot!(shell.events().format(), @r"
    occlusion paused
    item 0 scaled up
    own drop target added on display 0
    split view on display 0: drag of window 0 started
    drop targets removed
    split view on display 0: drag of window 0 ended at None
    windows positioned
    occlusion unpaused after 300ms
    ");
}

#[test]
fn drag_to_right_edge_snaps() {
    let mut shell = single_display_shell(2);
    let (mut controller, start) = start(&mut shell, 0, false, (0., 0.));

    drag_mouse(&mut controller, &mut shell, p(1150., start.y));
    assert_eq!(controller.behavior(), DragBehavior::NormalDrag);
    assert_eq!(controller.snap_position(), SnapPosition::Right);

    let grid = shell.session().unwrap().grid(DisplayId(0)).unwrap();
    assert_eq!(
        grid.split_view_dragging_state(),
        WindowDraggingState::ToSnapRight
    );

    let result = controller.complete_drag(&mut shell, p(1150., start.y));
    assert_eq!(result, DragResult::Snap);
    assert_finished(&controller);

    let window = shell.windows()[0].clone();
    let split_view = shell.split_view_of(DisplayId(0));
    assert_eq!(split_view.position_of(&window), SnapPosition::Right);
    assert_eq!(shell.activated_window(), Some(0));
    // One side is still empty, so the overview stays to pick a window for it.
    assert!(shell.in_overview_session());
    assert!(shell.session().unwrap().item(0).is_none());

    assert_snapshot!(shell.events().format(), @r"
    occlusion paused
    item 0 scaled up
    own drop target added on display 0
    split view on display 0: drag of window 0 started
    drop targets removed
    split view on display 0: drag of window 0 ended at Right
    window 0 snapped Right on display 0
    window 0 activated
    windows positioned
    occlusion unpaused after 300ms
    ");
}

#[test]
fn short_drag_near_edge_does_not_snap() {
    let mut shell = single_display_shell(1);
    shell.start_overview();
    // The only item fills the display, so start close to the right edge.
    let (mut controller, start) = start(&mut shell, 0, false, (480., 0.));

    drag_mouse(&mut controller, &mut shell, start + p(20., 0.));
    assert!(start.x + 20. > 1200. - 128.);
    assert_eq!(controller.snap_position(), SnapPosition::None);

    drag_mouse(&mut controller, &mut shell, p(1190., start.y));
    assert_eq!(controller.snap_position(), SnapPosition::Right);
    controller.reset_gesture(&mut shell);
}

#[test]
fn snap_position_sticks_to_snapped_side() {
    let mut shell = single_display_shell(3);
    let snapped = shell.windows()[2].clone();
    shell.snap(&snapped, SnapPosition::Left);
    shell.start_overview();

    let (mut controller, start) = start(&mut shell, 0, false, (0., 0.));

    // Left of the divider, where the other window is snapped.
    drag_mouse(&mut controller, &mut shell, p(400., start.y + 20.));
    assert_eq!(controller.snap_position(), SnapPosition::Left);

    drag_mouse(&mut controller, &mut shell, p(800., start.y));
    assert_eq!(controller.snap_position(), SnapPosition::None);

    drag_mouse(&mut controller, &mut shell, p(1150., start.y));
    assert_eq!(controller.snap_position(), SnapPosition::Right);

    drag_mouse(&mut controller, &mut shell, p(599., start.y));
    assert_eq!(controller.snap_position(), SnapPosition::Left);

    controller.reset_gesture(&mut shell);
    assert_finished(&controller);
}

#[test]
fn secondary_orientation_sticks_to_physical_side() {
    let mut shell = single_display_shell(3);
    shell.set_orientation(true, false);
    let snapped = shell.windows()[2].clone();
    // Logical left is physically on the right in secondary orientation.
    shell.snap(&snapped, SnapPosition::Left);
    shell.start_overview();

    let (mut controller, start) = start(&mut shell, 0, false, (0., 0.));
    drag_mouse(&mut controller, &mut shell, p(800., start.y));
    assert_eq!(controller.snap_position(), SnapPosition::Left);

    drag_mouse(&mut controller, &mut shell, p(50., start.y));
    assert_eq!(controller.snap_position(), SnapPosition::Right);
    controller.reset_gesture(&mut shell);
}

#[test]
fn unsnappable_window_never_previews_snap() {
    let mut shell = HeadlessShell::new(options());
    shell.add_display(display_bounds(0, 1200), display_bounds(0, 1200));
    shell.add_window(DisplayId(0), Size::from((800., 600.)), false);
    shell.add_window(DisplayId(0), Size::from((800., 600.)), true);

    let (mut controller, start) = start(&mut shell, 0, false, (0., 0.));
    drag_mouse(&mut controller, &mut shell, p(1190., start.y));
    assert_eq!(controller.snap_position(), SnapPosition::None);

    let result = controller.complete_drag(&mut shell, p(1190., start.y));
    assert_eq!(result, DragResult::DropIntoOverview);
}

#[test]
fn click_fills_free_split_view_side() {
    let mut shell = single_display_shell(3);
    let snapped = shell.windows()[2].clone();
    shell.snap(&snapped, SnapPosition::Left);
    shell.start_overview();
    shell.events().take();

    let (mut controller, start) = start(&mut shell, 0, false, (0., 0.));
    let result = controller.complete_drag(&mut shell, start);
    assert_eq!(result, DragResult::NeverDisambiguated);
    assert_finished(&controller);

    let window = shell.windows()[0].clone();
    let split_view = shell.split_view_of(DisplayId(0));
    assert_eq!(split_view.state(), SplitViewState::BothSnapped);
    assert_eq!(split_view.position_of(&window), SnapPosition::Right);
    assert!(!shell.in_overview_session());

    assert_snapshot!(shell.events().format(), @r"
    occlusion paused
    window 0 snapped Right on display 0
    window 0 activated
    occlusion unpaused after 300ms
    ");
}

#[test]
fn click_on_unsnappable_window_ends_split_view() {
    let mut shell = HeadlessShell::new(options());
    shell.add_display(display_bounds(0, 1200), display_bounds(0, 1200));
    shell.add_window(DisplayId(0), Size::from((800., 600.)), false);
    let snapped = shell.add_window(DisplayId(0), Size::from((800., 600.)), true);
    shell.snap(&snapped, SnapPosition::Right);
    shell.start_overview();

    let (mut controller, start) = start(&mut shell, 0, true, (0., 0.));
    let result = controller.complete_drag(&mut shell, start);
    assert_eq!(result, DragResult::NeverDisambiguated);

    assert_eq!(
        shell.split_view_of(DisplayId(0)).state(),
        SplitViewState::NoSnap
    );
    assert_eq!(shell.cannot_snap_toasts(), 1);
    assert!(!shell.in_overview_session());
    assert!(shell.overview_session_mut().is_none());
    assert_eq!(shell.activated_window(), Some(0));
}

#[test]
fn reset_puts_item_back() {
    let mut shell = single_display_shell(2);
    shell.start_overview();
    let home = item(&shell, 0).bounds();

    let (mut controller, start) = start(&mut shell, 0, false, (0., 0.));
    drag_mouse(&mut controller, &mut shell, p(1150., start.y));
    shell.events().take();

    controller.reset_gesture(&mut shell);
    assert_finished(&controller);
    assert_eq!(item(&shell, 0).bounds(), home);
    assert_eq!(shell.split_view_of(DisplayId(0)).state(), SplitViewState::NoSnap);

    let grid = shell.session().unwrap().grid(DisplayId(0)).unwrap();
    assert_eq!(grid.split_view_dragging_state(), WindowDraggingState::NoDrag);
    assert!(grid.drop_target().is_none());

    assert_snapshot!(shell.events().format(), @r"
    drop targets removed
    split view on display 0: drag canceled
    windows positioned
    occlusion unpaused after 300ms
    ");
}

#[test]
fn reset_before_moving_only_repositions() {
    let mut shell = single_display_shell(2);
    let (mut controller, _) = start(&mut shell, 0, true, (0., 0.));
    shell.events().take();

    controller.reset_gesture(&mut shell);
    assert_finished(&controller);
    assert_snapshot!(shell.events().format(), @r"
    windows positioned
    occlusion unpaused after 300ms
    ");
}

#[test]
fn desks_bar_item_size() {
    let mut shell = desks_bar_shell();
    let (mut controller, start) = start(&mut shell, 0, false, (0., 0.));

    // 800x600 scaled by 100 / 800, plus margins and header.
    assert_eq!(controller.on_desks_bar_item_size, Size::from((110., 125.)));

    drag_mouse(&mut controller, &mut shell, start + p(0., 200.));
    assert_eq!(
        controller.item_size_for_desks_bar_proximity(0.),
        controller.original_scaled_size
    );
    assert_eq!(
        controller.item_size_for_desks_bar_proximity(1.),
        Size::from((110., 125.))
    );
    controller.reset_gesture(&mut shell);
}

#[test]
fn no_desks_bar_means_no_desks_bar_size() {
    let mut shell = single_display_shell(2);
    let (controller, _) = start(&mut shell, 0, false, (0., 0.));
    assert_eq!(controller.on_desks_bar_item_size, Size::from((0., 0.)));
    assert!(!controller.virtual_desks_bar_enabled);
}

#[test]
fn item_shrinks_towards_desks_bar() {
    let mut shell = desks_bar_shell();
    let (mut controller, _) = start(&mut shell, 0, false, (0., 0.));

    // Far below the desks bar the item keeps its picked up size.
    drag_mouse(&mut controller, &mut shell, p(600., 600.));
    let original = controller.original_scaled_size;
    let bounds = item(&shell, 0).bounds();
    assert_eq!(bounds.size, original);
    // The item hangs below the pointer by half of the margin and header.
    assert_abs_diff_eq!(center(bounds).y, 600. - 22.5, epsilon = 1e-9);

    // Close to the desks bar it is partially shrunk.
    drag_mouse(&mut controller, &mut shell, p(600., 150.));
    let size = item(&shell, 0).bounds().size;
    assert!(size.w < original.w && size.w > 110.);
    assert!(size.h < original.h && size.h > 125.);

    let geometry = controller.desks_bar.unwrap();
    let ratio = (127.5 - 100.) / geometry.shrink_region_distance.y;
    let expected = controller.item_size_for_desks_bar_proximity(1. - ratio);
    assert_abs_diff_eq!(size.w, expected.w, epsilon = 1e-9);
    assert_abs_diff_eq!(size.h, expected.h, epsilon = 1e-9);

    // Over the desks bar it fits a mini view.
    drag_mouse(&mut controller, &mut shell, p(600., 50.));
    assert_eq!(item(&shell, 0).bounds().size, Size::from((110., 125.)));
    let grid = shell.session().unwrap().grid(DisplayId(0)).unwrap();
    assert_eq!(grid.hovered_desk(), Some(1));

    controller.reset_gesture(&mut shell);
}

#[test]
fn drop_on_desk_mini_view_moves_window() {
    let mut shell = desks_bar_shell();
    let (mut controller, _) = start(&mut shell, 0, false, (0., 0.));

    drag_mouse(&mut controller, &mut shell, p(1000., 50.));
    let result = controller.complete_drag(&mut shell, p(1000., 50.));
    assert_eq!(result, DragResult::DragToDesk);
    assert_finished(&controller);

    assert_eq!(shell.windows()[0].desk(), 2);
    let session = shell.session().unwrap();
    assert!(session.item(0).is_none());
    assert!(session.item(1).is_some());
    // Updated when the drag started and ended, and on every move.
    assert!(session.grid(DisplayId(0)).unwrap().desks_widget_updates() >= 3);
}

#[test]
fn drop_on_active_desk_returns_to_grid() {
    let mut shell = desks_bar_shell();
    shell.start_overview();
    let home = item(&shell, 0).bounds();

    let (mut controller, _) = start(&mut shell, 0, false, (0., 0.));
    drag_mouse(&mut controller, &mut shell, p(200., 50.));
    let result = controller.complete_drag(&mut shell, p(200., 50.));
    assert_eq!(result, DragResult::DropIntoOverview);

    assert_eq!(shell.windows()[0].desk(), 0);
    assert_eq!(item(&shell, 0).bounds(), home);
}

#[test]
fn drag_to_close_turns_into_normal_drag_over_desks_bar() {
    let mut shell = desks_bar_shell();
    let (mut controller, start) = start(&mut shell, 0, true, (0., 0.));

    controller.drag(&mut shell, start + p(0., -100.));
    assert_eq!(controller.behavior(), DragBehavior::DragToClose);
    assert!(item(&shell, 0).opacity() < 1.);

    controller.drag(&mut shell, p(start.x, 50.));
    controller.verify_invariants();
    assert_eq!(controller.behavior(), DragBehavior::NormalDrag);
    assert_eq!(item(&shell, 0).opacity(), 1.);
    assert_eq!(item(&shell, 0).bounds().size, Size::from((110., 125.)));

    let grid = shell.session().unwrap().grid(DisplayId(0)).unwrap();
    assert!(grid.nudge().is_none());
    assert!(grid.drop_target().is_some());

    let result = controller.complete_drag(&mut shell, p(start.x, 50.));
    assert_eq!(result, DragResult::DropIntoOverview);
}

#[test]
fn dragging_to_another_display_moves_window() {
    let options = Rc::new(DragOptions {
        multi_display_drag: true,
        ..DragOptions::default()
    });
    let mut shell = HeadlessShell::new(options.clone());
    shell.add_display(display_bounds(0, 1200), display_bounds(0, 1200));
    shell.add_display(display_bounds(1200, 1000), display_bounds(1200, 1000));
    shell.add_window(DisplayId(0), Size::from((800., 600.)), true);
    shell.add_window(DisplayId(1), Size::from((800., 600.)), true);
    shell.start_overview();

    let item = item(&shell, 0);
    let start = center(item.target_bounds());
    let mut controller = WindowDragController::new(&shell, item, false, options);
    controller.initiate_drag(&mut shell, start);

    drag_mouse(&mut controller, &mut shell, p(1700., 400.));
    assert_eq!(shell.shared_edge_indicator(), Some(DisplayId(0)));
    let session = shell.session().unwrap();
    assert!(session.item(0).unwrap().phantom_updates() > 0);
    let incoming = session.grid(DisplayId(1)).unwrap().drop_target().unwrap();
    assert!(!incoming.from_this_grid);

    let result = controller.complete_drag(&mut shell, p(1700., 400.));
    assert_eq!(result, DragResult::DropIntoOverview);
    assert_finished(&controller);

    assert_eq!(shell.windows()[0].display(), DisplayId(1));
    assert!(shell.in_overview_session());
    let session = shell.session().unwrap();
    assert!(!session.ignores_window_hierarchy_changes());
    assert!(session.grid(DisplayId(0)).unwrap().item(0).is_none());
    let moved = session.grid(DisplayId(1)).unwrap().item(0).unwrap();
    assert!(moved.restacks_on_animation_end());
    assert_eq!(moved.bounds(), moved.home_bounds());

    assert_snapshot!(shell.events().format(), @r"
    occlusion paused
    shared edge indicator shown on display 0
    item 0 scaled up
    own drop target added on display 0
    split view on display 0: drag of window 0 started
    incoming drop target added on display 1
    shared edge indicator hidden
    phantoms of window 0 destroyed
    drop targets removed
    split view on display 0: drag of window 0 ended at None
    window 0 moved to display 1
    windows positioned
    occlusion unpaused after 300ms
    ");
}

#[test]
fn touch_drag_stays_on_its_display() {
    let options = Rc::new(DragOptions {
        multi_display_drag: true,
        ..DragOptions::default()
    });
    let mut shell = HeadlessShell::new(options.clone());
    shell.add_display(display_bounds(0, 1200), display_bounds(0, 1200));
    shell.add_display(display_bounds(1200, 1000), display_bounds(1200, 1000));
    shell.add_window(DisplayId(0), Size::from((800., 600.)), true);
    shell.start_overview();

    let item = item(&shell, 0);
    let start = center(item.target_bounds());
    let mut controller = WindowDragController::new(&shell, item, true, options);
    controller.initiate_drag(&mut shell, start);

    controller.drag(&mut shell, p(1700., start.y));
    let result = controller.complete_drag(&mut shell, p(1700., start.y));
    assert_eq!(result, DragResult::DropIntoOverview);
    assert_eq!(shell.windows()[0].display(), DisplayId(0));
}

#[test]
fn overview_going_away_mid_drag() {
    let mut shell = single_display_shell(2);
    let (mut controller, start) = start(&mut shell, 0, false, (0., 0.));
    drag_mouse(&mut controller, &mut shell, start + p(100., 0.));

    controller.reset_overview_session();
    shell.end_overview();
    drag_mouse(&mut controller, &mut shell, start + p(200., 0.));
    assert_eq!(controller.behavior(), DragBehavior::NormalDrag);

    let result = controller.complete_drag(&mut shell, start + p(200., 0.));
    assert_eq!(result, DragResult::DropIntoOverview);
    assert_finished(&controller);
    assert!(!shell.is_occlusion_paused());
}

#[test]
fn detached_controller_leaves_overview_alone() {
    let mut shell = single_display_shell(2);
    let (mut controller, start) = start(&mut shell, 0, true, (0., 0.));

    controller.reset_overview_session();
    controller.drag(&mut shell, start + p(0., 300.));
    assert_eq!(controller.behavior(), DragBehavior::DragToClose);

    let result = controller.complete_drag(&mut shell, start + p(0., 300.));
    assert_eq!(result, DragResult::SuccessfulDragToClose);
    // The item could not be reached anymore.
    assert!(!shell.windows()[0].is_closed());
}

#[test]
fn presentation_time_recorded_per_drag() {
    let mut shell = single_display_shell(2);
    let (mut controller, start) = start(&mut shell, 0, false, (0., 0.));
    for step in 1..=10_i32 {
        controller.drag(&mut shell, start + p(f64::from(step) * 10., 0.));
    }
    assert_eq!(shell.presentation_frames(), 10);
    assert!(controller.presentation_time_recorder.is_some());

    controller.complete_drag(&mut shell, start);
    assert!(controller.presentation_time_recorder.is_none());
}

#[test]
#[should_panic(expected = "never started")]
fn completing_twice_panics() {
    let mut shell = single_display_shell(2);
    let (mut controller, start) = start(&mut shell, 0, false, (0., 0.));
    controller.complete_drag(&mut shell, start);
    controller.complete_drag(&mut shell, start);
}

#[test]
#[should_panic(expected = "divider is animating")]
fn snapping_while_divider_animates_panics() {
    let mut shell = single_display_shell(2);
    let (mut controller, start) = start(&mut shell, 0, false, (0., 0.));
    drag_mouse(&mut controller, &mut shell, p(1150., start.y));

    shell.split_view_of_mut(DisplayId(0)).set_divider_animating(true);
    controller.complete_drag(&mut shell, p(1150., start.y));
}

fn arbitrary_x() -> impl Strategy<Value = f64> {
    prop_oneof![-200f64..2400f64, Just(1150.), Just(1700.), Just(600.)]
}

fn arbitrary_y() -> impl Strategy<Value = f64> {
    prop_oneof![-100f64..900f64, Just(50.), Just(400.)]
}

#[derive(Debug, Clone, Copy, Arbitrary)]
enum Op {
    Start {
        #[proptest(strategy = "0..4u32")]
        window: u32,
        touch: bool,
    },
    Drag {
        #[proptest(strategy = "arbitrary_x()")]
        x: f64,
        #[proptest(strategy = "arbitrary_y()")]
        y: f64,
    },
    Complete {
        #[proptest(strategy = "arbitrary_x()")]
        x: f64,
        #[proptest(strategy = "arbitrary_y()")]
        y: f64,
    },
    Fling {
        #[proptest(strategy = "arbitrary_x()")]
        x: f64,
        #[proptest(strategy = "arbitrary_y()")]
        y: f64,
        #[proptest(strategy = "-4000f64..4000f64")]
        velocity_y: f64,
    },
    Reset,
    ResetSession,
}

/// Two displays, a desks bar on the first one and a window snapped on the second one.
struct Harness {
    shell: HeadlessShell,
    options: Rc<DragOptions>,
    controller: Option<Controller>,
}

impl Harness {
    fn new() -> Self {
        let options = Rc::new(DragOptions {
            multi_display_drag: true,
            ..DragOptions::default()
        });
        let mut shell = HeadlessShell::new(options.clone());
        shell.add_display(display_bounds(0, 1200), display_bounds(0, 1200));
        shell.add_display(
            display_bounds(1200, 1000),
            Rectangle::new(Point::from((1200, 0)), Size::from((1000, 760))),
        );
        shell.set_desks_bar(DisplayId(0), 100, 3, 0);
        shell.set_desks_bar_created(true);
        shell.add_window(DisplayId(0), Size::from((800., 600.)), true);
        shell.add_window(DisplayId(0), Size::from((600., 800.)), false);
        shell.add_window(DisplayId(1), Size::from((800., 600.)), true);
        let snapped = shell.add_window(DisplayId(1), Size::from((500., 500.)), true);
        shell.snap(&snapped, SnapPosition::Right);
        shell.start_overview();

        Self {
            shell,
            options,
            controller: None,
        }
    }

    fn verify_invariants(&self) {
        match &self.controller {
            Some(controller) => {
                controller.verify_invariants();
                assert_ne!(controller.behavior(), DragBehavior::NoDrag);
                assert!(self.shell.is_occlusion_paused());
            }
            None => assert!(!self.shell.is_occlusion_paused()),
        }
    }
}

impl Op {
    fn apply(self, harness: &mut Harness) {
        let shell = &mut harness.shell;
        match self {
            Op::Start { window, touch } => {
                if harness.controller.is_some() {
                    return;
                }
                if !shell.in_overview_session() {
                    shell.start_overview();
                }
                let Some(item) = shell.session().and_then(|session| session.item(window)) else {
                    return;
                };

                let location = center(item.target_bounds());
                let mut controller =
                    WindowDragController::new(&*shell, item, touch, harness.options.clone());
                controller.initiate_drag(shell, location);
                harness.controller = Some(controller);
            }
            Op::Drag { x, y } => {
                let Some(controller) = &mut harness.controller else {
                    return;
                };
                if !controller.is_touch_dragging() {
                    shell.move_cursor_to(p(x, y));
                }
                controller.drag(shell, p(x, y));
            }
            Op::Complete { x, y } => {
                let Some(mut controller) = harness.controller.take() else {
                    return;
                };
                if !controller.is_touch_dragging() {
                    shell.move_cursor_to(p(x, y));
                }
                controller.complete_drag(shell, p(x, y));
                assert_finished(&controller);
            }
            Op::Fling { x, y, velocity_y } => {
                let Some(mut controller) = harness.controller.take() else {
                    return;
                };
                controller.fling(shell, p(x, y), 0., velocity_y);
                assert_finished(&controller);
            }
            Op::Reset => {
                let Some(mut controller) = harness.controller.take() else {
                    return;
                };
                controller.reset_gesture(shell);
                assert_finished(&controller);
            }
            Op::ResetSession => {
                let Some(controller) = &mut harness.controller else {
                    return;
                };
                controller.reset_overview_session();
                shell.end_overview();
            }
        }
    }
}

#[track_caller]
fn check_ops(ops: &[Op]) {
    let mut harness = Harness::new();
    for op in ops {
        op.apply(&mut harness);
        harness.verify_invariants();
    }
}

#[test]
fn operations_dont_panic() {
    let every_op = [
        Op::Start {
            window: 0,
            touch: false,
        },
        Op::Start {
            window: 1,
            touch: true,
        },
        Op::Start {
            window: 2,
            touch: false,
        },
        Op::Drag { x: 600., y: 50. },
        Op::Drag { x: 300., y: 700. },
        Op::Drag { x: 1150., y: 400. },
        Op::Drag { x: 1700., y: 400. },
        Op::Drag { x: 20., y: 400. },
        Op::Complete { x: 600., y: 50. },
        Op::Complete { x: 1150., y: 400. },
        Op::Complete { x: 1700., y: 400. },
        Op::Fling {
            x: 300.,
            y: 100.,
            velocity_y: -3000.,
        },
        Op::Fling {
            x: 300.,
            y: 700.,
            velocity_y: 500.,
        },
        Op::Reset,
        Op::ResetSession,
    ];

    let prefixes: [&[Op]; 3] = [
        &[],
        &[Op::Start {
            window: 0,
            touch: true,
        }],
        &[
            Op::Start {
                window: 0,
                touch: true,
            },
            Op::Drag { x: 300., y: 700. },
        ],
    ];

    for prefix in prefixes {
        for third in every_op {
            for second in every_op {
                for first in every_op {
                    let mut ops = prefix.to_vec();
                    ops.extend([first, second, third]);
                    check_ops(&ops);
                }
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: if std::env::var_os("RUN_SLOW_TESTS").is_none() {
            eprintln!("ignoring slow test");
            0
        } else {
            ProptestConfig::default().cases
        },
        ..ProptestConfig::default()
    })]

    #[test]
    fn random_operations_dont_panic(ops: Vec<Op>) {
        check_ops(&ops);
    }
}
