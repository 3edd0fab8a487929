//! Overview mode: every window of every display laid out in a grid per display.
//!
//! The overview itself (grids, items, split view, the rest of the shell) lives behind the traits
//! in this module. What is implemented here is dragging items around in it, see [`drag`].
//!
//! Items are never referenced across calls. Whoever needs an item keeps the window and display
//! root it belongs to, and looks it up through [`OverviewSession::grid_with_root()`] and
//! [`OverviewGrid::item_containing()`] every time.

pub mod drag;
pub mod grid;
pub mod headless;
pub mod item;
pub mod options;
pub mod session;
pub mod shell;
pub mod split_view;

pub use self::drag::{DragBehavior, DragResult, WindowDragController};
pub use self::grid::{AddItemFlags, OverviewGrid};
pub use self::item::{OverviewAnimation, OverviewItem};
pub use self::options::DragOptions;
pub use self::session::OverviewSession;
pub use self::shell::{PresentationTimeRecorder, Shell};
pub use self::split_view::{SnapPosition, SplitViewController, SplitViewState, WindowDraggingState};
