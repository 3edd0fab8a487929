use std::time::Duration;

use overview_drag_config::Config;

/// Resolved tunables for overview window drags.
#[derive(Debug, Clone, PartialEq)]
pub struct DragOptions {
    pub minimum_drag_distance: f64,
    pub drag_to_close_distance: f64,
    pub fling_to_close_velocity: f64,
    pub item_min_opacity: f64,
    pub snap_distance_from_edge: f64,
    pub minimum_drag_to_snap_distance: f64,
    pub occlusion_pause_duration: Duration,
    pub window_margin: f64,
    pub header_height: f64,
    pub highlight_primary_axis_ratio: f64,
    pub highlight_edge_padding: f64,
    /// Dragging items across displays, with shared-edge indicators and phantoms.
    pub multi_display_drag: bool,
}

impl Default for DragOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl DragOptions {
    pub fn from_config(config: &Config) -> Self {
        let drag = &config.overview.window_drag;
        Self {
            minimum_drag_distance: drag.minimum_drag_distance.0,
            drag_to_close_distance: drag.drag_to_close_distance.0,
            fling_to_close_velocity: drag.fling_to_close_velocity.0,
            item_min_opacity: drag.item_min_opacity.0,
            snap_distance_from_edge: drag.snap_distance_from_edge.0,
            minimum_drag_to_snap_distance: drag.minimum_drag_to_snap_distance.0,
            occlusion_pause_duration: Duration::from_millis(u64::from(drag.occlusion_pause_ms)),
            window_margin: drag.window_margin.0,
            header_height: drag.header_height.0,
            highlight_primary_axis_ratio: drag.highlight_primary_axis_ratio.0,
            highlight_edge_padding: drag.highlight_edge_padding.0,
            multi_display_drag: drag.multi_display_drag,
        }
    }
}
