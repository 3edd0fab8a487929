use crate::FloatOrInt;

#[derive(knuffel::Decode, Debug, Default, Clone, PartialEq)]
pub struct Overview {
    #[knuffel(child, default)]
    pub window_drag: WindowDrag,
}

/// Tunables for dragging window items around in the overview.
///
/// Distances are in logical pixels, velocities in logical pixels per second.
#[derive(knuffel::Decode, Debug, Clone, PartialEq)]
pub struct WindowDrag {
    /// Movement below this along both axes is treated as a click.
    #[knuffel(child, unwrap(argument), default = Self::default().minimum_drag_distance)]
    pub minimum_drag_distance: FloatOrInt<0, 65535>,
    /// Vertical distance past which releasing a drag-to-close closes the window.
    #[knuffel(child, unwrap(argument), default = Self::default().drag_to_close_distance)]
    pub drag_to_close_distance: FloatOrInt<1, 65535>,
    /// Vertical fling velocity past which the window closes right away.
    #[knuffel(child, unwrap(argument), default = Self::default().fling_to_close_velocity)]
    pub fling_to_close_velocity: FloatOrInt<0, 1000000>,
    /// Lowest opacity reached while dragging to close.
    #[knuffel(child, unwrap(argument), default = Self::default().item_min_opacity)]
    pub item_min_opacity: FloatOrInt<0, 1>,
    /// Items this close to a screen edge snap even without travelling far.
    #[knuffel(child, unwrap(argument), default = Self::default().snap_distance_from_edge)]
    pub snap_distance_from_edge: FloatOrInt<0, 65535>,
    /// Travel needed before an item may snap, to avoid accidental snaps.
    #[knuffel(child, unwrap(argument), default = Self::default().minimum_drag_to_snap_distance)]
    pub minimum_drag_to_snap_distance: FloatOrInt<0, 65535>,
    /// How long occlusion tracking stays paused after a drag ends.
    #[knuffel(child, unwrap(argument), default = Self::default().occlusion_pause_ms)]
    pub occlusion_pause_ms: u16,
    /// Margin the overview adds around window contents.
    #[knuffel(child, unwrap(argument), default = Self::default().window_margin)]
    pub window_margin: FloatOrInt<0, 65535>,
    /// Height of the title header the overview draws above window contents.
    #[knuffel(child, unwrap(argument), default = Self::default().header_height)]
    pub header_height: FloatOrInt<0, 65535>,
    /// Fraction of the work area along the primary axis that acts as a snap hot zone.
    #[knuffel(child, unwrap(argument), default = Self::default().highlight_primary_axis_ratio)]
    pub highlight_primary_axis_ratio: FloatOrInt<0, 1>,
    /// Fixed padding added to the snap hot zone.
    #[knuffel(child, unwrap(argument), default = Self::default().highlight_edge_padding)]
    pub highlight_edge_padding: FloatOrInt<0, 65535>,
    /// Allow dragging items across displays, with shared-edge indicators and phantoms.
    #[knuffel(child)]
    pub multi_display_drag: bool,
}

impl Default for WindowDrag {
    fn default() -> Self {
        Self {
            minimum_drag_distance: FloatOrInt(5.),
            drag_to_close_distance: FloatOrInt(160.),
            fling_to_close_velocity: FloatOrInt(2000.),
            item_min_opacity: FloatOrInt(0.4),
            snap_distance_from_edge: FloatOrInt(16.),
            minimum_drag_to_snap_distance: FloatOrInt(96.),
            occlusion_pause_ms: 300,
            window_margin: FloatOrInt(5.),
            header_height: FloatOrInt(40.),
            highlight_primary_axis_ratio: FloatOrInt(0.1),
            highlight_edge_padding: FloatOrInt(8.),
            multi_display_drag: false,
        }
    }
}
