use egui::Vec2;

use super::drop_policy::DropPolicy;

/// Options for [`super::DockingManager`].
#[derive(Clone, Debug)]
pub struct DockingOptions {
    /// How the pointer position within a candidate zone maps to merge vs. split.
    pub drop_policy: DropPolicy,

    /// Size (in points) given to floating windows created by a tear-off.
    pub default_floating_size: Vec2,

    /// Offset from the window's top-left corner to the pointer when a window is torn off.
    ///
    /// The new window is placed at `desktop_point - tear_off_grab_offset` so the pointer lands on
    /// its header, and keeps that offset while dragged.
    pub tear_off_grab_offset: Vec2,

    /// If true, record structural events in a small ring buffer (see `debug_log_text`).
    pub debug_event_log: bool,

    /// Maximum number of debug log lines to keep (ring buffer).
    pub debug_event_log_capacity: usize,

    /// If true, check the zone-tree invariants after every structural mutation.
    pub debug_integrity: bool,

    /// If true, panic on integrity issues (debug builds only).
    pub debug_integrity_panic: bool,
}

impl Default for DockingOptions {
    fn default() -> Self {
        Self {
            drop_policy: DropPolicy::default(),
            default_floating_size: Vec2::new(480.0, 360.0),
            tear_off_grab_offset: Vec2::new(20.0, 10.0),
            debug_event_log: false,
            debug_event_log_capacity: 200,
            debug_integrity: false,
            debug_integrity_panic: false,
        }
    }
}
