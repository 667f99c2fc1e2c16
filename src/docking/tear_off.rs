use egui::Pos2;

use super::DockingManager;
use super::host::EventLoop;
use super::types::{Continuation, Location, WindowId, ZoneKind};

impl DockingManager {
    /// Detaches `len` adjacent tabs starting at `source` into a new floating window placed at
    /// `desktop_point`.
    ///
    /// Returns `None`, leaving the tree untouched, if `source` no longer resolves to a live
    /// stack and tab, if `len` is zero, or if the source window is itself being dragged.
    /// The source is cleaned up afterwards: an emptied stack is removed from its parent and an
    /// emptied floating window is destroyed (the main window is only cleared).
    pub fn do_group_tear_off(
        &mut self,
        source: Location,
        len: usize,
        desktop_point: Pos2,
    ) -> Option<WindowId> {
        let Some(range) = self.resolve_tear_off_range(source, len) else {
            log::warn!("tear-off refused: {source:?} len={len} does not resolve");
            return None;
        };

        let (adapters, cascade) = match self.zones.detach_range(source.zone, range) {
            Ok(detached) => detached,
            Err(err) => {
                log::warn!("tear-off refused: {err}");
                return None;
            }
        };

        let position = desktop_point - self.options.tear_off_grab_offset;
        let size = self.options.default_floating_size;
        let torn = adapters.len();
        let window = self.spawn_window(adapters, position, size);

        self.apply_cascade(cascade);
        self.refresh_title(source.window);
        self.bring_to_front(window);
        self.debug_log_event(format!(
            "tear_off {torn} tab(s) from {source:?} into {window:?}"
        ));
        self.after_mutation("do_group_tear_off");
        Some(window)
    }

    /// Tears off and posts the drag search to the host event loop, so it starts only after the
    /// new window exists on screen.
    pub fn tear_off_and_drag(
        &mut self,
        source: Location,
        len: usize,
        desktop_point: Pos2,
        event_loop: &mut dyn EventLoop,
    ) -> Option<WindowId> {
        let window = self.do_group_tear_off(source, len, desktop_point)?;
        event_loop.post(Continuation::StartDragSearch {
            window,
            origin: source,
        });
        Some(window)
    }

    fn resolve_tear_off_range(&self, source: Location, len: usize) -> Option<std::ops::Range<usize>> {
        if len == 0 || self.dragging == Some(source.window) {
            return None;
        }
        self.windows.get(&source.window)?;

        let zone = self.zones.get(source.zone)?;
        if zone.window != source.window || zone.destroying || zone.kind() != ZoneKind::Stack {
            return None;
        }
        let tabs = zone.adapters().len();
        (source.index < tabs).then(|| source.index..source.index.saturating_add(len).min(tabs))
    }
}
