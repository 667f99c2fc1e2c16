use egui::{Pos2, Vec2};

use super::DockingManager;
use super::error::DockError;
use super::host::{HighlightRenderer, PointerSource, ScreenGeometry};
use super::session::DragSession;
use super::types::{Continuation, DropDisposition, DropTarget, Location, WindowId, ZoneId, ZoneKind};

/// One in-flight drag of a floating window, as handed to [`DragSearchEngine::start`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragSearch {
    window: WindowId,
    origin: Option<Location>,
    grab_offset: Vec2,
    candidate: Option<DropTarget>,
    started: bool,
}

impl DragSearch {
    pub fn window(&self) -> WindowId {
        self.window
    }

    /// Where the dragged content was torn off from, if it came from a tear-off.
    pub fn origin(&self) -> Option<Location> {
        self.origin
    }

    /// The drop target currently highlighted.
    pub fn candidate(&self) -> Option<DropTarget> {
        self.candidate
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NoTargetReason {
    /// Released with nothing under the pointer.
    Released,
    /// The primary button was already up on the first sample, so the drag never started.
    ButtonNotPressed,
    /// [`DragSearchEngine::abort`] was called.
    Aborted,
    /// The dragged window disappeared mid-drag.
    WindowDestroyed,
    /// A candidate was found but the drop could not be applied; nothing moved.
    Refused(DockError),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DragOutcome {
    /// The dragged content now lives in `zone`; the dragged window is gone.
    Docked { target: DropTarget, zone: ZoneId },
    /// The dragged window (if it still exists) stays a standalone floating window.
    NoTarget {
        window: Option<WindowId>,
        reason: NoTargetReason,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DragStep {
    /// No drag in progress.
    Idle,
    /// Sampled; call again on a later event-loop turn.
    Continue,
    Finished(DragOutcome),
}

/// Tracks the pointer for one drag at a time.
///
/// The host calls [`Self::step`] once per event-loop turn while a drag is active. Each step
/// samples the pointer, moves the dragged window along, and updates the highlighted drop
/// target. Releasing the primary button ends the drag.
#[derive(Debug, Default)]
pub struct DragSearchEngine {
    active: Option<DragSearch>,
    session: DragSession,
    abort_requested: bool,
}

impl DragSearchEngine {
    /// Returns `false` (and ignores `search`) if a drag is already running.
    pub fn start(&mut self, search: DragSearch) -> bool {
        if self.active.is_some() {
            log::warn!("drag search for {:?} ignored: another drag is active", search.window);
            return false;
        }
        let message = self.session.begin(search.window);
        log::debug!("{message}");
        self.active = Some(search);
        self.abort_requested = false;
        true
    }

    /// Starts the drag described by a continuation posted by a tear-off.
    pub fn accept(&mut self, manager: &mut DockingManager, continuation: Continuation) -> bool {
        match continuation {
            Continuation::StartDragSearch { window, origin } => {
                if self.active.is_some() {
                    return false;
                }
                match manager.begin_drag_search(window, Some(origin)) {
                    Ok(search) => self.start(search),
                    Err(err) => {
                        log::warn!("drag search for {window:?} not started: {err}");
                        false
                    }
                }
            }
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<&DragSearch> {
        self.active.as_ref()
    }

    /// Ends the drag on the next step as a release with no target.
    pub fn abort(&mut self) {
        if self.active.is_some() {
            self.abort_requested = true;
        }
    }

    /// Takes one pointer sample.
    pub fn step(
        &mut self,
        manager: &mut DockingManager,
        pointer: &dyn PointerSource,
        geometry: &dyn ScreenGeometry,
        highlight: &mut dyn HighlightRenderer,
    ) -> DragStep {
        let Some(mut search) = self.active else {
            return DragStep::Idle;
        };
        self.session.observe_sample();

        if self.abort_requested {
            return self.finish(manager, highlight, search, NoTargetReason::Aborted);
        }
        if manager.window(search.window).is_none() {
            return self.finish(manager, highlight, search, NoTargetReason::WindowDestroyed);
        }

        if !pointer.primary_pressed() {
            if !search.started {
                return self.finish(manager, highlight, search, NoTargetReason::ButtonNotPressed);
            }
            return self.release(manager, highlight, search);
        }
        search.started = true;

        if let Some(pos) = pointer.pointer_pos() {
            manager.move_window(search.window, pos - search.grab_offset);

            let candidate = manager
                .stack_under_pointer(geometry, pos, Some(search.window))
                .and_then(|(zone, rect)| {
                    let disposition = manager.options.drop_policy.disposition(rect, pos)?;
                    Some(DropTarget { zone, disposition })
                });
            if candidate != search.candidate {
                log::trace!(
                    "drag {:?} candidate {:?} -> {candidate:?}",
                    search.window,
                    search.candidate
                );
                search.candidate = candidate;
                highlight.show_highlight(candidate);
            }
        }

        self.active = Some(search);
        DragStep::Continue
    }

    fn release(
        &mut self,
        manager: &mut DockingManager,
        highlight: &mut dyn HighlightRenderer,
        search: DragSearch,
    ) -> DragStep {
        let message = self.session.release("drop");
        manager.debug_log_event(message);

        let Some(target) = search.candidate else {
            return self.finish(manager, highlight, search, NoTargetReason::Released);
        };

        match manager.dock_window_into(search.window, target) {
            Ok(zone) => {
                self.clear(manager, highlight, search);
                DragStep::Finished(DragOutcome::Docked { target, zone })
            }
            Err(err) => {
                log::warn!("drop of {:?} onto {target:?} refused: {err}", search.window);
                self.finish(manager, highlight, search, NoTargetReason::Refused(err))
            }
        }
    }

    fn finish(
        &mut self,
        manager: &mut DockingManager,
        highlight: &mut dyn HighlightRenderer,
        search: DragSearch,
        reason: NoTargetReason,
    ) -> DragStep {
        self.clear(manager, highlight, search);
        let window = manager.window(search.window).map(|w| w.id());
        manager.debug_log_event(format!("drag {:?} ended without target: {reason:?}", search.window));
        DragStep::Finished(DragOutcome::NoTarget { window, reason })
    }

    fn clear(
        &mut self,
        manager: &mut DockingManager,
        highlight: &mut dyn HighlightRenderer,
        search: DragSearch,
    ) {
        if search.candidate.is_some() {
            highlight.show_highlight(None);
        }
        manager.end_drag(search.window);
        if let Some(message) = self.session.end() {
            manager.debug_log_event(message);
        }
        self.active = None;
        self.abort_requested = false;
    }
}

/// Runs `search` until release, calling `yield_now` between samples.
///
/// Hosts with their own event loop call [`DragSearchEngine::step`] instead; this is the
/// synchronous loop for tests and simple embedders.
pub fn run_drag_search(
    manager: &mut DockingManager,
    search: DragSearch,
    pointer: &dyn PointerSource,
    geometry: &dyn ScreenGeometry,
    highlight: &mut dyn HighlightRenderer,
    mut yield_now: impl FnMut(),
) -> DragOutcome {
    let mut engine = DragSearchEngine::default();
    engine.start(search);
    loop {
        match engine.step(manager, pointer, geometry, highlight) {
            DragStep::Continue => yield_now(),
            DragStep::Finished(outcome) => return outcome,
            DragStep::Idle => {
                return DragOutcome::NoTarget {
                    window: manager.window(search.window).map(|w| w.id()),
                    reason: NoTargetReason::Aborted,
                };
            }
        }
    }
}

impl DockingManager {
    /// Prepares a drag of a window that was just torn off; the pointer keeps the configured
    /// tear-off grab offset.
    pub fn begin_drag_search(
        &mut self,
        window: WindowId,
        origin: Option<Location>,
    ) -> Result<DragSearch, DockError> {
        let grab_offset = self.options.tear_off_grab_offset;
        self.begin_drag(window, origin, grab_offset)
    }

    /// Prepares a drag of an existing floating window grabbed at `grab_point` (desktop space).
    pub fn begin_window_drag(
        &mut self,
        window: WindowId,
        grab_point: Pos2,
    ) -> Result<DragSearch, DockError> {
        let position = self
            .windows
            .get(&window)
            .ok_or(DockError::UnknownWindow(window))?
            .position;
        self.begin_drag(window, None, grab_point - position)
    }

    fn begin_drag(
        &mut self,
        window: WindowId,
        origin: Option<Location>,
        grab_offset: Vec2,
    ) -> Result<DragSearch, DockError> {
        let floating = self
            .windows
            .get(&window)
            .ok_or(DockError::UnknownWindow(window))?;
        if floating.is_main {
            return Err(DockError::MainWindow(window));
        }

        self.dragging = Some(window);
        self.bring_to_front(window);
        Ok(DragSearch {
            window,
            origin,
            grab_offset,
            candidate: None,
            started: false,
        })
    }

    pub(super) fn end_drag(&mut self, window: WindowId) {
        if self.dragging == Some(window) {
            self.dragging = None;
        }
    }

    /// Moves the content of the floating window `dragged` into `target`, then destroys it.
    ///
    /// `Center` appends every tab of the window to the target stack. `Split` moves the window's
    /// whole zone tree beside the target, so a split layout survives the drop. Everything is
    /// validated before the first change; a refused drop leaves both windows untouched.
    pub(super) fn dock_window_into(
        &mut self,
        dragged: WindowId,
        target: DropTarget,
    ) -> Result<ZoneId, DockError> {
        let window = self
            .windows
            .get(&dragged)
            .ok_or(DockError::UnknownWindow(dragged))?;
        if window.is_main {
            return Err(DockError::MainWindow(dragged));
        }
        let root = window.root;

        let zone = self
            .zones
            .get(target.zone)
            .ok_or(DockError::UnknownZone(target.zone))?;
        if zone.window == dragged {
            return Err(DockError::DropOntoSelf(dragged));
        }
        if zone.destroying {
            return Err(DockError::ZoneDestroying(target.zone));
        }
        if zone.kind() != ZoneKind::Stack {
            return Err(DockError::NotAStack(target.zone));
        }
        if !zone.is_droppable() {
            return Err(DockError::NotDroppable(target.zone));
        }
        let target_window = zone.window;

        let placed = match target.disposition {
            DropDisposition::Center => self
                .zones
                .merge_subtree(target.zone, root)
                .map(|_| target.zone)?,
            DropDisposition::Split(direction) => {
                let placed = self.zones.split_with_subtree(target.zone, direction, root)?;
                self.adopt_root(target_window, placed);
                let emptied = self.zones.new_root_stack(dragged, Vec::new());
                if let Some(w) = self.windows.get_mut(&dragged) {
                    w.root = emptied;
                }
                placed
            }
        };

        self.destroy_window(dragged);
        self.refresh_title(target_window);
        self.debug_log_event(format!(
            "dock {dragged:?} into {:?} ({:?}) -> {placed:?}",
            target.zone, target.disposition
        ));
        self.after_mutation("dock_window_into");
        Ok(placed)
    }
}
