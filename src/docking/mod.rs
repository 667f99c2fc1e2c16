use std::collections::{BTreeMap, VecDeque};

use egui::{Pos2, Vec2};

mod adapter;
mod debug;
mod drag;
mod drop_policy;
mod error;
mod geometry;
mod host;
mod integrity;
mod options;
mod persistence;
mod session;
mod tear_off;
mod title;
mod types;
mod zone;

#[cfg(test)]
mod test_support;

pub use adapter::{
    AdapterState, CanCloseArgs, CanCloseHandler, CloseOutcome, ClosedArgs, ClosedHandler,
    ContentAdapter, ContentKind,
};
pub use drag::{DragOutcome, DragSearch, DragSearchEngine, DragStep, NoTargetReason, run_drag_search};
pub use drop_policy::DropPolicy;
pub use error::DockError;
pub use host::{
    ContinuationQueue, DisplayContent, EventLoop, HighlightRenderer, NoHighlight, PointerSource,
    ScreenGeometry, WindowHost,
};
pub use options::DockingOptions;
pub use persistence::{ItemSnapshot, LayoutSnapshot, RestoredElement, WindowSnapshot, ZoneSnapshot};
pub use types::{
    AdapterId, Continuation, DropDisposition, DropTarget, FloatingWindow, HostWindowHandle,
    Location, Orientation, SplitDirection, WindowId, ZoneId, ZoneKind,
};
pub use zone::{DockZone, Split, Stack, ZoneContent, ZoneTree};

use title::title_for_window;
use types::IdAllocator;
use zone::Cascade;

/// What a display-element factory produces: adapter metadata plus the rendered content.
pub struct DisplayElementParts {
    pub title: String,
    pub tooltip: Option<String>,
    pub content: Box<dyn DisplayContent>,
}

pub type DisplayElementFactory = Box<dyn FnMut() -> DisplayElementParts>;

/// A freshly built adapter and its content, not yet docked anywhere.
///
/// Subscribe to close events on `adapter` before handing it to
/// [`DockingManager::insert_adapter`].
pub struct DisplayElement {
    pub adapter: ContentAdapter,
    pub content: Box<dyn DisplayContent>,
}

/// An insertion that was refused. Ownership of the adapter goes back to the caller.
#[derive(Debug)]
pub struct Rejected {
    pub error: DockError,
    pub adapter: ContentAdapter,
}

/// Owns every floating window, every zone tree and every docked adapter.
///
/// All structural mutation goes through here, on the thread that owns the UI:
/// - docking, closing and moving content,
/// - tear-off into new floating windows ([`Self::do_group_tear_off`]),
/// - re-docking at the end of a drag (see [`DragSearchEngine`]).
///
/// One window is the main window; it always exists, even when empty.
pub struct DockingManager {
    pub options: DockingOptions,

    zones: ZoneTree,
    adapters: BTreeMap<AdapterId, ContentAdapter>,
    windows: BTreeMap<WindowId, FloatingWindow>,
    /// Back to front.
    z_order: Vec<WindowId>,
    main_window: WindowId,

    factories: BTreeMap<ContentKind, DisplayElementFactory>,
    host: Box<dyn WindowHost>,

    adapter_ids: IdAllocator,
    window_ids: IdAllocator,

    /// The floating window currently following the pointer, if any.
    dragging: Option<WindowId>,

    debug_log: VecDeque<String>,
    debug_seq: u64,
}

impl std::fmt::Debug for DockingManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DockingManager")
            .field("zones", &self.zones)
            .field("adapters", &self.adapters)
            .field("windows", &self.windows)
            .field("main_window", &self.main_window)
            .field("dragging", &self.dragging)
            .finish_non_exhaustive()
    }
}

impl DockingManager {
    /// `main_host` is the already existing host window the main dock lives in.
    pub fn new(host: impl WindowHost + 'static, main_host: HostWindowHandle) -> Self {
        Self::new_with_options(host, main_host, DockingOptions::default())
    }

    pub fn new_with_options(
        host: impl WindowHost + 'static,
        main_host: HostWindowHandle,
        options: DockingOptions,
    ) -> Self {
        let mut window_ids = IdAllocator::default();
        let main_window = WindowId::from_u64(window_ids.next_raw());
        let mut zones = ZoneTree::default();
        let root = zones.new_root_stack(main_window, Vec::new());

        let mut windows = BTreeMap::new();
        windows.insert(
            main_window,
            FloatingWindow {
                id: main_window,
                host: main_host,
                root,
                position: Pos2::ZERO,
                size: Vec2::ZERO,
                title: String::new(),
                is_main: true,
            },
        );

        Self {
            options,
            zones,
            adapters: BTreeMap::new(),
            windows,
            z_order: vec![main_window],
            main_window,
            factories: BTreeMap::new(),
            host: Box::new(host),
            adapter_ids: IdAllocator::default(),
            window_ids,
            dragging: None,
            debug_log: VecDeque::new(),
            debug_seq: 0,
        }
    }

    // ------------------------------------------------------------------------
    // Queries

    pub fn zones(&self) -> &ZoneTree {
        &self.zones
    }

    pub fn zone(&self, zone: ZoneId) -> Option<&DockZone> {
        self.zones.get(zone)
    }

    pub fn main_window(&self) -> &FloatingWindow {
        &self.windows[&self.main_window]
    }

    pub fn main_window_id(&self) -> WindowId {
        self.main_window
    }

    pub fn window(&self, window: WindowId) -> Option<&FloatingWindow> {
        self.windows.get(&window)
    }

    /// Every window, main window included, back to front.
    pub fn windows(&self) -> impl Iterator<Item = &FloatingWindow> + '_ {
        self.z_order.iter().filter_map(|id| self.windows.get(id))
    }

    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    /// Number of windows other than the main window.
    pub fn floating_window_count(&self) -> usize {
        self.windows.len().saturating_sub(1)
    }

    pub fn adapter(&self, adapter: AdapterId) -> Option<&ContentAdapter> {
        self.adapters.get(&adapter)
    }

    /// For metadata updates and close subscriptions.
    pub fn adapter_mut(&mut self, adapter: AdapterId) -> Option<&mut ContentAdapter> {
        self.adapters.get_mut(&adapter)
    }

    pub fn adapter_ids(&self) -> impl Iterator<Item = AdapterId> + '_ {
        self.adapters.keys().copied()
    }

    pub fn adapter_count(&self) -> usize {
        self.adapters.len()
    }

    pub fn location(&self, adapter: AdapterId) -> Option<Location> {
        self.zones.location(adapter)
    }

    /// Adapters of a window in depth-first tab order.
    pub fn window_adapters(&self, window: WindowId) -> Vec<AdapterId> {
        self.windows
            .get(&window)
            .map(|w| self.zones.adapters_under(w.root))
            .unwrap_or_default()
    }

    /// The window currently being dragged, if any.
    pub fn dragged_window(&self) -> Option<WindowId> {
        self.dragging
    }

    pub fn find_first_available_dock_zone(&self) -> Option<ZoneId> {
        self.zones.find_first_available_zone(self.main_window().root)
    }

    // ------------------------------------------------------------------------
    // Display elements

    pub fn register_factory(
        &mut self,
        kind: impl Into<ContentKind>,
        factory: impl FnMut() -> DisplayElementParts + 'static,
    ) {
        self.factories.insert(kind.into(), Box::new(factory));
    }

    pub fn has_factory(&self, kind: &ContentKind) -> bool {
        self.factories.contains_key(kind)
    }

    /// Builds an adapter and its content from the factory registered for `kind`.
    ///
    /// The adapter is not docked; the caller picks where it goes.
    pub fn build_new_display_element(
        &mut self,
        kind: impl Into<ContentKind>,
    ) -> Option<DisplayElement> {
        let kind = kind.into();
        let Some(factory) = self.factories.get_mut(&kind) else {
            log::warn!("no display element factory registered for {:?}", kind.as_str());
            return None;
        };
        let parts = factory();

        let id = AdapterId::from_u64(self.adapter_ids.next_raw());
        let mut adapter = ContentAdapter::new(id, kind, parts.title);
        adapter.tooltip = parts.tooltip;

        let mut content = parts.content;
        content.setup(&adapter);
        Some(DisplayElement { adapter, content })
    }

    /// Docks a built adapter into the stack `zone` at `index` (clamped).
    pub fn insert_adapter(
        &mut self,
        adapter: ContentAdapter,
        zone: ZoneId,
        index: usize,
    ) -> Result<Location, Rejected> {
        if self.adapters.contains_key(&adapter.id) {
            let error = DockError::AdapterAlreadyDocked {
                adapter: adapter.id,
                zone: self.zones.holder_of(adapter.id).unwrap_or(zone),
            };
            return Err(Rejected { error, adapter });
        }

        let id = adapter.id;
        let index = match self.zones.add_content(zone, id, index) {
            Ok(index) => index,
            Err(error) => return Err(Rejected { error, adapter }),
        };
        let window = self.zones.get(zone).map_or(self.main_window, |z| z.window);
        self.adapters.insert(id, adapter);
        self.debug_log_event(format!("insert {id:?} into {zone:?} at {index}"));
        self.after_mutation("insert_adapter");

        Ok(Location {
            window,
            zone,
            index,
        })
    }

    /// Docks into [`Self::find_first_available_dock_zone`] as the last tab.
    pub fn dock_into_first_available(
        &mut self,
        adapter: ContentAdapter,
    ) -> Result<Location, Rejected> {
        match self.find_first_available_dock_zone() {
            Some(zone) => self.insert_adapter(adapter, zone, usize::MAX),
            None => {
                let root = self.main_window().root;
                Err(Rejected {
                    error: DockError::NotAStack(root),
                    adapter,
                })
            }
        }
    }

    // ------------------------------------------------------------------------
    // Structure

    pub fn select(&mut self, adapter: AdapterId) -> Result<(), DockError> {
        let location = self.location(adapter).ok_or(DockError::UnknownAdapter(adapter))?;
        self.zones.set_selected(location.zone, location.index)?;
        self.refresh_title(location.window);
        Ok(())
    }

    /// Non-droppable stacks are skipped by zone discovery and drag search.
    pub fn set_zone_droppable(&mut self, zone: ZoneId, droppable: bool) -> Result<(), DockError> {
        self.zones.set_droppable(zone, droppable)
    }

    pub fn bring_to_front(&mut self, window: WindowId) {
        if self.windows.contains_key(&window) {
            self.z_order.retain(|&id| id != window);
            self.z_order.push(window);
        }
    }

    /// Moves a docked adapter into `target`, either as a tab or as a new split side.
    ///
    /// The target is validated before anything is detached, so a refused move changes nothing.
    pub fn move_adapter(
        &mut self,
        adapter: AdapterId,
        target: ZoneId,
        disposition: DropDisposition,
    ) -> Result<Location, DockError> {
        let source = self.location(adapter).ok_or(DockError::UnknownAdapter(adapter))?;
        let zone = self.zones.get(target).ok_or(DockError::UnknownZone(target))?;
        if zone.destroying {
            return Err(DockError::ZoneDestroying(target));
        }
        if zone.kind() != ZoneKind::Stack {
            return Err(DockError::NotAStack(target));
        }
        let target_window = zone.window;
        let alone_in_target = source.zone == target && zone.adapters().len() == 1;
        if alone_in_target {
            return match disposition {
                DropDisposition::Center => Ok(source),
                DropDisposition::Split(_) => Err(DockError::EmptySplitContent(target)),
            };
        }
        let fallback_position = self.windows.get(&source.window).map_or(Pos2::ZERO, |w| w.position);

        let (_, cascade) = self.zones.remove_content(adapter)?;
        let target_removed = cascade.removed_zones.contains(&target);
        self.apply_cascade(cascade);

        let placed = if target_removed {
            Err(DockError::UnknownZone(target))
        } else {
            match disposition {
                DropDisposition::Center => {
                    self.zones.add_content(target, adapter, usize::MAX).map(|_| ())
                }
                DropDisposition::Split(direction) => self
                    .zones
                    .split(target, direction, vec![adapter])
                    .map(|side| self.adopt_root(target_window, side)),
            }
        };
        if let Err(err) = placed {
            log::error!("move {adapter:?}: placement failed after validation ({err}), floating it");
            self.spawn_window(vec![adapter], fallback_position, self.options.default_floating_size);
        }
        self.refresh_title(source.window);
        self.refresh_title(target_window);
        self.debug_log_event(format!("move {adapter:?} from {source:?} to {target:?} ({disposition:?})"));
        self.after_mutation("move_adapter");

        self.location(adapter).ok_or(DockError::UnknownAdapter(adapter))
    }

    // ------------------------------------------------------------------------
    // Closing

    /// Asks `adapter` to close.
    ///
    /// With `forced == false` the `CanClose` subscribers are consulted in registration order and
    /// the first veto cancels the close. Otherwise (or if nobody vetoes) the adapter is removed
    /// from its zone, empty zones and windows are cleaned up, and then `Closed` fires once.
    pub fn request_close(
        &mut self,
        adapter: AdapterId,
        forced: bool,
    ) -> Result<CloseOutcome, DockError> {
        let entry = self
            .adapters
            .get_mut(&adapter)
            .ok_or(DockError::UnknownAdapter(adapter))?;

        if !forced {
            entry.state = AdapterState::ClosePending;
            if !entry.negotiate_close() {
                entry.state = AdapterState::Active;
                self.debug_log_event(format!("close {adapter:?} vetoed"));
                return Ok(CloseOutcome::Cancelled);
            }
        }

        let Some(mut closed) = self.adapters.remove(&adapter) else {
            return Err(DockError::UnknownAdapter(adapter));
        };
        closed.state = AdapterState::Closed;
        self.detach_and_clean_up(adapter);
        self.debug_log_event(format!("close {adapter:?} forced={forced}"));
        self.after_mutation("request_close");

        closed.fire_closed(forced);
        Ok(CloseOutcome::Closed)
    }

    /// Force-closes every adapter in every window, then empties the main window and destroys
    /// every other window. Returns the number of adapters closed.
    pub fn force_close_all_and_clear(&mut self) -> usize {
        let window_ids: Vec<WindowId> = self.z_order.clone();
        for window in &window_ids {
            if let Some(root) = self.windows.get(window).map(|w| w.root) {
                self.zones.mark_destroying(root, true);
            }
        }

        let all: Vec<AdapterId> = window_ids
            .iter()
            .flat_map(|&window| self.window_adapters(window))
            .collect();
        let mut closed = 0;
        for adapter in all {
            if self.request_close(adapter, true).is_ok() {
                closed += 1;
            }
        }

        for window in window_ids {
            if window == self.main_window {
                continue;
            }
            self.destroy_window(window);
        }
        let main_root = self.main_window().root;
        let leftovers = self.zones.take_all_content(main_root);
        for adapter in leftovers {
            self.adapters.remove(&adapter);
        }
        self.dragging = None;

        self.debug_log_event(format!("force_close_all_and_clear closed={closed}"));
        self.after_mutation("force_close_all_and_clear");
        closed
    }

    // ------------------------------------------------------------------------
    // Internals shared by tear-off, drag and persistence

    fn detach_and_clean_up(&mut self, adapter: AdapterId) {
        match self.zones.remove_content(adapter) {
            Ok((location, cascade)) => {
                self.apply_cascade(cascade);
                self.refresh_title(location.window);
            }
            Err(err) => log::warn!("detach {adapter:?}: {err}"),
        }
    }

    /// Re-points windows whose root split collapsed, then destroys non-main windows whose root
    /// was emptied by `cascade`.
    fn apply_cascade(&mut self, cascade: Cascade) {
        if let Some((old, new)) = cascade.rerooted {
            if let Some(window) = self.windows.values_mut().find(|w| w.root == old) {
                window.root = new;
            }
        }
        let Some(root) = cascade.emptied_root else {
            return;
        };
        let Some(window) = self.zones.get(root).map(|z| z.window) else {
            return;
        };
        if window != self.main_window && self.zones.adapters_under(root).is_empty() {
            self.destroy_window(window);
        }
    }

    /// Makes the top of the tree holding `inside` the root of `window`.
    fn adopt_root(&mut self, window: WindowId, inside: ZoneId) {
        let top = self.zones.top_of(inside);
        if let Some(w) = self.windows.get_mut(&window) {
            w.root = top;
        }
    }

    fn spawn_window(&mut self, adapters: Vec<AdapterId>, position: Pos2, size: Vec2) -> WindowId {
        let id = WindowId::from_u64(self.window_ids.next_raw());
        let root = self.zones.new_root_stack(id, adapters);
        let title = title_for_window(&self.zones, &self.adapters, root);
        let host = self.host.create_window(id, &title, position, size);

        self.windows.insert(
            id,
            FloatingWindow {
                id,
                host,
                root,
                position,
                size,
                title,
                is_main: false,
            },
        );
        self.z_order.push(id);
        self.debug_log_event(format!("spawn {id:?} at ({:.1},{:.1})", position.x, position.y));
        id
    }

    /// Removes a non-main window, its zones and any adapters still in them.
    fn destroy_window(&mut self, window: WindowId) {
        if window == self.main_window {
            return;
        }
        let Some(removed) = self.windows.remove(&window) else {
            return;
        };
        for adapter in self.zones.adapters_under(removed.root) {
            self.adapters.remove(&adapter);
        }
        self.zones.remove_subtree(removed.root);
        self.z_order.retain(|&id| id != window);
        if self.dragging == Some(window) {
            self.dragging = None;
        }
        self.host.destroy_window(removed.host);
        self.debug_log_event(format!("destroy {window:?}"));
    }

    fn refresh_title(&mut self, window: WindowId) {
        let Some(root) = self.windows.get(&window).filter(|w| !w.is_main).map(|w| w.root) else {
            return;
        };
        let title = title_for_window(&self.zones, &self.adapters, root);
        if let Some(w) = self.windows.get_mut(&window) {
            if w.title != title {
                self.host.set_window_title(w.host, &title);
                w.title = title;
            }
        }
    }

    fn move_window(&mut self, window: WindowId, position: Pos2) {
        if let Some(w) = self.windows.get_mut(&window) {
            if w.position != position {
                w.position = position;
                self.host.move_window(w.host, position);
            }
        }
    }
}
