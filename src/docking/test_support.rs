use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use egui::{Pos2, Rect, Vec2};

use super::{
    AdapterId, ContentAdapter, DisplayContent, DisplayElementParts, DockingManager,
    DockingOptions, DropTarget, HighlightRenderer, HostWindowHandle, PointerSource,
    ScreenGeometry, WindowHost, WindowId, ZoneId,
};

pub(super) const MAIN_HOST: HostWindowHandle = HostWindowHandle(1000);

#[derive(Clone, Debug, PartialEq)]
pub(super) enum HostEvent {
    Created {
        window: WindowId,
        title: String,
        position: Pos2,
    },
    Destroyed(HostWindowHandle),
    Moved(HostWindowHandle, Pos2),
    Titled(HostWindowHandle, String),
}

/// Window host that records every call. Clones share the same log.
#[derive(Clone, Default)]
pub(super) struct RecordingHost {
    events: Rc<RefCell<Vec<HostEvent>>>,
    next_handle: Rc<Cell<u64>>,
}

impl RecordingHost {
    pub(super) fn events(&self) -> Vec<HostEvent> {
        self.events.borrow().clone()
    }

    pub(super) fn destroyed_count(&self) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|e| matches!(e, HostEvent::Destroyed(_)))
            .count()
    }

    pub(super) fn created_count(&self) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|e| matches!(e, HostEvent::Created { .. }))
            .count()
    }
}

impl WindowHost for RecordingHost {
    fn create_window(
        &mut self,
        window: WindowId,
        title: &str,
        position: Pos2,
        _size: Vec2,
    ) -> HostWindowHandle {
        let handle = self.next_handle.get() + 1;
        self.next_handle.set(handle);
        self.events.borrow_mut().push(HostEvent::Created {
            window,
            title: title.to_owned(),
            position,
        });
        HostWindowHandle(handle)
    }

    fn destroy_window(&mut self, handle: HostWindowHandle) {
        self.events.borrow_mut().push(HostEvent::Destroyed(handle));
    }

    fn move_window(&mut self, handle: HostWindowHandle, position: Pos2) {
        self.events.borrow_mut().push(HostEvent::Moved(handle, position));
    }

    fn set_window_title(&mut self, handle: HostWindowHandle, title: &str) {
        self.events
            .borrow_mut()
            .push(HostEvent::Titled(handle, title.to_owned()));
    }
}

/// Content that keeps whatever state it is given.
#[derive(Default)]
pub(super) struct TestContent {
    pub(super) state: Option<String>,
}

impl DisplayContent for TestContent {
    fn setup(&mut self, _adapter: &ContentAdapter) {}

    fn set_state(&mut self, state: &str) {
        self.state = Some(state.to_owned());
    }

    fn generate_state(&self) -> Option<String> {
        self.state.clone()
    }
}

pub(super) fn new_manager() -> (DockingManager, RecordingHost) {
    env_logger::builder().is_test(true).try_init().ok();
    let options = DockingOptions {
        debug_integrity: true,
        debug_integrity_panic: true,
        ..Default::default()
    };
    let host = RecordingHost::default();
    let mut manager = DockingManager::new_with_options(host.clone(), MAIN_HOST, options);
    manager.register_factory("doc", || DisplayElementParts {
        title: "Doc".to_owned(),
        tooltip: None,
        content: Box::new(TestContent::default()),
    });
    (manager, host)
}

/// Builds a "doc" element titled `title` and docks it as the last tab of `zone`.
pub(super) fn add_doc(manager: &mut DockingManager, zone: ZoneId, title: &str) -> AdapterId {
    let Some(element) = manager.build_new_display_element("doc") else {
        panic!("doc factory missing");
    };
    let mut adapter = element.adapter;
    adapter.set_title(title);
    let id = adapter.id();
    if let Err(rejected) = manager.insert_adapter(adapter, zone, usize::MAX) {
        panic!("insert of {title} refused: {}", rejected.error);
    }
    id
}

/// Docks one tab per title into the main window's root stack.
pub(super) fn main_with_docs(titles: &[&str]) -> (DockingManager, RecordingHost, Vec<AdapterId>) {
    let (mut manager, host) = new_manager();
    let root = manager.main_window().root();
    let ids = titles.iter().map(|t| add_doc(&mut manager, root, t)).collect();
    (manager, host, ids)
}

pub(super) fn titles(manager: &DockingManager, window: WindowId) -> Vec<String> {
    manager
        .window_adapters(window)
        .into_iter()
        .filter_map(|id| manager.adapter(id).map(|a| a.title().to_owned()))
        .collect()
}

pub(super) fn assert_integrity(manager: &DockingManager) {
    let issues = manager.integrity_issues();
    assert!(
        issues.is_empty(),
        "integrity failed:\n{}",
        issues.join("\n")
    );
}

/// Replays a fixed pointer script. Each `advance` moves to the next sample; past the end the
/// button reads as released.
pub(super) struct ScriptedPointer {
    samples: Vec<(bool, Option<Pos2>)>,
    cursor: Cell<usize>,
}

impl ScriptedPointer {
    pub(super) fn new(samples: Vec<(bool, Option<Pos2>)>) -> Self {
        Self {
            samples,
            cursor: Cell::new(0),
        }
    }

    /// Pressed at each point, then released at the last one.
    pub(super) fn drag_through(points: &[Pos2]) -> Self {
        let mut samples: Vec<_> = points.iter().map(|&p| (true, Some(p))).collect();
        samples.push((false, points.last().copied()));
        Self::new(samples)
    }

    pub(super) fn advance(&self) {
        self.cursor.set(self.cursor.get() + 1);
    }

    fn current(&self) -> (bool, Option<Pos2>) {
        self.samples
            .get(self.cursor.get())
            .copied()
            .unwrap_or((false, None))
    }
}

impl PointerSource for ScriptedPointer {
    fn primary_pressed(&self) -> bool {
        self.current().0
    }

    fn pointer_pos(&self) -> Option<Pos2> {
        self.current().1
    }
}

/// Zone rectangles keyed by id.
#[derive(Default)]
pub(super) struct RectMap(pub(super) BTreeMap<ZoneId, Rect>);

impl RectMap {
    pub(super) fn with(mut self, zone: ZoneId, rect: Rect) -> Self {
        self.0.insert(zone, rect);
        self
    }
}

impl ScreenGeometry for RectMap {
    fn zone_rect(&self, zone: ZoneId) -> Option<Rect> {
        self.0.get(&zone).copied()
    }
}

#[derive(Default)]
pub(super) struct RecordingHighlight(pub(super) Vec<Option<DropTarget>>);

impl HighlightRenderer for RecordingHighlight {
    fn show_highlight(&mut self, target: Option<DropTarget>) {
        self.0.push(target);
    }
}

pub(super) fn rect(x: f32, y: f32, w: f32, h: f32) -> Rect {
    Rect::from_min_size(Pos2::new(x, y), Vec2::new(w, h))
}
