use std::collections::VecDeque;

use egui::{Pos2, Rect, Vec2};

use super::adapter::ContentAdapter;
use super::types::{Continuation, DropTarget, HostWindowHandle, WindowId, ZoneId};

/// Creates and destroys the OS windows that floating windows are displayed in.
///
/// The main window's host handle is supplied up front; every other window is created through
/// this trait when content is torn off or a layout is restored.
pub trait WindowHost {
    fn create_window(
        &mut self,
        window: WindowId,
        title: &str,
        position: Pos2,
        size: Vec2,
    ) -> HostWindowHandle;

    fn destroy_window(&mut self, handle: HostWindowHandle);

    /// Follows the pointer during a drag. Desktop coordinates.
    fn move_window(&mut self, handle: HostWindowHandle, position: Pos2) {
        let _ = (handle, position);
    }

    fn set_window_title(&mut self, handle: HostWindowHandle, title: &str) {
        let _ = (handle, title);
    }
}

/// Desktop-space rectangles of zones, as last laid out by the renderer.
pub trait ScreenGeometry {
    fn zone_rect(&self, zone: ZoneId) -> Option<Rect>;
}

impl<F> ScreenGeometry for F
where
    F: Fn(ZoneId) -> Option<Rect>,
{
    fn zone_rect(&self, zone: ZoneId) -> Option<Rect> {
        self(zone)
    }
}

/// Polled by the drag search once per sample.
pub trait PointerSource {
    fn primary_pressed(&self) -> bool;

    /// Desktop-space pointer position, if known.
    fn pointer_pos(&self) -> Option<Pos2>;
}

/// Shows or clears the drop indicator.
pub trait HighlightRenderer {
    fn show_highlight(&mut self, target: Option<DropTarget>);
}

/// Discards highlight notifications.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoHighlight;

impl HighlightRenderer for NoHighlight {
    fn show_highlight(&mut self, _target: Option<DropTarget>) {}
}

/// The externally rendered part of a display element.
pub trait DisplayContent {
    /// Called once the adapter for this content exists.
    fn setup(&mut self, adapter: &ContentAdapter);

    /// Restores state produced by [`Self::generate_state`].
    fn set_state(&mut self, state: &str) {
        let _ = state;
    }

    fn generate_state(&self) -> Option<String> {
        None
    }
}

/// The host event loop, as seen by the engine: somewhere to post work for a later turn.
pub trait EventLoop {
    fn post(&mut self, continuation: Continuation);
}

/// FIFO of continuations, drained by the host between event-loop turns.
#[derive(Debug, Default)]
pub struct ContinuationQueue {
    queue: VecDeque<Continuation>,
}

impl ContinuationQueue {
    pub fn pop(&mut self) -> Option<Continuation> {
        self.queue.pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl EventLoop for ContinuationQueue {
    fn post(&mut self, continuation: Continuation) {
        self.queue.push_back(continuation);
    }
}
