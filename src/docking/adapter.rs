use super::types::AdapterId;

/// Lifecycle of a [`ContentAdapter`] with respect to closing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdapterState {
    Active,
    /// `CanClose` subscribers are being consulted.
    ClosePending,
    Closed,
}

/// Argument passed by reference to every `CanClose` subscriber. Any subscriber may veto.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CanCloseArgs {
    pub is_ready_to_close: bool,
}

impl Default for CanCloseArgs {
    fn default() -> Self {
        Self {
            is_ready_to_close: true,
        }
    }
}

/// Fired once, after the adapter has been detached from the zone tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClosedArgs {
    pub is_for_forced_close: bool,
}

/// Result of a close request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CloseOutcome {
    Closed,
    /// A `CanClose` subscriber vetoed; the adapter stays where it was.
    Cancelled,
}

pub type CanCloseHandler = Box<dyn FnMut(AdapterId, &mut CanCloseArgs)>;
pub type ClosedHandler = Box<dyn FnMut(AdapterId, ClosedArgs)>;

/// Opaque tag selecting a display-element factory.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct ContentKind(pub String);

impl ContentKind {
    pub fn new(kind: impl Into<String>) -> Self {
        Self(kind.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ContentKind {
    fn from(kind: &str) -> Self {
        Self::new(kind)
    }
}

/// The engine's handle on one piece of dockable content.
///
/// Metadata and close subscribers live here. Where the adapter is docked is tracked by the
/// [`super::ZoneTree`]; structural changes go through [`super::DockingManager`].
pub struct ContentAdapter {
    pub(super) id: AdapterId,
    pub(super) kind: ContentKind,
    pub(super) title: String,
    pub(super) tooltip: Option<String>,
    pub(super) state: AdapterState,
    pub(super) can_close: Vec<CanCloseHandler>,
    pub(super) closed: Vec<ClosedHandler>,
}

impl std::fmt::Debug for ContentAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentAdapter")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("title", &self.title)
            .field("tooltip", &self.tooltip)
            .field("state", &self.state)
            .field("can_close", &self.can_close.len())
            .field("closed", &self.closed.len())
            .finish()
    }
}

impl ContentAdapter {
    pub(super) fn new(id: AdapterId, kind: ContentKind, title: String) -> Self {
        Self {
            id,
            kind,
            title,
            tooltip: None,
            state: AdapterState::Active,
            can_close: Vec::new(),
            closed: Vec::new(),
        }
    }

    pub fn id(&self) -> AdapterId {
        self.id
    }

    pub fn kind(&self) -> &ContentKind {
        &self.kind
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn tooltip(&self) -> Option<&str> {
        self.tooltip.as_deref()
    }

    pub fn state(&self) -> AdapterState {
        self.state
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_tooltip(&mut self, tooltip: Option<String>) {
        self.tooltip = tooltip;
    }

    /// Subscribers run in registration order; the first veto stops the rest.
    pub fn on_can_close(&mut self, handler: impl FnMut(AdapterId, &mut CanCloseArgs) + 'static) {
        self.can_close.push(Box::new(handler));
    }

    pub fn on_closed(&mut self, handler: impl FnMut(AdapterId, ClosedArgs) + 'static) {
        self.closed.push(Box::new(handler));
    }

    /// Consults `CanClose` subscribers in order. Stops at the first veto.
    pub(super) fn negotiate_close(&mut self) -> bool {
        let mut args = CanCloseArgs::default();
        for handler in &mut self.can_close {
            handler(self.id, &mut args);
            if !args.is_ready_to_close {
                break;
            }
        }
        args.is_ready_to_close
    }

    /// Fires `Closed` to every subscriber. Subscribers are consumed so this can only happen once.
    pub(super) fn fire_closed(&mut self, is_for_forced_close: bool) {
        let args = ClosedArgs { is_for_forced_close };
        for mut handler in std::mem::take(&mut self.closed) {
            handler(self.id, args);
        }
        self.can_close.clear();
    }
}
