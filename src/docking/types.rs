use egui::{Pos2, Vec2};

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
        pub struct $name(u64);

        impl $name {
            pub const fn from_u64(id: u64) -> Self {
                Self(id)
            }

            pub const fn as_u64(self) -> u64 {
                self.0
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

id_type!(
    /// Stable identity of a [`super::ContentAdapter`].
    AdapterId,
    "Adapter"
);
id_type!(
    /// Identity of a [`super::DockZone`] inside the zone arena.
    ZoneId,
    "Zone"
);
id_type!(
    /// Identity of a [`FloatingWindow`] in the registry.
    WindowId,
    "Window"
);

/// Monotonic id source. Ids are never reused within one manager.
#[derive(Debug)]
pub(super) struct IdAllocator {
    next: u64,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdAllocator {
    pub(super) fn next_raw(&mut self) -> u64 {
        let id = self.next;
        self.next = self.next.saturating_add(1);
        id
    }
}

/// Where an adapter currently lives: window, zone and tab index within that zone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Location {
    pub window: WindowId,
    pub zone: ZoneId,
    pub index: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum ZoneKind {
    /// Tabbed stack of content adapters.
    Stack,
    /// Directional container of child zones.
    Split,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Orientation {
    /// Children side by side, first child on the left.
    Horizontal,
    /// Children stacked, first child on top.
    Vertical,
}

/// Which side of an existing zone a new sibling is placed on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum SplitDirection {
    Left,
    Top,
    Right,
    Bottom,
}

impl SplitDirection {
    pub fn orientation(self) -> Orientation {
        match self {
            Self::Left | Self::Right => Orientation::Horizontal,
            Self::Top | Self::Bottom => Orientation::Vertical,
        }
    }

    /// `true` when the new sibling goes before the existing zone.
    pub fn sibling_first(self) -> bool {
        matches!(self, Self::Left | Self::Top)
    }
}

/// How dropped content joins a candidate zone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropDisposition {
    /// Merge into the stack as new tabs.
    Center,
    /// Split the candidate, putting the dropped content on the given side.
    Split(SplitDirection),
}

/// A drop candidate as reported to the highlight renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DropTarget {
    pub zone: ZoneId,
    pub disposition: DropDisposition,
}

/// Opaque handle to a host (OS) window, supplied by [`super::WindowHost`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HostWindowHandle(pub u64);

/// A host window displaying exactly one zone tree.
#[derive(Clone, Debug)]
pub struct FloatingWindow {
    pub(super) id: WindowId,
    pub(super) host: HostWindowHandle,
    pub(super) root: ZoneId,
    pub(super) position: Pos2,
    pub(super) size: Vec2,
    pub(super) title: String,
    pub(super) is_main: bool,
}

impl FloatingWindow {
    pub fn id(&self) -> WindowId {
        self.id
    }

    pub fn host(&self) -> HostWindowHandle {
        self.host
    }

    /// Top zone of the window's tree. Changes when the root is split or collapsed.
    pub fn root(&self) -> ZoneId {
        self.root
    }

    /// Desktop position of the window's outer top-left corner.
    pub fn position(&self) -> Pos2 {
        self.position
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn is_main(&self) -> bool {
        self.is_main
    }
}

/// Work the engine hands back to the host event loop instead of running it inline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Continuation {
    /// Begin sampling the pointer for a window created by a tear-off.
    StartDragSearch { window: WindowId, origin: Location },
}
