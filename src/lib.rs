//! Docking engine for egui: tabbed zone trees, tear-off floating windows and drag-to-dock.
//!
//! [`DockingManager`] owns every window and zone tree. Content is created through registered
//! factories, docked into stacks, torn off into floating windows and docked back by a
//! cooperative [`DragSearchEngine`]. Rendering, OS windows and pointer input stay with the host,
//! behind the traits in [`docking`].

#![forbid(unsafe_code)]

pub mod dock_builder;
pub mod docking;

pub use dock_builder::{DockBuilder, DockNodeId};
pub use docking::{
    AdapterId, CloseOutcome, ContentAdapter, ContentKind, DockError, DockingManager,
    DockingOptions, DragOutcome, DragSearchEngine, DropDisposition, DropPolicy, LayoutSnapshot,
    SplitDirection, WindowId, ZoneId,
};
