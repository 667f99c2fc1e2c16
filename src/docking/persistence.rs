use egui::{Pos2, Vec2};

use super::adapter::ContentKind;
use super::error::DockError;
use super::host::DisplayContent;
use super::types::{AdapterId, Orientation, WindowId, ZoneId};
use super::zone::ZoneContent;
use super::DockingManager;

/// A whole layout: every window, back to front.
///
/// Content is described by [`ContentKind`] and recreated through the registered factories on
/// restore, so a snapshot can outlive the adapters it was taken from.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct LayoutSnapshot {
    pub windows: Vec<WindowSnapshot>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct WindowSnapshot {
    pub is_main: bool,
    pub position: Pos2,
    pub size: Vec2,
    pub root: ZoneSnapshot,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum ZoneSnapshot {
    Stack {
        items: Vec<ItemSnapshot>,
        selected: Option<usize>,
        droppable: bool,
    },
    Split {
        orientation: Orientation,
        children: Vec<ZoneSnapshot>,
        shares: Vec<f32>,
    },
}

impl ZoneSnapshot {
    /// Number of items in the subtree.
    pub fn item_count(&self) -> usize {
        match self {
            Self::Stack { items, .. } => items.len(),
            Self::Split { children, .. } => children.iter().map(Self::item_count).sum(),
        }
    }
}

/// One tab. `state` is whatever [`DisplayContent::generate_state`] (or the caller) produced.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct ItemSnapshot {
    pub kind: ContentKind,
    pub title: String,
    pub tooltip: Option<String>,
    pub state: Option<String>,
}

/// A display element recreated by [`DockingManager::restore`], already docked.
pub struct RestoredElement {
    pub adapter: AdapterId,
    pub content: Box<dyn DisplayContent>,
}

impl std::fmt::Debug for RestoredElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestoredElement")
            .field("adapter", &self.adapter)
            .finish_non_exhaustive()
    }
}

impl DockingManager {
    /// Captures the current layout. `state_of` supplies the per-adapter content state.
    pub fn snapshot(&self, mut state_of: impl FnMut(AdapterId) -> Option<String>) -> LayoutSnapshot {
        let windows = self
            .windows()
            .map(|window| WindowSnapshot {
                is_main: window.is_main,
                position: window.position,
                size: window.size,
                root: self.snapshot_zone(window.root, &mut state_of),
            })
            .collect();
        LayoutSnapshot { windows }
    }

    fn snapshot_zone(
        &self,
        zone: ZoneId,
        state_of: &mut dyn FnMut(AdapterId) -> Option<String>,
    ) -> ZoneSnapshot {
        let Some(node) = self.zones.get(zone) else {
            return ZoneSnapshot::Stack {
                items: Vec::new(),
                selected: None,
                droppable: true,
            };
        };
        match node.content() {
            ZoneContent::Stack(stack) => ZoneSnapshot::Stack {
                items: stack
                    .adapters
                    .iter()
                    .filter_map(|&id| {
                        let adapter = self.adapters.get(&id)?;
                        Some(ItemSnapshot {
                            kind: adapter.kind.clone(),
                            title: adapter.title.clone(),
                            tooltip: adapter.tooltip.clone(),
                            state: state_of(id),
                        })
                    })
                    .collect(),
                selected: stack.selected,
                droppable: stack.droppable,
            },
            ZoneContent::Split(split) => ZoneSnapshot::Split {
                orientation: split.orientation,
                children: split
                    .children
                    .iter()
                    .map(|&child| self.snapshot_zone(child, state_of))
                    .collect(),
                shares: split.shares.clone(),
            },
        }
    }

    /// Replaces the current layout with `snapshot`.
    ///
    /// Everything currently docked is force-closed first. Items whose kind has no registered
    /// factory are skipped; zones and floating windows left empty by that are dropped.
    /// An empty title or missing tooltip keeps what the factory produced.
    /// Returns the recreated elements so the host can render them.
    pub fn restore(&mut self, snapshot: &LayoutSnapshot) -> Vec<RestoredElement> {
        self.force_close_all_and_clear();

        let mut restored = Vec::new();
        let mut main_seen = false;
        for window in &snapshot.windows {
            if window.is_main && !main_seen {
                main_seen = true;
                let main = self.main_window;
                if let Some(built) = self.build_zone(main, &window.root, &mut restored) {
                    if let Err(err) = self.graft_root(main, built) {
                        log::error!("restore: main window layout not applied: {err}");
                    }
                }
                continue;
            }
            if window.is_main {
                log::warn!("restore: extra main window in snapshot, restoring it as floating");
            }

            let id = self.spawn_window(Vec::new(), window.position, window.size);
            let grafted = match self.build_zone(id, &window.root, &mut restored) {
                Some(built) => match self.graft_root(id, built) {
                    Ok(()) => true,
                    Err(err) => {
                        log::error!("restore: floating window layout not applied: {err}");
                        false
                    }
                },
                None => false,
            };
            if grafted && !self.window_adapters(id).is_empty() {
                self.refresh_title(id);
            } else {
                self.destroy_window(id);
            }
        }

        // Anything built but left outside a window (failed graft) is not reachable; drop it.
        let orphans: Vec<ZoneId> = self
            .zones
            .zones
            .values()
            .filter(|z| z.parent.is_none() && !self.windows.values().any(|w| w.root == z.id))
            .map(|z| z.id)
            .collect();
        for orphan in orphans {
            for adapter in self.zones.adapters_under(orphan) {
                self.adapters.remove(&adapter);
                restored.retain(|r: &RestoredElement| r.adapter != adapter);
            }
            self.zones.remove_subtree(orphan);
        }

        self.debug_log_event(format!(
            "restore windows={} adapters={}",
            self.window_count(),
            self.adapter_count()
        ));
        self.after_mutation("restore");
        restored
    }

    /// Replaces the empty root of `window` with the parentless subtree `built`.
    fn graft_root(&mut self, window: WindowId, built: ZoneId) -> Result<(), DockError> {
        let root = self
            .windows
            .get(&window)
            .ok_or(DockError::UnknownWindow(window))?
            .root;
        self.zones.graft_into_root(root, built)?;
        self.adopt_root(window, built);
        Ok(())
    }

    /// Builds a parentless subtree for `window`. `None` if nothing in it could be recreated.
    fn build_zone(
        &mut self,
        window: WindowId,
        snapshot: &ZoneSnapshot,
        restored: &mut Vec<RestoredElement>,
    ) -> Option<ZoneId> {
        match snapshot {
            ZoneSnapshot::Stack {
                items,
                selected,
                droppable,
            } => {
                let mut ids = Vec::with_capacity(items.len());
                for item in items {
                    let Some(element) = self.build_new_display_element(item.kind.clone()) else {
                        continue;
                    };
                    let mut adapter = element.adapter;
                    let mut content = element.content;
                    if !item.title.is_empty() {
                        adapter.title.clone_from(&item.title);
                    }
                    if item.tooltip.is_some() {
                        adapter.tooltip.clone_from(&item.tooltip);
                    }
                    if let Some(state) = &item.state {
                        content.set_state(state);
                    }
                    ids.push(adapter.id);
                    restored.push(RestoredElement {
                        adapter: adapter.id,
                        content,
                    });
                    self.adapters.insert(adapter.id, adapter);
                }
                if ids.is_empty() {
                    return None;
                }

                let zone = self.zones.new_root_stack(window, ids);
                if let Err(err) = self.zones.set_selected(zone, selected.unwrap_or(0)) {
                    log::warn!("restore: selection not applied: {err}");
                }
                if let Err(err) = self.zones.set_droppable(zone, *droppable) {
                    log::warn!("restore: droppable flag not applied: {err}");
                }
                Some(zone)
            }
            ZoneSnapshot::Split {
                orientation,
                children,
                shares,
            } => {
                let mut built = Vec::with_capacity(children.len());
                let mut kept_shares = Vec::with_capacity(children.len());
                for (index, child) in children.iter().enumerate() {
                    if let Some(zone) = self.build_zone(window, child, restored) {
                        built.push(zone);
                        kept_shares.push(shares.get(index).copied().unwrap_or(1.0));
                    }
                }
                match built.len() {
                    0 => None,
                    1 => built.pop(),
                    _ => Some(self.zones.adopt_into_split(
                        window,
                        *orientation,
                        built,
                        kept_shares,
                    )),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use egui::{Pos2, vec2};

    use super::*;
    use crate::docking::test_support::{TestContent, assert_integrity, main_with_docs, titles};
    use crate::docking::{DisplayElementParts, DropDisposition, SplitDirection, ZoneKind};

    fn states(m: &DockingManager) -> impl FnMut(AdapterId) -> Option<String> + '_ {
        move |id| m.adapter(id).map(|a| format!("state:{}", a.title()))
    }

    #[test]
    fn restore_recreates_windows_and_splits() {
        let (mut m, _host, ids) = main_with_docs(&["A", "B", "C", "D"]);
        let root = m.main_window().root();
        m.move_adapter(ids[1], root, DropDisposition::Split(SplitDirection::Right))
            .unwrap();
        let floating = m
            .do_group_tear_off(m.location(ids[3]).unwrap(), 1, Pos2::new(300.0, 300.0))
            .unwrap();
        let snapshot = m.snapshot(states(&m));

        let restored = m.restore(&snapshot);

        assert_eq!(restored.len(), 4);
        assert_eq!(m.window_count(), 2);
        assert!(m.window(floating).is_none(), "windows are recreated");
        let root = m.main_window().root();
        assert_eq!(m.zone(root).map(|z| z.kind()), Some(ZoneKind::Split));
        assert_eq!(titles(&m, m.main_window_id()), ["A", "C", "B"]);
        let other = m.windows().find(|w| !w.is_main()).map(|w| w.id()).unwrap();
        assert_eq!(titles(&m, other), ["D"]);
        assert_eq!(
            m.window(other).map(|w| w.position()),
            Some(Pos2::new(300.0, 300.0) - m.options.tear_off_grab_offset)
        );
        assert_eq!(m.window(other).map(|w| w.title()), Some("D"));
        assert_eq!(m.snapshot(states(&m)), snapshot);
        assert_integrity(&m);
    }

    #[test]
    fn restore_hands_state_to_content() {
        let (mut m, _host, _ids) = main_with_docs(&["A"]);
        let snapshot = m.snapshot(states(&m));

        let restored = m.restore(&snapshot);

        assert_eq!(restored.len(), 1);
        assert_eq!(
            restored[0].content.generate_state().as_deref(),
            Some("state:A")
        );
    }

    #[test]
    fn unknown_kinds_are_skipped_and_empty_windows_dropped() {
        let (mut m, host, _ids) = main_with_docs(&[]);
        m.register_factory("other", || DisplayElementParts {
            title: "Other".to_owned(),
            tooltip: Some("tip".to_owned()),
            content: Box::new(TestContent::default()),
        });
        let item = |kind: &str, title: &str| ItemSnapshot {
            kind: ContentKind::from(kind),
            title: title.to_owned(),
            tooltip: None,
            state: None,
        };
        let snapshot = LayoutSnapshot {
            windows: vec![
                WindowSnapshot {
                    is_main: true,
                    position: Pos2::ZERO,
                    size: vec2(800.0, 600.0),
                    root: ZoneSnapshot::Split {
                        orientation: Orientation::Horizontal,
                        children: vec![
                            ZoneSnapshot::Stack {
                                items: vec![item("gone", "X")],
                                selected: Some(0),
                                droppable: true,
                            },
                            ZoneSnapshot::Stack {
                                items: vec![item("doc", "Kept"), item("other", "Also")],
                                selected: Some(1),
                                droppable: false,
                            },
                        ],
                        shares: vec![0.3, 0.7],
                    },
                },
                WindowSnapshot {
                    is_main: false,
                    position: Pos2::new(10.0, 10.0),
                    size: vec2(200.0, 100.0),
                    root: ZoneSnapshot::Stack {
                        items: vec![item("gone", "Y")],
                        selected: None,
                        droppable: true,
                    },
                },
            ],
        };

        let restored = m.restore(&snapshot);

        assert_eq!(restored.len(), 2);
        assert_eq!(m.window_count(), 1);
        assert_eq!(host.created_count(), host.destroyed_count());
        let root = m.main_window().root();
        let zone = m.zone(root).unwrap();
        assert_eq!(zone.kind(), ZoneKind::Stack);
        assert_eq!(zone.selected_index(), Some(1));
        assert!(!zone.is_droppable());
        assert_eq!(titles(&m, m.main_window_id()), ["Kept", "Also"]);
        assert_eq!(
            m.adapter(restored[1].adapter).and_then(|a| a.tooltip()),
            Some("tip")
        );
        assert_integrity(&m);
    }

    #[test]
    fn item_count_sums_subtree() {
        let (m, _host, _ids) = main_with_docs(&["A", "B"]);
        let snapshot = m.snapshot(|_| None);
        assert_eq!(snapshot.windows.len(), 1);
        assert_eq!(snapshot.windows[0].root.item_count(), 2);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn snapshot_survives_json_and_ron() {
        let (mut m, _host, ids) = main_with_docs(&["A", "B"]);
        let root = m.main_window().root();
        m.move_adapter(ids[0], root, DropDisposition::Split(SplitDirection::Bottom))
            .unwrap();
        let snapshot = m.snapshot(states(&m));

        let json = serde_json::to_string(&snapshot).unwrap();
        let from_json: LayoutSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(from_json, snapshot);

        let text = ron::to_string(&snapshot).unwrap();
        let from_ron: LayoutSnapshot = ron::from_str(&text).unwrap();
        assert_eq!(from_ron, snapshot);

        m.restore(&from_ron);
        assert_eq!(titles(&m, m.main_window_id()), ["B", "A"]);
    }
}
