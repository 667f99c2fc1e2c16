use std::collections::BTreeMap;

use egui::{Pos2, Vec2};

use crate::docking::{
    ContentKind, DockingManager, ItemSnapshot, LayoutSnapshot, RestoredElement, SplitDirection,
    WindowSnapshot, ZoneSnapshot,
};

/// A logical node id used by [`DockBuilder`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DockNodeId(u64);

#[derive(Clone, Debug)]
enum Node<Item> {
    Stack {
        items: Vec<Item>,
    },
    Split {
        dir: SplitDirection,
        side_fraction: f32,
        main: DockNodeId,
        side: DockNodeId,
    },
}

/// Scripted layouts in the style of Dear ImGui's `DockBuilder`:
/// create a node, split it, dock items into the leaves, then `finish()`.
///
/// Leaves are stacks, so docking an item means adding a tab. Leaves may stay empty while
/// building; empty leaves are dropped when the layout is applied.
pub struct DockBuilder<Item = ItemSnapshot> {
    next_node_id: u64,
    nodes: BTreeMap<DockNodeId, Node<Item>>,
}

impl<Item> Default for DockBuilder<Item> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Item> DockBuilder<Item> {
    pub fn new() -> Self {
        Self {
            next_node_id: 1,
            nodes: BTreeMap::new(),
        }
    }

    fn alloc_node_id(&mut self) -> DockNodeId {
        let id = DockNodeId(self.next_node_id);
        self.next_node_id = self.next_node_id.saturating_add(1);
        id
    }

    /// Create an empty leaf stack.
    #[must_use]
    pub fn add_node(&mut self) -> DockNodeId {
        let id = self.alloc_node_id();
        self.nodes.insert(id, Node::Stack { items: Vec::new() });
        id
    }

    /// Split an existing node and return `(side, main)`.
    ///
    /// The `node` itself becomes the split, and its original content moves into the returned
    /// `main` child. `side_fraction` is the share of the split given to `side`.
    #[must_use]
    pub fn split_node(
        &mut self,
        node: DockNodeId,
        dir: SplitDirection,
        side_fraction: f32,
    ) -> (DockNodeId, DockNodeId) {
        debug_assert!(
            (0.0..=1.0).contains(&side_fraction),
            "side_fraction must be in 0.0..=1.0"
        );

        let old = self
            .nodes
            .remove(&node)
            .unwrap_or(Node::Stack { items: Vec::new() });
        let main = self.alloc_node_id();
        self.nodes.insert(main, old);

        let side = self.add_node();

        self.nodes.insert(
            node,
            Node::Split {
                dir,
                side_fraction,
                main,
                side,
            },
        );

        (side, main)
    }

    /// Dock an item into a leaf stack as its last tab.
    ///
    /// # Panics
    /// If `node` does not exist or has been split.
    pub fn dock_item(&mut self, item: Item, node: DockNodeId) {
        match self.nodes.get_mut(&node) {
            Some(Node::Stack { items }) => items.push(item),
            Some(Node::Split { .. }) => {
                panic!("dock_item: node {node:?} is not a leaf stack");
            }
            None => {
                panic!("dock_item: node {node:?} does not exist");
            }
        }
    }

    pub fn dock_items(&mut self, items: impl IntoIterator<Item = Item>, node: DockNodeId) {
        for item in items {
            self.dock_item(item, node);
        }
    }

    /// Produce the zone layout below `root`, mapping docked items along the way.
    ///
    /// Returning `None` from `map` drops that item.
    pub fn finish_map(
        self,
        root: DockNodeId,
        mut map: impl FnMut(Item) -> Option<ItemSnapshot>,
    ) -> ZoneSnapshot {
        fn build_zone<Item>(
            node_id: DockNodeId,
            nodes: &mut BTreeMap<DockNodeId, Node<Item>>,
            map: &mut impl FnMut(Item) -> Option<ItemSnapshot>,
        ) -> ZoneSnapshot {
            match nodes.remove(&node_id) {
                Some(Node::Stack { items }) => {
                    let items: Vec<ItemSnapshot> = items.into_iter().filter_map(&mut *map).collect();
                    ZoneSnapshot::Stack {
                        selected: (!items.is_empty()).then_some(0),
                        items,
                        droppable: true,
                    }
                }
                Some(Node::Split {
                    dir,
                    side_fraction,
                    main,
                    side,
                }) => {
                    let main_zone = build_zone(main, nodes, map);
                    let side_zone = build_zone(side, nodes, map);
                    let main_fraction = 1.0 - side_fraction;

                    let (children, shares) = if dir.sibling_first() {
                        (vec![side_zone, main_zone], vec![side_fraction, main_fraction])
                    } else {
                        (vec![main_zone, side_zone], vec![main_fraction, side_fraction])
                    };
                    ZoneSnapshot::Split {
                        orientation: dir.orientation(),
                        children,
                        shares,
                    }
                }
                None => ZoneSnapshot::Stack {
                    items: Vec::new(),
                    selected: None,
                    droppable: true,
                },
            }
        }

        let mut nodes = self.nodes;
        build_zone(root, &mut nodes, &mut map)
    }
}

impl DockBuilder<ItemSnapshot> {
    pub fn finish(self, root: DockNodeId) -> ZoneSnapshot {
        self.finish_map(root, Some)
    }

    /// Replaces the manager's whole layout with this one, docked in the main window.
    ///
    /// Items are created through the manager's factories, as in [`DockingManager::restore`].
    pub fn apply(self, root: DockNodeId, manager: &mut DockingManager) -> Vec<RestoredElement> {
        let main = manager.main_window();
        let window = WindowSnapshot {
            is_main: true,
            position: main.position(),
            size: main.size(),
            root: self.finish(root),
        };
        manager.restore(&LayoutSnapshot {
            windows: vec![window],
        })
    }
}

impl DockBuilder<ContentKind> {
    /// Docks items by kind; titles come from the factories.
    pub fn finish_kinds(self, root: DockNodeId) -> ZoneSnapshot {
        self.finish_map(root, |kind| {
            Some(ItemSnapshot {
                kind,
                title: String::new(),
                tooltip: None,
                state: None,
            })
        })
    }
}

/// A floating window to add alongside a built layout.
pub fn floating_window(position: Pos2, size: Vec2, root: ZoneSnapshot) -> WindowSnapshot {
    WindowSnapshot {
        is_main: false,
        position,
        size,
        root,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docking::{
        DisplayContent, DisplayElementParts, HostWindowHandle, Orientation, WindowHost, WindowId,
        ZoneKind,
    };

    struct NoHost;

    impl WindowHost for NoHost {
        fn create_window(&mut self, _: WindowId, _: &str, _: Pos2, _: Vec2) -> HostWindowHandle {
            HostWindowHandle(7)
        }

        fn destroy_window(&mut self, _: HostWindowHandle) {}
    }

    struct Blank;

    impl DisplayContent for Blank {
        fn setup(&mut self, _: &crate::docking::ContentAdapter) {}
    }

    fn item(title: &str) -> ItemSnapshot {
        ItemSnapshot {
            kind: ContentKind::from("tool"),
            title: title.to_owned(),
            tooltip: None,
            state: None,
        }
    }

    #[test]
    fn split_node_puts_side_where_asked() {
        let mut b = DockBuilder::new();
        let dockspace = b.add_node();

        let (right, main) = b.split_node(dockspace, SplitDirection::Right, 0.25);
        b.dock_item(item("Scene"), main);
        b.dock_item(item("Inspector"), right);

        let ZoneSnapshot::Split {
            orientation,
            children,
            shares,
        } = b.finish(dockspace)
        else {
            panic!("root should be a split");
        };
        assert_eq!(orientation, Orientation::Horizontal);
        assert_eq!(shares, vec![0.75, 0.25]);
        let titles: Vec<_> = children
            .iter()
            .map(|c| match c {
                ZoneSnapshot::Stack { items, .. } => items[0].title.clone(),
                ZoneSnapshot::Split { .. } => panic!("children should be stacks"),
            })
            .collect();
        assert_eq!(titles, ["Scene", "Inspector"]);
    }

    fn manager() -> DockingManager {
        let mut manager = DockingManager::new(NoHost, HostWindowHandle(1));
        manager.register_factory("tool", || DisplayElementParts {
            title: "Tool".to_owned(),
            tooltip: None,
            content: Box::new(Blank),
        });
        manager
    }

    #[test]
    fn apply_builds_main_layout() {
        let mut manager = manager();

        let mut b = DockBuilder::new();
        let dockspace = b.add_node();
        let (top, main) = b.split_node(dockspace, SplitDirection::Top, 0.3);
        let (_unused, bottom) = b.split_node(main, SplitDirection::Left, 0.2);
        b.dock_items([item("Toolbar")], top);
        b.dock_items([item("Editor"), item("Preview")], bottom);

        let restored = b.apply(dockspace, &mut manager);

        assert_eq!(restored.len(), 3);
        let root = manager.main_window().root();
        let zone = manager.zone(root).unwrap();
        assert_eq!(zone.kind(), ZoneKind::Split);
        assert_eq!(zone.orientation(), Some(Orientation::Vertical));
        let titles: Vec<_> = manager
            .window_adapters(manager.main_window_id())
            .into_iter()
            .filter_map(|id| manager.adapter(id).map(|a| a.title().to_owned()))
            .collect();
        assert_eq!(titles, ["Toolbar", "Editor", "Preview"]);
        assert!(manager.integrity_issues().is_empty());
    }

    #[test]
    fn kinds_take_factory_titles_and_floating_windows_restore() {
        let mut manager = manager();

        let mut b = DockBuilder::<ContentKind>::new();
        let dockspace = b.add_node();
        b.dock_items([ContentKind::from("tool"), ContentKind::from("missing")], dockspace);
        let root = b.finish_kinds(dockspace);
        assert_eq!(root.item_count(), 2);

        let layout = LayoutSnapshot {
            windows: vec![floating_window(
                Pos2::new(40.0, 30.0),
                egui::vec2(320.0, 200.0),
                root,
            )],
        };
        let restored = manager.restore(&layout);

        assert_eq!(restored.len(), 1);
        assert_eq!(manager.window_count(), 2);
        let floating = manager.windows().find(|w| !w.is_main()).unwrap();
        assert_eq!(floating.title(), "Tool");
        assert_eq!(floating.position(), Pos2::new(40.0, 30.0));
        assert!(manager.integrity_issues().is_empty());
    }

    #[test]
    #[should_panic(expected = "not a leaf stack")]
    fn dock_into_split_node_panics() {
        let mut b = DockBuilder::<ContentKind>::new();
        let dockspace = b.add_node();
        let (_side, _main) = b.split_node(dockspace, SplitDirection::Left, 0.5);
        b.dock_item(ContentKind::from("tool"), dockspace);
    }
}
