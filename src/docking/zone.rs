use std::collections::BTreeMap;
use std::ops::Range;

use itertools::Itertools as _;

use super::error::DockError;
use super::types::{AdapterId, IdAllocator, Location, Orientation, SplitDirection, WindowId, ZoneId, ZoneKind};

/// Tabbed group of adapters. `selected` is the frontmost tab.
#[derive(Clone, Debug, PartialEq)]
pub struct Stack {
    pub(super) adapters: Vec<AdapterId>,
    pub(super) selected: Option<usize>,
    pub(super) droppable: bool,
}

impl Default for Stack {
    fn default() -> Self {
        Self {
            adapters: Vec::new(),
            selected: None,
            droppable: true,
        }
    }
}

impl Stack {
    fn with_adapters(adapters: Vec<AdapterId>) -> Self {
        let selected = (!adapters.is_empty()).then_some(0);
        Self {
            adapters,
            selected,
            droppable: true,
        }
    }

    fn fix_selected_after_removal(&mut self, removed: Range<usize>) {
        let len = self.adapters.len();
        self.selected = match self.selected {
            _ if len == 0 => None,
            Some(s) if s >= removed.end => Some(s - removed.len()),
            Some(s) if s >= removed.start => Some(removed.start.min(len - 1)),
            Some(s) => Some(s),
            None => Some(0),
        };
    }
}

/// Directional container. `shares` are relative weights, parallel to `children`.
#[derive(Clone, Debug, PartialEq)]
pub struct Split {
    pub(super) orientation: Orientation,
    pub(super) children: Vec<ZoneId>,
    pub(super) shares: Vec<f32>,
}

impl Split {
    fn remove_child(&mut self, child: ZoneId) -> Option<usize> {
        let index = self.children.iter().position(|&c| c == child)?;
        self.children.remove(index);
        if index < self.shares.len() {
            self.shares.remove(index);
        }
        Some(index)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ZoneContent {
    Stack(Stack),
    Split(Split),
}

/// A node of the zone tree. Parent edges are ids into the owning [`ZoneTree`].
#[derive(Clone, Debug)]
pub struct DockZone {
    pub(super) id: ZoneId,
    pub(super) parent: Option<ZoneId>,
    pub(super) window: WindowId,
    pub(super) content: ZoneContent,
    pub(super) destroying: bool,
}

impl DockZone {
    pub fn id(&self) -> ZoneId {
        self.id
    }

    pub fn kind(&self) -> ZoneKind {
        match self.content {
            ZoneContent::Stack(_) => ZoneKind::Stack,
            ZoneContent::Split(_) => ZoneKind::Split,
        }
    }

    /// `None` for a window's root zone.
    pub fn parent(&self) -> Option<ZoneId> {
        self.parent
    }

    /// The window holding this zone's root ancestor.
    pub fn window(&self) -> WindowId {
        self.window
    }

    pub fn content(&self) -> &ZoneContent {
        &self.content
    }

    /// Adapters of a stack, in tab order. Empty for splits.
    pub fn adapters(&self) -> &[AdapterId] {
        match &self.content {
            ZoneContent::Stack(stack) => &stack.adapters,
            ZoneContent::Split(_) => &[],
        }
    }

    /// Child zones of a split. Empty for stacks.
    pub fn children(&self) -> &[ZoneId] {
        match &self.content {
            ZoneContent::Stack(_) => &[],
            ZoneContent::Split(split) => &split.children,
        }
    }

    pub fn selected_index(&self) -> Option<usize> {
        match &self.content {
            ZoneContent::Stack(stack) => stack.selected,
            ZoneContent::Split(_) => None,
        }
    }

    pub fn orientation(&self) -> Option<Orientation> {
        match &self.content {
            ZoneContent::Stack(_) => None,
            ZoneContent::Split(split) => Some(split.orientation),
        }
    }

    /// Whether drops may target this zone. Always `false` for splits.
    pub fn is_droppable(&self) -> bool {
        match &self.content {
            ZoneContent::Stack(stack) => stack.droppable && !self.destroying,
            ZoneContent::Split(_) => false,
        }
    }

    pub fn is_destroying(&self) -> bool {
        self.destroying
    }

    fn stack_mut(&mut self) -> Result<&mut Stack, DockError> {
        match &mut self.content {
            ZoneContent::Stack(stack) => Ok(stack),
            ZoneContent::Split(_) => Err(DockError::NotAStack(self.id)),
        }
    }
}

/// What a removal did to the tree above the affected stack.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(super) struct Cascade {
    /// Zones deleted from the arena, bottom-up.
    pub(super) removed_zones: Vec<ZoneId>,
    /// A window root split collapsed: `(old root, surviving child now at the top)`.
    pub(super) rerooted: Option<(ZoneId, ZoneId)>,
    /// Set when a window root ended up with no content at all.
    pub(super) emptied_root: Option<ZoneId>,
}

/// Arena of every zone of every window, plus the adapter → holding stack index.
///
/// A zone keeps its id for as long as it exists. Splitting a stack wraps it in a new split that
/// takes its slot, and collapsing a split re-links the surviving child in the split's place, so a
/// window's root id changes when its root is split or collapsed.
#[derive(Debug, Default)]
pub struct ZoneTree {
    pub(super) zones: BTreeMap<ZoneId, DockZone>,
    pub(super) holder: ahash::HashMap<AdapterId, ZoneId>,
    ids: IdAllocator,
}

impl ZoneTree {
    pub fn get(&self, zone: ZoneId) -> Option<&DockZone> {
        self.zones.get(&zone)
    }

    pub fn contains(&self, zone: ZoneId) -> bool {
        self.zones.contains_key(&zone)
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// The stack currently holding `adapter`.
    pub fn holder_of(&self, adapter: AdapterId) -> Option<ZoneId> {
        self.holder.get(&adapter).copied()
    }

    pub fn location(&self, adapter: AdapterId) -> Option<Location> {
        let zone_id = self.holder_of(adapter)?;
        let zone = self.zones.get(&zone_id)?;
        let index = zone.adapters().iter().position(|&a| a == adapter)?;
        Some(Location {
            window: zone.window,
            zone: zone_id,
            index,
        })
    }

    fn alloc(&mut self) -> ZoneId {
        ZoneId::from_u64(self.ids.next_raw())
    }

    fn insert_stack(&mut self, window: WindowId, parent: Option<ZoneId>, stack: Stack) -> ZoneId {
        let id = self.alloc();
        for &adapter in &stack.adapters {
            self.holder.insert(adapter, id);
        }
        self.zones.insert(
            id,
            DockZone {
                id,
                parent,
                window,
                content: ZoneContent::Stack(stack),
                destroying: false,
            },
        );
        id
    }

    /// Creates a parentless stack to serve as a window root. Adapters must not be docked elsewhere.
    pub(super) fn new_root_stack(&mut self, window: WindowId, adapters: Vec<AdapterId>) -> ZoneId {
        debug_assert!(
            adapters.iter().all(|a| !self.holder.contains_key(a)),
            "root stack adapters must be undocked"
        );
        self.insert_stack(window, None, Stack::with_adapters(adapters))
    }

    fn ensure_insertable(&self, zone: ZoneId, adapters: &[AdapterId]) -> Result<(), DockError> {
        let target = self.zones.get(&zone).ok_or(DockError::UnknownZone(zone))?;
        if target.destroying {
            return Err(DockError::ZoneDestroying(zone));
        }
        if target.kind() != ZoneKind::Stack {
            return Err(DockError::NotAStack(zone));
        }
        if let Some((&adapter, &held_by)) = adapters
            .iter()
            .find_map(|a| self.holder.get_key_value(a))
        {
            return Err(DockError::AdapterAlreadyDocked {
                adapter,
                zone: held_by,
            });
        }
        Ok(())
    }

    /// Inserts `adapter` at `index` (clamped) and makes it the selected tab.
    ///
    /// Returns the index the adapter ended up at.
    pub(super) fn add_content(
        &mut self,
        zone: ZoneId,
        adapter: AdapterId,
        index: usize,
    ) -> Result<usize, DockError> {
        self.add_contents(zone, vec![adapter], index)
    }

    /// Inserts a run of adapters at `index` (clamped), preserving their order.
    /// The first inserted adapter becomes the selected tab.
    pub(super) fn add_contents(
        &mut self,
        zone: ZoneId,
        adapters: Vec<AdapterId>,
        index: usize,
    ) -> Result<usize, DockError> {
        self.ensure_insertable(zone, &adapters)?;
        if adapters.is_empty() {
            return Ok(index);
        }

        for &adapter in &adapters {
            self.holder.insert(adapter, zone);
        }
        let target = self.zones.get_mut(&zone).ok_or(DockError::UnknownZone(zone))?;
        let stack = target.stack_mut()?;
        let index = index.min(stack.adapters.len());
        stack.adapters.splice(index..index, adapters);
        stack.selected = Some(index);
        Ok(index)
    }

    /// Removes `adapter` from its stack and prunes anything left empty.
    pub(super) fn remove_content(
        &mut self,
        adapter: AdapterId,
    ) -> Result<(Location, Cascade), DockError> {
        let location = self
            .location(adapter)
            .ok_or(DockError::UnknownAdapter(adapter))?;
        let (_, cascade) = self.detach_range(location.zone, location.index..location.index + 1)?;
        Ok((location, cascade))
    }

    /// Removes a contiguous run of tabs from a stack (order preserved) and prunes empties.
    pub(super) fn detach_range(
        &mut self,
        zone: ZoneId,
        range: Range<usize>,
    ) -> Result<(Vec<AdapterId>, Cascade), DockError> {
        let target = self.zones.get_mut(&zone).ok_or(DockError::UnknownZone(zone))?;
        let stack = target.stack_mut()?;
        let end = range.end.min(stack.adapters.len());
        let range = range.start.min(end)..end;
        let detached = stack.adapters.drain(range.clone()).collect_vec();
        stack.fix_selected_after_removal(range);

        for adapter in &detached {
            self.holder.remove(adapter);
        }
        let cascade = self.prune_if_empty(zone);
        Ok((detached, cascade))
    }

    /// Deletes `zone` if it is an empty stack, cascading upwards. Collapses single-child splits.
    fn prune_if_empty(&mut self, zone: ZoneId) -> Cascade {
        let mut cascade = Cascade::default();
        let mut current = zone;

        loop {
            let Some(node) = self.zones.get(&current) else {
                return cascade;
            };
            let empty = match &node.content {
                ZoneContent::Stack(stack) => stack.adapters.is_empty(),
                ZoneContent::Split(split) => split.children.is_empty(),
            };
            if !empty {
                return cascade;
            }

            let Some(parent) = node.parent else {
                if node.kind() == ZoneKind::Split {
                    if let Some(root) = self.zones.get_mut(&current) {
                        root.content = ZoneContent::Stack(Stack::default());
                    }
                }
                cascade.emptied_root = Some(current);
                return cascade;
            };

            self.zones.remove(&current);
            cascade.removed_zones.push(current);

            let remaining = match self.zones.get_mut(&parent).map(|p| &mut p.content) {
                Some(ZoneContent::Split(split)) => {
                    split.remove_child(current);
                    split.children.len()
                }
                _ => return cascade,
            };

            if remaining == 1 {
                if let Some(rerooted) = self.collapse_single_child(parent, &mut cascade) {
                    cascade.rerooted = Some(rerooted);
                }
                return cascade;
            }
            current = parent;
        }
    }

    /// Replaces a single-child split by that child in the split's own parent, then deletes the
    /// split. Returns `(split, child)` when the split was a window root.
    fn collapse_single_child(
        &mut self,
        split_id: ZoneId,
        cascade: &mut Cascade,
    ) -> Option<(ZoneId, ZoneId)> {
        let child_id = match &self.zones.get(&split_id)?.content {
            ZoneContent::Split(split) if split.children.len() == 1 => split.children[0],
            _ => return None,
        };
        let split = self.zones.remove(&split_id)?;
        cascade.removed_zones.push(split_id);

        if let Some(child) = self.zones.get_mut(&child_id) {
            child.parent = split.parent;
            child.destroying |= split.destroying;
        }
        match split.parent {
            Some(grandparent) => {
                self.replace_child(grandparent, split_id, child_id);
                None
            }
            None => Some((split_id, child_id)),
        }
    }

    /// Swaps `old` for `new` in the children of the split `parent`, keeping its share.
    fn replace_child(&mut self, parent: ZoneId, old: ZoneId, new: ZoneId) {
        if let Some(ZoneContent::Split(split)) = self.zones.get_mut(&parent).map(|p| &mut p.content)
        {
            if let Some(slot) = split.children.iter_mut().find(|c| **c == old) {
                *slot = new;
            }
        }
    }

    /// The top of the tree `zone` belongs to.
    pub fn top_of(&self, zone: ZoneId) -> ZoneId {
        let mut current = zone;
        for _ in 0..self.zones.len() {
            match self.zones.get(&current).and_then(|z| z.parent) {
                Some(parent) => current = parent,
                None => break,
            }
        }
        current
    }

    /// Deletes the empty root stack `root` so the parentless subtree `built` can replace it.
    ///
    /// The caller re-points the window at `built`.
    pub(super) fn graft_into_root(&mut self, root: ZoneId, built: ZoneId) -> Result<(), DockError> {
        let target = self.zones.get(&root).ok_or(DockError::UnknownZone(root))?;
        if !target.adapters().is_empty() || target.kind() != ZoneKind::Stack || target.parent.is_some() {
            return Err(DockError::NotAStack(root));
        }
        if root == built {
            return Ok(());
        }
        if self.zones.get(&built).is_none_or(|b| b.parent.is_some()) {
            return Err(DockError::UnknownZone(built));
        }
        self.zones.remove(&root);
        Ok(())
    }

    /// Puts the parentless `sibling` next to `zone` under a new split that takes `zone`'s slot.
    ///
    /// Returns the new split's id.
    fn wrap_in_split(
        &mut self,
        zone: ZoneId,
        direction: SplitDirection,
        sibling: ZoneId,
    ) -> Result<ZoneId, DockError> {
        let node = self.zones.get(&zone).ok_or(DockError::UnknownZone(zone))?;
        let (window, parent) = (node.window, node.parent);
        let split_id = self.alloc();

        if let Some(parent) = parent {
            self.replace_child(parent, zone, split_id);
        }
        for child in [zone, sibling] {
            if let Some(c) = self.zones.get_mut(&child) {
                c.parent = Some(split_id);
            }
        }
        let children = if direction.sibling_first() {
            vec![sibling, zone]
        } else {
            vec![zone, sibling]
        };
        self.zones.insert(
            split_id,
            DockZone {
                id: split_id,
                parent,
                window,
                content: ZoneContent::Split(Split {
                    orientation: direction.orientation(),
                    children,
                    shares: vec![0.5, 0.5],
                }),
                destroying: false,
            },
        );
        Ok(split_id)
    }

    /// Splits the stack `zone`: a new split takes its place in the tree, holding `zone` itself
    /// and a new sibling stack with `content` on `direction`'s side.
    ///
    /// `zone` and its tabs keep their ids and order. Splitting an empty stack fills it in place
    /// instead. Returns the stack now holding `content`.
    pub(super) fn split(
        &mut self,
        zone: ZoneId,
        direction: SplitDirection,
        content: Vec<AdapterId>,
    ) -> Result<ZoneId, DockError> {
        if content.is_empty() {
            return Err(DockError::EmptySplitContent(zone));
        }
        self.ensure_insertable(zone, &content)?;

        let node = self.zones.get(&zone).ok_or(DockError::UnknownZone(zone))?;
        let window = node.window;
        if node.adapters().is_empty() {
            self.add_contents(zone, content, 0)?;
            return Ok(zone);
        }

        let side = self.insert_stack(window, None, Stack::with_adapters(content));
        self.wrap_in_split(zone, direction, side)?;
        Ok(side)
    }

    /// Checks that the parentless subtree `subtree` may be dropped onto the stack `zone`.
    fn ensure_subtree_droppable(&self, zone: ZoneId, subtree: ZoneId) -> Result<(), DockError> {
        self.ensure_insertable(zone, &[])?;
        let moved = self.zones.get(&subtree).ok_or(DockError::UnknownZone(subtree))?;
        if moved.parent.is_some() {
            return Err(DockError::UnknownZone(subtree));
        }
        if self.top_of(zone) == subtree {
            return Err(DockError::DropOntoSelf(moved.window));
        }
        Ok(())
    }

    /// Moves the whole parentless subtree `subtree` beside the stack `zone`, layout intact.
    ///
    /// Every moved zone switches to `zone`'s window. Dropping onto an empty stack replaces that
    /// stack with the subtree. Returns `subtree`, which now holds the moved content.
    pub(super) fn split_with_subtree(
        &mut self,
        zone: ZoneId,
        direction: SplitDirection,
        subtree: ZoneId,
    ) -> Result<ZoneId, DockError> {
        self.ensure_subtree_droppable(zone, subtree)?;
        let node = self.zones.get(&zone).ok_or(DockError::UnknownZone(zone))?;
        let (window, parent, empty) = (node.window, node.parent, node.adapters().is_empty());

        for id in self.zones_under(subtree) {
            if let Some(z) = self.zones.get_mut(&id) {
                z.window = window;
            }
        }
        if empty {
            self.zones.remove(&zone);
            if let Some(parent) = parent {
                self.replace_child(parent, zone, subtree);
            }
            if let Some(moved) = self.zones.get_mut(&subtree) {
                moved.parent = parent;
            }
            return Ok(subtree);
        }
        self.wrap_in_split(zone, direction, subtree)?;
        Ok(subtree)
    }

    /// Moves every tab of the parentless subtree `subtree` to the end of the stack `zone`.
    ///
    /// `subtree` is left as an empty stack. Returns the index of the first moved tab.
    pub(super) fn merge_subtree(&mut self, zone: ZoneId, subtree: ZoneId) -> Result<usize, DockError> {
        self.ensure_subtree_droppable(zone, subtree)?;
        let adapters = self.take_all_content(subtree);
        self.add_contents(zone, adapters, usize::MAX)
    }

    /// Depth-first search for the first stack willing to accept content.
    pub fn find_first_available_zone(&self, root: ZoneId) -> Option<ZoneId> {
        self.zones_under(root)
            .into_iter()
            .find(|id| self.zones.get(id).is_some_and(DockZone::is_droppable))
    }

    /// Every zone in the subtree, depth-first pre-order, children in order.
    pub fn zones_under(&self, root: ZoneId) -> Vec<ZoneId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(zone) = self.zones.get(&id) else {
                continue;
            };
            out.push(id);
            stack.extend(zone.children().iter().rev().copied());
        }
        out
    }

    pub fn stacks_under(&self, root: ZoneId) -> Vec<ZoneId> {
        self.zones_under(root)
            .into_iter()
            .filter(|id| self.zones.get(id).is_some_and(|z| z.kind() == ZoneKind::Stack))
            .collect()
    }

    /// Every adapter in the subtree, in depth-first tab order.
    pub fn adapters_under(&self, root: ZoneId) -> Vec<AdapterId> {
        self.zones_under(root)
            .into_iter()
            .filter_map(|id| self.zones.get(&id))
            .flat_map(|z| z.adapters().iter().copied())
            .collect()
    }

    /// Removes every adapter below `root` and resets `root` to an empty stack.
    ///
    /// Returns the adapters in depth-first tab order.
    pub(super) fn take_all_content(&mut self, root: ZoneId) -> Vec<AdapterId> {
        let adapters = self.adapters_under(root);
        for adapter in &adapters {
            self.holder.remove(adapter);
        }
        for id in self.zones_under(root).into_iter().skip(1) {
            self.zones.remove(&id);
        }
        if let Some(node) = self.zones.get_mut(&root) {
            node.content = ZoneContent::Stack(Stack::default());
            node.destroying = false;
        }
        adapters
    }

    /// Deletes `root` and its whole subtree from the arena.
    pub(super) fn remove_subtree(&mut self, root: ZoneId) {
        for adapter in self.adapters_under(root) {
            self.holder.remove(&adapter);
        }
        for id in self.zones_under(root) {
            self.zones.remove(&id);
        }
    }

    pub(super) fn mark_destroying(&mut self, root: ZoneId, destroying: bool) {
        for id in self.zones_under(root) {
            if let Some(zone) = self.zones.get_mut(&id) {
                zone.destroying = destroying;
            }
        }
    }

    pub(super) fn set_selected(&mut self, zone: ZoneId, index: usize) -> Result<(), DockError> {
        let node = self.zones.get_mut(&zone).ok_or(DockError::UnknownZone(zone))?;
        let stack = node.stack_mut()?;
        if !stack.adapters.is_empty() {
            stack.selected = Some(index.min(stack.adapters.len() - 1));
        }
        Ok(())
    }

    pub(super) fn set_droppable(&mut self, zone: ZoneId, droppable: bool) -> Result<(), DockError> {
        let node = self.zones.get_mut(&zone).ok_or(DockError::UnknownZone(zone))?;
        node.stack_mut()?.droppable = droppable;
        Ok(())
    }

    /// Builds a split directly, for restoring layouts. Children must be parentless zones of `window`.
    pub(super) fn adopt_into_split(
        &mut self,
        window: WindowId,
        orientation: Orientation,
        children: Vec<ZoneId>,
        shares: Vec<f32>,
    ) -> ZoneId {
        let id = self.alloc();
        for child in &children {
            if let Some(c) = self.zones.get_mut(child) {
                c.parent = Some(id);
            }
        }
        self.zones.insert(
            id,
            DockZone {
                id,
                parent: None,
                window,
                content: ZoneContent::Split(Split {
                    orientation,
                    children,
                    shares,
                }),
                destroying: false,
            },
        );
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn a(id: u64) -> AdapterId {
        AdapterId::from_u64(id)
    }

    fn window() -> WindowId {
        WindowId::from_u64(1)
    }

    fn tree_with(adapters: &[u64]) -> (ZoneTree, ZoneId) {
        let mut tree = ZoneTree::default();
        let root = tree.new_root_stack(window(), adapters.iter().map(|&i| a(i)).collect());
        (tree, root)
    }

    #[test]
    fn add_content_clamps_index_and_selects() {
        let (mut tree, root) = tree_with(&[1, 2]);
        let index = tree.add_content(root, a(3), 99).unwrap();
        assert_eq!(index, 2);
        assert_eq!(tree.get(root).unwrap().adapters(), &[a(1), a(2), a(3)]);
        assert_eq!(tree.get(root).unwrap().selected_index(), Some(2));
    }

    #[test]
    fn add_content_refuses_destroying_zone() {
        let (mut tree, root) = tree_with(&[1]);
        tree.mark_destroying(root, true);
        assert_eq!(
            tree.add_content(root, a(2), 0),
            Err(DockError::ZoneDestroying(root))
        );
        assert_eq!(tree.get(root).unwrap().adapters(), &[a(1)]);
    }

    #[test]
    fn add_content_refuses_docked_adapter() {
        let (mut tree, root) = tree_with(&[1]);
        let err = tree.add_content(root, a(1), 0).unwrap_err();
        assert_eq!(
            err,
            DockError::AdapterAlreadyDocked {
                adapter: a(1),
                zone: root
            }
        );
    }

    #[test]
    fn split_wraps_stack_and_keeps_its_id() {
        let (mut tree, root) = tree_with(&[1, 2, 3]);
        let side = tree.split(root, SplitDirection::Left, vec![a(4)]).unwrap();

        let split = tree.top_of(root);
        assert_ne!(split, root);
        let node = tree.get(split).unwrap();
        assert_eq!(node.kind(), ZoneKind::Split);
        assert_eq!(node.parent(), None);
        assert_eq!(node.orientation(), Some(Orientation::Horizontal));
        assert_eq!(node.children(), &[side, root]);
        assert_eq!(tree.get(root).unwrap().adapters(), &[a(1), a(2), a(3)]);
        assert_eq!(tree.get(root).unwrap().parent(), Some(split));
        assert_eq!(tree.holder_of(a(2)), Some(root));
        assert_eq!(tree.holder_of(a(4)), Some(side));
    }

    #[test]
    fn nested_split_takes_the_stack_slot_in_its_parent() {
        let (mut tree, root) = tree_with(&[1, 2]);
        let right = tree.split(root, SplitDirection::Right, vec![a(3)]).unwrap();
        let outer = tree.top_of(root);
        let below = tree.split(right, SplitDirection::Bottom, vec![a(4)]).unwrap();

        let inner = tree.get(right).unwrap().parent().unwrap();
        assert_eq!(tree.get(outer).unwrap().children(), &[root, inner]);
        assert_eq!(tree.get(inner).unwrap().children(), &[right, below]);
        assert_eq!(tree.get(inner).unwrap().parent(), Some(outer));
        assert!(super::super::integrity::zone_tree_issues(&tree).is_empty());
    }

    #[test]
    fn split_without_content_is_refused() {
        let (mut tree, root) = tree_with(&[1]);
        assert_eq!(
            tree.split(root, SplitDirection::Right, Vec::new()),
            Err(DockError::EmptySplitContent(root))
        );
        assert_eq!(tree.get(root).unwrap().kind(), ZoneKind::Stack);
    }

    #[test]
    fn removing_last_tab_collapses_split() {
        let (mut tree, root) = tree_with(&[1, 2]);
        let side = tree.split(root, SplitDirection::Bottom, vec![a(3)]).unwrap();
        let split = tree.top_of(root);

        let (_, cascade) = tree.remove_content(a(3)).unwrap();
        assert_eq!(cascade.removed_zones, vec![side, split]);
        assert_eq!(cascade.rerooted, Some((split, root)));
        assert_eq!(cascade.emptied_root, None);

        let node = tree.get(root).unwrap();
        assert_eq!(node.kind(), ZoneKind::Stack);
        assert_eq!(node.parent(), None);
        assert_eq!(node.adapters(), &[a(1), a(2)]);
        assert_eq!(tree.holder_of(a(1)), Some(root));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn collapse_relinks_survivor_into_grandparent() {
        let (mut tree, root) = tree_with(&[1]);
        let right = tree.split(root, SplitDirection::Right, vec![a(2)]).unwrap();
        let outer = tree.top_of(root);
        let below = tree.split(right, SplitDirection::Bottom, vec![a(3)]).unwrap();
        let inner = tree.get(right).unwrap().parent().unwrap();

        let (_, cascade) = tree.remove_content(a(3)).unwrap();

        assert_eq!(cascade.removed_zones, vec![below, inner]);
        assert_eq!(cascade.rerooted, None);
        assert_eq!(tree.get(outer).unwrap().children(), &[root, right]);
        assert_eq!(tree.get(right).unwrap().parent(), Some(outer));
        assert_eq!(tree.location(a(2)).map(|l| l.zone), Some(right));
        assert!(super::super::integrity::zone_tree_issues(&tree).is_empty());
    }

    #[test]
    fn removing_everything_reports_emptied_root() {
        let (mut tree, root) = tree_with(&[1]);
        let (_, cascade) = tree.remove_content(a(1)).unwrap();
        assert_eq!(cascade.emptied_root, Some(root));
        assert!(tree.contains(root));
    }

    #[test]
    fn selection_follows_removal() {
        let (mut tree, root) = tree_with(&[1, 2, 3]);
        tree.set_selected(root, 2).unwrap();
        tree.remove_content(a(1)).unwrap();
        assert_eq!(tree.get(root).unwrap().selected_index(), Some(1));
        tree.remove_content(a(3)).unwrap();
        assert_eq!(tree.get(root).unwrap().selected_index(), Some(0));
    }

    #[test]
    fn find_first_available_skips_non_droppable() {
        let (mut tree, root) = tree_with(&[1]);
        let side = tree.split(root, SplitDirection::Left, vec![a(2)]).unwrap();
        let top = tree.top_of(root);
        assert_eq!(tree.find_first_available_zone(top), Some(side));

        tree.set_droppable(side, false).unwrap();
        assert_eq!(tree.find_first_available_zone(top), Some(root));

        tree.set_droppable(root, false).unwrap();
        assert_eq!(tree.find_first_available_zone(top), None);
    }

    #[test]
    fn take_all_content_resets_root() {
        let (mut tree, root) = tree_with(&[1, 2]);
        tree.split(root, SplitDirection::Top, vec![a(3)]).unwrap();
        let top = tree.top_of(root);
        let taken = tree.take_all_content(top);
        assert_eq!(taken, vec![a(3), a(1), a(2)]);
        assert_eq!(tree.len(), 1);
        assert!(tree.get(top).unwrap().adapters().is_empty());
        assert_eq!(tree.holder_of(a(1)), None);
    }

    /// Two windows: `[1, 2]` and a split `[3] | [4]`.
    fn two_windows() -> (ZoneTree, ZoneId, ZoneId) {
        let (mut tree, target) = tree_with(&[1, 2]);
        let other = WindowId::from_u64(2);
        let left = tree.new_root_stack(other, vec![a(3)]);
        tree.split(left, SplitDirection::Right, vec![a(4)]).unwrap();
        let moved = tree.top_of(left);
        (tree, target, moved)
    }

    #[test]
    fn split_with_subtree_keeps_moved_layout() {
        let (mut tree, target, moved) = two_windows();
        let children = tree.get(moved).unwrap().children().to_vec();

        let placed = tree
            .split_with_subtree(target, SplitDirection::Bottom, moved)
            .unwrap();

        assert_eq!(placed, moved);
        let top = tree.top_of(target);
        assert_eq!(tree.get(top).unwrap().children(), &[target, moved]);
        assert_eq!(tree.get(moved).unwrap().kind(), ZoneKind::Split);
        assert_eq!(tree.get(moved).unwrap().children(), children.as_slice());
        assert!(
            tree.zones_under(top)
                .iter()
                .all(|&id| tree.get(id).is_some_and(|z| z.window() == window()))
        );
        assert!(super::super::integrity::zone_tree_issues(&tree).is_empty());
    }

    #[test]
    fn split_with_subtree_into_empty_root_replaces_it() {
        let (mut tree, target, moved) = two_windows();
        tree.remove_content(a(1)).unwrap();
        tree.remove_content(a(2)).unwrap();

        tree.split_with_subtree(target, SplitDirection::Left, moved)
            .unwrap();

        assert!(!tree.contains(target));
        assert_eq!(tree.get(moved).unwrap().parent(), None);
        assert_eq!(tree.get(moved).unwrap().window(), window());
    }

    #[test]
    fn subtree_cannot_drop_into_itself() {
        let (mut tree, _target, moved) = two_windows();
        let inside = tree.holder_of(a(3)).unwrap();
        assert_eq!(
            tree.split_with_subtree(inside, SplitDirection::Left, moved),
            Err(DockError::DropOntoSelf(WindowId::from_u64(2)))
        );
        assert_eq!(tree.top_of(inside), moved);
    }

    #[test]
    fn merge_subtree_appends_tabs_in_order() {
        let (mut tree, target, moved) = two_windows();

        let index = tree.merge_subtree(target, moved).unwrap();

        assert_eq!(index, 2);
        assert_eq!(tree.get(target).unwrap().adapters(), &[a(1), a(2), a(3), a(4)]);
        assert_eq!(tree.get(moved).unwrap().kind(), ZoneKind::Stack);
        assert!(tree.get(moved).unwrap().adapters().is_empty());
    }
}
