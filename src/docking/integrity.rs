use std::collections::{HashMap, HashSet};

use super::DockingManager;
use super::types::{AdapterId, ZoneId};
use super::zone::{ZoneContent, ZoneTree};

/// Zone-level issues: parent/child agreement, split arity, empty stacks, tab selection.
pub(super) fn zone_tree_issues(tree: &ZoneTree) -> Vec<String> {
    let mut issues: Vec<String> = Vec::new();

    for (&id, zone) in &tree.zones {
        if zone.id != id {
            issues.push(format!("integrity: zone keyed {id:?} claims id {:?}", zone.id));
        }

        if let Some(parent_id) = zone.parent {
            match tree.zones.get(&parent_id) {
                None => issues.push(format!("integrity: {id:?} parent {parent_id:?} missing")),
                Some(parent) => {
                    let count = parent.children().iter().filter(|&&c| c == id).count();
                    if count != 1 {
                        issues.push(format!(
                            "integrity: parent {parent_id:?} lists child {id:?} {count} times"
                        ));
                    }
                    if parent.window != zone.window {
                        issues.push(format!(
                            "integrity: {id:?} window {:?} differs from parent's {:?}",
                            zone.window, parent.window
                        ));
                    }
                }
            }
        }

        match &zone.content {
            ZoneContent::Split(split) => {
                if split.children.len() < 2 {
                    issues.push(format!(
                        "integrity: split {id:?} has {} child(ren)",
                        split.children.len()
                    ));
                }
                if split.shares.len() != split.children.len() {
                    issues.push(format!(
                        "integrity: split {id:?} shares={} children={}",
                        split.shares.len(),
                        split.children.len()
                    ));
                }
                for child in &split.children {
                    match tree.zones.get(child) {
                        None => issues.push(format!(
                            "integrity: split {id:?} references missing child {child:?}"
                        )),
                        Some(c) if c.parent != Some(id) => issues.push(format!(
                            "integrity: child {child:?} of {id:?} points at parent {:?}",
                            c.parent
                        )),
                        Some(_) => {}
                    }
                }
            }
            ZoneContent::Stack(stack) => {
                if stack.adapters.is_empty() && zone.parent.is_some() {
                    issues.push(format!("integrity: empty non-root stack {id:?}"));
                }
                match stack.selected {
                    Some(s) if s >= stack.adapters.len() => issues.push(format!(
                        "integrity: stack {id:?} selected {s} of {}",
                        stack.adapters.len()
                    )),
                    None if !stack.adapters.is_empty() => {
                        issues.push(format!("integrity: stack {id:?} has tabs but no selection"));
                    }
                    _ => {}
                }
            }
        }
    }

    let mut seen: HashMap<AdapterId, ZoneId> = HashMap::new();
    for (&id, zone) in &tree.zones {
        for &adapter in zone.adapters() {
            if let Some(prev) = seen.insert(adapter, id) {
                issues.push(format!(
                    "integrity: {adapter:?} held by both {prev:?} and {id:?}"
                ));
            }
            if tree.holder.get(&adapter) != Some(&id) {
                issues.push(format!(
                    "integrity: holder index for {adapter:?} is {:?}, expected {id:?}",
                    tree.holder.get(&adapter)
                ));
            }
        }
    }
    if seen.len() != tree.holder.len() {
        issues.push(format!(
            "integrity: holder index has {} entries for {} docked adapters",
            tree.holder.len(),
            seen.len()
        ));
    }

    issues
}

/// Everything [`zone_tree_issues`] checks, plus window roots, reachability and registration.
pub(super) fn manager_integrity_issues(manager: &DockingManager) -> Vec<String> {
    let mut issues = zone_tree_issues(&manager.zones);

    if manager.windows.values().filter(|w| w.is_main).count() != 1 {
        issues.push("integrity: expected exactly one main window".to_owned());
    }
    if !manager.windows.contains_key(&manager.main_window) {
        issues.push(format!("integrity: main window {:?} missing", manager.main_window));
    }
    if manager.z_order.len() != manager.windows.len()
        || manager.z_order.iter().any(|id| !manager.windows.contains_key(id))
    {
        issues.push(format!(
            "integrity: z-order {:?} does not match windows",
            manager.z_order
        ));
    }

    let mut reachable: HashSet<ZoneId> = HashSet::new();
    for (&window_id, window) in &manager.windows {
        let Some(root) = manager.zones.get(window.root) else {
            issues.push(format!("integrity: {window_id:?} root {:?} missing", window.root));
            continue;
        };
        if root.parent.is_some() {
            issues.push(format!("integrity: {window_id:?} root has a parent"));
        }
        for id in manager.zones.zones_under(window.root) {
            if manager.zones.get(id).is_some_and(|z| z.window != window_id) {
                issues.push(format!("integrity: {id:?} in {window_id:?} records another window"));
            }
            reachable.insert(id);
        }
        if !window.is_main && manager.zones.adapters_under(window.root).is_empty() {
            issues.push(format!("integrity: empty floating window {window_id:?}"));
        }
    }
    if reachable.len() != manager.zones.len() {
        issues.push(format!(
            "integrity: unreachable zones {} of {}",
            manager.zones.len().saturating_sub(reachable.len()),
            manager.zones.len()
        ));
    }

    for &adapter in manager.adapters.keys() {
        if manager.zones.holder_of(adapter).is_none() {
            issues.push(format!("integrity: registered {adapter:?} is not docked"));
        }
    }
    for adapter in manager.zones.holder.keys() {
        if !manager.adapters.contains_key(adapter) {
            issues.push(format!("integrity: docked {adapter:?} is not registered"));
        }
    }

    issues
}
