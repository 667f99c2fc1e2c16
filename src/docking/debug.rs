use super::DockingManager;
use super::integrity;
use super::types::ZoneId;
use super::zone::ZoneTree;

fn debug_tree_summary(zones: &ZoneTree, root: ZoneId, max_nodes: usize) -> String {
    let lines: Vec<String> = zones
        .zones_under(root)
        .into_iter()
        .take(max_nodes)
        .filter_map(|id| zones.get(id))
        .map(|zone| {
            format!(
                "{:?} {:?} parent={:?} adapters={:?} children={:?} destroying={}",
                zone.id(),
                zone.kind(),
                zone.parent(),
                zone.adapters(),
                zone.children(),
                zone.is_destroying()
            )
        })
        .collect();
    format!("root={root:?} total_zones={}\n{}", zones.len(), lines.join("\n"))
}

impl DockingManager {
    pub(super) fn debug_log_event(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::debug!("{message}");
        if !self.options.debug_event_log {
            return;
        }
        self.push_debug_log_line(message);
    }

    fn push_debug_log_line(&mut self, message: String) {
        self.debug_seq = self.debug_seq.wrapping_add(1);
        let cap = self.options.debug_event_log_capacity.clamp(1, 10_000);
        while self.debug_log.len() >= cap {
            self.debug_log.pop_front();
        }
        self.debug_log
            .push_back(format!("[{}] {}", self.debug_seq, message));
    }

    /// The recorded debug events, oldest first, one per line.
    pub fn debug_log_text(&self) -> String {
        self.debug_log
            .iter()
            .cloned()
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn debug_log_clear(&mut self) {
        self.debug_log.clear();
    }

    /// Checks every zone-tree invariant. An empty list means the layout is consistent.
    pub fn integrity_issues(&self) -> Vec<String> {
        integrity::manager_integrity_issues(self)
    }

    pub(super) fn after_mutation(&mut self, operation: &'static str) {
        if !self.options.debug_integrity {
            return;
        }
        let issues = self.integrity_issues();
        if issues.is_empty() {
            return;
        }

        log::error!("integrity FAIL after {operation}: {} issue(s)", issues.len());
        self.push_debug_log_line(format!("integrity FAIL after {operation}"));
        for issue in &issues {
            log::error!("{issue}");
            self.push_debug_log_line(issue.clone());
        }
        let summaries: Vec<String> = self
            .windows()
            .map(|w| format!("{:?}: {}", w.id(), debug_tree_summary(&self.zones, w.root(), 48)))
            .collect();
        for summary in &summaries {
            self.push_debug_log_line(summary.clone());
        }

        if self.options.debug_integrity_panic && cfg!(debug_assertions) {
            panic!(
                "docking integrity failure after {operation}\n{}\n{}",
                issues.join("\n"),
                summaries.join("\n")
            );
        }
    }
}
