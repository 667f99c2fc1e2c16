use super::types::WindowId;

/// Bookkeeping for the drag currently in flight: a session id and sample count for logs.
#[derive(Debug, Default)]
pub(super) struct DragSession {
    next_id: u64,
    active: Option<ActiveSession>,
}

#[derive(Debug)]
struct ActiveSession {
    id: u64,
    window: WindowId,
    samples: u64,
}

impl DragSession {
    pub(super) fn begin(&mut self, window: WindowId) -> String {
        let id = self.next_id.max(1);
        self.next_id = id.saturating_add(1);
        self.active = Some(ActiveSession {
            id,
            window,
            samples: 0,
        });
        format!("session START id={id} window={window:?}")
    }

    pub(super) fn observe_sample(&mut self) {
        if let Some(active) = &mut self.active {
            active.samples = active.samples.saturating_add(1);
        }
    }

    /// Log line for the release that ends the session.
    pub(super) fn release(&self, kind: &'static str) -> String {
        match &self.active {
            Some(active) => format!(
                "session RELEASE id={} kind={kind} window={:?} samples={}",
                active.id, active.window, active.samples
            ),
            None => format!("session RELEASE kind={kind} (no active session)"),
        }
    }

    pub(super) fn end(&mut self) -> Option<String> {
        let ended = self.active.take()?;
        Some(format!(
            "session END id={} window={:?} samples={}",
            ended.id, ended.window, ended.samples
        ))
    }
}
