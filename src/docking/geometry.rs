use egui::{Pos2, Rect};

use super::DockingManager;
use super::host::ScreenGeometry;
use super::types::{WindowId, ZoneId};
use super::zone::DockZone;

fn area(rect: Rect) -> f32 {
    rect.width() * rect.height()
}

impl DockingManager {
    /// The droppable stack under `pointer` in the front-most window there, skipping `excluded`.
    ///
    /// Windows are searched front to back, and the first window with any stack under the
    /// pointer ends the search: if its stack there refuses drops, nothing is returned rather
    /// than reaching through to a window behind it. Within a window the smallest containing
    /// rectangle wins, so nested stacks beat whatever the renderer reports for their ancestors.
    pub(super) fn stack_under_pointer(
        &self,
        geometry: &dyn ScreenGeometry,
        pointer: Pos2,
        excluded: Option<WindowId>,
    ) -> Option<(ZoneId, Rect)> {
        self.z_order
            .iter()
            .rev()
            .filter(|&&id| Some(id) != excluded)
            .filter_map(|id| self.windows.get(id))
            .find_map(|window| {
                self.zones
                    .stacks_under(window.root)
                    .into_iter()
                    .filter_map(|zone| {
                        let rect = geometry.zone_rect(zone)?;
                        rect.contains(pointer).then_some((zone, rect))
                    })
                    .min_by(|a, b| area(a.1).total_cmp(&area(b.1)))
            })
            .filter(|&(zone, _)| self.zones.get(zone).is_some_and(DockZone::is_droppable))
    }
}
