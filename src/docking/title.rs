use std::collections::BTreeMap;

use super::adapter::ContentAdapter;
use super::types::{AdapterId, ZoneId};
use super::zone::ZoneTree;

/// Title for a floating window: the selected tab of the first stack, else the first tab found.
pub(super) fn title_for_window(
    zones: &ZoneTree,
    adapters: &BTreeMap<AdapterId, ContentAdapter>,
    root: ZoneId,
) -> String {
    let selected = zones.stacks_under(root).into_iter().find_map(|stack| {
        let zone = zones.get(stack)?;
        zone.adapters().get(zone.selected_index()?).copied()
    });

    selected
        .into_iter()
        .chain(zones.adapters_under(root))
        .find_map(|id| adapters.get(&id))
        .map(|adapter| adapter.title().to_owned())
        .unwrap_or_else(|| "Floating".to_owned())
}
