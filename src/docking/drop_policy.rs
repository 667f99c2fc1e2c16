use egui::{Pos2, Rect};

use super::types::{DropDisposition, SplitDirection};

/// Decides how a drop over a zone's rectangle is applied.
///
/// The thresholds are UX tuning, so they are data rather than constants.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DropPolicy {
    /// Fraction of the zone's width (or height) along each edge that selects a directional split.
    /// Everything inside the edge bands is a center merge.
    pub edge_fraction: f32,

    /// Zones narrower (or shorter) than this, in points, only accept center merges along that axis.
    pub min_split_extent: f32,
}

impl Default for DropPolicy {
    fn default() -> Self {
        Self {
            edge_fraction: 0.25,
            min_split_extent: 48.0,
        }
    }
}

impl DropPolicy {
    /// Disposition for `pointer` over `rect`, or `None` if the pointer is outside.
    ///
    /// When the pointer is in two edge bands at once (a corner), the nearer edge wins,
    /// horizontal edges first on ties.
    pub fn disposition(&self, rect: Rect, pointer: Pos2) -> Option<DropDisposition> {
        if !rect.contains(pointer) {
            return None;
        }

        let edge_fraction = self.edge_fraction.clamp(0.0, 0.5);
        let fx = if rect.width() > 0.0 {
            (pointer.x - rect.min.x) / rect.width()
        } else {
            0.5
        };
        let fy = if rect.height() > 0.0 {
            (pointer.y - rect.min.y) / rect.height()
        } else {
            0.5
        };

        let horizontal_ok = rect.width() >= self.min_split_extent;
        let vertical_ok = rect.height() >= self.min_split_extent;

        let candidates = [
            (SplitDirection::Left, fx, horizontal_ok),
            (SplitDirection::Right, 1.0 - fx, horizontal_ok),
            (SplitDirection::Top, fy, vertical_ok),
            (SplitDirection::Bottom, 1.0 - fy, vertical_ok),
        ];

        let nearest = candidates
            .into_iter()
            .filter(|&(_, distance, allowed)| allowed && distance < edge_fraction)
            .min_by(|a, b| a.1.total_cmp(&b.1));

        Some(match nearest {
            Some((direction, _, _)) => DropDisposition::Split(direction),
            None => DropDisposition::Center,
        })
    }
}
