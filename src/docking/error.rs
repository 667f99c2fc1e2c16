use super::types::{AdapterId, WindowId, ZoneId};

/// A refused structural operation. The tree is left exactly as it was.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DockError {
    UnknownAdapter(AdapterId),
    UnknownZone(ZoneId),
    UnknownWindow(WindowId),
    /// The zone is being torn down and accepts no new content.
    ZoneDestroying(ZoneId),
    /// The operation needs a tabbed stack but the zone is a split container.
    NotAStack(ZoneId),
    /// The stack does not accept drops.
    NotDroppable(ZoneId),
    /// The adapter is already held by a zone.
    AdapterAlreadyDocked { adapter: AdapterId, zone: ZoneId },
    /// A split needs at least one adapter for the new sibling.
    EmptySplitContent(ZoneId),
    /// A window cannot be docked into one of its own zones.
    DropOntoSelf(WindowId),
    /// The main window is never dragged, torn off as a whole, or destroyed.
    MainWindow(WindowId),
}

impl std::fmt::Display for DockError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownAdapter(id) => write!(f, "unknown content adapter {id:?}"),
            Self::UnknownZone(id) => write!(f, "unknown dock zone {id:?}"),
            Self::UnknownWindow(id) => write!(f, "unknown floating window {id:?}"),
            Self::ZoneDestroying(id) => write!(f, "dock zone {id:?} is being destroyed"),
            Self::NotAStack(id) => write!(f, "dock zone {id:?} is not a tab stack"),
            Self::NotDroppable(id) => write!(f, "dock zone {id:?} does not accept drops"),
            Self::AdapterAlreadyDocked { adapter, zone } => {
                write!(f, "content adapter {adapter:?} is already docked in {zone:?}")
            }
            Self::EmptySplitContent(id) => {
                write!(f, "cannot split {id:?} without content for the new sibling")
            }
            Self::DropOntoSelf(id) => write!(f, "window {id:?} cannot be docked into itself"),
            Self::MainWindow(id) => write!(f, "window {id:?} is the main window"),
        }
    }
}

impl std::error::Error for DockError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_zone() {
        let err = DockError::ZoneDestroying(ZoneId::from_u64(4));
        assert_eq!(err.to_string(), "dock zone Zone#4 is being destroyed");
    }
}
