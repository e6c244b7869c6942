//! Loading status for screen operations.

/// Where a load operation stands.
///
/// Screens carry one of these for the primary load and a second one for
/// incremental operations ("loading more"). A screen that already shows
/// cached data keeps the primary status out of `Loading` during background
/// reconciliation so the view does not flicker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadStatus {
    /// Nothing requested yet.
    #[default]
    Idle,

    /// A load is in flight and no data satisfies the screen yet.
    Loading,

    /// The last load finished (successfully or with a surfaced error).
    Done,
}

impl LoadStatus {
    /// Check if a spinner should be shown.
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Check if at least one load has completed.
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_is_default() {
        assert_eq!(LoadStatus::default(), LoadStatus::Idle);
    }

    #[test]
    fn is_loading_check() {
        assert!(!LoadStatus::Idle.is_loading());
        assert!(LoadStatus::Loading.is_loading());
        assert!(!LoadStatus::Done.is_loading());
    }

    #[test]
    fn is_done_check() {
        assert!(!LoadStatus::Idle.is_done());
        assert!(!LoadStatus::Loading.is_done());
        assert!(LoadStatus::Done.is_done());
    }
}
