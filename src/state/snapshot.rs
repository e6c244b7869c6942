//! Base trait for screen snapshots.

/// Marker trait for screen snapshot types.
///
/// Snapshots should be:
/// - Immutable (Clone to create new snapshots)
/// - Self-contained (all data needed to render the screen)
/// - Comparable (PartialEq for change detection)
pub trait ScreenState: Clone + PartialEq + Default + Send + Sync + 'static {}

/// A transient user-facing message.
///
/// Lives in a snapshot until the presentation layer consumes it and the
/// screen model clears it; it is not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice(pub String);

impl Notice {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn text(&self) -> &str {
        &self.0
    }
}
