//! Media catalog entities.

use serde::{Deserialize, Serialize};

/// Stable identifier for a show, movie or episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaId(pub u64);

impl std::fmt::Display for MediaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable identifier for a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentId(pub u64);

impl std::fmt::Display for CommentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What kind of media an id refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Show,
    Movie,
    Episode,
}

/// A show as the catalog describes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Show {
    pub id: MediaId,
    pub title: String,
    pub year: Option<u16>,
}

/// The signed-in user as the session service reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewer {
    pub username: String,
    pub display_name: Option<String>,
}

impl Viewer {
    /// Name to show in UI chrome: display name when set, username otherwise.
    pub fn shown_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.username)
    }
}

/// A comment on a media item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub media_id: MediaId,
    pub author: String,
    pub body: String,
    /// Unix seconds.
    pub posted_at: u64,
    pub spoiler: bool,
}

/// One entry in the viewer's in-progress library.
///
/// `last_watched_at` drives the natural sort order upstream, which is why
/// a background refresh can legitimately return the same set in a new
/// order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryEntry {
    pub show: Show,
    pub episodes_watched: u32,
    pub episodes_aired: u32,
    /// Unix seconds.
    pub last_watched_at: u64,
}

impl crate::list::ListEntry for LibraryEntry {
    type Key = MediaId;

    fn key(&self) -> MediaId {
        self.show.id
    }
}

impl LibraryEntry {
    /// Whole-show progress in the 0..=100 range.
    pub fn progress_percent(&self) -> u8 {
        if self.episodes_aired == 0 {
            return 0;
        }
        let pct = (self.episodes_watched as u64 * 100) / self.episodes_aired as u64;
        pct.min(100) as u8
    }
}
