//! Domain entities shared by the screen models.
//!
//! Plain data types with serde derives; all state math that belongs to a
//! type lives beside it.

mod media;
mod reaction;

pub use media::{Comment, CommentId, LibraryEntry, MediaId, MediaKind, Show, Viewer};
pub use reaction::{Reaction, ReactionSummary};
