//! Screen models.
//!
//! One model per screen instance, owning its state store, lifecycle scope
//! and collaborators. Models expose fire-and-forget entry points and a
//! subscribable snapshot stream; the presentation layer renders snapshots
//! and calls back in.

mod comments;
mod library;

pub use comments::{CommentReactionSlice, CommentsModel, CommentsSnapshot};
pub use library::{LibraryModel, LibrarySnapshot};
