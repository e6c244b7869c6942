//! Screen-state primitives.
//!
//! Every screen owns one immutable snapshot type published through a
//! [`StateStore`]:
//!
//! ```text
//! handler ──→ update closure ──→ StateStore ──→ snapshot stream ──→ view
//!    ↑                                                   │
//!    └───────────────────────────────────────────────────┘
//! ```
//!
//! - **Snapshot**: immutable value aggregating every slice the view needs
//! - **Update closure**: pure transformation applied atomically
//! - **Store**: the only place snapshots are produced and published

mod snapshot;
mod status;
mod store;

pub use snapshot::{Notice, ScreenState};
pub use status::LoadStatus;
pub use store::{StateStore, Subscription, IDLE_GRACE};
