//! Cross-screen update notifications.
//!
//! Screens never share mutable state; when one screen changes something
//! another screen displays (marking an episode watched, posting a
//! reaction), it publishes an [`UpdateEvent`] here and interested screens
//! re-check their own sources. Delivery is at-least-once: duplicate or
//! redundant events only cost a redundant re-check.

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

use crate::model::MediaId;

/// Event categories screens can filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateTopic {
    /// Watched-progress changed for some show.
    Progress,
    /// Collection / watchlist membership changed.
    Collection,
    /// Comments or reactions changed.
    Comments,
    /// Ratings changed.
    Ratings,
}

/// One "something may have changed" notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateEvent {
    pub topic: UpdateTopic,
    /// The affected item, when the producer knows it.
    pub media_id: Option<MediaId>,
}

impl UpdateEvent {
    pub fn new(topic: UpdateTopic) -> Self {
        Self {
            topic,
            media_id: None,
        }
    }

    pub fn for_media(topic: UpdateTopic, media_id: MediaId) -> Self {
        Self {
            topic,
            media_id: Some(media_id),
        }
    }
}

/// Multi-producer multi-consumer notification hub.
///
/// Cloning shares the same channel; each subscriber gets its own cursor.
#[derive(Clone)]
pub struct UpdateHub {
    tx: broadcast::Sender<UpdateEvent>,
}

impl UpdateHub {
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publish an event to every current subscriber.
    ///
    /// Having no subscribers is not an error.
    pub fn publish(&self, event: UpdateEvent) {
        tracing::debug!(topic = ?event.topic, media_id = ?event.media_id, "update published");
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> UpdateStream {
        UpdateStream {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for UpdateHub {
    fn default() -> Self {
        // Consumers treat events as "re-check", so a shallow buffer is
        // enough: overflow degrades to one extra re-check, not data loss.
        Self::new(16)
    }
}

/// One subscriber's view of the hub.
pub struct UpdateStream {
    rx: broadcast::Receiver<UpdateEvent>,
}

impl UpdateStream {
    /// Wait until something matching `topics` may have changed.
    ///
    /// Returns `false` when the hub has closed. A lagged receiver counts
    /// as a match: missed events can only mean "re-check".
    pub async fn changed(&mut self, topics: &[UpdateTopic]) -> bool {
        loop {
            match self.rx.recv().await {
                Ok(event) if topics.contains(&event.topic) => return true,
                Ok(_) => continue,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "update stream lagged, treating as changed");
                    return true;
                }
                Err(RecvError::Closed) => return false,
            }
        }
    }
}
