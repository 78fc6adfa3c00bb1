//! Named slots holding the latest published URL.
//!
//! Uploaders publish to a slot (for example the current pitch deck URL);
//! readers either poll `latest` or hold a `watch::Receiver` and await changes.

use std::collections::HashMap;
use tokio::sync::{watch, RwLock};

#[derive(Debug, Default)]
pub struct UrlBoard {
    slots: RwLock<HashMap<String, watch::Sender<Option<String>>>>,
}

impl UrlBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the slot's value and wake its subscribers.
    pub async fn publish(&self, slot: &str, url: impl Into<String>) {
        let url = url.into();
        {
            let slots = self.slots.read().await;
            if let Some(sender) = slots.get(slot) {
                sender.send_replace(Some(url));
                return;
            }
        }
        let mut slots = self.slots.write().await;
        slots
            .entry(slot.to_string())
            .or_insert_with(|| watch::channel(None).0)
            .send_replace(Some(url));
    }

    pub async fn latest(&self, slot: &str) -> Option<String> {
        self.slots
            .read()
            .await
            .get(slot)
            .and_then(|sender| sender.borrow().clone())
    }

    /// Receiver for a slot, created empty if nothing was published yet.
    pub async fn subscribe(&self, slot: &str) -> watch::Receiver<Option<String>> {
        if let Some(sender) = self.slots.read().await.get(slot) {
            return sender.subscribe();
        }
        self.slots
            .write()
            .await
            .entry(slot.to_string())
            .or_insert_with(|| watch::channel(None).0)
            .subscribe()
    }

    pub async fn clear(&self, slot: &str) {
        if let Some(sender) = self.slots.read().await.get(slot) {
            sender.send_replace(None);
        }
    }
}
