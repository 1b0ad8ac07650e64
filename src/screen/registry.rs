//! media-query registry
//!
//! process-shared reactive store mapping section/item ids to their live
//! media-query state. the registry owns the listener lifecycle: every
//! normal-mode evaluation detaches the previous listener and arms a fresh
//! one (the query string may have changed between passes), so each id holds
//! at most one live listener at any time. callers never write entries
//! directly; they observe match flips through [`MediaQueryRegistry::subscribe`]
//! and re-run the filters themselves.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::warn;

use super::viewport::{MediaQueryHandle, ViewportBackend};

/// notification pushed to subscribers when a tracked query flips
#[derive(Debug, Clone, Serialize)]
pub struct ScreenUpdate {
    /// id of the owning section/item
    pub id: String,
    /// new match state
    pub matches: bool,
    /// when the flip was observed
    pub ts: DateTime<Utc>,
}

/// registry entry for one section/item id
struct MediaQueryEntry {
    handle: Box<dyn MediaQueryHandle>,
    matches: bool,
    armed: bool,
}

struct RegistryInner {
    entries: RwLock<HashMap<String, MediaQueryEntry>>,
    subscribers: RwLock<HashMap<u64, mpsc::UnboundedSender<ScreenUpdate>>>,
    next_subscriber_id: AtomicU64,
}

impl RegistryInner {
    /// change-callback path: update only this id's match flag, then notify
    fn record_matches(&self, id: &str, matches: bool) {
        {
            let Ok(mut entries) = self.entries.write() else {
                return;
            };
            match entries.get_mut(id) {
                Some(entry) => entry.matches = matches,
                // entry was replaced or removed; stale callback, drop it
                None => return,
            }
        }
        self.notify(id, matches);
    }

    fn notify(&self, id: &str, matches: bool) {
        if let Ok(subs) = self.subscribers.read() {
            for sender in subs.values() {
                // ignore send errors (subscriber dropped)
                let _ = sender.send(ScreenUpdate {
                    id: id.to_string(),
                    matches,
                    ts: Utc::now(),
                });
            }
        }
    }
}

/// reactive store for screen-condition state, one entry per section/item id
///
/// constructor-injected and context-owned: every engine that filters a
/// dashboard holds its own registry around a viewport backend.
pub struct MediaQueryRegistry {
    backend: Arc<dyn ViewportBackend>,
    inner: Arc<RegistryInner>,
}

impl MediaQueryRegistry {
    /// create a registry over the given viewport backend
    pub fn new(backend: Arc<dyn ViewportBackend>) -> Self {
        Self {
            backend,
            inner: Arc::new(RegistryInner {
                entries: RwLock::new(HashMap::new()),
                subscribers: RwLock::new(HashMap::new()),
                next_subscriber_id: AtomicU64::new(1),
            }),
        }
    }

    /// evaluate a screen condition for the section/item `id`
    ///
    /// edit mode is stateless: the query is probed once and nothing is
    /// recorded, since an editor re-evaluates on every keystroke and would
    /// otherwise accumulate listeners. normal mode re-arms the listener and
    /// stores the entry, returning the current match synchronously; later
    /// viewport transitions update the entry asynchronously.
    pub fn evaluate(&self, edit_mode: bool, id: &str, query: &str) -> bool {
        if id.is_empty() || query.is_empty() {
            return false;
        }

        if edit_mode {
            return match self.backend.match_media(query) {
                Ok(handle) => handle.matches(),
                Err(err) => {
                    warn!(id, %err, "media query rejected");
                    false
                }
            };
        }

        // detach the previous listener before re-arming; the query string
        // may have changed since the last pass
        let previous = match self.inner.entries.write() {
            Ok(mut entries) => entries.remove(id),
            Err(_) => None,
        };
        if let Some(entry) = previous {
            if entry.armed {
                entry.handle.set_listener(None);
            }
        }

        let handle = match self.backend.match_media(query) {
            Ok(handle) => handle,
            Err(err) => {
                // the stale entry stays dropped so the snapshot never
                // reports a match for a query that no longer resolves
                warn!(id, %err, "media query rejected");
                return false;
            }
        };

        let inner = Arc::clone(&self.inner);
        let listener_id = id.to_string();
        handle.set_listener(Some(Box::new(move |matches| {
            inner.record_matches(&listener_id, matches);
        })));

        let matches = handle.matches();
        if let Ok(mut entries) = self.inner.entries.write() {
            entries.insert(
                id.to_string(),
                MediaQueryEntry {
                    handle,
                    matches,
                    armed: true,
                },
            );
        }
        matches
    }

    /// current match state for `id`, if tracked
    pub fn matches(&self, id: &str) -> Option<bool> {
        self.inner
            .entries
            .read()
            .ok()
            .and_then(|entries| entries.get(id).map(|entry| entry.matches))
    }

    /// snapshot of all tracked ids and their match state
    pub fn snapshot(&self) -> HashMap<String, bool> {
        self.inner
            .entries
            .read()
            .map(|entries| {
                entries
                    .iter()
                    .map(|(id, entry)| (id.clone(), entry.matches))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// subscribe to match flips
    /// returns (subscription_id, receiver)
    pub fn subscribe(&self) -> (u64, mpsc::UnboundedReceiver<ScreenUpdate>) {
        let id = self.inner.next_subscriber_id.fetch_add(1, Ordering::SeqCst);
        let (sender, receiver) = mpsc::unbounded_channel();

        if let Ok(mut subs) = self.inner.subscribers.write() {
            subs.insert(id, sender);
        }

        (id, receiver)
    }

    /// unsubscribe from match flips
    pub fn unsubscribe(&self, id: u64) {
        if let Ok(mut subs) = self.inner.subscribers.write() {
            subs.remove(&id);
        }
    }

    /// tear down the entry for a section/item permanently removed from the
    /// dashboard; detaches its listener
    pub fn remove(&self, id: &str) {
        let removed = match self.inner.entries.write() {
            Ok(mut entries) => entries.remove(id),
            Err(_) => None,
        };
        if let Some(entry) = removed {
            if entry.armed {
                entry.handle.set_listener(None);
            }
        }
    }

    /// number of tracked ids
    pub fn len(&self) -> usize {
        self.inner
            .entries
            .read()
            .map(|entries| entries.len())
            .unwrap_or(0)
    }

    /// whether the registry tracks no ids
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
