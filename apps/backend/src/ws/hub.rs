//! In-process fan-out of session change notifications.
//!
//! Delivery is best effort. Clients resync from the `lock_version` carried
//! by every event, so a dropped or repeated push is harmless.

use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ProfileId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HubEvent {
    SessionUpdated {
        session_id: i64,
        lock_version: i32,
    },
    Presence {
        session_id: i64,
        profiles: Vec<ProfileId>,
    },
}

struct Subscriber {
    profile_id: ProfileId,
    tx: UnboundedSender<HubEvent>,
}

/// Handle returned by `subscribe`; drop the receiver to go away silently.
pub struct Subscription {
    pub token: Uuid,
    pub receiver: UnboundedReceiver<HubEvent>,
}

#[derive(Default)]
pub struct SessionHub {
    sessions: DashMap<i64, DashMap<Uuid, Subscriber>>,
}

impl SessionHub {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    pub fn subscribe(&self, session_id: i64, profile_id: ProfileId) -> Subscription {
        let token = Uuid::new_v4();
        let (tx, receiver) = mpsc::unbounded_channel();
        self.sessions
            .entry(session_id)
            .or_default()
            .insert(token, Subscriber { profile_id, tx });

        debug!(session_id, profile_id, token = %token, "Subscribed");
        self.publish_presence(session_id);
        Subscription { token, receiver }
    }

    pub fn unsubscribe(&self, session_id: i64, token: Uuid) {
        let removed = self
            .sessions
            .get(&session_id)
            .and_then(|subs| subs.remove(&token))
            .is_some();
        self.sessions.remove_if(&session_id, |_, subs| subs.is_empty());

        if removed {
            debug!(session_id, token = %token, "Unsubscribed");
            self.publish_presence(session_id);
        }
    }

    /// Send `event` to every live subscriber of the session; returns how many got it.
    pub fn publish(&self, session_id: i64, event: HubEvent) -> usize {
        let Some(subs) = self.sessions.get(&session_id) else {
            return 0;
        };

        let mut delivered = 0;
        let mut closed = Vec::new();
        for entry in subs.iter() {
            if entry.value().tx.send(event.clone()).is_ok() {
                delivered += 1;
            } else {
                closed.push(*entry.key());
            }
        }
        for token in &closed {
            subs.remove(token);
        }
        drop(subs);

        if !closed.is_empty() {
            self.sessions.remove_if(&session_id, |_, subs| subs.is_empty());
        }
        delivered
    }

    /// Distinct profiles currently watching the session, ascending.
    pub fn present_profiles(&self, session_id: i64) -> Vec<ProfileId> {
        let mut profiles: Vec<ProfileId> = self
            .sessions
            .get(&session_id)
            .map(|subs| subs.iter().map(|s| s.value().profile_id).collect())
            .unwrap_or_default();
        profiles.sort_unstable();
        profiles.dedup();
        profiles
    }

    pub fn subscriber_count(&self, session_id: i64) -> usize {
        self.sessions
            .get(&session_id)
            .map(|subs| subs.len())
            .unwrap_or(0)
    }

    fn publish_presence(&self, session_id: i64) {
        let profiles = self.present_profiles(session_id);
        self.publish(
            session_id,
            HubEvent::Presence {
                session_id,
                profiles,
            },
        );
    }
}
