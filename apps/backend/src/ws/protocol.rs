use serde::Serialize;

use super::hub::HubEvent;
use crate::domain::ProfileId;
use crate::services::sessions::SessionView;

/// Frames pushed to a session socket.
#[allow(clippy::large_enum_variant)]
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMsg {
    /// Full view for this viewer; the resync point.
    Snapshot { session: SessionView },
    SessionUpdated { session_id: i64, lock_version: i32 },
    Presence { session_id: i64, profiles: Vec<ProfileId> },
    Error { code: String, message: String },
}

impl From<HubEvent> for ServerMsg {
    fn from(event: HubEvent) -> Self {
        match event {
            HubEvent::SessionUpdated {
                session_id,
                lock_version,
            } => ServerMsg::SessionUpdated {
                session_id,
                lock_version,
            },
            HubEvent::Presence {
                session_id,
                profiles,
            } => ServerMsg::Presence {
                session_id,
                profiles,
            },
        }
    }
}
