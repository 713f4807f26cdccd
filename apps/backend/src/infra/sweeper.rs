//! Background archival of idle sessions.

use std::time::Duration;

use actix_web::web;
use tracing::{debug, warn};

use crate::errors::domain::DomainError;
use crate::services::sessions::SessionService;
use crate::state::app_state::AppState;
use crate::ws::hub::HubEvent;

/// Archive sessions idle for `idle_for` and tell their watchers.
///
/// Each archival is its own conditional write, so events go out only for
/// rows this sweep actually changed. Returns how many were archived.
pub async fn sweep_idle_sessions(
    state: &AppState,
    idle_for: Duration,
) -> Result<usize, DomainError> {
    let archived = SessionService::new(state.config.reward_xp)
        .archive_idle_sessions(&state.db, idle_for)
        .await?;

    for session in &archived {
        let delivered = state.hub.publish(
            session.id,
            HubEvent::SessionUpdated {
                session_id: session.id,
                lock_version: session.lock_version,
            },
        );
        debug!(session_id = session.id, delivered, "Archive published");
    }
    Ok(archived.len())
}

/// Run the sweep on a fixed cadence for the life of the process.
pub fn spawn_idle_sweeper(state: web::Data<AppState>) {
    let every = state.config.sweep_interval.max(Duration::from_secs(1));
    let idle_for = state.config.session_idle;

    actix_web::rt::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            if let Err(e) = sweep_idle_sessions(&state, idle_for).await {
                warn!(error = %e, "Idle session sweep failed");
            }
        }
    });
}
