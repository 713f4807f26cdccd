use std::time::{Duration, Instant};

use actix::prelude::*;
use actix_web::web;
use actix_web_actors::ws;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::{info, warn};
use uuid::Uuid;

use super::hub::HubEvent;
use super::protocol::ServerMsg;
use crate::domain::ProfileId;
use crate::services::sessions::SessionService;
use crate::state::app_state::AppState;

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(20);
const CLIENT_TIMEOUT: Duration = Duration::from_secs(40);

/// One socket watching one session on behalf of one participant.
pub struct WsSession {
    conn_id: Uuid,
    session_id: i64,
    profile_id: ProfileId,
    app_state: web::Data<AppState>,
    hub_token: Option<Uuid>,
    last_heartbeat: Instant,
}

impl WsSession {
    pub fn new(session_id: i64, profile_id: ProfileId, app_state: web::Data<AppState>) -> Self {
        Self {
            conn_id: Uuid::new_v4(),
            session_id,
            profile_id,
            app_state,
            hub_token: None,
            last_heartbeat: Instant::now(),
        }
    }

    fn send_json(ctx: &mut ws::WebsocketContext<Self>, msg: &ServerMsg) {
        match serde_json::to_string(msg) {
            Ok(payload) => ctx.text(payload),
            Err(err) => warn!(error = %err, "Failed to serialize outbound ws message"),
        }
    }

    fn start_heartbeat(&self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.run_interval(HEARTBEAT_INTERVAL, |actor, ctx| {
            if Instant::now().duration_since(actor.last_heartbeat) > CLIENT_TIMEOUT {
                warn!(
                    conn_id = %actor.conn_id,
                    session_id = actor.session_id,
                    "Websocket heartbeat timed out"
                );
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Normal)));
                ctx.stop();
                return;
            }
            ctx.ping(b"");
        });
    }

    fn send_snapshot(&self, ctx: &mut ws::WebsocketContext<Self>) {
        let app_state = self.app_state.clone();
        let (session_id, viewer) = (self.session_id, self.profile_id);

        ctx.spawn(
            async move {
                SessionService::default()
                    .get_session(&app_state.db, session_id, viewer)
                    .await
            }
            .into_actor(self)
            .map(|res, actor, ctx| match res {
                Ok(view) => Self::send_json(ctx, &ServerMsg::Snapshot { session: view }),
                Err(err) => {
                    warn!(session_id = actor.session_id, error = %err, "Snapshot failed");
                    Self::send_json(
                        ctx,
                        &ServerMsg::Error {
                            code: "snapshot_failed".to_string(),
                            message: "Could not load session".to_string(),
                        },
                    );
                    ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
                    ctx.stop();
                }
            }),
        );
    }
}

impl Actor for WsSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!(
            conn_id = %self.conn_id,
            session_id = self.session_id,
            profile_id = self.profile_id,
            "Websocket started"
        );

        // Subscribe before loading the snapshot so no update falls in between.
        let subscription = self.app_state.hub.subscribe(self.session_id, self.profile_id);
        self.hub_token = Some(subscription.token);
        ctx.add_stream(UnboundedReceiverStream::new(subscription.receiver));

        self.send_snapshot(ctx);
        self.start_heartbeat(ctx);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        if let Some(token) = self.hub_token.take() {
            self.app_state.hub.unsubscribe(self.session_id, token);
        }
        info!(
            conn_id = %self.conn_id,
            session_id = self.session_id,
            "Websocket stopped"
        );
    }
}

impl StreamHandler<HubEvent> for WsSession {
    fn handle(&mut self, event: HubEvent, ctx: &mut Self::Context) {
        Self::send_json(ctx, &ServerMsg::from(event));
    }

    // The hub side never closes first; keep the socket alive regardless.
    fn finished(&mut self, _ctx: &mut Self::Context) {}
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(payload)) => {
                self.last_heartbeat = Instant::now();
                ctx.pong(&payload);
            }
            Ok(ws::Message::Pong(_)) => {
                self.last_heartbeat = Instant::now();
            }
            Ok(ws::Message::Text(text)) => {
                self.last_heartbeat = Instant::now();
                // `resync` asks for a fresh snapshot; other text is ignored.
                if text.trim() == "resync" {
                    self.send_snapshot(ctx);
                }
            }
            Ok(ws::Message::Binary(_)) => {
                self.last_heartbeat = Instant::now();
                Self::send_json(
                    ctx,
                    &ServerMsg::Error {
                        code: "bad_request".to_string(),
                        message: "Binary frames are not supported".to_string(),
                    },
                );
            }
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Ok(ws::Message::Continuation(_)) | Ok(ws::Message::Nop) => {
                self.last_heartbeat = Instant::now();
            }
            Err(err) => {
                warn!(conn_id = %self.conn_id, error = %err, "Websocket protocol error");
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
                ctx.stop();
            }
        }
    }
}
