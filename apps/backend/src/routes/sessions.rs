//! Session routes: pairing, views and turn actions.

use actix_web::http::header::{ETAG, IF_NONE_MATCH};
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::db::txn::with_txn;
use crate::domain::{TurnAction, Verdict};
use crate::entities::game_sessions::GameType;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::extractors::{CurrentProfile, IfMatch, SessionId, ValidatedJson};
use crate::http::etag::session_etag;
use crate::services::sessions::{SessionService, SessionView};
use crate::services::settlement::SettlementOutcome;
use crate::state::app_state::AppState;
use crate::ws::hub::HubEvent;

fn default_game_type() -> GameType {
    GameType::EmojiCharades
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenSessionRequest {
    #[serde(default = "default_game_type", alias = "game_type")]
    pub game_type: GameType,
    #[serde(alias = "partner_id")]
    pub partner_id: i64,
}

/// Wire form of a turn action. Generate may omit both phrase and clue to
/// have the server pick a charade.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ActionRequest {
    Generate {
        #[serde(default, alias = "secret_phrase")]
        secret_phrase: Option<String>,
        #[serde(default)]
        clue: Option<String>,
    },
    Guess {
        guess: String,
    },
    GiveUp,
    Review {
        verdict: Verdict,
    },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionBody {
    #[serde(default, alias = "lock_version")]
    pub lock_version: Option<i32>,
    pub action: ActionRequest,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResponse {
    pub session: SessionView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settlement: Option<SettlementOutcome>,
}

/// Body version wins; when both are sent they must agree.
fn expected_version(body: Option<i32>, if_match: IfMatch) -> Result<Option<i32>, AppError> {
    match (body, if_match.0) {
        (Some(b), Some(h)) if b != h => Err(AppError::bad_request(
            ErrorCode::InvalidHeader,
            format!("If-Match version {h} disagrees with body lockVersion {b}"),
        )),
        (Some(b), _) => Ok(Some(b)),
        (None, h) => Ok(h),
    }
}

/// A server-filled Generate is checked against the session before the
/// content source is asked for a phrase.
async fn resolve_action(
    request: ActionRequest,
    app_state: &AppState,
    session_id: i64,
    actor: i64,
    expected: Option<i32>,
) -> Result<TurnAction, AppError> {
    let action = match request {
        ActionRequest::Generate {
            secret_phrase: None,
            clue: None,
        } => {
            service(app_state)
                .ensure_can_generate(&app_state.db, session_id, actor, expected)
                .await?;
            let charade = app_state.content.charade().await;
            debug!(phrase_len = charade.phrase.len(), "Generate filled from content source");
            TurnAction::Generate {
                secret_phrase: charade.phrase,
                clue: charade.emojis,
            }
        }
        ActionRequest::Generate {
            secret_phrase,
            clue,
        } => TurnAction::Generate {
            secret_phrase: secret_phrase.unwrap_or_default(),
            clue: clue.unwrap_or_default(),
        },
        ActionRequest::Guess { guess } => TurnAction::Guess { guess },
        ActionRequest::GiveUp => TurnAction::GiveUp,
        ActionRequest::Review { verdict } => TurnAction::Review { verdict },
    };
    Ok(action)
}

fn service(app_state: &AppState) -> SessionService {
    SessionService::new(app_state.config.reward_xp)
}

/// POST /api/sessions
///
/// Resumes the pair's live session or starts one with the caller generating.
async fn open(
    current: CurrentProfile,
    body: ValidatedJson<OpenSessionRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let me = current.id();
    let body = body.into_inner();
    let svc = service(&app_state);

    let (session, created) = with_txn(&app_state, |txn| {
        Box::pin(async move {
            Ok(svc
                .open_session(txn, body.game_type, me, body.partner_id)
                .await?)
        })
    })
    .await?;

    let etag = session_etag(session.id, session.lock_version);
    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok(HttpResponse::build(status)
        .insert_header((ETAG, etag))
        .json(SessionView::for_viewer(&session, me)))
}

/// GET /api/sessions
async fn list(
    current: CurrentProfile,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let views = service(&app_state)
        .list_sessions(&app_state.db, current.id())
        .await?;
    Ok(HttpResponse::Ok().json(views))
}

/// GET /api/sessions/{session_id}
///
/// Answers `304` when `If-None-Match` names the current version.
async fn get(
    req: HttpRequest,
    current: CurrentProfile,
    session_id: SessionId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let view = service(&app_state)
        .get_session(&app_state.db, session_id.0, current.id())
        .await?;
    let etag = session_etag(view.id, view.lock_version);

    let not_modified = req
        .headers()
        .get(IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.split(',').map(str::trim).any(|t| t == etag || t == "*"));
    if not_modified {
        return Ok(HttpResponse::NotModified()
            .insert_header((ETAG, etag))
            .finish());
    }

    Ok(HttpResponse::Ok().insert_header((ETAG, etag)).json(view))
}

/// POST /api/sessions/{session_id}/actions
///
/// The acting participant is the authenticated caller. Watchers are notified
/// only after the transaction has committed.
async fn act(
    current: CurrentProfile,
    session_id: SessionId,
    if_match: IfMatch,
    body: ValidatedJson<ActionBody>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let actor = current.id();
    let id = session_id.0;
    let body = body.into_inner();
    let expected = expected_version(body.lock_version, if_match)?;
    let action = resolve_action(body.action, &app_state, id, actor, expected).await?;
    let svc = service(&app_state);

    let outcome = with_txn(&app_state, |txn| {
        Box::pin(async move { Ok(svc.apply_action(txn, id, actor, expected, action).await?) })
    })
    .await?;

    let delivered = app_state.hub.publish(
        id,
        HubEvent::SessionUpdated {
            session_id: id,
            lock_version: outcome.session.lock_version,
        },
    );
    debug!(session_id = id, delivered, "Session update published");

    let etag = session_etag(id, outcome.session.lock_version);
    Ok(HttpResponse::Ok()
        .insert_header((ETAG, etag))
        .json(ActionResponse {
            session: SessionView::for_viewer(&outcome.session, actor),
            settlement: outcome.settlement,
        }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::post().to(open))
        .route("", web::get().to(list))
        .route("/{session_id}", web::get().to(get))
        .route("/{session_id}/actions", web::post().to(act));
}
