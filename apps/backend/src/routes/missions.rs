use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::db::txn::with_txn;
use crate::entities::missions::{self, MissionOwner, MissionStatus};
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::extractors::{CurrentProfile, ValidatedJson};
use crate::services::missions::{MissionOutcome, MissionService, NewMission};
use crate::services::settlement::SettlementOutcome;
use crate::state::app_state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionView {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub duration: String,
    pub xp: i32,
    pub owner: MissionOwner,
    pub emoji: String,
    pub status: MissionStatus,
    pub proof_url: Option<String>,
    pub submitted_by: Option<i64>,
    pub lock_version: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<missions::Model> for MissionView {
    fn from(m: missions::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            description: m.description,
            duration: m.duration,
            xp: m.xp,
            owner: m.owner,
            emoji: m.emoji,
            status: m.status,
            proof_url: m.proof_url,
            submitted_by: m.submitted_by,
            lock_version: m.lock_version,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionOutcomeView {
    pub mission: MissionView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settlement: Option<SettlementOutcome>,
}

impl From<MissionOutcome> for MissionOutcomeView {
    fn from(o: MissionOutcome) -> Self {
        Self {
            mission: o.mission.into(),
            settlement: o.settlement,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofRequest {
    #[serde(alias = "proof_url")]
    pub proof_url: String,
    #[serde(default, alias = "lock_version")]
    pub lock_version: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JudgeRequest {
    #[serde(default, alias = "lock_version")]
    pub lock_version: Option<i32>,
}

fn parse_mission_id(raw: &str) -> Result<i64, AppError> {
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(AppError::bad_request(
            ErrorCode::BadRequest,
            format!("Invalid mission id: {raw}"),
        )),
    }
}

fn views(list: Vec<missions::Model>) -> Vec<MissionView> {
    list.into_iter().map(MissionView::from).collect()
}

async fn list_open(
    _current: CurrentProfile,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let list = MissionService::new().list_open(&app_state.db).await?;
    Ok(HttpResponse::Ok().json(views(list)))
}

async fn list_completed(
    _current: CurrentProfile,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let list = MissionService::new().list_completed(&app_state.db).await?;
    Ok(HttpResponse::Ok().json(views(list)))
}

async fn create(
    current: CurrentProfile,
    body: ValidatedJson<NewMission>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let creator = current.0;
    let input = body.into_inner();
    let mission = with_txn(&app_state, |txn| {
        Box::pin(async move {
            Ok(MissionService::new()
                .create_mission(txn, &creator, input)
                .await?)
        })
    })
    .await?;
    Ok(HttpResponse::Created().json(MissionView::from(mission)))
}

async fn submit_proof(
    current: CurrentProfile,
    path: web::Path<String>,
    body: ValidatedJson<ProofRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = parse_mission_id(&path)?;
    let submitter = current.0;
    let body = body.into_inner();
    let mission = with_txn(&app_state, |txn| {
        Box::pin(async move {
            Ok(MissionService::new()
                .submit_proof(txn, id, &submitter, &body.proof_url, body.lock_version)
                .await?)
        })
    })
    .await?;
    Ok(HttpResponse::Ok().json(MissionView::from(mission)))
}

async fn approve(
    current: CurrentProfile,
    path: web::Path<String>,
    body: ValidatedJson<JudgeRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = parse_mission_id(&path)?;
    let judge = current.0;
    let expected = body.lock_version;
    let outcome = with_txn(&app_state, |txn| {
        Box::pin(async move { Ok(MissionService::new().approve(txn, id, &judge, expected).await?) })
    })
    .await?;
    Ok(HttpResponse::Ok().json(MissionOutcomeView::from(outcome)))
}

async fn reject(
    current: CurrentProfile,
    path: web::Path<String>,
    body: ValidatedJson<JudgeRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = parse_mission_id(&path)?;
    let judge = current.0;
    let expected = body.lock_version;
    let outcome = with_txn(&app_state, |txn| {
        Box::pin(async move { Ok(MissionService::new().reject(txn, id, &judge, expected).await?) })
    })
    .await?;
    Ok(HttpResponse::Ok().json(MissionOutcomeView::from(outcome)))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::get().to(list_open))
        .route("", web::post().to(create))
        .route("/completed", web::get().to(list_completed))
        .route("/{mission_id}/proof", web::post().to(submit_proof))
        .route("/{mission_id}/approve", web::post().to(approve))
        .route("/{mission_id}/reject", web::post().to(reject));
}
