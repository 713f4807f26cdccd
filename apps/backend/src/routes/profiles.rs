use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::db::txn::with_txn;
use crate::entities::profiles::{self, FamilyRole};
use crate::entities::reward_grants;
use crate::error::AppError;
use crate::extractors::{AuthClaims, CurrentProfile, ValidatedJson};
use crate::repos::{profiles as profiles_repo, rewards};
use crate::services::profiles::ProfileService;
use crate::state::app_state::AppState;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub id: i64,
    pub display_name: String,
    pub role: FamilyRole,
    pub avatar_url: Option<String>,
    pub xp: i64,
    pub level: i32,
    pub streak: i32,
}

impl From<profiles::Model> for ProfileView {
    fn from(m: profiles::Model) -> Self {
        Self {
            id: m.id,
            display_name: m.display_name,
            role: m.role,
            avatar_url: m.avatar_url,
            xp: m.xp,
            level: m.level,
            streak: m.streak,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantView {
    pub event_key: String,
    pub amount: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<reward_grants::Model> for GrantView {
    fn from(m: reward_grants::Model) -> Self {
        Self {
            event_key: m.event_key,
            amount: m.amount,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnsureProfileRequest {
    #[serde(alias = "display_name")]
    pub display_name: String,
    pub role: FamilyRole,
}

/// POST /api/profiles/me
///
/// First login creates the profile; later calls return it unchanged.
/// 201 when created, 200 otherwise.
async fn ensure_me(
    claims: AuthClaims,
    body: ValidatedJson<EnsureProfileRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    // Not in a transaction: a lost insert race must see the winner's commit.
    let (profile, created) = ProfileService::new()
        .ensure_profile(&app_state.db, claims.sub(), &body.display_name, body.role)
        .await?;

    let mut resp = if created {
        HttpResponse::Created()
    } else {
        HttpResponse::Ok()
    };
    Ok(resp.json(ProfileView::from(profile)))
}

async fn get_me(current: CurrentProfile) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(ProfileView::from(current.0)))
}

async fn list(
    _current: CurrentProfile,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let all = profiles_repo::list_profiles(&app_state.db).await?;
    let views: Vec<ProfileView> = all.into_iter().map(ProfileView::from).collect();
    Ok(HttpResponse::Ok().json(views))
}

async fn my_rewards(
    current: CurrentProfile,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let grants = rewards::list_for_profile(&app_state.db, current.id()).await?;
    let views: Vec<GrantView> = grants.into_iter().map(GrantView::from).collect();
    Ok(HttpResponse::Ok().json(views))
}

#[derive(Debug, Serialize)]
struct ResetResponse {
    reset: u64,
}

/// POST /api/profiles/season/reset (parents only)
async fn reset_season(
    current: CurrentProfile,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let actor = current.0;
    let reset = with_txn(&app_state, |txn| {
        Box::pin(async move { Ok(ProfileService::new().reset_season(txn, &actor).await?) })
    })
    .await?;
    Ok(HttpResponse::Ok().json(ResetResponse { reset }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::get().to(list))
        .route("/me", web::post().to(ensure_me))
        .route("/me", web::get().to(get_me))
        .route("/me/rewards", web::get().to(my_rewards))
        .route("/season/reset", web::post().to(reset_season));
}
