use std::time::SystemTime;

use kinquest_backend::entities::profiles::{self, FamilyRole};
use kinquest_backend::mint_access_token;
use kinquest_backend::repos::profiles::{self as profiles_repo, ProfileCreate};
use kinquest_backend::state::app_state::AppState;

/// Insert a profile for `user_key` and return it.
pub async fn create_profile(state: &AppState, user_key: &str, role: FamilyRole) -> profiles::Model {
    let dto = ProfileCreate::new(user_key, user_key.to_uppercase(), role)
        .with_avatar(format!("https://avatars.test/{user_key}.png"));
    profiles_repo::insert_if_absent(&state.db, dto)
        .await
        .expect("insert profile");
    profiles_repo::find_by_user_key(&state.db, user_key)
        .await
        .expect("fetch profile")
        .expect("profile exists")
}

/// `Authorization` header value for `user_key`.
pub fn bearer(state: &AppState, user_key: &str) -> (&'static str, String) {
    let token = mint_access_token(user_key, SystemTime::now(), &state.security).expect("mint");
    ("Authorization", format!("Bearer {token}"))
}

/// Dad and Son, the usual charades pair, plus Mum as a third party.
pub struct Family {
    pub dad: profiles::Model,
    pub son: profiles::Model,
    pub mum: profiles::Model,
}

impl Family {
    pub async fn seed(state: &AppState) -> Self {
        Self {
            dad: create_profile(state, "dad", FamilyRole::Dad).await,
            son: create_profile(state, "son", FamilyRole::Son).await,
            mum: create_profile(state, "mum", FamilyRole::Mum).await,
        }
    }
}
