//! DTOs for profiles_sea adapter.

use crate::entities::profiles::FamilyRole;

/// DTO for the first-login profile insert.
#[derive(Debug, Clone)]
pub struct ProfileCreate {
    pub user_key: String,
    pub display_name: String,
    pub role: FamilyRole,
    pub avatar_url: Option<String>,
}

impl ProfileCreate {
    pub fn new(
        user_key: impl Into<String>,
        display_name: impl Into<String>,
        role: FamilyRole,
    ) -> Self {
        Self {
            user_key: user_key.into(),
            display_name: display_name.into(),
            role,
            avatar_url: None,
        }
    }

    pub fn with_avatar(mut self, url: impl Into<String>) -> Self {
        self.avatar_url = Some(url.into());
        self
    }
}
