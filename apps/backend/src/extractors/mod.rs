pub mod auth_token;
pub mod current_profile;
pub mod if_match;
pub mod jwt;
pub mod session_id;
pub mod validated_json;

pub use auth_token::AuthToken;
pub use current_profile::CurrentProfile;
pub use if_match::IfMatch;
pub use jwt::AuthClaims;
pub use session_id::SessionId;
pub use validated_json::ValidatedJson;
