pub mod game_sessions;
pub mod missions;
pub mod profiles;
pub mod reward_grants;

pub use game_sessions::Entity as GameSessions;
pub use game_sessions::Model as GameSession;
pub use missions::Entity as Missions;
pub use missions::Model as Mission;
pub use profiles::Entity as Profiles;
pub use profiles::Model as Profile;
pub use reward_grants::Entity as RewardGrants;
pub use reward_grants::Model as RewardGrant;
