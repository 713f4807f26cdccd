//! DTOs for rewards_sea adapter.

#[derive(Debug, Clone)]
pub struct GrantCreate {
    pub event_key: String,
    pub profile_id: i64,
    pub amount: i64,
}
