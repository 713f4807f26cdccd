//! SeaORM adapters. Functions here return `DbErr`; `repos` maps to `DomainError`.

pub mod missions_sea;
pub mod profiles_sea;
pub mod rewards_sea;
pub mod sessions_sea;
