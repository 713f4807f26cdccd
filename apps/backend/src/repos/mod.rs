//! Repository functions for the service layer; all errors are `DomainError`.

pub mod missions;
pub mod profiles;
pub mod rewards;
pub mod sessions;
