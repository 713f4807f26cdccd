//! Services bridge pure domain logic with persistence. All return `DomainError`.

pub mod missions;
pub mod profiles;
pub mod sessions;
pub mod settlement;
