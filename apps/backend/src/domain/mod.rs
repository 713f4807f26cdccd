//! Domain layer: pure session logic, no I/O.

pub mod progression;
pub mod session_state;
pub mod turn;

#[cfg(test)]
mod test_gens;
#[cfg(test)]
mod tests_turn;

pub use session_state::SessionState;
pub use turn::{
    apply, CharadesState, PhaseKind, ProfileId, RewardClaim, RoundPhase, Seats, Transition,
    TurnAction, Verdict,
};
