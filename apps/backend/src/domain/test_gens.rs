// Proptest generators for turn-protocol inputs.

use proptest::prelude::*;

use crate::domain::{ProfileId, TurnAction, Verdict};

pub const PLAYER_A: ProfileId = 11;
pub const PLAYER_B: ProfileId = 22;
pub const OUTSIDER: ProfileId = 33;

/// Any of the two seats or an outsider.
pub fn actor() -> impl Strategy<Value = ProfileId> {
    prop_oneof![
        4 => Just(PLAYER_A),
        4 => Just(PLAYER_B),
        1 => Just(OUTSIDER),
    ]
}

/// Free text that is sometimes blank.
pub fn text() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => "[a-zA-Z][a-zA-Z ]{0,15}",
        1 => " {0,3}",
    ]
}

pub fn verdict() -> impl Strategy<Value = Verdict> {
    prop_oneof![Just(Verdict::Correct), Just(Verdict::Incorrect)]
}

pub fn action() -> impl Strategy<Value = TurnAction> {
    prop_oneof![
        (text(), text()).prop_map(|(secret_phrase, clue)| TurnAction::Generate {
            secret_phrase,
            clue
        }),
        text().prop_map(|guess| TurnAction::Guess { guess }),
        Just(TurnAction::GiveUp),
        verdict().prop_map(|verdict| TurnAction::Review { verdict }),
    ]
}

/// A sequence of attempted moves, most of them illegal.
pub fn script(max_len: usize) -> impl Strategy<Value = Vec<(ProfileId, TurnAction)>> {
    prop::collection::vec((actor(), action()), 1..max_len)
}
