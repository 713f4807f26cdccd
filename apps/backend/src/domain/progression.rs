/// XP needed per level step.
pub const LEVEL_XP_STEP: i64 = 500;

/// Default XP credited to a guesser whose guess was judged correct.
pub const CORRECT_GUESS_REWARD_XP: i64 = 50;

/// Level for a running XP total; level 1 starts at zero XP.
pub fn level_for_xp(xp: i64) -> i32 {
    if xp <= 0 {
        return 1;
    }
    let level = xp / LEVEL_XP_STEP + 1;
    i32::try_from(level).unwrap_or(i32::MAX)
}
