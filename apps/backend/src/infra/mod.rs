//! Infrastructure layer: database bootstrap, state assembly, DB error mapping
//! and the idle-session sweeper.

pub mod db;
pub mod db_errors;
pub mod state;
pub mod sweeper;
