//! Read-only data model consumed by the engine.
//!
//! Season scheduling, rosters and persistence live outside this crate; the
//! engine only reads these values for the duration of one at-bat.

pub mod player;
pub mod position;
pub mod situation;
pub mod team;

pub use player::{
    BattingAttributes, DefenseSkill, Pitch, PitchKind, PitchingAttributes, Player,
};
pub use position::{Base, FieldPosition, Handedness};
pub use situation::{BaseState, GameContext, Runner};
pub use team::{LineupPlan, Team};
