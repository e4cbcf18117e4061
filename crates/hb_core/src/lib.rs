//! # hb_core - Deterministic Baseball Play-Resolution Engine
//!
//! Given a batter, a pitcher, nine fielders and the game situation, this
//! library resolves one at-bat: pre-contact confrontation, batted-ball
//! physics, an autonomous nine-agent defense, runner time races, and
//! putout/assist/error attribution.
//!
//! ## Features
//! - 100% deterministic: same inputs + same generator state = same outcome
//! - No shared mutable state; at-bats are embarrassingly parallel
//! - Always returns a well-formed outcome (malformed inputs are patched
//!   with neutral substitutes and flagged for audit)

// Game engine APIs often require many parameters for physics, state, etc.
#![allow(clippy::too_many_arguments)]
// Struct initialization pattern used intentionally
#![allow(clippy::field_reassign_with_default)]

pub mod engine;
pub mod error;
pub mod models;

// Re-export the main API surface.
pub use engine::{
    calc_ball_landing, classify_batted_ball_type, evaluate_fielders,
    resolve_hit_type_from_landing, simulate_at_bat, simulate_at_bat_seeded, simulate_batted_ball,
    AtBatOutcome, AtBatRequest, AtBatResult,
    BallTrajectory, BattedBall, BattedBallType, Defender, FielderEvaluation, FieldingCredits,
    LandingReport, StealEvent, Vec2,
};
pub use error::{EngineError, Result};
pub use models::{
    Base, BaseState, BattingAttributes, FieldPosition, GameContext, Handedness, LineupPlan, Pitch,
    PitchKind, PitchingAttributes, Player, Runner, Team,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
