//! The play-resolution engine.
//!
//! Composed leaves-first: geometry and constants at the bottom, then the
//! ball flight models, the contact and plate samplers, the autonomous
//! fielder agents with their two-phase decisions, the tick loop, and the
//! runner/stat resolution on top. `at_bat` ties the pipeline together.

pub mod agent;
pub mod at_bat;
pub mod baserunning;
pub mod catching;
pub mod contact;
pub mod decision;
pub mod diagnostics;
pub mod field;
pub mod outcome;
pub mod physics_constants;
pub mod plate;
pub mod stats;
pub mod tick;
pub mod trajectory;

#[cfg(test)]
mod scenario_tests;

pub use at_bat::{
    simulate_at_bat, simulate_at_bat_seeded, simulate_batted_ball, AtBatRequest, Defender,
};
pub use diagnostics::{
    calc_ball_landing, evaluate_fielders, resolve_hit_type_from_landing, FielderEvaluation,
    LandingReport,
};
pub use field::Vec2;
pub use outcome::{AtBatOutcome, AtBatResult, StealEvent};
pub use stats::FieldingCredits;
pub use trajectory::{classify_batted_ball_type, BallTrajectory, BattedBall, BattedBallType};
