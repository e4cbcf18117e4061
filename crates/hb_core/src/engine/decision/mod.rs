//! Autonomous fielding decisions, two phases per tick.
//!
//! Phase 1 scores every agent's own pursuit in isolation; phase 2 reads the
//! complete score table and converts it into duties under the concurrency
//! cap. Splitting the write (phase 1) from the read (phase 2) breaks the
//! agent-reads-agent cycle without any message passing, and makes the result
//! independent of iteration order in both passes.

pub mod assign;
pub mod scorer;
pub mod types;

pub use assign::{best_duty_for, resolve_duties};
pub use scorer::score_pursuit;
pub use types::{
    Assignment, DecisionContext, Duty, PathIntercept, PursuitMode, PursuitPlan,
};

use crate::engine::agent::FielderAgent;

/// Run both phases for the full defense. Returns the phase-1 table for
/// diagnostics and the tick loop's trigger checks.
pub fn decide_all(agents: &mut [FielderAgent; 9], ctx: &DecisionContext) -> [PursuitPlan; 9] {
    // Phase 1: order-independent by construction (own state + trajectory).
    let plans: [PursuitPlan; 9] = std::array::from_fn(|i| score_pursuit(&agents[i], ctx));
    // Phase 2: all scores are on the table before anyone commits.
    resolve_duties(agents, &plans, ctx);
    plans
}
