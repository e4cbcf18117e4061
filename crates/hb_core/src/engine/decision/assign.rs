//! Phase 2: turn the complete set of phase-1 scores into concrete duties.
//!
//! Every agent reads the full phase-1 table (already computed for all nine)
//! and writes only to itself, so the outcome is independent of iteration
//! order. Call-offs fall out of the concurrency cap: the loudest claims keep
//! the ball, everyone else converts to cover, relay, backup or hold.

use super::types::*;
use crate::engine::agent::{FielderAction, FielderAgent, FielderState};
use crate::engine::field::{base_position, Vec2};
use crate::models::{Base, FieldPosition};

/// Resolve final duties for all nine agents from their phase-1 plans.
pub fn resolve_duties(
    agents: &mut [FielderAgent; 9],
    plans: &[PursuitPlan; 9],
    ctx: &DecisionContext,
) {
    let cap = ctx.pursuit_cap();

    for idx in 0..9 {
        if !agents[idx].state.can_redecide() {
            continue;
        }

        let assignment = best_duty_for(idx, agents, plans, ctx, cap);
        apply_assignment(&mut agents[idx], &plans[idx], &assignment);
    }
}

/// Pick the best duty for one agent given everyone's phase-1 scores.
pub fn best_duty_for(
    idx: usize,
    agents: &[FielderAgent; 9],
    plans: &[PursuitPlan; 9],
    ctx: &DecisionContext,
    cap: usize,
) -> Assignment {
    let agent = &agents[idx];
    let plan = &plans[idx];

    // Call-off: yield when `cap` teammates hold strictly louder claims.
    let outscored = plans
        .iter()
        .enumerate()
        .filter(|(other, p)| *other != idx && p.is_feasible() && p.score > plan.score)
        .count();
    let pursuit_score = if plan.is_feasible() && outscored < cap { plan.score } else { -1.0 };

    let mut best = Assignment {
        duty: Duty::Pursue,
        target: plan.target,
        score: pursuit_score,
    };

    // Non-pursuit duties; ties lose to pursuit via strict comparison.
    for candidate in [
        cover_candidates(agent, ctx),
        relay_candidate(idx, agents, plans, ctx),
        backup_candidate(idx, agents, plans, ctx),
        Some(Assignment { duty: Duty::Hold, target: agent.home_pos, score: HOLD_SCORE }),
    ]
    .into_iter()
    .flatten()
    {
        if candidate.score > best.score {
            best = candidate;
        }
    }

    best
}

/// Write the chosen duty back onto the agent.
fn apply_assignment(agent: &mut FielderAgent, plan: &PursuitPlan, assignment: &Assignment) {
    agent.pursuit_score = plan.score;
    agent.estimated_arrival = plan.arrival;
    agent.calling_intensity = assignment.score.clamp(0.0, 1.0);

    // Agents still reading the ball creep toward their first instinct; the
    // duty takes over once the reaction clock expires.
    if agent.state == FielderState::Reacting && agent.reaction_remaining > 0.0 {
        return;
    }

    agent.target_pos = assignment.target;
    match assignment.duty {
        Duty::Pursue if assignment.score > -1.0 => {
            agent.has_yielded = false;
            agent.state = FielderState::Pursuing;
            agent.action = pursuit_flavor(agent, assignment.target);
        }
        Duty::Cover(base) => {
            agent.state = FielderState::Covering;
            agent.action = FielderAction::CoverBase(base);
        }
        Duty::Relay => {
            agent.state = FielderState::Covering;
            agent.action = FielderAction::Relay;
        }
        Duty::Backup => {
            agent.state = FielderState::BackingUp;
            agent.action = FielderAction::Backup;
        }
        _ => {
            if plan.is_feasible() && assignment.duty != Duty::Pursue {
                agent.has_yielded = true;
            }
            agent.state = FielderState::Holding;
            agent.action = FielderAction::Hold;
            agent.target_pos = agent.home_pos;
        }
    }
}

/// Charge / retreat / lateral flavor from the approach geometry.
fn pursuit_flavor(agent: &FielderAgent, target: Vec2) -> FielderAction {
    let inward = target.length() - agent.current_pos.length();
    if inward < -2.0 {
        FielderAction::Charge
    } else if inward > 2.0 {
        FielderAction::Retreat
    } else {
        FielderAction::Lateral
    }
}

// ============================================================================
// Cover
// ============================================================================

/// Which bases a position is drilled to cover, with a duty weight.
fn cover_responsibility(pos: FieldPosition, base: Base) -> f32 {
    match (pos, base) {
        (FieldPosition::First, Base::First) => 1.0,
        (FieldPosition::Second, Base::First) => 0.4,
        (FieldPosition::Second, Base::Second) => 0.9,
        (FieldPosition::Short, Base::Second) => 0.9,
        (FieldPosition::Short, Base::Third) => 0.4,
        (FieldPosition::Third, Base::Third) => 1.0,
        (FieldPosition::Catcher, Base::Home) => 1.0,
        (FieldPosition::Pitcher, Base::First) => 0.3,
        (FieldPosition::Pitcher, Base::Home) => 0.3,
        _ => 0.0,
    }
}

fn cover_candidates(agent: &FielderAgent, ctx: &DecisionContext) -> Option<Assignment> {
    let damping = ctx.cover_damping();
    let mut best: Option<Assignment> = None;
    for base in [Base::First, Base::Second, Base::Third, Base::Home] {
        let resp = cover_responsibility(agent.pos, base);
        if resp <= 0.0 {
            continue;
        }
        let target = base_position(base);
        let closeness = 1.0 - (agent.current_pos.distance_to(target) / COVER_NORM_M).clamp(0.0, 1.0);
        let score = resp * damping * (0.4 + 0.6 * closeness);
        if best.map_or(true, |b| score > b.score) {
            best = Some(Assignment { duty: Duty::Cover(base), target, score });
        }
    }
    best
}

// ============================================================================
// Relay
// ============================================================================

fn relay_candidate(
    idx: usize,
    agents: &[FielderAgent; 9],
    plans: &[PursuitPlan; 9],
    ctx: &DecisionContext,
) -> Option<Assignment> {
    if ctx.is_low_ball() || ctx.traj.landing_distance < RELAY_MIN_LANDING_M {
        return None;
    }
    let agent = &agents[idx];
    if !agent.pos.is_infield() {
        return None;
    }
    // The cutoff man must actually be free of the ball.
    if plans[idx].is_feasible() {
        return None;
    }
    let cutoff = ctx
        .traj
        .path_unit()
        .scaled(ctx.traj.landing_distance * RELAY_CUTOFF_FRACTION);

    // Exactly one cutoff man: the free infielder aligned closest, scorecard
    // order breaking dead heats. Static data only, so every agent computes
    // the same winner.
    let my_key = relay_key(agent, cutoff);
    for (other_idx, other) in agents.iter().enumerate() {
        if other_idx == idx || !other.pos.is_infield() || plans[other_idx].is_feasible() {
            continue;
        }
        if relay_key(other, cutoff) < my_key {
            return None;
        }
    }

    let proximity = 1.0 - (agent.home_pos.distance_to(cutoff) / PROXIMITY_NORM_M).clamp(0.0, 1.0);
    Some(Assignment {
        duty: Duty::Relay,
        target: cutoff,
        score: RELAY_SCORE_FACTOR * proximity,
    })
}

/// Relay claim strength: distance first, scorecard number as tiebreak.
fn relay_key(agent: &FielderAgent, cutoff: Vec2) -> (i64, u8) {
    // Millimeter-quantized so float dust cannot flip the ordering.
    ((agent.home_pos.distance_to(cutoff) * 1000.0) as i64, agent.pos.scorecard())
}

// ============================================================================
// Backup
// ============================================================================

fn backup_candidate(
    idx: usize,
    agents: &[FielderAgent; 9],
    plans: &[PursuitPlan; 9],
    ctx: &DecisionContext,
) -> Option<Assignment> {
    // Find the loudest feasible pursuer other than us.
    let (_, lead_plan) = plans
        .iter()
        .enumerate()
        .filter(|(other, p)| *other != idx && p.is_feasible())
        .max_by(|a, b| a.1.score.partial_cmp(&b.1.score).unwrap_or(std::cmp::Ordering::Equal))?;

    let target = lead_plan
        .target
        .plus(ctx.traj.path_unit().scaled(BACKUP_DEPTH_M));
    let agent = &agents[idx];
    let closeness = 1.0 - (agent.current_pos.distance_to(target) / BACKUP_NORM_M).clamp(0.0, 1.0);
    Some(Assignment { duty: Duty::Backup, target, score: BACKUP_BASE_SCORE * closeness })
}
