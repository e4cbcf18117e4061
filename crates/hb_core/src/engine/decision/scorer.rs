//! Phase 1: each agent scores its own chance at the ball.
//!
//! Everything here reads one agent's state plus the immutable trajectory, so
//! the results cannot depend on the order agents are processed in.

use super::types::*;
use crate::engine::agent::FielderAgent;
use crate::engine::physics_constants::{flight, timing};

/// Score one agent's pursuit of the ball.
pub fn score_pursuit(agent: &FielderAgent, ctx: &DecisionContext) -> PursuitPlan {
    if ctx.traj.is_ground_ball {
        score_ground_pursuit(agent, ctx)
    } else {
        score_air_pursuit(agent, ctx)
    }
}

// ============================================================================
// Ground balls
// ============================================================================

fn score_ground_pursuit(agent: &FielderAgent, ctx: &DecisionContext) -> PursuitPlan {
    let traj = ctx.traj;
    let stop_time = traj.flight_time;
    let reach = agent.catch_reach();

    // Earliest point on the path the glove can meet the ball.
    let mut t = ctx.now.max(INTERCEPT_SCAN_DT_S);
    while t <= stop_time {
        let point = traj.position_at(t);
        let gap = (agent.current_pos.distance_to(point) - reach).max(0.0);
        let eta = agent.eta_to(gap);
        if ctx.now + eta <= t {
            // Spare reach once the travel budget is spent.
            let budget = t - ctx.now - agent.reaction_remaining.max(0.0);
            let margin_m = agent.reachable_distance(budget.max(0.0)) + reach
                - agent.current_pos.distance_to(point);
            let margin_factor = 0.5 + 0.5 * (margin_m / GROUND_MARGIN_NORM_M).clamp(0.0, 1.0);
            let intercept = PathIntercept {
                point,
                ball_time: t,
                ball_speed: traj.speed_at(t),
            };
            return plan_with_score(
                agent,
                point,
                t,
                margin_factor,
                PursuitMode::PathIntercept,
                Some(intercept),
            );
        }
        t += INTERCEPT_SCAN_DT_S;
    }

    // No live intercept: meet it where it dies, or run it down after.
    let stop_pos = traj.landing_pos;
    let gap = (agent.current_pos.distance_to(stop_pos) - reach).max(0.0);
    let eta = agent.eta_to(gap);
    let arrival = ctx.now + eta;

    if arrival <= stop_time {
        // Waiting on the ball is a full-margin play.
        return plan_with_score(agent, stop_pos, stop_time, 1.0, PursuitMode::StopPoint, None);
    }
    if arrival <= stop_time + timing::CHASE_GRACE_S {
        let spare = (stop_time + timing::CHASE_GRACE_S - arrival) / timing::CHASE_GRACE_S;
        return plan_with_score(agent, stop_pos, arrival, spare.clamp(0.0, 1.0), PursuitMode::ChaseDown, None);
    }

    PursuitPlan::unreachable(stop_pos)
}

// ============================================================================
// Air balls
// ============================================================================

fn score_air_pursuit(agent: &FielderAgent, ctx: &DecisionContext) -> PursuitPlan {
    let traj = ctx.traj;
    if ctx.now >= traj.flight_time {
        // Down and uncaught: the chase is for the bouncing ball now.
        return score_loose_ball(agent, ctx);
    }

    let target = agent.perceived.landing;
    let remaining = traj.flight_time - ctx.now + timing::AIR_GRACE_S;
    if remaining <= 0.0 {
        return PursuitPlan::unreachable(target);
    }

    let reach = agent.catch_reach();
    let gap = (agent.current_pos.distance_to(target) - reach).max(0.0);
    let eta = agent.eta_to(gap);
    if eta > remaining {
        return PursuitPlan::unreachable(target);
    }

    let margin_factor = ((remaining - eta) / remaining).clamp(0.0, 1.0);
    plan_with_score(
        agent,
        target,
        ctx.now + eta,
        margin_factor,
        PursuitMode::AirCatch,
        None,
    )
}

/// An uncaught air ball on the grass: run to where it dies.
fn score_loose_ball(agent: &FielderAgent, ctx: &DecisionContext) -> PursuitPlan {
    let traj = ctx.traj;
    let target = traj.rest_pos();
    let gap = (agent.current_pos.distance_to(target) - agent.catch_reach()).max(0.0);
    let arrival = ctx.now + agent.eta_to(gap);

    let window = flight::LANDING_ROLL_TIME_S + timing::CHASE_GRACE_S;
    let deadline = traj.flight_time + window;
    if arrival > deadline {
        return PursuitPlan::unreachable(target);
    }
    let spare = ((deadline - arrival) / window).clamp(0.0, 1.0);
    plan_with_score(agent, target, arrival, spare, PursuitMode::ChaseDown, None)
}

// ============================================================================
// Shared scoring
// ============================================================================

fn plan_with_score(
    agent: &FielderAgent,
    target: crate::engine::field::Vec2,
    arrival: f32,
    margin_factor: f32,
    mode: PursuitMode,
    intercept: Option<PathIntercept>,
) -> PursuitPlan {
    let proximity = 1.0 - (agent.home_pos.distance_to(target) / PROXIMITY_NORM_M).clamp(0.0, 1.0);
    let mobility = 1.0 - (agent.current_pos.distance_to(target) / PROXIMITY_NORM_M).clamp(0.0, 1.0);
    let blended = PROXIMITY_WEIGHT * proximity + MOBILITY_WEIGHT * mobility + MARGIN_WEIGHT * margin_factor;
    // Normalize the weighted blend back onto [0, 1]; -1 stays the
    // unreachable sentinel.
    let score = blended / (PROXIMITY_WEIGHT + MOBILITY_WEIGHT + MARGIN_WEIGHT);
    PursuitPlan { score: score.clamp(-1.0, 1.0), target, arrival, mode: Some(mode), intercept }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::field::{standard_position, Vec2};
    use crate::engine::trajectory::{BallTrajectory, BattedBall};
    use crate::models::{DefenseSkill, FieldPosition};

    fn agent_at(pos: FieldPosition) -> FielderAgent {
        let mut a = FielderAgent::new(pos, "t", DefenseSkill::default(), standard_position(pos));
        a.perceived.landing = Vec2::ZERO;
        a
    }

    fn ctx<'a>(traj: &'a BallTrajectory) -> DecisionContext<'a> {
        DecisionContext {
            traj,
            now: 0.0,
            outs: 0,
            runner_on_first: false,
            runner_on_second: false,
            runner_on_third: false,
        }
    }

    #[test]
    fn test_shortstop_intercepts_ball_up_his_alley() {
        let traj = BallTrajectory::from_batted_ball(&BattedBall::new(30.0, 2.0, 135.0));
        let mut ss = agent_at(FieldPosition::Short);
        ss.perceived.landing = traj.landing_pos;
        let plan = score_pursuit(&ss, &ctx(&traj));
        assert!(plan.is_feasible());
        assert_eq!(plan.mode, Some(PursuitMode::PathIntercept));
        assert!(plan.score > 0.4, "score {}", plan.score);
        let icpt = plan.intercept.unwrap();
        assert!(icpt.ball_time > 0.0 && icpt.ball_time <= traj.flight_time);
    }

    #[test]
    fn test_right_fielder_cannot_reach_left_side_grounder() {
        let traj = BallTrajectory::from_batted_ball(&BattedBall::new(10.0, 2.0, 110.0));
        let mut rf = agent_at(FieldPosition::Right);
        rf.perceived.landing = traj.landing_pos;
        let plan = score_pursuit(&rf, &ctx(&traj));
        // 70+ meters away; at best a late chase-down, never an intercept.
        assert_ne!(plan.mode, Some(PursuitMode::PathIntercept));
    }

    #[test]
    fn test_center_fielder_owns_the_routine_fly() {
        let traj = BallTrajectory::from_batted_ball(&BattedBall::new(45.0, 32.0, 140.0));
        let mut cf = agent_at(FieldPosition::Center);
        cf.perceived.landing = traj.landing_pos;
        let mut lf = agent_at(FieldPosition::Left);
        lf.perceived.landing = traj.landing_pos;

        let cf_plan = score_pursuit(&cf, &ctx(&traj));
        let lf_plan = score_pursuit(&lf, &ctx(&traj));
        assert!(cf_plan.is_feasible());
        assert_eq!(cf_plan.mode, Some(PursuitMode::AirCatch));
        assert!(cf_plan.score > lf_plan.score, "cf {} lf {}", cf_plan.score, lf_plan.score);
    }

    #[test]
    fn test_infielder_cannot_reach_deep_fly() {
        let traj = BallTrajectory::from_batted_ball(&BattedBall::new(45.0, 30.0, 160.0));
        let mut ss = agent_at(FieldPosition::Short);
        ss.perceived.landing = traj.landing_pos;
        let plan = score_pursuit(&ss, &ctx(&traj));
        assert!(!plan.is_feasible(), "SS should not chase a 95m fly: {:?}", plan.mode);
    }

    #[test]
    fn test_score_is_order_free_pure_function() {
        let traj = BallTrajectory::from_batted_ball(&BattedBall::new(40.0, 3.0, 125.0));
        let mut p = agent_at(FieldPosition::Pitcher);
        p.perceived.landing = traj.landing_pos;
        let a = score_pursuit(&p, &ctx(&traj));
        let b = score_pursuit(&p, &ctx(&traj));
        assert_eq!(a, b);
    }

    #[test]
    fn test_scores_bounded() {
        for (dir, angle, ev) in [(5.0, 1.0, 90.0), (45.0, 30.0, 150.0), (85.0, 55.0, 100.0)] {
            let traj = BallTrajectory::from_batted_ball(&BattedBall::new(dir, angle, ev));
            for pos in FieldPosition::ALL {
                let mut agent = agent_at(pos);
                agent.perceived.landing = traj.landing_pos;
                let plan = score_pursuit(&agent, &ctx(&traj));
                assert!((-1.0..=1.0).contains(&plan.score));
            }
        }
    }
}
