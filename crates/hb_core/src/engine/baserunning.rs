//! Runner resolution: every base awarded or taken away is a time race
//! between the defense's glove-to-glove chain and the runner's legs.

use rand::Rng;

use crate::engine::field::{base_position, Vec2};
use crate::engine::outcome::{AtBatResult, StealEvent};
use crate::engine::physics_constants::{bases, bounce, fence, race, throws};
use crate::engine::stats::FieldingCredits;
use crate::engine::trajectory::BallTrajectory;
use crate::models::{Base, BaseState, DefenseSkill, FieldPosition, Runner};

/// Hard cap on how many bases the batter can take on an uncaught ball.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitCap {
    Single,
    Double,
    Triple,
}

/// One resolved play, ready to be folded into the outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub result: AtBatResult,
    pub credits: FieldingCredits,
    pub new_bases: BaseState,
    pub outs_added: u8,
    pub runs: u32,
    pub rbi: u32,
    pub fielder: Option<FieldPosition>,
}

// ============================================================================
// Time primitives
// ============================================================================

/// Batter out of the box to first on a ground ball.
pub fn batter_time_to_first(speed: u8) -> f32 {
    race::BOX_DELAY_S + bases::BASE_LENGTH_M / race::runner_speed_mps(speed)
}

/// Any runner covering `n` bases after a hit is clearly down.
pub fn runner_time_bases(n: u8, speed: u8) -> f32 {
    race::HIT_JUMP_DELAY_S + n as f32 * bases::BASE_LENGTH_M / race::runner_speed_mps(speed)
}

pub fn secure_time(skill: &DefenseSkill, stopped: bool) -> f32 {
    let miss = 1.0 - skill.fielding as f32 / 100.0;
    if stopped {
        throws::SECURE_STOPPED_BASE_S + throws::SECURE_STOPPED_RANGE_S * miss
    } else {
        throws::SECURE_BASE_S + throws::SECURE_RANGE_S * miss
    }
}

pub fn transfer_time(skill: &DefenseSkill) -> f32 {
    throws::TRANSFER_BASE_S + throws::TRANSFER_RANGE_S * (1.0 - skill.arm as f32 / 100.0)
}

pub fn pickup_time(skill: &DefenseSkill) -> f32 {
    throws::PICKUP_BASE_S + throws::PICKUP_RANGE_S * (1.0 - skill.catching as f32 / 100.0)
}

pub fn throw_time(from: Vec2, to: Vec2, skill: &DefenseSkill) -> f32 {
    from.distance_to(to) / throws::speed_mps(skill.arm)
}

// ============================================================================
// Ground-ball races
// ============================================================================

/// Everything known about the glove work when a grounder was secured.
#[derive(Debug, Clone, Copy)]
pub struct GroundFielding {
    pub fielder: FieldPosition,
    pub skill: DefenseSkill,
    pub at: Vec2,
    pub time: f32,
    /// Ball was dead when gloved (smaller secure, no hot-ball pace).
    pub stopped: bool,
}

/// Resolve a secured ground ball: force plays, the twin killing, or the
/// batter beating it out.
pub fn resolve_ground_ball<R: Rng>(
    fielding: &GroundFielding,
    batter: &Runner,
    bases_state: &BaseState,
    outs: u8,
    rng: &mut R,
) -> Resolution {
    let ready = fielding.time
        + secure_time(&fielding.skill, fielding.stopped)
        + transfer_time(&fielding.skill);
    let batter_time = batter_time_to_first(batter.speed);
    let first_bag = base_position(Base::First);

    // Chase-to-stop outs belong to the infielders; the pitcher running one
    // down concedes the slow roller.
    let can_record_out = fielding.fielder.can_turn_ground_out()
        || (!fielding.stopped && fielding.fielder == FieldPosition::Pitcher);

    // Force at second first when the twin killing is live.
    if can_record_out && outs < 2 {
        if let Some(lead) = bases_state.first.as_ref() {
            let second_bag = base_position(Base::Second);
            let defense_to_second = ready + throw_time(fielding.at, second_bag, &fielding.skill);
            let lead_time = race::FORCE_RUNNER_DELAY_S
                + bases::BASE_LENGTH_M / race::runner_speed_mps(lead.speed);

            if defense_to_second < lead_time {
                return resolve_force_at_second(fielding, batter, bases_state, outs, batter_time, rng);
            }
        }
    }

    // Straight play on the batter.
    let defense_time = ready + throw_time(fielding.at, first_bag, &fielding.skill);
    if can_record_out && defense_time < batter_time {
        let mut new_bases = bases_state.clone();
        let (runs, rbi) = advance_on_out_at_first(&mut new_bases, outs);
        Resolution {
            result: AtBatResult::Groundout,
            credits: FieldingCredits::ground_out(fielding.fielder, FieldPosition::First),
            new_bases,
            outs_added: 1,
            runs,
            rbi,
            fielder: Some(fielding.fielder),
        }
    } else {
        infield_hit(fielding.fielder, batter, bases_state)
    }
}

/// Lead runner forced at second; try to turn two through the pivot.
fn resolve_force_at_second<R: Rng>(
    fielding: &GroundFielding,
    batter: &Runner,
    bases_state: &BaseState,
    outs: u8,
    batter_time: f32,
    rng: &mut R,
) -> Resolution {
    let ready = fielding.time
        + secure_time(&fielding.skill, fielding.stopped)
        + transfer_time(&fielding.skill);
    let second_bag = base_position(Base::Second);
    let first_bag = base_position(Base::First);
    let defense_to_second = ready + throw_time(fielding.at, second_bag, &fielding.skill);

    let pivot = pivot_for(fielding.fielder);
    let pivot_skill = DefenseSkill::default();
    let relay_arrival = defense_to_second
        + race::PIVOT_TRANSFER_S
        + second_bag.distance_to(first_bag) / throws::speed_mps(pivot_skill.arm);

    let slowness = 1.0 - batter.speed as f32 / 100.0;
    let pivot_probability = race::DP_BASE + race::DP_SLOWNESS_BONUS * slowness;
    let turns_two = outs < 2
        && relay_arrival < batter_time
        && rng.gen::<f32>() < pivot_probability;

    let mut new_bases = bases_state.clone();
    new_bases.take(Base::First);

    if turns_two {
        // Trailing runners move up unless the twin killing retires the side.
        let mut runs = 0;
        if outs == 0 {
            if new_bases.take(Base::Third).is_some() {
                runs += 1;
            }
            if let Some(second) = new_bases.take(Base::Second) {
                new_bases.set(Base::Third, Some(second));
            }
        }
        Resolution {
            result: AtBatResult::DoublePlay,
            credits: FieldingCredits::double_play(fielding.fielder, pivot, FieldPosition::First),
            new_bases,
            outs_added: 2,
            runs,
            // No RBI on a double play, even when a run crosses.
            rbi: 0,
            fielder: Some(fielding.fielder),
        }
    } else {
        // Pivot not in time: out at second, batter aboard. Only a
        // loaded-bases force chain brings the run home; lead-first ordering
        // keeps third clear before second moves up.
        let mut runs = 0;
        let mut rbi = 0;
        if bases_state.is_loaded() && outs + 1 < 3 {
            new_bases.take(Base::Third);
            runs += 1;
            rbi += 1;
        }
        if new_bases.third.is_none() {
            if let Some(second) = new_bases.take(Base::Second) {
                new_bases.set(Base::Third, Some(second));
            }
        }
        new_bases.set(Base::First, Some(batter.clone()));
        Resolution {
            result: AtBatResult::FieldersChoice,
            credits: FieldingCredits {
                putouts: vec![pivot],
                assists: vec![fielding.fielder],
                errors: Vec::new(),
            },
            new_bases,
            outs_added: 1,
            runs,
            rbi,
            fielder: Some(fielding.fielder),
        }
    }
}

/// The batter beats it out (or the fielder had no play to make).
pub fn infield_hit(fielder: FieldPosition, batter: &Runner, bases_state: &BaseState) -> Resolution {
    let mut new_bases = bases_state.clone();
    let mut runs = 0;
    let mut rbi = 0;
    // Forced runners move station to station; nobody else risks it.
    if bases_state.is_loaded() && new_bases.take(Base::Third).is_some() {
        runs += 1;
        rbi += 1;
    }
    if new_bases.first.is_some() && new_bases.second.is_some() {
        let second = new_bases.take(Base::Second);
        new_bases.set(Base::Third, second);
    }
    if new_bases.first.is_some() {
        let first = new_bases.take(Base::First);
        new_bases.set(Base::Second, first);
    }
    new_bases.set(Base::First, Some(batter.clone()));
    Resolution {
        result: AtBatResult::InfieldHit,
        credits: FieldingCredits::none(),
        new_bases,
        outs_added: 0,
        runs,
        rbi,
        fielder: Some(fielder),
    }
}

/// On an out at first the force chain moves up behind the play.
fn advance_on_out_at_first(bases_state: &mut BaseState, outs: u8) -> (u32, u32) {
    let mut runs = 0;
    let mut rbi = 0;
    if outs + 1 < 3 {
        if bases_state.is_loaded() {
            bases_state.take(Base::Third);
            runs += 1;
            rbi += 1;
        }
        if bases_state.first.is_some() && bases_state.second.is_some() {
            let second = bases_state.take(Base::Second);
            bases_state.set(Base::Third, second);
        }
        if bases_state.first.is_some() {
            let first = bases_state.take(Base::First);
            bases_state.set(Base::Second, first);
        }
    }
    (runs, rbi)
}

/// Who pivots at second for a fielder on the other side of the bag.
fn pivot_for(fielder: FieldPosition) -> FieldPosition {
    match fielder {
        FieldPosition::Second | FieldPosition::First => FieldPosition::Short,
        _ => FieldPosition::Second,
    }
}

// ============================================================================
// Air outs and tag-ups
// ============================================================================

/// Resolve a caught ball: the out, plus any tag-up traffic behind it.
pub fn resolve_air_out(
    fielder: FieldPosition,
    skill: &DefenseSkill,
    catch_pos: Vec2,
    traj: &BallTrajectory,
    bases_state: &BaseState,
    outs: u8,
) -> Resolution {
    let result = match traj.ball_type {
        crate::engine::trajectory::BattedBallType::LineDrive => AtBatResult::Lineout,
        crate::engine::trajectory::BattedBallType::Popup => AtBatResult::Popout,
        _ => AtBatResult::Flyout,
    };

    let mut new_bases = bases_state.clone();
    let credits = FieldingCredits::air_out(fielder);
    let mut runs = 0;
    let mut rbi = 0;
    let mut sacrifice = false;

    if outs + 1 < 3 {
        let throw_ready = transfer_time(skill);

        // Runner on third tags when the race math says go.
        if let Some(third) = bases_state.third.as_ref() {
            let runner_home = race::TAG_UP_JUMP_S
                + bases::BASE_LENGTH_M / race::runner_speed_mps(third.speed);
            let defense_home = throw_ready
                + throw_time(catch_pos, base_position(Base::Home), skill)
                + race::PLATE_RELAY_ALLOWANCE_S;
            if runner_home + race::TAG_UP_MARGIN_S < defense_home {
                new_bases.take(Base::Third);
                runs += 1;
                rbi += 1;
                sacrifice = true;
            }
        }

        // Runner on second moves up on a deep enough ball.
        if new_bases.second.is_some() && new_bases.third.is_none() {
            if let Some(second) = bases_state.second.as_ref() {
                let runner_third = race::TAG_UP_JUMP_S
                    + bases::BASE_LENGTH_M / race::runner_speed_mps(second.speed);
                let defense_third = throw_ready
                    + throw_time(catch_pos, base_position(Base::Third), skill)
                    + race::TAG_RECEIVE_S;
                if runner_third + race::TAG_UP_MARGIN_S < defense_third {
                    let r = new_bases.take(Base::Second);
                    new_bases.set(Base::Third, r);
                }
            }
        }
    }

    Resolution {
        result: if sacrifice { AtBatResult::SacrificeFly } else { result },
        credits,
        new_bases,
        outs_added: 1,
        runs,
        rbi,
        fielder: Some(fielder),
    }
}

// ============================================================================
// Uncaught balls: hit advancement
// ============================================================================

/// The retriever's situation when the ball is finally in hand.
#[derive(Debug, Clone, Copy)]
pub struct Retrieval {
    pub fielder: FieldPosition,
    pub skill: DefenseSkill,
    pub at: Vec2,
    /// Seconds from contact when the glove reached the ball.
    pub time: f32,
}

/// Resolve an uncaught ball into a hit with full runner traffic.
pub fn resolve_hit_advancement(
    retrieval: &Retrieval,
    traj: &BallTrajectory,
    batter: &Runner,
    bases_state: &BaseState,
    cap: HitCap,
) -> Resolution {
    let ready = retrieval.time + pickup_time(&retrieval.skill) + gather_surcharge(traj);

    let defense_to = |base: Base| -> f32 {
        let allowance = if base == Base::Home {
            race::PLATE_RELAY_ALLOWANCE_S
        } else {
            race::TAG_RECEIVE_S
        };
        ready + throw_time(retrieval.at, base_position(base), &retrieval.skill) + allowance
    };

    // Batter's ladder, gated by the landing caps.
    let effective_cap = if traj.landing_distance < race::SHORT_LANDING_SINGLE_CAP_M {
        HitCap::Single
    } else {
        cap
    };
    let mut batter_bases = 1u8;
    if !matches!(effective_cap, HitCap::Single)
        && runner_time_bases(2, batter.speed) < defense_to(Base::Second) - race::DOUBLE_MARGIN_S
    {
        batter_bases = 2;
        if matches!(effective_cap, HitCap::Triple)
            && runner_time_bases(3, batter.speed) < defense_to(Base::Third) - race::TRIPLE_MARGIN_S
        {
            batter_bases = 3;
        }
    }

    let mut new_bases = BaseState::empty();
    let mut runs = 0;

    // Existing runners: station-to-station plus one gamble when the clock
    // allows, lead runner first.
    for from in [Base::Third, Base::Second, Base::First] {
        let Some(runner) = bases_state.runner_on(from) else { continue };
        let mut gained = batter_bases;
        let natural = target_base(from, gained);

        if let Some(next) = natural.and_then(|b| b.next()) {
            // One extra-base gamble, never into a teammate's back.
            let lane_open = next == Base::Home || new_bases.runner_on(next).is_none();
            let runner_time = runner_time_bases(gained + 1, runner.speed);
            if lane_open && runner_time < defense_to(next) - race::DOUBLE_MARGIN_S {
                gained += 1;
            }
        }

        match target_base(from, gained) {
            None => runs += 1,
            Some(base) => new_bases.set(base, Some(runner.clone())),
        }
    }

    // Batter takes his bag last; he can never pass a runner.
    let batter_base = match batter_bases {
        1 => Base::First,
        2 => Base::Second,
        _ => Base::Third,
    };
    let result = match batter_bases {
        1 => AtBatResult::Single,
        2 => AtBatResult::Double,
        _ => AtBatResult::Triple,
    };
    new_bases.set(batter_base, Some(batter.clone()));

    Resolution {
        result,
        credits: FieldingCredits::none(),
        new_bases,
        outs_added: 0,
        runs,
        rbi: runs,
        fielder: Some(retrieval.fielder),
    }
}

/// Where a runner ends up after gaining `n` bases; `None` means home.
fn target_base(from: Base, n: u8) -> Option<Base> {
    let mut base = from;
    for _ in 0..n {
        match base.next() {
            Some(next) => base = next,
            None => return None,
        }
    }
    if base == Base::Home {
        None
    } else {
        Some(base)
    }
}

/// Bounce-and-gather surcharge by landing zone; balls dying at the track
/// cost the most.
fn gather_surcharge(traj: &BallTrajectory) -> f32 {
    if traj.is_ground_ball {
        return bounce::NEAR_S;
    }
    let fence_d = fence::distance_m(traj.direction_deg.clamp(0.0, 90.0));
    if traj.landing_distance >= fence_d * bounce::FENCE_ZONE_FRACTION {
        bounce::FENCE_S
    } else if traj.landing_distance >= bounce::DEEP_ZONE_M {
        bounce::DEEP_S
    } else {
        bounce::NEAR_S
    }
}

// ============================================================================
// Errors and free passes
// ============================================================================

/// A catchable ball put on the grass: batter aboard, everyone moves up one.
pub fn resolve_error(
    fielder: FieldPosition,
    batter: &Runner,
    bases_state: &BaseState,
) -> Resolution {
    let mut new_bases = BaseState::empty();
    let mut runs = 0;
    for from in [Base::Third, Base::Second, Base::First] {
        let Some(runner) = bases_state.runner_on(from) else { continue };
        match from.next() {
            Some(Base::Home) | None => runs += 1,
            Some(base) => new_bases.set(base, Some(runner.clone())),
        }
    }
    new_bases.set(Base::First, Some(batter.clone()));
    Resolution {
        result: AtBatResult::Error,
        credits: FieldingCredits::error_on(fielder),
        new_bases,
        outs_added: 0,
        runs,
        // Unearned, and uncredited: no RBI through an error.
        rbi: 0,
        fielder: Some(fielder),
    }
}

/// Walk or hit-by-pitch: forced runners only.
pub fn resolve_free_pass(
    result: AtBatResult,
    batter: &Runner,
    bases_state: &BaseState,
) -> Resolution {
    let mut new_bases = bases_state.clone();
    let mut runs = 0;
    let mut rbi = 0;
    if bases_state.is_loaded() {
        new_bases.take(Base::Third);
        runs += 1;
        rbi += 1;
    }
    if new_bases.first.is_some() && new_bases.second.is_some() {
        let second = new_bases.take(Base::Second);
        new_bases.set(Base::Third, second);
    }
    if new_bases.first.is_some() {
        let first = new_bases.take(Base::First);
        new_bases.set(Base::Second, first);
    }
    new_bases.set(Base::First, Some(batter.clone()));
    Resolution {
        result,
        credits: FieldingCredits::none(),
        new_bases,
        outs_added: 0,
        runs,
        rbi,
        fielder: None,
    }
}

/// Ball over the fence: everybody jogs.
pub fn resolve_home_run(batter: &Runner, bases_state: &BaseState) -> Resolution {
    let runs = bases_state.count() as u32 + 1;
    Resolution {
        result: AtBatResult::Homerun,
        credits: FieldingCredits::none(),
        new_bases: BaseState::empty(),
        outs_added: 0,
        runs,
        rbi: runs,
        fielder: None,
    }
}

// ============================================================================
// Pre-at-bat stolen bases
// ============================================================================

/// Attempt rate and success model for the running game.
const STEAL_ATTEMPT_BASE: f32 = 0.03;
const STEAL_ATTEMPT_SPEED_RANGE: f32 = 0.12;
const STEAL_THIRD_FACTOR: f32 = 0.35;
const STEAL_SUCCESS_BASE: f32 = 0.72;
const STEAL_SUCCESS_SPEED_RANGE: f32 = 0.5;
const STEAL_SUCCESS_ARM_RANGE: f32 = 0.4;

/// Resolved pre-pitch steal, when one happens.
#[derive(Debug, Clone, PartialEq)]
pub struct StealResolution {
    pub event: StealEvent,
    pub new_bases: BaseState,
    pub outs_added: u8,
    pub credits: FieldingCredits,
}

/// Maybe send a runner before the at-bat. Attempts only happen with fewer
/// than two outs so a caught runner never silently ends the frame mid-plate
/// appearance.
pub fn attempt_steal<R: Rng>(
    bases_state: &BaseState,
    outs: u8,
    catcher_arm: u8,
    rng: &mut R,
) -> Option<StealResolution> {
    if outs >= 2 {
        return None;
    }

    let (from, to, factor) = if bases_state.second.is_some() && bases_state.third.is_none() {
        (Base::Second, Base::Third, STEAL_THIRD_FACTOR)
    } else if bases_state.first.is_some() && bases_state.second.is_none() {
        (Base::First, Base::Second, 1.0)
    } else {
        return None;
    };

    let runner_speed01 = bases_state.runner_on(from)?.speed as f32 / 100.0;
    let attempt = (STEAL_ATTEMPT_BASE
        + STEAL_ATTEMPT_SPEED_RANGE * ((runner_speed01 - 0.4) / 0.6).clamp(0.0, 1.0))
        * factor;
    if rng.gen::<f32>() >= attempt {
        return None;
    }

    let arm01 = catcher_arm as f32 / 100.0;
    let success_p = (STEAL_SUCCESS_BASE
        + STEAL_SUCCESS_SPEED_RANGE * (runner_speed01 - 0.5)
        - STEAL_SUCCESS_ARM_RANGE * (arm01 - 0.5))
        .clamp(0.05, 0.95);
    let success = rng.gen::<f32>() < success_p;

    let mut new_bases = bases_state.clone();
    let runner = new_bases.take(from)?;
    let event = StealEvent { runner_id: runner.player_id.clone(), from, to, success };

    if success {
        new_bases.set(to, Some(runner));
        Some(StealResolution {
            event,
            new_bases,
            outs_added: 0,
            credits: FieldingCredits::none(),
        })
    } else {
        let receiver = match to {
            Base::Third => FieldPosition::Third,
            _ => FieldPosition::Short,
        };
        Some(StealResolution {
            event,
            new_bases,
            outs_added: 1,
            credits: FieldingCredits::caught_stealing(receiver),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn runner(id: &str, speed: u8) -> Runner {
        Runner::new(id, speed)
    }

    fn ss_fielding(at: Vec2, time: f32) -> GroundFielding {
        GroundFielding {
            fielder: FieldPosition::Short,
            skill: DefenseSkill::default(),
            at,
            time,
            stopped: false,
        }
    }

    #[test]
    fn test_routine_six_three() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let fielding = ss_fielding(Vec2::new(-11.8, 32.3), 1.7);
        let res = resolve_ground_ball(&fielding, &runner("b", 50), &BaseState::empty(), 0, &mut rng);
        assert_eq!(res.result, AtBatResult::Groundout);
        assert_eq!(res.credits.assists, vec![FieldPosition::Short]);
        assert_eq!(res.credits.putouts, vec![FieldPosition::First]);
        assert_eq!(res.outs_added, 1);
        assert!(res.new_bases.is_empty());
    }

    #[test]
    fn test_slow_chopper_run_down_by_pitcher_is_a_hit() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let fielding = GroundFielding {
            fielder: FieldPosition::Pitcher,
            skill: DefenseSkill::default(),
            at: Vec2::new(-2.8, 22.4),
            time: 2.3,
            stopped: true,
        };
        let res = resolve_ground_ball(&fielding, &runner("b", 80), &BaseState::empty(), 0, &mut rng);
        assert_eq!(res.result, AtBatResult::InfieldHit);
        assert!(res.new_bases.first.is_some());
    }

    #[test]
    fn test_double_play_when_pivot_roll_passes() {
        // Seed chosen for a passing pivot roll; the physics leave over a
        // second to spare so only the roll decides.
        let mut bases_state = BaseState::empty();
        bases_state.first = Some(runner("r1", 50));
        for seed in 0..64 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let fielding = ss_fielding(Vec2::new(-8.9, 33.4), 1.4);
            let res = resolve_ground_ball(&fielding, &runner("b", 40), &bases_state, 0, &mut rng);
            match res.result {
                AtBatResult::DoublePlay => {
                    assert_eq!(res.outs_added, 2);
                    assert_eq!(
                        res.credits.putouts,
                        vec![FieldPosition::Second, FieldPosition::First]
                    );
                    assert_eq!(
                        res.credits.assists,
                        vec![FieldPosition::Short, FieldPosition::Second]
                    );
                    assert!(res.new_bases.is_empty());
                    return;
                }
                AtBatResult::FieldersChoice => {
                    assert_eq!(res.outs_added, 1);
                    assert!(res.new_bases.first.is_some(), "batter reaches on the FC");
                }
                other => panic!("unexpected {:?}", other),
            }
        }
        panic!("no seed in 0..64 produced a double play at ~72% odds");
    }

    #[test]
    fn test_fielders_choice_keeps_batter_alive() {
        let mut bases_state = BaseState::empty();
        bases_state.first = Some(runner("r1", 95));
        // A deep, slow play: the lead force is barely there, the relay never.
        let fielding = GroundFielding {
            fielder: FieldPosition::Short,
            skill: DefenseSkill::default(),
            at: Vec2::new(-14.0, 30.0),
            time: 2.0,
            stopped: false,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let res = resolve_ground_ball(&fielding, &runner("b", 90), &bases_state, 0, &mut rng);
        // Fast lead runner: the force may not even be there.
        assert!(matches!(
            res.result,
            AtBatResult::FieldersChoice | AtBatResult::Groundout | AtBatResult::InfieldHit
        ));
    }

    #[test]
    fn test_sacrifice_fly_from_deep_center() {
        let traj = BallTrajectory::from_batted_ball(&crate::engine::trajectory::BattedBall::new(
            45.0, 32.0, 140.0,
        ));
        let mut bases_state = BaseState::empty();
        bases_state.third = Some(runner("r3", 50));
        let res = resolve_air_out(
            FieldPosition::Center,
            &DefenseSkill::default(),
            Vec2::new(0.0, 88.0),
            &traj,
            &bases_state,
            1,
        );
        assert_eq!(res.result, AtBatResult::SacrificeFly);
        assert_eq!(res.runs, 1);
        assert_eq!(res.rbi, 1);
        assert!(res.new_bases.third.is_none());
        assert_eq!(res.outs_added, 1);
    }

    #[test]
    fn test_no_tag_up_on_shallow_fly() {
        let traj = BallTrajectory::from_batted_ball(&crate::engine::trajectory::BattedBall::new(
            45.0, 45.0, 95.0,
        ));
        let mut bases_state = BaseState::empty();
        bases_state.third = Some(runner("r3", 40));
        let res = resolve_air_out(
            FieldPosition::Short,
            &DefenseSkill::default(),
            Vec2::new(0.0, 40.0),
            &traj,
            &bases_state,
            1,
        );
        assert_eq!(res.result, AtBatResult::Flyout);
        assert_eq!(res.runs, 0);
        assert!(res.new_bases.third.is_some());
    }

    #[test]
    fn test_corner_shot_goes_for_two() {
        let traj = BallTrajectory::from_batted_ball(&crate::engine::trajectory::BattedBall::new(
            2.0, 18.0, 160.0,
        ));
        // Retriever digs it out near the corner well after landing.
        let retrieval = Retrieval {
            fielder: FieldPosition::Left,
            skill: DefenseSkill::default(),
            at: traj.rest_pos(),
            time: 4.6,
        };
        let res = resolve_hit_advancement(
            &retrieval,
            &traj,
            &runner("b", 50),
            &BaseState::empty(),
            HitCap::Triple,
        );
        assert_eq!(res.result, AtBatResult::Double, "landing {}", traj.landing_distance);
    }

    #[test]
    fn test_short_landing_caps_at_single() {
        let traj = BallTrajectory::from_batted_ball(&crate::engine::trajectory::BattedBall::new(
            45.0, 40.0, 70.0,
        ));
        assert!(traj.landing_distance < race::SHORT_LANDING_SINGLE_CAP_M);
        let retrieval = Retrieval {
            fielder: FieldPosition::Center,
            skill: DefenseSkill::default(),
            at: traj.rest_pos(),
            time: 6.0,
        };
        let res = resolve_hit_advancement(
            &retrieval,
            &traj,
            &runner("b", 99),
            &BaseState::empty(),
            HitCap::Triple,
        );
        assert_eq!(res.result, AtBatResult::Single);
    }

    #[test]
    fn test_runner_on_third_always_scores_on_a_hit() {
        let traj = BallTrajectory::from_batted_ball(&crate::engine::trajectory::BattedBall::new(
            45.0, 15.0, 130.0,
        ));
        let mut bases_state = BaseState::empty();
        bases_state.third = Some(runner("r3", 10));
        let retrieval = Retrieval {
            fielder: FieldPosition::Center,
            skill: DefenseSkill::default(),
            at: traj.rest_pos(),
            time: 3.0,
        };
        let res =
            resolve_hit_advancement(&retrieval, &traj, &runner("b", 50), &bases_state, HitCap::Double);
        assert!(res.runs >= 1);
        assert_eq!(res.rbi, res.runs);
    }

    #[test]
    fn test_error_moves_everyone_up_one() {
        let mut bases_state = BaseState::empty();
        bases_state.first = Some(runner("r1", 50));
        bases_state.third = Some(runner("r3", 50));
        let res = resolve_error(FieldPosition::Short, &runner("b", 50), &bases_state);
        assert_eq!(res.result, AtBatResult::Error);
        assert_eq!(res.runs, 1);
        assert_eq!(res.rbi, 0);
        assert!(res.new_bases.first.is_some());
        assert!(res.new_bases.second.is_some());
        assert_eq!(res.credits.errors, vec![FieldPosition::Short]);
    }

    #[test]
    fn test_walk_forces_only() {
        let mut bases_state = BaseState::empty();
        bases_state.first = Some(runner("r1", 50));
        bases_state.third = Some(runner("r3", 50));
        let res = resolve_free_pass(AtBatResult::Walk, &runner("b", 50), &bases_state);
        assert_eq!(res.runs, 0, "unforced runner on third holds on a walk");
        assert!(res.new_bases.first.is_some());
        assert!(res.new_bases.second.is_some());
        assert!(res.new_bases.third.is_some());
    }

    #[test]
    fn test_bases_loaded_walk_scores() {
        let mut bases_state = BaseState::empty();
        bases_state.first = Some(runner("r1", 50));
        bases_state.second = Some(runner("r2", 50));
        bases_state.third = Some(runner("r3", 50));
        let res = resolve_free_pass(AtBatResult::Walk, &runner("b", 50), &bases_state);
        assert_eq!(res.runs, 1);
        assert_eq!(res.rbi, 1);
        assert!(res.new_bases.is_loaded());
    }

    #[test]
    fn test_grand_slam_accounting() {
        let mut bases_state = BaseState::empty();
        bases_state.first = Some(runner("r1", 50));
        bases_state.second = Some(runner("r2", 50));
        bases_state.third = Some(runner("r3", 50));
        let res = resolve_home_run(&runner("b", 50), &bases_state);
        assert_eq!(res.runs, 4);
        assert_eq!(res.rbi, 4);
        assert!(res.new_bases.is_empty());
    }

    #[test]
    fn test_steal_only_with_open_base_ahead() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut bases_state = BaseState::empty();
        bases_state.first = Some(runner("r1", 90));
        bases_state.second = Some(runner("r2", 90));
        bases_state.third = Some(runner("r3", 90));
        // Bases loaded: nowhere to go.
        assert!(attempt_steal(&bases_state, 0, 50, &mut rng).is_none());
    }

    #[test]
    fn test_steal_outcomes_accounting() {
        let mut bases_state = BaseState::empty();
        bases_state.first = Some(runner("r1", 95));
        let mut seen_sb = false;
        let mut seen_cs = false;
        for seed in 0..4000 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            if let Some(steal) = attempt_steal(&bases_state, 1, 50, &mut rng) {
                if steal.event.success {
                    assert!(steal.new_bases.second.is_some());
                    assert_eq!(steal.outs_added, 0);
                    seen_sb = true;
                } else {
                    assert!(steal.new_bases.is_empty());
                    assert_eq!(steal.outs_added, 1);
                    assert_eq!(steal.credits.assists, vec![FieldPosition::Catcher]);
                    assert_eq!(steal.credits.putouts, vec![FieldPosition::Short]);
                    seen_cs = true;
                }
            }
            if seen_sb && seen_cs {
                return;
            }
        }
        panic!("4000 seeds produced no steal attempt of each flavor");
    }

    #[test]
    fn test_no_steal_with_two_outs() {
        let mut bases_state = BaseState::empty();
        bases_state.first = Some(runner("r1", 99));
        for seed in 0..200 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            assert!(attempt_steal(&bases_state, 2, 50, &mut rng).is_none());
        }
    }
}
