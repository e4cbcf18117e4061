//! End-to-end play scenarios and distribution checks.
//!
//! These exercise the full pipeline: literal contact parameters through the
//! autonomous defense into runner resolution and stat attribution. Rolled
//! edges (catch attempts, pivot throws) are asserted over a band of seeds so
//! a single unlucky glove does not flake the suite.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::engine::at_bat::{
    simulate_at_bat, simulate_at_bat_seeded, simulate_batted_ball, AtBatRequest,
};
use crate::engine::outcome::{AtBatOutcome, AtBatResult};
use crate::engine::trajectory::BattedBall;
use crate::models::{BaseState, BattingAttributes, FieldPosition, Player, Runner};

fn make_defenders() -> Vec<Player> {
    FieldPosition::ALL
        .iter()
        .map(|&pos| Player::neutral(pos.abbreviation(), pos))
        .collect()
}

fn run_ball(
    ball: BattedBall,
    batter_tweak: impl Fn(&mut BattingAttributes),
    bases: BaseState,
    outs: u8,
    seed: u64,
) -> AtBatOutcome {
    let mut batter = Player::neutral("batter", FieldPosition::Center);
    batter_tweak(&mut batter.batting);
    let pitcher = Player::neutral("pitcher", FieldPosition::Pitcher);
    let defenders = make_defenders();
    let refs: [&Player; 9] = std::array::from_fn(|i| &defenders[i]);
    let req = AtBatRequest::new(&batter, &pitcher, refs, bases, outs, 1);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    simulate_batted_ball(&req, &ball, &mut rng)
}

// ============================================================================
// Literal scenarios
// ============================================================================

#[test]
fn scenario_routine_six_three_groundout() {
    // Medium grounder toward the 6-hole; the shortstop throws the batter out.
    let mut ground_outs = 0;
    for seed in 0..10 {
        let out = run_ball(
            BattedBall::new(25.0, 3.0, 120.0),
            |b| b.speed = 50,
            BaseState::empty(),
            0,
            seed,
        );
        if out.result == AtBatResult::Groundout {
            assert_eq!(out.fielding_credits.assists, vec![FieldPosition::Short]);
            assert_eq!(out.fielding_credits.putouts, vec![FieldPosition::First]);
            assert_eq!(out.outs_after, 1);
            assert!(out.new_base_state.is_empty());
            ground_outs += 1;
        }
    }
    assert!(ground_outs >= 6, "only {}/10 routine grounders became 6-3 outs", ground_outs);
}

#[test]
fn scenario_solo_home_run() {
    let out = run_ball(
        BattedBall::new(45.0, 28.0, 165.0),
        |b| b.power = 80,
        BaseState::empty(),
        0,
        1,
    );
    assert_eq!(out.result, AtBatResult::Homerun);
    assert_eq!(out.runs_scored, 1);
    assert_eq!(out.rbi, 1);
    assert!(out.new_base_state.is_empty());
    assert_eq!(out.outs_after, out.outs_before);
    assert!(out.fielding_credits.is_empty());
}

#[test]
fn scenario_fence_high_fly_stays_in() {
    // Carry class 2 pushes it near the track but the center fence holds it.
    let mut outs_made = 0;
    for seed in 0..10 {
        let out = run_ball(
            BattedBall::new(45.0, 30.0, 150.0),
            |b| b.trajectory = 2,
            BaseState::empty(),
            0,
            seed,
        );
        assert_ne!(out.result, AtBatResult::Homerun, "seed {} cleared the fence", seed);
        if out.result == AtBatResult::Flyout {
            assert_eq!(out.fielder_position, Some(FieldPosition::Center));
            outs_made += 1;
        }
    }
    assert!(outs_made >= 5, "only {}/10 track flies were run down", outs_made);
}

#[test]
fn scenario_swinging_bunt_infield_single() {
    // Chopped into the dirt in front of the mound: the pitcher runs it down
    // and the play dies in his glove.
    let out = run_ball(
        BattedBall::new(25.0, -12.0, 85.0),
        |b| b.speed = 95,
        BaseState::empty(),
        0,
        1,
    );
    assert_eq!(out.result, AtBatResult::InfieldHit);
    assert!(out.new_base_state.first.is_some());
    assert_eq!(out.outs_after, 0);
}

#[test]
fn scenario_six_four_three_double_play() {
    let mut bases = BaseState::empty();
    bases.first = Some(Runner::new("r1", 50));
    let mut twin_killings = 0;
    for seed in 0..20 {
        let out = run_ball(
            BattedBall::new(30.0, 2.0, 135.0),
            |b| b.speed = 40,
            bases.clone(),
            0,
            seed,
        );
        match out.result {
            AtBatResult::DoublePlay => {
                assert_eq!(
                    out.fielding_credits.assists,
                    vec![FieldPosition::Short, FieldPosition::Second]
                );
                assert_eq!(
                    out.fielding_credits.putouts,
                    vec![FieldPosition::Second, FieldPosition::First]
                );
                assert_eq!(out.outs_after, 2);
                assert!(out.new_base_state.is_empty());
                twin_killings += 1;
            }
            AtBatResult::FieldersChoice => {
                assert_eq!(out.outs_after, 1);
                assert!(out.new_base_state.first.is_some());
            }
            // A bobbled smash or a beaten throw now and then is baseball.
            _ => {}
        }
    }
    assert!(twin_killings >= 8, "only {}/20 pivots turned two", twin_killings);
}

#[test]
fn scenario_sacrifice_fly_scores_the_runner() {
    let mut bases = BaseState::empty();
    bases.third = Some(Runner::new("r3", 50));
    let mut sacrifices = 0;
    for seed in 0..10 {
        let out = run_ball(
            BattedBall::new(45.0, 32.0, 140.0),
            |b| b.speed = 50,
            bases.clone(),
            1,
            seed,
        );
        if out.result == AtBatResult::SacrificeFly {
            assert_eq!(out.runs_scored, 1);
            assert_eq!(out.rbi, 1);
            assert_eq!(out.outs_after, 2);
            assert!(out.new_base_state.third.is_none());
            assert_eq!(out.fielding_credits.putouts, vec![FieldPosition::Center]);
            sacrifices += 1;
        }
    }
    assert!(sacrifices >= 5, "only {}/10 deep flies brought the run home", sacrifices);
}

// ============================================================================
// Invariants over the full pipeline
// ============================================================================

fn full_at_bat(seed: u64, bases: BaseState, outs: u8) -> AtBatOutcome {
    let batter = Player::neutral("batter", FieldPosition::Center);
    let pitcher = Player::neutral("pitcher", FieldPosition::Pitcher);
    let defenders = make_defenders();
    let refs: [&Player; 9] = std::array::from_fn(|i| &defenders[i]);
    let req = AtBatRequest::new(&batter, &pitcher, refs, bases, outs, 1);
    simulate_at_bat_seeded(&req, seed)
}

#[test]
fn invariant_outs_never_exceed_three() {
    let mut bases = BaseState::empty();
    bases.first = Some(Runner::new("r1", 70));
    bases.second = Some(Runner::new("r2", 30));
    for seed in 0..300 {
        for outs in 0..3u8 {
            let out = full_at_bat(seed, bases.clone(), outs);
            assert!(out.outs_after <= 3, "seed {} outs {:?}", seed, out);
            assert_eq!(
                out.outs_after - out.outs_before,
                out.result.outs_added().min(3 - out.outs_before),
                "seed {} {:?}",
                seed,
                out.result
            );
        }
    }
}

#[test]
fn invariant_ground_balls_never_go_for_three() {
    for seed in 0..600 {
        let out = full_at_bat(seed, BaseState::empty(), 0);
        if out.batted_ball_type == Some(crate::engine::trajectory::BattedBallType::GroundBall)
            && !out.forced_resolution
        {
            assert!(
                !matches!(out.result, AtBatResult::Triple | AtBatResult::Homerun),
                "seed {}: grounder went for {:?}",
                seed,
                out.result
            );
        }
    }
}

#[test]
fn invariant_no_runner_shares_a_base() {
    let mut bases = BaseState::empty();
    bases.first = Some(Runner::new("r1", 80));
    bases.third = Some(Runner::new("r3", 20));
    for seed in 0..300 {
        let out = full_at_bat(seed, bases.clone(), 0);
        let mut ids: Vec<&str> = Vec::new();
        for runner in [
            out.new_base_state.first.as_ref(),
            out.new_base_state.second.as_ref(),
            out.new_base_state.third.as_ref(),
        ]
        .into_iter()
        .flatten()
        {
            assert!(!ids.contains(&runner.player_id.as_str()), "seed {}: {:?}", seed, out);
            ids.push(runner.player_id.as_str());
        }
    }
}

#[test]
fn invariant_stat_conservation_on_outs() {
    for seed in 0..400 {
        let out = full_at_bat(seed, BaseState::empty(), 0);
        match out.result {
            AtBatResult::Strikeout => {
                assert_eq!(out.fielding_credits.putouts, vec![FieldPosition::Catcher]);
                assert!(out.fielding_credits.assists.is_empty());
            }
            AtBatResult::Groundout => {
                assert!(
                    out.fielding_credits.putouts.len() + out.fielding_credits.assists.len() >= 1
                );
            }
            AtBatResult::DoublePlay => {
                assert_eq!(out.fielding_credits.putouts.len(), 2);
            }
            _ => {}
        }
    }
}

// ============================================================================
// Seeded distribution check
// ============================================================================

#[test]
fn distribution_neutral_league_is_plausible() {
    let batter = Player::neutral("batter", FieldPosition::Center);
    let pitcher = Player::neutral("pitcher", FieldPosition::Pitcher);
    let defenders = make_defenders();
    let refs: [&Player; 9] = std::array::from_fn(|i| &defenders[i]);

    let n = 4000u32;
    let mut rng = ChaCha8Rng::seed_from_u64(20_240_401);
    let (mut walks, mut ks, mut hits, mut homers, mut in_play) = (0u32, 0u32, 0u32, 0u32, 0u32);
    let (mut ground_outs, mut air_outs) = (0u32, 0u32);

    for _ in 0..n {
        let req = AtBatRequest::new(&batter, &pitcher, refs, BaseState::empty(), 0, 1);
        let out = simulate_at_bat(&req, &mut rng);
        match out.result {
            AtBatResult::Walk | AtBatResult::HitByPitch => walks += 1,
            AtBatResult::Strikeout => ks += 1,
            r => {
                in_play += 1;
                if r.is_hit() {
                    hits += 1;
                }
                if r == AtBatResult::Homerun {
                    homers += 1;
                }
                match r {
                    AtBatResult::Groundout
                    | AtBatResult::DoublePlay
                    | AtBatResult::FieldersChoice => ground_outs += 1,
                    AtBatResult::Flyout | AtBatResult::Lineout | AtBatResult::Popout
                    | AtBatResult::SacrificeFly => air_outs += 1,
                    _ => {}
                }
            }
        }
    }

    let rate = |x: u32| x as f32 / n as f32;
    assert!((0.10..=0.30).contains(&rate(ks)), "K rate {}", rate(ks));
    assert!((0.04..=0.16).contains(&rate(walks)), "BB rate {}", rate(walks));
    assert!(in_play > n / 2, "in-play collapsed: {}", in_play);

    let babip_denom = in_play - homers;
    let babip = (hits - homers) as f32 / babip_denom as f32;
    assert!((0.20..=0.42).contains(&babip), "BABIP {}", babip);

    assert!(homers > 0, "a neutral league must hit some home runs");
    assert!(rate(homers) < 0.08, "HR rate {} is beer-league", rate(homers));

    assert!(ground_outs > 0 && air_outs > 0);
    let go_ao = ground_outs as f32 / air_outs as f32;
    assert!((0.4..=2.5).contains(&go_ao), "GO/AO {}", go_ao);
}

#[test]
fn distribution_deep_flies_mostly_die_in_gloves() {
    // Balls driven 65+ meters with real hang time should usually be outs.
    let mut caught = 0u32;
    let mut total = 0u32;
    for seed in 0..120 {
        let out = run_ball(
            BattedBall::new(40.0, 33.0, 138.0),
            |b| b.speed = 50,
            BaseState::empty(),
            0,
            seed,
        );
        total += 1;
        if matches!(out.result, AtBatResult::Flyout | AtBatResult::SacrificeFly) {
            caught += 1;
        }
    }
    assert!(
        caught * 10 >= total * 6,
        "only {}/{} deep flies were caught",
        caught,
        total
    );
}

// ============================================================================
// Property sweeps
// ============================================================================

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn trajectory_round_trip(
            dir in -45.0f32..135.0,
            angle in -15.0f32..70.0,
            ev in 60.0f32..185.0,
        ) {
            let traj = crate::engine::trajectory::BallTrajectory::from_batted_ball(
                &BattedBall::new(dir, angle, ev),
            );
            let at_landing = traj.position_at(traj.flight_time);
            prop_assert!(at_landing.distance_to(traj.landing_pos) < 0.01);
            prop_assert!(traj.height_at(traj.flight_time) <= 1e-3);
            prop_assert!(traj.height_at(traj.flight_time + 0.5) == 0.0);
            prop_assert!(traj.flight_time > 0.0);
            prop_assert!(traj.landing_distance >= 0.0);
        }

        #[test]
        fn every_seed_yields_a_well_formed_outcome(
            seed in any::<u64>(),
            outs in 0u8..3,
            on_first in any::<bool>(),
            on_second in any::<bool>(),
            on_third in any::<bool>(),
        ) {
            let mut bases = BaseState::empty();
            if on_first {
                bases.first = Some(Runner::new("p1", 60));
            }
            if on_second {
                bases.second = Some(Runner::new("p2", 50));
            }
            if on_third {
                bases.third = Some(Runner::new("p3", 40));
            }
            let out = full_at_bat(seed, bases.clone(), outs);

            // Out ceiling.
            prop_assert!(out.outs_after <= 3);
            // Runs balance: bodies in equals bodies out.
            let before = out.bases_before.count() as i32 + 1;
            let after = out.new_base_state.count() as i32;
            let made = (out.outs_after - out.outs_before) as i32;
            prop_assert_eq!(after + made + out.runs_scored as i32, before);
            // RBI never exceed runs.
            prop_assert!(out.rbi <= out.runs_scored);
        }

        #[test]
        fn short_landings_never_stretch(
            seed in 0u64..2000,
        ) {
            let out = run_ball(
                BattedBall::new(45.0, 40.0, 70.0),
                |_| {},
                BaseState::empty(),
                0,
                seed,
            );
            // A ~20 m blooper is a single, an out, or an error; never more.
            prop_assert!(
                !matches!(
                    out.result,
                    AtBatResult::Double | AtBatResult::Triple | AtBatResult::Homerun
                ),
                "short blooper became {:?}",
                out.result
            );
        }
    }
}
