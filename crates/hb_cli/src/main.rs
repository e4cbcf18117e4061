//! Hardball CLI
//!
//! Operator tooling around the play-resolution engine: single at-bats as
//! JSON, batch sampling with an aggregate report, and landing/fielder
//! diagnostics.

use anyhow::Result;
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use hb_core::{
    calc_ball_landing, evaluate_fielders, simulate_at_bat, AtBatRequest, AtBatResult, BaseState,
    BattedBall, FieldPosition, Player,
};

#[derive(Parser)]
#[command(name = "hb_cli")]
#[command(about = "Simulate and inspect baseball at-bat resolution", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate one at-bat and print the outcome as JSON
    Atbat {
        /// Generator seed
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Batter contact rating (0-100)
        #[arg(long, default_value = "50")]
        contact: u8,

        /// Batter power rating (0-100)
        #[arg(long, default_value = "50")]
        power: u8,

        /// Batter speed rating (0-100)
        #[arg(long, default_value = "50")]
        speed: u8,

        /// Pitcher control rating (0-100)
        #[arg(long, default_value = "50")]
        control: u8,

        /// Pitch velocity (km/h)
        #[arg(long, default_value = "145")]
        velocity: f32,
    },

    /// Simulate a batch of at-bats and print league-rate aggregates
    Sample {
        /// Number of at-bats
        #[arg(long, default_value = "10000")]
        count: u32,

        /// Generator seed
        #[arg(long, default_value = "42")]
        seed: u64,
    },

    /// Landing and flight metadata for raw contact parameters
    Landing {
        /// Spray direction in degrees (0 = LF line, 45 = center, 90 = RF line)
        #[arg(long)]
        direction: f32,

        /// Launch angle in degrees
        #[arg(long)]
        angle: f32,

        /// Exit velocity in km/h
        #[arg(long)]
        velocity: f32,
    },

    /// Fielder decision table for raw contact parameters
    Fielders {
        #[arg(long)]
        direction: f32,

        #[arg(long)]
        angle: f32,

        #[arg(long)]
        velocity: f32,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Atbat { seed, contact, power, speed, control, velocity } => {
            let mut batter = Player::neutral("batter", FieldPosition::Center);
            batter.batting.contact = contact;
            batter.batting.power = power;
            batter.batting.speed = speed;
            let mut pitcher = Player::neutral("pitcher", FieldPosition::Pitcher);
            if let Some(p) = pitcher.pitching.as_mut() {
                p.control = control;
                p.velocity_kmh = velocity;
            }
            let defenders = neutral_players();
            let refs: [&Player; 9] = std::array::from_fn(|i| &defenders[i]);
            let req = AtBatRequest::new(&batter, &pitcher, refs, BaseState::empty(), 0, 1);
            req.validate()?;

            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let outcome = simulate_at_bat(&req, &mut rng);
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }

        Commands::Sample { count, seed } => {
            run_sample(count, seed);
        }

        Commands::Landing { direction, angle, velocity } => {
            let report = calc_ball_landing(direction, angle, velocity);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }

        Commands::Fielders { direction, angle, velocity } => {
            let ball = BattedBall::new(direction, angle, velocity);
            let rows = evaluate_fielders(
                &ball,
                &hb_core::engine::diagnostics::neutral_defense(),
                &BaseState::empty(),
                0,
            );
            println!(
                "{:<4} {:<14} {:>8} {:>8}  {}",
                "pos", "role", "score", "reach", "intercept"
            );
            for row in rows {
                println!(
                    "{:<4} {:<14} {:>8.3} {:>8}  {}",
                    row.position.abbreviation(),
                    row.role,
                    row.pursuit_score,
                    row.reach_time.map(|t| format!("{:.2}s", t)).unwrap_or_else(|| "-".into()),
                    row.intercept_point
                        .map(|p| format!("({:.1}, {:.1})", p.x, p.y))
                        .unwrap_or_else(|| "-".into()),
                );
            }
        }
    }

    Ok(())
}

fn neutral_players() -> Vec<Player> {
    FieldPosition::ALL
        .iter()
        .map(|&pos| Player::neutral(pos.abbreviation(), pos))
        .collect()
}

/// Plate appearances per game (both teams), for the per-game rate lines.
const PA_PER_GAME: f32 = 76.0;

fn run_sample(count: u32, seed: u64) {
    println!("Sampling {} at-bats (seed {})...", count, seed);

    let batter = Player::neutral("batter", FieldPosition::Center);
    let pitcher = Player::neutral("pitcher", FieldPosition::Pitcher);
    let defenders = neutral_players();
    let refs: [&Player; 9] = std::array::from_fn(|i| &defenders[i]);

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let (mut walks, mut hbp, mut ks, mut hits, mut homers) = (0u32, 0u32, 0u32, 0u32, 0u32);
    let (mut at_bats, mut in_play, mut ground_outs, mut air_outs, mut errors) =
        (0u32, 0u32, 0u32, 0u32, 0u32);

    for _ in 0..count {
        let req = AtBatRequest::new(&batter, &pitcher, refs, BaseState::empty(), 0, 1);
        let outcome = simulate_at_bat(&req, &mut rng);
        if outcome.result.is_at_bat() {
            at_bats += 1;
        }
        match outcome.result {
            AtBatResult::Walk => walks += 1,
            AtBatResult::HitByPitch => hbp += 1,
            AtBatResult::Strikeout => ks += 1,
            r => {
                in_play += 1;
                if r.is_hit() {
                    hits += 1;
                }
                match r {
                    AtBatResult::Homerun => homers += 1,
                    AtBatResult::Error => errors += 1,
                    AtBatResult::Groundout | AtBatResult::DoublePlay | AtBatResult::FieldersChoice => {
                        ground_outs += 1
                    }
                    AtBatResult::Flyout
                    | AtBatResult::Lineout
                    | AtBatResult::Popout
                    | AtBatResult::SacrificeFly => air_outs += 1,
                    _ => {}
                }
            }
        }
    }

    let n = count as f32;
    let babip_denom = (in_play - homers).max(1);

    println!();
    println!("  PA: {}  AB: {}  in play: {}", count, at_bats, in_play);
    println!("  AVG:   {:.3}", hits as f32 / at_bats.max(1) as f32);
    println!("  K%:    {:.1}%", ks as f32 / n * 100.0);
    println!("  BB%:   {:.1}%", walks as f32 / n * 100.0);
    println!("  HBP%:  {:.1}%", hbp as f32 / n * 100.0);
    println!("  BABIP: {:.3}", (hits - homers) as f32 / babip_denom as f32);
    println!("  HR/G:  {:.2}", homers as f32 * PA_PER_GAME / n);
    println!("  GO/AO: {:.2}", ground_outs as f32 / air_outs.max(1) as f32);
    println!("  E (in play): {:.1}%", errors as f32 / in_play.max(1) as f32 * 100.0);
}
