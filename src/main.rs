//! Nano Battle headless runner
//!
//! Runs a scripted match without a window: two players join, fly circles,
//! charge and fire, while the hazard waves fill the arena. Prints the final
//! snapshot as JSON.
//!
//! Usage: `nano-battle [config.json] [seconds] [seed]`

use glam::Vec2;

use nano_battle::consts::*;
use nano_battle::sim::FixedStep;
use nano_battle::{ArenaConfig, InputIntent, World};

/// Host frame time the runner pretends to render at
const FRAME_DT: f32 = 1.0 / 75.0;

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();
    if let Err(err) = run() {
        log::error!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = match args.first().map(String::as_str) {
        Some(path) if path != "-" => ArenaConfig::load(path)?,
        _ => ArenaConfig::default(),
    };
    let seconds: f32 = args.get(1).map(|s| s.parse()).transpose()?.unwrap_or(30.0);
    let seed: u64 = args.get(2).map(|s| s.parse()).transpose()?.unwrap_or(0x5eed);

    log::info!("Nano Battle (headless) starting with seed {seed}");
    let mut world = World::new(config, seed)?;
    let mut stepper = FixedStep::new();
    let mut inputs = [InputIntent::default(); MAX_PLAYERS];

    let mut elapsed = 0.0;
    let mut frames: u64 = 0;
    while elapsed < seconds {
        script(&mut inputs, elapsed, frames);
        stepper.advance(&mut world, &mut inputs, FRAME_DT);
        elapsed += FRAME_DT;
        frames += 1;

        if frames % 375 == 0 {
            log::info!(
                "t={:.1}s tick={} actors={}",
                elapsed,
                world.time_ticks,
                world.live_actors().count()
            );
        }
    }

    let standings = world.standings();
    for standing in &standings.entries {
        log::info!(
            "Player {}: score {} ({} kills, {} deaths){}",
            standing.slot + 1,
            standing.score,
            standing.kills,
            standing.deaths,
            if standing.playing { "" } else { " [idle]" }
        );
    }
    if let Some(leader) = standings.leader() {
        log::info!("Leader: player {} with {}", leader.slot + 1, leader.score);
    }
    println!("{}", world.snapshot().to_json()?);
    Ok(())
}

/// Two scripted players: hold join, then circle while charging and firing
fn script(inputs: &mut [InputIntent; MAX_PLAYERS], elapsed: f32, frame: u64) {
    for (slot, input) in inputs.iter_mut().take(2).enumerate() {
        let phase = elapsed * 0.8 + slot as f32 * std::f32::consts::PI;
        input.join = elapsed < JOIN_HOLD_TIME * 2.0;
        input.movement = Vec2::from_angle(phase);
        input.charge_positive = (frame / 120) % 2 == 0;
        input.charge_negative = !input.charge_positive && slot == 1;
        input.fire_blast = frame % 45 == slot as u64 * 20;
        input.fire_special = frame % 300 == 150;
        input.fire_boost = frame % 200 == 100 + slot as u64;
    }
}
