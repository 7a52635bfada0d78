//! Wingbeat entry point
//!
//! Two modes:
//! - `play`: one paced solo run steered by the built-in gap-seeking pilot
//! - `evolve`: generational loop demonstrating the training-driver
//!   contract. This stand-in driver draws a fresh random policy batch each
//!   generation and reads back the fitness results; a real neuro-evolution
//!   driver breeds the next batch from them instead.

use std::path::Path;
use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand_pcg::Pcg32;

use wingbeat::consts::*;
use wingbeat::policy::{GapSeekPolicy, LinearPolicy, Observation, Policy};
use wingbeat::render::LogSink;
use wingbeat::settings::{ConfigError, SimConfig};
use wingbeat::sim::{GenerationContext, RunPhase, Session, SoloRun, SpriteSet, TickInput};

/// Demo population size per generation
const POPULATION: usize = 50;
/// Demo generation count
const GENERATIONS: u32 = 50;
/// Generation time cap (two minutes of sim time); the session itself runs
/// until the live set empties, the cap belongs to the driver
const GENERATION_TICK_CAP: u64 = TICK_HZ as u64 * 120;
/// Solo demo length
const PLAY_TICK_CAP: u64 = TICK_HZ as u64 * 60;

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let mode = args.next().unwrap_or_else(|| "play".to_string());
    let seed: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(0x5eed);

    let config = SimConfig::load_or_default(Path::new("wingbeat.json"));
    let sprites = SpriteSet::builtin();

    let result = match mode.as_str() {
        "play" => play(&config, seed, &sprites),
        "evolve" => evolve(&config, seed, &sprites),
        other => {
            eprintln!("unknown mode '{other}'; expected 'play' or 'evolve'");
            std::process::exit(2);
        }
    };

    if let Err(err) = result {
        log::error!("{err}");
        std::process::exit(1);
    }
}

/// Paced solo run with the gap-seeking pilot standing in for a human
fn play(config: &SimConfig, seed: u64, sprites: &SpriteSet) -> Result<(), ConfigError> {
    let mut run = SoloRun::new(config.clone(), seed, sprites)?;
    let mut pilot = GapSeekPolicy::default();
    let mut sink = LogSink::new(TICK_HZ as u64);
    let tick_len = Duration::from_secs(1) / TICK_HZ;

    log::info!("solo run, seed {seed}");
    while run.phase() == RunPhase::Running && run.tick_count() < PLAY_TICK_CAP {
        let start = Instant::now();
        let observation = Observation::new(run.body(), run.leading());
        let flap = pilot
            .decide(&observation)
            .first()
            .copied()
            .unwrap_or(0.0)
            > FLAP_THRESHOLD;
        run.tick(&TickInput { flap, quit: false }, &mut sink);
        if let Some(rest) = tick_len.checked_sub(start.elapsed()) {
            std::thread::sleep(rest);
        }
    }

    println!(
        "score {} after {} ticks{}",
        run.score(),
        run.tick_count(),
        if run.collision_observed() {
            " (contact observed)"
        } else {
            ""
        }
    );
    Ok(())
}

/// Stand-in training driver: random policies, fitness read-back, repeat
fn evolve(config: &SimConfig, seed: u64, sprites: &SpriteSet) -> Result<(), ConfigError> {
    let mut best_ever = f32::NEG_INFINITY;

    for generation in 1..=GENERATIONS {
        let mut rng = Pcg32::seed_from_u64(seed.wrapping_mul(31).wrapping_add(generation as u64));
        let policies: Vec<Box<dyn Policy>> = (0..POPULATION)
            .map(|_| Box::new(LinearPolicy::random(&mut rng)) as _)
            .collect();

        let context = GenerationContext {
            generation,
            seed: seed.wrapping_add(generation as u64),
        };
        let mut session = Session::new(config, context, sprites, policies)?;
        let mut sink = LogSink::new(TICK_HZ as u64);
        while session.tick(&mut sink) && session.tick_count() < GENERATION_TICK_CAP {}

        let score = session.score();
        let ticks = session.tick_count();
        let results = session.into_results();
        let best = results
            .iter()
            .map(|r| r.fitness)
            .fold(f32::NEG_INFINITY, f32::max);
        let mean = results.iter().map(|r| r.fitness).sum::<f32>() / results.len() as f32;
        best_ever = best_ever.max(best);

        log::info!("gen {generation}: score {score}, best {best:.1}, mean {mean:.1}, {ticks} ticks");
    }

    println!("best fitness across {GENERATIONS} generations: {best_ever:.1}");
    Ok(())
}
