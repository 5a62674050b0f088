use clap::Parser;
use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};
use hdrhistogram::Histogram;
use log::{error, info, warn};
use particle_life_config::load_config;
use particle_life_core::spawn::{random_particles, ParticleDefaults};
use particle_life_core::{
    default_rules, Bounds, ControlEvent, InteractionRules, ParticleSystem, SimulationController,
};
use particle_life_render::{ConsoleRenderer, NullRenderer, Renderer};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io::BufRead;
use std::path::PathBuf;
use std::process;
use std::thread;
use std::time::Instant;

/// Particles printed per frame by the console renderer.
const SHOW_LIMIT: usize = 5;

#[derive(Parser, Debug)]
#[command(author, version, about = "Particle life simulation runner", long_about = None)]
struct Args {
    /// Path to the simulation configuration file
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Override the RNG seed from the config file
    #[arg(long)]
    seed: Option<u64>,

    /// Run exactly this many steps, then exit (headless, no pacing)
    #[arg(long)]
    steps: Option<u64>,
}

/// Messages flowing from the input threads into the main loop.
enum RunnerEvent {
    Control(ControlEvent),
    Quit,
}

fn main() {
    env_logger::init();

    let args = Args::parse();

    let config = match load_config(&args.config) {
        Ok(config) => config,
        Err(e) => {
            error!("failed to load config {}: {e}", args.config.display());
            process::exit(1);
        }
    };
    info!("using configuration from {}", args.config.display());

    let seed = args
        .seed
        .or(config.seed)
        .unwrap_or_else(|| rand::thread_rng().gen());
    info!("rng seed: {seed}");
    let mut rng = StdRng::seed_from_u64(seed);

    let bounds = Bounds::from_size(config.world_settings.width, config.world_settings.height);

    let defaults = ParticleDefaults {
        mass: config.particles.mass,
        friction: config.particles.friction,
        noise: config.particles.noise,
    };
    let particles = random_particles(
        &mut rng,
        config.particles.count as usize,
        config.particles.num_types,
        &bounds,
        defaults,
    );
    let system = ParticleSystem::from_particles(particles);
    info!(
        "spawned {} particles of {} types in {} x {}",
        system.len(),
        config.particles.num_types,
        config.world_settings.width,
        config.world_settings.height
    );

    let rules = match build_rules(&config) {
        Ok(rules) => rules,
        Err(e) => {
            error!("failed to build interaction rules: {e}");
            process::exit(1);
        }
    };

    let mut controller =
        SimulationController::new(system, rules, bounds, config.boundary, rng);
    controller.set_friction(config.particles.friction);

    let (tx, rx) = unbounded::<RunnerEvent>();
    install_ctrlc_handler(tx.clone());

    let result = match args.steps {
        Some(steps) => {
            // Headless: fixed dt derived from the target framerate, no
            // stdin controls, no pacing.
            let dt = 1.0 / config.framerate as f32;
            let mut renderer = NullRenderer::new(dt);
            run_loop(
                &mut controller,
                &mut renderer,
                &rx,
                config.framerate,
                Some(steps),
            )
        }
        None => {
            spawn_stdin_reader(tx);
            let mut renderer = ConsoleRenderer::stdout(SHOW_LIMIT);
            info!(
                "running at {} fps, boundary mode {:?}; commands: p, +, -, f+, f-, q",
                config.framerate, config.boundary
            );
            run_loop(&mut controller, &mut renderer, &rx, config.framerate, None)
        }
    };

    if let Err(e) = result {
        error!("simulation step failed: {e}");
        process::exit(1);
    }
}

fn build_rules(config: &particle_life_config::Config) -> particle_life_core::Result<InteractionRules> {
    let mut rules = match &config.rules.matrix {
        Some(matrix) => InteractionRules::new(
            matrix.clone(),
            config.rules.min_range,
            config.rules.max_range,
        )?,
        None => {
            let mut rules = default_rules(config.particles.num_types)?;
            rules.set_ranges(config.rules.min_range, config.rules.max_range)?;
            rules
        }
    };
    rules.set_global_strength(config.rules.global_strength);
    Ok(rules)
}

/// Main loop: tick for dt, drain control events, step, render.
///
/// Runs until a quit event arrives or `max_steps` is exhausted. Per-step
/// wall time is collected and summarized on exit.
fn run_loop<R: Renderer>(
    controller: &mut SimulationController,
    renderer: &mut R,
    events: &Receiver<RunnerEvent>,
    target_fps: u32,
    max_steps: Option<u64>,
) -> particle_life_core::Result<()> {
    let mut step_times = Histogram::<u64>::new(3).expect("histogram bounds are static");
    let mut steps: u64 = 0;

    'outer: loop {
        let dt = renderer.tick(target_fps);

        loop {
            match events.try_recv() {
                Ok(RunnerEvent::Control(event)) => controller.handle_event(event),
                Ok(RunnerEvent::Quit) => break 'outer,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => break 'outer,
            }
        }

        let step_start = Instant::now();
        controller.step(dt)?;
        let _ = step_times.record(step_start.elapsed().as_micros() as u64);

        let fps = if dt > 0.0 { Some(1.0 / dt) } else { None };
        if let Err(e) = renderer.render(
            &controller.system().positions(),
            &controller.system().types(),
            fps,
        ) {
            warn!("render failed: {e}");
        }

        steps += 1;
        if let Some(max) = max_steps {
            if steps >= max {
                break;
            }
        }
    }

    info!(
        "ran {steps} steps; step time us: mean={:.0} p50={} p99={} max={}",
        step_times.mean(),
        step_times.value_at_quantile(0.5),
        step_times.value_at_quantile(0.99),
        step_times.max()
    );
    Ok(())
}

fn install_ctrlc_handler(tx: Sender<RunnerEvent>) {
    if let Err(e) = ctrlc::set_handler(move || {
        let _ = tx.send(RunnerEvent::Quit);
    }) {
        warn!("could not install Ctrl+C handler: {e}");
    }
}

/// Read control commands from stdin on a background thread.
///
/// One command per line: `p` pause/resume, `+`/`-` global strength up or
/// down, `f+`/`f-` friction up or down, `q` quit.
fn spawn_stdin_reader(tx: Sender<RunnerEvent>) {
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(_) => break,
            };
            let event = match line.trim() {
                "p" | "pause" => RunnerEvent::Control(ControlEvent::TogglePause),
                "+" => RunnerEvent::Control(ControlEvent::IncreaseStrength),
                "-" => RunnerEvent::Control(ControlEvent::DecreaseStrength),
                "f+" => RunnerEvent::Control(ControlEvent::IncreaseFriction),
                "f-" => RunnerEvent::Control(ControlEvent::DecreaseFriction),
                "q" | "quit" => RunnerEvent::Quit,
                "" => continue,
                other => {
                    warn!("unknown command: {other}");
                    continue;
                }
            };
            let quit = matches!(event, RunnerEvent::Quit);
            if tx.send(event).is_err() || quit {
                break;
            }
        }
    });
}
