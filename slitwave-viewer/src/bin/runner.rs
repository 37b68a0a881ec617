//! slitwave Runner
//!
//! Runs a saved configuration headless, writes the final frame as a PNG and
//! logs how closely the accumulated histogram follows the analytic curve.
//!
//! Usage: `slitwave-runner [config.json] [--ticks N] [--seed S] [--out frame.png]`

use slitwave::analysis::{contrast, correlation, normalized, smooth};
use slitwave::wave::theoretical_profile;
use slitwave::{Config, FrameBuffer, FrameClock, Renderer, Session};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

const DEFAULT_TICKS: u64 = 3600;

struct Args {
    config: Option<PathBuf>,
    ticks: u64,
    seed: Option<u64>,
    out: PathBuf,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        config: None,
        ticks: DEFAULT_TICKS,
        seed: None,
        out: PathBuf::from("slitwave.png"),
    };

    let mut iter = env::args().skip(1);
    while let Some(arg) = iter.next() {
        let mut value = |name: &str| iter.next().ok_or_else(|| format!("{} needs a value", name));
        match arg.as_str() {
            "--ticks" => args.ticks = value("--ticks")?.parse().map_err(|e| format!("--ticks: {}", e))?,
            "--seed" => args.seed = Some(value("--seed")?.parse().map_err(|e| format!("--seed: {}", e))?),
            "--out" => args.out = PathBuf::from(value("--out")?),
            flag if flag.starts_with("--") => return Err(format!("unknown flag {}", flag)),
            path => args.config = Some(PathBuf::from(path)),
        }
    }
    Ok(args)
}

fn main() -> ExitCode {
    env_logger::init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("Usage: slitwave-runner [config.json] [--ticks N] [--seed S] [--out frame.png]");
            return ExitCode::FAILURE;
        }
    };

    let config = match &args.config {
        Some(path) => match Config::load(path) {
            Ok(config) => config.sanitized(),
            Err(e) => {
                log::error!("failed to load config from {}: {}", path.display(), e);
                log::warn!("using default configuration");
                Config::default()
            }
        },
        None => {
            log::info!("no config file specified, using defaults");
            Config::default()
        }
    };
    if let Ok(json) = serde_json::to_string(&config) {
        log::debug!("config: {}", json);
    }

    let mut session = match args.seed {
        Some(seed) => Session::seeded(&config, seed),
        None => Session::new(&config),
    };
    let mut clock = FrameClock::fixed(1.0 / 60.0);
    for _ in 0..args.ticks {
        session.tick(&config, clock.update());
    }

    let observed = normalized(session.histogram());
    let expected = theoretical_profile(&config);
    // Contrast only over the lit part of the screen; the dark edges would pin it at 1.
    let lit: Vec<f64> = smooth(&observed, 3)
        .into_iter()
        .zip(&expected)
        .filter(|&(_, &e)| e > 0.05)
        .map(|(o, _)| o)
        .collect();
    log::info!(
        "{} ticks, {:.1}s simulated: fired {}, detected {}",
        session.ticks(),
        session.sim_time(),
        session.fired(),
        session.detections().total()
    );
    log::info!(
        "correlation with analytic curve {:.3}, fringe contrast {:.3}",
        correlation(&observed, &expected),
        contrast(&lit)
    );

    let mut frame = FrameBuffer::new(config.viewport.width, config.viewport.height);
    Renderer::new().draw(&session.snapshot(), &config, &mut frame);
    match frame.save_png(&args.out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("failed to write {}: {}", args.out.display(), e);
            ExitCode::FAILURE
        }
    }
}
