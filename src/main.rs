//! Play one sound effect from the command line

use std::process::ExitCode;

use sfx::prelude::*;

const USAGE: &str =
    "usage: sfx [--muted] [--config FILE] <win | spin SECS | win-sound | spin-sound SECS>";

/// Which effect to play
enum Effect {
    Win,
    Spin(f64),
    WinSound,
    SpinSound(f64),
}

struct Args {
    muted: bool,
    config: Option<String>,
    effect: Effect,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut muted = false;
    let mut config = None;
    let mut effect = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--muted" => muted = true,
            "--config" => config = Some(args.next().ok_or("--config needs a file")?),
            "win" => effect = Some(Effect::Win),
            "win-sound" => effect = Some(Effect::WinSound),
            "spin" | "spin-sound" => {
                let secs = args
                    .next()
                    .ok_or_else(|| format!("{arg} needs a duration"))?;
                let secs: f64 = secs
                    .parse()
                    .map_err(|_| format!("not a duration: {secs}"))?;
                effect = Some(if arg == "spin" {
                    Effect::Spin(secs)
                } else {
                    Effect::SpinSound(secs)
                });
            }
            other => return Err(format!("unknown argument: {other}")),
        }
    }

    Ok(Args {
        muted,
        config,
        effect: effect.ok_or("no effect given")?,
    })
}

fn run(args: Args) -> Result<bool, Box<dyn std::error::Error>> {
    let config = match &args.config {
        Some(path) => PlayerConfig::load(path)?,
        None => PlayerConfig::default(),
    };
    let config = if args.muted {
        config.with_muted(true)
    } else {
        config
    };

    let platform = Platform::open(&config)?;
    if !platform.has_output() {
        log::warn!("No audio output; only timers will run");
    }
    let player = SoundPlayer::from_config(platform, &config);
    log::info!("Playing with {player:?}");

    let completion = match args.effect {
        Effect::Win => player.win(),
        Effect::Spin(secs) => player.spin(secs),
        Effect::WinSound => player.win_sound()?,
        Effect::SpinSound(secs) => player.spin_sound(secs)?,
    };
    let played = completion.wait();

    // The spin tick outlives its completion; let it finish before exiting
    if let Effect::Spin(secs) = args.effect {
        std::thread::sleep(sfx::schedule::seconds(secs));
    }
    Ok(played)
}

fn main() -> ExitCode {
    env_logger::init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e}\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    match run(args) {
        Ok(played) => {
            log::info!("Effect finished (played: {played})");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("sfx error: {e}");
            ExitCode::FAILURE
        }
    }
}
