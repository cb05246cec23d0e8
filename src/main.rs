use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::{Local, NaiveDateTime, NaiveTime};
use sdl2::keyboard::Keycode;
use skyscape::config::SceneConfig;
use skyscape::display::{Display, InputEvent, PixelBuffer, RenderTarget, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use skyscape::scene::{SkyController, Viewport};

const DEFAULT_CONFIG_PATH: &str = "skyscape.json";

/// Event polling cadence between redraws
const IDLE_SLEEP: Duration = Duration::from_millis(50);

struct Options {
    width: u32,
    height: u32,
    config_path: PathBuf,
    interval_secs: Option<u64>,
    frozen_at: Option<NaiveTime>,
    write_config: Option<PathBuf>,
}

/// Parse command line arguments
fn parse_args() -> Options {
    let args: Vec<String> = std::env::args().collect();
    let mut options = Options {
        width: DEFAULT_WIDTH,
        height: DEFAULT_HEIGHT,
        config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        interval_secs: None,
        frozen_at: None,
        write_config: None,
    };

    let mut i = 1;
    while i < args.len() {
        let value = args.get(i + 1);
        match args[i].as_str() {
            "--width" | "-w" => {
                if let Some(w) = value.and_then(|v| v.parse::<u32>().ok()) {
                    options.width = w.max(1);
                }
                i += 1;
            },
            "--height" | "-h" => {
                if let Some(h) = value.and_then(|v| v.parse::<u32>().ok()) {
                    options.height = h.max(1);
                }
                i += 1;
            },
            "--resolution" | "-r" => {
                // WxH, e.g. 1920x1080
                if let Some((w, h)) = value.and_then(|v| v.split_once('x')) {
                    if let (Ok(w), Ok(h)) = (w.parse::<u32>(), h.parse::<u32>()) {
                        options.width = w.max(1);
                        options.height = h.max(1);
                    }
                }
                i += 1;
            },
            "--config" | "-c" => {
                if let Some(path) = value {
                    options.config_path = PathBuf::from(path);
                }
                i += 1;
            },
            "--interval" => {
                if let Some(secs) = value.and_then(|v| v.parse::<u64>().ok()) {
                    options.interval_secs = Some(secs.max(1));
                }
                i += 1;
            },
            "--at" => {
                match value.map(|v| NaiveTime::parse_from_str(v, "%H:%M")) {
                    Some(Ok(time)) => options.frozen_at = Some(time),
                    Some(Err(e)) => log::warn!("Ignoring --at: {}", e),
                    None => {},
                }
                i += 1;
            },
            "--write-config" => {
                if let Some(path) = value {
                    options.write_config = Some(PathBuf::from(path));
                }
                i += 1;
            },
            "--help" => {
                println!("Usage: skyscape [OPTIONS]");
                println!();
                println!("Options:");
                println!(
                    "  --width W, -w W           Set window width (default: {})",
                    DEFAULT_WIDTH
                );
                println!(
                    "  --height H, -h H          Set window height (default: {})",
                    DEFAULT_HEIGHT
                );
                println!("  --resolution WxH, -r WxH  Set resolution (e.g., 1920x1080)");
                println!(
                    "  --config PATH, -c PATH    Scene config JSON (default: {})",
                    DEFAULT_CONFIG_PATH
                );
                println!("  --interval SECS           Seconds between redraws (overrides config)");
                println!("  --at HH:MM                Freeze the clock at a time of day");
                println!("  --write-config PATH       Write the effective config as JSON and exit");
                println!("  --help                    Show this help message");
                println!();
                println!("Set RUST_LOG=debug for per-frame diagnostics.");
                std::process::exit(0);
            },
            other => log::warn!("Unknown argument {}", other),
        }
        i += 1;
    }

    options
}

/// Local wall-clock time, or today at the frozen time of day
fn now(frozen_at: Option<NaiveTime>) -> NaiveDateTime {
    let now = Local::now().naive_local();
    match frozen_at {
        Some(time) => now.date().and_time(time),
        None => now,
    }
}

fn main() -> Result<(), String> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = parse_args();

    let mut config = SceneConfig::load_or_default(&options.config_path);
    if let Some(secs) = options.interval_secs {
        config.tick_interval_secs = secs;
    }

    if let Some(path) = &options.write_config {
        config.save(path).map_err(|e| e.to_string())?;
        log::info!("Wrote scene config to {}", path.display());
        return Ok(());
    }

    let interval = Duration::from_secs(config.tick_interval_secs);
    let (width, height) = (options.width, options.height);

    let (mut display, texture_creator) = Display::with_size("skyscape", width, height)?;
    let mut target = RenderTarget::with_size(&texture_creator, width, height)?;
    let mut buffer = PixelBuffer::with_size(width, height);

    log::info!("=== skyscape ===");
    log::info!("Resolution: {}x{}, redraw every {}s", width, height, interval.as_secs());
    if let Some(time) = options.frozen_at {
        log::info!("Clock frozen at {}", time.format("%H:%M"));
    }

    let mut sky = SkyController::new(
        config,
        fastrand::Rng::new(),
        now(options.frozen_at),
        Viewport::new(width, height),
    );
    sky.tick(now(options.frozen_at), &mut buffer);
    let mut last_tick = Instant::now();

    'main: loop {
        for event in display.poll_events() {
            match event {
                InputEvent::Quit | InputEvent::KeyDown(Keycode::Escape) => break 'main,
                InputEvent::Resized { width, height } => {
                    target = RenderTarget::with_size(&texture_creator, width, height)?;
                    buffer = PixelBuffer::with_size(width, height);
                    sky.resize(Viewport::new(width, height), now(options.frozen_at), &mut buffer);
                    last_tick = Instant::now();
                },
                InputEvent::KeyDown(_) => {},
            }
        }

        if last_tick.elapsed() >= interval {
            sky.tick(now(options.frozen_at), &mut buffer);
            last_tick = Instant::now();
        }

        display.present(&mut target, &buffer)?;
        std::thread::sleep(IDLE_SLEEP);
    }

    log::info!("Exiting");
    Ok(())
}
