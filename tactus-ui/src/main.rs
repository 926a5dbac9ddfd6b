mod panes;
mod runtime;
mod ui;

use std::fs::File;
use std::path::PathBuf;

use tactus_audio::CpalToneOutput;
use tactus_core::Config;

use runtime::{AppRuntime, StartupOptions};
use ui::{keybindings, RatatuiBackend};

const USAGE: &str = "usage: tactus [--bpm N] [--mute] [-v|--verbose]";

#[derive(Debug, Default, PartialEq, Eq)]
struct CliArgs {
    verbose: bool,
    help: bool,
    startup: StartupOptions,
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<CliArgs, String> {
    let mut parsed = CliArgs::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-v" | "--verbose" => parsed.verbose = true,
            "-h" | "--help" => parsed.help = true,
            "--mute" => parsed.startup.mute = true,
            "--bpm" => {
                let value = args.next().ok_or("--bpm needs a value")?;
                let bpm = value
                    .parse::<u16>()
                    .map_err(|_| format!("--bpm: '{}' is not a tempo", value))?;
                parsed.startup.bpm = Some(bpm);
            }
            other => return Err(format!("unknown argument '{}'", other)),
        }
    }
    Ok(parsed)
}

fn init_logging(verbose: bool) {
    use simplelog::{LevelFilter, WriteLogger};

    let log_level = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };

    let log_path = dirs::config_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("tactus")
        .join("tactus.log");

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let log_file = match File::create(&log_path) {
        Ok(f) => f,
        Err(_) => match File::create(fallback_log_path()) {
            Ok(f) => f,
            // Terminal belongs to the UI; run without a log rather than print
            Err(_) => return,
        },
    };

    if WriteLogger::init(log_level, simplelog::Config::default(), log_file).is_err() {
        return;
    }
    log::info!("tactus starting (log level: {:?})", log_level);
}

fn fallback_log_path() -> PathBuf {
    std::env::temp_dir().join("tactus.log")
}

fn main() -> std::io::Result<()> {
    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("tactus: {}\n{}", e, USAGE);
            std::process::exit(2);
        }
    };
    if args.help {
        println!("{}", USAGE);
        return Ok(());
    }
    init_logging(args.verbose);

    let config = Config::load();
    let keymap = keybindings::load_keybindings();
    let mut runtime = AppRuntime::new(&config, &args.startup, CpalToneOutput::new(), keymap);

    let mut backend = RatatuiBackend::new()?;
    backend.start()?;

    let result = runtime.run(&mut backend);

    backend.stop()?;
    if let Err(e) = &result {
        log::error!("exiting with error: {}", e);
    }
    result
}
