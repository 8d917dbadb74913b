use std::{env, error, fs, path::PathBuf, time::SystemTime};

use emu::config::SystemConfig;
use emu::machine::Machine;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: armlet <image> [--steps N] [--config PATH] [--json] [--log-file]";

#[derive(Debug, Default, PartialEq, Eq)]
struct Options {
    image: PathBuf,
    steps: Option<usize>,
    config: Option<PathBuf>,
    json: bool,
    log_file: bool,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Options, String> {
    let mut options = Options::default();
    let mut image = None;
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--steps" => {
                let value = args.next().ok_or("--steps needs a value")?;
                let steps = value
                    .parse()
                    .map_err(|e| format!("invalid step count '{value}': {e}"))?;
                options.steps = Some(steps);
            }
            "--config" => {
                let value = args.next().ok_or("--config needs a path")?;
                options.config = Some(PathBuf::from(value));
            }
            "--json" => options.json = true,
            "--log-file" => options.log_file = true,
            flag if flag.starts_with("--") => return Err(format!("unknown option {flag}")),
            path => {
                if image.replace(PathBuf::from(path)).is_some() {
                    return Err("more than one image given".to_string());
                }
            }
        }
    }

    options.image = image.ok_or("no image given")?;
    Ok(options)
}

/// Logs go to stderr, or to a file in the temp directory with `--log-file`,
/// so stdout only carries the program output and the dumps.
fn init_tracing(log_file: bool) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    if log_file {
        let timestamp = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        let filename = format!("armlet-{timestamp}.log");
        let dir = env::temp_dir();
        println!("Logging to file: {}", dir.join(&filename).display());

        let (writer, guard) =
            tracing_appender::non_blocking(tracing_appender::rolling::never(dir, filename));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(writer)
            .init();
        Some(guard)
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
        None
    }
}

fn load_config(options: &Options) -> Result<SystemConfig, Box<dyn error::Error>> {
    let mut config = match &options.config {
        Some(path) => SystemConfig::from_json(&fs::read_to_string(path)?)?,
        None => SystemConfig::default(),
    };

    if let Some(steps) = options.steps {
        config.step_count = steps;
    }

    Ok(config)
}

fn main() {
    let options = match parse_args(env::args().skip(1)) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("{e}\n{USAGE}");
            std::process::exit(1);
        }
    };

    let _guard = init_tracing(options.log_file);

    let config = match load_config(&options) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("config: {e}");
            std::process::exit(2);
        }
    };

    let image = match fs::read(&options.image) {
        Ok(image) => image,
        Err(e) => {
            eprintln!("{}: {e}", options.image.display());
            std::process::exit(1);
        }
    };

    let mut machine = match Machine::new(&config, &image, Box::new(std::io::stdout())) {
        Ok(machine) => machine,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };

    tracing::info!(
        "running {} for {} steps",
        options.image.display(),
        config.step_count
    );

    for _ in 0..config.step_count {
        if let Err(e) = machine.step() {
            eprintln!("error: {e}");
            std::process::exit(3);
        }

        let state = machine.cpu().state();
        if options.json {
            match serde_json::to_string(state) {
                Ok(line) => println!("{line}"),
                Err(e) => tracing::warn!("could not serialize state: {e}"),
            }
        } else {
            println!("{state}");
        }
    }
}
