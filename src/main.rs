//! Command-line front end: gather parameters, run one simulation, print the report.

use clap::Parser;
use mmone::logging::init_logging;
use mmone::{Config, Simulation};

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

/// Simulate a single-server FIFO queue with exponential arrivals and service.
///
/// Parameters missing from both the flags and the config file are prompted for on stdin.
#[derive(Parser, Debug)]
#[command(name = "mmone", version, about)]
struct Cli {
    /// TOML file with arrival_rate, service_rate, horizon and optionally capacity and seed. Flags override it.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Customers arriving per time unit
    #[arg(short, long)]
    arrival_rate: Option<f64>,

    /// Customers served per time unit while the server is busy
    #[arg(short, long)]
    service_rate: Option<f64>,

    /// Simulated time at which the run stops
    #[arg(short = 't', long)]
    horizon: Option<f64>,

    /// Maximum number of waiting customers before the run aborts
    #[arg(long)]
    capacity: Option<usize>,

    /// Seed for the random generator; omitted means seed from entropy
    #[arg(long)]
    seed: Option<u64>,

    /// Print the report as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Log level for diagnostics on stderr; RUST_LOG takes precedence
    #[arg(long, default_value = "warn")]
    log_level: String,
}

/// Values collected so far; any of the three core parameters may still be missing.
#[derive(Debug, Default)]
struct Partial {
    arrival_rate: Option<f64>,
    service_rate: Option<f64>,
    horizon: Option<f64>,
    capacity: Option<usize>,
    seed: Option<u64>,
}

impl Partial {
    fn from_cli(cli: &Cli) -> mmone::Result<Self> {
        let mut partial = match &cli.config {
            Some(path) => {
                let config = Config::load(path)?;
                Self {
                    arrival_rate: Some(config.arrival_rate),
                    service_rate: Some(config.service_rate),
                    horizon: Some(config.horizon),
                    capacity: Some(config.capacity),
                    seed: config.seed,
                }
            },
            None => Self::default(),
        };

        partial.arrival_rate = cli.arrival_rate.or(partial.arrival_rate);
        partial.service_rate = cli.service_rate.or(partial.service_rate);
        partial.horizon = cli.horizon.or(partial.horizon);
        partial.capacity = cli.capacity.or(partial.capacity);
        partial.seed = cli.seed.or(partial.seed);
        Ok(partial)
    }

    /// Prompt for whatever is missing, then build the config.
    fn complete<R, W>(self, input: &mut R, output: &mut W) -> mmone::Result<Config>
    where
        R: BufRead,
        W: Write,
    {
        let arrival_rate = match self.arrival_rate {
            Some(rate) => rate,
            None => prompt(input, output, "Enter arrival rate  (customers per time unit, e.g. 0.5): ")?,
        };
        let service_rate = match self.service_rate {
            Some(rate) => rate,
            None => prompt(input, output, "Enter service rate  (customers per time unit, e.g. 0.7): ")?,
        };
        let horizon = match self.horizon {
            Some(horizon) => horizon,
            None => prompt(input, output, "Enter total simulation time (e.g. 1000): ")?,
        };

        let mut config = Config::new(arrival_rate, service_rate, horizon);
        if let Some(capacity) = self.capacity {
            config = config.with_capacity(capacity);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        Ok(config)
    }
}

/// Ask for a number until one parses. End of input counts as an I/O error.
fn prompt<R, W>(input: &mut R, output: &mut W, message: &str) -> mmone::Result<f64>
where
    R: BufRead,
    W: Write,
{
    loop {
        write!(output, "{message}")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input ended before all parameters were given").into());
        }
        match line.trim().parse() {
            Ok(value) => return Ok(value),
            Err(_) => writeln!(output, "'{}' is not a number.", line.trim())?,
        }
    }
}

fn run(cli: &Cli) -> mmone::Result {
    let partial = Partial::from_cli(cli)?;
    let config = partial.complete(&mut io::stdin().lock(), &mut io::stdout().lock())?;

    let report = Simulation::from_config(&config)?.run()?;
    if cli.json {
        // serializing plain numbers and bools cannot fail
        let json = serde_json::to_string_pretty(&report).unwrap_or_default();
        println!("{json}");
    } else {
        println!("\n{report}");
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "simulation did not complete");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        },
    }
}
