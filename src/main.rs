//! Solve a Steiner tree instance, possibly several times to average the running time,
//! and print a report. The report goes to stdout, log messages to stderr.

use clap::Parser;
use kou_steiner::config::{Config, OutputFormat};
use kou_steiner::instance::Instance;
use kou_steiner::report::{measure_time, GraphStatistics, SolveReport};
use kou_steiner::{logging, solve, Algorithm, GenericResult};
use log::info;
use std::path::PathBuf;

#[derive(Parser)]
#[command(version, about = "Exact and Kou et al. approximate Steiner trees")]
struct Cli {
    /// Instance file (plain or PACE format)
    instance: PathBuf,
    /// TOML configuration; flags given here override it
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(short, long, value_enum)]
    algorithm: Option<Algorithm>,
    /// Number of timed runs
    #[arg(short, long)]
    runs: Option<usize>,
    /// Largest node subset the exact search tries
    #[arg(long)]
    max_subset_size: Option<usize>,
    /// Stop the exact search after this many seconds
    #[arg(long)]
    timeout_secs: Option<f64>,
    /// Report format
    #[arg(short, long, value_enum)]
    output: Option<OutputFormat>,
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn into_config(self) -> GenericResult<(PathBuf, Config)> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        if let Some(algorithm) = self.algorithm {
            config.algorithm = algorithm;
        }
        if let Some(runs) = self.runs {
            config.runs = runs;
        }
        if self.max_subset_size.is_some() {
            config.max_subset_size = self.max_subset_size;
        }
        if self.timeout_secs.is_some() {
            config.timeout_secs = self.timeout_secs;
        }
        if let Some(output) = self.output {
            config.output = output;
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
        config.validate()?;
        Ok((self.instance, config))
    }
}

fn main() -> GenericResult<()> {
    let (path, config) = Cli::parse().into_config()?;
    let _logger = logging::init(&config.log_level)?;

    info!("reading instance {}", path.display());
    let instance = Instance::from_file(&path)?;
    let statistics = GraphStatistics::new(&instance.graph, &instance.terminals);

    let mut run_times = Vec::with_capacity(config.runs);
    let mut last = None;
    for run in 0..config.runs {
        let options = config.solve_options();
        let (solution, time) = measure_time(|| {
            solve(
                &instance.graph,
                &instance.terminals,
                config.algorithm,
                &options,
            )
        });
        info!("run {} took {:?}", run + 1, time);
        run_times.push(time);
        last = Some(solution?);
    }
    let solution = last.ok_or("no run was performed")?;

    let report = SolveReport::new(
        config.algorithm,
        solution,
        &run_times,
        statistics,
        instance.terminals,
        instance.optimal_cost,
    );
    match config.output {
        OutputFormat::Text => print!("{}", report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}
