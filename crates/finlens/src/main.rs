use std::num::NonZeroU32;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::WrapErr;
use finlens::util::io::atomic_write;
use finlens::{OutputFormat, Overrides, PolicyPreset, Report, Settings, init_logging, load_document};

#[derive(Parser, Debug)]
#[command(name = "finlens")]
#[command(about = "Anomaly detection, net worth and wealth projection for financial documents")]
struct Args {
    /// Path to the data directory (default: ~/.finlens/)
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Path to the config file (default: <data dir>/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, global = true, default_value = "info")]
    log_level: String,

    /// Write the report to this file instead of stdout
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Flag unusual debit transactions
    Anomalies {
        document: PathBuf,

        /// Detection preset; individual flags below override it
        #[arg(long, value_enum)]
        policy: Option<PolicyPreset>,

        /// Absolute z-score above which an amount is unusual
        #[arg(long)]
        threshold: Option<f64>,

        /// Expected fraction of outliers for the isolation forest
        #[arg(long)]
        contamination: Option<f64>,
    },
    /// Net worth, holdings breakdown and cash flow
    Summary {
        document: PathBuf,

        /// Months of transactions the document covers
        #[arg(long)]
        months: Option<NonZeroU32>,
    },
    /// Monte Carlo and scenario projections of net worth
    Project {
        document: PathBuf,

        #[arg(long)]
        years: Option<usize>,

        #[arg(long)]
        simulations: Option<usize>,

        #[arg(long)]
        seed: Option<u64>,
    },
}

impl Command {
    fn document(&self) -> &PathBuf {
        match self {
            Command::Anomalies { document, .. }
            | Command::Summary { document, .. }
            | Command::Project { document, .. } => document,
        }
    }

    fn overrides(&self) -> Overrides {
        match *self {
            Command::Anomalies {
                policy,
                threshold,
                contamination,
                ..
            } => Overrides {
                policy,
                threshold,
                contamination,
                ..Default::default()
            },
            Command::Summary { months, .. } => Overrides {
                months,
                ..Default::default()
            },
            Command::Project {
                years,
                simulations,
                seed,
                ..
            } => Overrides {
                years,
                simulations,
                seed,
                ..Default::default()
            },
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".finlens")
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    init_logging(&args.log_level)?;

    let data_dir = args.data_dir.unwrap_or_else(default_data_dir);
    let config_path = args.config.unwrap_or_else(|| Settings::path(&data_dir));
    let mut settings = Settings::load(&config_path)
        .wrap_err_with(|| format!("failed to load config {}", config_path.display()))?;
    settings.apply(&args.command.overrides());

    let document = load_document(args.command.document())?;

    let report = match args.command {
        Command::Anomalies { .. } => Report::Anomalies(finlens_core::detect_anomalies_with(
            &document,
            &settings.detection,
        )?),
        Command::Summary { .. } => Report::Summary(finlens_core::summarize(
            &document,
            settings.cash_flow.observation_months,
        )?),
        Command::Project { .. } => Report::Projection(finlens_core::project_wealth(
            &document,
            &settings.projection_params(),
        )?),
    };

    let rendered = report.render(args.format)?;
    match args.output {
        Some(path) => {
            atomic_write(&path, &rendered)
                .wrap_err_with(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "report written");
        }
        None => print!("{rendered}"),
    }

    Ok(())
}
