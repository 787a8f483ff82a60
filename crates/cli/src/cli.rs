use crate::tracing::{LogLevel, TracingFormat};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "buildwise")]
#[command(about = "Construction schedule, critical path and deadline risk analysis")]
#[command(long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(
        short = 'l',
        long,
        global = true,
        help = "Set logging level",
        default_value = "warn",
        value_enum
    )]
    pub level: LogLevel,

    #[arg(
        long,
        global = true,
        help = "Log output format",
        default_value = "compact",
        value_enum
    )]
    pub log_format: TracingFormat,

    #[arg(
        short = 'c',
        long,
        global = true,
        env = "BUILDWISE_CONFIG",
        help = "Engine configuration file (TOML)"
    )]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(about = "Run the full analysis and print the project report")]
    Analyze(AnalyzeArgs),
    #[command(about = "Print the deterministic schedule with critical path analytics")]
    Schedule {
        #[arg(long, help = "Floor area, the scale applied to every task duration")]
        area: f64,
        #[command(flatten)]
        output: OutputArgs,
    },
    #[command(about = "Run the Monte Carlo risk simulation")]
    Simulate {
        #[arg(long, help = "Floor area, the scale applied to every task duration")]
        area: f64,
        #[arg(long, help = "Deadline in days")]
        deadline: f64,
        #[command(flatten)]
        simulation: SimulationArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    #[command(about = "Print the active task catalog as TOML")]
    Catalog,
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    #[arg(long, help = "Floor area, the scale applied to every task duration")]
    pub area: f64,
    #[arg(long, default_value_t = 1, help = "Number of floors")]
    pub floors: u32,
    #[arg(long, help = "Deadline in days")]
    pub deadline: u32,
    #[arg(long, help = "Budget in currency units")]
    pub budget: f64,
    #[arg(long, help = "Maximum workers on site on any day")]
    pub workforce_cap: u32,
    #[arg(long, default_value = "template", help = "Executive summary provider")]
    pub provider: String,
    #[command(flatten)]
    pub simulation: SimulationArgs,
    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug, Clone, Copy)]
pub struct SimulationArgs {
    #[arg(long, help = "Number of Monte Carlo trials [default: from config]")]
    pub trials: Option<usize>,
    #[arg(long, help = "Seed for reproducible simulations")]
    pub seed: Option<u64>,
}

#[derive(Args, Debug, Clone, Copy)]
pub struct OutputArgs {
    #[arg(long, help = "Pretty-print JSON output")]
    pub pretty: bool,
}
