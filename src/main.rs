#![forbid(unsafe_code)]

use clap::Parser;
use clap::error::ErrorKind;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

use copt_bench::BenchError;
use copt_bench::core::USAGE;
use copt_bench::run_cmd::{self, OutputFormat, RunArgs};

#[derive(Parser, Debug)]
#[command(name = "copt")]
#[command(about = "Time an unoptimized and an optimized kernel and report the speedup", long_about = USAGE)]
struct Cli {
    /// Enable verbose logging (or set COPT_BENCH_LOG)
    #[arg(long)]
    verbose: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// TOML file with kernel tunables
    #[arg(long)]
    config: Option<std::path::PathBuf>,

    /// Operation: 0 matrix init, 1 array init, 2 factorial, 3 matrix multiply
    #[arg(value_name = "OP", value_parser = clap::value_parser!(u8).range(0..=3))]
    op: u8,

    /// Size parameter for the operation
    #[arg(value_name = "N", value_parser = clap::value_parser!(u32).range(0..=i32::MAX as i64))]
    n: u32,

    /// Number of back-to-back runs per phase
    #[arg(value_name = "LOOP", value_parser = clap::value_parser!(u32).range(1..=i32::MAX as i64))]
    loops: u32,
}

fn init_tracing(verbose: bool) {
    let env = std::env::var("COPT_BENCH_LOG").unwrap_or_else(|_| {
        if verbose { "copt_bench=debug".to_string() } else { "copt_bench=warn".to_string() }
    });
    let _ = tracing_subscriber::fmt()
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_env_filter(EnvFilter::new(env))
        .try_init();
}

fn main() {
    color_eyre::install().ok();
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return;
        }
        Err(e) => {
            print!("{USAGE}");
            eprintln!("{e}");
            std::process::exit(BenchError::Argument(e.to_string()).exit_code());
        }
    };
    init_tracing(cli.verbose);

    let result = run_cmd::run(RunArgs {
        op: cli.op,
        n: cli.n,
        loops: cli.loops,
        format: cli.format,
        config: cli.config,
    });

    if let Err(e) = result {
        eprintln!("{:#}", e);
        std::process::exit(e.exit_code());
    }
}
