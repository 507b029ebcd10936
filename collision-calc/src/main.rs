use std::process::ExitCode;

use clap::Parser;
use collision_calc::{
    Error, ModeArg, OutputFormat, Report, Settings, exit_code, run_interactive, write_report,
};
use collision_estimator::{DEFAULT_DECIMAL_PRECISION, DEFAULT_EXACT_CUTOFF, NumericPolicy};
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "collision-calc")]
#[command(about = "Estimate the probability of a hash collision")]
struct Args {
    /// Number of possible hash values, as a bit length or a count (see --bucket-mode)
    #[arg(short, long, default_value = "64")]
    buckets: String,

    /// How --buckets is interpreted
    #[arg(long, value_enum, default_value_t = ModeArg::Bits)]
    bucket_mode: ModeArg,

    /// Number of hashes drawn, as a count or a bit length (see --hash-mode)
    #[arg(short = 'n', long, default_value = "1000000")]
    hashes: String,

    /// How --hashes is interpreted
    #[arg(long, value_enum, default_value_t = ModeArg::Count)]
    hash_mode: ModeArg,

    /// Largest hash count computed with the exact product
    #[arg(short = 'c', long, default_value_t = DEFAULT_EXACT_CUTOFF)]
    exact_cutoff: u64,

    /// Significant decimal digits carried through the arithmetic (1-9999)
    #[arg(short, long, default_value_t = DEFAULT_DECIMAL_PRECISION)]
    precision: usize,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Also print the full decimal value
    #[arg(long)]
    raw: bool,

    /// Read `<buckets> <hashes>` lines and settings commands from stdin
    #[arg(short, long)]
    interactive: bool,

    /// Log filter, e.g. `debug` or `collision_estimator=debug`
    #[arg(long, default_value = "warn")]
    log: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&args.log))
        .with_writer(std::io::stderr)
        .init();

    match run(args).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<ExitCode, Error> {
    let settings = Settings {
        bucket_mode: args.bucket_mode.into(),
        hash_mode: args.hash_mode.into(),
        policy: NumericPolicy { exact_cutoff: args.exact_cutoff, decimal_precision: args.precision },
    };
    let mut stdout = std::io::stdout();

    if args.interactive {
        settings.policy.validate()?;
        tracing::info!(settings = %settings.summary(), "starting interactive session");

        let stdin = BufReader::new(tokio::io::stdin());
        run_interactive(stdin, &mut stdout, settings, args.format, args.raw).await?;
        return Ok(ExitCode::SUCCESS);
    }

    let calculation = settings.calculate(&args.buckets, &args.hashes);
    let report =
        Report::new(calculation.buckets.clone(), calculation.hashes.clone(), &calculation.result);
    write_report(&mut stdout, args.format, &report, &calculation.result, args.raw)?;

    Ok(ExitCode::from(exit_code(&calculation.result)))
}
