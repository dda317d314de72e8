use anyhow::Context;
use clap::Parser;
use ora_leakcheck::trace;
use ora_leakcheck::utils::logger;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "odpi-trace")]
#[command(about = "List ODPI-C/OCI allocations that were never freed in a DPI_DEBUG_LEVEL trace")]
struct Args {
    /// Path to the trace log
    log_file: PathBuf,

    /// Print the full report as JSON instead of one line per allocation
    #[arg(long)]
    json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    logger::init_cli_logger(args.verbose);

    let report = trace::analyze_file(&args.log_file)
        .with_context(|| format!("failed to analyze {}", args.log_file.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for allocation in &report.outstanding {
        println!("{} -> size {}", allocation.address, allocation.size);
    }

    tracing::info!(
        "📊 {} allocation(s), {} free(s), {} outstanding ({} bytes), {} unmatched free(s)",
        report.allocations,
        report.frees,
        report.outstanding.len(),
        report.outstanding_bytes(),
        report.unmatched_frees.len()
    );

    Ok(())
}
