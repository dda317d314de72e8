use crate::utils::probe::ProbeKind;
use clap::Parser;
use std::path::PathBuf;

/// Command line, with environment fallbacks for the run parameters.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "ora-leakcheck")]
#[command(about = "Stress-test Oracle object-type binds and watch process memory for leaks")]
pub struct CliArgs {
    /// Connection descriptor (URL, logfmt or user/password@connect_string)
    #[arg(long, env = "LEAKCHECK_DSN", hide_env_values = true)]
    pub dsn: Option<String>,

    /// Number of iterations
    #[arg(long, env = "RUNS")]
    pub runs: Option<usize>,

    /// Sample memory every N iterations
    #[arg(long, env = "STEP")]
    pub step: Option<usize>,

    /// Concurrent calls per iteration
    #[arg(long, env = "WORKERS")]
    pub workers: Option<usize>,

    /// Memory probe strategy
    #[arg(long, env = "PROBE", value_enum)]
    pub probe: Option<ProbeKind>,

    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Write the run summary as JSON to this path
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Do not create the test type and package
    #[arg(long)]
    pub skip_ddl: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let args = CliArgs::try_parse_from([
            "ora-leakcheck",
            "--dsn",
            "scott/tiger@db",
            "--runs",
            "50",
            "--step",
            "5",
            "--workers",
            "3",
            "--probe",
            "sysinfo",
            "--skip-ddl",
        ])
        .unwrap();

        assert_eq!(args.dsn.as_deref(), Some("scott/tiger@db"));
        assert_eq!(args.runs, Some(50));
        assert_eq!(args.step, Some(5));
        assert_eq!(args.workers, Some(3));
        assert_eq!(args.probe, Some(ProbeKind::Sysinfo));
        assert!(args.skip_ddl);
        assert!(!args.json_logs);
    }

    #[test]
    fn test_rejects_unknown_probe() {
        assert!(CliArgs::try_parse_from(["ora-leakcheck", "--probe", "smaps"]).is_err());
    }
}
