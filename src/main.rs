use clap::Parser;
use ora_leakcheck::utils::{logger, validation::Validate};
use ora_leakcheck::{
    CliArgs, ConnectParams, FileConfig, Harness, HarnessConfig, OracleSession, Result,
};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();

    // 初始化日誌
    logger::init_logger(args.verbose, args.json_logs);

    tracing::info!("Starting ora-leakcheck");

    // 任何錯誤都直接結束
    if let Err(e) = run(args).await {
        tracing::error!("❌ {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}

async fn run(args: CliArgs) -> Result<()> {
    let file = match &args.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path.display());
            Some(FileConfig::from_file(path)?)
        }
        None => None,
    };

    let config = HarnessConfig::resolve(&args, file)?;
    config.validate()?;

    let params = ConnectParams::parse(&config.dsn)?;
    let max_sessions = params.pool.max_sessions;

    let session = tokio::task::spawn_blocking(move || OracleSession::open(&params)).await??;
    tracing::info!(
        "connect using: standaloneConnection={}, maxSessions={}",
        session.is_standalone(),
        max_sessions
    );
    let session = Arc::new(session);

    if config.skip_ddl {
        tracing::info!("⏭️ Skipping schema provisioning");
    } else {
        let provisioning = Arc::clone(&session);
        tokio::task::spawn_blocking(move || provisioning.provision_schema()).await??;
        tracing::info!("✅ Test type and package created");
    }

    tracing::info!("🔍 Memory probe: {}", config.probe);
    let harness = Harness::new(session, config.probe.build(), config.run);

    let mut summary = harness.run().await?;
    summary.probe = Some(config.probe);
    summary.log();

    if let Some(path) = &config.report_path {
        summary.write_json(path)?;
        tracing::info!("📁 Report saved to: {}", path.display());
    }

    Ok(())
}
