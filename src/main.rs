//! hstats - Host latency ranking CLI
//!
//! Reads a whitespace-separated host list, pings every host through a
//! bounded worker pool and prints the hosts ranked from fastest to slowest.

use clap::Parser;
use hstats::{
    cli::Cli,
    config::parser::{display_config_summary, load_config},
    error::{install_panic_hook, AppError, ErrorReporter, Result},
    executor::{DispatchEngine, ExecutionConfig},
    input::{read_hosts, HostSource},
    logging::{Logger, ProbeLogger},
    output::{write_report, OutputFormatterFactory},
    probe::Pinger,
    stats::{rank, RunSummary},
    build_info, Config, PKG_NAME, VERSION,
};
use std::process;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() {
    install_panic_hook();

    // Parse command line arguments
    let cli = Cli::parse();
    let reporter = ErrorReporter::new(cli.use_colors(), cli.verbose || cli.debug);

    if let Err(e) = run_application(cli).await {
        reporter.report_error(&e);
        process::exit(e.exit_code());
    }
}

/// Main application logic
async fn run_application(cli: Cli) -> Result<()> {
    if cli.debug {
        eprintln!("{} v{} ({})", PKG_NAME, VERSION, build_info::TARGET_TRIPLE);
        eprintln!("Built: {}  Commit: {}", build_info::BUILD_TIME, build_info::GIT_COMMIT.unwrap_or("unknown"));
        eprintln!();
    }

    // Load and validate configuration
    let config = load_config(cli)?;
    colored::control::set_override(config.enable_color);

    let logger = Logger::with_config("hstats", &config);
    if config.debug {
        eprintln!("Configuration loaded successfully:");
        eprintln!("{}", display_config_summary(&config));
        eprintln!();
    }

    // Setup failures abort before any host is probed
    let pinger = Pinger::locate(&config.probe_program, config.platform_format(), config.timeout())?;
    logger.debug("Probe program located")
        .field("path", pinger.path().display().to_string())
        .field("platform", config.platform_format().as_str())
        .log();

    let source = HostSource::from_arg(&config.infile);
    let hosts = read_hosts(&source)?;
    logger.info("Hosts loaded")
        .field("source", source.describe())
        .field("hosts", hosts.len())
        .log();

    let cancel = CancellationToken::new();
    spawn_interrupt_handler(cancel.clone(), logger.clone());

    let engine = DispatchEngine::new(
        Arc::new(pinger),
        ExecutionConfig::from(&config),
        ProbeLogger::new(&config),
    );
    let report = engine.dispatch(&hosts, cancel).await?;

    let ranked = rank(report.stats());
    let formatter = OutputFormatterFactory::create(config.output_format, config.enable_color);
    write_report(formatter.as_ref(), &ranked, &mut std::io::stdout().lock())?;

    if config.verbose || config.debug {
        print_summary(&config, &RunSummary::from_ranked(&ranked), report.elapsed.as_secs_f64());
    }

    if report.cancelled {
        return Err(AppError::cancelled(format!(
            "interrupted after {} of {} hosts",
            report.len(),
            hosts.len()
        )));
    }

    Ok(())
}

/// Cancel the run on Ctrl-C
fn spawn_interrupt_handler(cancel: CancellationToken, logger: Logger) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            logger.warn("Interrupt received, stopping probes").log();
            cancel.cancel();
        }
    });
}

/// Run summary on stderr, after the report
fn print_summary(config: &Config, summary: &RunSummary, elapsed_secs: f64) {
    eprintln!();
    eprintln!("Summary:");
    eprintln!("  Hosts probed: {}", summary.hosts);
    eprintln!("  Reachable: {} ({:.1}%)", summary.reachable, summary.success_rate());
    eprintln!("  Unreachable: {}", summary.unreachable);
    if let Some(best) = &summary.best_host {
        eprintln!("  Fastest host: {}", best);
    }
    if let Some(median) = summary.median_avg_ms {
        eprintln!("  Median average: {:.2}ms", median);
    }
    eprintln!("  Concurrency: {}  Count: {}", config.concurrency, config.probe_count);
    eprintln!("  Elapsed: {:.2}s", elapsed_secs);
}
