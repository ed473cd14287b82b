use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use comet_orbit::config::AppConfig;
use comet_orbit::input::read_parameters;
use comet_orbit::messages;
use comet_orbit::output::resolve_artifacts;
use comet_orbit::pipeline;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let config = AppConfig::embedded()?;

    println!("{}", messages::BANNER);
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let params = read_parameters(&config.defaults, &mut stdin.lock(), &mut stdout)
        .context("failed to read orbit parameters")?;
    info!(
        r0 = params.r0(),
        v0 = params.v0(),
        alpha = params.alpha(),
        "parameters accepted"
    );

    println!("{}", messages::COMPUTING);
    stdout.flush()?;

    let artifacts = resolve_artifacts(Path::new("."), &config.output);
    match pipeline::run(&params, &config, &artifacts) {
        Ok(report) => {
            info!(
                samples = report.samples,
                frames = report.frames,
                non_drawable = report.non_drawable_samples,
                "run complete"
            );
            println!("{}", messages::orbit_summary(&report.orbit));
            println!("{}", messages::SUCCESS);
        }
        Err(err) => {
            error!(error = %err, "run failed");
            println!("{}", messages::failure(&err));
            println!("{}", messages::RETRY_HINT);
        }
    }

    Ok(())
}
