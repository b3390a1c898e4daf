mod report;

use anyhow::{Context, Result};
use crossterm::tty::IsTty;
use std::env;
use std::io::stdout;
use survival::pipeline::{run, PipelineConfig};
use tracing::info;

use report::Renderer;

/// Names a JSON config file; without it every setting takes its default.
const CONFIG_ENV: &str = "SURVIVAL_CONFIG";

/// Logs go to stderr so stdout carries only the report.
fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config() -> Result<PipelineConfig> {
    match env::var_os(CONFIG_ENV) {
        Some(path) => {
            let config = PipelineConfig::from_file(&path)
                .with_context(|| format!("loading config from {}", path.to_string_lossy()))?;
            info!(path = %path.to_string_lossy(), "using config file");
            Ok(config)
        }
        None => Ok(PipelineConfig::default()),
    }
}

fn main() -> Result<()> {
    init_logging();

    let config = load_config()?;
    let report = run(&config).context("pipeline run failed")?;

    let out = stdout();
    let styled = out.is_tty();
    let mut out = out.lock();
    Renderer::new(styled)
        .render(&report, &mut out)
        .context("writing report")?;
    Ok(())
}
