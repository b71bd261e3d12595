use spindlesim::{SessionConfig, ViewConfig};
use spindlesim::run_viewer;
use spindlesim::{bench_particles, bench_pressure_field};

use anyhow::{bail, Context, Result};
use clap::Parser;

use std::path::PathBuf;

#[derive(Parser, Debug)]
struct Args {
    /// Session file under scenarios/
    #[arg(short, default_value = "default.yaml")]
    file_name: String,

    /// Override the starting view
    #[arg(long, value_parser = ["2d", "3d"])]
    view: Option<String>,

    /// Run the timing harness instead of opening a window
    #[arg(long)]
    bench: bool,
}

// load here to keep main clean
fn load_session_from_yaml(args: &Args) -> Result<SessionConfig> {
    let config_path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(&args.file_name);
    let session_cfg = SessionConfig::load(&config_path)
        .with_context(|| format!("failed to load session {}", config_path.display()))?;

    Ok(session_cfg)
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.bench {
        bench_particles();
        bench_pressure_field();
        return Ok(());
    }

    let mut session_cfg = load_session_from_yaml(&args)?;
    match args.view.as_deref() {
        Some("2d") => session_cfg.engine.view = ViewConfig::CrossSection,
        Some("3d") => session_cfg.engine.view = ViewConfig::Scene,
        _ => {}
    }

    let exit = run_viewer(&session_cfg);
    if exit.is_error() {
        bail!("viewer exited with {exit:?}");
    }

    Ok(())
}
