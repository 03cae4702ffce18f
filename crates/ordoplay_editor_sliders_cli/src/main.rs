// SPDX-License-Identifier: MIT OR Apache-2.0
//! `OrdoPlay` Sliders - headless host for the curve slider tools
//!
//! Loads a scene of animation channels, replays a script of slider input
//! against it and prints the resulting curves:
//! - Modal drags with pointer moves, steps and snaps
//! - One-shot slider application
//! - Slider slots with reference markers
//!
//! ## Architecture
//!
//! The host owns a `CurveSet` and plays the role of the editor: it routes
//! scripted input to the `ModalController` and the slot registry from
//! `ordoplay_editor_sliders`.

mod cli;
mod error;
mod report;
mod scene;
mod script;

use clap::Parser;
use cli::Args;
use error::Result;
use ordoplay_editor_sliders::SliderConfig;
use report::Report;
use scene::SceneFile;
use script::{load_script, ScriptRunner};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn run(args: &Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => SliderConfig::load(path)?,
        None => SliderConfig::default(),
    };
    let curves = SceneFile::load(&args.scene)?.into_curves()?;
    tracing::info!(
        "Loaded {} channels from {}",
        curves.channel_count(),
        args.scene.display()
    );

    let mut runner = ScriptRunner::new(curves, config);
    if let Some(path) = &args.script {
        let commands = load_script(path)?;
        tracing::info!("Replaying {} commands from {}", commands.len(), path.display());
        runner.run_all(&commands);
    }

    let report = Report::new(&runner);
    if args.json {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", report.to_text());
    }

    if let Some(path) = &args.output {
        SceneFile::from_curves(&runner.curves).save(path)?;
        tracing::info!("Wrote scene to {}", path.display());
    }
    if let Some(path) = &args.save_config {
        runner.config.save(path)?;
        tracing::info!("Wrote slider config to {}", path.display());
    }
    Ok(())
}

fn main() {
    let args = Args::parse();

    let env_filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(
        args.log_directive()
            .parse()
            .unwrap_or_else(|_| tracing_subscriber::filter::Directive::from(tracing::Level::INFO)),
    );

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting OrdoPlay Sliders v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(&args) {
        tracing::error!("Slider run failed: {e}");
        std::process::exit(1);
    }
}
