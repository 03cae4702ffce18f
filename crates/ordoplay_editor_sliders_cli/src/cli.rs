// SPDX-License-Identifier: MIT OR Apache-2.0
//! Command line arguments.

use clap::Parser;
use std::path::PathBuf;

/// Replay curve slider scripts against a saved set of animation curves
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Scene file (RON) with channels, keys and selection
    #[arg(value_name = "SCENE")]
    pub scene: PathBuf,

    /// Script file (RON) with slider commands to replay
    #[arg(short = 's', long = "script", value_name = "SCRIPT")]
    pub script: Option<PathBuf>,

    /// Slider configuration (RON); defaults are used when omitted
    #[arg(short = 'c', long = "config", value_name = "CONFIG")]
    pub config: Option<PathBuf>,

    /// Write the resulting scene to this file
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Save the final slider configuration to this file
    #[arg(long = "save-config", value_name = "FILE")]
    pub save_config: Option<PathBuf>,

    /// Print the report as JSON instead of text
    #[arg(long = "json")]
    pub json: bool,

    /// Increase logging verbosity (default: info, -v: debug, -vv+: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

impl Args {
    /// Log filter directive for the slider crates
    pub fn log_directive(&self) -> &'static str {
        match self.verbosity {
            0 => "ordoplay_editor_sliders=info",
            1 => "ordoplay_editor_sliders=debug",
            _ => "ordoplay_editor_sliders=trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_args() {
        let args = Args::parse_from(["ordoplay_sliders", "scene.ron", "-s", "drag.ron", "--json", "-vv"]);
        assert_eq!(args.scene, PathBuf::from("scene.ron"));
        assert_eq!(args.script, Some(PathBuf::from("drag.ron")));
        assert!(args.json);
        assert_eq!(args.log_directive(), "ordoplay_editor_sliders=trace");
    }
}
