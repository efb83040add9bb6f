/*
 * This file is part of Rampcurve.
 *
 * Copyright (C) 2025 Rampcurve contributors
 *
 * Rampcurve is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Rampcurve is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Rampcurve. If not, see <https://www.gnu.org/licenses/>.
 */

//! Command Line Interface
//!
//! Drives a curve editing session headlessly. Every command rebuilds the
//! session from `--width/--height/--points`, applies at most one edit and
//! prints the result as JSON.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rc_core::constants::default_curve;
use rc_core::{
    get_config_path, load_config, save_config, Canvas, CurveEditor, CurveError, CurveListener,
    EngineConfig, MoveOutcome, Point, PointSource,
};
use rc_protocol::{encode_request, Request, RequestEnvelope, CMD_STATE_LEN};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "rampcurve")]
#[command(version)]
#[command(about = "Rampcurve - monotonic response curve editor")]
#[command(long_about = "Rampcurve - monotonic response curve editor

Edits a rising curve through a handful of control points and serializes
it as the percentage string and 10-entry cmd_state that a response
ramp (volume, brightness) is driven from.

EXAMPLES:
    rampcurve encode --points \"47,40;60,60;70,90\"
    rampcurve encode --preset ease-in --request
    rampcurve sample --points \"47,40\" --x 150
    rampcurve markers --preset smooth --y 40 --y 100
    rampcurve insert --x 150 --y 80
    rampcurve move --points \"47,40;60,60\" --index 1 --x 120 --y 100
    rampcurve remove --points \"47,40;60,60\" --index 2
    rampcurve config show

ENVIRONMENT VARIABLES:
    RUST_LOG=debug         Enable debug logging
    XDG_CONFIG_HOME        Override the config directory

FILES:
    ~/.config/rampcurve/config.json       Engine configuration")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Log engine decisions at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Engine config file (defaults to ~/.config/rampcurve/config.json)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Canvas and starting curve shared by every editing command
#[derive(Args, Debug, Clone)]
pub struct CurveArgs {
    /// Canvas width in pixels
    #[arg(long, default_value_t = 300.0)]
    pub width: f64,

    /// Canvas height in pixels
    #[arg(long, default_value_t = 150.0)]
    pub height: f64,

    /// Interior points as percentages, "x,y;x,y"
    #[arg(long, conflicts_with = "preset")]
    pub points: Option<String>,

    /// Start from a built-in curve instead of --points
    #[arg(long, value_enum)]
    pub preset: Option<Preset>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Linear,
    EaseIn,
    EaseOut,
    Smooth,
}

impl Preset {
    pub fn percentages(self) -> &'static str {
        match self {
            Preset::Linear => default_curve::LINEAR,
            Preset::EaseIn => default_curve::EASE_IN,
            Preset::EaseOut => default_curve::EASE_OUT,
            Preset::Smooth => default_curve::SMOOTH,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serialize a curve to cmd_state and percentage string
    Encode {
        #[command(flatten)]
        curve: CurveArgs,
        /// Print the SetCurve request line sent to the server instead
        #[arg(long)]
        request: bool,
    },

    /// Look up the curve point at a pixel x or y
    Sample {
        #[command(flatten)]
        curve: CurveArgs,
        #[arg(
            long,
            allow_negative_numbers = true,
            conflicts_with = "y",
            required_unless_present = "y"
        )]
        x: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        y: Option<f64>,
    },

    /// Curve points at the positions cmd_state is sampled at
    Markers {
        #[command(flatten)]
        curve: CurveArgs,
        /// Mark the curve at these pixel heights instead
        #[arg(long = "y", value_name = "Y", allow_negative_numbers = true)]
        ys: Vec<f64>,
    },

    /// Dense polyline and line width for rendering
    Stroke {
        #[command(flatten)]
        curve: CurveArgs,
    },

    /// Tap at a pixel location to insert a point
    Insert {
        #[command(flatten)]
        curve: CurveArgs,
        #[arg(long, allow_negative_numbers = true)]
        x: f64,
        #[arg(long, allow_negative_numbers = true)]
        y: f64,
    },

    /// Drag the point at an index to a pixel location
    Move {
        #[command(flatten)]
        curve: CurveArgs,
        /// Index in the full point list (0 is the start point)
        #[arg(long)]
        index: usize,
        #[arg(long, allow_negative_numbers = true)]
        x: f64,
        #[arg(long, allow_negative_numbers = true)]
        y: f64,
    },

    /// Remove the interior point at an index
    Remove {
        #[command(flatten)]
        curve: CurveArgs,
        #[arg(long)]
        index: usize,
    },

    /// Engine configuration
    #[command(subcommand, about = "Show or create the engine configuration")]
    Config(ConfigCommands),
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration as JSON
    Show,
    /// Print the config file path
    Path,
    /// Write the default configuration
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Serialized curve plus the control points it came from
#[derive(Debug, Serialize)]
pub struct CurveReport {
    pub cmd_state: Vec<u8>,
    pub auxiliary_curve: String,
    pub points: Vec<Point>,
}

impl CurveReport {
    fn from_editor(editor: &CurveEditor) -> Self {
        let payload = editor.serialize();
        Self {
            cmd_state: payload.cmd_state,
            auxiliary_curve: payload.auxiliary_curve,
            points: editor.points(),
        }
    }
}

/// Result of a single edit
#[derive(Debug, Serialize)]
pub struct EditReport {
    pub outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Number of change notifications the edit produced
    pub notifications: usize,
    pub curve: CurveReport,
}

/// Logs every change and counts them for the edit report
struct LogListener {
    count: std::rc::Rc<std::cell::Cell<usize>>,
}

impl CurveListener for LogListener {
    fn on_curve_changed(&self, cmd_state: [u8; CMD_STATE_LEN], auxiliary_curve: &str) {
        self.count.set(self.count.get() + 1);
        info!("Curve changed: cmd_state {:?}, points {:?}", cmd_state, auxiliary_curve);
    }
}

// ============================================================================
// CLI Execution
// ============================================================================

pub fn execute(cli: &Cli) -> anyhow::Result<Value> {
    let config_path = cli.config.clone().unwrap_or_else(get_config_path);

    match &cli.command {
        Commands::Config(sub) => cmd_config(sub, &config_path),
        Commands::Encode { curve, request } => {
            let editor = open_editor(curve, &config_path)?;
            cmd_encode(&editor, *request)
        }
        Commands::Sample { curve, x, y } => {
            let editor = open_editor(curve, &config_path)?;
            let point = match (x, y) {
                (Some(x), _) => editor.sample_at_x(*x),
                (None, Some(y)) => editor.sample_at_y(*y),
                (None, None) => bail!("either --x or --y is required"),
            };
            Ok(json!({ "point": point }))
        }
        Commands::Markers { curve, ys } => {
            let editor = open_editor(curve, &config_path)?;
            let markers = if ys.is_empty() {
                editor.cmd_state_markers()
            } else {
                editor.sample_markers_y(ys)
            };
            Ok(json!({ "markers": markers }))
        }
        Commands::Stroke { curve } => {
            let editor = open_editor(curve, &config_path)?;
            Ok(serde_json::to_value(editor.stroke())?)
        }
        Commands::Insert { curve, x, y } => {
            let mut editor = open_editor(curve, &config_path)?;
            edit(&mut editor, |editor| match editor.insert(Point::new(*x, *y)) {
                Ok(id) => ("inserted", editor.index_of(id).map(|i| format!("index {}", i))),
                Err(rejection) => ("rejected", Some(rejection.to_string())),
            })
        }
        Commands::Move { curve, index, x, y } => {
            let mut editor = open_editor(curve, &config_path)?;
            edit(&mut editor, |editor| match editor.try_move(*index, Point::new(*x, *y)) {
                MoveOutcome::Moved => ("moved", None),
                MoveOutcome::Removed(id) => {
                    ("removed", Some(format!("point {} left its cell", id)))
                }
                MoveOutcome::Rejected => ("rejected", None),
            })
        }
        Commands::Remove { curve, index } => {
            let mut editor = open_editor(curve, &config_path)?;
            edit(&mut editor, |editor| {
                if editor.remove(*index) {
                    ("removed", None)
                } else {
                    ("rejected", Some(format!("index {} is not an interior point", index)))
                }
            })
        }
    }
}

fn open_editor(args: &CurveArgs, config_path: &Path) -> anyhow::Result<CurveEditor> {
    let config = load_config(config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;
    let percentages = match (&args.points, args.preset) {
        (Some(points), _) => points.as_str(),
        (None, Some(preset)) => preset.percentages(),
        (None, None) => default_curve::LINEAR,
    };

    debug!("Opening {}x{} editor with points {:?}", args.width, args.height, percentages);
    let editor = CurveEditor::with_points(
        Canvas::new(args.width, args.height),
        config,
        PointSource::Percentages(percentages),
    )?;
    Ok(editor)
}

fn edit<F>(editor: &mut CurveEditor, apply: F) -> anyhow::Result<Value>
where
    F: FnOnce(&mut CurveEditor) -> (&'static str, Option<String>),
{
    let count = std::rc::Rc::new(std::cell::Cell::new(0));
    editor.subscribe(Box::new(LogListener { count: count.clone() }));

    let (outcome, reason) = apply(editor);
    let report = EditReport {
        outcome,
        reason,
        notifications: count.get(),
        curve: CurveReport::from_editor(editor),
    };
    Ok(serde_json::to_value(report)?)
}

fn cmd_encode(editor: &CurveEditor, request: bool) -> anyhow::Result<Value> {
    if !request {
        return Ok(serde_json::to_value(CurveReport::from_editor(editor))?);
    }

    let envelope = RequestEnvelope::new(Request::SetCurve(editor.serialize()));
    let line = encode_request(&envelope).map_err(CurveError::protocol)?;
    Ok(serde_json::from_str(&line)?)
}

// ============================================================================
// Config Commands
// ============================================================================

fn cmd_config(cmd: &ConfigCommands, path: &Path) -> anyhow::Result<Value> {
    match cmd {
        ConfigCommands::Show => {
            let config = load_config(path)?;
            Ok(serde_json::to_value(config)?)
        }
        ConfigCommands::Path => Ok(json!({ "path": path })),
        ConfigCommands::Init { force } => {
            if path.exists() && !force {
                bail!("{} already exists, use --force to overwrite", path.display());
            }
            save_config(path, &EngineConfig::default())?;
            info!("Wrote default config to {}", path.display());
            Ok(json!({ "path": path, "written": true }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("rampcurve").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_encode_with_preset() {
        let cli = parse(&["encode", "--preset", "ease-in", "--request"]);
        match cli.command {
            Commands::Encode { curve, request } => {
                assert_eq!(curve.preset, Some(Preset::EaseIn));
                assert!(request);
                assert_eq!(curve.width, 300.0);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_points_conflict_with_preset() {
        let result = Cli::try_parse_from([
            "rampcurve", "encode", "--points", "50,50", "--preset", "smooth",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_markers_take_repeated_heights() {
        let cli = parse(&["markers", "--y", "40", "--y", "-1"]);
        assert!(matches!(cli.command, Commands::Markers { ref ys, .. } if ys == &[40.0, -1.0]));
    }

    #[test]
    fn test_long_help_names_the_ramp() {
        use clap::CommandFactory;

        let about = Cli::command().get_long_about().map(|s| s.to_string()).unwrap_or_default();
        assert!(about.contains("volume, brightness"));
    }

    #[test]
    fn test_sample_requires_an_axis() {
        assert!(Cli::try_parse_from(["rampcurve", "sample"]).is_err());
        assert!(Cli::try_parse_from(["rampcurve", "sample", "--x", "1", "--y", "2"]).is_err());
        let cli = parse(&["sample", "--y", "-3"]);
        assert!(matches!(cli.command, Commands::Sample { y: Some(y), .. } if y == -3.0));
    }

    #[test]
    fn test_presets_are_valid_curves() {
        for preset in [Preset::Linear, Preset::EaseIn, Preset::EaseOut, Preset::Smooth] {
            let editor = CurveEditor::with_points(
                Canvas::new(300.0, 150.0),
                EngineConfig::default(),
                PointSource::Percentages(preset.percentages()),
            );
            assert!(editor.is_ok(), "{:?}", preset);
        }
    }
}
