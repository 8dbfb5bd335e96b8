//! display-probe: adjacency report for a described monitor arrangement.
//!
//! # Usage
//!
//! ```text
//! display-probe [OPTIONS] <ARRANGEMENT>
//!
//! Arguments:
//!   <ARRANGEMENT>  Path to the arrangement TOML file
//!
//! Options:
//!   --zero-touch   Treat flush (zero-gap) edges as touching
//!   --json         Print the report as JSON instead of text
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable                   | Description                                  |
//! |----------------------------|----------------------------------------------|
//! | `DISPLAY_PROBE_ZERO_TOUCH` | `--zero-touch`; `1`/`true`/`yes`/`on` or off |
//! | `RUST_LOG`                 | Log filter; overrides `[probe] log_level`    |
//!
//! `--zero-touch` only ever turns the flag on; a file with
//! `treat_zero_as_touching = true` cannot be overridden back to off.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use display_probe::application::run_probe;
use display_probe::infrastructure::{load_arrangement, ArrangementConfig};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Reports which monitors of an arrangement touch, and how far apart the rest
/// are.
#[derive(Debug, Parser)]
#[command(
    name = "display-probe",
    about = "Adjacency report for a described physical monitor arrangement",
    version
)]
struct Cli {
    /// Path to the arrangement TOML file.
    arrangement: PathBuf,

    /// Treat edges with an exactly zero gap as touching.
    #[arg(
        long,
        env = "DISPLAY_PROBE_ZERO_TOUCH",
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    zero_touch: bool,

    /// Print the report as pretty JSON.
    #[arg(long)]
    json: bool,
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Program entry point.
///
/// # What happens at startup
///
/// 1. CLI arguments are parsed with `clap`.
/// 2. The arrangement file is loaded; its `[probe] log_level` becomes the
///    default log filter.
/// 3. `tracing_subscriber` is initialised.  `RUST_LOG`, when set, wins.
/// 4. The probe runs and the report goes to stdout.
fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_arrangement(&cli.arrangement)
        .with_context(|| format!("failed to load arrangement {}", cli.arrangement.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.probe.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    print!("{}", render(&cli, &config)?);

    info!("display-probe finished");
    Ok(())
}

/// Runs the probe for a loaded arrangement and renders the report as text or
/// pretty JSON.  Logs the arrangement summary, so call it once the
/// subscriber is installed.
fn render(cli: &Cli, config: &ArrangementConfig) -> anyhow::Result<String> {
    let treat_zero_as_touching = cli.zero_touch || config.probe.treat_zero_as_touching;
    debug!(
        arrangement = %cli.arrangement.display(),
        adapters = config.adapters.len(),
        monitors = config.monitors().count(),
        treat_zero_as_touching,
        "loaded arrangement"
    );

    let report =
        run_probe(config, treat_zero_as_touching).context("failed to probe arrangement")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&report).context("failed to encode report")?;
        Ok(format!("{json}\n"))
    } else {
        Ok(report.to_string())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_requires_arrangement_path() {
        let result = Cli::try_parse_from(["display-probe"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_defaults_flags_off() {
        // Arrange: only the positional argument
        let cli = Cli::parse_from(["display-probe", "desk.toml"]);

        // Assert
        assert_eq!(cli.arrangement, PathBuf::from("desk.toml"));
        assert!(!cli.json);
    }

    #[test]
    fn test_cli_zero_touch_flag() {
        let cli = Cli::parse_from(["display-probe", "--zero-touch", "desk.toml"]);
        assert!(cli.zero_touch);
    }

    #[test]
    fn test_cli_json_flag() {
        let cli = Cli::parse_from(["display-probe", "desk.toml", "--json"]);
        assert!(cli.json);
    }

    #[test]
    fn test_cli_zero_touch_env_accepts_boolish_values() {
        // Arrange: the only test touching this variable
        for (value, expected) in [("1", true), ("yes", true), ("on", true), ("0", false)] {
            std::env::set_var("DISPLAY_PROBE_ZERO_TOUCH", value);

            // Act
            let cli = Cli::try_parse_from(["display-probe", "desk.toml"]);

            // Assert
            assert_eq!(cli.map(|c| c.zero_touch).ok(), Some(expected), "value {value}");
        }
        std::env::remove_var("DISPLAY_PROBE_ZERO_TOUCH");
    }

    fn fixture_cli(extra: &[&str]) -> (Cli, ArrangementConfig) {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures/desk.toml");
        let mut args = vec!["display-probe".to_string(), path.display().to_string()];
        args.extend(extra.iter().map(|a| a.to_string()));
        let cli = Cli::parse_from(args);
        let config = load_arrangement(&cli.arrangement).unwrap();
        (cli, config)
    }

    #[test]
    fn test_render_text_report_for_fixture() {
        let (cli, config) = fixture_cli(&[]);

        let text = render(&cli, &config).unwrap();

        assert!(text.starts_with("3 monitor(s), zero gap counts as touching: yes"));
    }

    #[test]
    fn test_render_json_report_for_fixture() {
        let (cli, config) = fixture_cli(&["--json"]);

        let text = render(&cli, &config).unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(json["monitors"].as_array().unwrap().len(), 3);
    }
}
