//! Command-line argument definitions.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{ArgAction, Args, Parser, Subcommand};
use rankscape_core::SortOption;
use rankscape_render::Colormap;

/// Rankscape - visualise and test search ranking scores
#[derive(Parser, Debug)]
#[command(name = "rankscape", version)]
#[command(about = "Visualise and test embedding search sort scores", long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "RANKSCAPE_CONFIG")]
    pub config: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level sub-commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render score heat maps for one or more scenarios
    Plot(PlotArgs),
    /// Compute a single score
    Score(ScoreArgs),
    /// Rank a candidate file under a sort option
    Rank(RankArgs),
    /// Run ranking test cases
    Eval(EvalArgs),
    /// Print the SQL expression for a sort option
    Sql(SqlArgs),
    /// Manage the configuration file
    Config {
        /// Config action
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Arguments of `rankscape plot`.
#[derive(Args, Debug, Default)]
pub struct PlotArgs {
    /// Scenario to plot (repeatable; default: configured scenarios)
    #[arg(short, long = "scenario")]
    pub scenarios: Vec<SortOption>,

    /// Output directory
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Samples per axis
    #[arg(short, long)]
    pub resolution: Option<usize>,

    /// Colour map
    #[arg(long)]
    pub colormap: Option<Colormap>,

    /// Also write one CSV per scale
    #[arg(long)]
    pub csv: bool,

    /// Reference date for date sorts (RFC 3339)
    #[arg(long)]
    pub reference_date: Option<DateTime<Utc>>,
}

/// Arguments of `rankscape score`.
#[derive(Args, Debug)]
pub struct ScoreArgs {
    /// Sort option
    #[arg(short, long)]
    pub sort: SortOption,

    /// Embedding distance
    #[arg(short, long)]
    pub distance: f64,

    /// Bookmark count (bookmark sorts)
    #[arg(short, long)]
    pub bookmarks: Option<f64>,

    /// Item age relative to the reference date, in hours (date sorts)
    #[arg(long, allow_hyphen_values = true)]
    pub offset_hours: Option<f64>,
}

/// Arguments of `rankscape rank`.
#[derive(Args, Debug)]
pub struct RankArgs {
    /// Sort option
    #[arg(short, long)]
    pub sort: SortOption,

    /// TOML file listing candidates
    #[arg(long)]
    pub candidates: PathBuf,

    /// Reference date (overrides the file's)
    #[arg(long)]
    pub reference_date: Option<DateTime<Utc>>,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

/// Arguments of `rankscape eval`.
#[derive(Args, Debug)]
pub struct EvalArgs {
    /// TOML file of test cases
    pub file: PathBuf,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments of `rankscape sql`.
#[derive(Args, Debug)]
pub struct SqlArgs {
    /// Sort option
    #[arg(short, long)]
    pub sort: SortOption,

    /// SQL expression for the embedding distance
    #[arg(long, default_value = "distance")]
    pub distance_expr: String,

    /// SQL expression for the reference timestamp
    #[arg(long, default_value = "NOW()")]
    pub reference_expr: String,

    /// Bookmark count column
    #[arg(long, default_value = "bookmarks")]
    pub bookmarks_column: String,

    /// Creation timestamp column
    #[arg(long, default_value = "created_at")]
    pub created_column: String,

    /// Update timestamp column
    #[arg(long, default_value = "updated_at")]
    pub updated_column: String,

    /// Print a full ORDER BY clause
    #[arg(long)]
    pub order_by: bool,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the resolved config file path
    Path,
    /// Print a value by dotted key (e.g. `render.colormap`)
    Get {
        /// Dotted key
        key: String,
    },
    /// Set a value by dotted key
    Set {
        /// Dotted key
        key: String,
        /// New value
        value: String,
    },
    /// Write a default config file
    Init {
        /// Destination (default: platform config path)
        #[arg(long)]
        file: Option<String>,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the overridable settings as environment variables
    Export {
        /// Format as `--env KEY=VALUE` for `docker run`
        #[arg(long)]
        docker_env: bool,
    },
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_plot() {
        let cli = Cli::try_parse_from([
            "rankscape",
            "-vv",
            "plot",
            "--scenario",
            "embed-top-asc",
            "-s",
            "EmbedDateCreatedDesc",
            "--colormap",
            "viridis",
            "--csv",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let Command::Plot(args) = cli.command else {
            unreachable!("expected plot");
        };
        assert_eq!(
            args.scenarios,
            vec![SortOption::EmbedTopAsc, SortOption::EmbedDateCreatedDesc]
        );
        assert_eq!(args.colormap, Some(Colormap::Viridis));
        assert!(args.csv);
    }

    #[test]
    fn test_parse_score_negative_offset() {
        let cli = Cli::try_parse_from([
            "rankscape",
            "score",
            "--sort",
            "EmbedDateCreatedDesc",
            "--distance",
            "0.2",
            "--offset-hours",
            "-3.5",
        ])
        .unwrap();
        let Command::Score(args) = cli.command else {
            unreachable!("expected score");
        };
        assert_eq!(args.offset_hours, Some(-3.5));
        assert_eq!(args.bookmarks, None);
    }

    #[test]
    fn test_parse_rejects_unknown_sort() {
        assert!(Cli::try_parse_from(["rankscape", "sql", "--sort", "Nope"]).is_err());
    }

    #[test]
    fn test_parse_config_set() {
        let argv = ["rankscape", "config", "set", "render.colormap", "magma"];
        let cli = Cli::try_parse_from(argv).unwrap();
        assert!(matches!(
            cli.command,
            Command::Config {
                action: ConfigAction::Set { .. }
            }
        ));
    }
}
