//! Sub-command implementations.
//!
//! Each command has a pure part returning data (tested directly) and a
//! printing wrapper used by [`run`].

use std::fmt::Write as _;
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{DateTime, Utc};
use rankscape_core::cases::{CandidateSet, CaseFile, SuiteReport};
use rankscape_core::scoring::{date_score_at_offset, top_score, validate_distance};
use rankscape_core::sql::{SqlColumns, order_by_clause, sql_score_expression};
use rankscape_core::{Error as CoreError, RankedCandidate, ScoreFamily, SortOption, rank_candidates};
use rankscape_grid::check_resolution;
use rankscape_render::{PlotOptions, PlotOutput, generate_plots};

use crate::cli::{Cli, Command, EvalArgs, PlotArgs, RankArgs, ScoreArgs, SqlArgs};
use crate::config::{ConfigManager, RankscapeConfig};
use crate::config_handlers::handle_config_command;
use crate::error::{Error, Result};

/// Line printed once every plot has been written.
pub const PLOT_SUCCESS: &str = "Plots generated successfully! Exiting...";

/// Run a parsed command line.
pub fn run(cli: Cli) -> Result<ExitCode> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Command::Plot(args) => {
            let config = RankscapeConfig::load(config_path)?;
            let outputs = cmd_plot(&config, &args)?;
            for output in &outputs {
                log::debug!("{} -> {}", output.scenario, output.image_path.display());
            }
            println!("{PLOT_SUCCESS}");
        }
        Command::Score(args) => {
            println!("{}", cmd_score(&args)?);
        }
        Command::Rank(args) => {
            let ranking = cmd_rank(&args, Utc::now())?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&ranking)?);
            } else {
                print!("{}", format_ranking(&ranking));
            }
        }
        Command::Eval(args) => {
            let report = cmd_eval(&args, Utc::now())?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", format_report(&report));
            }
            if !report.all_passed() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Sql(args) => {
            println!("{}", cmd_sql(&args));
        }
        Command::Config { action } => handle_config_command(config_path, action)?,
    }
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// plot
// ============================================================================

/// Effective plot settings: flags over config over defaults.
#[derive(Debug, Clone)]
pub struct PlotPlan {
    /// Scenarios to plot, in order.
    pub scenarios: Vec<SortOption>,
    /// Output directory.
    pub output_dir: PathBuf,
    /// Rendering options.
    pub options: PlotOptions,
}

impl PlotPlan {
    /// Merge `args` into `config`. `now` is the reference date when neither
    /// sets one.
    pub fn resolve(config: &RankscapeConfig, args: &PlotArgs, now: DateTime<Utc>) -> Result<Self> {
        let scenarios = if args.scenarios.is_empty() {
            config.scenarios.clone()
        } else {
            args.scenarios.clone()
        };

        let resolution = args.resolution.unwrap_or(config.resolution);
        check_resolution(resolution)?;

        let options = PlotOptions {
            resolution,
            colormap: args.colormap.unwrap_or(config.render.colormap),
            layout: config.render.layout,
            norm: config.render.norm(),
            export_csv: args.csv || config.export_csv,
            reference: args.reference_date.or(config.reference_date).unwrap_or(now),
        };

        Ok(Self {
            scenarios,
            output_dir: args
                .output_dir
                .clone()
                .unwrap_or_else(|| config.output_dir.clone()),
            options,
        })
    }
}

/// Generate plots for every selected scenario.
pub fn cmd_plot(config: &RankscapeConfig, args: &PlotArgs) -> Result<Vec<PlotOutput>> {
    let plan = PlotPlan::resolve(config, args, Utc::now())?;
    log::info!(
        "Plotting {} scenarios into {} (reference {})",
        plan.scenarios.len(),
        plan.output_dir.display(),
        plan.options.reference.to_rfc3339()
    );

    plan.scenarios
        .iter()
        .map(|&scenario| {
            let scales = config.scales.for_family(scenario.family());
            generate_plots(scenario, &scales, &plan.options, &plan.output_dir).map_err(Error::from)
        })
        .collect()
}

// ============================================================================
// score
// ============================================================================

/// Score one point of a sort's domain.
pub fn cmd_score(args: &ScoreArgs) -> Result<f64> {
    validate_distance(args.distance)?;
    let direction = args.sort.direction();

    match args.sort.family() {
        ScoreFamily::Bookmarks => {
            if args.offset_hours.is_some() {
                log::warn!("--offset-hours is ignored by {}", args.sort);
            }
            let bookmarks = args.bookmarks.unwrap_or(0.0);
            if !bookmarks.is_finite() || bookmarks < 0.0 {
                return Err(CoreError::validation_field(
                    "bookmarks",
                    format!("must be a non-negative number (got {bookmarks})"),
                )
                .into());
            }
            Ok(top_score(args.distance, bookmarks, direction))
        }
        ScoreFamily::Date => {
            if args.bookmarks.is_some() {
                log::warn!("--bookmarks is ignored by {}", args.sort);
            }
            let hours = args.offset_hours.unwrap_or(0.0);
            if !hours.is_finite() {
                return Err(CoreError::validation_field("offset_hours", "must be finite").into());
            }
            Ok(date_score_at_offset(args.distance, hours * 3600.0, direction))
        }
    }
}

// ============================================================================
// rank
// ============================================================================

/// Rank the candidates of a file.
pub fn cmd_rank(args: &RankArgs, now: DateTime<Utc>) -> Result<Vec<RankedCandidate>> {
    let mut set = CandidateSet::load(&args.candidates)?;
    if let Some(reference) = args.reference_date {
        set.reference_date = Some(reference);
    }
    let (reference, candidates) = set.resolve(now);
    Ok(rank_candidates(args.sort, &candidates, reference)?)
}

/// Render a ranking as an aligned table.
pub fn format_ranking(ranking: &[RankedCandidate]) -> String {
    let id_width = ranking
        .iter()
        .map(|r| r.id.chars().count())
        .max()
        .unwrap_or(0)
        .max(2);

    let mut out = String::new();
    let _ = writeln!(out, "{:>4}  {:<id_width$}  SCORE", "RANK", "ID");
    for r in ranking {
        let _ = writeln!(out, "{:>4}  {:<id_width$}  {:.6}", r.rank, r.id, r.score);
    }
    out
}

// ============================================================================
// eval
// ============================================================================

/// Run a case file.
pub fn cmd_eval(args: &EvalArgs, now: DateTime<Utc>) -> Result<SuiteReport> {
    let file = CaseFile::load(&args.file)?;
    Ok(file.evaluate(now)?)
}

/// Render a suite report for humans.
pub fn format_report(report: &SuiteReport) -> String {
    let mut out = String::new();
    for case in &report.cases {
        let status = if case.passed { "PASS" } else { "FAIL" };
        let tau = case
            .kendall_tau
            .map_or_else(|| "n/a".to_string(), |t| format!("{t:.3}"));
        let _ = writeln!(
            out,
            "{status} {} [{}] tau={tau} ndcg={:.3} rr={:.3}",
            case.name, case.sort, case.ndcg, case.reciprocal_rank
        );
        if !case.passed {
            let _ = writeln!(out, "     expected: {}", case.expected.join(", "));
            let _ = writeln!(out, "     actual:   {}", case.actual.join(", "));
        }
    }
    let _ = writeln!(
        out,
        "{} passed, {} failed (reference {})",
        report.passed,
        report.failed,
        report.reference_date.to_rfc3339()
    );
    out
}

// ============================================================================
// sql
// ============================================================================

/// SQL score expression (or ORDER BY clause) for a sort.
pub fn cmd_sql(args: &SqlArgs) -> String {
    let columns = SqlColumns {
        bookmarks: args.bookmarks_column.clone(),
        created_at: args.created_column.clone(),
        updated_at: args.updated_column.clone(),
    };
    if args.order_by {
        order_by_clause(args.sort, &columns, &args.distance_expr, &args.reference_expr)
    } else {
        sql_score_expression(args.sort, &columns, &args.distance_expr, &args.reference_expr)
    }
}

// ============================================================================
// Tests
// ============================================================================
