use clap::{Args, Parser, Subcommand};
use resident_roster::config::{AppConfig, ScoringSource};
use resident_roster::error::AppError;
use resident_roster::ingest::{AvailabilityCsvImporter, SnapshotImporter};
use resident_roster::report::{ShiftCountReport, ShiftCountRow, UnassignedSummary};
use resident_roster::scoring::{RuleId, ScoreExplanation, ScoringConfig, ScoringEngine};
use resident_roster::telemetry;
use resident_roster::ScheduleSnapshot;
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "roster",
    about = "Score and explain resident shift rosters from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the hard/medium/soft score of a snapshot
    Score(InputArgs),
    /// List every rule match, optionally for a single rule
    Explain(ExplainArgs),
    /// Per-rule totals and match counts
    Summary(OutputArgs),
    /// Shift counts per resident
    Counts(OutputArgs),
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Snapshot JSON with employees, shifts, availabilities and rotations
    #[arg(long)]
    snapshot: PathBuf,
    /// Availability export (Employee,Date,Type) merged into the snapshot
    #[arg(long)]
    availability_csv: Option<PathBuf>,
    /// Scoring config JSON; overrides ROSTER_SCORING_CONFIG
    #[arg(long)]
    scoring_config: Option<PathBuf>,
    /// Register an opt-in rule (snake_case key or label); repeatable
    #[arg(long = "enable")]
    enable: Vec<String>,
    /// Drop a default rule; repeatable
    #[arg(long = "disable")]
    disable: Vec<String>,
}

#[derive(Args, Debug)]
struct OutputArgs {
    #[command(flatten)]
    input: InputArgs,
    /// Emit JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct ExplainArgs {
    #[command(flatten)]
    output: OutputArgs,
    /// Only report this rule, even when it is not registered
    #[arg(long)]
    rule: Option<String>,
}

#[derive(Debug, Serialize)]
struct CountsResponse {
    residents: Vec<ShiftCountRow>,
    unassigned: UnassignedSummary,
}

fn main() {
    if let Err(err) = run_cli() {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    let filter = telemetry::init(&config.telemetry)?;
    info!(
        ?config.environment,
        filter = %filter.directives,
        source = ?filter.source,
        "roster starting"
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.command {
        Command::Score(args) => run_score(&config, &args, &mut out),
        Command::Explain(args) => run_explain(&config, &args, &mut out),
        Command::Summary(args) => run_summary(&config, &args, &mut out),
        Command::Counts(args) => run_counts(&config, &args, &mut out),
    }
}

fn load_inputs(
    config: &AppConfig,
    args: &InputArgs,
) -> Result<(ScheduleSnapshot, ScoringConfig), AppError> {
    let mut snapshot = SnapshotImporter::from_path(&args.snapshot)?;
    if let Some(path) = &args.availability_csv {
        snapshot
            .availabilities
            .extend(AvailabilityCsvImporter::from_path(path)?);
        snapshot.validate()?;
    }

    let mut scoring = match &args.scoring_config {
        Some(path) => ScoringSource {
            config_path: Some(path.clone()),
        }
        .load()?,
        None => config.scoring.load()?,
    };
    for raw in &args.enable {
        scoring = scoring.enable(raw.parse::<RuleId>()?);
    }
    for raw in &args.disable {
        scoring = scoring.disable(raw.parse::<RuleId>()?);
    }
    Ok((snapshot, scoring))
}

fn run_score(config: &AppConfig, args: &InputArgs, out: &mut impl Write) -> Result<(), AppError> {
    let (snapshot, scoring) = load_inputs(config, args)?;
    let score = ScoringEngine::new(scoring).score(&snapshot)?;
    writeln!(out, "{score}")?;
    writeln!(
        out,
        "feasible: {}",
        if score.is_feasible() { "yes" } else { "no" }
    )?;
    Ok(())
}

fn run_explain(config: &AppConfig, args: &ExplainArgs, out: &mut impl Write) -> Result<(), AppError> {
    let (snapshot, scoring) = load_inputs(config, &args.output.input)?;
    let engine = ScoringEngine::new(scoring);
    let explanation = match &args.rule {
        Some(raw) => engine.evaluate_rule(raw.parse::<RuleId>()?, &snapshot)?,
        None => engine.explain(&snapshot)?,
    };

    if args.output.json {
        serde_json::to_writer_pretty(&mut *out, &explanation)?;
        writeln!(out)?;
    } else {
        render_explanation(&explanation, out)?;
    }
    Ok(())
}

fn run_summary(config: &AppConfig, args: &OutputArgs, out: &mut impl Write) -> Result<(), AppError> {
    let (snapshot, scoring) = load_inputs(config, &args.input)?;
    let explanation = ScoringEngine::new(scoring).explain(&snapshot)?;

    if args.json {
        serde_json::to_writer_pretty(&mut *out, &explanation.summary())?;
        writeln!(out)?;
    } else {
        render_summary(&explanation, out)?;
    }
    Ok(())
}

fn run_counts(config: &AppConfig, args: &OutputArgs, out: &mut impl Write) -> Result<(), AppError> {
    let (snapshot, scoring) = load_inputs(config, &args.input)?;
    let report = ShiftCountReport::from_snapshot(&snapshot, &scoring);

    if args.json {
        let response = CountsResponse {
            residents: report.rows(),
            unassigned: report.unassigned(),
        };
        serde_json::to_writer_pretty(&mut *out, &response)?;
        writeln!(out)?;
    } else {
        render_counts(&report, out)?;
    }
    Ok(())
}

fn render_explanation(explanation: &ScoreExplanation, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "Score: {}", explanation.score)?;
    if explanation.components.is_empty() {
        writeln!(out, "\nNo rule matches")?;
        return Ok(());
    }

    let mut current = None;
    for component in &explanation.components {
        if current != Some(component.rule) {
            writeln!(out, "\n{} [{}]", component.rule.label(), component.level.label())?;
            current = Some(component.rule);
        }
        let shifts = component
            .shift_ids
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(out, "- {:+} {} ({})", component.score, component.notes, shifts)?;
    }
    Ok(())
}

fn render_summary(explanation: &ScoreExplanation, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "Score: {}", explanation.score)?;
    let summary = explanation.summary();
    if summary.is_empty() {
        writeln!(out, "\nNo rule matches")?;
        return Ok(());
    }

    writeln!(out, "\nRule totals")?;
    for total in summary {
        writeln!(
            out,
            "- {}: {} over {} match{}",
            total.label,
            total.score.level(total.level),
            total.matches,
            if total.matches == 1 { "" } else { "es" }
        )?;
    }
    Ok(())
}

fn render_counts(report: &ShiftCountReport, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "Shift counts")?;
    for row in report.rows() {
        writeln!(
            out,
            "- {} ({}): call {}, evening {}, weekend {}, night {}, day {}, IR {}, Peds {}, ED cover Fri/Sat/Sun {}/{}/{}",
            row.employee,
            row.level,
            row.call_shifts,
            row.evening,
            row.weekend,
            row.night,
            row.day,
            row.ir,
            row.peds,
            row.friday_ed_cover,
            row.saturday_ed_cover,
            row.sunday_ed_cover,
        )?;
    }

    let unassigned = report.unassigned();
    writeln!(
        out,
        "\nUnassigned shifts: {} mandatory, {} optional",
        unassigned.mandatory, unassigned.optional
    )?;
    Ok(())
}
