//! CLI entry point for the grade calculator.
//!
//! Provides subcommands for semester and free-mode GPA, cumulative CGPA with
//! target planning, and grade prediction from assessment marks.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use grade_calc::catalog::{CourseCatalog, CourseLookup};
use grade_calc::cgpa::{CgpaSummary, GoalOutcome, GoalTimeframe, SemesterRecord, plan_goal};
use grade_calc::config::{Branch, MAX_SEM_CREDITS, ProgramConfig};
use grade_calc::gpa::{GpaOutcome, GpaReport};
use grade_calc::output::{PredictionRecord, append_record, print_json, print_pretty};
use grade_calc::predict::linear::LinearModels;
use grade_calc::predict::marks::{
    Components, DEFAULT_CLASS_STRENGTH, LabMarks, ManualOverrides, MarkSet,
};
use grade_calc::predict::models::{NoModels, Predictor};
use grade_calc::predict::progress::progress_to_next;
use grade_calc::predict::{CourseKind, predict_lab, predict_theory};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "grade_calc")]
#[command(about = "GPA, CGPA and grade prediction calculator", long_about = None)]
struct Cli {
    #[command(flatten)]
    program: ProgramArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ProgramArgs {
    /// Degree branch (BCE, BPS, BAI, BDS, BRS, BMH, BEC, BLC)
    #[arg(short, long, global = true, default_value = "BCE")]
    branch: Branch,

    /// Directory holding the course catalogs
    #[arg(long, global = true, env = "GRADE_CALC_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    /// Optional JSON file with per-branch overrides
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// GPA for one semester's courses (capped at the semester credit limit)
    Semester {
        /// Course and grade as CODE=GRADE, repeatable
        #[arg(short, long = "course", value_name = "CODE=GRADE", value_parser = parse_selection, required = true)]
        courses: Vec<(String, String)>,
    },
    /// GPA for any courses (capped at the program credit limit)
    Free {
        /// Course and grade as CODE=GRADE, repeatable
        #[arg(short, long = "course", value_name = "CODE=GRADE", value_parser = parse_selection, required = true)]
        courses: Vec<(String, String)>,
    },
    /// CGPA from past semesters, with an optional target
    Cgpa {
        /// Semester GPA and credits as GPA:CREDITS, repeatable
        #[arg(short, long = "semester", value_name = "GPA:CREDITS", value_parser = parse_semester, required = true)]
        semesters: Vec<(f64, f64)>,

        /// Target CGPA to plan for
        #[arg(short, long)]
        target: Option<f64>,

        /// Timeframe to reach the target in
        #[arg(long, value_enum, default_value_t = Timeframe::Remaining)]
        timeframe: Timeframe,

        /// Credits of each upcoming semester in the timeframe
        #[arg(long = "credits", num_args = 1..=2)]
        credits: Vec<f64>,
    },
    /// Predict the grade of a course from assessment marks
    Predict(PredictArgs),
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Timeframe {
    Next,
    NextTwo,
    Remaining,
}

#[derive(Args)]
struct PredictArgs {
    /// Course code; codes ending in P or E are graded as labs
    #[arg(long)]
    course: String,

    #[arg(long, default_value_t = 0.0)]
    cat1: f64,
    #[arg(long, default_value_t = 0.0)]
    cat2: f64,
    #[arg(long, default_value_t = 0.0)]
    da1: f64,
    #[arg(long, default_value_t = 0.0)]
    da2: f64,
    #[arg(long, default_value_t = 0.0)]
    da3: f64,
    #[arg(long, default_value_t = 0.0)]
    fat: f64,

    /// Class averages of each component (0 = not supplied)
    #[arg(long, default_value_t = 0.0)]
    cat1_avg: f64,
    #[arg(long, default_value_t = 0.0)]
    cat2_avg: f64,
    #[arg(long, default_value_t = 0.0)]
    da1_avg: f64,
    #[arg(long, default_value_t = 0.0)]
    da2_avg: f64,
    #[arg(long, default_value_t = 0.0)]
    da3_avg: f64,
    #[arg(long, default_value_t = 0.0)]
    fat_avg: f64,

    /// Overall class average; with --class-sd the models are skipped
    #[arg(long, default_value_t = 0.0)]
    class_avg: f64,
    #[arg(long, default_value_t = 0.0)]
    class_sd: f64,

    #[arg(long, default_value_t = DEFAULT_CLASS_STRENGTH)]
    class_strength: u32,

    /// Lab marks out of 60 (lab courses)
    #[arg(long, default_value_t = 0.0)]
    lab: f64,
    /// Lab FAT marks out of 40 (lab courses)
    #[arg(long, default_value_t = 0.0)]
    lab_fat: f64,

    /// JSON model file
    #[arg(long, env = "GRADE_CALC_MODELS")]
    models: Option<PathBuf>,

    /// CSV file to append the prediction to
    #[arg(long)]
    history: Option<String>,

    /// Also log the result as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/grade_calc.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("grade_calc.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::try_from_env("RUST_LOG").unwrap_or_else(|_| EnvFilter::new("info")));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(
            EnvFilter::try_from_env("RUST_LOG_JSON").unwrap_or_else(|_| EnvFilter::new("debug")),
        );

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let config = match &cli.program.config {
        Some(path) => ProgramConfig::load(&cli.program.data_dir, path)?,
        None => ProgramConfig::new(&cli.program.data_dir),
    };
    let branch = cli.program.branch;

    match cli.command {
        Commands::Semester { courses } => {
            gpa_command(&config, branch, &courses, MAX_SEM_CREDITS)?;
        }
        Commands::Free { courses } => {
            let limit = config.max_total_credits(branch);
            gpa_command(&config, branch, &courses, limit)?;
        }
        Commands::Cgpa {
            semesters,
            target,
            timeframe,
            credits,
        } => {
            cgpa_command(&config, branch, &semesters, target, timeframe, &credits)?;
        }
        Commands::Predict(args) => {
            predict_command(&config, branch, &args)?;
        }
    }

    Ok(())
}

fn parse_selection(s: &str) -> Result<(String, String), String> {
    let (code, grade) = s
        .split_once('=')
        .ok_or_else(|| format!("expected CODE=GRADE, got '{s}'"))?;
    Ok((code.trim().to_string(), grade.trim().to_string()))
}

fn parse_semester(s: &str) -> Result<(f64, f64), String> {
    let (gpa, credits) = s
        .split_once(':')
        .ok_or_else(|| format!("expected GPA:CREDITS, got '{s}'"))?;
    let gpa = gpa.trim().parse().map_err(|_| format!("invalid GPA '{gpa}'"))?;
    let credits = credits
        .trim()
        .parse()
        .map_err(|_| format!("invalid credits '{credits}'"))?;
    Ok((gpa, credits))
}

fn load_catalog(config: &ProgramConfig, branch: Branch) -> Result<CourseCatalog> {
    CourseCatalog::load(&config.catalog_path(branch))
}

/// Computes and logs the GPA of the selected courses.
#[tracing::instrument(skip(config, courses), fields(branch = %branch))]
fn gpa_command(
    config: &ProgramConfig,
    branch: Branch,
    courses: &[(String, String)],
    credit_limit: f64,
) -> Result<()> {
    let catalog = load_catalog(config, branch)?;
    let entries = catalog.entries_with_companions(courses)?;
    for entry in &entries {
        info!(
            course = %entry.course_code,
            credits = entry.credits,
            grade = entry.grade.label(),
            "Course"
        );
    }

    let report = GpaReport::build(&entries, credit_limit)
        .context("please remove some courses")?;

    info!(total_credits = format!("{:.2}", report.total_credits), "Total credits");
    if report.has_non_graded {
        info!(
            gpa_credits = format!("{:.2}", report.outcome.gpa_credits()),
            "Credits used for GPA"
        );
    }

    match report.outcome {
        GpaOutcome::Computed { gpa, .. } => info!(gpa = format!("{gpa:.2}"), "GPA"),
        GpaOutcome::NoGradedCourses => {
            info!(gpa = "0.00", "GPA cannot be calculated: only non-graded courses selected")
        }
    }
    print_pretty(&report);
    Ok(())
}

/// Computes the CGPA and, when a target is given, the GPA needed to reach it.
#[tracing::instrument(skip(config, semesters, credits), fields(branch = %branch))]
fn cgpa_command(
    config: &ProgramConfig,
    branch: Branch,
    semesters: &[(f64, f64)],
    target: Option<f64>,
    timeframe: Timeframe,
    credits: &[f64],
) -> Result<()> {
    let records = semesters
        .iter()
        .map(|&(gpa, credits)| SemesterRecord::new(Some(gpa), Some(credits)))
        .collect::<Result<Vec<_>, _>>()?;
    let max_total = config.max_total_credits(branch);

    match CgpaSummary::from_records(&records, max_total).context("please correct the credits")? {
        Some(summary) => {
            info!(
                cgpa = format!("{:.2}", summary.cgpa),
                total_credits = summary.total_credits,
                "Current CGPA"
            );
            if summary.is_nine_pointer() {
                info!("Congratulations, you're a 9-pointer!");
            }
        }
        None => info!("Enter your semester GPAs and credits to calculate your CGPA"),
    }

    let Some(target) = target else {
        return Ok(());
    };

    let first = credits.first().copied().unwrap_or(0.0);
    let timeframe = match timeframe {
        Timeframe::Next => GoalTimeframe::NextSemester(first),
        Timeframe::NextTwo => {
            GoalTimeframe::NextTwoSemesters(first, credits.get(1).copied().unwrap_or(0.0))
        }
        Timeframe::Remaining => GoalTimeframe::Remaining,
    };

    let plan = plan_goal(target, &records, max_total, timeframe)?;
    match plan.outcome {
        GoalOutcome::Unreachable { .. } => warn!(
            target = format!("{target:.2}"),
            "It's mathematically impossible to reach this CGPA with the chosen credits"
        ),
        GoalOutcome::AlreadyExceeded { .. } => {
            info!(target = format!("{target:.2}"), "You have already surpassed your target CGPA")
        }
        GoalOutcome::Reachable { required } => info!(
            target = format!("{target:.2}"),
            required_gpa = format!("{required:.2}"),
            semesters = plan.semesters,
            credits = plan.credits_to_add,
            "Average GPA needed"
        ),
    }
    Ok(())
}

fn load_models(path: Option<&Path>) -> Result<Box<dyn Predictor>> {
    match path {
        Some(path) => Ok(Box::new(LinearModels::load(path)?)),
        None => {
            warn!("No model file configured; only manual average + SD predictions are possible");
            Ok(Box::new(NoModels))
        }
    }
}

/// Predicts a course grade and logs it with progress toward the next grade.
#[tracing::instrument(skip(config, args), fields(branch = %branch, course = %args.course))]
fn predict_command(config: &ProgramConfig, branch: Branch, args: &PredictArgs) -> Result<()> {
    let catalog = load_catalog(config, branch)?;
    let course = catalog
        .course(&args.course)
        .ok_or_else(|| grade_calc::EngineError::UnknownCourse(args.course.clone()))?;

    let result = match CourseKind::from_code(&course.code) {
        CourseKind::Lab => predict_lab(&LabMarks::new(args.lab, args.lab_fat)?),
        CourseKind::Theory => {
            let mark_set = MarkSet::new(
                Components {
                    cat1: args.cat1,
                    cat2: args.cat2,
                    da1: args.da1,
                    da2: args.da2,
                    da3: args.da3,
                    fat: args.fat,
                },
                Components {
                    cat1: args.cat1_avg,
                    cat2: args.cat2_avg,
                    da1: args.da1_avg,
                    da2: args.da2_avg,
                    da3: args.da3_avg,
                    fat: args.fat_avg,
                },
                ManualOverrides {
                    class_average: args.class_avg,
                    class_sd: args.class_sd,
                },
                args.class_strength,
            )?;
            let models = load_models(args.models.as_deref())?;
            predict_theory(&mark_set, models.as_ref()).context("prediction halted")?
        }
    };

    let progress = progress_to_next(
        result.letter_grade,
        result.overall_score,
        result.class_mean,
        result.class_sd,
    );

    info!(
        course = %course.display(),
        grade = %result.letter_grade,
        overall = format!("{:.2}", result.overall_score),
        class_mean = format!("{:.2}", result.class_mean),
        class_sd = format!("{:.2}", result.class_sd),
        model = %result.source,
        progress = format!("{:.0}%", progress * 100.0),
        "Predicted grade"
    );

    let record = PredictionRecord::from_result(&result, progress).with_course(&course.code);
    if args.json {
        print_json(&record)?;
    }
    if let Some(history) = &args.history {
        append_record(history, &record)?;
    }
    Ok(())
}
