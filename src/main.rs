mod input;
mod logging;
mod model;
mod pipeline;
mod report;

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::input::{TableSpec, load_score_table};
use crate::model::profile::{LiftProfile, TiePolicy, ZeroPositivePolicy};
use crate::pipeline::stage1_load::run_stage1;
use crate::pipeline::stage2_lift::run_stage2;
use crate::pipeline::stage3_report::{RunMode, Stage3Input, write_reports};

#[derive(Debug, Parser)]
#[command(name = "kira-liftqc")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Decile lift comparison of binary classifier scores")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compute decile lift curves for every model column of a scores table
    Run(RunArgs),
}

#[derive(Debug, Clone, Args)]
struct RunArgs {
    /// Scores table (TSV, optionally gzipped) with a label column and one column per model
    #[arg(long)]
    input: PathBuf,

    /// Output directory
    #[arg(long)]
    out: PathBuf,

    /// Name of the ground-truth label column
    #[arg(long, default_value = "label")]
    label_col: String,

    /// Identifier column to exclude from the model columns
    #[arg(long)]
    id_col: Option<String>,

    /// Comma-separated model columns to compare, in report order
    #[arg(long, value_delimiter = ',')]
    models: Option<Vec<String>>,

    /// Ordering of observations with equal scores
    #[arg(long, value_enum, default_value_t = TiesArg::InputOrder)]
    ties: TiesArg,

    /// Behaviour when the population has no positive labels
    #[arg(long, value_enum, default_value_t = ZeroPositivesArg::Fail)]
    zero_positives: ZeroPositivesArg,

    #[arg(long, value_enum, default_value_t = RunModeArg::Standalone)]
    run_mode: RunModeArg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TiesArg {
    InputOrder,
    Spread,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ZeroPositivesArg {
    Fail,
    Zero,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum RunModeArg {
    Standalone,
    Pipeline,
}

#[derive(Debug, Clone)]
struct RunConfig {
    input_path: PathBuf,
    out_dir: PathBuf,
    table_spec: TableSpec,
    models: Option<Vec<String>>,
    profile: LiftProfile,
    run_mode: RunMode,
}

impl From<RunArgs> for RunConfig {
    fn from(args: RunArgs) -> Self {
        Self {
            input_path: args.input,
            out_dir: args.out,
            table_spec: TableSpec {
                label_col: args.label_col,
                id_col: args.id_col,
            },
            models: args.models,
            profile: LiftProfile {
                ties: match args.ties {
                    TiesArg::InputOrder => TiePolicy::InputOrder,
                    TiesArg::Spread => TiePolicy::Spread,
                },
                zero_positives: match args.zero_positives {
                    ZeroPositivesArg::Fail => ZeroPositivePolicy::Fail,
                    ZeroPositivesArg::Zero => ZeroPositivePolicy::ZeroFill,
                },
            },
            run_mode: match args.run_mode {
                RunModeArg::Standalone => RunMode::Standalone,
                RunModeArg::Pipeline => RunMode::Pipeline,
            },
        }
    }
}

fn main() {
    logging::init_logging();
    let cli = Cli::parse();
    let result = match cli.command {
        Command::Run(args) => run(RunConfig::from(args)),
    };
    if let Err(err) = result {
        tracing::error!("{err}");
        std::process::exit(1);
    }
}

fn run(config: RunConfig) -> Result<(), String> {
    let out_dir = resolve_output_dir(&config.out_dir, config.run_mode);

    let table =
        load_score_table(&config.input_path, &config.table_spec).map_err(|e| e.to_string())?;
    let stage1 = run_stage1(&table, config.models.as_deref()).map_err(|e| e.to_string())?;
    let stage2 = run_stage2(&stage1.datasets, &config.profile);

    let input = Stage3Input {
        table: &stage2.table,
        diagnostics: &stage2.diagnostics,
        failures: &stage2.failures,
        profile: config.profile,
        run_mode: config.run_mode,

        input_path: table.path.display().to_string(),
        label_col: table.label_col.clone(),
        n_observations: stage1.n_observations,
        n_positives: stage1.n_positives,
        models: stage1
            .datasets
            .iter()
            .map(|d| d.model_name.clone())
            .collect(),
        duplicate_ids: stage1.duplicate_ids,

        tool_name: "kira-liftqc".to_string(),
        tool_version: env!("CARGO_PKG_VERSION").to_string(),
        git_hash: read_git_hash(&PathBuf::from(".")),
    };
    write_reports(&input, &out_dir).map_err(|e| e.to_string())?;

    if stage2.table.models().next().is_none() {
        return Err(format!(
            "no model produced a lift curve ({} failed)",
            stage2.failures.len()
        ));
    }
    Ok(())
}

fn resolve_output_dir(base: &Path, run_mode: RunMode) -> PathBuf {
    match run_mode {
        RunMode::Standalone => base.to_path_buf(),
        RunMode::Pipeline => base.join("kira-liftqc"),
    }
}

fn read_git_hash(repo_root: &Path) -> Option<String> {
    let head = repo_root.join(".git/HEAD");
    let content = std::fs::read_to_string(head).ok()?;
    if let Some(ref_line) = content.strip_prefix("ref: ") {
        let ref_path = repo_root.join(".git").join(ref_line.trim());
        return std::fs::read_to_string(ref_path)
            .ok()
            .map(|s| s.trim().to_string());
    }
    Some(content.trim().to_string())
}

#[cfg(test)]
#[path = "../tests/src_inline/main_inline.rs"]
mod tests;
