use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::model::lift::LiftTable;
use crate::model::profile::{LiftProfile, TiePolicy, ZeroPositivePolicy};
use crate::pipeline::stage2_lift::{ModelDiagnostics, ModelFailure};
use crate::report::json::{render_pipeline_step_json, render_summary_json};
use crate::report::text::render_report_text;
use crate::report::{
    FailedModel, InputSummary, ReportContext, SummaryData, ToolMeta, format_f64_6, fraction,
    rank_models, summarize_curve,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Standalone,
    Pipeline,
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct Stage3Input<'a> {
    pub table: &'a LiftTable,
    pub diagnostics: &'a [ModelDiagnostics],
    pub failures: &'a [ModelFailure],
    pub profile: LiftProfile,
    pub run_mode: RunMode,

    pub input_path: String,
    pub label_col: String,
    pub n_observations: usize,
    pub n_positives: usize,
    pub models: Vec<String>,
    pub duplicate_ids: usize,

    pub tool_name: String,
    pub tool_version: String,
    pub git_hash: Option<String>,
}

pub fn write_reports(input: &Stage3Input<'_>, out_dir: &Path) -> Result<(), ReportError> {
    fs::create_dir_all(out_dir)?;

    write_lift_tsv(input.table, &out_dir.join("lift.tsv"))?;

    let summary = build_summary(input);
    write_text(&out_dir.join("summary.json"), &render_summary_json(&summary)?)?;

    let report_ctx = build_report_context(input, &summary);
    write_text(&out_dir.join("report.txt"), &render_report_text(&report_ctx))?;

    if input.run_mode == RunMode::Pipeline {
        let json = render_pipeline_step_json(&summary)?;
        write_text(&out_dir.join("pipeline_step.json"), &json)?;
    }

    tracing::info!(out_dir = %out_dir.display(), "reports written");
    Ok(())
}

fn write_lift_tsv(table: &LiftTable, path: &Path) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    let header = [
        "model",
        "bin",
        "n",
        "positives",
        "capture_fraction",
        "cumulative_capture_fraction",
        "lift",
    ]
    .join("\t");
    writeln!(w, "{}", header)?;

    for row in table.rows() {
        writeln!(
            w,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            row.model_name,
            row.bin,
            row.n,
            format_f64_6(row.positives),
            format_f64_6(row.capture_fraction),
            format_f64_6(row.cumulative_capture_fraction),
            format_f64_6(row.lift)
        )?;
    }
    w.flush()
}

pub fn build_summary(input: &Stage3Input<'_>) -> SummaryData {
    let models = input
        .table
        .models()
        .map(|curve| {
            let ties = input
                .diagnostics
                .iter()
                .find(|d| d.model_name == curve.model_name)
                .map(|d| d.boundary_ties)
                .unwrap_or(0);
            summarize_curve(curve, ties)
        })
        .collect();

    let baseline = input
        .table
        .curve(crate::model::lift::BASELINE_NAME)
        .map(|c| c.cumulative())
        .unwrap_or_default();

    SummaryData {
        tool: ToolMeta {
            name: input.tool_name.clone(),
            version: input.tool_version.clone(),
            git_hash: input.git_hash.clone(),
        },
        run_mode: match input.run_mode {
            RunMode::Standalone => "standalone".to_string(),
            RunMode::Pipeline => "pipeline".to_string(),
        },
        input: InputSummary {
            path: input.input_path.clone(),
            label_col: input.label_col.clone(),
            n_observations: input.n_observations,
            n_positives: input.n_positives,
            positive_rate: fraction(input.n_positives, input.n_observations),
            models: input.models.clone(),
            duplicate_ids: input.duplicate_ids,
        },
        profile: input.profile,
        baseline,
        models,
        failed_models: input
            .failures
            .iter()
            .map(|f| FailedModel {
                model: f.model_name.clone(),
                error: f.error.to_string(),
            })
            .collect(),
    }
}

fn build_report_context(input: &Stage3Input<'_>, summary: &SummaryData) -> ReportContext {
    let baseline = input.table.curve(crate::model::lift::BASELINE_NAME);
    ReportContext {
        n_observations: input.n_observations,
        n_positives: input.n_positives,
        ranked: rank_models(&summary.models),
        failed: summary.failed_models.clone(),
        uneven_bins: input.n_observations % crate::model::lift::N_BINS != 0,
        baseline_area: baseline.map(|c| c.area()).unwrap_or(0.0),
        baseline_top_decile_lift: baseline.map(|c| c.top_decile_lift()).unwrap_or(0.0),
        tie_policy: match input.profile.ties {
            TiePolicy::InputOrder => "input-order (stable)".to_string(),
            TiePolicy::Spread => "spread".to_string(),
        },
        zero_positive_policy: match input.profile.zero_positives {
            ZeroPositivePolicy::Fail => "fail".to_string(),
            ZeroPositivePolicy::ZeroFill => "zero-fill".to_string(),
        },
    }
}

fn write_text(path: &Path, contents: &str) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    w.write_all(contents.as_bytes())?;
    if !contents.ends_with('\n') {
        w.write_all(b"\n")?;
    }
    w.flush()
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage3_report.rs"]
mod tests;
