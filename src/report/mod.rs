use serde::Serialize;

use crate::model::lift::LiftCurve;
use crate::model::profile::LiftProfile;

pub mod json;
pub mod text;

#[derive(Debug, Clone, Serialize)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
    pub git_hash: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InputSummary {
    pub path: String,
    pub label_col: String,
    pub n_observations: usize,
    pub n_positives: usize,
    pub positive_rate: f64,
    pub models: Vec<String>,
    pub duplicate_ids: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelSummary {
    pub model: String,
    pub top_decile_lift: f64,
    pub top_half_capture: f64,
    pub area_under_lift: f64,
    pub boundary_ties: usize,
    pub cumulative_capture: Vec<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FailedModel {
    pub model: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryData {
    pub tool: ToolMeta,
    pub run_mode: String,
    pub input: InputSummary,
    pub profile: LiftProfile,
    pub baseline: Vec<f64>,
    pub models: Vec<ModelSummary>,
    pub failed_models: Vec<FailedModel>,
}

#[derive(Debug, Clone)]
pub struct ReportContext {
    pub n_observations: usize,
    pub n_positives: usize,
    pub ranked: Vec<ModelSummary>,
    pub failed: Vec<FailedModel>,
    pub uneven_bins: bool,
    pub baseline_area: f64,
    pub baseline_top_decile_lift: f64,
    pub tie_policy: String,
    pub zero_positive_policy: String,
}

pub fn format_f64_6(v: f64) -> String {
    format!("{:.6}", v)
}

pub fn summarize_curve(curve: &LiftCurve, boundary_ties: usize) -> ModelSummary {
    ModelSummary {
        model: curve.model_name.clone(),
        top_decile_lift: curve.top_decile_lift(),
        top_half_capture: curve.at_bin(5),
        area_under_lift: curve.area(),
        boundary_ties,
        cumulative_capture: curve.cumulative(),
    }
}

/// Best first: larger area, then larger top-decile lift, then name.
pub fn rank_models(models: &[ModelSummary]) -> Vec<ModelSummary> {
    let mut sorted = models.to_vec();
    sorted.sort_by(|a, b| {
        b.area_under_lift
            .partial_cmp(&a.area_under_lift)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| {
                b.top_decile_lift
                    .partial_cmp(&a.top_decile_lift)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .then_with(|| a.model.cmp(&b.model))
    });
    sorted
}

pub fn fraction(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    count as f64 / total as f64
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/mod.rs"]
mod tests;
