use serde_json::json;

use crate::report::SummaryData;

pub fn render_summary_json(data: &SummaryData) -> serde_json::Result<String> {
    serde_json::to_string_pretty(data)
}

/// Compact record consumed by pipeline aggregators.
pub fn render_pipeline_step_json(data: &SummaryData) -> serde_json::Result<String> {
    let best = crate::report::rank_models(&data.models)
        .into_iter()
        .next()
        .map(|m| m.model);
    let status = if data.models.is_empty() { "failed" } else { "ok" };
    let step = json!({
        "tool": data.tool.name,
        "version": data.tool.version,
        "status": status,
        "artifacts": {
            "lift": "lift.tsv",
            "summary": "summary.json",
            "report": "report.txt",
        },
        "n_observations": data.input.n_observations,
        "n_models": data.models.len(),
        "n_failed": data.failed_models.len(),
        "best_model": best,
    });
    serde_json::to_string_pretty(&step)
}
