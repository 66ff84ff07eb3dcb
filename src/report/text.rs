use crate::model::lift::N_BINS;
use crate::report::{ModelSummary, ReportContext, format_f64_6};

pub fn render_report_text(ctx: &ReportContext) -> String {
    let mut out = String::new();

    out.push_str("Decile Lift Comparison Report\n");
    out.push_str("=============================\n\n");

    out.push_str("1. Population\n");
    out.push_str(&format!("Observations: {}\n", ctx.n_observations));
    out.push_str(&format!("Positives: {}\n", ctx.n_positives));
    out.push_str(&format!(
        "Positive rate: {}\n\n",
        format_f64_6(crate::report::fraction(ctx.n_positives, ctx.n_observations))
    ));

    out.push_str("2. Model ranking\n");
    if ctx.ranked.is_empty() {
        out.push_str("No model produced a lift curve.\n");
    }
    for (i, m) in ctx.ranked.iter().enumerate() {
        out.push_str(&format!(
            "{}. {}: area={}, top_decile_lift={}, top_half_capture={}\n",
            i + 1,
            m.model,
            format_f64_6(m.area_under_lift),
            format_f64_6(m.top_decile_lift),
            format_f64_6(m.top_half_capture)
        ));
    }
    out.push_str(&format!(
        "Baseline: area={}, top_decile_lift={}\n\n",
        format_f64_6(ctx.baseline_area),
        format_f64_6(ctx.baseline_top_decile_lift)
    ));

    if let Some(best) = ctx.ranked.first() {
        out.push_str("3. Verdict\n");
        out.push_str(&format!("{}\n\n", verdict(best)));
    }

    out.push_str("4. Caveats\n");
    out.push_str(&format!("Tie policy: {}\n", ctx.tie_policy));
    out.push_str(&format!(
        "Zero-positive policy: {}\n",
        ctx.zero_positive_policy
    ));
    if ctx.uneven_bins {
        out.push_str(&format!(
            "Population is not divisible by {}; leading bins hold one extra observation.\n",
            N_BINS
        ));
    }
    for m in &ctx.ranked {
        if m.boundary_ties > 0 {
            out.push_str(&format!(
                "{}: tied scores span {} bin boundaries.\n",
                m.model, m.boundary_ties
            ));
        }
    }
    for f in &ctx.failed {
        out.push_str(&format!("{}: failed ({})\n", f.model, f.error));
    }

    out
}

fn verdict(best: &ModelSummary) -> String {
    let strength = if best.top_decile_lift >= 3.0 {
        "strong"
    } else if best.top_decile_lift >= 1.5 {
        "moderate"
    } else if best.top_decile_lift > 1.0 {
        "weak"
    } else {
        "no"
    };
    format!(
        "Best model {} shows {} early lift over the no-skill baseline.",
        best.model, strength
    )
}
