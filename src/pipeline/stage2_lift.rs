use std::cmp::Ordering;

use crate::model::lift::{
    BASELINE_NAME, LiftCurve, LiftRow, LiftTable, N_BINS, Observation, ScoredDataset,
    baseline_fraction,
};
use crate::model::profile::{LiftProfile, TiePolicy, ZeroPositivePolicy};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LiftError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("degenerate input: {0}")]
    DegenerateInput(String),
}

#[derive(Debug, Clone)]
pub struct ModelFailure {
    pub model_name: String,
    pub error: LiftError,
}

#[derive(Debug, Clone)]
pub struct ModelDiagnostics {
    pub model_name: String,
    /// Bin boundaries where the last score of one bin equals the first score
    /// of the next.
    pub boundary_ties: usize,
}

#[derive(Debug, Clone)]
pub struct Stage2Output {
    pub table: LiftTable,
    pub diagnostics: Vec<ModelDiagnostics>,
    pub failures: Vec<ModelFailure>,
}

pub fn align_columns(
    model_name: &str,
    labels: &[bool],
    scores: &[f64],
) -> Result<ScoredDataset, LiftError> {
    if labels.len() != scores.len() {
        return Err(LiftError::InvalidInput(format!(
            "model {}: {} labels but {} scores",
            model_name,
            labels.len(),
            scores.len()
        )));
    }
    Ok(ScoredDataset::from_aligned(model_name, labels, scores))
}

/// Observations per bin: the first `n % 10` bins take one extra observation.
pub fn bin_sizes(n: usize) -> [usize; N_BINS] {
    let base = n / N_BINS;
    let rem = n % N_BINS;
    let mut sizes = [base; N_BINS];
    for size in sizes.iter_mut().take(rem) {
        *size += 1;
    }
    sizes
}

fn bin_bounds(n: usize) -> [(usize, usize); N_BINS] {
    let sizes = bin_sizes(n);
    let mut bounds = [(0usize, 0usize); N_BINS];
    let mut start = 0usize;
    for (b, &size) in sizes.iter().enumerate() {
        bounds[b] = (start, start + size);
        start += size;
    }
    bounds
}

/// Indices sorted by score, highest first. The sort is stable, so equal
/// scores keep their input order.
pub fn rank_descending(observations: &[Observation]) -> Vec<usize> {
    let mut order = (0..observations.len()).collect::<Vec<_>>();
    order.sort_by(|&a, &b| {
        observations[b]
            .score
            .partial_cmp(&observations[a].score)
            .unwrap_or(Ordering::Equal)
    });
    order
}

fn validate(dataset: &ScoredDataset) -> Result<(), LiftError> {
    if dataset.is_empty() {
        return Err(LiftError::InvalidInput(format!(
            "model {}: empty population",
            dataset.model_name
        )));
    }
    if let Some(idx) = dataset.observations.iter().position(|o| o.score.is_nan()) {
        return Err(LiftError::InvalidInput(format!(
            "model {}: score at index {} is NaN",
            dataset.model_name, idx
        )));
    }
    Ok(())
}

fn bin_positives(
    observations: &[Observation],
    order: &[usize],
    ties: TiePolicy,
) -> [f64; N_BINS] {
    let bounds = bin_bounds(order.len());
    let mut out = [0.0f64; N_BINS];
    match ties {
        TiePolicy::InputOrder => {
            for (b, &(start, end)) in bounds.iter().enumerate() {
                let count = order[start..end]
                    .iter()
                    .filter(|&&i| observations[i].label)
                    .count();
                out[b] = count as f64;
            }
        }
        TiePolicy::Spread => {
            let mut start = 0usize;
            while start < order.len() {
                let score = observations[order[start]].score;
                let mut end = start + 1;
                while end < order.len() && observations[order[end]].score == score {
                    end += 1;
                }
                let positives = order[start..end]
                    .iter()
                    .filter(|&&i| observations[i].label)
                    .count();
                if positives > 0 {
                    let group = (end - start) as f64;
                    for (b, &(lo, hi)) in bounds.iter().enumerate() {
                        let from = lo.max(start);
                        let to = hi.min(end);
                        if to > from {
                            out[b] += positives as f64 * (to - from) as f64 / group;
                        }
                    }
                }
                start = end;
            }
        }
    }
    out
}

pub fn compute_lift(
    dataset: &ScoredDataset,
    profile: &LiftProfile,
) -> Result<LiftCurve, LiftError> {
    validate(dataset)?;

    let total = dataset.n_positives();
    if total == 0 && profile.zero_positives == ZeroPositivePolicy::Fail {
        return Err(LiftError::DegenerateInput(format!(
            "model {}: no positive labels among {} observations",
            dataset.model_name,
            dataset.len()
        )));
    }

    let order = rank_descending(&dataset.observations);
    let sizes = bin_sizes(order.len());
    let positives = bin_positives(&dataset.observations, &order, profile.ties);

    let mut rows = Vec::with_capacity(N_BINS);
    let mut running = 0.0f64;
    for b in 0..N_BINS {
        let bin = (b + 1) as u8;
        running += positives[b];
        let (capture, cumulative) = if total == 0 {
            (0.0, 0.0)
        } else if b == N_BINS - 1 {
            (positives[b] / total as f64, 1.0)
        } else {
            (
                positives[b] / total as f64,
                (running / total as f64).min(1.0),
            )
        };
        rows.push(LiftRow {
            bin,
            model_name: dataset.model_name.clone(),
            n: sizes[b],
            positives: positives[b],
            capture_fraction: capture,
            cumulative_capture_fraction: cumulative,
            lift: cumulative / baseline_fraction(bin),
        });
    }

    Ok(LiftCurve {
        model_name: dataset.model_name.clone(),
        rows,
    })
}

/// No-skill reference: `bin / 10` regardless of data. `n` and `positives`
/// are the expected values for a random ranking of the population.
pub fn baseline_curve(n_observations: usize, n_positives: usize) -> LiftCurve {
    let sizes = bin_sizes(n_observations);
    let rows = (1..=N_BINS as u8)
        .map(|bin| LiftRow {
            bin,
            model_name: BASELINE_NAME.to_string(),
            n: sizes[(bin - 1) as usize],
            positives: n_positives as f64 / N_BINS as f64,
            capture_fraction: 1.0 / N_BINS as f64,
            cumulative_capture_fraction: baseline_fraction(bin),
            lift: 1.0,
        })
        .collect();
    LiftCurve {
        model_name: BASELINE_NAME.to_string(),
        rows,
    }
}

pub fn boundary_ties(dataset: &ScoredDataset) -> usize {
    let order = rank_descending(&dataset.observations);
    let bounds = bin_bounds(order.len());
    bounds
        .iter()
        .take(N_BINS - 1)
        .filter(|&&(_, end)| {
            end > 0
                && end < order.len()
                && dataset.observations[order[end - 1]].score
                    == dataset.observations[order[end]].score
        })
        .count()
}

pub fn run_stage2(datasets: &[ScoredDataset], profile: &LiftProfile) -> Stage2Output {
    let n_observations = datasets.first().map(|d| d.len()).unwrap_or(0);
    let n_positives = datasets.first().map(|d| d.n_positives()).unwrap_or(0);

    let mut table = LiftTable {
        curves: vec![baseline_curve(n_observations, n_positives)],
    };
    let mut diagnostics = Vec::new();
    let mut failures = Vec::new();

    for dataset in datasets {
        match compute_lift(dataset, profile) {
            Ok(curve) => {
                let ties = boundary_ties(dataset);
                if ties > 0 && profile.ties == TiePolicy::InputOrder {
                    tracing::warn!(
                        model = %dataset.model_name,
                        boundary_ties = ties,
                        "tied scores span decile boundaries; bins follow input order"
                    );
                }
                tracing::info!(
                    model = %dataset.model_name,
                    top_decile_lift = curve.top_decile_lift(),
                    area = curve.area(),
                    "lift computed"
                );
                diagnostics.push(ModelDiagnostics {
                    model_name: dataset.model_name.clone(),
                    boundary_ties: ties,
                });
                table.curves.push(curve);
            }
            Err(error) => {
                tracing::warn!(model = %dataset.model_name, %error, "lift computation failed");
                failures.push(ModelFailure {
                    model_name: dataset.model_name.clone(),
                    error,
                });
            }
        }
    }

    Stage2Output {
        table,
        diagnostics,
        failures,
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage2_lift.rs"]
mod tests;
