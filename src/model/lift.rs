
pub const N_BINS: usize = 10;
pub const BASELINE_NAME: &str = "baseline";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub label: bool,
    pub score: f64,
}

/// Scores of one model over the shared test population, aligned by index
/// with the labels.
#[derive(Debug, Clone)]
pub struct ScoredDataset {
    pub model_name: String,
    pub observations: Vec<Observation>,
}

impl ScoredDataset {
    pub fn from_aligned(model_name: &str, labels: &[bool], scores: &[f64]) -> Self {
        let observations = labels
            .iter()
            .zip(scores.iter())
            .map(|(&label, &score)| Observation { label, score })
            .collect();
        Self {
            model_name: model_name.to_string(),
            observations,
        }
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn n_positives(&self) -> usize {
        self.observations.iter().filter(|o| o.label).count()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiftRow {
    pub bin: u8,
    pub model_name: String,
    pub n: usize,
    pub positives: f64,
    pub capture_fraction: f64,
    pub cumulative_capture_fraction: f64,
    pub lift: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiftCurve {
    pub model_name: String,
    pub rows: Vec<LiftRow>,
}

impl LiftCurve {
    pub fn cumulative(&self) -> Vec<f64> {
        self.rows
            .iter()
            .map(|r| r.cumulative_capture_fraction)
            .collect()
    }

    pub fn at_bin(&self, bin: u8) -> f64 {
        self.rows
            .iter()
            .find(|r| r.bin == bin)
            .map(|r| r.cumulative_capture_fraction)
            .unwrap_or(0.0)
    }

    pub fn top_decile_lift(&self) -> f64 {
        self.rows.first().map(|r| r.lift).unwrap_or(0.0)
    }

    /// Mean cumulative capture over all bins; 0.55 for the baseline.
    pub fn area(&self) -> f64 {
        if self.rows.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.rows.iter().map(|r| r.cumulative_capture_fraction).sum();
        sum / self.rows.len() as f64
    }
}

/// Baseline first, then models in run order.
#[derive(Debug, Clone, Default)]
pub struct LiftTable {
    pub curves: Vec<LiftCurve>,
}

impl LiftTable {
    pub fn rows(&self) -> impl Iterator<Item = &LiftRow> {
        self.curves.iter().flat_map(|c| c.rows.iter())
    }

    pub fn curve(&self, model_name: &str) -> Option<&LiftCurve> {
        self.curves.iter().find(|c| c.model_name == model_name)
    }

    pub fn models(&self) -> impl Iterator<Item = &LiftCurve> {
        self.curves
            .iter()
            .filter(|c| c.model_name != BASELINE_NAME)
    }
}

pub fn baseline_fraction(bin: u8) -> f64 {
    bin as f64 / N_BINS as f64
}
