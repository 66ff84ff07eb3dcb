use std::collections::HashSet;

use crate::input::{InputError, ScoreTable};
use crate::model::lift::{N_BINS, ScoredDataset};
use crate::pipeline::stage2_lift::align_columns;

#[derive(Debug, Clone)]
pub struct Stage1Output {
    pub datasets: Vec<ScoredDataset>,
    pub n_observations: usize,
    pub n_positives: usize,
    pub duplicate_ids: usize,
}

/// Builds one dataset per selected model column. `models` picks the subset
/// and order; `None` keeps every score column in header order.
pub fn run_stage1(
    table: &ScoreTable,
    models: Option<&[String]>,
) -> Result<Stage1Output, InputError> {
    let selected: Vec<&str> = match models {
        Some(names) => {
            let mut seen = HashSet::new();
            let mut out = Vec::with_capacity(names.len());
            for name in names {
                let column = table.column(name).ok_or_else(|| {
                    InputError::InvalidInput(format!("model column not found: {}", name))
                })?;
                if !seen.insert(column.name.as_str()) {
                    return Err(InputError::InvalidInput(format!(
                        "model listed twice: {}",
                        name
                    )));
                }
                out.push(column.name.as_str());
            }
            out
        }
        None => table.columns.iter().map(|c| c.name.as_str()).collect(),
    };

    if selected.is_empty() {
        return Err(InputError::InvalidInput("no models selected".to_string()));
    }

    let mut datasets = Vec::with_capacity(selected.len());
    for name in selected {
        let Some(column) = table.column(name) else {
            continue;
        };
        let dataset = align_columns(name, &table.labels, &column.values)
            .map_err(|e| InputError::InvalidInput(e.to_string()))?;
        datasets.push(dataset);
    }

    let n_observations = table.n_rows();
    if n_observations % N_BINS != 0 {
        tracing::warn!(
            n_observations,
            "population is not divisible by {}; leading bins hold one extra observation",
            N_BINS
        );
    }

    let duplicate_ids = count_duplicates(table.ids.as_deref());
    if duplicate_ids > 0 {
        tracing::warn!(duplicate_ids, "identifier column contains duplicates");
    }

    Ok(Stage1Output {
        datasets,
        n_observations,
        n_positives: table.n_positives(),
        duplicate_ids,
    })
}

fn count_duplicates(ids: Option<&[String]>) -> usize {
    let Some(ids) = ids else {
        return 0;
    };
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().filter(|id| !seen.insert(id.as_str())).count()
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage1_load.rs"]
mod tests;
