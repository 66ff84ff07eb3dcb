use std::path::{Path, PathBuf};

pub mod labels;
pub mod reader;
pub mod table;

use table::parse_score_table;

#[derive(Debug, Clone)]
pub struct ScoreColumn {
    pub name: String,
    pub values: Vec<f64>,
}

/// Ground-truth labels plus one score column per model, all aligned by row.
#[derive(Debug, Clone)]
pub struct ScoreTable {
    pub path: PathBuf,
    pub label_col: String,
    pub ids: Option<Vec<String>>,
    pub labels: Vec<bool>,
    pub columns: Vec<ScoreColumn>,
}

impl ScoreTable {
    pub fn n_rows(&self) -> usize {
        self.labels.len()
    }

    pub fn n_positives(&self) -> usize {
        self.labels.iter().filter(|&&l| l).count()
    }

    pub fn column(&self, name: &str) -> Option<&ScoreColumn> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }
}

#[derive(Debug, Clone)]
pub struct TableSpec {
    pub label_col: String,
    pub id_col: Option<String>,
}

impl Default for TableSpec {
    fn default() -> Self {
        Self {
            label_col: "label".to_string(),
            id_col: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("missing input: {0}")]
    MissingInput(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("parse error: {0}")]
    Parse(String),
}

pub fn load_score_table(path: &Path, spec: &TableSpec) -> Result<ScoreTable, InputError> {
    if !path.exists() {
        return Err(InputError::MissingInput(format!(
            "scores table not found: {}",
            path.display()
        )));
    }
    let reader = reader::open_maybe_gz(path)?;
    let table = parse_score_table(reader, path, spec)?;

    tracing::info!(
        path = %path.display(),
        rows = table.n_rows(),
        positives = table.n_positives(),
        models = table.columns.len(),
        "loaded scores table"
    );

    Ok(table)
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/tests.rs"]
mod tests;
