use std::collections::HashSet;
use std::io::BufRead;
use std::path::Path;

use crate::input::labels::{parse_label, parse_score};
use crate::input::{InputError, ScoreColumn, ScoreTable, TableSpec};

pub fn parse_score_table(
    mut reader: Box<dyn BufRead>,
    path: &Path,
    spec: &TableSpec,
) -> Result<ScoreTable, InputError> {
    let mut buf = String::new();

    let read = reader.read_line(&mut buf)?;
    if read == 0 {
        return Err(InputError::Parse("scores table is empty".to_string()));
    }
    let header: Vec<String> = buf
        .trim_end()
        .split('\t')
        .map(|s| s.trim().to_string())
        .collect();

    let mut seen = HashSet::new();
    for name in &header {
        if name.is_empty() {
            return Err(InputError::Parse("empty column name in header".to_string()));
        }
        if !seen.insert(name.to_ascii_lowercase()) {
            return Err(InputError::Parse(format!("duplicate column in header: {}", name)));
        }
    }

    let label_idx = find_column(&header, &spec.label_col).ok_or_else(|| {
        InputError::InvalidInput(format!("label column not found: {}", spec.label_col))
    })?;
    let id_idx = match &spec.id_col {
        Some(name) => Some(find_column(&header, name).ok_or_else(|| {
            InputError::InvalidInput(format!("id column not found: {}", name))
        })?),
        None => None,
    };

    let score_idx: Vec<usize> = (0..header.len())
        .filter(|&i| i != label_idx && Some(i) != id_idx)
        .collect();
    if score_idx.is_empty() {
        return Err(InputError::InvalidInput(
            "scores table has no model columns".to_string(),
        ));
    }

    let mut labels = Vec::new();
    let mut ids = id_idx.map(|_| Vec::new());
    let mut values: Vec<Vec<f64>> = vec![Vec::new(); score_idx.len()];
    let mut line_no = 1usize;

    loop {
        buf.clear();
        let read = reader.read_line(&mut buf)?;
        if read == 0 {
            break;
        }
        line_no += 1;
        let line = buf.trim_end_matches(['\n', '\r']);
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != header.len() {
            return Err(InputError::InvalidInput(format!(
                "line {} has {} fields, expected {}",
                line_no,
                fields.len(),
                header.len()
            )));
        }

        let label = parse_label(fields[label_idx]).ok_or_else(|| {
            InputError::Parse(format!(
                "line {}: invalid label {:?} in column {}",
                line_no, fields[label_idx], header[label_idx]
            ))
        })?;
        labels.push(label);

        if let (Some(ids), Some(idx)) = (ids.as_mut(), id_idx) {
            ids.push(fields[idx].trim().to_string());
        }

        for (col, &idx) in score_idx.iter().enumerate() {
            let score = parse_score(fields[idx]).ok_or_else(|| {
                InputError::Parse(format!(
                    "line {}: invalid score {:?} in column {}",
                    line_no, fields[idx], header[idx]
                ))
            })?;
            values[col].push(score);
        }
    }

    let columns = score_idx
        .iter()
        .zip(values)
        .map(|(&idx, values)| ScoreColumn {
            name: header[idx].clone(),
            values,
        })
        .collect();

    Ok(ScoreTable {
        path: path.to_path_buf(),
        label_col: header[label_idx].clone(),
        ids,
        labels,
        columns,
    })
}

fn find_column(header: &[String], name: &str) -> Option<usize> {
    header.iter().position(|h| h.eq_ignore_ascii_case(name))
}
