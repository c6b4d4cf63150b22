//! Experiment batches: the uploaded files with their user-chosen order and
//! label, validated and arranged before any keying happens.
use std::collections::HashSet;
use std::path::PathBuf;

use thiserror::Error;

use crate::data::model::FilterFile;

/// One uploaded DTASelect-filter file.
#[derive(Debug, Clone, PartialEq)]
pub struct Experiment {
    pub path: PathBuf,
    pub file_name: String,
    pub label: String,
    pub order: i64,
    pub data: FilterFile,
}

impl Experiment {
    /// Wrap a parsed file, with defaults derived from its name and its
    /// 0-based position in the upload.
    pub fn new(path: PathBuf, data: FilterFile, position: usize) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let label = default_label(&file_name).to_string();
        let order = default_order(&label, position);
        Experiment {
            path,
            file_name,
            label,
            order,
            data,
        }
    }
}

/// File name without the `_DTASelect-filter.txt`, `DTASelect-filter.txt` or
/// `.txt` suffix.
pub fn default_label(file_name: &str) -> &str {
    for suffix in ["_DTASelect-filter.txt", "DTASelect-filter.txt", ".txt"] {
        if let Some((stem, _)) = file_name.split_once(suffix) {
            return stem;
        }
    }
    file_name
}

/// A numeric label is its own order; anything else gets its 1-based upload
/// position.
pub fn default_order(label: &str, position: usize) -> i64 {
    label.parse().unwrap_or(position as i64 + 1)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq)]
pub enum BatchError {
    #[error("Upload at least one DTASelect-filter file!")]
    Empty,
    #[error("Order must be unique! ({0} is used more than once)")]
    DuplicateOrder(i64),
    #[error("Labels must be unique! (`{0}` is used more than once)")]
    DuplicateLabel(String),
    #[error("Incorrect number of files: {0}. Please use only 2 or 3 files!")]
    FileCount(usize),
}

/// How many experiments a dashboard accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileCount {
    AtLeastOne,
    TwoOrThree,
}

impl FileCount {
    fn check(self, n: usize) -> Result<(), BatchError> {
        match self {
            FileCount::AtLeastOne if n == 0 => Err(BatchError::Empty),
            FileCount::TwoOrThree if !(2..=3).contains(&n) => Err(BatchError::FileCount(n)),
            _ => Ok(()),
        }
    }
}

/// Validate the batch and return it sorted by order.
///
/// Checked in turn: at least one file, unique orders, unique labels, and the
/// file count the dashboard needs.
pub fn arrange(experiments: &[Experiment], count: FileCount) -> Result<Vec<&Experiment>, BatchError> {
    if experiments.is_empty() {
        return Err(BatchError::Empty);
    }

    let mut orders = HashSet::new();
    if let Some(ex) = experiments.iter().find(|ex| !orders.insert(ex.order)) {
        return Err(BatchError::DuplicateOrder(ex.order));
    }
    let mut labels = HashSet::new();
    if let Some(ex) = experiments.iter().find(|ex| !labels.insert(ex.label.as_str())) {
        return Err(BatchError::DuplicateLabel(ex.label.clone()));
    }
    count.check(experiments.len())?;

    let mut sorted: Vec<&Experiment> = experiments.iter().collect();
    sorted.sort_by_key(|ex| ex.order);
    Ok(sorted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn experiment(label: &str, order: i64) -> Experiment {
        Experiment {
            path: PathBuf::from(format!("{label}.txt")),
            file_name: format!("{label}.txt"),
            label: label.to_string(),
            order,
            data: FilterFile::default(),
        }
    }

    #[test]
    fn labels_from_file_names() {
        assert_eq!(default_label("3_DTASelect-filter.txt"), "3");
        assert_eq!(default_label("runDTASelect-filter.txt"), "run");
        assert_eq!(default_label("sample.txt"), "sample");
        assert_eq!(default_label("noext"), "noext");
    }

    #[test]
    fn numeric_labels_set_the_order() {
        assert_eq!(default_order("12", 0), 12);
        assert_eq!(default_order("A1", 0), 1);
        assert_eq!(default_order("A1", 4), 5);
    }

    #[test]
    fn new_experiment_uses_defaults() {
        let ex = Experiment::new(
            PathBuf::from("/tmp/7_DTASelect-filter.txt"),
            FilterFile::default(),
            0,
        );
        assert_eq!(ex.file_name, "7_DTASelect-filter.txt");
        assert_eq!(ex.label, "7");
        assert_eq!(ex.order, 7);
    }

    #[test]
    fn arrange_sorts_by_order() {
        let batch = [experiment("c", 3), experiment("a", 1), experiment("b", 2)];
        let sorted = arrange(&batch, FileCount::AtLeastOne).unwrap();
        let labels: Vec<_> = sorted.iter().map(|ex| ex.label.as_str()).collect();
        assert_eq!(labels, ["a", "b", "c"]);
    }

    #[test]
    fn rejects_invalid_batches() {
        assert_eq!(arrange(&[], FileCount::AtLeastOne), Err(BatchError::Empty));
        assert_eq!(
            arrange(&[experiment("a", 1), experiment("b", 1)], FileCount::AtLeastOne),
            Err(BatchError::DuplicateOrder(1))
        );
        assert_eq!(
            arrange(&[experiment("a", 1), experiment("a", 2)], FileCount::AtLeastOne),
            Err(BatchError::DuplicateLabel("a".into()))
        );
        assert_eq!(
            arrange(&[experiment("a", 1)], FileCount::TwoOrThree),
            Err(BatchError::FileCount(1))
        );
        let four: Vec<_> = (0..4).map(|i| experiment(&i.to_string(), i)).collect();
        assert_eq!(arrange(&four, FileCount::TwoOrThree), Err(BatchError::FileCount(4)));
        assert!(arrange(&four[..3], FileCount::TwoOrThree).is_ok());
    }
}
