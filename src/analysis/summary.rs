use std::collections::HashSet;

use serde::Serialize;

use crate::batch::Experiment;
use crate::keyer::BatchKeys;

// ---------------------------------------------------------------------------
// Per-experiment key statistics
// ---------------------------------------------------------------------------

/// Counts for one experiment's keys against every strictly earlier
/// experiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct KeyStats {
    /// Rows in this experiment.
    pub total: usize,
    /// Distinct keys in this experiment.
    pub unique: usize,
    /// `total - unique`.
    pub duplicate: usize,
    /// Rows whose key no earlier experiment contains.
    pub new: usize,
    /// Distinct keys no earlier experiment contains.
    pub new_unique: usize,
    /// `total - new`.
    pub seen: usize,
    /// `unique - new_unique`.
    pub seen_unique: usize,
}

impl KeyStats {
    /// Statistics for `keys` given the keys of all earlier experiments.
    pub fn against(seen: &HashSet<usize>, keys: &[usize]) -> Self {
        let distinct: HashSet<usize> = keys.iter().copied().collect();
        let total = keys.len();
        let unique = distinct.len();
        let new = keys.iter().filter(|k| !seen.contains(k)).count();
        let new_unique = distinct.iter().filter(|k| !seen.contains(k)).count();

        KeyStats {
            total,
            unique,
            duplicate: total - unique,
            new,
            new_unique,
            seen: total - new,
            seen_unique: unique - new_unique,
        }
    }

    pub fn unique_perc(&self) -> f64 {
        percentage(self.unique, self.total)
    }

    pub fn duplicate_perc(&self) -> f64 {
        percentage(self.duplicate, self.total)
    }

    pub fn new_perc(&self) -> f64 {
        percentage(self.new, self.total)
    }

    pub fn seen_perc(&self) -> f64 {
        percentage(self.seen, self.total)
    }

    /// Share of this experiment's distinct keys that are new.
    pub fn new_unique_perc(&self) -> f64 {
        percentage(self.new_unique, self.unique)
    }

    pub fn seen_unique_perc(&self) -> f64 {
        percentage(self.seen_unique, self.unique)
    }
}

/// `part / whole` as a percentage rounded to two decimals; 0 when `whole` is 0.
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    (part as f64 / whole as f64 * 10_000.0).round() / 100.0
}

/// Fold over experiments in order. The running set holds the distinct keys of
/// every experiment already visited and is extended only after an
/// experiment's statistics have been taken.
pub fn summarize<K: AsRef<[usize]>>(per_experiment: &[K]) -> Vec<KeyStats> {
    per_experiment
        .iter()
        .scan(HashSet::new(), |seen, keys| {
            let keys = keys.as_ref();
            let stats = KeyStats::against(seen, keys);
            seen.extend(keys.iter().copied());
            Some(stats)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Summary table for the sequential dashboard
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentSummary {
    pub name: String,
    pub order: i64,
    pub peptides: KeyStats,
    pub proteins: KeyStats,
}

/// One summary per experiment of a keyed batch. `experiments` must be in the
/// order the batch was keyed.
pub fn summary_table(experiments: &[&Experiment], keys: &BatchKeys) -> Vec<ExperimentSummary> {
    let peptides = summarize(&keys.peptides);
    let proteins = summarize(&keys.proteins);

    experiments
        .iter()
        .zip(peptides)
        .zip(proteins)
        .map(|((ex, peptides), proteins)| ExperimentSummary {
            name: ex.label.clone(),
            order: ex.order,
            peptides,
            proteins,
        })
        .collect()
}

/// Flat export row with one column per statistic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub name: String,
    pub order: i64,
    pub unique_peptides: usize,
    pub duplicate_peptides: usize,
    pub total_peptides: usize,
    pub new_unique_peptides: usize,
    pub new_peptides: usize,
    pub seen_unique_peptides: usize,
    pub seen_peptides: usize,
    pub unique_proteins: usize,
    pub duplicate_proteins: usize,
    pub total_proteins: usize,
    pub new_proteins: usize,
    pub new_unique_proteins: usize,
    pub seen_proteins: usize,
    pub seen_unique_proteins: usize,
    pub unique_peptides_perc: f64,
    pub duplicate_peptides_perc: f64,
    pub new_peptides_perc: f64,
    pub seen_peptides_perc: f64,
    pub new_proteins_perc: f64,
    pub seen_proteins_perc: f64,
}

impl From<&ExperimentSummary> for SummaryRow {
    fn from(s: &ExperimentSummary) -> Self {
        let (pep, prot) = (&s.peptides, &s.proteins);
        SummaryRow {
            name: s.name.clone(),
            order: s.order,
            unique_peptides: pep.unique,
            duplicate_peptides: pep.duplicate,
            total_peptides: pep.total,
            new_unique_peptides: pep.new_unique,
            new_peptides: pep.new,
            seen_unique_peptides: pep.seen_unique,
            seen_peptides: pep.seen,
            unique_proteins: prot.unique,
            duplicate_proteins: prot.duplicate,
            total_proteins: prot.total,
            new_proteins: prot.new,
            new_unique_proteins: prot.new_unique,
            seen_proteins: prot.seen,
            seen_unique_proteins: prot.seen_unique,
            unique_peptides_perc: pep.unique_perc(),
            duplicate_peptides_perc: pep.duplicate_perc(),
            new_peptides_perc: pep.new_perc(),
            seen_peptides_perc: pep.seen_perc(),
            new_proteins_perc: prot.new_perc(),
            seen_proteins_perc: prot.seen_perc(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_new_and_seen() {
        // {A, B}, {B, C}, {C, D}
        let stats = summarize(&[vec![0, 1], vec![1, 2], vec![2, 3]]);

        assert_eq!(stats[0].new, 2);
        assert_eq!(stats[0].seen, 0);

        assert_eq!(
            stats[1],
            KeyStats {
                total: 2,
                unique: 2,
                duplicate: 0,
                new: 1,
                new_unique: 1,
                seen: 1,
                seen_unique: 1,
            }
        );
        assert_eq!(stats[2].new, 1);
        assert_eq!(stats[2].seen, 1);
    }

    #[test]
    fn duplicates_count_rows_not_keys() {
        let stats = summarize(&[vec![0, 0, 1], vec![0, 0, 2, 2, 2]]);
        assert_eq!(stats[0].duplicate, 1);
        assert_eq!(stats[1].total, 5);
        assert_eq!(stats[1].unique, 2);
        assert_eq!(stats[1].duplicate, 3);
        assert_eq!(stats[1].new, 3);
        assert_eq!(stats[1].new_unique, 1);
        assert_eq!(stats[1].seen, 2);
        assert_eq!(stats[1].seen_unique, 1);
    }

    #[test]
    fn later_experiments_do_not_affect_earlier_ones() {
        let short = summarize(&[vec![0, 1]]);
        let long = summarize(&[vec![0, 1], vec![0, 1, 2]]);
        assert_eq!(short[0], long[0]);
    }

    #[test]
    fn empty_experiment_has_zero_percentages() {
        let stats = summarize(&[vec![0], vec![]]);
        let empty = stats[1];
        assert_eq!(empty.total, 0);
        assert_eq!(empty.unique_perc(), 0.0);
        assert_eq!(empty.duplicate_perc(), 0.0);
        assert_eq!(empty.new_perc(), 0.0);
        assert_eq!(empty.seen_perc(), 0.0);
        assert_eq!(empty.new_unique_perc(), 0.0);
    }

    #[test]
    fn percentages_round_to_two_decimals() {
        assert_eq!(percentage(1, 3), 33.33);
        assert_eq!(percentage(2, 3), 66.67);
        assert_eq!(percentage(3, 3), 100.0);
        assert_eq!(percentage(5, 0), 0.0);
    }
}
