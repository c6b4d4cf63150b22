use std::collections::{BTreeMap, BTreeSet};

use crate::analysis::stats::mean;
use crate::batch::Experiment;
use crate::keyer::BatchKeys;

// ---------------------------------------------------------------------------
// Set overlap
// ---------------------------------------------------------------------------

/// Distinct keys of one experiment.
pub fn distinct(keys: &[usize]) -> BTreeSet<usize> {
    keys.iter().copied().collect()
}

/// Keys shared by every set, and keys of the union outside that core.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overlap {
    pub shared: BTreeSet<usize>,
    pub unique: BTreeSet<usize>,
}

pub fn overlap(sets: &[BTreeSet<usize>]) -> Overlap {
    let Some((first, rest)) = sets.split_first() else {
        return Overlap::default();
    };
    let shared: BTreeSet<usize> = first
        .iter()
        .copied()
        .filter(|k| rest.iter().all(|s| s.contains(k)))
        .collect();
    let unique = sets
        .iter()
        .flatten()
        .copied()
        .filter(|k| !shared.contains(k))
        .collect();
    Overlap { shared, unique }
}

/// Map every key to the experiments it occurs in.
pub fn membership<K: AsRef<[usize]>>(per_experiment: &[K]) -> BTreeMap<usize, BTreeSet<usize>> {
    let mut map: BTreeMap<usize, BTreeSet<usize>> = BTreeMap::new();
    for (experiment, keys) in per_experiment.iter().enumerate() {
        for &key in keys.as_ref() {
            map.entry(key).or_default().insert(experiment);
        }
    }
    map
}

/// Whether `key` occurs in experiment `i` and in no other.
pub fn only_in(members: &BTreeMap<usize, BTreeSet<usize>>, key: usize, i: usize) -> bool {
    members
        .get(&key)
        .is_some_and(|m| m.len() == 1 && m.contains(&i))
}

/// Whether `key` occurs in every one of `n` experiments.
pub fn in_all(members: &BTreeMap<usize, BTreeSet<usize>>, key: usize, n: usize) -> bool {
    members.get(&key).is_some_and(|m| m.len() == n)
}

/// Sizes of the Venn regions. Index `mask` counts the keys found in exactly
/// the experiments whose bits are set in `mask`; index 0 is always 0.
///
/// Intended for the 2 and 3 set diagrams.
pub fn venn_regions(sets: &[BTreeSet<usize>]) -> Vec<usize> {
    let mut masks: BTreeMap<usize, usize> = BTreeMap::new();
    for (i, set) in sets.iter().enumerate() {
        for &key in set {
            *masks.entry(key).or_default() |= 1 << i;
        }
    }
    let mut regions = vec![0; 1 << sets.len()];
    for mask in masks.into_values() {
        regions[mask] += 1;
    }
    regions
}

// ---------------------------------------------------------------------------
// Venn dashboard report
// ---------------------------------------------------------------------------

/// Everything the Venn dashboard shows for a 2 or 3 experiment batch.
#[derive(Debug, Clone, PartialEq)]
pub struct VennReport {
    pub labels: Vec<String>,
    pub file_names: Vec<String>,
    pub protein_sets: Vec<BTreeSet<usize>>,
    pub peptide_sets: Vec<BTreeSet<usize>>,
    pub protein_regions: Vec<usize>,
    pub peptide_regions: Vec<usize>,
    pub proteins: Overlap,
    pub peptides: Overlap,
    /// Mean sequence coverage over every protein line.
    pub average_coverage: Vec<f64>,
    /// Mean total intensity over every peptide line.
    pub average_intensity: Vec<f64>,
}

impl VennReport {
    pub fn build(experiments: &[&Experiment], keys: &BatchKeys) -> Self {
        let protein_sets: Vec<_> = keys.proteins.iter().map(|k| distinct(k)).collect();
        let peptide_sets: Vec<_> = keys.peptides.iter().map(|k| distinct(k)).collect();

        let average_coverage = experiments
            .iter()
            .map(|ex| {
                let values: Vec<f64> = ex
                    .data
                    .results
                    .iter()
                    .flat_map(|r| r.proteins.iter().map(|p| p.sequence_coverage))
                    .collect();
                mean(&values)
            })
            .collect();
        let average_intensity = experiments
            .iter()
            .map(|ex| {
                let values: Vec<f64> = ex
                    .data
                    .results
                    .iter()
                    .flat_map(|r| r.peptides.iter().map(|p| p.total_intensity))
                    .collect();
                mean(&values)
            })
            .collect();

        VennReport {
            labels: experiments.iter().map(|ex| ex.label.clone()).collect(),
            file_names: experiments.iter().map(|ex| ex.file_name.clone()).collect(),
            protein_regions: venn_regions(&protein_sets),
            peptide_regions: venn_regions(&peptide_sets),
            proteins: overlap(&protein_sets),
            peptides: overlap(&peptide_sets),
            protein_sets,
            peptide_sets,
            average_coverage,
            average_intensity,
        }
    }

    pub fn protein_counts(&self) -> Vec<usize> {
        self.protein_sets.iter().map(BTreeSet::len).collect()
    }

    pub fn peptide_counts(&self) -> Vec<usize> {
        self.peptide_sets.iter().map(BTreeSet::len).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(keys: &[usize]) -> BTreeSet<usize> {
        keys.iter().copied().collect()
    }

    #[test]
    fn two_set_overlap() {
        // {A, B, C} and {B, C, D}
        let o = overlap(&[set(&[0, 1, 2]), set(&[1, 2, 3])]);
        assert_eq!(o.shared, set(&[1, 2]));
        assert_eq!(o.unique, set(&[0, 3]));
    }

    #[test]
    fn three_set_overlap() {
        let o = overlap(&[set(&[0, 1, 2]), set(&[1, 2, 3]), set(&[2, 4])]);
        assert_eq!(o.shared, set(&[2]));
        assert_eq!(o.unique, set(&[0, 1, 3, 4]));
    }

    #[test]
    fn regions_partition_the_union() {
        let sets = [set(&[0, 1, 2]), set(&[1, 2, 3]), set(&[2, 4])];
        let regions = venn_regions(&sets);
        assert_eq!(regions.len(), 8);
        assert_eq!(regions[0b001], 1); // 0
        assert_eq!(regions[0b010], 1); // 3
        assert_eq!(regions[0b011], 1); // 1
        assert_eq!(regions[0b100], 1); // 4
        assert_eq!(regions[0b111], 1); // 2
        assert_eq!(regions.iter().sum::<usize>(), 5);
    }

    #[test]
    fn membership_lists_experiments() {
        let m = membership(&[vec![0, 1, 1], vec![1, 2]]);
        assert_eq!(m[&0], set(&[0]));
        assert_eq!(m[&1], set(&[0, 1]));
        assert_eq!(m[&2], set(&[1]));
    }

    #[test]
    fn membership_predicates() {
        let m = membership(&[vec![0, 1], vec![1, 2], vec![1]]);
        assert!(only_in(&m, 0, 0));
        assert!(!only_in(&m, 0, 1));
        assert!(!only_in(&m, 1, 0));
        assert!(in_all(&m, 1, 3));
        assert!(!in_all(&m, 2, 3));
        assert!(!in_all(&m, 9, 3));
    }

    #[test]
    fn overlap_of_nothing_is_empty() {
        assert_eq!(overlap(&[]), Overlap::default());
    }
}
