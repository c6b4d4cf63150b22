use std::collections::{BTreeMap, BTreeSet};

use super::model::{FilterFile, ResultGroup};
use crate::analysis::overlap::{in_all, membership, only_in};
use crate::keyer::BatchKeys;

// ---------------------------------------------------------------------------
// Record selection by key
// ---------------------------------------------------------------------------

/// Which records the key predicate is applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubsetLevel {
    /// Keep peptide lines by peptide key; a group survives if any of its
    /// peptides does, with all its proteins.
    Peptide,
    /// Keep protein lines by protein key; a group survives if any of its
    /// proteins does, with all its peptides.
    Protein,
}

/// Return a copy of `file` restricted to records whose key passes `keep`.
///
/// `peptide_keys` / `protein_keys` hold one key per peptide / protein line in
/// file order. Surviving groups are ordered by descending leading-protein
/// coverage.
pub fn subset<F>(
    file: &FilterFile,
    peptide_keys: &[usize],
    protein_keys: &[usize],
    level: SubsetLevel,
    keep: F,
) -> FilterFile
where
    F: Fn(usize) -> bool,
{
    keyed_subset(file, peptide_keys, protein_keys, level, keep).0
}

/// Like [`subset`], also returning the keys of the kept peptide lines in the
/// order they appear in the returned file.
pub fn keyed_subset<F>(
    file: &FilterFile,
    peptide_keys: &[usize],
    protein_keys: &[usize],
    level: SubsetLevel,
    keep: F,
) -> (FilterFile, Vec<usize>)
where
    F: Fn(usize) -> bool,
{
    let mut peptide_keys = peptide_keys.iter().copied();
    let mut protein_keys = protein_keys.iter().copied();
    let mut kept_groups: Vec<(ResultGroup, Vec<usize>)> = Vec::new();

    for group in &file.results {
        // Advance both key streams for every group, kept or not.
        let peptides: Vec<Option<usize>> = group.peptides.iter().map(|_| peptide_keys.next()).collect();
        let protein_pass: Vec<bool> = group
            .proteins
            .iter()
            .map(|_| protein_keys.next().is_some_and(&keep))
            .collect();

        let (kept, keys) = match level {
            SubsetLevel::Peptide => {
                let (lines, keys): (Vec<_>, Vec<_>) = group
                    .peptides
                    .iter()
                    .zip(&peptides)
                    .filter_map(|(p, key)| (*key).filter(|&k| keep(k)).map(|k| (p.clone(), k)))
                    .unzip();
                let kept = ResultGroup {
                    proteins: group.proteins.clone(),
                    peptides: lines,
                };
                (kept, keys)
            }
            SubsetLevel::Protein => {
                let kept = ResultGroup {
                    proteins: group
                        .proteins
                        .iter()
                        .zip(&protein_pass)
                        .filter(|(_, pass)| **pass)
                        .map(|(p, _)| p.clone())
                        .collect(),
                    peptides: group.peptides.clone(),
                };
                (kept, peptides.iter().flatten().copied().collect())
            }
        };

        if !kept.proteins.is_empty() && !kept.peptides.is_empty() {
            kept_groups.push((kept, keys));
        }
    }

    kept_groups.sort_by(|(a, _), (b, _)| b.leading_coverage().total_cmp(&a.leading_coverage()));
    let (results, keys): (Vec<ResultGroup>, Vec<Vec<usize>>) = kept_groups.into_iter().unzip();
    (file.with_results(results), keys.concat())
}

// ---------------------------------------------------------------------------
// Difference / intersection per experiment
// ---------------------------------------------------------------------------

/// The two subsets the Diff dashboard writes for one experiment.
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentSubsets {
    /// Records whose key occurs in no other experiment.
    pub difference: FilterFile,
    /// Records whose key occurs in every experiment.
    pub intersection: FilterFile,
    /// Batch keys of the peptide lines of `difference`, in file order.
    pub difference_keys: Vec<usize>,
    /// Batch keys of the peptide lines of `intersection`, in file order.
    pub intersection_keys: Vec<usize>,
}

/// Membership of every key of the chosen level across a keyed batch.
pub fn key_membership(keys: &BatchKeys, level: SubsetLevel) -> BTreeMap<usize, BTreeSet<usize>> {
    match level {
        SubsetLevel::Peptide => membership(&keys.peptides),
        SubsetLevel::Protein => membership(&keys.proteins),
    }
}

/// Difference and intersection subsets of every experiment. `files` must be
/// in the order the batch was keyed.
pub fn diff_subsets(files: &[&FilterFile], keys: &BatchKeys, level: SubsetLevel) -> Vec<ExperimentSubsets> {
    let members = key_membership(keys, level);
    let n = files.len();

    files
        .iter()
        .enumerate()
        .map(|(i, file)| {
            let only_here = |key: usize| only_in(&members, key, i);
            let everywhere = |key: usize| in_all(&members, key, n);
            let (difference, difference_keys) =
                keyed_subset(file, &keys.peptides[i], &keys.proteins[i], level, only_here);
            let (intersection, intersection_keys) =
                keyed_subset(file, &keys.peptides[i], &keys.proteins[i], level, everywhere);
            ExperimentSubsets {
                difference,
                intersection,
                difference_keys,
                intersection_keys,
            }
        })
        .collect()
}
