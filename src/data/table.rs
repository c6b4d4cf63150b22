use serde::Serialize;

use crate::batch::Experiment;
use crate::data::model::FilterFile;
use crate::keyer::{clean_sequence, unmodified_sequence, BatchKeys};

// ---------------------------------------------------------------------------
// Flattened observation rows
// ---------------------------------------------------------------------------

/// One peptide line of one experiment, with its batch key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeptideRow {
    /// 0-based position of the experiment in the sorted batch.
    pub experiment: usize,
    pub label: String,
    pub protein_group: String,
    pub sequence: String,
    pub clean_sequence: String,
    pub unmod_sequence: String,
    pub charge: u8,
    pub file_name: String,
    pub unique: String,
    pub x_corr: f64,
    pub delta_cn: f64,
    pub conf: f64,
    pub total_intensity: f64,
    pub peptide_key: usize,
}

/// One protein line of one experiment, with its batch key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProteinRow {
    pub experiment: usize,
    pub label: String,
    pub locus_name: String,
    pub protein_group: String,
    pub sequence_count: u32,
    pub spectrum_count: u32,
    pub sequence_coverage: f64,
    pub nsaf: f64,
    pub empai: f64,
    pub description: String,
    pub protein_key: usize,
}

/// Peptide rows of a keyed batch. `experiments` must be in keying order.
pub fn peptide_rows(experiments: &[&Experiment], keys: &BatchKeys) -> Vec<PeptideRow> {
    experiments
        .iter()
        .zip(&keys.peptides)
        .enumerate()
        .flat_map(|(i, (ex, peptide_keys))| file_peptide_rows(i, &ex.label, &ex.data, peptide_keys))
        .collect()
}

/// Peptide rows of one file. `peptide_keys` holds one key per peptide line in
/// file order.
pub fn file_peptide_rows(experiment: usize, label: &str, file: &FilterFile, peptide_keys: &[usize]) -> Vec<PeptideRow> {
    let peptides = file.results.iter().flat_map(|group| {
        let group_id = group.group_id();
        group.peptides.iter().map(move |p| (group_id.clone(), p))
    });
    peptides
        .zip(peptide_keys)
        .map(|((protein_group, p), &peptide_key)| {
            let clean = clean_sequence(&p.sequence);
            PeptideRow {
                experiment,
                label: label.to_string(),
                protein_group,
                sequence: p.sequence.clone(),
                clean_sequence: clean.to_string(),
                unmod_sequence: unmodified_sequence(clean),
                charge: p.charge,
                file_name: p.file_name.clone(),
                unique: p.unique.clone(),
                x_corr: p.x_corr,
                delta_cn: p.delta_cn,
                conf: p.conf,
                total_intensity: p.total_intensity,
                peptide_key,
            }
        })
        .collect()
}

/// Protein rows of a keyed batch. `experiments` must be in keying order.
pub fn protein_rows(experiments: &[&Experiment], keys: &BatchKeys) -> Vec<ProteinRow> {
    let mut rows = Vec::new();
    for (i, (ex, protein_keys)) in experiments.iter().zip(&keys.proteins).enumerate() {
        let proteins = ex
            .data
            .results
            .iter()
            .flat_map(|group| {
                let group_id = group.group_id();
                group.proteins.iter().map(move |p| (group_id.clone(), p))
            });
        for ((protein_group, p), &protein_key) in proteins.zip(protein_keys) {
            rows.push(ProteinRow {
                experiment: i,
                label: ex.label.clone(),
                locus_name: p.locus_name.clone(),
                protein_group,
                sequence_count: p.sequence_count,
                spectrum_count: p.spectrum_count,
                sequence_coverage: p.sequence_coverage,
                nsaf: p.nsaf,
                empai: p.empai,
                description: p.description.clone(),
                protein_key,
            });
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::config::IdentityConfig;
    use crate::data::loader::read_filter_file;
    use crate::data::testdata;
    use crate::keyer::key_batch;

    #[test]
    fn rows_carry_sequences_groups_and_keys() {
        let a = Experiment::new(
            PathBuf::from("a.txt"),
            read_filter_file(&testdata::build_file(&[(
                &["P1", "P2"],
                &[("K.PEPT(15.2)IDE.R", 2), ("K.AAAA.R", 3)],
            )]))
            .unwrap(),
            0,
        );
        let b = Experiment::new(
            PathBuf::from("b.txt"),
            read_filter_file(&testdata::build_file(&[(&["P2"], &[("K.AAAA.R", 3)])])).unwrap(),
            1,
        );
        let batch = [&a, &b];
        let files: Vec<_> = batch.iter().map(|ex| &ex.data).collect();
        let keys = key_batch(&files, IdentityConfig::default());

        let peptides = peptide_rows(&batch, &keys);
        assert_eq!(peptides.len(), 3);
        assert_eq!(peptides[0].clean_sequence, "PEPT(15.2)IDE");
        assert_eq!(peptides[0].unmod_sequence, "PEPTIDE");
        assert_eq!(peptides[0].protein_group, "P1;P2");
        assert_eq!(peptides[2].label, "b");
        assert_eq!(peptides[2].experiment, 1);
        assert_eq!(peptides[2].peptide_key, peptides[1].peptide_key);

        let proteins = protein_rows(&batch, &keys);
        assert_eq!(proteins.len(), 3);
        assert_eq!(proteins[1].locus_name, "P2");
        // groups "P1;P2" and "P2" differ
        assert_ne!(proteins[2].protein_key, proteins[1].protein_key);
        assert_eq!(proteins[0].protein_key, proteins[1].protein_key);
    }
}
