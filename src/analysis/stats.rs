use serde::Serialize;

use crate::batch::Experiment;
use crate::data::model::{FilterFile, ProteinLine};

// ---------------------------------------------------------------------------
// Descriptive statistics
// ---------------------------------------------------------------------------

/// Arithmetic mean, 0 for an empty slice.
#[inline]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1), 0 below two values.
#[inline]
pub fn stddev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    (values.iter().fold(0.0, |acc, x| acc + (x - m).powi(2)) / (values.len() - 1) as f64).sqrt()
}

/// Standard error of the mean, 0 below two values.
#[inline]
pub fn stderr(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    stddev(values) / (values.len() as f64).sqrt()
}

// ---------------------------------------------------------------------------
// Metrics shown on the Stats dashboard
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    SequenceCoverage,
    NormalizedCoverage,
    SpectrumCount,
    SequenceCount,
    Nsaf,
    Empai,
    XCorr,
    DeltaCn,
    Conf,
}

impl Metric {
    pub const ALL: [Metric; 9] = [
        Metric::SequenceCoverage,
        Metric::NormalizedCoverage,
        Metric::SpectrumCount,
        Metric::SequenceCount,
        Metric::Nsaf,
        Metric::Empai,
        Metric::XCorr,
        Metric::DeltaCn,
        Metric::Conf,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Metric::SequenceCoverage => "Average Protein Sequence Coverage",
            Metric::NormalizedCoverage => "Average Normalized Protein Sequence Coverage",
            Metric::SpectrumCount => "Average Protein Spectrum Count",
            Metric::SequenceCount => "Average Protein Sequence Count",
            Metric::Nsaf => "Average Protein NSAF",
            Metric::Empai => "Average Protein EMPAI",
            Metric::XCorr => "Average Peptide XCorr",
            Metric::DeltaCn => "Average Peptide Delta CN",
            Metric::Conf => "Average Peptide Confidence",
        }
    }

    pub fn axis_label(&self) -> &'static str {
        match self {
            Metric::SequenceCoverage => "Coverage %",
            Metric::NormalizedCoverage => "Normalized Coverage",
            Metric::SpectrumCount => "Spectrum Count",
            Metric::SequenceCount => "Sequence Count",
            Metric::Nsaf => "NSAF",
            Metric::Empai => "EMPAI",
            Metric::XCorr => "XCorr",
            Metric::DeltaCn => "Delta CN",
            Metric::Conf => "Confidence",
        }
    }
}

// ---------------------------------------------------------------------------
// Per-experiment statistics
// ---------------------------------------------------------------------------

/// Protein statistics come from the leading protein of every result group,
/// peptide statistics from every peptide line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExperimentStats {
    pub name: String,
    pub order: i64,
    /// Number of result groups.
    pub proteins: usize,
    /// Number of peptide lines.
    pub peptides: usize,
    pub sequence_coverage: f64,
    pub sequence_coverage_norm: f64,
    pub spectrum_count: f64,
    pub sequence_count: f64,
    pub nsaf: f64,
    pub empai: f64,
    pub x_corr: f64,
    pub delta_cn: f64,
    pub conf: f64,
    pub sequence_coverage_sem: f64,
    pub spectrum_count_sem: f64,
    pub sequence_count_sem: f64,
    pub nsaf_sem: f64,
    pub empai_sem: f64,
    pub x_corr_sem: f64,
    pub delta_cn_sem: f64,
    pub conf_sem: f64,
}

impl ExperimentStats {
    pub fn compute(name: &str, order: i64, file: &FilterFile) -> Self {
        let leading: Vec<_> = file.results.iter().filter_map(|r| r.leading_protein()).collect();
        let protein_values = |f: fn(&ProteinLine) -> f64| -> Vec<f64> {
            leading.iter().map(|p| f(p)).collect()
        };
        let coverage = protein_values(|p| p.sequence_coverage);
        let spectrum_count = protein_values(|p| p.spectrum_count as f64);
        let sequence_count = protein_values(|p| p.sequence_count as f64);
        let nsaf = protein_values(|p| p.nsaf);
        let empai = protein_values(|p| p.empai);

        let peptides: Vec<_> = file.results.iter().flat_map(|r| r.peptides.iter()).collect();
        let x_corr: Vec<f64> = peptides.iter().map(|p| p.x_corr).collect();
        let delta_cn: Vec<f64> = peptides.iter().map(|p| p.delta_cn).collect();
        let conf: Vec<f64> = peptides.iter().map(|p| p.conf).collect();

        let proteins = file.group_count();
        ExperimentStats {
            name: name.to_string(),
            order,
            proteins,
            peptides: peptides.len(),
            sequence_coverage: mean(&coverage),
            sequence_coverage_norm: mean(&coverage) * proteins as f64,
            spectrum_count: mean(&spectrum_count),
            sequence_count: mean(&sequence_count),
            nsaf: mean(&nsaf),
            empai: mean(&empai),
            x_corr: mean(&x_corr),
            delta_cn: mean(&delta_cn),
            conf: mean(&conf),
            sequence_coverage_sem: stderr(&coverage),
            spectrum_count_sem: stderr(&spectrum_count),
            sequence_count_sem: stderr(&sequence_count),
            nsaf_sem: stderr(&nsaf),
            empai_sem: stderr(&empai),
            x_corr_sem: stderr(&x_corr),
            delta_cn_sem: stderr(&delta_cn),
            conf_sem: stderr(&conf),
        }
    }

    /// Mean of `metric` and its standard error, if it has one.
    pub fn value(&self, metric: Metric) -> (f64, Option<f64>) {
        match metric {
            Metric::SequenceCoverage => (self.sequence_coverage, Some(self.sequence_coverage_sem)),
            Metric::NormalizedCoverage => (self.sequence_coverage_norm, None),
            Metric::SpectrumCount => (self.spectrum_count, Some(self.spectrum_count_sem)),
            Metric::SequenceCount => (self.sequence_count, Some(self.sequence_count_sem)),
            Metric::Nsaf => (self.nsaf, Some(self.nsaf_sem)),
            Metric::Empai => (self.empai, Some(self.empai_sem)),
            Metric::XCorr => (self.x_corr, Some(self.x_corr_sem)),
            Metric::DeltaCn => (self.delta_cn, Some(self.delta_cn_sem)),
            Metric::Conf => (self.conf, Some(self.conf_sem)),
        }
    }
}

pub fn stats_table(experiments: &[&Experiment]) -> Vec<ExperimentStats> {
    experiments
        .iter()
        .map(|ex| ExperimentStats::compute(&ex.label, ex.order, &ex.data))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::read_filter_file;
    use crate::data::testdata;

    #[test]
    fn mean_and_standard_error() {
        let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(mean(&v), 5.0);
        // sample variance 32 / 7
        assert!((stddev(&v) - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);
        assert!((stderr(&v) - (32.0f64 / 7.0).sqrt() / 8f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn degenerate_inputs_are_zero() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(stddev(&[3.0]), 0.0);
        assert_eq!(stderr(&[]), 0.0);
        assert_eq!(stderr(&[3.0]), 0.0);
    }

    #[test]
    fn experiment_stats_use_leading_proteins() {
        let file = read_filter_file(&testdata::build_file(&[
            (&["P1", "P2"], &[("K.AAA.R", 2), ("K.CCC.R", 2)]),
            (&["P3"], &[("K.DDD.R", 3)]),
        ]))
        .unwrap();
        let stats = ExperimentStats::compute("a", 1, &file);

        assert_eq!(stats.proteins, 2);
        assert_eq!(stats.peptides, 3);
        // leading coverages 25% and 30%
        assert_eq!(stats.sequence_coverage, 27.5);
        assert_eq!(stats.sequence_coverage_norm, 55.0);
        assert_eq!(stats.spectrum_count, 10.0);
        assert_eq!(stats.spectrum_count_sem, 0.0);
        assert!((stats.x_corr - 3.5).abs() < 1e-12);
        assert_eq!(stats.value(Metric::NormalizedCoverage), (55.0, None));
    }

    #[test]
    fn empty_file_does_not_fault() {
        let stats = ExperimentStats::compute("empty", 1, &FilterFile::default());
        assert_eq!(stats.proteins, 0);
        assert_eq!(stats.sequence_coverage, 0.0);
        assert_eq!(stats.conf_sem, 0.0);
    }
}
