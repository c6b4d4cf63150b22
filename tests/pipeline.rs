use paser_dashboards::analysis::overlap::{distinct, overlap, venn_regions};
use paser_dashboards::analysis::summary::{summarize, summary_table, SummaryRow};
use paser_dashboards::batch::{arrange, Experiment, FileCount};
use paser_dashboards::config::IdentityConfig;
use paser_dashboards::data::export::to_csv_string;
use paser_dashboards::data::filter::{diff_subsets, SubsetLevel};
use paser_dashboards::data::loader::read_filter_file;
use paser_dashboards::data::writer::write_filter_file;
use paser_dashboards::keyer::key_batch;

const HEADER: &str = "DTASelect v2.1.12
/data/run
/data/db.fasta
Locus\tSequence Count\tSpectrum Count\tSequence Coverage\tLength\tMolWt\tpI\tValidation Status\tNSAF\tEMPAI\tDescriptive Name
Unique\tFileName\tXCorr\tDeltCN\tConf%\tM+H+\tCalcM+H+\tPPM\tTotalIntensity\tSpR\tProb Score\tpI\tIonProportion\tRedundancy\tSequence
";

const FOOTER: &str = "\tProteins\tPeptide IDs\tSpectra
Unfiltered\t10\t20\t30
Filtered\t2\t3\t3
";

fn protein(locus: &str, coverage: f64) -> String {
    format!("{locus}\t2\t10\t{coverage:.1}%\t300\t33000\t6.1\tU\t0.01\t1.2\t{locus} protein\n")
}

fn peptide(sequence: &str, file_name: &str) -> String {
    format!("*\t{file_name}\t3.5\t0.3\t99.9\t1234.5\t1234.6\t1.2\t10000\t1\t12.0\t6.0\t50.0\t1\t{sequence}\n")
}

fn file(body: &[String]) -> String {
    format!("{HEADER}{}{FOOTER}", body.concat())
}

/// Experiment 1: PEPTIDE +2, PEPT(15.99)IDE +2, AAAKR +3
/// Experiment 2: PEPTIDE +3, AAAKR +3
fn batch() -> Vec<Experiment> {
    let one = file(&[
        protein("P1", 40.0),
        peptide("K.PEPTIDE.R", "a.10.10.2"),
        peptide("K.PEPT(15.99)IDE.R", "a.11.11.2"),
        protein("P2", 20.0),
        peptide("R.AAAKR.G", "a.12.12.3"),
    ]);
    let two = file(&[
        protein("P2", 30.0),
        peptide("R.AAAKR.G", "b.20.20.3"),
        protein("P1", 10.0),
        peptide("K.PEPTIDE.R", "b.21.21.3"),
    ]);
    // Uploaded out of order; labels decide the order.
    vec![
        Experiment::new("2_DTASelect-filter.txt".into(), read_filter_file(&two).unwrap(), 0),
        Experiment::new("1_DTASelect-filter.txt".into(), read_filter_file(&one).unwrap(), 1),
    ]
}

#[test]
fn round_trip_is_exact() {
    for ex in batch() {
        let text = write_filter_file(&ex.data);
        assert_eq!(read_filter_file(&text).unwrap(), ex.data);
    }
}

#[test]
fn identity_options_change_the_keys() {
    let experiments = batch();
    let sorted = arrange(&experiments, FileCount::TwoOrThree).unwrap();
    assert_eq!(sorted[0].label, "1");
    let files: Vec<_> = sorted.iter().map(|ex| &ex.data).collect();

    let strict = key_batch(&files, IdentityConfig::default());
    let loose = key_batch(
        &files,
        IdentityConfig {
            use_charge: false,
            use_modifications: false,
            use_groups: true,
        },
    );

    let strict_stats = summarize(&strict.peptides);
    let loose_stats = summarize(&loose.peptides);
    // strict: 3 distinct in run 1; PEPTIDE +3 is new in run 2
    assert_eq!(strict_stats[0].unique, 3);
    assert_eq!(strict_stats[1].new, 1);
    assert_eq!(strict_stats[1].seen, 1);
    // loose: PEPTIDE and PEPT(15.99)IDE collapse; everything in run 2 is seen
    assert_eq!(loose_stats[0].unique, 2);
    assert_eq!(loose_stats[0].duplicate, 1);
    assert_eq!(loose_stats[1].new, 0);
    assert_eq!(loose_stats[1].seen_perc(), 100.0);
}

#[test]
fn summary_overlap_and_subsets() {
    let experiments = batch();
    let sorted = arrange(&experiments, FileCount::AtLeastOne).unwrap();
    let files: Vec<_> = sorted.iter().map(|ex| &ex.data).collect();
    let keys = key_batch(&files, IdentityConfig::default());

    let summary = summary_table(&sorted, &keys);
    let rows: Vec<SummaryRow> = summary.iter().map(SummaryRow::from).collect();
    let csv = to_csv_string(&rows).unwrap();
    assert!(csv.starts_with("name,order,unique_peptides,"));
    assert_eq!(rows[1].seen_proteins, 2);
    assert_eq!(rows[1].new_proteins_perc, 0.0);

    let peptide_sets: Vec<_> = keys.peptides.iter().map(|k| distinct(k)).collect();
    let o = overlap(&peptide_sets);
    assert_eq!(o.shared.len(), 1); // AAAKR +3
    assert_eq!(o.unique.len(), 3);
    let regions = venn_regions(&peptide_sets);
    assert_eq!(regions[0b01], 2);
    assert_eq!(regions[0b10], 1);
    assert_eq!(regions[0b11], 1);

    let subsets = diff_subsets(&files, &keys, SubsetLevel::Peptide);
    let diff_text = write_filter_file(&subsets[0].difference);
    assert!(diff_text.starts_with("DTASelect v2.1.12\n"));
    assert!(diff_text.contains("K.PEPT(15.99)IDE.R"));
    assert!(!diff_text.contains("R.AAAKR.G"));
    assert!(diff_text.ends_with("Filtered\t2\t3\t3\n"));

    let inter = &subsets[1].intersection;
    assert_eq!(inter.group_count(), 1);
    assert_eq!(inter.results[0].proteins[0].locus_name, "P2");
}
