//! In-memory DTASelect-filter fixtures for unit tests.

pub const PROTEIN_HEADER: &str = "Locus\tSequence Count\tSpectrum Count\tSequence Coverage\tLength\tMolWt\tpI\tValidation Status\tNSAF\tEMPAI\tDescriptive Name";
pub const PEPTIDE_HEADER: &str = "Unique\tFileName\tXCorr\tDeltCN\tConf%\tM+H+\tCalcM+H+\tPPM\tTotalIntensity\tSpR\tProb Score\tpI\tIonProportion\tRedundancy\tSequence";

/// A protein line with coverage `coverage`.
pub fn protein_line(locus: &str, coverage: f64) -> String {
    format!("{locus}\t2\t10\t{coverage:.1}%\t300\t33000\t6.1\tU\t0.01\t1.2\tdescription of {locus}")
}

pub fn peptide_line(sequence: &str, charge: u8, scan: usize) -> String {
    format!(
        "*\trun.{scan}.{scan}.{charge}\t3.5\t0.3\t99.9\t1234.5\t1234.6\t1.2\t10000\t1\t12.0\t6.0\t50.0\t1\t{sequence}"
    )
}

/// Build a complete file from `(loci, [(sequence, charge)])` groups. Group `i`
/// gets a leading coverage of `25 + 5 * i` percent.
pub fn build_file(groups: &[(&[&str], &[(&str, u8)])]) -> String {
    let mut lines = vec![
        "DTASelect v2.1.12".to_string(),
        "/data/run".to_string(),
        "/data/db.fasta".to_string(),
        PROTEIN_HEADER.to_string(),
        PEPTIDE_HEADER.to_string(),
    ];
    let mut scan = 1;
    for (i, (loci, peptides)) in groups.iter().enumerate() {
        for locus in loci.iter() {
            lines.push(protein_line(locus, 25.0 + 5.0 * i as f64));
        }
        for (sequence, charge) in peptides.iter() {
            lines.push(peptide_line(sequence, *charge, scan));
            scan += 1;
        }
    }
    lines.push("\tProteins\tPeptide IDs\tSpectra".to_string());
    lines.push("Unfiltered\t10\t20\t30".to_string());
    lines.push("Filtered\t5\t10\t15".to_string());
    let mut text = lines.join("\n");
    text.push('\n');
    text
}
