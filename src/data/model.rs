// ---------------------------------------------------------------------------
// ProteinLine – one protein locus record
// ---------------------------------------------------------------------------

/// A protein locus record. Several loci in the same [`ResultGroup`] share
/// ambiguous peptide evidence.
#[derive(Debug, Clone, PartialEq)]
pub struct ProteinLine {
    pub locus_name: String,
    pub sequence_count: u32,
    pub spectrum_count: u32,
    /// Percent, with the trailing `%` stripped.
    pub sequence_coverage: f64,
    pub length: u32,
    pub molecular_weight: f64,
    pub pi: f64,
    pub validation_status: String,
    pub nsaf: f64,
    pub empai: f64,
    pub description: String,
    /// Line as read from the file, written back unchanged.
    pub raw: String,
}

// ---------------------------------------------------------------------------
// PeptideLine – one peptide identification
// ---------------------------------------------------------------------------

/// A peptide identification record.
#[derive(Debug, Clone, PartialEq)]
pub struct PeptideLine {
    /// `*` for peptides unique to this group, empty otherwise.
    pub unique: String,
    pub file_name: String,
    pub charge: u8,
    pub x_corr: f64,
    pub delta_cn: f64,
    pub conf: f64,
    pub total_intensity: f64,
    pub redundancy: u32,
    /// Sequence with flanking context, e.g. `K.PEPT(15.99)IDE.R`.
    pub sequence: String,
    pub raw: String,
}

// ---------------------------------------------------------------------------
// ResultGroup – protein lines followed by their peptide lines
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultGroup {
    pub proteins: Vec<ProteinLine>,
    pub peptides: Vec<PeptideLine>,
}

impl ResultGroup {
    /// Identifier shared by every locus of the group. Built from the locus
    /// names so that the same ambiguous group compares equal across files.
    pub fn group_id(&self) -> String {
        self.proteins
            .iter()
            .map(|p| p.locus_name.as_str())
            .collect::<Vec<_>>()
            .join(";")
    }

    /// The first (representative) protein of the group.
    pub fn leading_protein(&self) -> Option<&ProteinLine> {
        self.proteins.first()
    }

    /// Sequence coverage of the leading protein, 0 for an empty group.
    pub fn leading_coverage(&self) -> f64 {
        self.leading_protein()
            .map(|p| p.sequence_coverage)
            .unwrap_or(0.0)
    }
}

// ---------------------------------------------------------------------------
// FilterFile – a complete DTASelect-filter file
// ---------------------------------------------------------------------------

/// A parsed DTASelect-filter file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterFile {
    /// First line of the file, e.g. `DTASelect v2.1.12`.
    pub version_line: String,
    /// Lines after the version line, up to and including the column headers.
    pub header_lines: Vec<String>,
    pub results: Vec<ResultGroup>,
    /// Summary table and everything after it.
    pub footer_lines: Vec<String>,
}

impl FilterFile {
    /// Version tag, i.e. the version line without the program name.
    pub fn version(&self) -> &str {
        match self.version_line.split_once(' ') {
            Some((_, tag)) => tag.trim(),
            None => self.version_line.trim(),
        }
    }

    /// Number of result groups.
    pub fn group_count(&self) -> usize {
        self.results.len()
    }

    /// Number of protein lines over all groups.
    pub fn protein_count(&self) -> usize {
        self.results.iter().map(|r| r.proteins.len()).sum()
    }

    /// Number of peptide lines over all groups.
    pub fn peptide_count(&self) -> usize {
        self.results.iter().map(|r| r.peptides.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Same file metadata, different result groups.
    pub fn with_results(&self, results: Vec<ResultGroup>) -> FilterFile {
        FilterFile {
            version_line: self.version_line.clone(),
            header_lines: self.header_lines.clone(),
            results,
            footer_lines: self.footer_lines.clone(),
        }
    }
}
