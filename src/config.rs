use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity configuration
// ---------------------------------------------------------------------------

/// How two observations from (possibly different) files are judged to be
/// the same entity. Applied uniformly to every experiment in a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Charge state is part of peptide identity.
    pub use_charge: bool,
    /// Modification annotations are part of peptide identity.
    pub use_modifications: bool,
    /// Proteins collapse to their shared group identifier.
    pub use_groups: bool,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            use_charge: true,
            use_modifications: true,
            use_groups: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Session settings
// ---------------------------------------------------------------------------

/// Everything the user can toggle for a run besides the uploaded files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub identity: IdentityConfig,
    /// Diff page: compare by peptide key (true) or protein key (false).
    pub group_by_peptide: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            identity: IdentityConfig::default(),
            group_by_peptide: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Help texts
// ---------------------------------------------------------------------------

pub const CHARGE_HELP: &str = "If off: (PEPTIDE +2 & PEPTIDE +3) == 1 unique peptide\n\
                               If on:  (PEPTIDE +2 & PEPTIDE +3) == 2 unique peptides";

pub const MODIFICATION_HELP: &str =
    "If off: (PEPTI(XXX)DE +2 & PEPTIDE +2) == 1 unique peptide\n\
     If on:  (PEPTI(XXX)DE +2 & PEPTIDE +2) == 2 unique peptides";

pub const GROUP_HELP: &str = "If off: every protein in a group is counted independently\n\
                              If on:  only the number of protein groups is counted";

pub const VENN_HELP: &str = "Upload 2-3 DTASelect-filter.txt files.\n\n\
     Protein counts: number of unique protein keys.\n\
     Peptide counts: number of unique peptide keys.";

pub const PLOT_HELP: &str = "Peptide uniqueness is defined by the identity options: \
     with charge and modifications on, (PEPTIDE, 2) != (PEPTIDE, 3) != (PEPT(15.2)IDE, 2).\n\n\
     unique: distinct keys in the experiment\n\
     duplicate: rows whose key already appeared earlier in the same experiment\n\
     total: all rows in the experiment\n\
     new / new_unique: rows / distinct keys absent from every earlier experiment\n\
     seen / seen_unique: rows / distinct keys present in an earlier experiment";

pub const STATS_HELP: &str = "Per-experiment averages with standard error bars. \
     Protein means and standard errors both use the first protein of every \
     result group; peptide statistics use every peptide line.";

pub const DIFF_HELP: &str = "Extracts identifications unique to each experiment (difference) \
     and identifications found in every experiment (intersection). \
     The charge and modification options drive the set logic; \
     every charge and modification form is kept in the written files.";
