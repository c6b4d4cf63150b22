//! Entity keying: decides when two peptide or protein observations, possibly
//! parsed from different files, are the same entity, and gives every distinct
//! entity a small integer key.
//!
//! Keys are handed out in first-occurrence order over the concatenation of all
//! experiments (in configured order), so a batch always keys the same way.
use std::collections::HashMap;
use std::hash::Hash;

use crate::config::IdentityConfig;
use crate::data::model::FilterFile;

// ---------------------------------------------------------------------------
// Sequence normalization
// ---------------------------------------------------------------------------

/// Strip the two flanking context characters on each side, e.g.
/// `K.PEPT(15.2)IDE.R` → `PEPT(15.2)IDE`.
///
/// Sequences of fewer than four characters have no core and yield `""`.
pub fn clean_sequence(raw: &str) -> &str {
    let n = raw.chars().count();
    if n < 4 {
        return "";
    }
    let offset = |nth: usize| raw.char_indices().nth(nth).map_or(raw.len(), |(i, _)| i);
    &raw[offset(2)..offset(n - 2)]
}

/// Drop every character outside `A-Z`, removing inline modification masses
/// and markers: `PEPT(15.2)IDE` → `PEPTIDE`.
pub fn unmodified_sequence(sequence: &str) -> String {
    sequence.chars().filter(|c| c.is_ascii_uppercase()).collect()
}

/// Flank-stripped sequence, additionally stripped of modifications unless
/// `use_modifications` is set.
pub fn normalize_peptide_sequence(raw: &str, use_modifications: bool) -> String {
    let clean = clean_sequence(raw);
    if use_modifications {
        clean.to_string()
    } else {
        unmodified_sequence(clean)
    }
}

// ---------------------------------------------------------------------------
// Identities
// ---------------------------------------------------------------------------

/// Normalized peptide identity. `charge` is `None` when charge is not part of
/// identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeptideIdentity {
    pub sequence: String,
    pub charge: Option<u8>,
}

/// Identity of a flank-stripped peptide `sequence` under `config`.
pub fn peptide_identity(sequence: &str, charge: u8, config: IdentityConfig) -> PeptideIdentity {
    let sequence = if config.use_modifications {
        sequence.to_string()
    } else {
        unmodified_sequence(sequence)
    };
    PeptideIdentity {
        sequence,
        charge: config.use_charge.then_some(charge),
    }
}

/// Identity of a protein: its group identifier or its own locus name.
pub fn protein_identity<'a>(locus_name: &'a str, group_id: &'a str, config: IdentityConfig) -> &'a str {
    if config.use_groups {
        group_id
    } else {
        locus_name
    }
}

// ---------------------------------------------------------------------------
// Key interning
// ---------------------------------------------------------------------------

/// First-occurrence interning table: identity → key, where keys count up
/// from 0 in the order identities are first seen.
#[derive(Debug, Clone)]
pub struct KeyInterner<T> {
    keys: HashMap<T, usize>,
}

impl<T> Default for KeyInterner<T> {
    fn default() -> Self {
        Self {
            keys: HashMap::new(),
        }
    }
}

impl<T: Hash + Eq> KeyInterner<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key of `identity`, allocating the next free key on first sight.
    pub fn intern(&mut self, identity: T) -> usize {
        let next = self.keys.len();
        *self.keys.entry(identity).or_insert(next)
    }

    pub fn get(&self, identity: &T) -> Option<usize> {
        self.keys.get(identity).copied()
    }

    /// Number of distinct identities seen so far.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Key every identity in order.
pub fn assign_keys<T, I>(identities: I) -> Vec<usize>
where
    T: Hash + Eq,
    I: IntoIterator<Item = T>,
{
    let mut interner = KeyInterner::new();
    identities.into_iter().map(|id| interner.intern(id)).collect()
}

// ---------------------------------------------------------------------------
// Batch keying
// ---------------------------------------------------------------------------

/// Keys of one batch, split back per experiment.
///
/// `peptides[i][j]` is the key of the `j`-th peptide line of experiment `i`,
/// counting through result groups in file order; `proteins` likewise for
/// protein lines.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchKeys {
    pub peptides: Vec<Vec<usize>>,
    pub proteins: Vec<Vec<usize>>,
}

impl BatchKeys {
    pub fn experiment_count(&self) -> usize {
        self.peptides.len()
    }
}

/// Key every peptide and protein line of `files`, which must already be in
/// configured experiment order.
pub fn key_batch(files: &[&FilterFile], config: IdentityConfig) -> BatchKeys {
    let mut peptide_keys = KeyInterner::new();
    let mut protein_keys = KeyInterner::new();
    let mut keys = BatchKeys::default();

    for file in files {
        let mut peptides = Vec::with_capacity(file.peptide_count());
        let mut proteins = Vec::with_capacity(file.protein_count());

        for group in &file.results {
            let group_id = group.group_id();
            for protein in &group.proteins {
                let identity = protein_identity(&protein.locus_name, &group_id, config);
                proteins.push(protein_keys.intern(identity.to_string()));
            }
            for peptide in &group.peptides {
                let identity = peptide_identity(clean_sequence(&peptide.sequence), peptide.charge, config);
                peptides.push(peptide_keys.intern(identity));
            }
        }

        keys.peptides.push(peptides);
        keys.proteins.push(proteins);
    }

    log::debug!(
        "keyed {} experiments: {} distinct peptides, {} distinct proteins",
        files.len(),
        peptide_keys.len(),
        protein_keys.len()
    );
    keys
}
