use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};

use paser_dashboards::data::loader::read_filter_file;

const AMINO_ACIDS: &[u8] = b"ACDEFGHIKLMNPQRSTVWY";
const PROTEIN_HEADER: &str = "Locus\tSequence Count\tSpectrum Count\tSequence Coverage\tLength\tMolWt\tpI\tValidation Status\tNSAF\tEMPAI\tDescriptive Name";
const PEPTIDE_HEADER: &str = "Unique\tFileName\tXCorr\tDeltCN\tConf%\tM+H+\tCalcM+H+\tPPM\tTotalIntensity\tSpR\tProb Score\tpI\tIonProportion\tRedundancy\tSequence";

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

// ---------------------------------------------------------------------------
// Synthetic proteome
// ---------------------------------------------------------------------------

struct Protein {
    loci: Vec<String>,
    peptides: Vec<String>,
    length: u32,
}

fn random_peptide(rng: &mut SimpleRng) -> String {
    let len = 7 + rng.below(10);
    let mut core: String = (0..len)
        .map(|_| AMINO_ACIDS[rng.below(AMINO_ACIDS.len())] as char)
        .collect();
    // Oxidized methionine on some peptides.
    if let Some(pos) = core.find('M') {
        if rng.chance(0.3) {
            core.insert_str(pos + 1, "(15.9949)");
        }
    }
    format!("K.{core}.R")
}

fn proteome(rng: &mut SimpleRng, n: usize) -> Vec<Protein> {
    (0..n)
        .map(|i| {
            let mut loci = vec![format!("sp|P{:05}|PROT{i}_HUMAN", 10000 + i)];
            if rng.chance(0.15) {
                loci.push(format!("sp|Q{:05}|ISO{i}_HUMAN", 20000 + i));
            }
            let peptides = (0..2 + rng.below(6)).map(|_| random_peptide(rng)).collect();
            Protein {
                loci,
                peptides,
                length: 150 + rng.below(900) as u32,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// One DTASelect-filter file
// ---------------------------------------------------------------------------

fn experiment_text(rng: &mut SimpleRng, proteins: &[Protein], run: &str, detection: f64) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "DTASelect v2.1.12")?;
    writeln!(out, "/data/{run}")?;
    writeln!(out, "/data/UniProt_human.fasta")?;
    writeln!(out, "{PROTEIN_HEADER}")?;
    writeln!(out, "{PEPTIDE_HEADER}")?;

    let mut scan = 1000;
    let (mut n_groups, mut n_peptides) = (0usize, 0usize);
    for protein in proteins {
        if !rng.chance(detection) {
            continue;
        }
        let observed: Vec<&String> = protein.peptides.iter().filter(|_| rng.chance(0.7)).collect();
        if observed.is_empty() {
            continue;
        }

        let coverage = rng.range(3.0, 65.0);
        let spectra = observed.len() as u32 * (1 + rng.below(4) as u32);
        for locus in &protein.loci {
            writeln!(
                out,
                "{locus}\t{}\t{spectra}\t{coverage:.1}%\t{}\t{:.0}\t{:.2}\tU\t{:.5}\t{:.3}\tsynthetic protein {locus}",
                observed.len(),
                protein.length,
                protein.length as f64 * 110.0,
                rng.range(4.5, 9.5),
                rng.range(0.00005, 0.005),
                rng.range(0.1, 12.0),
            )?;
        }
        for sequence in observed {
            let charge = 2 + rng.below(3);
            let unique = if protein.loci.len() == 1 { "*" } else { "" };
            writeln!(
                out,
                "{unique}\t{run}.{scan}.{scan}.{charge}\t{:.4}\t{:.4}\t{:.1}\t1500.7\t1500.7\t{:.1}\t{:.1}\t1\t{:.2}\t6.0\t55.0\t1\t{sequence}",
                rng.range(1.5, 6.0),
                rng.range(0.05, 0.6),
                rng.range(90.0, 100.0),
                rng.range(-5.0, 5.0),
                rng.range(1.0e4, 1.0e7),
                rng.range(5.0, 20.0),
            )?;
            scan += 1;
            n_peptides += 1;
        }
        n_groups += 1;
    }

    writeln!(out, "\tProteins\tPeptide IDs\tSpectra")?;
    writeln!(out, "Unfiltered\t{}\t{}\t{}", n_groups * 2, n_peptides * 2, n_peptides * 3)?;
    writeln!(out, "Filtered\t{n_groups}\t{n_peptides}\t{n_peptides}")?;
    Ok(out)
}

fn main() -> Result<()> {
    let out_dir = PathBuf::from(std::env::args().nth(1).unwrap_or_else(|| "sample_data".into()));
    std::fs::create_dir_all(&out_dir).with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);
    let proteins = proteome(&mut rng, 120);

    for (i, detection) in [0.55, 0.6, 0.65].into_iter().enumerate() {
        let run = format!("run_{:02}", i + 1);
        let text = experiment_text(&mut rng, &proteins, &run, detection)?;
        // Round-trip through the parser so every sample is loadable.
        let parsed = read_filter_file(&text).with_context(|| format!("parsing generated {run}"))?;

        let path = out_dir.join(format!("{}_DTASelect-filter.txt", i + 1));
        std::fs::write(&path, &text).with_context(|| format!("writing {}", path.display()))?;
        println!(
            "Wrote {} groups, {} peptides to {}",
            parsed.group_count(),
            parsed.peptide_count(),
            path.display()
        );
    }
    Ok(())
}
