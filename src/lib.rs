//! Dashboards comparing DTASelect-filter results across PaSER experiments:
//! entity keying, sequential new/seen summaries, Venn overlaps, descriptive
//! statistics and difference/intersection subsets.

pub mod analysis;
pub mod batch;
pub mod color;
pub mod config;
pub mod data;
pub mod keyer;
pub mod state;
