//! Set and aggregate arithmetic over keyed experiments, one module per
//! dashboard family.

pub mod overlap;
pub mod stats;
pub mod summary;
