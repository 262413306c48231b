//! Clipping of poly(A) tails, adaptor and low quality sequence from the 3' end of
//! colorspace and basespace reads.

pub mod clip;
pub mod config;
pub mod error;
pub mod fastq;
pub mod pipeline;
pub mod report;
pub mod threading;
