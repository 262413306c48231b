use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must not be negative (got {value})")]
    NegativePenalty { name: &'static str, value: i64 },
    #[error("{name} must be at most {max} (got {value})")]
    PenaltyOutOfRange { name: &'static str, value: i64, max: i64 },
    #[error("adaptor sequence must not be empty")]
    EmptyAdaptor,
    #[error("adaptor sequence contains invalid base {base:?} at position {pos}")]
    InvalidAdaptorBase { base: char, pos: usize },
    #[error("{name} must be a Phred score in 0..=93 (got {value})")]
    QualityOutOfRange { name: &'static str, value: i64 },
    #[error("pack_size must be greater than zero")]
    ZeroPackSize,
}

#[derive(Debug, Error)]
pub enum ClipError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("malformed FASTQ at line {line}: {reason}")]
    Format { line: u64, reason: String },
    #[error("read {name}: sequence length {sequence} does not fit quality length {quality} (expected quality length {expected})")]
    LengthMismatch {
        name: String,
        sequence: usize,
        quality: usize,
        expected: usize,
    },
    #[error("read {name}: {reason}")]
    InvalidRecord { name: String, reason: String },
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}
