use clap::{Args, Parser, Subcommand, ArgAction};

use crate::clip::{BasespaceParams, ClipParams, ColorspaceParams};
use crate::error::ConfigError;

pub const DEFAULT_ADAPTOR: &str = "GATCGGAAGAGCACACGTCTGAACTCCAGTCAC";
const MAX_PHRED: i64 = 93;
/// Scores are `i64`; keeping penalties within `u32` leaves room for any read length.
pub const MAX_PENALTY: i64 = u32::MAX as i64;

#[derive(Parser, Debug, Clone)]
#[command(name = "clip_runs", version, about = "Clip poly(A) tails, adaptor and low quality sequence from the 3' end of reads")]
pub struct Cli {
    #[command(subcommand)]
    pub mode: Mode,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Mode {
    /// Clip low quality sequence and runs of 0s from colorspace reads (CSFASTQ).
    ///
    /// The run of 0s may contain up to one fifth other colors, to allow for sequencing errors.
    Colorspace(ColorspaceArgs),
    /// Clip a poly(A) tail followed by adaptor from basespace reads (FASTQ).
    ///
    /// The poly(A) must lie within a good quality region, the adaptor may extend beyond it.
    Basespace(BasespaceArgs),
}

#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Output prefix
    #[arg(short='o', long="prefix")]
    pub prefix: String,
    /// Sample name, for logging of statistics
    #[arg(long="sample", default_value = "sample")]
    pub sample: String,
    /// Show the detected poly(A) region and adaptor location of each read
    #[arg(long="debug", action=ArgAction::SetTrue)]
    pub debug: bool,
    /// Only use the first N reads over all input files. 0 means use all reads
    #[arg(long="only", default_value_t=0)]
    pub only: u64,

    // Threading
    #[arg(short='w', long="thread", default_value_t=2)]
    pub thread: usize,
    #[arg(long="pack_size", default_value_t=1000)]
    pub pack_size: usize,
    #[arg(long="queue_depth", default_value_t=0)]
    pub queue_depth: usize,
    #[arg(short='z', long="compression", default_value_t=4)]
    pub compression: u32,

    /// Input FASTQ files, optionally gzipped. `-` reads stdin
    #[arg(required = true)]
    pub filenames: Vec<String>,
}

impl CommonArgs {
    pub fn threads(&self) -> usize {
        if self.thread == 0 { num_cpus::get() } else { self.thread }
    }

    pub fn queue_depth(&self) -> usize {
        if self.queue_depth == 0 { self.threads() * 2 } else { self.queue_depth }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pack_size == 0 {
            return Err(ConfigError::ZeroPackSize);
        }
        Ok(())
    }
}

#[derive(Args, Debug, Clone)]
pub struct ColorspaceArgs {
    #[command(flatten)]
    pub common: CommonArgs,
    /// Minimum quality
    #[arg(long="quality", default_value_t=20, allow_negative_numbers=true)]
    pub quality: i64,
    /// Minimum length
    #[arg(long="length", default_value_t=25)]
    pub length: usize,
}

#[derive(Args, Debug, Clone)]
pub struct BasespaceArgs {
    #[command(flatten)]
    pub common: CommonArgs,
    /// Clip to a region where most bases have at least this quality. Gs are ignored
    /// for this purpose. 0 disables
    #[arg(long="clip_quality", default_value_t=0, allow_negative_numbers=true)]
    pub clip_quality: i64,
    /// One low quality base is made up for by this many good quality bases
    #[arg(long="clip_penalty", default_value_t=4, allow_negative_numbers=true)]
    pub clip_penalty: i64,
    /// Penalty for a non-A when matching the poly(A)
    #[arg(long="a_mismatch_penalty", default_value_t=4, allow_negative_numbers=true)]
    pub a_mismatch_penalty: i64,
    /// Penalty for a mismatch when matching the adaptor
    #[arg(long="adaptor_mismatch_penalty", default_value_t=4, allow_negative_numbers=true)]
    pub adaptor_mismatch_penalty: i64,
    /// Minimum score to call a poly(A) tail, essentially As plus adaptor bases matched
    #[arg(long="min_score", default_value_t=10, allow_negative_numbers=true)]
    pub min_score: i64,
    /// Adaptor sequence expected after the poly(A) tail
    #[arg(long="adaptor", default_value = DEFAULT_ADAPTOR)]
    pub adaptor: String,
    /// Minimum length
    #[arg(long="length", default_value_t=20)]
    pub length: usize,
}

impl Cli {
    pub fn common(&self) -> &CommonArgs {
        match &self.mode {
            Mode::Colorspace(a) => &a.common,
            Mode::Basespace(a) => &a.common,
        }
    }

    /// Validates the arguments and turns them into clipping parameters.
    pub fn params(&self) -> Result<ClipParams, ConfigError> {
        self.common().validate()?;
        match &self.mode {
            Mode::Colorspace(a) => a.params().map(ClipParams::Colorspace),
            Mode::Basespace(a) => a.params().map(ClipParams::Basespace),
        }
    }
}

impl ColorspaceArgs {
    pub fn params(&self) -> Result<ColorspaceParams, ConfigError> {
        let min_quality = phred("quality", self.quality, 0)?;
        Ok(ColorspaceParams { min_quality: min_quality as u8, min_length: self.length })
    }
}

impl BasespaceArgs {
    pub fn params(&self) -> Result<BasespaceParams, ConfigError> {
        let clip_quality = phred("clip_quality", self.clip_quality, i64::MIN)?;
        penalty("clip_penalty", self.clip_penalty)?;
        penalty("a_mismatch_penalty", self.a_mismatch_penalty)?;
        penalty("adaptor_mismatch_penalty", self.adaptor_mismatch_penalty)?;

        if self.adaptor.is_empty() {
            return Err(ConfigError::EmptyAdaptor);
        }
        if let Some((pos, base)) = self.adaptor.chars().enumerate()
            .find(|(_, c)| !matches!(c, 'A' | 'C' | 'G' | 'T' | 'N'))
        {
            return Err(ConfigError::InvalidAdaptorBase { base, pos });
        }

        Ok(BasespaceParams {
            // anything at or below zero disables the region search
            clip_quality: clip_quality.max(0) as i32,
            clip_penalty: self.clip_penalty,
            a_mismatch_penalty: self.a_mismatch_penalty,
            adaptor_mismatch_penalty: self.adaptor_mismatch_penalty,
            min_score: self.min_score,
            adaptor: self.adaptor.clone(),
            min_length: self.length,
        })
    }
}

fn phred(name: &'static str, value: i64, min: i64) -> Result<i64, ConfigError> {
    if value < min || value > MAX_PHRED {
        return Err(ConfigError::QualityOutOfRange { name, value });
    }
    Ok(value)
}

fn penalty(name: &'static str, value: i64) -> Result<(), ConfigError> {
    if value < 0 {
        return Err(ConfigError::NegativePenalty { name, value });
    }
    if value > MAX_PENALTY {
        return Err(ConfigError::PenaltyOutOfRange { name, value, max: MAX_PENALTY });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip::{Clipper, RunCounters};
    use crate::fastq::FastqRecord;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("clip_runs").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn basespace_defaults() {
        let cli = parse(&["basespace", "-o", "out", "reads.fq.gz"]);
        let ClipParams::Basespace(p) = cli.params().unwrap() else { panic!("wrong mode") };
        assert_eq!(p, BasespaceParams {
            clip_quality: 0,
            clip_penalty: 4,
            a_mismatch_penalty: 4,
            adaptor_mismatch_penalty: 4,
            min_score: 10,
            adaptor: DEFAULT_ADAPTOR.to_string(),
            min_length: 20,
        });
        assert_eq!(cli.common().sample, "sample");
        assert_eq!(cli.common().filenames, vec!["reads.fq.gz"]);
    }

    #[test]
    fn colorspace_defaults() {
        let cli = parse(&["colorspace", "--prefix", "out", "a.csfastq", "b.csfastq", "--only", "5"]);
        assert_eq!(cli.params().unwrap(), ClipParams::Colorspace(ColorspaceParams { min_quality: 20, min_length: 25 }));
        assert_eq!(cli.common().only, 5);
        assert_eq!(cli.common().filenames.len(), 2);
    }

    #[test]
    fn negative_penalty_is_rejected() {
        let cli = parse(&["basespace", "-o", "out", "--a_mismatch_penalty", "-1", "r.fq"]);
        assert!(matches!(cli.params(), Err(ConfigError::NegativePenalty { name: "a_mismatch_penalty", value: -1 })));
    }

    #[test]
    fn huge_penalties_are_rejected() {
        let cli = parse(&["basespace", "-o", "x", "--a_mismatch_penalty", "9223372036854775807", "r.fq"]);
        assert!(matches!(
            cli.params(),
            Err(ConfigError::PenaltyOutOfRange { name: "a_mismatch_penalty", max: MAX_PENALTY, .. })
        ));
        let cli = parse(&["basespace", "-o", "x", "--clip_penalty", "4294967296", "r.fq"]);
        assert!(matches!(cli.params(), Err(ConfigError::PenaltyOutOfRange { name: "clip_penalty", .. })));

        let max = MAX_PENALTY.to_string();
        let cli = parse(&["basespace", "-o", "x", "--adaptor_mismatch_penalty", &max, "--a_mismatch_penalty", &max, "r.fq"]);
        let params = cli.params().unwrap();
        let clipper = Clipper::new(params, false);
        let mut counters = RunCounters::default();
        let seq = format!("{}{}{}", "C".repeat(25), "A".repeat(20), DEFAULT_ADAPTOR);
        let qual = "I".repeat(seq.len());
        let out = clipper.process(FastqRecord::new("r", seq, qual), &mut counters).unwrap();
        assert_eq!(out.record.unwrap().seq, "C".repeat(25));
    }

    #[test]
    fn bad_adaptors_are_rejected() {
        let cli = parse(&["basespace", "-o", "out", "--adaptor", "", "r.fq"]);
        assert!(matches!(cli.params(), Err(ConfigError::EmptyAdaptor)));
        let cli = parse(&["basespace", "-o", "out", "--adaptor", "GATXC", "r.fq"]);
        assert!(matches!(cli.params(), Err(ConfigError::InvalidAdaptorBase { base: 'X', pos: 3 })));
    }

    #[test]
    fn quality_range_is_checked() {
        let cli = parse(&["colorspace", "-o", "out", "--quality", "94", "r.fq"]);
        assert!(matches!(cli.params(), Err(ConfigError::QualityOutOfRange { .. })));
        let cli = parse(&["basespace", "-o", "out", "--clip_quality", "-3", "r.fq"]);
        let ClipParams::Basespace(p) = cli.params().unwrap() else { panic!("wrong mode") };
        assert_eq!(p.clip_quality, 0);
    }

    #[test]
    fn zero_pack_size_is_rejected() {
        let cli = parse(&["colorspace", "-o", "out", "--pack_size", "0", "r.fq"]);
        assert!(matches!(cli.params(), Err(ConfigError::ZeroPackSize)));
    }

    #[test]
    fn input_files_are_required() {
        assert!(Cli::try_parse_from(["clip_runs", "basespace", "-o", "out"]).is_err());
    }
}
