mod colorspace;
mod quality_region;
mod poly_a;
mod decision;
mod debug;

use serde::Serialize;
use crate::error::ClipError;
use crate::fastq::FastqRecord;

pub use self::colorspace::ColorspaceRunDetector;
pub use self::quality_region::GoodQualityRegion;
pub use self::poly_a::{AOnlyRun, PolyAAdaptorMatcher, TailCandidate, TailSearch};
pub use self::decision::{ClipDecision, Encoding};

/// Header of the per-read diagnostics table written for basespace runs.
pub const DIAGNOSTIC_HEADER: &str = "#Read\tread length\tpoly-A start\tpoly-A end\tpoly-A start, ignoring adaptor\tpoly-A end, ignoring adaptor\tadaptor bases matched";

/// Where the poly(A) and adaptor were called in a basespace read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipResult {
    /// Clip boundary: the read is cut to `..a_start`.
    pub a_start: usize,
    pub a_end: usize,
    pub aonly_start: usize,
    pub aonly_end: usize,
    pub adaptor_bases_matched: usize,
    /// Best decomposition score, whether or not it reached the minimum score.
    pub score: i64,
    pub called: bool,
}

impl ClipResult {
    pub fn diagnostic_line(&self, name: &str, read_length: usize) -> String {
        format!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            name, read_length, self.a_start, self.a_end, self.aonly_start, self.aonly_end, self.adaptor_bases_matched
        )
    }
}

/// Totals over every read of a run. Shards keep their own and are merged by addition.
#[derive(Debug, Default, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct RunCounters {
    pub reads: u64,
    pub discarded: u64,
    pub clipped_kept: u64,
    pub total_length_before: u64,
    pub total_length_clipped: u64,
}

impl RunCounters {
    pub fn merge(&mut self, other: &RunCounters) {
        self.reads += other.reads;
        self.discarded += other.discarded;
        self.clipped_kept += other.clipped_kept;
        self.total_length_before += other.total_length_before;
        self.total_length_clipped += other.total_length_clipped;
    }

    pub fn mean_length_before(&self) -> Option<f64> {
        (self.reads > 0).then(|| self.total_length_before as f64 / self.reads as f64)
    }

    pub fn mean_length_clipped(&self) -> Option<f64> {
        (self.clipped_kept > 0).then(|| self.total_length_clipped as f64 / self.clipped_kept as f64)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorspaceParams {
    /// Phred score below which a transition is ignored.
    pub min_quality: u8,
    pub min_length: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasespaceParams {
    /// Phred score for the good quality region; zero or less disables it.
    pub clip_quality: i32,
    pub clip_penalty: i64,
    pub a_mismatch_penalty: i64,
    pub adaptor_mismatch_penalty: i64,
    pub min_score: i64,
    pub adaptor: String,
    pub min_length: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipParams {
    Colorspace(ColorspaceParams),
    Basespace(BasespaceParams),
}

/// Everything produced for one read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    pub record: Option<FastqRecord>,
    pub diagnostic: Option<String>,
    pub debug: Option<String>,
}

pub struct Clipper {
    params: ClipParams,
    debug: bool,
}

impl Clipper {
    pub fn new(params: ClipParams, debug: bool) -> Self {
        Self { params, debug }
    }

    pub fn encoding(&self) -> Encoding {
        match self.params {
            ClipParams::Colorspace(_) => Encoding::Colorspace,
            ClipParams::Basespace(_) => Encoding::Basespace,
        }
    }

    /// Clips one read, updating `counters` exactly once.
    pub fn process(&self, rec: FastqRecord, counters: &mut RunCounters) -> Result<Outcome, ClipError> {
        self.encoding().check(&rec)?;
        match &self.params {
            ClipParams::Colorspace(p) => Ok(self.process_colorspace(p, rec, counters)),
            ClipParams::Basespace(p) => Ok(self.process_basespace(p, rec, counters)),
        }
    }

    fn process_colorspace(&self, p: &ColorspaceParams, rec: FastqRecord, counters: &mut RunCounters) -> Outcome {
        let start = ColorspaceRunDetector::find_run_start(
            rec.seq.as_bytes(),
            rec.qual.as_bytes(),
            p.min_quality.saturating_add(33),
        );
        let debug = self.debug.then(|| debug::render_colorspace(&rec, start));
        let decision = ClipDecision::new(Encoding::Colorspace, p.min_length);
        Outcome {
            record: decision.apply(rec, start, counters),
            diagnostic: None,
            debug,
        }
    }

    fn process_basespace(&self, p: &BasespaceParams, rec: FastqRecord, counters: &mut RunCounters) -> Outcome {
        let seq = rec.seq.as_bytes();
        let good_quality_end = GoodQualityRegion::find_end(seq, rec.qual.as_bytes(), p.clip_quality, p.clip_penalty);
        let result = PolyAAdaptorMatcher::new(p.adaptor.as_bytes(), p.a_mismatch_penalty, p.adaptor_mismatch_penalty)
            .search(seq, good_quality_end)
            .call(p.min_score);

        let diagnostic = result.diagnostic_line(&rec.name, seq.len());
        let debug = self.debug.then(|| debug::render_basespace(&rec, good_quality_end, &result, p));
        let decision = ClipDecision::new(Encoding::Basespace, p.min_length);
        Outcome {
            record: decision.apply(rec, result.a_start, counters),
            diagnostic: Some(diagnostic),
            debug,
        }
    }
}
