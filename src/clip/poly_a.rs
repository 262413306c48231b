//! Joint poly(A) + adaptor search for basespace reads.
//!
//! A read is decomposed as `<sequence> <poly(A)> <adaptor> <anything>`. The poly(A)
//! has to lie inside the good quality region, the adaptor match may run past it.
//! Every poly(A) gains `+1` per A and loses `a_mismatch_penalty` per other base;
//! the adaptor gains `+1` per matched base and loses `adaptor_mismatch_penalty`
//! per mismatch. The first decomposition reaching the maximum score wins.

use super::ClipResult;

/// Best decomposition seen so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TailCandidate {
    pub score: i64,
    pub a_start: usize,
    pub a_end: usize,
    pub adaptor_bases: usize,
}

/// Best run of As when the adaptor is ignored. Only reported, never used to clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AOnlyRun {
    pub score: i64,
    pub start: usize,
    pub end: usize,
}

/// Outcome of [`PolyAAdaptorMatcher::search`], before the minimum score is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TailSearch {
    pub good_quality_end: usize,
    pub best: Option<TailCandidate>,
    pub aonly: AOnlyRun,
}

impl TailSearch {
    /// Calls a tail only if the best decomposition scores at least `min_score`;
    /// otherwise the read is left whole up to the good quality end.
    pub fn call(&self, min_score: i64) -> ClipResult {
        let end = self.good_quality_end;
        let score = self.best.map_or(0, |b| b.score);
        let (a_start, a_end, adaptor_bases_matched, called) = match self.best {
            Some(b) if b.score >= min_score => (b.a_start, b.a_end, b.adaptor_bases, true),
            _ => (end, end, 0, false),
        };
        ClipResult {
            a_start,
            a_end,
            aonly_start: self.aonly.start,
            aonly_end: self.aonly.end,
            adaptor_bases_matched,
            score,
            called,
        }
    }
}

pub struct PolyAAdaptorMatcher<'a> {
    adaptor: &'a [u8],
    a_mismatch_penalty: i64,
    adaptor_mismatch_penalty: i64,
}

impl<'a> PolyAAdaptorMatcher<'a> {
    pub fn new(adaptor: &'a [u8], a_mismatch_penalty: i64, adaptor_mismatch_penalty: i64) -> Self {
        Self { adaptor, a_mismatch_penalty, adaptor_mismatch_penalty }
    }

    pub fn search(&self, seq: &[u8], good_quality_end: usize) -> TailSearch {
        let mut best: Option<TailCandidate> = None;
        let mut aonly = AOnlyRun { score: 0, start: good_quality_end, end: good_quality_end };

        for a_start in 0..good_quality_end {
            // a run of As is only scored from its leftmost base
            if a_start > 0 && seq[a_start - 1] == b'A' { continue; }

            let mut a_end = a_start;
            let mut aonly_score = 0i64;
            loop {
                if aonly_score > aonly.score {
                    aonly = AOnlyRun { score: aonly_score, start: a_start, end: a_end };
                }

                best = self.scan_adaptor(seq, a_start, a_end, aonly_score, best);

                if a_end >= good_quality_end { break; }

                if seq[a_end] == b'A' {
                    aonly_score += 1;
                } else {
                    aonly_score -= self.a_mismatch_penalty;
                }
                a_end += 1;
            }
        }

        TailSearch { good_quality_end, best, aonly }
    }

    /// Extends the poly(A) `a_start..a_end` (scoring `aonly_score`) with the adaptor
    /// and returns the new best, which is `best` itself unless strictly beaten.
    ///
    /// The scan gives up once its score falls below `best - adaptor.len()`: no
    /// remaining adaptor bases can lift it past the best from there.
    pub fn scan_adaptor(
        &self,
        seq: &[u8],
        a_start: usize,
        a_end: usize,
        aonly_score: i64,
        mut best: Option<TailCandidate>,
    ) -> Option<TailCandidate> {
        let abort_score = best.map(|b| b.score - self.adaptor.len() as i64);
        let stop = (a_end + self.adaptor.len()).min(seq.len());

        let mut score = aonly_score;
        let mut adaptor_bases = 0usize;
        let mut i = a_end;
        loop {
            if abort_score.is_some_and(|abort| score < abort) { break; }

            if best.map_or(true, |b| score > b.score) {
                best = Some(TailCandidate { score, a_start, a_end, adaptor_bases });
            }

            if i >= stop { break; }

            if seq[i] == self.adaptor[i - a_end] {
                score += 1;
                adaptor_bases += 1;
            } else {
                score -= self.adaptor_mismatch_penalty;
            }
            i += 1;
        }
        best
    }
}
