pub struct ColorspaceRunDetector;

impl ColorspaceRunDetector {
    /// Color of a poly(A) run in colorspace.
    pub const RUN_COLOR: u8 = b'0';
    /// Score lost per non-run color. One mismatch is absorbed by four run colors.
    pub const MISMATCH_PENALTY: i64 = 4;

    /// Returns the position where the trailing run of `0`s begins.
    ///
    /// `qual[i]` describes the transition into `seq[i+1]`; the first symbol is the
    /// primer base. Transitions with quality below `min_quality` (a Phred+33 byte)
    /// are skipped outright. `start` moves to just past every mismatch that leaves
    /// the score at zero, so a read with no run ends up with `start == seq.len()`
    /// while a read that is all run keeps `start == 0`.
    pub fn find_run_start(seq: &[u8], qual: &[u8], min_quality: u8) -> usize {
        let mut score = 0i64;
        let mut start = 0usize;

        for i in 0..seq.len().saturating_sub(1) {
            if qual[i] < min_quality { continue; }
            if seq[i + 1] == Self::RUN_COLOR {
                score += 1;
            } else {
                score = (score - Self::MISMATCH_PENALTY).max(0);
                if score == 0 { start = i + 2; }
            }
        }
        start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn high(n: usize) -> Vec<u8> { vec![b'I'; n] }

    #[test]
    fn pure_run_never_resets() {
        let seq = format!("A{}", "0".repeat(20));
        let start = ColorspaceRunDetector::find_run_start(seq.as_bytes(), &high(20), b'5');
        assert_eq!(start, 0);
    }

    #[test]
    fn mismatch_after_short_run_resets_past_it() {
        // 4 matches then a mismatch at 5 drives the score back to zero
        let seq = b"A0000X0000";
        let start = ColorspaceRunDetector::find_run_start(seq, &high(9), b'5');
        assert_eq!(start, 6);
    }

    #[test]
    fn long_run_absorbs_single_mismatch() {
        // 5 matches survive one mismatch, so only the early reset at 2 counts
        let seq = b"T1000001000000";
        let start = ColorspaceRunDetector::find_run_start(seq, &high(13), b'5');
        assert_eq!(start, 2);
    }

    #[test]
    fn read_without_run_is_not_clipped() {
        let seq = b"T3212310231";
        let start = ColorspaceRunDetector::find_run_start(seq, &high(seq.len() - 1), b'5');
        assert_eq!(start, seq.len());
        let again = ColorspaceRunDetector::find_run_start(&seq[..start], &high(start - 1), b'5');
        assert_eq!(again, start);
    }

    #[test]
    fn low_quality_transitions_are_ignored() {
        // the mismatch at index 5 sits on a low-quality transition
        let seq = b"A0000X0000";
        let mut qual = high(9);
        qual[4] = b'#';
        let start = ColorspaceRunDetector::find_run_start(seq, &qual, b'5');
        assert_eq!(start, 0);

        let all_low = vec![b'#'; 9];
        assert_eq!(ColorspaceRunDetector::find_run_start(b"A12312312", &all_low, b'5'), 0);
    }

    #[test]
    fn empty_and_single_symbol_reads() {
        assert_eq!(ColorspaceRunDetector::find_run_start(b"", b"", b'5'), 0);
        assert_eq!(ColorspaceRunDetector::find_run_start(b"T", b"", b'5'), 0);
    }
}
