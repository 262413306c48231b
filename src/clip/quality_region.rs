pub struct GoodQualityRegion;

impl GoodQualityRegion {
    /// Two-color chemistry calls "no signal" as a high quality G, so Gs carry no
    /// weight either way.
    pub const IGNORED_BASE: u8 = b'G';

    /// Length of the trustworthy 5' prefix of a read.
    ///
    /// Each base scores `+1` at or above `clip_quality` and `-clip_penalty` below it.
    /// The region ends at the earliest position where the running score reaches its
    /// maximum. A `clip_quality` of zero or less disables the search and keeps the
    /// whole read.
    pub fn find_end(seq: &[u8], qual: &[u8], clip_quality: i32, clip_penalty: i64) -> usize {
        if clip_quality <= 0 {
            return seq.len();
        }
        let threshold = 33 + clip_quality;

        let mut score = 0i64;
        let mut best_score = 0i64;
        let mut end = 0usize;
        for i in 0..=seq.len() {
            if score > best_score {
                best_score = score;
                end = i;
            }
            if i == seq.len() { break; }

            if seq[i] != Self::IGNORED_BASE {
                if qual[i] as i32 >= threshold {
                    score += 1;
                } else {
                    score -= clip_penalty;
                }
            }
        }
        end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_keeps_whole_read() {
        assert_eq!(GoodQualityRegion::find_end(b"ACGT", b"####", 0, 4), 4);
        assert_eq!(GoodQualityRegion::find_end(b"ACGT", b"####", -3, 4), 4);
    }

    #[test]
    fn all_low_quality_gives_empty_region() {
        assert_eq!(GoodQualityRegion::find_end(b"ACTTAC", b"######", 20, 4), 0);
    }

    #[test]
    fn stops_at_quality_drop() {
        let seq = b"ACTACTACTTTTT";
        let qual = b"IIIIIIIII####";
        assert_eq!(GoodQualityRegion::find_end(seq, qual, 20, 4), 9);
    }

    #[test]
    fn isolated_low_base_is_tolerated() {
        // one low base in the middle costs 4 and is recovered by the 8 after it
        let seq = b"ACTACTACTCACTACTAC";
        let qual = b"IIIII#IIIIIIII####";
        assert_eq!(GoodQualityRegion::find_end(seq, qual, 20, 4), 14);
    }

    #[test]
    fn g_bases_are_ignored() {
        // trailing high quality Gs cannot extend the region
        let seq = b"ACTTGGGGGG";
        let qual = b"IIIIIIIIII";
        assert_eq!(GoodQualityRegion::find_end(seq, qual, 20, 4), 4);
    }

    #[test]
    fn ties_keep_the_earliest_end() {
        // running: 1,2,-2,-1,0,1,2 -> reaches 2 again at the end
        let seq = b"ACTTTTT";
        let qual = b"II#IIII";
        assert_eq!(GoodQualityRegion::find_end(seq, qual, 20, 4), 2);
        // running: 1,2,-2,-1,0,1,2,3 -> a strictly better score moves it
        let seq = b"ACTTTTTT";
        let qual = b"II#IIIII";
        assert_eq!(GoodQualityRegion::find_end(seq, qual, 20, 4), 8);
    }
}
