use crate::error::ClipError;
use crate::fastq::FastqRecord;
use super::RunCounters;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Qualities describe transitions, so there is one fewer than symbols.
    Colorspace,
    Basespace,
}

impl Encoding {
    pub fn quality_len(&self, seq_len: usize) -> usize {
        match self {
            Encoding::Colorspace => seq_len.saturating_sub(1),
            Encoding::Basespace => seq_len,
        }
    }

    pub fn check(&self, rec: &FastqRecord) -> Result<(), ClipError> {
        let expected = self.quality_len(rec.seq.len());
        if rec.qual.len() != expected {
            return Err(ClipError::LengthMismatch {
                name: rec.name.clone(),
                sequence: rec.seq.len(),
                quality: rec.qual.len(),
                expected,
            });
        }
        if !rec.seq.is_ascii() || !rec.qual.is_ascii() {
            return Err(ClipError::InvalidRecord {
                name: rec.name.clone(),
                reason: "sequence and quality must be ASCII".to_string(),
            });
        }
        Ok(())
    }
}

/// Applies the minimum length policy to a clip boundary.
pub struct ClipDecision {
    encoding: Encoding,
    min_length: usize,
}

impl ClipDecision {
    pub fn new(encoding: Encoding, min_length: usize) -> Self {
        Self { encoding, min_length }
    }

    pub fn keeps(&self, boundary: usize) -> bool {
        match self.encoding {
            // the primer symbol does not count towards the length
            Encoding::Colorspace => boundary > self.min_length + 1,
            Encoding::Basespace => boundary >= self.min_length,
        }
    }

    /// Truncates `rec` to `boundary` or discards it. Counts the read exactly once.
    pub fn apply(&self, mut rec: FastqRecord, boundary: usize, counters: &mut RunCounters) -> Option<FastqRecord> {
        let len = rec.seq.len();
        let boundary = boundary.min(len);
        counters.reads += 1;
        counters.total_length_before += len as u64;

        if !self.keeps(boundary) {
            counters.discarded += 1;
            return None;
        }

        if boundary < len {
            counters.clipped_kept += 1;
            counters.total_length_clipped += (len - boundary) as u64;
        }
        rec.seq.truncate(boundary);
        rec.qual.truncate(self.encoding.quality_len(boundary));
        Some(rec)
    }
}
