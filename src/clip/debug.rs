use std::fmt::Write;

use crate::fastq::FastqRecord;
use super::{BasespaceParams, ClipResult};

/// Picture of one basespace call: low quality marks, good quality region,
/// the read, then the called poly(A) and adaptor under it.
pub fn render_basespace(rec: &FastqRecord, good_quality_end: usize, result: &ClipResult, p: &BasespaceParams) -> String {
    let threshold = 33 + p.clip_quality;
    let marks: String = rec.qual.bytes()
        .map(|q| if (q as i32) < threshold { 'C' } else { ' ' })
        .collect();

    let mut out = String::new();
    let _ = writeln!(out, "{}", rec.name);
    let _ = writeln!(out, "{}", marks);
    let _ = writeln!(out, "{}", "-".repeat(good_quality_end));
    let _ = writeln!(out, "{}", rec.seq);
    let _ = writeln!(
        out,
        "{}{}{}.{} {}",
        " ".repeat(result.a_start),
        "A".repeat(result.a_end - result.a_start),
        p.adaptor,
        result.adaptor_bases_matched,
        result.score,
    );
    out.push('\n');
    out
}

pub fn render_colorspace(rec: &FastqRecord, start: usize) -> String {
    let start = start.min(rec.seq.len());
    format!(
        "{}\n{}\n{}{}\n\n",
        rec.name,
        rec.seq,
        " ".repeat(start),
        "0".repeat(rec.seq.len() - start),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colorspace_picture_marks_the_run() {
        let rec = FastqRecord::new("cs1", "T1200", "IIII");
        assert_eq!(render_colorspace(&rec, 3), "cs1\nT1200\n   00\n\n");
    }

    #[test]
    fn colorspace_picture_of_an_unclipped_or_empty_read() {
        let rec = FastqRecord::new("cs2", "T12", "II");
        assert_eq!(render_colorspace(&rec, 3), "cs2\nT12\n\n\n");
        assert_eq!(render_colorspace(&rec, 10), "cs2\nT12\n\n\n");
        assert_eq!(render_colorspace(&rec, 0), "cs2\nT12\n000\n\n");
    }
}
