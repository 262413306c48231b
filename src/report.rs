use std::fs::File;
use std::io::{self, BufWriter, Write};

use log::info;
use serde::Serialize;

use crate::clip::{Encoding, RunCounters};
use crate::error::ClipError;

/// Run statistics for one sample, as logged and written to the stats file.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Summary {
    pub sample: String,
    pub reads: u64,
    pub mean_length_before: Option<f64>,
    pub discarded: u64,
    pub clipped_kept: u64,
    pub mean_length_clipped: Option<f64>,
}

impl Summary {
    pub fn new(sample: &str, counters: &RunCounters) -> Self {
        Self {
            sample: sample.to_string(),
            reads: counters.reads,
            mean_length_before: counters.mean_length_before(),
            discarded: counters.discarded,
            clipped_kept: counters.clipped_kept,
            mean_length_clipped: counters.mean_length_clipped(),
        }
    }

    pub fn log(&self, encoding: Encoding) {
        let what = match encoding {
            Encoding::Colorspace => "poly-A",
            Encoding::Basespace => "poly-A/adaptor",
        };
        info!("{}\treads\t{}", self.sample, self.reads);
        if let Some(mean) = self.mean_length_before {
            info!("{}\tmean length before {} clipping\t{:.2}", self.sample, what, mean);
        }
        info!("{}\treads discarded as too short after {} clipping\t{}", self.sample, what, self.discarded);
        info!("{}\treads {} clipped and kept\t{}", self.sample, what, self.clipped_kept);
        if let Some(mean) = self.mean_length_clipped {
            info!("{}\tmean length clipped\t{:.2}", self.sample, mean);
        }
    }

    pub fn write_json(&self, path: &str) -> Result<(), ClipError> {
        let mut w = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut w, self).map_err(io::Error::from)?;
        w.write_all(b"\n")?;
        w.flush()?;
        Ok(())
    }
}
