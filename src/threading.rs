use std::cmp::Ordering;

use crate::clip::{Clipper, Outcome, RunCounters};
use crate::error::ClipError;
use crate::fastq::FastqRecord;

pub struct Pack {
    pub id: u64,
    pub reads: Vec<FastqRecord>,
}

pub struct ProcessedPack {
    pub id: u64,
    pub outcomes: Result<Vec<Outcome>, ClipError>,
    pub counters: RunCounters,
}

impl Pack {
    /// Clips every read of the pack with counters local to the pack.
    /// Stops at the first read that fails.
    pub fn process(self, clipper: &Clipper) -> ProcessedPack {
        let mut counters = RunCounters::default();
        let outcomes = self.reads
            .into_iter()
            .map(|rec| clipper.process(rec, &mut counters))
            .collect::<Result<Vec<_>, _>>();
        ProcessedPack { id: self.id, outcomes, counters }
    }
}

// Min-heap ordering by pack id, so the writer can restore input order.
pub struct OrderedPack(pub ProcessedPack);

impl PartialEq for OrderedPack {
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id
    }
}
impl Eq for OrderedPack {}
impl PartialOrd for OrderedPack {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for OrderedPack {
    fn cmp(&self, other: &Self) -> Ordering {
        other.0.id.cmp(&self.0.id)
    }
}
