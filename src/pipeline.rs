use std::collections::BinaryHeap;
use std::io::{self, Write};
use std::sync::Arc;
use std::thread;

use crossbeam::channel::{bounded, Receiver, Sender};
use log::{debug, info};

use crate::clip::{Clipper, Encoding, RunCounters, DIAGNOSTIC_HEADER};
use crate::config::CommonArgs;
use crate::error::ClipError;
use crate::fastq::{Reader, Writer};
use crate::threading::{OrderedPack, Pack, ProcessedPack};

const STATUS_EVERY: u64 = 10_000;

/// Output files of a run, derived from the output prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outputs {
    pub reads: String,
    pub clips: Option<String>,
    pub stats: String,
}

impl Outputs {
    pub fn new(prefix: &str, encoding: Encoding) -> Self {
        match encoding {
            Encoding::Colorspace => Self {
                reads: format!("{}.csfastq.gz", prefix),
                clips: None,
                stats: format!("{}.stats.json", prefix),
            },
            Encoding::Basespace => Self {
                reads: format!("{}.fastq.gz", prefix),
                clips: Some(format!("{}.clips.gz", prefix)),
                stats: format!("{}.stats.json", prefix),
            },
        }
    }
}

/// Clips every read of `args.filenames` and returns the merged counters.
///
/// The main thread reads packs of records, workers clip them, and a writer thread
/// puts them back in input order. The first error stops the whole run.
pub fn run(args: &CommonArgs, clipper: Clipper) -> Result<RunCounters, ClipError> {
    let outputs = Outputs::new(&args.prefix, clipper.encoding());
    let thread_num = args.threads();
    let qd = args.queue_depth();
    let (tx_pack, rx_pack): (Sender<Pack>, Receiver<Pack>) = bounded(qd);
    let (tx_out, rx_out): (Sender<ProcessedPack>, Receiver<ProcessedPack>) = bounded(qd);

    let clipper = Arc::new(clipper);

    // 1. Workers
    let mut workers = Vec::with_capacity(thread_num);
    for _ in 0..thread_num {
        let rx = rx_pack.clone();
        let tx = tx_out.clone();
        let clipper = clipper.clone();
        workers.push(thread::spawn(move || {
            while let Ok(pack) = rx.recv() {
                if tx.send(pack.process(&clipper)).is_err() {
                    break;
                }
            }
        }));
    }
    drop(rx_pack);
    drop(tx_out);

    // 2. Writer
    let compression = args.compression;
    let sample = args.sample.clone();
    let writer_handle = thread::spawn(move || write_ordered(rx_out, &outputs, compression, &sample));

    // 3. Reader (main thread)
    let read_result = feed(args, &tx_pack);
    drop(tx_pack);

    for w in workers {
        if let Err(panic) = w.join() {
            std::panic::resume_unwind(panic);
        }
    }
    let written = match writer_handle.join() {
        Ok(res) => res,
        Err(panic) => std::panic::resume_unwind(panic),
    };

    read_result?;
    written
}

/// Sends packs of reads from every input file in turn. The `only` cap counts
/// reads over all files together.
fn feed(args: &CommonArgs, tx: &Sender<Pack>) -> Result<(), ClipError> {
    let mut pack = Vec::with_capacity(args.pack_size);
    let mut pack_id = 0u64;
    let mut n = 0u64;

    'files: for filename in &args.filenames {
        debug!("Reading {}", filename);
        let reader = Reader::new(filename)?;
        for rec in reader {
            pack.push(rec?);
            n += 1;
            if pack.len() >= args.pack_size {
                let full = std::mem::replace(&mut pack, Vec::with_capacity(args.pack_size));
                if tx.send(Pack { id: pack_id, reads: full }).is_err() {
                    // downstream stopped; its error is reported by the writer
                    return Ok(());
                }
                pack_id += 1;
            }
            if args.only > 0 && n >= args.only {
                info!("Stopping after the first {} reads", n);
                break 'files;
            }
        }
    }

    if !pack.is_empty() {
        let _ = tx.send(Pack { id: pack_id, reads: pack });
    }
    Ok(())
}

/// True when merging a pack moved the read count past a multiple of `STATUS_EVERY`.
fn status_due(before: u64, after: u64) -> bool {
    after / STATUS_EVERY > before / STATUS_EVERY
}

fn write_ordered(
    rx: Receiver<ProcessedPack>,
    outputs: &Outputs,
    compression: u32,
    sample: &str,
) -> Result<RunCounters, ClipError> {
    let mut reads_out = Writer::new(&outputs.reads, compression)?;
    let mut clips_out = match &outputs.clips {
        Some(path) => {
            let mut w = Writer::new(path, compression)?;
            w.write_line(DIAGNOSTIC_HEADER)?;
            Some(w)
        }
        None => None,
    };
    let stdout = io::stdout();

    let mut counters = RunCounters::default();
    let mut next_id = 0u64;
    let mut buffer = BinaryHeap::new();

    for pack in rx {
        buffer.push(OrderedPack(pack));

        while buffer.peek().is_some_and(|top| top.0.id == next_id) {
            let Some(OrderedPack(p)) = buffer.pop() else { break };
            let outcomes = p.outcomes?;

            let before = counters.reads;
            counters.merge(&p.counters);

            for outcome in outcomes {
                if let Some(picture) = &outcome.debug {
                    let mut lock = stdout.lock();
                    lock.write_all(picture.as_bytes())?;
                    lock.flush()?;
                }
                if let (Some(w), Some(line)) = (clips_out.as_mut(), outcome.diagnostic.as_deref()) {
                    w.write_line(line)?;
                }
                if let Some(rec) = &outcome.record {
                    reads_out.write_record(rec)?;
                }
            }

            if status_due(before, counters.reads) {
                info!("Clip-runs {} {} reads", sample, counters.reads);
            }
            next_id += 1;
        }
    }

    reads_out.finish()?;
    if let Some(w) = clips_out {
        w.finish()?;
    }
    Ok(counters)
}
