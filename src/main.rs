use anyhow::{Context, Result};
use clap::Parser;
use log::{info, Level};
use simple_logger::init_with_level;

use clip_runs::clip::Clipper;
use clip_runs::config::Cli;
use clip_runs::pipeline::{self, Outputs};
use clip_runs::report::Summary;

fn main() -> Result<()> {
    init_with_level(Level::Info)?;

    let cli = Cli::parse();
    let params = cli.params().context("invalid configuration")?;
    let common = cli.common();

    let clipper = Clipper::new(params, common.debug);
    let encoding = clipper.encoding();
    let outputs = Outputs::new(&common.prefix, encoding);
    info!("Clipping {:?} reads from {} file(s) into {}", encoding, common.filenames.len(), outputs.reads);

    let counters = pipeline::run(common, clipper)
        .with_context(|| format!("clipping reads for sample {}", common.sample))?;

    let summary = Summary::new(&common.sample, &counters);
    summary.log(encoding);
    summary.write_json(&outputs.stats)
        .with_context(|| format!("writing {}", outputs.stats))?;

    Ok(())
}
