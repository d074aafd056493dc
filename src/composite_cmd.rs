//! Composite command: weighted sum of existing indicator ranks.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use tracing::{info, info_span};

use cdi_grid::IndicatorSeries;

use crate::cli::RunArgs;
use crate::config::CdiConfig;
use crate::convert;
use crate::pipeline::{
    COMPOSITE_STEM, Output, Pipeline, RegionSeries, aligned_axes, composite_stage, read_variable,
    should_skip, write_outputs,
};

/// Recompute the composite from the indicator files of an earlier run.
pub fn run(args: RunArgs) -> Result<()> {
    let _cmd = info_span!("composite").entered();
    let config = CdiConfig::load(&args.config)?;
    let pipeline = convert::build_pipeline(&config)?;

    let mut ranked = BTreeMap::new();
    for (name, _) in pipeline.weights.active() {
        let path = pipeline.output_path(name);
        let pct = read_variable(&path, &format!("{name}_pct"))
            .with_context(|| format!("indicator {name:?} has no output yet; run `cdi run` first"))?;
        ranked.insert(name.to_string(), pct);
    }
    combine(&pipeline, ranked, args.force)
}

/// Writes the weighted sum and its ranks unless the output already exists.
pub fn combine(
    pipeline: &Pipeline,
    ranked: BTreeMap<String, RegionSeries>,
    force: bool,
) -> Result<()> {
    let path = pipeline.output_path(COMPOSITE_STEM);
    if should_skip(&path, force) {
        return Ok(());
    }

    let (latitude, longitude) = aligned_axes(&ranked, &pipeline.weights)?;
    let ranked: BTreeMap<String, IndicatorSeries> = ranked
        .into_iter()
        .map(|(name, r)| (name, r.series))
        .collect();
    let (cdi, ranks) = composite_stage(&ranked, &pipeline.weights)?;
    let outputs = [
        Output::new(
            COMPOSITE_STEM,
            "1",
            "Weighted Composite Drought Indicator",
            &cdi,
        ),
        Output::new(
            format!("{COMPOSITE_STEM}_pct"),
            "1",
            "Composite Drought Indicator percentile rank",
            &ranks,
        ),
    ];
    write_outputs(&path, &latitude, &longitude, &outputs, COMPOSITE_STEM)?;
    info!(path = %path.display(), months = cdi.len(), "composite written");
    Ok(())
}
