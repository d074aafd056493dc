//! Single-file commands: one engine applied to one variable.

use anyhow::{Context, Result};
use tracing::{info, info_span};

use cdi_stats::{anomalies_by_month, ranks_by_month};

use crate::cli::{SpiArgs, StepArgs, SubgridArgs};
use crate::config::CdiConfig;
use crate::convert;
use crate::pipeline::{
    Output, read_variable, should_skip, spi_stage, spi_variable, to_region, write_outputs,
};

/// Standardized anomalies of one variable, written as `<variable>_anom`.
pub fn anomaly(args: StepArgs) -> Result<()> {
    let _cmd = info_span!("anomaly").entered();
    if should_skip(&args.output, args.force) {
        return Ok(());
    }
    let input = read_variable(&args.input, &args.variable)?;
    let anom = anomalies_by_month(&input.series)
        .with_context(|| format!("failed to standardize '{}'", args.variable))?;
    let output = Output::new(
        format!("{}_anom", args.variable),
        "1",
        format!("{} standardized anomaly", args.variable),
        &anom,
    );
    write_outputs(&args.output, &input.latitude, &input.longitude, &[output], "anomaly")
}

/// Percentile ranks of one variable, written as `<variable>_pct`.
pub fn rank(args: StepArgs) -> Result<()> {
    let _cmd = info_span!("rank").entered();
    if should_skip(&args.output, args.force) {
        return Ok(());
    }
    let input = read_variable(&args.input, &args.variable)?;
    let ranks = ranks_by_month(&input.series)
        .with_context(|| format!("failed to rank '{}'", args.variable))?;
    let output = Output::new(
        format!("{}_pct", args.variable),
        "1",
        format!("{} percentile rank", args.variable),
        &ranks,
    );
    write_outputs(&args.output, &input.latitude, &input.longitude, &[output], "rank")
}

/// SPI of a precipitation variable, one `spi_<p>` variable per period.
pub fn spi(args: SpiArgs) -> Result<()> {
    let _cmd = info_span!("spi").entered();
    let step = args.step;
    if should_skip(&step.output, step.force) {
        return Ok(());
    }
    let periods = convert::build_periods(&args.periods)?;
    let precip = read_variable(&step.input, &step.variable)?;

    let results = periods
        .iter()
        .map(|&p| Ok((p, spi_stage(&precip.series, p)?)))
        .collect::<Result<Vec<_>>>()?;
    let outputs: Vec<Output<'_>> = results
        .iter()
        .map(|(p, s)| {
            Output::new(
                spi_variable(*p),
                "1",
                format!("Standardized Precipitation Index ({p} month)"),
                s,
            )
        })
        .collect();
    write_outputs(&step.output, &precip.latitude, &precip.longitude, &outputs, "spi")
}

/// Cuts or upsamples one variable onto the configured region.
pub fn subgrid(args: SubgridArgs) -> Result<()> {
    let _cmd = info_span!("subgrid").entered();
    let step = args.step;
    if should_skip(&step.output, step.force) {
        return Ok(());
    }
    let config = CdiConfig::load(&args.config)?;
    let region = convert::build_region(&config.region)?;

    let input = read_variable(&step.input, &step.variable)?;
    let mapped = to_region(input, &region, args.resample)
        .with_context(|| format!("failed to map '{}' onto region {}", step.variable, region.name))?;
    info!(
        region = %region.name,
        rows = mapped.latitude.len(),
        cols = mapped.longitude.len(),
        "mapped onto region"
    );

    let output = Output::new(
        step.variable.as_str(),
        mapped.units.as_deref().unwrap_or("1"),
        mapped.long_name.as_deref().unwrap_or(step.variable.as_str()),
        &mapped.series,
    );
    write_outputs(&step.output, &mapped.latitude, &mapped.longitude, &[output], "subgrid")
}
