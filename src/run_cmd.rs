//! Run command: source grids to SPI, per-indicator ranks and the composite.

use std::collections::BTreeMap;

use anyhow::{Context, Result, bail};
use tracing::{info, info_span};

use crate::cli::RunArgs;
use crate::composite_cmd;
use crate::config::CdiConfig;
use crate::convert;
use crate::pipeline::{
    IndicatorPlan, Output, Pipeline, RegionSeries, SPI_STEM, SpiPlan, indicator_stage,
    load_source, read_variable, should_skip, spi_stage, spi_variable, write_outputs,
};

/// Run the full pipeline.
pub fn run(args: RunArgs) -> Result<()> {
    let _cmd = info_span!("run").entered();
    let config = CdiConfig::load(&args.config)?;
    let pipeline = convert::build_pipeline(&config)?;
    execute(&pipeline, args.force)
}

/// Runs every stage of a validated pipeline.
pub fn execute(pipeline: &Pipeline, force: bool) -> Result<()> {
    std::fs::create_dir_all(&pipeline.output_dir).with_context(|| {
        format!(
            "failed to create output directory: {}",
            pipeline.output_dir.display()
        )
    })?;
    info!(
        region = %pipeline.region.name,
        indicators = pipeline.indicators.len(),
        spi = pipeline.spi.is_some(),
        "starting pipeline"
    );

    let spi = match &pipeline.spi {
        Some(plan) => spi_outputs(pipeline, plan, force)?,
        None => BTreeMap::new(),
    };

    let mut ranked = BTreeMap::new();
    for ind in &pipeline.indicators {
        let _ind = info_span!("indicator", name = %ind.name).entered();
        let pct = indicator_outputs(pipeline, ind, &spi, force)?;
        ranked.insert(ind.name.clone(), pct);
    }
    composite_cmd::combine(pipeline, ranked, force)
}

/// SPI for every configured period, computed or read back.
fn spi_outputs(
    pipeline: &Pipeline,
    plan: &SpiPlan,
    force: bool,
) -> Result<BTreeMap<usize, RegionSeries>> {
    let _span = info_span!("spi").entered();
    let path = pipeline.output_path(SPI_STEM);
    if should_skip(&path, force) {
        return plan
            .periods
            .iter()
            .map(|&p| -> Result<(usize, RegionSeries)> {
                Ok((p, read_variable(&path, &spi_variable(p))?))
            })
            .collect();
    }

    let precip = load_source(&plan.source, &pipeline.region)?;
    let mut out = BTreeMap::new();
    for &period in &plan.periods {
        let spi = spi_stage(&precip.series, period)?;
        out.insert(
            period,
            RegionSeries {
                latitude: precip.latitude,
                longitude: precip.longitude,
                units: Some("1".to_string()),
                long_name: Some(spi_long_name(period)),
                series: spi,
            },
        );
    }

    let outputs: Vec<Output<'_>> = out
        .iter()
        .map(|(&p, s)| Output::new(spi_variable(p), "1", spi_long_name(p), &s.series))
        .collect();
    write_outputs(&path, &precip.latitude, &precip.longitude, &outputs, "spi")?;
    Ok(out)
}

fn spi_long_name(period: usize) -> String {
    format!("Standardized Precipitation Index ({period} month)")
}

/// Percentile ranks of one indicator, computed or read back.
fn indicator_outputs(
    pipeline: &Pipeline,
    ind: &IndicatorPlan,
    spi: &BTreeMap<usize, RegionSeries>,
    force: bool,
) -> Result<RegionSeries> {
    let path = pipeline.output_path(&ind.name);
    let pct_name = format!("{}_pct", ind.name);
    if should_skip(&path, force) {
        return read_variable(&path, &pct_name);
    }

    let values = match (&ind.source, ind.period) {
        (Some(source), _) => load_source(source, &pipeline.region)?,
        (None, Some(period)) => spi
            .get(&period)
            .cloned()
            .with_context(|| format!("SPI-{period} was not computed"))?,
        (None, None) => bail!("indicator {:?} has no source", ind.name),
    };
    let (anomalies, ranks) = indicator_stage(&values.series, ind.transform)
        .with_context(|| format!("failed to process indicator {:?}", ind.name))?;

    {
        let mut outputs = Vec::with_capacity(2);
        if let Some(anom) = &anomalies {
            outputs.push(Output::new(
                format!("{}_anom", ind.name),
                "1",
                format!("{} standardized anomaly", ind.name),
                anom,
            ));
        }
        outputs.push(Output::new(
            pct_name.as_str(),
            "1",
            format!("{} percentile rank", ind.name),
            &ranks,
        ));
        write_outputs(&path, &values.latitude, &values.longitude, &outputs, &ind.name)?;
    }

    Ok(RegionSeries {
        latitude: values.latitude,
        longitude: values.longitude,
        units: Some("1".to_string()),
        long_name: None,
        series: ranks,
    })
}
