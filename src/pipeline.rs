//! Pipeline stages shared by the subcommands.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::{debug, info, warn};

use cdi_composite::{Weights, weighted_sum};
use cdi_grid::{Aoi, Axis, Grid, GridError, IndicatorSeries, Subgrid, blend, round_coord};
use cdi_io::{ReadRequest, SeriesWriter, read_series, write_series};
use cdi_resample::ResamplePlan;
use cdi_spi::{period_totals, spi_by_month};
use cdi_stats::{anomalies_by_month, ranks_by_month};

/// File stem of the SPI stage output.
pub const SPI_STEM: &str = "precip_spi";

/// File stem and variable name of the composite.
pub const COMPOSITE_STEM: &str = "cdi";

/// Name of the SPI variable for `period`.
pub fn spi_variable(period: usize) -> String {
    format!("spi_{period}")
}

/// How an indicator's values become ranks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    /// Standardized anomalies, then ranks.
    Anomaly,
    /// SPI from the precipitation stage, re-standardized, then ranked.
    Spi,
    /// Ranks of the values as read.
    Raw,
}

/// The region every output is mapped onto.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub name: String,
    pub aoi: Aoi,
    pub spacing: f64,
    pub latitude: Axis,
    pub longitude: Axis,
}

impl Region {
    pub fn new(name: impl Into<String>, aoi: Aoi, spacing: f64) -> Result<Self, GridError> {
        Ok(Self {
            name: name.into(),
            latitude: aoi.latitudes(spacing)?,
            longitude: aoi.longitudes(spacing)?,
            aoi,
            spacing,
        })
    }

    /// Output grid shape `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.latitude.len(), self.longitude.len())
    }
}

/// Where an indicator's monthly values come from.
#[derive(Debug, Clone, PartialEq)]
pub struct Source {
    pub input: PathBuf,
    /// One variable, or the layers of a blend.
    pub variables: Vec<String>,
    /// Blend weights, one per variable.
    pub blend_weights: Option<Vec<f64>>,
    /// The input is on a grid twice as coarse as the region.
    pub resample: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpiPlan {
    pub source: Source,
    pub periods: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorPlan {
    pub name: String,
    pub weight: f64,
    pub transform: Transform,
    /// `None` for SPI indicators, which read the SPI stage output.
    pub source: Option<Source>,
    /// SPI accumulation period.
    pub period: Option<usize>,
}

/// A validated configuration, ready to run.
#[derive(Debug, Clone)]
pub struct Pipeline {
    pub region: Region,
    pub output_dir: PathBuf,
    pub spi: Option<SpiPlan>,
    pub indicators: Vec<IndicatorPlan>,
    pub weights: Weights,
}

impl Pipeline {
    /// `<output_dir>/<stem>_<region>.nc`
    pub fn output_path(&self, stem: &str) -> PathBuf {
        self.output_dir
            .join(format!("{stem}_{}.nc", self.region.name))
    }
}

/// A series together with the axes and attributes of its grids.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionSeries {
    pub latitude: Axis,
    pub longitude: Axis,
    pub units: Option<String>,
    pub long_name: Option<String>,
    pub series: IndicatorSeries,
}

/// Reads one variable as stored, without regridding.
pub fn read_variable(path: &Path, variable: &str) -> Result<RegionSeries> {
    let file = read_series(path, &ReadRequest::new(variable))
        .with_context(|| format!("failed to read '{variable}' from {}", path.display()))?;
    Ok(RegionSeries {
        latitude: *file.latitude(),
        longitude: *file.longitude(),
        units: file.units().map(str::to_string),
        long_name: file.long_name().map(str::to_string),
        series: file.into_series(),
    })
}

/// Maps a source series onto the region, north-up.
///
/// With `resample` the source must be twice as coarse as the region and is
/// upsampled onto the region axes; otherwise the cells covering the AOI are
/// cut out at the source resolution.
pub fn to_region(source: RegionSeries, region: &Region, resample: bool) -> Result<RegionSeries> {
    let RegionSeries {
        latitude: lat,
        longitude: lon,
        units,
        long_name,
        series,
    } = source;

    if resample {
        let plan = ResamplePlan::new(region.aoi, 2.0 * region.spacing, region.spacing)?;
        let series = series.try_map_grids(|_, grid| plan.extract_and_resample(grid, &lat, &lon))?;
        debug!(shape = ?plan.shape(), times = series.len(), "resampled to region");
        return Ok(RegionSeries {
            latitude: region.latitude,
            longitude: region.longitude,
            units,
            long_name,
            series,
        });
    }

    if !lon.is_ascending() {
        bail!("source longitudes must be ascending");
    }
    let window = Subgrid::locate(&region.aoi, &lat, &lon)?;
    let (mut sub_lat, sub_lon) = window.axes(&lat, &lon)?;
    let flip = lat.is_ascending();
    if flip {
        sub_lat = sub_lat.reversed();
    }
    let series = series.try_map_grids(|_, grid| -> Result<Grid, GridError> {
        let cut = window.extract(grid)?;
        Ok(if flip { cut.flip_rows() } else { cut })
    })?;
    debug!(shape = ?window.shape(), times = series.len(), "cut region window");
    Ok(RegionSeries {
        latitude: sub_lat,
        longitude: sub_lon,
        units,
        long_name,
        series,
    })
}

/// Reads a source, maps every variable onto the region and blends layers.
pub fn load_source(source: &Source, region: &Region) -> Result<RegionSeries> {
    let layers = source
        .variables
        .iter()
        .map(|variable| {
            let raw = read_variable(&source.input, variable)?;
            to_region(raw, region, source.resample)
                .with_context(|| format!("failed to map '{variable}' onto region {}", region.name))
        })
        .collect::<Result<Vec<_>>>()?;

    match &source.blend_weights {
        Some(weights) => blend_layers(layers, weights),
        None => match layers.into_iter().next() {
            Some(layer) => Ok(layer),
            None => bail!("no variable to read from {}", source.input.display()),
        },
    }
}

/// Blends layer series month by month.
pub fn blend_layers(layers: Vec<RegionSeries>, weights: &[f64]) -> Result<RegionSeries> {
    let Some(first) = layers.first() else {
        bail!("blend needs at least one layer");
    };
    for layer in &layers[1..] {
        if layer.series.keys() != first.series.keys() {
            bail!("blend layers cover different months");
        }
        if layer.latitude != first.latitude || layer.longitude != first.longitude {
            bail!("blend layers lie on different grids");
        }
    }

    let entries = first
        .series
        .keys()
        .iter()
        .enumerate()
        .map(|(t, &key)| {
            let grids: Vec<&Grid> = layers.iter().map(|l| &l.series.grids()[t]).collect();
            Ok((key, blend(&grids, weights)?))
        })
        .collect::<Result<Vec<_>, GridError>>()?;
    debug!(layers = layers.len(), times = entries.len(), "blended layers");

    Ok(RegionSeries {
        latitude: first.latitude,
        longitude: first.longitude,
        units: first.units.clone(),
        long_name: first.long_name.clone(),
        series: IndicatorSeries::new(entries)?,
    })
}

/// SPI of `precip` accumulated over `period` months.
pub fn spi_stage(precip: &IndicatorSeries, period: usize) -> Result<IndicatorSeries> {
    let totals = period_totals(precip, period)
        .with_context(|| format!("failed to accumulate {period}-month totals"))?;
    let spi = spi_by_month(&totals).with_context(|| format!("failed to compute SPI-{period}"))?;
    info!(period, times = spi.len(), "computed SPI");
    Ok(spi)
}

/// Anomalies (if the transform has them) and percentile ranks.
pub fn indicator_stage(
    values: &IndicatorSeries,
    transform: Transform,
) -> Result<(Option<IndicatorSeries>, IndicatorSeries)> {
    match transform {
        Transform::Anomaly | Transform::Spi => {
            let anomalies = anomalies_by_month(values)?;
            let ranks = ranks_by_month(&anomalies)?;
            Ok((Some(anomalies), ranks))
        }
        Transform::Raw => Ok((None, ranks_by_month(values)?)),
    }
}

/// The weighted sum and its percentile ranks.
pub fn composite_stage(
    ranked: &BTreeMap<String, IndicatorSeries>,
    weights: &Weights,
) -> Result<(IndicatorSeries, IndicatorSeries)> {
    let cdi = weighted_sum(ranked, weights).context("failed to combine indicators")?;
    if cdi.is_empty() {
        bail!("indicators share no months; nothing to combine");
    }
    let ranks = ranks_by_month(&cdi)?;
    info!(times = cdi.len(), "computed composite");
    Ok((cdi, ranks))
}

/// Axes shared by every active indicator.
///
/// The composite is summed cell by cell, so an active indicator on a grid
/// with other coordinates than the first one is an error even when the
/// shapes agree.
pub fn aligned_axes(
    indicators: &BTreeMap<String, RegionSeries>,
    weights: &Weights,
) -> Result<(Axis, Axis)> {
    let mut reference: Option<(&str, &RegionSeries)> = None;
    for (name, _) in weights.active() {
        let ind = indicators
            .get(name)
            .with_context(|| format!("indicator {name:?} has no ranks"))?;
        match reference {
            None => reference = Some((name, ind)),
            Some((first, r)) => {
                if !same_coords(&r.latitude, &ind.latitude)
                    || !same_coords(&r.longitude, &ind.longitude)
                {
                    bail!(
                        "indicator {name:?} is not on the same grid as {first:?}; \
                         cut both sources onto the region the same way"
                    );
                }
            }
        }
    }
    let Some((_, r)) = reference else {
        bail!("no indicator with a positive weight");
    };
    Ok((r.latitude, r.longitude))
}

fn same_coords(a: &Axis, b: &Axis) -> bool {
    a.len() == b.len()
        && a.values()
            .iter()
            .zip(b.values())
            .all(|(&x, y)| round_coord(x) == round_coord(y))
}

/// One data variable of a stage output.
pub struct Output<'a> {
    pub name: String,
    pub units: String,
    pub long_name: String,
    pub series: &'a IndicatorSeries,
}

impl<'a> Output<'a> {
    pub fn new(
        name: impl Into<String>,
        units: impl Into<String>,
        long_name: impl Into<String>,
        series: &'a IndicatorSeries,
    ) -> Self {
        Self {
            name: name.into(),
            units: units.into(),
            long_name: long_name.into(),
            series,
        }
    }
}

/// Whether an existing output should be kept instead of recomputed.
pub fn should_skip(path: &Path, force: bool) -> bool {
    if !path.exists() {
        return false;
    }
    if force {
        warn!(path = %path.display(), "overwriting existing output");
        return false;
    }
    info!(path = %path.display(), "output exists, skipping");
    true
}

/// Writes stage outputs sharing one pair of axes.
pub fn write_outputs(
    path: &Path,
    latitude: &Axis,
    longitude: &Axis,
    outputs: &[Output<'_>],
    stage: &str,
) -> Result<()> {
    let history = format!(
        "{} {}: {stage}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );
    let writer = outputs.iter().fold(
        SeriesWriter::new(*latitude, *longitude).with_history(history),
        |w, o| w.with_variable(o.name.as_str(), o.units.as_str(), o.long_name.as_str(), o.series),
    );
    write_series(path, &writer).with_context(|| format!("failed to write {}", path.display()))
}
