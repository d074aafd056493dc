//! Pure conversion functions: TOML config structs -> pipeline plan types.

use std::collections::BTreeSet;

use anyhow::{Context, Result, bail};

use cdi_composite::Weights;
use cdi_grid::Aoi;

use crate::config::*;
use crate::pipeline::{
    COMPOSITE_STEM, IndicatorPlan, Pipeline, Region, SPI_STEM, Source, SpiPlan, Transform,
};

/// Parses a transform name into the corresponding enum variant.
pub fn parse_transform(s: &str) -> Result<Transform> {
    match s.to_lowercase().as_str() {
        "anomaly" => Ok(Transform::Anomaly),
        "spi" => Ok(Transform::Spi),
        "raw" => Ok(Transform::Raw),
        other => bail!("unknown transform: {other:?}"),
    }
}

/// Builds the validated [`Region`] from the `[region]` table.
pub fn build_region(region: &RegionToml) -> Result<Region> {
    if region.name.is_empty() {
        bail!("region name must not be empty");
    }
    if !region.spacing.is_finite() || region.spacing <= 0.0 {
        bail!("region spacing must be positive, got {}", region.spacing);
    }
    let aoi = Aoi::new(region.west, region.east, region.north, region.south)
        .context("invalid [region] bounds")?;
    Ok(Region::new(&region.name, aoi, region.spacing)?)
}

/// Checks SPI periods: non-empty, positive and distinct.
pub fn build_periods(periods: &[usize]) -> Result<Vec<usize>> {
    if periods.is_empty() {
        bail!("at least one SPI period is required");
    }
    let mut seen = BTreeSet::new();
    for &p in periods {
        if p == 0 {
            bail!("SPI periods must be at least one month");
        }
        if !seen.insert(p) {
            bail!("SPI period {p} listed twice");
        }
    }
    Ok(periods.to_vec())
}

/// Builds the [`SpiPlan`] from the `[spi]` table.
pub fn build_spi_plan(spi: &SpiToml) -> Result<SpiPlan> {
    Ok(SpiPlan {
        source: Source {
            input: spi.input.clone(),
            variables: vec![spi.variable.clone()],
            blend_weights: None,
            resample: spi.resample,
        },
        periods: build_periods(&spi.periods)?,
    })
}

/// Builds one [`IndicatorPlan`].
///
/// SPI indicators take their values from the SPI stage and must name one of
/// its periods; the others need an input and either a variable or a blend.
pub fn build_indicator(ind: &IndicatorToml, spi: Option<&SpiPlan>) -> Result<IndicatorPlan> {
    let transform = parse_transform(&ind.transform)?;

    if transform == Transform::Spi {
        let Some(spi) = spi else {
            bail!("indicator {:?}: transform \"spi\" needs an [spi] section", ind.name);
        };
        let Some(period) = ind.period else {
            bail!("indicator {:?}: transform \"spi\" needs a period", ind.name);
        };
        if !spi.periods.contains(&period) {
            bail!(
                "indicator {:?}: period {period} is not one of the SPI periods {:?}",
                ind.name,
                spi.periods
            );
        }
        if ind.input.is_some() || ind.variable.is_some() || ind.blend.is_some() {
            bail!("indicator {:?}: SPI indicators read the [spi] input", ind.name);
        }
        return Ok(IndicatorPlan {
            name: ind.name.clone(),
            weight: ind.weight,
            transform,
            source: None,
            period: Some(period),
        });
    }

    if ind.period.is_some() {
        bail!("indicator {:?}: period only applies to transform \"spi\"", ind.name);
    }
    let Some(input) = &ind.input else {
        bail!("indicator {:?}: input is required", ind.name);
    };
    let (variables, blend_weights) = match (&ind.variable, &ind.blend) {
        (Some(v), None) => (vec![v.clone()], None),
        (None, Some(b)) => {
            if b.variables.is_empty() || b.variables.len() != b.weights.len() {
                bail!(
                    "indicator {:?}: blend needs one weight per variable, got {} variables and {} weights",
                    ind.name,
                    b.variables.len(),
                    b.weights.len()
                );
            }
            (b.variables.clone(), Some(b.weights.clone()))
        }
        (Some(_), Some(_)) => {
            bail!("indicator {:?}: set either variable or blend, got both", ind.name)
        }
        (None, None) => {
            bail!("indicator {:?}: set either variable or blend, got neither", ind.name)
        }
    };

    Ok(IndicatorPlan {
        name: ind.name.clone(),
        weight: ind.weight,
        transform,
        source: Some(Source {
            input: input.clone(),
            variables,
            blend_weights,
            resample: ind.resample,
        }),
        period: None,
    })
}

/// Builds the composite [`Weights`] from the indicator list.
pub fn build_weights(indicators: &[IndicatorToml]) -> Result<Weights> {
    let mut names = BTreeSet::new();
    for ind in indicators {
        if ind.name.is_empty() {
            bail!("indicator name must not be empty");
        }
        if [SPI_STEM, COMPOSITE_STEM].contains(&ind.name.as_str()) {
            bail!("indicator name {:?} is reserved", ind.name);
        }
        if !names.insert(ind.name.as_str()) {
            bail!("indicator {:?} listed twice", ind.name);
        }
    }
    Weights::new(indicators.iter().map(|i| (i.name.as_str(), i.weight)))
        .context("invalid indicator weights")
}

/// Validates a whole configuration into a runnable [`Pipeline`].
pub fn build_pipeline(config: &CdiConfig) -> Result<Pipeline> {
    let region = build_region(&config.region)?;
    let spi = config.spi.as_ref().map(build_spi_plan).transpose()?;
    let weights = build_weights(&config.indicator)?;
    let indicators = config
        .indicator
        .iter()
        .map(|ind| build_indicator(ind, spi.as_ref()))
        .collect::<Result<Vec<_>>>()?;
    Ok(Pipeline {
        region,
        output_dir: config.io.output_dir.clone(),
        spi,
        indicators,
        weights,
    })
}
