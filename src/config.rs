use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Top-level CDI configuration.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CdiConfig {
    /// Region the outputs cover.
    pub region: RegionToml,

    /// I/O settings.
    #[serde(default)]
    pub io: IoToml,

    /// Precipitation input for the SPI stage.
    #[serde(default)]
    pub spi: Option<SpiToml>,

    /// Indicators entering the composite.
    #[serde(default)]
    pub indicator: Vec<IndicatorToml>,
}

impl CdiConfig {
    /// Reads and parses a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let toml_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        toml::from_str(&toml_str)
            .with_context(|| format!("failed to parse config: {}", path.display()))
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegionToml {
    #[serde(default = "default_region_name")]
    pub name: String,
    pub west: f64,
    pub east: f64,
    pub north: f64,
    pub south: f64,
    #[serde(default = "default_spacing")]
    pub spacing: f64,
}

fn default_region_name() -> String {
    "region".to_string()
}
fn default_spacing() -> f64 {
    0.05
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IoToml {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for IoToml {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpiToml {
    pub input: PathBuf,
    #[serde(default = "default_precip_var")]
    pub variable: String,
    #[serde(default = "default_periods")]
    pub periods: Vec<usize>,
    #[serde(default)]
    pub resample: bool,
}

fn default_precip_var() -> String {
    "precip".to_string()
}
fn default_periods() -> Vec<usize> {
    vec![1, 3, 9]
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IndicatorToml {
    pub name: String,
    pub weight: f64,
    #[serde(default)]
    pub input: Option<PathBuf>,
    #[serde(default)]
    pub variable: Option<String>,
    #[serde(default = "default_transform")]
    pub transform: String,
    #[serde(default)]
    pub period: Option<usize>,
    #[serde(default)]
    pub resample: bool,
    #[serde(default)]
    pub blend: Option<BlendToml>,
}

fn default_transform() -> String {
    "anomaly".to_string()
}

/// Depth-weighted layer blend; `variables` and `weights` pair up in order.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BlendToml {
    pub variables: Vec<String>,
    pub weights: Vec<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const ESWATINI: &str = r#"
[region]
name = "eswatini"
west = 30.75
east = 32.20
north = -25.70
south = -27.35

[spi]
input = "precip_monthly.nc"
variable = "precip_mm"

[[indicator]]
name = "lst"
weight = 0.4
input = "lst_monthly.nc"
variable = "lst_delta"

[[indicator]]
name = "spi"
weight = 0.2
transform = "spi"
period = 3

[[indicator]]
name = "sm"
weight = 0.4
input = "sm_monthly.nc"
transform = "raw"
resample = true
[indicator.blend]
variables = ["sm_0_10", "sm_10_40"]
weights = [0.2, 0.8]
"#;

    #[test]
    fn parses_full_config_with_defaults() {
        let cfg: CdiConfig = toml::from_str(ESWATINI).unwrap();
        assert_eq!(cfg.region.name, "eswatini");
        assert_eq!(cfg.region.spacing, 0.05);
        assert_eq!(cfg.io.output_dir, PathBuf::from("output"));

        let spi = cfg.spi.unwrap();
        assert_eq!(spi.periods, vec![1, 3, 9]);
        assert!(!spi.resample);

        assert_eq!(cfg.indicator.len(), 3);
        assert_eq!(cfg.indicator[0].transform, "anomaly");
        assert_eq!(cfg.indicator[1].period, Some(3));
        assert!(cfg.indicator[1].input.is_none());
        let blend = cfg.indicator[2].blend.as_ref().unwrap();
        assert_eq!(blend.variables, vec!["sm_0_10", "sm_10_40"]);
        assert!(cfg.indicator[2].resample);
    }

    #[test]
    fn rejects_unknown_fields() {
        let text = "[region]\nwest = 0.0\neast = 1.0\nnorth = 1.0\nsouth = 0.0\ncolour = 1\n";
        assert!(toml::from_str::<CdiConfig>(text).is_err());
    }

    #[test]
    fn region_is_required() {
        assert!(toml::from_str::<CdiConfig>("[io]\noutput_dir = \"x\"\n").is_err());
    }

    #[test]
    fn load_reports_path() {
        let err = CdiConfig::load(Path::new("/nonexistent/cdi.toml")).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/cdi.toml"));
    }
}
