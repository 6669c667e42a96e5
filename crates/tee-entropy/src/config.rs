use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tee_core::{ErrorInfo, TeeError};
use tee_lattice::{LatticeSize, SubsystemShape};

use crate::hash::stable_hash_string;
use crate::histogram::BitOrder;
use crate::protocol::MeasurementProtocol;
use crate::purity::SelfPairCorrection;
use crate::serde::{from_json_slice, from_yaml_slice, to_yaml_string};

fn config_error(code: &str, message: impl Into<String>) -> TeeError {
    TeeError::Config(ErrorInfo::new(code, message))
}

/// Settings of one lattice-wide entropy estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PipelineConfig {
    /// Lattice dimensions.
    pub lattice: LatticeSize,
    /// Subsystem shapes to evaluate, in report order.
    #[serde(default = "PipelineConfig::default_shapes")]
    pub shapes: Vec<SubsystemShape>,
    /// Measurement settings applied to every subsystem.
    #[serde(default)]
    pub protocol: MeasurementProtocol,
    /// Self-pair handling of the purity estimator.
    #[serde(default)]
    pub correction: SelfPairCorrection,
    /// Character order of backend outcome strings.
    #[serde(default)]
    pub bit_order: BitOrder,
    /// Master seed for randomized settings.
    #[serde(default)]
    pub seed: u64,
    /// Worker threads used for subsystems and settings.
    #[serde(default = "PipelineConfig::default_concurrency")]
    pub concurrency: usize,
}

impl PipelineConfig {
    fn default_shapes() -> Vec<SubsystemShape> {
        vec![SubsystemShape::TwoByTwo]
    }

    fn default_concurrency() -> usize {
        1
    }

    /// Configuration with every optional field at its default.
    pub fn new(lattice: LatticeSize) -> Self {
        Self {
            lattice,
            shapes: Self::default_shapes(),
            protocol: MeasurementProtocol::default(),
            correction: SelfPairCorrection::default(),
            bit_order: BitOrder::default(),
            seed: 0,
            concurrency: Self::default_concurrency(),
        }
    }

    /// Parses a YAML configuration and validates it.
    pub fn from_yaml_str(source: &str) -> Result<Self, TeeError> {
        let config: Self = from_yaml_slice(source.as_bytes())?;
        config.validate()?;
        Ok(config)
    }

    /// Parses a JSON configuration and validates it.
    pub fn from_json_str(source: &str) -> Result<Self, TeeError> {
        let config: Self = from_json_slice(source.as_bytes())?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the values serde cannot reject on its own.
    ///
    /// Lattice sizes are already checked when they are decoded.
    pub fn validate(&self) -> Result<(), TeeError> {
        if self.shapes.is_empty() {
            return Err(config_error("no-shapes", "at least one subsystem shape is required"));
        }
        if self.concurrency == 0 {
            return Err(config_error("zero-concurrency", "concurrency must be at least one"));
        }
        if let MeasurementProtocol::Haar { draws: 0 } = self.protocol {
            let info = ErrorInfo::new("zero-draws", "haar protocol needs at least one draw")
                .with_hint("set protocol.draws to a positive count");
            return Err(TeeError::Config(info));
        }
        Ok(())
    }

    /// Stable hash of the canonical JSON form, recorded as report provenance.
    pub fn input_hash(&self) -> Result<String, TeeError> {
        stable_hash_string(self)
    }

    /// YAML rendering of the configuration.
    pub fn to_yaml_string(&self) -> Result<String, TeeError> {
        to_yaml_string(self)
    }
}

/// Loads a configuration file, choosing JSON for `.json` files and YAML otherwise.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<PipelineConfig, TeeError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|err| {
        TeeError::Config(
            ErrorInfo::new("config-read", err.to_string())
                .with_context("path", path.display().to_string()),
        )
    })?;
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let config: PipelineConfig = if is_json {
        from_json_slice(&bytes)?
    } else {
        from_yaml_slice(&bytes)?
    };
    config.validate()?;
    Ok(config)
}
