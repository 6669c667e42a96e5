use log::{debug, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tee_core::{ErrorInfo, TeeError};
use tee_lattice::Subsystem;

use crate::histogram::{BitOrder, Histogram};
use crate::protocol::{MeasurementBackend, MeasurementProtocol, MeasurementSetting};

/// Largest subsystem for which a full Pauli ensemble is collected quietly.
pub const PAULI_WARN_QUBITS: usize = 8;

/// Histograms of one subsystem, one per measurement setting, in setting order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ensemble {
    subsystem: Subsystem,
    settings: Vec<MeasurementSetting>,
    histograms: Vec<Histogram>,
}

impl Ensemble {
    /// Pairs settings with their histograms.
    ///
    /// Every histogram must be as wide as the subsystem.
    pub fn new(
        subsystem: Subsystem,
        settings: Vec<MeasurementSetting>,
        histograms: Vec<Histogram>,
    ) -> Result<Self, TeeError> {
        if settings.len() != histograms.len() {
            let info = ErrorInfo::new(
                "ensemble-length-mismatch",
                "each setting needs exactly one histogram",
            )
            .with_context("settings", settings.len().to_string())
            .with_context("histograms", histograms.len().to_string());
            return Err(TeeError::Domain(info));
        }
        if let Some((index, histogram)) = histograms
            .iter()
            .enumerate()
            .find(|(_, histogram)| histogram.width() != subsystem.len())
        {
            let info = width_mismatch(&subsystem, histogram, index);
            return Err(TeeError::Domain(info));
        }
        Ok(Self {
            subsystem,
            settings,
            histograms,
        })
    }

    /// Subsystem the ensemble was measured on.
    pub fn subsystem(&self) -> &Subsystem {
        &self.subsystem
    }

    /// Settings in index order.
    pub fn settings(&self) -> &[MeasurementSetting] {
        &self.settings
    }

    /// Histograms aligned with [`Ensemble::settings`].
    pub fn histograms(&self) -> &[Histogram] {
        &self.histograms
    }

    /// Number of settings.
    pub fn len(&self) -> usize {
        self.histograms.len()
    }

    /// Whether the ensemble holds no settings.
    pub fn is_empty(&self) -> bool {
        self.histograms.is_empty()
    }
}

fn width_mismatch(subsystem: &Subsystem, histogram: &Histogram, index: usize) -> ErrorInfo {
    ErrorInfo::new(
        "histogram-width-mismatch",
        "histogram width differs from the subsystem size",
    )
    .with_context("anchor", subsystem.anchor().to_string())
    .with_context("expected", subsystem.len().to_string())
    .with_context("found", histogram.width().to_string())
    .with_context("setting", index.to_string())
}

/// Runs `backend` once per protocol setting and gathers the histograms.
///
/// Settings execute in parallel on the current rayon pool; the result keeps
/// setting order. Histograms are normalized with `bit_order` before being
/// checked against the subsystem width. The first backend error aborts the
/// collection and is returned unchanged.
pub fn collect_ensemble<B>(
    backend: &B,
    subsystem: &Subsystem,
    protocol: &MeasurementProtocol,
    master_seed: u64,
    bit_order: BitOrder,
) -> Result<Ensemble, TeeError>
where
    B: MeasurementBackend + ?Sized,
{
    let num_qubits = subsystem.len();
    if matches!(protocol, MeasurementProtocol::Pauli) && num_qubits > PAULI_WARN_QUBITS {
        warn!(
            "pauli ensemble on {num_qubits} qubits needs {} settings",
            protocol.num_settings(num_qubits)
        );
    }
    let settings = protocol.settings(num_qubits, master_seed);
    debug!(
        "collecting {} settings for {} subsystem at {}",
        settings.len(),
        subsystem.shape(),
        subsystem.anchor()
    );

    let results: Result<Vec<_>, TeeError> = settings
        .par_iter()
        .enumerate()
        .map(|(index, setting)| -> Result<(usize, Histogram), TeeError> {
            let histogram = backend.run(subsystem, setting)?.with_bit_order(bit_order);
            if histogram.width() != num_qubits {
                return Err(TeeError::Backend(width_mismatch(subsystem, &histogram, index)));
            }
            Ok((index, histogram))
        })
        .collect();
    let mut ordered = results?;
    ordered.sort_by_key(|(index, _)| *index);

    let histograms = ordered.into_iter().map(|(_, histogram)| histogram).collect();
    Ensemble::new(subsystem.clone(), settings, histograms)
}
