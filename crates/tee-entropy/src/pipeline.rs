use log::debug;
use rayon::prelude::*;
use tee_core::{ErrorInfo, RunProvenance, SchemaVersion, TeeError};
use tee_lattice::{enumerate_subsystems, LatticeSize, Subsystem};

use crate::config::PipelineConfig;
use crate::ensemble::{collect_ensemble, Ensemble};
use crate::protocol::MeasurementBackend;
use crate::purity::SelfPairCorrection;
use crate::report::{mean_s_topo, LatticeReport, SubsystemReport};
use crate::topo::topo_entropy;

fn thread_pool(concurrency: usize) -> Result<rayon::ThreadPool, TeeError> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(concurrency.max(1))
        .build()
        .map_err(|err| TeeError::Config(ErrorInfo::new("thread-pool", err.to_string())))
}

/// Combines an already collected ensemble into a subsystem report, using the
/// canonical partition of its shape.
pub fn evaluate_ensemble(
    ensemble: &Ensemble,
    correction: SelfPairCorrection,
) -> Result<SubsystemReport, TeeError> {
    let subsystem = ensemble.subsystem();
    let partition = subsystem.shape().partition();
    let entropy = topo_entropy(ensemble.histograms(), &partition, correction)?;
    debug!(
        "{} subsystem at {}: s_topo {:.4} bits",
        subsystem.shape(),
        subsystem.anchor(),
        entropy.s_topo_bits()
    );
    Ok(SubsystemReport {
        shape: subsystem.shape(),
        anchor: subsystem.anchor(),
        coords: subsystem.coords().to_vec(),
        settings: ensemble.len(),
        entropy,
    })
}

fn evaluate_in_pool<B>(
    backend: &B,
    subsystem: &Subsystem,
    config: &PipelineConfig,
) -> Result<SubsystemReport, TeeError>
where
    B: MeasurementBackend + ?Sized,
{
    let ensemble = collect_ensemble(
        backend,
        subsystem,
        &config.protocol,
        config.seed,
        config.bit_order,
    )?;
    evaluate_ensemble(&ensemble, config.correction)
}

/// Collects and evaluates the ensemble of a single subsystem.
pub fn evaluate_subsystem<B>(
    backend: &B,
    subsystem: &Subsystem,
    config: &PipelineConfig,
) -> Result<SubsystemReport, TeeError>
where
    B: MeasurementBackend + ?Sized,
{
    config.validate()?;
    let pool = thread_pool(config.concurrency)?;
    pool.install(|| evaluate_in_pool(backend, subsystem, config))
}

/// Subsystems evaluated for `config`, shape by shape in configuration order.
pub fn planned_subsystems(lattice: LatticeSize, config: &PipelineConfig) -> Vec<Subsystem> {
    config
        .shapes
        .iter()
        .flat_map(|&shape| enumerate_subsystems(lattice, shape))
        .collect()
}

/// Evaluates every non-corner subsystem of the configured shapes.
///
/// Subsystems run concurrently on a pool of `config.concurrency` threads; the
/// report lists them in enumeration order regardless of completion order.
pub fn evaluate_lattice<B>(backend: &B, config: &PipelineConfig) -> Result<LatticeReport, TeeError>
where
    B: MeasurementBackend + ?Sized,
{
    config.validate()?;
    let lattice = config.lattice;
    let subsystems = planned_subsystems(lattice, config);
    debug!(
        "evaluating {} subsystems on a {}x{} lattice with {} threads",
        subsystems.len(),
        lattice.x(),
        lattice.y(),
        config.concurrency
    );

    let pool = thread_pool(config.concurrency)?;
    let results: Result<Vec<_>, TeeError> = pool.install(|| {
        subsystems
            .par_iter()
            .enumerate()
            .map(|(index, subsystem)| -> Result<(usize, SubsystemReport), TeeError> {
                Ok((index, evaluate_in_pool(backend, subsystem, config)?))
            })
            .collect()
    });
    let mut ordered = results?;
    ordered.sort_by_key(|(index, _)| *index);
    let reports: Vec<SubsystemReport> = ordered.into_iter().map(|(_, report)| report).collect();

    let provenance = RunProvenance::new(config.input_hash()?, config.seed)
        .with_tool("tee-entropy", env!("CARGO_PKG_VERSION"));
    Ok(LatticeReport {
        schema_version: SchemaVersion::default(),
        provenance,
        lattice,
        protocol: config.protocol,
        correction: config.correction,
        mean_s_topo: mean_s_topo(&reports),
        subsystems: reports,
    })
}
