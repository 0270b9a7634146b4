//! Fluent builder for constructing an [`Analysis`].

use od_core::AnalysisConfig;
use od_network::{RoadNetwork, Router};
use od_table::OdTable;

use crate::accumulator::Accumulator;
use crate::{Analysis, AnalysisError, AnalysisResult};

/// Fluent builder for [`Analysis<R>`].
///
/// # Required inputs
///
/// - [`AnalysisConfig`]: weighing, thresholds, hazard names, …
/// - [`RoadNetwork`] with the hazard columns already joined
/// - [`OdTable`] placed on that network
/// - `R: Router`: the routing algorithm (e.g. [`od_network::DijkstraRouter`])
///
/// # Optional inputs (have defaults)
///
/// | Method          | Default                              |
/// |-----------------|--------------------------------------|
/// | `.hazards(v)`   | `config.hazard_names`                |
///
/// # Example
///
/// ```rust,ignore
/// let mut analysis = AnalysisBuilder::new(config, network, table, DijkstraRouter)
///     .build()?;
/// analysis.run(&mut NoopObserver)?;
/// ```
pub struct AnalysisBuilder<R: Router> {
    config:  AnalysisConfig,
    network: RoadNetwork,
    table:   OdTable,
    router:  R,
    hazards: Option<Vec<String>>,
}

impl<R: Router> AnalysisBuilder<R> {
    /// Create a builder with all required inputs.
    pub fn new(config: AnalysisConfig, network: RoadNetwork, table: OdTable, router: R) -> Self {
        Self { config, network, table, router, hazards: None }
    }

    /// Evaluate these hazard scenarios instead of `config.hazard_names`.
    pub fn hazards(mut self, names: Vec<String>) -> Self {
        self.hazards = Some(names);
        self
    }

    /// Validate inputs, compute road weights, and return a ready-to-run
    /// [`Analysis`].
    ///
    /// Fails on an invalid configuration, a road without a usable weighing
    /// value, or a hazard name that is not a column of the network.
    pub fn build(self) -> AnalysisResult<Analysis<R>> {
        self.config.validate()?;

        let hazards = match self.hazards {
            Some(mut names) => {
                names.sort();
                names.dedup();
                names
            }
            None => self.config.sorted_hazard_names(),
        };
        if let Some(unknown) = hazards.iter().find(|h| self.network.hazard_id(h).is_none()) {
            return Err(AnalysisError::UnknownHazard(unknown.clone()));
        }

        for o in self.table.origins() {
            if !self.network.contains(o.node) {
                return Err(AnalysisError::Config(format!("origin {} is placed on missing {}", o.id, o.node)));
            }
        }
        for d in self.table.destinations() {
            if !self.network.contains(d.node) {
                return Err(AnalysisError::Config(format!(
                    "destination {} is placed on missing {}",
                    d.id, d.node
                )));
            }
        }

        let weights = self.network.road_weights(self.config.weighing)?;
        let accumulator = Accumulator::new(self.network.road_count(), &self.table);

        Ok(Analysis {
            config: self.config,
            network: self.network,
            table: self.table,
            router: self.router,
            hazards,
            weights,
            accumulator,
            preferred: None,
            baseline_routes: Vec::new(),
            routes: Vec::new(),
            results: Vec::new(),
        })
    }
}
