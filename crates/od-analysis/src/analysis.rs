//! The `Analysis` struct: baseline run and disruption scenarios.

use log::{debug, info, warn};

use od_core::{AnalysisConfig, CategoryId, BASELINE_SCENARIO};
use od_network::{ActiveRoads, RoadNetwork, Router};
use od_table::OdTable;

use crate::accumulator::Accumulator;
use crate::baseline::PreferredRoutes;
use crate::comparator::DelayStats;
use crate::observer::{enter_phase, AnalysisObserver};
use crate::route::{Route, ScenarioPhase, ScenarioResult};
use crate::solver::{ClosestDestinationSolver, HazardCheck, SolveOutcome};
use crate::{AnalysisError, AnalysisResult};

/// A closest-destination access analysis over one network and OD table.
///
/// ```text
/// run():
///   ① Baseline   every road active, no destination hazard check.
///                  Load columns `noHaz_P…`; yields the preferred routes.
///   ② Scenarios  for each hazard name in sorted order:
///                  prune roads above the threshold (bridges exempt),
///                  solve every category, compare with the baseline.
/// ```
///
/// The network is never mutated.  Loads, access flags, routes and results
/// accumulate in the struct across scenarios.
///
/// Create via [`AnalysisBuilder`][crate::AnalysisBuilder].
pub struct Analysis<R: Router> {
    pub config:  AnalysisConfig,
    pub network: RoadNetwork,
    pub table:   OdTable,
    pub router:  R,

    /// Hazard scenarios in processing order.
    pub hazards: Vec<String>,

    /// Road costs under `config.weighing`, indexed by `RoadId`.
    pub weights: Vec<f64>,

    /// Load and access columns of every scenario run so far.
    pub accumulator: Accumulator,

    /// Baseline routes, once the baseline has run.
    pub preferred: Option<PreferredRoutes>,

    /// Routes of the baseline run.
    pub baseline_routes: Vec<Route>,

    /// Routes of every hazard scenario, in processing order.
    pub routes: Vec<Route>,

    /// One result per scenario and category, in processing order.
    pub results: Vec<ScenarioResult>,
}

impl<R: Router> Analysis<R> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run the baseline followed by every hazard scenario.
    pub fn run<O: AnalysisObserver>(&mut self, observer: &mut O) -> AnalysisResult<()> {
        self.run_baseline(observer)?;
        for name in self.hazards.clone() {
            self.run_scenario(&name, observer)?;
        }
        Ok(())
    }

    /// Solve the undisrupted network and record the preferred routes.
    ///
    /// Origins the undisrupted network cannot reach are logged and left out
    /// of the preferred routes; comparing against them later is an error.
    pub fn run_baseline<O: AnalysisObserver>(&mut self, observer: &mut O) -> AnalysisResult<&PreferredRoutes> {
        let scenario = BASELINE_SCENARIO;
        observer.on_scenario_start(scenario);
        enter_phase(observer, scenario, None, ScenarioPhase::Init);
        info!("{scenario}: solving {} origins on the undisrupted network", self.table.origins().len());

        let active = ActiveRoads::all(&self.network);
        enter_phase(observer, scenario, None, ScenarioPhase::GraphPruned);

        let solver = ClosestDestinationSolver::new(&self.network, &self.table, &self.weights, &self.router);

        let mut routes = Vec::new();
        let mut results = Vec::new();
        for scope in self.table.category_scopes() {
            let access = self.accumulator.begin_access(scenario, scope);
            let column = self.accumulator.column(scenario, scope);
            self.accumulator.reset_edge_column(column);
            let outcome = solver.solve(scenario, &active, scope, None, column, &mut self.accumulator, observer)?;

            for &row in &outcome.no_access {
                warn!(
                    "{scenario}: {} cannot reach any destination on the undisrupted network",
                    self.table.origin_label(row)
                );
            }
            self.accumulator.update_origins(access, &outcome.no_access);
            results.push(summarise(scenario, scope, &self.table, &outcome, None));
            routes.extend(outcome.routes);
        }

        enter_phase(observer, scenario, None, ScenarioPhase::Done);
        observer.on_scenario_end(scenario, &results);
        info!("{scenario}: {} routes", routes.len());

        self.baseline_routes = routes;
        Ok(self.preferred.insert(PreferredRoutes::from_routes(&self.baseline_routes)))
    }

    /// Run one hazard scenario.  Runs the baseline first if a comparison is
    /// configured and the baseline has not run yet.
    pub fn run_scenario<O: AnalysisObserver>(
        &mut self,
        scenario: &str,
        observer: &mut O,
    ) -> AnalysisResult<Vec<ScenarioResult>> {
        let hazard = self
            .network
            .hazard_id(scenario)
            .ok_or_else(|| AnalysisError::UnknownHazard(scenario.to_owned()))?;
        if self.config.compare_with_baseline && self.preferred.is_none() {
            self.run_baseline(observer)?;
        }

        observer.on_scenario_start(scenario);
        enter_phase(observer, scenario, None, ScenarioPhase::Init);

        // ── Prune ─────────────────────────────────────────────────────────
        let active = ActiveRoads::for_hazard(&self.network, hazard, self.config.threshold);
        info!(
            "{scenario}: {} of {} roads above threshold {}",
            active.removed_count(),
            self.network.road_count(),
            self.config.threshold
        );
        enter_phase(observer, scenario, None, ScenarioPhase::GraphPruned);

        // ── Solve each category ───────────────────────────────────────────
        let check = HazardCheck { hazard, threshold: self.config.destination_threshold() };
        let solver = ClosestDestinationSolver::new(&self.network, &self.table, &self.weights, &self.router);
        let preferred = self.preferred.as_ref().filter(|_| self.config.compare_with_baseline);

        let mut results = Vec::new();
        for scope in self.table.category_scopes() {
            let access = self.accumulator.begin_access(scenario, scope);
            let column = self.accumulator.column(scenario, scope);
            self.accumulator.reset_edge_column(column);
            let outcome =
                solver.solve(scenario, &active, scope, Some(check), column, &mut self.accumulator, observer)?;
            self.accumulator.update_origins(access, &outcome.no_access);

            let delays = match preferred {
                Some(preferred) => {
                    let mut stats = DelayStats::default();
                    for route in &outcome.routes {
                        stats.compare(preferred, route)?;
                    }
                    Some(stats)
                }
                None => None,
            };

            let result = summarise(scenario, scope, &self.table, &outcome, delays.as_ref());
            debug!(
                "{scenario}: {} routed, {} no access, {} disrupted destination, {} skipped",
                result.origins_routed,
                result.origins_no_access,
                result.origins_disrupted_destination,
                result.origins_skipped
            );
            results.push(result);
            self.routes.extend(outcome.routes);
        }

        enter_phase(observer, scenario, None, ScenarioPhase::Done);
        observer.on_scenario_end(scenario, &results);
        info!(
            "{scenario}: {} people without access, {} delayed",
            results.iter().map(|r| r.people_no_access).sum::<u64>(),
            results.iter().map(|r| r.people_delayed).sum::<u64>()
        );

        self.results.extend(results.iter().cloned());
        Ok(results)
    }

    /// Per destination row, the load routed to it in the baseline.
    pub fn destination_totals(&self) -> Vec<f64> {
        self.accumulator.destination_totals(BASELINE_SCENARIO)
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn summarise(
    scenario: &str,
    scope: Option<CategoryId>,
    table: &OdTable,
    outcome: &SolveOutcome,
    delays: Option<&DelayStats>,
) -> ScenarioResult {
    let reached = outcome.routes.len() + outcome.disrupted.len() + outcome.skipped.len();
    let no_access = outcome.no_access.len();
    let mut result = ScenarioResult {
        scenario:          scenario.to_owned(),
        category:          scope,
        origins_total:     table.origins().len(),
        origins_reached:   reached,
        origins_routed:    outcome.routes.len(),
        origins_no_access: no_access,
        origins_disrupted_destination: outcome.disrupted.len(),
        origins_skipped:   outcome.skipped.len(),
        people_no_access:  Accumulator::nr_without_access(table, &outcome.no_access),
        disrupted:         outcome.disrupted.clone(),
        ..ScenarioResult::default()
    };
    if let Some(d) = delays {
        result.people_no_delay = d.no_delay.round() as u64;
        result.people_delayed = d.delayed.round() as u64;
        result.routes_delayed = d.delayed_routes;
        result.extra_weighing = d.extra_weighing;
        result.extra_distance_km = d.extra_distance_km;
    }
    result
}
