//! Closest-destination solver.
//!
//! # Virtual sink reduction
//!
//! "Nearest of many destinations" becomes a single-target query: a
//! [`SinkView`] adds one virtual node with a zero-cost arc from every node
//! hosting a destination of the category.  The least-cost path from an
//! origin to the sink passes through its closest destination last.
//!
//! ```text
//!   O ──5── D1 ──0──┐
//!   │               ├── sink
//!   └──8── D2 ──0───┘
//! ```
//!
//! # Disrupted destinations
//!
//! When a hazard check is active and the chosen destination's hazard value
//! exceeds the destination threshold, the origin is recorded as disrupted
//! and not routed anywhere else for this scenario.  The next-closest
//! destination is not searched.
//!
//! # Path reuse
//!
//! Origins sharing a node share a source, so the path is computed once per
//! node and reused.

use std::collections::hash_map::Entry;

use geo_types::MultiLineString;
use log::{debug, warn};
use rustc_hash::FxHashMap;

use od_core::{CategoryId, HazardId, NodeId};
use od_network::{
    ActiveRoads, GraphView, NetworkError, Path, RoadNetwork, Router, SinkView, WeightedView,
};
use od_table::OdTable;

use crate::accumulator::Accumulator;
use crate::observer::{enter_phase, AnalysisObserver};
use crate::route::{DisruptedDestination, Route, ScenarioPhase};
use crate::{AnalysisError, AnalysisResult};

/// Destination hazard test applied to every chosen destination.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HazardCheck {
    pub hazard:    HazardId,
    pub threshold: f64,
}

/// Everything one category solve produced besides the accumulated loads.
#[derive(Clone, Debug, Default)]
pub struct SolveOutcome {
    pub routes:    Vec<Route>,
    pub disrupted: Vec<DisruptedDestination>,
    /// Origin rows with no path to any destination.
    pub no_access: Vec<usize>,
    /// Origin rows skipped for a missing destination hazard value.
    pub skipped:   Vec<usize>,
}

pub struct ClosestDestinationSolver<'a, R: Router> {
    network: &'a RoadNetwork,
    table:   &'a OdTable,
    weights: &'a [f64],
    router:  &'a R,
}

impl<'a, R: Router> ClosestDestinationSolver<'a, R> {
    pub fn new(network: &'a RoadNetwork, table: &'a OdTable, weights: &'a [f64], router: &'a R) -> Self {
        Self { network, table, weights, router }
    }

    /// Route every origin to its closest destination in `scope`, adding the
    /// loads to `column` of `acc`.
    #[allow(clippy::too_many_arguments)]
    pub fn solve<O: AnalysisObserver>(
        &self,
        scenario: &str,
        active: &ActiveRoads,
        scope: Option<CategoryId>,
        check: Option<HazardCheck>,
        column: usize,
        acc: &mut Accumulator,
        observer: &mut O,
    ) -> AnalysisResult<SolveOutcome> {
        let base = WeightedView::new(self.network, self.weights, active);
        let sink = SinkView::attach(&base, self.table.destination_nodes(scope));
        debug!(
            "{scenario}{}: sink linked from {} destination nodes",
            scope.map(|c| format!(" {}", c.short_name())).unwrap_or_default(),
            sink.attached_count()
        );
        enter_phase(observer, scenario, scope, ScenarioPhase::SinkAttached);

        // ── Choose destinations ───────────────────────────────────────────
        let mut outcome = SolveOutcome::default();
        let mut assigned: Vec<(usize, Path)> = Vec::new();
        let mut paths: FxHashMap<NodeId, Option<Path>> = FxHashMap::default();

        for (row, origin) in self.table.origins().iter().enumerate() {
            let path = match paths.entry(origin.node) {
                Entry::Occupied(e) => e.into_mut(),
                Entry::Vacant(e) => e.insert(path_to_sink(self.router, &sink, origin.node)?),
            };
            let Some((path, destination)) = path.as_ref().and_then(|p| Some((p, p.penultimate()?)))
            else {
                outcome.no_access.push(row);
                continue;
            };

            if let Some(check) = check {
                match self.network.node_hazard(check.hazard, destination) {
                    Some(v) if v > check.threshold => {
                        outcome.disrupted.push(DisruptedDestination {
                            origin:           origin.id,
                            origin_node:      origin.node,
                            destination_node: destination,
                        });
                        continue;
                    }
                    Some(_) => {}
                    None => {
                        let err = AnalysisError::MissingHazardValue {
                            hazard: self.network.hazard_names[check.hazard.index()].clone(),
                            node:   destination,
                        };
                        warn!("{scenario}: {err}; {} skipped", self.table.origin_label(row));
                        outcome.skipped.push(row);
                        continue;
                    }
                }
            }

            assigned.push((row, path.clone().truncate_last()));
        }
        enter_phase(observer, scenario, scope, ScenarioPhase::OriginsSolved);

        // ── Accumulate loads ──────────────────────────────────────────────
        for (row, path) in assigned {
            let origin = &self.table.origins()[row];
            let load = origin.load();
            let destination = path.target();

            let mut length_m = 0.0;
            let mut lines = Vec::with_capacity(path.arcs.len());
            for edge in path.edges() {
                let road = self.network.edge_road[edge.index()];
                acc.add_edge_load(column, road, load);
                length_m += self.network.road_length_m[road.index()].unwrap_or(0.0);
                lines.push(self.network.arc_geometry(edge));
            }
            acc.update_destinations(column, self.table, destination, scope, load);

            outcome.routes.push(Route {
                scenario:          scenario.to_owned(),
                category:          scope,
                origin:            origin.id,
                origin_node:       origin.node,
                destination_node:  destination,
                origin_label:      self.table.origin_label(row),
                destination_label: self.table.destination_label_at(destination, scope),
                cost:              path.cost,
                length_m,
                load,
                geometry:          MultiLineString::new(lines),
                nodes:             path.nodes,
            });
        }
        enter_phase(observer, scenario, scope, ScenarioPhase::LoadsAccumulated);

        let base = sink.detach();
        debug_assert_eq!(base.node_count(), self.network.node_count());
        enter_phase(observer, scenario, scope, ScenarioPhase::SinkDetached);

        Ok(outcome)
    }
}

/// Least-cost path from `from` to the sink, `None` when unreachable.
fn path_to_sink<R: Router, G: GraphView>(
    router: &R,
    sink: &SinkView<'_, G>,
    from: NodeId,
) -> AnalysisResult<Option<Path>> {
    match router.route(sink, from, sink.sink()) {
        Ok(path) => Ok(Some(path)),
        Err(NetworkError::NoRoute { .. }) => Ok(None),
        Err(e) => Err(e.into()),
    }
}
