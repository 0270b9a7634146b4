//! Records produced by a scenario solve.

use std::fmt;

use geo_types::MultiLineString;

use od_core::{CategoryId, NodeId, OriginId};

// ── Access ────────────────────────────────────────────────────────────────────

/// Per-scenario access status of an origin.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Access {
    #[default]
    Access,
    NoAccess,
}

impl Access {
    pub fn as_str(self) -> &'static str {
        match self {
            Access::Access   => "access",
            Access::NoAccess => "no access",
        }
    }
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── ScenarioPhase ─────────────────────────────────────────────────────────────

/// Progress of one scenario.  The sink phases repeat once per category.
///
/// ```text
/// Init → GraphPruned → (SinkAttached → OriginsSolved → LoadsAccumulated → SinkDetached)+ → Done
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ScenarioPhase {
    Init,
    GraphPruned,
    SinkAttached,
    OriginsSolved,
    LoadsAccumulated,
    SinkDetached,
    Done,
}

// ── Route ─────────────────────────────────────────────────────────────────────

/// One origin routed to its closest destination.
#[derive(Clone, Debug, PartialEq)]
pub struct Route {
    /// Scenario name (`noHaz` for the baseline).
    pub scenario:          String,
    pub category:          Option<CategoryId>,
    pub origin:            OriginId,
    pub origin_node:       NodeId,
    pub destination_node:  NodeId,
    pub origin_label:      String,
    /// Labels of the destinations of the category on the destination node.
    pub destination_label: String,
    /// Visited network nodes, origin first.
    pub nodes:             Vec<NodeId>,
    /// Path cost under the configured weighing.
    pub cost:              f64,
    /// Sum of the road lengths along the path, in metres.
    pub length_m:          f64,
    /// Load assigned to every road on the path.
    pub load:              f64,
    /// Road geometries in travel order.
    pub geometry:          MultiLineString<f64>,
}

/// An origin whose closest destination was itself disrupted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisruptedDestination {
    pub origin:           OriginId,
    pub origin_node:      NodeId,
    pub destination_node: NodeId,
}

// ── ScenarioResult ────────────────────────────────────────────────────────────

/// Aggregated statistics of one scenario and category.
///
/// `origins_reached + origins_no_access == origins_total`.  Reached origins
/// are those with a path to some destination; they split further into
/// routed, disrupted-destination and skipped ones.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScenarioResult {
    pub scenario:  String,
    pub category:  Option<CategoryId>,

    // ── Origin counts ─────────────────────────────────────────────────────
    pub origins_total:     usize,
    pub origins_reached:   usize,
    pub origins_routed:    usize,
    pub origins_no_access: usize,
    pub origins_disrupted_destination: usize,
    /// Origins skipped because their destination lacked a hazard value.
    pub origins_skipped:   usize,

    // ── People (population × out-fraction, rounded) ──────────────────────
    pub people_no_access: u64,
    pub people_no_delay:  u64,
    pub people_delayed:   u64,

    // ── Detours against the baseline ──────────────────────────────────────
    /// Routes whose destination differs from the baseline.
    pub routes_delayed:   usize,
    /// Σ extra cost under the weighing.
    pub extra_weighing:   f64,
    /// Σ extra length in kilometres.
    pub extra_distance_km: f64,

    pub disrupted: Vec<DisruptedDestination>,
}
