//! Plain data row types written by output backends.
//!
//! Route and summary rows have a fixed shape.  Origin, destination and
//! edge-load rows are wide: besides their fixed fields they carry one value
//! per scenario column, in the order of the header passed alongside them.

use od_analysis::Access;

/// One origin routed to its closest destination.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRow {
    /// Scenario name; `noHaz` for the baseline.
    pub hazard:            String,
    /// Category name, empty for uncategorised tables.
    pub category:          String,
    /// Source-data node ids, see [`od_network::RoadNetwork::node_key`].
    pub origin_node:       u64,
    pub destination_node:  u64,
    pub origin_label:      String,
    pub destination_label: String,
    /// Path cost under the configured weighing.
    pub weighing:          f64,
    pub length_m:          f64,
    pub load:              f64,
    /// WKT `MULTILINESTRING` of the route.
    pub geometry:          String,
}

/// Aggregated statistics of one scenario and category.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioSummaryRow {
    pub hazard:                        String,
    pub category:                      String,
    pub origins_total:                 u64,
    pub origins_reached:               u64,
    pub origins_routed:                u64,
    pub origins_no_access:             u64,
    pub origins_disrupted_destination: u64,
    pub origins_skipped:               u64,
    pub people_no_access:              u64,
    pub people_no_delay:               u64,
    pub people_delayed:                u64,
    pub routes_delayed:                u64,
    pub extra_weighing:                f64,
    pub extra_distance_km:             f64,
}

/// An origin record with its access flag per scenario.
#[derive(Debug, Clone, PartialEq)]
pub struct OriginRow {
    pub id:         u32,
    pub label:      String,
    pub node:       u64,
    pub population: f64,
    pub access:     Vec<Access>,
}

/// A destination record with its baseline total and load per column.
#[derive(Debug, Clone, PartialEq)]
pub struct DestinationRow {
    pub id:         u32,
    pub label:      String,
    pub node:       u64,
    pub category:   String,
    /// Load of baseline routes ending here, over every category.
    pub origin_cnt: f64,
    pub loads:      Vec<f64>,
}

/// A road with its load per column.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeLoadRow {
    pub road:  u32,
    pub from:  u64,
    pub to:    u64,
    pub loads: Vec<f64>,
}
