//! Load and access bookkeeping shared across scenarios.
//!
//! The base network is immutable; everything a scenario writes lands here
//! instead, as named columns:
//!
//! | Column              | Indexed by       | Example name   |
//! |---------------------|------------------|----------------|
//! | road load           | `RoadId`         | `EV1_ma_P`, `EV1_ma_PD2` |
//! | destination load    | destination row  | same as road load |
//! | origin access       | origin row       | `EV1_ma_A`, `EV1_ma_AD2` |
//!
//! One load column and one access column exist per (scenario, category).
//! Columns persist for the whole run; a failed scenario leaves its columns
//! partially filled.

use rustc_hash::FxHashSet;

use od_core::{CategoryId, NodeId, RoadId};
use od_table::OdTable;

use crate::route::Access;

/// Identity of a load column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadColumn {
    pub scenario: String,
    pub category: Option<CategoryId>,
    /// `{scenario}_P` or `{scenario}_P{D1…}`.
    pub name:     String,
}

/// Explicit per-run state threaded through every scenario.
#[derive(Clone, Debug)]
pub struct Accumulator {
    road_count:        usize,
    destination_count: usize,
    origin_count:      usize,

    columns:           Vec<LoadColumn>,
    /// `road_loads[column][road]`
    road_loads:        Vec<Vec<f64>>,
    /// `destination_loads[column][row]`
    destination_loads: Vec<Vec<f64>>,

    /// `(name, flags)`, flags indexed by origin row.
    access:            Vec<(String, Vec<Access>)>,
}

impl Accumulator {
    pub fn new(road_count: usize, table: &OdTable) -> Self {
        Self {
            road_count,
            destination_count: table.destinations().len(),
            origin_count:      table.origins().len(),
            columns:           Vec::new(),
            road_loads:        Vec::new(),
            destination_loads: Vec::new(),
            access:            Vec::new(),
        }
    }

    // ── Load columns ──────────────────────────────────────────────────────

    /// Index of the load column for `(scenario, category)`, creating it
    /// zero-filled if needed.
    pub fn column(&mut self, scenario: &str, category: Option<CategoryId>) -> usize {
        if let Some(i) = self.find_column(scenario, category) {
            return i;
        }
        let name = match category {
            Some(c) => format!("{scenario}_P{}", c.short_name()),
            None    => format!("{scenario}_P"),
        };
        self.columns.push(LoadColumn { scenario: scenario.to_owned(), category, name });
        self.road_loads.push(vec![0.0; self.road_count]);
        self.destination_loads.push(vec![0.0; self.destination_count]);
        self.columns.len() - 1
    }

    pub fn find_column(&self, scenario: &str, category: Option<CategoryId>) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.scenario == scenario && c.category == category)
    }

    /// Zero a load column on every road and destination.
    pub fn reset_edge_column(&mut self, column: usize) {
        self.road_loads[column].fill(0.0);
        self.destination_loads[column].fill(0.0);
    }

    #[inline]
    pub fn add_edge_load(&mut self, column: usize, road: RoadId, load: f64) {
        self.road_loads[column][road.index()] += load;
    }

    /// Add `load` to every destination of `scope` hosted on `node`.
    pub fn update_destinations(
        &mut self,
        column: usize,
        table: &OdTable,
        node: NodeId,
        scope: Option<CategoryId>,
        load: f64,
    ) {
        for row in table.destination_rows_at(node, scope) {
            self.destination_loads[column][row] += load;
        }
    }

    pub fn columns(&self) -> &[LoadColumn] {
        &self.columns
    }

    pub fn road_loads(&self, column: usize) -> &[f64] {
        &self.road_loads[column]
    }

    pub fn destination_loads(&self, column: usize) -> &[f64] {
        &self.destination_loads[column]
    }

    /// Per destination row, the sum of its loads over every column of
    /// `scenario`.
    pub fn destination_totals(&self, scenario: &str) -> Vec<f64> {
        let mut totals = vec![0.0; self.destination_count];
        for (i, _) in self.columns.iter().enumerate().filter(|(_, c)| c.scenario == scenario) {
            for (t, v) in totals.iter_mut().zip(&self.destination_loads[i]) {
                *t += v;
            }
        }
        totals
    }

    // ── Access columns ────────────────────────────────────────────────────

    /// Add (or reset) the access column of `(scenario, category)`, named
    /// `{scenario}_A` or `{scenario}_A{D1…}`, with every origin at
    /// [`Access::Access`].
    pub fn begin_access(&mut self, scenario: &str, category: Option<CategoryId>) -> usize {
        let name = match category {
            Some(c) => format!("{scenario}_A{}", c.short_name()),
            None    => format!("{scenario}_A"),
        };
        if let Some(i) = self.access.iter().position(|(n, _)| *n == name) {
            self.access[i].1.fill(Access::Access);
            return i;
        }
        self.access.push((name, vec![Access::Access; self.origin_count]));
        self.access.len() - 1
    }

    /// Flag every origin row in `no_access` as [`Access::NoAccess`].
    pub fn update_origins(&mut self, column: usize, no_access: &[usize]) {
        let flags = &mut self.access[column].1;
        for &row in no_access {
            flags[row] = Access::NoAccess;
        }
    }

    pub fn access_columns(&self) -> &[(String, Vec<Access>)] {
        &self.access
    }

    // ── Aggregates ────────────────────────────────────────────────────────

    /// People without access: Σ population × out-fraction over the distinct
    /// origin rows in `no_access`, rounded.
    pub fn nr_without_access(table: &OdTable, no_access: &[usize]) -> u64 {
        let mut seen = FxHashSet::default();
        let people: f64 = no_access
            .iter()
            .filter(|row| seen.insert(**row))
            .map(|&row| table.origins()[row].load())
            .sum();
        people.round() as u64
    }
}
