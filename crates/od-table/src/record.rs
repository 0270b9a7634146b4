//! Origin and destination records.

use rustc_hash::FxHashSet;

use od_core::{CategoryId, DestinationId, NodeId, OriginId};

use crate::index::OdIndex;
use crate::label::OdLabels;

// ── Records ───────────────────────────────────────────────────────────────────

/// One origin: a population that travels to its closest destination.
#[derive(Clone, Debug, PartialEq)]
pub struct OriginRecord {
    pub id:           OriginId,
    /// Network node the origin is attached to.
    pub node:         NodeId,
    /// Population count.
    pub population:   f64,
    /// Share of the population that travels.
    pub out_fraction: f64,
}

impl OriginRecord {
    /// Load this origin puts on a route: population × out-fraction.
    #[inline]
    pub fn load(&self) -> f64 {
        self.population * self.out_fraction
    }
}

/// One destination, optionally belonging to a category.
#[derive(Clone, Debug, PartialEq)]
pub struct DestinationRecord {
    pub id:       DestinationId,
    pub node:     NodeId,
    pub category: Option<CategoryId>,
}

// ── OdTable ───────────────────────────────────────────────────────────────────

/// All origins and destinations of one analysis, in table order.
///
/// Records are fixed after construction; per-scenario state (access flags,
/// destination loads) lives in the analysis accumulator, indexed by row.
#[derive(Clone, Debug)]
pub struct OdTable {
    labels:       OdLabels,
    origins:      Vec<OriginRecord>,
    destinations: Vec<DestinationRecord>,
    /// Category names, indexed by `CategoryId` (first-seen order).
    categories:   Vec<String>,
    index:        OdIndex,
}

impl OdTable {
    pub fn new(
        labels: OdLabels,
        categories: Vec<String>,
        origins: Vec<OriginRecord>,
        destinations: Vec<DestinationRecord>,
    ) -> Self {
        let index = OdIndex::build(&origins, &destinations);
        Self { labels, origins, destinations, categories, index }
    }

    pub fn labels(&self) -> &OdLabels {
        &self.labels
    }

    pub fn origins(&self) -> &[OriginRecord] {
        &self.origins
    }

    pub fn destinations(&self) -> &[DestinationRecord] {
        &self.destinations
    }

    pub fn index(&self) -> &OdIndex {
        &self.index
    }

    pub fn origin(&self, id: OriginId) -> Option<&OriginRecord> {
        self.index.origin_row(id).map(|row| &self.origins[row])
    }

    pub fn destination(&self, id: DestinationId) -> Option<&DestinationRecord> {
        self.index.destination_row(id).map(|row| &self.destinations[row])
    }

    // ── Categories ────────────────────────────────────────────────────────

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn is_categorised(&self) -> bool {
        !self.categories.is_empty()
    }

    pub fn category_id(&self, name: &str) -> Option<CategoryId> {
        self.categories
            .iter()
            .position(|c| c == name)
            .map(|i| CategoryId(i as u16))
    }

    pub fn category_name(&self, category: CategoryId) -> &str {
        &self.categories[category.index()]
    }

    /// The categories a solve iterates over: each declared category, or a
    /// single `None` scope when destinations are not partitioned.
    pub fn category_scopes(&self) -> Vec<Option<CategoryId>> {
        if self.categories.is_empty() {
            vec![None]
        } else {
            (0..self.categories.len()).map(|i| Some(CategoryId(i as u16))).collect()
        }
    }

    // ── Destination queries ───────────────────────────────────────────────

    /// `true` when `d` belongs to `scope` (`None` matches every destination).
    #[inline]
    pub fn in_scope(d: &DestinationRecord, scope: Option<CategoryId>) -> bool {
        scope.is_none() || d.category == scope
    }

    /// Nodes hosting at least one destination in `scope`, deduplicated, in
    /// table order.
    pub fn destination_nodes(&self, scope: Option<CategoryId>) -> Vec<NodeId> {
        let mut seen = FxHashSet::default();
        self.destinations
            .iter()
            .filter(|d| Self::in_scope(d, scope))
            .filter(|d| seen.insert(d.node))
            .map(|d| d.node)
            .collect()
    }

    /// Rows of the destinations in `scope` hosted on `node`.
    pub fn destination_rows_at(&self, node: NodeId, scope: Option<CategoryId>) -> Vec<usize> {
        self.index
            .destinations_at(node)
            .iter()
            .copied()
            .filter(|&row| Self::in_scope(&self.destinations[row], scope))
            .collect()
    }

    /// Comma-joined labels of the destinations in `scope` hosted on `node`.
    pub fn destination_label_at(&self, node: NodeId, scope: Option<CategoryId>) -> String {
        self.destination_rows_at(node, scope)
            .into_iter()
            .map(|row| self.labels.destination_label(self.destinations[row].id))
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn origin_label(&self, row: usize) -> String {
        self.labels.origin_label(self.origins[row].id)
    }
}
