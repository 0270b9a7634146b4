//! Bidirectional id ↔ node index over the OD records.
//!
//! Built once when an [`OdTable`](crate::OdTable) is constructed; every
//! lookup after that is a hash probe.

use rustc_hash::FxHashMap;

use od_core::{DestinationId, NodeId, OriginId};

use crate::record::{DestinationRecord, OriginRecord};

#[derive(Clone, Debug, Default)]
pub struct OdIndex {
    origin_row:        FxHashMap<OriginId, usize>,
    destination_row:   FxHashMap<DestinationId, usize>,
    node_origins:      FxHashMap<NodeId, Vec<usize>>,
    node_destinations: FxHashMap<NodeId, Vec<usize>>,
}

impl OdIndex {
    pub fn build(origins: &[OriginRecord], destinations: &[DestinationRecord]) -> Self {
        let mut index = Self::default();
        for (row, o) in origins.iter().enumerate() {
            index.origin_row.insert(o.id, row);
            index.node_origins.entry(o.node).or_default().push(row);
        }
        for (row, d) in destinations.iter().enumerate() {
            index.destination_row.insert(d.id, row);
            index.node_destinations.entry(d.node).or_default().push(row);
        }
        index
    }

    pub fn origin_row(&self, id: OriginId) -> Option<usize> {
        self.origin_row.get(&id).copied()
    }

    pub fn destination_row(&self, id: DestinationId) -> Option<usize> {
        self.destination_row.get(&id).copied()
    }

    /// Rows of the origins hosted on `node`, in table order.
    pub fn origins_at(&self, node: NodeId) -> &[usize] {
        self.node_origins.get(&node).map_or(&[], Vec::as_slice)
    }

    /// Rows of the destinations hosted on `node`, in table order.
    pub fn destinations_at(&self, node: NodeId) -> &[usize] {
        self.node_destinations.get(&node).map_or(&[], Vec::as_slice)
    }
}
