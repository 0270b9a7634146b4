//! Road network representation and builder.
//!
//! # Data layout
//!
//! The graph is a multigraph of **roads**.  Each road owns one directed arc
//! (one-way) or two (two-way), stored in **Compressed Sparse Row (CSR)**
//! format.  Given a `NodeId n`, its outgoing arcs occupy the slice:
//!
//! ```text
//! edge_to[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! Arc arrays (`edge_from`, `edge_to`, `edge_road`, `edge_forward`) are
//! indexed by `EdgeId`; road attributes (length, time, geometry, bridge
//! flag, hazard values) are indexed by `RoadId` so both directions of a
//! two-way road share them.
//!
//! Parallel roads between the same node pair are kept.  Arcs are sorted by
//! source node with a **stable** sort, so parallel arcs keep their insertion
//! order; the router relies on that to break exact cost ties
//! deterministically.
//!
//! # Hazard columns
//!
//! Hazard values are produced upstream (one column per hazard scenario) and
//! stored column-major: `road_hazard[h][road]`, `node_hazard[h][node]`.
//! `None` means the attribute is absent for that element.

use geo_types::LineString;

use od_core::{DestinationId, EdgeId, GeoPoint, HazardId, NodeId, OriginId, RoadId, Weighing};

use crate::{NetworkError, NetworkResult};

// ── Node and road attributes ──────────────────────────────────────────────────

/// Typed origin/destination membership of a node.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OdTags {
    pub origins:      Vec<OriginId>,
    pub destinations: Vec<DestinationId>,
}

impl OdTags {
    pub fn is_empty(&self) -> bool {
        self.origins.is_empty() && self.destinations.is_empty()
    }

    pub fn is_origin(&self) -> bool {
        !self.origins.is_empty()
    }

    pub fn is_destination(&self) -> bool {
        !self.destinations.is_empty()
    }
}

/// Attributes of a node passed to [`RoadNetworkBuilder::add_node`].
#[derive(Clone, Debug, Default)]
pub struct NodeAttrs {
    pub pos:    GeoPoint,
    pub od:     OdTags,
    /// Identifier of the node in the source data.  Defaults to the
    /// node's `NodeId` index when unset.
    pub key:    Option<u64>,
    /// Hazard value per scenario, indexed by `HazardId`.
    pub hazard: Vec<Option<f64>>,
}

impl NodeAttrs {
    pub fn at(pos: GeoPoint) -> Self {
        Self { pos, ..Self::default() }
    }

    pub fn key(mut self, key: u64) -> Self {
        self.key = Some(key);
        self
    }

    pub fn origin(mut self, id: OriginId) -> Self {
        self.od.origins.push(id);
        self
    }

    pub fn destination(mut self, id: DestinationId) -> Self {
        self.od.destinations.push(id);
        self
    }

    pub fn hazard(mut self, hazard: HazardId, value: f64) -> Self {
        set_hazard(&mut self.hazard, hazard, value);
        self
    }
}

/// Attributes of a road passed to [`RoadNetworkBuilder::add_road`].
#[derive(Clone, Debug, Default)]
pub struct RoadAttrs {
    /// Physical length in metres.
    pub length_m: Option<f64>,
    /// Travel time in seconds.
    pub time_s:   Option<f64>,
    /// Digitised from the road's `from` node to its `to` node.
    pub geometry: Option<LineString<f64>>,
    /// Bridges are never removed by hazard pruning.
    pub bridge:   bool,
    /// Hazard value per scenario, indexed by `HazardId`.
    pub hazard:   Vec<Option<f64>>,
}

impl RoadAttrs {
    pub fn length(mut self, metres: f64) -> Self {
        self.length_m = Some(metres);
        self
    }

    pub fn time(mut self, secs: f64) -> Self {
        self.time_s = Some(secs);
        self
    }

    pub fn geometry(mut self, line: LineString<f64>) -> Self {
        self.geometry = Some(line);
        self
    }

    pub fn bridge(mut self) -> Self {
        self.bridge = true;
        self
    }

    pub fn hazard(mut self, hazard: HazardId, value: f64) -> Self {
        set_hazard(&mut self.hazard, hazard, value);
        self
    }
}

fn set_hazard(values: &mut Vec<Option<f64>>, hazard: HazardId, value: f64) {
    if values.len() <= hazard.index() {
        values.resize(hazard.index() + 1, None);
    }
    values[hazard.index()] = Some(value);
}

// ── RoadNetwork ───────────────────────────────────────────────────────────────

/// Road multigraph in CSR format.
///
/// All fields are `pub` for direct indexed access on hot paths.  Do not
/// construct directly; use [`RoadNetworkBuilder`].  The network is never
/// mutated after `build()`: disruption is expressed through views.
pub struct RoadNetwork {
    // ── Node data ─────────────────────────────────────────────────────────
    /// Geographic position of each node.  Indexed by `NodeId`.
    pub node_pos: Vec<GeoPoint>,

    /// Origin/destination membership of each node.
    pub node_od: Vec<OdTags>,

    /// Source-data identifier of each node, used in exported tables.
    pub node_key: Vec<u64>,

    // ── CSR arc adjacency ─────────────────────────────────────────────────
    /// CSR row pointer.  Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    // ── Arc data (indexed by EdgeId) ──────────────────────────────────────
    pub edge_from: Vec<NodeId>,
    pub edge_to:   Vec<NodeId>,
    /// Road each arc belongs to.
    pub edge_road: Vec<RoadId>,
    /// `false` when the arc runs against the road's digitised direction.
    pub edge_forward: Vec<bool>,

    // ── Road data (indexed by RoadId) ─────────────────────────────────────
    pub road_from:     Vec<NodeId>,
    pub road_to:       Vec<NodeId>,
    pub road_length_m: Vec<Option<f64>>,
    pub road_time_s:   Vec<Option<f64>>,
    pub road_geometry: Vec<Option<LineString<f64>>>,
    pub road_bridge:   Vec<bool>,

    // ── Hazard columns ────────────────────────────────────────────────────
    /// Hazard scenario names, indexed by `HazardId`.
    pub hazard_names: Vec<String>,
    /// `road_hazard[h][r]`
    pub road_hazard:  Vec<Vec<Option<f64>>>,
    /// `node_hazard[h][n]`
    pub node_hazard:  Vec<Vec<Option<f64>>>,
}

impl RoadNetwork {
    /// Construct an empty network with no nodes or roads.
    pub fn empty() -> Self {
        RoadNetworkBuilder::new().build()
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn road_count(&self) -> usize {
        self.road_from.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        node.index() < self.node_count()
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over the `EdgeId`s of all outgoing arcs from `node`.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| EdgeId(i as u32))
    }

    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    // ── Attribute access ──────────────────────────────────────────────────

    pub fn hazard_id(&self, name: &str) -> Option<HazardId> {
        self.hazard_names
            .iter()
            .position(|h| h == name)
            .map(|i| HazardId(i as u16))
    }

    #[inline]
    pub fn road_hazard(&self, hazard: HazardId, road: RoadId) -> Option<f64> {
        self.road_hazard[hazard.index()][road.index()]
    }

    #[inline]
    pub fn node_hazard(&self, hazard: HazardId, node: NodeId) -> Option<f64> {
        self.node_hazard[hazard.index()][node.index()]
    }

    #[inline]
    pub fn node_key(&self, node: NodeId) -> u64 {
        self.node_key[node.index()]
    }

    /// Cost of every road under `weighing`, indexed by `RoadId`.
    ///
    /// Fails if any road lacks the attribute or carries a negative / NaN
    /// value, since Dijkstra cannot work with either.
    pub fn road_weights(&self, weighing: Weighing) -> NetworkResult<Vec<f64>> {
        let column = match weighing {
            Weighing::Distance => &self.road_length_m,
            Weighing::Time     => &self.road_time_s,
        };
        column
            .iter()
            .enumerate()
            .map(|(i, value)| {
                let road = RoadId(i as u32);
                match *value {
                    None => Err(NetworkError::MissingWeighing { road, weighing }),
                    Some(v) if v.is_nan() || v < 0.0 => {
                        Err(NetworkError::InvalidWeighing { road, weighing, value: v })
                    }
                    Some(v) => Ok(v),
                }
            })
            .collect()
    }

    /// Geometry of an arc in travel direction.
    ///
    /// Uses the road geometry when present (reversed for backward arcs),
    /// otherwise a straight segment between the endpoint nodes.
    pub fn arc_geometry(&self, edge: EdgeId) -> LineString<f64> {
        let road = self.edge_road[edge.index()];
        match &self.road_geometry[road.index()] {
            Some(line) if self.edge_forward[edge.index()] => line.clone(),
            Some(line) => LineString::new(line.0.iter().rev().copied().collect()),
            None => {
                let from = self.node_pos[self.edge_from[edge.index()].index()];
                let to   = self.node_pos[self.edge_to[edge.index()].index()];
                from.segment_to(to)
            }
        }
    }
}

// ── RoadNetworkBuilder ────────────────────────────────────────────────────────

/// Construct a [`RoadNetwork`] incrementally, then call [`build`](Self::build).
///
/// Declare hazard scenarios with [`add_hazard`](Self::add_hazard) before
/// attaching hazard values to nodes and roads.
///
/// # Example
///
/// ```
/// use od_core::GeoPoint;
/// use od_network::{NodeAttrs, RoadAttrs, RoadNetworkBuilder};
///
/// let mut b = RoadNetworkBuilder::new();
/// let a = b.add_node(NodeAttrs::at(GeoPoint::new(4.35, 52.00)));
/// let c = b.add_node(NodeAttrs::at(GeoPoint::new(4.36, 52.01)));
/// b.add_road(a, c, RoadAttrs::default().length(1_200.0));
/// let net = b.build();
/// assert_eq!(net.node_count(), 2);
/// assert_eq!(net.road_count(), 1);
/// assert_eq!(net.edge_count(), 2); // two arcs, one road
/// ```
pub struct RoadNetworkBuilder {
    nodes:   Vec<NodeAttrs>,
    roads:   Vec<RawRoad>,
    hazards: Vec<String>,
}

struct RawRoad {
    from:     NodeId,
    to:       NodeId,
    two_way:  bool,
    attrs:    RoadAttrs,
}

impl RoadNetworkBuilder {
    pub fn new() -> Self {
        Self { nodes: Vec::new(), roads: Vec::new(), hazards: Vec::new() }
    }

    /// Pre-allocate for the expected number of nodes and roads.
    pub fn with_capacity(nodes: usize, roads: usize) -> Self {
        Self {
            nodes:   Vec::with_capacity(nodes),
            roads:   Vec::with_capacity(roads),
            hazards: Vec::new(),
        }
    }

    /// Declare a hazard scenario column and return its id.  Declaring the
    /// same name twice returns the existing id.
    pub fn add_hazard(&mut self, name: &str) -> HazardId {
        if let Some(i) = self.hazards.iter().position(|h| h == name) {
            return HazardId(i as u16);
        }
        self.hazards.push(name.to_owned());
        HazardId((self.hazards.len() - 1) as u16)
    }

    /// Add a node and return its `NodeId` (sequential from 0).
    pub fn add_node(&mut self, attrs: NodeAttrs) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(attrs);
        id
    }

    /// Add a **two-way** road between `a` and `b`.
    pub fn add_road(&mut self, a: NodeId, b: NodeId, attrs: RoadAttrs) -> RoadId {
        self.push_road(a, b, true, attrs)
    }

    /// Add a **one-way** road from `from` to `to`.
    pub fn add_directed_road(&mut self, from: NodeId, to: NodeId, attrs: RoadAttrs) -> RoadId {
        self.push_road(from, to, false, attrs)
    }

    fn push_road(&mut self, from: NodeId, to: NodeId, two_way: bool, attrs: RoadAttrs) -> RoadId {
        debug_assert!(from.index() < self.nodes.len(), "{from} added before its node");
        debug_assert!(to.index() < self.nodes.len(), "{to} added before its node");
        let id = RoadId(self.roads.len() as u32);
        self.roads.push(RawRoad { from, to, two_way, attrs });
        id
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn road_count(&self) -> usize { self.roads.len() }

    /// Consume the builder and produce a [`RoadNetwork`].
    ///
    /// Time complexity: O(E log E) for the arc sort.
    pub fn build(self) -> RoadNetwork {
        let node_count = self.nodes.len();
        let road_count = self.roads.len();
        let hazard_count = self.hazards.len();

        // One or two arcs per road: (from, to, road, forward).
        let mut arcs: Vec<(NodeId, NodeId, RoadId, bool)> = Vec::with_capacity(road_count * 2);
        for (i, r) in self.roads.iter().enumerate() {
            let road = RoadId(i as u32);
            arcs.push((r.from, r.to, road, true));
            if r.two_way {
                arcs.push((r.to, r.from, road, false));
            }
        }
        // Stable: parallel arcs keep insertion order.
        arcs.sort_by_key(|a| a.0.index());

        let mut node_out_start = vec![0u32; node_count + 1];
        for a in &arcs {
            node_out_start[a.0.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, arcs.len());

        let mut road_hazard = vec![vec![None; road_count]; hazard_count];
        let mut road_from     = Vec::with_capacity(road_count);
        let mut road_to       = Vec::with_capacity(road_count);
        let mut road_length_m = Vec::with_capacity(road_count);
        let mut road_time_s   = Vec::with_capacity(road_count);
        let mut road_geometry = Vec::with_capacity(road_count);
        let mut road_bridge   = Vec::with_capacity(road_count);
        for (i, r) in self.roads.into_iter().enumerate() {
            for (h, value) in r.attrs.hazard.iter().enumerate().take(hazard_count) {
                road_hazard[h][i] = *value;
            }
            road_from.push(r.from);
            road_to.push(r.to);
            road_length_m.push(r.attrs.length_m);
            road_time_s.push(r.attrs.time_s);
            road_geometry.push(r.attrs.geometry);
            road_bridge.push(r.attrs.bridge);
        }

        let mut node_hazard = vec![vec![None; node_count]; hazard_count];
        let mut node_pos = Vec::with_capacity(node_count);
        let mut node_od  = Vec::with_capacity(node_count);
        let mut node_key = Vec::with_capacity(node_count);
        for (i, n) in self.nodes.into_iter().enumerate() {
            for (h, value) in n.hazard.iter().enumerate().take(hazard_count) {
                node_hazard[h][i] = *value;
            }
            node_pos.push(n.pos);
            node_od.push(n.od);
            node_key.push(n.key.unwrap_or(i as u64));
        }

        RoadNetwork {
            node_pos,
            node_od,
            node_key,
            node_out_start,
            edge_from:    arcs.iter().map(|a| a.0).collect(),
            edge_to:      arcs.iter().map(|a| a.1).collect(),
            edge_road:    arcs.iter().map(|a| a.2).collect(),
            edge_forward: arcs.iter().map(|a| a.3).collect(),
            road_from,
            road_to,
            road_length_m,
            road_time_s,
            road_geometry,
            road_bridge,
            hazard_names: self.hazards,
            road_hazard,
            node_hazard,
        }
    }
}

impl Default for RoadNetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}
