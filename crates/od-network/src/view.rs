//! Read-only graph views used by the router.
//!
//! The base [`RoadNetwork`] is immutable.  Hazard disruption and the
//! closest-destination reduction are both expressed as views layered over
//! it:
//!
//! ```text
//! SinkView            + one virtual node, zero-cost arcs from destinations
//!   └─ WeightedView   road costs for the configured weighing, inactive roads hidden
//!        └─ RoadNetwork
//! ```
//!
//! A view borrows what it wraps, so dropping it is all the teardown there
//! is: the base graph's node and arc counts never change.

use od_core::{EdgeId, HazardId, NodeId, RoadId};

use crate::network::RoadNetwork;

// ── GraphView ─────────────────────────────────────────────────────────────────

/// One outgoing arc as seen through a view.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Arc {
    pub to:   NodeId,
    pub cost: f64,
    /// The underlying network arc, or `None` for a virtual arc.
    pub edge: Option<EdgeId>,
}

/// Anything Dijkstra can run on.
pub trait GraphView {
    /// Number of addressable nodes, including virtual ones.
    fn node_count(&self) -> usize;

    /// Outgoing arcs of `node`, in a fixed order.
    fn arcs(&self, node: NodeId) -> impl Iterator<Item = Arc> + '_;
}

// ── ActiveRoads ───────────────────────────────────────────────────────────────

/// Per-road on/off mask describing one disruption scenario.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActiveRoads {
    active:  Vec<bool>,
    removed: usize,
}

impl ActiveRoads {
    /// Every road usable.
    pub fn all(network: &RoadNetwork) -> Self {
        Self { active: vec![true; network.road_count()], removed: 0 }
    }

    /// Mask for one hazard scenario: a road is removed when its hazard value
    /// is present, exceeds `threshold`, and the road is not a bridge.
    pub fn for_hazard(network: &RoadNetwork, hazard: HazardId, threshold: f64) -> Self {
        let active: Vec<bool> = (0..network.road_count())
            .map(|i| {
                let road = RoadId(i as u32);
                match network.road_hazard(hazard, road) {
                    Some(v) if v > threshold => network.road_bridge[i],
                    _ => true,
                }
            })
            .collect();
        let removed = active.iter().filter(|a| !**a).count();
        Self { active, removed }
    }

    #[inline]
    pub fn is_active(&self, road: RoadId) -> bool {
        self.active[road.index()]
    }

    /// Number of roads switched off.
    pub fn removed_count(&self) -> usize {
        self.removed
    }
}

// ── WeightedView ──────────────────────────────────────────────────────────────

/// The network with per-road costs, restricted to the active roads.
pub struct WeightedView<'a> {
    network: &'a RoadNetwork,
    weights: &'a [f64],
    active:  &'a ActiveRoads,
}

impl<'a> WeightedView<'a> {
    /// `weights` is indexed by `RoadId` (see [`RoadNetwork::road_weights`]).
    pub fn new(network: &'a RoadNetwork, weights: &'a [f64], active: &'a ActiveRoads) -> Self {
        debug_assert_eq!(weights.len(), network.road_count());
        Self { network, weights, active }
    }
}

impl GraphView for WeightedView<'_> {
    fn node_count(&self) -> usize {
        self.network.node_count()
    }

    fn arcs(&self, node: NodeId) -> impl Iterator<Item = Arc> + '_ {
        self.network.out_edges(node).filter_map(move |edge| {
            let road = self.network.edge_road[edge.index()];
            self.active.is_active(road).then(|| Arc {
                to:   self.network.edge_to[edge.index()],
                cost: self.weights[road.index()],
                edge: Some(edge),
            })
        })
    }
}

// ── SinkView ──────────────────────────────────────────────────────────────────

/// Reduces "nearest of many targets" to a single-target query.
///
/// Adds one virtual node (the sink, `NodeId(inner.node_count())`) and a
/// zero-cost arc from every attached node to it.  On a shortest path to the
/// sink, the node preceding the sink is the closest attached node.
pub struct SinkView<'a, G: GraphView> {
    inner: &'a G,
    links: Vec<bool>,
    sink:  NodeId,
    attached: usize,
}

impl<'a, G: GraphView> SinkView<'a, G> {
    /// Attach a sink to `inner`, linked from every node in `sources`.
    /// Out-of-range nodes are ignored.
    pub fn attach(inner: &'a G, sources: impl IntoIterator<Item = NodeId>) -> Self {
        let n = inner.node_count();
        let mut links = vec![false; n];
        let mut attached = 0;
        for node in sources {
            if node.index() < n && !links[node.index()] {
                links[node.index()] = true;
                attached += 1;
            }
        }
        Self { inner, links, sink: NodeId(n as u32), attached }
    }

    /// The virtual sink node.
    pub fn sink(&self) -> NodeId {
        self.sink
    }

    /// Number of distinct nodes linked to the sink.
    pub fn attached_count(&self) -> usize {
        self.attached
    }

    pub fn is_linked(&self, node: NodeId) -> bool {
        self.links.get(node.index()).copied().unwrap_or(false)
    }

    /// Drop the sink and hand back the wrapped view.
    pub fn detach(self) -> &'a G {
        self.inner
    }
}

impl<G: GraphView> GraphView for SinkView<'_, G> {
    fn node_count(&self) -> usize {
        self.inner.node_count() + 1
    }

    fn arcs(&self, node: NodeId) -> impl Iterator<Item = Arc> + '_ {
        let real = (node != self.sink).then(|| self.inner.arcs(node));
        let link = self.is_linked(node).then_some(Arc { to: self.sink, cost: 0.0, edge: None });
        real.into_iter().flatten().chain(link)
    }
}
