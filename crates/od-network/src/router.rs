//! Routing trait and default Dijkstra implementation.
//!
//! # Pluggability
//!
//! The analysis calls routing via the [`Router`] trait, so applications can
//! swap in other shortest-path engines without touching the solver.  The
//! default [`DijkstraRouter`] runs on any [`GraphView`].
//!
//! # Determinism
//!
//! The heap is keyed on `(cost, NodeId)` and relaxation is strict, so among
//! equal-cost alternatives the arc met first in the view's arc order wins.
//! For parallel roads that is insertion order.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ordered_float::OrderedFloat;

use od_core::{EdgeId, NodeId};

use crate::view::{Arc, GraphView};
use crate::{NetworkError, NetworkResult};

// ── Path ──────────────────────────────────────────────────────────────────────

/// The result of a routing query.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    /// Visited nodes, source first.  Length = `arcs.len() + 1`.
    pub nodes: Vec<NodeId>,
    /// Arcs traversed in order; `None` marks a virtual arc.
    pub arcs:  Vec<Option<EdgeId>>,
    /// Total cost.
    pub cost:  f64,
}

impl Path {
    pub fn source(&self) -> NodeId {
        self.nodes[0]
    }

    pub fn target(&self) -> NodeId {
        self.nodes[self.nodes.len() - 1]
    }

    /// The node visited just before the target, if any.
    pub fn penultimate(&self) -> Option<NodeId> {
        self.nodes.len().checked_sub(2).map(|i| self.nodes[i])
    }

    /// Real network arcs, skipping virtual ones.
    pub fn edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.arcs.iter().filter_map(|a| *a)
    }

    /// `true` if the source and target are the same node.
    pub fn is_trivial(&self) -> bool {
        self.arcs.is_empty()
    }

    /// Drop the final hop (typically the virtual arc into a sink).
    pub fn truncate_last(mut self) -> Path {
        if self.arcs.pop().is_some() {
            self.nodes.pop();
        }
        self
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable shortest-path engine.
pub trait Router {
    /// Compute the least-cost path from `from` to `to`.
    ///
    /// `from == to` yields a trivial path; a disconnected pair yields
    /// [`NetworkError::NoRoute`].
    fn route<G: GraphView>(&self, graph: &G, from: NodeId, to: NodeId) -> NetworkResult<Path>;
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// Standard Dijkstra with a binary heap.  Costs must be non-negative.
#[derive(Clone, Copy, Debug, Default)]
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn route<G: GraphView>(&self, graph: &G, from: NodeId, to: NodeId) -> NetworkResult<Path> {
        dijkstra(graph, from, to)
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

/// How a settled node was reached.
#[derive(Copy, Clone)]
struct Step {
    prev: NodeId,
    edge: Option<EdgeId>,
}

fn dijkstra<G: GraphView>(graph: &G, from: NodeId, to: NodeId) -> NetworkResult<Path> {
    let n = graph.node_count();
    if from.index() >= n {
        return Err(NetworkError::NodeNotFound(from));
    }
    if to.index() >= n {
        return Err(NetworkError::NodeNotFound(to));
    }
    if from == to {
        return Ok(Path { nodes: vec![from], arcs: vec![], cost: 0.0 });
    }

    let mut dist: Vec<f64> = vec![f64::INFINITY; n];
    let mut prev: Vec<Option<Step>> = vec![None; n];
    dist[from.index()] = 0.0;

    // Min-heap: Reverse makes BinaryHeap (max) behave as min-heap.
    // Secondary key NodeId ensures deterministic tie-breaking.
    let mut heap: BinaryHeap<Reverse<(OrderedFloat<f64>, NodeId)>> = BinaryHeap::new();
    heap.push(Reverse((OrderedFloat(0.0), from)));

    while let Some(Reverse((OrderedFloat(cost), node))) = heap.pop() {
        if node == to {
            return Ok(reconstruct(&prev, from, to, cost));
        }

        // Skip stale heap entries.
        if cost > dist[node.index()] {
            continue;
        }

        for Arc { to: neighbor, cost: arc_cost, edge } in graph.arcs(node) {
            let new_cost = cost + arc_cost;
            if new_cost < dist[neighbor.index()] {
                dist[neighbor.index()] = new_cost;
                prev[neighbor.index()] = Some(Step { prev: node, edge });
                heap.push(Reverse((OrderedFloat(new_cost), neighbor)));
            }
        }
    }

    Err(NetworkError::NoRoute { from, to })
}

fn reconstruct(prev: &[Option<Step>], from: NodeId, to: NodeId, cost: f64) -> Path {
    let mut nodes = vec![to];
    let mut arcs = Vec::new();
    let mut cur = to;
    while cur != from {
        let Some(step) = prev[cur.index()] else { break };
        arcs.push(step.edge);
        nodes.push(step.prev);
        cur = step.prev;
    }
    nodes.reverse();
    arcs.reverse();
    Path { nodes, arcs, cost }
}
