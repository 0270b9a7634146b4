//! Network error type.

use thiserror::Error;

use od_core::{NodeId, RoadId, Weighing};

/// Errors produced by `od-network`.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("no route from {from} to {to}")]
    NoRoute { from: NodeId, to: NodeId },

    #[error("node {0} not found in network")]
    NodeNotFound(NodeId),

    #[error("{road} has no {weighing} value")]
    MissingWeighing { road: RoadId, weighing: Weighing },

    #[error("{road} has invalid {weighing} value {value}")]
    InvalidWeighing { road: RoadId, weighing: Weighing, value: f64 },
}

pub type NetworkResult<T> = Result<T, NetworkError>;
