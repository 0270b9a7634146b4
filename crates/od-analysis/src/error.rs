use od_core::{CategoryId, CoreError, NodeId, OriginId};
use od_network::NetworkError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("analysis configuration error: {0}")]
    Config(String),

    #[error("hazard scenario {0:?} is not a column of the network")]
    UnknownHazard(String),

    /// Scenario-scoped: the affected origin is skipped and the scenario
    /// continues.
    #[error(
        "destination node {node} has no value for hazard {hazard:?}; \
         check that the hazard overlay covered all destinations"
    )]
    MissingHazardValue { hazard: String, node: NodeId },

    #[error("no baseline route for {origin} (category {category:?}); the undisrupted network must reach every origin")]
    MissingPreferredRoute { origin: OriginId, category: Option<CategoryId> },

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
