//! `od-network`: road multigraph, disruption views, and routing.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                       |
//! |-------------|----------------------------------------------------------------|
//! | [`network`] | `RoadNetwork` (CSR multigraph), `RoadNetworkBuilder`, `OdTags` |
//! | [`view`]    | `GraphView`, `ActiveRoads`, `WeightedView`, `SinkView`         |
//! | [`router`]  | `Router` trait, `Path`, `DijkstraRouter`                       |
//! | [`error`]   | `NetworkError`, `NetworkResult<T>`                             |

pub mod error;
pub mod network;
pub mod router;
pub mod view;

#[cfg(test)]
mod tests;

pub use error::{NetworkError, NetworkResult};
pub use network::{NodeAttrs, OdTags, RoadAttrs, RoadNetwork, RoadNetworkBuilder};
pub use router::{DijkstraRouter, Path, Router};
pub use view::{ActiveRoads, Arc, GraphView, SinkView, WeightedView};
