//! `od-core`: foundational types for the closest-destination access
//! analysis.
//!
//! This crate is a dependency of every other `od-*` crate and has no `od-*`
//! dependencies of its own.
//!
//! # What lives here
//!
//! | Module          | Contents                                                   |
//! |-----------------|------------------------------------------------------------|
//! | [`ids`]         | `NodeId`, `EdgeId`, `RoadId`, `CategoryId`, `HazardId`, `OriginId`, `DestinationId` |
//! | [`geo`]         | `GeoPoint`, conversions to `geo-types`                     |
//! | [`weighing`]    | `Weighing` (distance / time)                               |
//! | [`config`]      | `AnalysisConfig` (TOML / JSON)                             |
//! | [`error`]       | `CoreError`, `CoreResult`                                  |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod weighing;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::AnalysisConfig;
pub use error::{CoreError, CoreResult};
pub use geo::GeoPoint;
pub use ids::{CategoryId, DestinationId, EdgeId, HazardId, NodeId, OriginId, RoadId};
pub use weighing::Weighing;

/// Scenario name under which the undisrupted baseline run is recorded.
pub const BASELINE_SCENARIO: &str = "noHaz";
