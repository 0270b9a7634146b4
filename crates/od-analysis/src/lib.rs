//! `od-analysis`: closest-destination access under hazard disruption.
//!
//! # Run structure
//!
//! ```text
//! baseline (noHaz):  all roads active, no destination hazard check
//!                    → preferred route per (origin, category)
//! for hazard in sorted(hazard_names):
//!   ① Prune       roads with hazard > threshold switched off (bridges kept)
//!   ② Solve       per category: virtual sink, closest destination per origin
//!   ③ Accumulate  road loads, destination loads, origin access flags
//!   ④ Compare     same destination as baseline → no delay, else detour
//! ```
//!
//! # Crate layout
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`analysis`]    | `Analysis` (baseline run, scenario loop)                  |
//! | [`builder`]     | `AnalysisBuilder`                                         |
//! | [`solver`]      | `ClosestDestinationSolver`, `HazardCheck`, `SolveOutcome` |
//! | [`accumulator`] | `Accumulator`, `LoadColumn`                               |
//! | [`baseline`]    | `PreferredRoutes`, `PreferredRoute`                       |
//! | [`comparator`]  | `DelayStats`, `Delay`                                     |
//! | [`route`]       | `Route`, `ScenarioResult`, `Access`, `ScenarioPhase`      |
//! | [`observer`]    | `AnalysisObserver`, `NoopObserver`                        |
//! | [`error`]       | `AnalysisError`, `AnalysisResult<T>`                      |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use od_analysis::{AnalysisBuilder, NoopObserver};
//! use od_network::DijkstraRouter;
//!
//! let mut analysis = AnalysisBuilder::new(config, network, table, DijkstraRouter).build()?;
//! analysis.run(&mut NoopObserver)?;
//! for r in &analysis.results {
//!     println!("{}: {} people without access", r.scenario, r.people_no_access);
//! }
//! ```

pub mod accumulator;
pub mod analysis;
pub mod baseline;
pub mod builder;
pub mod comparator;
pub mod error;
pub mod observer;
pub mod route;
pub mod solver;


pub use accumulator::{Accumulator, LoadColumn};
pub use analysis::Analysis;
pub use baseline::{PreferredRoute, PreferredRoutes};
pub use builder::AnalysisBuilder;
pub use comparator::{Delay, DelayStats};
pub use error::{AnalysisError, AnalysisResult};
pub use observer::{AnalysisObserver, NoopObserver};
pub use route::{Access, DisruptedDestination, Route, ScenarioPhase, ScenarioResult};
pub use solver::{ClosestDestinationSolver, HazardCheck, SolveOutcome};
