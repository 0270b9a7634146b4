//! `od-output`: output tables of a closest-destination analysis.
//!
//! Two backends are provided, the second behind a Cargo feature:
//!
//! | Feature   | Backend     | Files created                                                    |
//! |-----------|-------------|------------------------------------------------------------------|
//! | *(none)*  | CSV         | `routes.csv`, `scenario_summaries.csv`, `origins.csv`, `destinations.csv`, `edge_loads.csv` |
//! | `sqlite`  | SQLite      | `output.db`                                                      |
//!
//! Both implement [`OutputWriter`]; [`export`] flattens a finished
//! `od_analysis::Analysis` into rows and feeds them to any writer.
//!
//! # Usage
//!
//! ```rust,ignore
//! use od_output::{export, CsvWriter};
//!
//! analysis.run(&mut NoopObserver)?;
//! let mut writer = CsvWriter::new(Path::new("./output"))?;
//! export(&analysis, &mut writer)?;
//! ```

pub mod csv;
pub mod error;
pub mod export;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use export::{destination_rows, edge_load_rows, export, origin_rows, route_rows, summary_rows};
pub use row::{DestinationRow, EdgeLoadRow, OriginRow, RouteRow, ScenarioSummaryRow};
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;
