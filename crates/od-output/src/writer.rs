//! The `OutputWriter` trait implemented by all backend writers.

use crate::row::{DestinationRow, EdgeLoadRow, OriginRow, RouteRow, ScenarioSummaryRow};
use crate::OutputResult;

/// Trait implemented by the CSV and SQLite writers.
///
/// Wide tables take their scenario column names next to the rows; every
/// row must carry exactly one value per name.  Each wide table is written
/// once per writer.
pub trait OutputWriter {
    /// Append a batch of routes.
    fn write_routes(&mut self, rows: &[RouteRow]) -> OutputResult<()>;

    /// Append a batch of scenario summaries.
    fn write_summaries(&mut self, rows: &[ScenarioSummaryRow]) -> OutputResult<()>;

    /// Write the origin table with one access column per name in `columns`.
    fn write_origins(&mut self, columns: &[String], rows: &[OriginRow]) -> OutputResult<()>;

    /// Write the destination table with one load column per name in `columns`.
    fn write_destinations(&mut self, columns: &[String], rows: &[DestinationRow]) -> OutputResult<()>;

    /// Write the per-road load table with one column per name in `columns`.
    fn write_edge_loads(&mut self, columns: &[String], rows: &[EdgeLoadRow]) -> OutputResult<()>;

    /// Flush and close all underlying handles.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}

/// Reject a wide row whose value count does not match its header.
pub(crate) fn check_shape(table: &'static str, expected: usize, got: usize) -> OutputResult<()> {
    if expected == got {
        Ok(())
    } else {
        Err(crate::OutputError::Shape { table, expected, got })
    }
}
