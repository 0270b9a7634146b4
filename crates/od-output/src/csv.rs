//! CSV output backend.
//!
//! Creates up to five files in the configured output directory:
//! - `routes.csv`, `scenario_summaries.csv` (opened with headers up front)
//! - `origins.csv`, `destinations.csv`, `edge_loads.csv` (written whole,
//!   since their columns depend on the scenarios run)

use std::fs::File;
use std::path::{Path, PathBuf};

use csv::Writer;

use crate::row::{DestinationRow, EdgeLoadRow, OriginRow, RouteRow, ScenarioSummaryRow};
use crate::writer::{check_shape, OutputWriter};
use crate::OutputResult;

pub const ROUTE_HEADER: [&str; 10] = [
    "hazard",
    "category",
    "o_node",
    "d_node",
    "origin",
    "destination",
    "weighing",
    "length_m",
    "load",
    "geometry",
];

pub const SUMMARY_HEADER: [&str; 14] = [
    "hazard",
    "category",
    "origins_total",
    "origins_reached",
    "origins_routed",
    "origins_no_access",
    "origins_disrupted_destination",
    "origins_skipped",
    "people_no_access",
    "people_no_delay",
    "people_delayed",
    "routes_delayed",
    "extra_weighing",
    "extra_distance_km",
];

/// Writes analysis output to CSV files.
pub struct CsvWriter {
    dir:       PathBuf,
    routes:    Writer<File>,
    summaries: Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Open (or create) the fixed-shape CSV files in `dir` and write their
    /// header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut routes = Writer::from_path(dir.join("routes.csv"))?;
        routes.write_record(ROUTE_HEADER)?;

        let mut summaries = Writer::from_path(dir.join("scenario_summaries.csv"))?;
        summaries.write_record(SUMMARY_HEADER)?;

        Ok(Self {
            dir: dir.to_path_buf(),
            routes,
            summaries,
            finished: false,
        })
    }

    fn wide(&self, file: &str, fixed: &[&str], columns: &[String]) -> OutputResult<Writer<File>> {
        let mut w = Writer::from_path(self.dir.join(file))?;
        w.write_record(fixed.iter().copied().chain(columns.iter().map(String::as_str)))?;
        Ok(w)
    }
}

impl OutputWriter for CsvWriter {
    fn write_routes(&mut self, rows: &[RouteRow]) -> OutputResult<()> {
        for row in rows {
            self.routes.write_record(&[
                row.hazard.clone(),
                row.category.clone(),
                row.origin_node.to_string(),
                row.destination_node.to_string(),
                row.origin_label.clone(),
                row.destination_label.clone(),
                row.weighing.to_string(),
                row.length_m.to_string(),
                row.load.to_string(),
                row.geometry.clone(),
            ])?;
        }
        Ok(())
    }

    fn write_summaries(&mut self, rows: &[ScenarioSummaryRow]) -> OutputResult<()> {
        for row in rows {
            self.summaries.write_record(&[
                row.hazard.clone(),
                row.category.clone(),
                row.origins_total.to_string(),
                row.origins_reached.to_string(),
                row.origins_routed.to_string(),
                row.origins_no_access.to_string(),
                row.origins_disrupted_destination.to_string(),
                row.origins_skipped.to_string(),
                row.people_no_access.to_string(),
                row.people_no_delay.to_string(),
                row.people_delayed.to_string(),
                row.routes_delayed.to_string(),
                row.extra_weighing.to_string(),
                row.extra_distance_km.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_origins(&mut self, columns: &[String], rows: &[OriginRow]) -> OutputResult<()> {
        let mut w = self.wide("origins.csv", &["id", "o_id", "node", "population"], columns)?;
        for row in rows {
            check_shape("origins", columns.len(), row.access.len())?;
            let mut record =
                vec![row.id.to_string(), row.label.clone(), row.node.to_string(), row.population.to_string()];
            record.extend(row.access.iter().map(|a| a.as_str().to_owned()));
            w.write_record(&record)?;
        }
        w.flush()?;
        Ok(())
    }

    fn write_destinations(&mut self, columns: &[String], rows: &[DestinationRow]) -> OutputResult<()> {
        let mut w =
            self.wide("destinations.csv", &["id", "d_id", "node", "category", "origin_cnt"], columns)?;
        for row in rows {
            check_shape("destinations", columns.len(), row.loads.len())?;
            let mut record = vec![
                row.id.to_string(),
                row.label.clone(),
                row.node.to_string(),
                row.category.clone(),
                row.origin_cnt.to_string(),
            ];
            record.extend(row.loads.iter().map(f64::to_string));
            w.write_record(&record)?;
        }
        w.flush()?;
        Ok(())
    }

    fn write_edge_loads(&mut self, columns: &[String], rows: &[EdgeLoadRow]) -> OutputResult<()> {
        let mut w = self.wide("edge_loads.csv", &["road", "from", "to"], columns)?;
        for row in rows {
            check_shape("edge_loads", columns.len(), row.loads.len())?;
            let mut record = vec![row.road.to_string(), row.from.to_string(), row.to.to_string()];
            record.extend(row.loads.iter().map(f64::to_string));
            w.write_record(&record)?;
        }
        w.flush()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.routes.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}
