//! Flatten a finished [`Analysis`] into output rows.

use log::info;
use wkt::ToWkt;

use od_analysis::{Analysis, Route, ScenarioResult};
use od_core::CategoryId;
use od_network::{RoadNetwork, Router};
use od_table::OdTable;

use crate::row::{DestinationRow, EdgeLoadRow, OriginRow, RouteRow, ScenarioSummaryRow};
use crate::writer::OutputWriter;
use crate::OutputResult;

/// Write every table of `analysis` to `writer` and finish it.
///
/// Baseline routes come first in the route table, followed by the scenario
/// routes in processing order.
pub fn export<R: Router, W: OutputWriter>(analysis: &Analysis<R>, writer: &mut W) -> OutputResult<()> {
    let routes = route_rows(analysis);
    writer.write_routes(&routes)?;
    let summaries = summary_rows(analysis);
    writer.write_summaries(&summaries)?;

    let (columns, rows) = origin_rows(analysis);
    writer.write_origins(&columns, &rows)?;
    let (columns, rows) = destination_rows(analysis);
    writer.write_destinations(&columns, &rows)?;
    let (columns, rows) = edge_load_rows(analysis);
    writer.write_edge_loads(&columns, &rows)?;

    writer.finish()?;
    info!("exported {} routes and {} scenario summaries", routes.len(), summaries.len());
    Ok(())
}

pub fn route_rows<R: Router>(analysis: &Analysis<R>) -> Vec<RouteRow> {
    analysis
        .baseline_routes
        .iter()
        .chain(&analysis.routes)
        .map(|r| route_row(&analysis.network, &analysis.table, r))
        .collect()
}

pub fn summary_rows<R: Router>(analysis: &Analysis<R>) -> Vec<ScenarioSummaryRow> {
    analysis.results.iter().map(|r| summary_row(&analysis.table, r)).collect()
}

/// Origin table with one access column per scenario and category
/// (`noHaz_A`, `flood_AD2`, …).
pub fn origin_rows<R: Router>(analysis: &Analysis<R>) -> (Vec<String>, Vec<OriginRow>) {
    let access = analysis.accumulator.access_columns();
    let columns = access.iter().map(|(name, _)| name.clone()).collect();
    let rows = analysis
        .table
        .origins()
        .iter()
        .enumerate()
        .map(|(row, o)| OriginRow {
            id:         o.id.0,
            label:      analysis.table.origin_label(row),
            node:       analysis.network.node_key(o.node),
            population: o.population,
            access:     access.iter().map(|(_, flags)| flags[row]).collect(),
        })
        .collect();
    (columns, rows)
}

/// Destination table with one column per load column and the baseline
/// `origin_cnt` total.
pub fn destination_rows<R: Router>(analysis: &Analysis<R>) -> (Vec<String>, Vec<DestinationRow>) {
    let acc = &analysis.accumulator;
    let columns = acc.columns().iter().map(|c| c.name.clone()).collect();
    let totals = analysis.destination_totals();
    let labels = analysis.table.labels();
    let rows = analysis
        .table
        .destinations()
        .iter()
        .enumerate()
        .map(|(row, d)| DestinationRow {
            id:         d.id.0,
            label:      labels.destination_label(d.id),
            node:       analysis.network.node_key(d.node),
            category:   category_name(&analysis.table, d.category),
            origin_cnt: totals[row],
            loads:      (0..acc.columns().len()).map(|c| acc.destination_loads(c)[row]).collect(),
        })
        .collect();
    (columns, rows)
}

/// One row per road with its load in every load column.
pub fn edge_load_rows<R: Router>(analysis: &Analysis<R>) -> (Vec<String>, Vec<EdgeLoadRow>) {
    let acc = &analysis.accumulator;
    let network = &analysis.network;
    let columns = acc.columns().iter().map(|c| c.name.clone()).collect();
    let rows = (0..network.road_count())
        .map(|road| EdgeLoadRow {
            road:  road as u32,
            from:  network.node_key(network.road_from[road]),
            to:    network.node_key(network.road_to[road]),
            loads: (0..acc.columns().len()).map(|c| acc.road_loads(c)[road]).collect(),
        })
        .collect();
    (columns, rows)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn category_name(table: &OdTable, category: Option<CategoryId>) -> String {
    category.map(|c| table.category_name(c).to_owned()).unwrap_or_default()
}

fn route_row(network: &RoadNetwork, table: &OdTable, r: &Route) -> RouteRow {
    RouteRow {
        hazard:            r.scenario.clone(),
        category:          category_name(table, r.category),
        origin_node:       network.node_key(r.origin_node),
        destination_node:  network.node_key(r.destination_node),
        origin_label:      r.origin_label.clone(),
        destination_label: r.destination_label.clone(),
        weighing:          r.cost,
        length_m:          r.length_m,
        load:              r.load,
        geometry:          r.geometry.to_wkt().to_string(),
    }
}

fn summary_row(table: &OdTable, r: &ScenarioResult) -> ScenarioSummaryRow {
    ScenarioSummaryRow {
        hazard:                        r.scenario.clone(),
        category:                      category_name(table, r.category),
        origins_total:                 r.origins_total as u64,
        origins_reached:               r.origins_reached as u64,
        origins_routed:                r.origins_routed as u64,
        origins_no_access:             r.origins_no_access as u64,
        origins_disrupted_destination: r.origins_disrupted_destination as u64,
        origins_skipped:               r.origins_skipped as u64,
        people_no_access:              r.people_no_access,
        people_no_delay:               r.people_no_delay,
        people_delayed:                r.people_delayed,
        routes_delayed:                r.routes_delayed as u64,
        extra_weighing:                r.extra_weighing,
        extra_distance_km:             r.extra_distance_km,
    }
}
