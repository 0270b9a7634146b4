//! CSV snapshot loaders.
//!
//! # Network snapshot
//!
//! Two files.  Columns named after a configured hazard scenario hold that
//! hazard's values; empty cells are absent values.  Other columns not listed
//! below (`highway`, `name`, ...) are ignored.
//!
//! ```csv
//! node_id,lon,lat,od_id,EV1_ma
//! 10,4.350,52.000,A_1,
//! 11,4.360,52.000,,0.4
//! 12,4.370,52.010,"A_2,B_1",1.3
//! ```
//!
//! ```csv
//! from,to,length,time,bridge,geometry,EV1_ma
//! 10,11,700.0,42.0,,"LINESTRING (4.35 52.0, 4.36 52.0)",
//! 11,12,1200.0,80.0,yes,,2.1
//! ```
//!
//! `node_id` values are arbitrary integers kept as the network's node keys;
//! nodes receive `NodeId`s in file order.  An optional `directed` edge column
//! marks one-way roads.
//!
//! # OD table
//!
//! ```csv
//! OBJECTID,o_id,d_id,POPULATION,category
//! 1,A_1,,120,
//! 2,A_2,,80,
//! 1,,B_1,,hospital
//! ```
//!
//! The id, population and category column names come from
//! [`AnalysisConfig`]; a label's number must equal the record's id.  Each record is placed on the node whose `od_id`
//! carries its label; records whose label is on no node are dropped with a
//! warning.

use std::io::Read;
use std::path::Path;

use log::{debug, warn};
use rustc_hash::FxHashMap;
use serde::Deserialize;
use wkt::TryFromWkt;

use geo_types::LineString;
use od_core::{AnalysisConfig, CategoryId, DestinationId, GeoPoint, HazardId, NodeId, OriginId};
use od_network::{NodeAttrs, RoadAttrs, RoadNetwork, RoadNetworkBuilder};

use crate::label::OdLabels;
use crate::record::{DestinationRecord, OdTable, OriginRecord};
use crate::{TableError, TableResult};

const NODE_COLUMNS: [&str; 4] = ["node_id", "lon", "lat", "od_id"];
const EDGE_COLUMNS: [&str; 7] = ["from", "to", "length", "time", "bridge", "geometry", "directed"];

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct NodeRow {
    node_id: u64,
    lon:     f64,
    lat:     f64,
    #[serde(default)]
    od_id:   Option<String>,
}

#[derive(Deserialize)]
struct EdgeRow {
    from:     u64,
    to:       u64,
    #[serde(default)]
    length:   Option<f64>,
    #[serde(default)]
    time:     Option<f64>,
    #[serde(default)]
    bridge:   Option<String>,
    #[serde(default)]
    geometry: Option<String>,
    #[serde(default)]
    directed: Option<String>,
}

// ── Network snapshot ──────────────────────────────────────────────────────────

/// Load a road network from `nodes.csv` and `edges.csv`, reading the
/// columns named in `hazards` as hazard values.
pub fn load_network_csv(
    nodes: &Path,
    edges: &Path,
    labels: &OdLabels,
    hazards: &[String],
) -> TableResult<RoadNetwork> {
    let nodes_file = std::fs::File::open(nodes).map_err(TableError::Io)?;
    let edges_file = std::fs::File::open(edges).map_err(TableError::Io)?;
    load_network_reader(nodes_file, edges_file, labels, hazards)
}

/// Like [`load_network_csv`] but accepts any `Read` sources.
pub fn load_network_reader<N: Read, E: Read>(
    nodes: N,
    edges: E,
    labels: &OdLabels,
    hazards: &[String],
) -> TableResult<RoadNetwork> {
    let mut builder = RoadNetworkBuilder::new();
    let mut node_ids: FxHashMap<u64, NodeId> = FxHashMap::default();

    // ── Nodes ─────────────────────────────────────────────────────────────
    let mut reader = csv::Reader::from_reader(nodes);
    let headers = reader.headers().map_err(|e| parse_error("nodes", e))?.clone();
    let hazard_cols = hazard_columns("nodes", &headers, &NODE_COLUMNS, hazards, &mut builder);

    for result in reader.records() {
        let record = result.map_err(|e| parse_error("nodes", e))?;
        let row: NodeRow = record.deserialize(Some(&headers)).map_err(|e| parse_error("nodes", e))?;

        let mut attrs = NodeAttrs::at(GeoPoint::new(row.lon, row.lat)).key(row.node_id);
        if let Some(cell) = &row.od_id {
            attrs.od = labels.parse_tags(cell)?;
        }
        for &(col, hazard) in &hazard_cols {
            if let Some(v) = hazard_value(&record, col, "nodes")? {
                attrs = attrs.hazard(hazard, v);
            }
        }

        let id = builder.add_node(attrs);
        if node_ids.insert(row.node_id, id).is_some() {
            return Err(TableError::Parse(format!("nodes: duplicate node_id {}", row.node_id)));
        }
    }

    // ── Edges ─────────────────────────────────────────────────────────────
    let mut reader = csv::Reader::from_reader(edges);
    let headers = reader.headers().map_err(|e| parse_error("edges", e))?.clone();
    let hazard_cols = hazard_columns("edges", &headers, &EDGE_COLUMNS, hazards, &mut builder);

    for result in reader.records() {
        let record = result.map_err(|e| parse_error("edges", e))?;
        let row: EdgeRow = record.deserialize(Some(&headers)).map_err(|e| parse_error("edges", e))?;

        let from = lookup_node(&node_ids, row.from)?;
        let to = lookup_node(&node_ids, row.to)?;

        let mut attrs = RoadAttrs { length_m: row.length, time_s: row.time, ..RoadAttrs::default() };
        if row.bridge.as_deref().is_some_and(is_truthy) {
            attrs = attrs.bridge();
        }
        if let Some(text) = row.geometry.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let line = LineString::<f64>::try_from_wkt_str(text)
                .map_err(|e| TableError::Parse(format!("edges: invalid geometry {text:?}: {e}")))?;
            attrs = attrs.geometry(line);
        }
        for &(col, hazard) in &hazard_cols {
            if let Some(v) = hazard_value(&record, col, "edges")? {
                attrs = attrs.hazard(hazard, v);
            }
        }

        if row.directed.as_deref().is_some_and(is_truthy) {
            builder.add_directed_road(from, to, attrs);
        } else {
            builder.add_road(from, to, attrs);
        }
    }

    debug!(
        "loaded network: {} nodes, {} roads",
        builder.node_count(),
        builder.road_count()
    );
    Ok(builder.build())
}

// ── OD table ──────────────────────────────────────────────────────────────────

/// Load the origin/destination table and place its records on `network`.
pub fn load_od_table_csv(
    path: &Path,
    config: &AnalysisConfig,
    network: &RoadNetwork,
) -> TableResult<OdTable> {
    let file = std::fs::File::open(path).map_err(TableError::Io)?;
    load_od_table_reader(file, config, network)
}

/// Like [`load_od_table_csv`] but accepts any `Read` source.
pub fn load_od_table_reader<R: Read>(
    reader: R,
    config: &AnalysisConfig,
    network: &RoadNetwork,
) -> TableResult<OdTable> {
    let labels = OdLabels::from_config(config);
    let placement = Placement::from_network(network, &labels)?;

    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers = csv_reader.headers().map_err(|e| parse_error("od table", e))?.clone();
    let col = |name: &str| -> TableResult<usize> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| TableError::MissingColumn(name.to_owned()))
    };
    let id_col = col(&config.id_name_origin_destination)?;
    let o_col = col("o_id")?;
    let d_col = col("d_id")?;
    let count_col = col(&config.origin_count)?;
    let category_col = config.category.as_deref().map(col).transpose()?;

    let mut categories: Vec<String> = Vec::new();
    let mut origins: Vec<OriginRecord> = Vec::new();
    let mut destinations: Vec<DestinationRecord> = Vec::new();

    for result in csv_reader.records() {
        let record = result.map_err(|e| parse_error("od table", e))?;
        let cell = |i: usize| record.get(i).unwrap_or("");

        if let Some(id) = labels.parse_origin_cell(cell(o_col))? {
            check_id(cell(id_col), id.0, cell(o_col))?;
            let population: f64 = cell(count_col).trim().parse().map_err(|_| {
                TableError::Parse(format!(
                    "od table: {} has invalid {} {:?}",
                    labels.origin_label(id),
                    config.origin_count,
                    cell(count_col)
                ))
            })?;
            match placement.origins.get(&id) {
                Some(&node) => origins.push(OriginRecord {
                    id,
                    node,
                    population,
                    out_fraction: config.origin_out_fraction,
                }),
                None => warn!("{} is not on the network; ignored", labels.origin_label(id)),
            }
        }

        if let Some(id) = labels.parse_destination_cell(cell(d_col))? {
            check_id(cell(id_col), id.0, cell(d_col))?;
            let category = match category_col.map(cell).map(str::trim) {
                Some(name) if !name.is_empty() => Some(intern(&mut categories, name)),
                _ => None,
            };
            match placement.destinations.get(&id) {
                Some(&node) => destinations.push(DestinationRecord { id, node, category }),
                None => warn!("{} is not on the network; ignored", labels.destination_label(id)),
            }
        }
    }

    debug!(
        "loaded OD table: {} origins, {} destinations, {} categories",
        origins.len(),
        destinations.len(),
        categories.len()
    );
    Ok(OdTable::new(labels, categories, origins, destinations))
}

/// Label → node, from the network's OD tags.
struct Placement {
    origins:      FxHashMap<OriginId, NodeId>,
    destinations: FxHashMap<DestinationId, NodeId>,
}

impl Placement {
    fn from_network(network: &RoadNetwork, labels: &OdLabels) -> TableResult<Self> {
        let mut origins = FxHashMap::default();
        let mut destinations = FxHashMap::default();
        for (i, tags) in network.node_od.iter().enumerate() {
            let node = NodeId(i as u32);
            for &id in &tags.origins {
                if origins.insert(id, node).is_some() {
                    return Err(TableError::DuplicateLabel { label: labels.origin_label(id) });
                }
            }
            for &id in &tags.destinations {
                if destinations.insert(id, node).is_some() {
                    return Err(TableError::DuplicateLabel { label: labels.destination_label(id) });
                }
            }
        }
        Ok(Self { origins, destinations })
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn parse_error(what: &str, e: csv::Error) -> TableError {
    TableError::Parse(format!("{what}: {e}"))
}

/// Register the configured hazard columns found in `headers` and return
/// `(column, id)` for each.
fn hazard_columns(
    what: &str,
    headers: &csv::StringRecord,
    fixed: &[&str],
    hazards: &[String],
    builder: &mut RoadNetworkBuilder,
) -> Vec<(usize, HazardId)> {
    let mut columns = Vec::new();
    for (i, h) in headers.iter().enumerate() {
        if hazards.iter().any(|name| name == h) {
            columns.push((i, builder.add_hazard(h)));
        } else if !fixed.contains(&h) {
            debug!("{what}: column {h:?} is not a configured hazard; ignored");
        }
    }
    columns
}

fn hazard_value(record: &csv::StringRecord, col: usize, what: &str) -> TableResult<Option<f64>> {
    let cell = record.get(col).unwrap_or("").trim();
    // NaN is a value (never above any threshold), not an absent attribute.
    if cell.is_empty() || cell == "None" {
        return Ok(None);
    }
    cell.parse().map(Some).map_err(|_| {
        let line = record.position().map_or(0, |p| p.line());
        TableError::Parse(format!("{what} line {line}: invalid hazard value {cell:?}"))
    })
}

/// A label's number must match the record's id column.
fn check_id(id_cell: &str, number: u32, label: &str) -> TableResult<()> {
    match id_cell.trim().parse::<u32>() {
        Ok(n) if n == number => Ok(()),
        _ => Err(TableError::Label {
            label:  label.trim().to_owned(),
            reason: format!("does not match id column value {id_cell:?}"),
        }),
    }
}

fn lookup_node(node_ids: &FxHashMap<u64, NodeId>, key: u64) -> TableResult<NodeId> {
    node_ids
        .get(&key)
        .copied()
        .ok_or_else(|| TableError::Parse(format!("edges: unknown node_id {key}")))
}

fn is_truthy(cell: &str) -> bool {
    !matches!(
        cell.trim().to_ascii_lowercase().as_str(),
        "" | "0" | "false" | "no" | "nan" | "none"
    )
}

fn intern(names: &mut Vec<String>, name: &str) -> CategoryId {
    let i = match names.iter().position(|n| n == name) {
        Some(i) => i,
        None => {
            names.push(name.to_owned());
            names.len() - 1
        }
    };
    CategoryId(i as u16)
}
