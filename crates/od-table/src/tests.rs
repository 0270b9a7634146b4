//! Unit tests for od-table.

use od_core::{AnalysisConfig, Weighing};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn config() -> AnalysisConfig {
    AnalysisConfig {
        weighing:                   Weighing::Distance,
        threshold:                  1.0,
        destination_threshold:      None,
        origin_out_fraction:        0.5,
        origin_count:               "POPULATION".into(),
        id_name_origin_destination: "OBJECTID".into(),
        origins_names:              "A".into(),
        destinations_names:         "B".into(),
        category:                   Some("category".into()),
        hazard_names:               vec!["EV1_ma".into()],
        compare_with_baseline:      true,
    }
}

const NODES: &[u8] = b"\
node_id,lon,lat,od_id,EV1_ma\n\
10,0.0,0.0,A_1,\n\
11,1.0,0.0,,0.4\n\
12,2.0,0.0,\"A_2,B_1\",1.3\n\
";

const EDGES: &[u8] = b"\
from,to,length,time,bridge,geometry,EV1_ma\n\
10,11,100.0,10.0,,\"LINESTRING (0 0, 0.5 0.1, 1 0)\",\n\
11,12,200.0,,yes,,2.1\n\
";

// ── Labels ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod label {
    use od_core::{DestinationId, OriginId};

    use crate::{OdLabel, OdLabels, TableError};

    fn labels() -> OdLabels {
        OdLabels::new("A", "B")
    }

    #[test]
    fn parses_both_kinds() {
        assert_eq!(labels().parse("A_12").unwrap(), OdLabel::Origin(OriginId(12)));
        assert_eq!(labels().parse(" B_3 ").unwrap(), OdLabel::Destination(DestinationId(3)));
    }

    #[test]
    fn prefix_may_contain_underscore() {
        let l = OdLabels::new("orig_pt", "dest_pt");
        assert_eq!(l.parse("orig_pt_4").unwrap(), OdLabel::Origin(OriginId(4)));
    }

    #[test]
    fn malformed_labels_rejected() {
        for bad in ["C_1", "A_x", "A12", "A_-1", "_"] {
            assert!(
                matches!(labels().parse(bad), Err(TableError::Label { .. })),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn typed_cells() {
        let l = labels();
        assert_eq!(l.parse_origin_cell("A_1").unwrap(), Some(OriginId(1)));
        assert_eq!(l.parse_origin_cell("nan").unwrap(), None);
        assert_eq!(l.parse_origin_cell("").unwrap(), None);
        assert!(l.parse_origin_cell("B_1").is_err());
        assert!(l.parse_destination_cell("A_1").is_err());
    }

    #[test]
    fn tags_dedup_and_split() {
        let tags = labels().parse_tags("A_1,B_3,A_1").unwrap();
        assert_eq!(tags.origins, [OriginId(1)]);
        assert_eq!(tags.destinations, [DestinationId(3)]);
        assert!(labels().parse_tags("nan").unwrap().is_empty());
        assert_eq!(labels().format_tags(&tags), "A_1,B_3");
    }

    #[test]
    fn one_bad_label_fails_the_list() {
        assert!(labels().parse_tags("A_1,X_2").is_err());
    }
}

// ── OdTable ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod table {
    use od_core::{CategoryId, DestinationId, NodeId, OriginId};

    use crate::{DestinationRecord, OdLabels, OdTable, OriginRecord};

    fn table() -> OdTable {
        let origins = vec![
            OriginRecord { id: OriginId(1), node: NodeId(0), population: 10.0, out_fraction: 0.5 },
            OriginRecord { id: OriginId(2), node: NodeId(0), population: 4.0,  out_fraction: 0.5 },
            OriginRecord { id: OriginId(3), node: NodeId(1), population: 6.0,  out_fraction: 0.5 },
        ];
        let destinations = vec![
            DestinationRecord { id: DestinationId(1), node: NodeId(5), category: Some(CategoryId(0)) },
            DestinationRecord { id: DestinationId(2), node: NodeId(5), category: Some(CategoryId(1)) },
            DestinationRecord { id: DestinationId(3), node: NodeId(6), category: Some(CategoryId(0)) },
            DestinationRecord { id: DestinationId(4), node: NodeId(5), category: Some(CategoryId(0)) },
        ];
        OdTable::new(
            OdLabels::new("A", "B"),
            vec!["school".into(), "hospital".into()],
            origins,
            destinations,
        )
    }

    #[test]
    fn origin_load() {
        let t = table();
        assert_eq!(t.origin(OriginId(1)).unwrap().load(), 5.0);
        assert!(t.origin(OriginId(9)).is_none());
    }

    #[test]
    fn index_both_directions() {
        let t = table();
        assert_eq!(t.index().origin_row(OriginId(3)), Some(2));
        assert_eq!(t.index().origins_at(NodeId(0)), [0, 1]);
        assert_eq!(t.index().destinations_at(NodeId(5)), [0, 1, 3]);
        assert!(t.index().destinations_at(NodeId(0)).is_empty());
        assert_eq!(t.destination(DestinationId(3)).unwrap().node, NodeId(6));
    }

    #[test]
    fn category_scopes() {
        let t = table();
        assert!(t.is_categorised());
        assert_eq!(t.category_scopes(), [Some(CategoryId(0)), Some(CategoryId(1))]);
        assert_eq!(t.category_id("hospital"), Some(CategoryId(1)));
        assert_eq!(t.category_name(CategoryId(0)), "school");

        let plain = OdTable::new(OdLabels::new("A", "B"), vec![], vec![], vec![]);
        assert_eq!(plain.category_scopes(), [None]);
    }

    #[test]
    fn destination_nodes_dedup_per_scope() {
        let t = table();
        assert_eq!(t.destination_nodes(Some(CategoryId(0))), [NodeId(5), NodeId(6)]);
        assert_eq!(t.destination_nodes(Some(CategoryId(1))), [NodeId(5)]);
        assert_eq!(t.destination_nodes(None), [NodeId(5), NodeId(6)]);
    }

    #[test]
    fn destinations_on_node_filtered_by_scope() {
        let t = table();
        assert_eq!(t.destination_rows_at(NodeId(5), Some(CategoryId(0))), [0, 3]);
        assert_eq!(t.destination_rows_at(NodeId(5), None), [0, 1, 3]);
        assert_eq!(t.destination_label_at(NodeId(5), Some(CategoryId(0))), "B_1,B_4");
        assert_eq!(t.origin_label(2), "A_3");
    }
}

// ── Network loader ────────────────────────────────────────────────────────────

#[cfg(test)]
mod network_loader {
    use std::io::Cursor;

    use od_core::{DestinationId, HazardId, NodeId, OriginId, RoadId};

    use super::{EDGES, NODES};
    use crate::{load_network_reader, OdLabels, TableError};

    fn labels() -> OdLabels {
        OdLabels::new("A", "B")
    }

    fn hazards() -> Vec<String> {
        super::config().hazard_names
    }

    #[test]
    fn loads_nodes_and_roads() {
        let net = load_network_reader(Cursor::new(NODES), Cursor::new(EDGES), &labels(), &hazards()).unwrap();
        assert_eq!(net.node_count(), 3);
        assert_eq!(net.road_count(), 2);
        assert_eq!(net.edge_count(), 4);
        assert_eq!(net.road_from[1], NodeId(1));
        assert_eq!(net.road_to[1], NodeId(2));
    }

    #[test]
    fn od_labels_become_typed_tags() {
        let net = load_network_reader(Cursor::new(NODES), Cursor::new(EDGES), &labels(), &hazards()).unwrap();
        assert_eq!(net.node_od[0].origins, [OriginId(1)]);
        assert!(net.node_od[1].is_empty());
        assert_eq!(net.node_od[2].origins, [OriginId(2)]);
        assert_eq!(net.node_od[2].destinations, [DestinationId(1)]);
    }

    #[test]
    fn hazard_columns_shared_by_nodes_and_edges() {
        let net = load_network_reader(Cursor::new(NODES), Cursor::new(EDGES), &labels(), &hazards()).unwrap();
        let h = net.hazard_id("EV1_ma").unwrap();
        assert_eq!(h, HazardId(0));
        assert_eq!(net.hazard_names.len(), 1);
        assert_eq!(net.node_hazard(h, NodeId(0)), None);
        assert_eq!(net.node_hazard(h, NodeId(1)), Some(0.4));
        assert_eq!(net.road_hazard(h, RoadId(0)), None);
        assert_eq!(net.road_hazard(h, RoadId(1)), Some(2.1));
    }

    #[test]
    fn source_node_ids_kept_as_keys() {
        let net = load_network_reader(Cursor::new(NODES), Cursor::new(EDGES), &labels(), &hazards()).unwrap();
        assert_eq!(net.node_key(NodeId(0)), 10);
        assert_eq!(net.node_key(NodeId(2)), 12);
        assert_eq!(net.node_key(net.road_to[1]), 12);
    }

    #[test]
    fn unconfigured_columns_ignored() {
        let nodes = b"\
node_id,lon,lat,od_id,name,EV1_ma\n\
10,0.0,0.0,A_1,Main Square,\n\
11,1.0,0.0,,,0.4\n\
";
        let edges = b"\
from,to,length,highway,EV1_ma,EV9_ma\n\
10,11,100.0,primary,2.1,\n\
";
        let net = load_network_reader(
            Cursor::new(nodes.as_slice()),
            Cursor::new(edges.as_slice()),
            &labels(),
            &hazards(),
        )
        .unwrap();
        assert_eq!(net.hazard_names, ["EV1_ma"]);
        let h = net.hazard_id("EV1_ma").unwrap();
        assert_eq!(net.node_hazard(h, NodeId(1)), Some(0.4));
        assert_eq!(net.road_hazard(h, RoadId(0)), Some(2.1));
    }

    #[test]
    fn invalid_value_in_configured_hazard_errors() {
        let edges = b"from,to,length,EV1_ma\n10,11,1.0,deep\n";
        let result = load_network_reader(Cursor::new(NODES), Cursor::new(edges.as_slice()), &labels(), &hazards());
        assert!(matches!(result, Err(TableError::Parse(_))));
    }

    #[test]
    fn optional_attributes() {
        let net = load_network_reader(Cursor::new(NODES), Cursor::new(EDGES), &labels(), &hazards()).unwrap();
        assert_eq!(net.road_length_m[1], Some(200.0));
        assert_eq!(net.road_time_s[1], None);
        assert!(!net.road_bridge[0]);
        assert!(net.road_bridge[1]);
        assert_eq!(net.road_geometry[0].as_ref().unwrap().0.len(), 3);
        assert!(net.road_geometry[1].is_none());
    }

    #[test]
    fn directed_column() {
        let edges = b"\
from,to,length,directed\n\
10,11,100.0,true\n\
11,12,100.0,false\n\
";
        let net = load_network_reader(Cursor::new(NODES), Cursor::new(edges.as_slice()), &labels(), &hazards()).unwrap();
        assert_eq!(net.road_count(), 2);
        assert_eq!(net.edge_count(), 3);
    }

    #[test]
    fn unknown_node_errors() {
        let edges = b"from,to,length\n10,99,1.0\n";
        let result = load_network_reader(Cursor::new(NODES), Cursor::new(edges.as_slice()), &labels(), &hazards());
        assert!(matches!(result, Err(TableError::Parse(_))));
    }

    #[test]
    fn malformed_label_errors() {
        let nodes = b"node_id,lon,lat,od_id\n1,0.0,0.0,Z_1\n";
        let edges = b"from,to,length\n";
        let result = load_network_reader(
            Cursor::new(nodes.as_slice()),
            Cursor::new(edges.as_slice()),
            &labels(),
            &hazards(),
        );
        assert!(matches!(result, Err(TableError::Label { .. })));
    }

    #[test]
    fn invalid_geometry_errors() {
        let edges = b"from,to,length,geometry\n10,11,1.0,NOT WKT\n";
        let result = load_network_reader(Cursor::new(NODES), Cursor::new(edges.as_slice()), &labels(), &hazards());
        assert!(result.is_err());
    }

    #[test]
    fn duplicate_node_id_errors() {
        let nodes = b"node_id,lon,lat\n1,0.0,0.0\n1,1.0,0.0\n";
        let edges = b"from,to,length\n";
        let result = load_network_reader(
            Cursor::new(nodes.as_slice()),
            Cursor::new(edges.as_slice()),
            &labels(),
            &hazards(),
        );
        assert!(result.is_err());
    }
}

// ── OD table loader ───────────────────────────────────────────────────────────

#[cfg(test)]
mod od_loader {
    use std::io::Cursor;

    use od_core::{CategoryId, DestinationId, NodeId, OriginId};

    use super::{config, EDGES, NODES};
    use crate::{load_network_reader, load_od_table_reader, OdLabels, TableError};

    const OD: &[u8] = b"\
OBJECTID,o_id,d_id,POPULATION,category\n\
1,A_1,,120,\n\
2,A_2,,80,\n\
3,A_3,,50,\n\
1,,B_1,,hospital\n\
";

    fn network() -> od_network::RoadNetwork {
        load_network_reader(Cursor::new(NODES), Cursor::new(EDGES), &OdLabels::new("A", "B"), &config().hazard_names).unwrap()
    }

    #[test]
    fn records_placed_on_tagged_nodes() {
        let net = network();
        let t = load_od_table_reader(Cursor::new(OD), &config(), &net).unwrap();
        // A_3 is on no node and is dropped.
        assert_eq!(t.origins().len(), 2);
        assert_eq!(t.origin(OriginId(1)).unwrap().node, NodeId(0));
        assert_eq!(t.origin(OriginId(2)).unwrap().node, NodeId(2));
        assert_eq!(t.origin(OriginId(2)).unwrap().population, 80.0);
        assert_eq!(t.origin(OriginId(2)).unwrap().out_fraction, 0.5);
        assert!(t.origin(OriginId(3)).is_none());

        let d = t.destination(DestinationId(1)).unwrap();
        assert_eq!(d.node, NodeId(2));
        assert_eq!(d.category, Some(CategoryId(0)));
        assert_eq!(t.categories(), ["hospital"]);
    }

    #[test]
    fn uncategorised_when_no_category_column_configured() {
        let net = network();
        let mut cfg = config();
        cfg.category = None;
        let t = load_od_table_reader(Cursor::new(OD), &cfg, &net).unwrap();
        assert!(!t.is_categorised());
        assert_eq!(t.destinations()[0].category, None);
    }

    #[test]
    fn missing_count_column() {
        let net = network();
        let mut cfg = config();
        cfg.origin_count = "POP".into();
        let result = load_od_table_reader(Cursor::new(OD), &cfg, &net);
        assert!(matches!(result, Err(TableError::MissingColumn(c)) if c == "POP"));
    }

    #[test]
    fn label_must_match_id_column() {
        let net = network();
        let od = b"OBJECTID,o_id,d_id,POPULATION,category\n7,A_1,,10,\n";
        let result = load_od_table_reader(Cursor::new(od.as_slice()), &config(), &net);
        assert!(matches!(result, Err(TableError::Label { .. })));
    }

    #[test]
    fn invalid_population() {
        let net = network();
        let od = b"OBJECTID,o_id,d_id,POPULATION,category\n1,A_1,,many,\n";
        let result = load_od_table_reader(Cursor::new(od.as_slice()), &config(), &net);
        assert!(matches!(result, Err(TableError::Parse(_))));
    }

    #[test]
    fn label_on_two_nodes_rejected() {
        let nodes = b"node_id,lon,lat,od_id\n1,0.0,0.0,A_1\n2,1.0,0.0,A_1\n";
        let edges = b"from,to,length\n";
        let net = load_network_reader(
            Cursor::new(nodes.as_slice()),
            Cursor::new(edges.as_slice()),
            &OdLabels::new("A", "B"),
            &[],
        )
        .unwrap();
        let result = load_od_table_reader(Cursor::new(OD), &config(), &net);
        assert!(matches!(result, Err(TableError::DuplicateLabel { .. })));
    }
}
