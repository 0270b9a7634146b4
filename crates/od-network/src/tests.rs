//! Unit tests for od-network.
//!
//! All tests use a hand-crafted network so they run without any snapshot
//! files.

#[cfg(test)]
mod helpers {
    use od_core::{GeoPoint, HazardId, NodeId};
    use crate::{NodeAttrs, RoadAttrs, RoadNetwork, RoadNetworkBuilder};

    /// Build a small grid network for testing.
    ///
    /// Nodes (lon, lat):
    ///   0:(0,0)  1:(1,0)  2:(2,0)
    ///   3:(0,1)           4:(2,1)
    ///
    /// Two-way roads: 0-1, 1-2, 2-4, 0-3, 3-4
    ///
    /// Shortest path 0→4 by length: 0→1→2→4 (300 m) vs 0→3→4 (600 m).
    /// Hazard "flood" sits on road 1-2 at 2.0 and on road 0-3 at 0.2.
    pub fn grid_network() -> (RoadNetwork, [NodeId; 5], HazardId) {
        let mut b = RoadNetworkBuilder::new();
        let flood = b.add_hazard("flood");

        let n0 = b.add_node(NodeAttrs::at(GeoPoint::new(0.0, 0.0)));
        let n1 = b.add_node(NodeAttrs::at(GeoPoint::new(1.0, 0.0)));
        let n2 = b.add_node(NodeAttrs::at(GeoPoint::new(2.0, 0.0)));
        let n3 = b.add_node(NodeAttrs::at(GeoPoint::new(0.0, 1.0)));
        let n4 = b.add_node(NodeAttrs::at(GeoPoint::new(2.0, 1.0)));

        b.add_road(n0, n1, RoadAttrs::default().length(100.0).time(10.0));
        b.add_road(n1, n2, RoadAttrs::default().length(100.0).time(10.0).hazard(flood, 2.0));
        b.add_road(n2, n4, RoadAttrs::default().length(100.0).time(10.0));
        b.add_road(n0, n3, RoadAttrs::default().length(500.0).time(50.0).hazard(flood, 0.2));
        b.add_road(n3, n4, RoadAttrs::default().length(100.0).time(10.0));

        (b.build(), [n0, n1, n2, n3, n4], flood)
    }
}

// ── Builder & network structure ────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use geo_types::{Coord, LineString};
    use od_core::{DestinationId, GeoPoint, OriginId, RoadId};
    use crate::{NodeAttrs, RoadAttrs, RoadNetworkBuilder};

    #[test]
    fn empty_build() {
        let net = RoadNetworkBuilder::new().build();
        assert_eq!(net.node_count(), 0);
        assert_eq!(net.edge_count(), 0);
        assert!(net.is_empty());
    }

    #[test]
    fn two_way_road_shares_one_road_id() {
        let (net, [n0, n1, ..], _) = super::helpers::grid_network();
        assert_eq!(net.road_count(), 5);
        assert_eq!(net.edge_count(), 10);

        let fwd = net.out_edges(n0).find(|e| net.edge_to[e.index()] == n1).unwrap();
        let back = net.out_edges(n1).find(|e| net.edge_to[e.index()] == n0).unwrap();
        assert_eq!(net.edge_road[fwd.index()], net.edge_road[back.index()]);
        assert!(net.edge_forward[fwd.index()]);
        assert!(!net.edge_forward[back.index()]);
    }

    #[test]
    fn csr_out_degrees() {
        let (net, [n0, n1, n2, n3, n4], _) = super::helpers::grid_network();
        assert_eq!(net.out_degree(n0), 2);
        assert_eq!(net.out_degree(n1), 2);
        assert_eq!(net.out_degree(n2), 2);
        assert_eq!(net.out_degree(n3), 2);
        assert_eq!(net.out_degree(n4), 2);
        for e in net.out_edges(n0) {
            assert_eq!(net.edge_from[e.index()], n0);
        }
    }

    #[test]
    fn directed_only_road() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(NodeAttrs::at(GeoPoint::new(0.0, 0.0)));
        let c = b.add_node(NodeAttrs::at(GeoPoint::new(1.0, 0.0)));
        b.add_directed_road(a, c, RoadAttrs::default().length(100.0));
        let net = b.build();
        assert_eq!(net.edge_count(), 1);
        assert_eq!(net.out_degree(a), 1);
        assert_eq!(net.out_degree(c), 0);
    }

    #[test]
    fn parallel_arcs_keep_insertion_order() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(NodeAttrs::at(GeoPoint::new(0.0, 0.0)));
        let c = b.add_node(NodeAttrs::at(GeoPoint::new(1.0, 0.0)));
        b.add_directed_road(a, c, RoadAttrs::default().length(7.0));
        b.add_directed_road(a, c, RoadAttrs::default().length(3.0));
        b.add_directed_road(a, c, RoadAttrs::default().length(5.0));
        let net = b.build();
        let roads: Vec<RoadId> = net.out_edges(a).map(|e| net.edge_road[e.index()]).collect();
        assert_eq!(roads, [RoadId(0), RoadId(1), RoadId(2)]);
    }

    #[test]
    fn od_tags_and_hazards_land_on_nodes() {
        let mut b = RoadNetworkBuilder::new();
        let h = b.add_hazard("EV1_ma");
        assert_eq!(b.add_hazard("EV1_ma"), h);
        let n = b.add_node(
            NodeAttrs::at(GeoPoint::new(0.0, 0.0))
                .origin(OriginId(3))
                .destination(DestinationId(9))
                .hazard(h, 0.7),
        );
        let plain = b.add_node(NodeAttrs::at(GeoPoint::new(1.0, 0.0)));
        let net = b.build();
        assert!(net.node_od[n.index()].is_origin());
        assert!(net.node_od[n.index()].is_destination());
        assert!(net.node_od[plain.index()].is_empty());
        assert_eq!(net.node_hazard(h, n), Some(0.7));
        assert_eq!(net.node_hazard(h, plain), None);
        assert_eq!(net.hazard_id("EV1_ma"), Some(h));
        assert_eq!(net.hazard_id("EV2_ma"), None);
    }

    #[test]
    fn node_keys_default_to_index() {
        let mut b = RoadNetworkBuilder::new();
        let keyed = b.add_node(NodeAttrs::at(GeoPoint::new(0.0, 0.0)).key(9_000_017));
        let plain = b.add_node(NodeAttrs::at(GeoPoint::new(1.0, 0.0)));
        let net = b.build();
        assert_eq!(net.node_key(keyed), 9_000_017);
        assert_eq!(net.node_key(plain), 1);
    }

    #[test]
    fn arc_geometry_reversed_against_digitisation() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(NodeAttrs::at(GeoPoint::new(0.0, 0.0)));
        let c = b.add_node(NodeAttrs::at(GeoPoint::new(2.0, 0.0)));
        let line = LineString::new(vec![
            Coord { x: 0.0, y: 0.0 },
            Coord { x: 1.0, y: 0.5 },
            Coord { x: 2.0, y: 0.0 },
        ]);
        b.add_road(a, c, RoadAttrs::default().length(10.0).geometry(line.clone()));
        let net = b.build();

        let back = net.out_edges(c).next().unwrap();
        let reversed: Vec<Coord<f64>> = net.arc_geometry(back).coords().copied().collect();
        assert_eq!(reversed.first(), Some(&Coord { x: 2.0, y: 0.0 }));
        assert_eq!(reversed[1], Coord { x: 1.0, y: 0.5 });

        let fwd = net.out_edges(a).next().unwrap();
        assert_eq!(net.arc_geometry(fwd), line);
    }

    #[test]
    fn arc_geometry_falls_back_to_straight_segment() {
        let (net, [n0, ..], _) = super::helpers::grid_network();
        let e = net.out_edges(n0).next().unwrap();
        assert_eq!(net.arc_geometry(e).coords().count(), 2);
    }
}

// ── Weights and views ─────────────────────────────────────────────────────────

#[cfg(test)]
mod views {
    use od_core::{GeoPoint, NodeId, RoadId, Weighing};
    use crate::{
        ActiveRoads, GraphView, NetworkError, NodeAttrs, RoadAttrs, RoadNetworkBuilder, SinkView,
        WeightedView,
    };

    #[test]
    fn road_weights_follow_weighing() {
        let (net, ..) = super::helpers::grid_network();
        let dist = net.road_weights(Weighing::Distance).unwrap();
        let time = net.road_weights(Weighing::Time).unwrap();
        assert_eq!(dist[3], 500.0);
        assert_eq!(time[3], 50.0);
    }

    #[test]
    fn missing_weighing_reported() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(NodeAttrs::at(GeoPoint::new(0.0, 0.0)));
        let c = b.add_node(NodeAttrs::at(GeoPoint::new(1.0, 0.0)));
        b.add_road(a, c, RoadAttrs::default().length(10.0));
        let net = b.build();
        assert!(net.road_weights(Weighing::Distance).is_ok());
        assert!(matches!(
            net.road_weights(Weighing::Time),
            Err(NetworkError::MissingWeighing { road: RoadId(0), .. })
        ));
    }

    #[test]
    fn negative_weighing_rejected() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(NodeAttrs::at(GeoPoint::new(0.0, 0.0)));
        let c = b.add_node(NodeAttrs::at(GeoPoint::new(1.0, 0.0)));
        b.add_road(a, c, RoadAttrs::default().length(-1.0));
        let net = b.build();
        assert!(matches!(
            net.road_weights(Weighing::Distance),
            Err(NetworkError::InvalidWeighing { .. })
        ));
    }

    #[test]
    fn hazard_mask_removes_roads_above_threshold() {
        let (net, _, flood) = super::helpers::grid_network();
        let mask = ActiveRoads::for_hazard(&net, flood, 1.0);
        assert_eq!(mask.removed_count(), 1);
        assert!(!mask.is_active(RoadId(1)));
        // 0.2 does not exceed 1.0
        assert!(mask.is_active(RoadId(3)));
        // a lower threshold removes both
        assert_eq!(ActiveRoads::for_hazard(&net, flood, 0.1).removed_count(), 2);
    }

    #[test]
    fn hazard_mask_keeps_bridges() {
        let mut b = RoadNetworkBuilder::new();
        let h = b.add_hazard("flood");
        let a = b.add_node(NodeAttrs::at(GeoPoint::new(0.0, 0.0)));
        let c = b.add_node(NodeAttrs::at(GeoPoint::new(1.0, 0.0)));
        b.add_road(a, c, RoadAttrs::default().length(10.0).hazard(h, 5.0).bridge());
        b.add_road(a, c, RoadAttrs::default().length(10.0).hazard(h, 5.0));
        let net = b.build();
        let mask = ActiveRoads::for_hazard(&net, h, 1.0);
        assert!(mask.is_active(RoadId(0)));
        assert!(!mask.is_active(RoadId(1)));
    }

    #[test]
    fn weighted_view_hides_inactive_roads() {
        let (net, [_, n1, ..], flood) = super::helpers::grid_network();
        let weights = net.road_weights(Weighing::Distance).unwrap();
        let all = ActiveRoads::all(&net);
        let cut = ActiveRoads::for_hazard(&net, flood, 1.0);
        assert_eq!(WeightedView::new(&net, &weights, &all).arcs(n1).count(), 2);
        assert_eq!(WeightedView::new(&net, &weights, &cut).arcs(n1).count(), 1);
    }

    #[test]
    fn weighted_view_arc_cost_is_road_weight() {
        let (net, [n0, ..], _) = super::helpers::grid_network();
        let weights = net.road_weights(Weighing::Distance).unwrap();
        let all = ActiveRoads::all(&net);
        for arc in WeightedView::new(&net, &weights, &all).arcs(n0) {
            let edge = arc.edge.unwrap();
            assert_eq!(arc.cost, weights[net.edge_road[edge.index()].index()]);
        }
    }

    #[test]
    fn sink_view_adds_one_node_and_zero_cost_links() {
        let (net, [n0, _, n2, _, n4], _) = super::helpers::grid_network();
        let weights = net.road_weights(Weighing::Distance).unwrap();
        let all = ActiveRoads::all(&net);
        let base = WeightedView::new(&net, &weights, &all);
        let sink = SinkView::attach(&base, [n2, n4, n4, NodeId(999)]);

        assert_eq!(sink.node_count(), net.node_count() + 1);
        assert_eq!(sink.sink(), NodeId(5));
        assert_eq!(sink.attached_count(), 2);
        assert_eq!(sink.arcs(n2).count(), 3);
        assert_eq!(sink.arcs(n0).count(), 2);
        assert_eq!(sink.arcs(sink.sink()).count(), 0);
        let link = sink.arcs(n4).last().unwrap();
        assert_eq!(link.to, sink.sink());
        assert_eq!(link.cost, 0.0);
        assert!(link.edge.is_none());

        let inner = sink.detach();
        assert_eq!(inner.node_count(), net.node_count());
        assert_eq!(net.edge_count(), 10);
    }
}

// ── Dijkstra routing ──────────────────────────────────────────────────────────

#[cfg(test)]
mod routing {
    use od_core::{GeoPoint, NodeId, RoadId, Weighing};
    use crate::{
        ActiveRoads, DijkstraRouter, NetworkError, NodeAttrs, RoadAttrs, RoadNetworkBuilder,
        Router, SinkView, WeightedView,
    };

    #[test]
    fn trivial_same_node() {
        let (net, [n0, ..], _) = super::helpers::grid_network();
        let weights = net.road_weights(Weighing::Distance).unwrap();
        let all = ActiveRoads::all(&net);
        let view = WeightedView::new(&net, &weights, &all);
        let p = DijkstraRouter.route(&view, n0, n0).unwrap();
        assert!(p.is_trivial());
        assert_eq!(p.cost, 0.0);
        assert_eq!(p.penultimate(), None);
    }

    #[test]
    fn shortest_path_correct() {
        let (net, [n0, n1, n2, _, n4], _) = super::helpers::grid_network();
        let weights = net.road_weights(Weighing::Distance).unwrap();
        let all = ActiveRoads::all(&net);
        let view = WeightedView::new(&net, &weights, &all);
        let p = DijkstraRouter.route(&view, n0, n4).unwrap();
        assert_eq!(p.cost, 300.0);
        assert_eq!(p.nodes, [n0, n1, n2, n4]);
        assert_eq!(p.edges().count(), 3);
    }

    #[test]
    fn disruption_forces_detour() {
        let (net, [n0, _, _, n3, n4], flood) = super::helpers::grid_network();
        let weights = net.road_weights(Weighing::Distance).unwrap();
        let cut = ActiveRoads::for_hazard(&net, flood, 1.0);
        let view = WeightedView::new(&net, &weights, &cut);
        let p = DijkstraRouter.route(&view, n0, n4).unwrap();
        assert_eq!(p.nodes, [n0, n3, n4]);
        assert_eq!(p.cost, 600.0);
    }

    #[test]
    fn no_route_disconnected() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(NodeAttrs::at(GeoPoint::new(0.0, 0.0)));
        let c = b.add_node(NodeAttrs::at(GeoPoint::new(1.0, 0.0)));
        let net = b.build();
        let weights = net.road_weights(Weighing::Distance).unwrap();
        let all = ActiveRoads::all(&net);
        let view = WeightedView::new(&net, &weights, &all);
        assert!(matches!(
            DijkstraRouter.route(&view, a, c),
            Err(NetworkError::NoRoute { .. })
        ));
        assert!(matches!(
            DijkstraRouter.route(&view, a, NodeId(9)),
            Err(NetworkError::NodeNotFound(_))
        ));
    }

    #[test]
    fn directed_one_way_blocks_return() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(NodeAttrs::at(GeoPoint::new(0.0, 0.0)));
        let c = b.add_node(NodeAttrs::at(GeoPoint::new(1.0, 0.0)));
        b.add_directed_road(a, c, RoadAttrs::default().length(100.0));
        let net = b.build();
        let weights = net.road_weights(Weighing::Distance).unwrap();
        let all = ActiveRoads::all(&net);
        let view = WeightedView::new(&net, &weights, &all);
        assert!(DijkstraRouter.route(&view, a, c).is_ok());
        assert!(DijkstraRouter.route(&view, c, a).is_err());
    }

    #[test]
    fn cheapest_parallel_arc_used() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(NodeAttrs::at(GeoPoint::new(0.0, 0.0)));
        let c = b.add_node(NodeAttrs::at(GeoPoint::new(1.0, 0.0)));
        b.add_road(a, c, RoadAttrs::default().length(7.0));
        b.add_road(a, c, RoadAttrs::default().length(3.0));
        b.add_road(a, c, RoadAttrs::default().length(3.0));
        let net = b.build();
        let weights = net.road_weights(Weighing::Distance).unwrap();
        let all = ActiveRoads::all(&net);
        let view = WeightedView::new(&net, &weights, &all);
        let p = DijkstraRouter.route(&view, a, c).unwrap();
        let edge = p.edges().next().unwrap();
        // Exact tie between roads 1 and 2: the first inserted wins.
        assert_eq!(net.edge_road[edge.index()], RoadId(1));
        assert_eq!(p.cost, 3.0);
    }

    #[test]
    fn sink_path_penultimate_is_closest_target() {
        let (net, [n0, _, n2, n3, _], _) = super::helpers::grid_network();
        let weights = net.road_weights(Weighing::Distance).unwrap();
        let all = ActiveRoads::all(&net);
        let view = WeightedView::new(&net, &weights, &all);
        let sink = SinkView::attach(&view, [n2, n3]);
        let p = DijkstraRouter.route(&sink, n0, sink.sink()).unwrap();
        assert_eq!(p.penultimate(), Some(n2));
        assert_eq!(p.cost, 200.0);
        assert!(p.arcs.last().unwrap().is_none());

        let real = p.truncate_last();
        assert_eq!(real.target(), n2);
        assert_eq!(real.arcs.iter().filter(|a| a.is_none()).count(), 0);
    }

    #[test]
    fn repeated_queries_identical() {
        let (net, [n0, .., n4], _) = super::helpers::grid_network();
        let weights = net.road_weights(Weighing::Time).unwrap();
        let all = ActiveRoads::all(&net);
        let view = WeightedView::new(&net, &weights, &all);
        let a = DijkstraRouter.route(&view, n0, n4).unwrap();
        let b = DijkstraRouter.route(&view, n0, n4).unwrap();
        assert_eq!(a, b);
    }
}
