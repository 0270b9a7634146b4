//! Preferred routes: the undisrupted closest destination of every origin.

use rustc_hash::FxHashMap;

use od_core::{CategoryId, NodeId, OriginId};

use crate::route::Route;

#[derive(Clone, Debug, PartialEq)]
pub struct PreferredRoute {
    pub destination_node: NodeId,
    pub cost:             f64,
    pub length_m:         f64,
}

/// Baseline routes keyed by `(origin, category)`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PreferredRoutes {
    routes: FxHashMap<(OriginId, Option<CategoryId>), PreferredRoute>,
}

impl PreferredRoutes {
    pub fn from_routes<'a>(routes: impl IntoIterator<Item = &'a Route>) -> Self {
        let routes = routes
            .into_iter()
            .map(|r| {
                let preferred = PreferredRoute {
                    destination_node: r.destination_node,
                    cost:             r.cost,
                    length_m:         r.length_m,
                };
                ((r.origin, r.category), preferred)
            })
            .collect();
        Self { routes }
    }

    pub fn get(&self, origin: OriginId, category: Option<CategoryId>) -> Option<&PreferredRoute> {
        self.routes.get(&(origin, category))
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
