//! Disrupted-versus-baseline comparison.

use crate::baseline::PreferredRoutes;
use crate::route::Route;
use crate::{AnalysisError, AnalysisResult};

/// Outcome of comparing one disrupted route with its baseline.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Delay {
    /// Same destination as the baseline.
    None,
    Delayed {
        extra_weighing:    f64,
        extra_distance_km: f64,
    },
}

/// Running delay totals of one scenario and category.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DelayStats {
    /// Load on routes that kept their baseline destination.
    pub no_delay:          f64,
    /// Load on routes that changed destination.
    pub delayed:           f64,
    pub delayed_routes:    usize,
    pub extra_weighing:    f64,
    pub extra_distance_km: f64,
}

impl DelayStats {
    /// Classify `route` against its baseline and add it to the totals.
    pub fn compare(&mut self, preferred: &PreferredRoutes, route: &Route) -> AnalysisResult<Delay> {
        let base = preferred.get(route.origin, route.category).ok_or(
            AnalysisError::MissingPreferredRoute { origin: route.origin, category: route.category },
        )?;

        if base.destination_node == route.destination_node {
            self.no_delay += route.load;
            return Ok(Delay::None);
        }

        let extra_weighing = route.cost - base.cost;
        let extra_distance_km = (route.length_m - base.length_m) / 1000.0;
        self.delayed += route.load;
        self.delayed_routes += 1;
        self.extra_weighing += extra_weighing;
        self.extra_distance_km += extra_distance_km;
        Ok(Delay::Delayed { extra_weighing, extra_distance_km })
    }
}
