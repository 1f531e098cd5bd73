//! Shared memo of planned routes.

use dashmap::DashMap;
use std::sync::Arc;

use dronz_core::models::{Position, POSITION_EPSILON};
use dronz_core::planner::{PlannedRoute, RoutePlanner};
use dronz_core::PlannerResult;

/// Start/destination pair snapped to the position tolerance grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RouteKey {
    start: (i64, i64),
    destination: (i64, i64),
}

impl RouteKey {
    pub fn new(start: Position, destination: Position) -> Self {
        Self {
            start: snap(start),
            destination: snap(destination),
        }
    }
}

fn snap(position: Position) -> (i64, i64) {
    (
        (position.lng / POSITION_EPSILON).round() as i64,
        (position.lat / POSITION_EPSILON).round() as i64,
    )
}

/// Plans each start/destination pair at most once and shares the result.
///
/// Failed searches are not cached.
#[derive(Debug)]
pub struct RouteCache {
    planner: RoutePlanner,
    routes: DashMap<RouteKey, Arc<PlannedRoute>>,
}

impl RouteCache {
    pub fn new(planner: RoutePlanner) -> Self {
        Self {
            planner,
            routes: DashMap::new(),
        }
    }

    pub fn planner(&self) -> &RoutePlanner {
        &self.planner
    }

    pub fn get(&self, start: Position, destination: Position) -> Option<Arc<PlannedRoute>> {
        self.routes
            .get(&RouteKey::new(start, destination))
            .map(|entry| entry.value().clone())
    }

    /// Cached route, or plan one now. The map is not locked while searching,
    /// so two racing callers may both plan; the first insert wins.
    pub fn get_or_plan(
        &self,
        start: Position,
        destination: Position,
    ) -> PlannerResult<Arc<PlannedRoute>> {
        let key = RouteKey::new(start, destination);
        if let Some(route) = self.routes.get(&key) {
            return Ok(route.value().clone());
        }

        let route = Arc::new(self.planner.plan(start, destination)?);
        Ok(self.routes.entry(key).or_insert(route).value().clone())
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dronz_core::models::Region;
    use dronz_core::PlannerError;

    const BASE: Position = Position::new(-3.186874, 55.944494);

    fn rect(name: &str, min: (f64, f64), max: (f64, f64)) -> Region {
        Region::new(
            name,
            vec![
                Position::new(min.0, min.1),
                Position::new(max.0, min.1),
                Position::new(max.0, max.1),
                Position::new(min.0, max.1),
            ],
        )
    }

    #[test]
    fn second_lookup_shares_the_route() {
        let cache = RouteCache::new(RoutePlanner::new(None, Vec::new()).unwrap());
        let destination = Position::new(-3.1840, 55.9440);

        let first = cache.get_or_plan(BASE, destination).unwrap();
        let second = cache.get_or_plan(BASE, destination).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn key_tolerates_float_noise() {
        let a = RouteKey::new(BASE, Position::new(-3.1840, 55.9440));
        let b = RouteKey::new(
            Position::new(BASE.lng + 1e-12, BASE.lat),
            Position::new(-3.1840, 55.9440 - 1e-12),
        );
        assert_eq!(a, b);
    }

    #[test]
    fn failures_are_not_cached() {
        // Cage around the base: no first move is legal.
        let cage = rect("cage", (-3.1880, 55.9435), (-3.1858, 55.9455));
        let cache = RouteCache::new(RoutePlanner::new(None, vec![cage]).unwrap());

        let err = cache
            .get_or_plan(BASE, Position::new(-3.1800, 55.9440))
            .unwrap_err();
        assert_eq!(err, PlannerError::NoRouteFound { nodes_expanded: 0 });
        assert!(cache.is_empty());
        assert!(cache.get(BASE, Position::new(-3.1800, 55.9440)).is_none());
    }
}
