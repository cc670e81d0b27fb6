//! The route network engine.
//!
//! Cities are identified by their normalized key (trimmed and case-folded name), while the
//! original spelling is kept as display name. Every operation accepts city names in any casing.

use std::fmt;

use tracing::{debug, warn};

use crate::graph::{CityGraph, CityId, Route, RouteId};
use crate::labels::LabelRegistry;
use crate::routing::shortest_path;
use crate::{
    Criterion, Leg, NetworkError, RouteAttributes, RouteGraph, ShortestPath, ShortestPathConfig,
    normalize_city_name,
};

/// What to do when connecting cities that have not been added yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingEndpoints {
    /// Fail with [`NetworkError::UnknownCity`].
    #[default]
    Reject,
    /// Add the missing cities before connecting them.
    Create,
}

/// What to do when a city is renamed to the key of another existing city.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenameCollision {
    /// Fail with [`NetworkError::CityExists`].
    #[default]
    Reject,
    /// Merge the renamed city into the existing one, moving all its routes.
    Merge,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NetworkConfig {
    pub missing_endpoints: MissingEndpoints,
    pub rename_collision: RenameCollision,
    /// Report [`NetworkError::RouteNotFound`] when opening or closing a route that doesn't exist,
    /// instead of ignoring the request.
    pub strict_toggle: bool,
    pub shortest_path: ShortestPathConfig,
}

/// A route as listed by the network.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteEntry<'a> {
    pub city1: &'a str,
    pub city2: &'a str,
    pub attributes: &'a RouteAttributes,
    pub active: bool,
}

/// Undirected network of cities connected by routes.
#[derive(Debug, Clone, Default)]
pub struct RouteNetwork {
    config: NetworkConfig,
    pub(crate) graph: CityGraph,
    pub(crate) labels: LabelRegistry,
}

impl RouteNetwork {
    pub fn new(config: NetworkConfig) -> Self {
        Self {
            config,
            graph: CityGraph::default(),
            labels: LabelRegistry::default(),
        }
    }

    pub const fn config(&self) -> &NetworkConfig {
        &self.config
    }

    pub fn city_count(&self) -> usize {
        self.graph.city_count()
    }

    pub fn route_count(&self) -> usize {
        self.graph.route_count()
    }

    pub fn contains_city(&self, name: &str) -> bool {
        self.graph.city_id(&normalize_city_name(name)).is_some()
    }

    /// Gets the display name of the city, if the city exists.
    pub fn display_name(&self, name: &str) -> Option<&str> {
        self.graph
            .city_id(&normalize_city_name(name))
            .and_then(|city| self.labels.get(city))
    }

    /// Gets an iterator over the (key, display name) of all cities, in creation order.
    pub fn cities(&self) -> impl Iterator<Item = (&str, &str)> {
        self.graph
            .cities()
            .map(|(city, key)| (key, self.labels.get(city).unwrap_or(key)))
    }

    /// Adds a city to the network.
    ///
    /// Returns false if a city with the same key already exists, in which case only its display
    /// name is refreshed.
    pub fn add_city(&mut self, name: &str) -> Result<bool, NetworkError> {
        let key = normalize_city_name(name);
        if key.is_empty() {
            return Err(NetworkError::EmptyCityName);
        }

        let (city, created) = self.graph.insert_city(key);
        self.labels.set(city, name.trim().to_string());
        debug!("Added city {name:?} ({city:?}), new: {created}");

        Ok(created)
    }

    /// Renames a city, keeping all its routes.
    pub fn rename_city(&mut self, old_name: &str, new_name: &str) -> Result<(), NetworkError> {
        let old_key = normalize_city_name(old_name);
        let new_key = normalize_city_name(new_name);
        if new_key.is_empty() {
            return Err(NetworkError::EmptyCityName);
        }

        let city = self
            .graph
            .city_id(&old_key)
            .ok_or(NetworkError::CityNotFound(old_key))?;
        let label = new_name.trim().to_string();

        match self.graph.city_id(&new_key) {
            Some(existing) if existing != city => match self.config.rename_collision {
                RenameCollision::Reject => return Err(NetworkError::CityExists(new_key)),
                RenameCollision::Merge => {
                    self.graph.merge_city(city, existing);
                    self.labels.remove(city);
                    self.labels.set(existing, label);
                }
            },
            _ => {
                self.graph.relabel_city(city, new_key);
                self.labels.set(city, label);
            }
        }

        debug!("Renamed city {old_name:?} to {new_name:?}");
        Ok(())
    }

    /// Connects two cities with an active route, overwriting the route if it already exists.
    pub fn connect(
        &mut self,
        city1: &str,
        city2: &str,
        attributes: RouteAttributes,
    ) -> Result<(), NetworkError> {
        attributes.validate()?;

        let (key1, key2) = (normalize_city_name(city1), normalize_city_name(city2));
        if key1.is_empty() || key2.is_empty() {
            return Err(NetworkError::EmptyCityName);
        }
        if key1 == key2 {
            return Err(NetworkError::SelfRoute(key1));
        }

        let (a, b) = match self.config.missing_endpoints {
            MissingEndpoints::Reject => (self.city(key1)?, self.city(key2)?),
            MissingEndpoints::Create => (
                self.ensure_city(key1, city1.trim()),
                self.ensure_city(key2, city2.trim()),
            ),
        };

        let route = self.graph.upsert_route(a, b, attributes);
        debug!("Connected {city1:?} <-> {city2:?} with {route:?}");

        Ok(())
    }

    /// Overwrites the attributes of an existing route. The route stays open or closed.
    pub fn set_route_attributes(
        &mut self,
        city1: &str,
        city2: &str,
        attributes: RouteAttributes,
    ) -> Result<(), NetworkError> {
        let route = self.find_route(city1, city2)?;
        attributes.validate()?;

        if let Some(route) = self.graph.route_mut(route) {
            route.attributes = attributes;
        }

        Ok(())
    }

    /// Opens or closes the route between two cities.
    ///
    /// Returns false if there is no such route and the network is not configured with
    /// `strict_toggle`, in which case nothing happens.
    pub fn set_active(
        &mut self,
        city1: &str,
        city2: &str,
        active: bool,
    ) -> Result<bool, NetworkError> {
        let route = match self.find_route(city1, city2) {
            Ok(route) => route,
            Err(error) if self.config.strict_toggle => return Err(error),
            Err(error) => {
                warn!("Ignoring route toggle: {error}");
                return Ok(false);
            }
        };

        if let Some(route) = self.graph.route_mut(route) {
            route.active = active;
        }

        Ok(true)
    }

    pub fn open_route(&mut self, city1: &str, city2: &str) -> Result<bool, NetworkError> {
        self.set_active(city1, city2, true)
    }

    pub fn close_route(&mut self, city1: &str, city2: &str) -> Result<bool, NetworkError> {
        self.set_active(city1, city2, false)
    }

    /// Gets the route between two cities.
    pub fn route(&self, city1: &str, city2: &str) -> Option<RouteEntry<'_>> {
        let route = self.find_route(city1, city2).ok()?;
        self.graph.route(route).and_then(|route| self.entry(route))
    }

    /// Gets an iterator over all the routes in insertion order.
    /// Cities are reported by their normalized key.
    pub fn routes(&self) -> impl Iterator<Item = RouteEntry<'_>> {
        self.graph.routes().filter_map(|(_, route)| self.entry(route))
    }

    /// Computes the shortest path between two cities using only open routes.
    pub fn shortest_path(
        &self,
        origin: &str,
        destination: &str,
        criterion: Criterion,
    ) -> Result<ShortestPath, NetworkError> {
        let origin = normalize_city_name(origin);
        let destination = normalize_city_name(destination);

        let view = self.graph.active_routes();
        let reachable = |key: String| {
            self.graph
                .city_id(&key)
                .filter(|&city| view.contains_vertex(city))
                .ok_or(NetworkError::Unreachable(key))
        };

        let origin_id = reachable(origin.clone())?;
        let destination_id = reachable(destination.clone())?;

        let path = shortest_path(
            &self.config.shortest_path,
            &view,
            origin_id,
            destination_id,
            criterion,
        )
        .ok_or(NetworkError::NoPath(origin, destination))?;

        let cities = path
            .vertices
            .iter()
            .filter_map(|&city| self.graph.city_key(city))
            .map(str::to_string)
            .collect();

        Ok(ShortestPath {
            criterion,
            cities,
            total: path.total,
        })
    }

    /// Same as [`RouteNetwork::shortest_path`], with the criterion given by name.
    pub fn shortest_path_by(
        &self,
        origin: &str,
        destination: &str,
        criterion: &str,
    ) -> Result<ShortestPath, NetworkError> {
        let criterion = Criterion::from_name(criterion)?;
        self.shortest_path(origin, destination, criterion)
    }

    /// Gets the hops of a path, each one with the display names of its cities and the route
    /// travelled.
    pub fn legs(&self, path: &ShortestPath) -> Result<Vec<Leg<'_>>, NetworkError> {
        path.cities
            .windows(2)
            .map(|window| {
                let (from, to) = (&window[0], &window[1]);
                let not_found = || NetworkError::RouteNotFound(from.clone(), to.clone());

                let (a, b) = self
                    .graph
                    .city_id(from)
                    .zip(self.graph.city_id(to))
                    .ok_or_else(not_found)?;
                let route = self
                    .graph
                    .route_between(a, b)
                    .and_then(|route| self.graph.route(route))
                    .ok_or_else(not_found)?;

                Ok(Leg {
                    from: self.label(a),
                    to: self.label(b),
                    attributes: &route.attributes,
                })
            })
            .collect()
    }

    /// Adds a city with an explicit key and display name, without normalizing either.
    pub(crate) fn insert_labeled_city(&mut self, key: String, name: String) -> CityId {
        let (city, _) = self.graph.insert_city(key);
        self.labels.set(city, name);
        city
    }

    fn city(&self, key: String) -> Result<CityId, NetworkError> {
        self.graph
            .city_id(&key)
            .ok_or(NetworkError::UnknownCity(key))
    }

    fn ensure_city(&mut self, key: String, name: &str) -> CityId {
        let (city, created) = self.graph.insert_city(key);
        if created {
            debug!("Created missing city {name:?} ({city:?})");
            self.labels.set(city, name.to_string());
        }
        city
    }

    fn find_route(&self, city1: &str, city2: &str) -> Result<RouteId, NetworkError> {
        let (key1, key2) = (normalize_city_name(city1), normalize_city_name(city2));
        self.graph
            .city_id(&key1)
            .zip(self.graph.city_id(&key2))
            .and_then(|(a, b)| self.graph.route_between(a, b))
            .ok_or(NetworkError::RouteNotFound(key1, key2))
    }

    fn label(&self, city: CityId) -> &str {
        self.labels
            .get(city)
            .or_else(|| self.graph.city_key(city))
            .unwrap_or_default()
    }

    fn entry<'a>(&'a self, route: &'a Route) -> Option<RouteEntry<'a>> {
        let [a, b] = route.endpoints;
        Some(RouteEntry {
            city1: self.graph.city_key(a)?,
            city2: self.graph.city_key(b)?,
            attributes: &route.attributes,
            active: route.active,
        })
    }
}

impl fmt::Display for RouteNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (_, route) in self.graph.routes() {
            let [a, b] = route.endpoints;
            let RouteAttributes {
                distance,
                kind,
                time,
                cost,
            } = &route.attributes;
            let state = if route.active { "ACTIVE" } else { "INACTIVE" };

            writeln!(
                f,
                "{} ↔ {} [{kind} | {distance} km | {time} min | S/ {cost} | {state}]",
                self.label(a),
                self.label(b),
            )?;
        }

        Ok(())
    }
}
