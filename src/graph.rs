use std::fmt::Debug;
use std::hash::Hash;

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::{Criterion, RouteAttributes};

/// Undirected weighted graph.
/// Exposes the behavior the path solver needs from a road network.
pub trait RouteGraph {
    /// Uniquely identify a vertex that belongs to the graph.
    type VertexId: Debug + Copy + Ord + Hash;
    /// Uniquely identify an undirected edge that belongs to the graph.
    type EdgeId: Debug + Copy + Ord + Hash;

    /// Returns true if the vertex is part of the graph.
    fn contains_vertex(&self, vertex: Self::VertexId) -> bool;

    /// Gets the weight of the edge under the given criterion.
    /// Returns None if the edge doesn't belong to the graph.
    fn get_edge_weight(&self, edge: Self::EdgeId, criterion: Criterion) -> Option<f64>;

    /// Gets an iterator over all the edges connected to the given vertex.
    /// For each edge returns the edge ID and the vertex at its other end.
    /// Returns an empty iterator if the vertex doesn't belong to the graph.
    fn vertex_edges(
        &self,
        vertex: Self::VertexId,
    ) -> impl Iterator<Item = (Self::EdgeId, Self::VertexId)>;

    fn vertex_degree(&self, vertex: Self::VertexId) -> usize {
        self.vertex_edges(vertex).count()
    }
}

/// Stable index of a city. Never reused, even after the city key changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CityId(u32);

impl CityId {
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Stable index of a route, assigned in insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteId(u32);

impl RouteId {
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Endpoints in the order they were first connected.
    pub endpoints: [CityId; 2],
    pub attributes: RouteAttributes,
    pub active: bool,
}

#[derive(Debug, Clone)]
struct Vertex {
    key: String,
    edges: Vec<(RouteId, CityId)>,
}

/// Cities and routes of the network, indexed by stable IDs.
/// City keys are a lookup table over the IDs, routes only ever reference IDs.
#[derive(Debug, Clone, Default)]
pub struct CityGraph {
    vertices: Vec<Option<Vertex>>,
    keys: FxHashMap<String, CityId>,
    routes: Vec<Option<Route>>,
    pairs: FxHashMap<(CityId, CityId), RouteId>,
}

const fn pair_key(a: CityId, b: CityId) -> (CityId, CityId) {
    if a.0 <= b.0 { (a, b) } else { (b, a) }
}

impl CityGraph {
    pub fn city_id(&self, key: &str) -> Option<CityId> {
        self.keys.get(key).copied()
    }

    pub fn city_key(&self, city: CityId) -> Option<&str> {
        self.vertex(city).map(|v| v.key.as_str())
    }

    /// Gets an iterator over all the cities, in creation order.
    pub fn cities(&self) -> impl Iterator<Item = (CityId, &str)> {
        self.vertices
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.as_ref().map(|v| (CityId(i as u32), v.key.as_str())))
    }

    pub fn city_count(&self) -> usize {
        self.keys.len()
    }

    pub fn route_count(&self) -> usize {
        self.pairs.len()
    }

    /// Inserts the city if its key is new.
    /// Returns the city ID and whether the city has been created.
    pub fn insert_city(&mut self, key: String) -> (CityId, bool) {
        if let Some(&city) = self.keys.get(&key) {
            return (city, false);
        }

        let city = CityId(self.vertices.len() as u32);
        self.keys.insert(key.clone(), city);
        self.vertices.push(Some(Vertex { key, edges: vec![] }));
        (city, true)
    }

    /// Moves the city to a new key. Routes are left untouched since they reference the ID.
    /// The new key must not be used by another city.
    pub fn relabel_city(&mut self, city: CityId, key: String) {
        debug_assert!(self.city_id(&key).is_none_or(|c| c == city));

        let Some(vertex) = self.vertices.get_mut(city.index()).and_then(Option::as_mut) else {
            return;
        };

        self.keys.remove(&vertex.key);
        self.keys.insert(key.clone(), city);
        vertex.key = key;
    }

    /// Removes the city `from` and moves all its routes onto the city `into`.
    ///
    /// A route between the two merged cities is dropped. When both cities are connected to the
    /// same third city, the route coming from `from` overwrites the attributes of the existing one.
    pub fn merge_city(&mut self, from: CityId, into: CityId) {
        if from == into || self.vertex(into).is_none() {
            return;
        }

        let Some(vertex) = self.vertices.get_mut(from.index()).and_then(Option::take) else {
            return;
        };

        debug!("Merging city {:?} into {into:?}", vertex.key);
        self.keys.remove(&vertex.key);

        for (route_id, other) in vertex.edges {
            self.detach(other, route_id);
            self.pairs.remove(&pair_key(from, other));

            let Some(mut moved) = self.routes.get_mut(route_id.index()).and_then(Option::take)
            else {
                continue;
            };

            if other == into {
                continue;
            }

            if let Some(existing) = self.route_between(into, other) {
                if let Some(route) = self.route_mut(existing) {
                    route.attributes = moved.attributes;
                    route.active = moved.active;
                }
                continue;
            }

            for endpoint in moved.endpoints.iter_mut().filter(|e| **e == from) {
                *endpoint = into;
            }
            self.routes[route_id.index()] = Some(moved);
            self.pairs.insert(pair_key(into, other), route_id);
            self.attach(into, route_id, other);
            self.attach(other, route_id, into);
        }
    }

    pub fn route_between(&self, a: CityId, b: CityId) -> Option<RouteId> {
        self.pairs.get(&pair_key(a, b)).copied()
    }

    pub fn route(&self, route: RouteId) -> Option<&Route> {
        self.routes.get(route.index()).and_then(Option::as_ref)
    }

    pub fn route_mut(&mut self, route: RouteId) -> Option<&mut Route> {
        self.routes.get_mut(route.index()).and_then(Option::as_mut)
    }

    /// Gets an iterator over all the routes, in insertion order.
    pub fn routes(&self) -> impl Iterator<Item = (RouteId, &Route)> {
        self.routes
            .iter()
            .enumerate()
            .filter_map(|(i, r)| r.as_ref().map(|r| (RouteId(i as u32), r)))
    }

    /// Creates the route between the two cities, or overwrites the attributes of the existing
    /// one. Either way the route ends up active.
    pub fn upsert_route(&mut self, a: CityId, b: CityId, attributes: RouteAttributes) -> RouteId {
        debug_assert_ne!(a, b);

        if let Some(route_id) = self.route_between(a, b)
            && let Some(route) = self.route_mut(route_id)
        {
            route.attributes = attributes;
            route.active = true;
            return route_id;
        }

        let route_id = RouteId(self.routes.len() as u32);
        self.routes.push(Some(Route {
            endpoints: [a, b],
            attributes,
            active: true,
        }));
        self.pairs.insert(pair_key(a, b), route_id);
        self.attach(a, route_id, b);
        self.attach(b, route_id, a);
        route_id
    }

    /// Gets a view of the graph restricted to its active routes.
    pub const fn active_routes(&self) -> ActiveRoutes<'_> {
        ActiveRoutes { graph: self }
    }

    fn vertex(&self, city: CityId) -> Option<&Vertex> {
        self.vertices.get(city.index()).and_then(Option::as_ref)
    }

    fn attach(&mut self, city: CityId, route: RouteId, other: CityId) {
        if let Some(vertex) = self.vertices.get_mut(city.index()).and_then(Option::as_mut) {
            vertex.edges.push((route, other));
        }
    }

    fn detach(&mut self, city: CityId, route: RouteId) {
        if let Some(vertex) = self.vertices.get_mut(city.index()).and_then(Option::as_mut) {
            vertex.edges.retain(|&(r, _)| r != route);
        }
    }
}

impl RouteGraph for CityGraph {
    type VertexId = CityId;
    type EdgeId = RouteId;

    fn contains_vertex(&self, vertex: CityId) -> bool {
        self.vertex(vertex).is_some()
    }

    fn get_edge_weight(&self, edge: RouteId, criterion: Criterion) -> Option<f64> {
        self.route(edge).map(|r| r.attributes.weight(criterion))
    }

    fn vertex_edges(&self, vertex: CityId) -> impl Iterator<Item = (RouteId, CityId)> {
        self.vertex(vertex)
            .into_iter()
            .flat_map(|v| v.edges.iter().copied())
    }
}

/// Filtered view of a [`CityGraph`] where closed routes do not exist.
/// A city belongs to the view only if at least one of its routes is active.
#[derive(Debug, Clone, Copy)]
pub struct ActiveRoutes<'a> {
    graph: &'a CityGraph,
}

impl ActiveRoutes<'_> {
    fn is_active(&self, route: RouteId) -> bool {
        self.graph.route(route).is_some_and(|r| r.active)
    }
}

impl RouteGraph for ActiveRoutes<'_> {
    type VertexId = CityId;
    type EdgeId = RouteId;

    fn contains_vertex(&self, vertex: CityId) -> bool {
        self.vertex_edges(vertex).next().is_some()
    }

    fn get_edge_weight(&self, edge: RouteId, criterion: Criterion) -> Option<f64> {
        self.graph
            .route(edge)
            .filter(|r| r.active)
            .map(|r| r.attributes.weight(criterion))
    }

    fn vertex_edges(&self, vertex: CityId) -> impl Iterator<Item = (RouteId, CityId)> {
        self.graph
            .vertex_edges(vertex)
            .filter(|&(route, _)| self.is_active(route))
    }
}
