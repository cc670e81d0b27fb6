use std::cmp::Ordering;
use std::collections::BinaryHeap;

use ordered_float::OrderedFloat;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::{Criterion, RouteAttributes, RouteGraph};

#[derive(Debug, Clone, Copy)]
pub struct ShortestPathConfig {
    /// Paths whose accumulated weight exceeds this value are not explored.
    pub max_total: f64,
}

impl Default for ShortestPathConfig {
    fn default() -> Self {
        Self {
            max_total: f64::INFINITY,
        }
    }
}

/// Shortest path found in a [`RouteGraph`].
#[derive(Debug, Clone, PartialEq)]
pub struct Path<VertexId, EdgeId> {
    /// Sum of the edge weights along the path.
    pub total: f64,
    /// Vertices from origin to destination, both included.
    pub vertices: Vec<VertexId>,
    /// Edges between consecutive vertices.
    pub edges: Vec<EdgeId>,
}

/// Shortest path between two cities of a route network.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPath {
    pub criterion: Criterion,
    /// Normalized city keys from origin to destination, both included.
    pub cities: Vec<String>,
    /// Accumulated weight under the criterion.
    pub total: f64,
}

/// A single hop of a shortest path, with the attributes of the route it travels.
#[derive(Debug, Clone, PartialEq)]
pub struct Leg<'a> {
    pub from: &'a str,
    pub to: &'a str,
    pub attributes: &'a RouteAttributes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HeapElement<VertexId> {
    /// Current shortest distance from origin to this vertex.
    distance: OrderedFloat<f64>,
    vertex: VertexId,
}

// The priority queue depends on the implementation of the Ord trait.
// By default std::BinaryHeap is a max heap.
// Explicitly implement the trait so the queue becomes a min heap.
impl<VertexId: Ord> Ord for HeapElement<VertexId> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .cmp(&self.distance)
            // breaking ties in a deterministic way
            .then_with(|| other.vertex.cmp(&self.vertex))
    }
}

impl<VertexId: Ord> PartialOrd for HeapElement<VertexId> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Computes the path of minimum total weight between origin and destination, using the given
/// criterion as edge weight. Returns None if the destination cannot be reached.
pub fn shortest_path<G: RouteGraph>(
    config: &ShortestPathConfig,
    graph: &G,
    origin: G::VertexId,
    destination: G::VertexId,
    criterion: Criterion,
) -> Option<Path<G::VertexId, G::EdgeId>> {
    debug!("Computing shortest path {origin:?} -> {destination:?} by {criterion}");

    let zero = OrderedFloat(0.0);
    let max_total = OrderedFloat(config.max_total);

    // (current) shortest distance from origin to this vertex
    let mut shortest_distances = FxHashMap::from_iter([(origin, zero)]);

    // previous vertex (value) on the current best known path from origin to this vertex (key)
    let mut previous_map: FxHashMap<G::VertexId, (G::EdgeId, G::VertexId)> = FxHashMap::default();

    // priority queue of discovered vertices that may need to be visited
    let mut frontier = BinaryHeap::from([HeapElement {
        vertex: origin,
        distance: zero,
    }]);

    while let Some(element) = frontier.pop() {
        if element.vertex == destination {
            // Unpacking: the shortest path from destination back to origin
            let mut vertices = vec![destination];
            let mut edges = vec![];
            let mut next = destination;
            while let Some(&(edge, previous)) = previous_map.get(&next) {
                next = previous;
                edges.push(edge);
                vertices.push(previous);
            }
            vertices.reverse();
            edges.reverse();

            return Some(Path {
                total: element.distance.into_inner(),
                vertices,
                edges,
            });
        }

        // check if we already know a cheaper way to get to this vertex from the origin
        let shortest_distance = shortest_distances
            .get(&element.vertex)
            .copied()
            .unwrap_or(OrderedFloat(f64::INFINITY));
        if element.distance > shortest_distance {
            continue;
        }

        for (edge, vertex_to) in graph.vertex_edges(element.vertex) {
            let Some(weight) = graph.get_edge_weight(edge, criterion) else {
                continue;
            };

            let distance = OrderedFloat(element.distance.into_inner() + weight);
            if distance > max_total {
                continue;
            }

            let shortest_distance = shortest_distances
                .get(&vertex_to)
                .copied()
                .unwrap_or(OrderedFloat(f64::INFINITY));

            // check if we can follow the current path to reach the neighbor in a cheaper way
            if distance < shortest_distance {
                // Relax: we have now found a better way that we are going to explore
                shortest_distances.insert(vertex_to, distance);
                previous_map.insert(vertex_to, (edge, element.vertex));
                frontier.push(HeapElement {
                    vertex: vertex_to,
                    distance,
                });
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    /// Adjacency list graph: vertex -> (edge, neighbor), edges weights indexed by edge ID.
    struct TestGraph {
        adjacency: Vec<Vec<(usize, usize)>>,
        weights: Vec<f64>,
    }

    impl TestGraph {
        fn new(vertices: usize, edges: &[(usize, usize, f64)]) -> Self {
            let mut adjacency = vec![vec![]; vertices];
            let mut weights = vec![];
            for (id, &(a, b, weight)) in edges.iter().enumerate() {
                adjacency[a].push((id, b));
                adjacency[b].push((id, a));
                weights.push(weight);
            }
            Self { adjacency, weights }
        }
    }

    impl RouteGraph for TestGraph {
        type VertexId = usize;
        type EdgeId = usize;

        fn contains_vertex(&self, vertex: usize) -> bool {
            vertex < self.adjacency.len()
        }

        fn get_edge_weight(&self, edge: usize, _: Criterion) -> Option<f64> {
            self.weights.get(edge).copied()
        }

        fn vertex_edges(&self, vertex: usize) -> impl Iterator<Item = (usize, usize)> {
            self.adjacency.get(vertex).into_iter().flatten().copied()
        }
    }

    #[test]
    fn routing_shortest_path_001() {
        let graph = TestGraph::new(3, &[(0, 1, 10.0), (1, 2, 20.0), (0, 2, 35.0)]);
        let config = ShortestPathConfig::default();

        assert_eq!(
            shortest_path(&config, &graph, 0, 2, Criterion::Distance).unwrap(),
            Path {
                total: 30.0,
                vertices: vec![0, 1, 2],
                edges: vec![0, 1],
            }
        );
    }

    #[test]
    fn routing_shortest_path_002() {
        let graph = TestGraph::new(2, &[(0, 1, 5.0)]);
        let config = ShortestPathConfig::default();

        assert_eq!(
            shortest_path(&config, &graph, 1, 1, Criterion::Distance).unwrap(),
            Path {
                total: 0.0,
                vertices: vec![1],
                edges: vec![],
            }
        );
    }

    #[test]
    fn routing_shortest_path_003() {
        let graph = TestGraph::new(4, &[(0, 1, 5.0), (2, 3, 5.0)]);
        let config = ShortestPathConfig::default();

        assert_eq!(
            shortest_path(&config, &graph, 0, 3, Criterion::Distance),
            None
        );
    }

    #[test]
    fn routing_shortest_path_004() {
        // two paths of equal weight: 0 - 1 - 3 and 0 - 2 - 3
        let graph = TestGraph::new(4, &[(0, 2, 1.0), (2, 3, 1.0), (0, 1, 1.0), (1, 3, 1.0)]);
        let config = ShortestPathConfig::default();

        let first = shortest_path(&config, &graph, 0, 3, Criterion::Distance).unwrap();
        for _ in 0..10 {
            assert_eq!(
                shortest_path(&config, &graph, 0, 3, Criterion::Distance).unwrap(),
                first
            );
        }
        assert_eq!(first.total, 2.0);
    }

    #[test]
    fn routing_shortest_path_005() {
        let graph = TestGraph::new(3, &[(0, 1, 10.0), (1, 2, 20.0), (0, 2, 35.0)]);

        let config = ShortestPathConfig { max_total: 29.0 };
        assert_eq!(
            shortest_path(&config, &graph, 0, 2, Criterion::Distance),
            None
        );

        let config = ShortestPathConfig { max_total: 30.0 };
        assert_eq!(
            shortest_path(&config, &graph, 0, 2, Criterion::Distance)
                .unwrap()
                .vertices,
            vec![0, 1, 2]
        );
    }

    #[test]
    fn routing_shortest_path_006() {
        // a zero weight edge is a valid shortcut
        let graph = TestGraph::new(3, &[(0, 1, 0.0), (1, 2, 0.0), (0, 2, 1.0)]);
        let config = ShortestPathConfig::default();

        let path = shortest_path(&config, &graph, 2, 0, Criterion::Cost).unwrap();
        assert_eq!(path.vertices, vec![2, 1, 0]);
        assert_eq!(path.total, 0.0);
    }
}
