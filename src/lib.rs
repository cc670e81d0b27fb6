#![doc = include_str!("../README.md")]

mod error;
mod graph;
mod labels;
mod model;
mod network;
mod persistence;
mod routing;
mod shared;

pub use error::{LoadError, NetworkError, SaveError};
pub use graph::{ActiveRoutes, CityGraph, CityId, Route, RouteGraph, RouteId};
pub use labels::LabelRegistry;
pub use model::{Criterion, RouteAttributes, normalize_city_name};
pub use network::{MissingEndpoints, NetworkConfig, RenameCollision, RouteEntry, RouteNetwork};
pub use persistence::{
    CityRecord, NetworkDocument, RouteRecord, load_network, read_network, save_network,
    write_network,
};
pub use routing::{Leg, Path, ShortestPath, ShortestPathConfig, shortest_path};
pub use shared::SharedRouteNetwork;
