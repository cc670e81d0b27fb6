//! JSON representation of a whole route network.
//!
//! ```json
//! {
//!     "ciudades": [{ "clave": "lima", "nombre": "Lima" }],
//!     "rutas": [{ "ciudad1": "lima", "ciudad2": "ica", "distancia": 300.0, "tipo": "paved",
//!                 "tiempo": 240, "costo": 25.0, "activa": true }]
//! }
//! ```

use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::{
    LoadError, NetworkConfig, NetworkError, RouteAttributes, RouteNetwork, SaveError,
    normalize_city_name,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkDocument {
    #[serde(rename = "ciudades")]
    pub cities: Vec<CityRecord>,
    #[serde(rename = "rutas")]
    pub routes: Vec<RouteRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityRecord {
    #[serde(rename = "clave")]
    pub key: String,
    #[serde(rename = "nombre")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRecord {
    #[serde(rename = "ciudad1")]
    pub city1: String,
    #[serde(rename = "ciudad2")]
    pub city2: String,
    #[serde(rename = "distancia")]
    pub distance: f64,
    #[serde(rename = "tipo")]
    pub kind: String,
    #[serde(rename = "tiempo")]
    pub time: u32,
    #[serde(rename = "costo")]
    pub cost: f64,
    #[serde(rename = "activa", default = "default_active")]
    pub active: bool,
}

const fn default_active() -> bool {
    true
}

impl From<&RouteNetwork> for NetworkDocument {
    fn from(network: &RouteNetwork) -> Self {
        let cities = network
            .cities()
            .map(|(key, name)| CityRecord {
                key: key.to_string(),
                name: name.to_string(),
            })
            .collect();

        let routes = network
            .routes()
            .map(|route| RouteRecord {
                city1: route.city1.to_string(),
                city2: route.city2.to_string(),
                distance: route.attributes.distance,
                kind: route.attributes.kind.clone(),
                time: route.attributes.time,
                cost: route.attributes.cost,
                active: route.active,
            })
            .collect();

        Self { cities, routes }
    }
}

impl NetworkDocument {
    /// Builds a new network out of the document, validating every city and route.
    pub fn into_network(self, config: NetworkConfig) -> Result<RouteNetwork, LoadError> {
        let mut network = RouteNetwork::new(config);

        for CityRecord { key, name } in self.cities {
            let key = normalize_city_name(&key);
            if key.is_empty() {
                return Err(NetworkError::EmptyCityName.into());
            }
            if network.graph.city_id(&key).is_some() {
                return Err(LoadError::Malformed(format!("duplicated city {key:?}")));
            }
            network.insert_labeled_city(key, name);
        }

        for (index, route) in self.routes.into_iter().enumerate() {
            let find_city = |name: &str| {
                network.graph.city_id(&normalize_city_name(name)).ok_or_else(|| {
                    LoadError::Malformed(format!("route {index} references unknown city {name:?}"))
                })
            };

            let a = find_city(&route.city1)?;
            let b = find_city(&route.city2)?;
            if a == b {
                return Err(NetworkError::SelfRoute(route.city1).into());
            }

            let attributes = RouteAttributes::new(route.distance, route.kind, route.time, route.cost);
            attributes
                .validate()
                .map_err(|e| LoadError::Malformed(format!("route {index}: {e}")))?;

            let route_id = network.graph.upsert_route(a, b, attributes);
            if let Some(r) = network.graph.route_mut(route_id) {
                r.active = route.active;
            }
        }

        Ok(network)
    }
}

/// Writes the network as a JSON document.
pub fn write_network<W: Write>(network: &RouteNetwork, writer: W) -> Result<(), SaveError> {
    serde_json::to_writer_pretty(writer, &NetworkDocument::from(network))?;
    Ok(())
}

/// Reads a network from a JSON document.
pub fn read_network<R: Read>(reader: R, config: NetworkConfig) -> Result<RouteNetwork, LoadError> {
    let document: NetworkDocument = serde_json::from_reader(reader)?;
    document.into_network(config)
}

/// Saves the network to the file, replacing it.
/// The document is written to a temporary file next to the destination and then moved in place,
/// so the destination is either the old or the new document.
pub fn save_network(network: &RouteNetwork, path: impl AsRef<Path>) -> Result<(), SaveError> {
    let path = path.as_ref();
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(directory)?;
    {
        let mut writer = BufWriter::new(file.as_file_mut());
        write_network(network, &mut writer)?;
        writer.flush()?;
    }
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;

    debug!(
        "Saved {} cities and {} routes to {path:?}",
        network.city_count(),
        network.route_count()
    );
    Ok(())
}

/// Loads a network from the file.
pub fn load_network(path: impl AsRef<Path>, config: NetworkConfig) -> Result<RouteNetwork, LoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => LoadError::NotFound(path.to_path_buf()),
        _ => LoadError::from(e),
    })?;

    let network = read_network(BufReader::new(file), config)?;
    debug!(
        "Loaded {} cities and {} routes from {path:?}",
        network.city_count(),
        network.route_count()
    );
    Ok(network)
}

impl RouteNetwork {
    /// Saves the whole network to the file. See [`save_network`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SaveError> {
        save_network(self, path)
    }

    /// Replaces the whole network with the one stored in the file.
    /// On failure the network is left untouched.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<(), LoadError> {
        *self = load_network(path, *self.config())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    fn read(json: &str) -> Result<RouteNetwork, LoadError> {
        read_network(json.as_bytes(), NetworkConfig::default())
    }

    #[test]
    fn read_network_001() {
        let network = read(
            r#"{
                "ciudades": [
                    {"clave": "lima", "nombre": "Lima"},
                    {"clave": "ica", "nombre": "Ica"}
                ],
                "rutas": [
                    {"ciudad1": "lima", "ciudad2": "ica", "distancia": 300.5, "tipo": "paved",
                     "tiempo": 240, "costo": 25}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(network.city_count(), 2);
        assert_eq!(network.display_name("ICA"), Some("Ica"));

        let route = network.route("lima", "ica").unwrap();
        assert_eq!(route.attributes, &RouteAttributes::new(300.5, "paved", 240, 25.0));
        assert!(route.active, "missing activa defaults to true");
    }

    #[test]
    fn read_network_002() {
        let network = read(r#"{"ciudades": [], "rutas": []}"#).unwrap();
        assert_eq!(network.city_count(), 0);
        assert_eq!(network.route_count(), 0);
    }

    #[test]
    fn read_network_003() {
        let missing_routes = read(r#"{"ciudades": []}"#);
        assert!(matches!(missing_routes, Err(LoadError::Malformed(_))));

        let missing_cities = read(r#"{"rutas": []}"#);
        assert!(matches!(missing_cities, Err(LoadError::Malformed(_))));

        let not_json = read("ciudades: []");
        assert!(matches!(not_json, Err(LoadError::Malformed(_))));
    }

    #[test]
    fn read_network_004() {
        let unknown_city = read(
            r#"{
                "ciudades": [{"clave": "lima", "nombre": "Lima"}],
                "rutas": [{"ciudad1": "lima", "ciudad2": "ica", "distancia": 300, "tipo": "paved",
                           "tiempo": 240, "costo": 25, "activa": false}]
            }"#,
        );
        assert!(matches!(unknown_city, Err(LoadError::Malformed(_))));
    }

    #[test]
    fn read_network_005() {
        let fractional_time = read(
            r#"{
                "ciudades": [{"clave": "a", "nombre": "A"}, {"clave": "b", "nombre": "B"}],
                "rutas": [{"ciudad1": "a", "ciudad2": "b", "distancia": 1, "tipo": "paved",
                           "tiempo": 1.5, "costo": 0}]
            }"#,
        );
        assert!(matches!(fractional_time, Err(LoadError::Malformed(_))));

        let missing_kind = read(
            r#"{
                "ciudades": [{"clave": "a", "nombre": "A"}, {"clave": "b", "nombre": "B"}],
                "rutas": [{"ciudad1": "a", "ciudad2": "b", "distancia": 1, "tiempo": 1, "costo": 0}]
            }"#,
        );
        assert!(matches!(missing_kind, Err(LoadError::Malformed(_))));

        let negative_distance = read(
            r#"{
                "ciudades": [{"clave": "a", "nombre": "A"}, {"clave": "b", "nombre": "B"}],
                "rutas": [{"ciudad1": "a", "ciudad2": "b", "distancia": -1, "tipo": "paved",
                           "tiempo": 1, "costo": 0}]
            }"#,
        );
        assert!(matches!(negative_distance, Err(LoadError::Malformed(_))));
    }

    #[test]
    fn read_network_006() {
        let duplicated = read(
            r#"{
                "ciudades": [{"clave": "lima", "nombre": "Lima"}, {"clave": "LIMA", "nombre": "LIMA"}],
                "rutas": []
            }"#,
        );
        assert!(matches!(duplicated, Err(LoadError::Malformed(_))));

        let self_route = read(
            r#"{
                "ciudades": [{"clave": "lima", "nombre": "Lima"}],
                "rutas": [{"ciudad1": "lima", "ciudad2": "Lima", "distancia": 1, "tipo": "paved",
                           "tiempo": 1, "costo": 0}]
            }"#,
        );
        assert!(matches!(self_route, Err(LoadError::Malformed(_))));
    }

    #[test]
    fn write_network_001() {
        let mut network = RouteNetwork::default();
        network.add_city("Lima").unwrap();
        network.add_city("Ica").unwrap();
        network
            .connect("Lima", "Ica", RouteAttributes::new(300.0, "paved", 240, 25.0))
            .unwrap();
        network.close_route("Lima", "Ica").unwrap();

        let mut buffer = vec![];
        write_network(&network, &mut buffer).unwrap();
        let document: serde_json::Value = serde_json::from_slice(&buffer).unwrap();

        assert_eq!(
            document,
            serde_json::json!({
                "ciudades": [
                    {"clave": "lima", "nombre": "Lima"},
                    {"clave": "ica", "nombre": "Ica"}
                ],
                "rutas": [
                    {"ciudad1": "lima", "ciudad2": "ica", "distancia": 300.0, "tipo": "paved",
                     "tiempo": 240, "costo": 25.0, "activa": false}
                ]
            })
        );
    }
}
