use std::io::ErrorKind;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Clone)]
pub enum NetworkError {
    #[error("City name is empty")]
    EmptyCityName,
    #[error("City {0:?} has not been added to the network")]
    UnknownCity(String),
    #[error("City {0:?} not found")]
    CityNotFound(String),
    #[error("City {0:?} already exists")]
    CityExists(String),
    #[error("Route {0:?} <-> {1:?} not found")]
    RouteNotFound(String, String),
    #[error("Route cannot connect city {0:?} with itself")]
    SelfRoute(String),
    #[error("Route attributes are not valid: {0}")]
    InvalidAttributes(String),
    #[error("City {0:?} does not exist or has no open routes")]
    Unreachable(String),
    #[error("No open path between {0:?} and {1:?}")]
    NoPath(String, String),
    #[error("Criterion {0:?} is not valid, expected distance, time or cost")]
    InvalidCriterion(String),
}

#[derive(Error, Debug, PartialEq, Clone)]
pub enum SaveError {
    #[error("Network file I/O error: {0:?}")]
    Io(ErrorKind),
    #[error("Cannot serialize network: {0}")]
    Serialize(String),
}

#[derive(Error, Debug, PartialEq, Clone)]
pub enum LoadError {
    #[error("Network file {0:?} not found")]
    NotFound(PathBuf),
    #[error("Network file I/O error: {0:?}")]
    Io(ErrorKind),
    #[error("Network file is malformed: {0}")]
    Malformed(String),
}

impl From<std::io::Error> for SaveError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.kind())
    }
}

impl From<serde_json::Error> for SaveError {
    fn from(error: serde_json::Error) -> Self {
        match error.io_error_kind() {
            Some(kind) => Self::Io(kind),
            None => Self::Serialize(error.to_string()),
        }
    }
}

impl From<std::io::Error> for LoadError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.kind())
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(error: serde_json::Error) -> Self {
        match error.io_error_kind() {
            Some(kind) => Self::Io(kind),
            None => Self::Malformed(error.to_string()),
        }
    }
}

impl From<NetworkError> for LoadError {
    fn from(error: NetworkError) -> Self {
        Self::Malformed(error.to_string())
    }
}
