use std::str::FromStr;

use approx::abs_diff_eq;
use strum::{Display, EnumIter, EnumString};

use crate::NetworkError;

/// Returns the structural key of a city: its name trimmed and case-folded.
pub fn normalize_city_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// The route attribute used as edge weight when computing shortest paths.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Display,
    EnumIter,
    EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum Criterion {
    /// Route length in kilometers.
    #[default]
    #[strum(to_string = "distance", serialize = "distancia")]
    Distance,
    /// Travel time in minutes.
    #[strum(to_string = "time", serialize = "tiempo")]
    Time,
    /// Monetary cost of travelling the route.
    #[strum(to_string = "cost", serialize = "costo")]
    Cost,
}

impl Criterion {
    /// Parses a criterion name, rejecting anything that is not a known weight attribute.
    pub fn from_name(name: &str) -> Result<Self, NetworkError> {
        Self::from_str(name.trim()).map_err(|_| NetworkError::InvalidCriterion(name.to_string()))
    }

    /// Unit used when presenting totals computed under this criterion.
    pub const fn unit(&self) -> &'static str {
        match self {
            Self::Distance => "km",
            Self::Time => "min",
            Self::Cost => "S/",
        }
    }
}

/// The four attributes carried by every route.
#[derive(Debug, Clone, Default)]
pub struct RouteAttributes {
    /// Length in kilometers, strictly positive.
    pub distance: f64,
    /// Free-form category of the route (e.g. "paved", "dirt").
    pub kind: String,
    /// Travel time in minutes, strictly positive.
    pub time: u32,
    /// Monetary cost, non-negative.
    pub cost: f64,
}

impl PartialEq for RouteAttributes {
    fn eq(&self, other: &Self) -> bool {
        const EPSILON: f64 = 1e-9;
        abs_diff_eq!(self.distance, other.distance, epsilon = EPSILON)
            && abs_diff_eq!(self.cost, other.cost, epsilon = EPSILON)
            && self.kind == other.kind
            && self.time == other.time
    }
}

impl RouteAttributes {
    pub fn new(distance: f64, kind: impl Into<String>, time: u32, cost: f64) -> Self {
        Self {
            distance,
            kind: kind.into(),
            time,
            cost,
        }
    }

    /// Gets the weight of the route under the given criterion.
    pub fn weight(&self, criterion: Criterion) -> f64 {
        match criterion {
            Criterion::Distance => self.distance,
            Criterion::Time => f64::from(self.time),
            Criterion::Cost => self.cost,
        }
    }

    pub fn validate(&self) -> Result<(), NetworkError> {
        if !self.distance.is_finite() || self.distance <= 0.0 {
            return Err(NetworkError::InvalidAttributes(format!(
                "distance must be positive, got {}",
                self.distance
            )));
        }

        if self.time == 0 {
            return Err(NetworkError::InvalidAttributes(
                "time must be positive".to_string(),
            ));
        }

        if !self.cost.is_finite() || self.cost < 0.0 {
            return Err(NetworkError::InvalidAttributes(format!(
                "cost must be non-negative, got {}",
                self.cost
            )));
        }

        Ok(())
    }
}
