use std::sync::{Arc, Mutex, PoisonError};

use crate::RouteNetwork;

/// A route network that can be shared between threads.
///
/// Cities, labels and routes live behind a single lock: every operation runs with exclusive
/// access to the whole network, so a rename or a load is never observed half applied.
#[derive(Debug, Clone, Default)]
pub struct SharedRouteNetwork {
    inner: Arc<Mutex<RouteNetwork>>,
}

impl From<RouteNetwork> for SharedRouteNetwork {
    fn from(network: RouteNetwork) -> Self {
        Self {
            inner: Arc::new(Mutex::new(network)),
        }
    }
}

impl SharedRouteNetwork {
    /// Runs the closure with exclusive access to the network.
    pub fn with<T>(&self, f: impl FnOnce(&mut RouteNetwork) -> T) -> T {
        // network operations are all-or-nothing, a poisoned lock still holds a usable network
        let mut network = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut network)
    }
}
