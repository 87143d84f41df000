use std::sync::Arc;

use crate::{Flight, FlightId, StoreError};

/// Fetch-or-create access to flights
pub trait FlightStore: Send + Sync {
    /// Returns the flight for `id`, creating it on first access.
    /// Repeated calls with the same `id` must return the same instance.
    fn fetch_or_create(&self, id: &FlightId) -> Result<Arc<Flight>, StoreError>;
}

impl<T: FlightStore + ?Sized> FlightStore for Arc<T> {
    fn fetch_or_create(&self, id: &FlightId) -> Result<Arc<Flight>, StoreError> {
        (**self).fetch_or_create(id)
    }
}
