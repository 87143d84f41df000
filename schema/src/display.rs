use std::sync::Arc;

use crate::{DisplayError, Flight};

/// Renders the current state of a flight somewhere an observer can see it
pub trait FlightDisplaySink: Send + Sync {
    fn display_flight(&self, flight: &Flight) -> Result<(), DisplayError>;
}

impl<T: FlightDisplaySink + ?Sized> FlightDisplaySink for Arc<T> {
    fn display_flight(&self, flight: &Flight) -> Result<(), DisplayError> {
        (**self).display_flight(flight)
    }
}
