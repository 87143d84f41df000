mod display;
mod entities;
mod error;
mod periodic;
mod prices;
mod store;

pub use display::FlightDisplaySink;
pub use entities::{City, Flight, FlightId, Price, Route};
pub use error::{DisplayError, StoreError, UpdateError};
pub use periodic::{Periodic, TickReport};
pub use prices::PriceUpdateConsumer;
pub use store::FlightStore;
